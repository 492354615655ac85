//! Domain layer: sockets, the broadcast adaptor contract, and the
//! in-memory room registry.
//!
//! This module contains the server-side domain model: socket identity, the
//! socket capability the registry fans out to, the [`BroadcastAdaptor`]
//! trait callers depend on, and [`RoomRegistry`], its process-local
//! implementation.

pub mod adaptor;
pub mod room_registry;
pub mod socket;
pub mod socket_id;

pub use adaptor::{BroadcastAdaptor, SendReport};
pub use room_registry::RoomRegistry;
pub use socket::{EmitError, Socket, SocketHandle};
pub use socket_id::SocketId;
