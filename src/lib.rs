//! # roomcast
//!
//! Room-based broadcast registry for a real-time messaging server, with a
//! WebSocket gateway on top.
//!
//! The core is the [`domain::BroadcastAdaptor`] trait and its in-memory
//! implementation, [`domain::RoomRegistry`]: it tracks which sockets are
//! in which named rooms and fans events out to every member of a room,
//! optionally skipping the sender. Everything else in this crate is the
//! plumbing that feeds sockets into it.
//!
//! ## Architecture
//!
//! ```text
//! Clients (HTTP, WebSocket)
//!     │
//!     ├── REST Handlers (api/)
//!     ├── WS Handler + WsSocket (ws/)
//!     │     └── ConnReader / ConnWriter (transport/)
//!     │
//!     ├── RoomService (service/)
//!     │
//!     └── BroadcastAdaptor ── RoomRegistry (domain/)
//! ```

pub mod api;
pub mod app_state;
pub mod config;
pub mod domain;
pub mod error;
pub mod server;
pub mod service;
pub mod transport;
pub mod ws;
