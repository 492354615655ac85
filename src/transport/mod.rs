//! Transport building blocks that sit underneath a socket.
//!
//! Neither wrapper knows about rooms. They give the WebSocket connection
//! two guarantees:
//!
//! - [`ConnReader`]: the close notification fires at most once.
//! - [`ConnWriter`]: the connection's write lock is released exactly once,
//!   when the outbound sink is closed.

pub mod conn_reader;
pub mod conn_writer;

pub use conn_reader::ConnReader;
pub use conn_writer::ConnWriter;
