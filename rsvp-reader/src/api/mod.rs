//! HTTP control API for the reader
//!
//! Routes for the document list, playback control, rendered frames and an SSE
//! event stream.

pub mod handlers;
pub mod server;
pub mod sse;

pub use server::{create_router, run, AppContext};
