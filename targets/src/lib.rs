//! Concrete targets for ratebench
//!
//! This crate provides the bundled [`SocketTarget`], a plain request/reply
//! exchange over:
//!
//! - UDP, one datagram out and one datagram in
//! - TCP, one length-prefixed frame out and one frame in
//!
//! Every call opens its own socket, so calls from different workers never
//! share transport state.

#![warn(missing_docs)]
#![warn(clippy::all)]

mod socket;
mod transport;

pub use socket::{SocketTarget, CODE_EMPTY, CODE_OK};
pub use transport::{ParseTransportError, Transport};
