//! Networking modules for the STOMP chat connection.
//!
//! SYSTEM CONTEXT
//! ==============
//! `endpoint` resolves where the broker lives, `stomp_client` owns the socket
//! lifecycle, and `session` is the screen-side handle used to publish and to
//! tear the connection down.

pub mod endpoint;
pub mod session;
pub mod stomp_client;
