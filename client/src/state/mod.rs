//! Shared client-side state modules.
//!
//! DESIGN
//! ======
//! Each screen owns its state holder; nothing here is global. The Identity
//! Screen keeps its draft name in a local signal, so only the chat session
//! needs a dedicated model.

pub mod chat;
