//! Page modules for the two screens.
//!
//! ARCHITECTURE
//! ============
//! Each page owns its screen-local state and delegates rendering details to
//! `components`.

pub mod chat;
pub mod identity;
