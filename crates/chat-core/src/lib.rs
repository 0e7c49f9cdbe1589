//! Chat core: conversation state, streaming replies and live voice sessions.
//!
//! Everything here is platform-agnostic. Browser adapters implement the
//! traits in [`ports`] and are injected by the composition root.

pub mod ports;
pub mod event_bus;
pub mod cancel;
pub mod codec;
pub mod store;
pub mod sessions;
pub mod suggestions;
pub mod reply;
pub mod voice;
