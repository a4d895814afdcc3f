//! Hardware wallet UI intents.
//!
//! The crate provides the PIN, passphrase and key-export screens of a wallet
//! host application together with the relay that conducts the device
//! conversation on their behalf. Screens and relay exchange the typed
//! envelopes defined in [`shared::envelope`].

pub mod error;
pub mod relay;
pub mod ui;

pub use error::IntentError;
