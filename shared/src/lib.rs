//! Data shared between the wallet screens, the device interaction relay and
//! the host application: derivation paths, device messages and the typed
//! request/result envelopes screens hand to each other.

pub mod envelope;
pub mod error;
pub mod path;
pub mod schema;
