//! Request/result envelopes exchanged between screens.
//!
//! A screen finishes with an [`ActivityResult`]: a status code plus an
//! [`Extras`] bag keyed by the fixed identifiers in [`extras`]. Typed values
//! (requests, results, failures) are stored in the bag through the helpers
//! below so callers never handle the raw encoding.

pub mod extras;
mod request;
mod result;

pub use extras::Extras;
pub use request::{DeviceOperation, DeviceRequest};
pub use result::DeviceResult;

use crate::error::SharedError;
use crate::schema::{DeviceState, Failure, PinMatrixRequestType};
use extras::{
    EXTRA_FAILURE, EXTRA_PIN_MATRIX_REQUEST_TYPE, EXTRA_REQUEST, EXTRA_RESULT, EXTRA_STATE,
};

/// Completion status of a screen.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum ResultCode {
    Ok,
    Cancelled,
}

/// Status and payload a finished screen hands back to its caller.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct ActivityResult {
    pub code: ResultCode,
    pub extras: Extras,
}

impl ActivityResult {
    pub fn ok(extras: Extras) -> Self {
        Self {
            code: ResultCode::Ok,
            extras,
        }
    }

    pub fn cancelled() -> Self {
        Self {
            code: ResultCode::Cancelled,
            extras: Extras::new(),
        }
    }

    pub fn is_ok(&self) -> bool {
        self.code == ResultCode::Ok
    }

    /// Successful relay completion carrying a typed result.
    pub fn with_result(result: &DeviceResult) -> Result<Self, SharedError> {
        let mut extras = Extras::new();
        extras.put_json(EXTRA_RESULT, result)?;
        Ok(Self::ok(extras))
    }

    /// Cancelled relay completion carrying the failure that caused it.
    pub fn with_failure(failure: &Failure) -> Result<Self, SharedError> {
        let mut extras = Extras::new();
        extras.put_json(EXTRA_FAILURE, failure)?;
        Ok(Self {
            code: ResultCode::Cancelled,
            extras,
        })
    }

    pub fn result(&self) -> Result<Option<DeviceResult>, SharedError> {
        self.extras.get_json(EXTRA_RESULT)
    }

    pub fn failure(&self) -> Result<Option<Failure>, SharedError> {
        self.extras.get_json(EXTRA_FAILURE)
    }

    /// Attach the session state the device reported.
    pub fn with_state(mut self, state: &DeviceState) -> Self {
        self.extras.put_string(EXTRA_STATE, state.to_string());
        self
    }

    pub fn state(&self) -> Result<Option<DeviceState>, SharedError> {
        self.extras
            .get_string(EXTRA_STATE)
            .map(str::parse)
            .transpose()
    }
}

/// Launch payload for the relay.
pub fn request_extras(request: &DeviceRequest) -> Result<Extras, SharedError> {
    let mut extras = Extras::new();
    extras.put_json(EXTRA_REQUEST, request)?;
    Ok(extras)
}

pub fn request_from(extras: &Extras) -> Result<Option<DeviceRequest>, SharedError> {
    extras.get_json(EXTRA_REQUEST)
}

/// Launch payload for the PIN screen.
pub fn pin_entry_extras(kind: PinMatrixRequestType) -> Result<Extras, SharedError> {
    let mut extras = Extras::new();
    extras.put_json(EXTRA_PIN_MATRIX_REQUEST_TYPE, &kind)?;
    Ok(extras)
}

pub fn pin_entry_kind(extras: &Extras) -> Result<Option<PinMatrixRequestType>, SharedError> {
    extras.get_json(EXTRA_PIN_MATRIX_REQUEST_TYPE)
}
