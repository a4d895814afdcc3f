use shared::envelope::extras::{EXTRA_PASSPHRASE, EXTRA_PIN_ENCODED, EXTRA_RESULT};
use shared::envelope::{ActivityResult, DeviceResult, ResultCode};
use shared::error::SharedError;
use shared::schema::Failure;
use thiserror::Error;

/// Outcome categories a caller sees when a screen or the relay finishes.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum IntentError {
    #[error("cancelled by the user")]
    UserCancelled,
    #[error("confirmed with empty input")]
    EmptyInput,
    #[error("device interaction failed: {0}")]
    RelayFailure(Failure),
    #[error("result is missing the '{0}' extra")]
    MissingExtra(&'static str),
    #[error("malformed result payload: {0}")]
    MalformedExtra(String),
    #[error("expected a {expected} result but received {actual}")]
    UnexpectedResult {
        expected: &'static str,
        actual: &'static str,
    },
}

impl From<SharedError> for IntentError {
    fn from(value: SharedError) -> Self {
        IntentError::MalformedExtra(value.to_string())
    }
}

/// Decode the relay's activity result into its typed device result.
///
/// A cancelled result carrying a failure payload becomes
/// [`IntentError::RelayFailure`]; a bare cancellation is
/// [`IntentError::UserCancelled`].
pub fn device_result(result: &ActivityResult) -> Result<DeviceResult, IntentError> {
    match result.code {
        ResultCode::Ok => result.result()?.ok_or(IntentError::MissingExtra(EXTRA_RESULT)),
        ResultCode::Cancelled => match result.failure()? {
            Some(failure) => Err(IntentError::RelayFailure(failure)),
            None => Err(IntentError::UserCancelled),
        },
    }
}

/// Take the PIN digits out of a PIN screen result.
pub fn pin_result(mut result: ActivityResult) -> Result<String, IntentError> {
    take_confirmed(&mut result, EXTRA_PIN_ENCODED)
}

/// Take the passphrase out of a passphrase screen result.
///
/// An empty passphrase is a valid answer, so unlike [`pin_result`] it is not
/// reported as [`IntentError::EmptyInput`].
pub fn passphrase_result(mut result: ActivityResult) -> Result<String, IntentError> {
    match result.code {
        ResultCode::Ok => result
            .extras
            .take_string(EXTRA_PASSPHRASE)
            .ok_or(IntentError::MissingExtra(EXTRA_PASSPHRASE)),
        ResultCode::Cancelled => Err(IntentError::UserCancelled),
    }
}

fn take_confirmed(result: &mut ActivityResult, key: &'static str) -> Result<String, IntentError> {
    if result.code == ResultCode::Cancelled {
        return Err(IntentError::UserCancelled);
    }
    match result.extras.take_string(key) {
        Some(value) if value.is_empty() => Err(IntentError::EmptyInput),
        Some(value) => Ok(value),
        None => Err(IntentError::MissingExtra(key)),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use shared::envelope::Extras;
    use shared::path::DerivationPath;
    use shared::schema::{FailureCode, PublicKey};

    #[test]
    fn cancelled_relay_without_failure_is_user_cancel() {
        assert_eq!(
            device_result(&ActivityResult::cancelled()),
            Err(IntentError::UserCancelled)
        );
    }

    #[test]
    fn cancelled_relay_with_failure_is_relay_failure() {
        let failure = Failure::new(FailureCode::ProcessError, "device busy");
        let result = ActivityResult::with_failure(&failure).expect("encode");
        assert_eq!(
            device_result(&result),
            Err(IntentError::RelayFailure(failure))
        );
    }

    #[test]
    fn ok_relay_decodes_result() {
        let expected = DeviceResult::GetPublicKey(PublicKey {
            xpub: String::from("xpub-a"),
            path: DerivationPath::from([44, 0, 0]),
        });
        let result = ActivityResult::with_result(&expected).expect("encode");
        assert_eq!(device_result(&result), Ok(expected));
        assert_eq!(
            device_result(&ActivityResult::ok(Extras::new())),
            Err(IntentError::MissingExtra(EXTRA_RESULT))
        );
    }

    #[test]
    fn pin_result_rejects_empty_digits() {
        let result = ActivityResult::ok(Extras::new().with_string(EXTRA_PIN_ENCODED, ""));
        assert_eq!(pin_result(result), Err(IntentError::EmptyInput));

        let result = ActivityResult::ok(Extras::new().with_string(EXTRA_PIN_ENCODED, "42"));
        assert_eq!(pin_result(result), Ok(String::from("42")));
    }

    #[test]
    fn passphrase_result_accepts_empty_text() {
        let result = ActivityResult::ok(Extras::new().with_string(EXTRA_PASSPHRASE, ""));
        assert_eq!(passphrase_result(result), Ok(String::new()));
        assert_eq!(
            passphrase_result(ActivityResult::cancelled()),
            Err(IntentError::UserCancelled)
        );
    }
}
