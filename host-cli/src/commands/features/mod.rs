use std::io::{BufRead, Write};

use intents::IntentError;
use intents::error::device_result;
use shared::envelope::{DeviceRequest, DeviceResult};
use shared::error::SharedError;
use shared::schema::{DeviceState, Features};

use crate::commands::DeviceTransport;
use crate::commands::relay::drive_relay;
use crate::terminal::Terminal;

pub fn run<T, R, W>(
    transport: &mut T,
    terminal: &mut Terminal<R, W>,
    session: Option<DeviceState>,
) -> Result<(), SharedError>
where
    T: DeviceTransport + ?Sized,
    R: BufRead,
    W: Write,
{
    let result = drive_relay(
        DeviceRequest::initialize().with_state(session),
        transport,
        terminal,
    )?;
    match device_result(&result) {
        Ok(DeviceResult::Initialize(features)) => print_features(terminal, &features),
        Ok(other) => Err(SharedError::Interaction(
            IntentError::UnexpectedResult {
                expected: "Initialize",
                actual: other.name(),
            }
            .to_string(),
        )),
        Err(IntentError::UserCancelled) => terminal.print_line("Cancelled."),
        Err(err) => Err(SharedError::Interaction(err.to_string())),
    }
}

fn print_features<R: BufRead, W: Write>(
    terminal: &mut Terminal<R, W>,
    features: &Features,
) -> Result<(), SharedError> {
    terminal.print_line(format_args!("Vendor: {}", features.vendor))?;
    terminal.print_line(format_args!(
        "Label: {}",
        features.label.as_deref().unwrap_or("(none)")
    ))?;
    terminal.print_line(format_args!(
        "Firmware: {}.{}.{}",
        features.major_version, features.minor_version, features.patch_version
    ))?;
    terminal.print_line(format_args!("Initialized: {}", yes_no(features.initialized)))?;
    terminal.print_line(format_args!("PIN protection: {}", yes_no(features.pin_protection)))?;
    terminal.print_line(format_args!(
        "Passphrase protection: {}",
        yes_no(features.passphrase_protection)
    ))
}

fn yes_no(value: bool) -> &'static str {
    if value { "yes" } else { "no" }
}
