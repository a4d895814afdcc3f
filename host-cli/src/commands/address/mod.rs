use std::io::{BufRead, Write};

use intents::IntentError;
use intents::error::device_result;
use shared::envelope::{DeviceRequest, DeviceResult};
use shared::error::SharedError;
use shared::path::DerivationPath;
use shared::schema::DeviceState;

use crate::AddressArgs;
use crate::commands::DeviceTransport;
use crate::commands::relay::drive_relay;
use crate::terminal::Terminal;

/// Show the address at a path, or have the device confirm an expected one.
pub fn run<T, R, W>(
    transport: &mut T,
    terminal: &mut Terminal<R, W>,
    args: &AddressArgs,
    session: Option<DeviceState>,
) -> Result<(), SharedError>
where
    T: DeviceTransport + ?Sized,
    R: BufRead,
    W: Write,
{
    let path: DerivationPath = args.path.parse()?;
    let request = match &args.expect {
        Some(expected) => DeviceRequest::check_address(path, expected.as_str()),
        None => DeviceRequest::get_address(path),
    }
    .with_state(session);

    let result = drive_relay(request, transport, terminal)?;
    match device_result(&result) {
        Ok(DeviceResult::GetAddress(address)) => {
            if args.expect.is_some() {
                terminal.print_line(format_args!("Address verified: {}", address.address))
            } else {
                terminal.print_line(format_args!("Address: {}", address.address))
            }
        }
        Ok(other) => Err(SharedError::Interaction(
            IntentError::UnexpectedResult {
                expected: "GetAddress",
                actual: other.name(),
            }
            .to_string(),
        )),
        Err(IntentError::UserCancelled) => terminal.print_line("Cancelled."),
        Err(err) => Err(SharedError::Interaction(err.to_string())),
    }
}
