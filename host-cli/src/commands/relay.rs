use std::collections::VecDeque;
use std::io::{BufRead, Write};

use intents::relay::{DeviceRelay, RelayEffect, RelayState};
use shared::envelope::{ActivityResult, DeviceRequest};
use shared::error::SharedError;

use crate::commands::DeviceTransport;
use crate::terminal::Terminal;

/// Run one request through the relay, executing its effects against the
/// device and the terminal until it finishes.
pub fn drive_relay<T, R, W>(
    request: DeviceRequest,
    device: &mut T,
    terminal: &mut Terminal<R, W>,
) -> Result<ActivityResult, SharedError>
where
    T: DeviceTransport + ?Sized,
    R: BufRead,
    W: Write,
{
    let (mut relay, effects) = DeviceRelay::open(request, device.is_connected());
    let mut pending: VecDeque<RelayEffect> = effects.into();

    while let Some(effect) = pending.pop_front() {
        let next = match effect {
            RelayEffect::ShowConnectDialog => {
                if terminal.wait_for_connection()? {
                    device.connect()?;
                    relay.on_connection_changed(device.is_connected())
                } else {
                    relay.on_dialog_cancelled()
                }
            }
            RelayEffect::ShowLoadingDialog => {
                terminal.show_loading()?;
                Vec::new()
            }
            RelayEffect::ShowButtonDialog { address } => {
                terminal.show_button_request(address.as_deref())?;
                Vec::new()
            }
            RelayEffect::Send(mut message) => {
                let reply = device.call(&message);
                message.zeroize_secrets();
                // Replies to a closing Cancel or ClearSession are dropped, errors included.
                if relay.state() == RelayState::Finished {
                    match reply {
                        Ok(reply) => {
                            log::debug!("discarding {} after the relay finished", reply.name())
                        }
                        Err(err) => log::warn!("{} after the relay finished: {err}", message.name()),
                    }
                    Vec::new()
                } else {
                    relay.on_device_message(reply?)
                }
            }
            RelayEffect::LaunchPinEntry(kind) => {
                let result = terminal.run_pin_entry(kind)?;
                relay.on_pin_result(result)
            }
            RelayEffect::LaunchPassphraseEntry => {
                let result = terminal.run_passphrase_entry()?;
                relay.on_passphrase_result(result)
            }
            RelayEffect::Finish(result) => {
                if let Ok(Some(session)) = result.state() {
                    terminal.print_line(format_args!("Session: {session}"))?;
                }
                return Ok(result);
            }
        };
        pending.extend(next);
    }

    Err(SharedError::Interaction(format!(
        "conversation stalled while {:?}",
        relay.state()
    )))
}
