use shared::error::SharedError;
use shared::schema::DeviceMessage;

pub mod simulated;

#[cfg(test)]
pub mod memory;

/// Request/response channel to a wallet device.
///
/// The relay decides what to send; implementations only deliver one message
/// and return the device's reply.
pub trait DeviceTransport {
    /// Whether the device is currently attached and usable.
    fn is_connected(&self) -> bool;

    /// Attach to the device after the user plugged it in.
    fn connect(&mut self) -> Result<(), SharedError>;

    /// Deliver `message` and wait for the device's reply.
    fn call(&mut self, message: &DeviceMessage) -> Result<DeviceMessage, SharedError>;
}
