use std::collections::VecDeque;

use shared::error::SharedError;
use shared::schema::DeviceMessage;

use super::DeviceTransport;

/// In-memory transport that records sent messages and replays queued replies.
#[derive(Default)]
pub struct MemoryDeviceTransport {
    queued_replies: VecDeque<DeviceMessage>,
    pub sent_messages: Vec<DeviceMessage>,
    pub connected: bool,
    /// Connect attempts that leave the device detached.
    pub failed_connects: usize,
}

impl MemoryDeviceTransport {
    pub fn new() -> Self {
        Self {
            connected: true,
            ..Self::default()
        }
    }

    /// Queue a reply returned by the next call.
    pub fn queue_reply(&mut self, reply: DeviceMessage) {
        self.queued_replies.push_back(reply);
    }

    /// Access the most recent message written by the host.
    pub fn last_sent(&self) -> Option<&DeviceMessage> {
        self.sent_messages.last()
    }
}

impl DeviceTransport for MemoryDeviceTransport {
    fn is_connected(&self) -> bool {
        self.connected
    }

    fn connect(&mut self) -> Result<(), SharedError> {
        if self.failed_connects > 0 {
            self.failed_connects -= 1;
        } else {
            self.connected = true;
        }
        Ok(())
    }

    fn call(&mut self, message: &DeviceMessage) -> Result<DeviceMessage, SharedError> {
        self.sent_messages.push(message.clone());
        self.queued_replies
            .pop_front()
            .ok_or_else(|| SharedError::Transport("memory transport has no queued replies".into()))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn records_sent_messages() {
        let mut transport = MemoryDeviceTransport::new();
        transport.queue_reply(DeviceMessage::ButtonAck);
        transport
            .call(&DeviceMessage::Initialize)
            .expect("reply queued");
        assert_eq!(transport.last_sent(), Some(&DeviceMessage::Initialize));
    }

    #[test]
    fn empty_queue_is_a_transport_error() {
        let mut transport = MemoryDeviceTransport::new();
        let err = transport.call(&DeviceMessage::Initialize).unwrap_err();
        assert!(err.to_string().contains("no queued replies"));
    }
}
