//! Mock transport for testing consumer pumps without real hardware.
//!
//! Records every frame handed to [`Transport::send`] and can be programmed
//! to fail, so pump logic (packet alignment, loss recovery, transport
//! up/down transitions) is testable in isolation.

use crate::error::{MinLogError, Result};
use crate::platform::transport::Transport;

/// Recording transport with programmable failures.
#[derive(Debug, Default)]
pub struct MockTransport {
    sent: Vec<Vec<u8>>,
    fail_next: usize,
    resets: usize,
    ready: bool,
}

impl MockTransport {
    pub fn new() -> Self {
        Self {
            sent: Vec::new(),
            fail_next: 0,
            resets: 0,
            ready: true,
        }
    }

    /// Frames successfully sent, in order.
    pub fn sent_frames(&self) -> &[Vec<u8>] {
        &self.sent
    }

    /// The most recently sent frame, if any.
    pub fn last_sent(&self) -> Option<&Vec<u8>> {
        self.sent.last()
    }

    /// Makes the next `n` sends fail with a transport error.
    pub fn fail_sends(&mut self, n: usize) {
        self.fail_next = n;
    }

    /// How many times the pump reset this transport.
    pub fn resets(&self) -> usize {
        self.resets
    }

    pub fn set_ready(&mut self, ready: bool) {
        self.ready = ready;
    }

    pub fn clear_sent(&mut self) {
        self.sent.clear();
    }
}

impl Transport for MockTransport {
    fn send(&mut self, frame: &[u8]) -> Result<()> {
        if self.fail_next > 0 {
            self.fail_next -= 1;
            return Err(MinLogError::send_failed());
        }
        self.sent.push(frame.to_vec());
        Ok(())
    }

    fn is_ready(&self) -> bool {
        self.ready
    }

    fn reset(&mut self) {
        self.resets += 1;
        self.ready = true;
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn records_sends_in_order() {
        let mut mock = MockTransport::new();
        mock.send(&[1, 2]).unwrap();
        mock.send(&[3]).unwrap();

        assert_eq!(mock.sent_frames(), &[vec![1, 2], vec![3]]);
        assert_eq!(mock.last_sent().unwrap(), &vec![3]);
    }

    #[test]
    fn programmed_failures_then_recovery() {
        let mut mock = MockTransport::new();
        mock.fail_sends(2);

        assert!(mock.send(&[1]).is_err());
        assert!(mock.send(&[2]).is_err());
        assert!(mock.send(&[3]).is_ok());
        assert_eq!(mock.sent_frames().len(), 1);
    }

    #[test]
    fn reset_restores_readiness() {
        let mut mock = MockTransport::new();
        mock.set_ready(false);
        assert!(!mock.is_ready());

        mock.reset();
        assert!(mock.is_ready());
        assert_eq!(mock.resets(), 1);
    }
}
