use std::time::{Duration, SystemTime, UNIX_EPOCH};

use token_transfer_core::{ClockPort, PortError};

#[derive(Debug, Clone, Default)]
pub struct SystemClockAdapter;

impl ClockPort for SystemClockAdapter {
    fn now_ms(&self) -> Result<u64, PortError> {
        let now = SystemTime::now()
            .duration_since(UNIX_EPOCH)
            .map_err(|e| PortError::Transport(format!("time error: {e}")))?;
        Ok(now.as_millis() as u64)
    }

    fn sleep_ms(&self, ms: u64) -> Result<(), PortError> {
        std::thread::sleep(Duration::from_millis(ms));
        Ok(())
    }
}
