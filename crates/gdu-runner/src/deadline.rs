use std::process::{Child, ExitStatus};
use std::thread;
use std::time::{Duration, Instant};

use tracing::warn;

const WAIT_SLICE: Duration = Duration::from_millis(10);

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Deadline {
    timeout: Duration,
    expires_at: Instant,
}

impl Deadline {
    /// `None` when `now + timeout` is past what `Instant` can represent.
    pub fn after(timeout: Duration) -> Option<Self> {
        let expires_at = Instant::now().checked_add(timeout)?;
        Some(Self {
            timeout,
            expires_at,
        })
    }

    pub fn from_timeout(timeout: Option<Duration>) -> Option<Self> {
        let timeout = timeout.filter(|timeout| !timeout.is_zero())?;
        let deadline = Self::after(timeout);
        if deadline.is_none() {
            warn!(?timeout, "timeout is too large to schedule; running without a deadline");
        }
        deadline
    }

    pub fn timeout(&self) -> Duration {
        self.timeout
    }

    pub fn remaining(&self) -> Duration {
        self.expires_at.saturating_duration_since(Instant::now())
    }

    pub fn is_expired(&self) -> bool {
        self.remaining().is_zero()
    }
}

#[derive(Debug)]
pub(crate) enum WaitOutcome {
    Exited(ExitStatus),
    Expired,
}

pub(crate) fn wait_with_deadline(
    child: &mut Child,
    deadline: Option<Deadline>,
) -> std::io::Result<WaitOutcome> {
    let Some(deadline) = deadline else {
        return child.wait().map(WaitOutcome::Exited);
    };

    loop {
        if let Some(status) = child.try_wait()? {
            return Ok(WaitOutcome::Exited(status));
        }
        if deadline.is_expired() {
            // The child may have exited between try_wait and kill.
            let _ = child.kill();
            child.wait()?;
            return Ok(WaitOutcome::Expired);
        }
        thread::sleep(deadline.remaining().min(WAIT_SLICE));
    }
}
