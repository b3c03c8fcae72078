use std::rc::Rc;

use tracing::{debug, warn};

use crate::error::WakeLockError;

/// Platform screen wake-lock.
pub trait WakeLockProvider {
    fn acquire(&self) -> Result<(), WakeLockError>;
    fn release(&self);
}

/// Provider for hosts without the capability.
#[derive(Debug, Default, Clone, Copy)]
pub struct NoWakeLock;

impl WakeLockProvider for NoWakeLock {
    fn acquire(&self) -> Result<(), WakeLockError> {
        Err(WakeLockError::Unsupported)
    }

    fn release(&self) {}
}

/// The single wake-lock handle of a session.
///
/// At most one request is outstanding at a time. Dropping the handle releases
/// it, so every teardown path (stop, reconfigure, widget drop) lets go of the
/// display.
///
/// A refused request is not retried until the lock has been released once
/// (pause, stop), so an unsupported host logs a single warning per run.
pub struct ScreenWakeLock {
    provider: Rc<dyn WakeLockProvider>,
    enabled: bool,
    held: bool,
    failed: bool,
}

impl ScreenWakeLock {
    pub fn new(provider: Rc<dyn WakeLockProvider>, enabled: bool) -> Self {
        Self {
            provider,
            enabled,
            held: false,
            failed: false,
        }
    }

    pub fn is_held(&self) -> bool {
        self.held
    }

    /// Request the lock unless already held. Failures are logged and dropped.
    pub fn acquire(&mut self) {
        if !self.enabled || self.held || self.failed {
            return;
        }
        match self.provider.acquire() {
            Ok(()) => {
                self.held = true;
                debug!("screen wake-lock acquired");
            }
            Err(e) => {
                self.failed = true;
                warn!(error = %e, "screen wake-lock unavailable, continuing without it");
            }
        }
    }

    pub fn release(&mut self) {
        self.failed = false;
        if self.held {
            self.provider.release();
            self.held = false;
            debug!("screen wake-lock released");
        }
    }
}

impl Drop for ScreenWakeLock {
    fn drop(&mut self) {
        self.release();
    }
}

impl std::fmt::Debug for ScreenWakeLock {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("ScreenWakeLock")
            .field("enabled", &self.enabled)
            .field("held", &self.held)
            .field("failed", &self.failed)
            .finish()
    }
}
