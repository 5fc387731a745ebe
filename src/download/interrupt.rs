use std::sync::{
    Arc,
    atomic::{AtomicBool, Ordering},
};

/// Exit status for a process stopped by SIGINT outside a transfer.
pub const SIGINT_EXIT_CODE: i32 = 130;

/// Ctrl-C state shared between the signal handler and the transfer loop.
///
/// A signal only cancels a transfer that is running when it arrives. Outside
/// a transfer `on_signal` returns false and the handler is expected to exit.
#[derive(Clone, Default)]
pub struct InterruptGuard {
    transferring: Arc<AtomicBool>,
    interrupted: Arc<AtomicBool>,
}

impl InterruptGuard {
    pub fn new() -> Self {
        Self::default()
    }

    /// Records a Ctrl-C. Returns whether a running transfer took it.
    pub fn on_signal(&self) -> bool {
        if self.transferring.load(Ordering::SeqCst) {
            self.interrupted.store(true, Ordering::SeqCst);
            true
        } else {
            false
        }
    }

    pub fn interrupted(&self) -> bool {
        self.interrupted.load(Ordering::SeqCst)
    }

    /// Marks a transfer as running until the returned scope is dropped.
    /// Signals recorded before this call are discarded.
    pub fn begin_transfer(&self) -> TransferScope {
        self.interrupted.store(false, Ordering::SeqCst);
        self.transferring.store(true, Ordering::SeqCst);
        TransferScope {
            transferring: self.transferring.clone(),
        }
    }
}

pub struct TransferScope {
    transferring: Arc<AtomicBool>,
}

impl Drop for TransferScope {
    fn drop(&mut self) {
        self.transferring.store(false, Ordering::SeqCst);
    }
}
