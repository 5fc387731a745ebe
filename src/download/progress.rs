use std::time::{Duration, Instant};

use indicatif::{HumanBytes, HumanDuration, ProgressBar, ProgressStyle};

use crate::download::interrupt::InterruptGuard;

// Trait to homogenize the progress tracking, so the transfer loop is not
// tied to indicatif.
pub trait ProgressTracker {
    fn interrupted(&self) -> bool;
    fn update_progress(&self, bytes: u64);
    fn finish(&self, downloaded: u64);
    fn abandon(&self, downloaded: u64);
}

/// Progress bar for a single stemcell transfer, sized from the index.
pub struct TransferBar {
    bar: ProgressBar,
    total_bytes: u64,
    start_time: Instant,
    interrupt: InterruptGuard,
}

impl TransferBar {
    pub fn new(label: &str, total_bytes: u64, interrupt: InterruptGuard) -> Self {
        let bar = ProgressBar::new(total_bytes);
        // Template is a constant, a parse failure falls back to the default style.
        if let Ok(style) = ProgressStyle::with_template(
            "{prefix} [{bar:40}] {bytes}/{total_bytes} ({bytes_per_sec}) {msg}",
        ) {
            bar.set_style(style.progress_chars("=> "));
        }
        bar.set_prefix(label.to_string());
        bar.enable_steady_tick(Duration::from_millis(100));
        Self {
            bar,
            total_bytes,
            start_time: Instant::now(),
            interrupt,
        }
    }

    pub fn summary(&self, downloaded: u64) -> String {
        let speed = downloaded / self.start_time.elapsed().as_secs().max(1);
        format!(
            "Downloaded {} at {}/s in {}.",
            HumanBytes(downloaded),
            HumanBytes(speed),
            HumanDuration(self.start_time.elapsed())
        )
    }

    pub fn interrupted_message(&self, downloaded: u64) -> String {
        format!(
            "Download interrupted at {}/{}.",
            HumanBytes(downloaded),
            HumanBytes(self.total_bytes),
        )
    }
}

impl ProgressTracker for TransferBar {
    fn interrupted(&self) -> bool {
        self.interrupt.interrupted()
    }

    fn update_progress(&self, bytes: u64) {
        self.bar.set_position(bytes);
    }

    fn finish(&self, downloaded: u64) {
        self.bar.finish_with_message(self.summary(downloaded));
    }

    fn abandon(&self, downloaded: u64) {
        self.bar.abandon_with_message(self.interrupted_message(downloaded));
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn interrupted_message_reports_progress_against_expected_size() {
        let bar = TransferBar::new("stemcell.tgz", 2048, InterruptGuard::new());
        assert_eq!(
            bar.interrupted_message(1024),
            "Download interrupted at 1.00 KiB/2.00 KiB."
        );
        bar.abandon(0);
    }

    #[test]
    fn interrupted_follows_the_guard() {
        let guard = InterruptGuard::new();
        let _transfer = guard.begin_transfer();
        let bar = TransferBar::new("stemcell.tgz", 10, guard.clone());
        assert!(!bar.interrupted());
        assert!(guard.on_signal());
        assert!(bar.interrupted());
        bar.abandon(0);
    }
}
