//! Spinner that follows the busy indicator.

use std::time::Duration;

use indicatif::{ProgressBar, ProgressStyle};
use tokio::sync::watch;
use tokio::task::JoinHandle;

use lead_admin::BusyIndicator;

const TICK: Duration = Duration::from_millis(80);

/// Shows a spinner on stderr while the indicator is above zero.
///
/// Dropping the spinner stops it.
pub struct Spinner {
    task: JoinHandle<()>,
}

impl Spinner {
    /// Start following `busy`. Must be called inside a tokio runtime.
    pub fn follow(busy: &BusyIndicator, message: &'static str) -> Self {
        let rx = busy.subscribe();
        let task = tokio::spawn(run(rx, message));
        Self { task }
    }
}

impl Drop for Spinner {
    fn drop(&mut self) {
        self.task.abort();
    }
}

async fn run(mut rx: watch::Receiver<usize>, message: &'static str) {
    let mut bar: Option<ProgressBar> = None;
    loop {
        let depth = *rx.borrow_and_update();
        if depth == 0 {
            if let Some(shown) = bar.take() {
                shown.finish_and_clear();
            }
        } else if bar.is_none() {
            bar = Some(start(message));
        }
        if rx.changed().await.is_err() {
            break;
        }
    }
    if let Some(shown) = bar {
        shown.finish_and_clear();
    }
}

fn start(message: &'static str) -> ProgressBar {
    let bar = ProgressBar::new_spinner();
    bar.set_style(
        ProgressStyle::with_template("{spinner:.cyan} {msg}")
            .unwrap_or_else(|_| ProgressStyle::default_spinner()),
    );
    bar.set_message(message);
    bar.enable_steady_tick(TICK);
    bar
}
