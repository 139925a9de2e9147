use indicatif::{ProgressBar, ProgressStyle};
use std::time::Duration;
use storyline_loader::AssetLoaded;
use tokio::sync::broadcast::{self, error::RecvError, error::TryRecvError};
use tokio::sync::oneshot;
use tokio::task::JoinHandle;

/// Create a spinner for indeterminate progress
pub fn create_spinner(message: &str) -> ProgressBar {
    let pb = ProgressBar::new_spinner();
    pb.set_style(
        ProgressStyle::default_spinner()
            .template("{spinner:.blue} {msg} {pos}")
            .unwrap_or_else(|_| ProgressStyle::default_spinner())
            .tick_strings(&["⠋", "⠙", "⠹", "⠸", "⠼", "⠴", "⠦", "⠧", "⠇", "⠏"]),
    );
    pb.set_message(message.to_string());
    pb.enable_steady_tick(Duration::from_millis(100));
    pb
}

/// Finish a progress bar with success message
pub fn finish_success(pb: &ProgressBar, message: &str) {
    pb.set_style(
        ProgressStyle::default_spinner()
            .template("{msg}")
            .unwrap_or_else(|_| ProgressStyle::default_spinner()),
    );
    pb.finish_with_message(format!("✓ {}", message));
}

/// Finish a progress bar with error message
pub fn finish_error(pb: &ProgressBar, message: &str) {
    pb.set_style(
        ProgressStyle::default_spinner()
            .template("{msg}")
            .unwrap_or_else(|_| ProgressStyle::default_spinner()),
    );
    pb.finish_with_message(format!("✗ {}", message));
}

/// Counts preloaded assets as the preloader reports them
pub struct PreloadProgress {
    bar: ProgressBar,
    stop: oneshot::Sender<()>,
    listener: JoinHandle<()>,
}

impl PreloadProgress {
    /// Hidden when `quiet`, so JSON output stays clean
    pub fn start(mut events: broadcast::Receiver<AssetLoaded>, message: &str, quiet: bool) -> Self {
        let bar = if quiet {
            ProgressBar::hidden()
        } else {
            create_spinner(message)
        };

        let (stop, mut stopped) = oneshot::channel();
        let counter = bar.clone();
        let listener = tokio::spawn(async move {
            loop {
                tokio::select! {
                    event = events.recv() => match event {
                        Ok(event) => {
                            tracing::trace!(url = %event.url, "preloaded");
                            counter.inc(1);
                        }
                        Err(RecvError::Lagged(missed)) => counter.inc(missed),
                        Err(RecvError::Closed) => return,
                    },
                    _ = &mut stopped => break,
                }
            }
            // count what arrived before the stop signal
            loop {
                match events.try_recv() {
                    Ok(_) => counter.inc(1),
                    Err(TryRecvError::Lagged(missed)) => counter.inc(missed),
                    Err(_) => break,
                }
            }
        });

        Self {
            bar,
            stop,
            listener,
        }
    }

    /// Stop listening and return the number of assets loaded
    pub async fn stop(self) -> (ProgressBar, u64) {
        let _ = self.stop.send(());
        if let Err(error) = self.listener.await {
            tracing::debug!(%error, "preload listener ended abnormally");
        }
        let loaded = self.bar.position();
        (self.bar, loaded)
    }
}
