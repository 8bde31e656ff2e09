//! Progress indicator for remote calls
//!
//! A background task redraws the spinner every 100ms while the workflow
//! awaits a remote call. The two sides share a one-shot stop signal; the
//! handle is consumed when it finishes, so it cannot be reused.

use std::future::Future;
use std::time::Duration;

use console::style;
use indicatif::{ProgressBar, ProgressStyle};
use tokio::sync::oneshot;
use tokio::task::JoinHandle;

const TICK_INTERVAL: Duration = Duration::from_millis(100);

/// Spinner shown while a single remote call is in flight
pub struct CommandSpinner {
    bar: ProgressBar,
    stop_tx: Option<oneshot::Sender<()>>,
    ticker: Option<JoinHandle<()>>,
}

impl CommandSpinner {
    /// Start a spinner that draws nothing when `quiet` is set
    ///
    /// Must be called inside a tokio runtime.
    pub fn new_maybe(label: &str, quiet: bool) -> Self {
        let bar = if quiet {
            ProgressBar::hidden()
        } else {
            ProgressBar::new_spinner()
        };
        Self::with_bar(bar, label)
    }

    fn with_bar(bar: ProgressBar, label: &str) -> Self {
        bar.set_style(
            ProgressStyle::with_template("{spinner:.cyan} {msg}")
                .unwrap_or_else(|_| ProgressStyle::default_spinner())
                .tick_chars("⠋⠙⠹⠸⠼⠴⠦⠧⠇⠏ "),
        );
        bar.set_message(label.to_string());

        let (stop_tx, mut stop_rx) = oneshot::channel::<()>();
        let ticking = bar.clone();
        let ticker = tokio::spawn(async move {
            let mut interval = tokio::time::interval(TICK_INTERVAL);
            loop {
                tokio::select! {
                    _ = &mut stop_rx => break,
                    _ = interval.tick() => ticking.tick(),
                }
            }
        });

        Self {
            bar,
            stop_tx: Some(stop_tx),
            ticker: Some(ticker),
        }
    }

    async fn halt(&mut self) {
        if let Some(stop_tx) = self.stop_tx.take() {
            let _ = stop_tx.send(());
        }
        if let Some(ticker) = self.ticker.take() {
            let _ = ticker.await;
        }
    }

    /// Stop the spinner and leave a green check with `message`
    pub async fn success(mut self, message: &str) {
        self.halt().await;
        self.bar
            .finish_with_message(format!("{} {message}", style("✓").green()));
    }

    /// Stop the spinner and leave a red cross with `message`
    pub async fn fail(mut self, message: &str) {
        self.halt().await;
        self.bar
            .finish_with_message(format!("{} {message}", style("✗").red()));
    }
}

impl Drop for CommandSpinner {
    fn drop(&mut self) {
        if let Some(stop_tx) = self.stop_tx.take() {
            let _ = stop_tx.send(());
        }
        if let Some(ticker) = self.ticker.take() {
            ticker.abort();
        }
        if !self.bar.is_finished() {
            self.bar.finish_and_clear();
        }
    }
}

/// Run `call` under a spinner labelled `label`
///
/// The spinner ends with a check mark on `Ok` and a cross on `Err`.
pub async fn spin<F, T, E>(label: &str, quiet: bool, call: F) -> Result<T, E>
where
    F: Future<Output = Result<T, E>>,
{
    let spinner = CommandSpinner::new_maybe(label, quiet);
    let result = call.await;
    let done = label.trim_end_matches("...");
    match &result {
        Ok(_) => spinner.success(done).await,
        Err(_) => spinner.fail(done).await,
    }
    result
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn hidden_spinner_stops_cleanly() {
        let spinner = CommandSpinner::new_maybe("Working...", true);
        tokio::time::sleep(Duration::from_millis(250)).await;
        spinner.success("Done").await;
    }

    #[tokio::test]
    async fn spin_passes_result_through() {
        let ok: Result<u32, String> = spin("Counting...", true, async { Ok(7) }).await;
        assert_eq!(ok, Ok(7));

        let err: Result<u32, String> =
            spin("Counting...", true, async { Err("boom".to_string()) }).await;
        assert_eq!(err, Err("boom".to_string()));
    }

    #[tokio::test]
    async fn dropping_a_running_spinner_stops_the_ticker() {
        let spinner = CommandSpinner::new_maybe("Working...", true);
        drop(spinner);
        tokio::time::sleep(Duration::from_millis(150)).await;
    }
}
