//! Transient busy indicator for blocking calls.

use indicatif::{ProgressBar, ProgressStyle};
use std::future::Future;
use std::time::Duration;

/// Run a future under a transient spinner.
///
/// The spinner is shown for the call's entire duration and cleared from the
/// terminal before the output is handed back, whatever that output is.
pub async fn with_spinner<T>(message: &str, fut: impl Future<Output = T>) -> T {
    let spinner = ProgressBar::new_spinner();
    spinner.set_style(
        ProgressStyle::default_spinner()
            .template("{spinner:.green} {msg}")
            .unwrap(),
    );
    spinner.set_message(message.to_string());
    spinner.enable_steady_tick(Duration::from_millis(80));

    let output = fut.await;

    spinner.finish_and_clear();
    output
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn test_passes_through_ok() {
        let result: Result<i32, ()> = with_spinner("working", async { Ok(7) }).await;
        assert_eq!(result, Ok(7));
    }

    #[tokio::test]
    async fn test_passes_through_err() {
        let result: Result<(), String> =
            with_spinner("working", async { Err("boom".to_string()) }).await;
        assert_eq!(result, Err("boom".to_string()));
    }
}
