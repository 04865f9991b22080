//! Spinner styling, and retry progress
// (c) 2026 oqctl developers

use indicatif::{ProgressBar, ProgressStyle};

use crate::session::RetryObserver;

/// Maximum update frequency we will use for the progress display
pub(crate) const MAX_UPDATE_FPS: u8 = 20;

/// Indicatif template for spinner lines
pub(crate) const SPINNER_TEMPLATE: &str = "{spinner} {wide_msg} {prefix}";

pub(crate) fn spinner_style() -> anyhow::Result<ProgressStyle> {
    Ok(ProgressStyle::with_template(SPINNER_TEMPLATE)?)
}

/// Shows upload retries on a spinner, as "retrying N/M".
///
/// `N` is the attempt about to be made.
#[derive(Debug, Clone)]
pub(crate) struct SpinnerRetry(pub(crate) ProgressBar);

impl RetryObserver for SpinnerRetry {
    fn retrying(&self, failed: u32, max: u32) {
        tracing::debug!("attempt {failed}/{max} had no reply");
        self.0.set_prefix(format!("retrying {}/{max}", failed + 1));
    }
}

#[cfg(test)]
mod tests {
    use indicatif::ProgressBar;
    use pretty_assertions::assert_eq;

    use super::{SpinnerRetry, spinner_style};
    use crate::session::RetryObserver as _;

    #[test]
    fn style_parses() {
        assert!(spinner_style().is_ok());
    }

    #[test]
    fn retry_shows_next_attempt() {
        let bar = ProgressBar::hidden();
        let obs = SpinnerRetry(bar.clone());
        obs.retrying(1, 3);
        assert_eq!(bar.prefix(), "retrying 2/3");
        obs.retrying(2, 3);
        assert_eq!(bar.prefix(), "retrying 3/3");
    }
}
