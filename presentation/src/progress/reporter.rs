//! Progress indication while a reply is pending

use colored::Colorize;
use indicatif::{ProgressBar, ProgressStyle};
use relay_domain::Model;
use std::time::Duration;

/// Spinner shown between sending a message and printing the reply.
pub struct ProgressReporter {
    bar: ProgressBar,
}

impl ProgressReporter {
    /// Start a spinner for a request to `model`.
    pub fn start(model: &Model) -> Self {
        let bar = ProgressBar::new_spinner();
        bar.set_style(Self::spinner_style());
        bar.set_prefix(model.to_string());
        bar.set_message("thinking...");
        bar.enable_steady_tick(Duration::from_millis(100));
        Self { bar }
    }

    /// A reporter that draws nothing.
    pub fn hidden() -> Self {
        Self {
            bar: ProgressBar::hidden(),
        }
    }

    fn spinner_style() -> ProgressStyle {
        ProgressStyle::default_spinner()
            .template("{spinner:.green} {prefix:.bold} {msg}")
            .unwrap_or_else(|_| ProgressStyle::default_spinner())
    }

    /// Clear the spinner after a reply arrived.
    pub fn finish(&self) {
        self.bar.finish_and_clear();
    }

    /// Leave a failure marker in place of the spinner.
    pub fn fail(&self) {
        self.bar
            .finish_with_message(format!("{} request failed", "x".red()));
    }
}

impl Drop for ProgressReporter {
    fn drop(&mut self) {
        if !self.bar.is_finished() {
            self.bar.finish_and_clear();
        }
    }
}
