//! Progress display for writer tasks.
//!
//! One tick per finished partition, in the order the tasks complete.

use console::{style, Term};
use indicatif::{ProgressBar, ProgressStyle};

const PROGRESS_TEMPLATE: &str = "{msg} {bar:40.cyan/blue} {pos}/{len} [{elapsed_precise}]";

/// Progress reporter for a batch of writer tasks.
pub(crate) struct ProgressReporter {
    bar: ProgressBar,
}

impl ProgressReporter {
    /// Creates a reporter for `total` tasks.
    ///
    /// Draws nothing when `visible` is false or stderr is not a terminal.
    pub(crate) fn new(total: usize, visible: bool) -> Self {
        if !visible || !Term::stderr().features().is_attended() {
            return Self {
                bar: ProgressBar::hidden(),
            };
        }

        let bar = ProgressBar::new(total as u64);
        if let Ok(bar_style) = ProgressStyle::with_template(PROGRESS_TEMPLATE) {
            bar.set_style(bar_style.progress_chars("=> "));
        }
        bar.set_message(style("Concatenating files").bold().to_string());

        Self { bar }
    }

    /// Records one finished task.
    pub(crate) fn task_done(&self) {
        self.bar.inc(1);
    }

    /// Finishes the display, leaving the final count on screen.
    pub(crate) fn finish(&self) {
        self.bar.finish();
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_hidden_reporter_counts_ticks() {
        let reporter = ProgressReporter::new(3, false);
        reporter.task_done();
        reporter.task_done();

        assert!(reporter.bar.is_hidden());
        assert_eq!(reporter.bar.position(), 2);
        reporter.finish();
    }
}
