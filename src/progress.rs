//! Progress display while files are packaged
//!
//! All archiving progress goes through the [`ProgressReporter`] trait so the
//! archiver can run silently in tests.

use indicatif::{ProgressBar, ProgressStyle};

/// Progress reporter for the archiving step
pub trait ProgressReporter {
    /// A new filter started walking `root`
    fn start_filter(&mut self, root: &str);

    /// A file was written to the archive
    fn add_file(&mut self, entry: &str);

    /// Archiving finished
    fn finish(&mut self);

    /// Archiving failed
    fn abandon(&mut self);
}

/// Spinner showing the current file and a running count
///
/// indicatif hides the spinner when stderr is not a terminal.
pub struct SpinnerProgressReporter {
    pb: ProgressBar,
}

impl SpinnerProgressReporter {
    pub fn new() -> Self {
        let style = ProgressStyle::with_template("{spinner:.green} {pos} files {msg}")
            .unwrap_or_else(|_| ProgressStyle::default_spinner());

        let pb = ProgressBar::new_spinner();
        pb.set_style(style);
        Self { pb }
    }
}

impl ProgressReporter for SpinnerProgressReporter {
    fn start_filter(&mut self, root: &str) {
        self.pb.set_message(root.to_string());
    }

    fn add_file(&mut self, entry: &str) {
        // Truncate long paths for display
        let display_path = if entry.len() > 50 {
            let mut start = entry.len() - 47;
            while !entry.is_char_boundary(start) {
                start += 1;
            }
            format!("...{}", &entry[start..])
        } else {
            entry.to_string()
        };
        self.pb.set_message(display_path);
        self.pb.inc(1);
    }

    fn finish(&mut self) {
        self.pb.finish_and_clear();
    }

    fn abandon(&mut self) {
        self.pb.abandon();
    }
}

/// No-op reporter
#[allow(dead_code)]
#[derive(Default)]
pub struct SilentProgressReporter;

impl ProgressReporter for SilentProgressReporter {
    fn start_filter(&mut self, _root: &str) {}

    fn add_file(&mut self, _entry: &str) {}

    fn finish(&mut self) {}

    fn abandon(&mut self) {}
}
