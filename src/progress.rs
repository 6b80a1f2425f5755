//! Coarse progress reporting.  Rows are reported as they finish, in
//! whatever order the workers finish them.

use std::io::Write;

/// Somewhere to send progress ticks.
pub trait Progress {
    /// `done` of `total` rows are finished.
    fn tick(&mut self, done: usize, total: usize);
    /// All `total` rows are finished.
    fn finish(&mut self, total: usize);
}

/// Rewrites a single line on stderr.
#[derive(Default)]
pub struct ConsoleProgress {
    last_percent: Option<usize>,
}

impl ConsoleProgress {
    /// A fresh progress line.
    pub fn new() -> Self {
        ConsoleProgress::default()
    }
}

impl Progress for ConsoleProgress {
    fn tick(&mut self, done: usize, total: usize) {
        let percent = 100 * done / total.max(1);
        if self.last_percent == Some(percent) {
            return;
        }
        self.last_percent = Some(percent);
        let mut err = std::io::stderr();
        let _ = write!(err, "\r{}/{} ({}%)", done, total, percent);
        let _ = err.flush();
    }

    fn finish(&mut self, total: usize) {
        self.last_percent = None;
        eprintln!("\r{}/{} (100%)", total, total);
    }
}

/// Reports nothing.
pub struct Silent;

impl Progress for Silent {
    fn tick(&mut self, _done: usize, _total: usize) {}
    fn finish(&mut self, _total: usize) {}
}
