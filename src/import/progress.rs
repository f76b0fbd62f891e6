//! Progress bar for an import run

use indicatif::{ProgressBar, ProgressStyle};

/// Progress display owned by a single run (hidden in quiet mode).
pub struct ImportProgress {
    bar: ProgressBar,
}

impl ImportProgress {
    pub fn new(total_rows: u64, quiet: bool) -> Self {
        let bar = if quiet {
            ProgressBar::hidden()
        } else {
            let pb = ProgressBar::new(total_rows);
            pb.set_style(
                ProgressStyle::default_bar()
                    .template("Importing listings [{elapsed_precise}] [{bar:40.cyan/blue}] {pos}/{len} rows ({per_sec}) {msg}")
                    .unwrap_or_else(|_| ProgressStyle::default_bar())
                    .progress_chars("#>-"),
            );
            pb
        };
        Self { bar }
    }

    /// Advance by the number of source rows in a finished chunk.
    pub fn chunk_done(&self, rows: u64, inserted_so_far: u64) {
        self.bar.inc(rows);
        self.bar.set_message(format!("{} inserted", inserted_so_far));
    }

    /// Print a line above the bar without corrupting it.
    pub fn println(&self, line: impl AsRef<str>) {
        if self.bar.is_hidden() {
            return;
        }
        self.bar.println(line.as_ref());
    }

    pub fn finish(&self) {
        self.bar.finish_and_clear();
    }
}
