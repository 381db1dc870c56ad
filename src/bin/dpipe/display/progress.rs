use std::io::{self, Write};
use std::time::{Duration, Instant};

use indicatif::{ProgressBar, ProgressStyle};

/// Spinner-per-item progress for a batch, printed to stderr.
pub struct ItemSpinner {
    bar: Option<ProgressBar>,
    start: Instant,
    item: usize,
    total_items: usize,
    item_start: Instant,
}

impl ItemSpinner {
    pub fn new(total_items: usize) -> Self {
        let now = Instant::now();
        Self {
            bar: None,
            start: now,
            item: 0,
            total_items,
            item_start: now,
        }
    }

    pub fn item(&mut self, description: &str) {
        if let Some(bar) = self.bar.take() {
            bar.finish_and_clear();
        }

        self.item += 1;
        self.item_start = Instant::now();

        let bar = ProgressBar::new_spinner();
        bar.set_style(
            ProgressStyle::default_spinner()
                .template("  {spinner:.cyan} {msg}")
                .expect("invalid template")
                .tick_chars("⠋⠙⠹⠸⠼⠴⠦⠧⠇⠏"),
        );
        bar.enable_steady_tick(Duration::from_millis(80));
        bar.set_message(format!(
            "[{}/{}] {}...",
            self.item, self.total_items, description
        ));

        self.bar = Some(bar);
    }

    pub fn complete_item(&mut self, description: &str, substeps: &[String]) {
        self.finish_item('✓', "32", description, substeps);
    }

    pub fn fail_item(&mut self, description: &str, substeps: &[String]) {
        self.finish_item('✗', "31", description, substeps);
    }

    fn finish_item(&mut self, mark: char, color: &str, description: &str, substeps: &[String]) {
        if let Some(bar) = self.bar.take() {
            bar.finish_and_clear();
        }

        let elapsed = self.item_start.elapsed();
        let mut stderr = io::stderr().lock();

        let _ = writeln!(
            stderr,
            "  \x1b[{color}m{mark}\x1b[0m {:<44} {:>5.1}s",
            description,
            elapsed.as_secs_f64()
        );

        for substep in substeps {
            let _ = writeln!(stderr, "      \x1b[2m·\x1b[0m {}", substep);
        }
    }

    pub fn finish(mut self, summary: &str) {
        if let Some(bar) = self.bar.take() {
            bar.finish_and_clear();
        }

        let elapsed = self.start.elapsed();
        let mut stderr = io::stderr().lock();

        let _ = writeln!(stderr);
        let _ = writeln!(
            stderr,
            "  \x1b[2m╺━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━╸\x1b[0m"
        );
        let _ = writeln!(stderr);
        let _ = writeln!(
            stderr,
            "  {:<40} {:>14}",
            summary,
            format!("Total: {:.2}s", elapsed.as_secs_f64())
        );
        let _ = writeln!(stderr);
    }
}

pub enum Progress {
    Interactive(ItemSpinner),
    Silent,
}

impl Progress {
    pub fn new(interactive: bool, total_items: usize) -> Self {
        if interactive {
            Self::Interactive(ItemSpinner::new(total_items))
        } else {
            Self::Silent
        }
    }

    pub fn item(&mut self, description: &str) {
        if let Self::Interactive(s) = self {
            s.item(description);
        }
    }

    pub fn complete_item(&mut self, description: &str, substeps: &[String]) {
        if let Self::Interactive(s) = self {
            s.complete_item(description, substeps);
        }
    }

    pub fn fail_item(&mut self, description: &str, substeps: &[String]) {
        if let Self::Interactive(s) = self {
            s.fail_item(description, substeps);
        }
    }

    pub fn finish(self, summary: &str) {
        if let Self::Interactive(s) = self {
            s.finish(summary);
        }
    }
}
