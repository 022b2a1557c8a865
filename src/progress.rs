//! Progress bar display for installations

use indicatif::{ProgressBar, ProgressStyle};

/// Progress display driven by the installer's progress callback
pub struct ProgressDisplay {
    pb: ProgressBar,
}

impl ProgressDisplay {
    /// Create a bar whose length is set by the first update
    pub fn new() -> Self {
        let style = ProgressStyle::default_bar()
            .template("[{bar:40.cyan/blue}] {pos}/{len} {msg}")
            .map(|style| style.progress_chars("#>-"))
            .unwrap_or_else(|_| ProgressStyle::default_bar());

        let pb = ProgressBar::new(0);
        pb.set_style(style);
        Self { pb }
    }

    /// Show the stage being processed
    pub fn update(&self, label: &str, current: usize, total: usize) {
        self.pb.set_length(total as u64);
        self.pb.set_position(current.saturating_sub(1) as u64);
        self.pb.set_message(truncate_label(label));
    }

    /// Complete the bar and clear it
    pub fn finish(&self) {
        self.pb.finish_and_clear();
    }

    /// Abandon on error
    pub fn abandon(&self) {
        self.pb.abandon();
    }
}

impl Default for ProgressDisplay {
    fn default() -> Self {
        Self::new()
    }
}

// Truncate long paths for display
fn truncate_label(label: &str) -> String {
    const MAX: usize = 50;
    let count = label.chars().count();
    if count > MAX {
        let tail: String = label.chars().skip(count - (MAX - 3)).collect();
        format!("...{tail}")
    } else {
        label.to_string()
    }
}
