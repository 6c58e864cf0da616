// src/utils/progress_bars/progress_config.rs

use indicatif::{ProgressBar, ProgressStyle};
use std::env;

/// Configuration for progress bars in the command-line tools
#[derive(Debug, Clone)]
pub struct ProgressConfig {
    /// Whether to show progress bars at all
    pub enabled: bool,
    /// Minimum number of input files before a bar is drawn
    pub min_files: usize,
}

impl Default for ProgressConfig {
    fn default() -> Self {
        Self {
            enabled: true,
            min_files: 2,
        }
    }
}

impl ProgressConfig {
    /// Create progress configuration from environment variables
    pub fn from_env() -> Self {
        Self {
            enabled: env::var("PROGRESS_ENABLED")
                .unwrap_or_else(|_| "true".to_string())
                .parse()
                .unwrap_or(true),
            min_files: env::var("PROGRESS_MIN_FILES")
                .unwrap_or_else(|_| "2".to_string())
                .parse()
                .unwrap_or(2),
        }
    }

    /// Progress bar over `total` files, or None when disabled or not worth drawing
    pub fn create_file_bar(&self, total: usize) -> Option<ProgressBar> {
        if !self.enabled || total < self.min_files {
            return None;
        }
        let pb = ProgressBar::new(total as u64);
        if let Ok(style) = ProgressStyle::default_bar()
            .template("{spinner:.green} [{elapsed_precise}] {bar:40.cyan/blue} {pos}/{len} {msg}")
        {
            pb.set_style(style.progress_chars("█▉▊▋▌▍▎▏  "));
        }
        Some(pb)
    }
}
