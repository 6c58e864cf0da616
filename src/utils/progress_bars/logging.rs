// src/utils/progress_bars/logging.rs - Stage-tagged logging helpers for the cleanup pipeline
use log::{debug, info, warn};
use std::time::Instant;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PipelineStage {
    Consolidation,
    Resolution,
    Extraction,
    Aggregation,
    Filtering,
}

impl PipelineStage {
    fn tag(self) -> (&'static str, &'static str) {
        match self {
            PipelineStage::Consolidation => ("CONSOLIDATE", "👥"),
            PipelineStage::Resolution => ("RESOLVE", "🔎"),
            PipelineStage::Extraction => ("EXTRACT", "📄"),
            PipelineStage::Aggregation => ("AGGREGATE", "🗂️"),
            PipelineStage::Filtering => ("FILTER", "🧹"),
        }
    }
}

#[derive(Clone)]
pub struct PipelineLogger {
    stage_name: &'static str,
    stage_emoji: &'static str,
    start_time: Instant,
}

impl PipelineLogger {
    pub fn new(stage: PipelineStage) -> Self {
        let (stage_name, stage_emoji) = stage.tag();
        Self {
            stage_name,
            stage_emoji,
            start_time: Instant::now(),
        }
    }

    pub fn log_start(&self, details: &str) {
        info!(
            "[{}] {} 🚀 Starting {} ({})",
            self.stage_name,
            self.stage_emoji,
            self.stage_name.to_lowercase(),
            details
        );
    }

    pub fn log_phase(&self, phase: &str, details: Option<&str>) {
        let elapsed = self.start_time.elapsed();
        match details {
            Some(details) => info!(
                "[{}] {} 🔄 Phase: {} - {} [+{:.1}s]",
                self.stage_name, self.stage_emoji, phase, details, elapsed.as_secs_f32()
            ),
            None => info!(
                "[{}] {} 🔄 Phase: {} [+{:.1}s]",
                self.stage_name, self.stage_emoji, phase, elapsed.as_secs_f32()
            ),
        }
    }

    pub fn log_consolidation(&self, distinct_names: usize, groups: usize) {
        info!(
            "[{}] {} 📊 {} distinct borrower names → {} borrower groups",
            self.stage_name, self.stage_emoji, distinct_names, groups
        );
    }

    pub fn log_completion(&self, borrowers: usize, documents_stored: usize, documents_skipped: usize) {
        info!(
            "[{}] {} 🎉 COMPLETED: {} documents stored for {} borrowers in {:.2?}",
            self.stage_name,
            self.stage_emoji,
            documents_stored,
            borrowers,
            self.start_time.elapsed()
        );
        if documents_skipped > 0 {
            warn!(
                "[{}] {} ⚠️  {} documents skipped (unresolved borrower, malformed or empty)",
                self.stage_name, self.stage_emoji, documents_skipped
            );
        }
    }

    pub fn log_warning(&self, message: &str) {
        warn!("[{}] {} ⚠️  {}", self.stage_name, self.stage_emoji, message);
    }

    pub fn log_debug(&self, message: &str) {
        debug!("[{}] {} {}", self.stage_name, self.stage_emoji, message);
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_stage_tags() {
        let logger = PipelineLogger::new(PipelineStage::Consolidation);
        assert_eq!(logger.stage_name, "CONSOLIDATE");
        assert_eq!(PipelineLogger::new(PipelineStage::Filtering).stage_name, "FILTER");
    }
}
