//! Pipeline configuration for borrower consolidation and document cleanup.
//! Defaults reproduce the tuned production behavior; environment variables
//! override individual settings.

use log::{debug, info};

use crate::extraction::borrower_field::BorrowerFieldIndicators;
use crate::matching::name::MatchThresholds;
use crate::utils::env::{env_flag, env_list};

#[derive(Debug, Clone, PartialEq)]
pub struct PipelineConfig {
    pub thresholds: MatchThresholds,
    /// Keep borrowers with no stored documents as empty entries in the output.
    pub preserve_empty_borrowers: bool,
    /// Remove noise keys from every stored document.
    pub strip_noise: bool,
    pub indicators: BorrowerFieldIndicators,
}

impl Default for PipelineConfig {
    fn default() -> Self {
        Self {
            thresholds: MatchThresholds::default(),
            preserve_empty_borrowers: false,
            strip_noise: true,
            indicators: BorrowerFieldIndicators::default(),
        }
    }
}

impl PipelineConfig {
    /// Create configuration from environment variables
    pub fn from_env() -> Self {
        let defaults = Self::default();

        let thresholds = MatchThresholds {
            allow_single_token: env_flag(
                "BORROWER_ALLOW_SINGLE_TOKEN",
                defaults.thresholds.allow_single_token,
            ),
            ..defaults.thresholds
        };
        let indicators = BorrowerFieldIndicators {
            borrower: env_list("BORROWER_INDICATORS").unwrap_or(defaults.indicators.borrower),
            employer: env_list("EMPLOYER_INDICATORS").unwrap_or(defaults.indicators.employer),
        };
        let config = Self {
            thresholds,
            preserve_empty_borrowers: env_flag(
                "BORROWER_PRESERVE_EMPTY",
                defaults.preserve_empty_borrowers,
            ),
            strip_noise: env_flag("BORROWER_STRIP_NOISE", defaults.strip_noise),
            indicators,
        };

        debug!("Pipeline config: {:?}", config);
        config
    }

    /// Log the current configuration
    pub fn log_config(&self) {
        info!("⚙️  Borrower cleanup configuration");
        info!(
            "   Name cutoffs: first > {}, last > {} or ≤ {} edits, middle > {}",
            self.thresholds.first_name_ratio,
            self.thresholds.last_name_ratio,
            self.thresholds.last_name_max_edits,
            self.thresholds.middle_name_ratio
        );
        if self.thresholds.allow_single_token {
            info!("   Single-token names may fuzzy-match");
        }
        if self.preserve_empty_borrowers {
            info!("   Borrowers without documents are KEPT as empty entries");
        } else {
            info!("   Borrowers without documents are dropped");
        }
        info!("   Borrower label indicators: {:?}", self.indicators.borrower);
        info!("   Employer label indicators: {:?}", self.indicators.employer);
    }
}
