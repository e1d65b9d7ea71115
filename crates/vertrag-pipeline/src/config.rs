//! Pipeline configuration
//!
//! Conservative per-phase model settings for reproducibility. All values
//! are overridable via `with_*` builders; defaults mirror production.

use std::time::Duration;
use vertrag_llm::ModelSettings;

/// Operational acceptance thresholds measured over a batch
///
/// These are SLA monitoring values consumed by the batch test harness,
/// not per-request gates inside the pipeline.
pub mod sla {
    /// Minimum average blended score across a batch
    pub const AVG_SCORE_FLOOR: f64 = 0.94;
    /// Minimum per-artifact blended score
    pub const MIN_SCORE_FLOOR: f64 = 0.90;
    /// Maximum fraction of artifacts flagged for human review
    pub const REVIEW_RATE_CEILING: f64 = 0.05;
    /// Maximum average retries per artifact
    pub const AVG_RETRIES_CEILING: f64 = 1.0;
}

/// Full configuration for one pipeline instance
#[derive(Debug, Clone, PartialEq)]
pub struct PipelineConfig {
    /// Phase-1 meta-prompt model settings
    pub phase1: ModelSettings,
    /// Phase-2 generation model settings
    pub phase2: ModelSettings,
    /// Repair and specialization pass settings
    pub repair: ModelSettings,
    /// Self-check critic settings
    pub self_check: ModelSettings,
    /// Per-call timeout applied around every provider call
    pub call_timeout: Duration,
    /// Retry budget per artifact (repair plus regeneration rounds)
    pub max_retries: u32,
    /// Blended score below which `review_required` is set
    pub review_threshold: f64,
    /// Weight of the validator score in the blend; the critic gets the rest
    pub validator_blend_weight: f64,
}

impl Default for PipelineConfig {
    fn default() -> Self {
        Self {
            phase1: ModelSettings::new("gpt-4o-mini", 0.25, 0.9, 2000),
            phase2: ModelSettings::new("gpt-4o", 0.05, 0.9, 8000),
            repair: ModelSettings::new("gpt-4o", 0.1, 0.9, 4000),
            self_check: ModelSettings::new("gpt-4o-mini", 0.0, 0.9, 500),
            call_timeout: Duration::from_secs(90),
            max_retries: 2,
            review_threshold: 0.90,
            validator_blend_weight: 0.6,
        }
    }
}

impl PipelineConfig {
    /// Default configuration
    #[inline]
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// With a retry budget
    #[inline]
    #[must_use]
    pub fn with_max_retries(mut self, max_retries: u32) -> Self {
        self.max_retries = max_retries;
        self
    }

    /// With a per-call timeout
    #[inline]
    #[must_use]
    pub fn with_call_timeout(mut self, timeout: Duration) -> Self {
        self.call_timeout = timeout;
        self
    }

    /// With a review threshold
    #[inline]
    #[must_use]
    pub fn with_review_threshold(mut self, threshold: f64) -> Self {
        self.review_threshold = threshold;
        self
    }

    /// With a validator blend weight, clamped to [0, 1]
    #[inline]
    #[must_use]
    pub fn with_validator_blend_weight(mut self, weight: f64) -> Self {
        self.validator_blend_weight = weight.clamp(0.0, 1.0);
        self
    }

    /// Blend validator and critic scores into the final score
    #[inline]
    #[must_use]
    pub fn blend(&self, validator_score: f64, llm_score: f64) -> f64 {
        let w = self.validator_blend_weight;
        let blended = w * validator_score + (1.0 - w) * llm_score;
        (blended * 100.0).round() / 100.0
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    #[test]
    fn defaults_are_conservative() {
        let config = PipelineConfig::default();
        assert_eq!(config.phase1.model, "gpt-4o-mini");
        assert_eq!(config.phase2.model, "gpt-4o");
        assert_eq!(config.phase2.temperature, 0.05);
        assert_eq!(config.self_check.temperature, 0.0);
        assert_eq!(config.max_retries, 2);
    }

    #[test]
    fn blend_is_validator_weighted() {
        let config = PipelineConfig::default();
        assert_eq!(config.blend(1.0, 0.0), 0.6);
        assert_eq!(config.blend(1.0, 1.0), 1.0);
        assert_eq!(config.blend(0.7, 0.9), 0.78);
    }

    #[test]
    fn blend_weight_is_clamped() {
        let config = PipelineConfig::default().with_validator_blend_weight(1.5);
        assert_eq!(config.validator_blend_weight, 1.0);
    }
}
