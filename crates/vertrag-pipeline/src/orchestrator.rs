//! Orchestrator
//!
//! Drives one generation request through the phase sequence
//! `META_PROMPT -> GENERATE -> VALIDATE -> REPAIR? -> SELF_CHECK -> DONE`
//! with back-edges governed by the retry policy: retries re-enter at the
//! repair stage first and escalate to deterministic regeneration only
//! when repair leaves validator errors behind. Nothing is persisted
//! before the terminal state.

use crate::config::PipelineConfig;
use crate::error::{FailurePolicy, Phase, PipelineError};
use crate::repair::PassOutput;
use crate::sink::ProvenanceSink;
use crate::{phase1, phase2, repair, selfcheck};
use chrono::Utc;
use std::time::Instant;
use tracing::{info, warn};
use vertrag_core::{
    profile_for, ContractType, GenerationInput, GenerationOutcome, GenerationRecord,
    Phase1Provenance, Phase2Provenance, PipelineArtifacts, RequestId, ScoreSummary,
    SelfCheckReport, Snapshot, TokenUsage,
};
use vertrag_llm::LlmClient;
use vertrag_validate::{substitute_placeholders, validate};

/// One configured pipeline instance, reusable across requests
pub struct ContractPipeline<C, S> {
    client: C,
    config: PipelineConfig,
    sink: S,
}

impl<C: LlmClient, S: ProvenanceSink> ContractPipeline<C, S> {
    /// Assemble a pipeline from its collaborators
    #[inline]
    #[must_use]
    pub fn new(client: C, config: PipelineConfig, sink: S) -> Self {
        Self {
            client,
            config,
            sink,
        }
    }

    /// Active configuration
    #[inline]
    #[must_use]
    pub fn config(&self) -> &PipelineConfig {
        &self.config
    }

    /// Run one generation request to its terminal state
    ///
    /// Returns the artifact with its transparency block, or a
    /// [`PipelineError`] naming the phase that failed unrecoverably.
    pub async fn generate(
        &self,
        contract_type: ContractType,
        input: GenerationInput,
    ) -> Result<GenerationOutcome, PipelineError> {
        let started = Instant::now();
        let request_id = RequestId::new();
        info!(%request_id, contract_type = %contract_type, "generation started");

        let profile = profile_for(contract_type).resolved(input.overrides.as_ref());
        let mut total_usage = TokenUsage::default();

        // META_PROMPT
        let phase1 = phase1::run_meta_prompt(&self.client, &self.config, &input, &profile).await?;
        total_usage.accumulate(phase1.usage);
        let snapshot = phase1.snapshot.clone();

        // GENERATE
        let generated = phase2::run_generation(
            &self.client,
            self.config.call_timeout,
            &self.config.phase2,
            &phase1.generated_prompt,
            &input,
        )
        .await?;
        total_usage.accumulate(generated.usage);
        let mut phase2 = Phase2Provenance {
            timing_ms: generated.timing_ms,
            token_count: generated.usage,
            model: generated.model,
            temperature: generated.temperature,
        };
        let mut text = substitute_placeholders(&generated.contract_text, &input);

        self.apply_specializations(contract_type, &input, &snapshot, &mut text, &mut total_usage)
            .await?;

        // VALIDATE + SELF_CHECK with retry back-edges.
        let mut validator = validate(&text, &snapshot, &profile);
        let mut self_check = self
            .self_check_open(&text, &phase1.generated_prompt, &snapshot, &mut total_usage)
            .await;
        let mut retries_used = 0u32;

        while (!validator.passed || !self_check.conforms)
            && retries_used < self.config.max_retries
        {
            retries_used += 1;
            let critic_only = validator.passed;
            info!(
                retry = retries_used,
                validator_errors = validator.errors.len(),
                conforms = self_check.conforms,
                "retry round started"
            );

            if !validator.passed {
                let result = repair::universal(
                    &self.client,
                    self.config.call_timeout,
                    &self.config.repair,
                    &text,
                    &snapshot,
                )
                .await;
                self.absorb_pass(result, &mut text, &input, &mut total_usage)?;
                validator = validate(&text, &snapshot, &profile);
            }

            if !validator.passed || critic_only {
                let settings = self.config.phase2.clone().with_temperature(0.0);
                match phase2::run_generation(
                    &self.client,
                    self.config.call_timeout,
                    &settings,
                    &phase1.generated_prompt,
                    &input,
                )
                .await
                {
                    Ok(out) => {
                        total_usage.accumulate(out.usage);
                        phase2 = Phase2Provenance {
                            timing_ms: out.timing_ms,
                            token_count: out.usage,
                            model: out.model,
                            temperature: out.temperature,
                        };
                        text = substitute_placeholders(&out.contract_text, &input);
                        // A regenerated text starts from scratch, so the
                        // type-driven passes must run again.
                        self.apply_specializations(
                            contract_type,
                            &input,
                            &snapshot,
                            &mut text,
                            &mut total_usage,
                        )
                        .await?;
                        validator = validate(&text, &snapshot, &profile);
                    }
                    Err(err) => {
                        warn!(error = %err, "regeneration failed, keeping previous artifact");
                    }
                }
            }

            self_check = self
                .self_check_open(&text, &phase1.generated_prompt, &snapshot, &mut total_usage)
                .await;
        }

        // DONE
        let final_score = self.config.blend(validator.score, self_check.score);
        let review_required = final_score < self.config.review_threshold;
        let scores = ScoreSummary {
            final_score,
            validator_score: validator.score,
            llm_score: self_check.score,
            retries_used,
        };

        let record = GenerationRecord {
            request_id,
            contract_type,
            run_label: input.run_label.clone(),
            input,
            phase1: Phase1Provenance {
                generated_prompt: phase1.generated_prompt,
                snapshot,
                timing_ms: phase1.timing_ms,
                token_count: phase1.usage,
                model: phase1.model,
            },
            phase2,
            contract_text: text,
            validator,
            self_check,
            scores,
            review_required,
            total_usage,
            duration_ms: started.elapsed().as_millis() as u64,
            created_at: Utc::now(),
        };

        if let Err(err) = self.sink.record(&record).await {
            warn!(%request_id, error = %err, "provenance write failed");
        }

        info!(
            %request_id,
            final_score = record.scores.final_score,
            retries_used = record.scores.retries_used,
            review_required,
            duration_ms = record.duration_ms,
            "generation finished"
        );

        Ok(GenerationOutcome {
            contract_text: record.contract_text,
            artifacts: PipelineArtifacts {
                self_check: record.scores,
                validator: record.validator,
            },
            review_required,
        })
    }

    /// Type-driven passes over a freshly generated text, fail-soft
    async fn apply_specializations(
        &self,
        contract_type: ContractType,
        input: &GenerationInput,
        snapshot: &Snapshot,
        text: &mut String,
        total_usage: &mut TokenUsage,
    ) -> Result<(), PipelineError> {
        if contract_type == ContractType::Darlehen
            && repair::wants_zero_interest(&input.custom_requirements)
        {
            let result = repair::loan(
                &self.client,
                self.config.call_timeout,
                &self.config.repair,
                text,
            )
            .await;
            self.absorb_pass(result, text, input, total_usage)?;
        }
        if contract_type.is_custom() {
            let result = repair::individuell(
                &self.client,
                self.config.call_timeout,
                &self.config.repair,
                text,
                snapshot,
            )
            .await;
            self.absorb_pass(result, text, input, total_usage)?;
        }
        Ok(())
    }

    /// Fold a repair-pass result into the working text per the policy table
    fn absorb_pass(
        &self,
        result: Result<PassOutput, PipelineError>,
        text: &mut String,
        input: &GenerationInput,
        total_usage: &mut TokenUsage,
    ) -> Result<(), PipelineError> {
        match result {
            Ok((new_text, usage)) => {
                total_usage.accumulate(usage);
                // Substitution re-runs after every pass that touches the text.
                *text = substitute_placeholders(&new_text, input);
                Ok(())
            }
            Err(err) => match FailurePolicy::for_phase(err.phase()) {
                FailurePolicy::Abort => Err(err),
                FailurePolicy::FallbackToPrevious | FailurePolicy::FallbackToDefault => {
                    warn!(phase = %err.phase(), error = %err, "pass failed, keeping previous text");
                    Ok(())
                }
            },
        }
    }

    /// Run the critic; its policy row is fail-open
    async fn self_check_open(
        &self,
        text: &str,
        generated_prompt: &str,
        snapshot: &Snapshot,
        total_usage: &mut TokenUsage,
    ) -> SelfCheckReport {
        match selfcheck::run_self_check(&self.client, &self.config, text, generated_prompt, snapshot)
            .await
        {
            Ok((report, usage)) => {
                total_usage.accumulate(usage);
                report
            }
            Err(err) => {
                warn!(phase = %Phase::SelfCheck, error = %err, "self-check failed, using fail-open default");
                SelfCheckReport::fail_open(err)
            }
        }
    }
}
