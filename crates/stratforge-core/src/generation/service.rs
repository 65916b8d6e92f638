//! Strategy generation service.
//!
//! `StrategyGenerator` compiles the current wizard state and submits the
//! artifact to a `TextGenerator` backend -- exactly one attempt per
//! user-initiated call, never retried. Wizard state is never mutated here;
//! a failure leaves the compiled prompt and all state intact so the user
//! can retry manually.
//!
//! A second call while one is pending fails fast with
//! `GenerationError::InFlight` rather than silently duplicating requests.

use std::sync::atomic::{AtomicBool, Ordering};

use stratforge_types::error::GenerationError;
use stratforge_types::generation::{GenerationRequest, GenerationResponse};
use stratforge_types::strategy::ResearchSummary;
use stratforge_types::wizard::WizardState;

use crate::generation::provider::TextGenerator;
use crate::wizard::compiler::compile;

/// Outcome of a generation call: the prompt that was submitted and the
/// provider's response. The prompt is kept so callers can display or copy
/// exactly what was sent.
#[derive(Debug, Clone)]
pub struct GeneratedStrategy {
    pub prompt: String,
    pub response: GenerationResponse,
}

/// Compiles wizard state and submits it to a generation backend.
pub struct StrategyGenerator<P: TextGenerator> {
    provider: P,
    model: String,
    max_tokens: u32,
    temperature: Option<f64>,
    in_flight: AtomicBool,
}

/// Releases the in-flight flag when the call settles, error paths included.
struct InFlightGuard<'a>(&'a AtomicBool);

impl Drop for InFlightGuard<'_> {
    fn drop(&mut self) {
        self.0.store(false, Ordering::SeqCst);
    }
}

impl<P: TextGenerator> StrategyGenerator<P> {
    pub fn new(provider: P, model: String, max_tokens: u32, temperature: Option<f64>) -> Self {
        Self {
            provider,
            model,
            max_tokens,
            temperature,
            in_flight: AtomicBool::new(false),
        }
    }

    /// Name of the backing provider, for logs and response metadata.
    pub fn provider_name(&self) -> &str {
        self.provider.name()
    }

    /// Compile the state snapshot and submit it once.
    pub async fn generate(
        &self,
        state: &WizardState,
    ) -> Result<GeneratedStrategy, GenerationError> {
        if self.in_flight.swap(true, Ordering::SeqCst) {
            return Err(GenerationError::InFlight);
        }
        let _guard = InFlightGuard(&self.in_flight);

        let prompt = compile(state, &state.model_target);
        let request = GenerationRequest {
            model: self.model.clone(),
            prompt: prompt.clone(),
            max_tokens: self.max_tokens,
            temperature: self.temperature,
        };

        tracing::debug!(
            session_id = %state.session_id,
            target = %state.model_target,
            provider = self.provider.name(),
            prompt_bytes = prompt.len(),
            "submitting generation request"
        );

        let response = self.provider.generate(&request).await?;

        tracing::info!(
            session_id = %state.session_id,
            provider = self.provider.name(),
            response_bytes = response.content.len(),
            "generation completed"
        );

        Ok(GeneratedStrategy { prompt, response })
    }

    /// Terminal action of the standalone builder view: generate from a set
    /// of user-selected research summaries. Fails with `MissingSelection`
    /// when nothing qualifies -- this is the caller-level content check, not
    /// a registry invariant.
    ///
    /// The selection is folded into the research slot of a state snapshot;
    /// the stored session state is untouched.
    pub async fn generate_from_research(
        &self,
        state: &WizardState,
        selection: &[ResearchSummary],
    ) -> Result<GeneratedStrategy, GenerationError> {
        if selection.is_empty() {
            return Err(GenerationError::MissingSelection(
                "select at least one research summary before generating".to_string(),
            ));
        }

        let mut snapshot = state.clone();
        snapshot.draft.research = Some(combine_selection(selection));
        self.generate(&snapshot).await
    }
}

/// Fold multiple selected summaries into one research bag.
fn combine_selection(selection: &[ResearchSummary]) -> ResearchSummary {
    if selection.len() == 1 {
        return selection[0].clone();
    }

    let summary = selection
        .iter()
        .map(|r| format!("{}: {}", r.title, r.summary))
        .collect::<Vec<_>>()
        .join(" / ");
    let key_findings = selection
        .iter()
        .flat_map(|r| r.key_findings.iter().cloned())
        .collect();

    ResearchSummary {
        title: format!("Selected research ({} documents)", selection.len()),
        source: None,
        summary,
        key_findings,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::wizard::state::{WizardStateExt, new_wizard_state};
    use serde_json::json;
    use std::time::Duration;
    use stratforge_types::wizard::{ModelTarget, StageKey};
    use uuid::Uuid;

    struct EchoGenerator;

    impl TextGenerator for EchoGenerator {
        fn name(&self) -> &str {
            "echo"
        }

        async fn generate(
            &self,
            request: &GenerationRequest,
        ) -> Result<GenerationResponse, GenerationError> {
            Ok(GenerationResponse {
                id: "echo-1".to_string(),
                content: format!("generated from {} bytes", request.prompt.len()),
                model: request.model.clone(),
            })
        }
    }

    struct SlowGenerator;

    impl TextGenerator for SlowGenerator {
        fn name(&self) -> &str {
            "slow"
        }

        async fn generate(
            &self,
            request: &GenerationRequest,
        ) -> Result<GenerationResponse, GenerationError> {
            tokio::time::sleep(Duration::from_millis(50)).await;
            Ok(GenerationResponse {
                id: "slow-1".to_string(),
                content: "done".to_string(),
                model: request.model.clone(),
            })
        }
    }

    struct FailingGenerator;

    impl TextGenerator for FailingGenerator {
        fn name(&self) -> &str {
            "failing"
        }

        async fn generate(
            &self,
            _request: &GenerationRequest,
        ) -> Result<GenerationResponse, GenerationError> {
            Err(GenerationError::Provider {
                message: "upstream exploded".to_string(),
            })
        }
    }

    fn test_state() -> WizardState {
        let mut state = new_wizard_state(Uuid::now_v7(), ModelTarget::Claude);
        state
            .set_stage_data(StageKey::AssetSelection, json!({"symbol": "SOL"}))
            .unwrap();
        state
    }

    fn service<P: TextGenerator>(provider: P) -> StrategyGenerator<P> {
        StrategyGenerator::new(provider, "test-model".to_string(), 4096, Some(0.7))
    }

    #[tokio::test]
    async fn generate_submits_the_compiled_prompt() {
        let state = test_state();
        let result = service(EchoGenerator).generate(&state).await.unwrap();
        assert!(result.prompt.contains("- Symbol: SOL"));
        assert_eq!(
            result.response.content,
            format!("generated from {} bytes", result.prompt.len())
        );
    }

    #[tokio::test]
    async fn second_concurrent_generate_fails_fast() {
        let state = test_state();
        let svc = service(SlowGenerator);

        let (first, second) = tokio::join!(svc.generate(&state), async {
            // Let the first call claim the flag before the second tries.
            tokio::time::sleep(Duration::from_millis(10)).await;
            svc.generate(&state).await
        });

        assert!(first.is_ok());
        assert!(matches!(second, Err(GenerationError::InFlight)));
    }

    #[tokio::test]
    async fn provider_failure_releases_the_in_flight_flag() {
        let state = test_state();
        let svc = service(FailingGenerator);

        let err = svc.generate(&state).await.unwrap_err();
        assert!(matches!(err, GenerationError::Provider { .. }));

        // Flag released: a retry reaches the provider again (and fails
        // again, rather than reporting InFlight).
        let retry = svc.generate(&state).await.unwrap_err();
        assert!(matches!(retry, GenerationError::Provider { .. }));
    }

    #[tokio::test]
    async fn empty_selection_is_rejected_before_any_provider_call() {
        let state = test_state();
        let err = service(EchoGenerator)
            .generate_from_research(&state, &[])
            .await
            .unwrap_err();
        assert!(matches!(err, GenerationError::MissingSelection(_)));
    }

    #[tokio::test]
    async fn selection_is_folded_into_the_research_section() {
        let state = test_state();
        let selection = vec![
            ResearchSummary {
                title: "Momentum in thin books".to_string(),
                source: None,
                summary: "Momentum decays faster on low-liquidity pairs".to_string(),
                key_findings: vec!["decay scales with spread".to_string()],
            },
            ResearchSummary {
                title: "Funding-rate signals".to_string(),
                source: Some("arxiv".to_string()),
                summary: "Extreme funding predicts short-term reversals".to_string(),
                key_findings: vec![],
            },
        ];

        let result = service(EchoGenerator)
            .generate_from_research(&state, &selection)
            .await
            .unwrap();
        assert!(result.prompt.contains("Selected research (2 documents)"));
        assert!(result.prompt.contains("decay scales with spread"));
        // The session state itself is untouched.
        assert!(state.draft.research.is_none());
    }

    #[test]
    fn single_selection_passes_through_unaltered() {
        let research = ResearchSummary {
            title: "Solo".to_string(),
            source: None,
            summary: "one document".to_string(),
            key_findings: vec![],
        };
        let combined = combine_selection(std::slice::from_ref(&research));
        assert_eq!(combined, research);
    }
}
