//! Generation pipeline orchestration.

use std::sync::Arc;

use stratos_core::error::Result;
use stratos_core::strategy::AIStrategy;
use stratos_generate::generator::StrategyGenerator;
use stratos_generate::prompt::build_prompt;
use stratos_state::aggregate::Aggregator;
use stratos_state::events::{StrategyEvent, StrategyEventKind};
use stratos_state::strategy::{GenerationTicket, InMemoryStrategyStore, StrategyStore};
use tracing::{error, info};
use uuid::Uuid;

/// Runs the aggregate → prompt → generate → commit pipeline for one brief.
pub struct Engine {
    aggregator: Arc<Aggregator>,
    generator: Arc<StrategyGenerator>,
    strategies: Arc<InMemoryStrategyStore>,
}

impl Engine {
    /// Create a new engine.
    pub fn new(
        aggregator: Arc<Aggregator>,
        generator: Arc<StrategyGenerator>,
        strategies: Arc<InMemoryStrategyStore>,
    ) -> Self {
        Self {
            aggregator,
            generator,
            strategies,
        }
    }

    /// Run the full generation pipeline for a brief.
    ///
    /// The brief's generation flag is held for the whole run. Any failure
    /// after acquisition releases the flag, publishes a `GenerationFailed`
    /// event, and propagates the typed error unchanged.
    pub async fn run_generation(&self, brief_id: Uuid, regenerate: bool) -> Result<AIStrategy> {
        let ticket = self.strategies.begin_generation(brief_id, regenerate).await?;
        info!("🧠 Generation started for brief {}", brief_id);

        let outcome = self.generate_and_commit(brief_id, ticket).await;
        match &outcome {
            Ok(strategy) => {
                info!(
                    "🎯 Strategy {} committed for brief {} ({} blocks)",
                    strategy.id,
                    brief_id,
                    strategy.blocks.len()
                );
            }
            Err(err) => {
                error!("❌ Generation failed for brief {}: {}", brief_id, err);
                self.strategies.events().publish(StrategyEvent::new(
                    brief_id,
                    None,
                    StrategyEventKind::GenerationFailed {
                        message: err.to_string(),
                        retryable: err.is_retryable(),
                    },
                ));
            }
        }
        outcome
    }

    async fn generate_and_commit(
        &self,
        brief_id: Uuid,
        ticket: GenerationTicket,
    ) -> Result<AIStrategy> {
        let context = self.aggregator.aggregate(brief_id).await?;
        let prompt = build_prompt(&context);
        let report = self.generator.generate(&prompt).await?;
        info!(
            "📝 Provider {} answered in {}ms",
            report.provider, report.latency_ms
        );
        self.strategies
            .commit(ticket, report.parsed, report.raw_text)
            .await
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::state::AppState;
    use serde_json::Map;
    use stratos_core::brief::{
        Brief, BriefComponent, BusinessInformation, Competitors, MarketingGoal,
        MarketingResources, StrategyAdjustments, TargetAudience,
    };
    use stratos_core::error::StratosError;
    use stratos_core::types::StrategyStatus;
    use stratos_generate::provider::ScriptedProvider;
    use stratos_state::brief::BriefStore;

    async fn create_complete_brief(state: &AppState) -> Brief {
        let brief = state.briefs.create(Uuid::new_v4()).await.unwrap();
        let components = vec![
            BriefComponent::BusinessInformation(BusinessInformation {
                company_name: "Driftwood Coffee".to_string(),
                industry: "Specialty coffee".to_string(),
                description: "Small-batch roaster with two cafes".to_string(),
                products_services: "Beans, subscriptions, cafe service".to_string(),
                unique_value: Some("Single-origin lots roasted weekly".to_string()),
                website: None,
                extra: Map::new(),
            }),
            BriefComponent::MarketingGoal(MarketingGoal {
                primary_objective: "Double subscription revenue".to_string(),
                secondary_objectives: vec![],
                timeframe: "12 months".to_string(),
                success_metrics: vec!["active subscribers".to_string()],
                monthly_budget: None,
                extra: Map::new(),
            }),
            BriefComponent::TargetAudience(TargetAudience {
                description: "Remote workers who brew at home".to_string(),
                age_range: Some("25-44".to_string()),
                locations: vec!["Portland".to_string()],
                interests: vec!["specialty coffee".to_string()],
                pain_points: vec!["stale grocery beans".to_string()],
                extra: Map::new(),
            }),
            BriefComponent::MarketingResources(MarketingResources::default()),
            BriefComponent::Competitors(Competitors::default()),
            BriefComponent::StrategyAdjustments(StrategyAdjustments::default()),
        ];
        for component in components {
            state
                .briefs
                .upsert_component(brief.id, component)
                .await
                .unwrap();
        }
        state.briefs.get(brief.id).await.unwrap().unwrap()
    }

    #[tokio::test]
    async fn test_run_generation_commits_pending_strategy() {
        let state = AppState::new();
        let brief = create_complete_brief(&state).await;

        let strategy = state.engine.run_generation(brief.id, false).await.unwrap();

        assert_eq!(strategy.brief_id, brief.id);
        assert_eq!(strategy.status, StrategyStatus::Pending);
        assert_eq!(strategy.blocks.len(), 3);
        assert!(!state.strategies.generation_in_flight(brief.id));

        let stored = state.strategies.get_for_brief(brief.id).await.unwrap();
        assert_eq!(stored.map(|s| s.id), Some(strategy.id));
    }

    #[tokio::test]
    async fn test_run_generation_incomplete_brief_fails_and_releases() {
        let state = AppState::new();
        let brief = state.briefs.create(Uuid::new_v4()).await.unwrap();
        let mut events = state.strategies.events().subscribe();

        let err = state.engine.run_generation(brief.id, false).await.unwrap_err();
        assert!(matches!(err, StratosError::IncompleteBrief { .. }));
        assert!(!state.strategies.generation_in_flight(brief.id));

        let started = events.recv().await.unwrap();
        assert!(matches!(started.kind, StrategyEventKind::GenerationStarted));
        let failed = events.recv().await.unwrap();
        assert!(matches!(
            failed.kind,
            StrategyEventKind::GenerationFailed { retryable: false, .. }
        ));
    }

    #[tokio::test]
    async fn test_run_generation_unparseable_commits_nothing() {
        let provider = ScriptedProvider::with_responses(vec![
            "the model ignored the formatting contract".to_string(),
        ]);
        let state = AppState::with_provider(Arc::new(provider));
        let brief = create_complete_brief(&state).await;

        let err = state.engine.run_generation(brief.id, false).await.unwrap_err();
        assert!(matches!(err, StratosError::UnparseableResponse { .. }));
        assert!(!state.strategies.generation_in_flight(brief.id));
        assert!(state
            .strategies
            .get_for_brief(brief.id)
            .await
            .unwrap()
            .is_none());
    }

    #[tokio::test]
    async fn test_run_generation_respects_in_flight_flag() {
        let state = AppState::new();
        let brief = create_complete_brief(&state).await;

        let ticket = state
            .strategies
            .begin_generation(brief.id, false)
            .await
            .unwrap();
        let err = state.engine.run_generation(brief.id, false).await.unwrap_err();
        assert!(matches!(err, StratosError::DuplicateGeneration { .. }));

        drop(ticket);
        assert!(state.engine.run_generation(brief.id, false).await.is_ok());
    }

    #[tokio::test]
    async fn test_regeneration_requires_flag_after_approval() {
        let state = AppState::new();
        let brief = create_complete_brief(&state).await;

        let strategy = state.engine.run_generation(brief.id, false).await.unwrap();
        state.strategies.mark_opened(strategy.id).await.unwrap();
        state.strategies.approve(strategy.id).await.unwrap();

        let err = state.engine.run_generation(brief.id, false).await.unwrap_err();
        assert!(matches!(err, StratosError::ApprovedStrategyExists { .. }));

        let replacement = state.engine.run_generation(brief.id, true).await.unwrap();
        assert_ne!(replacement.id, strategy.id);
        assert_eq!(replacement.status, StrategyStatus::Pending);
    }
}
