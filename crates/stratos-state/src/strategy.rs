//! Strategy storage: commit, review lifecycle, and the in-flight generation guard

use async_trait::async_trait;
use std::collections::{HashMap, HashSet};
use std::sync::{Arc, Mutex, MutexGuard};
use tokio::sync::RwLock;
use tracing::{debug, info};
use uuid::Uuid;

use stratos_core::error::{Result, StratosError};
use stratos_core::strategy::{AIStrategy, ParsedStrategy};
use stratos_core::types::StrategyStatus;

use crate::events::{StrategyEvent, StrategyEventKind, StrategyEvents};

/// Proof of exclusive generation rights for one brief.
///
/// Minted by [`StrategyStore::begin_generation`]; the in-flight flag is
/// released when the ticket drops, so abandoned attempts (provider failure,
/// parse rejection, timeout) leave nothing behind.
#[derive(Debug)]
pub struct GenerationTicket {
    brief_id: Uuid,
    in_flight: Arc<Mutex<HashSet<Uuid>>>,
}

impl GenerationTicket {
    /// The brief this ticket grants generation rights for
    pub fn brief_id(&self) -> Uuid {
        self.brief_id
    }
}

impl Drop for GenerationTicket {
    fn drop(&mut self) {
        lock_in_flight(&self.in_flight).remove(&self.brief_id);
    }
}

// The flag must release even if a previous holder panicked.
fn lock_in_flight(set: &Mutex<HashSet<Uuid>>) -> MutexGuard<'_, HashSet<Uuid>> {
    match set.lock() {
        Ok(guard) => guard,
        Err(poisoned) => poisoned.into_inner(),
    }
}

/// Trait for strategy storage backends
#[async_trait]
pub trait StrategyStore: Send + Sync {
    /// Claims the per-brief generation flag.
    ///
    /// Fails with `DuplicateGeneration` while another attempt holds it, and
    /// with `ApprovedStrategyExists` when the brief's strategy is Completed
    /// and `regenerate` was not requested.
    async fn begin_generation(&self, brief_id: Uuid, regenerate: bool) -> Result<GenerationTicket>;

    /// Atomically replaces the brief's strategy with a freshly parsed tree.
    ///
    /// Consumes the ticket; the new strategy starts at Pending with the raw
    /// model output archived beside it. A partial tree is never observable.
    async fn commit(
        &self,
        ticket: GenerationTicket,
        parsed: ParsedStrategy,
        raw_text: String,
    ) -> Result<AIStrategy>;

    /// Fetches a strategy by id
    async fn get(&self, strategy_id: Uuid) -> Result<Option<AIStrategy>>;

    /// Fetches the strategy currently owned by a brief
    async fn get_for_brief(&self, brief_id: Uuid) -> Result<Option<AIStrategy>>;

    /// Records the first expert view: Pending becomes Opened; any other
    /// status is left untouched
    async fn mark_opened(&self, strategy_id: Uuid) -> Result<AIStrategy>;

    /// Rewrites one section's content and moves the strategy to Edited
    async fn edit_section(
        &self,
        strategy_id: Uuid,
        section_id: Uuid,
        new_content: String,
    ) -> Result<AIStrategy>;

    /// Approves an Opened or Edited strategy, making it Completed
    async fn approve(&self, strategy_id: Uuid) -> Result<AIStrategy>;

    /// Applies a full permutation of the strategy's block ids and renumbers
    /// the dense order values; a non-permutation leaves the order untouched
    async fn reorder_blocks(&self, strategy_id: Uuid, new_order: Vec<Uuid>) -> Result<AIStrategy>;

    /// Whether a generation attempt currently holds the brief's flag
    fn generation_in_flight(&self, brief_id: Uuid) -> bool;
}

struct Tables {
    by_id: HashMap<Uuid, AIStrategy>,
    by_brief: HashMap<Uuid, Uuid>,
}

/// In-memory implementation of [`StrategyStore`].
///
/// Both lookup tables live under one write lock so commits and reorders are
/// atomic; no lock is ever held across an await point.
pub struct InMemoryStrategyStore {
    tables: Arc<RwLock<Tables>>,
    in_flight: Arc<Mutex<HashSet<Uuid>>>,
    events: StrategyEvents,
}

impl InMemoryStrategyStore {
    pub fn new() -> Self {
        Self::with_events(StrategyEvents::new())
    }

    /// Builds a store that publishes lifecycle events on an existing bus
    pub fn with_events(events: StrategyEvents) -> Self {
        InMemoryStrategyStore {
            tables: Arc::new(RwLock::new(Tables {
                by_id: HashMap::new(),
                by_brief: HashMap::new(),
            })),
            in_flight: Arc::new(Mutex::new(HashSet::new())),
            events,
        }
    }

    /// The lifecycle event bus this store publishes to
    pub fn events(&self) -> &StrategyEvents {
        &self.events
    }
}

impl Default for InMemoryStrategyStore {
    fn default() -> Self {
        Self::new()
    }
}

#[async_trait]
impl StrategyStore for InMemoryStrategyStore {
    async fn begin_generation(&self, brief_id: Uuid, regenerate: bool) -> Result<GenerationTicket> {
        if !lock_in_flight(&self.in_flight).insert(brief_id) {
            return Err(StratosError::DuplicateGeneration { brief_id });
        }
        let ticket = GenerationTicket {
            brief_id,
            in_flight: self.in_flight.clone(),
        };

        // Checked while the flag is held, so it cannot race a commit.
        let tables = self.tables.read().await;
        if let Some(strategy_id) = tables.by_brief.get(&brief_id) {
            if let Some(existing) = tables.by_id.get(strategy_id) {
                if existing.status == StrategyStatus::Completed && !regenerate {
                    return Err(StratosError::ApprovedStrategyExists { brief_id });
                }
            }
        }
        drop(tables);

        debug!(brief_id = %brief_id, regenerate, "generation flag claimed");
        self.events.publish(StrategyEvent::new(
            brief_id,
            None,
            StrategyEventKind::GenerationStarted,
        ));
        Ok(ticket)
    }

    async fn commit(
        &self,
        ticket: GenerationTicket,
        parsed: ParsedStrategy,
        raw_text: String,
    ) -> Result<AIStrategy> {
        let brief_id = ticket.brief_id();
        let strategy = AIStrategy::from_parsed(brief_id, parsed, raw_text)?;
        strategy.validate_ordering()?;

        let mut tables = self.tables.write().await;
        if let Some(old_id) = tables.by_brief.insert(brief_id, strategy.id) {
            tables.by_id.remove(&old_id);
        }
        tables.by_id.insert(strategy.id, strategy.clone());
        drop(tables);

        info!(
            brief_id = %brief_id,
            strategy_id = %strategy.id,
            blocks = strategy.blocks.len(),
            "committed generated strategy"
        );
        self.events.publish(StrategyEvent::new(
            brief_id,
            Some(strategy.id),
            StrategyEventKind::Committed {
                block_count: strategy.blocks.len(),
            },
        ));

        // Release the flag only after the swap is visible.
        drop(ticket);
        Ok(strategy)
    }

    async fn get(&self, strategy_id: Uuid) -> Result<Option<AIStrategy>> {
        Ok(self.tables.read().await.by_id.get(&strategy_id).cloned())
    }

    async fn get_for_brief(&self, brief_id: Uuid) -> Result<Option<AIStrategy>> {
        let tables = self.tables.read().await;
        Ok(tables
            .by_brief
            .get(&brief_id)
            .and_then(|id| tables.by_id.get(id))
            .cloned())
    }

    async fn mark_opened(&self, strategy_id: Uuid) -> Result<AIStrategy> {
        let mut tables = self.tables.write().await;
        let strategy = tables
            .by_id
            .get_mut(&strategy_id)
            .ok_or_else(|| StratosError::not_found("Strategy", strategy_id))?;

        if strategy.status != StrategyStatus::Pending {
            return Ok(strategy.clone());
        }

        strategy.status = StrategyStatus::Opened;
        let updated = strategy.clone();
        drop(tables);

        self.events.publish(StrategyEvent::new(
            updated.brief_id,
            Some(updated.id),
            StrategyEventKind::StatusChanged {
                from: StrategyStatus::Pending,
                to: StrategyStatus::Opened,
            },
        ));
        Ok(updated)
    }

    async fn edit_section(
        &self,
        strategy_id: Uuid,
        section_id: Uuid,
        new_content: String,
    ) -> Result<AIStrategy> {
        if new_content.trim().is_empty() {
            return Err(StratosError::ContentInvalid {
                message: "section content must not be empty".to_string(),
            });
        }

        let mut tables = self.tables.write().await;
        let strategy = tables
            .by_id
            .get_mut(&strategy_id)
            .ok_or_else(|| StratosError::not_found("Strategy", strategy_id))?;

        let from = strategy.status;
        if !from.is_editable() {
            return Err(StratosError::InvalidStateTransition {
                strategy_id,
                from,
                operation: "edit".to_string(),
            });
        }

        let section = strategy
            .find_section_mut(section_id)
            .ok_or_else(|| StratosError::not_found("Section", section_id))?;
        if !section.editable {
            return Err(StratosError::ContentInvalid {
                message: format!("section {} is not editable", section_id),
            });
        }
        section.content = new_content;

        strategy.status = StrategyStatus::Edited;
        let updated = strategy.clone();
        drop(tables);

        if from == StrategyStatus::Opened {
            self.events.publish(StrategyEvent::new(
                updated.brief_id,
                Some(updated.id),
                StrategyEventKind::StatusChanged {
                    from,
                    to: StrategyStatus::Edited,
                },
            ));
        }
        self.events.publish(StrategyEvent::new(
            updated.brief_id,
            Some(updated.id),
            StrategyEventKind::SectionEdited { section_id },
        ));
        Ok(updated)
    }

    async fn approve(&self, strategy_id: Uuid) -> Result<AIStrategy> {
        let mut tables = self.tables.write().await;
        let strategy = tables
            .by_id
            .get_mut(&strategy_id)
            .ok_or_else(|| StratosError::not_found("Strategy", strategy_id))?;

        let from = strategy.status;
        if !from.is_editable() {
            return Err(StratosError::InvalidStateTransition {
                strategy_id,
                from,
                operation: "approve".to_string(),
            });
        }

        strategy.status = StrategyStatus::Completed;
        let updated = strategy.clone();
        drop(tables);

        info!(strategy_id = %strategy_id, "strategy approved");
        self.events.publish(StrategyEvent::new(
            updated.brief_id,
            Some(updated.id),
            StrategyEventKind::StatusChanged {
                from,
                to: StrategyStatus::Completed,
            },
        ));
        Ok(updated)
    }

    async fn reorder_blocks(&self, strategy_id: Uuid, new_order: Vec<Uuid>) -> Result<AIStrategy> {
        let mut tables = self.tables.write().await;
        let strategy = tables
            .by_id
            .get_mut(&strategy_id)
            .ok_or_else(|| StratosError::not_found("Strategy", strategy_id))?;

        let from = strategy.status;
        if !from.is_editable() {
            return Err(StratosError::InvalidStateTransition {
                strategy_id,
                from,
                operation: "reorder blocks of".to_string(),
            });
        }

        // Full permutation check before any mutation.
        if new_order.len() != strategy.blocks.len() {
            return Err(StratosError::InvalidPermutation {
                strategy_id,
                message: format!(
                    "expected {} block ids, got {}",
                    strategy.blocks.len(),
                    new_order.len()
                ),
            });
        }
        let mut seen = HashSet::new();
        for block_id in &new_order {
            if !seen.insert(*block_id) {
                return Err(StratosError::InvalidPermutation {
                    strategy_id,
                    message: format!("duplicate block id {}", block_id),
                });
            }
        }
        let position: HashMap<Uuid, u32> = new_order
            .iter()
            .enumerate()
            .map(|(i, id)| (*id, i as u32))
            .collect();
        let mut assigned = Vec::with_capacity(strategy.blocks.len());
        for block in &strategy.blocks {
            match position.get(&block.id) {
                Some(order) => assigned.push(*order),
                None => {
                    return Err(StratosError::InvalidPermutation {
                        strategy_id,
                        message: format!("block {} missing from new order", block.id),
                    })
                }
            }
        }

        // Validation passed; application cannot fail part-way.
        for (block, order) in strategy.blocks.iter_mut().zip(assigned) {
            block.order = order;
        }
        strategy.blocks.sort_by_key(|b| b.order);

        strategy.status = StrategyStatus::Edited;
        let updated = strategy.clone();
        drop(tables);

        if from == StrategyStatus::Opened {
            self.events.publish(StrategyEvent::new(
                updated.brief_id,
                Some(updated.id),
                StrategyEventKind::StatusChanged {
                    from,
                    to: StrategyStatus::Edited,
                },
            ));
        }
        self.events.publish(StrategyEvent::new(
            updated.brief_id,
            Some(updated.id),
            StrategyEventKind::BlocksReordered,
        ));
        Ok(updated)
    }

    fn generation_in_flight(&self, brief_id: Uuid) -> bool {
        lock_in_flight(&self.in_flight).contains(&brief_id)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use stratos_core::strategy::{ParsedBlock, ParsedSection};
    use tokio::sync::Barrier;

    fn create_test_parsed() -> ParsedStrategy {
        ParsedStrategy {
            blocks: vec![
                ParsedBlock {
                    order: 0,
                    title: "Overview".to_string(),
                    sections: vec![ParsedSection {
                        order: 0,
                        content: "Lead with the direct-trade story.".to_string(),
                    }],
                },
                ParsedBlock {
                    order: 1,
                    title: "Channels".to_string(),
                    sections: vec![
                        ParsedSection {
                            order: 0,
                            content: "Newsletter first.".to_string(),
                        },
                        ParsedSection {
                            order: 1,
                            content: "Then local events.".to_string(),
                        },
                    ],
                },
                ParsedBlock {
                    order: 2,
                    title: "Budget".to_string(),
                    sections: vec![ParsedSection {
                        order: 0,
                        content: "Keep paid spend under a third.".to_string(),
                    }],
                },
            ],
        }
    }

    async fn commit_strategy(store: &InMemoryStrategyStore, brief_id: Uuid) -> AIStrategy {
        let ticket = store.begin_generation(brief_id, false).await.unwrap();
        store
            .commit(ticket, create_test_parsed(), "raw model text".to_string())
            .await
            .unwrap()
    }

    #[tokio::test]
    async fn test_commit_creates_pending_strategy() {
        let store = InMemoryStrategyStore::new();
        let brief_id = Uuid::new_v4();

        let strategy = commit_strategy(&store, brief_id).await;
        assert_eq!(strategy.status, StrategyStatus::Pending);
        assert_eq!(strategy.blocks.len(), 3);
        assert_eq!(strategy.raw_output.text, "raw model text");
        assert!(strategy.raw_output.verify());
        assert!(!store.generation_in_flight(brief_id));

        let fetched = store.get_for_brief(brief_id).await.unwrap().unwrap();
        assert_eq!(fetched.id, strategy.id);
    }

    #[tokio::test]
    async fn test_commit_replaces_never_appends() {
        let store = InMemoryStrategyStore::new();
        let brief_id = Uuid::new_v4();

        let first = commit_strategy(&store, brief_id).await;
        let second = commit_strategy(&store, brief_id).await;

        assert_ne!(first.id, second.id);
        let current = store.get_for_brief(brief_id).await.unwrap().unwrap();
        assert_eq!(current.id, second.id);
        assert!(store.get(first.id).await.unwrap().is_none());
    }

    #[tokio::test]
    async fn test_begin_generation_rejects_duplicate() {
        let store = InMemoryStrategyStore::new();
        let brief_id = Uuid::new_v4();

        let ticket = store.begin_generation(brief_id, false).await.unwrap();
        let err = store.begin_generation(brief_id, false).await.unwrap_err();
        assert!(matches!(err, StratosError::DuplicateGeneration { .. }));
        assert!(store.generation_in_flight(brief_id));

        drop(ticket);
        assert!(!store.generation_in_flight(brief_id));
        store.begin_generation(brief_id, false).await.unwrap();
    }

    #[tokio::test]
    async fn test_abandoned_ticket_releases_flag() {
        let store = InMemoryStrategyStore::new();
        let brief_id = Uuid::new_v4();

        {
            let _ticket = store.begin_generation(brief_id, false).await.unwrap();
            assert!(store.generation_in_flight(brief_id));
        }
        assert!(!store.generation_in_flight(brief_id));
        assert!(store.get_for_brief(brief_id).await.unwrap().is_none());
    }

    #[tokio::test]
    async fn test_concurrent_attempts_exactly_one_wins() {
        let store = Arc::new(InMemoryStrategyStore::new());
        let brief_id = Uuid::new_v4();
        let after_first_claim = Arc::new(Barrier::new(2));
        let after_second_attempt = Arc::new(Barrier::new(2));

        let winner = {
            let store = store.clone();
            let b1 = after_first_claim.clone();
            let b2 = after_second_attempt.clone();
            tokio::spawn(async move {
                let ticket = store.begin_generation(brief_id, false).await.unwrap();
                b1.wait().await;
                b2.wait().await;
                store
                    .commit(ticket, create_test_parsed(), "raw".to_string())
                    .await
            })
        };
        let loser = {
            let store = store.clone();
            let b1 = after_first_claim.clone();
            let b2 = after_second_attempt.clone();
            tokio::spawn(async move {
                b1.wait().await;
                let result = store.begin_generation(brief_id, false).await;
                b2.wait().await;
                result
            })
        };

        assert!(winner.await.unwrap().is_ok());
        assert!(matches!(
            loser.await.unwrap().unwrap_err(),
            StratosError::DuplicateGeneration { .. }
        ));
        let committed = store.get_for_brief(brief_id).await.unwrap();
        assert!(committed.is_some());
    }

    #[tokio::test]
    async fn test_regeneration_gate_on_completed() {
        let store = InMemoryStrategyStore::new();
        let brief_id = Uuid::new_v4();

        let strategy = commit_strategy(&store, brief_id).await;
        store.mark_opened(strategy.id).await.unwrap();
        store.approve(strategy.id).await.unwrap();

        let err = store.begin_generation(brief_id, false).await.unwrap_err();
        assert!(matches!(err, StratosError::ApprovedStrategyExists { .. }));
        assert!(!store.generation_in_flight(brief_id));

        let ticket = store.begin_generation(brief_id, true).await.unwrap();
        let replacement = store
            .commit(ticket, create_test_parsed(), "raw".to_string())
            .await
            .unwrap();
        assert_eq!(replacement.status, StrategyStatus::Pending);
        assert_ne!(replacement.id, strategy.id);
    }

    #[tokio::test]
    async fn test_mark_opened_is_idempotent() {
        let store = InMemoryStrategyStore::new();
        let strategy = commit_strategy(&store, Uuid::new_v4()).await;

        let opened = store.mark_opened(strategy.id).await.unwrap();
        assert_eq!(opened.status, StrategyStatus::Opened);

        let reopened = store.mark_opened(strategy.id).await.unwrap();
        assert_eq!(reopened.status, StrategyStatus::Opened);

        store.approve(strategy.id).await.unwrap();
        let viewed_after_approval = store.mark_opened(strategy.id).await.unwrap();
        assert_eq!(viewed_after_approval.status, StrategyStatus::Completed);
    }

    #[tokio::test]
    async fn test_approve_requires_opened_or_edited() {
        let store = InMemoryStrategyStore::new();
        let strategy = commit_strategy(&store, Uuid::new_v4()).await;

        let err = store.approve(strategy.id).await.unwrap_err();
        assert!(matches!(
            err,
            StratosError::InvalidStateTransition {
                from: StrategyStatus::Pending,
                ..
            }
        ));

        store.mark_opened(strategy.id).await.unwrap();
        let approved = store.approve(strategy.id).await.unwrap();
        assert_eq!(approved.status, StrategyStatus::Completed);

        let err = store.approve(strategy.id).await.unwrap_err();
        assert!(matches!(
            err,
            StratosError::InvalidStateTransition {
                from: StrategyStatus::Completed,
                ..
            }
        ));
    }

    #[tokio::test]
    async fn test_edit_section_moves_to_edited() {
        let store = InMemoryStrategyStore::new();
        let strategy = commit_strategy(&store, Uuid::new_v4()).await;
        let section_id = strategy.blocks[1].sections[0].id;

        store.mark_opened(strategy.id).await.unwrap();
        let edited = store
            .edit_section(strategy.id, section_id, "Weekly newsletter.".to_string())
            .await
            .unwrap();

        assert_eq!(edited.status, StrategyStatus::Edited);
        assert_eq!(edited.blocks[1].sections[0].content, "Weekly newsletter.");

        let again = store
            .edit_section(strategy.id, section_id, "Daily newsletter.".to_string())
            .await
            .unwrap();
        assert_eq!(again.status, StrategyStatus::Edited);
    }

    #[tokio::test]
    async fn test_edit_section_rejections() {
        let store = InMemoryStrategyStore::new();
        let strategy = commit_strategy(&store, Uuid::new_v4()).await;
        let section_id = strategy.blocks[0].sections[0].id;

        // Not yet opened
        let err = store
            .edit_section(strategy.id, section_id, "text".to_string())
            .await
            .unwrap_err();
        assert!(matches!(err, StratosError::InvalidStateTransition { .. }));

        store.mark_opened(strategy.id).await.unwrap();

        let err = store
            .edit_section(strategy.id, section_id, "   ".to_string())
            .await
            .unwrap_err();
        assert!(matches!(err, StratosError::ContentInvalid { .. }));

        let err = store
            .edit_section(strategy.id, Uuid::new_v4(), "text".to_string())
            .await
            .unwrap_err();
        assert!(matches!(err, StratosError::NotFound { .. }));

        store.approve(strategy.id).await.unwrap();
        let err = store
            .edit_section(strategy.id, section_id, "text".to_string())
            .await
            .unwrap_err();
        assert!(matches!(
            err,
            StratosError::InvalidStateTransition {
                from: StrategyStatus::Completed,
                ..
            }
        ));
    }

    #[tokio::test]
    async fn test_edit_section_respects_editable_flag() {
        let store = InMemoryStrategyStore::new();
        let strategy = commit_strategy(&store, Uuid::new_v4()).await;
        let section_id = strategy.blocks[0].sections[0].id;
        store.mark_opened(strategy.id).await.unwrap();

        {
            let mut tables = store.tables.write().await;
            let stored = tables.by_id.get_mut(&strategy.id).unwrap();
            stored.find_section_mut(section_id).unwrap().editable = false;
        }

        let err = store
            .edit_section(strategy.id, section_id, "new text".to_string())
            .await
            .unwrap_err();
        assert!(matches!(err, StratosError::ContentInvalid { .. }));
    }

    #[tokio::test]
    async fn test_reorder_blocks_renumbers_densely() {
        let store = InMemoryStrategyStore::new();
        let strategy = commit_strategy(&store, Uuid::new_v4()).await;
        store.mark_opened(strategy.id).await.unwrap();

        let mut reversed = strategy.block_ids();
        reversed.reverse();
        let reordered = store
            .reorder_blocks(strategy.id, reversed.clone())
            .await
            .unwrap();

        assert_eq!(reordered.status, StrategyStatus::Edited);
        assert_eq!(reordered.block_ids(), reversed);
        let orders: Vec<u32> = reordered.blocks.iter().map(|b| b.order).collect();
        assert_eq!(orders, vec![0, 1, 2]);
        assert_eq!(reordered.blocks[0].title, "Budget");
        assert!(reordered.validate_ordering().is_ok());
    }

    #[tokio::test]
    async fn test_reorder_rejects_non_permutations() {
        let store = InMemoryStrategyStore::new();
        let strategy = commit_strategy(&store, Uuid::new_v4()).await;
        store.mark_opened(strategy.id).await.unwrap();
        let ids = strategy.block_ids();

        // Wrong length
        let err = store
            .reorder_blocks(strategy.id, ids[..2].to_vec())
            .await
            .unwrap_err();
        assert!(matches!(err, StratosError::InvalidPermutation { .. }));

        // Duplicate id
        let err = store
            .reorder_blocks(strategy.id, vec![ids[0], ids[0], ids[2]])
            .await
            .unwrap_err();
        assert!(matches!(err, StratosError::InvalidPermutation { .. }));

        // Foreign id
        let err = store
            .reorder_blocks(strategy.id, vec![ids[0], ids[1], Uuid::new_v4()])
            .await
            .unwrap_err();
        assert!(matches!(err, StratosError::InvalidPermutation { .. }));

        // Prior order untouched after every rejection
        let current = store.get(strategy.id).await.unwrap().unwrap();
        assert_eq!(current.block_ids(), ids);
        assert_eq!(current.status, StrategyStatus::Opened);
    }

    #[tokio::test]
    async fn test_reorder_requires_opened() {
        let store = InMemoryStrategyStore::new();
        let strategy = commit_strategy(&store, Uuid::new_v4()).await;

        let err = store
            .reorder_blocks(strategy.id, strategy.block_ids())
            .await
            .unwrap_err();
        assert!(matches!(
            err,
            StratosError::InvalidStateTransition {
                from: StrategyStatus::Pending,
                ..
            }
        ));
    }

    #[tokio::test]
    async fn test_lifecycle_events_published() {
        let store = InMemoryStrategyStore::new();
        let mut rx = store.events().subscribe();
        let brief_id = Uuid::new_v4();

        let strategy = commit_strategy(&store, brief_id).await;
        store.mark_opened(strategy.id).await.unwrap();

        let started = rx.recv().await.unwrap();
        assert!(matches!(started.kind, StrategyEventKind::GenerationStarted));

        let committed = rx.recv().await.unwrap();
        assert!(matches!(
            committed.kind,
            StrategyEventKind::Committed { block_count: 3 }
        ));
        assert_eq!(committed.strategy_id, Some(strategy.id));

        let opened = rx.recv().await.unwrap();
        assert!(matches!(
            opened.kind,
            StrategyEventKind::StatusChanged {
                from: StrategyStatus::Pending,
                to: StrategyStatus::Opened,
            }
        ));
    }
}
