//! Generated strategy trees and the raw model-output archive

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use sha2::{Digest, Sha256};
use uuid::Uuid;

use crate::error::{Result, StratosError};
use crate::types::StrategyStatus;

/// One section as extracted from model output, before ids are minted
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ParsedSection {
    /// Dense zero-based position within the block
    pub order: u32,

    /// Section text, trimmed, never empty
    pub content: String,
}

/// One block as extracted from model output
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ParsedBlock {
    /// Dense zero-based position within the strategy
    pub order: u32,

    /// Block title, trimmed, never empty
    pub title: String,

    /// Ordered sections; never empty
    pub sections: Vec<ParsedSection>,
}

/// The full strategy tree produced by a successful parse.
///
/// Block and section order mirrors the model's output order; nothing is
/// re-sorted after extraction.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ParsedStrategy {
    /// Ordered blocks; never empty
    pub blocks: Vec<ParsedBlock>,
}

impl ParsedStrategy {
    /// Checks the structural invariants the parser is supposed to uphold.
    ///
    /// A violation here means a bug upstream, not bad model output, so
    /// every failure is an internal error rather than an unparseable one.
    pub fn validate(&self) -> Result<()> {
        if self.blocks.is_empty() {
            return Err(StratosError::Internal(
                "parsed strategy has no blocks".to_string(),
            ));
        }
        for (i, block) in self.blocks.iter().enumerate() {
            if block.order as usize != i {
                return Err(StratosError::Internal(format!(
                    "block order gap: expected {} found {}",
                    i, block.order
                )));
            }
            if block.title.trim().is_empty() {
                return Err(StratosError::Internal(format!(
                    "block {} has an empty title",
                    i
                )));
            }
            if block.sections.is_empty() {
                return Err(StratosError::Internal(format!(
                    "block '{}' has no sections",
                    block.title
                )));
            }
            for (j, section) in block.sections.iter().enumerate() {
                if section.order as usize != j {
                    return Err(StratosError::Internal(format!(
                        "section order gap in block '{}': expected {} found {}",
                        block.title, j, section.order
                    )));
                }
                if section.content.trim().is_empty() {
                    return Err(StratosError::Internal(format!(
                        "empty section content in block '{}'",
                        block.title
                    )));
                }
            }
        }
        Ok(())
    }

    /// Number of blocks
    pub fn block_count(&self) -> usize {
        self.blocks.len()
    }

    /// Number of sections across all blocks
    pub fn section_count(&self) -> usize {
        self.blocks.iter().map(|b| b.sections.len()).sum()
    }
}

/// An editable content unit within a block
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Section {
    /// Unique identifier
    pub id: Uuid,

    /// Owning block
    pub block_id: Uuid,

    /// Dense zero-based position within the block
    pub order: u32,

    /// Markdown content
    pub content: String,

    /// Whether expert edits are permitted
    pub editable: bool,
}

/// A titled, ordered segment of a strategy
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Block {
    /// Unique identifier
    pub id: Uuid,

    /// Owning strategy
    pub strategy_id: Uuid,

    /// Dense zero-based position within the strategy
    pub order: u32,

    /// Block title
    pub title: String,

    /// Ordered sections
    pub sections: Vec<Section>,
}

/// Verbatim model output kept alongside the strategy for audit and debugging
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RawOutputArchive {
    /// The model's response, byte for byte
    pub text: String,

    /// SHA-256 of the text, hex encoded
    pub sha256: String,

    /// When the archive was captured
    pub archived_at: DateTime<Utc>,
}

impl RawOutputArchive {
    /// Archives the given text with its digest
    pub fn new(text: String) -> Self {
        let mut hasher = Sha256::new();
        hasher.update(text.as_bytes());
        let sha256 = hex_encode(&hasher.finalize());
        RawOutputArchive {
            text,
            sha256,
            archived_at: Utc::now(),
        }
    }

    /// Whether the stored digest still matches the stored text
    pub fn verify(&self) -> bool {
        let mut hasher = Sha256::new();
        hasher.update(self.text.as_bytes());
        hex_encode(&hasher.finalize()) == self.sha256
    }
}

/// A generated marketing strategy: ordered blocks of editable sections.
///
/// At most one strategy exists per brief at any time; regeneration replaces
/// the whole tree rather than mutating it.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct AIStrategy {
    /// Unique identifier
    pub id: Uuid,

    /// Owning brief
    pub brief_id: Uuid,

    /// Review lifecycle status
    pub status: StrategyStatus,

    /// When generation committed
    pub generated_at: DateTime<Utc>,

    /// The raw model output this tree was parsed from
    pub raw_output: RawOutputArchive,

    /// Ordered content blocks
    pub blocks: Vec<Block>,
}

impl AIStrategy {
    /// Mints a persistable strategy from a validated parse result.
    ///
    /// Ids are assigned here; block and section order is copied verbatim
    /// from the parse (model output order is authoritative). Status starts
    /// at Pending.
    pub fn from_parsed(brief_id: Uuid, parsed: ParsedStrategy, raw_text: String) -> Result<Self> {
        parsed.validate()?;

        let strategy_id = Uuid::new_v4();
        let blocks = parsed
            .blocks
            .into_iter()
            .map(|block| {
                let block_id = Uuid::new_v4();
                Block {
                    id: block_id,
                    strategy_id,
                    order: block.order,
                    title: block.title,
                    sections: block
                        .sections
                        .into_iter()
                        .map(|section| Section {
                            id: Uuid::new_v4(),
                            block_id,
                            order: section.order,
                            content: section.content,
                            editable: true,
                        })
                        .collect(),
                }
            })
            .collect();

        Ok(AIStrategy {
            id: strategy_id,
            brief_id,
            status: StrategyStatus::Pending,
            generated_at: Utc::now(),
            raw_output: RawOutputArchive::new(raw_text),
            blocks,
        })
    }

    /// Block ids in current display order
    pub fn block_ids(&self) -> Vec<Uuid> {
        self.blocks.iter().map(|b| b.id).collect()
    }

    /// Number of sections across all blocks
    pub fn section_count(&self) -> usize {
        self.blocks.iter().map(|b| b.sections.len()).sum()
    }

    /// Looks up a section anywhere in the tree
    pub fn find_section_mut(&mut self, section_id: Uuid) -> Option<&mut Section> {
        self.blocks
            .iter_mut()
            .flat_map(|b| b.sections.iter_mut())
            .find(|s| s.id == section_id)
    }

    /// Checks dense ordering on the persisted tree
    pub fn validate_ordering(&self) -> Result<()> {
        for (i, block) in self.blocks.iter().enumerate() {
            if block.order as usize != i {
                return Err(StratosError::Internal(format!(
                    "strategy {} block order gap at position {}",
                    self.id, i
                )));
            }
            for (j, section) in block.sections.iter().enumerate() {
                if section.order as usize != j {
                    return Err(StratosError::Internal(format!(
                        "strategy {} section order gap in block '{}'",
                        self.id, block.title
                    )));
                }
            }
        }
        Ok(())
    }
}

fn hex_encode(bytes: &[u8]) -> String {
    bytes.iter().map(|b| format!("{:02x}", b)).collect()
}
