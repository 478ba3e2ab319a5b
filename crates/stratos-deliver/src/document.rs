//! Renderable document assembly from a strategy tree

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use stratos_core::strategy::AIStrategy;

/// One titled segment of the outgoing document
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct DocumentBlock {
    /// Block title
    pub title: String,

    /// Section texts in display order
    pub sections: Vec<String>,
}

/// The ordered, render-ready projection of a strategy
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct StrategyDocument {
    /// The strategy this document was assembled from
    pub strategy_id: Uuid,

    /// Document title
    pub title: String,

    /// When the underlying strategy was generated
    pub generated_at: DateTime<Utc>,

    /// Blocks in display order
    pub blocks: Vec<DocumentBlock>,
}

impl StrategyDocument {
    /// Projects a strategy tree into document blocks, preserving the
    /// stored block and section order exactly
    pub fn from_strategy(strategy: &AIStrategy) -> Self {
        StrategyDocument {
            strategy_id: strategy.id,
            title: "Marketing Strategy".to_string(),
            generated_at: strategy.generated_at,
            blocks: strategy
                .blocks
                .iter()
                .map(|block| DocumentBlock {
                    title: block.title.clone(),
                    sections: block.sections.iter().map(|s| s.content.clone()).collect(),
                })
                .collect(),
        }
    }

    /// Renders the document as markdown text
    pub fn to_markdown(&self) -> String {
        let mut out = String::new();
        out.push_str(&format!("# {}\n\n", self.title));
        out.push_str(&format!(
            "_Generated {}_\n",
            self.generated_at.format("%Y-%m-%d")
        ));
        for block in &self.blocks {
            out.push_str(&format!("\n## {}\n", block.title));
            for section in &block.sections {
                out.push('\n');
                out.push_str(section);
                out.push('\n');
            }
        }
        out
    }

    /// Number of sections across all blocks
    pub fn section_count(&self) -> usize {
        self.blocks.iter().map(|b| b.sections.len()).sum()
    }
}

/// The binary output of a document renderer
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RenderedDocument {
    /// MIME type of the rendered bytes
    pub content_type: String,

    /// Suggested filename for the attachment
    pub filename: String,

    /// The rendered document body
    pub bytes: Vec<u8>,
}

/// Proof that a strategy left the building
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct DeliveryReceipt {
    /// Receipt identifier
    pub id: Uuid,

    /// The strategy that was delivered
    pub strategy_id: Uuid,

    /// Where it went
    pub recipient: String,

    /// Which transport carried it
    pub transport: String,

    /// The transport's own message identifier
    pub message_id: String,

    /// When the transport accepted it
    pub delivered_at: DateTime<Utc>,
}

#[cfg(test)]
mod tests {
    use super::*;
    use stratos_core::strategy::{ParsedBlock, ParsedSection, ParsedStrategy};

    fn create_test_strategy() -> AIStrategy {
        AIStrategy::from_parsed(
            Uuid::new_v4(),
            ParsedStrategy {
                blocks: vec![
                    ParsedBlock {
                        order: 0,
                        title: "Positioning".to_string(),
                        sections: vec![ParsedSection {
                            order: 0,
                            content: "Lead with craftsmanship.".to_string(),
                        }],
                    },
                    ParsedBlock {
                        order: 1,
                        title: "Channels".to_string(),
                        sections: vec![
                            ParsedSection {
                                order: 0,
                                content: "Newsletter weekly.".to_string(),
                            },
                            ParsedSection {
                                order: 1,
                                content: "Two retail events per quarter.".to_string(),
                            },
                        ],
                    },
                ],
            },
            "raw".to_string(),
        )
        .unwrap()
    }

    #[test]
    fn test_from_strategy_preserves_order() {
        let strategy = create_test_strategy();
        let document = StrategyDocument::from_strategy(&strategy);

        assert_eq!(document.strategy_id, strategy.id);
        assert_eq!(document.blocks.len(), 2);
        assert_eq!(document.blocks[0].title, "Positioning");
        assert_eq!(document.blocks[1].sections[1], "Two retail events per quarter.");
        assert_eq!(document.section_count(), 3);
    }

    #[test]
    fn test_to_markdown_layout() {
        let document = StrategyDocument::from_strategy(&create_test_strategy());
        let markdown = document.to_markdown();

        assert!(markdown.starts_with("# Marketing Strategy\n"));
        assert!(markdown.contains("## Positioning"));
        assert!(markdown.contains("## Channels"));
        assert!(markdown.contains("Lead with craftsmanship."));
        let positioning = markdown.find("## Positioning").unwrap();
        let channels = markdown.find("## Channels").unwrap();
        assert!(positioning < channels);
    }
}
