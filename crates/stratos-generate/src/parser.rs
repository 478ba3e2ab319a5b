//! Strict extraction of the block/section tree from raw model output

use tracing::{debug, warn};

use stratos_core::error::{Result, StratosError};
use stratos_core::strategy::{ParsedBlock, ParsedSection, ParsedStrategy};

use crate::format::{BLOCK_CLOSE, BLOCK_OPEN, SECTION_MARKER};

/// Parses model output in the canonical delimiter format.
///
/// Acceptance is all-or-nothing: any malformed delimiter, titleless block,
/// sectionless block, or empty section rejects the entire response with the
/// raw text preserved for diagnostics. Provider chatter before the first
/// block header is the single tolerated irregularity.
///
/// Block and section order is assigned densely from zero in the order the
/// model emitted them; nothing is re-sorted.
pub fn parse_strategy(raw: &str) -> Result<ParsedStrategy> {
    let Some(first_block) = raw.find(BLOCK_OPEN) else {
        return Err(unparseable("no block headers found", raw));
    };
    if raw[..first_block].contains(SECTION_MARKER) {
        return Err(unparseable(
            "section marker appears before the first block header",
            raw,
        ));
    }

    let mut blocks = Vec::new();
    for segment in raw[first_block..].split(BLOCK_OPEN).skip(1) {
        let Some(close) = segment.find(BLOCK_CLOSE) else {
            return Err(unparseable("unterminated block header", raw));
        };
        let title = segment[..close].trim();
        if title.is_empty() {
            return Err(unparseable("block header with an empty title", raw));
        }
        let body = &segment[close + BLOCK_CLOSE.len()..];

        let mut parts = body.split(SECTION_MARKER);
        let lead = parts.next().unwrap_or("");
        if !lead.trim().is_empty() {
            return Err(unparseable(
                format!(
                    "text between block '{}' header and its first section marker",
                    title
                ),
                raw,
            ));
        }

        let mut sections = Vec::new();
        for content in parts {
            let content = content.trim();
            if content.is_empty() {
                return Err(unparseable(
                    format!("empty section in block '{}'", title),
                    raw,
                ));
            }
            sections.push(ParsedSection {
                order: sections.len() as u32,
                content: content.to_string(),
            });
        }
        if sections.is_empty() {
            return Err(unparseable(
                format!("block '{}' has no sections", title),
                raw,
            ));
        }

        blocks.push(ParsedBlock {
            order: blocks.len() as u32,
            title: title.to_string(),
            sections,
        });
    }
    if blocks.is_empty() {
        return Err(unparseable("no block headers found", raw));
    }

    let parsed = ParsedStrategy { blocks };
    // A gap here is a bug in this function, not bad model output.
    parsed.validate()?;
    debug!(
        blocks = parsed.block_count(),
        sections = parsed.section_count(),
        "parsed model response"
    );
    Ok(parsed)
}

fn unparseable(reason: impl Into<String>, raw: &str) -> StratosError {
    let reason = reason.into();
    warn!(reason = %reason, raw_len = raw.len(), "rejected model response");
    StratosError::UnparseableResponse {
        reason,
        raw_text: raw.to_string(),
    }
}
