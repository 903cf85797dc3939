//! Document-level metadata: table name, release marker, file identity
//!
//! Each value comes from a chain of strategies tried in order. The first
//! non-empty hit wins; a miss across the whole chain is not an error and
//! the caller substitutes a placeholder.

use regex::Regex;
use std::path::Path;
use tracing::{debug, warn};

use crate::config::{Anchors, FileNameConvention, ReleaseStrategy, TableNameStrategy};
use crate::document::cleanup::{collapse_whitespace, strip_hyperlinks};
use crate::document::{Block, Document, find_anchor_value};

/// Identifiers encoded in a file name such as `MOD_Kunde.MAP_Adresse.docx`.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct DocumentIdentity {
    pub module: Option<String>,
    pub mapping: Option<String>,
}

impl DocumentIdentity {
    /// Split the extension-less name on `.`: the first segment carries the
    /// module prefix, the second the mapping prefix.
    pub fn from_file_name(file_name: &str, convention: &FileNameConvention) -> Self {
        let stem = Path::new(file_name)
            .file_stem()
            .and_then(|stem| stem.to_str())
            .unwrap_or(file_name);
        let mut segments = stem.split('.');

        let strip = |segment: Option<&str>, prefix: &str| {
            segment
                .and_then(|segment| segment.strip_prefix(prefix))
                .map(str::to_string)
        };
        let module = strip(segments.next(), &convention.module_prefix);
        let mapping = strip(segments.next(), &convention.mapping_prefix);

        if module.is_none() || mapping.is_none() {
            warn!(
                file_name,
                module_prefix = %convention.module_prefix,
                mapping_prefix = %convention.mapping_prefix,
                "file name does not follow the module/mapping convention"
            );
        }

        DocumentIdentity { module, mapping }
    }
}

pub fn resolve_table_name(
    document: &Document,
    chain: &[TableNameStrategy],
    anchors: &Anchors,
) -> Option<String> {
    chain.iter().find_map(|strategy| {
        let found = match strategy {
            TableNameStrategy::AnchorRow => find_anchor_value(document, &anchors.table_name),
            TableNameStrategy::PrecedingParagraph => paragraph_before_first_table(document),
            TableNameStrategy::LeadingKeyword => {
                text_after_keyword(document, &anchors.table_name_keyword)
            }
        }
        .filter(|name| !name.is_empty());

        if let Some(name) = &found {
            debug!(?strategy, table_name = %name, "resolved table name");
        }
        found
    })
}

pub fn resolve_release_marker(
    document: &Document,
    chain: &[ReleaseStrategy],
    anchors: &Anchors,
    pattern: &Regex,
) -> Option<String> {
    chain.iter().find_map(|strategy| {
        let found = match strategy {
            ReleaseStrategy::AnchorRow => find_anchor_value(document, &anchors.release_marker),
            ReleaseStrategy::Pattern => first_capture(&document.full_text(), pattern),
        }
        .filter(|marker| !marker.is_empty());

        if let Some(marker) = &found {
            debug!(?strategy, release_marker = %marker, "resolved release marker");
        }
        found
    })
}

/// The last non-empty paragraph before the first table, when exactly one
/// empty paragraph separates the two.
fn paragraph_before_first_table(document: &Document) -> Option<String> {
    let table_index = document
        .blocks
        .iter()
        .position(|block| matches!(block, Block::Table(_)))?;
    let before = table_index.checked_sub(2)?;

    let cleaned = |index: usize| match &document.blocks[index] {
        Block::Paragraph(para) => Some(strip_hyperlinks(&para.text())),
        Block::Table(_) => None,
    };

    let gap = cleaned(table_index - 1)?;
    if !gap.is_empty() {
        return None;
    }
    cleaned(before).filter(|text| !text.is_empty())
}

/// Text following `keyword` in the first paragraph that contains it, up to
/// the next full stop.
fn text_after_keyword(document: &Document, keyword: &str) -> Option<String> {
    if keyword.is_empty() {
        return None;
    }
    document.paragraphs().find_map(|para| {
        let text = para.text();
        let start = text.find(keyword)? + keyword.len();
        let rest = &text[start..];
        let end = rest.find('.').unwrap_or(rest.len());
        Some(collapse_whitespace(&rest[..end]))
    })
}

fn first_capture(text: &str, pattern: &Regex) -> Option<String> {
    let captures = pattern.captures(text)?;
    let group = captures.get(1).or_else(|| captures.get(0))?;
    Some(group.as_str().trim().to_string())
}
