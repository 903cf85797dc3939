//! Text extraction and formatting utilities
//!
//! This module handles extraction of text and formatting information
//! from docx-rs paragraph and run elements.

use super::super::models::*;
use crate::config::normalize_hex;

/// Collect the runs of a paragraph, including hyperlink and insertion content
pub(crate) fn extract_paragraph(para: &docx_rs::Paragraph) -> Paragraph {
    let mut runs = Vec::new();

    for child in &para.children {
        collect_child_runs(child, &mut runs);
    }

    Paragraph::new(Run::consolidate_runs(runs))
}

fn collect_child_runs(child: &docx_rs::ParagraphChild, runs: &mut Vec<Run>) {
    match child {
        docx_rs::ParagraphChild::Run(run) => push_run(run, runs),
        docx_rs::ParagraphChild::Insert(insert) => {
            for child in &insert.children {
                if let docx_rs::InsertChild::Run(run) = child {
                    push_run(run, runs);
                }
            }
        }
        docx_rs::ParagraphChild::Hyperlink(link) => {
            for child in &link.children {
                collect_child_runs(child, runs);
            }
        }
        docx_rs::ParagraphChild::Delete(_) => {
            // Skip deletions (track changes)
        }
        _ => {}
    }
}

fn push_run(run: &docx_rs::Run, runs: &mut Vec<Run>) {
    let text = extract_run_text(run);
    if !text.is_empty() {
        runs.push(Run::new(text, extract_run_formatting(run)));
    }
}

/// Extract text from a run using docx-rs features
pub(crate) fn extract_run_text(run: &docx_rs::Run) -> String {
    let mut text = String::new();

    for child in &run.children {
        match child {
            docx_rs::RunChild::Text(text_elem) => {
                text.push_str(&text_elem.text);
            }
            docx_rs::RunChild::Tab(_) => {
                text.push('\t');
            }
            docx_rs::RunChild::Break(_) => {
                text.push('\n');
            }
            _ => {}
        }
    }

    text
}

/// Extract the change-tracking attributes of a run
pub(crate) fn extract_run_formatting(run: &docx_rs::Run) -> RunFormatting {
    let props = &run.run_property;

    let strikethrough = props.strike.as_ref().is_some_and(toggle_enabled)
        || props.dstrike.as_ref().is_some_and(toggle_enabled);

    // Extract color value through debug formatting as a workaround for private field access
    let color = props
        .color
        .as_ref()
        .and_then(|color| debug_field_value(&format!("{color:?}")))
        .map(|value| {
            if value.eq_ignore_ascii_case("auto") {
                RunColor::Auto
            } else {
                RunColor::Rgb(normalize_hex(&value))
            }
        })
        .unwrap_or_default();

    RunFormatting {
        color,
        strikethrough,
    }
}

/// `<w:strike w:val="false"/>` is present but switched off
fn toggle_enabled<T: std::fmt::Debug>(toggle: &T) -> bool {
    !format!("{toggle:?}").contains("val: false")
}

fn debug_field_value(debug: &str) -> Option<String> {
    let start = debug.find("val: \"")? + "val: \"".len();
    let end = debug[start..].find('"')?;
    Some(debug[start..start + end].to_string())
}
