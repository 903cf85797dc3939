//! Machine-readable export of extracted changes

use anyhow::Result;
use serde::Serialize;

use crate::aggregate::BatchOutcome;
use crate::extract::ChangeRecord;

#[derive(Serialize)]
struct JsonExport<'a> {
    documents_processed: usize,
    failures: Vec<JsonFailure>,
    records: &'a [ChangeRecord],
}

#[derive(Serialize)]
struct JsonFailure {
    path: String,
    error: String,
}

/// Records plus per-document failures as pretty-printed JSON.
pub fn export_to_json(outcome: &BatchOutcome) -> Result<String> {
    let export = JsonExport {
        documents_processed: outcome.documents_processed,
        failures: outcome
            .failures
            .iter()
            .map(|failure| JsonFailure {
                path: failure.path.display().to_string(),
                error: failure.error.to_string(),
            })
            .collect(),
        records: &outcome.records,
    };
    Ok(serde_json::to_string_pretty(&export)?)
}
