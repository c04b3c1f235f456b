//! # Report Rendering
//!
//! Human-readable and JSON renderings of a [`BatchResult`]. Both list
//! documents in processing order and errors in the order the engine
//! produced them, so output is stable across runs.

use anyhow::Result;
use clap::ValueEnum;
use yval_schema::{BatchResult, DocumentOutcome};

/// Output format for the `validate` subcommand.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, ValueEnum)]
pub enum OutputFormat {
    #[default]
    Human,
    Json,
}

/// Render one line per document, its errors indented below it, and a
/// summary line.
pub fn render_human(result: &BatchResult) -> String {
    let mut out = String::new();
    for doc in &result.documents {
        match doc.outcome {
            DocumentOutcome::Valid => out.push_str(&format!("OK:   {}\n", doc.document)),
            DocumentOutcome::Skipped => {
                out.push_str(&format!("SKIP: {} (extension not eligible)\n", doc.document))
            }
            DocumentOutcome::Invalid => {
                out.push_str(&format!("FAIL: {}\n", doc.document));
                for error in &doc.errors {
                    out.push_str(&format!("  - {error}\n"));
                }
            }
        }
    }

    out.push_str(&format!(
        "Documents: {}/{} passed",
        result.valid, result.total
    ));
    if result.skipped > 0 {
        out.push_str(&format!(", {} skipped", result.skipped));
    }
    out.push('\n');

    if result.invalid > 0 {
        out.push_str(&format!(
            "\n{} document(s) failed validation out of {} total.\n",
            result.invalid, result.total
        ));
    }
    out
}

/// Render the full result as pretty-printed JSON.
pub fn render_json(result: &BatchResult) -> Result<String> {
    Ok(serde_json::to_string_pretty(result)?)
}

/// Render in the requested format.
pub fn render(result: &BatchResult, format: OutputFormat) -> Result<String> {
    match format {
        OutputFormat::Human => Ok(render_human(result)),
        OutputFormat::Json => render_json(result).map(|mut s| {
            s.push('\n');
            s
        }),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use yval_core::{DocumentId, DocumentPath, PathSegment, ValidationError, Value};
    use yval_schema::DocumentResult;

    fn sample() -> BatchResult {
        let path = DocumentPath::root().child(PathSegment::from("name"));
        BatchResult {
            total: 2,
            valid: 1,
            invalid: 1,
            skipped: 1,
            documents: vec![
                DocumentResult {
                    document: DocumentId::from("teams/a.yml"),
                    outcome: DocumentOutcome::Valid,
                    errors: Vec::new(),
                },
                DocumentResult {
                    document: DocumentId::from("teams/b.yml"),
                    outcome: DocumentOutcome::Invalid,
                    errors: vec![ValidationError::new(
                        path,
                        "value_must_match_filename",
                        Value::from("c"),
                        "value 'c' does not match the filename 'b'",
                    )],
                },
                DocumentResult {
                    document: DocumentId::from("teams/notes.txt"),
                    outcome: DocumentOutcome::Skipped,
                    errors: Vec::new(),
                },
            ],
        }
    }

    #[test]
    fn human_report_lists_every_document_and_error() {
        let text = render_human(&sample());
        assert!(text.contains("OK:   teams/a.yml"));
        assert!(text.contains("FAIL: teams/b.yml"));
        assert!(text.contains("  - name: value 'c' does not match the filename 'b'"));
        assert!(text.contains("SKIP: teams/notes.txt"));
        assert!(text.contains("Documents: 1/2 passed, 1 skipped"));
        assert!(text.contains("1 document(s) failed validation out of 2 total."));
    }

    #[test]
    fn human_report_for_empty_batch() {
        let text = render_human(&BatchResult::default());
        assert_eq!(text, "Documents: 0/0 passed\n");
    }

    #[test]
    fn json_report_carries_counts_and_errors() {
        let json: serde_json::Value =
            serde_json::from_str(&render_json(&sample()).unwrap()).unwrap();
        assert_eq!(json["total"], 2);
        assert_eq!(json["invalid"], 1);
        assert_eq!(json["documents"][1]["outcome"], "invalid");
        assert_eq!(
            json["documents"][1]["errors"][0]["constraint"],
            "value_must_match_filename"
        );
    }

    #[test]
    fn render_dispatches_on_format() {
        let result = sample();
        assert!(render(&result, OutputFormat::Human).unwrap().starts_with("OK:"));
        assert!(render(&result, OutputFormat::Json).unwrap().starts_with('{'));
    }
}
