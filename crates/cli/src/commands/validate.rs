use std::path::Path;
use std::process;

use crate::{report_error, OutputFormat};

static MODEL_SCHEMA_STR: &str = include_str!("../../../../schema/model-schema.json");
static GRAPH_SCHEMA_STR: &str = include_str!("../../../../schema/graph-schema.json");

/// Model documents are recognised by their `namespaces` member.
fn document_type(doc: &serde_json::Value) -> &'static str {
    if doc.get("namespaces").is_some() {
        "model"
    } else {
        "graph"
    }
}

/// Validate `doc` against the embedded schema for its document type.
pub(crate) fn validate_document(
    doc: &serde_json::Value,
) -> Result<(&'static str, Vec<String>), String> {
    let doc_type = document_type(doc);
    let schema_src = if doc_type == "model" {
        MODEL_SCHEMA_STR
    } else {
        GRAPH_SCHEMA_STR
    };
    let schema: serde_json::Value = serde_json::from_str(schema_src).map_err(|e| {
        format!(
            "internal error: failed to parse embedded {} schema: {}",
            doc_type, e
        )
    })?;
    let validator = jsonschema::validator_for(&schema)
        .map_err(|e| format!("internal error: failed to compile schema: {}", e))?;
    let errors = validator
        .iter_errors(doc)
        .map(|e| format!("{}", e))
        .collect();
    Ok((doc_type, errors))
}

pub(crate) fn cmd_validate(path: &Path, output: OutputFormat, quiet: bool) {
    let doc_str = match std::fs::read_to_string(path) {
        Ok(s) => s,
        Err(e) => {
            let msg = format!("error reading file '{}': {}", path.display(), e);
            report_error(&msg, output, quiet);
            process::exit(1);
        }
    };

    let doc: serde_json::Value = match serde_json::from_str(&doc_str) {
        Ok(v) => v,
        Err(e) => {
            let msg = format!("error parsing JSON in '{}': {}", path.display(), e);
            report_error(&msg, output, quiet);
            process::exit(1);
        }
    };

    let (doc_type, errors) = match validate_document(&doc) {
        Ok(r) => r,
        Err(msg) => {
            report_error(&msg, output, quiet);
            process::exit(1);
        }
    };

    if errors.is_empty() {
        if !quiet {
            match output {
                OutputFormat::Text => println!("valid {}", doc_type),
                OutputFormat::Json => {
                    println!(
                        "{}",
                        serde_json::json!({"valid": true, "type": doc_type})
                    );
                }
            }
        }
    } else {
        match output {
            OutputFormat::Text => {
                if !quiet {
                    eprintln!("invalid {}", doc_type);
                    for err in &errors {
                        eprintln!("  - {}", err);
                    }
                }
            }
            OutputFormat::Json => {
                let json = serde_json::json!({
                    "valid": false,
                    "type": doc_type,
                    "errors": errors
                });
                eprintln!(
                    "{}",
                    serde_json::to_string_pretty(&json).unwrap_or_default()
                );
            }
        }
        process::exit(1);
    }
}
