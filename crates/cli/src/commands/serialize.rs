use std::path::Path;
use std::process;

use graphtext_core::{serialize, SerializeError, SerializeOptions};
use graphtext_interchange::{load_graph, load_model};
use tracing::{debug, info};

use crate::config::{self, OptionOverrides};
use crate::{report_error, OutputFormat};

pub(crate) struct SerializeArgs<'a> {
    pub model: &'a Path,
    pub graph: &'a Path,
    pub root: Option<&'a str>,
    pub config: Option<&'a Path>,
    pub overrides: OptionOverrides,
    pub pretty: bool,
    pub output: OutputFormat,
    pub quiet: bool,
}

/// Why a serialize run failed.
#[derive(Debug)]
pub(crate) enum RunError {
    /// Config, model, graph or root resolution failed.
    Input(String),
    Serialize(SerializeError),
    /// `--pretty` was given but the output does not parse.
    Malformed(String),
}

impl RunError {
    fn kind(&self) -> &'static str {
        match self {
            RunError::Input(_) => "input",
            RunError::Serialize(SerializeError::UnrecognisedValue { .. }) => "unrecognised_value",
            RunError::Serialize(SerializeError::RelationshipType { .. }) => "relationship_type",
            RunError::Serialize(SerializeError::Schema(_)) => "schema",
            RunError::Serialize(SerializeError::DepthExceeded { .. }) => "depth_exceeded",
            RunError::Malformed(_) => "malformed_output",
        }
    }

    fn message(&self) -> String {
        match self {
            RunError::Input(msg) | RunError::Malformed(msg) => msg.clone(),
            RunError::Serialize(e) => e.to_string(),
        }
    }
}

pub(crate) fn cmd_serialize(args: SerializeArgs<'_>) {
    let output = args.output;
    let quiet = args.quiet;
    match run(&args) {
        Ok(text) => println!("{}", text),
        Err(e) => {
            match output {
                OutputFormat::Json if quiet => {}
                OutputFormat::Json => {
                    let err_json = serde_json::json!({
                        "error": e.kind(),
                        "message": e.message(),
                    });
                    eprintln!("{}", err_json);
                }
                OutputFormat::Text => report_error(&e.message(), output, quiet),
            }
            process::exit(1);
        }
    }
}

pub(crate) fn run(args: &SerializeArgs<'_>) -> Result<String, RunError> {
    let options =
        config::resolve_options(args.config, &args.overrides).map_err(RunError::Input)?;
    debug!(?options, "resolved options");

    let registry = load_model(args.model).map_err(|e| RunError::Input(e.to_string()))?;
    let loaded = load_graph(args.graph).map_err(|e| RunError::Input(e.to_string()))?;

    let root = match args.root {
        Some(fqi) => loaded
            .graph
            .lookup(fqi)
            .ok_or_else(|| RunError::Input(format!("root resource '{}' not found", fqi)))?,
        None => loaded.root.ok_or_else(|| {
            RunError::Input(format!(
                "graph document '{}' lists no resources",
                args.graph.display()
            ))
        })?,
    };

    let text =
        serialize(&loaded.graph, root, &registry, &options).map_err(RunError::Serialize)?;
    info!(bytes = text.len(), "serialized");

    if args.pretty {
        return prettify(&text, &options);
    }
    Ok(text)
}

fn prettify(text: &str, options: &SerializeOptions) -> Result<String, RunError> {
    let value: serde_json::Value = serde_json::from_str(text).map_err(|e| {
        let hint = if options.legacy_cycle_separators {
            " (legacy separators produce invalid JSON for arrays of back-references)"
        } else {
            ""
        };
        RunError::Malformed(format!("output is not well-formed JSON: {}{}", e, hint))
    })?;
    serde_json::to_string_pretty(&value).map_err(|e| RunError::Malformed(e.to_string()))
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::path::PathBuf;

    fn fixtures() -> PathBuf {
        Path::new(env!("CARGO_MANIFEST_DIR")).join("../../fixtures/doge")
    }

    fn args<'a>(model: &'a Path, graph: &'a Path) -> SerializeArgs<'a> {
        SerializeArgs {
            model,
            graph,
            root: None,
            config: None,
            overrides: OptionOverrides::default(),
            pretty: false,
            output: OutputFormat::Text,
            quiet: true,
        }
    }

    #[test]
    fn cycle_needs_permission() {
        let dir = fixtures();
        let (model, graph) = (dir.join("model.json"), dir.join("cycle.json"));
        let err = run(&args(&model, &graph)).unwrap_err();
        assert_eq!(err.kind(), "relationship_type");
    }

    #[test]
    fn permit_flag_inlines_cycle() {
        let dir = fixtures();
        let (model, graph) = (dir.join("model.json"), dir.join("cycle.json"));
        let mut a = args(&model, &graph);
        a.overrides.permit_resources = true;
        let text = run(&a).unwrap();
        let expected = std::fs::read_to_string(dir.join("cycle.expected.json")).unwrap();
        assert_eq!(text, expected.trim_end());
    }

    #[test]
    fn explicit_root_is_used() {
        let dir = fixtures();
        let (model, graph) = (dir.join("model.json"), dir.join("cycle.json"));
        let mut a = args(&model, &graph);
        a.overrides.permit_resources = true;
        a.root = Some("org.acme.MyAsset1#DOGE_3");
        let text = run(&a).unwrap();
        assert!(text.starts_with(r#"{"$class":"org.acme.MyAsset1","assetId":"DOGE_3""#));
        assert!(text.ends_with(r#""next":"DOGE_3"}}}"#));
    }

    #[test]
    fn unknown_root_is_input_error() {
        let dir = fixtures();
        let (model, graph) = (dir.join("model.json"), dir.join("cycle.json"));
        let mut a = args(&model, &graph);
        a.root = Some("org.acme.MyAsset1#NOPE");
        let err = run(&a).unwrap_err();
        assert_eq!(err.kind(), "input");
        assert!(err.message().contains("NOPE"));
    }

    #[test]
    fn pretty_keeps_discriminator_first() {
        let dir = fixtures();
        let (model, graph) = (dir.join("model.json"), dir.join("pointers.json"));
        let mut a = args(&model, &graph);
        a.pretty = true;
        let text = run(&a).unwrap();
        assert!(text.starts_with("{\n  \"$class\": \"org.acme.MyAsset1\""), "{}", text);
    }

    #[test]
    fn pretty_rejects_legacy_output() {
        let dir = fixtures();
        let (model, graph) = (dir.join("model.json"), dir.join("triangle.json"));
        let mut a = args(&model, &graph);
        a.overrides.permit_resources = true;
        a.overrides.legacy_separators = true;
        a.pretty = true;
        let err = run(&a).unwrap_err();
        assert_eq!(err.kind(), "malformed_output");
        assert!(err.message().contains("legacy separators"));
    }
}
