use std::path::Path;
use std::process;

use graphtext_core::{ModelRegistry, PropertyDeclaration, TypeDeclaration};
use graphtext_interchange::load_model;

use crate::{report_error, OutputFormat};

pub(crate) fn cmd_types(model: &Path, output: OutputFormat, quiet: bool) {
    let registry = match load_model(model) {
        Ok(r) => r,
        Err(e) => {
            report_error(&e.to_string(), output, quiet);
            process::exit(1);
        }
    };

    match output {
        OutputFormat::Text => print!("{}", render_text(&registry)),
        OutputFormat::Json => {
            let decls: Vec<&TypeDeclaration> = registry.declarations().collect();
            let pretty = serde_json::to_string_pretty(&decls)
                .unwrap_or_else(|e| format!("serialization error: {}", e));
            println!("{}", pretty);
        }
    }
}

fn render_text(registry: &ModelRegistry) -> String {
    let mut out = String::new();
    for decl in registry.declarations() {
        let kind = serde_json::to_value(decl.kind)
            .ok()
            .and_then(|v| v.as_str().map(str::to_owned))
            .unwrap_or_default();
        out.push_str(&format!("{} {}", kind, decl.fully_qualified_name()));
        if let Some(id) = &decl.identified_by {
            out.push_str(&format!(" identified by {}", id));
        }
        out.push('\n');
        for prop in &decl.properties {
            out.push_str(&format!("  {}\n", render_property(prop)));
        }
    }
    out
}

fn render_property(prop: &PropertyDeclaration) -> String {
    let arrow = if prop.is_relationship { "--> " } else { "" };
    let array = if prop.is_array { "[]" } else { "" };
    format!("{}{}: {}{}", arrow, prop.name, prop.target_fqn(), array)
}
