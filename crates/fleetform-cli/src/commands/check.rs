use super::{read_json, read_source, Input};
use anyhow::{Context, Result};
use colored::Colorize;
use fleetform::{parse_form_body, ApiValidator, Config, RuleSpec};
use std::path::Path;
use std::sync::Arc;

/// Returns whether the data passed
pub fn execute(config: &Config, rules: &Path, input: Input, json: bool) -> Result<bool> {
    let spec = RuleSpec::from_json(&read_json(Some(rules))?)
        .with_context(|| format!("Invalid rule specification in {:?}", rules))?;

    let catalog = config.catalog();
    catalog
        .verify(&spec)
        .with_context(|| format!("Rule specification {:?} uses unregistered rules", rules))?;

    let data = match input {
        Input::Json(path) => read_json(path.as_deref())?,
        Input::Form(path) => parse_form_body(read_source(Some(&path))?.trim()),
    };

    let validator = ApiValidator::new().with_catalog(Arc::new(catalog));
    let result = validator.validate_request(&data, &spec);

    if json {
        let errors = match &result {
            Ok(()) => serde_json::json!({}),
            Err(e) => serde_json::to_value(&e.errors)?,
        };
        println!("{}", serde_json::to_string_pretty(&errors)?);
        return Ok(result.is_ok());
    }

    match result {
        Ok(()) => {
            println!(
                "{} {} field(s) passed",
                "✓".green(),
                spec.len().to_string().as_str().cyan()
            );
            Ok(true)
        }
        Err(e) => {
            println!("{} {}", "✗".red(), e.message.as_str().red().bold());
            for (field, messages) in e.errors.iter() {
                println!("  {}", field.yellow());
                for message in messages {
                    println!("    - {}", message);
                }
            }
            Ok(false)
        }
    }
}
