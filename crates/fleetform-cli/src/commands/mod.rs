pub mod check;
pub mod rules;
pub mod sanitize;

use anyhow::{Context, Result};
use std::io::Read;
use std::path::{Path, PathBuf};

/// Where the data under validation comes from
pub enum Input {
    Json(Option<PathBuf>),
    Form(PathBuf),
}

/// Read a file, or stdin when no path is given
pub fn read_source(path: Option<&Path>) -> Result<String> {
    match path {
        Some(path) => {
            std::fs::read_to_string(path).with_context(|| format!("Failed to read {:?}", path))
        }
        None => {
            let mut buf = String::new();
            std::io::stdin()
                .read_to_string(&mut buf)
                .context("Failed to read stdin")?;
            Ok(buf)
        }
    }
}

pub fn read_json(path: Option<&Path>) -> Result<serde_json::Value> {
    let source = read_source(path)?;
    serde_json::from_str(&source).with_context(|| match path {
        Some(path) => format!("Invalid JSON in {:?}", path),
        None => "Invalid JSON on stdin".to_string(),
    })
}
