use super::read_json;
use anyhow::Result;
use std::path::Path;

pub fn execute(input: Option<&Path>) -> Result<()> {
    let data = read_json(input)?;
    println!("{}", serde_json::to_string_pretty(&fleetform::sanitize(&data))?);
    Ok(())
}
