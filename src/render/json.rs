//! JSON and script output for question datasets.

use std::fs;
use std::path::Path;

use serde::Serialize;
use serde_json::Value;

use crate::error::{Error, Result};

use super::options::OutputOptions;

/// Serialize to pretty JSON (2-space indentation, non-ASCII kept literal).
pub fn to_json<T: Serialize + ?Sized>(value: &T) -> Result<String> {
    Ok(serde_json::to_string_pretty(value)?)
}

/// Wrap JSON text in a script variable assignment.
pub fn to_script(json: &str, variable: &str) -> String {
    format!("const {} = {};", variable, json)
}

/// Extract the JSON value assigned in a script written by [`to_script`].
pub fn parse_script(script: &str, variable: &str) -> Result<Value> {
    let malformed = || Error::Output(format!("script does not assign `{}`", variable));

    let rest = script.trim().strip_prefix("const").ok_or_else(malformed)?;
    let rest = rest.trim_start().strip_prefix(variable).ok_or_else(malformed)?;
    let rest = rest.trim_start().strip_prefix('=').ok_or_else(malformed)?;
    let json = rest.trim_end();
    let json = json.strip_suffix(';').unwrap_or(json);

    Ok(serde_json::from_str(json)?)
}

/// Write both dataset files: the JSON array and the script assignment.
///
/// The script embeds exactly the text of the JSON file.
pub fn write_outputs<T: Serialize + ?Sized>(value: &T, options: &OutputOptions) -> Result<()> {
    let json = to_json(value)?;
    fs::create_dir_all(&options.output_dir)?;

    let script_path = options.script_path();
    fs::write(&script_path, to_script(&json, &options.variable))?;
    log::info!("Wrote {}", script_path.display());

    let json_path = options.json_path();
    fs::write(&json_path, &json)?;
    log::info!("Wrote {}", json_path.display());

    Ok(())
}

/// Read a dataset back as a list of JSON objects, from either file form.
pub fn read_records(path: &Path, options: &OutputOptions) -> Result<Vec<Value>> {
    let text = fs::read_to_string(path)?;
    let value = if options.is_script(path) {
        parse_script(&text, &options.variable)?
    } else {
        serde_json::from_str(&text)?
    };

    match value {
        Value::Array(items) => Ok(items),
        _ => Err(Error::Output(format!(
            "{} does not contain a JSON array",
            path.display()
        ))),
    }
}
