//! `catprompt config`

use anyhow::Result;
use serde_json::{Map, Value, json};

use crate::Config;

/// Print every effective configuration value with its source.
pub fn execute_config_command(config: &Config, json: bool) -> Result<()> {
    let entries = config.effective_config();

    if json {
        let map: Map<String, Value> = entries
            .into_iter()
            .map(|(key, value, source)| (key, json!({ "value": value, "source": source })))
            .collect();
        println!("{}", serde_json::to_string_pretty(&Value::Object(map))?);
        return Ok(());
    }

    println!("Effective configuration:");
    let width = entries.iter().map(|(key, _, _)| key.len()).max().unwrap_or(0);
    for (key, value, source) in &entries {
        println!("  {key:<width$}  {value}  ({source})");
    }
    Ok(())
}
