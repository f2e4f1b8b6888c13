use anyhow::{anyhow, Context, Result};
use serde_json::Value as JsonValue;

use crate::config::config::{get_nested_value, read_config, set_nested_value, write_config, Config};

pub fn get_config(key: Option<&str>) -> Result<JsonValue> {
    let config = read_config().context("Failed to read config")?;
    let config_json = serde_json::to_value(config)?;

    match key {
        Some(k) => get_nested_value(&config_json, k).ok_or_else(|| anyhow!("Key '{}' not found", k)),
        None => Ok(config_json),
    }
}

/// 命令行给的值先按 JSON 解析，失败则当作字符串
pub fn parse_value(raw: &str) -> JsonValue {
    serde_json::from_str(raw).unwrap_or_else(|_| JsonValue::String(raw.to_string()))
}

/// 修改一个键并校验整体仍能反序列化
pub fn apply_value(current: &Config, key: &str, value: JsonValue) -> Result<Config> {
    let mut config_json = serde_json::to_value(current)?;
    if get_nested_value(&config_json, key).is_none() {
        return Err(anyhow!("Key '{}' not found", key));
    }
    set_nested_value(&mut config_json, key, value).map_err(|e| anyhow!("Failed to set value: {}", e))?;
    serde_json::from_value(config_json).context("Failed to deserialize")
}

pub fn set_config(key: &str, raw_value: &str) -> Result<Config> {
    let current = read_config().context("Failed to read config")?;
    let updated = apply_value(&current, key, parse_value(raw_value))?;
    write_config(&updated).context("Failed to write config")?;
    Ok(updated)
}
