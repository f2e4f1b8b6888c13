use serde::{Deserialize, Serialize};
use serde_json::Value as JsonValue;
use std::io::Write;
use std::path::{Path, PathBuf};
use std::{fs, io};
use tracing::{debug, error};

use crate::utils::file_ops::bmcbl_subdir;

#[derive(Serialize, Deserialize, Debug, Clone, Default, PartialEq)]
#[serde(default)]
pub struct Launcher {
    pub debug: bool,
    pub language: String, // "auto", "en-US", "zh-CN" 等
    /// 跳过 Gaming Services 检查
    pub ignore_gaming_services: bool,
}

#[derive(Serialize, Deserialize, Debug, Clone, Default, PartialEq)]
#[serde(default)]
pub struct BackendConfig {
    /// 启动器后端 RPC 地址
    pub endpoint: String,
    pub connect_timeout_secs: u64,
}

#[derive(Serialize, Deserialize, Debug, Clone, Default, PartialEq)]
#[serde(default)]
pub struct ImportConfig {
    /// 不弹提示：直接使用当前玩家，重复内容一律跳过
    pub non_interactive: bool,
}

#[derive(Serialize, Deserialize, Debug, Clone, Default, PartialEq)]
pub struct Config {
    pub launcher: Launcher,
    pub backend: BackendConfig,
    pub import: ImportConfig,
}

pub fn get_config_file_path() -> PathBuf {
    bmcbl_subdir("config").join("settings.toml")
}

fn ensure_parent_dir(path: &Path) -> io::Result<()> {
    if let Some(dir) = path.parent() {
        if !dir.exists() {
            fs::create_dir_all(dir)?;
        }
    }
    Ok(())
}

fn to_toml_string<T: Serialize>(value: &T) -> io::Result<String> {
    toml::to_string(value).map_err(|e| io::Error::new(io::ErrorKind::InvalidData, e))
}

pub fn ensure_config_file(path: &Path) -> io::Result<()> {
    if !path.exists() {
        ensure_parent_dir(path)?;
        let toml_content = to_toml_string(&get_default_config())?;
        let mut file = fs::File::create(path)?;
        file.write_all(toml_content.as_bytes())?;
    }
    Ok(())
}

pub fn get_default_config() -> Config {
    Config {
        launcher: Launcher {
            debug: false,
            language: "auto".to_string(),
            ignore_gaming_services: false,
        },
        backend: BackendConfig {
            endpoint: "http://127.0.0.1:34115".to_string(),
            connect_timeout_secs: 10,
        },
        import: ImportConfig {
            non_interactive: false,
        },
    }
}

pub fn read_config() -> io::Result<Config> {
    read_config_from(&get_config_file_path())
}

/// 读取配置；解析失败时把默认值合并进已有内容并回写
pub fn read_config_from(config_file: &Path) -> io::Result<Config> {
    ensure_config_file(config_file)?;
    let content = fs::read_to_string(config_file)?;

    let config: Config = match toml::from_str(&content) {
        Ok(parsed_config) => parsed_config,
        Err(err) => {
            error!("Failed to parse config on first attempt: {:?}", err);

            let default_config = get_default_config();
            if let Ok(toml::Value::Table(existing_table)) = toml::from_str::<toml::Value>(&content) {
                if let Ok(toml::Value::Table(default_table)) = toml::Value::try_from(&default_config) {
                    let merged_config = merge_tables(default_table, existing_table);
                    let updated_content = to_toml_string(&toml::Value::Table(merged_config))?;
                    fs::write(config_file, updated_content)?;
                }
            }

            let updated_content = fs::read_to_string(config_file)?;
            toml::from_str(&updated_content).unwrap_or_else(|second_err| {
                error!("Failed to parse config on second attempt: {:?}", second_err);
                default_config
            })
        }
    };

    debug!("Read and updated config: {:?}", config);
    Ok(config)
}

fn merge_tables(
    mut default: toml::map::Map<String, toml::Value>,
    existing: toml::map::Map<String, toml::Value>,
) -> toml::map::Map<String, toml::Value> {
    for (key, existing_value) in existing {
        match default.get_mut(&key) {
            Some(default_value) => {
                if let (toml::Value::Table(default_table), toml::Value::Table(existing_table)) =
                    (default_value.clone(), existing_value.clone())
                {
                    *default_value = toml::Value::Table(merge_tables(default_table, existing_table));
                } else if same_kind(default_value, &existing_value) {
                    *default_value = existing_value;
                }
                // 类型不对的旧值丢弃，保留默认值
            }
            None => {
                default.insert(key, existing_value);
            }
        }
    }
    default
}

fn same_kind(a: &toml::Value, b: &toml::Value) -> bool {
    std::mem::discriminant(a) == std::mem::discriminant(b)
}

pub fn write_config(config: &Config) -> io::Result<()> {
    write_config_to(&get_config_file_path(), config)
}

pub fn write_config_to(config_file: &Path, config: &Config) -> io::Result<()> {
    ensure_parent_dir(config_file)?;
    let toml_content = to_toml_string(config)?;
    let mut file = fs::File::create(config_file)?;
    file.write_all(toml_content.as_bytes())?;
    Ok(())
}

pub fn get_nested_value(data: &JsonValue, key: &str) -> Option<JsonValue> {
    let mut current = data;
    for part in key.split('.') {
        current = current.get(part)?;
    }
    Some(current.clone())
}

pub fn set_nested_value(data: &mut JsonValue, key: &str, value: JsonValue) -> Result<(), String> {
    let parts: Vec<&str> = key.split('.').collect();
    let mut current = data;

    for (i, part) in parts.iter().enumerate() {
        if i == parts.len() - 1 {
            return if let Some(obj) = current.as_object_mut() {
                obj.insert(part.to_string(), value);
                Ok(())
            } else {
                Err(format!("Key '{}' is not an object", part))
            };
        }
        current = current
            .get_mut(*part)
            .ok_or_else(|| format!("Key '{}' not found", part))?;
    }

    Err("Invalid key".to_string())
}
