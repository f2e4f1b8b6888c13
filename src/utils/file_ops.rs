use std::fs;
use std::path::{Path, PathBuf};
use tracing::warn;

pub fn exe_dir() -> PathBuf {
    std::env::current_exe()
        .ok()
        .and_then(|p| p.parent().map(|p| p.to_path_buf()))
        .or_else(|| std::env::current_dir().ok())
        .unwrap_or_else(|| PathBuf::from("."))
}

/// 数据根目录；BMCBL_HOME 可覆盖默认的 <exe>/BMCBL
pub fn bmcbl_dir() -> PathBuf {
    match std::env::var_os("BMCBL_HOME") {
        Some(dir) if !dir.is_empty() => PathBuf::from(dir),
        _ => exe_dir().join("BMCBL"),
    }
}

pub fn bmcbl_subdir<P: AsRef<Path>>(rel: P) -> PathBuf {
    bmcbl_dir().join(rel)
}

pub fn create_initial_directories() {
    let root = bmcbl_dir();
    let dirs = [root.clone(), bmcbl_subdir("logs"), bmcbl_subdir("config")];

    for dir in dirs {
        if let Err(e) = fs::create_dir_all(&dir) {
            warn!("Failed to create directory '{}': {}", dir.display(), e);
        }
    }
}
