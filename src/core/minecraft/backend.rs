// src/core/minecraft/backend.rs
use async_trait::async_trait;
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};

use crate::result::CoreError;

/// 某个版本的内容根目录（字段名与后端 JSON 保持一致）
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct ContentRoots {
    pub base: String,
    pub users_root: String,
    pub resource_packs: String,
    pub behavior_packs: String,
    pub is_isolation: bool,
    pub is_preview: bool,
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct FileEntry {
    pub name: String,
    pub path: String,
    pub is_dir: bool,
    pub size: i64,
}

/// 启动器后端提供的内容管理接口
///
/// 导入类接口返回后端错误码字符串（空串 = 成功）；`Err` 只表示调用本身失败。
/// `player` 为 `Some` 时调用对应的 `WithPlayer` 变体。
#[async_trait]
pub trait ContentBackend: Send + Sync {
    async fn import_mcpack_bytes(
        &self,
        version: &str,
        player: Option<&str>,
        file_name: &str,
        data: &[u8],
        overwrite: bool,
    ) -> Result<String, CoreError>;

    async fn import_mcpack_path(
        &self,
        version: &str,
        player: Option<&str>,
        path: &Path,
        overwrite: bool,
    ) -> Result<String, CoreError>;

    async fn import_mcaddon_bytes(
        &self,
        version: &str,
        player: Option<&str>,
        data: &[u8],
        overwrite: bool,
    ) -> Result<String, CoreError>;

    async fn import_mcaddon_path(
        &self,
        version: &str,
        player: Option<&str>,
        path: &Path,
        overwrite: bool,
    ) -> Result<String, CoreError>;

    async fn import_mcworld_path(
        &self,
        version: &str,
        player: &str,
        path: &Path,
        overwrite: bool,
    ) -> Result<String, CoreError>;

    async fn is_mcpack_skin_pack(&self, data: &[u8]) -> Result<bool, CoreError>;

    async fn is_mcpack_skin_pack_path(&self, path: &Path) -> Result<bool, CoreError>;

    /// 把内存数据落盘到后端临时目录，返回可用于路径类接口的路径
    async fn write_temp_file(&self, name: &str, data: &[u8]) -> Result<PathBuf, CoreError>;

    async fn remove_temp_file(&self, path: &Path) -> Result<(), CoreError>;

    async fn get_content_roots(&self, version: &str) -> Result<ContentRoots, CoreError>;

    async fn list_dir(&self, path: &str) -> Result<Vec<FileEntry>, CoreError>;

    async fn is_game_input_installed(&self) -> Result<bool, CoreError>;

    async fn is_gaming_services_installed(&self) -> Result<bool, CoreError>;
}
