// src/core/minecraft/paths.rs
use serde::{Deserialize, Serialize};
use tracing::debug;

use super::backend::{ContentBackend, ContentRoots};

/// GDK 用户目录下的共享目录名
pub const SHARED_USER_DIR: &str = "Shared";

/// 玩家目录下的内容类型
#[derive(Debug, Deserialize, Serialize, Clone, Copy, PartialEq, Eq)]
#[serde(rename_all = "snake_case")]
pub enum ContentDir {
    Worlds,
    SkinPacks,
}

impl ContentDir {
    pub fn dir_name(&self) -> &'static str {
        match self {
            ContentDir::Worlds => "minecraftWorlds",
            ContentDir::SkinPacks => "skin_packs",
        }
    }
}

/// 沿用后端路径里的分隔符（Windows 后端返回反斜杠）
fn separator_of(root: &str) -> char {
    if root.contains('\\') {
        '\\'
    } else {
        '/'
    }
}

/// 拼接后端路径，不做任何规范化
pub fn join_backend_path(root: &str, parts: &[&str]) -> String {
    let sep = separator_of(root);
    let mut out = root.trim_end_matches(['/', '\\']).to_string();
    for part in parts {
        out.push(sep);
        out.push_str(part);
    }
    out
}

/// <usersRoot>/<player>/games/com.mojang/<dir>
///
/// usersRoot 或玩家为空时返回 None
pub fn player_content_dir(roots: &ContentRoots, player: &str, dir: ContentDir) -> Option<String> {
    if roots.users_root.trim().is_empty() || player.trim().is_empty() {
        return None;
    }
    Some(join_backend_path(
        &roots.users_root,
        &[player, "games", "com.mojang", dir.dir_name()],
    ))
}

/// 列出 usersRoot 下的玩家目录（排除 Shared）；出错视为没有玩家
pub async fn list_players(backend: &dyn ContentBackend, users_root: &str) -> Vec<String> {
    if users_root.trim().is_empty() {
        return Vec::new();
    }
    match backend.list_dir(users_root).await {
        Ok(entries) => entries
            .into_iter()
            .filter(|e| e.is_dir && !e.name.eq_ignore_ascii_case(SHARED_USER_DIR))
            .map(|e| e.name)
            .collect(),
        Err(e) => {
            debug!("list players under {} failed: {}", users_root, e);
            Vec::new()
        }
    }
}
