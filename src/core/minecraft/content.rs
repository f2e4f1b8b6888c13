// src/core/minecraft/content.rs
use serde::Serialize;
use tracing::{debug, warn};

use super::backend::{ContentBackend, ContentRoots};
use super::paths::{list_players, player_content_dir, ContentDir};
use crate::i18n::tr;
use crate::result::CoreError;

/// 内容页显示的四个计数
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize)]
pub struct ContentCounts {
    pub worlds: usize,
    pub resource_packs: usize,
    pub behavior_packs: usize,
    pub skin_packs: usize,
}

impl ContentCounts {
    pub fn render(&self) -> String {
        tr(
            "content-counts",
            &[
                ("worlds", &self.worlds.to_string()),
                ("res", &self.resource_packs.to_string()),
                ("bp", &self.behavior_packs.to_string()),
                ("skins", &self.skin_packs.to_string()),
            ],
        )
    }
}

/// 某个版本当前的内容视图
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct ContentSnapshot {
    pub roots: ContentRoots,
    pub players: Vec<String>,
    /// 空字符串表示没有可选玩家
    pub selected_player: String,
    pub counts: ContentCounts,
}

/// 统计目录下的子目录数；路径为空或后端出错记为 0
pub async fn count_directories(backend: &dyn ContentBackend, path: &str) -> usize {
    if path.trim().is_empty() {
        return 0;
    }
    match backend.list_dir(path).await {
        Ok(entries) => entries.iter().filter(|e| e.is_dir).count(),
        Err(e) => {
            debug!("count dirs in {} failed: {}", path, e);
            0
        }
    }
}

/// 统计某个玩家的世界和皮肤包
pub async fn count_player_content(
    backend: &dyn ContentBackend,
    roots: &ContentRoots,
    player: &str,
) -> (usize, usize) {
    let worlds = match player_content_dir(roots, player, ContentDir::Worlds) {
        Some(p) => count_directories(backend, &p).await,
        None => 0,
    };
    let skins = match player_content_dir(roots, player, ContentDir::SkinPacks) {
        Some(p) => count_directories(backend, &p).await,
        None => 0,
    };
    (worlds, skins)
}

/// 重新读取内容根目录、玩家列表和计数
///
/// `player_hint` 在玩家列表里时保持选中，否则选第一个玩家。
pub async fn refresh_content(
    backend: &dyn ContentBackend,
    version: &str,
    player_hint: Option<&str>,
) -> Result<ContentSnapshot, CoreError> {
    if version.trim().is_empty() {
        return Ok(ContentSnapshot::default());
    }

    let roots = backend.get_content_roots(version).await.map_err(|e| {
        warn!("resolve content roots for {} failed: {}", version, e);
        e
    })?;

    let players = list_players(backend, &roots.users_root).await;
    let selected_player = match player_hint {
        Some(hint) if players.iter().any(|p| p == hint) => hint.to_string(),
        _ => players.first().cloned().unwrap_or_default(),
    };

    let (worlds, skin_packs) = count_player_content(backend, &roots, &selected_player).await;
    let counts = ContentCounts {
        worlds,
        resource_packs: count_directories(backend, &roots.resource_packs).await,
        behavior_packs: count_directories(backend, &roots.behavior_packs).await,
        skin_packs,
    };

    debug!(
        version,
        player = %selected_player,
        ?counts,
        "content refreshed"
    );
    Ok(ContentSnapshot {
        roots,
        players,
        selected_player,
        counts,
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::import::testing::MockBackend;

    fn backend() -> MockBackend {
        let shared = "/v/Users/Shared/games/com.mojang";
        MockBackend::new()
            .with_layout("/v", &["Steve", "Alex"])
            .with_dirs("/v/Users/Steve/games/com.mojang/minecraftWorlds", 2)
            .with_dirs("/v/Users/Alex/games/com.mojang/minecraftWorlds", 5)
            .with_dirs("/v/Users/Alex/games/com.mojang/skin_packs", 1)
            .with_dirs(&format!("{}/resource_packs", shared), 3)
            .with_dirs(&format!("{}/behavior_packs", shared), 4)
    }

    #[tokio::test]
    async fn test_known_hint_is_kept() {
        let b = backend();
        let snap = refresh_content(&b, "1.21", Some("Alex")).await.unwrap();
        assert_eq!(snap.selected_player, "Alex");
        assert_eq!(
            snap.counts,
            ContentCounts {
                worlds: 5,
                resource_packs: 3,
                behavior_packs: 4,
                skin_packs: 1,
            }
        );
    }

    #[tokio::test]
    async fn test_unknown_hint_falls_back_to_first_player() {
        let b = backend();
        let snap = refresh_content(&b, "1.21", Some("Herobrine")).await.unwrap();
        assert_eq!(snap.selected_player, "Steve");
        assert_eq!(snap.players, vec!["Steve", "Alex"]);
        assert_eq!(snap.counts.worlds, 2);
        // Steve 没有 skin_packs 目录
        assert_eq!(snap.counts.skin_packs, 0);
    }

    #[tokio::test]
    async fn test_no_version_is_empty_snapshot() {
        let b = backend();
        let snap = refresh_content(&b, "", None).await.unwrap();
        assert_eq!(snap, ContentSnapshot::default());
        assert!(b.calls().is_empty());
    }

    #[tokio::test]
    async fn test_count_ignores_files() {
        let b = backend();
        assert_eq!(count_directories(&b, "/v/Users/Steve/games/com.mojang/minecraftWorlds").await, 2);
        assert_eq!(count_directories(&b, "").await, 0);
    }
}
