use anyhow::{Context, Result};
use std::sync::Arc;

use crate::core::minecraft::backend::ContentBackend;
use crate::core::minecraft::content::{count_player_content, refresh_content, ContentSnapshot};

/// 读取内容视图；显式指定的玩家即使不在列表里也按它统计
pub async fn load_snapshot(
    backend: Arc<dyn ContentBackend>,
    version: &str,
    player: Option<&str>,
) -> Result<ContentSnapshot> {
    let mut snapshot = refresh_content(backend.as_ref(), version, player)
        .await
        .with_context(|| format!("Failed to resolve content roots for {}", version))?;

    if let Some(p) = player.filter(|p| *p != snapshot.selected_player) {
        let (worlds, skins) = count_player_content(backend.as_ref(), &snapshot.roots, p).await;
        snapshot.selected_player = p.to_string();
        snapshot.counts.worlds = worlds;
        snapshot.counts.skin_packs = skins;
    }
    Ok(snapshot)
}

pub fn render_players(snapshot: &ContentSnapshot) -> Vec<String> {
    snapshot
        .players
        .iter()
        .map(|p| {
            let marker = if *p == snapshot.selected_player { "*" } else { " " };
            format!("{} {}", marker, p)
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::import::testing::MockBackend;

    #[tokio::test]
    async fn test_explicit_unknown_player_is_counted() {
        let backend = Arc::new(
            MockBackend::new()
                .with_layout("/v", &["Steve"])
                .with_dirs("/v/Users/Guest/games/com.mojang/minecraftWorlds", 2),
        );
        let snap = load_snapshot(backend, "1.21", Some("Guest")).await.unwrap();
        assert_eq!(snap.selected_player, "Guest");
        assert_eq!(snap.counts.worlds, 2);
        assert_eq!(render_players(&snap), vec!["  Steve"]);
    }
}
