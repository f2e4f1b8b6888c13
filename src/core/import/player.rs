// src/core/import/player.rs
use std::collections::HashSet;

use serde::{Deserialize, Serialize};
use tracing::debug;

use super::classifier::{probe_skin_pack, SkinProbe};
use super::file::{ImportKind, ImportableFile};
use crate::core::minecraft::backend::ContentBackend;

/// 批次需要玩家时如何取得玩家
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum PlayerPolicy {
    /// 弹出选择框，预选当前玩家；空选择即取消整个批次
    #[default]
    Prompt,
    /// 不提示，直接使用当前玩家（无人值守）
    UseCurrent,
}

/// 批次的玩家需求，在处理任何文件之前计算一次
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct PlayerRequirement {
    pub requires_player: bool,
    /// 被判定为皮肤包的文件下标
    pub skin_packs: HashSet<usize>,
    /// 探测失败（按普通包处理）的次数
    pub probe_failures: usize,
}

impl PlayerRequirement {
    /// 世界和皮肤包需要玩家，其余文件忽略已选玩家
    pub fn needs_player(&self, index: usize, file: &ImportableFile) -> bool {
        match file.kind {
            ImportKind::McWorld => true,
            ImportKind::McPack => self.skin_packs.contains(&index),
            ImportKind::McAddon => false,
        }
    }
}

/// 逐个探测 .mcpack，汇总出批次是否需要玩家
pub async fn resolve_requirement(
    backend: &dyn ContentBackend,
    files: &[ImportableFile],
) -> PlayerRequirement {
    let mut req = PlayerRequirement::default();

    for (index, file) in files.iter().enumerate() {
        match file.kind {
            ImportKind::McWorld => req.requires_player = true,
            ImportKind::McPack => match probe_skin_pack(backend, file).await {
                SkinProbe::SkinPack => {
                    req.skin_packs.insert(index);
                    req.requires_player = true;
                }
                SkinProbe::NotSkinPack => {}
                SkinProbe::Unreachable => req.probe_failures += 1,
            },
            ImportKind::McAddon => {}
        }
    }

    debug!(
        requires_player = req.requires_player,
        skin_packs = req.skin_packs.len(),
        probe_failures = req.probe_failures,
        "player requirement resolved"
    );
    req
}
