// src/app/content_page.rs
use std::path::PathBuf;
use std::sync::{Arc, Mutex};
use tracing::{debug, info, warn};

use super::lifecycle::AppLifecycle;
use crate::core::import::{
    BatchOptions, BatchReport, ImportInteraction, ImportOrchestrator, ImportableFile, PlayerPolicy,
    SourceKind,
};
use crate::core::minecraft::backend::ContentBackend;
use crate::core::minecraft::content::{count_player_content, refresh_content, ContentSnapshot};
use crate::i18n::tr;
use crate::result::{CoreError, CoreResult};

/// 内容管理页：三个导入入口共用同一套批次流程
pub struct ContentController {
    backend: Arc<dyn ContentBackend>,
    interaction: Arc<dyn ImportInteraction>,
    lifecycle: Arc<AppLifecycle>,
    orchestrator: ImportOrchestrator,
    version_name: String,
    player_policy: PlayerPolicy,
    snapshot: Mutex<ContentSnapshot>,
    /// 上一次处理过的文件管理器结果（路径用 | 连接）
    last_fm_signature: Mutex<Option<String>>,
}

impl ContentController {
    pub fn new(
        backend: Arc<dyn ContentBackend>,
        interaction: Arc<dyn ImportInteraction>,
        lifecycle: Arc<AppLifecycle>,
        version_name: impl Into<String>,
    ) -> Self {
        let orchestrator = ImportOrchestrator::new(backend.clone(), interaction.clone());
        Self {
            backend,
            interaction,
            lifecycle,
            orchestrator,
            version_name: version_name.into(),
            player_policy: PlayerPolicy::Prompt,
            snapshot: Mutex::new(ContentSnapshot::default()),
            last_fm_signature: Mutex::new(None),
        }
    }

    pub fn with_player_policy(mut self, policy: PlayerPolicy) -> Self {
        self.player_policy = policy;
        self
    }

    pub fn version_name(&self) -> &str {
        &self.version_name
    }

    pub fn orchestrator(&self) -> &ImportOrchestrator {
        &self.orchestrator
    }

    pub fn snapshot(&self) -> ContentSnapshot {
        self.snapshot.lock().unwrap_or_else(|e| e.into_inner()).clone()
    }

    pub fn selected_player(&self) -> Option<String> {
        let player = self.snapshot().selected_player;
        (!player.is_empty()).then_some(player)
    }

    fn store(&self, snapshot: ContentSnapshot) {
        *self.snapshot.lock().unwrap_or_else(|e| e.into_inner()) = snapshot;
    }

    /// 重新读取内容根目录、玩家与计数
    pub async fn refresh(&self, player_hint: Option<&str>) -> Result<ContentSnapshot, CoreError> {
        let hint = player_hint
            .map(|s| s.to_string())
            .or_else(|| self.selected_player());
        let snapshot = refresh_content(self.backend.as_ref(), &self.version_name, hint.as_deref()).await?;
        self.store(snapshot.clone());
        Ok(snapshot)
    }

    /// 切换玩家，只重算世界与皮肤包
    pub async fn change_player(&self, player: &str) -> ContentSnapshot {
        let mut snapshot = self.snapshot();
        snapshot.selected_player = player.to_string();
        let (worlds, skins) = count_player_content(self.backend.as_ref(), &snapshot.roots, player).await;
        snapshot.counts.worlds = worlds;
        snapshot.counts.skin_packs = skins;
        self.store(snapshot.clone());
        snapshot
    }

    /// 文件选择器
    pub async fn import_picked_files(&self, files: Vec<(String, Vec<u8>)>) -> CoreResult<BatchReport> {
        let files = collect_bytes(files, SourceKind::PickedFile);
        self.run_batch(files).await
    }

    /// 拖放
    pub async fn import_dropped_files(&self, files: Vec<(String, Vec<u8>)>) -> CoreResult<BatchReport> {
        let files = collect_bytes(files, SourceKind::DroppedFile);
        self.run_batch(files).await
    }

    /// 文件管理器回传的路径；与上一次完全相同的结果会被忽略并返回 None
    pub async fn import_from_file_manager(&self, paths: Vec<PathBuf>) -> Option<CoreResult<BatchReport>> {
        if paths.is_empty() {
            return None;
        }
        let signature = paths
            .iter()
            .map(|p| p.to_string_lossy())
            .collect::<Vec<_>>()
            .join("|");
        {
            let mut last = self.last_fm_signature.lock().unwrap_or_else(|e| e.into_inner());
            if last.as_deref() == Some(signature.as_str()) {
                debug!("file manager result already processed, ignored");
                return None;
            }
            *last = Some(signature);
        }

        let files = paths
            .iter()
            .filter_map(|p| ImportableFile::from_path(p, SourceKind::TempPathFromExternalManager))
            .collect();
        Some(self.run_batch(files).await)
    }

    async fn run_batch(&self, files: Vec<ImportableFile>) -> CoreResult<BatchReport> {
        if self.version_name.trim().is_empty() {
            self.interaction.present_error(&tr("no-version-selected", &[]));
            return CoreResult::error(CoreError::NoVersionSelected);
        }

        let _guard = match self.lifecycle.batch_lock.try_acquire() {
            Ok(guard) => guard,
            Err(e) => {
                self.interaction.present_error(&tr("batch-in-progress", &[]));
                return CoreResult::error(e);
            }
        };

        // 首次导入前还没有玩家列表
        if !files.is_empty() && self.snapshot().roots.users_root.is_empty() {
            if let Err(e) = self.refresh(None).await {
                warn!("content refresh before import failed: {}", e);
            }
        }

        let snapshot = self.snapshot();
        let opts = BatchOptions {
            version_name: self.version_name.clone(),
            current_player: (!snapshot.selected_player.is_empty()).then(|| snapshot.selected_player.clone()),
            player_policy: self.player_policy,
            known_players: snapshot.players.clone(),
        };
        let is_empty = files.is_empty();

        match self.orchestrator.run(files, &opts).await {
            CoreResult::Success(report) => {
                if is_empty {
                    return CoreResult::success(report);
                }
                if let Err(e) = self.refresh(report.chosen_player.as_deref()).await {
                    warn!("content refresh after import failed: {}", e);
                }
                if report.summary.should_present() {
                    self.interaction.present_summary(&report.summary);
                }
                info!(batch_id = %report.batch_id, "import batch presented");
                CoreResult::success(report)
            }
            CoreResult::Cancelled => CoreResult::cancelled(),
            CoreResult::Error(e) => {
                self.interaction.present_error(&e.to_string());
                CoreResult::error(e)
            }
        }
    }
}

fn collect_bytes(files: Vec<(String, Vec<u8>)>, source: SourceKind) -> Vec<ImportableFile> {
    files
        .into_iter()
        .filter_map(|(name, bytes)| ImportableFile::from_bytes(&name, bytes, source))
        .collect()
}
