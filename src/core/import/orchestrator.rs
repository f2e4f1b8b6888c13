// src/core/import/orchestrator.rs
use std::path::Path;
use std::sync::Arc;

use serde::Serialize;
use tokio::sync::watch;
use tracing::{debug, error, info, info_span, warn, Instrument};
use uuid::Uuid;

use super::aggregator::{BatchAggregator, ImportSummary};
use super::duplicate::{DuplicateConflict, DuplicateResolution};
use super::error_code::{ImportErrorCode, ImportStatus};
use super::file::{ImportKind, ImportableFile, PayloadRef};
use super::interaction::ImportInteraction;
use super::player::{resolve_requirement, PlayerPolicy, PlayerRequirement};
use crate::core::minecraft::backend::ContentBackend;
use crate::result::{CoreError, CoreResult};

/// 批次状态机
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(tag = "state", rename_all = "snake_case")]
pub enum BatchState {
    Idle,
    Classifying,
    PlayerPending,
    Processing { index: usize },
    DuplicatePending { index: usize },
    Summarizing,
}

/// 一次批次运行的上下文
#[derive(Debug, Clone, Default)]
pub struct BatchOptions {
    pub version_name: String,
    /// 进程内当前选中的玩家
    pub current_player: Option<String>,
    pub player_policy: PlayerPolicy,
    /// 玩家选择框里列出的玩家
    pub known_players: Vec<String>,
}

#[derive(Debug, Clone)]
pub struct BatchReport {
    pub batch_id: Uuid,
    pub summary: ImportSummary,
    /// 批次最终使用的玩家（未解析时沿用当前玩家）
    pub chosen_player: Option<String>,
    pub requirement: PlayerRequirement,
}

/// 导入编排器：逐个文件串行调用后端
pub struct ImportOrchestrator {
    backend: Arc<dyn ContentBackend>,
    interaction: Arc<dyn ImportInteraction>,
    state: watch::Sender<BatchState>,
}

impl ImportOrchestrator {
    pub fn new(backend: Arc<dyn ContentBackend>, interaction: Arc<dyn ImportInteraction>) -> Self {
        let (state, _) = watch::channel(BatchState::Idle);
        Self {
            backend,
            interaction,
            state,
        }
    }

    pub fn subscribe(&self) -> watch::Receiver<BatchState> {
        self.state.subscribe()
    }

    pub fn state(&self) -> BatchState {
        *self.state.borrow()
    }

    fn set_state(&self, next: BatchState) {
        debug!(state = ?next, "batch state");
        self.state.send_replace(next);
    }

    /// 运行一个批次
    ///
    /// 只有玩家选择框可以取消批次；一旦进入处理阶段，每个文件都会得到结果。
    pub async fn run(&self, files: Vec<ImportableFile>, opts: &BatchOptions) -> CoreResult<BatchReport> {
        let batch_id = Uuid::new_v4();
        let span = info_span!("import_batch", %batch_id, version = %opts.version_name);
        let result = self.run_inner(batch_id, files, opts).instrument(span).await;
        self.set_state(BatchState::Idle);
        result
    }

    async fn run_inner(
        &self,
        batch_id: Uuid,
        files: Vec<ImportableFile>,
        opts: &BatchOptions,
    ) -> CoreResult<BatchReport> {
        if opts.version_name.trim().is_empty() {
            warn!("import requested without a version");
            return CoreResult::error(CoreError::NoVersionSelected);
        }

        self.set_state(BatchState::Classifying);
        let current = opts
            .current_player
            .as_deref()
            .map(str::trim)
            .filter(|p| !p.is_empty())
            .map(str::to_string);

        if files.is_empty() {
            debug!("empty batch, nothing to do");
            return CoreResult::success(BatchReport {
                batch_id,
                summary: ImportSummary::default(),
                chosen_player: current,
                requirement: PlayerRequirement::default(),
            });
        }

        debug!(
            "Import batch start: count={}, version={}, current_player={:?}, policy={:?}",
            files.len(),
            opts.version_name,
            current,
            opts.player_policy
        );
        let requirement = resolve_requirement(self.backend.as_ref(), &files).await;

        let chosen_player = if requirement.requires_player {
            match opts.player_policy {
                PlayerPolicy::Prompt => {
                    self.set_state(BatchState::PlayerPending);
                    let answer = self
                        .interaction
                        .select_player(&opts.known_players, current.as_deref())
                        .await;
                    let answer = answer.trim();
                    if answer.is_empty() {
                        info!("player selection cancelled, batch aborted");
                        return CoreResult::cancelled();
                    }
                    Some(answer.to_string())
                }
                PlayerPolicy::UseCurrent => current,
            }
        } else {
            current
        };

        let mut agg = BatchAggregator::new();
        agg.note_probe_failures(requirement.probe_failures);

        for (index, file) in files.iter().enumerate() {
            self.set_state(BatchState::Processing { index });
            self.interaction.report_progress(Some(&file.display_name));

            let player = if requirement.needs_player(index, file) {
                match chosen_player.as_deref() {
                    Some(p) => Some(p),
                    None => {
                        warn!("Import skipped (no player selected): {}", file.display_name);
                        agg.record_failure(&file.display_name, ImportErrorCode::NoPlayer);
                        continue;
                    }
                }
            } else {
                None
            };

            self.process_file(index, file, player, opts, &mut agg).await;
        }

        self.interaction.report_progress(None);
        self.set_state(BatchState::Summarizing);
        let summary = agg.finalize();
        debug!(
            "Import batch done: success={}, fail={}, skipped={}, probe_failures={}",
            summary.succeeded.len(),
            summary.failed.len(),
            summary.skipped.len(),
            summary.skin_probe_failures
        );

        CoreResult::success(BatchReport {
            batch_id,
            summary,
            chosen_player,
            requirement,
        })
    }

    /// 单个文件：导入、必要时处理重复冲突、记录结果、清理临时文件
    async fn process_file(
        &self,
        index: usize,
        file: &ImportableFile,
        player: Option<&str>,
        opts: &BatchOptions,
        agg: &mut BatchAggregator,
    ) {
        let name = file.display_name.as_str();

        // 内存中的世界只能走路径接口，先落盘
        let staged = match (&file.payload, file.kind) {
            (PayloadRef::Bytes(data), ImportKind::McWorld) => {
                match self.backend.write_temp_file(name, data).await {
                    Ok(path) => Some(path),
                    Err(e) => {
                        error!("Failed to stage {}: {}", name, e);
                        agg.record_failure(name, ImportErrorCode::Other(e.to_string()));
                        return;
                    }
                }
            }
            _ => None,
        };

        let first = self
            .dispatch(file, staged.as_deref(), player, &opts.version_name, false)
            .await;

        match DuplicateConflict::detect(name, &first) {
            Some(mut conflict) => {
                self.set_state(BatchState::DuplicatePending { index });
                match conflict.resolve(self.interaction.as_ref()).await {
                    DuplicateResolution::Overwrite => {
                        self.set_state(BatchState::Processing { index });
                        // 重试结果即最终结果，不再处理第二次冲突
                        let retry = self
                            .dispatch(file, staged.as_deref(), player, &opts.version_name, true)
                            .await;
                        record(agg, name, retry);
                    }
                    DuplicateResolution::Skip => {
                        self.set_state(BatchState::Processing { index });
                        agg.record_skipped(name);
                    }
                }
            }
            None => record(agg, name, first),
        }

        if let Some(path) = staged {
            self.cleanup(&path).await;
        }
    }

    async fn dispatch(
        &self,
        file: &ImportableFile,
        staged: Option<&Path>,
        player: Option<&str>,
        version: &str,
        overwrite: bool,
    ) -> ImportStatus {
        let backend = self.backend.as_ref();
        let name = file.display_name.as_str();

        let call = match (file.kind, &file.payload) {
            (ImportKind::McWorld, payload) => {
                let path = match (staged, payload) {
                    (Some(p), _) => p,
                    (None, PayloadRef::Path(p)) => p.as_path(),
                    (None, PayloadRef::Bytes(_)) => {
                        return Err(ImportErrorCode::Other(String::new()));
                    }
                };
                let Some(player) = player else {
                    return Err(ImportErrorCode::NoPlayer);
                };
                backend.import_mcworld_path(version, player, path, overwrite).await
            }
            (ImportKind::McPack, PayloadRef::Bytes(data)) => {
                backend
                    .import_mcpack_bytes(version, player, name, data, overwrite)
                    .await
            }
            (ImportKind::McPack, PayloadRef::Path(path)) => {
                backend.import_mcpack_path(version, player, path, overwrite).await
            }
            (ImportKind::McAddon, PayloadRef::Bytes(data)) => {
                backend.import_mcaddon_bytes(version, player, data, overwrite).await
            }
            (ImportKind::McAddon, PayloadRef::Path(path)) => {
                backend.import_mcaddon_path(version, player, path, overwrite).await
            }
        };

        match call {
            Ok(raw) => ImportErrorCode::parse_status(&raw),
            Err(e) => {
                warn!("Import call failed for {}: {}", name, e);
                Err(ImportErrorCode::Other(e.to_string()))
            }
        }
    }

    async fn cleanup(&self, path: &Path) {
        if let Err(e) = self.backend.remove_temp_file(path).await {
            warn!("Failed to remove staged file {:?}: {}", path, e);
        }
    }
}

fn record(agg: &mut BatchAggregator, name: &str, status: ImportStatus) {
    match status {
        Ok(()) => {
            debug!("Import success: {}", name);
            agg.record_success(name);
        }
        Err(code) => {
            error!("Failed to import {}: {}", name, code);
            agg.record_failure(name, code);
        }
    }
}
