use anyhow::Result;
use std::path::{Path, PathBuf};
use std::sync::Arc;
use tracing::{info, warn};

use crate::app::{run_startup_checks, AppLifecycle, ContentController, ModalView, TerminalInteraction};
use crate::config::config::Config;
use crate::core::import::classifier::{classify, FileClass};
use crate::core::import::file::display_name_of;
use crate::core::import::{BatchReport, PlayerPolicy};
use crate::core::minecraft::backend::ContentBackend;
use crate::i18n::tr;
use crate::result::CoreResult;

/// `import` 子命令的参数
#[derive(Debug, Clone, Default)]
pub struct ImportRequest {
    pub game_version: String,
    pub player: Option<String>,
    pub non_interactive: bool,
    pub in_memory: bool,
    pub dropped: bool,
    pub files: Vec<PathBuf>,
}

/// 进程退出码
pub const EXIT_OK: i32 = 0;
pub const EXIT_FAILED: i32 = 1;
pub const EXIT_CANCELLED: i32 = 2;

fn notice_text(view: &ModalView) -> Option<String> {
    match view {
        ModalView::GameInputMissing => Some(tr("gameinput-missing", &[])),
        ModalView::GamingServicesMissing => Some(tr("gamingservices-missing", &[])),
        _ => None,
    }
}

fn absolutize(path: &Path) -> PathBuf {
    if path.is_absolute() {
        return path.to_path_buf();
    }
    std::env::current_dir()
        .map(|cwd| cwd.join(path))
        .unwrap_or_else(|_| path.to_path_buf())
}

/// 不支持的文件只提示，不进入批次
fn warn_unsupported(files: &[PathBuf]) -> usize {
    let mut supported = 0;
    for f in files {
        let name = display_name_of(&f.to_string_lossy());
        match classify(&name) {
            FileClass::Supported(_) => supported += 1,
            FileClass::Unsupported => warn!(file = %name, "unsupported file ignored"),
        }
    }
    supported
}

/// 读取内存导入的文件内容；读不了的文件只提示并跳过，返回其文件名
async fn read_payloads(paths: &[PathBuf]) -> (Vec<(String, Vec<u8>)>, Vec<String>) {
    let mut files = Vec::with_capacity(paths.len());
    let mut failed = Vec::new();
    for path in paths {
        let name = display_name_of(&path.to_string_lossy());
        if classify(&name) == FileClass::Unsupported {
            continue;
        }
        match tokio::fs::read(path).await {
            Ok(bytes) => files.push((name, bytes)),
            Err(e) => {
                warn!("Failed to read {}: {}", path.display(), e);
                let message = e.to_string();
                eprintln!(
                    "{}",
                    tr("import-read-failed", &[("name", &name), ("message", &message)])
                );
                failed.push(name);
            }
        }
    }
    (files, failed)
}

pub fn exit_code_for(result: &CoreResult<BatchReport>) -> i32 {
    match result {
        CoreResult::Success(report) if report.summary.has_failures() => EXIT_FAILED,
        CoreResult::Success(_) => EXIT_OK,
        CoreResult::Cancelled => EXIT_CANCELLED,
        CoreResult::Error(_) => EXIT_FAILED,
    }
}

pub async fn run_import(backend: Arc<dyn ContentBackend>, config: &Config, req: ImportRequest) -> Result<i32> {
    let non_interactive = req.non_interactive || config.import.non_interactive;
    let interaction = Arc::new(TerminalInteraction::new(non_interactive));
    let lifecycle = Arc::new(AppLifecycle::new());

    for view in run_startup_checks(&lifecycle, backend.as_ref(), config.launcher.ignore_gaming_services).await {
        if let Some(text) = notice_text(&view) {
            eprintln!("{}", text);
        }
    }

    if warn_unsupported(&req.files) == 0 {
        eprintln!("{}", tr("import-nothing", &[]));
        return Ok(EXIT_OK);
    }

    let policy = if non_interactive {
        PlayerPolicy::UseCurrent
    } else {
        PlayerPolicy::Prompt
    };
    let controller = ContentController::new(backend, interaction.clone(), lifecycle, req.game_version.clone())
        .with_player_policy(policy);

    match controller.refresh(req.player.as_deref()).await {
        Ok(_) => {
            if let Some(p) = req.player.as_deref() {
                controller.change_player(p).await;
            }
        }
        Err(e) => warn!("content refresh failed: {}", e),
    }

    let mut unreadable = 0;
    let result = if req.in_memory {
        let (files, failed) = read_payloads(&req.files).await;
        unreadable = failed.len();
        if files.is_empty() && unreadable > 0 {
            return Ok(EXIT_FAILED);
        }
        if req.dropped {
            controller.import_dropped_files(files).await
        } else {
            controller.import_picked_files(files).await
        }
    } else {
        let paths = req.files.iter().map(|p| absolutize(p)).collect();
        match controller.import_from_file_manager(paths).await {
            Some(r) => r,
            None => return Ok(EXIT_OK),
        }
    };

    if result.is_cancelled() {
        eprintln!("{}", tr("import-cancelled", &[]));
    }
    let mut code = exit_code_for(&result);
    if unreadable > 0 && code == EXIT_OK {
        code = EXIT_FAILED;
    }
    info!(exit_code = code, "import command finished");
    Ok(code)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::import::aggregator::BatchAggregator;
    use crate::core::import::player::PlayerRequirement;
    use crate::core::import::ImportErrorCode;
    use crate::result::CoreError;
    use uuid::Uuid;

    fn report(failed: bool) -> BatchReport {
        let mut agg = BatchAggregator::new();
        agg.record_success("a.mcpack");
        if failed {
            agg.record_failure("b.mcpack", ImportErrorCode::OpenZip);
        }
        BatchReport {
            batch_id: Uuid::new_v4(),
            summary: agg.finalize(),
            chosen_player: None,
            requirement: PlayerRequirement::default(),
        }
    }

    #[test]
    fn test_exit_codes() {
        assert_eq!(exit_code_for(&CoreResult::success(report(false))), EXIT_OK);
        assert_eq!(exit_code_for(&CoreResult::success(report(true))), EXIT_FAILED);
        assert_eq!(exit_code_for(&CoreResult::cancelled()), EXIT_CANCELLED);
        assert_eq!(
            exit_code_for(&CoreResult::error(CoreError::BatchInProgress)),
            EXIT_FAILED
        );
    }

    #[test]
    fn test_unsupported_are_counted_out() {
        let files = vec![PathBuf::from("a.mcpack"), PathBuf::from("readme.md")];
        assert_eq!(warn_unsupported(&files), 1);
        assert!(absolutize(Path::new("x.mcworld")).is_absolute());
    }

    #[tokio::test]
    async fn test_unreadable_file_does_not_stop_others() {
        let dir = tempfile::tempdir().unwrap();
        let good = dir.path().join("good.mcpack");
        std::fs::write(&good, b"PK").unwrap();
        let missing = dir.path().join("gone.mcworld");
        let ignored = dir.path().join("notes.txt");

        let (files, failed) = read_payloads(&[missing, good, ignored]).await;
        assert_eq!(files, vec![("good.mcpack".to_string(), b"PK".to_vec())]);
        assert_eq!(failed, vec!["gone.mcworld"]);
    }

    #[test]
    fn test_notice_text() {
        assert!(notice_text(&ModalView::GameInputMissing).is_some());
        assert!(notice_text(&ModalView::Hidden).is_none());
    }
}
