// src/app/modal.rs
use async_trait::async_trait;
use serde::Serialize;
use std::sync::Mutex;
use tokio::sync::{oneshot, watch};
use tracing::debug;

use crate::core::import::{ImportInteraction, ImportSummary};

/// 当前显示的弹窗，每个状态只携带自己需要的数据
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum ModalView {
    Hidden,
    Importing { current_file: String },
    PlayerSelect { players: Vec<String>, preselected: Option<String> },
    DuplicateConfirm { name: String },
    ImportSummary { summary: ImportSummary },
    Error { message: String },
    GameInputMissing,
    GamingServicesMissing,
}

enum PendingPrompt {
    Player {
        tx: oneshot::Sender<String>,
        players: Vec<String>,
    },
    Overwrite(oneshot::Sender<bool>),
}

/// 弹窗驱动的交互层
///
/// 视图通过 watch 发布给 UI；阻塞式提示挂在 oneshot 上，由 UI 调用 `choose_player` /
/// `answer_overwrite` / `dismiss` 回答。提示被丢弃时，玩家选择视为取消，覆盖确认视为“否”。
pub struct ModalPrompter {
    view: watch::Sender<ModalView>,
    pending: Mutex<Option<PendingPrompt>>,
}

impl Default for ModalPrompter {
    fn default() -> Self {
        Self::new()
    }
}

impl ModalPrompter {
    pub fn new() -> Self {
        let (view, _) = watch::channel(ModalView::Hidden);
        Self {
            view,
            pending: Mutex::new(None),
        }
    }

    pub fn subscribe(&self) -> watch::Receiver<ModalView> {
        self.view.subscribe()
    }

    pub fn current(&self) -> ModalView {
        self.view.borrow().clone()
    }

    pub fn show(&self, view: ModalView) {
        debug!(?view, "modal");
        self.view.send_replace(view);
    }

    fn park(&self, prompt: PendingPrompt) {
        let mut pending = self.pending.lock().unwrap_or_else(|e| e.into_inner());
        // 旧提示被替换时随之丢弃
        *pending = Some(prompt);
    }

    fn take(&self) -> Option<PendingPrompt> {
        self.pending.lock().unwrap_or_else(|e| e.into_inner()).take()
    }

    /// 回答玩家选择框；没有等待中的玩家选择时返回 false
    ///
    /// 空字符串即取消。列表不为空时只接受列表里的玩家，其他名字被拒绝且选择框保持打开。
    pub fn choose_player(&self, player: &str) -> bool {
        match self.take() {
            Some(PendingPrompt::Player { tx, players }) => {
                if !player.is_empty() && !players.is_empty() && !players.iter().any(|p| p == player) {
                    debug!("player {} is not offered, ignored", player);
                    self.park(PendingPrompt::Player { tx, players });
                    return false;
                }
                self.show(ModalView::Hidden);
                tx.send(player.to_string()).is_ok()
            }
            Some(other) => {
                self.park(other);
                false
            }
            None => false,
        }
    }

    /// 回答覆盖确认框；没有等待中的确认时返回 false
    pub fn answer_overwrite(&self, overwrite: bool) -> bool {
        match self.take() {
            Some(PendingPrompt::Overwrite(tx)) => {
                self.show(ModalView::Hidden);
                tx.send(overwrite).is_ok()
            }
            Some(other) => {
                self.park(other);
                false
            }
            None => false,
        }
    }

    /// 关闭当前弹窗；挂起的提示按取消 / 否处理
    pub fn dismiss(&self) {
        drop(self.take());
        self.show(ModalView::Hidden);
    }
}

#[async_trait]
impl ImportInteraction for ModalPrompter {
    async fn select_player(&self, players: &[String], current: Option<&str>) -> String {
        let (tx, rx) = oneshot::channel();
        self.park(PendingPrompt::Player {
            tx,
            players: players.to_vec(),
        });
        self.show(ModalView::PlayerSelect {
            players: players.to_vec(),
            preselected: current.map(|c| c.to_string()),
        });
        rx.await.unwrap_or_default()
    }

    async fn confirm_overwrite(&self, name: &str) -> bool {
        let (tx, rx) = oneshot::channel();
        self.park(PendingPrompt::Overwrite(tx));
        self.show(ModalView::DuplicateConfirm {
            name: name.to_string(),
        });
        rx.await.unwrap_or(false)
    }

    fn report_progress(&self, current_file: Option<&str>) {
        match current_file {
            Some(name) => self.show(ModalView::Importing {
                current_file: name.to_string(),
            }),
            None => {
                if matches!(self.current(), ModalView::Importing { .. }) {
                    self.show(ModalView::Hidden);
                }
            }
        }
    }

    fn present_summary(&self, summary: &ImportSummary) {
        self.show(ModalView::ImportSummary {
            summary: summary.clone(),
        });
    }

    fn present_error(&self, message: &str) {
        self.show(ModalView::Error {
            message: message.to_string(),
        });
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::Arc;

    async fn wait_for(rx: &mut watch::Receiver<ModalView>, pred: impl Fn(&ModalView) -> bool) {
        loop {
            if pred(&rx.borrow_and_update()) {
                return;
            }
            rx.changed().await.unwrap();
        }
    }

    #[tokio::test]
    async fn test_player_prompt_roundtrip() {
        let modal = Arc::new(ModalPrompter::new());
        let mut rx = modal.subscribe();
        let players = vec!["Steve".to_string(), "Alex".to_string()];

        let m = modal.clone();
        let task = tokio::spawn(async move { m.select_player(&players, Some("Alex")).await });

        wait_for(&mut rx, |v| matches!(v, ModalView::PlayerSelect { .. })).await;
        assert_eq!(
            modal.current(),
            ModalView::PlayerSelect {
                players: vec!["Steve".into(), "Alex".into()],
                preselected: Some("Alex".into()),
            }
        );
        // 没有覆盖确认在等待
        assert!(!modal.answer_overwrite(true));
        // 不在列表里的名字不会结束选择
        assert!(!modal.choose_player("Stve"));
        assert!(matches!(modal.current(), ModalView::PlayerSelect { .. }));
        assert!(modal.choose_player("Steve"));

        assert_eq!(task.await.unwrap(), "Steve");
        assert_eq!(modal.current(), ModalView::Hidden);
    }

    #[tokio::test]
    async fn test_dismiss_means_no() {
        let modal = Arc::new(ModalPrompter::new());
        let mut rx = modal.subscribe();

        let m = modal.clone();
        let task = tokio::spawn(async move { m.confirm_overwrite("w.mcworld").await });
        wait_for(&mut rx, |v| matches!(v, ModalView::DuplicateConfirm { .. })).await;
        modal.dismiss();
        assert!(!task.await.unwrap());

        let m = modal.clone();
        let task = tokio::spawn(async move { m.select_player(&[], None).await });
        wait_for(&mut rx, |v| matches!(v, ModalView::PlayerSelect { .. })).await;
        modal.dismiss();
        assert_eq!(task.await.unwrap(), "");
    }

    #[test]
    fn test_progress_then_summary() {
        let modal = ModalPrompter::new();
        modal.report_progress(Some("a.mcpack"));
        assert_eq!(
            modal.current(),
            ModalView::Importing {
                current_file: "a.mcpack".into()
            }
        );
        modal.report_progress(None);
        assert_eq!(modal.current(), ModalView::Hidden);

        modal.present_summary(&ImportSummary::default());
        modal.report_progress(None);
        // 结束进度不会关掉汇总框
        assert!(matches!(modal.current(), ModalView::ImportSummary { .. }));
    }

    #[test]
    fn test_view_serializes_tagged() {
        let v = serde_json::to_value(ModalView::DuplicateConfirm { name: "x".into() }).unwrap();
        assert_eq!(v["kind"], "duplicate_confirm");
        assert_eq!(v["name"], "x");
    }
}
