// src/core/import/interaction.rs
use async_trait::async_trait;

use super::aggregator::ImportSummary;

/// 批次运行期间与用户交互的接口（弹窗 / 终端）
#[async_trait]
pub trait ImportInteraction: Send + Sync {
    /// 返回选中的玩家；空字符串表示取消
    async fn select_player(&self, players: &[String], current: Option<&str>) -> String;

    /// 是否覆盖同名内容
    async fn confirm_overwrite(&self, name: &str) -> bool;

    /// 正在导入的文件；None 表示导入结束
    fn report_progress(&self, _current_file: Option<&str>) {}

    fn present_summary(&self, _summary: &ImportSummary) {}

    fn present_error(&self, _message: &str) {}
}
