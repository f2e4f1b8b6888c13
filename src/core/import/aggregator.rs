// src/core/import/aggregator.rs
use serde::Serialize;

use super::error_code::ImportErrorCode;
use crate::i18n::tr;

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(tag = "status", content = "code", rename_all = "snake_case")]
pub enum OutcomeStatus {
    Succeeded,
    Failed(ImportErrorCode),
    /// 用户拒绝覆盖，不出现在成功或失败列表里
    Skipped,
}

/// 每个进入处理阶段的文件对应一条
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ImportOutcome {
    pub name: String,
    #[serde(flatten)]
    pub status: OutcomeStatus,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct FailedImport {
    pub name: String,
    pub code: ImportErrorCode,
}

/// 批次的最终汇总
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct ImportSummary {
    /// 按输入顺序
    pub outcomes: Vec<ImportOutcome>,
    pub succeeded: Vec<String>,
    pub failed: Vec<FailedImport>,
    pub skipped: Vec<String>,
    pub skin_probe_failures: usize,
}

impl ImportSummary {
    /// 只有成功或失败时才展示；全部跳过不弹窗
    pub fn should_present(&self) -> bool {
        !self.succeeded.is_empty() || !self.failed.is_empty()
    }

    pub fn has_failures(&self) -> bool {
        !self.failed.is_empty()
    }

    pub fn title_key(&self) -> &'static str {
        if self.has_failures() {
            "import-summary-title-partial"
        } else {
            "import-summary-title-done"
        }
    }

    /// 本地化后的汇总文本，逐行
    pub fn render_lines(&self) -> Vec<String> {
        let mut lines = vec![tr(self.title_key(), &[])];

        if !self.succeeded.is_empty() {
            let count = self.succeeded.len().to_string();
            lines.push(tr("import-summary-succeeded", &[("count", &count)]));
            lines.extend(self.succeeded.iter().map(|n| format!("  {}", n)));
        }

        if !self.failed.is_empty() {
            let count = self.failed.len().to_string();
            lines.push(tr("import-summary-failed", &[("count", &count)]));
            for f in &self.failed {
                let message = f.code.localized();
                lines.push(format!(
                    "  {}",
                    tr("import-summary-line", &[("name", &f.name), ("message", &message)])
                ));
            }
        }
        lines
    }
}

/// 逐文件累积结果
#[derive(Debug, Default)]
pub struct BatchAggregator {
    summary: ImportSummary,
}

impl BatchAggregator {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn record_success(&mut self, name: &str) {
        self.summary.succeeded.push(name.to_string());
        self.push(name, OutcomeStatus::Succeeded);
    }

    pub fn record_failure(&mut self, name: &str, code: ImportErrorCode) {
        self.summary.failed.push(FailedImport {
            name: name.to_string(),
            code: code.clone(),
        });
        self.push(name, OutcomeStatus::Failed(code));
    }

    pub fn record_skipped(&mut self, name: &str) {
        self.summary.skipped.push(name.to_string());
        self.push(name, OutcomeStatus::Skipped);
    }

    pub fn note_probe_failures(&mut self, count: usize) {
        self.summary.skin_probe_failures += count;
    }

    pub fn finalize(self) -> ImportSummary {
        self.summary
    }

    fn push(&mut self, name: &str, status: OutcomeStatus) {
        self.summary.outcomes.push(ImportOutcome {
            name: name.to_string(),
            status,
        });
    }
}
