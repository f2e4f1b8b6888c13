// 内容导入流程：分类 -> 玩家解析 -> 逐个导入 -> 重复冲突 -> 汇总
pub mod aggregator;
pub mod classifier;
pub mod duplicate;
pub mod error_code;
pub mod file;
pub mod interaction;
pub mod orchestrator;
pub mod player;

#[cfg(test)]
pub(crate) mod testing;

pub use aggregator::{ImportOutcome, ImportSummary, OutcomeStatus};
pub use error_code::ImportErrorCode;
pub use file::{ImportKind, ImportableFile, PayloadRef, SourceKind};
pub use interaction::ImportInteraction;
pub use orchestrator::{BatchOptions, BatchReport, BatchState, ImportOrchestrator};
pub use player::PlayerPolicy;
