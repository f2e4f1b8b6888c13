// src/core/import/duplicate.rs
use tracing::{debug, info};

use super::error_code::{ImportErrorCode, ImportStatus};
use super::interaction::ImportInteraction;

/// 用户对重复冲突的答复
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DuplicateResolution {
    /// 带 overwrite=true 重试一次
    Overwrite,
    /// 跳过该文件，不计入成功或失败
    Skip,
}

/// 单个文件的重复冲突，只在一次导入调用返回重复类错误码时存在
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DuplicateConflict {
    pub conflicting_name: String,
    pub code: ImportErrorCode,
    /// 用户答复，询问前为 None
    pub resolution: Option<DuplicateResolution>,
}

impl DuplicateConflict {
    /// 仅当状态是 ERR_DUPLICATE_FOLDER / ERR_DUPLICATE_UUID 时产生冲突
    pub fn detect(name: &str, status: &ImportStatus) -> Option<Self> {
        match status {
            Err(code) if code.is_duplicate() => Some(Self {
                conflicting_name: name.to_string(),
                code: code.clone(),
                resolution: None,
            }),
            _ => None,
        }
    }

    /// 询问一次；已有答复时直接返回，不再提示
    pub async fn resolve(&mut self, interaction: &dyn ImportInteraction) -> DuplicateResolution {
        if let Some(resolution) = self.resolution {
            return resolution;
        }
        let resolution = if interaction.confirm_overwrite(&self.conflicting_name).await {
            info!("{} ({}), overwriting existing content", self.conflicting_name, self.code);
            DuplicateResolution::Overwrite
        } else {
            debug!("{} ({}), overwrite denied", self.conflicting_name, self.code);
            DuplicateResolution::Skip
        };
        self.resolution = Some(resolution);
        resolution
    }
}
