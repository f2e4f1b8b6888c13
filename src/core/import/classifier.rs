// src/core/import/classifier.rs
use tracing::{debug, warn};

use super::file::{ImportKind, ImportableFile, PayloadRef};
use crate::core::minecraft::backend::ContentBackend;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FileClass {
    Supported(ImportKind),
    Unsupported,
}

/// 按文件名后缀（不区分大小写）分类
pub fn classify(name: &str) -> FileClass {
    let lower = name.trim().to_ascii_lowercase();
    [ImportKind::McWorld, ImportKind::McPack, ImportKind::McAddon]
        .into_iter()
        .find(|k| lower.ends_with(&format!(".{}", k.extension())))
        .map(FileClass::Supported)
        .unwrap_or(FileClass::Unsupported)
}

/// 皮肤包探测结果
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SkinProbe {
    SkinPack,
    NotSkinPack,
    /// 后端不可用，按“非皮肤包”处理
    Unreachable,
}

impl SkinProbe {
    pub fn is_skin_pack(&self) -> bool {
        matches!(self, SkinProbe::SkinPack)
    }
}

/// 询问后端 .mcpack 是否为皮肤包；非 .mcpack 直接返回 NotSkinPack。
///
/// 后端出错时不中断批次，记一条 warn 并返回 Unreachable。
pub async fn probe_skin_pack(backend: &dyn ContentBackend, file: &ImportableFile) -> SkinProbe {
    if file.kind != ImportKind::McPack {
        return SkinProbe::NotSkinPack;
    }

    let answer = match &file.payload {
        PayloadRef::Bytes(data) => backend.is_mcpack_skin_pack(data).await,
        PayloadRef::Path(path) => backend.is_mcpack_skin_pack_path(path).await,
    };

    match answer {
        Ok(true) => {
            debug!(file = %file.display_name, "mcpack classified as skin pack");
            SkinProbe::SkinPack
        }
        Ok(false) => SkinProbe::NotSkinPack,
        Err(e) => {
            warn!(
                file = %file.display_name,
                error = %e,
                "skin pack probe failed, treating as ordinary pack"
            );
            SkinProbe::Unreachable
        }
    }
}
