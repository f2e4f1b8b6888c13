// src/core/import/file.rs
use std::fmt;
use std::path::{Path, PathBuf};
use std::sync::Arc;

use serde::Serialize;

use super::classifier::{classify, FileClass};

/// 文件来自哪个入口
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum SourceKind {
    PickedFile,
    DroppedFile,
    /// 文件管理器页回传的路径（后端可直接读取）
    TempPathFromExternalManager,
}

/// 待导入的数据：内存字节或后端可读的路径
#[derive(Clone)]
pub enum PayloadRef {
    Bytes(Arc<[u8]>),
    Path(PathBuf),
}

impl fmt::Debug for PayloadRef {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            PayloadRef::Bytes(b) => write!(f, "Bytes({} bytes)", b.len()),
            PayloadRef::Path(p) => write!(f, "Path({})", p.display()),
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
pub enum ImportKind {
    McWorld,
    McPack,
    McAddon,
}

impl ImportKind {
    pub fn extension(&self) -> &'static str {
        match self {
            ImportKind::McWorld => "mcworld",
            ImportKind::McPack => "mcpack",
            ImportKind::McAddon => "mcaddon",
        }
    }
}

/// 取路径最后一段作为展示名，兼容 Windows 反斜杠
pub fn display_name_of(raw: &str) -> String {
    let normalized = raw.replace('\\', "/");
    normalized
        .rsplit('/')
        .find(|seg| !seg.is_empty())
        .map(|s| s.to_string())
        .unwrap_or_else(|| raw.to_string())
}

/// 一个待导入单元
#[derive(Debug, Clone)]
pub struct ImportableFile {
    pub source_kind: SourceKind,
    pub display_name: String,
    pub kind: ImportKind,
    pub payload: PayloadRef,
}

impl ImportableFile {
    /// 内存文件（选择器 / 拖放）；不支持的后缀返回 None
    pub fn from_bytes(
        name: &str,
        bytes: impl Into<Arc<[u8]>>,
        source_kind: SourceKind,
    ) -> Option<Self> {
        let display_name = display_name_of(name);
        match classify(&display_name) {
            FileClass::Supported(kind) => Some(Self {
                source_kind,
                display_name,
                kind,
                payload: PayloadRef::Bytes(bytes.into()),
            }),
            FileClass::Unsupported => None,
        }
    }

    /// 路径文件；不支持的后缀返回 None
    pub fn from_path(path: impl AsRef<Path>, source_kind: SourceKind) -> Option<Self> {
        let path = path.as_ref();
        let display_name = display_name_of(&path.to_string_lossy());
        match classify(&display_name) {
            FileClass::Supported(kind) => Some(Self {
                source_kind,
                display_name,
                kind,
                payload: PayloadRef::Path(path.to_path_buf()),
            }),
            FileClass::Unsupported => None,
        }
    }

    pub fn is_world(&self) -> bool {
        self.kind == ImportKind::McWorld
    }
}
