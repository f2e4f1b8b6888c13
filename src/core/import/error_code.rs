// src/core/import/error_code.rs
use serde::{Deserialize, Deserializer, Serialize, Serializer};
use std::fmt;

use crate::i18n::tr;

/// 后端导入接口返回的错误码
///
/// 后端约定：空字符串表示成功，其余为错误码；不在固定词表里的字符串原样保留。
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub enum ImportErrorCode {
    NoPlayer,
    InvalidName,
    AccessVersionsDir,
    CreateTargetDir,
    OpenZip,
    ManifestNotFound,
    InvalidPackage,
    DuplicateFolder,
    DuplicateUuid,
    ReadZipEntry,
    WriteFile,
    /// 未知错误码或异常信息，原样展示；空串展示为“未知错误”
    Other(String),
}

/// 单次导入调用的结果
pub type ImportStatus = Result<(), ImportErrorCode>;

const KNOWN_CODES: &[(&str, ImportErrorCode)] = &[
    ("ERR_NO_PLAYER", ImportErrorCode::NoPlayer),
    ("ERR_INVALID_NAME", ImportErrorCode::InvalidName),
    ("ERR_ACCESS_VERSIONS_DIR", ImportErrorCode::AccessVersionsDir),
    ("ERR_CREATE_TARGET_DIR", ImportErrorCode::CreateTargetDir),
    ("ERR_OPEN_ZIP", ImportErrorCode::OpenZip),
    ("ERR_MANIFEST_NOT_FOUND", ImportErrorCode::ManifestNotFound),
    ("ERR_INVALID_PACKAGE", ImportErrorCode::InvalidPackage),
    ("ERR_DUPLICATE_FOLDER", ImportErrorCode::DuplicateFolder),
    ("ERR_DUPLICATE_UUID", ImportErrorCode::DuplicateUuid),
    ("ERR_READ_ZIP_ENTRY", ImportErrorCode::ReadZipEntry),
    ("ERR_WRITE_FILE", ImportErrorCode::WriteFile),
];

impl ImportErrorCode {
    /// 解析后端返回值：空串 -> Ok(())
    pub fn parse_status(raw: &str) -> ImportStatus {
        let code = raw.trim();
        if code.is_empty() {
            return Ok(());
        }
        Err(ImportErrorCode::from_code(code))
    }

    /// 把非空错误码映射到枚举，未知码保留原文
    pub fn from_code(code: &str) -> Self {
        let trimmed = code.trim();
        KNOWN_CODES
            .iter()
            .find(|(s, _)| *s == trimmed)
            .map(|(_, c)| c.clone())
            .unwrap_or_else(|| ImportErrorCode::Other(code.to_string()))
    }

    pub fn as_str(&self) -> &str {
        match self {
            ImportErrorCode::Other(s) => s.as_str(),
            known => KNOWN_CODES
                .iter()
                .find(|(_, c)| c == known)
                .map(|(s, _)| *s)
                .unwrap_or_default(),
        }
    }

    /// 同名文件夹 / 同 UUID 冲突，可通过覆盖重试解决
    pub fn is_duplicate(&self) -> bool {
        matches!(
            self,
            ImportErrorCode::DuplicateFolder | ImportErrorCode::DuplicateUuid
        )
    }

    /// Fluent 消息 id；原样展示的未知码返回 None
    pub fn message_key(&self) -> Option<&'static str> {
        Some(match self {
            ImportErrorCode::NoPlayer => "import-err-no-player",
            ImportErrorCode::InvalidName => "import-err-invalid-name",
            ImportErrorCode::AccessVersionsDir => "import-err-access-versions-dir",
            ImportErrorCode::CreateTargetDir => "import-err-create-target-dir",
            ImportErrorCode::OpenZip => "import-err-open-zip",
            ImportErrorCode::ManifestNotFound => "import-err-manifest-not-found",
            ImportErrorCode::InvalidPackage => "import-err-invalid-package",
            ImportErrorCode::DuplicateFolder => "import-err-duplicate-folder",
            ImportErrorCode::DuplicateUuid => "import-err-duplicate-uuid",
            ImportErrorCode::ReadZipEntry => "import-err-read-zip-entry",
            ImportErrorCode::WriteFile => "import-err-write-file",
            ImportErrorCode::Other(s) if s.trim().is_empty() => "import-err-unknown",
            ImportErrorCode::Other(_) => return None,
        })
    }

    /// 面向用户的本地化描述
    pub fn localized(&self) -> String {
        match self.message_key() {
            Some(key) => tr(key, &[]),
            None => self.as_str().to_string(),
        }
    }
}

impl fmt::Display for ImportErrorCode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl Serialize for ImportErrorCode {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.serialize_str(self.as_str())
    }
}

impl<'de> Deserialize<'de> for ImportErrorCode {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        let raw = String::deserialize(deserializer)?;
        Ok(ImportErrorCode::from_code(&raw))
    }
}
