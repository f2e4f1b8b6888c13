use thiserror::Error;
use tracing::error;

/// 核心错误类型
///
/// 后端导入调用返回的错误码（`ERR_*`）不走这里，它们会被收敛成单个文件的导入结果，
/// 见 [`crate::core::import::error_code::ImportErrorCode`]。
#[derive(Debug, Error)]
pub enum CoreError {
    #[error("Request error: {0}")]
    Request(#[from] reqwest::Error),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    #[error("Invalid URL: {0}")]
    Url(#[from] url::ParseError),

    /// 后端 RPC 调用本身失败（方法不存在、参数错误、后端 panic 等）
    #[error("Backend call {method} failed: {message}")]
    Backend { method: String, message: String },

    #[error("Config error: {0}")]
    Config(String),

    #[error("No version selected")]
    NoVersionSelected,

    #[error("An import batch is already running")]
    BatchInProgress,
}

/// 核心结果类型
#[derive(Debug)]
pub enum CoreResult<T = ()> {
    Success(T),
    Cancelled,
    Error(CoreError),
}

impl<T> CoreResult<T> {
    pub fn success(value: T) -> Self {
        CoreResult::Success(value)
    }

    pub fn cancelled() -> Self {
        CoreResult::Cancelled
    }

    pub fn error(err: CoreError) -> Self {
        CoreResult::Error(err)
    }

    pub fn is_cancelled(&self) -> bool {
        matches!(self, CoreResult::Cancelled)
    }

    /// 取出成功值；取消或出错时返回 None
    pub fn success_value(self) -> Option<T> {
        match self {
            CoreResult::Success(v) => Some(v),
            _ => None,
        }
    }
}

impl<T> From<Result<T, CoreError>> for CoreResult<T> {
    fn from(r: Result<T, CoreError>) -> Self {
        match r {
            Ok(v) => CoreResult::Success(v),
            Err(e) => {
                error!("core error: {}", e);
                CoreResult::Error(e)
            }
        }
    }
}
