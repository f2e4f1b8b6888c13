// 内容页的应用层：弹窗、生命周期、导入入口
pub mod content_page;
pub mod lifecycle;
pub mod modal;
pub mod terminal;

pub use content_page::ContentController;
pub use lifecycle::{run_startup_checks, AppLifecycle, BatchGuard, BatchLock, RunOnceGate};
pub use modal::{ModalPrompter, ModalView};
pub use terminal::TerminalInteraction;
