pub mod app_info;
pub mod file_ops;
pub mod logger;
pub mod system_info;
