// 命令行子命令的处理函数
pub mod config;
pub mod content;
pub mod explain;
pub mod import;
