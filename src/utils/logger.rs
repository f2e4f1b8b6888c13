use chrono::Local;
use once_cell::sync::Lazy;
use std::fs::{create_dir_all, File, OpenOptions};
use std::io;
use std::path::{Path, PathBuf};
use std::sync::Mutex;
use std::time::Instant;
use tracing_subscriber::fmt::format::Writer;
use tracing_subscriber::fmt::time::FormatTime;
use tracing_subscriber::layer::SubscriberExt;
use tracing_subscriber::util::SubscriberInitExt;
use tracing_subscriber::EnvFilter;

// 程序启动时间
static START_TIME: Lazy<Instant> = Lazy::new(Instant::now);

// 自定义启动时间计时器
struct UptimeTimer;

impl FormatTime for UptimeTimer {
    fn format_time(&self, w: &mut Writer<'_>) -> Result<(), std::fmt::Error> {
        write!(w, "{}", elapsed_time())
    }
}

// 返回程序启动后的运行时间
fn elapsed_time() -> String {
    let elapsed = START_TIME.elapsed();
    let millis = elapsed.as_millis();
    let seconds = millis / 1000;
    let minutes = seconds / 60;
    let hours = minutes / 60;

    let millis = millis % 1000;
    let seconds = seconds % 60;
    let minutes = minutes % 60;
    let hours = hours % 24;

    format!("{:02}:{:02}:{:02}.{:03}", hours, minutes, seconds, millis)
}

fn open_append(path: &Path) -> io::Result<File> {
    OpenOptions::new().create(true).append(true).open(path)
}

/// 当天的日志文件 logs/YYYY-MM-DD.log
pub fn daily_log_path(logs_dir: &Path) -> PathBuf {
    logs_dir.join(format!("{}.log", Local::now().format("%Y-%m-%d")))
}

// 初始化日志系统：控制台(stderr) + 按日期文件 + latest.log
pub fn init_logging(logs_dir: &Path, debug_enabled: bool) -> io::Result<()> {
    let latest_log_file = logs_dir.join("latest.log");

    // 确保日志目录存在
    create_dir_all(logs_dir)?;

    // 清空 `latest.log`
    OpenOptions::new()
        .create(true)
        .write(true)
        .truncate(true)
        .open(&latest_log_file)?;

    // 设置日志级别，RUST_LOG 优先
    let log_level = if debug_enabled { "debug" } else { "info" };

    // 控制台层；stdout 留给导入汇总
    let console_layer = tracing_subscriber::fmt::layer()
        .with_timer(UptimeTimer)
        .with_ansi(true)
        .with_target(true)
        .with_writer(io::stderr);

    // 文件层 - 按日期记录日志
    let file_layer = tracing_subscriber::fmt::layer()
        .with_timer(UptimeTimer)
        .with_ansi(false)
        .with_target(true)
        .with_writer(Mutex::new(open_append(&daily_log_path(logs_dir))?));

    // 文件层 - latest.log
    let latest_log_layer = tracing_subscriber::fmt::layer()
        .with_timer(UptimeTimer)
        .with_ansi(false)
        .with_target(true)
        .with_writer(Mutex::new(open_append(&latest_log_file)?));

    tracing_subscriber::registry()
        .with(EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(log_level)))
        .with(console_layer)
        .with(file_layer)
        .with(latest_log_layer)
        .try_init()
        .map_err(|e| io::Error::new(io::ErrorKind::AlreadyExists, e.to_string()))
}
