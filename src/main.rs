use anyhow::Context;
use clap::Parser;
use std::process;
use tracing::{debug, error, info};

use app_lib::cli::Cli;
use app_lib::config::config::{read_config, Config};
use app_lib::i18n::I18n;
use app_lib::utils::file_ops::{bmcbl_subdir, create_initial_directories};
use app_lib::utils::logger::init_logging;
use app_lib::utils::system_info::{get_system_language, system_summary};
use app_lib::utils::app_info;
use app_lib::{run, PreInit};

#[tokio::main(flavor = "multi_thread")]
async fn main() {
    let cli = Cli::parse();

    // 创建初始目录（同步）
    create_initial_directories();

    // 读取配置文件
    let config: Config = match read_config().context("读取配置失败") {
        Ok(c) => c,
        Err(e) => {
            eprintln!("{:?}", e);
            process::exit(1);
        }
    };

    // 日志初始化失败不影响导入
    if let Err(e) = init_logging(&bmcbl_subdir("logs"), cli.debug || config.launcher.debug) {
        eprintln!("日志初始化失败: {}", e);
    }

    // 语言：auto 跟随系统
    let locale = if config.launcher.language.trim().is_empty() || config.launcher.language == "auto" {
        get_system_language()
    } else {
        config.launcher.language.clone()
    };
    I18n::init(&locale);
    debug!("I18n initialized: requested={}, using={}", locale, I18n::current_locale());

    info!(
        "Starting {} v{} | {}",
        app_info::get_name(),
        app_info::get_version(),
        app_info::get_build_info().replace('\n', " | ")
    );
    info!("{}", system_summary());

    let code = match run(PreInit { config, locale }, cli).await {
        Ok(code) => code,
        Err(e) => {
            error!("{:?}", e);
            eprintln!("{:#}", e);
            1
        }
    };
    process::exit(code);
}
