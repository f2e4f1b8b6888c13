pub mod app;
pub mod cli;
pub mod commands;
pub mod config;
pub mod core;
pub mod i18n;
pub mod result;
pub mod utils;

use anyhow::{Context, Result};
use std::sync::Arc;
use std::time::Duration;
use tracing::{debug, info};

use crate::cli::{Cli, Command, ConfigCommand};
use crate::commands::import::{run_import, ImportRequest, EXIT_OK};
use crate::config::config::Config;
use crate::core::minecraft::backend::ContentBackend;
use crate::core::minecraft::rpc::RpcBackend;
use crate::i18n::tr;

/// main 里读好的配置和语言
#[derive(Debug, Clone)]
pub struct PreInit {
    pub config: Config,
    pub locale: String,
}

fn connect_backend(preinit: &PreInit, cli: &Cli) -> Result<Arc<dyn ContentBackend>> {
    let endpoint = cli
        .endpoint
        .clone()
        .unwrap_or_else(|| preinit.config.backend.endpoint.clone());
    let timeout = Duration::from_secs(preinit.config.backend.connect_timeout_secs.max(1));
    let backend = RpcBackend::new(&endpoint, timeout)
        .with_context(|| format!("Invalid backend endpoint: {}", endpoint))?;
    debug!(endpoint = %backend.endpoint(), "backend ready");
    Ok(Arc::new(backend))
}

/// 执行一个子命令，返回进程退出码
pub async fn run(preinit: PreInit, cli: Cli) -> Result<i32> {
    info!(locale = %preinit.locale, command = ?cli.command, "dispatching command");

    match &cli.command {
        Command::Import {
            game_version,
            player,
            non_interactive,
            in_memory,
            dropped,
            files,
        } => {
            let backend = connect_backend(&preinit, &cli)?;
            let req = ImportRequest {
                game_version: game_version.clone(),
                player: player.clone(),
                non_interactive: *non_interactive,
                in_memory: *in_memory,
                dropped: *dropped,
                files: files.clone(),
            };
            run_import(backend, &preinit.config, req).await
        }
        Command::Counts { game_version, player } => {
            let backend = connect_backend(&preinit, &cli)?;
            let snapshot = commands::content::load_snapshot(backend, game_version, player.as_deref()).await?;
            if snapshot.selected_player.is_empty() {
                println!("{}", tr("import-player-none", &[]));
            } else {
                println!("{}", snapshot.selected_player);
            }
            println!("{}", snapshot.counts.render());
            Ok(EXIT_OK)
        }
        Command::Players { game_version } => {
            let backend = connect_backend(&preinit, &cli)?;
            let snapshot = commands::content::load_snapshot(backend, game_version, None).await?;
            if snapshot.players.is_empty() {
                println!("{}", tr("import-player-none", &[]));
            }
            for line in commands::content::render_players(&snapshot) {
                println!("{}", line);
            }
            Ok(EXIT_OK)
        }
        Command::Explain { code } => {
            println!("{}", commands::explain::explain_code(code));
            Ok(EXIT_OK)
        }
        Command::Config { command } => {
            match command {
                ConfigCommand::Get { key } => {
                    let value = commands::config::get_config(key.as_deref())?;
                    println!("{}", serde_json::to_string_pretty(&value)?);
                }
                ConfigCommand::Set { key, value } => {
                    commands::config::set_config(key, value)?;
                    info!(key = %key, "config updated");
                }
            }
            Ok(EXIT_OK)
        }
    }
}
