// src/app/terminal.rs
use async_trait::async_trait;
use tokio::io::{AsyncBufReadExt, AsyncWriteExt, BufReader, Lines, Stdin};
use tokio::sync::Mutex;
use tracing::debug;

use crate::core::import::{ImportInteraction, ImportSummary};
use crate::i18n::tr;

/// 终端交互：提示写到 stderr，汇总写到 stdout，答复从 stdin 读
pub struct TerminalInteraction {
    input: Mutex<Lines<BufReader<Stdin>>>,
    non_interactive: bool,
}

impl TerminalInteraction {
    pub fn new(non_interactive: bool) -> Self {
        Self {
            input: Mutex::new(BufReader::new(tokio::io::stdin()).lines()),
            non_interactive,
        }
    }

    async fn ask(&self, prompt: &str) -> String {
        let mut err = tokio::io::stderr();
        let _ = err.write_all(prompt.as_bytes()).await;
        let _ = err.flush().await;

        let mut input = self.input.lock().await;
        match input.next_line().await {
            Ok(Some(line)) => line.trim().to_string(),
            // EOF 或读取失败按空输入处理
            Ok(None) => String::new(),
            Err(e) => {
                debug!("stdin read failed: {}", e);
                String::new()
            }
        }
    }
}

/// 玩家选择框的一次答复
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum PlayerAnswer {
    Chosen(String),
    /// 空输入
    Cancel,
    /// 不是列表里的序号或玩家名
    Unknown,
}

/// 序号（从 1 开始）或玩家名；列表为空时才接受任意名字
pub fn parse_player_answer(answer: &str, players: &[String]) -> PlayerAnswer {
    let answer = answer.trim();
    if answer.is_empty() {
        return PlayerAnswer::Cancel;
    }
    if players.is_empty() {
        return PlayerAnswer::Chosen(answer.to_string());
    }
    if let Ok(n) = answer.parse::<usize>() {
        if let Some(p) = n.checked_sub(1).and_then(|i| players.get(i)) {
            return PlayerAnswer::Chosen(p.clone());
        }
    }
    players
        .iter()
        .find(|p| p.eq_ignore_ascii_case(answer))
        .map(|p| PlayerAnswer::Chosen(p.clone()))
        .unwrap_or(PlayerAnswer::Unknown)
}

pub fn parse_yes(answer: &str) -> bool {
    matches!(answer.trim().to_ascii_lowercase().as_str(), "y" | "yes" | "是")
}

#[async_trait]
impl ImportInteraction for TerminalInteraction {
    async fn select_player(&self, players: &[String], current: Option<&str>) -> String {
        if self.non_interactive {
            return current.unwrap_or_default().to_string();
        }

        let mut prompt = String::new();
        if players.is_empty() {
            prompt.push_str(&tr("import-player-none", &[]));
            prompt.push('\n');
        } else {
            prompt.push_str(&tr("import-player-prompt", &[]));
            prompt.push('\n');
            for (i, p) in players.iter().enumerate() {
                let marker = if Some(p.as_str()) == current { "*" } else { " " };
                prompt.push_str(&format!(" {}{}. {}\n", marker, i + 1, p));
            }
        }
        prompt.push_str(&tr("import-player-prompt-hint", &[]));
        prompt.push_str("> ");

        loop {
            let answer = self.ask(&prompt).await;
            match parse_player_answer(&answer, players) {
                PlayerAnswer::Chosen(player) => return player,
                PlayerAnswer::Cancel => return String::new(),
                PlayerAnswer::Unknown => {
                    debug!("unknown player answer: {}", answer);
                    prompt = format!(
                        "{}\n> ",
                        tr("import-player-invalid", &[("name", answer.trim())])
                    );
                }
            }
        }
    }

    async fn confirm_overwrite(&self, name: &str) -> bool {
        if self.non_interactive {
            return false;
        }
        let prompt = format!("{} ", tr("import-duplicate-prompt", &[("name", name)]));
        parse_yes(&self.ask(&prompt).await)
    }

    fn report_progress(&self, current_file: Option<&str>) {
        if let Some(name) = current_file {
            eprintln!("{}", tr("import-progress", &[("name", name)]));
        }
    }

    fn present_summary(&self, summary: &ImportSummary) {
        for line in summary.render_lines() {
            println!("{}", line);
        }
    }

    fn present_error(&self, message: &str) {
        eprintln!("{}", message);
    }
}
