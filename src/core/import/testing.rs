// 测试用的脚本化后端与交互层
use async_trait::async_trait;
use std::collections::{HashMap, HashSet, VecDeque};
use std::path::{Path, PathBuf};
use std::sync::{Arc, Mutex};

use super::aggregator::ImportSummary;
use super::file::display_name_of;
use super::interaction::ImportInteraction;
use crate::core::minecraft::backend::{ContentBackend, ContentRoots, FileEntry};
use crate::result::CoreError;

/// 后端调用与交互事件按发生顺序写入同一份日志
pub(crate) type Journal = Arc<Mutex<Vec<String>>>;

#[derive(Debug, Clone, PartialEq, Eq)]
pub(crate) struct Call {
    pub method: &'static str,
    pub target: String,
    pub player: Option<String>,
    pub overwrite: bool,
}

#[derive(Default)]
pub(crate) struct MockBackend {
    scripted: Mutex<HashMap<String, VecDeque<Result<String, String>>>>,
    skins: HashMap<String, Result<bool, String>>,
    registered: Mutex<HashSet<String>>,
    roots: ContentRoots,
    dirs: HashMap<String, Vec<FileEntry>>,
    game_input: bool,
    gaming_services: bool,
    stage_error: Option<String>,
    remove_error: Option<String>,
    pub calls: Mutex<Vec<Call>>,
    pub journal: Journal,
}

impl MockBackend {
    pub fn new() -> Self {
        Self {
            game_input: true,
            gaming_services: true,
            ..Default::default()
        }
    }

    /// 内存文件的内容直接用文件名，方便 mock 反查
    pub fn payload_for(name: &str) -> Vec<u8> {
        name.as_bytes().to_vec()
    }

    pub fn with_journal(mut self, journal: Journal) -> Self {
        self.journal = journal;
        self
    }

    /// 为某个文件依次返回的错误码；脚本耗尽后回到默认的注册表行为
    pub fn with_results(self, name: &str, codes: &[&str]) -> Self {
        self.scripted
            .lock()
            .unwrap()
            .entry(name.to_string())
            .or_default()
            .extend(codes.iter().map(|c| Ok(c.to_string())));
        self
    }

    pub fn with_transport_error(self, name: &str, message: &str) -> Self {
        self.scripted
            .lock()
            .unwrap()
            .entry(name.to_string())
            .or_default()
            .push_back(Err(message.to_string()));
        self
    }

    pub fn with_skin(mut self, name: &str, is_skin: bool) -> Self {
        self.skins.insert(name.to_string(), Ok(is_skin));
        self
    }

    pub fn with_skin_error(mut self, name: &str) -> Self {
        self.skins.insert(name.to_string(), Err("backend unreachable".into()));
        self
    }

    pub fn with_registered(self, name: &str) -> Self {
        self.registered.lock().unwrap().insert(name.to_string());
        self
    }

    /// 构造标准的内容目录：Users/<player>/games/com.mojang/{minecraftWorlds,skin_packs}
    pub fn with_layout(mut self, base: &str, players: &[&str]) -> Self {
        let users_root = format!("{}/Users", base);
        let shared = format!("{}/Shared/games/com.mojang", users_root);
        self.roots = ContentRoots {
            base: base.to_string(),
            users_root: users_root.clone(),
            resource_packs: format!("{}/resource_packs", shared),
            behavior_packs: format!("{}/behavior_packs", shared),
            is_isolation: true,
            is_preview: false,
        };
        let mut users: Vec<FileEntry> = players.iter().map(|p| dir_entry(&users_root, p)).collect();
        users.push(dir_entry(&users_root, "Shared"));
        self.dirs.insert(users_root, users);
        self
    }

    pub fn with_dirs(mut self, path: &str, count: usize) -> Self {
        let mut entries: Vec<FileEntry> = (0..count).map(|i| dir_entry(path, &format!("d{}", i))).collect();
        entries.push(FileEntry {
            name: "note.txt".into(),
            path: format!("{}/note.txt", path),
            is_dir: false,
            size: 3,
        });
        self.dirs.insert(path.to_string(), entries);
        self
    }

    /// WriteTempFile 一律失败
    pub fn with_stage_error(mut self, message: &str) -> Self {
        self.stage_error = Some(message.to_string());
        self
    }

    /// RemoveTempFile 一律失败
    pub fn with_remove_error(mut self, message: &str) -> Self {
        self.remove_error = Some(message.to_string());
        self
    }

    pub fn without_game_input(mut self) -> Self {
        self.game_input = false;
        self
    }

    pub fn without_gaming_services(mut self) -> Self {
        self.gaming_services = false;
        self
    }

    pub fn calls(&self) -> Vec<Call> {
        self.calls.lock().unwrap().clone()
    }

    pub fn methods(&self) -> Vec<&'static str> {
        self.calls().into_iter().map(|c| c.method).collect()
    }

    /// 只看导入类调用
    pub fn import_calls(&self) -> Vec<Call> {
        self.calls()
            .into_iter()
            .filter(|c| c.method.starts_with("Import"))
            .collect()
    }

    fn record(&self, method: &'static str, target: &str, player: Option<&str>, overwrite: bool) {
        self.calls.lock().unwrap().push(Call {
            method,
            target: target.to_string(),
            player: player.map(|p| p.to_string()),
            overwrite,
        });
        self.journal
            .lock()
            .unwrap()
            .push(format!("{}:{}", method, target));
    }

    fn import(
        &self,
        method: &'static str,
        name: &str,
        player: Option<&str>,
        overwrite: bool,
    ) -> Result<String, CoreError> {
        self.record(method, name, player, overwrite);
        let scripted = self
            .scripted
            .lock()
            .unwrap()
            .get_mut(name)
            .and_then(|q| q.pop_front());
        match scripted {
            Some(Ok(code)) => {
                if code.is_empty() {
                    self.registered.lock().unwrap().insert(name.to_string());
                }
                Ok(code)
            }
            Some(Err(message)) => Err(CoreError::Backend {
                method: method.to_string(),
                message,
            }),
            None => {
                let mut registered = self.registered.lock().unwrap();
                if registered.contains(name) && !overwrite {
                    Ok("ERR_DUPLICATE_FOLDER".to_string())
                } else {
                    registered.insert(name.to_string());
                    Ok(String::new())
                }
            }
        }
    }

    fn skin(&self, method: &'static str, name: &str) -> Result<bool, CoreError> {
        self.record(method, name, None, false);
        match self.skins.get(name) {
            Some(Ok(v)) => Ok(*v),
            Some(Err(message)) => Err(CoreError::Backend {
                method: method.to_string(),
                message: message.clone(),
            }),
            None => Ok(false),
        }
    }
}

fn dir_entry(parent: &str, name: &str) -> FileEntry {
    FileEntry {
        name: name.to_string(),
        path: format!("{}/{}", parent, name),
        is_dir: true,
        size: 0,
    }
}

fn name_of_path(path: &Path) -> String {
    display_name_of(&path.to_string_lossy())
}

fn name_of_bytes(data: &[u8]) -> String {
    String::from_utf8_lossy(data).to_string()
}

#[async_trait]
impl ContentBackend for MockBackend {
    async fn import_mcpack_bytes(
        &self,
        _version: &str,
        player: Option<&str>,
        file_name: &str,
        _data: &[u8],
        overwrite: bool,
    ) -> Result<String, CoreError> {
        self.import("ImportMcpack", file_name, player, overwrite)
    }

    async fn import_mcpack_path(
        &self,
        _version: &str,
        player: Option<&str>,
        path: &Path,
        overwrite: bool,
    ) -> Result<String, CoreError> {
        self.import("ImportMcpackPath", &name_of_path(path), player, overwrite)
    }

    async fn import_mcaddon_bytes(
        &self,
        _version: &str,
        player: Option<&str>,
        data: &[u8],
        overwrite: bool,
    ) -> Result<String, CoreError> {
        self.import("ImportMcaddon", &name_of_bytes(data), player, overwrite)
    }

    async fn import_mcaddon_path(
        &self,
        _version: &str,
        player: Option<&str>,
        path: &Path,
        overwrite: bool,
    ) -> Result<String, CoreError> {
        self.import("ImportMcaddonPath", &name_of_path(path), player, overwrite)
    }

    async fn import_mcworld_path(
        &self,
        _version: &str,
        player: &str,
        path: &Path,
        overwrite: bool,
    ) -> Result<String, CoreError> {
        self.import("ImportMcworldPath", &name_of_path(path), Some(player), overwrite)
    }

    async fn is_mcpack_skin_pack(&self, data: &[u8]) -> Result<bool, CoreError> {
        self.skin("IsMcpackSkinPack", &name_of_bytes(data))
    }

    async fn is_mcpack_skin_pack_path(&self, path: &Path) -> Result<bool, CoreError> {
        self.skin("IsMcpackSkinPackPath", &name_of_path(path))
    }

    async fn write_temp_file(&self, name: &str, _data: &[u8]) -> Result<PathBuf, CoreError> {
        self.record("WriteTempFile", name, None, false);
        match &self.stage_error {
            Some(message) => Err(CoreError::Backend {
                method: "WriteTempFile".into(),
                message: message.clone(),
            }),
            None => Ok(PathBuf::from("/tmp/bmcbl-import").join(name)),
        }
    }

    async fn remove_temp_file(&self, path: &Path) -> Result<(), CoreError> {
        self.record("RemoveTempFile", &name_of_path(path), None, false);
        match &self.remove_error {
            Some(message) => Err(CoreError::Backend {
                method: "RemoveTempFile".into(),
                message: message.clone(),
            }),
            None => Ok(()),
        }
    }

    async fn get_content_roots(&self, version: &str) -> Result<ContentRoots, CoreError> {
        self.record("GetContentRoots", version, None, false);
        Ok(self.roots.clone())
    }

    async fn list_dir(&self, path: &str) -> Result<Vec<FileEntry>, CoreError> {
        match self.dirs.get(path) {
            Some(entries) => Ok(entries.clone()),
            None => Err(CoreError::Backend {
                method: "ListDir".into(),
                message: format!("no such dir: {}", path),
            }),
        }
    }

    async fn is_game_input_installed(&self) -> Result<bool, CoreError> {
        self.record("IsGameInputInstalled", "", None, false);
        Ok(self.game_input)
    }

    async fn is_gaming_services_installed(&self) -> Result<bool, CoreError> {
        self.record("IsGamingServicesInstalled", "", None, false);
        Ok(self.gaming_services)
    }
}

/// 按脚本回答提示的交互层
#[derive(Default)]
pub(crate) struct ScriptedInteraction {
    player_answer: String,
    overwrite_answers: Mutex<VecDeque<bool>>,
    pub journal: Journal,
    pub player_prompts: Mutex<Vec<(Vec<String>, Option<String>)>>,
    pub overwrite_prompts: Mutex<Vec<String>>,
    pub progress: Mutex<Vec<Option<String>>>,
    pub summaries: Mutex<Vec<ImportSummary>>,
    pub errors: Mutex<Vec<String>>,
}

impl ScriptedInteraction {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_journal(mut self, journal: Journal) -> Self {
        self.journal = journal;
        self
    }

    pub fn choosing(mut self, player: &str) -> Self {
        self.player_answer = player.to_string();
        self
    }

    pub fn answering_overwrite(self, answers: &[bool]) -> Self {
        self.overwrite_answers.lock().unwrap().extend(answers.iter().copied());
        self
    }

    pub fn player_prompt_count(&self) -> usize {
        self.player_prompts.lock().unwrap().len()
    }

    pub fn overwrite_prompts(&self) -> Vec<String> {
        self.overwrite_prompts.lock().unwrap().clone()
    }

    pub fn summaries(&self) -> Vec<ImportSummary> {
        self.summaries.lock().unwrap().clone()
    }

    pub fn errors(&self) -> Vec<String> {
        self.errors.lock().unwrap().clone()
    }
}

#[async_trait]
impl ImportInteraction for ScriptedInteraction {
    async fn select_player(&self, players: &[String], current: Option<&str>) -> String {
        self.player_prompts
            .lock()
            .unwrap()
            .push((players.to_vec(), current.map(|c| c.to_string())));
        self.journal.lock().unwrap().push("prompt:player".to_string());
        self.player_answer.clone()
    }

    async fn confirm_overwrite(&self, name: &str) -> bool {
        self.overwrite_prompts.lock().unwrap().push(name.to_string());
        self.journal
            .lock()
            .unwrap()
            .push(format!("prompt:overwrite:{}", name));
        self.overwrite_answers
            .lock()
            .unwrap()
            .pop_front()
            .unwrap_or(false)
    }

    fn report_progress(&self, current_file: Option<&str>) {
        self.progress
            .lock()
            .unwrap()
            .push(current_file.map(|s| s.to_string()));
    }

    fn present_summary(&self, summary: &ImportSummary) {
        self.summaries.lock().unwrap().push(summary.clone());
    }

    fn present_error(&self, message: &str) {
        self.errors.lock().unwrap().push(message.to_string());
    }
}
