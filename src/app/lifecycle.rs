// src/app/lifecycle.rs
use std::sync::atomic::{AtomicBool, Ordering};
use tracing::{debug, info, warn};

use super::modal::ModalView;
use crate::core::minecraft::backend::ContentBackend;
use crate::result::CoreError;

/// 进程生命周期内只放行一次
#[derive(Debug, Default)]
pub struct RunOnceGate {
    fired: AtomicBool,
}

impl RunOnceGate {
    pub const fn new() -> Self {
        Self {
            fired: AtomicBool::new(false),
        }
    }

    /// 第一次调用返回 true，之后都返回 false
    pub fn try_fire(&self) -> bool {
        self.fired
            .compare_exchange(false, true, Ordering::AcqRel, Ordering::Acquire)
            .is_ok()
    }

    pub fn has_fired(&self) -> bool {
        self.fired.load(Ordering::Acquire)
    }
}

/// 同一时间只允许一个导入批次
#[derive(Debug, Default)]
pub struct BatchLock {
    busy: AtomicBool,
}

/// 持有期间批次锁被占用，drop 时释放
#[derive(Debug)]
pub struct BatchGuard<'a> {
    lock: &'a BatchLock,
}

impl BatchLock {
    pub fn try_acquire(&self) -> Result<BatchGuard<'_>, CoreError> {
        self.busy
            .compare_exchange(false, true, Ordering::AcqRel, Ordering::Acquire)
            .map(|_| BatchGuard { lock: self })
            .map_err(|_| {
                warn!("import batch rejected: another batch is running");
                CoreError::BatchInProgress
            })
    }

    pub fn is_busy(&self) -> bool {
        self.busy.load(Ordering::Acquire)
    }
}

impl Drop for BatchGuard<'_> {
    fn drop(&mut self) {
        self.lock.busy.store(false, Ordering::Release);
    }
}

/// 应用级状态：启动检查的一次性开关和导入批次锁
#[derive(Debug, Default)]
pub struct AppLifecycle {
    pub game_input_check: RunOnceGate,
    pub gaming_services_check: RunOnceGate,
    pub batch_lock: BatchLock,
}

impl AppLifecycle {
    pub fn new() -> Self {
        Self::default()
    }
}

/// 检查 GameInput / Gaming Services，每项每个进程最多检查一次
///
/// 返回需要展示的提示；后端调用失败只记日志。
pub async fn run_startup_checks(
    lifecycle: &AppLifecycle,
    backend: &dyn ContentBackend,
    ignore_gaming_services: bool,
) -> Vec<ModalView> {
    let mut notices = Vec::new();

    if lifecycle.game_input_check.try_fire() {
        match backend.is_game_input_installed().await {
            Ok(true) => debug!("GameInput installed"),
            Ok(false) => {
                info!("GameInput is not installed");
                notices.push(ModalView::GameInputMissing);
            }
            Err(e) => warn!("GameInput check failed: {}", e),
        }
    }

    if lifecycle.gaming_services_check.try_fire() {
        if ignore_gaming_services {
            debug!("Gaming Services check skipped by config");
        } else {
            match backend.is_gaming_services_installed().await {
                Ok(true) => debug!("Gaming Services installed"),
                Ok(false) => {
                    info!("Gaming Services is not installed");
                    notices.push(ModalView::GamingServicesMissing);
                }
                Err(e) => warn!("Gaming Services check failed: {}", e),
            }
        }
    }

    notices
}
