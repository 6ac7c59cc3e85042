// 应用状态

use crate::config::AppConfig;
use crate::store::SettingsStore;
use crate::workspace::WorkspaceManager;
use std::sync::Arc;
use tokio::sync::RwLock;

/// 默认配置文件位置
pub const CONFIG_PATH: &str = "config/app.toml";

/// 应用全局状态
#[derive(Clone)]
pub struct AppState {
    /// 工作区管理器
    pub manager: Arc<WorkspaceManager>,
    /// 应用配置
    pub config: Arc<RwLock<AppConfig>>,
}

impl AppState {
    /// 创建新的应用状态
    pub async fn new() -> anyhow::Result<Self> {
        // 加载配置
        let config = AppConfig::load_or_default(CONFIG_PATH).await;

        // 加载设置文档并创建工作区管理器
        let store = SettingsStore::new(&config.workspace.settings_path);
        let manager = Arc::new(WorkspaceManager::load(store).await);

        Ok(Self {
            manager,
            config: Arc::new(RwLock::new(config)),
        })
    }
}
