// Shared File Opener Rust Library
// 共享文件登记与复制打开核心库

// 配置管理模块
pub mod config;

// 打开历史模块
pub mod history;

// 标识符生成模块
pub mod ident;

// 日志系统模块
pub mod logging;

// 复制打开编排模块
pub mod orchestrator;

// 文件登记模块
pub mod registry;

// Web服务器模块
pub mod server;

// 设置文档持久化模块
pub mod store;

// 工作区模块
pub mod workspace;

// 导出常用类型
pub use config::{AppConfig, LogConfig, PathValidationResult, PathValidator};
pub use history::{HistoryEntry, HistoryLedger, HISTORY_CAPACITY};
pub use ident::IdGenerator;
pub use orchestrator::{
    CopyOpenOrchestrator, CopyOutcome, FileSystem, Opener, OrchestrationError,
};
pub use registry::{FileReference, Registry, CARD_COLORS};
pub use server::AppState;
pub use store::{SettingsDocument, SettingsStore};
pub use workspace::{OpenFileError, WorkspaceManager};
