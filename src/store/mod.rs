// 设置文档持久化模块
//
// 以单个 JSON 文档保存工作目录、登记文件与打开历史

use std::path::{Path, PathBuf};

use anyhow::{Context, Result};
use serde::{Deserialize, Serialize};
use tokio::fs;

use crate::history::HistoryLedger;
use crate::registry::Registry;

/// 设置文档
///
/// 本核心定义的唯一磁盘格式，对应 settings.json：
/// ```json
/// { "destinationFolder": "...", "files": [...], "history": [...] }
/// ```
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct SettingsDocument {
    /// 工作目录绝对路径，未设置时为空串
    #[serde(rename = "destinationFolder", default)]
    pub destination_folder: String,
    /// 登记的文件引用集合
    #[serde(default)]
    pub files: Registry,
    /// 打开历史账本
    #[serde(default)]
    pub history: HistoryLedger,
}

/// 设置文档存储
///
/// 读写固定位置的设置文档。加载失败时降级为默认空文档而不是崩溃；
/// 保存失败由调用方记录日志，内存中的变更仍然视为成功
/// （接受进程退出时丢数据的取舍）。
#[derive(Debug, Clone)]
pub struct SettingsStore {
    path: PathBuf,
}

impl SettingsStore {
    /// 创建指向给定文件位置的存储
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }

    /// 设置文档的文件位置
    pub fn path(&self) -> &Path {
        &self.path
    }

    /// 从磁盘加载设置文档
    pub async fn load(&self) -> Result<SettingsDocument> {
        let content = fs::read_to_string(&self.path)
            .await
            .with_context(|| format!("读取设置文件失败: {:?}", self.path))?;

        let document: SettingsDocument =
            serde_json::from_str(&content).context("解析设置文件失败")?;

        Ok(document)
    }

    /// 加载设置文档，失败时返回默认空文档
    pub async fn load_or_default(&self) -> SettingsDocument {
        if !self.path.exists() {
            tracing::info!("设置文件不存在，使用空文档: {:?}", self.path);
            return SettingsDocument::default();
        }

        match self.load().await {
            Ok(document) => {
                tracing::info!(
                    "设置文件加载成功: {:?} (文件 {} 个, 历史 {} 条)",
                    self.path,
                    document.files.len(),
                    document.history.len()
                );
                document
            }
            Err(e) => {
                tracing::warn!("设置文件加载失败，使用空文档: {}", e);
                SettingsDocument::default()
            }
        }
    }

    /// 保存设置文档到磁盘
    pub async fn save(&self, document: &SettingsDocument) -> Result<()> {
        let content =
            serde_json::to_string_pretty(document).context("序列化设置文档失败")?;

        // 确保父目录存在
        if let Some(parent) = self.path.parent() {
            fs::create_dir_all(parent)
                .await
                .with_context(|| format!("创建设置目录失败: {:?}", parent))?;
        }

        fs::write(&self.path, content)
            .await
            .with_context(|| format!("写入设置文件失败: {:?}", self.path))?;

        tracing::debug!("设置已保存: {:?}", self.path);
        Ok(())
    }
}
