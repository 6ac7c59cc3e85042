// 工作区管理器
//
// 持有已加载的设置文档，把注册表、历史账本、编排器和持久化串成
// 对外的完整操作。文档上只有一把排他写锁：两次复制打开哪怕操作
// 不同文件，也共享同一份持久化文档，必须串行化读改写，否则会在
// 历史截断或登记上互相覆盖。

use std::path::Path;

use tokio::sync::RwLock;
use tracing::{info, warn};

use crate::config::{PathValidationResult, PathValidator};
use crate::history::HistoryEntry;
use crate::ident::IdGenerator;
use crate::orchestrator::{
    CopyOpenOrchestrator, CopyOutcome, FileSystem, Opener, OrchestrationError, SystemFs,
    SystemOpener,
};
use crate::registry::FileReference;
use crate::store::{SettingsDocument, SettingsStore};

/// 打开登记文件时的错误
#[derive(Debug, thiserror::Error)]
pub enum OpenFileError {
    /// 注册表里没有这个 ID
    #[error("未找到登记文件: {0}")]
    UnknownFile(String),

    /// 编排阶段失败
    #[error(transparent)]
    Orchestration(#[from] OrchestrationError),
}

/// 工作区管理器
pub struct WorkspaceManager<F: FileSystem = SystemFs, O: Opener = SystemOpener> {
    store: SettingsStore,
    document: RwLock<SettingsDocument>,
    orchestrator: CopyOpenOrchestrator<F, O>,
    ids: IdGenerator,
}

impl WorkspaceManager {
    /// 加载设置文档并创建管理器（生产用真实文件系统与系统打开器）
    pub async fn load(store: SettingsStore) -> Self {
        Self::load_with_orchestrator(store, CopyOpenOrchestrator::system()).await
    }
}

impl<F: FileSystem, O: Opener> WorkspaceManager<F, O> {
    /// 用注入的编排器加载管理器
    pub async fn load_with_orchestrator(
        store: SettingsStore,
        orchestrator: CopyOpenOrchestrator<F, O>,
    ) -> Self {
        let document = store.load_or_default().await;
        info!("工作区管理器已创建");
        Self {
            store,
            document: RwLock::new(document),
            orchestrator,
            ids: IdGenerator::new(),
        }
    }

    // ── 注册表操作 ──

    /// 按插入顺序列出全部登记文件
    pub async fn list_files(&self) -> Vec<FileReference> {
        self.document.read().await.files.list().to_vec()
    }

    /// 批量登记候选路径，返回新增的文件引用（已登记路径静默跳过）
    pub async fn register_paths(&self, candidate_paths: &[String]) -> Vec<FileReference> {
        let mut document = self.document.write().await;
        let added = document.files.register(candidate_paths, &self.ids);

        if !added.is_empty() {
            info!(
                "登记了 {} 个文件（输入 {} 条，跳过 {} 条）",
                added.len(),
                candidate_paths.len(),
                candidate_paths.len() - added.len()
            );
            self.persist(&document).await;
        }

        added
    }

    /// 按 ID 移除登记文件，不触碰历史
    pub async fn remove_file(&self, id: &str) -> bool {
        let mut document = self.document.write().await;
        let removed = document.files.remove(id);
        if removed {
            info!("移除登记文件: {}", id);
            self.persist(&document).await;
        }
        removed
    }

    /// 修改登记文件的颜色标签
    pub async fn set_color(&self, id: &str, color: &str) -> bool {
        let mut document = self.document.write().await;
        let changed = document.files.set_color(id, color);
        if changed {
            self.persist(&document).await;
        }
        changed
    }

    /// 登记文件的源路径当前是否可达（共享目录可能断开）
    ///
    /// ID 不存在时返回 None
    pub async fn source_exists(&self, id: &str) -> Option<bool> {
        let document = self.document.read().await;
        document
            .files
            .get(id)
            .map(|f| self.orchestrator.path_exists(Path::new(&f.source_path)))
    }

    // ── 复制后打开 ──

    /// 把登记文件复制到工作目录并打开，成功后追加历史并持久化
    pub async fn open_file(&self, id: &str) -> Result<CopyOutcome, OpenFileError> {
        // 整个读改写周期持锁，见模块头的串行化约束
        let mut document = self.document.write().await;

        let file = document
            .files
            .get(id)
            .cloned()
            .ok_or_else(|| OpenFileError::UnknownFile(id.to_string()))?;

        // 复制走同步文件系统调用，网络共享上可能长时间阻塞，
        // 移出异步执行线程
        let outcome = tokio::task::block_in_place(|| {
            self.orchestrator
                .copy_and_open(&file, &document.destination_folder)
        })?;

        let destination = outcome.destination().to_string_lossy().to_string();
        document.history.append(HistoryEntry {
            id: self.ids.next(),
            file_id: file.id.clone(),
            file_name: file.name.clone(),
            source_path: file.source_path.clone(),
            destination_path: destination.clone(),
            completed_at: chrono::Utc::now(),
        });

        self.persist(&document).await;
        info!("复制后打开完成: {} -> {}", file.source_path, destination);

        Ok(outcome)
    }

    // ── 工作目录 ──

    /// 当前配置的工作目录（未设置时为空串）
    pub async fn destination_folder(&self) -> String {
        self.document.read().await.destination_folder.clone()
    }

    /// 设置工作目录
    ///
    /// 要求绝对路径；路径已存在时必须是可写目录。
    /// 尚不存在的路径允许设置，首次复制打开时会自动创建。
    pub async fn set_destination_folder(
        &self,
        folder: &str,
    ) -> anyhow::Result<PathValidationResult> {
        if folder.trim().is_empty() {
            anyhow::bail!("工作目录不能为空");
        }

        let path = Path::new(folder);
        if !path.is_absolute() {
            anyhow::bail!("工作目录必须是绝对路径，当前值: {}", folder);
        }

        let validation = PathValidator::validate(path);
        if validation.exists && !validation.valid {
            // 存在但不是可写目录，拒绝设置
            anyhow::bail!("{}", validation.message);
        }

        let mut document = self.document.write().await;
        document.destination_folder = folder.to_string();
        self.persist(&document).await;
        info!("工作目录已设置: {}", PathValidator::display_path(path));

        Ok(validation)
    }

    /// 在系统文件管理器中打开工作目录，目录未设置或不存在时返回 false
    pub async fn open_destination_folder(&self) -> bool {
        let folder = self.destination_folder().await;
        if folder.is_empty() {
            return false;
        }
        self.orchestrator.open_existing(Path::new(&folder))
    }

    // ── 历史 ──

    /// 最新在前列出打开历史
    pub async fn history(&self) -> Vec<HistoryEntry> {
        self.document.read().await.history.list().to_vec()
    }

    /// 清空打开历史
    pub async fn clear_history(&self) {
        let mut document = self.document.write().await;
        document.history.clear();
        self.persist(&document).await;
        info!("打开历史已清空");
    }

    /// 持久化设置文档
    ///
    /// 保存失败只记日志：内存中的变更仍然生效，
    /// 接受进程退出时丢数据的取舍
    async fn persist(&self, document: &SettingsDocument) {
        if let Err(e) = self.store.save(document).await {
            warn!("设置保存失败（内存状态已更新）: {}", e);
        }
    }
}
