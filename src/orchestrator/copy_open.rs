// 复制后打开编排器
//
// 核心算法：前置检查 → 冲突决策 → 复制 → 调用系统默认程序打开

use std::io;
use std::path::{Path, PathBuf};

use tracing::{info, warn};

use crate::registry::FileReference;

use super::fs::{FileSystem, Opener, SystemFs, SystemOpener};

/// 编排错误
///
/// 所有失败对本次调用都是终止性的，不做自动重试，
/// 原样带上底层系统错误交给调用方向用户展示。
#[derive(Debug, thiserror::Error)]
pub enum OrchestrationError {
    /// 工作目录未设置，需要用户先配置
    #[error("工作目录未设置，请先在设置中指定工作目录")]
    NoDestinationConfigured,

    /// 工作目录不存在且无法创建
    #[error("无法创建工作目录 {path:?}: {source}")]
    DestinationCreateFailed {
        path: PathBuf,
        #[source]
        source: io::Error,
    },

    /// 源文件不存在（共享目录可能未连接）
    #[error("找不到源文件 {0:?}，请检查共享目录连接")]
    SourceNotFound(PathBuf),

    /// 复制 I/O 失败
    #[error("复制文件失败 {from:?} -> {to:?}: {source}")]
    CopyFailed {
        from: PathBuf,
        to: PathBuf,
        #[source]
        source: io::Error,
    },
}

/// 复制后打开的结果
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum CopyOutcome {
    /// 复制并打开成功
    Copied { destination: PathBuf },
    /// 复制成功但打开失败（例如没有关联程序）
    ///
    /// 复制既已完成就不算编排失败，单独上报给调用方展示
    CopiedButOpenFailed { destination: PathBuf, reason: String },
}

impl CopyOutcome {
    /// 最终的目标路径
    pub fn destination(&self) -> &Path {
        match self {
            CopyOutcome::Copied { destination } => destination,
            CopyOutcome::CopiedButOpenFailed { destination, .. } => destination,
        }
    }
}

/// 目标路径冲突决策
///
/// 两级策略：
/// 1. 覆盖最新：目标已存在时先删除旧副本、复用原名；
/// 2. 删除失败（如文件被占用）时退回编号后缀命名
///    `name (1).ext`、`name (2).ext`…… 递增直到找到可用名字。
///
/// 退路是定义好的行为，不是尽力而为。
pub fn resolve_destination_path<F: FileSystem>(fs: &F, folder: &Path, name: &str) -> PathBuf {
    let candidate = folder.join(name);
    if !fs.exists(&candidate) {
        return candidate;
    }

    // 覆盖最新：删掉旧副本，复用原名
    match fs.remove_file(&candidate) {
        Ok(()) => return candidate,
        Err(e) => {
            warn!("删除已有副本失败，改用编号后缀: {:?}, 错误: {}", candidate, e);
        }
    }

    let (stem, ext) = split_name(name);
    for counter in 1u32.. {
        let renamed = if ext.is_empty() {
            format!("{} ({})", stem, counter)
        } else {
            format!("{} ({}).{}", stem, counter, ext)
        };
        let alternative = folder.join(renamed);
        if !fs.exists(&alternative) {
            return alternative;
        }
    }

    unreachable!("编号后缀枚举总会找到可用名字");
}

/// 把文件名拆成主干和扩展名（扩展名不含点）
fn split_name(name: &str) -> (String, String) {
    let path = Path::new(name);
    let ext = path
        .extension()
        .map(|e| e.to_string_lossy().to_string())
        .unwrap_or_default();
    let stem = path
        .file_stem()
        .map(|s| s.to_string_lossy().to_string())
        .unwrap_or_else(|| name.to_string());
    (stem, ext)
}

/// 复制后打开编排器
///
/// 文件系统和打开能力都是注入的，生产环境用 [`SystemFs`]/[`SystemOpener`]。
pub struct CopyOpenOrchestrator<F: FileSystem = SystemFs, O: Opener = SystemOpener> {
    fs: F,
    opener: O,
}

impl CopyOpenOrchestrator {
    /// 创建使用真实文件系统和系统打开器的编排器
    pub fn system() -> Self {
        Self::with_capabilities(SystemFs, SystemOpener)
    }
}

impl<F: FileSystem, O: Opener> CopyOpenOrchestrator<F, O> {
    /// 用给定能力创建编排器
    pub fn with_capabilities(fs: F, opener: O) -> Self {
        Self { fs, opener }
    }

    /// 把登记文件复制到工作目录并用默认程序打开
    ///
    /// 前置检查按顺序短路：
    /// 1. 工作目录已配置；
    /// 2. 工作目录存在，不存在则尝试递归创建；
    /// 3. 源文件存在。
    ///
    /// 本方法不追加历史、不写设置文档，由上层在成功后完成。
    pub fn copy_and_open(
        &self,
        file: &FileReference,
        destination_folder: &str,
    ) -> Result<CopyOutcome, OrchestrationError> {
        // 1. 工作目录已配置
        if destination_folder.trim().is_empty() {
            return Err(OrchestrationError::NoDestinationConfigured);
        }

        // 2. 工作目录存在，不存在则尝试创建
        let folder = Path::new(destination_folder);
        if !self.fs.exists(folder) {
            self.fs.create_dir_all(folder).map_err(|e| {
                OrchestrationError::DestinationCreateFailed {
                    path: folder.to_path_buf(),
                    source: e,
                }
            })?;
            info!("已创建工作目录: {:?}", folder);
        }

        // 3. 源文件存在
        let source = Path::new(&file.source_path);
        if !self.fs.exists(source) {
            return Err(OrchestrationError::SourceNotFound(source.to_path_buf()));
        }

        // 冲突决策 + 复制
        let destination = resolve_destination_path(&self.fs, folder, &file.name);
        self.fs
            .copy(source, &destination)
            .map_err(|e| OrchestrationError::CopyFailed {
                from: source.to_path_buf(),
                to: destination.clone(),
                source: e,
            })?;

        info!("文件已复制: {:?} -> {:?}", source, destination);

        // 打开副本。复制已经成功，打开失败单独上报
        match self.opener.open_path(&destination) {
            Ok(()) => Ok(CopyOutcome::Copied { destination }),
            Err(e) => {
                warn!("打开副本失败: {:?}, 错误: {}", destination, e);
                Ok(CopyOutcome::CopiedButOpenFailed {
                    destination,
                    reason: e.to_string(),
                })
            }
        }
    }

    /// 路径在注入的文件系统中是否存在
    pub fn path_exists(&self, path: &Path) -> bool {
        self.fs.exists(path)
    }

    /// 用系统默认程序打开一个已存在的路径（如在资源管理器中打开工作目录）
    ///
    /// 路径不存在时返回 false；打开本身即发即弃，失败只记日志
    pub fn open_existing(&self, path: &Path) -> bool {
        if !self.fs.exists(path) {
            return false;
        }
        if let Err(e) = self.opener.open_path(path) {
            warn!("打开路径失败: {:?}, 错误: {}", path, e);
        }
        true
    }
}
