// 文件系统能力接口
//
// 把冲突决策和复制流程依赖的文件系统操作收敛成可注入的接口，
// 让覆盖/改名策略可以脱离真实磁盘做测试

use std::io;
use std::path::Path;

/// 文件系统能力
pub trait FileSystem {
    /// 路径是否存在
    fn exists(&self, path: &Path) -> bool;

    /// 递归创建目录（含缺失的父目录）
    fn create_dir_all(&self, path: &Path) -> io::Result<()>;

    /// 删除文件
    fn remove_file(&self, path: &Path) -> io::Result<()>;

    /// 复制文件，返回复制的字节数
    fn copy(&self, from: &Path, to: &Path) -> io::Result<u64>;
}

/// 真实文件系统实现
#[derive(Debug, Default, Clone, Copy)]
pub struct SystemFs;

impl FileSystem for SystemFs {
    fn exists(&self, path: &Path) -> bool {
        path.exists()
    }

    fn create_dir_all(&self, path: &Path) -> io::Result<()> {
        std::fs::create_dir_all(path)
    }

    fn remove_file(&self, path: &Path) -> io::Result<()> {
        std::fs::remove_file(path)
    }

    fn copy(&self, from: &Path, to: &Path) -> io::Result<u64> {
        std::fs::copy(from, to)
    }
}

/// 系统默认程序打开能力
pub trait Opener {
    /// 用操作系统默认处理程序打开路径
    fn open_path(&self, path: &Path) -> io::Result<()>;
}

/// 基于 `open` crate 的真实实现
#[derive(Debug, Default, Clone, Copy)]
pub struct SystemOpener;

impl Opener for SystemOpener {
    fn open_path(&self, path: &Path) -> io::Result<()> {
        open::that(path)
    }
}
