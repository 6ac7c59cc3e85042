// 复制后打开编排模块

pub mod copy_open;
pub mod fs;

pub use copy_open::{
    resolve_destination_path, CopyOpenOrchestrator, CopyOutcome, OrchestrationError,
};
pub use fs::{FileSystem, Opener, SystemFs, SystemOpener};
