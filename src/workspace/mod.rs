// 工作区模块

pub mod manager;

pub use manager::{OpenFileError, WorkspaceManager};
