// 路径验证模块

use serde::{Deserialize, Serialize};
use std::fs;
use std::path::Path;

/// 路径验证结果
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PathValidationResult {
    /// 路径是否完全可用
    pub valid: bool,
    /// 路径是否存在
    pub exists: bool,
    /// 路径是否可写
    pub is_writable: bool,
    /// 是否是目录
    pub is_directory: bool,
    /// 验证消息
    pub message: String,
    /// 详细错误信息（如果有）
    pub details: Option<String>,
}

impl PathValidationResult {
    /// 创建一个成功的验证结果
    pub fn success() -> Self {
        Self {
            valid: true,
            exists: true,
            is_writable: true,
            is_directory: true,
            message: "路径验证通过".to_string(),
            details: None,
        }
    }

    /// 创建一个失败的验证结果
    pub fn failure(message: String, details: Option<String>) -> Self {
        Self {
            valid: false,
            exists: false,
            is_writable: false,
            is_directory: false,
            message,
            details,
        }
    }
}

/// 路径验证器
pub struct PathValidator;

impl PathValidator {
    /// 验证路径是否可用作工作目录
    ///
    /// 依次检查：
    /// 1. 路径是否存在
    /// 2. 路径是否为目录
    /// 3. 路径是否可写
    pub fn validate(path: &Path) -> PathValidationResult {
        // 1. 检查路径是否存在
        if !path.exists() {
            return PathValidationResult::failure(
                "路径不存在".to_string(),
                Some(format!("路径 {:?} 不存在，请确保路径正确或先创建该目录", path)),
            );
        }

        // 2. 检查是否是目录
        if !path.is_dir() {
            return PathValidationResult {
                valid: false,
                exists: true,
                is_writable: false,
                is_directory: false,
                message: "路径不是目录".to_string(),
                details: Some(format!("路径 {:?} 不是一个目录，请指定目录路径", path)),
            };
        }

        // 3. 检查是否可写
        if !Self::check_writable(path) {
            return PathValidationResult {
                valid: false,
                exists: true,
                is_writable: false,
                is_directory: true,
                message: "路径不可写".to_string(),
                details: Some(format!(
                    "路径 {:?} 没有写入权限，请检查目录权限或使用其他目录",
                    path
                )),
            };
        }

        PathValidationResult::success()
    }

    /// 通过创建临时文件的方式检测写入权限
    fn check_writable(path: &Path) -> bool {
        let test_file = path.join(".write_test");

        match fs::File::create(&test_file) {
            Ok(_) => {
                // 创建成功，删除测试文件
                let _ = fs::remove_file(&test_file);
                true
            }
            Err(_) => false,
        }
    }

    /// 展示用的规范化路径
    ///
    /// Windows 上避免 canonicalize 产生的 `\\?\` 前缀
    pub fn display_path(path: &Path) -> String {
        dunce::canonicalize(path)
            .unwrap_or_else(|_| path.to_path_buf())
            .to_string_lossy()
            .to_string()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::fs;
    use tempfile::TempDir;

    #[test]
    fn test_validate_existing_directory() {
        let temp_dir = TempDir::new().unwrap();
        let result = PathValidator::validate(temp_dir.path());

        assert!(result.valid, "验证应该通过");
        assert!(result.exists);
        assert!(result.is_directory);
        assert!(result.is_writable);
    }

    #[test]
    fn test_validate_non_existing_path() {
        let result = PathValidator::validate(Path::new("/non/existing/path/12345"));

        assert!(!result.valid);
        assert!(!result.exists);
        assert_eq!(result.message, "路径不存在");
    }

    #[test]
    fn test_validate_file_instead_of_directory() {
        let temp_dir = TempDir::new().unwrap();
        let file_path = temp_dir.path().join("test_file.txt");
        fs::write(&file_path, "test").unwrap();

        let result = PathValidator::validate(&file_path);

        assert!(!result.valid);
        assert!(result.exists);
        assert!(!result.is_directory);
        assert_eq!(result.message, "路径不是目录");
    }

    #[test]
    fn test_display_path_of_existing_directory() {
        let temp_dir = TempDir::new().unwrap();
        let display = PathValidator::display_path(temp_dir.path());

        // Windows 上不应出现 \\?\ 前缀
        assert!(!display.starts_with(r"\\?\"));
        assert!(!display.is_empty());
    }
}
