// 文件注册表模块
//
// 管理用户登记的共享文件引用，按源路径去重

use std::collections::HashSet;
use std::path::Path;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::ident::IdGenerator;

/// 卡片颜色调色板（与前端展示一致，共 10 色）
pub const CARD_COLORS: [&str; 10] = [
    "#3B82F6", // 蓝
    "#10B981", // 绿
    "#F59E0B", // 黄
    "#EF4444", // 红
    "#8B5CF6", // 紫
    "#EC4899", // 粉
    "#06B6D4", // 青
    "#F97316", // 橙
    "#6366F1", // 靛
    "#14B8A6", // 蓝绿
];

/// 已登记的文件引用
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct FileReference {
    /// 唯一 ID，登记时分配，之后不变
    pub id: String,
    /// 展示用文件名（源路径的 basename）
    pub name: String,
    /// 源文件绝对路径，作为去重键（精确字符串匹配）
    #[serde(rename = "originalPath")]
    pub source_path: String,
    /// 小写、去点的扩展名，仅用于图标/展示分类
    pub extension: String,
    /// 卡片颜色标签，登记时轮转分配，之后可改
    pub color: String,
    /// 登记时间
    #[serde(rename = "addedAt")]
    pub registered_at: DateTime<Utc>,
}

impl FileReference {
    /// 由源路径构造文件引用
    fn from_path(id: String, source_path: &str, color: String) -> Self {
        Self {
            id,
            name: display_name(source_path),
            source_path: source_path.to_string(),
            extension: extract_extension(source_path),
            color,
            registered_at: Utc::now(),
        }
    }
}

/// 提取展示用文件名（basename）
fn display_name(path: &str) -> String {
    Path::new(path)
        .file_name()
        .map(|n| n.to_string_lossy().to_string())
        .unwrap_or_else(|| path.to_string())
}

/// 提取小写、去点的扩展名，没有扩展名时返回空串
fn extract_extension(path: &str) -> String {
    Path::new(path)
        .extension()
        .map(|e| e.to_string_lossy().to_lowercase())
        .unwrap_or_default()
}

/// 文件注册表
///
/// 按插入顺序保存文件引用，`source_path` 在注册表内唯一。
/// 颜色游标不是隐藏的进程级状态，而是在每次登记时由
/// `files.len() % CARD_COLORS.len()` 推导，行为确定、可测试。
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(transparent)]
pub struct Registry {
    files: Vec<FileReference>,
}

impl Registry {
    /// 创建空注册表
    pub fn new() -> Self {
        Self::default()
    }

    /// 批量登记候选路径
    ///
    /// 已存在的源路径（含同一批次内的重复项）静默跳过，不报错；
    /// 调用方可比较返回条数与输入条数来检测跳过。
    /// 返回顺序与首次出现的去重输入顺序一致。
    pub fn register(&mut self, candidate_paths: &[String], ids: &IdGenerator) -> Vec<FileReference> {
        let mut known: HashSet<String> =
            self.files.iter().map(|f| f.source_path.clone()).collect();

        let mut added = Vec::new();
        for path in candidate_paths {
            if known.contains(path) {
                tracing::debug!("源路径已登记，跳过: {}", path);
                continue;
            }

            let color = CARD_COLORS[self.files.len() % CARD_COLORS.len()].to_string();
            let reference = FileReference::from_path(ids.next(), path, color);

            known.insert(path.clone());
            added.push(reference.clone());
            self.files.push(reference);
        }

        added
    }

    /// 按 ID 移除文件引用
    ///
    /// ID 不存在时返回 false。不会联动删除任何历史记录。
    pub fn remove(&mut self, id: &str) -> bool {
        let before = self.files.len();
        self.files.retain(|f| f.id != id);
        self.files.len() != before
    }

    /// 修改指定文件引用的颜色标签，ID 不存在时静默失败（返回 false）
    pub fn set_color(&mut self, id: &str, color: &str) -> bool {
        match self.files.iter_mut().find(|f| f.id == id) {
            Some(file) => {
                file.color = color.to_string();
                true
            }
            None => false,
        }
    }

    /// 按插入顺序列出全部文件引用
    pub fn list(&self) -> &[FileReference] {
        &self.files
    }

    /// 按 ID 查找文件引用
    pub fn get(&self, id: &str) -> Option<&FileReference> {
        self.files.iter().find(|f| f.id == id)
    }

    /// 当前登记条数
    pub fn len(&self) -> usize {
        self.files.len()
    }

    /// 注册表是否为空
    pub fn is_empty(&self) -> bool {
        self.files.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashSet;

    fn paths(items: &[&str]) -> Vec<String> {
        items.iter().map(|s| s.to_string()).collect()
    }

    #[test]
    fn test_register_extracts_name_and_extension() {
        let mut registry = Registry::new();
        let ids = IdGenerator::new();

        let added = registry.register(&paths(&["/share/Report.XLSX"]), &ids);

        assert_eq!(added.len(), 1);
        assert_eq!(added[0].name, "Report.XLSX");
        assert_eq!(added[0].extension, "xlsx");
        assert_eq!(added[0].source_path, "/share/Report.XLSX");
    }

    #[test]
    fn test_register_same_path_twice_yields_one_entry() {
        let mut registry = Registry::new();
        let ids = IdGenerator::new();

        let first = registry.register(&paths(&["/share/a.txt"]), &ids);
        assert_eq!(first.len(), 1);

        // 第二次登记同一路径，返回零条新记录
        let second = registry.register(&paths(&["/share/a.txt"]), &ids);
        assert!(second.is_empty());
        assert_eq!(registry.len(), 1);
    }

    #[test]
    fn test_register_skips_known_and_in_batch_duplicates() {
        let mut registry = Registry::new();
        let ids = IdGenerator::new();

        registry.register(&paths(&["/share/a.txt", "/share/b.txt"]), &ids);

        // N=4 条候选中 K=1 条已登记、1 条批内重复，应新增 2 条
        let added = registry.register(
            &paths(&["/share/c.txt", "/share/a.txt", "/share/d.txt", "/share/c.txt"]),
            &ids,
        );

        assert_eq!(added.len(), 2);
        assert_eq!(added[0].source_path, "/share/c.txt");
        assert_eq!(added[1].source_path, "/share/d.txt");
        assert_eq!(registry.len(), 4);

        // 每条记录 ID 唯一
        let unique: HashSet<&str> = registry.list().iter().map(|f| f.id.as_str()).collect();
        assert_eq!(unique.len(), 4);
    }

    #[test]
    fn test_color_assignment_is_round_robin() {
        let mut registry = Registry::new();
        let ids = IdGenerator::new();

        let candidates: Vec<String> = (0..12).map(|i| format!("/share/f{}.txt", i)).collect();
        let added = registry.register(&candidates, &ids);

        for (i, file) in added.iter().enumerate() {
            assert_eq!(file.color, CARD_COLORS[i % CARD_COLORS.len()]);
        }
        // 第 11 个文件绕回调色板开头
        assert_eq!(added[10].color, CARD_COLORS[0]);
    }

    #[test]
    fn test_color_cursor_follows_live_count() {
        let mut registry = Registry::new();
        let ids = IdGenerator::new();

        let added = registry.register(&paths(&["/share/a.txt", "/share/b.txt"]), &ids);
        registry.remove(&added[1].id);

        // 移除一条后存量为 1，下一个颜色从调色板第 2 项开始
        let next = registry.register(&paths(&["/share/c.txt"]), &ids);
        assert_eq!(next[0].color, CARD_COLORS[1]);
    }

    #[test]
    fn test_remove_unknown_id_is_noop() {
        let mut registry = Registry::new();
        let ids = IdGenerator::new();
        registry.register(&paths(&["/share/a.txt"]), &ids);

        assert!(!registry.remove("missing"));
        assert_eq!(registry.len(), 1);
    }

    #[test]
    fn test_set_color() {
        let mut registry = Registry::new();
        let ids = IdGenerator::new();
        let added = registry.register(&paths(&["/share/a.txt"]), &ids);

        assert!(registry.set_color(&added[0].id, "#000000"));
        assert_eq!(registry.get(&added[0].id).unwrap().color, "#000000");

        // 未知 ID 静默失败
        assert!(!registry.set_color("missing", "#FFFFFF"));
    }

    #[test]
    fn test_list_preserves_insertion_order() {
        let mut registry = Registry::new();
        let ids = IdGenerator::new();

        registry.register(&paths(&["/share/b.txt"]), &ids);
        registry.register(&paths(&["/share/a.txt"]), &ids);

        let names: Vec<&str> = registry.list().iter().map(|f| f.name.as_str()).collect();
        assert_eq!(names, vec!["b.txt", "a.txt"]);
    }

    #[test]
    fn test_serde_uses_document_field_names() {
        let mut registry = Registry::new();
        let ids = IdGenerator::new();
        registry.register(&paths(&["/share/a.txt"]), &ids);

        let json = serde_json::to_value(&registry).unwrap();
        let entry = &json.as_array().unwrap()[0];

        assert!(entry.get("originalPath").is_some());
        assert!(entry.get("addedAt").is_some());
        assert!(entry.get("source_path").is_none());
    }
}
