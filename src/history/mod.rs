// 打开历史模块
//
// 记录已完成的“复制后打开”操作，最新在前，容量固定 50 条

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// 历史容量上限，超出后最旧的条目被丢弃（不归档）
pub const HISTORY_CAPACITY: usize = 50;

/// 历史条目
///
/// 由一次成功的复制后打开创建，创建后不再修改。
/// `file_id` 是弱引用：对应的文件引用之后可能被删除，
/// 条目自带 `file_name`/`source_path` 快照，展示不依赖注册表。
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct HistoryEntry {
    /// 唯一 ID
    pub id: String,
    /// 复制时对应的文件引用 ID（弱引用，不做完整性约束）
    #[serde(rename = "fileId")]
    pub file_id: String,
    /// 文件名快照
    #[serde(rename = "fileName")]
    pub file_name: String,
    /// 源路径快照
    #[serde(rename = "originalPath")]
    pub source_path: String,
    /// 本次复制的目标路径
    #[serde(rename = "copiedTo")]
    pub destination_path: String,
    /// 完成时间
    #[serde(rename = "openedAt")]
    pub completed_at: DateTime<Utc>,
}

/// 打开历史账本
///
/// 只有头部追加、整体清空、容量淘汰三种变更，
/// 不存在单条删除和修改操作。
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(transparent)]
pub struct HistoryLedger {
    entries: Vec<HistoryEntry>,
}

impl HistoryLedger {
    /// 创建空账本
    pub fn new() -> Self {
        Self::default()
    }

    /// 头部追加一条记录，然后截断到容量上限（丢弃尾部最旧条目）
    pub fn append(&mut self, entry: HistoryEntry) {
        self.entries.insert(0, entry);
        if self.entries.len() > HISTORY_CAPACITY {
            self.entries.truncate(HISTORY_CAPACITY);
        }
    }

    /// 清空账本
    pub fn clear(&mut self) {
        self.entries.clear();
    }

    /// 按最新在前的存储顺序列出全部条目
    pub fn list(&self) -> &[HistoryEntry] {
        &self.entries
    }

    /// 当前条数
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    /// 账本是否为空
    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use proptest::prelude::*;

    fn entry(n: usize) -> HistoryEntry {
        HistoryEntry {
            id: format!("h{}", n),
            file_id: format!("f{}", n),
            file_name: format!("file{}.txt", n),
            source_path: format!("/share/file{}.txt", n),
            destination_path: format!("/work/file{}.txt", n),
            completed_at: Utc::now(),
        }
    }

    #[test]
    fn test_append_inserts_at_head() {
        let mut ledger = HistoryLedger::new();
        ledger.append(entry(1));
        ledger.append(entry(2));

        assert_eq!(ledger.len(), 2);
        assert_eq!(ledger.list()[0].id, "h2");
        assert_eq!(ledger.list()[1].id, "h1");
    }

    #[test]
    fn test_capacity_evicts_oldest_first() {
        let mut ledger = HistoryLedger::new();

        // 顺序追加 51 条，账本只保留最近 50 条
        for n in 0..51 {
            ledger.append(entry(n));
        }

        assert_eq!(ledger.len(), HISTORY_CAPACITY);
        // 最早的 h0 被丢弃
        assert!(ledger.list().iter().all(|e| e.id != "h0"));
        assert_eq!(ledger.list()[0].id, "h50");
        assert_eq!(ledger.list()[HISTORY_CAPACITY - 1].id, "h1");
    }

    #[test]
    fn test_clear() {
        let mut ledger = HistoryLedger::new();
        ledger.append(entry(1));
        ledger.clear();
        assert!(ledger.is_empty());
    }

    #[test]
    fn test_serde_uses_document_field_names() {
        let mut ledger = HistoryLedger::new();
        ledger.append(entry(1));

        let json = serde_json::to_value(&ledger).unwrap();
        let first = &json.as_array().unwrap()[0];

        for key in ["fileId", "fileName", "originalPath", "copiedTo", "openedAt"] {
            assert!(first.get(key).is_some(), "缺少字段 {}", key);
        }
    }

    proptest! {
        #[test]
        fn prop_ledger_never_exceeds_capacity(count in 0usize..200) {
            let mut ledger = HistoryLedger::new();
            for n in 0..count {
                ledger.append(entry(n));
            }

            prop_assert!(ledger.len() <= HISTORY_CAPACITY);
            prop_assert_eq!(ledger.len(), count.min(HISTORY_CAPACITY));

            // 头部始终是最后追加的条目
            if count > 0 {
                prop_assert_eq!(&ledger.list()[0].id, &format!("h{}", count - 1));
            }
        }
    }
}
