// ID 生成模块

use rand::Rng;

/// base36 字符表（0-9 a-z）
const BASE36_ALPHABET: &[u8; 36] = b"0123456789abcdefghijklmnopqrstuvwxyz";

/// 随机后缀长度
const RANDOM_SUFFIX_LEN: usize = 7;

/// ID 生成器
///
/// 生成进程生命周期内唯一的字符串 ID：
/// 毫秒时间戳的 base36 编码 + 7 位 base36 随机后缀。
/// ID 只在同一份已加载文档内做相等比较，不要求跨进程全局唯一。
#[derive(Debug, Default, Clone, Copy)]
pub struct IdGenerator;

impl IdGenerator {
    /// 创建新的 ID 生成器
    pub fn new() -> Self {
        Self
    }

    /// 生成下一个 ID
    pub fn next(&self) -> String {
        let millis = chrono::Utc::now().timestamp_millis().max(0) as u64;
        let mut id = encode_base36(millis);

        let mut rng = rand::thread_rng();
        for _ in 0..RANDOM_SUFFIX_LEN {
            let idx = rng.gen_range(0..BASE36_ALPHABET.len());
            id.push(BASE36_ALPHABET[idx] as char);
        }

        id
    }
}

/// 将无符号整数编码为 base36 字符串
fn encode_base36(mut value: u64) -> String {
    if value == 0 {
        return "0".to_string();
    }

    let mut buf = Vec::new();
    while value > 0 {
        buf.push(BASE36_ALPHABET[(value % 36) as usize]);
        value /= 36;
    }
    buf.reverse();

    // 字符表只含 ASCII，转换不会失败
    String::from_utf8(buf).unwrap_or_default()
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashSet;

    #[test]
    fn test_encode_base36() {
        assert_eq!(encode_base36(0), "0");
        assert_eq!(encode_base36(35), "z");
        assert_eq!(encode_base36(36), "10");
        assert_eq!(encode_base36(36 * 36), "100");
    }

    #[test]
    fn test_id_shape() {
        let gen = IdGenerator::new();
        let id = gen.next();

        // 时间戳部分 + 7 位随机后缀
        assert!(id.len() > RANDOM_SUFFIX_LEN);
        assert!(id.chars().all(|c| c.is_ascii_lowercase() || c.is_ascii_digit()));
    }

    #[test]
    fn test_ids_are_unique() {
        let gen = IdGenerator::new();
        let mut seen = HashSet::new();

        // 同一毫秒内生成大量 ID，随机后缀保证不碰撞
        for _ in 0..10_000 {
            assert!(seen.insert(gen.next()), "生成了重复的 ID");
        }
    }
}
