use hex::encode;
use md5::{Digest, Md5};
use uuid::Uuid;

pub fn build_uuid() -> String {
    let uuid = Uuid::new_v4().simple();
    format!("{}", uuid)
}

/// 带盐 MD5，用于存储口令摘要
pub fn build_md5_with_key(content: &str, key: &str) -> String {
    let mut hasher = Md5::new();
    hasher.update(content.as_bytes());
    hasher.update(key.as_bytes());
    let result = hasher.finalize();
    encode(result)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn uuid_is_simple_format() {
        let id = build_uuid();
        assert_eq!(id.len(), 32);
        assert!(id.chars().all(|c| c.is_ascii_hexdigit()));
    }

    #[test]
    fn md5_depends_on_key() {
        let a = build_md5_with_key("secret", "k1");
        let b = build_md5_with_key("secret", "k2");
        assert_ne!(a, b);
        assert_eq!(a, build_md5_with_key("secret", "k1"));
    }
}
