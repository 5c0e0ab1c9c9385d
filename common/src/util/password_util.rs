use rand::Rng;
use rand::seq::SliceRandom;

const LOWER: &[u8] = b"abcdefghijklmnopqrstuvwxyz";
const UPPER: &[u8] = b"ABCDEFGHIJKLMNOPQRSTUVWXYZ";
const DIGITS: &[u8] = b"0123456789";
const SYMBOLS: &[u8] = b"!@#$%^&*";
const ALL: &[u8] = b"abcdefghijklmnopqrstuvwxyzABCDEFGHIJKLMNOPQRSTUVWXYZ0123456789!@#$%^&*";

pub const DEFAULT_PASSWORD_LENGTH: usize = 12;

/// 生成初始口令：小写/大写/数字/符号各至少一个，补足到 min_length 后打乱。
/// ThreadRng 是密码学安全随机源，登录凭据禁止改用普通伪随机。
pub fn generate_password(min_length: usize) -> String {
    let length = min_length.max(4);
    let mut rng = rand::rng();
    let mut chars: Vec<u8> = vec![
        LOWER[rng.random_range(0..LOWER.len())],
        UPPER[rng.random_range(0..UPPER.len())],
        DIGITS[rng.random_range(0..DIGITS.len())],
        SYMBOLS[rng.random_range(0..SYMBOLS.len())],
    ];
    while chars.len() < length {
        chars.push(ALL[rng.random_range(0..ALL.len())]);
    }
    chars.shuffle(&mut rng);
    chars.into_iter().map(char::from).collect()
}

/// 复杂度校验：长度下限 + 四类字符各至少一个
pub fn meets_policy(pwd: &str, min_length: usize) -> bool {
    pwd.len() >= min_length
        && pwd.chars().any(|c| c.is_ascii_lowercase())
        && pwd.chars().any(|c| c.is_ascii_uppercase())
        && pwd.chars().any(|c| c.is_ascii_digit())
        && pwd.chars().any(|c| c.is_ascii() && SYMBOLS.contains(&(c as u8)))
}
