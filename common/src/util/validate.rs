use validator::ValidateEmail;

/// ✅ 邮箱格式快速校验，批量投递的前置过滤用
pub fn is_valid_email(addr: &str) -> bool {
    let trimmed = addr.trim();
    !trimmed.is_empty() && trimmed.validate_email()
}
