use serde::{Deserialize, Serialize};

/// OTP 发送记录，按邮箱限频用
#[derive(Debug, Clone, Serialize, Deserialize, Default)]
pub struct OtpAttempt {
    pub email: String,
    pub otp: String,
    pub create_time: i64,
}
