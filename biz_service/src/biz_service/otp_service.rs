use crate::biz_service::mail_service::MailServiceTrait;
use crate::biz_service::mail_template::otp_mail;
use crate::entitys::otp_entity::OtpAttempt;
use common::errors::AppError;
use common::repository_util::{BaseRepository, Repository};
use common::util::date_util::now;
use common::util::validate::is_valid_email;
use mongodb::Database;
use mongodb::IndexModel;
use mongodb::bson::doc;
use std::sync::Arc;

/// 同一邮箱一小时内最多发送次数
const OTP_MAX_PER_WINDOW: u64 = 5;
const OTP_WINDOW_SECS: i64 = 3600;

/// 注册验证码发送，按邮箱限频，发送记录落库
pub struct OtpService {
    pub dao: BaseRepository<OtpAttempt>,
    mail: Arc<dyn MailServiceTrait>,
}

impl OtpService {
    pub fn new(db: &Database, mail: Arc<dyn MailServiceTrait>) -> Self {
        Self { dao: BaseRepository::new(db.collection("otp_attempt")), mail }
    }

    pub async fn ensure_indexes(&self) -> Result<(), AppError> {
        let idx = IndexModel::builder().keys(doc! {"email": 1, "create_time": -1}).build();
        self.dao.collection.create_index(idx).await?;
        Ok(())
    }

    pub async fn send_otp(&self, email: &str, name: &str, otp: &str) -> Result<String, AppError> {
        if !is_valid_email(email) {
            return Err(AppError::Validation(format!("invalid email: {email}")));
        }
        let since = now() - OTP_WINDOW_SECS;
        let recent = self
            .dao
            .collection
            .count_documents(doc! {"email": email, "create_time": {"$gt": since}})
            .await?;
        if recent >= OTP_MAX_PER_WINDOW {
            return Err(AppError::RateLimited);
        }
        self.dao
            .insert(&OtpAttempt { email: email.to_string(), otp: otp.to_string(), create_time: now() })
            .await?;
        let message_id = self.mail.send(&otp_mail(email, name, otp)).await.map_err(AppError::from)?;
        Ok(message_id)
    }
}
