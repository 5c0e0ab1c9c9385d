use crate::biz_service::mail_service::MailServiceTrait;
use crate::biz_service::mail_template::welcome_mail;
use crate::biz_service::user_service::UserStoreTrait;
use crate::entitys::user_entity::{RoleType, UserEntity};
use common::batch::run_batch;
use common::errors::AppError;
use common::util::common_utils::{build_md5_with_key, build_uuid};
use common::util::date_util::now;
use common::util::password_util::generate_password;
use common::util::validate::is_valid_email;
use log::warn;
use std::sync::Arc;

/// 批量开通请求中的一条
#[derive(Debug, Clone)]
pub struct ProvisionRequest {
    pub email: String,
    /// 缺省为最低权限角色
    pub role: Option<RoleType>,
    /// 缺省按平台审核策略
    pub approved: Option<bool>,
}

/// 单条开通结果，保持输入相对顺序
#[derive(Debug, Clone)]
pub enum ProvisionOutcome {
    Created { email: String, user_id: String, password: String, email_sent: bool },
    Failed { email: String, error: String },
}

#[derive(Debug, Default)]
pub struct BulkCreationResult {
    pub outcomes: Vec<ProvisionOutcome>,
    /// 批前剔除的非法邮箱，不计入批次失败
    pub rejected: Vec<String>,
}

/// 批量开通编排：口令生成 -> 建账号 -> 发欢迎邮件
pub struct ProvisionService {
    users: Arc<dyn UserStoreTrait>,
    mail: Arc<dyn MailServiceTrait>,
    md5_key: String,
    app_url: String,
    auto_approve: bool,
    password_length: usize,
    send_concurrency: usize,
}

impl ProvisionService {
    #[allow(clippy::too_many_arguments)]
    pub fn new(
        users: Arc<dyn UserStoreTrait>,
        mail: Arc<dyn MailServiceTrait>,
        md5_key: String,
        app_url: String,
        auto_approve: bool,
        password_length: usize,
        send_concurrency: usize,
    ) -> Self {
        Self { users, mail, md5_key, app_url, auto_approve, password_length, send_concurrency }
    }

    /// 批量开通。非法邮箱批前剔除、不进批次；每条独立成败，
    /// 单条失败不影响其余。传输凭据等系统性问题在进入批次前暴露。
    pub async fn bulk_create(&self, requests: Vec<ProvisionRequest>) -> Result<BulkCreationResult, AppError> {
        self.mail.verify().await.map_err(AppError::from)?;

        let mut rejected = Vec::new();
        let mut valid = Vec::new();
        for req in requests {
            if is_valid_email(&req.email) {
                valid.push(req);
            } else {
                rejected.push(req.email);
            }
        }

        let report = run_batch(valid, self.send_concurrency, |req| self.provision_one(req)).await;
        let outcomes = report
            .outcomes
            .into_iter()
            .map(|o| match o.result {
                Ok(outcome) => outcome,
                Err(e) => ProvisionOutcome::Failed { email: o.target.email, error: e.to_string() },
            })
            .collect();

        Ok(BulkCreationResult { outcomes, rejected })
    }

    /// 单条开通。欢迎邮件失败不回滚账号：结果仍算开通成功，
    /// 运营可走重置口令通道补发凭据。
    async fn provision_one(&self, req: ProvisionRequest) -> Result<ProvisionOutcome, AppError> {
        let email = req.email.trim().to_lowercase();
        let password = generate_password(self.password_length);
        let ts = now();
        let user = UserEntity {
            id: build_uuid(),
            // 显示名先取邮箱前缀，用户首次登录后自行完善
            name: email.split('@').next().unwrap_or_default().to_string(),
            email: email.clone(),
            role: req.role.unwrap_or_default(),
            password: build_md5_with_key(&password, &self.md5_key),
            is_approved: req.approved.unwrap_or(self.auto_approve),
            force_password_change: true,
            create_time: ts,
            update_time: ts,
            ..Default::default()
        };
        let user_id = self.users.create_user(&user).await?;

        let msg = welcome_mail(&email, &password, &self.app_url);
        let email_sent = match self.mail.send(&msg).await {
            Ok(_) => true,
            Err(e) => {
                warn!("welcome mail to {} failed: {}", email, e);
                false
            }
        };
        Ok(ProvisionOutcome::Created { email, user_id, password, email_sent })
    }

    /// 重置口令并重发凭据邮件（开通后邮件缺失的补发通道）。
    /// 复用同一生成器，新口令落库后必须触发一次新的凭据投递。
    pub async fn regenerate_password(&self, user_id: &str, email: &str) -> Result<String, AppError> {
        let user = self.users.find_by_id(user_id).await?.ok_or(AppError::NotFound)?;
        if !user.email.eq_ignore_ascii_case(email.trim()) {
            return Err(AppError::Validation("email does not match user".to_string()));
        }
        let password = generate_password(self.password_length);
        self.users.set_password(user_id, &build_md5_with_key(&password, &self.md5_key)).await?;
        self.mail.send(&welcome_mail(&user.email, &password, &self.app_url)).await.map_err(AppError::from)?;
        Ok(password)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::biz_service::mail_service::{MailError, MailMessage};
    use async_trait::async_trait;
    use common::util::password_util::meets_policy;
    use std::collections::HashSet;
    use std::sync::Mutex;

    /// 内存版用户目录，按小写邮箱去重
    #[derive(Default)]
    struct FakeUsers {
        created: Mutex<Vec<UserEntity>>,
    }

    #[async_trait]
    impl UserStoreTrait for FakeUsers {
        async fn find_by_groups(&self, _group_ids: &[String]) -> Result<Vec<UserEntity>, AppError> {
            Ok(vec![])
        }
        async fn find_by_email(&self, email: &str) -> Result<Option<UserEntity>, AppError> {
            let target = email.trim().to_lowercase();
            Ok(self.created.lock().unwrap().iter().find(|u| u.email == target).cloned())
        }
        async fn find_by_id(&self, user_id: &str) -> Result<Option<UserEntity>, AppError> {
            Ok(self.created.lock().unwrap().iter().find(|u| u.id == user_id).cloned())
        }
        async fn create_user(&self, user: &UserEntity) -> Result<String, AppError> {
            if self.find_by_email(&user.email).await?.is_some() {
                return Err(AppError::BizError(format!("user.email.exists: {}", user.email)));
            }
            self.created.lock().unwrap().push(user.clone());
            Ok(user.id.clone())
        }
        async fn set_password(&self, user_id: &str, hash: &str) -> Result<(), AppError> {
            let mut created = self.created.lock().unwrap();
            let user = created.iter_mut().find(|u| u.id == user_id).ok_or(AppError::NotFound)?;
            user.password = hash.to_string();
            Ok(())
        }
    }

    struct FakeMail {
        verify_fails: bool,
        fail_for: HashSet<String>,
        sent: Mutex<Vec<MailMessage>>,
    }

    impl FakeMail {
        fn ok() -> Self {
            Self { verify_fails: false, fail_for: HashSet::new(), sent: Mutex::new(vec![]) }
        }
    }

    #[async_trait]
    impl MailServiceTrait for FakeMail {
        async fn verify(&self) -> Result<(), MailError> {
            if self.verify_fails { Err(MailError::Credentials) } else { Ok(()) }
        }
        async fn send(&self, mail: &MailMessage) -> Result<String, MailError> {
            if self.fail_for.contains(&mail.to) {
                return Err(MailError::Timeout(30));
            }
            self.sent.lock().unwrap().push(mail.clone());
            Ok("queued-id".to_string())
        }
    }

    fn service(mail: FakeMail) -> (ProvisionService, Arc<FakeUsers>, Arc<FakeMail>) {
        let users = Arc::new(FakeUsers::default());
        let mail = Arc::new(mail);
        let svc = ProvisionService::new(
            users.clone(),
            mail.clone(),
            "salt".to_string(),
            "https://portal.test".to_string(),
            true,
            12,
            2,
        );
        (svc, users, mail)
    }

    fn requests(emails: &[&str]) -> Vec<ProvisionRequest> {
        emails.iter().map(|e| ProvisionRequest { email: e.to_string(), role: None, approved: None }).collect()
    }

    #[tokio::test]
    async fn malformed_emails_are_rejected_before_the_batch() {
        let (svc, users, mail) = service(FakeMail::ok());
        let result = svc
            .bulk_create(requests(&["a@example.com", "not-an-email", "b@example.com", "c@example.com"]))
            .await
            .unwrap();

        assert_eq!(result.rejected, vec!["not-an-email"]);
        assert_eq!(result.outcomes.len(), 3);
        // 相对顺序保持：a、b、c
        let mut passwords = Vec::new();
        for (outcome, expect) in result.outcomes.iter().zip(["a@example.com", "b@example.com", "c@example.com"]) {
            match outcome {
                ProvisionOutcome::Created { email, password, email_sent, .. } => {
                    assert_eq!(email, expect);
                    assert!(meets_policy(password, 12), "weak password: {password}");
                    assert!(*email_sent);
                    passwords.push(password.clone());
                }
                other => panic!("unexpected outcome: {other:?}"),
            }
        }
        let unique: HashSet<_> = passwords.iter().collect();
        assert_eq!(unique.len(), 3);
        assert_eq!(users.created.lock().unwrap().len(), 3);
        assert_eq!(mail.sent.lock().unwrap().len(), 3);
    }

    #[tokio::test]
    async fn welcome_mail_failure_keeps_the_account() {
        let mut mail = FakeMail::ok();
        mail.fail_for.insert("b@example.com".to_string());
        let (svc, users, _mail) = service(mail);

        let result = svc.bulk_create(requests(&["a@example.com", "b@example.com"])).await.unwrap();
        assert_eq!(result.outcomes.len(), 2);
        match &result.outcomes[1] {
            ProvisionOutcome::Created { email, email_sent, .. } => {
                assert_eq!(email, "b@example.com");
                assert!(!email_sent);
            }
            other => panic!("unexpected outcome: {other:?}"),
        }
        // 账号仍然创建成功
        assert_eq!(users.created.lock().unwrap().len(), 2);
    }

    #[tokio::test]
    async fn duplicate_email_fails_that_item_only() {
        let (svc, users, _mail) = service(FakeMail::ok());
        let result = svc
            .bulk_create(requests(&["dup@example.com", "DUP@example.com", "ok@example.com"]))
            .await
            .unwrap();

        assert_eq!(result.outcomes.len(), 3);
        assert!(matches!(&result.outcomes[0], ProvisionOutcome::Created { .. }));
        match &result.outcomes[1] {
            ProvisionOutcome::Failed { email, error } => {
                assert_eq!(email, "DUP@example.com");
                assert!(error.contains("exists"));
            }
            other => panic!("unexpected outcome: {other:?}"),
        }
        assert!(matches!(&result.outcomes[2], ProvisionOutcome::Created { .. }));
        assert_eq!(users.created.lock().unwrap().len(), 2);
    }

    #[tokio::test]
    async fn broken_transport_fails_the_whole_operation() {
        let mail = FakeMail { verify_fails: true, ..FakeMail::ok() };
        let (svc, users, _mail) = service(mail);
        let result = svc.bulk_create(requests(&["a@example.com"])).await;
        assert!(result.is_err());
        assert!(users.created.lock().unwrap().is_empty());
    }

    #[tokio::test]
    async fn regenerate_password_stores_hash_and_resends_mail() {
        let (svc, users, mail) = service(FakeMail::ok());
        svc.bulk_create(requests(&["a@example.com"])).await.unwrap();
        let (user_id, old_hash) = {
            let created = users.created.lock().unwrap();
            (created[0].id.clone(), created[0].password.clone())
        };

        let password = svc.regenerate_password(&user_id, "a@example.com").await.unwrap();
        assert!(meets_policy(&password, 12));
        let created = users.created.lock().unwrap();
        assert_ne!(created[0].password, old_hash);
        assert_eq!(created[0].password, build_md5_with_key(&password, "salt"));
        // 开通 + 重置各一封
        assert_eq!(mail.sent.lock().unwrap().len(), 2);
    }

    #[tokio::test]
    async fn regenerate_password_checks_email_match() {
        let (svc, users, _mail) = service(FakeMail::ok());
        svc.bulk_create(requests(&["a@example.com"])).await.unwrap();
        let user_id = users.created.lock().unwrap()[0].id.clone();
        let result = svc.regenerate_password(&user_id, "other@example.com").await;
        assert!(matches!(result, Err(AppError::Validation(_))));
    }
}
