use crate::biz_service::group_service::GroupStoreTrait;
use crate::biz_service::mail_service::MailServiceTrait;
use crate::biz_service::mail_template::{AnnouncementMailData, announcement_mail};
use crate::biz_service::user_service::UserStoreTrait;
use crate::entitys::announcement_entity::AnnouncementEntity;
use crate::entitys::user_entity::UserEntity;
use common::batch::run_batch;
use common::errors::AppError;
use common::util::common_utils::build_uuid;
use dashmap::DashMap;
use log::{error, info};
use std::sync::Arc;

/// 扇出汇总，恒有 notified + failed == total
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct NotifySummary {
    pub total: usize,
    pub notified: usize,
    pub failed: usize,
}

/// 单收件人失败明细，随任务保留供诊断
#[derive(Debug, Clone)]
pub struct NotifyFailure {
    pub user_id: String,
    pub email: String,
    pub reason: String,
}

#[derive(Debug, Clone)]
pub enum NotifyJobState {
    Running { total: usize },
    Completed { summary: NotifySummary, failures: Vec<NotifyFailure> },
}

/// 通知任务登记表：ticket -> 状态，另按公告 id 记最近一次 ticket。
/// 扇出触发方拿 ticket 轮询，替代「定时猜测完成」的老做法。
#[derive(Default)]
pub struct NotifyJobRegistry {
    jobs: DashMap<String, NotifyJobState>,
    by_announcement: DashMap<String, String>,
}

impl NotifyJobRegistry {
    pub fn open(&self, announcement_id: &str, total: usize) -> String {
        let ticket = build_uuid();
        self.jobs.insert(ticket.clone(), NotifyJobState::Running { total });
        self.by_announcement.insert(announcement_id.to_string(), ticket.clone());
        ticket
    }

    pub fn complete(&self, ticket: &str, summary: NotifySummary, failures: Vec<NotifyFailure>) {
        self.jobs.insert(ticket.to_string(), NotifyJobState::Completed { summary, failures });
    }

    pub fn state(&self, ticket: &str) -> Option<NotifyJobState> {
        self.jobs.get(ticket).map(|s| s.clone())
    }

    pub fn state_by_announcement(&self, announcement_id: &str) -> Option<NotifyJobState> {
        let ticket = self.by_announcement.get(announcement_id)?;
        self.state(&ticket)
    }
}

/// 公告通知扇出编排：解析成员 -> 批量投递 -> 汇总登记
#[derive(Clone)]
pub struct NotifyService {
    users: Arc<dyn UserStoreTrait>,
    groups: Arc<dyn GroupStoreTrait>,
    mail: Arc<dyn MailServiceTrait>,
    registry: Arc<NotifyJobRegistry>,
    send_concurrency: usize,
    app_url: String,
}

impl NotifyService {
    pub fn new(
        users: Arc<dyn UserStoreTrait>,
        groups: Arc<dyn GroupStoreTrait>,
        mail: Arc<dyn MailServiceTrait>,
        send_concurrency: usize,
        app_url: String,
    ) -> Self {
        Self { users, groups, mail, registry: Arc::new(NotifyJobRegistry::default()), send_concurrency, app_url }
    }

    /// 触发公告通知。成员解析与传输预检同步完成，校验错误和
    /// 系统性错误直接上抛、不进入批次；投递批次异步执行，调用方
    /// 拿返回的 ticket 轮询结果，公告创建响应不等扇出完成。
    pub async fn send_announcement(
        &self,
        announcement: AnnouncementEntity,
        group_ids: Vec<String>,
    ) -> Result<(String, usize), AppError> {
        if group_ids.is_empty() {
            return Err(AppError::Validation("groupIds is empty".to_string()));
        }
        self.mail.verify().await.map_err(AppError::from)?;

        let group_names = self.groups.names_of(&group_ids).await?;
        let recipients = self.users.find_by_groups(&group_ids).await?;
        let total = recipients.len();

        let ticket = self.registry.open(&announcement.id, total);
        let svc = self.clone();
        let job_ticket = ticket.clone();
        tokio::spawn(async move {
            let (summary, failures) = svc.dispatch(&announcement, &group_names, recipients).await;
            info!(
                "announcement {} notify done: {} notified, {} failed, {} total",
                announcement.id, summary.notified, summary.failed, summary.total
            );
            svc.registry.complete(&job_ticket, summary, failures);
        });

        Ok((ticket, total))
    }

    /// 对已解析的收件人执行投递批次。单收件人失败只累计，
    /// 不中断其余收件人；结果按输入顺序记录。
    pub async fn dispatch(
        &self,
        announcement: &AnnouncementEntity,
        group_names: &[String],
        recipients: Vec<UserEntity>,
    ) -> (NotifySummary, Vec<NotifyFailure>) {
        let data = AnnouncementMailData {
            title: &announcement.title,
            content: &announcement.content,
            group_names,
            files: &announcement.files,
            created_at: announcement.create_time,
        };

        let report = run_batch(recipients, self.send_concurrency, |user| {
            let mail = self.mail.clone();
            let msg = announcement_mail(&user.email, &user.name, &data, &self.app_url);
            async move { mail.send(&msg).await }
        })
        .await;

        let summary = NotifySummary {
            total: report.summary.total,
            notified: report.summary.succeeded,
            failed: report.summary.failed,
        };
        let failures: Vec<NotifyFailure> = report
            .failures()
            .map(|(user, e)| NotifyFailure {
                user_id: user.id.clone(),
                email: user.email.clone(),
                reason: e.to_string(),
            })
            .collect();
        for f in &failures {
            error!("notify mail to {} failed: {}", f.email, f.reason);
        }
        (summary, failures)
    }

    /// 状态查询：ticket 优先，其次公告 id；查不到按 404 处理
    pub fn check_status(
        &self,
        ticket: Option<&str>,
        announcement_id: Option<&str>,
    ) -> Result<NotifyJobState, AppError> {
        let state = match (ticket, announcement_id) {
            (Some(t), _) => self.registry.state(t),
            (None, Some(a)) => self.registry.state_by_announcement(a),
            (None, None) => {
                return Err(AppError::Validation("ticket or announcementId required".to_string()));
            }
        };
        state.ok_or(AppError::NotFound)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::biz_service::mail_service::{MailError, MailMessage};
    use crate::biz_service::user_service::dedup_users;
    use async_trait::async_trait;
    use std::collections::{HashMap, HashSet};
    use std::sync::Mutex;
    use std::sync::atomic::{AtomicUsize, Ordering};
    use tokio::time::{Duration, sleep};

    fn user(id: &str) -> UserEntity {
        UserEntity {
            id: id.to_string(),
            email: format!("{id}@example.com"),
            name: id.to_string(),
            ..Default::default()
        }
    }

    fn announcement(id: &str, groups: &[&str]) -> AnnouncementEntity {
        AnnouncementEntity {
            id: id.to_string(),
            title: "Exam schedule".to_string(),
            content: "Midterm on Monday".to_string(),
            group_ids: groups.iter().map(|g| g.to_string()).collect(),
            ..Default::default()
        }
    }

    /// 内存版用户目录：group id -> 成员，union + 去重语义与线上一致
    struct FakeUsers {
        groups: HashMap<String, Vec<UserEntity>>,
    }

    #[async_trait]
    impl UserStoreTrait for FakeUsers {
        async fn find_by_groups(&self, group_ids: &[String]) -> Result<Vec<UserEntity>, AppError> {
            let mut merged = Vec::new();
            for gid in group_ids {
                if let Some(users) = self.groups.get(gid) {
                    merged.extend(users.clone());
                }
            }
            Ok(dedup_users(merged))
        }
        async fn find_by_email(&self, _email: &str) -> Result<Option<UserEntity>, AppError> {
            Ok(None)
        }
        async fn find_by_id(&self, _user_id: &str) -> Result<Option<UserEntity>, AppError> {
            Ok(None)
        }
        async fn create_user(&self, user: &UserEntity) -> Result<String, AppError> {
            Ok(user.id.clone())
        }
        async fn set_password(&self, _user_id: &str, _hash: &str) -> Result<(), AppError> {
            Ok(())
        }
    }

    struct FakeGroups;

    #[async_trait]
    impl GroupStoreTrait for FakeGroups {
        async fn names_of(&self, group_ids: &[String]) -> Result<Vec<String>, AppError> {
            Ok(group_ids.iter().map(|g| format!("name-{g}")).collect())
        }
    }

    /// 记录发送的假传输；可配置整体预检失败或指定收件人失败
    struct FakeMail {
        verify_fails: bool,
        fail_for: HashSet<String>,
        sent: Mutex<Vec<String>>,
        attempts: AtomicUsize,
    }

    impl FakeMail {
        fn ok() -> Self {
            Self { verify_fails: false, fail_for: HashSet::new(), sent: Mutex::new(vec![]), attempts: AtomicUsize::new(0) }
        }
        fn failing_for(addr: &str) -> Self {
            let mut fail_for = HashSet::new();
            fail_for.insert(addr.to_string());
            Self { fail_for, ..Self::ok() }
        }
        fn broken() -> Self {
            Self { verify_fails: true, ..Self::ok() }
        }
    }

    #[async_trait]
    impl MailServiceTrait for FakeMail {
        async fn verify(&self) -> Result<(), MailError> {
            if self.verify_fails { Err(MailError::Auth("535 bad credentials".to_string())) } else { Ok(()) }
        }
        async fn send(&self, mail: &MailMessage) -> Result<String, MailError> {
            self.attempts.fetch_add(1, Ordering::SeqCst);
            if self.fail_for.contains(&mail.to) {
                return Err(MailError::Send(format!("550 rejected: {}", mail.to)));
            }
            self.sent.lock().unwrap().push(mail.to.clone());
            Ok("queued-id".to_string())
        }
    }

    fn service(users: FakeUsers, mail: FakeMail) -> (NotifyService, Arc<FakeMail>) {
        let mail = Arc::new(mail);
        let svc = NotifyService::new(
            Arc::new(users),
            Arc::new(FakeGroups),
            mail.clone(),
            2,
            "https://portal.test".to_string(),
        );
        (svc, mail)
    }

    fn overlapping_groups() -> FakeUsers {
        // g1 -> [u1, u2], g2 -> [u2, u3]
        let mut groups = HashMap::new();
        groups.insert("g1".to_string(), vec![user("u1"), user("u2")]);
        groups.insert("g2".to_string(), vec![user("u2"), user("u3")]);
        FakeUsers { groups }
    }

    async fn wait_completed(svc: &NotifyService, ticket: &str) -> (NotifySummary, Vec<NotifyFailure>) {
        for _ in 0..100 {
            if let Ok(NotifyJobState::Completed { summary, failures }) = svc.check_status(Some(ticket), None) {
                return (summary, failures);
            }
            sleep(Duration::from_millis(10)).await;
        }
        panic!("notify job never completed");
    }

    #[tokio::test]
    async fn overlapping_groups_notify_each_member_once() {
        let (svc, mail) = service(overlapping_groups(), FakeMail::ok());
        let (ticket, total) =
            svc.send_announcement(announcement("a1", &["g1", "g2"]), vec!["g1".to_string(), "g2".to_string()])
                .await
                .unwrap();
        assert_eq!(total, 3);

        let (summary, failures) = wait_completed(&svc, &ticket).await;
        assert_eq!(summary, NotifySummary { total: 3, notified: 3, failed: 0 });
        assert!(failures.is_empty());
        let sent = mail.sent.lock().unwrap().clone();
        assert_eq!(sent, vec!["u1@example.com", "u2@example.com", "u3@example.com"]);
    }

    #[tokio::test]
    async fn single_recipient_failure_is_isolated() {
        let (svc, mail) = service(overlapping_groups(), FakeMail::failing_for("u2@example.com"));
        let (ticket, _) =
            svc.send_announcement(announcement("a2", &["g1", "g2"]), vec!["g1".to_string(), "g2".to_string()])
                .await
                .unwrap();

        let (summary, failures) = wait_completed(&svc, &ticket).await;
        assert_eq!(summary, NotifySummary { total: 3, notified: 2, failed: 1 });
        assert_eq!(failures.len(), 1);
        assert_eq!(failures[0].user_id, "u2");
        assert_eq!(failures[0].email, "u2@example.com");
        assert!(failures[0].reason.contains("550"));
        assert_eq!(mail.attempts.load(Ordering::SeqCst), 3);
    }

    #[tokio::test]
    async fn broken_transport_aborts_before_any_send() {
        let (svc, mail) = service(overlapping_groups(), FakeMail::broken());
        let result = svc
            .send_announcement(announcement("a3", &["g1"]), vec!["g1".to_string()])
            .await;
        assert!(result.is_err());
        // 系统性失败：没有进入批次，一封也没尝试
        assert_eq!(mail.attempts.load(Ordering::SeqCst), 0);
        assert!(svc.check_status(None, Some("a3")).is_err());
    }

    #[tokio::test]
    async fn empty_group_selection_is_rejected() {
        let (svc, mail) = service(overlapping_groups(), FakeMail::ok());
        let result = svc.send_announcement(announcement("a4", &[]), vec![]).await;
        assert!(matches!(result, Err(AppError::Validation(_))));
        assert_eq!(mail.attempts.load(Ordering::SeqCst), 0);
    }

    #[tokio::test]
    async fn groups_without_members_complete_with_zero_summary() {
        let (svc, mail) = service(FakeUsers { groups: HashMap::new() }, FakeMail::ok());
        let (ticket, total) =
            svc.send_announcement(announcement("a5", &["ghost"]), vec!["ghost".to_string()]).await.unwrap();
        assert_eq!(total, 0);
        let (summary, failures) = wait_completed(&svc, &ticket).await;
        assert_eq!(summary, NotifySummary { total: 0, notified: 0, failed: 0 });
        assert!(failures.is_empty());
        assert_eq!(mail.attempts.load(Ordering::SeqCst), 0);
    }

    #[tokio::test]
    async fn status_is_queryable_by_announcement_id() {
        let (svc, _mail) = service(overlapping_groups(), FakeMail::ok());
        let (_ticket, _) =
            svc.send_announcement(announcement("a6", &["g1"]), vec!["g1".to_string()]).await.unwrap();
        for _ in 0..100 {
            if let Ok(NotifyJobState::Completed { summary, .. }) = svc.check_status(None, Some("a6")) {
                assert_eq!(summary.total, 2);
                return;
            }
            sleep(Duration::from_millis(10)).await;
        }
        panic!("status by announcement id never completed");
    }

    #[tokio::test]
    async fn unknown_ticket_is_not_found() {
        let (svc, _mail) = service(overlapping_groups(), FakeMail::ok());
        assert!(matches!(svc.check_status(Some("nope"), None), Err(AppError::NotFound)));
        assert!(matches!(svc.check_status(None, None), Err(AppError::Validation(_))));
    }
}
