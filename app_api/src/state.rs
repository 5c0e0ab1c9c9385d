use biz_service::biz_service::announcement_service::AnnouncementService;
use biz_service::biz_service::group_service::GroupService;
use biz_service::biz_service::mail_service::MailServiceTrait;
use biz_service::biz_service::notify_service::NotifyService;
use biz_service::biz_service::otp_service::OtpService;
use biz_service::biz_service::provision_service::ProvisionService;
use biz_service::biz_service::user_service::UserService;
use common::config::AppConfig;
use std::sync::Arc;

/// 服务集合，启动时装配一次，经 web::Data 注入各 handler。
/// 不用全局单例，测试时可整体替换。
pub struct AppState {
    pub config: AppConfig,
    pub user_service: Arc<UserService>,
    pub group_service: Arc<GroupService>,
    pub announcement_service: Arc<AnnouncementService>,
    pub mail_service: Arc<dyn MailServiceTrait>,
    pub notify_service: Arc<NotifyService>,
    pub provision_service: Arc<ProvisionService>,
    pub otp_service: Arc<OtpService>,
}
