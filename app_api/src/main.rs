use actix_web::middleware::Logger;
use actix_web::{App, HttpServer, web};
use app_api::handlers;
use app_api::state::AppState;
use biz_service::biz_service::announcement_service::AnnouncementService;
use biz_service::biz_service::group_service::GroupService;
use biz_service::biz_service::mail_service::{MailServiceTrait, SmtpMailService};
use biz_service::biz_service::notify_service::NotifyService;
use biz_service::biz_service::otp_service::OtpService;
use biz_service::biz_service::provision_service::ProvisionService;
use biz_service::biz_service::user_service::UserService;
use common::config::AppConfig;
use log::warn;
use std::sync::Arc;

#[actix_web::main]
async fn main() -> std::io::Result<()> {
    // 读取配置文件
    let app_cfg = AppConfig::new("api-config.toml");
    let sys = app_cfg.get_sys();
    //初始化日志
    let log_level = if sys.log_level.is_empty() { "info".to_string() } else { sys.log_level.clone() };
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or(log_level.as_str())).init();

    let db_cfg = app_cfg.get_database();
    let db = common::db::init_db(&db_cfg.url, &db_cfg.db_name).await.expect("mongodb init failed");
    let limits = app_cfg.get_limits();

    // 服务装配：显式注入，不走全局单例
    let user_service = Arc::new(UserService::new(&db, limits.max_filter_values));
    let group_service = Arc::new(GroupService::new(&db, limits.max_filter_values));
    let announcement_service = Arc::new(AnnouncementService::new(&db));
    let mail_service: Arc<dyn MailServiceTrait> =
        Arc::new(SmtpMailService::from_config(&app_cfg.get_mail()).expect("mail transport init failed"));
    let notify_service = Arc::new(NotifyService::new(
        user_service.clone(),
        group_service.clone(),
        mail_service.clone(),
        limits.send_concurrency,
        sys.app_url.clone(),
    ));
    let provision_service = Arc::new(ProvisionService::new(
        user_service.clone(),
        mail_service.clone(),
        sys.md5_key.clone(),
        sys.app_url.clone(),
        sys.auto_approve,
        limits.password_length,
        limits.send_concurrency,
    ));
    let otp_service = Arc::new(OtpService::new(&db, mail_service.clone()));

    user_service.ensure_indexes().await.expect("user index init failed");
    group_service.ensure_indexes().await.expect("group index init failed");
    announcement_service.ensure_indexes().await.expect("announcement index init failed");
    otp_service.ensure_indexes().await.expect("otp index init failed");

    let state = web::Data::new(AppState {
        config: app_cfg.clone(),
        user_service,
        group_service,
        announcement_service,
        mail_service,
        notify_service,
        provision_service,
        otp_service,
    });

    let server_cfg = app_cfg.get_server();
    let address_and_port = format!("{}:{}", server_cfg.host, server_cfg.port);
    warn!("Starting server on {}", address_and_port);
    HttpServer::new(move || {
        App::new()
            .wrap(Logger::default())
            .app_data(state.clone())
            // 配置 控制器
            .configure(|cfg| {
                handlers::configure(cfg);
            })
    })
    .bind(address_and_port)?
    .run()
    .await
}
