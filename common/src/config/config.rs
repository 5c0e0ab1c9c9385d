use config::Config;
use serde::Deserialize;

#[derive(Debug, Deserialize, Clone, Default)]
pub struct AppConfig {
    pub database: Option<DatabaseConfig>,
    pub server: Option<ServerConfig>,
    pub mail: Option<MailConfig>,
    pub sys: Option<SysConfig>,
    pub limits: Option<LimitsConfig>,
}

impl AppConfig {
    pub fn new(file: &str) -> Self {
        let config = Config::builder()
            .add_source(config::File::with_name(file).required(true))
            .add_source(config::Environment::with_prefix("APP").separator("_"))
            .build()
            .expect("Failed to build configuration");
        config.try_deserialize::<AppConfig>().expect("Failed to deserialize configuration")
    }

    pub fn get_database(&self) -> DatabaseConfig {
        self.database.clone().unwrap_or_default()
    }
    pub fn get_server(&self) -> ServerConfig {
        self.server.clone().unwrap_or_default()
    }
    pub fn get_mail(&self) -> MailConfig {
        self.mail.clone().unwrap_or_default()
    }
    pub fn get_sys(&self) -> SysConfig {
        self.sys.clone().unwrap_or_default()
    }
    pub fn get_limits(&self) -> LimitsConfig {
        self.limits.clone().unwrap_or_default()
    }
}

#[derive(Debug, Deserialize, Clone, Default)]
pub struct DatabaseConfig {
    pub url: String,
    pub db_name: String,
}

#[derive(Debug, Deserialize, Clone, Default)]
pub struct ServerConfig {
    pub host: String,
    pub port: u16,
}

#[derive(Debug, Deserialize, Clone, Default)]
pub struct SysConfig {
    //全局日志级别
    pub log_level: String,
    //md5混淆 key
    pub md5_key: String,
    //前端入口地址，拼进邮件里的跳转链接
    pub app_url: String,
    //批量开通的账号是否默认审核通过
    pub auto_approve: bool,
}

/// 邮件传输配置，凭据缺失时发送服务拒绝启动
#[derive(Debug, Deserialize, Clone, Default)]
pub struct MailConfig {
    pub smtp_host: String,
    pub smtp_port: Option<u16>,
    pub username: String,
    pub password: String,
    /// 发件人，形如 "EduCloud <no-reply@educloud.dev>"
    pub from: String,
    pub send_timeout_secs: Option<u64>,
}

#[derive(Debug, Deserialize, Clone)]
pub struct LimitsConfig {
    /// 文档库单次 in 过滤的取值上限，超限分片查询
    #[serde(default = "default_max_filter_values")]
    pub max_filter_values: usize,
    /// 邮件批量投递的并发上限
    #[serde(default = "default_send_concurrency")]
    pub send_concurrency: usize,
    /// 生成口令的最小长度
    #[serde(default = "default_password_length")]
    pub password_length: usize,
}

impl Default for LimitsConfig {
    fn default() -> Self {
        Self {
            max_filter_values: default_max_filter_values(),
            send_concurrency: default_send_concurrency(),
            password_length: default_password_length(),
        }
    }
}

fn default_max_filter_values() -> usize {
    30
}
fn default_send_concurrency() -> usize {
    4
}
fn default_password_length() -> usize {
    12
}
