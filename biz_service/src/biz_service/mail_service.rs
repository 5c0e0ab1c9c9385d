use async_trait::async_trait;
use common::config::MailConfig;
use common::errors::AppError;
use common::util::validate::is_valid_email;
use lettre::message::{Mailbox, MultiPart};
use lettre::transport::smtp::authentication::Credentials;
use lettre::{AsyncSmtpTransport, AsyncTransport, Message, Tokio1Executor};
use thiserror::Error;
use tokio::time::{Duration, timeout};

/// 邮件投递错误分类。系统性错误（凭据/连接）必须在批量开始前
/// 快速失败；单收件人错误只影响该收件人，批次继续。
#[derive(Debug, Error)]
pub enum MailError {
    #[error("mail credentials not configured")]
    Credentials,
    #[error("smtp auth failed: {0}")]
    Auth(String),
    #[error("smtp connect failed: {0}")]
    Connect(String),
    #[error("send timed out after {0}s")]
    Timeout(u64),
    #[error("send failed: {0}")]
    Send(String),
    #[error("invalid address: {0}")]
    Address(String),
}

impl MailError {
    /// 是否属于影响整体操作的系统性失败
    pub fn is_systemic(&self) -> bool {
        matches!(self, MailError::Credentials | MailError::Auth(_) | MailError::Connect(_))
    }
}

impl From<MailError> for AppError {
    fn from(e: MailError) -> Self {
        match e {
            MailError::Address(addr) => AppError::Validation(format!("invalid email: {addr}")),
            MailError::Credentials => AppError::BizError("mail.credentials.missing".to_string()),
            other => AppError::ExternalApi(other.to_string()),
        }
    }
}

/// 单封邮件内容，HTML 正文 + 纯文本兜底
#[derive(Debug, Clone)]
pub struct MailMessage {
    pub to: String,
    pub subject: String,
    pub html: String,
    pub text: String,
}

#[async_trait]
pub trait MailServiceTrait: Send + Sync {
    /// 发送前连通性探测，系统性失败在这里暴露
    async fn verify(&self) -> Result<(), MailError>;
    /// 发送一封邮件，成功返回传输层 message id。
    /// 单次调用只尝试一次，调用两次就发两封；限速是调用方的事。
    async fn send(&self, mail: &MailMessage) -> Result<String, MailError>;
}

pub struct SmtpMailService {
    transport: AsyncSmtpTransport<Tokio1Executor>,
    from: Mailbox,
    send_timeout: Duration,
}

impl SmtpMailService {
    /// 凭据缺失直接报错，不允许带病进入任何批量流程
    pub fn from_config(cfg: &MailConfig) -> Result<Self, MailError> {
        if cfg.smtp_host.is_empty() || cfg.username.is_empty() || cfg.password.is_empty() {
            return Err(MailError::Credentials);
        }
        let from: Mailbox = cfg.from.parse().map_err(|_| MailError::Address(cfg.from.clone()))?;
        let creds = Credentials::new(cfg.username.clone(), cfg.password.clone());
        let mut builder = AsyncSmtpTransport::<Tokio1Executor>::relay(&cfg.smtp_host)
            .map_err(|e| MailError::Connect(e.to_string()))?
            .credentials(creds);
        if let Some(port) = cfg.smtp_port {
            builder = builder.port(port);
        }
        Ok(Self {
            transport: builder.build(),
            from,
            send_timeout: Duration::from_secs(cfg.send_timeout_secs.unwrap_or(30)),
        })
    }
}

/// SMTP 有响应码的算单收件人投递失败，其余按连接问题处理
fn classify(e: lettre::transport::smtp::Error) -> MailError {
    if e.is_permanent() || e.is_transient() {
        MailError::Send(e.to_string())
    } else {
        MailError::Connect(e.to_string())
    }
}

#[async_trait]
impl MailServiceTrait for SmtpMailService {
    async fn verify(&self) -> Result<(), MailError> {
        let ok = self.transport.test_connection().await.map_err(|e| {
            if e.is_permanent() {
                MailError::Auth(e.to_string())
            } else {
                MailError::Connect(e.to_string())
            }
        })?;
        if ok { Ok(()) } else { Err(MailError::Connect("smtp connection test failed".to_string())) }
    }

    async fn send(&self, mail: &MailMessage) -> Result<String, MailError> {
        // 明显非法的地址直接拒绝，不浪费传输调用
        if !is_valid_email(&mail.to) {
            return Err(MailError::Address(mail.to.clone()));
        }
        let to: Mailbox = mail.to.parse().map_err(|_| MailError::Address(mail.to.clone()))?;
        let message = Message::builder()
            .from(self.from.clone())
            .to(to)
            .subject(mail.subject.clone())
            .multipart(MultiPart::alternative_plain_html(mail.text.clone(), mail.html.clone()))
            .map_err(|e| MailError::Send(e.to_string()))?;

        let secs = self.send_timeout.as_secs();
        match timeout(self.send_timeout, self.transport.send(message)).await {
            Err(_) => Err(MailError::Timeout(secs)),
            Ok(Err(e)) => Err(classify(e)),
            Ok(Ok(resp)) => Ok(resp.message().collect::<Vec<_>>().join(" ")),
        }
    }
}
