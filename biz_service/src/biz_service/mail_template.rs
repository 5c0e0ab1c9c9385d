//! 邮件模板渲染：HTML 正文 + 纯文本兜底，内容自包含，不做外部模板引擎

use crate::biz_service::mail_service::MailMessage;
use crate::entitys::announcement_entity::AnnouncementFile;
use common::util::date_util::time_to_str;

pub const PLATFORM_NAME: &str = "EduCloud";

const STYLE: &str = "font-family:-apple-system,BlinkMacSystemFont,'Segoe UI',Roboto,Arial,sans-serif;line-height:1.6;color:#333;";

fn layout(header: &str, body: &str) -> String {
    format!(
        "<!DOCTYPE html><html><body style=\"{STYLE}\">\
         <div style=\"max-width:600px;margin:0 auto;background:#ffffff\">\
         <div style=\"background:#059669;color:white;padding:30px 20px;text-align:center\">\
         <h1 style=\"margin:0\">{PLATFORM_NAME}</h1><p style=\"margin:5px 0 0 0\">{header}</p></div>\
         <div style=\"padding:40px 30px\">{body}</div>\
         <div style=\"background:#f8fafc;text-align:center;padding:25px 20px;color:#64748b;font-size:13px\">\
         <p><strong>{PLATFORM_NAME}</strong> - Learning Community</p>\
         <p>This is an automated email. Please do not reply to this message.</p></div>\
         </div></body></html>"
    )
}

/// 新账号欢迎邮件，携带初始凭据
pub fn welcome_mail(to: &str, password: &str, app_url: &str) -> MailMessage {
    let body = format!(
        "<p>Hello,</p>\
         <p>Welcome to {PLATFORM_NAME}! Your account has been created successfully. Here are your login credentials:</p>\
         <div style=\"background:#f8fafc;border:1px solid #e2e8f0;border-radius:8px;padding:20px;margin:20px 0\">\
         <p><strong>Email:</strong> {to}</p>\
         <p><strong>Password:</strong> {password}</p></div>\
         <p><strong>Important:</strong> For security reasons, you will be required to change your password when you first log in.</p>\
         <p><a href=\"{app_url}/login\" style=\"display:inline-block;padding:12px 24px;background:#10b981;color:white;text-decoration:none;border-radius:6px\">Login to Your Account</a></p>"
    );
    let text = format!(
        "Welcome to {PLATFORM_NAME}!\n\n\
         Your account has been created successfully. Here are your login credentials:\n\n\
         Email: {to}\nPassword: {password}\n\n\
         Important: For security reasons, you will be required to change your password when you first log in.\n\n\
         Login to your account: {app_url}/login\n"
    );
    MailMessage {
        to: to.to_string(),
        subject: format!("Welcome to {PLATFORM_NAME} - Your Account Details"),
        html: layout("Your Account is Ready", &body),
        text,
    }
}

/// 公告通知邮件的动态内容
pub struct AnnouncementMailData<'a> {
    pub title: &'a str,
    pub content: &'a str,
    pub group_names: &'a [String],
    pub files: &'a [AnnouncementFile],
    pub created_at: i64,
}

fn file_badge(file: &AnnouncementFile) -> &'static str {
    if file.is_downloadable { "Downloadable" } else { "View Only" }
}

/// 公告通知：群组徽标 + 正文 + 附件清单（含下载/仅查看标记）
pub fn announcement_mail(to: &str, recipient_name: &str, data: &AnnouncementMailData, app_url: &str) -> MailMessage {
    let badges: String = data
        .group_names
        .iter()
        .map(|name| {
            format!(
                "<span style=\"display:inline-block;background:#d1fae5;color:#065f46;padding:6px 14px;border-radius:16px;margin:2px\">{name}</span>"
            )
        })
        .collect();

    let files_html = if data.files.is_empty() {
        String::new()
    } else {
        let items: String = data
            .files
            .iter()
            .map(|f| {
                format!(
                    "<div style=\"padding:10px;background:white;border:1px solid #e5e7eb;border-radius:6px;margin-bottom:8px\">\
                     {} <span style=\"float:right;font-size:12px\">{}</span></div>",
                    f.name,
                    file_badge(f)
                )
            })
            .collect();
        format!(
            "<div style=\"margin-top:30px;padding:20px;background:#f1f5f9;border-radius:8px\">\
             <h3 style=\"margin-top:0\">Attachments ({})</h3>{items}\
             <p style=\"font-size:14px;color:#64748b\">To download or view these files, please visit your dashboard.</p></div>",
            data.files.len()
        )
    };

    let body = format!(
        "<p>Hello {recipient_name},</p>\
         <p>You have received a new announcement in the following groups:</p>\
         <div>{badges}</div>\
         <h2>{}</h2>\
         <div style=\"background:#f8fafc;border-left:4px solid #10b981;padding:20px;margin:20px 0;white-space:pre-wrap\">{}</div>\
         <p style=\"color:#64748b;font-size:14px\">Posted: {}</p>\
         {files_html}\
         <p><a href=\"{app_url}/groups\" style=\"display:inline-block;padding:12px 24px;background:#10b981;color:white;text-decoration:none;border-radius:6px\">View in Dashboard</a></p>",
        data.title,
        data.content,
        time_to_str(data.created_at),
    );

    let files_text = if data.files.is_empty() {
        String::new()
    } else {
        let items: String =
            data.files.iter().map(|f| format!("- {} ({})\n", f.name, file_badge(f))).collect();
        format!("\nThis announcement includes {} attachment(s):\n{items}", data.files.len())
    };
    let text = format!(
        "Hello {recipient_name},\n\n\
         You have received a new announcement in the following groups:\n{}\n\n\
         {}\n\n{}\n{files_text}\n\
         View this announcement in your {PLATFORM_NAME} dashboard: {app_url}/groups\n",
        data.group_names.iter().map(|n| format!("- {n}")).collect::<Vec<_>>().join("\n"),
        data.title,
        data.content,
    );

    MailMessage {
        to: to.to_string(),
        subject: format!("New Announcement: {} - {PLATFORM_NAME}", data.title),
        html: layout("New Announcement", &body),
        text,
    }
}

/// 密码重置引导邮件
pub fn reset_password_mail(to: &str, app_url: &str) -> MailMessage {
    let body = format!(
        "<p>Hello,</p>\
         <p>We received a request to reset your password for your {PLATFORM_NAME} account. Click the button below to reset your password:</p>\
         <p><a href=\"{app_url}/reset-password\" style=\"display:inline-block;padding:12px 24px;background:#10b981;color:white;text-decoration:none;border-radius:6px\">Reset Password</a></p>\
         <p><strong>Important:</strong> This link will expire in 1 hour. If you did not request a password reset, please ignore this email.</p>"
    );
    let text = format!(
        "Reset Your {PLATFORM_NAME} Password\n\n\
         We received a request to reset your password. Open the link below to continue:\n\n\
         {app_url}/reset-password\n\n\
         Important: This link will expire in 1 hour. If you did not request a password reset, please ignore this email.\n"
    );
    MailMessage {
        to: to.to_string(),
        subject: format!("Reset Your {PLATFORM_NAME} Password"),
        html: layout("Reset Your Password", &body),
        text,
    }
}

/// 注册验证码邮件
pub fn otp_mail(to: &str, name: &str, otp: &str) -> MailMessage {
    let body = format!(
        "<p>Hello {name},</p>\
         <p>To complete your registration and verify your email address, please use the verification code below:</p>\
         <div style=\"background:#f8fafc;border:2px solid #e2e8f0;border-radius:12px;padding:30px;margin:30px 0;text-align:center\">\
         <div style=\"font-size:48px;letter-spacing:12px;color:#3b82f6;font-weight:700;font-family:monospace\">{otp}</div>\
         <p style=\"color:#ef4444;font-size:14px\">This code expires in 10 minutes</p></div>\
         <p><strong>Security Notice:</strong> Never share this code with anyone. {PLATFORM_NAME} staff will never ask for your verification code.</p>"
    );
    let text = format!(
        "Hello {name},\n\n\
         Your {PLATFORM_NAME} verification code is: {otp}\n\n\
         This code will expire in 10 minutes.\n\n\
         If you didn't request this code, please ignore this email.\n"
    );
    MailMessage {
        to: to.to_string(),
        subject: format!("Verify your {PLATFORM_NAME} Account - OTP"),
        html: layout("Email Verification", &body),
        text,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn file(name: &str, downloadable: bool) -> AnnouncementFile {
        AnnouncementFile { name: name.to_string(), is_downloadable: downloadable, ..Default::default() }
    }

    #[test]
    fn welcome_mail_carries_credentials_and_login_link() {
        let mail = welcome_mail("new@example.com", "Aa1!xyzXYZ12", "https://portal.test");
        assert_eq!(mail.to, "new@example.com");
        assert!(mail.html.contains("Aa1!xyzXYZ12"));
        assert!(mail.text.contains("Aa1!xyzXYZ12"));
        assert!(mail.html.contains("https://portal.test/login"));
    }

    #[test]
    fn announcement_mail_renders_groups_and_file_badges() {
        let files = vec![file("slides.pdf", true), file("exam.pdf", false)];
        let groups = vec!["Linux Basics".to_string(), "Shell Scripting".to_string()];
        let data = AnnouncementMailData {
            title: "Week 3 schedule",
            content: "Lab moved to Friday.",
            group_names: &groups,
            files: &files,
            created_at: 1_700_000_000,
        };
        let mail = announcement_mail("u1@example.com", "Li Lei", &data, "https://portal.test");
        assert!(mail.subject.contains("Week 3 schedule"));
        assert!(mail.html.contains("Linux Basics"));
        assert!(mail.html.contains("Shell Scripting"));
        assert!(mail.html.contains("slides.pdf"));
        assert!(mail.html.contains("Downloadable"));
        assert!(mail.html.contains("View Only"));
        assert!(mail.text.contains("- slides.pdf (Downloadable)"));
        assert!(mail.text.contains("- exam.pdf (View Only)"));
    }

    #[test]
    fn announcement_mail_omits_attachment_block_when_no_files() {
        let groups = vec!["Linux Basics".to_string()];
        let data = AnnouncementMailData {
            title: "No files here",
            content: "Plain announcement.",
            group_names: &groups,
            files: &[],
            created_at: 1_700_000_000,
        };
        let mail = announcement_mail("u1@example.com", "Han Meimei", &data, "https://portal.test");
        assert!(!mail.html.contains("Attachments"));
        assert!(!mail.text.contains("attachment"));
    }

    #[test]
    fn otp_mail_contains_code() {
        let mail = otp_mail("s@example.com", "Wang", "482913");
        assert!(mail.html.contains("482913"));
        assert!(mail.text.contains("482913"));
    }
}
