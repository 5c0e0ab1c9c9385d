pub mod announcement_service;
pub mod group_service;
pub mod mail_service;
pub mod mail_template;
pub mod notify_service;
pub mod otp_service;
pub mod provision_service;
pub mod user_service;
