pub mod bulk_create;
pub mod forgot_password;
pub mod regenerate_password;
pub mod send_otp;
