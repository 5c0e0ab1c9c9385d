pub mod common_utils;
pub mod date_util;
pub mod password_util;
pub mod validate;
