pub mod announcement;
pub mod common_handler;
pub mod group;
pub mod swagger;
pub mod user;

use actix_web::web;

pub fn configure(cfg: &mut web::ServiceConfig) {
    swagger::configure(cfg);
    common_handler::configure(cfg);
    user::bulk_create::configure(cfg);
    user::regenerate_password::configure(cfg);
    user::forgot_password::configure(cfg);
    user::send_otp::configure(cfg);
    group::group_create::configure(cfg);
    group::group_assign::configure(cfg);
    group::group_member_remove::configure(cfg);
    announcement::announcement_create::configure(cfg);
    announcement::announcement_view::configure(cfg);
    announcement::notify_send::configure(cfg);
    announcement::notify_status::configure(cfg);
}
