use crate::result::result;
use crate::state::AppState;
use actix_web::{Responder, post, web};
use biz_service::biz_service::mail_template::reset_password_mail;
use biz_service::biz_service::user_service::UserStoreTrait;
use common::errors::AppError;
use serde::Deserialize;
use utoipa::ToSchema;
use validator::Validate;

pub fn configure(cfg: &mut web::ServiceConfig) {
    cfg.service(forgot_password);
}

#[derive(Debug, Deserialize, Validate, ToSchema)]
pub struct ForgotPasswordDto {
    #[validate(email)]
    pub email: String,
}

#[utoipa::path(
    post,
    path = "/forgot-password",
    summary = "发送密码重置邮件",
    tag = "用户管理",
    request_body = ForgotPasswordDto,
    responses(
        (status = 200, description = "受理结果")
    )
)]
#[post("/forgot-password")]
pub async fn forgot_password(
    dto: web::Json<ForgotPasswordDto>,
    state: web::Data<AppState>,
) -> Result<impl Responder, AppError> {
    dto.validate()?;
    // 地址未注册时同样返回成功，不向外暴露注册状态
    if let Some(user) = state.user_service.find_by_email(&dto.email).await? {
        let app_url = state.config.get_sys().app_url;
        state.mail_service.send(&reset_password_mail(&user.email, &app_url)).await.map_err(AppError::from)?;
    }
    Ok(web::Json(result()))
}
