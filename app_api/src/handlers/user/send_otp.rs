use crate::state::AppState;
use actix_web::{Responder, post, web};
use common::errors::AppError;
use serde::{Deserialize, Serialize};
use utoipa::ToSchema;

pub fn configure(cfg: &mut web::ServiceConfig) {
    cfg.service(send_otp);
}

#[derive(Debug, Deserialize, ToSchema)]
pub struct SendOtpDto {
    pub email: String,
    pub otp: String,
    pub name: String,
}

#[derive(Debug, Serialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct SendOtpResp {
    pub message_id: String,
}

#[utoipa::path(
    post,
    path = "/send-otp",
    summary = "发送注册验证码邮件（同邮箱每小时限 5 次）",
    tag = "用户管理",
    request_body = SendOtpDto,
    responses(
        (status = 200, description = "发送结果", body = SendOtpResp),
        (status = 429, description = "触发限频")
    )
)]
#[post("/send-otp")]
pub async fn send_otp(dto: web::Json<SendOtpDto>, state: web::Data<AppState>) -> Result<impl Responder, AppError> {
    let message_id = state.otp_service.send_otp(&dto.email, &dto.name, &dto.otp).await?;
    Ok(web::Json(SendOtpResp { message_id }))
}
