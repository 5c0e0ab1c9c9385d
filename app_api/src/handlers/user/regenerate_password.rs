use crate::state::AppState;
use actix_web::{Responder, post, web};
use common::errors::AppError;
use serde::{Deserialize, Serialize};
use utoipa::ToSchema;

pub fn configure(cfg: &mut web::ServiceConfig) {
    cfg.service(regenerate_password);
}

#[derive(Debug, Deserialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct RegeneratePasswordDto {
    pub user_id: String,
    /// 二次确认用，必须与账号邮箱一致
    pub email: String,
}

#[derive(Debug, Serialize, ToSchema)]
pub struct RegeneratePasswordResp {
    pub password: String,
}

#[utoipa::path(
    post,
    path = "/regenerate-password",
    summary = "重置口令并重发凭据邮件",
    tag = "用户管理",
    request_body = RegeneratePasswordDto,
    responses(
        (status = 200, description = "新口令", body = RegeneratePasswordResp)
    )
)]
#[post("/regenerate-password")]
pub async fn regenerate_password(
    dto: web::Json<RegeneratePasswordDto>,
    state: web::Data<AppState>,
) -> Result<impl Responder, AppError> {
    let password = state.provision_service.regenerate_password(&dto.user_id, &dto.email).await?;
    Ok(web::Json(RegeneratePasswordResp { password }))
}
