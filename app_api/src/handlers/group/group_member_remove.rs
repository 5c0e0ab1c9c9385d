use crate::result::result;
use crate::state::AppState;
use actix_web::{Responder, post, web};
use common::errors::AppError;
use serde::Deserialize;
use utoipa::ToSchema;

pub fn configure(cfg: &mut web::ServiceConfig) {
    cfg.service(group_member_remove);
}

#[derive(Debug, Deserialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct RemoveMemberDto {
    pub user_id: String,
    pub group_id: String,
}

#[utoipa::path(
    post,
    path = "/group/member/remove",
    summary = "把用户移出群组",
    tag = "群组管理",
    request_body = RemoveMemberDto,
    responses(
        (status = 200, description = "移除结果")
    )
)]
#[post("/group/member/remove")]
pub async fn group_member_remove(
    dto: web::Json<RemoveMemberDto>,
    state: web::Data<AppState>,
) -> Result<impl Responder, AppError> {
    state.group_service.remove_user_from_group(&dto.user_id, &dto.group_id).await?;
    Ok(web::Json(result()))
}
