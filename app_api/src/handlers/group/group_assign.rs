use crate::result::result;
use crate::state::AppState;
use actix_web::{Responder, post, web};
use common::errors::AppError;
use serde::Deserialize;
use utoipa::ToSchema;

pub fn configure(cfg: &mut web::ServiceConfig) {
    cfg.service(group_assign);
}

/// 调整用户的群组归属（替换语义）
#[derive(Debug, Deserialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct AssignGroupsDto {
    pub user_id: String,
    /// 调整后的完整群组列表，不在列表里的会被移出
    pub group_ids: Vec<String>,
}

#[utoipa::path(
    post,
    path = "/group/assign",
    summary = "调整用户群组归属",
    tag = "群组管理",
    request_body = AssignGroupsDto,
    responses(
        (status = 200, description = "调整结果")
    )
)]
#[post("/group/assign")]
pub async fn group_assign(dto: web::Json<AssignGroupsDto>, state: web::Data<AppState>) -> Result<impl Responder, AppError> {
    state.group_service.assign_user_to_groups(&dto.user_id, &dto.group_ids).await?;
    Ok(web::Json(result()))
}
