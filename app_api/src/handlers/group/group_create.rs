use crate::state::AppState;
use actix_web::{Responder, post, web};
use biz_service::entitys::group_entity::GroupEntity;
use common::errors::AppError;
use common::util::common_utils::build_uuid;
use common::util::date_util::now;
use serde::{Deserialize, Serialize};
use utoipa::ToSchema;

pub fn configure(cfg: &mut web::ServiceConfig) {
    cfg.service(group_create);
}

/// 创建群组请求体
#[derive(Debug, Deserialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct CreateGroupDto {
    /// 群名称
    pub name: String,
    pub description: Option<String>,
    /// 创建者用户 ID
    pub created_by: String,
}

#[derive(Debug, Serialize, ToSchema)]
pub struct CreateGroupResp {
    pub id: String,
}

#[utoipa::path(
    post,
    path = "/group/create",
    summary = "创建群组",
    tag = "群组管理",
    request_body = CreateGroupDto,
    responses(
        (status = 200, description = "新群组 id", body = CreateGroupResp)
    )
)]
#[post("/group/create")]
pub async fn group_create(dto: web::Json<CreateGroupDto>, state: web::Data<AppState>) -> Result<impl Responder, AppError> {
    let ts = now();
    let group = GroupEntity {
        id: build_uuid(),
        name: dto.name.clone(),
        description: dto.description.clone().unwrap_or_default(),
        created_by: dto.created_by.clone(),
        members: Vec::new(),
        member_count: 0,
        create_time: ts,
        update_time: ts,
    };
    let id = state.group_service.create_group(&group).await?;
    Ok(web::Json(CreateGroupResp { id }))
}
