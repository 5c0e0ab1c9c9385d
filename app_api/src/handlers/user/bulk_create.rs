use crate::state::AppState;
use actix_web::{Responder, post, web};
use biz_service::biz_service::provision_service::{BulkCreationResult, ProvisionOutcome, ProvisionRequest};
use biz_service::entitys::user_entity::RoleType;
use common::errors::AppError;
use serde::{Deserialize, Serialize};
use utoipa::ToSchema;

pub fn configure(cfg: &mut web::ServiceConfig) {
    cfg.service(bulk_create);
}

/// 批量开通请求体
#[derive(Debug, Deserialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct BulkCreateDto {
    pub users: Vec<BulkCreateItem>,
}

#[derive(Debug, Deserialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct BulkCreateItem {
    /// 邮箱（唯一，大小写不敏感）
    pub email: String,
    /// 角色，缺省为 student
    pub role: Option<RoleType>,
    /// 审核状态，缺省按平台策略
    pub status: Option<bool>,
}

#[derive(Debug, Serialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct BulkCreatedItem {
    pub email: String,
    pub user_id: String,
    pub password: String,
    /// 欢迎邮件是否送出；false 时账号已建好，可走重置口令补发
    pub email_sent: bool,
}

#[derive(Debug, Serialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct BulkErrorItem {
    pub email: String,
    pub error: String,
}

#[derive(Debug, Serialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct BulkCreateResp {
    pub results: Vec<BulkCreatedItem>,
    pub errors: Vec<BulkErrorItem>,
    /// 批前剔除的非法邮箱
    pub rejected: Vec<String>,
}

#[utoipa::path(
    post,
    path = "/bulk-create",
    summary = "批量开通用户",
    tag = "用户管理",
    request_body = BulkCreateDto,
    responses(
        (status = 200, description = "批量结果", body = BulkCreateResp)
    )
)]
#[post("/bulk-create")]
pub async fn bulk_create(dto: web::Json<BulkCreateDto>, state: web::Data<AppState>) -> Result<impl Responder, AppError> {
    let requests: Vec<ProvisionRequest> = dto
        .into_inner()
        .users
        .into_iter()
        .map(|u| ProvisionRequest { email: u.email, role: u.role, approved: u.status })
        .collect();
    let outcome = state.provision_service.bulk_create(requests).await?;
    Ok(web::Json(split(outcome)))
}

fn split(result: BulkCreationResult) -> BulkCreateResp {
    let mut resp = BulkCreateResp { results: vec![], errors: vec![], rejected: result.rejected };
    for outcome in result.outcomes {
        match outcome {
            ProvisionOutcome::Created { email, user_id, password, email_sent } => {
                resp.results.push(BulkCreatedItem { email, user_id, password, email_sent });
            }
            ProvisionOutcome::Failed { email, error } => {
                resp.errors.push(BulkErrorItem { email, error });
            }
        }
    }
    resp
}
