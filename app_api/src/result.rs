use serde::{Deserialize, Serialize};
use serde_json::Value;
use std::fmt::Debug;
use utoipa::ToSchema;

#[derive(Debug, Serialize, Deserialize, Clone, ToSchema)]
pub struct ApiResponse<T> {
    code: i32,
    message: String,
    data: Option<T>,
}

pub fn result() -> Value {
    serde_json::json!({"code":200})
}
pub fn result_data<T: Serialize + Debug>(data: T) -> Value {
    serde_json::json!({"code":200,"data":data})
}
