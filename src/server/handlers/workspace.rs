// 工作目录 API 处理器

use axum::{extract::State, Json};
use serde::{Deserialize, Serialize};
use tracing::{info, warn};

use crate::config::PathValidationResult;
use crate::server::AppState;

use super::ApiResponse;

/// 工作区信息响应
#[derive(Debug, Serialize)]
pub struct WorkspaceResponse {
    /// 当前配置的工作目录，未设置时为空串
    #[serde(rename = "destinationFolder")]
    pub destination_folder: String,
}

/// GET /api/v1/workspace
/// 读取工作目录配置
pub async fn get_workspace(
    State(state): State<AppState>,
) -> Json<ApiResponse<WorkspaceResponse>> {
    let destination_folder = state.manager.destination_folder().await;
    Json(ApiResponse::success(WorkspaceResponse { destination_folder }))
}

/// 工作目录设置请求
#[derive(Debug, Deserialize)]
pub struct SetDestinationRequest {
    pub path: String,
}

/// PUT /api/v1/workspace/destination
/// 设置工作目录（要求绝对路径；已存在时必须是可写目录）
pub async fn set_destination(
    State(state): State<AppState>,
    Json(request): Json<SetDestinationRequest>,
) -> Json<ApiResponse<PathValidationResult>> {
    info!("API: 设置工作目录 {}", request.path);

    match state.manager.set_destination_folder(&request.path).await {
        Ok(validation) => Json(ApiResponse::success(validation)),
        Err(e) => {
            warn!("设置工作目录失败: {}", e);
            Json(ApiResponse::error(400, e.to_string()))
        }
    }
}

/// POST /api/v1/workspace/open-folder
/// 在系统文件管理器中打开工作目录
///
/// 目录未设置或不存在时返回 false，不报错
pub async fn open_destination_folder(
    State(state): State<AppState>,
) -> Json<ApiResponse<bool>> {
    let opened = state.manager.open_destination_folder().await;
    Json(ApiResponse::success(opened))
}
