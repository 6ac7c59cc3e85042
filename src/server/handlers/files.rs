// 登记文件 API 处理器

use axum::{
    extract::{Path, State},
    http::StatusCode,
    response::IntoResponse,
    Json,
};
use serde::{Deserialize, Serialize};
use tracing::{info, warn};

use crate::orchestrator::{CopyOutcome, OrchestrationError};
use crate::registry::FileReference;
use crate::server::AppState;
use crate::workspace::OpenFileError;

use super::ApiResponse;

/// 错误响应
#[derive(Debug, Serialize)]
struct ErrorResponse {
    code: i32,
    message: String,
}

/// 打开流程错误码
/// 错误码范围：40001 - 40099
fn open_error_code(error: &OpenFileError) -> i32 {
    match error {
        OpenFileError::UnknownFile(_) => 40001,
        OpenFileError::Orchestration(OrchestrationError::NoDestinationConfigured) => 40002,
        OpenFileError::Orchestration(OrchestrationError::DestinationCreateFailed { .. }) => 40003,
        OpenFileError::Orchestration(OrchestrationError::SourceNotFound(_)) => 40004,
        OpenFileError::Orchestration(OrchestrationError::CopyFailed { .. }) => 40005,
    }
}

impl IntoResponse for OpenFileError {
    fn into_response(self) -> axum::response::Response {
        let status = match &self {
            OpenFileError::UnknownFile(_) => StatusCode::NOT_FOUND,
            OpenFileError::Orchestration(OrchestrationError::NoDestinationConfigured) => {
                StatusCode::BAD_REQUEST
            }
            OpenFileError::Orchestration(OrchestrationError::SourceNotFound(_)) => {
                StatusCode::NOT_FOUND
            }
            OpenFileError::Orchestration(_) => StatusCode::INTERNAL_SERVER_ERROR,
        };

        let body = Json(ErrorResponse {
            code: open_error_code(&self),
            message: self.to_string(),
        });

        (status, body).into_response()
    }
}

/// GET /api/v1/files
/// 按登记顺序列出全部文件
pub async fn list_files(
    State(state): State<AppState>,
) -> Json<ApiResponse<Vec<FileReference>>> {
    let files = state.manager.list_files().await;
    Json(ApiResponse::success(files))
}

/// 登记请求（文件选择器与拖放共用同一入口）
#[derive(Debug, Deserialize)]
pub struct RegisterRequest {
    pub paths: Vec<String>,
}

/// 登记响应
#[derive(Debug, Serialize)]
pub struct RegisterResponse {
    /// 本次新增的文件引用
    pub added: Vec<FileReference>,
    /// 因已登记而被跳过的条数
    pub skipped: usize,
}

/// POST /api/v1/files/register
/// 批量登记候选路径
pub async fn register_files(
    State(state): State<AppState>,
    Json(request): Json<RegisterRequest>,
) -> Json<ApiResponse<RegisterResponse>> {
    let total = request.paths.len();
    let added = state.manager.register_paths(&request.paths).await;
    let skipped = total - added.len();

    Json(ApiResponse::success(RegisterResponse { added, skipped }))
}

/// DELETE /api/v1/files/:id
/// 移除登记文件（不触碰历史）
pub async fn remove_file(
    State(state): State<AppState>,
    Path(id): Path<String>,
) -> Result<Json<ApiResponse<String>>, StatusCode> {
    if state.manager.remove_file(&id).await {
        Ok(Json(ApiResponse::success("已移除".to_string())))
    } else {
        warn!("移除失败，未找到登记文件: {}", id);
        Err(StatusCode::NOT_FOUND)
    }
}

/// 颜色修改请求
#[derive(Debug, Deserialize)]
pub struct SetColorRequest {
    pub color: String,
}

/// PUT /api/v1/files/:id/color
/// 修改卡片颜色标签
pub async fn set_color(
    State(state): State<AppState>,
    Path(id): Path<String>,
    Json(request): Json<SetColorRequest>,
) -> Result<Json<ApiResponse<String>>, StatusCode> {
    if state.manager.set_color(&id, &request.color).await {
        Ok(Json(ApiResponse::success("颜色已更新".to_string())))
    } else {
        Err(StatusCode::NOT_FOUND)
    }
}

/// GET /api/v1/files/:id/exists
/// 源文件当前是否可达（用于界面灰显断开的共享文件）
pub async fn source_exists(
    State(state): State<AppState>,
    Path(id): Path<String>,
) -> Result<Json<ApiResponse<bool>>, StatusCode> {
    match state.manager.source_exists(&id).await {
        Some(exists) => Ok(Json(ApiResponse::success(exists))),
        None => Err(StatusCode::NOT_FOUND),
    }
}

/// 复制后打开的响应
#[derive(Debug, Serialize)]
pub struct OpenResponse {
    /// 副本的最终目标路径
    #[serde(rename = "copiedTo")]
    pub copied_to: String,
    /// 系统默认程序是否成功拉起
    pub opened: bool,
    /// 打开失败的原因（复制本身已成功）
    #[serde(rename = "openError", skip_serializing_if = "Option::is_none")]
    pub open_error: Option<String>,
}

/// POST /api/v1/files/:id/open
/// 复制到工作目录并用系统默认程序打开
pub async fn open_file(
    State(state): State<AppState>,
    Path(id): Path<String>,
) -> Result<Json<ApiResponse<OpenResponse>>, OpenFileError> {
    info!("API: 复制后打开 {}", id);

    let outcome = state.manager.open_file(&id).await?;

    let response = match outcome {
        CopyOutcome::Copied { destination } => OpenResponse {
            copied_to: destination.to_string_lossy().to_string(),
            opened: true,
            open_error: None,
        },
        CopyOutcome::CopiedButOpenFailed { destination, reason } => OpenResponse {
            copied_to: destination.to_string_lossy().to_string(),
            opened: false,
            open_error: Some(reason),
        },
    };

    Ok(Json(ApiResponse::success(response)))
}
