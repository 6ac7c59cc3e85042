// 历史记录 API 处理器

use axum::{extract::State, Json};
use tracing::info;

use crate::history::HistoryEntry;
use crate::server::AppState;

use super::ApiResponse;

/// GET /api/v1/history
/// 按最近优先列出打开历史（最多 50 条）
pub async fn get_history(
    State(state): State<AppState>,
) -> Json<ApiResponse<Vec<HistoryEntry>>> {
    let entries = state.manager.history().await;
    Json(ApiResponse::success(entries))
}

/// DELETE /api/v1/history
/// 清空打开历史
pub async fn clear_history(
    State(state): State<AppState>,
) -> Json<ApiResponse<String>> {
    info!("API: 清空打开历史");
    state.manager.clear_history().await;
    Json(ApiResponse::success("历史已清空".to_string()))
}
