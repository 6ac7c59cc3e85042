use axum::{
    routing::{delete, get, post, put},
    Json, Router,
};
use serde::Serialize;
use shared_file_opener_rust::{
    config::LogConfig, logging, server::handlers, AppState,
};
use std::path::PathBuf;
use tower::ServiceBuilder;
use tower_http::{
    cors::{Any, CorsLayer},
    services::{ServeDir, ServeFile},
    trace::TraceLayer,
};
use tracing::info;

/// 智能检测前端资源目录
/// 按优先级尝试以下路径：
/// 1. ./frontend/dist - 开发环境标准路径
/// 2. ./frontend - 打包路径（dist 内容直接在 frontend 下）
/// 3. ../frontend/dist - 源码目录结构
/// 4. ./dist - 手动部署备选路径
/// 5. {exe_dir}/frontend/dist - 相对于可执行文件的路径
fn detect_frontend_dir() -> PathBuf {
    let mut candidates = vec![
        PathBuf::from("./frontend/dist"),
        PathBuf::from("./frontend"),
        PathBuf::from("../frontend/dist"),
        PathBuf::from("./dist"),
    ];

    if let Ok(exe_path) = std::env::current_exe() {
        if let Some(exe_dir) = exe_path.parent() {
            candidates.push(exe_dir.join("frontend/dist"));
            candidates.push(exe_dir.join("frontend"));
        }
    }

    for path in &candidates {
        if path.exists() && path.is_dir() {
            // 验证是否包含 index.html（确保是有效的前端构建）
            if path.join("index.html").exists() {
                info!(
                    "✓ 找到前端资源目录: {:?}",
                    path.canonicalize().unwrap_or(path.clone())
                );
                return path.clone();
            }
        }
    }

    let default = PathBuf::from("./frontend/dist");
    tracing::warn!(
        "⚠️  未找到前端资源目录，使用默认路径: {:?}，仅提供 API 服务",
        default
    );
    default
}

/// 加载日志配置
///
/// 尝试从配置文件加载，失败时返回默认配置
async fn load_log_config() -> LogConfig {
    let config_path = shared_file_opener_rust::server::state::CONFIG_PATH;
    if let Ok(content) = tokio::fs::read_to_string(config_path).await {
        if let Ok(config) = toml::from_str::<toml::Value>(&content) {
            if let Some(log_table) = config.get("log") {
                if let Ok(log_config) = log_table.clone().try_into::<LogConfig>() {
                    return log_config;
                }
            }
        }
    }

    LogConfig::default()
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    // 先尝试加载日志配置，失败时使用默认配置
    let log_config = load_log_config().await;

    // 初始化日志系统（必须保持 _log_guard 存活）
    let _log_guard = logging::init_logging(&log_config);

    info!("Shared File Opener Rust v0.3.0 启动中...");

    // 创建应用状态（加载 settings.json 并构建工作区管理器）
    let app_state = AppState::new().await?;
    info!("应用状态初始化完成");

    // 获取配置
    let config = app_state.config.read().await.clone();
    let addr = format!("{}:{}", config.server.host, config.server.port);

    // 配置中间件层
    let middleware = ServiceBuilder::new()
        .layer(TraceLayer::new_for_http()) // HTTP 请求日志
        .layer(
            CorsLayer::new()
                .allow_origin(Any)
                .allow_methods(Any)
                .allow_headers(Any),
        );

    // API 路由
    let api_routes = Router::new()
        // 登记文件API
        .route("/files", get(handlers::list_files))
        .route("/files/register", post(handlers::register_files))
        .route("/files/:id", delete(handlers::remove_file))
        .route("/files/:id/color", put(handlers::set_color))
        .route("/files/:id/exists", get(handlers::source_exists))
        .route("/files/:id/open", post(handlers::open_file))
        // 工作目录API
        .route("/workspace", get(handlers::get_workspace))
        .route("/workspace/destination", put(handlers::set_destination))
        .route(
            "/workspace/open-folder",
            post(handlers::open_destination_folder),
        )
        // 历史API
        .route("/history", get(handlers::get_history))
        .route("/history", delete(handlers::clear_history))
        .with_state(app_state.clone());

    // 自动检测前端资源目录
    let frontend_dir = detect_frontend_dir();
    let index_html_path = frontend_dir.join("index.html");

    // 静态文件服务（前端资源）
    let static_service =
        ServeDir::new(&frontend_dir).not_found_service(ServeFile::new(&index_html_path));

    // 健康检查响应结构
    #[derive(Serialize)]
    struct HealthResponse {
        status: String,
        service: String,
    }

    // 健康检查处理器
    async fn health_check() -> Json<HealthResponse> {
        Json(HealthResponse {
            status: "ok".to_string(),
            service: "shared-file-opener-rust".to_string(),
        })
    }

    // 构建完整应用
    let app = Router::new()
        .nest("/api/v1", api_routes)
        .route("/health", get(health_check))
        .fallback_service(static_service)
        .layer(middleware);

    // 启动服务器
    info!("服务器启动在: http://{}", addr);
    info!("API 基础路径: http://{}/api/v1", addr);
    info!("健康检查: http://{}/health", addr);
    info!("前端页面: http://{}/", addr);

    let listener = tokio::net::TcpListener::bind(&addr).await?;

    // 使用 select! 监听关闭信号，支持优雅关闭
    let server = axum::serve(listener, app);

    tokio::select! {
        result = server => {
            if let Err(e) = result {
                tracing::error!("服务器错误: {}", e);
            }
        }
        _ = tokio::signal::ctrl_c() => {
            info!("收到 Ctrl+C，开始优雅关闭...");
        }
    }

    info!("应用已安全退出");

    Ok(())
}
