mod config;
mod filter;
mod http_client;
mod item;
mod loader;
mod media;
mod render;
mod shelf;

use axum::{
    extract::State,
    http::{header, Method, StatusCode},
    response::{Html, IntoResponse, Response},
    routing::{get, post},
    Json, Router,
};
use serde_json::json;
use std::net::SocketAddr;
use std::path::PathBuf;
use std::sync::Arc;
use tower_http::cors::{Any, CorsLayer};
use tower_http::trace::TraceLayer;
use tracing::{info, warn};
use tracing_subscriber::EnvFilter;

use crate::config::Config;
use crate::filter::Event;
use crate::http_client::HTTP_CLIENT;
use crate::shelf::Shelf;

#[derive(Clone)]
struct AppState {
    shelf: Arc<Shelf>,
    items_file: Arc<PathBuf>,
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    // 初始化日志
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")),
        )
        .with_target(false)
        .with_thread_ids(false)
        .with_file(false)
        .with_line_number(false)
        .init();

    let config = Config::from_env()?;
    let shelf = Arc::new(Shelf::new(config.media_base.clone(), config.selector));
    let state = AppState {
        shelf: shelf.clone(),
        items_file: Arc::new(config.items_file.clone()),
    };

    let app = build_router(state);

    let addr = SocketAddr::from(([0, 0, 0, 0], config.port));
    let listener = tokio::net::TcpListener::bind(addr).await?;
    info!("🚀 收藏目录启动在 http://{}", addr);

    // 默认数据源由本服务提供, 监听后再开始加载
    let candidates = loader::candidate_sources(&config);
    info!(
        "📡 数据源: {}",
        candidates
            .iter()
            .map(|u| u.as_str())
            .collect::<Vec<_>>()
            .join(", ")
    );
    tokio::spawn(async move {
        let items = loader::load_items(&HTTP_CLIENT, &candidates).await;
        if shelf.finish_loading(items) {
            info!("📚 目录就绪: {} 个条目", shelf.items().len());
        }
    });

    axum::serve(listener, app).await?;
    Ok(())
}

fn build_router(state: AppState) -> Router {
    // CORS 配置
    let cors = CorsLayer::new()
        .allow_origin(Any)
        .allow_methods([Method::GET, Method::POST, Method::OPTIONS])
        .allow_headers([header::CONTENT_TYPE]);

    Router::new()
        .route("/", get(index_handler))
        .route("/items.json", get(items_file_handler))
        .route("/view", get(view_handler))
        .route("/events", post(event_handler))
        .route("/api", get(api_info_handler))
        .route("/health", get(health_handler))
        .layer(cors)
        .layer(TraceLayer::new_for_http())
        .with_state(state)
}

/// GET / - 目录页面
async fn index_handler() -> Html<&'static str> {
    Html(INDEX_HTML)
}

/// GET /items.json - 静态目录文件
async fn items_file_handler(State(state): State<AppState>) -> Response {
    match tokio::fs::read(state.items_file.as_path()).await {
        Ok(bytes) => (
            StatusCode::OK,
            [
                (header::CONTENT_TYPE, "application/json; charset=utf-8"),
                (header::CACHE_CONTROL, "no-store"),
            ],
            bytes,
        )
            .into_response(),
        Err(e) => {
            warn!("读取目录文件 {} 失败: {}", state.items_file.display(), e);
            (
                StatusCode::NOT_FOUND,
                Json(json!({"error": "items.json not found"})),
            )
                .into_response()
        }
    }
}

/// GET /view - 当前视图
async fn view_handler(State(state): State<AppState>) -> impl IntoResponse {
    Json(state.shelf.view())
}

/// POST /events - 处理一次用户交互
async fn event_handler(
    State(state): State<AppState>,
    Json(event): Json<Event>,
) -> impl IntoResponse {
    Json(state.shelf.dispatch(event))
}

/// GET /api - API 信息
async fn api_info_handler() -> impl IntoResponse {
    Json(json!({
        "name": "Collection Shelf",
        "version": env!("CARGO_PKG_VERSION"),
        "description": "收藏品目录浏览器",
        "endpoints": {
            "GET /": "目录页面",
            "GET /items.json": "静态目录文件",
            "GET /view": "当前视图",
            "POST /events": "交互事件 (JSON: {type: search, query} 或 {type: selectCategory, category})",
            "GET /health": "健康检查"
        }
    }))
}

/// 健康检查
async fn health_handler(State(state): State<AppState>) -> impl IntoResponse {
    Json(json!({
        "status": "ok",
        "phase": state.shelf.phase(),
        "timestamp": chrono::Utc::now().to_rfc3339()
    }))
}

const INDEX_HTML: &str = r#"<!DOCTYPE html>
<html lang="zh-Hant">
<head>
  <meta charset="UTF-8">
  <meta name="viewport" content="width=device-width, initial-scale=1.0">
  <title>收藏目錄</title>
  <style>
    * { margin: 0; padding: 0; box-sizing: border-box; }
    body {
      font-family: -apple-system, BlinkMacSystemFont, 'Segoe UI', Roboto, sans-serif;
      background: #f6f3ee;
      min-height: 100vh;
      color: #2b2b2b;
      padding: 20px;
    }
    .container { max-width: 1100px; margin: 0 auto; }
    h1 { text-align: center; font-size: 2rem; margin: 30px 0 20px; }
    input[type="search"] {
      width: 100%;
      padding: 14px 18px;
      border: 1px solid #ddd5c8;
      border-radius: 12px;
      background: #fff;
      font-size: 16px;
      outline: none;
    }
    input[type="search"]:focus { border-color: #b08d57; }
    #selector { display: flex; flex-wrap: wrap; gap: 8px; margin: 16px 0 24px; }
    .chip {
      padding: 6px 14px;
      border: 1px solid #ddd5c8;
      border-radius: 999px;
      background: #fff;
      color: #555;
      font-size: 14px;
      cursor: pointer;
    }
    .chip.active { background: #b08d57; border-color: #b08d57; color: #fff; }
    .chip.small { padding: 2px 8px; font-size: 12px; cursor: default; }
    .category-select { padding: 8px 12px; border-radius: 8px; border: 1px solid #ddd5c8; font-size: 14px; }
    #grid { display: grid; grid-template-columns: repeat(auto-fill, minmax(220px, 1fr)); gap: 20px; }
    .card { background: #fff; border-radius: 14px; overflow: hidden; box-shadow: 0 2px 8px rgba(0,0,0,0.06); }
    .card .image { aspect-ratio: 1 / 1; background: #ece6dc; }
    .card .image img { width: 100%; height: 100%; object-fit: cover; display: block; }
    .card .title { font-weight: 600; padding: 12px 14px 4px; }
    .card .meta { color: #888; font-size: 13px; padding: 0 14px 8px; }
    .card .chip-list { display: flex; flex-wrap: wrap; gap: 6px; padding: 0 14px 10px; }
    .card .note { font-size: 13px; color: #555; padding: 0 14px 14px; white-space: pre-wrap; }
    #empty { display: none; text-align: center; color: #999; padding: 60px 0; }
  </style>
</head>
<body>
  <div class="container">
    <h1>收藏目錄</h1>
    <input type="search" id="search" placeholder="搜尋標題、作者或分類" autocomplete="off">
    <div id="selector"></div>
    <div id="grid"></div>
    <div id="empty">沒有符合的項目</div>
  </div>
  <script>
    const grid = document.getElementById('grid');
    const empty = document.getElementById('empty');
    const searchInput = document.getElementById('search');
    const selector = document.getElementById('selector');
    let seq = 0;

    function apply(view, id) {
      if (id !== seq) return;
      if (view.phase === 'loading') {
        setTimeout(refresh, 400);
        return;
      }
      grid.innerHTML = view.cards;
      empty.style.display = view.showEmpty ? 'block' : 'none';
      selector.innerHTML = view.selector;
    }

    async function refresh() {
      const id = ++seq;
      try {
        const res = await fetch('/view', { cache: 'no-store' });
        const view = await res.json();
        if (id === 1) searchInput.value = view.query;
        apply(view, id);
      } catch (e) {
        if (id === seq) setTimeout(refresh, 1000);
      }
    }

    async function send(event) {
      const id = ++seq;
      try {
        const res = await fetch('/events', {
          method: 'POST',
          headers: { 'Content-Type': 'application/json' },
          body: JSON.stringify(event)
        });
        apply(await res.json(), id);
      } catch (e) {
        if (id === seq) setTimeout(refresh, 1000);
      }
    }

    searchInput.addEventListener('input', () => send({ type: 'search', query: searchInput.value }));
    selector.addEventListener('click', e => {
      const btn = e.target.closest('[data-category]');
      if (btn) send({ type: 'selectCategory', category: btn.dataset.category });
    });
    selector.addEventListener('change', e => {
      if (e.target.id === 'category') send({ type: 'selectCategory', category: e.target.value });
    });

    refresh();
  </script>
</body>
</html>
"#;
