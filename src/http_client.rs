use once_cell::sync::Lazy;
use reqwest::header::{CACHE_CONTROL, PRAGMA};
use reqwest::Client;
use serde_json::Value;
use thiserror::Error;
use url::Url;

const USER_AGENT: &str = concat!("collection-shelf/", env!("CARGO_PKG_VERSION"));

/// 全局 HTTP 客户端
///
/// 不设置请求超时: 数据源是静态文件, 请求挂起时目录保持加载中状态
pub static HTTP_CLIENT: Lazy<Client> = Lazy::new(|| {
    Client::builder()
        .user_agent(USER_AGENT)
        .gzip(true)
        .brotli(true)
        .build()
        .expect("Failed to create HTTP client")
});

#[derive(Debug, Error)]
pub enum HttpClientError {
    #[error("请求失败: {0}")]
    RequestFailed(String),
    #[error("响应异常状态码: {0}")]
    BadStatus(u16),
    #[error("JSON 解析失败: {0}")]
    InvalidJson(String),
}

/// 不走缓存的 GET 请求, 返回解析后的 JSON
pub async fn get_json_no_store(client: &Client, url: &Url) -> Result<Value, HttpClientError> {
    let response = client
        .get(url.clone())
        .header(CACHE_CONTROL, "no-store")
        .header(PRAGMA, "no-cache")
        .header("Accept", "application/json")
        .send()
        .await
        .map_err(|e| HttpClientError::RequestFailed(e.to_string()))?;

    if !response.status().is_success() {
        return Err(HttpClientError::BadStatus(response.status().as_u16()));
    }

    let body = response
        .bytes()
        .await
        .map_err(|e| HttpClientError::RequestFailed(e.to_string()))?;

    serde_json::from_slice(&body).map_err(|e| HttpClientError::InvalidJson(e.to_string()))
}
