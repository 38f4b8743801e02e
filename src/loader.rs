//! 目录加载器
//! 按顺序尝试候选数据源, 返回第一个成功解析的 items 数组, 全部失败时返回空列表

use crate::config::Config;
use crate::http_client::{get_json_no_store, HttpClientError};
use reqwest::Client;
use serde_json::Value;
use thiserror::Error;
use tracing::{debug, info};
use url::Url;

/// 约定的默认数据文件
pub const DEFAULT_SOURCE: &str = "items.json";

#[derive(Debug, Error)]
pub enum LoadError {
    #[error(transparent)]
    Http(#[from] HttpClientError),
    #[error("响应缺少 items 数组")]
    MissingItems,
}

/// 候选数据源: 配置的地址在前, 默认文件在后; 相对地址按站点地址解析, 去重保序
pub fn candidate_sources(config: &Config) -> Vec<Url> {
    let mut candidates: Vec<Url> = Vec::new();

    for raw in config.data_url.iter().map(String::as_str).chain([DEFAULT_SOURCE]) {
        match config.site_url.join(raw) {
            Ok(url) => {
                if !candidates.contains(&url) {
                    candidates.push(url);
                }
            }
            Err(e) => debug!("跳过无效数据源 {}: {}", raw, e),
        }
    }

    candidates
}

/// 依次尝试候选数据源
pub async fn load_items(client: &Client, candidates: &[Url]) -> Vec<Value> {
    for url in candidates {
        match fetch_items(client, url).await {
            Ok(items) => {
                info!("📦 从 {} 加载了 {} 个条目", url, items.len());
                return items;
            }
            Err(e) => debug!("数据源 {} 不可用: {}", url, e),
        }
    }

    info!("所有数据源均不可用, 目录为空");
    Vec::new()
}

/// 获取单个数据源的 items 数组
pub async fn fetch_items(client: &Client, url: &Url) -> Result<Vec<Value>, LoadError> {
    let mut payload = get_json_no_store(client, url).await?;
    match payload.get_mut("items").map(Value::take) {
        Some(Value::Array(items)) => Ok(items),
        _ => Err(LoadError::MissingItems),
    }
}
