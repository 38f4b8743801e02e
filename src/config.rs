//! 启动配置
//! 启动时从环境变量读取一次, 空值视为未设置

use crate::render::SelectorStyle;
use std::path::PathBuf;
use thiserror::Error;
use url::Url;

const DEFAULT_PORT: u16 = 3000;
const DEFAULT_ITEMS_FILE: &str = "items.json";

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("PORT 无效: {0}")]
    InvalidPort(String),
    #[error("SHELF_SITE_URL 无效: {0}")]
    InvalidSiteUrl(String),
    #[error("SHELF_SELECTOR 无效: {0} (可选 chips / select)")]
    InvalidSelector(String),
}

#[derive(Debug, Clone)]
pub struct Config {
    pub port: u16,
    /// 数据源地址覆盖
    pub data_url: Option<String>,
    /// 媒体基础地址
    pub media_base: Option<String>,
    /// 相对候选地址的解析基准
    pub site_url: Url,
    /// `/items.json` 对应的静态文件
    pub items_file: PathBuf,
    pub selector: SelectorStyle,
}

impl Config {
    pub fn from_env() -> Result<Self, ConfigError> {
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    pub fn from_lookup<F>(lookup: F) -> Result<Self, ConfigError>
    where
        F: Fn(&str) -> Option<String>,
    {
        let get = |key: &str| {
            lookup(key)
                .map(|v| v.trim().to_string())
                .filter(|v| !v.is_empty())
        };

        let port = match get("PORT") {
            Some(raw) => raw.parse().map_err(|_| ConfigError::InvalidPort(raw))?,
            None => DEFAULT_PORT,
        };

        let mut site_url = match get("SHELF_SITE_URL") {
            Some(raw) => Url::parse(&raw).map_err(|_| ConfigError::InvalidSiteUrl(raw))?,
            None => Url::parse(&format!("http://127.0.0.1:{}/", port))
                .map_err(|e| ConfigError::InvalidSiteUrl(e.to_string()))?,
        };

        // 站点地址按目录处理, 否则 join 会替换最后一段路径
        if !site_url.path().ends_with('/') {
            let path = format!("{}/", site_url.path());
            site_url.set_path(&path);
        }

        let selector = match get("SHELF_SELECTOR") {
            Some(raw) => raw
                .parse()
                .map_err(|_| ConfigError::InvalidSelector(raw))?,
            None => SelectorStyle::default(),
        };

        Ok(Self {
            port,
            data_url: get("SHELF_DATA_URL"),
            media_base: get("SHELF_MEDIA_BASE"),
            site_url,
            items_file: get("SHELF_ITEMS_FILE")
                .map(PathBuf::from)
                .unwrap_or_else(|| PathBuf::from(DEFAULT_ITEMS_FILE)),
            selector,
        })
    }
}
