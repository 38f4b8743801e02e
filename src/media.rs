//! 封面地址解析

use crate::item::{Item, MediaRef};

/// 解析条目封面, 无可用封面时返回空字符串
pub fn resolve_media(item: &Item, media_base: Option<&str>) -> String {
    match &item.media {
        Some(MediaRef::Src(src)) => resolve_src(src, media_base),
        Some(MediaRef::Key(key)) => match media_base {
            Some(base) => join_base(base, key),
            None => String::new(),
        },
        None => String::new(),
    }
}

/// data URI 与 http(s) 地址原样返回, 其余视为相对路径
pub fn resolve_src(src: &str, media_base: Option<&str>) -> String {
    if src.starts_with("data:image/") || src.starts_with("http://") || src.starts_with("https://") {
        return src.to_string();
    }
    match media_base {
        Some(base) => join_base(base, src),
        None => src.to_string(),
    }
}

/// 拼接基础地址与相对路径, 中间恰好保留一个斜杠
pub fn join_base(base: &str, path: &str) -> String {
    format!(
        "{}/{}",
        base.trim_end_matches('/'),
        path.trim_start_matches('/')
    )
}
