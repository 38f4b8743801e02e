//! 目录条目
//! 兼容两种分类写法 (tags / primaryTag) 与两种图片写法 (images / imageRefs),
//! 加载时统一归一化为 `Item`, 之后的代码不再关心原始形态

use serde::de::{DeserializeOwned, Deserializer};
use serde::Deserialize;
use serde_json::Value;

/// 数据源中的原始条目, 类型不符的字段视为缺失
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RawItem {
    #[serde(default, deserialize_with = "lenient")]
    pub title: Option<String>,
    #[serde(default, deserialize_with = "lenient")]
    pub creator: Option<String>,
    #[serde(default, deserialize_with = "lenient")]
    pub note: Option<String>,
    #[serde(default, deserialize_with = "lenient")]
    pub tags: Option<Vec<Value>>,
    #[serde(default, deserialize_with = "lenient")]
    pub primary_tag: Option<String>,
    #[serde(default, deserialize_with = "lenient")]
    pub images: Option<Vec<Value>>,
    #[serde(default, deserialize_with = "lenient")]
    pub image_refs: Option<Vec<Value>>,
}

/// `imageRefs` 中的一项
#[derive(Debug, Clone, Default, Deserialize)]
pub struct ImageRef {
    #[serde(default, deserialize_with = "lenient")]
    pub url: Option<String>,
    #[serde(default, deserialize_with = "lenient")]
    pub key: Option<String>,
}

/// 封面引用
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum MediaRef {
    /// data URI、绝对地址或相对路径
    Src(String),
    /// 需要媒体基础地址才有意义的键
    Key(String),
}

/// 归一化后的条目
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct Item {
    pub title: Option<String>,
    pub creator: Option<String>,
    pub note: Option<String>,
    pub tags: Vec<String>,
    pub primary_tag: Option<String>,
    pub media: Option<MediaRef>,
}

impl Item {
    /// 非对象条目得到全部字段缺失的 `Item`
    pub fn from_value(value: Value) -> Self {
        let raw: RawItem = serde_json::from_value(value).unwrap_or_default();
        Self::from(raw)
    }

    /// 主分类: 优先 primaryTag, 否则取第一个分类
    pub fn primary_category(&self) -> Option<&str> {
        self.primary_tag
            .as_deref()
            .or_else(|| self.tags.first().map(String::as_str))
    }
}

impl From<RawItem> for Item {
    fn from(raw: RawItem) -> Self {
        let tags = tags_of(&raw);
        let media = media_ref_of(&raw);
        Self {
            title: non_empty(raw.title),
            creator: non_empty(raw.creator),
            note: non_empty(raw.note),
            tags,
            primary_tag: non_empty(raw.primary_tag),
            media,
        }
    }
}

/// 条目的有效分类: tags 非空时原样返回, 否则 `[primaryTag]`, 都没有时为空
pub fn tags_of(raw: &RawItem) -> Vec<String> {
    if let Some(tags) = raw.tags.as_ref().filter(|t| !t.is_empty()) {
        return tags
            .iter()
            .filter_map(|t| t.as_str().map(str::to_string))
            .collect();
    }
    match raw.primary_tag.as_deref() {
        Some(tag) if !tag.is_empty() => vec![tag.to_string()],
        _ => Vec::new(),
    }
}

/// 选出封面引用: images 非空时取第一项, 否则取 imageRefs 中第一个可用的 url / key
pub fn media_ref_of(raw: &RawItem) -> Option<MediaRef> {
    if let Some(images) = raw.images.as_ref().filter(|i| !i.is_empty()) {
        return images
            .first()
            .and_then(Value::as_str)
            .filter(|s| !s.is_empty())
            .map(|s| MediaRef::Src(s.to_string()));
    }

    raw.image_refs.as_ref()?.iter().find_map(|entry| {
        let image_ref: ImageRef = serde_json::from_value(entry.clone()).ok()?;
        match (non_empty(image_ref.url), non_empty(image_ref.key)) {
            (Some(url), _) => Some(MediaRef::Src(url)),
            (None, Some(key)) => Some(MediaRef::Key(key)),
            (None, None) => None,
        }
    })
}

fn non_empty(value: Option<String>) -> Option<String> {
    value.filter(|v| !v.is_empty())
}

/// 先反序列化为 `Value`, 再尝试转换, 失败时视为缺失
fn lenient<'de, D, T>(deserializer: D) -> Result<Option<T>, D::Error>
where
    D: Deserializer<'de>,
    T: DeserializeOwned,
{
    let value = Value::deserialize(deserializer)?;
    Ok(serde_json::from_value(value).ok())
}
