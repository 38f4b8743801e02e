//! 过滤与搜索
//! 分类条件与关键词条件同时满足才保留, 保持原有顺序

use crate::item::Item;
use serde::{Deserialize, Serialize};
use std::collections::BTreeSet;

/// "全部" 哨兵值
pub const ALL: &str = "all";

/// 当前分类筛选
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(from = "String", into = "String")]
pub enum CategoryFilter {
    #[default]
    All,
    Only(String),
}

impl CategoryFilter {
    pub fn as_str(&self) -> &str {
        match self {
            Self::All => ALL,
            Self::Only(category) => category,
        }
    }

    /// 分类精确匹配 (区分大小写)
    pub fn matches(&self, item: &Item) -> bool {
        match self {
            Self::All => true,
            Self::Only(category) => item.tags.iter().any(|t| t == category),
        }
    }
}

impl From<String> for CategoryFilter {
    fn from(value: String) -> Self {
        if value == ALL {
            Self::All
        } else {
            Self::Only(value)
        }
    }
}

impl From<&str> for CategoryFilter {
    fn from(value: &str) -> Self {
        Self::from(value.to_string())
    }
}

impl From<CategoryFilter> for String {
    fn from(value: CategoryFilter) -> Self {
        value.as_str().to_string()
    }
}

/// 用户交互事件
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
#[serde(tag = "type", rename_all = "camelCase")]
pub enum Event {
    Search { query: String },
    SelectCategory { category: CategoryFilter },
}

/// 过滤状态
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize)]
pub struct FilterState {
    pub category: CategoryFilter,
    pub query: String,
}

impl FilterState {
    pub fn handle(self, event: Event) -> Self {
        match event {
            Event::Search { query } => Self { query, ..self },
            Event::SelectCategory { category } => Self { category, ..self },
        }
    }

    pub fn apply<'a>(&self, items: &'a [Item]) -> Vec<&'a Item> {
        filter_items(items, &self.category, &self.query)
    }
}

/// 按分类与关键词过滤
pub fn filter_items<'a>(
    items: &'a [Item],
    category: &CategoryFilter,
    query: &str,
) -> Vec<&'a Item> {
    let query = query.trim().to_lowercase();
    items
        .iter()
        .filter(|item| category.matches(item))
        .filter(|item| query.is_empty() || haystack(item).contains(&query))
        .collect()
}

/// 标题、作者与所有分类以空格连接后转小写
pub fn haystack(item: &Item) -> String {
    let mut parts = vec![
        item.title.as_deref().unwrap_or(""),
        item.creator.as_deref().unwrap_or(""),
    ];
    parts.extend(item.tags.iter().map(String::as_str));
    parts.join(" ").to_lowercase()
}

/// 全部条目出现过的分类, 去重并升序排列 ("全部" 不在其中)
pub fn category_options(items: &[Item]) -> Vec<String> {
    items
        .iter()
        .flat_map(|item| item.tags.iter())
        .filter(|tag| tag.as_str() != ALL)
        .cloned()
        .collect::<BTreeSet<_>>()
        .into_iter()
        .collect()
}
