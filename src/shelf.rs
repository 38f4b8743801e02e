//! 目录状态
//! 持有只写一次的目录与过滤状态, 负责事件处理与渲染

use crate::filter::{CategoryFilter, Event, FilterState};
use crate::item::Item;
use crate::render::{render, SelectorStyle};
use once_cell::sync::OnceCell;
use serde::Serialize;
use serde_json::Value;
use std::sync::{Mutex, PoisonError};
use tracing::debug;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum Phase {
    Loading,
    Ready,
}

/// 页面可直接使用的视图
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct View {
    pub phase: Phase,
    pub cards: String,
    pub show_empty: bool,
    pub selector: String,
    pub shown: usize,
    pub total: usize,
    pub category: CategoryFilter,
    pub query: String,
}

pub struct Shelf {
    catalog: OnceCell<Vec<Item>>,
    filter: Mutex<FilterState>,
    media_base: Option<String>,
    selector: SelectorStyle,
}

impl Shelf {
    pub fn new(media_base: Option<String>, selector: SelectorStyle) -> Self {
        Self {
            catalog: OnceCell::new(),
            filter: Mutex::new(FilterState::default()),
            media_base,
            selector,
        }
    }

    pub fn phase(&self) -> Phase {
        if self.catalog.get().is_some() {
            Phase::Ready
        } else {
            Phase::Loading
        }
    }

    /// 加载完成 (成功或全部失败) 时调用一次, 之后的调用被忽略
    pub fn finish_loading(&self, raw_items: Vec<Value>) -> bool {
        let items: Vec<Item> = raw_items.into_iter().map(Item::from_value).collect();
        self.catalog.set(items).is_ok()
    }

    pub fn items(&self) -> &[Item] {
        self.catalog.get().map(Vec::as_slice).unwrap_or(&[])
    }

    pub fn dispatch(&self, event: Event) -> View {
        debug!("事件: {:?}", event);
        let mut filter = self.filter.lock().unwrap_or_else(PoisonError::into_inner);
        *filter = std::mem::take(&mut *filter).handle(event);
        self.render_state(&filter)
    }

    pub fn view(&self) -> View {
        let filter = self.filter.lock().unwrap_or_else(PoisonError::into_inner);
        self.render_state(&filter)
    }

    fn render_state(&self, state: &FilterState) -> View {
        let Some(items) = self.catalog.get() else {
            return View {
                phase: Phase::Loading,
                cards: String::new(),
                show_empty: false,
                selector: String::new(),
                shown: 0,
                total: 0,
                category: state.category.clone(),
                query: state.query.clone(),
            };
        };

        let filtered = state.apply(items);
        let rendered = render(
            &filtered,
            items,
            state,
            self.media_base.as_deref(),
            self.selector,
        );

        View {
            phase: Phase::Ready,
            cards: rendered.cards,
            show_empty: rendered.show_empty,
            selector: rendered.selector,
            shown: rendered.shown,
            total: items.len(),
            category: state.category.clone(),
            query: state.query.clone(),
        }
    }
}
