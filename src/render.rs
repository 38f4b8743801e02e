//! 渲染
//! 纯函数: 由过滤结果与完整目录生成卡片、空状态与分类选择器的 HTML 片段

use crate::filter::{category_options, CategoryFilter, FilterState, ALL};
use crate::item::Item;
use crate::media::resolve_media;
use std::str::FromStr;

const UNTITLED: &str = "Untitled";
const ALL_LABEL: &str = "全部";
const META_SEPARATOR: &str = " · ";

/// 主分类对应的显示名称
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Kind {
    Book,
    Music,
    Cd,
    Vinyl,
    Other,
}

impl Kind {
    pub fn from_tag(tag: Option<&str>) -> Self {
        match tag {
            Some("book") => Self::Book,
            Some("music") => Self::Music,
            Some("cd") => Self::Cd,
            Some("vinyl") => Self::Vinyl,
            _ => Self::Other,
        }
    }

    pub fn label(self) -> &'static str {
        match self {
            Self::Book => "書籍",
            Self::Music => "音樂",
            Self::Cd => "CD",
            Self::Vinyl => "黑膠",
            Self::Other => "其他",
        }
    }
}

/// 分类选择器样式
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum SelectorStyle {
    /// 一排可切换的分类按钮
    #[default]
    Chips,
    /// 单选下拉框
    Dropdown,
}

impl FromStr for SelectorStyle {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_ascii_lowercase().as_str() {
            "chips" => Ok(Self::Chips),
            "select" | "dropdown" => Ok(Self::Dropdown),
            other => Err(other.to_string()),
        }
    }
}

/// 一次渲染的结果
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Rendered {
    pub cards: String,
    pub show_empty: bool,
    pub selector: String,
    pub shown: usize,
}

pub fn render(
    filtered: &[&Item],
    all: &[Item],
    state: &FilterState,
    media_base: Option<&str>,
    style: SelectorStyle,
) -> Rendered {
    let cards: String = filtered
        .iter()
        .map(|item| render_card(item, media_base))
        .collect();

    Rendered {
        cards,
        show_empty: filtered.is_empty(),
        // 每次渲染后都重建选择器
        selector: render_selector(all, &state.category, style),
        shown: filtered.len(),
    }
}

pub fn render_card(item: &Item, media_base: Option<&str>) -> String {
    let mut html = String::from(r#"<article class="card">"#);

    let cover = resolve_media(item, media_base);
    if cover.is_empty() {
        html.push_str(r#"<div class="image"></div>"#);
    } else {
        html.push_str(&format!(
            r#"<div class="image"><img src="{}" alt="" loading="lazy"></div>"#,
            escape_html(&cover)
        ));
    }

    html.push_str(&format!(
        r#"<div class="title">{}</div>"#,
        escape_html(item.title.as_deref().unwrap_or(UNTITLED))
    ));

    let label = Kind::from_tag(item.primary_category()).label();
    let meta = match item.creator.as_deref() {
        Some(creator) => format!("{}{}{}", label, META_SEPARATOR, creator),
        None => label.to_string(),
    };
    html.push_str(&format!(r#"<div class="meta">{}</div>"#, escape_html(&meta)));

    if !item.tags.is_empty() {
        html.push_str(r#"<div class="chip-list">"#);
        for tag in &item.tags {
            html.push_str(&format!(
                r#"<span class="chip small">{}</span>"#,
                escape_html(tag)
            ));
        }
        html.push_str("</div>");
    }

    if let Some(note) = &item.note {
        html.push_str(&format!(r#"<div class="note">{}</div>"#, escape_html(note)));
    }

    html.push_str("</article>");
    html
}

/// 由完整目录重建分类选择器, "全部" 始终在最前
pub fn render_selector(all: &[Item], active: &CategoryFilter, style: SelectorStyle) -> String {
    let options = category_options(all);
    let entries = std::iter::once((ALL, ALL_LABEL))
        .chain(options.iter().map(|o| (o.as_str(), o.as_str())));

    match style {
        SelectorStyle::Chips => entries
            .map(|(value, label)| {
                let class = if active.as_str() == value { "chip active" } else { "chip" };
                format!(
                    r#"<button type="button" class="{}" data-category="{}">{}</button>"#,
                    class,
                    escape_html(value),
                    escape_html(label)
                )
            })
            .collect(),
        SelectorStyle::Dropdown => {
            let body: String = entries
                .map(|(value, label)| {
                    let selected = if active.as_str() == value { " selected" } else { "" };
                    format!(
                        r#"<option value="{}"{}>{}</option>"#,
                        escape_html(value),
                        selected,
                        escape_html(label)
                    )
                })
                .collect();
            format!(r#"<select id="category" class="category-select">{}</select>"#, body)
        }
    }
}

/// 转义 HTML 特殊字符
pub fn escape_html(text: &str) -> String {
    text.replace('&', "&amp;")
        .replace('<', "&lt;")
        .replace('>', "&gt;")
        .replace('"', "&quot;")
        .replace('\'', "&#39;")
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::filter::filter_items;
    use scraper::{Html, Selector};
    use serde_json::json;

    fn items() -> Vec<Item> {
        [
            json!({
                "title": "Kind of Blue",
                "creator": "Miles Davis",
                "tags": ["vinyl", "jazz"],
                "images": ["covers/kob.jpg"],
                "note": "1959 <mono>"
            }),
            json!({"primaryTag": "book"}),
            json!({"title": "Mixtape", "tags": ["jazz"], "imageRefs": [{"key": "mix.png"}]}),
        ]
        .into_iter()
        .map(Item::from_value)
        .collect()
    }

    fn texts(html: &str, selector: &str) -> Vec<String> {
        let fragment = Html::parse_fragment(html);
        let selector = Selector::parse(selector).unwrap();
        fragment
            .select(&selector)
            .map(|e| e.text().collect::<String>())
            .collect()
    }

    #[test]
    fn test_kind_labels() {
        assert_eq!(Kind::from_tag(Some("book")).label(), "書籍");
        assert_eq!(Kind::from_tag(Some("music")).label(), "音樂");
        assert_eq!(Kind::from_tag(Some("cd")).label(), "CD");
        assert_eq!(Kind::from_tag(Some("vinyl")).label(), "黑膠");
        assert_eq!(Kind::from_tag(Some("Book")), Kind::Other);
        assert_eq!(Kind::from_tag(None).label(), "其他");
    }

    #[test]
    fn test_card_contents() {
        let items = items();
        let html = render_card(&items[0], Some("https://cdn.example/media/"));
        let fragment = Html::parse_fragment(&html);
        let img = Selector::parse(".image img").unwrap();
        let src = fragment
            .select(&img)
            .next()
            .and_then(|e| e.value().attr("src"))
            .unwrap();
        assert_eq!(src, "https://cdn.example/media/covers/kob.jpg");

        assert_eq!(texts(&html, ".title"), vec!["Kind of Blue"]);
        assert_eq!(texts(&html, ".meta"), vec!["黑膠 · Miles Davis"]);
        assert_eq!(texts(&html, ".chip-list .chip"), vec!["vinyl", "jazz"]);
        assert_eq!(texts(&html, ".note"), vec!["1959 <mono>"]);
    }

    #[test]
    fn test_card_fallbacks() {
        let items = items();
        let html = render_card(&items[1], None);
        assert_eq!(texts(&html, ".title"), vec!["Untitled"]);
        assert_eq!(texts(&html, ".meta"), vec!["書籍"]);
        assert_eq!(texts(&html, ".chip"), vec!["book"]);
        assert!(texts(&html, ".note").is_empty());
        assert!(!html.contains("<img"));

        let bare = render_card(&Item::default(), None);
        assert_eq!(texts(&bare, ".meta"), vec!["其他"]);
        assert!(texts(&bare, ".chip-list").is_empty());
    }

    #[test]
    fn test_keyed_cover_without_base_has_no_image() {
        let items = items();
        assert!(!render_card(&items[2], None).contains("<img"));
        let keyed = render_card(&items[2], Some("https://cdn.example"));
        assert!(keyed.contains(r#"src="https://cdn.example/mix.png""#));
    }

    #[test]
    fn test_render_empty_state() {
        let items = items();
        let state = FilterState {
            query: "nothing matches this".into(),
            ..FilterState::default()
        };
        let filtered = state.apply(&items);
        let rendered = render(&filtered, &items, &state, None, SelectorStyle::Chips);
        assert!(rendered.show_empty);
        assert!(rendered.cards.is_empty());
        assert_eq!(rendered.shown, 0);
        // 空结果时选择器仍然重建
        assert_eq!(texts(&rendered.selector, "button"), vec!["全部", "book", "jazz", "vinyl"]);
    }

    #[test]
    fn test_render_cards_in_order() {
        let items = items();
        let category = CategoryFilter::from("jazz");
        let filtered = filter_items(&items, &category, "");
        let state = FilterState {
            category,
            query: String::new(),
        };
        let rendered = render(&filtered, &items, &state, None, SelectorStyle::Chips);
        assert!(!rendered.show_empty);
        assert_eq!(rendered.shown, 2);
        assert_eq!(texts(&rendered.cards, ".card .title"), vec!["Kind of Blue", "Mixtape"]);
    }

    #[test]
    fn test_chip_selector_marks_active() {
        let items = items();
        let html = render_selector(&items, &CategoryFilter::from("jazz"), SelectorStyle::Chips);
        assert_eq!(texts(&html, "button.active"), vec!["jazz"]);
        assert!(html.starts_with(
            r#"<button type="button" class="chip" data-category="all">全部</button>"#
        ));

        let all = render_selector(&items, &CategoryFilter::All, SelectorStyle::Chips);
        assert_eq!(texts(&all, "button.active"), vec!["全部"]);
    }

    #[test]
    fn test_tag_named_all_has_single_chip() {
        let items: Vec<Item> = [json!({"tags": ["book", "all"]})]
            .into_iter()
            .map(Item::from_value)
            .collect();
        let html = render_selector(&items, &CategoryFilter::All, SelectorStyle::Chips);
        assert_eq!(texts(&html, "button"), vec!["全部", "book"]);
        assert_eq!(texts(&html, "button.active"), vec!["全部"]);
        assert_eq!(html.matches(r#"data-category="all""#).count(), 1);
    }

    #[test]
    fn test_dropdown_selector() {
        let items = items();
        let active = CategoryFilter::from("vinyl");
        let html = render_selector(&items, &active, SelectorStyle::Dropdown);
        assert_eq!(
            texts(&html, "select#category option"),
            vec!["全部", "book", "jazz", "vinyl"]
        );
        assert_eq!(texts(&html, "option[selected]"), vec!["vinyl"]);
        assert!(html.contains(r#"<option value="all">全部</option>"#));
    }

    #[test]
    fn test_selector_rebuild_is_idempotent() {
        let items = items();
        let active = CategoryFilter::from("book");
        for style in [SelectorStyle::Chips, SelectorStyle::Dropdown] {
            assert_eq!(
                render_selector(&items, &active, style),
                render_selector(&items, &active, style)
            );
        }
    }

    #[test]
    fn test_escape_html() {
        assert_eq!(
            escape_html(r#"<a href="x">Tom & Jerry's</a>"#),
            "&lt;a href=&quot;x&quot;&gt;Tom &amp; Jerry&#39;s&lt;/a&gt;"
        );
    }

    #[test]
    fn test_selector_style_parse() {
        assert_eq!("chips".parse::<SelectorStyle>(), Ok(SelectorStyle::Chips));
        assert_eq!("Select".parse::<SelectorStyle>(), Ok(SelectorStyle::Dropdown));
        assert!("radio".parse::<SelectorStyle>().is_err());
    }
}
