//! Panel injection into marketplace pages.
//!
//! Every injector marks what it inserted so a second pass over the same DOM
//! leaves it untouched.
use std::sync::LazyLock;

use ego_tree::NodeId;
use scraper::Selector;
use sedori_core::extract_keyword;
use sedori_logging::{sedori_debug, sedori_trace};
use thiserror::Error;
use url::Url;

use crate::dom::{escape_html, PageDocument};
use crate::extract::{AuctionPage, AuctionPageExtractor, PageExtractor, ProductPage, ProductPageExtractor};
use crate::links::{DashboardLinks, MonitorDraft};
use crate::{BatchSearchQueue, PanelRenderer, QueueItem};

static ITEM: LazyLock<Selector> =
    LazyLock::new(|| Selector::parse("[data-asin]").expect("valid selector"));
static TITLE: LazyLock<Selector> = LazyLock::new(|| {
    Selector::parse(
        "h2 .a-link-normal span, \
         .a-size-medium.a-color-base.a-text-normal, \
         .a-size-base-plus.a-color-base.a-text-normal, \
         .a-text-normal",
    )
    .expect("valid selector")
});
static PRICE: LazyLock<Selector> =
    LazyLock::new(|| Selector::parse(".a-price").expect("valid selector"));
static MARKER: LazyLock<Selector> =
    LazyLock::new(|| Selector::parse(".sedori-cat-wrapper").expect("valid selector"));
static PANEL: LazyLock<Selector> =
    LazyLock::new(|| Selector::parse(".sedori-mini-panel").expect("valid selector"));
static HEADING: LazyLock<Selector> = LazyLock::new(|| Selector::parse("h1").expect("valid selector"));

pub const PRODUCT_PANEL_ID: &str = "sedori-result-panel";
pub const SEARCH_BUTTON_ID: &str = "sedori-yahoo-search-btn";
pub const MONITOR_BUTTON_ID: &str = "sedori-monitor-btn";
const PRODUCT_ANCHORS: [&str; 3] = ["imageBlock", "leftCol", "dp-container"];

#[derive(Debug, Error, PartialEq, Eq)]
pub enum InjectError {
    #[error("page does not look like a {0} page")]
    NotRecognised(&'static str),
    #[error("page is already annotated")]
    AlreadyAnnotated,
    #[error("no element to attach the panel to")]
    NoAnchor,
    #[error("no search keyword could be derived")]
    EmptyKeyword,
}

/// Outcome of one category-page scan.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ScanReport {
    /// Items annotated and enqueued by this pass.
    pub annotated: usize,
    /// Items already carrying a wrapper.
    pub skipped: usize,
    pub keywords: Vec<String>,
}

/// Annotates every product card of a category or search-result page.
#[derive(Debug, Clone, Copy, Default)]
pub struct CategoryInjector;

impl CategoryInjector {
    pub fn scan<R: PanelRenderer<NodeId>>(
        &self,
        doc: &mut PageDocument,
        queue: &BatchSearchQueue<NodeId, R>,
    ) -> ScanReport {
        let candidates: Vec<NodeId> = doc
            .select_ids(&ITEM)
            .into_iter()
            .filter(|id| {
                doc.attr(*id, "data-asin")
                    .is_some_and(|asin| !asin.trim().is_empty())
            })
            .collect();

        let mut report = ScanReport::default();
        for &item in &candidates {
            let is_outer_wrapper = candidates
                .iter()
                .any(|&other| other != item && doc.is_descendant(other, item));
            if is_outer_wrapper {
                continue;
            }
            if doc.first_within(item, &MARKER).is_some() {
                report.skipped += 1;
                continue;
            }

            let title_el = doc.first_within(item, &TITLE);
            let title = title_el.map(|id| doc.text_of(id)).unwrap_or_default();
            let keyword = extract_keyword(&title);
            if keyword.is_empty() {
                sedori_trace!("Item {:?} has no usable title", item);
                continue;
            }

            let Some(panel) = insert_wrapper(doc, item, title_el, &keyword) else {
                continue;
            };
            queue.enqueue(QueueItem::new(keyword.clone(), panel));
            report.annotated += 1;
            report.keywords.push(keyword);
        }

        sedori_debug!(
            "Scan: {} annotated, {} already annotated",
            report.annotated,
            report.skipped
        );
        report
    }
}

fn wrapper_markup(keyword: &str) -> String {
    format!(
        concat!(
            r#"<div class="sedori-cat-wrapper">"#,
            r#"<div class="sedori-cat-label">Y!: {}</div>"#,
            r#"<div class="sedori-mini-panel"><div class="sedori-mini-waiting">待機中...</div></div>"#,
            r#"</div>"#
        ),
        escape_html(keyword)
    )
}

/// Insert the wrapper next to the price container, else the title container,
/// else at the end of the item. Returns the panel node.
fn insert_wrapper(
    doc: &mut PageDocument,
    item: NodeId,
    title_el: Option<NodeId>,
    keyword: &str,
) -> Option<NodeId> {
    let markup = wrapper_markup(keyword);
    let anchor = doc
        .first_within(item, &PRICE)
        .or(title_el)
        .map(|el| container_within(doc, el, item));

    let wrapper = match anchor {
        Some(anchor) => doc.insert_after(anchor, &markup),
        None => None,
    };
    let wrapper = match wrapper {
        Some(wrapper) => wrapper,
        None => doc.append_child(item, &markup)?,
    };
    doc.first_within(wrapper, &PANEL)
}

/// Parent of `el` when it still sits inside `item`, else `el` itself.
fn container_within(doc: &PageDocument, el: NodeId, item: NodeId) -> NodeId {
    match doc.parent_element(el) {
        Some(parent) if parent != item && doc.is_descendant(parent, item) => parent,
        _ => el,
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ProductAnnotation {
    pub page: ProductPage,
    pub keyword: String,
    pub panel: NodeId,
}

/// Adds the search button and result panel to an Amazon product page.
#[derive(Debug, Clone, Copy, Default)]
pub struct ProductInjector;

impl ProductInjector {
    pub fn inject(
        &self,
        doc: &mut PageDocument,
        page_url: Option<&str>,
    ) -> Result<ProductAnnotation, InjectError> {
        let page = ProductPageExtractor
            .extract(doc, page_url)
            .ok_or(InjectError::NotRecognised("product"))?;
        if doc.element_by_id(PRODUCT_PANEL_ID).is_some() {
            return Err(InjectError::AlreadyAnnotated);
        }
        let keyword = page.search_keyword();
        if keyword.is_empty() {
            return Err(InjectError::EmptyKeyword);
        }
        let anchor = PRODUCT_ANCHORS
            .iter()
            .find_map(|id| doc.element_by_id(id))
            .ok_or(InjectError::NoAnchor)?;

        let keyword_html = escape_html(&keyword);
        let markup = format!(
            concat!(
                r#"<button id="{button}" class="sedori-btn sedori-btn-primary" title="ヤフオクで「{kw}」を検索">Y!検索: {kw}</button>"#,
                r#"<div id="{panel}" class="sedori-panel"></div>"#
            ),
            button = SEARCH_BUTTON_ID,
            panel = PRODUCT_PANEL_ID,
            kw = keyword_html,
        );
        doc.append_child(anchor, &markup).ok_or(InjectError::NoAnchor)?;
        let panel = doc
            .element_by_id(PRODUCT_PANEL_ID)
            .ok_or(InjectError::NoAnchor)?;

        sedori_debug!("Product {} annotated, keyword '{}'", page.asin, keyword);
        Ok(ProductAnnotation {
            page,
            keyword,
            panel,
        })
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AuctionAnnotation {
    pub page: AuctionPage,
    pub monitor_link: Url,
    pub button: NodeId,
}

/// Adds an "add to monitors" link below the title of a Yahoo Auctions item page.
#[derive(Debug, Clone, Default)]
pub struct AuctionInjector {
    links: DashboardLinks,
}

impl AuctionInjector {
    pub fn new(links: DashboardLinks) -> Self {
        Self { links }
    }

    pub fn inject(
        &self,
        doc: &mut PageDocument,
        page_url: &str,
    ) -> Result<AuctionAnnotation, InjectError> {
        let page = AuctionPageExtractor
            .extract(doc, Some(page_url))
            .ok_or(InjectError::NotRecognised("auction"))?;
        if doc.element_by_id(MONITOR_BUTTON_ID).is_some() {
            return Err(InjectError::AlreadyAnnotated);
        }
        let heading = doc.select_first(&HEADING).ok_or(InjectError::NoAnchor)?;

        let monitor_link = self.links.monitor_add(&MonitorDraft {
            auction_id: Some(page.auction_id.clone()),
            auction_title: Some(page.title.clone()),
            current_price: page.current_price,
            url: Some(page_url.to_string()),
            ..MonitorDraft::default()
        });
        let markup = format!(
            r#"<a id="{}" class="sedori-btn sedori-btn-monitor" href="{}" target="_blank">監視対象に追加する</a>"#,
            MONITOR_BUTTON_ID,
            escape_html(monitor_link.as_str())
        );
        let button = doc
            .insert_after(heading, &markup)
            .ok_or(InjectError::NoAnchor)?;

        Ok(AuctionAnnotation {
            page,
            monitor_link,
            button,
        })
    }
}
