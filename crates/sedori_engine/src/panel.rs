//! Panel markup and the DOM-backed [`PanelRenderer`].
use std::cell::RefCell;
use std::rc::Rc;

use ego_tree::NodeId;
use sedori_core::{render_error, render_results, PanelState, RenderOptions, ResultRowView, SearchResult};
use sedori_logging::sedori_trace;

use crate::dom::{escape_html, PageDocument};
use crate::links::{DashboardLinks, MonitorDraft};
use crate::{ApiError, PanelRenderer};

/// Product the full panel belongs to; feeds the dashboard deep links.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ProductContext {
    pub asin: String,
    pub product_title: String,
    pub links: DashboardLinks,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum PanelStyle {
    /// Compact panel next to every card of a category page.
    Mini,
    /// Single panel on a product page, with dashboard links.
    Full(ProductContext),
}

impl PanelStyle {
    pub fn markup(&self, state: &PanelState) -> String {
        match self {
            PanelStyle::Mini => mini_panel_markup(state),
            PanelStyle::Full(context) => full_panel_markup(state, context),
        }
    }
}

pub fn mini_panel_markup(state: &PanelState) -> String {
    match state {
        PanelState::Waiting => r#"<div class="sedori-mini-waiting">待機中...</div>"#.to_string(),
        PanelState::Loading => r#"<div class="sedori-mini-loading">検索中...</div>"#.to_string(),
        PanelState::Empty => r#"<div class="sedori-mini-empty">出品なし</div>"#.to_string(),
        PanelState::Error(message) => format!(
            r#"<div class="sedori-mini-error" title="{}">エラー</div>"#,
            escape_html(message)
        ),
        PanelState::Results(view) => {
            let rows: String = view.rows.iter().map(mini_row).collect();
            format!(
                r#"<div class="sedori-mini-header"><span>ヤフオク {}件</span></div><div class="sedori-mini-items">{}</div>"#,
                view.total, rows
            )
        }
    }
}

fn mini_row(row: &ResultRowView) -> String {
    let buy_now = row
        .buy_now_price
        .as_deref()
        .map(|price| format!(r#"<span class="sedori-mini-buynow">即決:{}</span>"#, escape_html(price)))
        .unwrap_or_default();
    format!(
        concat!(
            r#"<div class="sedori-mini-item">"#,
            r#"<a href="{url}" target="_blank" class="sedori-mini-title">{title}</a>"#,
            r#"<div class="sedori-mini-meta">"#,
            r#"<span class="sedori-mini-price">{price}</span>{buy_now}"#,
            r#"<span class="sedori-mini-time">{remaining}</span>"#,
            r#"<span>入札:{bids}</span>"#,
            r#"</div></div>"#
        ),
        url = escape_html(&row.url),
        title = escape_html(&row.title),
        price = escape_html(&row.current_price),
        buy_now = buy_now,
        remaining = escape_html(&row.remaining),
        bids = row.bid_count,
    )
}

pub fn full_panel_markup(state: &PanelState, context: &ProductContext) -> String {
    match state {
        PanelState::Waiting => String::new(),
        PanelState::Loading => r#"<div class="sedori-loading">ヤフオクを検索中...</div>"#.to_string(),
        PanelState::Empty => r#"<div class="sedori-empty">検索結果がありません</div>"#.to_string(),
        PanelState::Error(message) => format!(
            r#"<div class="sedori-error" title="{}">エラー: バックエンドに接続できません。</div>"#,
            escape_html(message)
        ),
        PanelState::Results(view) => {
            let research = context.links.research(&context.asin);
            let rows: String = view.rows.iter().map(|row| full_row(row, context)).collect();
            format!(
                concat!(
                    r#"<div class="sedori-panel-header"><span>ヤフオク検索結果: {total}件</span>"#,
                    r#"<a href="{research}" target="_blank" class="sedori-link">ダッシュボードで見る</a></div>"#,
                    r#"<div class="sedori-items">{rows}</div>"#
                ),
                total = view.total,
                research = escape_html(research.as_str()),
                rows = rows,
            )
        }
    }
}

fn full_row(row: &ResultRowView, context: &ProductContext) -> String {
    let image = row
        .image_url
        .as_deref()
        .map(|src| format!(r#"<img src="{}" alt="">"#, escape_html(src)))
        .unwrap_or_default();
    let buy_now = row
        .buy_now_price
        .as_deref()
        .map(|price| format!(r#"<span class="sedori-price-buynow">即決: {}</span>"#, escape_html(price)))
        .unwrap_or_default();
    let draft = MonitorDraft {
        asin: Some(context.asin.clone()),
        product_title: Some(context.product_title.clone()),
        auction_id: Some(row.auction_id.clone()),
        auction_title: Some(row.title.clone()),
        current_price: row.current_price_yen,
        buy_now_price: row.buy_now_price_yen,
        url: Some(row.url.clone()),
    };
    let monitor_add = context.links.monitor_add(&draft);
    format!(
        concat!(
            r#"<div class="sedori-item">"#,
            r#"<div class="sedori-item-img">{image}</div>"#,
            r#"<div class="sedori-item-info">"#,
            r#"<a href="{url}" target="_blank" class="sedori-item-title">{title}</a>"#,
            r#"<div class="sedori-item-meta">"#,
            r#"<span class="sedori-price">現在: {price}</span>{buy_now}"#,
            r#"<span>残り: {remaining}</span><span>入札: {bids}</span>"#,
            r#"</div></div>"#,
            r#"<a href="{monitor_add}" target="_blank" class="sedori-btn sedori-btn-add" data-auction-id="{auction_id}">監視追加</a>"#,
            r#"</div>"#
        ),
        image = image,
        url = escape_html(&row.url),
        title = escape_html(&row.title),
        price = escape_html(&row.current_price),
        buy_now = buy_now,
        remaining = escape_html(&row.remaining),
        bids = row.bid_count,
        monitor_add = escape_html(monitor_add.as_str()),
        auction_id = escape_html(&row.auction_id),
    )
}

/// Writes panel states straight into a shared [`PageDocument`].
pub struct DomPanelRenderer {
    doc: Rc<RefCell<PageDocument>>,
    options: RenderOptions,
    style: PanelStyle,
}

impl DomPanelRenderer {
    pub fn new(doc: Rc<RefCell<PageDocument>>, options: RenderOptions, style: PanelStyle) -> Self {
        Self { doc, options, style }
    }

    pub fn show(&self, target: &NodeId, state: &PanelState) {
        let markup = self.style.markup(state);
        if !self.doc.borrow_mut().replace_children(*target, &markup) {
            sedori_trace!("Panel {:?} no longer exists", target);
        }
    }
}

impl PanelRenderer<NodeId> for DomPanelRenderer {
    fn show_loading(&self, target: &NodeId) {
        self.show(target, &PanelState::Loading);
    }

    fn show_outcome(&self, target: &NodeId, outcome: Result<Vec<SearchResult>, ApiError>) {
        let state = match outcome {
            Ok(results) => render_results(&results, &self.options),
            Err(err) => render_error(err.to_string()),
        };
        self.show(target, &state);
    }
}
