use std::cell::RefCell;
use std::rc::Rc;
use std::sync::Arc;

use ego_tree::NodeId;
use pretty_assertions::assert_eq;
use scraper::Selector;
use sedori_core::{RenderOptions, SearchResult};
use sedori_engine::{
    ApiError, AuctionInjector, BatchSearchQueue, CategoryInjector, DashboardLinks,
    DomPanelRenderer, InjectError, PageDocument, PanelRenderer, PanelStyle, ProductContext,
    ProductInjector, QueueItem, QueueSettings, Searcher,
};

const CATEGORY_PAGE: &str = r#"<!doctype html>
<html><body>
<div class="s-main-slot">
  <div data-asin="" class="s-widget">sponsored</div>
  <div data-asin="B000000001" data-component-type="s-search-result">
    <div class="s-card">
      <h2><a class="a-link-normal" href="/dp/B000000001"><span>Panasonic TH-32J300 液晶テレビ 32V型</span></a></h2>
      <div class="price-row"><span class="a-price"><span class="a-offscreen">￥39,800</span></span></div>
    </div>
  </div>
  <div data-asin="B000000002" class="outer">
    <div data-asin="B000000002" class="inner">
      <span class="a-size-base-plus a-color-base a-text-normal">高級 ワイヤレス ヘッドホン 新品</span>
    </div>
  </div>
  <div data-asin="B000000003"><p>no title here</p></div>
</div>
</body></html>"#;

struct NoSearch;

#[async_trait::async_trait]
impl Searcher for NoSearch {
    async fn search(&self, _keyword: &str) -> Result<Vec<SearchResult>, ApiError> {
        Ok(Vec::new())
    }
}

struct CannedSearch(usize);

#[async_trait::async_trait]
impl Searcher for CannedSearch {
    async fn search(&self, keyword: &str) -> Result<Vec<SearchResult>, ApiError> {
        Ok((0..self.0)
            .map(|i| SearchResult {
                auction_id: format!("x{i}"),
                title: format!("{keyword} #{i}"),
                current_price: Some(10_000 + i as i64),
                buy_now_price: Some(0),
                image_url: None,
                end_time_text: Some("1日".into()),
                bid_count: Some(2),
                url: format!("https://page.auctions.yahoo.co.jp/jp/auction/x{i}"),
            })
            .collect())
    }
}

struct Ignore;

impl PanelRenderer<NodeId> for Ignore {
    fn show_loading(&self, _target: &NodeId) {}
    fn show_outcome(&self, _target: &NodeId, _outcome: Result<Vec<SearchResult>, ApiError>) {}
}

fn sel(css: &str) -> Selector {
    Selector::parse(css).unwrap()
}

fn idle_queue() -> BatchSearchQueue<NodeId, Ignore> {
    BatchSearchQueue::new(QueueSettings::default(), Arc::new(NoSearch), Ignore)
}

#[test]
fn scan_annotates_innermost_items_once() {
    sedori_logging::initialize_for_tests();
    let mut doc = PageDocument::parse(CATEGORY_PAGE);
    let queue = idle_queue();

    let first = CategoryInjector.scan(&mut doc, &queue);
    assert_eq!(first.annotated, 2);
    assert_eq!(first.skipped, 0);
    assert_eq!(
        first.keywords,
        vec!["TH-32J300".to_string(), "高級 ワイヤレス ヘッドホン".to_string()]
    );
    assert_eq!(queue.len(), 2);

    let second = CategoryInjector.scan(&mut doc, &queue);
    assert_eq!(second.annotated, 0);
    assert_eq!(second.skipped, 2);
    assert_eq!(queue.len(), 2);
    assert_eq!(doc.select_ids(&sel(".sedori-cat-wrapper")).len(), 2);
}

#[test]
fn wrapper_sits_next_to_the_price_container_inside_the_item() {
    let mut doc = PageDocument::parse(CATEGORY_PAGE);
    CategoryInjector.scan(&mut doc, &idle_queue());

    let card = doc.select_first(&sel(".s-card")).unwrap();
    let wrapper = doc.first_within(card, &sel(".sedori-cat-wrapper")).unwrap();
    assert_eq!(doc.parent_element(wrapper), Some(card));
    assert!(doc.to_html().contains(
        r#"</div><div class="sedori-cat-wrapper"><div class="sedori-cat-label">Y!: TH-32J300</div>"#
    ));

    let panel = doc.first_within(wrapper, &sel(".sedori-mini-panel")).unwrap();
    assert_eq!(doc.text_of(panel), "待機中...");
}

#[test]
fn nested_item_gets_wrapper_after_its_title() {
    let mut doc = PageDocument::parse(CATEGORY_PAGE);
    CategoryInjector.scan(&mut doc, &idle_queue());

    let outer = doc.select_first(&sel(".outer")).unwrap();
    let inner = doc.select_first(&sel(".inner")).unwrap();
    let wrappers = doc.select_within(outer, &sel(".sedori-cat-wrapper"));
    assert_eq!(wrappers.len(), 1);
    assert_eq!(doc.parent_element(wrappers[0]), Some(inner));
}

#[test]
fn scan_enqueues_the_panel_nodes() {
    let mut doc = PageDocument::parse(CATEGORY_PAGE);
    let queue = idle_queue();
    CategoryInjector.scan(&mut doc, &queue);

    let panels = doc.select_ids(&sel(".sedori-mini-panel"));
    assert_eq!(panels.len(), 2);
    // A fresh item added later is picked up on the next pass only.
    let slot = doc.select_first(&sel(".s-main-slot")).unwrap();
    doc.append_child(
        slot,
        r#"<div data-asin="B000000004"><h2><a class="a-link-normal"><span>Sony KJ-55X80K</span></a></h2></div>"#,
    )
    .unwrap();
    let report = CategoryInjector.scan(&mut doc, &queue);
    assert_eq!(report.annotated, 1);
    assert_eq!(report.keywords, vec!["KJ-55X80K".to_string()]);
    assert_eq!(queue.len(), 3);
    queue.enqueue(QueueItem::new("extra", panels[0]));
    assert_eq!(queue.len(), 4);
}

const PRODUCT_PAGE: &str = r#"<html><body>
<div id="dp-container">
  <div id="leftCol"><div id="imageBlock"><img src="x.jpg"></div></div>
  <span id="productTitle">  Panasonic 32V型 液晶テレビ ビエラ TH-32J300 ハイビジョン </span>
  <table class="prodDetTable">
    <tr><th>メーカー</th><td>パナソニック</td></tr>
    <tr><th>型番</th><td> TH-32J300 </td></tr>
  </table>
</div>
</body></html>"#;

#[test]
fn product_panel_is_injected_into_the_image_block_once() {
    let mut doc = PageDocument::parse(PRODUCT_PAGE);
    let url = "https://www.amazon.co.jp/dp/B09XYDQZV6?th=1";

    let annotation = ProductInjector.inject(&mut doc, Some(url)).unwrap();
    assert_eq!(annotation.page.asin, "B09XYDQZV6");
    assert_eq!(annotation.keyword, "TH-32J300");
    let image_block = doc.element_by_id("imageBlock").unwrap();
    assert!(doc.is_descendant(annotation.panel, image_block));
    assert_eq!(
        doc.text_of(doc.element_by_id("sedori-yahoo-search-btn").unwrap()),
        "Y!検索: TH-32J300"
    );

    assert_eq!(
        ProductInjector.inject(&mut doc, Some(url)),
        Err(InjectError::AlreadyAnnotated)
    );
}

#[test]
fn product_injector_rejects_pages_without_asin() {
    let mut doc = PageDocument::parse("<html><body><h1>hello</h1></body></html>");
    assert_eq!(
        ProductInjector.inject(&mut doc, Some("https://www.amazon.co.jp/s?k=tv")),
        Err(InjectError::NotRecognised("product"))
    );
}

#[tokio::test]
async fn product_panel_lists_at_most_ten_results() {
    let mut doc = PageDocument::parse(PRODUCT_PAGE);
    let annotation = ProductInjector
        .inject(&mut doc, Some("https://www.amazon.co.jp/dp/B09XYDQZV6"))
        .unwrap();
    let doc = Rc::new(RefCell::new(doc));
    let renderer = DomPanelRenderer::new(
        Rc::clone(&doc),
        RenderOptions::PRODUCT,
        PanelStyle::Full(ProductContext {
            asin: annotation.page.asin.clone(),
            product_title: annotation.page.title.clone(),
            links: DashboardLinks::default(),
        }),
    );
    let queue = BatchSearchQueue::new(QueueSettings::default(), Arc::new(CannedSearch(12)), renderer);
    queue.enqueue(QueueItem::new(annotation.keyword.clone(), annotation.panel));
    let summary = queue.drain().await;
    assert_eq!(summary.succeeded, 1);

    let doc = doc.borrow();
    assert_eq!(doc.select_within(annotation.panel, &sel(".sedori-item")).len(), 10);
    let html = doc.to_html();
    assert!(html.contains("ヤフオク検索結果: 12件"));
    assert!(html.contains("research?asin=B09XYDQZV6"));
    // Zero buy-now prices are not shown.
    assert!(!html.contains("sedori-price-buynow"));
}

#[test]
fn auction_page_gets_a_monitor_link_below_the_title() {
    let mut doc = PageDocument::parse(
        r#"<html><body><div class="head"><h1>Sony α7 III ボディ</h1></div>
        <dl><dt>現在</dt><dd>120,000円（税込）</dd></dl></body></html>"#,
    );
    let injector = AuctionInjector::new(DashboardLinks::default());
    let url = "https://page.auctions.yahoo.co.jp/jp/auction/x1234567";

    let annotation = injector.inject(&mut doc, url).unwrap();
    assert_eq!(annotation.page.auction_id, "x1234567");
    assert_eq!(annotation.page.current_price, Some(120_000));
    let pairs: Vec<(String, String)> = annotation.monitor_link.query_pairs().into_owned().collect();
    assert!(pairs.contains(&("auction_id".into(), "x1234567".into())));
    assert!(pairs.contains(&("current_price".into(), "120000".into())));
    assert!(pairs.contains(&("url".into(), url.into())));

    let head = doc.select_first(&sel(".head")).unwrap();
    assert_eq!(doc.parent_element(annotation.button), Some(head));
    assert_eq!(injector.inject(&mut doc, url).unwrap_err(), InjectError::AlreadyAnnotated);
}
