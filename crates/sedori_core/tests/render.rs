use pretty_assertions::assert_eq;
use sedori_core::{render_error, render_results, PanelState, RenderOptions, SearchResult};

fn listing(id: &str, title: &str) -> SearchResult {
    SearchResult {
        auction_id: id.to_string(),
        title: title.to_string(),
        current_price: None,
        buy_now_price: None,
        image_url: None,
        end_time_text: None,
        bid_count: None,
        url: format!("https://page.auctions.yahoo.co.jp/jp/auction/{id}"),
    }
}

#[test]
fn empty_results_render_empty_state() {
    assert_eq!(render_results(&[], &RenderOptions::CATEGORY), PanelState::Empty);
}

#[test]
fn absent_fields_use_placeholders() {
    let state = render_results(&[listing("x1", "本体のみ")], &RenderOptions::CATEGORY);
    let PanelState::Results(view) = state else {
        panic!("expected results, got {state:?}");
    };
    let row = &view.rows[0];
    assert_eq!(row.current_price, "-");
    assert_eq!(row.buy_now_price, None);
    assert_eq!(row.remaining, "-");
    assert_eq!(row.bid_count, 0);
    assert_eq!(row.image_url, None);
}

#[test]
fn populated_row_is_formatted() {
    let mut result = listing("x2", "TH-32J300 美品");
    result.current_price = Some(12_800);
    result.buy_now_price = Some(20_000);
    result.end_time_text = Some("2日".to_string());
    result.bid_count = Some(7);

    let PanelState::Results(view) = render_results(&[result], &RenderOptions::PRODUCT) else {
        panic!("expected results");
    };
    let row = &view.rows[0];
    assert_eq!(row.current_price, "12,800円");
    assert_eq!(row.buy_now_price.as_deref(), Some("20,000円"));
    assert_eq!(row.remaining, "2日");
    assert_eq!(row.bid_count, 7);
}

#[test]
fn zero_buy_now_price_is_hidden() {
    let mut result = listing("x3", "ジャンク");
    result.buy_now_price = Some(0);
    let PanelState::Results(view) = render_results(&[result], &RenderOptions::CATEGORY) else {
        panic!("expected results");
    };
    assert_eq!(view.rows[0].buy_now_price, None);
}

#[test]
fn display_limit_caps_rows_but_not_total() {
    let results: Vec<_> = (0..8).map(|i| listing(&format!("a{i}"), "item")).collect();

    let PanelState::Results(view) = render_results(&results, &RenderOptions::CATEGORY) else {
        panic!("expected results");
    };
    assert_eq!(view.total, 8);
    assert_eq!(view.rows.len(), 5);
    assert_eq!(view.rows[4].auction_id, "a4");
}

#[test]
fn category_titles_are_truncated() {
    let long = "あ".repeat(80);
    let PanelState::Results(view) = render_results(&[listing("t", &long)], &RenderOptions::CATEGORY)
    else {
        panic!("expected results");
    };
    assert_eq!(view.rows[0].title.chars().count(), 50);
}

#[test]
fn errors_render_message() {
    assert_eq!(
        render_error("network error"),
        PanelState::Error("network error".to_string())
    );
}

#[test]
fn search_result_accepts_missing_optionals() {
    let json = r#"{"auction_id":"b1","title":"t","url":"https://x","current_price":500}"#;
    let parsed: SearchResult = serde_json::from_str(json).unwrap();
    assert_eq!(parsed.current_price, Some(500));
    assert_eq!(parsed.bid_count, None);
}
