//! Page data extraction for Amazon product pages and Yahoo Auctions item pages.
use std::sync::LazyLock;

use regex::Regex;
use scraper::Selector;
use sedori_core::{fallback_keyword, model_number_from_title};
use url::Url;

use crate::dom::PageDocument;

static ASIN_PATH: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"/(?:dp|gp/product)/([A-Z0-9]{10})").expect("valid asin regex"));
static AUCTION_PATH: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"/auction/([a-zA-Z0-9]+)").expect("valid auction regex"));
static MODEL_LABEL: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"(?i)型番|モデル番号|Model|Part Number").expect("valid model label regex")
});
static YEN_AMOUNT: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"([0-9,]+)円").expect("valid price regex"));

static ASIN_INPUT: LazyLock<Selector> =
    LazyLock::new(|| Selector::parse(r#"input[name="ASIN"]"#).expect("valid selector"));
static PRODUCT_TITLE: LazyLock<Selector> =
    LazyLock::new(|| Selector::parse("#productTitle").expect("valid selector"));
static DETAIL_ROWS: LazyLock<Selector> = LazyLock::new(|| {
    Selector::parse(
        "#productDetails_techSpec_section_1 tr, #detailBullets_feature_div li, table.prodDetTable tr",
    )
    .expect("valid selector")
});
static CELL: LazyLock<Selector> = LazyLock::new(|| Selector::parse("td").expect("valid selector"));
static NESTED_SPAN: LazyLock<Selector> =
    LazyLock::new(|| Selector::parse("span span").expect("valid selector"));
static HEADING: LazyLock<Selector> = LazyLock::new(|| Selector::parse("h1").expect("valid selector"));
static DEFINITION_LIST: LazyLock<Selector> =
    LazyLock::new(|| Selector::parse("dl").expect("valid selector"));

pub trait PageExtractor {
    type Output;

    /// `page_url` is the address the page was loaded from, when known.
    fn extract(&self, doc: &PageDocument, page_url: Option<&str>) -> Option<Self::Output>;
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ProductPage {
    pub asin: String,
    pub title: String,
    pub model_number: Option<String>,
}

impl ProductPage {
    /// Model number when known, else the first title tokens.
    pub fn search_keyword(&self) -> String {
        match &self.model_number {
            Some(model) => model.clone(),
            None => fallback_keyword(&self.title),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AuctionPage {
    pub auction_id: String,
    pub title: String,
    pub current_price: Option<i64>,
}

#[derive(Debug, Clone, Copy, Default)]
pub struct ProductPageExtractor;

impl PageExtractor for ProductPageExtractor {
    type Output = ProductPage;

    fn extract(&self, doc: &PageDocument, page_url: Option<&str>) -> Option<ProductPage> {
        let asin = page_url
            .and_then(|url| capture(&ASIN_PATH, &url_path(url)))
            .or_else(|| {
                doc.select_first(&ASIN_INPUT)
                    .and_then(|input| doc.attr(input, "value"))
                    .map(|value| value.trim().to_string())
                    .filter(|value| !value.is_empty())
            })?;
        let title = doc
            .select_first(&PRODUCT_TITLE)
            .map(|id| doc.text_of(id))
            .unwrap_or_default();
        let model_number = detail_model_number(doc).or_else(|| model_number_from_title(&title));
        Some(ProductPage {
            asin,
            title,
            model_number,
        })
    }
}

fn detail_model_number(doc: &PageDocument) -> Option<String> {
    for row in doc.select_ids(&DETAIL_ROWS) {
        if !MODEL_LABEL.is_match(&doc.text_of(row)) {
            continue;
        }
        let from_cell = doc.first_within(row, &CELL).map(|cell| doc.text_of(cell));
        let value = from_cell.or_else(|| {
            doc.select_within(row, &NESTED_SPAN)
                .get(1)
                .map(|span| doc.text_of(*span))
        });
        // A labelled row without a value does not end the search.
        if let Some(value) = value.filter(|value| !value.is_empty()) {
            return Some(value);
        }
    }
    None
}

#[derive(Debug, Clone, Copy, Default)]
pub struct AuctionPageExtractor;

impl PageExtractor for AuctionPageExtractor {
    type Output = AuctionPage;

    fn extract(&self, doc: &PageDocument, page_url: Option<&str>) -> Option<AuctionPage> {
        let auction_id = capture(&AUCTION_PATH, &url_path(page_url?))?;
        let title = doc
            .select_first(&HEADING)
            .map(|id| doc.text_of(id))
            .unwrap_or_default();
        let current_price = doc
            .select_ids(&DEFINITION_LIST)
            .into_iter()
            .map(|dl| doc.text_of(dl))
            .filter(|text| text.starts_with("現在") || text.starts_with("即決"))
            .find_map(|text| parse_yen(&text));
        Some(AuctionPage {
            auction_id,
            title,
            current_price,
        })
    }
}

fn url_path(raw: &str) -> String {
    match Url::parse(raw) {
        Ok(url) => url.path().to_string(),
        Err(_) => raw.to_string(),
    }
}

fn capture(pattern: &Regex, haystack: &str) -> Option<String> {
    pattern
        .captures(haystack)
        .and_then(|caps| caps.get(1))
        .map(|m| m.as_str().to_string())
}

fn parse_yen(text: &str) -> Option<i64> {
    let digits = capture(&YEN_AMOUNT, text)?.replace(',', "");
    digits.parse().ok()
}
