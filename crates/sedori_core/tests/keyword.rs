use pretty_assertions::assert_eq;
use sedori_core::{extract_keyword, fallback_keyword};

#[test]
fn model_number_is_extracted_verbatim() {
    assert_eq!(extract_keyword("Panasonic TH-32J300 液晶テレビ"), "TH-32J300");
    assert_eq!(extract_keyword("ソニー KJ-55X80K 55インチ"), "KJ-55X80K");
    assert_eq!(extract_keyword("nintendo hac-001 本体"), "hac-001");
}

#[test]
fn titles_without_a_model_fall_back_to_three_tokens() {
    assert_eq!(
        extract_keyword("高級 ワイヤレス ヘッドホン 新品"),
        "高級 ワイヤレス ヘッドホン"
    );
    assert_eq!(extract_keyword("ヘッドホン"), "ヘッドホン");
}

#[test]
fn fallback_collapses_irregular_whitespace() {
    assert_eq!(fallback_keyword("  a \t b\u{3000}c  d "), "a b c");
}

#[test]
fn blank_titles_yield_empty_keyword() {
    assert_eq!(extract_keyword(""), "");
    assert_eq!(extract_keyword("   \n\t "), "");
}
