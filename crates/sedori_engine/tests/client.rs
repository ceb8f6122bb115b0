use std::time::Duration;

use pretty_assertions::assert_eq;
use sedori_engine::dto::{
    MonitorAddRequest, MonitorStatus, PricingRequest, TemplateDraft, TemplatePatch,
};
use sedori_engine::{BackendClient, ClientSettings, FailureKind, Searcher};
use serde_json::json;
use wiremock::matchers::{body_json, method, path, query_param};
use wiremock::{Mock, MockServer, ResponseTemplate};

async fn client_for(server: &MockServer) -> BackendClient {
    sedori_logging::initialize_for_tests();
    BackendClient::new(ClientSettings {
        api_base: format!("{}/api", server.uri()),
        ..ClientSettings::default()
    })
    .expect("client builds")
}

#[tokio::test]
async fn search_sends_the_keyword_and_decodes_listings() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/api/yahoo/search"))
        .and(query_param("keyword", "高級 ヘッドホン"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!([
            {
                "auction_id": "x1",
                "title": "ヘッドホン",
                "current_price": 1234,
                "buy_now_price": null,
                "image_url": null,
                "end_time_text": "3日",
                "bid_count": 5,
                "url": "https://page.auctions.yahoo.co.jp/jp/auction/x1"
            },
            { "auction_id": "x2", "title": "minimal", "url": "https://example.test/x2" }
        ])))
        .expect(1)
        .mount(&server)
        .await;

    let client = client_for(&server).await;
    let results = client.search("高級 ヘッドホン").await.unwrap();
    assert_eq!(results.len(), 2);
    assert_eq!(results[0].current_price, Some(1234));
    assert_eq!(results[0].bid_count, Some(5));
    assert_eq!(results[1].current_price, None);
}

#[tokio::test]
async fn non_success_status_keeps_the_body_text() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/api/yahoo/detail/x404"))
        .respond_with(ResponseTemplate::new(404).set_body_string(r#"{"detail":"Auction not found"}"#))
        .mount(&server)
        .await;

    let err = client_for(&server)
        .await
        .auction_detail("x404")
        .await
        .unwrap_err();
    assert_eq!(err.kind, FailureKind::HttpStatus(404));
    assert_eq!(err.status(), Some(404));
    assert_eq!(err.message, r#"{"detail":"Auction not found"}"#);
}

#[tokio::test]
async fn malformed_json_is_a_decode_failure() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/api/scheduler/status"))
        .respond_with(ResponseTemplate::new(200).set_body_string("<html>proxy error</html>"))
        .mount(&server)
        .await;

    let err = client_for(&server)
        .await
        .scheduler_status()
        .await
        .unwrap_err();
    assert_eq!(err.kind, FailureKind::Decode);
}

#[tokio::test]
async fn monitor_crud_uses_the_documented_routes() {
    let server = MockServer::start().await;
    let item = json!({
        "id": 7, "product_id": 1, "auction_id": 2, "asin": "B09XYDQZV6",
        "product_title": "TV", "yahoo_auction_id": "x1", "auction_title": "TV used",
        "current_price": 9000, "buy_now_price": null, "status": "active", "is_monitoring": true
    });
    Mock::given(method("POST"))
        .and(path("/api/monitor/add"))
        .and(body_json(json!({
            "asin": "B09XYDQZV6", "product_title": "TV", "auction_id": "x1",
            "auction_title": "TV used", "current_price": 9000, "buy_now_price": null,
            "image_url": null, "url": null
        })))
        .respond_with(ResponseTemplate::new(200).set_body_json(item.clone()))
        .mount(&server)
        .await;
    Mock::given(method("GET"))
        .and(path("/api/monitor/list"))
        .and(query_param("status", "ended"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({"items": [], "total": 0})))
        .mount(&server)
        .await;
    Mock::given(method("DELETE"))
        .and(path("/api/monitor/7"))
        .respond_with(
            ResponseTemplate::new(200).set_body_json(json!({"message": "Monitor removed", "id": 7})),
        )
        .mount(&server)
        .await;

    let client = client_for(&server).await;
    let added = client
        .add_monitor(&MonitorAddRequest {
            asin: "B09XYDQZV6".into(),
            product_title: "TV".into(),
            auction_id: "x1".into(),
            auction_title: "TV used".into(),
            current_price: Some(9000),
            buy_now_price: None,
            image_url: None,
            url: None,
        })
        .await
        .unwrap();
    assert_eq!(added.id, 7);
    assert!(added.is_monitoring);

    let ended = client.list_monitors(MonitorStatus::Ended).await.unwrap();
    assert_eq!(ended.total, 0);

    let removed = client.remove_monitor(7).await.unwrap();
    assert_eq!(removed.message, "Monitor removed");
    assert_eq!(removed.id, Some(7));
}

#[tokio::test]
async fn pricing_request_omits_unset_options() {
    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .and(path("/api/pricing/calculate"))
        .and(body_json(json!({"selling_price": 20000, "expected_winning_price": 12000})))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "selling_price": 20000, "expected_winning_price": 12000, "amazon_fee": 2000,
            "amazon_fee_rate": 0.1, "shipping_cost": 800, "other_cost": 0,
            "profit": 5200, "profit_rate": 26.0
        })))
        .mount(&server)
        .await;

    let result = client_for(&server)
        .await
        .calculate_pricing(&PricingRequest {
            selling_price: 20000,
            expected_winning_price: 12000,
            category: None,
            fee_rate: None,
            shipping_cost: None,
            other_cost: None,
        })
        .await
        .unwrap();
    assert_eq!(result.profit, 5200);
}

#[tokio::test]
async fn templates_collection_keeps_its_trailing_slash() {
    let server = MockServer::start().await;
    let template = json!({"id": 3, "name": "standard", "body": "本文", "created_at": "2026-01-01T00:00:00"});
    Mock::given(method("GET"))
        .and(path("/api/templates/"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!([template.clone()])))
        .mount(&server)
        .await;
    Mock::given(method("POST"))
        .and(path("/api/templates/"))
        .and(body_json(json!({"name": "standard", "body": "本文"})))
        .respond_with(ResponseTemplate::new(201).set_body_json(template.clone()))
        .mount(&server)
        .await;
    Mock::given(method("PUT"))
        .and(path("/api/templates/3"))
        .and(body_json(json!({"body": "新本文"})))
        .respond_with(ResponseTemplate::new(200).set_body_json(template.clone()))
        .mount(&server)
        .await;

    let client = client_for(&server).await;
    assert_eq!(client.list_templates().await.unwrap().len(), 1);
    let created = client
        .create_template(&TemplateDraft {
            name: "standard".into(),
            body: "本文".into(),
        })
        .await
        .unwrap();
    assert_eq!(created.id, 3);
    let patch = TemplatePatch {
        body: Some("新本文".into()),
        ..TemplatePatch::default()
    };
    client.update_template(3, &patch).await.unwrap();
}

#[tokio::test]
async fn notifications_and_scheduler_controls() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/api/notifications/"))
        .and(query_param("limit", "20"))
        .and(query_param("unread_only", "true"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "items": [{
                "id": 1, "type": "price_change", "title": "値下がり", "message": "9,000円",
                "link_url": null, "is_read": false, "created_at": "2026-01-01T00:00:00"
            }],
            "total": 1,
            "unread_count": 1
        })))
        .mount(&server)
        .await;
    Mock::given(method("POST"))
        .and(path("/api/notifications/read-all"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({"detail": "All marked as read"})))
        .mount(&server)
        .await;
    Mock::given(method("POST"))
        .and(path("/api/scheduler/run-now"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({"detail": "Scheduler run completed"})))
        .mount(&server)
        .await;

    let client = client_for(&server).await;
    let list = client.list_notifications(20, true).await.unwrap();
    assert_eq!(list.items[0].kind, "price_change");
    assert_eq!(list.unread_count, 1);
    assert_eq!(
        client.mark_all_notifications_read().await.unwrap().detail,
        "All marked as read"
    );
    client.run_scheduler_now().await.unwrap();
}

#[tokio::test]
async fn unreachable_backend_is_a_network_failure() {
    let client = BackendClient::new(ClientSettings {
        api_base: "http://127.0.0.1:9/api".into(),
        connect_timeout: Duration::from_millis(200),
        request_timeout: Duration::from_millis(500),
    })
    .unwrap();
    let err = client.unread_count().await.unwrap_err();
    assert!(matches!(err.kind, FailureKind::Network | FailureKind::Timeout));
}

#[tokio::test]
async fn blank_keyword_is_no_data_without_a_request() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!([])))
        .expect(0)
        .mount(&server)
        .await;

    let err = client_for(&server).await.search("   ").await.unwrap_err();
    assert_eq!(err.kind, FailureKind::NoData);
    assert_eq!(err.to_string(), "no data available: empty search keyword");
}
