//! Home, product, health and middleware behavior.

#![allow(clippy::unwrap_used)]

use axum::http::{StatusCode, header};
use elorad_integration_tests::{Mode, TestContext};
use elorad_storefront::middleware::REQUEST_ID_HEADER;
use elorad_storefront::routes::home::VIEWPORT_WIDTH_HINT;

fn has(params: &[(String, String)], key: &str, value: &str) -> bool {
    params.iter().any(|(k, v)| k == key && v == value)
}

#[tokio::test]
async fn test_health() {
    let ctx = TestContext::new(Mode::Normal).await;
    let response = ctx.get("/health").await;

    assert_eq!(response.status, StatusCode::OK);
    assert_eq!(response.body, "ok");
}

#[tokio::test]
async fn test_readiness_checks_medusa() {
    let ctx = TestContext::new(Mode::Normal).await;
    assert_eq!(ctx.get("/health/ready").await.status, StatusCode::OK);
}

#[tokio::test]
async fn test_root_redirects_to_default_country() {
    let ctx = TestContext::new(Mode::Normal).await;
    let response = ctx.get("/").await;

    assert_eq!(response.status, StatusCode::TEMPORARY_REDIRECT);
    assert_eq!(response.headers.get(header::LOCATION).unwrap(), "/ng");
}

#[tokio::test]
async fn test_home_shows_latest_arrivals() {
    let ctx = TestContext::new(Mode::Normal).await;
    let response = ctx.get("/ng").await;

    assert_eq!(response.status, StatusCode::OK);
    assert!(response.body.contains("Product 0"));
    assert!(response.body.contains("/ng/store"));

    let params = ctx.medusa.last_product_params();
    assert!(params.contains(&("order".to_string(), "-created_at".to_string())));
    assert!(
        response
            .headers
            .get("accept-ch")
            .is_some_and(|v| v.to_str().unwrap().eq_ignore_ascii_case(VIEWPORT_WIDTH_HINT))
    );
}

#[tokio::test]
async fn test_home_carousel_follows_slide_links() {
    let ctx = TestContext::new(Mode::Normal).await;

    // Desktop: 8 cards, 4 at a time
    let response = ctx.get("/ng").await;
    assert!(response.body.contains("href=\"/ng?slide=1\""));
    assert!(response.body.contains("href=\"/ng?slide=4\""));
    assert!(response.body.contains("data-index=\"0\""));

    let response = ctx.get("/ng?slide=99").await;
    assert_eq!(response.status, StatusCode::OK);
    assert!(response.body.contains("data-index=\"4\""));
    assert!(response.body.contains("carousel__slide--before"));
    assert!(response.body.contains("href=\"/ng?slide=0\""));
}

#[tokio::test]
async fn test_home_carousel_uses_viewport_hint() {
    let ctx = TestContext::new(Mode::Normal).await;

    let response = ctx
        .get_with_headers("/ng", &[(VIEWPORT_WIDTH_HINT, "390")])
        .await;

    assert_eq!(response.status, StatusCode::OK);
    // One card at a time: one dot per card
    assert_eq!(response.body.matches("data-carousel-dot=").count(), 8);
    assert!(response.body.contains("href=\"/ng?slide=7\""));
}

#[tokio::test]
async fn test_home_survives_backend_failure() {
    let ctx = TestContext::new(Mode::Fail).await;
    let response = ctx.get("/ng").await;

    assert_eq!(response.status, StatusCode::OK);
    assert!(response.body.contains("Try again"));
}

#[tokio::test]
async fn test_product_detail() {
    let ctx = TestContext::new(Mode::Normal).await;
    let response = ctx.get("/ng/products/linen-romper").await;

    assert_eq!(response.status, StatusCode::OK);
    assert!(response.body.contains("Product 1"));
    assert!(response.body.contains("Cotton"));

    let params = ctx.medusa.product_params();
    assert!(params.iter().any(|p| has(p, "handle", "linen-romper")));
}

#[tokio::test]
async fn test_product_detail_shows_related_products() {
    let ctx = TestContext::new(Mode::Normal).await;
    let response = ctx.get("/ng/products/product-0").await;

    assert_eq!(response.status, StatusCode::OK);
    assert!(response.body.contains("You might also like"));
    assert!(!response.body.contains("href=\"/ng/products/product-0\""));
    for n in 1..=4 {
        assert!(response.body.contains(&format!("href=\"/ng/products/product-{n}\"")));
    }
    assert!(!response.body.contains("href=\"/ng/products/product-5\""));

    let related = ctx.medusa.last_product_params();
    assert!(has(&related, "collection_id[]", "pcol_01JSPP3HZF23D9V25Z80WBNNZZ"));
    assert!(has(&related, "tags[]", "color-red"));
    assert!(has(&related, "is_giftcard", "false"));
    assert!(has(&related, "limit", "5"));
    assert!(has(&related, "region_id", "reg_ng"));
    assert!(!related.iter().any(|(k, _)| k == "handle"));
}

#[tokio::test]
async fn test_related_products_use_listing_cache() {
    let ctx = TestContext::new(Mode::Normal).await;
    ctx.get("/ng/products/product-0").await;
    ctx.get("/ng/products/product-2").await;

    // Two detail lookups, one shared related query
    assert_eq!(ctx.medusa.product_queries().len(), 3);
}

#[tokio::test]
async fn test_missing_product_is_not_found() {
    let ctx = TestContext::new(Mode::Normal).await;

    let response = ctx.get("/ng/products/missing-product").await;
    assert_eq!(response.status, StatusCode::NOT_FOUND);

    let response = ctx.get("/ng/products/Not%20A%20Handle").await;
    assert_eq!(response.status, StatusCode::NOT_FOUND);
}

#[tokio::test]
async fn test_quick_view_fragment() {
    let ctx = TestContext::new(Mode::Normal).await;
    let response = ctx.get("/ng/products/linen-romper/quick-view").await;

    assert_eq!(response.status, StatusCode::OK);
    assert!(response.body.contains("Product 1"));
    assert!(response.body.contains("data-body-overflow=\"hidden\""));
    assert!(!response.body.contains("<html"));
}

#[tokio::test]
async fn test_unknown_path_is_not_found() {
    let ctx = TestContext::new(Mode::Normal).await;
    assert_eq!(ctx.get("/ng/nowhere").await.status, StatusCode::NOT_FOUND);
}

#[tokio::test]
async fn test_security_and_request_id_headers() {
    let ctx = TestContext::new(Mode::Normal).await;
    let response = ctx.get("/health").await;

    assert_eq!(
        response.headers.get("x-content-type-options").unwrap(),
        "nosniff"
    );
    assert!(response.headers.contains_key(header::CONTENT_SECURITY_POLICY));
    assert!(response.headers.contains_key(REQUEST_ID_HEADER));
}
