//! Product listing against a live backend.

#![allow(clippy::unwrap_used, clippy::indexing_slicing)]

use std::time::Duration;

use halltek_integration_tests::FakeBackend;
use halltek_storefront::api::{ApiClient, ApiError};
use rust_decimal::Decimal;
use serde_json::json;

#[tokio::test]
async fn test_listing_is_normalized() {
    let backend = FakeBackend::start().await;
    backend.set_products(json!({"products": [
        {"_id": {"$oid": "65a1"}, "name": "Desk Lamp", "price": "1499.00", "image": "/lamp.png"},
        {"slug": "mug", "price": 250},
        {"description": "no identifier"}
    ]}));

    let products = backend.client().list_products().await.unwrap();

    assert_eq!(products.len(), 2);
    assert_eq!(products[0].id.as_str(), "65a1");
    assert_eq!(products[0].price, Decimal::new(1499, 0));
    assert_eq!(products[1].id.as_str(), "mug");
    assert_eq!(products[1].name, "Untitled Product");
    assert_eq!(products[1].image, None);
}

#[tokio::test]
async fn test_listing_is_cached_until_invalidated() {
    let backend = FakeBackend::start().await;
    backend.set_products(json!([{"id": "a", "name": "A", "price": 1}]));
    let client = backend.client();

    client.list_products().await.unwrap();
    backend.set_products(json!([]));
    let cached = client.list_products().await.unwrap();

    assert_eq!(backend.product_calls(), 1);
    assert_eq!(cached.len(), 1);

    client.invalidate_products().await;
    assert!(client.list_products().await.unwrap().is_empty());
    assert_eq!(backend.product_calls(), 2);
}

#[tokio::test]
async fn test_cache_expires() {
    let backend = FakeBackend::start().await;
    backend.set_products(json!([{"id": "a"}]));
    let mut config = backend.config();
    config.catalog_cache_ttl = Duration::from_millis(50);
    let client = ApiClient::new(&config).unwrap();

    client.list_products().await.unwrap();
    tokio::time::sleep(Duration::from_millis(150)).await;
    client.list_products().await.unwrap();

    assert_eq!(backend.product_calls(), 2);
}

#[tokio::test]
async fn test_error_status_is_reported_and_not_cached() {
    let backend = FakeBackend::start().await;
    backend.fail_products(Some(503));
    let client = backend.client();

    let err = client.list_products().await.unwrap_err();
    assert!(matches!(err, ApiError::Status { status: 503, .. }));

    backend.fail_products(None);
    backend.set_products(json!([{"id": "a"}]));
    assert_eq!(client.list_products().await.unwrap().len(), 1);
    assert_eq!(backend.product_calls(), 2);
}
