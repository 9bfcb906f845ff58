//! Integration tests for login/logout and checkout flows.

use std::sync::Arc;

use serde_json::json;
use wiremock::matchers::{body_json, header, method, path};
use wiremock::{Mock, MockServer, ResponseTemplate};

use bcod_client::{
    CheckoutRequest, MemoryTokenStore, PickupLocation, SessionGate, StoreClient, StoreError,
    TokenStore,
};
use chrono::{NaiveDate, NaiveTime};

fn client_with(store: Arc<MemoryTokenStore>, base_url: &str) -> StoreClient {
    StoreClient::with_base_url(base_url, store).expect("failed to build test StoreClient")
}

// ---------------------------------------------------------------------------
// Login
// ---------------------------------------------------------------------------

#[tokio::test]
async fn login_stores_the_token_for_subsequent_requests() {
    let server = MockServer::start().await;

    Mock::given(method("POST"))
        .and(path("/login"))
        .and(body_json(json!({"username": "budi", "password": "rahasia"})))
        .respond_with(ResponseTemplate::new(200).set_body_json(&json!({
            "code": "000",
            "message": "Login successful",
            "token": "fresh-token",
            "user": { "user_id": 1, "username": "budi" }
        })))
        .mount(&server)
        .await;

    Mock::given(method("GET"))
        .and(path("/cart"))
        .and(header("Authorization", "Bearer fresh-token"))
        .respond_with(ResponseTemplate::new(200).set_body_json(&json!({
            "status": "success",
            "data": { "items": [], "total_items": 0, "subtotal": "0.00" }
        })))
        .expect(1)
        .mount(&server)
        .await;

    let store = Arc::new(MemoryTokenStore::new());
    let client = client_with(store.clone(), &server.uri());
    let gate = SessionGate::new(store.clone());
    assert!(!gate.is_authorized());

    client.login("budi", "rahasia").await.expect("login should succeed");
    assert!(gate.is_authorized());

    // The stored token is injected into the very next request.
    let cart = bcod_client::CartReconciler::new(Arc::new(client));
    cart.refresh().await.expect("authenticated refresh");
}

#[tokio::test]
async fn login_failure_code_does_not_store_a_token() {
    let server = MockServer::start().await;

    Mock::given(method("POST"))
        .and(path("/login"))
        .respond_with(ResponseTemplate::new(200).set_body_json(&json!({
            "code": "104",
            "message": "Invalid username or password"
        })))
        .mount(&server)
        .await;

    let store = Arc::new(MemoryTokenStore::new());
    let client = client_with(store.clone(), &server.uri());
    match client.login("budi", "salah").await {
        Err(StoreError::Api(message)) => assert_eq!(message, "Invalid username or password"),
        other => panic!("expected Api error, got {other:?}"),
    }
    assert!(store.get().is_none());
}

// ---------------------------------------------------------------------------
// Logout
// ---------------------------------------------------------------------------

#[tokio::test]
async fn logout_clears_the_token_even_when_the_server_fails() {
    let server = MockServer::start().await;

    Mock::given(method("POST"))
        .and(path("/logout"))
        .respond_with(ResponseTemplate::new(500))
        .expect(1)
        .mount(&server)
        .await;

    let store = Arc::new(MemoryTokenStore::with_token("old-token"));
    let client = client_with(store.clone(), &server.uri());
    client.logout().await;
    assert!(store.get().is_none());
}

// ---------------------------------------------------------------------------
// Checkout
// ---------------------------------------------------------------------------

#[tokio::test]
async fn checkout_sends_the_indonesian_wire_fields() {
    let server = MockServer::start().await;

    Mock::given(method("POST"))
        .and(path("/checkout"))
        .and(body_json(json!({
            "lokasi": "kantin payung",
            "tanggal_pesan": "2026-09-01",
            "jam_pesan": "12:30"
        })))
        .respond_with(ResponseTemplate::new(200).set_body_json(&json!({
            "code": "000",
            "data": {
                "order_id": 88,
                "total_amount": "45.00",
                "whatsapp_link": "https://wa.me/628123?text=order-88",
                "lokasi": "kantin payung",
                "tanggal_pesan": "2026-09-01",
                "jam_pesan": "12:30"
            }
        })))
        .expect(1)
        .mount(&server)
        .await;

    let store = Arc::new(MemoryTokenStore::with_token("t0k3n"));
    let client = client_with(store, &server.uri());
    let request = CheckoutRequest {
        location: PickupLocation::KantinPayung,
        order_date: NaiveDate::from_ymd_opt(2026, 9, 1).expect("valid date"),
        order_time: NaiveTime::from_hms_opt(12, 30, 0).expect("valid time"),
    };

    let confirmation = client.checkout(&request).await.expect("checkout should succeed");
    assert_eq!(confirmation.order_id, 88);
    assert_eq!(confirmation.total_amount, "45.00".parse().unwrap());
    assert!(confirmation
        .whatsapp_link
        .as_deref()
        .is_some_and(|link| link.contains("wa.me")));
}

#[tokio::test]
async fn checkout_without_credential_makes_no_request() {
    let server = MockServer::start().await;

    Mock::given(method("POST"))
        .and(path("/checkout"))
        .respond_with(ResponseTemplate::new(200))
        .expect(0)
        .mount(&server)
        .await;

    let store = Arc::new(MemoryTokenStore::new());
    let client = client_with(store, &server.uri());
    let request = CheckoutRequest {
        location: PickupLocation::Lkc,
        order_date: NaiveDate::from_ymd_opt(2026, 9, 1).expect("valid date"),
        order_time: NaiveTime::from_hms_opt(9, 0, 0).expect("valid time"),
    };

    assert!(matches!(
        client.checkout(&request).await,
        Err(StoreError::Unauthenticated)
    ));
}
