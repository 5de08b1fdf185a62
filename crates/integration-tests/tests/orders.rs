//! Order history, product listings, and the product cache end to end.

#![allow(clippy::unwrap_used, clippy::indexing_slicing)]

use generix_core::{ProductId, ProductQuery, Quantity, SortKey};
use generix_integration_tests::FakeApi;
use generix_storefront::AppState;
use rust_decimal::Decimal;
use serde_json::json;

async fn place_order(app: &AppState, lines: &[(&ProductId, u32)]) {
    let mut cart = app.cart();
    for (product, quantity) in lines {
        let price = app.catalog().product(product).await.unwrap().price;
        cart.add_to_cart(product, Quantity::new(*quantity).unwrap(), price)
            .await
            .unwrap();
    }
    cart.checkout().await.unwrap();
}

#[tokio::test]
async fn test_history_is_newest_first_with_names() {
    let api = FakeApi::start().await;
    let user = api.seed_user("Juan", "secret", false);
    let paracetamol = ProductId::new(api.seed_product("Paracetamol", 5, true));
    let ambroxol = ProductId::new(api.seed_product("Ambroxol", 30, true));
    let app = api.client(Some(&api.token_for(&user)));

    place_order(&app, &[(&paracetamol, 2)]).await;
    tokio::time::sleep(std::time::Duration::from_millis(5)).await;
    place_order(&app, &[(&paracetamol, 1), (&ambroxol, 1)]).await;

    let mut history = app.orders();
    history.load().await.unwrap();
    let orders = history.orders();

    assert_eq!(orders.len(), 2);
    assert_eq!(orders[0].lines.len(), 2);
    assert_eq!(orders[0].total_price.amount, Decimal::from(35));
    assert_eq!(orders[0].lines[1].display_name(), "Ambroxol");
    assert_eq!(orders[1].lines[0].display_name(), "Paracetamol");
    assert_eq!(orders[1].item_count(), 2);
}

#[tokio::test]
async fn test_deleted_product_shows_placeholder() {
    let api = FakeApi::start().await;
    let user = api.seed_user("Juan", "secret", false);
    let gone = ProductId::new(api.seed_product("Discontinued Syrup", 80, true));
    let app = api.client(Some(&api.token_for(&user)));

    place_order(&app, &[(&gone, 1)]).await;
    api.delete_product(gone.as_str());

    let mut history = app.orders();
    history.load().await.unwrap();
    assert_eq!(history.orders()[0].lines[0].display_name(), "[No product name]");
    assert!(history.error().is_none());
}

#[tokio::test]
async fn test_shared_cache_fetches_each_product_once() {
    let api = FakeApi::start().await;
    let user = api.seed_user("Juan", "secret", false);
    let token = api.token_for(&user);
    let product = ProductId::new(api.seed_product("Paracetamol", 5, true));

    let buyer = api.client(Some(&token));
    place_order(&buyer, &[(&product, 1)]).await;
    place_order(&buyer, &[(&product, 4)]).await;
    let lookups = api.request_count("product");

    // A fresh client starts with an empty cache shared by its view-models.
    let viewer = api.client(Some(&token));
    viewer.orders().load().await.unwrap();
    viewer.orders().load().await.unwrap();
    assert_eq!(api.request_count("product"), lookups + 1);
    assert_eq!(viewer.products().entry_count().await, 1);
}

#[tokio::test]
async fn test_history_failure_records_server_error() {
    let api = FakeApi::start().await;
    let user = api.seed_user("Juan", "secret", false);
    let app = api.client(Some(&api.token_for(&user)));
    api.fail("my_orders", 500, json!({ "error": "Orders unavailable" }));

    let mut history = app.orders();
    assert!(history.load().await.is_err());
    assert!(history.orders().is_empty());
    assert_eq!(history.error(), Some("Orders unavailable"));
    assert_eq!(history.drain_notices()[0].message, "Orders unavailable");
}

#[tokio::test]
async fn test_history_not_found_records_server_error() {
    let api = FakeApi::start().await;
    let user = api.seed_user("Juan", "secret", false);
    let app = api.client(Some(&api.token_for(&user)));
    api.fail("my_orders", 404, json!({ "error": "No orders found" }));

    let mut history = app.orders();
    assert!(history.load().await.is_err());
    assert_eq!(history.error(), Some("No orders found"));
    assert_eq!(history.drain_notices()[0].message, "No orders found");
}

#[tokio::test]
async fn test_catalog_filters_and_sorts_fetched_products() {
    let api = FakeApi::start().await;
    api.seed_product("Paracetamol", 5, true);
    api.seed_product("Ambroxol", 30, true);
    api.seed_product("Loperamide", 9, false);
    api.seed_product("Cetirizine", 12, true);
    let app = api.client(None);

    let mut catalog = app.catalog();
    catalog.load_active().await.unwrap();
    assert_eq!(catalog.products().len(), 3);

    let query = ProductQuery {
        max_price: Some(Decimal::from(15)),
        sort: Some(SortKey::PriceDesc),
        ..ProductQuery::default()
    };
    let names: Vec<&str> = catalog
        .visible(&query)
        .iter()
        .map(|p| p.name.as_str())
        .collect();
    assert_eq!(names, ["Cetirizine", "Paracetamol"]);

    let newest = ProductQuery {
        sort: Some(SortKey::Newest),
        ..ProductQuery::default()
    };
    assert_eq!(catalog.visible(&newest)[0].name, "Cetirizine");
    assert_eq!(api.request_count("active_products"), 1);
}

#[tokio::test]
async fn test_full_listing_needs_admin() {
    let api = FakeApi::start().await;
    api.seed_product("Loperamide", 9, false);
    let shopper = api.seed_user("Juan", "secret", false);
    let admin = api.seed_user("Maria", "secret", true);

    let mut catalog = api.client(Some(&api.token_for(&shopper))).catalog();
    assert!(catalog.load_all().await.is_err());
    assert_eq!(catalog.drain_notices()[0].message, "Failed to fetch products!");

    let mut catalog = api.client(Some(&api.token_for(&admin))).catalog();
    catalog.load_all().await.unwrap();
    assert_eq!(catalog.products().len(), 1);
    assert!(!catalog.products()[0].is_active());
}

#[tokio::test]
async fn test_unknown_product_is_not_found() {
    let api = FakeApi::start().await;
    let catalog = api.client(None).catalog();
    let err = catalog
        .product(&ProductId::new("missing"))
        .await
        .unwrap_err();
    assert!(matches!(err, generix_storefront::ClientError::NotFound(_)));
}
