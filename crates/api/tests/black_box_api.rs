use std::collections::HashMap;
use std::sync::{Arc, Mutex};

use axum::{
    extract::{Query, State},
    http::HeaderMap,
    routing::get,
    Json, Router,
};
use reqwest::StatusCode;
use serde_json::{json, Value};

use storefront_api::app::{build_app, AppServices};
use storefront_client::{CatalogClient, CatalogConfig, CatalogTransport, InMemoryTransport, TransportError};

struct TestServer {
    base_url: String,
    handle: tokio::task::JoinHandle<()>,
}

impl TestServer {
    async fn spawn(app: Router) -> Self {
        let listener = tokio::net::TcpListener::bind("127.0.0.1:0")
            .await
            .expect("failed to bind ephemeral port");
        let addr = listener.local_addr().unwrap();
        let base_url = format!("http://{}", addr);

        let handle = tokio::spawn(async move {
            axum::serve(listener, app).await.unwrap();
        });

        Self { base_url, handle }
    }

    async fn storefront(transport: Arc<InMemoryTransport>, secret: Option<&str>) -> Self {
        let config = CatalogConfig::new("https://cms.example.com").unwrap();
        let catalog = CatalogClient::with_transport(&config, transport as Arc<dyn CatalogTransport>);
        Self::spawn(build_app(AppServices::new(catalog), secret.map(str::to_string))).await
    }
}

impl Drop for TestServer {
    fn drop(&mut self) {
        self.handle.abort();
    }
}

fn products() -> Vec<Value> {
    vec![
        json!({
            "id": 1,
            "documentId": "sku-kurta",
            "slug": "classic-kurta",
            "title": "Classic Kurta",
            "price": "4500",
            "isavailable": true,
            "Description": [
                { "type": "paragraph", "children": [{ "text": "Fabric: Cotton\nColour: White" }] }
            ],
            "images": [
                { "id": 10, "url": "/uploads/kurta_front.jpg",
                  "formats": { "thumbnail": { "url": "/uploads/thumbnail_kurta_front.jpg" } } },
                { "id": 11, "url": "https://cdn.example.com/kurta_back.jpg" }
            ],
            "catagory": { "id": 2, "Name": "Men" },
            "size": [{ "id": 1, "size": "M" }, { "id": 2, "size": "L" }]
        }),
        json!({
            "id": 2,
            "documentId": "sku-shawl",
            "slug": "pashmina-shawl",
            "title": "Pashmina Shawl",
            "price": "12000",
            "catagory": { "id": 3, "Name": "Women" }
        }),
        json!({
            "id": 3,
            "documentId": "sku-cap",
            "slug": "prayer-cap",
            "title": "Prayer Cap",
            "price": "500",
            "isavailable": false,
            "catagory": { "id": 2, "Name": "Men" }
        }),
    ]
}

fn categories() -> Vec<Value> {
    vec![
        json!({ "id": 2, "documentId": "c2", "Name": "Men",
                "products": [{ "id": 1, "slug": "classic-kurta" }, { "id": 3, "slug": "prayer-cap" }] }),
        json!({ "id": 3, "documentId": "c3", "Name": "Women",
                "products": [{ "id": 2, "slug": "pashmina-shawl" }] }),
    ]
}

fn seeded() -> Arc<InMemoryTransport> {
    Arc::new(
        InMemoryTransport::new()
            .with_products(products())
            .with_categories(categories()),
    )
}

fn slugs_of(body: &Value) -> Vec<String> {
    body["products"]
        .as_array()
        .unwrap()
        .iter()
        .map(|p| p["slug"].as_str().unwrap().to_string())
        .collect()
}

#[tokio::test]
async fn health_carries_a_request_id() {
    let srv = TestServer::storefront(seeded(), None).await;

    let res = reqwest::get(format!("{}/health", srv.base_url)).await.unwrap();
    assert_eq!(res.status(), StatusCode::OK);

    let id = res.headers().get("x-request-id").unwrap().to_str().unwrap();
    let id = uuid::Uuid::parse_str(id).unwrap();
    assert_eq!(id.get_version_num(), 7);
}

#[tokio::test]
async fn listing_defaults_to_all_products_in_upstream_order() {
    let srv = TestServer::storefront(seeded(), None).await;

    let body: Value = reqwest::get(format!("{}/products", srv.base_url))
        .await
        .unwrap()
        .json()
        .await
        .unwrap();

    assert_eq!(slugs_of(&body), vec!["classic-kurta", "pashmina-shawl", "prayer-cap"]);
    assert_eq!(body["sort"], "none");
    assert_eq!(body["selected"], json!([]));
    assert_eq!(body["categories"].as_array().unwrap().len(), 2);
    assert_eq!(body["categories"][0]["product_count"], 2);

    let card = &body["products"][0];
    assert_eq!(card["price_display"], "PKR 4500");
    assert_eq!(card["image_url"], "https://cms.example.com/uploads/kurta_front.jpg");
    assert_eq!(card["hover_image_url"], "https://cdn.example.com/kurta_back.jpg");
    assert_eq!(card["category"], "Men");

    let bare = &body["products"][1];
    assert_eq!(bare["image_url"], "/placeholder.svg?height=400&width=400");
    assert!(bare["hover_image_url"].is_null());
}

#[tokio::test]
async fn listing_filters_by_category_and_sorts_by_price() {
    let srv = TestServer::storefront(seeded(), None).await;

    let body: Value = reqwest::get(format!("{}/products?category=2&sort=price-low", srv.base_url))
        .await
        .unwrap()
        .json()
        .await
        .unwrap();

    assert_eq!(slugs_of(&body), vec!["prayer-cap", "classic-kurta"]);
    assert_eq!(body["selected"], json!([2]));
    assert_eq!(body["sort"], "price-low");
    assert_eq!(body["sort_label"], "Price: Low to High");
    assert_eq!(body["categories"][0]["selected"], true);
    assert_eq!(body["categories"][1]["selected"], false);

    let body: Value = reqwest::get(format!("{}/products?category=2,3&sort=price-high", srv.base_url))
        .await
        .unwrap()
        .json()
        .await
        .unwrap();
    assert_eq!(slugs_of(&body), vec!["pashmina-shawl", "classic-kurta", "prayer-cap"]);
}

#[tokio::test]
async fn invalid_listing_query_is_rejected() {
    let srv = TestServer::storefront(seeded(), None).await;
    let client = reqwest::Client::new();

    for query in ["sort=cheapest", "category=men"] {
        let res = client
            .get(format!("{}/products?{query}", srv.base_url))
            .send()
            .await
            .unwrap();
        assert_eq!(res.status(), StatusCode::BAD_REQUEST);
        let body: Value = res.json().await.unwrap();
        assert_eq!(body["error"], "invalid_query");
    }
}

#[tokio::test]
async fn product_detail_renders_every_section() {
    let srv = TestServer::storefront(seeded(), None).await;

    let res = reqwest::get(format!("{}/products/classic-kurta", srv.base_url)).await.unwrap();
    assert_eq!(res.status(), StatusCode::OK);
    let body: Value = res.json().await.unwrap();

    assert_eq!(body["sku"], "sku-kurta");
    assert_eq!(body["availability_label"], "IN STOCK");
    assert_eq!(body["installment"], "PKR 1500.00");
    assert_eq!(body["default_size"], 1);
    assert_eq!(body["description"], json!(["Fabric: Cotton", "Colour: White"]));
    assert_eq!(body["main_image_url"], "https://cms.example.com/uploads/kurta_front.jpg");
    assert_eq!(
        body["thumbnails"][0]["url"],
        "https://cms.example.com/uploads/thumbnail_kurta_front.jpg"
    );
    assert_eq!(body["magnifier"]["side"], 120.0);
    assert_eq!(body["magnifier"]["zoom"], 2.5);
}

#[tokio::test]
async fn product_detail_can_preselect_an_image() {
    let srv = TestServer::storefront(seeded(), None).await;

    let body: Value = reqwest::get(format!("{}/products/classic-kurta?image=11", srv.base_url))
        .await
        .unwrap()
        .json()
        .await
        .unwrap();
    assert_eq!(body["main_image_url"], "https://cdn.example.com/kurta_back.jpg");
    assert_eq!(body["thumbnails"][1]["selected"], true);
}

#[tokio::test]
async fn product_without_images_or_flag_is_out_of_stock_with_no_gallery() {
    let srv = TestServer::storefront(seeded(), None).await;

    let body: Value = reqwest::get(format!("{}/products/pashmina-shawl", srv.base_url))
        .await
        .unwrap()
        .json()
        .await
        .unwrap();
    assert_eq!(body["availability_label"], "OUT OF STOCK");
    assert!(body["main_image_url"].is_null());
    assert_eq!(body["thumbnails"], json!([]));
}

#[tokio::test]
async fn unknown_slug_is_not_found() {
    let srv = TestServer::storefront(seeded(), None).await;

    let res = reqwest::get(format!("{}/products/nonexistent", srv.base_url)).await.unwrap();
    assert_eq!(res.status(), StatusCode::NOT_FOUND);
    let body: Value = res.json().await.unwrap();
    assert_eq!(body["error"], "not_found");
}

#[tokio::test]
async fn upstream_outage_renders_an_empty_catalog() {
    let transport = seeded();
    transport.fail_with(TransportError::Status {
        status: 503,
        body: "maintenance".to_string(),
    });
    let srv = TestServer::storefront(transport, None).await;

    let res = reqwest::get(format!("{}/products", srv.base_url)).await.unwrap();
    assert_eq!(res.status(), StatusCode::OK);
    let body: Value = res.json().await.unwrap();
    assert_eq!(body["products"], json!([]));
    assert_eq!(body["categories"], json!([]));

    let res = reqwest::get(format!("{}/products/classic-kurta", srv.base_url)).await.unwrap();
    assert_eq!(res.status(), StatusCode::NOT_FOUND);

    let body: Value = reqwest::get(format!("{}/slugs", srv.base_url))
        .await
        .unwrap()
        .json()
        .await
        .unwrap();
    assert_eq!(body["slugs"], json!([]));
}

#[tokio::test]
async fn categories_outage_leaves_the_product_grid_intact() {
    let transport = seeded();
    transport.fail_path_with(
        "/api/catagories",
        TransportError::Status {
            status: 500,
            body: "boom".to_string(),
        },
    );
    let srv = TestServer::storefront(transport, None).await;

    let res = reqwest::get(format!("{}/products", srv.base_url)).await.unwrap();
    assert_eq!(res.status(), StatusCode::OK);
    let body: Value = res.json().await.unwrap();
    assert_eq!(slugs_of(&body), vec!["classic-kurta", "pashmina-shawl", "prayer-cap"]);
    assert_eq!(body["categories"], json!([]));
}

#[tokio::test]
async fn products_outage_still_lists_categories() {
    let transport = seeded();
    transport.fail_path_with("/api/products", TransportError::Network("connection reset".to_string()));
    let srv = TestServer::storefront(transport, None).await;

    let body: Value = reqwest::get(format!("{}/products", srv.base_url))
        .await
        .unwrap()
        .json()
        .await
        .unwrap();
    assert_eq!(body["products"], json!([]));
    assert_eq!(body["categories"].as_array().unwrap().len(), 2);

    let body: Value = reqwest::get(format!("{}/categories", srv.base_url))
        .await
        .unwrap()
        .json()
        .await
        .unwrap();
    assert_eq!(body["categories"].as_array().unwrap().len(), 2);
}

#[tokio::test]
async fn categories_and_slugs_are_listed() {
    let srv = TestServer::storefront(seeded(), None).await;

    let body: Value = reqwest::get(format!("{}/categories", srv.base_url))
        .await
        .unwrap()
        .json()
        .await
        .unwrap();
    assert_eq!(body["categories"][1]["name"], "Women");
    assert_eq!(body["categories"][1]["products"][0]["slug"], "pashmina-shawl");

    let body: Value = reqwest::get(format!("{}/slugs", srv.base_url))
        .await
        .unwrap()
        .json()
        .await
        .unwrap();
    assert_eq!(body["slugs"], json!(["classic-kurta", "pashmina-shawl", "prayer-cap"]));
}

#[tokio::test]
async fn repeated_listings_are_served_from_the_cache() {
    let transport = seeded();
    let srv = TestServer::storefront(transport.clone(), None).await;

    for _ in 0..3 {
        let res = reqwest::get(format!("{}/products", srv.base_url)).await.unwrap();
        assert_eq!(res.status(), StatusCode::OK);
    }
    // One products read and one categories read.
    assert_eq!(transport.request_count(), 2);
}

#[tokio::test]
async fn revalidate_is_absent_without_a_secret() {
    let srv = TestServer::storefront(seeded(), None).await;

    let res = reqwest::Client::new()
        .post(format!("{}/revalidate", srv.base_url))
        .json(&json!({ "tag": "products" }))
        .send()
        .await
        .unwrap();
    assert_eq!(res.status(), StatusCode::NOT_FOUND);
}

#[tokio::test]
async fn revalidate_rejects_other_methods_before_auth() {
    let srv = TestServer::storefront(seeded(), Some("hook-secret")).await;

    let res = reqwest::get(format!("{}/revalidate", srv.base_url)).await.unwrap();
    assert_eq!(res.status(), StatusCode::METHOD_NOT_ALLOWED);
}

#[tokio::test]
async fn revalidate_requires_the_secret_and_purges_the_tag() {
    let transport = seeded();
    let srv = TestServer::storefront(transport.clone(), Some("hook-secret")).await;
    let client = reqwest::Client::new();
    let url = format!("{}/revalidate", srv.base_url);

    let res = client.post(&url).json(&json!({ "tag": "products" })).send().await.unwrap();
    assert_eq!(res.status(), StatusCode::UNAUTHORIZED);

    let res = client
        .post(&url)
        .bearer_auth("wrong")
        .json(&json!({ "tag": "products" }))
        .send()
        .await
        .unwrap();
    assert_eq!(res.status(), StatusCode::UNAUTHORIZED);

    reqwest::get(format!("{}/products", srv.base_url)).await.unwrap();
    assert_eq!(transport.request_count(), 2);

    let res = client
        .post(&url)
        .bearer_auth("hook-secret")
        .json(&json!({ "tag": "products" }))
        .send()
        .await
        .unwrap();
    assert_eq!(res.status(), StatusCode::OK);
    let body: Value = res.json().await.unwrap();
    assert_eq!(body, json!({ "tag": "products", "purged": 1 }));

    // Products are refetched, categories still come from the cache.
    reqwest::get(format!("{}/products", srv.base_url)).await.unwrap();
    assert_eq!(transport.request_count(), 3);
}

// -------------------------
// End to end against a stub CMS over real HTTP
// -------------------------

#[derive(Default)]
struct StubCms {
    authorization: Mutex<Vec<Option<String>>>,
}

async fn stub_products(
    State(stub): State<Arc<StubCms>>,
    headers: HeaderMap,
    Query(query): Query<HashMap<String, String>>,
) -> Json<Value> {
    let auth = headers
        .get("authorization")
        .and_then(|v| v.to_str().ok())
        .map(str::to_string);
    stub.authorization.lock().unwrap().push(auth);

    let data: Vec<Value> = products()
        .into_iter()
        .filter(|p| match query.get("filters[slug][$eq]") {
            Some(slug) => p["slug"] == slug.as_str(),
            None => true,
        })
        .collect();
    Json(json!({ "data": data, "meta": { "pagination": { "total": data.len() } } }))
}

async fn stub_categories() -> Json<Value> {
    Json(json!({ "data": categories(), "meta": {} }))
}

#[tokio::test]
async fn end_to_end_against_a_stub_cms() {
    let stub = Arc::new(StubCms::default());
    let cms = TestServer::spawn(
        Router::new()
            .route("/api/products", get(stub_products))
            .route("/api/catagories", get(stub_categories))
            .with_state(stub.clone()),
    )
    .await;

    let config = CatalogConfig::new(&cms.base_url).unwrap().with_token("cms-token");
    let srv = TestServer::spawn(build_app(AppServices::new(CatalogClient::new(&config)), None)).await;

    let body: Value = reqwest::get(format!("{}/products?sort=price-high", srv.base_url))
        .await
        .unwrap()
        .json()
        .await
        .unwrap();
    assert_eq!(slugs_of(&body), vec!["pashmina-shawl", "classic-kurta", "prayer-cap"]);
    assert_eq!(
        body["products"][1]["image_url"],
        format!("{}/uploads/kurta_front.jpg", cms.base_url)
    );

    let res = reqwest::get(format!("{}/products/prayer-cap", srv.base_url)).await.unwrap();
    assert_eq!(res.status(), StatusCode::OK);
    let body: Value = res.json().await.unwrap();
    assert_eq!(body["availability_label"], "OUT OF STOCK");

    let res = reqwest::get(format!("{}/products/nonexistent", srv.base_url)).await.unwrap();
    assert_eq!(res.status(), StatusCode::NOT_FOUND);

    let seen = stub.authorization.lock().unwrap().clone();
    assert!(!seen.is_empty());
    assert!(seen.iter().all(|a| a.as_deref() == Some("Bearer cms-token")));
}

#[tokio::test]
async fn end_to_end_cms_down_degrades_gracefully() {
    // Nothing listens on this port once the throwaway listener is dropped.
    let listener = tokio::net::TcpListener::bind("127.0.0.1:0").await.unwrap();
    let dead = format!("http://{}", listener.local_addr().unwrap());
    drop(listener);

    let config = CatalogConfig::new(&dead).unwrap();
    let srv = TestServer::spawn(build_app(AppServices::new(CatalogClient::new(&config)), None)).await;

    let res = reqwest::get(format!("{}/products", srv.base_url)).await.unwrap();
    assert_eq!(res.status(), StatusCode::OK);
    let body: Value = res.json().await.unwrap();
    assert_eq!(body["products"], json!([]));
}
