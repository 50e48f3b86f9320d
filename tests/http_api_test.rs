use anyhow::Result;
use pack_calc::{router, serve, AppState, InMemoryCatalog, PackCalculator};
use reqwest::{Client, Method, StatusCode};
use serde_json::{json, Value};
use tokio::net::TcpListener;
use tokio::task::JoinHandle;

struct TestServer {
    base: String,
    client: Client,
    handle: JoinHandle<()>,
}

impl TestServer {
    async fn start(sizes: &[i64]) -> Result<Self> {
        let catalog = InMemoryCatalog::with_sizes(sizes.iter().copied())?;
        let app = router(AppState::new(PackCalculator::new(catalog)));
        let listener = TcpListener::bind(("127.0.0.1", 0)).await?;
        let addr = listener.local_addr()?;

        let handle = tokio::spawn(async move {
            serve(listener, app, std::future::pending())
                .await
                .expect("serve");
        });

        Ok(Self {
            base: format!("http://{addr}"),
            client: Client::new(),
            handle,
        })
    }

    fn url(&self, path: &str) -> String {
        format!("{}{}", self.base, path)
    }

    async fn post_json(&self, path: &str, body: &Value) -> Result<reqwest::Response> {
        Ok(self.client.post(self.url(path)).json(body).send().await?)
    }
}

impl Drop for TestServer {
    fn drop(&mut self) {
        self.handle.abort();
    }
}

async fn error_code(response: reqwest::Response) -> Result<String> {
    let body: Value = response.json().await?;
    Ok(body["code"].as_str().unwrap_or_default().to_string())
}

#[tokio::test]
async fn health_returns_ok_with_cors_headers() -> Result<()> {
    let server = TestServer::start(&[]).await?;

    let response = server.client.get(server.url("/health")).send().await?;
    assert_eq!(response.status(), StatusCode::OK);
    assert_eq!(
        response.headers()["access-control-allow-origin"],
        "*"
    );
    assert_eq!(response.text().await?, "OK");
    Ok(())
}

#[tokio::test]
async fn preflight_is_answered_for_any_route() -> Result<()> {
    let server = TestServer::start(&[]).await?;

    let response = server
        .client
        .request(Method::OPTIONS, server.url("/package"))
        .send()
        .await?;
    assert_eq!(response.status(), StatusCode::OK);
    assert_eq!(
        response.headers()["access-control-allow-methods"],
        "GET, POST, PUT, DELETE, OPTIONS"
    );
    assert_eq!(
        response.headers()["access-control-allow-headers"],
        "Content-Type, Authorization"
    );
    assert_eq!(response.headers()["access-control-max-age"], "3600");
    Ok(())
}

#[tokio::test]
async fn add_list_and_delete_packages() -> Result<()> {
    let server = TestServer::start(&[]).await?;

    let mut ids = Vec::new();
    for size in [1000, 250, 500] {
        let response = server
            .post_json("/package", &json!({ "packageSize": size }))
            .await?;
        assert_eq!(response.status(), StatusCode::CREATED);
        let body: Value = response.json().await?;
        ids.push(body["id"].as_str().unwrap_or_default().to_string());
    }
    assert_eq!(ids, vec!["1", "2", "3"]);

    let listing = server.client.get(server.url("/packages")).send().await?;
    assert_eq!(listing.status(), StatusCode::OK);
    assert_eq!(listing.text().await?, r#"{"1":1000,"2":250,"3":500}"#);

    let response = server
        .client
        .delete(server.url("/package/2"))
        .send()
        .await?;
    assert_eq!(response.status(), StatusCode::NO_CONTENT);

    let listing = server.client.get(server.url("/packages")).send().await?;
    assert_eq!(listing.text().await?, r#"{"1":1000,"3":500}"#);
    Ok(())
}

#[tokio::test]
async fn add_rejects_invalid_sizes() -> Result<()> {
    let server = TestServer::start(&[]).await?;

    for bad in [json!(0), json!(-5), json!(2.5), json!("250"), json!(null)] {
        let response = server
            .post_json("/package", &json!({ "packageSize": bad }))
            .await?;
        assert_eq!(response.status(), StatusCode::BAD_REQUEST, "size {bad}");
        assert_eq!(error_code(response).await?, "invalid_size");
    }

    let listing = server.client.get(server.url("/packages")).send().await?;
    assert_eq!(listing.text().await?, "{}");
    Ok(())
}

#[tokio::test]
async fn malformed_bodies_are_bad_requests() -> Result<()> {
    let server = TestServer::start(&[250]).await?;

    let response = server
        .client
        .post(server.url("/package"))
        .header("content-type", "application/json")
        .body("{not json")
        .send()
        .await?;
    assert_eq!(response.status(), StatusCode::BAD_REQUEST);
    assert_eq!(error_code(response).await?, "invalid_request");

    let response = server.post_json("/package", &json!({ "size": 10 })).await?;
    assert_eq!(response.status(), StatusCode::BAD_REQUEST);
    assert_eq!(error_code(response).await?, "invalid_request");

    let response = server
        .client
        .post(server.url("/calculate"))
        .body("251")
        .send()
        .await?;
    assert_eq!(response.status(), StatusCode::BAD_REQUEST);
    Ok(())
}

#[tokio::test]
async fn delete_unknown_package_is_not_found() -> Result<()> {
    let server = TestServer::start(&[250]).await?;

    let response = server
        .client
        .delete(server.url("/package/nonexistent"))
        .send()
        .await?;
    assert_eq!(response.status(), StatusCode::NOT_FOUND);
    assert_eq!(error_code(response).await?, "not_found");
    Ok(())
}

#[tokio::test]
async fn calculate_standard_catalog() -> Result<()> {
    let server = TestServer::start(&[250, 500, 1000, 2000, 5000]).await?;

    let response = server.post_json("/calculate", &json!(251)).await?;
    assert_eq!(response.status(), StatusCode::OK);
    assert_eq!(response.json::<Value>().await?, json!({ "500": 1 }));

    let response = server.post_json("/calculate", &json!(1)).await?;
    assert_eq!(response.json::<Value>().await?, json!({ "250": 1 }));

    let response = server
        .post_json("/calculate", &json!({ "orderSize": 12001 }))
        .await?;
    assert_eq!(response.json::<Value>().await?, json!({ "5000": 3 }));
    Ok(())
}

#[tokio::test]
async fn calculate_non_greedy_catalog() -> Result<()> {
    let server = TestServer::start(&[23, 31, 53]).await?;

    let response = server.post_json("/calculate", &json!(263)).await?;
    assert_eq!(response.json::<Value>().await?, json!({ "53": 5 }));

    let response = server.post_json("/calculate", &json!(500000)).await?;
    assert_eq!(response.json::<Value>().await?, json!({ "53": 9434 }));
    Ok(())
}

#[tokio::test]
async fn calculate_with_covering_size_is_immediate() -> Result<()> {
    let server = TestServer::start(&[100_000_000, 1]).await?;

    let response = server.post_json("/calculate", &json!(5)).await?;
    assert_eq!(response.status(), StatusCode::OK);
    assert_eq!(response.json::<Value>().await?, json!({ "100000000": 1 }));

    let response = server.post_json("/calculate", &json!(1)).await?;
    assert_eq!(response.json::<Value>().await?, json!({ "1": 1 }));
    Ok(())
}

#[tokio::test]
async fn calculate_rejects_invalid_orders() -> Result<()> {
    let server = TestServer::start(&[250]).await?;

    for bad in [json!(0), json!(-3), json!(2.5), json!("10"), json!({ "order": 5 })] {
        let response = server.post_json("/calculate", &bad).await?;
        assert_eq!(response.status(), StatusCode::BAD_REQUEST, "order {bad}");
        assert_eq!(error_code(response).await?, "invalid_order_size");
    }
    Ok(())
}

#[tokio::test]
async fn calculate_with_empty_catalog() -> Result<()> {
    let server = TestServer::start(&[]).await?;

    let response = server.post_json("/calculate", &json!(10)).await?;
    assert_eq!(response.status(), StatusCode::BAD_REQUEST);
    assert_eq!(error_code(response).await?, "no_packages_available");
    Ok(())
}

#[tokio::test]
async fn calculate_follows_catalog_changes() -> Result<()> {
    let server = TestServer::start(&[250, 500]).await?;

    let response = server.post_json("/calculate", &json!(400)).await?;
    assert_eq!(response.json::<Value>().await?, json!({ "500": 1 }));

    // id 2 is the 500 entry
    server
        .client
        .delete(server.url("/package/2"))
        .send()
        .await?;
    let response = server.post_json("/calculate", &json!(400)).await?;
    assert_eq!(response.json::<Value>().await?, json!({ "250": 2 }));
    Ok(())
}
