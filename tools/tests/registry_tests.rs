use retrieval::{Document, DocumentStore, Retriever, SharedRetriever, NO_MATCH};
use serde_json::json;
use std::sync::Arc;
use tools::guest::GuestInfoRetrieverTool;
use tools::http::build_client;
use tools::hub_stats::{HfHubClient, HubStatsTool};
use tools::web_search::{DuckDuckGoClient, WebSearchTool};
use tools::{default_registry, HttpConfig, ToolError, ToolRegistry};
use wiremock::matchers::{header, method, path, query_param};
use wiremock::{Mock, MockServer, ResponseTemplate};

fn shared() -> SharedRetriever {
    SharedRetriever::new(Retriever::new(DocumentStore::from_documents(vec![
        Document::new("Alice", "Alice is a keynote speaker researching renewable energy"),
        Document::new("Bob", "Bob is a sponsor representative from a tech company"),
    ])))
}

#[tokio::test]
async fn default_registry_lists_every_tool() {
    let registry = default_registry(shared(), &HttpConfig::default()).unwrap();
    let names: Vec<&str> = registry.descriptors().iter().map(|d| d.name).collect();
    assert_eq!(
        names,
        vec!["duckduckgo_search", "guest_info_retriever", "guest_information", "hub_stats", "weather_info"]
    );
}

#[tokio::test]
async fn invoke_binds_arguments_and_routes_by_name() {
    let registry = default_registry(shared(), &HttpConfig::default()).unwrap();

    let out = registry.invoke("guest_info_retriever", json!({"query": "speaker energy", "k": 1})).await.unwrap();
    assert!(out.starts_with("Alice"));
    let out = registry.invoke("guest_info_retriever", json!({"query": "zzz"})).await.unwrap();
    assert_eq!(out, NO_MATCH);

    let out = registry.invoke("weather_info", json!({"location": "Rome"})).await.unwrap();
    assert!(out.starts_with("Weather in Rome: "));

    assert!(matches!(registry.invoke("teleport", json!({})).await, Err(ToolError::UnknownTool(_))));
    assert!(matches!(
        registry.invoke("guest_info_retriever", json!({"query": "x", "k": 0})).await,
        Err(ToolError::InvalidArgument(_))
    ));
    assert!(matches!(
        registry.invoke("guest_information", json!({"guest_name": "Zed"})).await,
        Err(ToolError::NotFound(_))
    ));
}

#[tokio::test]
async fn duplicate_names_are_rejected() {
    let mut registry = ToolRegistry::new();
    registry.register(Arc::new(GuestInfoRetrieverTool::new(shared()))).unwrap();
    let err = registry.register(Arc::new(GuestInfoRetrieverTool::new(shared()))).unwrap_err();
    assert!(matches!(err, ToolError::Duplicate(name) if name == "guest_info_retriever"));
    assert_eq!(registry.len(), 1);
}

#[tokio::test]
async fn hub_stats_against_mock_hub() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/api/models"))
        .and(query_param("author", "acme"))
        .and(query_param("sort", "downloads"))
        .and(query_param("limit", "1"))
        .and(header("authorization", "Bearer secret"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!([
            {"_id": "x", "id": "acme/big-model", "modelId": "acme/big-model", "downloads": 1234567}
        ])))
        .mount(&server)
        .await;
    Mock::given(method("GET"))
        .and(path("/api/models"))
        .and(query_param("author", "ghost"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!([])))
        .mount(&server)
        .await;

    let client = build_client(&HttpConfig::default()).unwrap();
    let mut registry = ToolRegistry::new();
    registry
        .register(Arc::new(HubStatsTool::new(HfHubClient::new(client, format!("{}/", server.uri()), Some("secret".into())))))
        .unwrap();

    let out = registry.invoke("hub_stats", json!({"author": "acme"})).await.unwrap();
    assert_eq!(out, "Most downloaded model by acme: acme/big-model with 1,234,567 downloads.");
    let out = registry.invoke("hub_stats", json!({"author": "ghost"})).await.unwrap();
    assert_eq!(out, "No models found for author ghost.");
}

#[tokio::test]
async fn upstream_errors_surface_as_typed_errors() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .respond_with(ResponseTemplate::new(503))
        .mount(&server)
        .await;

    let client = build_client(&HttpConfig::default()).unwrap();
    let mut registry = ToolRegistry::new();
    registry.register(Arc::new(HubStatsTool::new(HfHubClient::new(client.clone(), server.uri(), None)))).unwrap();
    registry
        .register(Arc::new(WebSearchTool::new(DuckDuckGoClient::with_endpoint(client, format!("{}/html/", server.uri())))))
        .unwrap();

    assert!(matches!(registry.invoke("hub_stats", json!({"author": "acme"})).await, Err(ToolError::Upstream(_))));
    assert!(matches!(registry.invoke("duckduckgo_search", json!({"query": "gala"})).await, Err(ToolError::Upstream(_))));
}

#[tokio::test]
async fn web_search_against_mock_page() {
    let server = MockServer::start().await;
    let page = r#"<html><body>
        <div class="result web-result">
          <h2><a class="result__a" href="//duckduckgo.com/l/?uddg=https%3A%2F%2Fexample.org%2Fgala">Gala night</a></h2>
          <a class="result__snippet">Annual gala at the manor.</a>
        </div></body></html>"#;
    Mock::given(method("GET"))
        .and(path("/html/"))
        .and(query_param("q", "gala night"))
        .respond_with(ResponseTemplate::new(200).set_body_raw(page, "text/html; charset=utf-8"))
        .mount(&server)
        .await;

    let client = build_client(&HttpConfig::default()).unwrap();
    let mut registry = ToolRegistry::new();
    registry
        .register(Arc::new(WebSearchTool::new(DuckDuckGoClient::with_endpoint(client, format!("{}/html/", server.uri())))))
        .unwrap();

    let out = registry.invoke("duckduckgo_search", json!({"query": "gala night"})).await.unwrap();
    assert_eq!(out, "1. Gala night\n   https://example.org/gala\n   Annual gala at the manor.");
}
