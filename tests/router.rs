//! End-to-end tests for StaticRouter: routing decisions, rewrites, header
//! rules, and fall-through to the next handler.

use async_trait::async_trait;
use filestack::{
    ConfigError, FileService, Handler, HeaderRuleConfig, Request, Response, RuleKey, StaticConfig,
    StaticRouter,
};
use http_body_util::{BodyExt, Full};
use hyper::body::Bytes;
use std::collections::BTreeMap;
use std::sync::Arc;
use tempfile::TempDir;

/// Stand-in for the dynamic application below the static layer
struct Hello;

#[async_trait]
impl Handler for Hello {
    async fn handle(&self, _req: &Request) -> Response {
        Response::new(Full::new(Bytes::from("Hello World!")))
    }
}

fn request(uri: &str) -> Request {
    let mut req = Request::new(Full::new(Bytes::new()));
    *req.uri_mut() = uri.parse().unwrap();
    req
}

fn method_request(method: &str, uri: &str) -> Request {
    let mut req = request(uri);
    *req.method_mut() = method.parse().unwrap();
    req
}

async fn body_of(response: Response) -> String {
    let bytes = response.into_body().collect().await.unwrap().to_bytes();
    String::from_utf8(bytes.to_vec()).unwrap()
}

fn fixture_root() -> TempDir {
    let dir = tempfile::tempdir().unwrap();
    let root = dir.path();
    std::fs::create_dir_all(root.join("static/assets/fonts")).unwrap();
    std::fs::create_dir_all(root.join("static/assets/images")).unwrap();
    std::fs::create_dir_all(root.join("static/assets/javascripts")).unwrap();
    std::fs::create_dir_all(root.join("static/assets/stylesheets")).unwrap();
    std::fs::create_dir_all(root.join("static/another")).unwrap();
    std::fs::create_dir_all(root.join("hidden")).unwrap();

    std::fs::write(root.join("static/test"), "mock php content").unwrap();
    std::fs::write(root.join("static/index.html"), "index!").unwrap();
    std::fs::write(root.join("static/another/index.html"), "another index!").unwrap();
    std::fs::write(root.join("static/assets/index.html"), "<html></html>").unwrap();
    std::fs::write(root.join("static/assets/fonts/font.eot"), "eot").unwrap();
    std::fs::write(root.join("static/assets/images/image.png"), "png").unwrap();
    std::fs::write(root.join("static/assets/javascripts/app.js"), "js").unwrap();
    std::fs::write(root.join("static/assets/stylesheets/app.css"), "css").unwrap();
    std::fs::write(root.join("hidden/secret.txt"), "hidden file").unwrap();
    dir
}

fn router(config: &StaticConfig) -> StaticRouter {
    StaticRouter::new(config, Arc::new(Hello)).unwrap()
}

fn rule(key: RuleKey, field: &str, value: &str) -> HeaderRuleConfig {
    let mut headers = BTreeMap::new();
    headers.insert(field.to_string(), value.to_string());
    HeaderRuleConfig { rule: key, headers }
}

#[tokio::test]
async fn test_serves_configured_prefix() {
    let dir = fixture_root();
    let mut config = StaticConfig::new(dir.path());
    config.urls = vec!["/static".to_string()];

    let response = router(&config).handle(&request("/static/test")).await;
    assert_eq!(response.status(), 200);
    assert_eq!(body_of(response).await, "mock php content");
}

#[tokio::test]
async fn test_miss_on_owned_route_is_404() {
    let dir = fixture_root();
    let mut config = StaticConfig::new(dir.path());
    config.urls = vec!["/static".to_string()];

    let response = router(&config).handle(&request("/static/foo")).await;
    assert_eq!(response.status(), 404);
    assert_eq!(body_of(response).await, "File not found: /static/foo");
}

#[tokio::test]
async fn test_suppressed_miss_falls_through() {
    let dir = fixture_root();
    let mut config = StaticConfig::new(dir.path());
    config.urls = vec!["/static".to_string()];
    config.pass_through_on_miss = true;

    let response = router(&config).handle(&request("/static/foo")).await;
    assert_eq!(response.status(), 200);
    assert_eq!(body_of(response).await, "Hello World!");
}

#[tokio::test]
async fn test_unrouted_path_delegates_to_next() {
    let dir = fixture_root();
    let mut config = StaticConfig::new(dir.path());
    config.urls = vec!["/static".to_string()];

    let response = router(&config).handle(&request("/foo/bar")).await;
    assert_eq!(body_of(response).await, "Hello World!");
}

#[tokio::test]
async fn test_default_urls_only_own_favicon() {
    let dir = fixture_root();
    let config = StaticConfig::new(dir.path());

    let router = router(&config);
    assert!(router.can_serve("/favicon.ico"));
    assert!(!router.can_serve("/static/test"));

    let response = router.handle(&request("/static/test")).await;
    assert_eq!(body_of(response).await, "Hello World!");
}

#[tokio::test]
async fn test_rewrite_entry_serves_hidden_file() {
    let dir = fixture_root();
    let mut config = StaticConfig::new(dir.path());
    config.urls = vec![];
    config
        .rewrites
        .insert("/secret".to_string(), "/hidden/secret.txt".to_string());

    let router = router(&config);
    assert!(router.can_serve("/secret"));
    assert!(!router.can_serve("/secret/deeper"));

    let response = router.handle(&request("/secret")).await;
    assert_eq!(response.status(), 200);
    assert_eq!(body_of(response).await, "hidden file");
}

#[tokio::test]
async fn test_index_served_at_trailing_slash() {
    let dir = fixture_root();
    let mut config = StaticConfig::new(dir.path().join("static"));
    config.urls = vec![String::new()];
    config.index = Some("index.html".to_string());

    let router = router(&config);

    let response = router.handle(&request("/")).await;
    assert_eq!(response.status(), 200);
    assert_eq!(body_of(response).await, "index!");

    let response = router.handle(&request("/another/")).await;
    assert_eq!(response.status(), 200);
    assert_eq!(body_of(response).await, "another index!");

    let response = router.handle(&request("/other/")).await;
    assert_eq!(response.status(), 404);
}

#[tokio::test]
async fn test_method_gate_applies_to_routed_paths() {
    let dir = fixture_root();
    let mut config = StaticConfig::new(dir.path());
    config.urls = vec!["/static".to_string()];

    let response = router(&config)
        .handle(&method_request("POST", "/static/test"))
        .await;
    assert_eq!(response.status(), 405);
    assert_eq!(response.headers()["Allow"], "GET, HEAD, OPTIONS");
}

#[tokio::test]
async fn test_header_rules_accumulate_in_order() {
    let dir = fixture_root();
    let mut config = StaticConfig::new(dir.path());
    config.urls = vec!["/static".to_string()];
    config.header_rules = vec![
        rule(RuleKey::All, "Cache-Control", "public, max-age=100"),
        rule(RuleKey::Fonts, "Cache-Control", "public, max-age=200"),
        rule(
            RuleKey::Prefix {
                value: "/static/assets/images/".to_string(),
            },
            "Cache-Control",
            "public, max-age=300",
        ),
        rule(
            RuleKey::Prefix {
                value: "static/assets/javascripts".to_string(),
            },
            "Cache-Control",
            "public, max-age=400",
        ),
        rule(
            RuleKey::Pattern {
                value: r"\.(css|erb)$".to_string(),
            },
            "Cache-Control",
            "public, max-age=500",
        ),
    ];

    let router = router(&config);
    let expectations = [
        ("/static/assets/index.html", "public, max-age=100"),
        ("/static/assets/fonts/font.eot", "public, max-age=200"),
        ("/static/assets/images/image.png", "public, max-age=300"),
        ("/static/assets/javascripts/app.js", "public, max-age=400"),
        ("/static/assets/stylesheets/app.css", "public, max-age=500"),
    ];

    for (path, cache_control) in expectations {
        let response = router.handle(&request(path)).await;
        assert_eq!(response.status(), 200, "{path}");
        assert_eq!(response.headers()["Cache-Control"], cache_control, "{path}");
    }
}

#[tokio::test]
async fn test_rules_match_the_rewritten_path() {
    let dir = fixture_root();
    let mut config = StaticConfig::new(dir.path());
    config.urls = vec![];
    config
        .rewrites
        .insert("/logo".to_string(), "/static/assets/images/image.png".to_string());
    config.header_rules = vec![rule(
        RuleKey::Prefix {
            value: "/static/assets/images/".to_string(),
        },
        "Cache-Control",
        "public, max-age=300",
    )];

    let response = router(&config).handle(&request("/logo")).await;
    assert_eq!(response.status(), 200);
    assert_eq!(response.headers()["Cache-Control"], "public, max-age=300");
}

#[tokio::test]
async fn test_custom_file_service_is_injectable() {
    struct Canned;

    #[async_trait]
    impl FileService for Canned {
        async fn serve(&self, _req: &Request, path: &str) -> Option<Response> {
            (path == "/static/canned").then(|| {
                let mut response = Response::new(Full::new(Bytes::from("from the can")));
                response
                    .headers_mut()
                    .insert("content-type", "text/plain".parse().unwrap());
                response
            })
        }
    }

    let mut config = StaticConfig::new("/ignored/by/custom/service");
    config.urls = vec!["/static".to_string()];
    config.header_rules = vec![rule(RuleKey::All, "X-Layer", "static")];

    let router =
        StaticRouter::with_file_service(&config, Arc::new(Canned), Arc::new(Hello)).unwrap();

    let hit = router.handle(&request("/static/canned")).await;
    assert_eq!(body_of(hit).await, "from the can");

    let hit = router.handle(&request("/static/canned")).await;
    assert_eq!(hit.headers()["X-Layer"], "static");

    let miss = router.handle(&request("/static/other")).await;
    assert_eq!(miss.status(), 404);
}

#[test]
fn test_malformed_pattern_fails_at_construction() {
    let dir = fixture_root();
    let mut config = StaticConfig::new(dir.path());
    config.header_rules = vec![rule(
        RuleKey::Pattern {
            value: "(unclosed".to_string(),
        },
        "Cache-Control",
        "public",
    )];

    let result = StaticRouter::new(&config, Arc::new(Hello));
    assert!(matches!(result, Err(ConfigError::Pattern { .. })));
}

#[test]
fn test_missing_root_fails_at_construction() {
    let config = StaticConfig::new("/definitely/not/a/real/root");
    let result = StaticRouter::new(&config, Arc::new(Hello));
    assert!(matches!(result, Err(ConfigError::Root { .. })));
}
