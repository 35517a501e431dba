//! HTTP response building module
//!
//! Builders for the fixed-status responses the serving handlers produce,
//! decoupled from the file-serving logic itself.

use http_body_util::Full;
use hyper::body::Bytes;
use hyper::header::{HeaderMap, HeaderName, HeaderValue};
use hyper::{Response, StatusCode};

/// Build 404 Not Found response naming the requested logical path
pub fn build_404_response(path_info: &str) -> Response<Full<Bytes>> {
    let body = format!("File not found: {path_info}");
    Response::builder()
        .status(404)
        .header("Content-Type", "text/plain")
        .body(Full::new(Bytes::from(body)))
        .unwrap_or_else(|e| {
            log_build_error("404", &e);
            Response::new(Full::new(Bytes::from("File not found")))
        })
}

/// Build 405 Method Not Allowed response
pub fn build_405_response(allow: &str) -> Response<Full<Bytes>> {
    Response::builder()
        .status(405)
        .header("Content-Type", "text/plain")
        .header("Allow", allow)
        .body(Full::new(Bytes::from("405 Method Not Allowed")))
        .unwrap_or_else(|e| {
            log_build_error("405", &e);
            Response::new(Full::new(Bytes::from("405 Method Not Allowed")))
        })
}

/// Build OPTIONS response; answered without touching the filesystem
pub fn build_options_response(allow: &str) -> Response<Full<Bytes>> {
    Response::builder()
        .status(200)
        .header("Allow", allow)
        .header("Content-Length", 0)
        .body(Full::new(Bytes::new()))
        .unwrap_or_else(|e| {
            log_build_error("OPTIONS", &e);
            Response::new(Full::new(Bytes::new()))
        })
}

/// Build 416 Range Not Satisfiable response
pub fn build_416_response(size: u64, is_head: bool) -> Response<Full<Bytes>> {
    let body = if is_head {
        Bytes::new()
    } else {
        Bytes::from("Range Not Satisfiable")
    };

    Response::builder()
        .status(416)
        .header("Content-Type", "text/plain")
        .header("Content-Range", format!("bytes */{size}"))
        .body(Full::new(body))
        .unwrap_or_else(|e| {
            log_build_error("416", &e);
            Response::new(Full::new(Bytes::new()))
        })
}

/// Assemble a response from a precomputed header map
pub(crate) fn finalize(
    status: StatusCode,
    headers: HeaderMap,
    body: Bytes,
) -> Response<Full<Bytes>> {
    let mut response = Response::new(Full::new(body));
    *response.status_mut() = status;
    *response.headers_mut() = headers;
    response
}

/// Insert a header built from string parts, skipping (with a log) names or
/// values that are not valid HTTP
pub(crate) fn set_header(headers: &mut HeaderMap, name: &str, value: &str) {
    let Ok(name) = HeaderName::from_bytes(name.as_bytes()) else {
        tracing::error!("invalid header name {name:?}");
        return;
    };
    match HeaderValue::from_str(value) {
        Ok(v) => {
            headers.insert(name, v);
        }
        Err(e) => tracing::error!("invalid {name} header value {value:?}: {e}"),
    }
}

/// Log response build error
fn log_build_error(status: &str, error: &hyper::http::Error) {
    tracing::error!("failed to build {status} response: {error}");
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_404_names_the_path() {
        let response = build_404_response("/static/missing");
        assert_eq!(response.status(), 404);
    }

    #[test]
    fn test_405_carries_allow() {
        let response = build_405_response("GET, HEAD, OPTIONS");
        assert_eq!(response.status(), 405);
        assert_eq!(response.headers()["Allow"], "GET, HEAD, OPTIONS");
    }

    #[test]
    fn test_options_is_empty() {
        let response = build_options_response("GET, HEAD, OPTIONS");
        assert_eq!(response.status(), 200);
        assert_eq!(response.headers()["Content-Length"], "0");
    }

    #[test]
    fn test_416_content_range() {
        let response = build_416_response(500, false);
        assert_eq!(response.status(), 416);
        assert_eq!(response.headers()["Content-Range"], "bytes */500");
    }
}
