//! Tests for HTTP request/response types.

use super::{HttpRequest, HttpResponse};
use http::header::CONTENT_TYPE;

fn test_url() -> url::Url {
    url::Url::parse("https://example.com/hook").unwrap()
}

mod http_request {
    use super::*;

    #[test]
    fn get_has_no_body() {
        let request = HttpRequest::get(test_url());

        assert_eq!(request.method, http::Method::GET);
        assert!(request.body.is_none());
        assert!(request.headers.is_empty());
    }

    #[test]
    fn with_json_sets_body_and_content_type() {
        let request = HttpRequest::post(test_url())
            .with_json(&serde_json::json!({"title": "hello"}))
            .unwrap();

        assert_eq!(
            request.headers.get(CONTENT_TYPE).unwrap(),
            "application/json"
        );
        assert_eq!(request.body_text(), Some(r#"{"title":"hello"}"#));
    }

    #[test]
    fn with_form_encodes_pairs_in_order() {
        let request = HttpRequest::post(test_url()).with_form([
            ("chat_id", "-100123"),
            ("text", "a b&c"),
            ("parse_mode", "Markdown"),
        ]);

        assert_eq!(
            request.headers.get(CONTENT_TYPE).unwrap(),
            "application/x-www-form-urlencoded"
        );
        assert_eq!(
            request.body_text(),
            Some("chat_id=-100123&text=a+b%26c&parse_mode=Markdown")
        );
    }

    #[test]
    fn with_header_appends_values() {
        let request = HttpRequest::get(test_url())
            .with_header(
                http::header::ACCEPT,
                http::HeaderValue::from_static("text/plain"),
            )
            .with_header(
                http::header::ACCEPT,
                http::HeaderValue::from_static("application/json"),
            );

        assert_eq!(request.headers.get_all(http::header::ACCEPT).iter().count(), 2);
    }
}

mod http_response {
    use super::*;

    #[test]
    fn is_success_for_2xx() {
        let ok = HttpResponse::new(http::StatusCode::NO_CONTENT, http::HeaderMap::new(), vec![]);
        let err = HttpResponse::new(
            http::StatusCode::BAD_GATEWAY,
            http::HeaderMap::new(),
            vec![],
        );

        assert!(ok.is_success());
        assert!(!err.is_success());
    }

    #[test]
    fn body_text_rejects_invalid_utf8() {
        let response = HttpResponse::new(
            http::StatusCode::OK,
            http::HeaderMap::new(),
            vec![0xff, 0xfe],
        );

        assert!(response.body_text().is_none());
    }
}
