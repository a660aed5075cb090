use axum::{
    Json,
    http::{HeaderMap, StatusCode, header},
    response::{Html, IntoResponse, Response},
};

use super::{ErrorCode, ErrorResponse};

const NOT_FOUND_MESSAGE: &str = "The requested resource was not found";

/// Router fallback for unknown paths.
///
/// Answers in the first format the `Accept` header asks for: an HTML page,
/// the JSON error body (default) or plain text.
pub async fn not_found(headers: HeaderMap) -> Response {
    let accept = headers
        .get(header::ACCEPT)
        .and_then(|v| v.to_str().ok())
        .unwrap_or_default();

    match preferred_format(accept) {
        Format::Html => (
            StatusCode::NOT_FOUND,
            Html(format!(
                "<!DOCTYPE html><html><head><title>404</title></head>\
                 <body><h1>404 Not Found</h1><p>{NOT_FOUND_MESSAGE}</p></body></html>"
            )),
        )
            .into_response(),
        Format::Json => (
            StatusCode::NOT_FOUND,
            Json(ErrorResponse::new(ErrorCode::NotFound, NOT_FOUND_MESSAGE)),
        )
            .into_response(),
        Format::Text => (StatusCode::NOT_FOUND, "404 Not Found").into_response(),
    }
}

#[derive(Debug, PartialEq, Eq)]
enum Format {
    Html,
    Json,
    Text,
}

fn preferred_format(accept: &str) -> Format {
    for media in accept.split(',') {
        let media = media.split(';').next().unwrap_or_default().trim();
        match media {
            "text/html" | "application/xhtml+xml" => return Format::Html,
            "application/json" | "*/*" => return Format::Json,
            "text/plain" => return Format::Text,
            _ => {}
        }
    }
    Format::Json
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_preferred_format() {
        assert_eq!(
            preferred_format("text/html,application/xhtml+xml;q=0.9"),
            Format::Html
        );
        assert_eq!(preferred_format("application/json"), Format::Json);
        assert_eq!(preferred_format("text/plain"), Format::Text);
        assert_eq!(preferred_format(""), Format::Json);
        assert_eq!(preferred_format("image/png"), Format::Json);
    }

    #[tokio::test]
    async fn test_not_found_html() {
        let mut headers = HeaderMap::new();
        headers.insert(header::ACCEPT, "text/html".parse().unwrap());
        let response = not_found(headers).await;
        assert_eq!(response.status(), StatusCode::NOT_FOUND);
        let content_type = response.headers()[header::CONTENT_TYPE].to_str().unwrap();
        assert!(content_type.starts_with("text/html"));
    }

    #[tokio::test]
    async fn test_not_found_defaults_to_json() {
        let response = not_found(HeaderMap::new()).await;
        assert_eq!(response.status(), StatusCode::NOT_FOUND);
        assert_eq!(
            response.headers()[header::CONTENT_TYPE],
            "application/json"
        );
    }
}
