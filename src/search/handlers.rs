use super::engine::QueryResolver;
use super::types::assemble;
use axum::Extension;
use axum::extract::{Form, Query};
use axum::http::{StatusCode, header};
use axum::response::{IntoResponse, Response};
use serde::Serialize;
use std::sync::Arc;

/// Path of the search endpoint.
pub const ENDPOINT_SEARCH: &str = "/imgrep/search";

/// Name of the form/query parameter carrying the space-separated keywords.
pub const KEYWORD_PARAM: &str = "keyword";

type Pairs = Vec<(String, String)>;

/// `GET|POST /imgrep/search`.
///
/// The keyword is the first `keyword` value from the urlencoded body, then from
/// the query string. Repeated keys, a missing or non-form body and unparsable
/// input all degrade to the empty query rather than a rejection.
pub async fn handle_search(
    Extension(resolver): Extension<Arc<QueryResolver>>,
    query: Option<Query<Pairs>>,
    body: Option<Form<Pairs>>,
) -> Response {
    let keyword = first_keyword(
        body.as_ref().map(|Form(pairs)| pairs.as_slice()).unwrap_or_default(),
        query.as_ref().map(|Query(pairs)| pairs.as_slice()).unwrap_or_default(),
    );
    tracing::debug!("Search request: keyword='{}'", keyword);

    match resolver.resolve(keyword).await {
        Ok(results) => encode_response(&assemble(results)),
        Err(e) => {
            tracing::error!("Search failed for '{}': {:#}", keyword, e);
            (StatusCode::INTERNAL_SERVER_ERROR, format!("{:#}", e)).into_response()
        }
    }
}

/// First `keyword` value, body pairs taking precedence over query pairs.
pub fn first_keyword<'a>(
    body: &'a [(String, String)],
    query: &'a [(String, String)],
) -> &'a str {
    body.iter()
        .chain(query.iter())
        .find(|(key, _)| key == KEYWORD_PARAM)
        .map(|(_, value)| value.as_str())
        .unwrap_or("")
}

pub fn encode_response<T: Serialize>(response: &T) -> Response {
    match serde_json::to_vec(response) {
        Ok(body) => (
            StatusCode::OK,
            [(header::CONTENT_TYPE, "application/json")],
            body,
        )
            .into_response(),
        Err(e) => {
            tracing::error!("Failed to encode search response: {}", e);
            (StatusCode::INTERNAL_SERVER_ERROR, e.to_string()).into_response()
        }
    }
}
