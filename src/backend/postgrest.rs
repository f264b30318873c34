//! Hosted backend over its PostgREST endpoint.
//!
//! Each [`ListQuery`] becomes one `GET {url}/rest/v1/{table}` with the
//! filters, order and limit encoded as query parameters. The translation is
//! a pure function ([`postgrest_params`]) so it can be checked without a
//! server.

use super::store::{Backend, Direction, FetchError, Filter, ListQuery};
use async_trait::async_trait;
use reqwest::header::{ACCEPT, AUTHORIZATION, HeaderMap, HeaderValue};
use serde_json::Value;
use std::time::Duration;
use tracing::{debug, instrument};

pub struct PostgrestBackend {
    base_url: String,
    client: reqwest::Client,
}

impl PostgrestBackend {
    /// Build a client that sends the anon key on every request.
    pub fn new(base_url: &str, anon_key: &str, timeout: Duration) -> Result<Self, FetchError> {
        let mut headers = HeaderMap::new();
        let key = HeaderValue::from_str(anon_key)
            .map_err(|e| FetchError::Transport(format!("invalid anon key: {e}")))?;
        let bearer = HeaderValue::from_str(&format!("Bearer {anon_key}"))
            .map_err(|e| FetchError::Transport(format!("invalid anon key: {e}")))?;
        headers.insert("apikey", key);
        headers.insert(AUTHORIZATION, bearer);
        headers.insert(ACCEPT, HeaderValue::from_static("application/json"));

        let client = reqwest::Client::builder()
            .timeout(timeout)
            .default_headers(headers)
            .build()
            .map_err(|e| FetchError::Transport(e.to_string()))?;

        Ok(Self {
            base_url: base_url.trim_end_matches('/').to_string(),
            client,
        })
    }

    fn table_url(&self, query: &ListQuery) -> String {
        format!("{}/rest/v1/{}", self.base_url, query.collection.table())
    }
}

#[async_trait]
impl Backend for PostgrestBackend {
    fn name(&self) -> &'static str {
        "postgrest"
    }

    #[instrument(name = "postgrest_query", skip(self), fields(collection = %query.collection))]
    async fn query(&self, query: &ListQuery) -> Result<Vec<Value>, FetchError> {
        let params = postgrest_params(query);
        let response = self
            .client
            .get(self.table_url(query))
            .query(&params)
            .send()
            .await
            .map_err(|e| FetchError::Transport(e.to_string()))?;

        let status = response.status();
        if !status.is_success() {
            let body = response.text().await.unwrap_or_default();
            return Err(FetchError::Status {
                code: status.as_u16(),
                body,
            });
        }

        let rows: Vec<Value> = response
            .json()
            .await
            .map_err(|e| FetchError::Decode(e.to_string()))?;
        debug!(rows = rows.len(), "postgrest query");
        Ok(rows)
    }
}

/// Encode a query as PostgREST parameters, in a stable order:
/// `select`, one entry per filter, `order`, `limit`.
pub fn postgrest_params(query: &ListQuery) -> Vec<(String, String)> {
    let mut params = vec![("select".to_string(), "*".to_string())];

    for filter in &query.filters {
        let (column, expr) = match filter {
            Filter::Eq { column, value } => (column, format!("eq.{}", scalar(value))),
            Filter::In { column, values } => {
                let items: Vec<String> = values.iter().map(|v| quote(&scalar(v))).collect();
                (column, format!("in.({})", items.join(",")))
            }
            Filter::Gte { column, value } => (column, format!("gte.{}", scalar(value))),
            Filter::Lte { column, value } => (column, format!("lte.{}", scalar(value))),
            Filter::ILike { column, needle } => (column, format!("ilike.*{}*", like_literal(needle))),
            Filter::Contains { column, values } => {
                let items: Vec<String> = values.iter().map(|v| quote(v)).collect();
                (column, format!("cs.{{{}}}", items.join(",")))
            }
            Filter::TextSearch { column, query } => (column, format!("wfts.{query}")),
        };
        params.push((column.clone(), expr));
    }

    if let Some(order) = &query.order {
        let direction = match order.direction {
            Direction::Ascending => "asc",
            Direction::Descending => "desc",
        };
        params.push(("order".to_string(), format!("{}.{direction}", order.column)));
    }

    params.push(("limit".to_string(), query.row_limit().to_string()));
    params
}

fn scalar(value: &Value) -> String {
    match value {
        Value::String(s) => s.clone(),
        Value::Null => "null".to_string(),
        other => other.to_string(),
    }
}

/// Escape LIKE metacharacters so the needle matches as plain text.
///
/// PostgREST rewrites every `*` to `%` before escapes apply, so a literal
/// asterisk cannot be expressed; it degrades to the single-character `_`.
fn like_literal(needle: &str) -> String {
    let mut out = String::with_capacity(needle.len());
    for c in needle.chars() {
        match c {
            '\\' | '%' | '_' => {
                out.push('\\');
                out.push(c);
            }
            '*' => out.push('_'),
            c => out.push(c),
        }
    }
    out
}

/// Double-quote list items that contain PostgREST reserved characters.
fn quote(item: &str) -> String {
    if item.contains([',', '(', ')', '{', '}', '"', ':', ' ', '.']) {
        format!("\"{}\"", item.replace('\\', "\\\\").replace('"', "\\\""))
    } else {
        item.to_string()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::backend::store::Collection;

    fn pairs(params: &[(String, String)]) -> Vec<(&str, &str)> {
        params
            .iter()
            .map(|(k, v)| (k.as_str(), v.as_str()))
            .collect()
    }

    #[test]
    fn latest_jobs_translation() {
        let query = ListQuery::new(Collection::Jobs)
            .filter(Filter::eq("is_active", true))
            .order_by("posted_at", Direction::Descending)
            .limit(6);
        assert_eq!(
            pairs(&postgrest_params(&query)),
            [
                ("select", "*"),
                ("is_active", "eq.true"),
                ("order", "posted_at.desc"),
                ("limit", "6"),
            ]
        );
    }

    #[test]
    fn membership_and_range_filters() {
        let query = ListQuery::new(Collection::Webinars)
            .filter(Filter::one_of("status", ["upcoming", "live"]))
            .filter(Filter::gte("duration_minutes", 30))
            .order_by("webinar_date", Direction::Ascending)
            .limit(3);
        assert_eq!(
            pairs(&postgrest_params(&query)),
            [
                ("select", "*"),
                ("status", "in.(upcoming,live)"),
                ("duration_minutes", "gte.30"),
                ("order", "webinar_date.asc"),
                ("limit", "3"),
            ]
        );
    }

    #[test]
    fn array_text_and_pattern_filters() {
        let query = ListQuery::new(Collection::Jobs)
            .filter(Filter::contains("tech_stack", &["rust".to_string(), "node.js".to_string()]))
            .filter(Filter::ilike("location", "berlin"))
            .filter(Filter::text_search("search_vector", "senior rust"));
        let params = postgrest_params(&query);
        assert_eq!(
            pairs(&params[1..4]),
            [
                ("tech_stack", "cs.{rust,\"node.js\"}"),
                ("location", "ilike.*berlin*"),
                ("search_vector", "wfts.senior rust"),
            ]
        );
        assert_eq!(params.last().unwrap().1, "50");
    }

    #[test]
    fn ilike_needle_wildcards_are_escaped() {
        let query = ListQuery::new(Collection::Jobs)
            .filter(Filter::ilike("title", "100%_c\\*"));
        let params = postgrest_params(&query);
        assert_eq!(params[1], ("title".to_string(), r"ilike.*100\%\_c\\_*".to_string()));
        assert_eq!(like_literal("rust dev"), "rust dev");
    }

    #[test]
    fn list_items_with_reserved_characters_are_quoted() {
        assert_eq!(quote("plain"), "plain");
        assert_eq!(quote("a,b"), "\"a,b\"");
        assert_eq!(quote("say \"hi\""), "\"say \\\"hi\\\"\"");
    }

    #[test]
    fn base_url_trailing_slash_is_dropped() {
        let backend =
            PostgrestBackend::new("https://db.example.com/", "anon", Duration::from_secs(5))
                .unwrap();
        assert_eq!(
            backend.table_url(&ListQuery::new(Collection::BlogPosts)),
            "https://db.example.com/rest/v1/blog_posts"
        );
    }

    #[test]
    fn header_unsafe_key_is_rejected() {
        let result = PostgrestBackend::new("https://db", "bad\nkey", Duration::from_secs(5));
        assert!(matches!(result, Err(FetchError::Transport(_))));
    }
}
