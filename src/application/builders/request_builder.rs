use crate::domain::entities::{Method, Request};
use crate::domain::error::IterableError;
use crate::domain::value_objects::{ApiKey, BaseUrl, JsonBody};
use serde::Serialize;

pub const API_KEY_HEADER: &str = "Api-Key";
pub const CONTENT_TYPE_HEADER: &str = "Content-Type";

/// Percent-encodes user input placed in a single path segment.
pub fn path_segment(value: &str) -> String {
    urlencoding::encode(value).into_owned()
}

pub struct RequestBuilder<'a> {
    base_url: &'a BaseUrl,
    method: Method,
    path: Option<String>,
    query: Vec<(String, String)>,
    headers: Vec<(String, String)>,
    body: Option<JsonBody>,
}

impl<'a> RequestBuilder<'a> {
    pub fn new(base_url: &'a BaseUrl) -> Self {
        Self {
            base_url,
            method: Method::Get,
            path: None,
            query: Vec::new(),
            headers: Vec::new(),
            body: None,
        }
    }

    pub fn method(mut self, method: Method) -> Self {
        self.method = method;
        self
    }

    /// Path relative to the base URL, already encoded.
    pub fn path(mut self, path: impl Into<String>) -> Self {
        self.path = Some(path.into());
        self
    }

    pub fn query(mut self, key: &str, value: impl ToString) -> Self {
        self.query.push((key.to_string(), value.to_string()));
        self
    }

    pub fn header(mut self, key: &str, value: &str) -> Self {
        self.headers.push((key.to_string(), value.to_string()));
        self
    }

    pub fn api_key(self, key: &ApiKey) -> Self {
        self.header(API_KEY_HEADER, key.expose())
    }

    pub fn json<T: Serialize>(mut self, body: &T) -> Result<Self, IterableError> {
        self.body = Some(JsonBody::from_serialize(body)?);
        Ok(self.header(CONTENT_TYPE_HEADER, "application/json"))
    }

    pub fn build(self) -> Result<Request, IterableError> {
        let path = self
            .path
            .ok_or_else(|| IterableError::InvalidUrl("request path is required".to_string()))?;
        let target = if self.query.is_empty() {
            path
        } else {
            let query = self
                .query
                .iter()
                .map(|(key, value)| format!("{}={}", urlencoding::encode(key), urlencoding::encode(value)))
                .collect::<Vec<_>>()
                .join("&");
            format!("{path}?{query}")
        };

        Ok(Request {
            method: self.method,
            url: self.base_url.join(&target)?,
            headers: self.headers,
            body: self.body,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn base() -> BaseUrl {
        BaseUrl::new("https://api.iterable.com/api/").unwrap()
    }

    #[test]
    fn builds_authenticated_get() {
        let base = base();
        let key = ApiKey::new("k-123").unwrap();
        let request = RequestBuilder::new(&base)
            .path("campaigns")
            .api_key(&key)
            .build()
            .unwrap();

        assert_eq!(request.method, Method::Get);
        assert_eq!(request.url.as_str(), "https://api.iterable.com/api/campaigns");
        assert_eq!(request.header("api-key"), Some("k-123"));
        assert!(request.body.is_none());
        assert!(request.header(CONTENT_TYPE_HEADER).is_none());
    }

    #[test]
    fn json_body_sets_content_type() {
        let base = base();
        let request = RequestBuilder::new(&base)
            .method(Method::Post)
            .path("users/update")
            .json(&json!({"email": "a@x.com"}))
            .unwrap()
            .build()
            .unwrap();

        assert_eq!(request.header(CONTENT_TYPE_HEADER), Some("application/json"));
        assert_eq!(request.body.unwrap().0, r#"{"email":"a@x.com"}"#);
    }

    #[test]
    fn query_values_are_encoded() {
        let base = base();
        let request = RequestBuilder::new(&base)
            .path("lists/getUsers")
            .query("listId", 12)
            .query("preferUserId", true)
            .build()
            .unwrap();
        assert_eq!(
            request.url.as_str(),
            "https://api.iterable.com/api/lists/getUsers?listId=12&preferUserId=true"
        );
    }

    #[test]
    fn path_segment_escapes_reserved_characters() {
        assert_eq!(path_segment("a+b@x.com"), "a%2Bb%40x.com");
        assert_eq!(path_segment("id/with space"), "id%2Fwith%20space");
    }

    #[test]
    fn missing_path_is_an_error() {
        let base = base();
        assert!(RequestBuilder::new(&base).build().is_err());
    }
}
