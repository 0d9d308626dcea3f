use crate::domain::error::IterableError;
use hyper::http::Uri;
use serde::Serialize;
use std::fmt;
use std::str::FromStr;

/// Represents a validated absolute URL
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Url(pub Uri);

impl Url {
    /// Creates a new Url with validation
    ///
    /// # Arguments
    /// * `url` - The URL string to parse
    ///
    /// # Returns
    /// * `Ok(Url)` - Validated URL with an http(s) scheme and a host
    /// * `Err(IterableError::InvalidUrl)` - If the URL is invalid
    pub fn new(url: &str) -> Result<Self, IterableError> {
        let uri = url
            .parse::<Uri>()
            .map_err(|e| IterableError::InvalidUrl(format!("{url}: {e}")))?;
        match uri.scheme_str() {
            Some("http") | Some("https") => {}
            _ => {
                return Err(IterableError::InvalidUrl(format!(
                    "{url}: URL must start with http:// or https://"
                )));
            }
        }
        if uri.host().is_none() {
            return Err(IterableError::InvalidUrl(format!("{url}: missing host")));
        }
        Ok(Url(uri))
    }

    /// Returns the URL as a string
    pub fn as_str(&self) -> String {
        self.0.to_string()
    }
}

/// Root every API path is resolved against. Always ends in `/`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct BaseUrl(String);

impl BaseUrl {
    pub fn new(raw: &str) -> Result<Self, IterableError> {
        let trimmed = raw.trim();
        let normalized = if trimmed.ends_with('/') {
            trimmed.to_string()
        } else {
            format!("{trimmed}/")
        };
        Url::new(&normalized)?;
        Ok(BaseUrl(normalized))
    }

    /// Resolves a relative API path (optionally carrying a query string).
    pub fn join(&self, path: &str) -> Result<Url, IterableError> {
        Url::new(&format!("{}{}", self.0, path.trim_start_matches('/')))
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

/// Iterable API key. Kept out of `Debug` output so it never reaches a log line.
#[derive(Clone, PartialEq, Eq)]
pub struct ApiKey(String);

impl ApiKey {
    pub fn new(key: &str) -> Result<Self, IterableError> {
        let key = key.trim();
        if key.is_empty() {
            return Err(IterableError::usage("API key must not be empty"));
        }
        Ok(ApiKey(key.to_string()))
    }

    pub fn expose(&self) -> &str {
        &self.0
    }
}

impl fmt::Debug for ApiKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str("ApiKey(***)")
    }
}

/// Represents a serialized JSON request body
#[derive(Debug, Clone)]
pub struct JsonBody(pub String);

impl JsonBody {
    /// Serializes a request record into a body
    pub fn from_serialize<T: Serialize>(value: &T) -> Result<Self, IterableError> {
        serde_json::to_string(value)
            .map(JsonBody)
            .map_err(|source| IterableError::Decode {
                payload: "request body",
                source,
            })
    }
}

/// A `key=value` pair given on the command line.
///
/// Only the first `=` splits, so values may themselves contain `=`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DataField {
    pub key: String,
    pub value: String,
}

impl FromStr for DataField {
    type Err = IterableError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.split_once('=') {
            Some((key, value)) if !key.is_empty() => Ok(DataField {
                key: key.to_string(),
                value: value.to_string(),
            }),
            _ => Err(IterableError::usage(format!(
                "invalid data field format: {s}, expected format is key=value"
            ))),
        }
    }
}

/// How a user profile is addressed.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum UserIdentifier {
    Email(String),
    UserId(String),
}

impl UserIdentifier {
    /// Picks exactly one identifier out of an email/user ID flag pair.
    ///
    /// `side` names the pair in the usage error, e.g. `"source"`.
    pub fn from_flags(
        email: Option<&str>,
        user_id: Option<&str>,
        side: &str,
    ) -> Result<Self, IterableError> {
        let email = email.filter(|value| !value.is_empty());
        let user_id = user_id.filter(|value| !value.is_empty());
        match (email, user_id) {
            (Some(email), None) => Ok(UserIdentifier::Email(email.to_string())),
            (None, Some(user_id)) => Ok(UserIdentifier::UserId(user_id.to_string())),
            (Some(_), Some(_)) => Err(IterableError::usage(format!(
                "only one {side} identifier may be given: an email or a user ID, not both"
            ))),
            (None, None) => Err(IterableError::usage(format!(
                "a {side} identifier is required: an email or a user ID"
            ))),
        }
    }

    /// Human label used in command output.
    pub fn kind(&self) -> &'static str {
        match self {
            UserIdentifier::Email(_) => "email",
            UserIdentifier::UserId(_) => "userID",
        }
    }

    pub fn value(&self) -> &str {
        match self {
            UserIdentifier::Email(value) | UserIdentifier::UserId(value) => value,
        }
    }
}
