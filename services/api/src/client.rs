//! HTTP client for the club-management backend
//!
//! Wraps `reqwest` with the base URL, bearer credentials, JSON parsing, the
//! typed `ApiError` mapping and the lookup cache. It never retries; callers
//! that want retries wrap calls in a `RetryPolicy`.

use common::{ApiConfig, ApiError, ApiResult, CacheConfig, TtlCache};
use reqwest::{Client, Method, RequestBuilder, Response, StatusCode};
use serde::{Serialize, de::DeserializeOwned};
use serde_json::Value;
use sha2::{Digest, Sha256};
use tracing::{debug, info, warn};

use crate::resources::paths;

/// Reference-data resources whose GET responses may be cached
pub const CACHEABLE_PREFIXES: [&str; 6] = [
    paths::CATEGORIES,
    paths::DEFENSIVE_POSITIONS,
    paths::OFFENSIVE_POSITIONS,
    paths::SCHOOLING_LEVELS,
    paths::SEASONS,
    paths::TEAMS,
];

/// Whether a GET with these query parameters may be served from the cache.
///
/// Parameterised requests are never cached: a filtered result must not be
/// served for the unfiltered key.
pub fn is_cacheable(path: &str, params: &[(&str, &str)]) -> bool {
    params.is_empty() && cacheable_prefix(path).is_some()
}

fn cacheable_prefix(path: &str) -> Option<&'static str> {
    if path.contains('?') {
        return None;
    }

    let path = path.trim_end_matches('/');
    CACHEABLE_PREFIXES.iter().copied().find(|prefix| {
        path == *prefix
            || path
                .strip_prefix(prefix)
                .is_some_and(|rest| rest.starts_with('/'))
    })
}

/// Backend API client. Clones share the connection pool and the cache.
///
/// Cache entries are keyed by path and by the credentials that fetched them,
/// so a list the backend scopes to one user is never served to another.
#[derive(Clone)]
pub struct ApiClient {
    http: Client,
    base_url: String,
    token: Option<String>,
    cache_scope: Option<String>,
    cache: TtlCache<Value>,
}

impl ApiClient {
    /// Create a client for the configured backend
    pub fn new(config: &ApiConfig, cache_config: CacheConfig) -> ApiResult<Self> {
        let http = Client::builder()
            .timeout(config.timeout)
            .build()
            .map_err(|e| ApiError::Configuration(format!("Failed to build HTTP client: {}", e)))?;

        info!(
            "API client initialized with base URL: {} (timeout {:?})",
            config.base_url, config.timeout
        );

        Ok(Self {
            http,
            base_url: config.base_url.clone(),
            token: None,
            cache_scope: None,
            cache: TtlCache::new(cache_config),
        })
    }

    /// Same client, authenticated with `token`
    pub fn with_token(&self, token: impl Into<String>) -> Self {
        let token = token.into();
        Self {
            cache_scope: Some(token_fingerprint(&token)),
            token: Some(token),
            ..self.clone()
        }
    }

    pub fn base_url(&self) -> &str {
        &self.base_url
    }

    pub fn cache(&self) -> &TtlCache<Value> {
        &self.cache
    }

    /// Drop cached lookups (all of them, or those under `pattern`)
    pub async fn clear_cache(&self, pattern: Option<&str>) -> usize {
        self.cache.invalidate(pattern).await
    }

    pub async fn get(&self, path: &str, params: &[(&str, &str)]) -> ApiResult<Value> {
        self.request(Method::GET, path, None, params).await
    }

    pub async fn post<B: Serialize + ?Sized>(&self, path: &str, body: &B) -> ApiResult<Value> {
        let body = to_body(body)?;
        self.request(Method::POST, path, Some(&body), &[]).await
    }

    pub async fn patch<B: Serialize + ?Sized>(&self, path: &str, body: &B) -> ApiResult<Value> {
        let body = to_body(body)?;
        self.request(Method::PATCH, path, Some(&body), &[]).await
    }

    pub async fn delete(&self, path: &str) -> ApiResult<Value> {
        self.request(Method::DELETE, path, None, &[]).await
    }

    pub async fn get_json<T: DeserializeOwned>(
        &self,
        path: &str,
        params: &[(&str, &str)],
    ) -> ApiResult<T> {
        decode(self.get(path, params).await?)
    }

    pub async fn post_json<T, B>(&self, path: &str, body: &B) -> ApiResult<T>
    where
        T: DeserializeOwned,
        B: Serialize + ?Sized,
    {
        decode(self.post(path, body).await?)
    }

    pub async fn patch_json<T, B>(&self, path: &str, body: &B) -> ApiResult<T>
    where
        T: DeserializeOwned,
        B: Serialize + ?Sized,
    {
        decode(self.patch(path, body).await?)
    }

    /// POST an `application/x-www-form-urlencoded` body (used by the login
    /// endpoint). Never cached.
    pub async fn post_form(&self, path: &str, fields: &[(&str, &str)]) -> ApiResult<Value> {
        let path = normalize_path(path)?;
        let request = self.http.post(self.url(&path)).form(fields);
        self.send(request, &Method::POST, &path).await
    }

    /// Issue a request and parse the JSON answer.
    ///
    /// Cacheable GETs are answered from the cache when a live entry exists and
    /// stored after a successful fetch. A successful mutation under a
    /// cacheable prefix drops that prefix from the cache.
    pub async fn request(
        &self,
        method: Method,
        path: &str,
        body: Option<&Value>,
        params: &[(&str, &str)],
    ) -> ApiResult<Value> {
        let path = normalize_path(path)?;
        let cacheable = method == Method::GET && is_cacheable(&path, params);

        let cache_key = self.cache_key(&path);

        if cacheable {
            if let Some(value) = self.cache.get(&cache_key).await {
                debug!("Cache hit: {}", path);
                return Ok(value);
            }
            debug!("Cache miss: {}", path);
        }

        let mut request = self.http.request(method.clone(), self.url(&path));
        if !params.is_empty() {
            request = request.query(params);
        }
        if let Some(body) = body {
            request = request.json(body);
        }

        let value = self.send(request, &method, &path).await?;

        if cacheable {
            self.cache.set(&cache_key, value.clone(), None).await;
        } else if method != Method::GET {
            if let Some(prefix) = cacheable_prefix(&path) {
                self.cache.invalidate(Some(prefix)).await;
            }
        }

        Ok(value)
    }

    async fn send(&self, request: RequestBuilder, method: &Method, path: &str) -> ApiResult<Value> {
        let request = match &self.token {
            Some(token) => request.bearer_auth(token),
            None => request,
        };

        debug!("{} {}", method, path);
        let response = request.send().await.map_err(|e| {
            let err = transport_error(e);
            warn!("{} {} failed: {}", method, path, err);
            err
        })?;

        read_response(response).await.inspect_err(|err| {
            warn!("{} {} failed: {}", method, path, err);
        })
    }

    fn url(&self, path: &str) -> String {
        format!("{}{}", self.base_url, path)
    }

    /// Path first, so prefix invalidation drops every caller's copy
    fn cache_key(&self, path: &str) -> String {
        match &self.cache_scope {
            Some(scope) => format!("{}#{}", path, scope),
            None => path.to_string(),
        }
    }
}

/// Short SHA-256 digest of a bearer token; the token itself never becomes a key
fn token_fingerprint(token: &str) -> String {
    let digest = Sha256::digest(token.as_bytes());
    hex::encode(&digest[..8])
}

fn normalize_path(path: &str) -> ApiResult<String> {
    let path = path.trim();
    if path.is_empty() {
        return Err(ApiError::InvalidRequest("Empty request path".to_string()));
    }

    if path.starts_with('/') {
        Ok(path.to_string())
    } else {
        Ok(format!("/{}", path))
    }
}

fn to_body<B: Serialize + ?Sized>(body: &B) -> ApiResult<Value> {
    serde_json::to_value(body).map_err(|e| ApiError::InvalidRequest(e.to_string()))
}

fn decode<T: DeserializeOwned>(value: Value) -> ApiResult<T> {
    serde_json::from_value(value).map_err(|e| ApiError::Decode(e.to_string()))
}

fn transport_error(err: reqwest::Error) -> ApiError {
    if err.is_timeout() {
        ApiError::Timeout
    } else if err.is_builder() {
        ApiError::Configuration(err.to_string())
    } else {
        ApiError::Network(err.to_string())
    }
}

async fn read_response(response: Response) -> ApiResult<Value> {
    let status = response.status();
    let body = response.text().await.map_err(transport_error)?;

    if !status.is_success() {
        return Err(ApiError::from_response(status.as_u16(), &body));
    }

    if status == StatusCode::NO_CONTENT || body.trim().is_empty() {
        return Ok(Value::Null);
    }

    serde_json::from_str(&body).map_err(|e| ApiError::Decode(e.to_string()))
}
