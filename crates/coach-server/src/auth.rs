//! Caller authentication for callable invocations.
//!
//! Callers present an identity platform ID token as `Authorization: Bearer <token>`.
//! Tokens are RS256 JWTs signed with keys published as a JWK set; the keys are cached
//! for as long as the key endpoint's `Cache-Control: max-age` allows.
//!
//! A caller whose token is missing or fails verification simply has no identity; the
//! coach decides what that means.
use async_trait::async_trait;
use axum::http::{header, HeaderMap};
use chrono::{DateTime, Duration, Utc};
use coach::models::caller::CallerIdentity;
use jsonwebtoken::jwk::JwkSet;
use jsonwebtoken::{decode, decode_header, Algorithm, DecodingKey, Validation};
use reqwest::Client;
use serde::Deserialize;
use thiserror::Error;
use tokio::sync::RwLock;
use tracing::{debug, info, warn};

pub const DEFAULT_JWKS_URL: &str =
    "https://www.googleapis.com/service_accounts/v1/jwk/securetoken@system.gserviceaccount.com";

const ISSUER_PREFIX: &str = "https://securetoken.google.com/";
const MIN_CACHE_TTL_SECS: i64 = 300;
const DEFAULT_CACHE_TTL_SECS: i64 = 3600;
const MAX_CACHE_TTL_SECS: i64 = 86_400;

#[derive(Error, Debug)]
pub enum AuthError {
    #[error("Missing bearer token")]
    MissingToken,

    #[error("ID token verification is not configured")]
    Disabled,

    #[error("Invalid token: {0}")]
    InvalidToken(String),

    #[error("Unknown signing key: {0}")]
    UnknownKey(String),

    #[error("Failed to fetch signing keys: {0}")]
    KeyFetch(String),
}

#[async_trait]
pub trait IdTokenVerifier: Send + Sync {
    async fn verify(&self, token: &str) -> Result<CallerIdentity, AuthError>;
}

/// Rejects every token. Used when no project is configured.
pub struct DisabledVerifier;

#[async_trait]
impl IdTokenVerifier for DisabledVerifier {
    async fn verify(&self, _token: &str) -> Result<CallerIdentity, AuthError> {
        Err(AuthError::Disabled)
    }
}

#[derive(Debug, Deserialize)]
struct IdTokenClaims {
    sub: String,
}

struct CachedKeys {
    keys: JwkSet,
    expires_at: DateTime<Utc>,
}

pub struct FirebaseVerifier {
    project_id: String,
    jwks_url: String,
    client: Client,
    cache: RwLock<Option<CachedKeys>>,
}

impl FirebaseVerifier {
    pub fn new<P: Into<String>, U: Into<String>>(project_id: P, jwks_url: U) -> Self {
        Self {
            project_id: project_id.into(),
            jwks_url: jwks_url.into(),
            client: Client::new(),
            cache: RwLock::new(None),
        }
    }

    async fn decoding_key(&self, kid: &str) -> Result<DecodingKey, AuthError> {
        if let Some(key) = self.cached_key(kid).await? {
            return Ok(key);
        }

        self.refresh_keys().await?;

        self.cached_key(kid)
            .await?
            .ok_or_else(|| AuthError::UnknownKey(kid.to_string()))
    }

    async fn cached_key(&self, kid: &str) -> Result<Option<DecodingKey>, AuthError> {
        let cache = self.cache.read().await;
        let Some(cached) = cache.as_ref().filter(|c| c.expires_at > Utc::now()) else {
            return Ok(None);
        };

        cached
            .keys
            .find(kid)
            .map(|jwk| {
                DecodingKey::from_jwk(jwk).map_err(|e| AuthError::InvalidToken(e.to_string()))
            })
            .transpose()
    }

    async fn refresh_keys(&self) -> Result<(), AuthError> {
        info!(url = %self.jwks_url, "Fetching ID token signing keys");

        let response = self
            .client
            .get(&self.jwks_url)
            .send()
            .await
            .and_then(|r| r.error_for_status())
            .map_err(|e| AuthError::KeyFetch(e.to_string()))?;

        let ttl = cache_ttl_secs(
            response
                .headers()
                .get("cache-control")
                .and_then(|v| v.to_str().ok()),
        );

        let keys: JwkSet = response
            .json()
            .await
            .map_err(|e| AuthError::KeyFetch(e.to_string()))?;

        debug!(keys = keys.keys.len(), ttl_secs = ttl, "Cached ID token signing keys");

        let mut cache = self.cache.write().await;
        *cache = Some(CachedKeys {
            keys,
            expires_at: Utc::now() + Duration::seconds(ttl),
        });
        Ok(())
    }
}

#[async_trait]
impl IdTokenVerifier for FirebaseVerifier {
    async fn verify(&self, token: &str) -> Result<CallerIdentity, AuthError> {
        let header = decode_header(token).map_err(|e| AuthError::InvalidToken(e.to_string()))?;
        let kid = header
            .kid
            .ok_or_else(|| AuthError::InvalidToken("missing key id".to_string()))?;

        let key = self.decoding_key(&kid).await?;

        let mut validation = Validation::new(Algorithm::RS256);
        validation.set_audience(&[&self.project_id]);
        validation.set_issuer(&[format!("{}{}", ISSUER_PREFIX, self.project_id)]);

        let data = decode::<IdTokenClaims>(token, &key, &validation)
            .map_err(|e| AuthError::InvalidToken(e.to_string()))?;

        if data.claims.sub.is_empty() {
            return Err(AuthError::InvalidToken("empty subject".to_string()));
        }

        Ok(CallerIdentity::new(data.claims.sub))
    }
}

/// Resolve the caller of a request, if any
pub async fn caller_from_headers(
    verifier: &dyn IdTokenVerifier,
    headers: &HeaderMap,
) -> Option<CallerIdentity> {
    let result = match bearer_token(headers) {
        Some(token) => verifier.verify(token).await,
        None => Err(AuthError::MissingToken),
    };

    match result {
        Ok(caller) => Some(caller),
        Err(AuthError::MissingToken) => None,
        Err(AuthError::KeyFetch(e)) => {
            warn!(error = %e, "Could not verify ID token");
            None
        }
        Err(e) => {
            debug!(error = %e, "Rejected ID token");
            None
        }
    }
}

fn bearer_token(headers: &HeaderMap) -> Option<&str> {
    let value = headers.get(header::AUTHORIZATION)?.to_str().ok()?;
    let (scheme, token) = value.split_once(' ')?;
    if !scheme.eq_ignore_ascii_case("bearer") {
        return None;
    }
    let token = token.trim();
    (!token.is_empty()).then_some(token)
}

/// How long fetched keys stay cached, bounded on both sides
fn cache_ttl_secs(cache_control: Option<&str>) -> i64 {
    cache_control
        .and_then(parse_max_age)
        .unwrap_or(DEFAULT_CACHE_TTL_SECS)
        .clamp(MIN_CACHE_TTL_SECS, MAX_CACHE_TTL_SECS)
}

/// Parse the max-age value from a Cache-Control header
fn parse_max_age(cache_control: &str) -> Option<i64> {
    cache_control
        .split(',')
        .map(str::trim)
        .find_map(|directive| directive.strip_prefix("max-age="))
        .and_then(|age| age.parse().ok())
}
