use std::sync::Arc;
use std::time::{Duration, Instant};

use async_trait::async_trait;
use jsonwebtoken::jwk::{Jwk, JwkSet};
use jsonwebtoken::{Algorithm, DecodingKey, Validation, decode, decode_header};
use serde::Deserialize;
use tokio::sync::RwLock;
use tracing::debug;

use super::{IdentityError, IdentityProvider, VerifiedIdentity};

#[derive(Debug, Clone)]
pub struct GoogleIdentityConfig {
    /// Expected `aud` claim.
    pub client_id: String,
    /// Accepted `iss` claims.
    pub issuers: Vec<String>,
    pub jwks_url: String,
    pub jwks_refresh: Duration,
    pub jwks_timeout: Duration,
}

/// Verifies RS256 ID tokens against the provider's published JWKS.
///
/// Keys are fetched lazily on first use and refreshed when an unknown `kid`
/// shows up after the refresh interval has elapsed.
#[derive(Clone)]
pub struct GoogleIdentityProvider {
    config: GoogleIdentityConfig,
    http: reqwest::Client,
    jwks: Arc<RwLock<JwksCache>>,
}

#[derive(Debug, Default)]
struct JwksCache {
    jwks: Option<JwkSet>,
    fetched_at: Option<Instant>,
    /// Pinned keys never refresh.
    pinned: bool,
}

#[derive(Debug, Deserialize)]
struct IdTokenClaims {
    sub: String,
    #[serde(default)]
    email: Option<String>,
    #[serde(default)]
    name: Option<String>,
    #[serde(default)]
    picture: Option<String>,
}

impl GoogleIdentityProvider {
    pub fn new(config: GoogleIdentityConfig) -> Result<Self, IdentityError> {
        Self::build(config, JwksCache::default())
    }

    /// Use a fixed key set instead of fetching `jwks_url`.
    pub fn with_jwks(config: GoogleIdentityConfig, jwks: JwkSet) -> Result<Self, IdentityError> {
        Self::build(
            config,
            JwksCache {
                jwks: Some(jwks),
                fetched_at: Some(Instant::now()),
                pinned: true,
            },
        )
    }

    fn build(config: GoogleIdentityConfig, cache: JwksCache) -> Result<Self, IdentityError> {
        let http = reqwest::Client::builder()
            .timeout(config.jwks_timeout)
            .build()
            .map_err(|e| IdentityError::Unavailable(format!("http client: {e}")))?;

        Ok(Self {
            config,
            http,
            jwks: Arc::new(RwLock::new(cache)),
        })
    }

    async fn decoding_key_for_kid(&self, kid: &str) -> Result<DecodingKey, IdentityError> {
        {
            let cache = self.jwks.read().await;
            if let Some(jwk) = cache.jwk_for_kid(kid) {
                return decoding_key(jwk);
            }
        }

        let mut cache = self.jwks.write().await;
        let refresh_needed = !cache.pinned
            && cache
                .fetched_at
                .map(|t| t.elapsed() > self.config.jwks_refresh)
                .unwrap_or(true);
        if refresh_needed {
            cache.refresh(&self.http, &self.config.jwks_url).await?;
        }

        cache
            .jwk_for_kid(kid)
            .map(decoding_key)
            .unwrap_or_else(|| Err(IdentityError::Invalid("unknown signing key".into())))
    }
}

#[async_trait]
impl IdentityProvider for GoogleIdentityProvider {
    async fn verify_credential(&self, id_token: &str) -> Result<VerifiedIdentity, IdentityError> {
        let header = decode_header(id_token)
            .map_err(|_| IdentityError::Invalid("malformed token header".into()))?;
        if header.alg != Algorithm::RS256 {
            return Err(IdentityError::Invalid("unsupported alg".into()));
        }
        let kid = header
            .kid
            .ok_or_else(|| IdentityError::Invalid("token header missing kid".into()))?;

        let key = self.decoding_key_for_kid(&kid).await?;

        let mut validation = Validation::new(Algorithm::RS256);
        validation.set_issuer(self.config.issuers.as_slice());
        validation.set_audience(std::slice::from_ref(&self.config.client_id));

        let claims = decode::<IdTokenClaims>(id_token, &key, &validation)
            .map_err(|e| IdentityError::Invalid(e.to_string()))?
            .claims;

        if claims.sub.trim().is_empty() {
            return Err(IdentityError::Invalid("empty subject".into()));
        }

        Ok(identity_from_claims(claims))
    }
}

fn identity_from_claims(claims: IdTokenClaims) -> VerifiedIdentity {
    let email = claims.email.unwrap_or_default();
    let display_name = claims
        .name
        .filter(|n| !n.trim().is_empty())
        .unwrap_or_else(|| email.clone());

    VerifiedIdentity {
        subject: claims.sub,
        email,
        display_name,
        picture_url: claims.picture,
    }
}

fn decoding_key(jwk: &Jwk) -> Result<DecodingKey, IdentityError> {
    DecodingKey::from_jwk(jwk)
        .map_err(|e| IdentityError::Unavailable(format!("unusable JWK: {e}")))
}

impl JwksCache {
    fn jwk_for_kid(&self, kid: &str) -> Option<&Jwk> {
        self.jwks.as_ref()?.find(kid)
    }

    async fn refresh(&mut self, http: &reqwest::Client, url: &str) -> Result<(), IdentityError> {
        let jwks = http
            .get(url)
            .send()
            .await
            .map_err(|e| IdentityError::Unavailable(format!("failed to fetch JWKS: {e}")))?
            .error_for_status()
            .map_err(|e| IdentityError::Unavailable(format!("JWKS endpoint: {e}")))?
            .json::<JwkSet>()
            .await
            .map_err(|e| IdentityError::Unavailable(format!("failed to parse JWKS: {e}")))?;

        debug!(keys = jwks.keys.len(), "Refreshed JWKS");
        self.jwks = Some(jwks);
        self.fetched_at = Some(Instant::now());
        Ok(())
    }
}
