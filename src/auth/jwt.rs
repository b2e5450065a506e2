use jsonwebtoken::{decode, encode, DecodingKey, EncodingKey, Header, Validation};
use time::{Duration, OffsetDateTime};
use tracing::{debug, warn};

use super::{claims::Claims, errors::AuthError};
use crate::config::JwtConfig;

/// Signs and reads HS256 session tokens.
#[derive(Clone)]
pub struct TokenService {
    encoding: EncodingKey,
    decoding: DecodingKey,
    issuer: String,
    audience: String,
    default_ttl: Duration,
}

impl TokenService {
    pub fn new(config: &JwtConfig) -> Self {
        Self {
            encoding: EncodingKey::from_secret(config.secret.as_bytes()),
            decoding: DecodingKey::from_secret(config.secret.as_bytes()),
            issuer: config.issuer.clone(),
            audience: config.audience.clone(),
            default_ttl: Duration::seconds(config.ttl_minutes.saturating_mul(60)),
        }
    }

    pub fn default_ttl(&self) -> Duration {
        self.default_ttl
    }

    /// Token for `username` expiring at now + `ttl`. A negative ttl yields an
    /// already expired token. A ttl past the representable date range is
    /// rejected.
    pub fn issue(&self, username: &str, ttl: Duration) -> Result<String, AuthError> {
        let now = OffsetDateTime::now_utc();
        let exp = now.checked_add(ttl).ok_or_else(|| {
            warn!(ttl = %ttl, "token ttl out of range");
            AuthError::InvalidToken
        })?;
        let claims = Claims {
            sub: username.to_string(),
            iat: now.unix_timestamp(),
            exp: exp.unix_timestamp(),
            iss: self.issuer.clone(),
            aud: self.audience.clone(),
        };
        let token = encode(&Header::default(), &claims, &self.encoding).map_err(|e| {
            warn!(error = %e, "jwt encode failed");
            AuthError::InvalidToken
        })?;
        debug!(username = %username, exp = claims.exp, "jwt signed");
        Ok(token)
    }

    /// Verifies signature, issuer and audience. Expiry is left to the caller.
    fn decode_claims(&self, token: &str) -> Result<Claims, AuthError> {
        let mut validation = Validation::default();
        validation.validate_exp = false;
        validation.set_audience(std::slice::from_ref(&self.audience));
        validation.set_issuer(std::slice::from_ref(&self.issuer));
        let data = decode::<Claims>(token, &self.decoding, &validation).map_err(|e| {
            debug!(error = %e, "jwt rejected");
            AuthError::InvalidToken
        })?;
        Ok(data.claims)
    }

    pub fn is_expired(&self, token: &str) -> Result<bool, AuthError> {
        let claims = self.decode_claims(token)?;
        Ok(claims.exp <= OffsetDateTime::now_utc().unix_timestamp())
    }

    pub fn extract_username(&self, token: &str) -> Result<String, AuthError> {
        Ok(self.decode_claims(token)?.sub)
    }
}
