use axum::{
    async_trait,
    extract::{FromRef, FromRequestParts},
    http::request::Parts,
};
use jsonwebtoken::{decode, DecodingKey, Validation};
use tracing::{debug, warn};
use uuid::Uuid;

use super::claims::Claims;
use crate::{config::JwtConfig, error::AppError, state::AppState};

#[derive(Clone)]
pub struct JwtKeys {
    pub decoding: DecodingKey,
    pub issuer: String,
    pub audience: String,
    #[cfg(test)]
    pub encoding: jsonwebtoken::EncodingKey,
}

impl FromRef<AppState> for JwtKeys {
    fn from_ref(state: &AppState) -> Self {
        let JwtConfig {
            secret,
            issuer,
            audience,
        } = state.config.jwt.clone();
        Self {
            decoding: DecodingKey::from_secret(secret.as_bytes()),
            issuer,
            audience,
            #[cfg(test)]
            encoding: jsonwebtoken::EncodingKey::from_secret(secret.as_bytes()),
        }
    }
}

impl JwtKeys {
    /// Mints a token the way the identity provider does.
    #[cfg(test)]
    pub fn sign(&self, user_id: Uuid, admin: bool) -> anyhow::Result<String> {
        use jsonwebtoken::{encode, Header};
        use time::{Duration as TimeDuration, OffsetDateTime};

        let now = OffsetDateTime::now_utc();
        let exp = now + TimeDuration::minutes(5);
        let claims = Claims {
            sub: user_id,
            iat: now.unix_timestamp() as usize,
            exp: exp.unix_timestamp() as usize,
            iss: self.issuer.clone(),
            aud: self.audience.clone(),
            admin,
        };
        let token = encode(&Header::default(), &claims, &self.encoding)?;
        debug!(user_id = %user_id, admin, "jwt signed");
        Ok(token)
    }

    pub fn verify(&self, token: &str) -> anyhow::Result<Claims> {
        let mut validation = Validation::default();
        validation.set_audience(std::slice::from_ref(&self.audience));
        validation.set_issuer(std::slice::from_ref(&self.issuer));
        let data = decode::<Claims>(token, &self.decoding, &validation)?;
        debug!(user_id = %data.claims.sub, "jwt verified");
        Ok(data.claims)
    }
}

/// An authenticated caller. Rejects the request when no valid bearer token is present.
#[derive(Debug, Clone, Copy)]
pub struct AuthUser {
    pub id: Uuid,
    pub admin: bool,
}

#[async_trait]
impl<S> FromRequestParts<S> for AuthUser
where
    S: Send + Sync,
    JwtKeys: FromRef<S>,
{
    type Rejection = AppError;

    async fn from_request_parts(parts: &mut Parts, state: &S) -> Result<Self, Self::Rejection> {
        let keys = JwtKeys::from_ref(state);
        let auth_header = parts
            .headers
            .get(axum::http::header::AUTHORIZATION)
            .and_then(|v| v.to_str().ok())
            .ok_or(AppError::NoSession)?;

        let token = auth_header
            .strip_prefix("Bearer ")
            .or_else(|| auth_header.strip_prefix("bearer "))
            .ok_or_else(|| AppError::Unauthorized("Invalid Authorization header".into()))?;

        let claims = match keys.verify(token) {
            Ok(c) => c,
            Err(_) => {
                warn!("invalid or expired token");
                return Err(AppError::Unauthorized("Invalid or expired token".into()));
            }
        };

        Ok(AuthUser {
            id: claims.sub,
            admin: claims.admin,
        })
    }
}

/// Optional session: `None` when the request carries no Authorization header.
/// A header that is present but invalid is still rejected.
#[derive(Debug, Clone, Copy)]
pub struct MaybeUser(pub Option<AuthUser>);

#[async_trait]
impl<S> FromRequestParts<S> for MaybeUser
where
    S: Send + Sync,
    JwtKeys: FromRef<S>,
{
    type Rejection = AppError;

    async fn from_request_parts(parts: &mut Parts, state: &S) -> Result<Self, Self::Rejection> {
        if !parts.headers.contains_key(axum::http::header::AUTHORIZATION) {
            return Ok(MaybeUser(None));
        }
        AuthUser::from_request_parts(parts, state)
            .await
            .map(|u| MaybeUser(Some(u)))
    }
}
