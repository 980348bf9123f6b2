use std::time::Duration;

use axum::extract::FromRef;
use jsonwebtoken::{decode, encode, DecodingKey, EncodingKey, Header, Validation};
use time::{Duration as TimeDuration, OffsetDateTime};
use tracing::debug;

use crate::auth::claims::Claims;
use crate::auth::repo_types::User;
use crate::state::AppState;

/// Holds JWT signing and verification keys with config data.
#[derive(Clone)]
pub struct JwtKeys {
    pub encoding: EncodingKey,
    pub decoding: DecodingKey,
    pub issuer: String,
    pub audience: String,
    pub ttl: Duration,
}

impl FromRef<AppState> for JwtKeys {
    fn from_ref(state: &AppState) -> Self {
        let cfg = &state.config.jwt;
        Self {
            encoding: EncodingKey::from_secret(cfg.secret.as_bytes()),
            decoding: DecodingKey::from_secret(cfg.secret.as_bytes()),
            issuer: cfg.issuer.clone(),
            audience: cfg.audience.clone(),
            ttl: Duration::from_secs((cfg.ttl_minutes as u64) * 60),
        }
    }
}

impl JwtKeys {
    pub fn sign(&self, user: &User) -> anyhow::Result<String> {
        let now = OffsetDateTime::now_utc();
        let exp = now + TimeDuration::seconds(self.ttl.as_secs() as i64);
        let claims = Claims {
            sub: user.id,
            first_name: user.first_name.clone(),
            last_name: user.last_name.clone(),
            username: user.username.clone(),
            email: user.email.clone(),
            iat: now.unix_timestamp() as usize,
            exp: exp.unix_timestamp() as usize,
            iss: self.issuer.clone(),
            aud: self.audience.clone(),
        };
        let token = encode(&Header::default(), &claims, &self.encoding)?;
        debug!(user_id = %user.id, "jwt signed");
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

#[cfg(test)]
mod tests {
    use super::*;
    use uuid::Uuid;

    fn make_keys() -> JwtKeys {
        let state = AppState::fake();
        JwtKeys::from_ref(&state)
    }

    fn make_user() -> User {
        let now = OffsetDateTime::now_utc();
        User {
            id: Uuid::new_v4(),
            first_name: "Alice".into(),
            last_name: "Wonder".into(),
            username: "alice".into(),
            email: "alice@x.com".into(),
            password_hash: "$argon2id$fake".into(),
            created_at: now,
            updated_at: now,
        }
    }

    #[tokio::test]
    async fn sign_and_verify_round_trips_the_identity_snapshot() {
        let keys = make_keys();
        let user = make_user();
        let token = keys.sign(&user).expect("sign");
        let claims = keys.verify(&token).expect("verify");
        assert_eq!(claims.sub, user.id);
        assert_eq!(claims.first_name, "Alice");
        assert_eq!(claims.last_name, "Wonder");
        assert_eq!(claims.username, "alice");
        assert_eq!(claims.email, "alice@x.com");
        assert_eq!(claims.iss, "test-issuer");
        assert_eq!(claims.aud, "test-aud");
        assert!(claims.exp > claims.iat);
    }

    #[tokio::test]
    async fn verify_rejects_tampered_token() {
        let keys = make_keys();
        let token = keys.sign(&make_user()).expect("sign");
        let mut tampered = token.clone();
        tampered.truncate(token.len() - 2);
        assert!(keys.verify(&tampered).is_err());
    }

    #[tokio::test]
    async fn verify_rejects_wrong_secret() {
        let keys = make_keys();
        let token = keys.sign(&make_user()).expect("sign");
        let other = JwtKeys {
            encoding: EncodingKey::from_secret(b"other-secret"),
            decoding: DecodingKey::from_secret(b"other-secret"),
            issuer: keys.issuer.clone(),
            audience: keys.audience.clone(),
            ttl: keys.ttl,
        };
        assert!(other.verify(&token).is_err());
    }

    #[tokio::test]
    async fn verify_rejects_expired_token() {
        let keys = make_keys();
        let user = make_user();
        // Hand-roll claims whose exp is well past the default leeway.
        let past = OffsetDateTime::now_utc() - TimeDuration::minutes(30);
        let claims = Claims {
            sub: user.id,
            first_name: user.first_name.clone(),
            last_name: user.last_name.clone(),
            username: user.username.clone(),
            email: user.email.clone(),
            iat: (past - TimeDuration::minutes(5)).unix_timestamp() as usize,
            exp: past.unix_timestamp() as usize,
            iss: keys.issuer.clone(),
            aud: keys.audience.clone(),
        };
        let token = encode(&Header::default(), &claims, &keys.encoding).expect("encode");
        assert!(keys.verify(&token).is_err());
    }
}
