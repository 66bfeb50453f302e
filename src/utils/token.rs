use chrono::{Duration, Utc};
use jsonwebtoken::{decode, encode, Algorithm, DecodingKey, EncodingKey, Header, Validation};
use rand::{distributions::Alphanumeric, thread_rng, Rng};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::error::Result;

/// Bearer token claims: `sub` is the account email, `uid` the account id.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Claims {
    pub sub: String,
    pub uid: Uuid,
    pub exp: usize,
}

pub fn issue_access_token(
    secret: &str,
    email: &str,
    account_id: Uuid,
    ttl_minutes: i64,
) -> Result<String> {
    let exp = (Utc::now() + Duration::minutes(ttl_minutes)).timestamp().max(0) as usize;
    let claims = Claims {
        sub: email.to_string(),
        uid: account_id,
        exp,
    };
    let token = encode(
        &Header::new(Algorithm::HS256),
        &claims,
        &EncodingKey::from_secret(secret.as_bytes()),
    )?;
    Ok(token)
}

pub fn decode_access_token(secret: &str, token: &str) -> Result<Claims> {
    let mut validation = Validation::new(Algorithm::HS256);
    validation.validate_exp = true;
    let data = decode::<Claims>(
        token,
        &DecodingKey::from_secret(secret.as_bytes()),
        &validation,
    )?;
    Ok(data.claims)
}

/// Lowercase alphanumeric suffix used to disambiguate colliding slugs.
pub fn random_suffix(length: usize) -> String {
    thread_rng()
        .sample_iter(&Alphanumeric)
        .take(length)
        .map(|b| char::from(b).to_ascii_lowercase())
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn token_round_trip_keeps_identity() {
        let id = Uuid::new_v4();
        let token = issue_access_token("s3cret", "a@uni.edu", id, 60).unwrap();
        let claims = decode_access_token("s3cret", &token).unwrap();
        assert_eq!(claims.sub, "a@uni.edu");
        assert_eq!(claims.uid, id);
    }

    #[test]
    fn rejects_wrong_secret_and_expired_tokens() {
        let id = Uuid::new_v4();
        let token = issue_access_token("s3cret", "a@uni.edu", id, 60).unwrap();
        assert!(decode_access_token("other", &token).is_err());

        let expired = issue_access_token("s3cret", "a@uni.edu", id, -120).unwrap();
        assert!(decode_access_token("s3cret", &expired).is_err());
    }

    #[test]
    fn suffix_is_lowercase_alphanumeric() {
        let suffix = random_suffix(8);
        assert_eq!(suffix.len(), 8);
        assert!(suffix
            .chars()
            .all(|c| c.is_ascii_lowercase() || c.is_ascii_digit()));
    }
}
