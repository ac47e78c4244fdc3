use jsonwebtoken::{decode, Algorithm, DecodingKey, Validation};
use serde::Deserialize;
use thiserror::Error;

#[derive(Debug, Error)]
pub enum AuthError {
    #[error("Invalid token: {0}")]
    InvalidToken(String),
}

#[derive(Debug, Deserialize)]
struct Claims {
    sub: String,
}

/// Derives the caller's user id from a bearer JWT.
///
/// The token is decoded, not verified: signature and expiry checks happen
/// upstream in the API gateway authorizer, and this service only needs the
/// `sub` claim to partition storage.
pub fn parse_user_id(token: &str) -> Result<String, AuthError> {
    let mut validation = Validation::new(Algorithm::RS256);
    validation.insecure_disable_signature_validation();
    validation.validate_exp = false;
    validation.validate_aud = false;
    validation.required_spec_claims.clear();

    let data = decode::<Claims>(token, &DecodingKey::from_secret(&[]), &validation)
        .map_err(|e| AuthError::InvalidToken(e.to_string()))?;

    Ok(data.claims.sub)
}

#[cfg(test)]
mod tests {
    use super::*;
    use base64::{engine::general_purpose::URL_SAFE_NO_PAD, Engine as _};

    fn token_with_payload(payload: &str) -> String {
        let header = URL_SAFE_NO_PAD.encode(r#"{"alg":"RS256","typ":"JWT"}"#);
        let payload = URL_SAFE_NO_PAD.encode(payload);
        format!("{header}.{payload}.sig")
    }

    #[test]
    fn extracts_sub_claim() {
        let token = token_with_payload(r#"{"sub":"auth0|user-1"}"#);
        assert_eq!(parse_user_id(&token).unwrap(), "auth0|user-1");
    }

    #[test]
    fn expiry_is_not_enforced_here() {
        // Expired tokens are the authorizer's problem; identity extraction
        // still succeeds.
        let token = token_with_payload(r#"{"sub":"user-1","exp":1}"#);
        assert_eq!(parse_user_id(&token).unwrap(), "user-1");
    }

    #[test]
    fn malformed_token_is_rejected() {
        assert!(matches!(
            parse_user_id("not-a-jwt"),
            Err(AuthError::InvalidToken(_))
        ));
    }

    #[test]
    fn token_without_sub_is_rejected() {
        let token = token_with_payload(r#"{"email":"a@example.com"}"#);
        assert!(matches!(
            parse_user_id(&token),
            Err(AuthError::InvalidToken(_))
        ));
    }
}
