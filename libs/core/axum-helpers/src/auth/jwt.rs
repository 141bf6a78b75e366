use super::config::JwtConfig;
use chrono::{Duration, Utc};
use jsonwebtoken::{decode, encode, DecodingKey, EncodingKey, Header, Validation};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// Session token time-to-live (24 hours)
pub const TOKEN_TTL_SECS: i64 = 86_400;

/// Name of the HttpOnly cookie carrying the session token
pub const TOKEN_COOKIE: &str = "access_token";

/// JWT claims structure
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct JwtClaims {
    pub sub: String,   // Subject (user ID)
    pub email: String, // User email
    pub name: String,  // User name
    pub role: String,  // User role ("admin" | "staff")
    pub exp: i64,      // Expiration time
    pub iat: i64,      // Issued at
    pub jti: String,   // JWT ID
}

impl JwtClaims {
    /// Parse the subject back into a user id
    pub fn user_id(&self) -> Result<Uuid, uuid::Error> {
        Uuid::parse_str(&self.sub)
    }

    pub fn is_admin(&self) -> bool {
        self.role == "admin"
    }
}

/// Stateless JWT authentication (HS256)
#[derive(Clone)]
pub struct JwtAuth {
    secret: String,
}

impl JwtAuth {
    pub fn new(config: &JwtConfig) -> Self {
        Self {
            secret: config.secret.clone(),
        }
    }

    /// Create a session token (24 h)
    pub fn create_token(
        &self,
        user_id: &str,
        email: &str,
        name: &str,
        role: &str,
    ) -> eyre::Result<String> {
        let now = Utc::now();
        let exp = (now + Duration::seconds(TOKEN_TTL_SECS)).timestamp();
        let iat = now.timestamp();
        let jti = Uuid::new_v4().to_string();

        let claims = JwtClaims {
            sub: user_id.to_string(),
            email: email.to_string(),
            name: name.to_string(),
            role: role.to_string(),
            exp,
            iat,
            jti,
        };

        let header = Header {
            alg: jsonwebtoken::Algorithm::HS256,
            ..Default::default()
        };

        let token = encode(
            &header,
            &claims,
            &EncodingKey::from_secret(self.secret.as_bytes()),
        )?;

        Ok(token)
    }

    /// Verify JWT token signature and decode claims
    pub fn verify_token(&self, token: &str) -> eyre::Result<JwtClaims> {
        let token_data = decode::<JwtClaims>(
            token,
            &DecodingKey::from_secret(self.secret.as_bytes()),
            &Validation::default(),
        )?;

        Ok(token_data.claims)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn auth() -> JwtAuth {
        JwtAuth::new(&JwtConfig::new("unit-test-secret-at-least-32-chars!!"))
    }

    #[test]
    fn test_token_round_trip() {
        let auth = auth();
        let user_id = Uuid::now_v7();

        let token = auth
            .create_token(&user_id.to_string(), "jo@example.com", "Jo", "staff")
            .unwrap();
        let claims = auth.verify_token(&token).unwrap();

        assert_eq!(claims.user_id().unwrap(), user_id);
        assert_eq!(claims.email, "jo@example.com");
        assert_eq!(claims.role, "staff");
        assert!(!claims.is_admin());
        assert!(claims.exp > claims.iat);
    }

    #[test]
    fn test_admin_claims() {
        let auth = auth();
        let token = auth
            .create_token("some-id", "admin@example.com", "Admin", "admin")
            .unwrap();
        assert!(auth.verify_token(&token).unwrap().is_admin());
    }

    #[test]
    fn test_verify_rejects_wrong_secret() {
        let token = auth()
            .create_token("some-id", "jo@example.com", "Jo", "staff")
            .unwrap();

        let other = JwtAuth::new(&JwtConfig::new("another-secret-also-32-characters!!!"));
        assert!(other.verify_token(&token).is_err());
    }

    #[test]
    fn test_verify_rejects_garbage() {
        assert!(auth().verify_token("not-a-jwt").is_err());
    }
}
