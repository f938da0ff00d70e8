//! Token issuer implementation

use chrono::{DateTime, Duration, Utc};
use jsonwebtoken::errors::ErrorKind;
use jsonwebtoken::{decode, encode, DecodingKey, EncodingKey, Header, Validation};
use sha2::{Digest, Sha256};

use crate::domain::entities::token::{Claims, TokenType};
use crate::errors::{DomainError, TokenError};

use super::config::TokenIssuerConfig;

/// A freshly signed refresh token together with what the store needs
#[derive(Debug, Clone)]
pub struct IssuedRefreshToken {
    /// The raw token string returned to the client
    pub token: String,
    /// SHA-256 hex of `token`, the only form ever persisted
    pub token_hash: String,
    pub expires_at: DateTime<Utc>,
}

/// Signs and verifies access and refresh tokens
///
/// Stateless: it never touches a store. Refresh tokens still need a
/// `RefreshTokenRepository::find_active` lookup after [`verify_refresh_token`](Self::verify_refresh_token).
pub struct TokenIssuer {
    config: TokenIssuerConfig,
    encoding_key: EncodingKey,
    decoding_key: DecodingKey,
    validation: Validation,
}

impl TokenIssuer {
    /// Creates a new token issuer
    pub fn new(config: TokenIssuerConfig) -> Self {
        let encoding_key = EncodingKey::from_secret(config.jwt_secret.as_bytes());
        let decoding_key = DecodingKey::from_secret(config.jwt_secret.as_bytes());

        let mut validation = Validation::new(config.algorithm);
        validation.validate_exp = true;
        validation.leeway = 0;
        validation.set_required_spec_claims(&["exp", "sub"]);

        Self {
            config,
            encoding_key,
            decoding_key,
            validation,
        }
    }

    pub fn config(&self) -> &TokenIssuerConfig {
        &self.config
    }

    /// Sign an access token valid for exactly `ttl_seconds`
    pub fn issue_access_token(
        &self,
        user_id: &str,
        role: &str,
        ttl_seconds: i64,
    ) -> Result<String, DomainError> {
        let claims = Claims::new(user_id, role, TokenType::Access, ttl_seconds, Utc::now())?;
        self.encode_jwt(&claims)
    }

    /// Sign a refresh token and compute its storage hash
    pub fn issue_refresh_token(
        &self,
        user_id: &str,
        role: &str,
        ttl_seconds: i64,
    ) -> Result<IssuedRefreshToken, DomainError> {
        let now = Utc::now();
        let claims = Claims::new(user_id, role, TokenType::Refresh, ttl_seconds, now)?;
        let token = self.encode_jwt(&claims)?;
        Ok(IssuedRefreshToken {
            token_hash: hash_token(&token),
            token,
            expires_at: now + Duration::seconds(claims.ttl_seconds()),
        })
    }

    /// Encodes claims into a JWT
    pub(crate) fn encode_jwt(&self, claims: &Claims) -> Result<String, DomainError> {
        let header = Header::new(self.config.algorithm);
        encode(&header, claims, &self.encoding_key).map_err(|e| {
            DomainError::Token(TokenError::SigningFailed {
                message: e.to_string(),
            })
        })
    }

    /// Verify signature and expiry of an access token. No store lookup.
    pub fn verify_access_token(&self, token: &str) -> Result<Claims, DomainError> {
        self.verify_typed(token, TokenType::Access)
    }

    /// Verify signature, expiry and type of a refresh token
    pub fn verify_refresh_token(&self, token: &str) -> Result<Claims, DomainError> {
        self.verify_typed(token, TokenType::Refresh)
    }

    fn verify_typed(&self, token: &str, expected: TokenType) -> Result<Claims, DomainError> {
        let token_data = decode::<Claims>(token, &self.decoding_key, &self.validation)
            .map_err(|e| match e.kind() {
                ErrorKind::ExpiredSignature => DomainError::Token(TokenError::Expired),
                _ => DomainError::Token(TokenError::InvalidToken),
            })?;

        if token_data.claims.token_type != expected {
            return Err(DomainError::Token(TokenError::WrongTokenType));
        }
        Ok(token_data.claims)
    }
}

/// SHA-256 hex digest of a token string
pub fn hash_token(token: &str) -> String {
    let mut hasher = Sha256::new();
    hasher.update(token.as_bytes());
    hex::encode(hasher.finalize())
}
