//! Token signing and JWKS publication
//!
//! One [`SigningKeyProvider`] holds the RSA key pair used for the whole
//! lifetime of a mock server; there is no rotation and no revocation. The
//! same material backs both the token endpoint (signing) and the discovery
//! endpoints (public JWK). Key material is injected at construction so
//! concurrent test processes never share state; [`SigningKeyProvider::test_default`]
//! supplies the embedded throwaway test pair.

use crate::config::{TEST_CLIENT_ID, TOKEN_TTL_SECS};
use crate::error::{AppError, Result};
use crate::identity::ExternalIdentity;
use base64::Engine;
use chrono::{Duration, Utc};
use jsonwebtoken::{decode, encode, Algorithm, DecodingKey, EncodingKey, Header, Validation};
use rsa::pkcs8::DecodePublicKey;
use rsa::traits::PublicKeyParts;
use rsa::RsaPublicKey;
use serde::{Deserialize, Serialize};

/// Throwaway RSA pair for tests. Not a secret; checked in on purpose.
const TEST_PRIVATE_KEY_PEM: &str = include_str!("keys/test_key.pem");
const TEST_PUBLIC_KEY_PEM: &str = include_str!("keys/test_key_pub.pem");

const DEFAULT_KID: &str = "idp-mock-default";

/// ID token claims minted by the token endpoint.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct IdTokenClaims {
    /// Subject (the external identity's id)
    pub sub: String,
    /// Issuer (the mock server's base URL)
    pub iss: String,
    /// Audience (fixed test client id)
    pub aud: String,
    /// Pass-through of the authorization request nonce
    #[serde(skip_serializing_if = "Option::is_none")]
    pub nonce: Option<String>,
    /// Display name of the identity
    #[serde(skip_serializing_if = "Option::is_none")]
    pub nickname: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub email: Option<String>,
    /// Issued at (Unix timestamp)
    pub iat: i64,
    /// Expiration (Unix timestamp, iat + fixed TTL)
    pub exp: i64,
}

impl IdTokenClaims {
    /// Build the claim set for one decoded identity. `iat`/`exp` are the only
    /// non-deterministic fields.
    pub fn for_identity(identity: &ExternalIdentity, nonce: Option<String>, issuer: &str) -> Self {
        let now = Utc::now();
        let exp = now + Duration::seconds(TOKEN_TTL_SECS);

        Self {
            sub: identity.id.clone(),
            iss: issuer.to_string(),
            aud: TEST_CLIENT_ID.to_string(),
            nonce,
            nickname: if identity.name.is_empty() {
                None
            } else {
                Some(identity.name.clone())
            },
            email: identity.email.clone(),
            iat: now.timestamp(),
            exp: exp.timestamp(),
        }
    }
}

/// Public half of the signing key, in JWK form.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Jwk {
    pub kty: String,
    #[serde(rename = "use")]
    pub use_: String,
    pub alg: String,
    pub kid: String,
    pub n: String,
    pub e: String,
}

/// JWKS document served at `/jwks`.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct JwkSet {
    pub keys: Vec<Jwk>,
}

/// Holds one asymmetric key pair and signs tokens with it.
#[derive(Clone)]
pub struct SigningKeyProvider {
    kid: String,
    algorithm: Algorithm,
    encoding_key: EncodingKey,
    decoding_key: DecodingKey,
    public_jwk: Jwk,
}

impl SigningKeyProvider {
    /// Load an RSA key pair from PEM. The public JWK is derived eagerly so
    /// bad key material fails here, not on the first discovery request.
    pub fn from_rsa_pem(
        private_key_pem: &str,
        public_key_pem: &str,
        kid: impl Into<String>,
    ) -> Result<Self> {
        let kid = kid.into();
        let algorithm = Algorithm::RS256;

        let encoding_key = EncodingKey::from_rsa_pem(private_key_pem.as_bytes())?;
        let decoding_key = DecodingKey::from_rsa_pem(public_key_pem.as_bytes())?;

        let public_key = RsaPublicKey::from_public_key_pem(public_key_pem)
            .map_err(|e| AppError::Config(format!("invalid RSA public key: {e}")))?;
        let engine = &base64::engine::general_purpose::URL_SAFE_NO_PAD;
        let public_jwk = Jwk {
            kty: "RSA".to_string(),
            use_: "sig".to_string(),
            alg: algorithm_name(algorithm).to_string(),
            kid: kid.clone(),
            n: engine.encode(public_key.n().to_bytes_be()),
            e: engine.encode(public_key.e().to_bytes_be()),
        };

        Ok(Self {
            kid,
            algorithm,
            encoding_key,
            decoding_key,
            public_jwk,
        })
    }

    /// The embedded default test key pair (RS256).
    pub fn test_default() -> Self {
        Self::from_rsa_pem(TEST_PRIVATE_KEY_PEM, TEST_PUBLIC_KEY_PEM, DEFAULT_KID)
            .expect("embedded test key material is valid")
    }

    pub fn kid(&self) -> &str {
        &self.kid
    }

    /// Algorithm identifier as advertised in discovery metadata ("RS256").
    pub fn algorithm_name(&self) -> &'static str {
        algorithm_name(self.algorithm)
    }

    /// Sign a claim set into a compact JWT. The header carries this
    /// provider's `kid`.
    pub fn sign(&self, claims: &IdTokenClaims) -> Result<String> {
        let mut header = Header::new(self.algorithm);
        header.kid = Some(self.kid.clone());
        Ok(encode(&header, claims, &self.encoding_key)?)
    }

    /// Verify a token against the public half and decode its claims.
    /// Intended for test assertions on minted tokens.
    pub fn verify(&self, token: &str, issuer: &str, audience: &str) -> Result<IdTokenClaims> {
        let mut validation = Validation::new(self.algorithm);
        validation.leeway = 5;
        validation.set_audience(&[audience]);
        validation.set_issuer(&[issuer]);

        let token_data = decode::<IdTokenClaims>(token, &self.decoding_key, &validation)?;
        Ok(token_data.claims)
    }

    /// Public JWK for the discovery endpoint.
    pub fn public_jwk(&self) -> &Jwk {
        &self.public_jwk
    }

    /// The full JWKS document.
    pub fn jwks(&self) -> JwkSet {
        JwkSet {
            keys: vec![self.public_jwk.clone()],
        }
    }
}

fn algorithm_name(algorithm: Algorithm) -> &'static str {
    match algorithm {
        Algorithm::RS256 => "RS256",
        Algorithm::RS384 => "RS384",
        Algorithm::RS512 => "RS512",
        _ => "RS256",
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::identity::Provider;

    const ISSUER: &str = "http://localhost:8091/openid";

    fn identity() -> ExternalIdentity {
        ExternalIdentity::new(Provider::OpenId, "u1", "Ann").with_email("ann@x.com")
    }

    #[test]
    fn test_sign_and_verify_claim_fidelity() {
        let provider = SigningKeyProvider::test_default();
        let claims = IdTokenClaims::for_identity(&identity(), Some("n1".to_string()), ISSUER);

        let token = provider.sign(&claims).unwrap();
        let decoded = provider.verify(&token, ISSUER, TEST_CLIENT_ID).unwrap();

        assert_eq!(decoded.sub, "u1");
        assert_eq!(decoded.nonce.as_deref(), Some("n1"));
        assert_eq!(decoded.nickname.as_deref(), Some("Ann"));
        assert_eq!(decoded.email.as_deref(), Some("ann@x.com"));
        assert_eq!(decoded.iss, ISSUER);
        assert_eq!(decoded.aud, TEST_CLIENT_ID);
        assert_eq!(decoded.exp, decoded.iat + TOKEN_TTL_SECS);
    }

    #[test]
    fn test_token_header_kid_matches_jwks() {
        let provider = SigningKeyProvider::test_default();
        let claims = IdTokenClaims::for_identity(&identity(), None, ISSUER);

        let token = provider.sign(&claims).unwrap();
        let header = jsonwebtoken::decode_header(&token).unwrap();

        let jwks = provider.jwks();
        assert_eq!(jwks.keys.len(), 1);
        assert_eq!(header.kid.as_deref(), Some(jwks.keys[0].kid.as_str()));
    }

    #[test]
    fn test_jwk_alg_matches_signing_algorithm() {
        let provider = SigningKeyProvider::test_default();
        assert_eq!(provider.public_jwk().alg, provider.algorithm_name());
        assert_eq!(provider.public_jwk().kty, "RSA");
        assert!(!provider.public_jwk().n.is_empty());
        assert!(!provider.public_jwk().e.is_empty());
    }

    #[test]
    fn test_verify_rejects_wrong_audience() {
        let provider = SigningKeyProvider::test_default();
        let claims = IdTokenClaims::for_identity(&identity(), None, ISSUER);
        let token = provider.sign(&claims).unwrap();

        assert!(provider.verify(&token, ISSUER, "otherClient").is_err());
    }

    #[test]
    fn test_claims_omit_empty_display_name() {
        let anonymous = ExternalIdentity::new(Provider::OAuth2, "u2", "");
        let claims = IdTokenClaims::for_identity(&anonymous, None, ISSUER);
        assert!(claims.nickname.is_none());
        let json = serde_json::to_string(&claims).unwrap();
        assert!(!json.contains("nickname"));
    }
}
