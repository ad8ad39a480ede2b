// service/identity.rs
use jsonwebtoken::{decode, Algorithm, DecodingKey, Validation};
use serde::{Deserialize, Serialize};

use crate::config::Config;

use super::error::ServiceError;

/// Claims we read from the identity provider's session token.
#[derive(Debug, Deserialize, Serialize)]
pub struct IdentityClaims {
    pub sub: String,
    pub email: Option<String>,
    pub name: Option<String>,
    #[serde(alias = "phone_number")]
    pub phone: Option<String>,
    pub exp: usize,
}

/// Verified identity of the caller as asserted by the identity provider.
#[derive(Debug, Clone, PartialEq)]
pub struct Principal {
    pub subject: String,
    pub email: String,
    pub name: Option<String>,
    pub phone: Option<String>,
}

#[derive(Clone)]
pub struct IdentityVerifier {
    key: DecodingKey,
    validation: Validation,
}

impl std::fmt::Debug for IdentityVerifier {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("IdentityVerifier")
            .field("algorithms", &self.validation.algorithms)
            .field("issuer", &self.validation.iss)
            .finish()
    }
}

impl IdentityVerifier {
    /// The RS256 public key wins when both a key and a shared secret are configured.
    pub fn from_config(config: &Config) -> Result<Self, ServiceError> {
        let (key, algorithm) = match (&config.identity_jwt_public_key, &config.identity_jwt_secret) {
            (Some(pem), _) => {
                let pem = pem.replace("\\n", "\n");
                let key = DecodingKey::from_rsa_pem(pem.as_bytes())
                    .map_err(|e| ServiceError::Identity(format!("invalid public key: {}", e)))?;
                (key, Algorithm::RS256)
            }
            (None, Some(secret)) => (DecodingKey::from_secret(secret.as_bytes()), Algorithm::HS256),
            (None, None) => {
                return Err(ServiceError::Identity(
                    "no identity verification key configured".to_string(),
                ))
            }
        };

        let mut validation = Validation::new(algorithm);
        validation.validate_aud = false;
        if let Some(issuer) = &config.identity_issuer {
            validation.set_issuer(&[issuer]);
            validation.set_required_spec_claims(&["exp", "iss"]);
        }

        Ok(Self { key, validation })
    }

    pub fn verify(&self, token: &str) -> Result<Principal, ServiceError> {
        let claims = decode::<IdentityClaims>(token, &self.key, &self.validation)
            .map_err(|e| ServiceError::Identity(e.to_string()))?
            .claims;

        if claims.sub.trim().is_empty() {
            return Err(ServiceError::Identity("token has no subject".to_string()));
        }

        let email = claims
            .email
            .filter(|email| !email.trim().is_empty())
            .ok_or_else(|| ServiceError::Identity("token has no email claim".to_string()))?;

        Ok(Principal {
            subject: claims.sub,
            email: email.trim().to_lowercase(),
            name: claims.name,
            phone: claims.phone,
        })
    }
}
