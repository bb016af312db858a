use crate::domain::model::User;
use jsonwebtoken::{DecodingKey, EncodingKey, Header, Validation};
use serde::{Deserialize, Serialize};

#[derive(Debug, Serialize, Deserialize, Clone, PartialEq)]
pub struct Claims {
    pub id: i64,
    pub email: String,
    pub iat: i64,
    pub exp: i64,
}

pub struct JwtManager {
    encoding_key: EncodingKey,
    decoding_key: DecodingKey,
}

pub const JWT_TTL: i64 = 12 * 60 * 60;

impl JwtManager {
    pub fn new(secret_key: &str) -> JwtManager {
        JwtManager {
            encoding_key: EncodingKey::from_secret(secret_key.as_ref()),
            decoding_key: DecodingKey::from_secret(secret_key.as_ref()),
        }
    }

    pub fn gen_user_token(&self, user: &User) -> jsonwebtoken::errors::Result<String> {
        let now = chrono::Utc::now().timestamp();
        self.gen_token(&Claims {
            id: user.id,
            email: user.email.clone(),
            iat: now,
            exp: now + JWT_TTL,
        })
    }

    pub fn gen_token(&self, claims: &Claims) -> jsonwebtoken::errors::Result<String> {
        jsonwebtoken::encode(
            &Header::new(jsonwebtoken::Algorithm::HS256),
            claims,
            &self.encoding_key,
        )
    }

    /// Checks signature and expiry.
    pub fn verify(&self, token: &str) -> jsonwebtoken::errors::Result<Claims> {
        let validation = Validation::new(jsonwebtoken::Algorithm::HS256);
        jsonwebtoken::decode::<Claims>(token, &self.decoding_key, &validation).map(|t| t.claims)
    }
}
