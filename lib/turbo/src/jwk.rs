use std::fmt;

use base64::engine::general_purpose::URL_SAFE_NO_PAD;
use base64::Engine;
use serde::{Deserialize, Serialize};
use sha2::{Digest, Sha256};

use crate::{ClientError, ClientResult};

/// RSA JSON Web Key holding an Arweave wallet.
#[derive(Clone, Deserialize, PartialEq, Serialize)]
pub struct Jwk {
    pub kty: String,

    /// Public modulus, base64url encoded.
    pub n: String,

    pub e: String,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub d: Option<String>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub p: Option<String>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub q: Option<String>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub dp: Option<String>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub dq: Option<String>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub qi: Option<String>,
}

impl Jwk {
    pub fn is_private(&self) -> bool {
        self.d.is_some()
    }

    /// Wallet address: the base64url encoded SHA-256 digest of the public modulus.
    pub fn address(&self) -> ClientResult<String> {
        Ok(URL_SAFE_NO_PAD.encode(Sha256::digest(self.modulus()?)))
    }

    /// Big endian bytes of the public modulus.
    pub fn modulus(&self) -> ClientResult<Vec<u8>> {
        let modulus = decode_member("n", &self.n)?;
        if modulus.is_empty() {
            return Err(ClientError::InvalidKey("modulus is empty".to_string()));
        }

        Ok(modulus)
    }

    /// Big endian bytes of a private member, which must be present.
    pub(crate) fn private_member(&self, name: &str) -> ClientResult<Vec<u8>> {
        let value = match name {
            "d" => &self.d,
            "p" => &self.p,
            "q" => &self.q,
            "dp" => &self.dp,
            "dq" => &self.dq,
            "qi" => &self.qi,
            _ => &None,
        };

        match value {
            Some(value) => decode_member(name, value),
            None => Err(ClientError::InvalidKey(format!(
                "wallet is missing private member `{name}`"
            ))),
        }
    }
}

pub(crate) fn decode_member(name: &str, value: &str) -> ClientResult<Vec<u8>> {
    URL_SAFE_NO_PAD
        .decode(value.trim_end_matches('='))
        .map_err(|e| ClientError::InvalidKey(format!("`{name}` is not base64url: {e}")))
}

impl fmt::Debug for Jwk {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let redacted = |value: &Option<String>| value.as_ref().map(|_| "***");
        f.debug_struct("Jwk")
            .field("kty", &self.kty)
            .field("n", &self.n)
            .field("e", &self.e)
            .field("d", &redacted(&self.d))
            .field("p", &redacted(&self.p))
            .field("q", &redacted(&self.q))
            .field("dp", &redacted(&self.dp))
            .field("dq", &redacted(&self.dq))
            .field("qi", &redacted(&self.qi))
            .finish()
    }
}
