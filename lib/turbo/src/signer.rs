use std::fmt;

use rsa::pss::BlindedSigningKey;
use rsa::signature::{RandomizedSigner, SignatureEncoding};
use rsa::{BigUint, RsaPrivateKey};
use sha2::Sha256;

use crate::data_item::{OWNER_LENGTH, SIGNATURE_LENGTH};
use crate::jwk::decode_member;
use crate::{ClientError, ClientResult, Jwk};

/// Signs data items with the RSA-PSS key of an Arweave wallet.
pub struct ArweaveSigner {
    key: BlindedSigningKey<Sha256>,
    owner: Vec<u8>,
}

impl fmt::Debug for ArweaveSigner {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("ArweaveSigner")
            .field("owner_length", &self.owner.len())
            .finish_non_exhaustive()
    }
}

impl ArweaveSigner {
    pub fn from_jwk(wallet: &Jwk) -> ClientResult<Self> {
        if !wallet.kty.eq_ignore_ascii_case("RSA") {
            return Err(ClientError::UnsupportedKeyType(wallet.kty.clone()));
        }

        let owner = wallet.modulus()?;
        if owner.len() != OWNER_LENGTH {
            return Err(ClientError::InvalidKey(format!(
                "expected a {} bit modulus, got {} bits",
                OWNER_LENGTH * 8,
                owner.len() * 8
            )));
        }

        let uint = |bytes: &[u8]| BigUint::from_bytes_be(bytes);
        let key = RsaPrivateKey::from_components(
            uint(&owner),
            uint(&decode_member("e", &wallet.e)?),
            uint(&wallet.private_member("d")?),
            vec![
                uint(&wallet.private_member("p")?),
                uint(&wallet.private_member("q")?),
            ],
        )?;
        key.validate()?;

        Ok(Self {
            key: BlindedSigningKey::<Sha256>::new(key),
            owner,
        })
    }

    /// Public modulus, carried in data items as their owner.
    pub fn owner(&self) -> &[u8] {
        &self.owner
    }

    pub fn sign(&self, message: &[u8]) -> ClientResult<Vec<u8>> {
        let signature = self
            .key
            .try_sign_with_rng(&mut rand::thread_rng(), message)
            .map_err(|e| ClientError::SigningError(e.to_string()))?
            .to_vec();

        if signature.len() != SIGNATURE_LENGTH {
            return Err(ClientError::SigningError(format!(
                "expected a {SIGNATURE_LENGTH} byte signature, got {}",
                signature.len()
            )));
        }

        Ok(signature)
    }
}
