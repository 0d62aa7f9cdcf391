use aes_gcm::aead::{Aead, AeadCore, KeyInit, OsRng};
use aes_gcm::{Aes256Gcm, Nonce};
use base64::{Engine as _, engine::general_purpose::STANDARD};
use sha2::{Digest, Sha256};
use thiserror::Error;

const NONCE_LEN: usize = 12;
const TAG_LEN: usize = 16;

#[derive(Debug, Error)]
pub enum CipherError {
    #[error("Encryption failed")]
    Encrypt,
    #[error("Decryption failed")]
    Decrypt,
    #[error("Malformed payload: {0}")]
    Malformed(String),
}

/// Base64 fields as stored on a chat message.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct EncryptedPayload {
    pub ciphertext: String,
    pub iv: String,
    pub auth_tag: String,
}

/// AES-256-GCM keyed by the sha-256 of the chat secret.
pub struct ChatCipher {
    cipher: Aes256Gcm,
}

impl ChatCipher {
    pub fn new(secret: &str) -> Self {
        let key = Sha256::digest(secret.as_bytes());
        Self {
            cipher: Aes256Gcm::new(&key),
        }
    }

    pub fn encrypt(&self, plain: &str) -> Result<EncryptedPayload, CipherError> {
        let nonce = Aes256Gcm::generate_nonce(&mut OsRng);
        let mut sealed = self
            .cipher
            .encrypt(&nonce, plain.as_bytes())
            .map_err(|_| CipherError::Encrypt)?;

        // aes-gcm appends the tag; it is stored in its own field
        let tag = sealed.split_off(sealed.len() - TAG_LEN);
        Ok(EncryptedPayload {
            ciphertext: STANDARD.encode(&sealed),
            iv: STANDARD.encode(nonce),
            auth_tag: STANDARD.encode(tag),
        })
    }

    pub fn decrypt(&self, payload: &EncryptedPayload) -> Result<String, CipherError> {
        let iv = decode_field(&payload.iv, "iv")?;
        if iv.len() != NONCE_LEN {
            return Err(CipherError::Malformed(format!(
                "iv must be {NONCE_LEN} bytes, got {}",
                iv.len()
            )));
        }
        let tag = decode_field(&payload.auth_tag, "auth_tag")?;
        if tag.len() != TAG_LEN {
            return Err(CipherError::Malformed(format!(
                "auth_tag must be {TAG_LEN} bytes, got {}",
                tag.len()
            )));
        }

        let mut sealed = decode_field(&payload.ciphertext, "ciphertext")?;
        sealed.extend_from_slice(&tag);

        let plain = self
            .cipher
            .decrypt(Nonce::from_slice(&iv), sealed.as_slice())
            .map_err(|_| CipherError::Decrypt)?;
        String::from_utf8(plain).map_err(|_| CipherError::Malformed("not utf-8".to_string()))
    }
}

fn decode_field(value: &str, field: &str) -> Result<Vec<u8>, CipherError> {
    STANDARD
        .decode(value)
        .map_err(|e| CipherError::Malformed(format!("{field}: {e}")))
}
