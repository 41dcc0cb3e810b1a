//! Token Codec Module
//!
//! Hex-encoded AES-256-CBC tokens with a fixed all-zero IV.
//!
//! # Security
//! The scheme is kept bit-for-bit compatible with tokens already in the wild,
//! and it is weak:
//! - the IV is all zeros, so equal plaintexts (and equal leading blocks)
//!   produce equal ciphertext prefixes;
//! - there is no MAC, so a flipped ciphertext byte decrypts to garbage
//!   instead of being rejected.
//!
//! Only the hex and block-length checks reject malformed input. Changing any
//! of this is a compatibility break for every issued token.

use std::fmt;

use aes::cipher::block_padding::{NoPadding, Pkcs7};
use aes::cipher::{BlockDecryptMut, BlockEncryptMut, KeyIvInit};
use aes::Aes256;

use crate::error::{ProxyError, Result};

type Aes256CbcDec = cbc::Decryptor<Aes256>;
type Aes256CbcEnc = cbc::Encryptor<Aes256>;

// == Public Constants ==
/// AES-256 key length in bytes
pub const KEY_LEN: usize = 32;

/// AES block length in bytes
pub const BLOCK_SIZE: usize = 16;

const ZERO_IV: [u8; BLOCK_SIZE] = [0; BLOCK_SIZE];

// == Key Normalization ==
/// Normalizes a configured secret to exactly [`KEY_LEN`] bytes.
///
/// Short secrets are right-padded with ASCII `'0'`, long ones are truncated
/// at the byte level. Lossy, and must stay that way for compatibility.
pub fn normalize_key(secret: &str) -> [u8; KEY_LEN] {
    let mut key = [b'0'; KEY_LEN];
    let bytes = secret.as_bytes();
    let n = bytes.len().min(KEY_LEN);
    key[..n].copy_from_slice(&bytes[..n]);
    key
}

// == Token Codec ==
/// Decodes opaque client tokens back into their plaintext.
#[derive(Clone)]
pub struct TokenCodec {
    key: [u8; KEY_LEN],
}

impl TokenCodec {
    // == Constructor ==
    /// Creates a codec keyed by the normalized form of `secret`.
    pub fn new(secret: &str) -> Self {
        Self {
            key: normalize_key(secret),
        }
    }

    // == Decode ==
    /// Recovers the plaintext of a hex token.
    ///
    /// Fails with [`ProxyError::InvalidToken`] when the token is not hex, is
    /// empty, or is not a whole number of cipher blocks. The plaintext is
    /// returned raw: block padding is not removed and must be stripped by the
    /// caller along with any other control characters.
    pub fn decode(&self, token: &str) -> Result<String> {
        let ciphertext = hex::decode(token).map_err(|_| ProxyError::InvalidToken)?;

        if ciphertext.is_empty() || ciphertext.len() % BLOCK_SIZE != 0 {
            return Err(ProxyError::InvalidToken);
        }

        let plaintext = Aes256CbcDec::new(&self.key.into(), &ZERO_IV.into())
            .decrypt_padded_vec_mut::<NoPadding>(&ciphertext)
            .map_err(|_| ProxyError::InvalidToken)?;

        Ok(String::from_utf8_lossy(&plaintext).into_owned())
    }

    // == Encode ==
    /// Produces a token that [`TokenCodec::decode`] accepts.
    ///
    /// PKCS#7 padding is used, so the padding bytes decode as control
    /// characters and disappear under sanitization.
    pub fn encode(&self, plaintext: &str) -> String {
        let ciphertext = Aes256CbcEnc::new(&self.key.into(), &ZERO_IV.into())
            .encrypt_padded_vec_mut::<Pkcs7>(plaintext.as_bytes());
        hex::encode(ciphertext)
    }
}

impl fmt::Debug for TokenCodec {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("TokenCodec").field("key", &"<redacted>").finish()
    }
}

// == Unit Tests ==
#[cfg(test)]
mod tests {
    use super::*;
    use crate::token::strip_control_chars;

    const SECRET: &str = "correct-horse-battery-staple";

    #[test]
    fn test_normalize_pads_short_secret_with_zero_digits() {
        let key = normalize_key("abc");
        assert_eq!(&key[..3], b"abc");
        assert!(key[3..].iter().all(|b| *b == b'0'));
    }

    #[test]
    fn test_normalize_truncates_long_secret() {
        let secret = "x".repeat(40) + "tail";
        let key = normalize_key(&secret);
        assert_eq!(key, [b'x'; KEY_LEN]);
    }

    #[test]
    fn test_normalize_exact_length_untouched() {
        let secret = "0123456789abcdef0123456789abcdef";
        assert_eq!(&normalize_key(secret), secret.as_bytes());
    }

    #[test]
    fn test_normalize_empty_secret() {
        assert_eq!(normalize_key(""), [b'0'; KEY_LEN]);
    }

    #[test]
    fn test_decode_rejects_non_hex() {
        let codec = TokenCodec::new(SECRET);
        assert!(matches!(codec.decode("not-hex!"), Err(ProxyError::InvalidToken)));
        assert!(matches!(codec.decode("abc"), Err(ProxyError::InvalidToken)));
    }

    #[test]
    fn test_decode_rejects_partial_block() {
        let codec = TokenCodec::new(SECRET);
        let fifteen_bytes = "00".repeat(15);
        assert!(matches!(codec.decode(&fifteen_bytes), Err(ProxyError::InvalidToken)));

        let seventeen_bytes = "00".repeat(17);
        assert!(matches!(codec.decode(&seventeen_bytes), Err(ProxyError::InvalidToken)));
    }

    #[test]
    fn test_decode_rejects_empty() {
        let codec = TokenCodec::new(SECRET);
        assert!(matches!(codec.decode(""), Err(ProxyError::InvalidToken)));
    }

    #[test]
    fn test_decode_recovers_encoded_url() {
        let codec = TokenCodec::new(SECRET);
        let url = "https://images.example.com/avatars/42.png?v=3";

        let token = codec.encode(url);
        let plaintext = codec.decode(&token).unwrap();

        assert!(plaintext.starts_with(url));
        assert_eq!(strip_control_chars(&plaintext), url);
    }

    #[test]
    fn test_decode_accepts_uppercase_hex() {
        let codec = TokenCodec::new(SECRET);
        let token = codec.encode("https://a.test/b.jpg").to_uppercase();
        let plaintext = codec.decode(&token).unwrap();
        assert_eq!(strip_control_chars(&plaintext), "https://a.test/b.jpg");
    }

    #[test]
    fn test_decode_is_deterministic() {
        let codec = TokenCodec::new(SECRET);
        let token = codec.encode("https://a.test/b.jpg");
        assert_eq!(codec.decode(&token).unwrap(), codec.decode(&token).unwrap());
    }

    #[test]
    fn test_identical_plaintexts_share_ciphertext() {
        let codec = TokenCodec::new(SECRET);
        let a = codec.encode("https://same.test/prefix-one.png");
        let b = codec.encode("https://same.test/prefix-two.png");

        // First 16 plaintext bytes match, so the first ciphertext block does too.
        assert_eq!(&a[..BLOCK_SIZE * 2], &b[..BLOCK_SIZE * 2]);
        assert_eq!(a, codec.encode("https://same.test/prefix-one.png"));
    }

    #[test]
    fn test_tampered_token_decodes_to_garbage() {
        let codec = TokenCodec::new(SECRET);
        let mut raw = hex::decode(codec.encode("https://a.test/some/long/path.png")).unwrap();
        raw[0] ^= 0xff;

        let plaintext = codec.decode(&hex::encode(raw)).unwrap();
        assert_ne!(strip_control_chars(&plaintext), "https://a.test/some/long/path.png");
    }

    #[test]
    fn test_wrong_secret_does_not_recover_plaintext() {
        let token = TokenCodec::new(SECRET).encode("https://a.test/b.jpg");
        let plaintext = TokenCodec::new("another-secret").decode(&token).unwrap();
        assert_ne!(strip_control_chars(&plaintext), "https://a.test/b.jpg");
    }

    #[test]
    fn test_debug_redacts_key() {
        let codec = TokenCodec::new(SECRET);
        assert!(!format!("{:?}", codec).contains("horse"));
    }
}
