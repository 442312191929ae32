//! # 加密适配模块
//!
//! [`Cipher`] 是隐写流程与对称加密之间的边界。默认实现 [`AesGcmSivCipher`]：
//!
//! - 用 Argon2id 从口令和随机 16 字节盐派生 256 位密钥；
//! - 用 AES-256-GCM-SIV 和随机 12 字节 nonce 加密；
//! - 输出 `Base64(salt || nonce || ciphertext+tag)`，解密只需要这个字符串和口令。
//!
//! Base64 字母表中没有 `|`、`{`、`}`，所以密文永远不会与帧分隔标记冲突。

use aes_gcm_siv::aead::{Aead, KeyInit};
use aes_gcm_siv::{Aes256GcmSiv, Nonce};
use argon2::{Algorithm, Argon2, Params, Version};
use base64::Engine as _;
use base64::engine::general_purpose::STANDARD;
use rand::RngCore;
use zeroize::Zeroizing;

use crate::error::{Result, StegoError};

/// Argon2 盐的字节数。
pub const SALT_LEN: usize = 16;
/// AES-GCM-SIV nonce 的字节数。
pub const NONCE_LEN: usize = 12;
/// AES-GCM-SIV 认证标签的字节数。
pub const TAG_LEN: usize = 16;

/// 基于口令的对称加密。
///
/// `decrypt` 不得 panic 也不返回错误：口令错误、密文损坏等情况一律返回 `None`，
/// 由调用方据此显示“口令错误”，而不是把它当作程序故障。
pub trait Cipher {
    fn encrypt(&self, plaintext: &str, passphrase: &str) -> Result<String>;

    fn decrypt(&self, ciphertext: &str, passphrase: &str) -> Option<String>;
}

#[derive(Debug, Clone, Default)]
pub struct AesGcmSivCipher {
    params: Params,
}

impl AesGcmSivCipher {
    /// 使用自定义的 Argon2 参数。加密和解密两端必须使用相同的参数。
    pub fn with_params(params: Params) -> Self {
        Self { params }
    }

    fn derive_key(&self, passphrase: &str, salt: &[u8]) -> Result<Zeroizing<[u8; 32]>> {
        let mut key = Zeroizing::new([0u8; 32]);
        Argon2::new(Algorithm::Argon2id, Version::V0x13, self.params.clone())
            .hash_password_into(passphrase.as_bytes(), salt, &mut *key)
            .map_err(|e| StegoError::Encryption(e.to_string()))?;
        Ok(key)
    }

    fn open(&self, ciphertext: &str, passphrase: &str) -> Option<Vec<u8>> {
        let blob = STANDARD.decode(ciphertext.trim()).ok()?;
        if blob.len() < SALT_LEN + NONCE_LEN + TAG_LEN {
            return None;
        }

        let (salt, rest) = blob.split_at(SALT_LEN);
        let (nonce, sealed) = rest.split_at(NONCE_LEN);

        let key = self.derive_key(passphrase, salt).ok()?;
        let cipher = Aes256GcmSiv::new_from_slice(&*key).ok()?;
        cipher.decrypt(Nonce::from_slice(nonce), sealed).ok()
    }
}

impl Cipher for AesGcmSivCipher {
    fn encrypt(&self, plaintext: &str, passphrase: &str) -> Result<String> {
        let mut rng = rand::rng();

        let mut salt = [0u8; SALT_LEN];
        rng.fill_bytes(&mut salt);

        let mut nonce = [0u8; NONCE_LEN];
        rng.fill_bytes(&mut nonce);

        let key = self.derive_key(passphrase, &salt)?;
        let cipher = Aes256GcmSiv::new_from_slice(&*key)
            .map_err(|e| StegoError::Encryption(e.to_string()))?;
        let sealed = cipher
            .encrypt(Nonce::from_slice(&nonce), plaintext.as_bytes())
            .map_err(|e| StegoError::Encryption(e.to_string()))?;

        let mut blob = Vec::with_capacity(SALT_LEN + NONCE_LEN + sealed.len());
        blob.extend_from_slice(&salt);
        blob.extend_from_slice(&nonce);
        blob.extend_from_slice(&sealed);

        Ok(STANDARD.encode(blob))
    }

    fn decrypt(&self, ciphertext: &str, passphrase: &str) -> Option<String> {
        let plaintext = String::from_utf8(self.open(ciphertext, passphrase)?).ok()?;
        // 空明文同样视为无法读取
        (!plaintext.is_empty()).then_some(plaintext)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn fast_cipher() -> AesGcmSivCipher {
        AesGcmSivCipher::with_params(Params::new(256, 1, 1, Some(32)).unwrap())
    }

    #[test]
    fn encrypt_decrypt_roundtrip() {
        let cipher = fast_cipher();
        let ct = cipher.encrypt("Hello, steganography! 你好", "secret123").unwrap();
        assert_eq!(
            cipher.decrypt(&ct, "secret123").as_deref(),
            Some("Hello, steganography! 你好")
        );
    }

    #[test]
    fn ciphertext_is_randomized_and_delimiter_free() {
        let cipher = fast_cipher();
        let a = cipher.encrypt("same", "key").unwrap();
        let b = cipher.encrypt("same", "key").unwrap();
        assert_ne!(a, b);
        for ct in [a, b] {
            assert!(!ct.contains('|') && !ct.contains('{') && !ct.contains('}'));
        }
    }

    #[test]
    fn wrong_passphrase_returns_none() {
        let cipher = fast_cipher();
        let ct = cipher.encrypt("secret message", "correct").unwrap();
        assert_eq!(cipher.decrypt(&ct, "wrong"), None);
    }

    #[test]
    fn malformed_ciphertext_returns_none() {
        let cipher = fast_cipher();
        assert_eq!(cipher.decrypt("not base64 at all!", "key"), None);
        assert_eq!(cipher.decrypt("", "key"), None);
        assert_eq!(cipher.decrypt(&STANDARD.encode([0u8; 20]), "key"), None);

        let ct = cipher.encrypt("secret", "key").unwrap();
        let mut blob = STANDARD.decode(&ct).unwrap();
        let last = blob.len() - 1;
        blob[last] ^= 0x01;
        assert_eq!(cipher.decrypt(&STANDARD.encode(blob), "key"), None);
    }

    #[test]
    fn empty_plaintext_is_unreadable() {
        let cipher = fast_cipher();
        let ct = cipher.encrypt("", "key").unwrap();
        assert_eq!(cipher.decrypt(&ct, "key"), None);
    }
}
