//! Permutation cipher over symbol sequences.
//!
//! Encryption moves symbol `i` to position `perm[i]`; decryption applies the
//! same rule with the inverse permutation. Strings are handled per Unicode
//! scalar value, so multi-byte characters are never split.

use crate::error::Result;
use crate::key::ChaosKey;
use crate::permutation::{check_len, Permutation};

/// `out[perm[i]] = message[i]`.
pub fn encrypt<T: Clone>(message: &[T], perm: &Permutation) -> Result<Vec<T>> {
    perm.relocate(message)
}

/// Inverse of [`encrypt`]: `out[i] = ciphertext[perm[i]]`.
pub fn decrypt<T: Clone>(ciphertext: &[T], perm: &Permutation) -> Result<Vec<T>> {
    check_len(perm.len(), ciphertext.len())?;
    // relocating by the inverse is a gather by `perm`
    Ok(perm.gather(ciphertext))
}

pub fn encrypt_str(message: &str, perm: &Permutation) -> Result<String> {
    let chars: Vec<char> = message.chars().collect();
    Ok(encrypt(&chars, perm)?.into_iter().collect())
}

pub fn decrypt_str(ciphertext: &str, perm: &Permutation) -> Result<String> {
    let chars: Vec<char> = ciphertext.chars().collect();
    Ok(decrypt(&chars, perm)?.into_iter().collect())
}

/// Text cipher that derives a fresh permutation, sized to each message,
/// from a [`ChaosKey`].
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct TextCipher {
    key: ChaosKey,
}

impl TextCipher {
    pub fn new(key: ChaosKey) -> Self {
        Self { key }
    }

    pub fn key(&self) -> &ChaosKey {
        &self.key
    }

    pub fn encrypt(&self, message: &str) -> Result<String> {
        let chars: Vec<char> = message.chars().collect();
        if chars.is_empty() {
            return Ok(String::new());
        }
        let perm = self.key.permutation(chars.len())?;
        Ok(encrypt(&chars, &perm)?.into_iter().collect())
    }

    pub fn decrypt(&self, ciphertext: &str) -> Result<String> {
        let chars: Vec<char> = ciphertext.chars().collect();
        if chars.is_empty() {
            return Ok(String::new());
        }
        let perm = self.key.permutation(chars.len())?;
        Ok(decrypt(&chars, &perm)?.into_iter().collect())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::ChaosError;
    use crate::map::ChaoticMap;
    use pretty_assertions::assert_eq;

    #[test]
    fn three_symbol_example() {
        let perm = Permutation::from_vec(vec![2, 0, 1]).unwrap();
        assert_eq!(encrypt_str("abc", &perm).unwrap(), "bca");
        assert_eq!(decrypt_str("bca", &perm).unwrap(), "abc");
    }

    #[test]
    fn identity_is_noop() {
        let perm = Permutation::identity(5);
        assert_eq!(encrypt_str("hello", &perm).unwrap(), "hello");
        assert_eq!(decrypt_str("hello", &perm).unwrap(), "hello");
    }

    #[test]
    fn length_mismatch() {
        let perm = Permutation::identity(3);
        assert_eq!(
            encrypt_str("abcd", &perm),
            Err(ChaosError::LengthMismatch {
                expected: 3,
                actual: 4
            })
        );
        assert!(decrypt(&[1u8, 2], &perm).is_err());
    }

    #[test]
    fn generic_symbols_round_trip() {
        let perm = ChaosKey::new(ChaoticMap::tent(), 0.61).permutation(40).unwrap();
        let message: Vec<u32> = (100..140).collect();
        let ciphertext = encrypt(&message, &perm).unwrap();
        assert_ne!(ciphertext, message);
        assert_eq!(decrypt(&ciphertext, &perm).unwrap(), message);
    }

    #[test]
    fn keyed_cipher_handles_multibyte_text() {
        let cipher = TextCipher::new(ChaosKey::new(ChaoticMap::logistic(), 0.1));
        let message = "混沌置乱: chaos permutation ✓";
        let ciphertext = cipher.encrypt(message).unwrap();
        assert_eq!(ciphertext.chars().count(), message.chars().count());
        assert_ne!(ciphertext, message);
        assert_eq!(cipher.decrypt(&ciphertext).unwrap(), message);
    }

    #[test]
    fn keyed_cipher_empty_message() {
        let cipher = TextCipher::new(ChaosKey::new(ChaoticMap::chebyshev(), 0.2));
        assert_eq!(cipher.encrypt("").unwrap(), "");
        assert_eq!(cipher.decrypt("").unwrap(), "");
    }

    #[test]
    fn wrong_key_does_not_decrypt() {
        let message = "the quick brown fox jumps over the lazy dog";
        let ciphertext = TextCipher::new(ChaosKey::new(ChaoticMap::logistic(), 0.1))
            .encrypt(message)
            .unwrap();
        let other = TextCipher::new(ChaosKey::new(ChaoticMap::logistic(), 0.1000001))
            .decrypt(&ciphertext)
            .unwrap();
        assert_ne!(other, message);
    }
}
