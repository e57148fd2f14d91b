//! Digest encoder: normal form → (identifier, hash)
//!
//! The normal form is salted with one trailing NUL byte and digested with
//! MD5. The 16 digest bytes are read as four little-endian `u32` words; the
//! last word is the hash, the last two words form the 64-bit value spelled
//! out as the base-32 identifier.
//!
//! The identifier has no fixed width. It uses exactly as many digits as the
//! value needs, and is never padded.

use md5::{Digest as _, Md5};

use crate::{Error, Result, SqlId};

/// Base-32 digits. `e`, `i`, `l` and `o` are left out so identifiers can't be
/// misread as other letters or digits.
pub const ALPHABET: &[u8; 32] = b"0123456789abcdfghjkmnpqrstuvwxyz";

/// 128-bit digest of a normal form, as four little-endian words
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct Digest {
    words: [u32; 4],
}

impl Digest {
    /// Digest `normal_form` followed by a single `0x00` byte.
    pub fn of(normal_form: &str) -> Self {
        let mut hasher = Md5::new();
        hasher.update(normal_form.as_bytes());
        hasher.update([0u8]);
        let bytes = hasher.finalize();

        let mut words = [0u32; 4];
        for (word, chunk) in words.iter_mut().zip(bytes.chunks_exact(4)) {
            *word = u32::from_le_bytes([chunk[0], chunk[1], chunk[2], chunk[3]]);
        }
        Digest { words }
    }

    /// All four words in digest order
    pub fn words(&self) -> [u32; 4] {
        self.words
    }

    /// The last word
    pub fn hash_value(&self) -> u32 {
        self.words[3]
    }

    /// `word2 * 2^32 + word3`
    pub fn id_value(&self) -> u64 {
        (u64::from(self.words[2]) << 32) | u64::from(self.words[3])
    }

    pub fn identifier(&self) -> String {
        to_base32(self.id_value())
    }
}

/// Compute identifier and hash of an already canonicalized statement.
pub fn encode(normal_form: &str) -> SqlId {
    let digest = Digest::of(normal_form);
    SqlId {
        id: digest.identifier(),
        hash: digest.hash_value(),
    }
}

/// Recover the 32-bit value encoded by an identifier.
///
/// The identifier's value is reduced modulo 2^32, so for any statement
/// `decode(&encode(s).id) == encode(s).hash`.
///
/// # Errors
/// `EmptyIdentifier` for `""`, `InvalidIdentifier` for any character
/// outside [`ALPHABET`].
pub fn decode(identifier: &str) -> Result<u32> {
    if identifier.is_empty() {
        return Err(Error::EmptyIdentifier);
    }

    let mut value: u64 = 0;
    for (position, ch) in identifier.chars().enumerate() {
        let digit = ALPHABET
            .iter()
            .position(|&a| char::from(a) == ch)
            .ok_or(Error::InvalidIdentifier { ch, position })?;
        value = value.wrapping_mul(32).wrapping_add(digit as u64);
    }
    Ok(value as u32)
}

/// Base-32 digits of `value`, most significant first, without padding.
/// Zero is `"0"`.
pub fn to_base32(mut value: u64) -> String {
    let mut digits = Vec::with_capacity(13);
    loop {
        digits.push(ALPHABET[(value % 32) as usize]);
        value /= 32;
        if value == 0 {
            break;
        }
    }
    digits.iter().rev().map(|&b| char::from(b)).collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_known_identifiers() {
        assert_eq!(encode("select 1").id, "y30pf6xwqt3x");
        assert_eq!(encode("select * from table").id, "9nq4tw9gnts86");
    }

    #[test]
    fn test_known_hashes() {
        assert_eq!(encode("select 1").hash, 3150668925);
        assert_eq!(encode("select * from table").hash, 1598873862);
    }

    #[test]
    fn test_empty_string_is_fixed() {
        let sqlid = encode("");
        assert_eq!(sqlid.id, "90d7qtpstzpag");
        assert_eq!(sqlid.hash, 1906300239);
    }

    #[test]
    fn test_trailing_newline_changes_identifier() {
        assert_eq!(encode("select 1\n").id, "b652grw6s9ur0");
        assert_ne!(encode("select 1\n"), encode("select 1"));
    }

    #[test]
    fn test_digest_words() {
        let digest = Digest::of("select * from t where x = ? ");
        assert_eq!(
            digest.words(),
            [1594370049, 3449471819, 2789317473, 2163409962]
        );
        assert_eq!(digest.hash_value(), 2163409962);
        assert_eq!(digest.identifier(), "achcvc60g611a");
    }

    #[test]
    fn test_base32_boundaries() {
        assert_eq!(to_base32(0), "0");
        assert_eq!(to_base32(31), "z");
        assert_eq!(to_base32(32), "10");
        assert_eq!(to_base32(1 << 60), "1000000000000");
        assert_eq!(to_base32(u64::MAX), "gzzzzzzzzzzzz");
    }

    #[test]
    fn test_alphabet_has_no_ambiguous_letters() {
        assert_eq!(ALPHABET.len(), 32);
        for banned in [b'e', b'i', b'l', b'o'] {
            assert!(!ALPHABET.contains(&banned));
        }
    }

    #[test]
    fn test_identifiers_use_alphabet_only() {
        for n in 0..500 {
            let sqlid = encode(&format!("select {} from t{}", n, n * 7));
            assert!(
                sqlid.id.bytes().all(|b| ALPHABET.contains(&b)),
                "bad identifier {}",
                sqlid.id
            );
            assert!(!sqlid.id.is_empty() && sqlid.id.len() <= 13);
        }
    }

    #[test]
    fn test_decode_roundtrip_matches_hash() {
        for sql in ["", "select 1", "select * from table", "with ^0001^ as (x)\n"] {
            let sqlid = encode(sql);
            assert_eq!(decode(&sqlid.id).unwrap(), sqlid.hash, "sql: {:?}", sql);
        }
    }

    #[test]
    fn test_decode_small_values() {
        assert_eq!(decode("0").unwrap(), 0);
        assert_eq!(decode("10").unwrap(), 32);
        assert_eq!(decode("000z").unwrap(), 31);
        // 2^60 reduced modulo 2^32
        assert_eq!(decode("1000000000000").unwrap(), 0);
    }

    #[test]
    fn test_decode_rejects_foreign_characters() {
        assert_eq!(
            decode("abce"),
            Err(Error::InvalidIdentifier { ch: 'e', position: 3 })
        );
        assert_eq!(
            decode("A1"),
            Err(Error::InvalidIdentifier { ch: 'A', position: 0 })
        );
        assert_eq!(decode(""), Err(Error::EmptyIdentifier));
    }
}
