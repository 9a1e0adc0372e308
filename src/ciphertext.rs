//! The target ciphertext and the collaborators around it: separator
//! splitting, doublet detection, and random baseline generation.

use rand::rngs::OsRng;
use rand::RngCore;

use crate::error::{AnalysisError, Result};

/// The fourth, unsolved Kryptos passage (97 uppercase letters).
pub const K4: &str = concat!(
    "OBKR",
    "UOXOGHULBSOLIFBBWFLRVQQPRNGKSSO",
    "TWTQSJQSSEKZZWATJKLUDIAWINFBNYP",
    "VTTMZFPKWGDKZXTJCDIGKUHUAUEKCAR",
);

const CHARSET: &[u8; 26] = b"ABCDEFGHIJKLMNOPQRSTUVWXYZ";

/// Splits the ciphertext on a separator, dropping empty segments.
pub fn split_segments(ciphertext: &str, separator: char) -> Vec<String> {
    ciphertext
        .split(separator)
        .filter(|segment| !segment.is_empty())
        .map(str::to_string)
        .collect()
}

/// Whether the separator occurs twice in a row anywhere in the ciphertext.
///
/// Such a ciphertext has no unambiguous segmentation for this separator
/// and is skipped by the scheduler.
pub fn has_doublet_separator(ciphertext: &str, separator: char) -> bool {
    let sep = separator as u8;
    ciphertext
        .as_bytes()
        .windows(2)
        .any(|pair| pair[0] == sep && pair[1] == sep)
}

/// Generates a random uppercase string of the given length (a pseudo-K4).
///
/// Letters are drawn uniformly from OS entropy via rejection sampling.
/// An entropy source failure is fatal to the caller.
pub fn random_ciphertext(len: usize) -> Result<String> {
    // largest multiple of 26 that fits in a byte; values above it would
    // bias the modulo
    const LIMIT: u8 = 234;

    let mut out = String::with_capacity(len);
    let mut buf = [0u8; 128];

    while out.len() < len {
        OsRng
            .try_fill_bytes(&mut buf)
            .map_err(|err| AnalysisError::Entropy(err.to_string()))?;

        for &byte in buf.iter() {
            if byte < LIMIT {
                out.push(CHARSET[(byte % 26) as usize] as char);
                if out.len() == len {
                    break;
                }
            }
        }
    }

    Ok(out)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_k4_is_97_uppercase_letters() {
        assert_eq!(K4.len(), 97);
        assert!(K4.bytes().all(|b| b.is_ascii_uppercase()));
    }

    #[test]
    fn test_split_drops_empty_segments() {
        assert_eq!(split_segments("AAXBBXC", 'X'), vec!["AA", "BB", "C"]);
        assert_eq!(split_segments("XAAX", 'X'), vec!["AA"]);
        assert_eq!(split_segments("AABB", 'X'), vec!["AABB"]);
        assert!(split_segments("XXX", 'X').is_empty());
    }

    #[test]
    fn test_doublet_detection() {
        assert!(has_doublet_separator("AAXXBB", 'X'));
        assert!(!has_doublet_separator("AAXBXB", 'X'));
        assert!(!has_doublet_separator("X", 'X'));
        // K4 contains "SS", so 'S' is ambiguous
        assert!(has_doublet_separator(K4, 'S'));
        assert!(!has_doublet_separator(K4, 'W'));
    }

    #[test]
    fn test_random_ciphertext_length_and_charset() {
        let generated = random_ciphertext(97).unwrap();
        assert_eq!(generated.len(), 97);
        assert!(generated.bytes().all(|b| b.is_ascii_uppercase()));

        assert_eq!(random_ciphertext(0).unwrap(), "");
    }
}
