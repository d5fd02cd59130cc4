// SPDX-License-Identifier: MIT OR Apache-2.0

//! PEM-style text armoring of binary envelopes: unpadded base64 between
//! begin/end marker lines, wrapped at 64 columns.
use base64::Engine;
use base64::engine::general_purpose::STANDARD_NO_PAD;
use thiserror::Error;

const HEADER: &str = "-----BEGIN ALEXANDRIA-----";
const FOOTER: &str = "-----END ALEXANDRIA-----";
const LINE_LENGTH: usize = 64;

/// Renders an envelope as armored text.
pub fn armor(bytes: &[u8]) -> String {
    let encoded = STANDARD_NO_PAD.encode(bytes);

    let mut out = String::with_capacity(
        HEADER.len() + FOOTER.len() + encoded.len() + encoded.len() / LINE_LENGTH + 2,
    );
    out.push_str(HEADER);
    for chunk in encoded.as_bytes().chunks(LINE_LENGTH) {
        out.push('\n');
        // Chunks of an ASCII string stay ASCII.
        out.push_str(std::str::from_utf8(chunk).expect("base64 output is ascii"));
    }
    out.push('\n');
    out.push_str(FOOTER);
    out
}

/// Parses armored text back into envelope bytes. Surrounding whitespace and
/// line breaks inside the base64 body are tolerated.
pub fn dearmor(text: &str) -> Result<Vec<u8>, ArmorError> {
    let text = text.trim();
    let body = text
        .strip_prefix(HEADER)
        .ok_or(ArmorError::MissingHeader)?
        .strip_suffix(FOOTER)
        .ok_or(ArmorError::MissingFooter)?;

    let encoded: String = body.split_whitespace().collect();
    Ok(STANDARD_NO_PAD.decode(encoded)?)
}

/// Whether a piece of text looks like an armored envelope. Used to pick
/// between binary and armored input without a separate flag.
pub fn is_armored(text: &str) -> bool {
    text.trim_start().starts_with(HEADER)
}

#[derive(Debug, Error)]
pub enum ArmorError {
    #[error("missing armor header line")]
    MissingHeader,

    #[error("missing armor footer line")]
    MissingFooter,

    #[error("invalid armor body: {0}")]
    Base64(#[from] base64::DecodeError),
}

#[cfg(test)]
mod tests {
    use crate::crypto::Rng;

    use super::{ArmorError, armor, dearmor, is_armored};

    #[test]
    fn round_trip() {
        let rng = Rng::from_seed([23; 32]);
        for len in [0, 1, 47, 48, 49, 200] {
            let bytes: [u8; 256] = rng.random_array().unwrap();
            let text = armor(&bytes[..len]);
            assert!(is_armored(&text));
            assert_eq!(dearmor(&text).unwrap(), &bytes[..len]);
        }
    }

    #[test]
    fn lines_are_wrapped() {
        let text = armor(&[0xAA; 120]);
        let mut lines = text.lines();
        assert_eq!(lines.next(), Some("-----BEGIN ALEXANDRIA-----"));
        let body: Vec<&str> = text
            .lines()
            .filter(|line| !line.starts_with("-----"))
            .collect();
        assert!(!body.is_empty());
        for line in &body[..body.len() - 1] {
            assert_eq!(line.len(), 64);
        }
        assert!(body[body.len() - 1].len() <= 64);
        assert_eq!(text.lines().last(), Some("-----END ALEXANDRIA-----"));
    }

    #[test]
    fn rejects_missing_markers() {
        assert!(matches!(dearmor("QUJD"), Err(ArmorError::MissingHeader)));
        assert!(matches!(
            dearmor("-----BEGIN ALEXANDRIA-----\nQUJD"),
            Err(ArmorError::MissingFooter)
        ));
        assert!(matches!(
            dearmor("-----BEGIN ALEXANDRIA-----\n!!!\n-----END ALEXANDRIA-----"),
            Err(ArmorError::Base64(_))
        ));
    }

    #[test]
    fn tolerates_surrounding_whitespace() {
        let text = format!("\n  {}\n", armor(b"Hello World"));
        assert!(is_armored(&text));
        assert_eq!(dearmor(&text).unwrap(), b"Hello World");
    }
}
