//! windows-1252 word decoding.
//!
//! The host delivers each word as raw bytes in the single-byte Western
//! European encoding. Every byte value maps to a character in windows-1252,
//! so decoding is total and round-trips back to the original bytes.

use encoding_rs::WINDOWS_1252;

/// Decodes one raw word from the host.
pub fn decode_word(raw: &[u8]) -> String {
    let (text, _, _) = WINDOWS_1252.decode(raw);
    text.into_owned()
}

/// Encodes a decoded word back to windows-1252 bytes.
pub fn encode_word(word: &str) -> Vec<u8> {
    let (bytes, _, _) = WINDOWS_1252.encode(word);
    bytes.into_owned()
}
