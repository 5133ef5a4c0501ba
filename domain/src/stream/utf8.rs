//! Incremental, lossy UTF-8 decoding.

/// Decodes a byte stream chunk by chunk.
///
/// A character split across two chunks is held back until its remaining
/// bytes arrive. Invalid sequences become U+FFFD; decoding never fails.
#[derive(Debug, Default)]
pub struct Utf8Carry {
    pending: Vec<u8>,
}

impl Utf8Carry {
    pub fn new() -> Self {
        Self::default()
    }

    /// Decode `chunk`, appending complete characters to `out`.
    pub fn decode(&mut self, chunk: &[u8], out: &mut String) {
        self.pending.extend_from_slice(chunk);

        let mut start = 0;
        while start < self.pending.len() {
            match std::str::from_utf8(&self.pending[start..]) {
                Ok(text) => {
                    out.push_str(text);
                    start = self.pending.len();
                }
                Err(error) => {
                    let valid_end = start + error.valid_up_to();
                    out.push_str(&String::from_utf8_lossy(&self.pending[start..valid_end]));
                    match error.error_len() {
                        Some(invalid) => {
                            out.push(char::REPLACEMENT_CHARACTER);
                            start = valid_end + invalid;
                        }
                        // Truncated sequence at the end: wait for the next chunk.
                        None => {
                            start = valid_end;
                            break;
                        }
                    }
                }
            }
        }

        self.pending.drain(..start);
    }

    /// Number of bytes waiting for the rest of their character.
    pub fn pending_len(&self) -> usize {
        self.pending.len()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn decode_all(chunks: &[&[u8]]) -> String {
        let mut carry = Utf8Carry::new();
        let mut out = String::new();
        for chunk in chunks {
            carry.decode(chunk, &mut out);
        }
        assert_eq!(carry.pending_len(), 0);
        out
    }

    #[test]
    fn ascii_passes_through() {
        assert_eq!(decode_all(&[b"hello", b" world"]), "hello world");
    }

    #[test]
    fn multibyte_split_is_carried_over() {
        // 'é' = 0xC3 0xA9, '日' = 0xE6 0x97 0xA5
        let mut carry = Utf8Carry::new();
        let mut out = String::new();
        carry.decode(&[b'a', 0xC3], &mut out);
        assert_eq!(out, "a");
        assert_eq!(carry.pending_len(), 1);
        carry.decode(&[0xA9, 0xE6, 0x97], &mut out);
        assert_eq!(out, "aé");
        carry.decode(&[0xA5], &mut out);
        assert_eq!(out, "aé日");
        assert_eq!(carry.pending_len(), 0);
    }

    #[test]
    fn emoji_one_byte_at_a_time() {
        let bytes = "👋🌍".as_bytes();
        let chunks: Vec<&[u8]> = bytes.chunks(1).collect();
        assert_eq!(decode_all(&chunks), "👋🌍");
    }

    #[test]
    fn invalid_bytes_are_replaced() {
        assert_eq!(decode_all(&[&[b'a', 0xFF, b'b']]), "a\u{FFFD}b");
    }

    #[test]
    fn truncated_tail_is_held_back() {
        let mut carry = Utf8Carry::new();
        let mut out = String::new();
        carry.decode(&[b'x', 0xE6, 0x97], &mut out);
        assert_eq!(out, "x");
        assert_eq!(carry.pending_len(), 2);
    }
}
