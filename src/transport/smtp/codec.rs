//! Wire encoding of message bodies
//!
//! Before transmission a compiled body is normalized to CRLF line endings
//! and dot-stuffed per RFC 5321 section 4.5.2, so that no line of the
//! payload can be mistaken for the end-of-data marker.

/// Normalizes line endings to CRLF
///
/// Lone LF and lone CR both become CRLF; existing CRLF pairs are kept.
pub(crate) fn normalize_eol(input: &[u8]) -> Vec<u8> {
    let mut out = Vec::with_capacity(input.len());
    let mut i = 0;
    while i < input.len() {
        match input[i] {
            b'\r' => {
                out.extend_from_slice(b"\r\n");
                if input.get(i + 1) == Some(&b'\n') {
                    i += 1;
                }
            }
            b'\n' => out.extend_from_slice(b"\r\n"),
            byte => out.push(byte),
        }
        i += 1;
    }
    out
}

/// Doubles every dot that starts a line
///
/// The input must already use CRLF line endings.
pub(crate) fn dot_stuff(input: &[u8]) -> Vec<u8> {
    let mut out = Vec::with_capacity(input.len());
    let mut at_line_start = true;
    for &byte in input {
        if at_line_start && byte == b'.' {
            out.push(b'.');
        }
        out.push(byte);
        at_line_start = byte == b'\n';
    }
    out
}

/// Prepares a compiled body for the DATA phase
pub(crate) fn encode_body(input: &[u8]) -> Vec<u8> {
    dot_stuff(&normalize_eol(input))
}
