// SPDX-License-Identifier: PMPL-1.0-or-later
// Copyright (c) 2026 Jonathan D.A. Jewell (hyperpolymath) <jonathan.jewell@open.ac.uk>
//
// Transport segmentation for outbound SMS bodies.
//
// Length is measured in UTF-16 code units, which is what the Android runtime
// reports for `String.length`. A body within the single-segment limit goes
// out untouched. Longer bodies are split into concatenated-SMS parts whose
// capacity depends on the encoding the radio layer will pick:
//
//   GSM 03.38 7-bit   153 septets per part (extension chars cost 2)
//   UCS-2              67 UTF-16 units per part
//
// Parts never split a character, so concatenating them yields the input.

use serde::{Deserialize, Serialize};

/// Bodies up to this many UTF-16 units are sent as a single segment.
pub const SINGLE_SEGMENT_LIMIT: usize = 160;

/// Septets per part of a concatenated GSM 7-bit message (160 minus the UDH).
pub const GSM_PART_CAPACITY: usize = 153;

/// UTF-16 units per part of a concatenated UCS-2 message (70 minus the UDH).
pub const UCS2_PART_CAPACITY: usize = 67;

/// Character encoding the transport will use for a body.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum SegmentEncoding {
    Gsm7,
    Ucs2,
}

impl SegmentEncoding {
    /// Pick GSM 7-bit when every character is representable, else UCS-2.
    pub fn detect(body: &str) -> Self {
        if body.chars().all(|c| gsm_septets(c).is_some()) {
            Self::Gsm7
        } else {
            Self::Ucs2
        }
    }

    /// Capacity of one part of a concatenated message, in encoding units.
    pub fn part_capacity(&self) -> usize {
        match self {
            Self::Gsm7 => GSM_PART_CAPACITY,
            Self::Ucs2 => UCS2_PART_CAPACITY,
        }
    }

    fn cost(&self, c: char) -> usize {
        match self {
            Self::Gsm7 => gsm_septets(c).unwrap_or(1),
            Self::Ucs2 => c.len_utf16(),
        }
    }
}

/// Body length as the Android runtime counts it.
pub fn utf16_len(body: &str) -> usize {
    body.encode_utf16().count()
}

/// Split a body into transport-sized segments.
///
/// Returns exactly one segment (the body itself) when it fits within
/// `single_limit` UTF-16 units. Never returns an empty vector.
pub fn split_segments(body: &str, single_limit: usize) -> Vec<String> {
    if utf16_len(body) <= single_limit {
        return vec![body.to_owned()];
    }

    let encoding = SegmentEncoding::detect(body);
    let capacity = encoding.part_capacity();

    let mut segments = Vec::new();
    let mut current = String::new();
    let mut used = 0;

    for c in body.chars() {
        let cost = encoding.cost(c);
        if used + cost > capacity && !current.is_empty() {
            segments.push(std::mem::take(&mut current));
            used = 0;
        }
        current.push(c);
        used += cost;
    }
    if !current.is_empty() {
        segments.push(current);
    }

    tracing::debug!(
        ?encoding,
        parts = segments.len(),
        units = utf16_len(body),
        "split body into segments"
    );
    segments
}

/// Number of segments `body` would be sent as.
pub fn segment_count(body: &str, single_limit: usize) -> usize {
    split_segments(body, single_limit).len()
}

/// Septet cost of `c` in the GSM 03.38 alphabet, or `None` if unrepresentable.
fn gsm_septets(c: char) -> Option<usize> {
    match c {
        'A'..='Z' | 'a'..='z' | '0'..='9' => Some(1),
        ' ' | '!' | '"' | '#' | '%' | '&' | '\'' | '(' | ')' | '*' | '+' | ',' | '-' | '.'
        | '/' | ':' | ';' | '<' | '=' | '>' | '?' | '@' | '_' | '\n' | '\r' => Some(1),
        '£' | '$' | '¥' | 'è' | 'é' | 'ù' | 'ì' | 'ò' | 'Ç' | 'Ø' | 'ø' | 'Å' | 'å' | 'Δ'
        | 'Φ' | 'Γ' | 'Λ' | 'Ω' | 'Π' | 'Ψ' | 'Σ' | 'Θ' | 'Ξ' | 'Æ' | 'æ' | 'ß' | 'É'
        | '¤' | '¡' | 'Ä' | 'Ö' | 'Ñ' | 'Ü' | '§' | '¿' | 'ä' | 'ö' | 'ñ' | 'ü' | 'à' => {
            Some(1)
        }
        // Extension table, sent as ESC + char.
        '\u{0C}' | '^' | '{' | '}' | '\\' | '[' | '~' | ']' | '|' | '€' => Some(2),
        _ => None,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn short_body_is_one_segment() {
        let body = "a".repeat(160);
        let parts = split_segments(&body, SINGLE_SEGMENT_LIMIT);
        assert_eq!(parts, vec![body]);
    }

    #[test]
    fn empty_body_is_one_segment() {
        assert_eq!(split_segments("", SINGLE_SEGMENT_LIMIT), vec![String::new()]);
    }

    #[test]
    fn long_gsm_body_splits_at_153() {
        let body = "x".repeat(161);
        let parts = split_segments(&body, SINGLE_SEGMENT_LIMIT);
        assert_eq!(parts.len(), 2);
        assert_eq!(parts[0].len(), 153);
        assert_eq!(parts[1].len(), 8);
        assert_eq!(parts.concat(), body);
    }

    #[test]
    fn extension_chars_cost_two_septets() {
        // 80 braces = 160 septets, plus one more char to cross the limit.
        let body = format!("{}a", "{".repeat(160));
        let parts = split_segments(&body, SINGLE_SEGMENT_LIMIT);
        assert_eq!(SegmentEncoding::detect(&body), SegmentEncoding::Gsm7);
        // 76 braces per part (152 septets), the 77th would overflow.
        assert_eq!(parts[0].chars().count(), 76);
        assert_eq!(parts.concat(), body);
    }

    #[test]
    fn non_gsm_body_uses_ucs2_capacity() {
        let body = "ş".repeat(200);
        assert_eq!(SegmentEncoding::detect(&body), SegmentEncoding::Ucs2);
        let parts = split_segments(&body, SINGLE_SEGMENT_LIMIT);
        assert_eq!(parts.len(), 3);
        assert!(parts.iter().all(|p| utf16_len(p) <= UCS2_PART_CAPACITY));
        assert_eq!(parts.concat(), body);
    }

    #[test]
    fn surrogate_pairs_are_not_split() {
        // Each emoji is two UTF-16 units; 67 is odd so a naive split would cut one.
        let body = "😀".repeat(100);
        let parts = split_segments(&body, SINGLE_SEGMENT_LIMIT);
        assert!(parts.len() > 1);
        assert!(parts.iter().all(|p| utf16_len(p) <= UCS2_PART_CAPACITY));
        assert_eq!(parts[0].chars().count(), 33);
        assert_eq!(parts.concat(), body);
    }

    #[test]
    fn length_counts_utf16_units() {
        // 80 emoji = 160 units: still a single segment.
        assert_eq!(segment_count(&"😀".repeat(80), SINGLE_SEGMENT_LIMIT), 1);
        assert!(segment_count(&"😀".repeat(81), SINGLE_SEGMENT_LIMIT) > 1);
    }
}
