// Copyright 2026 Tree xie.
//
// Licensed under the Apache License, Version 2.0 (the "License");
// you may not use this file except in compliance with the License.
// You may obtain a copy of the License at
//
// http://www.apache.org/licenses/LICENSE-2.0
//
// Unless required by applicable law or agreed to in writing, software
// distributed under the License is distributed on an "AS IS" BASIS,
// WITHOUT WARRANTIES OR CONDITIONS OF ANY KIND, either express or implied.
// See the License for the specific language governing permissions and
// limitations under the License.

//! Turns pasted text into raw bytes for the decoder.
//!
//! Accepted forms, tried in order:
//! - hex: `08 96 01`, `0x08 0x96 0x01`, `\x08\x96\x01` (whitespace and prefixes ignored)
//! - Base64: standard or URL-safe alphabet, whitespace tolerant, padding optional

use crate::error::Error;
use base64::Engine;
use base64::alphabet;
use base64::engine::{DecodePaddingMode, GeneralPurpose, GeneralPurposeConfig};

type Result<T, E = Error> = std::result::Result<T, E>;

/// Minimum share of printable bytes for data to count as text, as a ratio (4/5 = 80%)
const TEXT_THRESHOLD: (usize, usize) = (4, 5);

/// Only this many leading bytes are inspected by [`looks_like_text`]
const TEXT_SAMPLE_SIZE: usize = 1024;

const BASE64: GeneralPurpose = GeneralPurpose::new(
    &alphabet::STANDARD,
    GeneralPurposeConfig::new()
        .with_decode_allow_trailing_bits(true)
        .with_decode_padding_mode(DecodePaddingMode::Indifferent),
);

/// Parse hex or Base64 text into bytes
pub fn parse(text: &str) -> Result<Vec<u8>> {
    if let Some(bytes) = try_parse_hex(text) {
        return Ok(bytes);
    }
    if let Some(bytes) = try_parse_base64(text) {
        return Ok(bytes);
    }
    Err(Error::UnrecognizedInputFormat)
}

/// Parse hex digits, skipping whitespace and inline `0x` / `\x` prefixes.
/// Empty or whitespace-only text yields no bytes.
pub fn try_parse_hex(text: &str) -> Option<Vec<u8>> {
    let chars: Vec<char> = text.chars().collect();
    let mut digits = Vec::with_capacity(chars.len());

    let mut i = 0;
    while i < chars.len() {
        let c = chars[i];
        let next_is_x = matches!(chars.get(i + 1), Some('x' | 'X'));
        if c.is_whitespace() {
            i += 1;
        } else if (c == '\\' || c == '0') && next_is_x {
            i += 2;
        } else if let Some(digit) = c.to_digit(16) {
            digits.push(digit as u8);
            i += 1;
        } else {
            return None;
        }
    }

    if !digits.len().is_multiple_of(2) {
        return None;
    }

    Some(digits.chunks_exact(2).map(|pair| (pair[0] << 4) | pair[1]).collect())
}

/// Decode Base64 in either alphabet, padding added as needed.
/// Empty or whitespace-only text yields no bytes.
pub fn try_parse_base64(text: &str) -> Option<Vec<u8>> {
    let mut normalized: String = text
        .chars()
        .filter(|c| !c.is_whitespace())
        .map(|c| match c {
            '-' => '+',
            '_' => '/',
            c => c,
        })
        .collect();

    if normalized.is_empty() {
        return Some(Vec::new());
    }

    while !normalized.len().is_multiple_of(4) {
        normalized.push('=');
    }

    BASE64.decode(normalized).ok()
}

/// Heuristic: is this data mostly printable ASCII?
///
/// Empty data counts as text, any NUL byte makes it binary. Otherwise at
/// least 80% of the first 1024 bytes must be printable or `\n`, `\r`, `\t`.
pub fn looks_like_text(data: &[u8]) -> bool {
    if data.is_empty() {
        return true;
    }

    let sample = &data[..data.len().min(TEXT_SAMPLE_SIZE)];
    let mut printable = 0usize;
    for &b in sample {
        if b == 0 {
            return false;
        }
        if (32..=126).contains(&b) || matches!(b, b'\n' | b'\r' | b'\t') {
            printable += 1;
        }
    }

    let (numerator, denominator) = TEXT_THRESHOLD;
    printable * denominator >= sample.len() * numerator
}
