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

use crate::proto::{FieldNode, WireType};

/// Longest undecodable payload whose bytes are spelled out in the summary
const MAX_INLINE_BYTES: usize = 8;

/// Decode a raw varint span as the standard base-128 value, reinterpreted as signed 64-bit
pub fn varint_to_value(raw: &[u8]) -> i64 {
    let mut result: u64 = 0;
    let mut shift = 0;

    for &byte in raw {
        if shift >= 64 {
            break;
        }
        result |= u64::from(byte & 0x7F) << shift;
        if byte & 0x80 == 0 {
            break;
        }
        shift += 7;
    }

    result as i64
}

pub(crate) fn leaf_label(node: &FieldNode) -> String {
    match node.nested_children() {
        Some(children) => format!(
            "#{} [{}] ← {} children",
            node.field_number(),
            node.wire_type(),
            children.len()
        ),
        None => format!("#{} [{}] → {}", node.field_number(), node.wire_type(), payload_text(node)),
    }
}

pub(crate) fn leaf_summary(node: &FieldNode) -> String {
    let raw = node.raw_value();
    if let Some(children) = node.nested_children() {
        return format!("nested · {} children · length {}", children.len(), raw.len());
    }

    match node.wire_type() {
        WireType::Varint => format!("Varint · {} · length {}", varint_text(raw), raw.len()),
        WireType::Fixed32 => match fixed32(raw) {
            Some(value) => format!("Fixed32 · 0x{value:08X} · length {}", raw.len()),
            None => bytes_fallback(raw.len()),
        },
        WireType::Fixed64 => match fixed64(raw) {
            Some(value) => format!("Fixed64 · 0x{value:016X} · length {}", raw.len()),
            None => bytes_fallback(raw.len()),
        },
        WireType::LengthDelimited => length_delimited_summary(raw),
    }
}

fn length_delimited_summary(raw: &[u8]) -> String {
    if raw.is_empty() {
        return "length 0".to_string();
    }
    if let Some(text) = try_utf8(raw) {
        return format!("UTF8 · \"{text}\" · length {}", raw.len());
    }
    if raw.len() <= MAX_INLINE_BYTES {
        return format!("Bytes · {} · length {}", hex_dashed(raw), raw.len());
    }
    format!("Bytes · length {}", raw.len())
}

/// Value part of a leaf label
fn payload_text(node: &FieldNode) -> String {
    let raw = node.raw_value();
    match node.wire_type() {
        WireType::Varint => varint_text(raw),
        WireType::Fixed32 => fixed32(raw).map_or_else(|| format!("({} bytes)", raw.len()), |v| format!("0x{v:08X} (LE)")),
        WireType::Fixed64 => fixed64(raw).map_or_else(|| format!("({} bytes)", raw.len()), |v| format!("0x{v:016X} (LE)")),
        WireType::LengthDelimited => {
            if raw.is_empty() {
                "length 0".to_string()
            } else if let Some(text) = try_utf8(raw) {
                format!("UTF8 \"{text}\" ({} bytes)", raw.len())
            } else {
                format!("{} bytes [{}]", raw.len(), hex_dashed(raw))
            }
        }
    }
}

pub(crate) fn array_label(field_number: u64) -> String {
    format!("#{field_number} array")
}

pub(crate) fn array_summary(count: usize, total_length: usize) -> String {
    format!("array · {count} elements · length {total_length}")
}

/// Format: "08 96 01" (space-separated uppercase pairs)
pub(crate) fn raw_preview(bytes: &[u8]) -> String {
    bytes.iter().map(|b| format!("{b:02X}")).collect::<Vec<_>>().join(" ")
}

fn hex_dashed(bytes: &[u8]) -> String {
    bytes.iter().map(|b| format!("{b:02X}")).collect::<Vec<_>>().join("-")
}

fn varint_text(raw: &[u8]) -> String {
    let value = varint_to_value(raw);
    format!("{value} (0x{value:X})")
}

fn fixed32(raw: &[u8]) -> Option<u32> {
    raw.try_into().ok().map(u32::from_le_bytes)
}

fn fixed64(raw: &[u8]) -> Option<u64> {
    raw.try_into().ok().map(u64::from_le_bytes)
}

fn bytes_fallback(len: usize) -> String {
    format!("{len} bytes · length {len}")
}

/// Text only when the bytes are valid UTF-8 and hold no control characters
/// other than newline, carriage return and tab.
fn try_utf8(raw: &[u8]) -> Option<&str> {
    let text = simdutf8::basic::from_utf8(raw).ok()?;
    text.chars()
        .all(|c| !c.is_control() || c == '\n' || c == '\r' || c == '\t')
        .then_some(text)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn leaf(wire_type: WireType, raw: &[u8]) -> FieldNode {
        FieldNode::leaf(1, wire_type, raw.to_vec())
    }

    #[test]
    fn test_varint_to_value() {
        assert_eq!(varint_to_value(&[0x01]), 1);
        assert_eq!(varint_to_value(&[0xAC, 0x02]), 300);
        assert_eq!(varint_to_value(&[0x00]), 0);
        assert_eq!(varint_to_value(&[0x96, 0x01]), 150);
        // u64::MAX shows as -1
        assert_eq!(varint_to_value(&[0xFF, 0xFF, 0xFF, 0xFF, 0xFF, 0xFF, 0xFF, 0xFF, 0xFF, 0x01]), -1);
        assert_eq!(varint_to_value(&[]), 0);
    }

    #[test]
    fn test_varint_summary() {
        let node = leaf(WireType::Varint, &[0x96, 0x01]);
        assert_eq!(leaf_summary(&node), "Varint · 150 (0x96) · length 2");
        assert_eq!(leaf_label(&node), "#1 [Varint] → 150 (0x96)");

        let negative = leaf(WireType::Varint, &[0xFF, 0xFF, 0xFF, 0xFF, 0xFF, 0xFF, 0xFF, 0xFF, 0xFF, 0x01]);
        assert_eq!(leaf_summary(&negative), "Varint · -1 (0xFFFFFFFFFFFFFFFF) · length 10");
    }

    #[test]
    fn test_fixed_summary() {
        let node = leaf(WireType::Fixed32, &[0x78, 0x56, 0x34, 0x12]);
        assert_eq!(leaf_summary(&node), "Fixed32 · 0x12345678 · length 4");
        assert_eq!(leaf_label(&node), "#1 [Fixed32] → 0x12345678 (LE)");

        let node = leaf(WireType::Fixed64, &[0x01, 0x02, 0x03, 0x04, 0x05, 0x06, 0x07, 0x08]);
        assert_eq!(leaf_summary(&node), "Fixed64 · 0x0807060504030201 · length 8");
    }

    #[test]
    fn test_fixed_summary_wrong_width() {
        let node = leaf(WireType::Fixed32, &[0x01, 0x02]);
        assert_eq!(leaf_summary(&node), "2 bytes · length 2");
    }

    #[test]
    fn test_length_delimited_summary() {
        assert_eq!(leaf_summary(&leaf(WireType::LengthDelimited, b"")), "length 0");
        assert_eq!(
            leaf_summary(&leaf(WireType::LengthDelimited, b"Hello")),
            "UTF8 · \"Hello\" · length 5"
        );
        assert_eq!(
            leaf_summary(&leaf(WireType::LengthDelimited, "你好".as_bytes())),
            "UTF8 · \"你好\" · length 6"
        );
        assert_eq!(
            leaf_summary(&leaf(WireType::LengthDelimited, &[0x00, 0x01, 0xFF])),
            "Bytes · 00-01-FF · length 3"
        );
        assert_eq!(
            leaf_summary(&leaf(WireType::LengthDelimited, &[0xFF; 9])),
            "Bytes · length 9"
        );
    }

    #[test]
    fn test_utf8_control_characters() {
        assert_eq!(try_utf8(b"line1\nline2\ttab\r\n"), Some("line1\nline2\ttab\r\n"));
        assert_eq!(try_utf8(b"hello\x00world"), None);
        assert_eq!(try_utf8(b"bell\x07"), None);
        assert_eq!(try_utf8(&[0xC3, 0x28]), None);
    }

    #[test]
    fn test_nested_summary() {
        let child = FieldNode::leaf(1, WireType::Varint, vec![0x01u8]);
        let node = FieldNode::nested(2, vec![0x08u8, 0x01], vec![child]);
        assert_eq!(leaf_summary(&node), "nested · 1 children · length 2");
        assert_eq!(leaf_label(&node), "#2 [LengthDelimited] ← 1 children");
    }

    #[test]
    fn test_raw_preview() {
        assert_eq!(raw_preview(&[0x01, 0x02, 0xAB]), "01 02 AB");
        assert_eq!(raw_preview(&[]), "");
    }

    #[test]
    fn test_array_text() {
        assert_eq!(array_label(4), "#4 array");
        assert_eq!(array_summary(3, 3), "array · 3 elements · length 3");
    }
}
