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

use super::cursor::Cursor;
use super::wire_type::WireType;
use crate::error::Error;
use bytes::Bytes;
use std::fmt::{self, Write};
use tracing::debug;

type Result<T, E = Error> = std::result::Result<T, E>;

/// Maximum recursion depth for nested message parsing to prevent stack overflow
pub const MAX_PARSE_DEPTH: usize = 64;

/// Largest payload a length-delimited field may declare (signed 32-bit range)
pub const MAX_LENGTH_DELIMITED: u64 = i32::MAX as u64;

/// One decoded wire-format field.
///
/// `raw_value` holds the value bytes only (never the key) as a view into the
/// decoded buffer. `children` is set only for length-delimited fields whose
/// payload decoded exhaustively as a nested message.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FieldNode {
    field_number: u64,
    wire_type: WireType,
    raw_value: Bytes,
    children: Option<Vec<FieldNode>>,
}

impl FieldNode {
    pub fn leaf(field_number: u64, wire_type: WireType, raw_value: impl Into<Bytes>) -> Self {
        Self {
            field_number,
            wire_type,
            raw_value: raw_value.into(),
            children: None,
        }
    }

    /// A length-delimited field whose payload is a nested message
    pub fn nested(field_number: u64, raw_value: impl Into<Bytes>, children: Vec<FieldNode>) -> Self {
        Self {
            field_number,
            wire_type: WireType::LengthDelimited,
            raw_value: raw_value.into(),
            children: Some(children),
        }
    }

    pub fn field_number(&self) -> u64 {
        self.field_number
    }

    pub fn wire_type(&self) -> WireType {
        self.wire_type
    }

    pub fn raw_value(&self) -> &Bytes {
        &self.raw_value
    }

    pub fn children(&self) -> Option<&[FieldNode]> {
        self.children.as_deref()
    }

    /// Children of a nested message, `None` when empty or absent
    pub fn nested_children(&self) -> Option<&[FieldNode]> {
        self.children().filter(|children| !children.is_empty())
    }
}

impl fmt::Display for FieldNode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self.nested_children() {
            Some(children) => write!(
                f,
                "Field {} ({}) -> {} child nodes",
                self.field_number,
                self.wire_type,
                children.len()
            ),
            None => write!(
                f,
                "Field {} ({}) -> {} bytes",
                self.field_number,
                self.wire_type,
                self.raw_value.len()
            ),
        }
    }
}

/// Schema-less recursive-descent decoder for the protobuf wire format.
#[derive(Debug, Clone, Copy)]
pub struct WireDecoder {
    max_depth: usize,
}

impl Default for WireDecoder {
    fn default() -> Self {
        Self {
            max_depth: MAX_PARSE_DEPTH,
        }
    }
}

impl WireDecoder {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_max_depth(mut self, max_depth: usize) -> Self {
        self.max_depth = max_depth;
        self
    }

    pub fn max_depth(&self) -> usize {
        self.max_depth
    }

    /// Decode a buffer into its top-level fields.
    ///
    /// Any malformed field at the top level fails the whole call. Failures
    /// while speculatively decoding a length-delimited payload as a nested
    /// message only turn that field into a leaf.
    pub fn decode(&self, buffer: impl Into<Bytes>) -> Result<Vec<FieldNode>> {
        let mut cursor = Cursor::new(buffer.into());
        let nodes = self.decode_message(&mut cursor, 0)?;
        debug!(fields = nodes.len(), bytes = cursor.bytes_consumed(), "decoded protobuf message");
        Ok(nodes)
    }

    fn decode_message(&self, cursor: &mut Cursor, depth: usize) -> Result<Vec<FieldNode>> {
        if depth > self.max_depth {
            return Err(Error::RecursionLimit { depth });
        }

        let mut nodes = Vec::new();
        while !cursor.is_at_end() {
            let offset = cursor.bytes_consumed();
            let key = cursor.read_varint()?;
            let field_number = key >> 3;
            let wire_type_val = key & 0b111;
            let Some(wire_type) = WireType::from_u64(wire_type_val) else {
                return Err(Error::UnsupportedWireType {
                    offset,
                    field_number,
                    wire_type: wire_type_val,
                });
            };

            let node = match wire_type {
                WireType::Varint => FieldNode::leaf(field_number, wire_type, cursor.read_varint_bytes()?),
                WireType::Fixed32 => FieldNode::leaf(field_number, wire_type, cursor.read_bytes(4)?),
                WireType::Fixed64 => FieldNode::leaf(field_number, wire_type, cursor.read_bytes(8)?),
                WireType::LengthDelimited => {
                    let length_offset = cursor.bytes_consumed();
                    let length = cursor.read_varint()?;
                    let remaining = cursor.remaining();
                    // remaining always fits in u64
                    if length > MAX_LENGTH_DELIMITED || length > remaining as u64 {
                        return Err(Error::LengthOverflow {
                            offset: length_offset,
                            length,
                            remaining,
                        });
                    }
                    let payload = cursor.read_bytes(length as usize)?;
                    match self.try_decode_nested(&payload, depth + 1) {
                        Some(children) => FieldNode::nested(field_number, payload, children),
                        None => FieldNode::leaf(field_number, wire_type, payload),
                    }
                }
            };
            nodes.push(node);
        }

        Ok(nodes)
    }

    /// Try to read a payload as a standalone message. Accepted only when the
    /// whole payload is consumed without error.
    fn try_decode_nested(&self, payload: &Bytes, depth: usize) -> Option<Vec<FieldNode>> {
        if payload.is_empty() {
            return None;
        }

        let mut cursor = Cursor::new(payload.clone());
        match self.decode_message(&mut cursor, depth) {
            Ok(children) if cursor.is_at_end() && cursor.bytes_consumed() == payload.len() => Some(children),
            Ok(_) => None,
            Err(e) => {
                debug!(depth, length = payload.len(), error = %e, "payload is not a nested message");
                None
            }
        }
    }
}

/// Decode a buffer with the default decoder settings
pub fn decode(buffer: impl Into<Bytes>) -> Result<Vec<FieldNode>> {
    WireDecoder::default().decode(buffer)
}

/// Render nodes as indented, brace-delimited text for debugging.
///
/// ```text
/// Field 1 (Wire=Varint) => 9601
/// Field 2 (Wire=LengthDelimited) {
///   Field 1 (Wire=Varint) => 2A
/// }
/// ```
pub fn pretty_print(nodes: &[FieldNode], indent: usize) -> String {
    let mut out = String::new();
    write_nodes(&mut out, nodes, indent);
    out
}

fn write_nodes(out: &mut String, nodes: &[FieldNode], indent: usize) {
    let pad = " ".repeat(indent * 2);
    for node in nodes {
        // writing into a String cannot fail
        let _ = write!(out, "{pad}Field {} (Wire={}) ", node.field_number, node.wire_type);
        match node.nested_children() {
            Some(children) => {
                out.push_str("{\n");
                write_nodes(out, children, indent + 1);
                let _ = writeln!(out, "{pad}}}");
            }
            None => {
                let _ = writeln!(out, "=> {}", hex_upper(&node.raw_value));
            }
        }
    }
}

fn hex_upper(bytes: &[u8]) -> String {
    bytes.iter().map(|b| format!("{b:02X}")).collect()
}
