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

//! Presentation tree built from decoded fields.
//!
//! Sibling fields sharing a field number are merged into one array group,
//! and every node carries a dotted path (`2.4[3].1`) that encodes where it
//! sits and which occurrence of a repeated field it is.

mod builder;
mod format;

use crate::proto::{FieldNode, WireType};
use bytes::Bytes;
use serde::Serialize;

pub use builder::{build, from_nodes};
pub use format::varint_to_value;

/// A single decoded field prepared for display
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct LeafNode {
    label: String,
    summary: String,
    raw_preview: String,
    path: String,
    field_number: u64,
    wire_type: WireType,
    children: Vec<DisplayNode>,
    #[serde(skip)]
    raw_value: Bytes,
}

impl LeafNode {
    /// Describe a field at `path`, building display nodes for any nested children.
    ///
    /// Only the field's value is kept, as a view into the decoded buffer; the
    /// `FieldNode` subtree is not copied.
    pub fn new(node: &FieldNode, path: impl Into<String>) -> Self {
        let path = path.into();
        let children = node
            .nested_children()
            .map(|children| build(children, &path))
            .unwrap_or_default();
        Self {
            label: format::leaf_label(node),
            summary: format::leaf_summary(node),
            raw_preview: format::raw_preview(node.raw_value()),
            field_number: node.field_number(),
            wire_type: node.wire_type(),
            path,
            children,
            raw_value: node.raw_value().clone(),
        }
    }

    pub fn raw_value(&self) -> &Bytes {
        &self.raw_value
    }
}

/// All occurrences of one field number within a message
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ArrayGroupNode {
    label: String,
    summary: String,
    path: String,
    field_number: u64,
    wire_type: WireType,
    total_length: usize,
    children: Vec<DisplayNode>,
}

impl ArrayGroupNode {
    /// Sum of the elements' own value lengths, nested descendants not counted
    pub fn total_length(&self) -> usize {
        self.total_length
    }
}

/// Inline placeholder reported instead of a tree when decoding fails
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ErrorNode {
    message: String,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum DisplayNode {
    Leaf(LeafNode),
    ArrayGroup(ArrayGroupNode),
    Error(ErrorNode),
}

impl DisplayNode {
    pub fn leaf(node: &FieldNode, path: impl Into<String>) -> Self {
        DisplayNode::Leaf(LeafNode::new(node, path))
    }

    pub(crate) fn array_group(
        field_number: u64,
        wire_type: WireType,
        path: String,
        children: Vec<DisplayNode>,
        total_length: usize,
    ) -> Self {
        DisplayNode::ArrayGroup(ArrayGroupNode {
            label: format::array_label(field_number),
            summary: format::array_summary(children.len(), total_length),
            path,
            field_number,
            wire_type,
            total_length,
            children,
        })
    }

    /// Error placeholder carrying `message` as both label and summary
    pub fn error(message: impl Into<String>) -> Self {
        DisplayNode::Error(ErrorNode {
            message: message.into(),
        })
    }

    pub fn label(&self) -> &str {
        match self {
            DisplayNode::Leaf(leaf) => &leaf.label,
            DisplayNode::ArrayGroup(group) => &group.label,
            DisplayNode::Error(error) => &error.message,
        }
    }

    pub fn summary(&self) -> &str {
        match self {
            DisplayNode::Leaf(leaf) => &leaf.summary,
            DisplayNode::ArrayGroup(group) => &group.summary,
            DisplayNode::Error(error) => &error.message,
        }
    }

    /// Space separated uppercase hex of the field value, empty for synthetic nodes
    pub fn raw_preview(&self) -> &str {
        match self {
            DisplayNode::Leaf(leaf) => &leaf.raw_preview,
            _ => "",
        }
    }

    pub fn path(&self) -> &str {
        match self {
            DisplayNode::Leaf(leaf) => &leaf.path,
            DisplayNode::ArrayGroup(group) => &group.path,
            DisplayNode::Error(_) => "",
        }
    }

    pub fn children(&self) -> &[DisplayNode] {
        match self {
            DisplayNode::Leaf(leaf) => &leaf.children,
            DisplayNode::ArrayGroup(group) => &group.children,
            DisplayNode::Error(_) => &[],
        }
    }

    pub fn field_number(&self) -> Option<u64> {
        match self {
            DisplayNode::Leaf(leaf) => Some(leaf.field_number),
            DisplayNode::ArrayGroup(group) => Some(group.field_number),
            DisplayNode::Error(_) => None,
        }
    }

    pub fn wire_type(&self) -> Option<WireType> {
        match self {
            DisplayNode::Leaf(leaf) => Some(leaf.wire_type),
            DisplayNode::ArrayGroup(group) => Some(group.wire_type),
            DisplayNode::Error(_) => None,
        }
    }

    /// Field value bytes of a leaf, shared with the decoded buffer
    pub fn raw_value(&self) -> Option<&Bytes> {
        match self {
            DisplayNode::Leaf(leaf) => Some(leaf.raw_value()),
            _ => None,
        }
    }

    pub fn is_error(&self) -> bool {
        matches!(self, DisplayNode::Error(_))
    }

    pub fn is_array_group(&self) -> bool {
        matches!(self, DisplayNode::ArrayGroup(_))
    }

    /// True when the last path segment carries an occurrence index, e.g. `4[2]`
    pub fn is_repeated(&self) -> bool {
        occurrence_index_of(last_segment(self.path())).is_some()
    }

    /// 1-based occurrence of a repeated field, 1 for everything else
    pub fn occurrence_index(&self) -> usize {
        occurrence_index_of(last_segment(self.path())).unwrap_or(1)
    }

    /// Short field column text: `4`, `4[2]` or `[3]` for a group of three
    pub fn field_display(&self) -> String {
        match self {
            DisplayNode::Error(_) => String::new(),
            DisplayNode::ArrayGroup(group) => format!("[{}]", group.children.len()),
            DisplayNode::Leaf(leaf) => match occurrence_index_of(last_segment(&leaf.path)) {
                Some(index) => format!("{}[{index}]", leaf.field_number),
                None => leaf.field_number.to_string(),
            },
        }
    }
}

pub(crate) fn compose_path(parent_path: &str, segment: &str) -> String {
    if parent_path.is_empty() {
        segment.to_string()
    } else {
        format!("{parent_path}.{segment}")
    }
}

fn last_segment(path: &str) -> &str {
    path.rsplit_once('.').map_or(path, |(_, segment)| segment)
}

fn occurrence_index_of(segment: &str) -> Option<usize> {
    let start = segment.find('[')?;
    let rest = &segment[start + 1..];
    let end = rest.find(']')?;
    rest[..end].parse().ok()
}
