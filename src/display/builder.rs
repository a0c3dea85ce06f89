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

use super::{DisplayNode, compose_path};
use crate::proto::FieldNode;
use indexmap::IndexMap;

/// Build display nodes for the top level of a decoded message
pub fn from_nodes(nodes: &[FieldNode]) -> Vec<DisplayNode> {
    build(nodes, "")
}

/// Build display nodes for sibling fields under `parent_path`.
///
/// All occurrences of a field number are merged into one group, even when
/// other fields are interleaved between them. Groups keep the order in which
/// their field number first appeared. A field seen once becomes a plain leaf;
/// a field seen several times becomes an array group whose elements carry a
/// 1-based `[i]` suffix in their path.
pub fn build(nodes: &[FieldNode], parent_path: &str) -> Vec<DisplayNode> {
    let mut grouped: IndexMap<u64, Vec<&FieldNode>> = IndexMap::new();
    for node in nodes {
        grouped.entry(node.field_number()).or_default().push(node);
    }

    let mut result = Vec::with_capacity(grouped.len());
    for (field_number, items) in grouped {
        let field_segment = field_number.to_string();
        let base_path = compose_path(parent_path, &field_segment);

        if let [item] = items.as_slice() {
            result.push(DisplayNode::leaf(item, base_path));
            continue;
        }

        let wire_type = items[0].wire_type();
        let total_length = items.iter().map(|item| item.raw_value().len()).sum();
        let children = items
            .into_iter()
            .enumerate()
            .map(|(index, item)| {
                let element_path = compose_path(parent_path, &format!("{field_segment}[{}]", index + 1));
                DisplayNode::leaf(item, element_path)
            })
            .collect();

        result.push(DisplayNode::array_group(
            field_number,
            wire_type,
            base_path,
            children,
            total_length,
        ));
    }

    result
}
