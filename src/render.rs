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

//! Text and JSON output for display trees.

use crate::display::DisplayNode;
use crate::error::Error;
use std::fmt::Write;

type Result<T, E = Error> = std::result::Result<T, E>;

/// Raw previews longer than this many bytes are cut in tree output
const MAX_PREVIEW_BYTES: usize = 16;

/// Render display nodes as an indented tree, one node per line.
///
/// ```text
/// 1        Varint · 150 (0x96) · length 2 | 96 01
/// [2]      array · 2 elements · length 2
///   4[1]     Varint · 1 (0x1) · length 1 | 01
///   4[2]     Varint · 2 (0x2) · length 1 | 02
/// ```
pub fn render_tree(nodes: &[DisplayNode]) -> String {
    let mut out = String::new();
    write_tree(&mut out, nodes, 0);
    out
}

fn write_tree(out: &mut String, nodes: &[DisplayNode], depth: usize) {
    let pad = "  ".repeat(depth);
    for node in nodes {
        if node.is_error() {
            let _ = writeln!(out, "{pad}error: {}", node.label());
            continue;
        }

        let _ = write!(out, "{pad}{:<8} {}", node.field_display(), node.summary());
        let preview = node.raw_preview();
        if node.children().is_empty() && !preview.is_empty() {
            let _ = write!(out, " | {}", truncate_preview(preview));
        }
        out.push('\n');
        write_tree(out, node.children(), depth + 1);
    }
}

fn truncate_preview(preview: &str) -> String {
    // each byte is two hex digits plus a separator
    let limit = MAX_PREVIEW_BYTES * 3 - 1;
    if preview.len() <= limit {
        return preview.to_string();
    }
    format!("{} …", &preview[..limit])
}

/// Serialize display nodes to pretty-printed JSON
pub fn render_json(nodes: &[DisplayNode]) -> Result<String> {
    Ok(serde_json::to_string_pretty(nodes)?)
}
