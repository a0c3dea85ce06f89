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

//! Schema-less Protocol Buffers inspector.
//!
//! Text goes through [`input::parse`] to become bytes, [`proto::WireDecoder`]
//! turns bytes into a [`FieldNode`] tree, and [`display::from_nodes`] turns
//! that into a [`DisplayNode`] tree ready for presentation.
//!
//! ```
//! use protolens::{display, input, proto};
//!
//! let bytes = input::parse("08 96 01 20 01 20 02").expect("valid hex");
//! let fields = proto::decode(bytes).expect("valid protobuf");
//! let nodes = display::from_nodes(&fields);
//! assert_eq!(nodes[0].summary(), "Varint · 150 (0x96) · length 2");
//! assert!(nodes[1].is_array_group());
//! ```

pub mod cli;
pub mod config;
pub mod display;
pub mod error;
pub mod helpers;
pub mod input;
pub mod proto;
pub mod render;

pub use display::DisplayNode;
pub use error::Error;
pub use proto::{FieldNode, WireDecoder, WireType};

use bytes::Bytes;

/// Decode bytes into display nodes, reporting a failure as a single error node
pub fn inspect_bytes(decoder: &WireDecoder, bytes: impl Into<Bytes>) -> Vec<DisplayNode> {
    match decoder.decode(bytes) {
        Ok(fields) => display::from_nodes(&fields),
        Err(e) => vec![DisplayNode::error(e.to_string())],
    }
}

/// Normalize hex or Base64 text and decode it, reporting any failure as a single error node
pub fn inspect_text(decoder: &WireDecoder, text: &str) -> Vec<DisplayNode> {
    match input::parse(text) {
        Ok(bytes) => inspect_bytes(decoder, bytes),
        Err(e) => vec![DisplayNode::error(e.to_string())],
    }
}
