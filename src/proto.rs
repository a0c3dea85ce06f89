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

//! Schema-less protobuf wire-format decoding.

mod cursor;
mod decoder;
mod wire_type;

pub use cursor::Cursor;
pub use decoder::{FieldNode, MAX_LENGTH_DELIMITED, MAX_PARSE_DEPTH, WireDecoder, decode, pretty_print};
pub use wire_type::WireType;
