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

use snafu::Snafu;

#[derive(Debug, Snafu)]
pub enum Error {
    #[snafu(display("Truncated varint at offset {offset}"))]
    TruncatedVarint { offset: usize },
    #[snafu(display("Varint too long at offset {offset}"))]
    VarintOverflow { offset: usize },
    #[snafu(display("Truncated fixed-width value at offset {offset}: need {needed} bytes, {remaining} remaining"))]
    TruncatedFixed {
        offset: usize,
        needed: usize,
        remaining: usize,
    },
    #[snafu(display("Length-delimited field too large at offset {offset}: length {length}, {remaining} remaining"))]
    LengthOverflow {
        offset: usize,
        length: u64,
        remaining: usize,
    },
    #[snafu(display("Unsupported wire type {wire_type} for field {field_number} at offset {offset}"))]
    UnsupportedWireType {
        offset: usize,
        field_number: u64,
        wire_type: u64,
    },
    #[snafu(display("Nesting depth {depth} exceeds the decoder limit"))]
    RecursionLimit { depth: usize },
    #[snafu(display("Unrecognized input format: provide hex, \\xAA-escaped or Base64 encoded protobuf data"))]
    UnrecognizedInputFormat,
    #[snafu(display("Invalid: {message}"))]
    Invalid { message: String },
    #[snafu(display("IO error: {source}"))]
    Io { source: std::io::Error },
    #[snafu(display("Serde JSON error: {source}"))]
    SerdeJson { source: serde_json::Error },
    #[snafu(display("Serde TOML error: {source}"))]
    TomlDe { source: toml::de::Error },
}

impl From<std::io::Error> for Error {
    fn from(source: std::io::Error) -> Self {
        Error::Io { source }
    }
}

impl From<serde_json::Error> for Error {
    fn from(source: serde_json::Error) -> Self {
        Error::SerdeJson { source }
    }
}

impl From<toml::de::Error> for Error {
    fn from(source: toml::de::Error) -> Self {
        Error::TomlDe { source }
    }
}
