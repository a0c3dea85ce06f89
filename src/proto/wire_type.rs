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

use serde::Serialize;
use std::fmt;

/// Wire types in protobuf encoding.
///
/// Only the four types still emitted by protobuf encoders are accepted.
/// The deprecated group markers (3, 4) and the unassigned values (6, 7)
/// have no variant, so a field carrying one of them cannot be represented.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
pub enum WireType {
    /// int32, int64, uint32, uint64, sint32, sint64, bool, enum
    Varint = 0,
    /// fixed64, sfixed64, double
    Fixed64 = 1,
    /// string, bytes, embedded messages, packed repeated fields
    LengthDelimited = 2,
    /// fixed32, sfixed32, float
    Fixed32 = 5,
}

impl WireType {
    pub fn from_u64(val: u64) -> Option<Self> {
        match val {
            0 => Some(WireType::Varint),
            1 => Some(WireType::Fixed64),
            2 => Some(WireType::LengthDelimited),
            5 => Some(WireType::Fixed32),
            _ => None,
        }
    }

    /// Get display name for the wire type
    pub fn as_str(&self) -> &'static str {
        match self {
            WireType::Varint => "Varint",
            WireType::Fixed64 => "Fixed64",
            WireType::LengthDelimited => "LengthDelimited",
            WireType::Fixed32 => "Fixed32",
        }
    }
}

impl fmt::Display for WireType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}
