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

use crate::error::Error;
use bytes::Bytes;

type Result<T, E = Error> = std::result::Result<T, E>;

/// Bounds-checked reader over a shared byte buffer.
///
/// Every slice handed out is a zero-copy view into the buffer the cursor
/// was created from, so decoded values keep pointing at the original input.
#[derive(Debug, Clone)]
pub struct Cursor {
    data: Bytes,
    position: usize,
}

impl Cursor {
    pub fn new(data: Bytes) -> Self {
        Self { data, position: 0 }
    }

    pub fn is_at_end(&self) -> bool {
        self.position >= self.data.len()
    }

    /// Number of bytes consumed since the cursor was created
    pub fn bytes_consumed(&self) -> usize {
        self.position
    }

    pub fn remaining(&self) -> usize {
        self.data.len().saturating_sub(self.position)
    }

    /// Decode a base-128 varint (at most 10 bytes for a 64-bit value)
    pub fn read_varint(&mut self) -> Result<u64> {
        let start = self.position;
        let mut result: u64 = 0;
        let mut shift = 0;

        loop {
            let Some(&byte) = self.data.get(self.position) else {
                return Err(Error::TruncatedVarint { offset: start });
            };
            self.position += 1;

            result |= u64::from(byte & 0x7F) << shift;
            if byte & 0x80 == 0 {
                return Ok(result);
            }

            shift += 7;
            if shift >= 64 {
                return Err(Error::VarintOverflow { offset: start });
            }
        }
    }

    /// Read a varint and return the exact bytes it occupied, non-canonical
    /// (overlong) encodings included.
    pub fn read_varint_bytes(&mut self) -> Result<Bytes> {
        let start = self.position;
        self.read_varint()?;
        Ok(self.data.slice(start..self.position))
    }

    pub fn read_bytes(&mut self, length: usize) -> Result<Bytes> {
        let remaining = self.remaining();
        if length > remaining {
            return Err(Error::TruncatedFixed {
                offset: self.position,
                needed: length,
                remaining,
            });
        }
        let start = self.position;
        self.position += length;
        Ok(self.data.slice(start..self.position))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn cursor(bytes: &'static [u8]) -> Cursor {
        Cursor::new(Bytes::from_static(bytes))
    }

    #[test]
    fn test_read_varint_table() {
        let cases: [(&'static [u8], u64); 5] = [
            (&[0x00], 0),
            (&[0x01], 1),
            (&[0x96, 0x01], 150),
            (&[0xAC, 0x02], 300),
            (&[0xFF, 0xFF, 0xFF, 0xFF, 0xFF, 0xFF, 0xFF, 0xFF, 0xFF, 0x01], u64::MAX),
        ];
        for (bytes, expected) in cases {
            let mut c = cursor(bytes);
            assert_eq!(c.read_varint().expect("test: varint"), expected);
            assert_eq!(c.bytes_consumed(), bytes.len(), "test: consumed all of {bytes:?}");
            assert!(c.is_at_end());
        }
    }

    #[test]
    fn test_read_varint_truncated() {
        let mut c = cursor(&[0x80, 0x80]);
        assert!(matches!(c.read_varint(), Err(Error::TruncatedVarint { offset: 0 })));

        let mut empty = cursor(&[]);
        assert!(matches!(empty.read_varint(), Err(Error::TruncatedVarint { .. })));
    }

    #[test]
    fn test_read_varint_overflow() {
        // 10 continuation bytes never terminate within 64 bits
        let mut c = cursor(&[0x80, 0x80, 0x80, 0x80, 0x80, 0x80, 0x80, 0x80, 0x80, 0x80, 0x01]);
        assert!(matches!(c.read_varint(), Err(Error::VarintOverflow { offset: 0 })));
    }

    #[test]
    fn test_read_varint_bytes_keeps_overlong_encoding() {
        // 1 encoded in three bytes
        let mut c = cursor(&[0x81, 0x80, 0x00, 0x2A]);
        let raw = c.read_varint_bytes().expect("test: varint bytes");
        assert_eq!(raw.as_ref(), &[0x81, 0x80, 0x00]);
        assert_eq!(c.bytes_consumed(), 3);
        assert_eq!(c.read_varint().expect("test: next varint"), 42);
    }

    #[test]
    fn test_read_bytes() {
        let mut c = cursor(&[1, 2, 3, 4, 5]);
        assert_eq!(c.read_bytes(4).expect("test: four bytes").as_ref(), &[1, 2, 3, 4]);
        assert_eq!(c.remaining(), 1);
        let err = c.read_bytes(8).expect_err("test: too few bytes");
        assert!(matches!(
            err,
            Error::TruncatedFixed {
                offset: 4,
                needed: 8,
                remaining: 1
            }
        ));
        // a failed read does not move the cursor
        assert_eq!(c.bytes_consumed(), 4);
    }

    #[test]
    fn test_read_bytes_zero_length() {
        let mut c = cursor(&[]);
        assert!(c.read_bytes(0).expect("test: empty read").is_empty());
        assert!(c.is_at_end());
    }
}
