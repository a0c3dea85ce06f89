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

//! Codec module for decompressing protobuf payloads before decoding.
//!
//! Blobs captured from caches, queues and log files are frequently
//! compressed. This module provides:
//! - Compression format detection by magic number (Gzip, Zstd, Snappy)
//! - Size-capped decompression (Gzip, Zstd, Snappy, LZ4 block)

use crate::error::Error;
use flate2::read::GzDecoder;
use lz4_flex::block::decompress_size_prepended;
use ruzstd::decoding::StreamingDecoder;
use serde::{Deserialize, Serialize};
use snap::read::FrameDecoder as SnappyDecoder;
use std::io::Read;
use std::str::FromStr;
use tracing::{debug, warn};

type Result<T, E = Error> = std::result::Result<T, E>;

/// Maximum decompressed size to prevent compression bombs (64 MB)
pub const MAX_DECOMPRESS_BYTES: usize = 64 * 1024 * 1024;

/// Compression format (container layer)
#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub enum CompressionFormat {
    #[default]
    None,
    Gzip,
    Zstd,
    Snappy,
    Lz4,
}

impl CompressionFormat {
    /// Get display name for the compression format
    pub fn as_str(&self) -> &'static str {
        match self {
            CompressionFormat::None => "None",
            CompressionFormat::Gzip => "Gzip",
            CompressionFormat::Zstd => "Zstd",
            CompressionFormat::Snappy => "Snappy",
            CompressionFormat::Lz4 => "LZ4",
        }
    }
}

/// How the input container layer is chosen
#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum DecompressMode {
    /// Detect by magic number; LZ4 has none and is never guessed
    #[default]
    Auto,
    None,
    Gzip,
    Zstd,
    Snappy,
    Lz4,
}

impl FromStr for DecompressMode {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self> {
        match s.to_lowercase().as_str() {
            "auto" => Ok(DecompressMode::Auto),
            "none" => Ok(DecompressMode::None),
            "gzip" | "gz" => Ok(DecompressMode::Gzip),
            "zstd" | "zst" => Ok(DecompressMode::Zstd),
            "snappy" => Ok(DecompressMode::Snappy),
            "lz4" => Ok(DecompressMode::Lz4),
            _ => Err(Error::Invalid {
                message: format!("Unknown decompress mode: {s}"),
            }),
        }
    }
}

impl DecompressMode {
    /// Resolve the compression format to use for `bytes`
    pub fn resolve(&self, bytes: &[u8]) -> CompressionFormat {
        match self {
            DecompressMode::Auto => detect_compression(bytes),
            DecompressMode::None => CompressionFormat::None,
            DecompressMode::Gzip => CompressionFormat::Gzip,
            DecompressMode::Zstd => CompressionFormat::Zstd,
            DecompressMode::Snappy => CompressionFormat::Snappy,
            DecompressMode::Lz4 => CompressionFormat::Lz4,
        }
    }

    /// Strip the container layer from `bytes`.
    ///
    /// A format named explicitly must decompress. In `Auto` mode a magic
    /// number is only a hint: protobuf can start with the same bytes (`28 B5
    /// 2F FD` is field 5 followed by a field 31 key), so a failed attempt
    /// hands back the input unchanged.
    pub fn unwrap_container(&self, bytes: Vec<u8>, max_bytes: usize) -> Result<Vec<u8>> {
        let format = self.resolve(&bytes);
        if format == CompressionFormat::None {
            return Ok(bytes);
        }
        match decompress(&bytes, format, max_bytes) {
            Ok(decompressed) => Ok(decompressed),
            Err(e) if *self == DecompressMode::Auto => {
                warn!(format = format.as_str(), error = %e, "magic number matched but decompression failed, using input as is");
                Ok(bytes)
            }
            Err(e) => Err(e),
        }
    }
}

/// Detect compression format from bytes
pub fn detect_compression(bytes: &[u8]) -> CompressionFormat {
    if bytes.len() < 2 {
        return CompressionFormat::None;
    }

    // Gzip magic: 1f 8b
    if bytes.starts_with(&[0x1f, 0x8b]) {
        return CompressionFormat::Gzip;
    }

    // Zstd magic: 28 b5 2f fd
    if bytes.starts_with(&[0x28, 0xb5, 0x2f, 0xfd]) {
        return CompressionFormat::Zstd;
    }

    // Snappy framed format: ff 06 00 00 73 4e 61 50 70 59
    if bytes.starts_with(&[0xff, 0x06, 0x00, 0x00, 0x73, 0x4e, 0x61, 0x50, 0x70, 0x59]) {
        return CompressionFormat::Snappy;
    }

    CompressionFormat::None
}

/// Decompress bytes using the specified compression format
pub fn decompress(bytes: &[u8], format: CompressionFormat, max_bytes: usize) -> Result<Vec<u8>> {
    debug!(format = format.as_str(), size = bytes.len(), "decompress input");
    match format {
        CompressionFormat::None => Ok(bytes.to_vec()),
        CompressionFormat::Gzip => read_capped(GzDecoder::new(bytes), "Gzip", bytes.len(), max_bytes),
        CompressionFormat::Zstd => {
            let decoder = StreamingDecoder::new(bytes).map_err(|e| corrupt("Zstd", e))?;
            read_capped(decoder, "Zstd", bytes.len(), max_bytes)
        }
        CompressionFormat::Snappy => read_capped(SnappyDecoder::new(bytes), "Snappy", bytes.len(), max_bytes),
        CompressionFormat::Lz4 => decompress_lz4(bytes, max_bytes),
    }
}

fn corrupt(name: &str, e: impl std::fmt::Display) -> Error {
    Error::Invalid {
        message: format!("{name} input is not a valid stream: {e}"),
    }
}

fn too_large(max_bytes: usize) -> Error {
    Error::Invalid {
        message: format!("Decompressed payload is larger than {max_bytes} bytes, raise max_decompress_bytes to inspect it"),
    }
}

/// Read a decoder to the end, reading at most one byte past `max_bytes`
fn read_capped(decoder: impl Read, name: &str, input_len: usize, max_bytes: usize) -> Result<Vec<u8>> {
    let mut result = Vec::with_capacity(input_len.min(max_bytes));
    decoder
        .take(max_bytes as u64 + 1)
        .read_to_end(&mut result)
        .map_err(|e| corrupt(name, e))?;
    if result.len() > max_bytes {
        return Err(too_large(max_bytes));
    }
    Ok(result)
}

fn decompress_lz4(bytes: &[u8], max_bytes: usize) -> Result<Vec<u8>> {
    // block format: 4-byte little-endian decompressed size, then the block
    let declared = bytes.first_chunk::<4>().map(|header| u32::from_le_bytes(*header) as usize);
    if declared.is_some_and(|size| size > max_bytes) {
        return Err(too_large(max_bytes));
    }
    decompress_size_prepended(bytes).map_err(|e| corrupt("LZ4", e))
}
