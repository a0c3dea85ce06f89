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

//! Command line front end: argument parsing, input loading and output.

use crate::config::{OutputFormat, ProtolensConfig};
use crate::display::{self, DisplayNode};
use crate::error::Error;
use crate::helpers::codec::DecompressMode;
use crate::input;
use crate::proto::{FieldNode, WireDecoder, pretty_print};
use crate::render::{render_json, render_tree};
use clap::Parser;
use humansize::{DECIMAL, format_size};
use std::io::Read;
use std::path::PathBuf;
use tracing::{info, warn};

type Result<T, E = Error> = std::result::Result<T, E>;

/// Decode protobuf wire-format data without a schema
#[derive(Parser, Debug, Default)]
#[command(name = "protolens", version, about)]
pub struct Arguments {
    /// Hex (`08 96 01`, `0x08`, `\x08`) or Base64 text; reads --file or stdin when omitted
    pub input: Option<String>,

    /// Read input from a file, raw protobuf or hex/Base64 text
    #[arg(short, long)]
    pub file: Option<PathBuf>,

    /// Output format: tree, json or debug
    #[arg(short, long)]
    pub output: Option<OutputFormat>,

    /// Deepest nesting level tried as an embedded message
    #[arg(long)]
    pub max_depth: Option<usize>,

    /// Container layer: auto, none, gzip, zstd, snappy or lz4
    #[arg(long)]
    pub decompress: Option<DecompressMode>,

    /// Print a hex dump of the decoded input bytes first
    #[arg(long)]
    pub dump: bool,

    /// Config file, defaults to ~/.protolens/protolens.toml
    #[arg(long)]
    pub config: Option<PathBuf>,
}

impl Arguments {
    /// Apply command line flags on top of the file config
    pub fn merge_into(&self, mut config: ProtolensConfig) -> ProtolensConfig {
        if let Some(output) = self.output {
            config.output = output;
        }
        if let Some(max_depth) = self.max_depth {
            config.max_depth = max_depth;
        }
        if let Some(decompress) = self.decompress {
            config.decompress = decompress;
        }
        config
    }
}

#[derive(Debug)]
pub enum Outcome {
    Decoded(Vec<FieldNode>),
    /// Input that could not be turned into fields, shown as an error node
    Failed(String),
}

/// Result of one run: the bytes handed to the decoder and what came of them
#[derive(Debug)]
pub struct Report {
    pub bytes: Vec<u8>,
    pub outcome: Outcome,
}

impl Report {
    pub fn is_success(&self) -> bool {
        matches!(self.outcome, Outcome::Decoded(_))
    }

    /// Render the report; failures go through the same renderer as a single error node
    pub fn render(&self, output: OutputFormat) -> Result<String> {
        let nodes = match &self.outcome {
            Outcome::Decoded(fields) if output == OutputFormat::Debug => return Ok(pretty_print(fields, 0)),
            Outcome::Decoded(fields) => display::from_nodes(fields),
            Outcome::Failed(message) => vec![DisplayNode::error(message.as_str())],
        };
        match output {
            OutputFormat::Json => Ok(render_json(&nodes)? + "\n"),
            OutputFormat::Tree | OutputFormat::Debug => Ok(render_tree(&nodes)),
        }
    }
}

/// Turn file or stdin bytes into decoder input. Text is parsed as hex or
/// Base64; text that is neither is kept as raw protobuf.
pub fn classify_bytes(data: Vec<u8>) -> Vec<u8> {
    if !input::looks_like_text(&data) {
        return data;
    }
    let parsed = simdutf8::basic::from_utf8(&data)
        .ok()
        .and_then(|text| input::parse(text).ok());
    match parsed {
        Some(bytes) => bytes,
        None => {
            warn!("input looks like text but is neither hex nor Base64, decoding it as raw bytes");
            data
        }
    }
}

/// Read the input as bytes, from the positional argument, `--file` or stdin
pub fn read_input(args: &Arguments) -> Result<Vec<u8>> {
    if let Some(text) = &args.input {
        return input::parse(text);
    }

    let data = match &args.file {
        Some(path) => std::fs::read(path)?,
        None => {
            let mut data = Vec::new();
            std::io::stdin().read_to_end(&mut data)?;
            data
        }
    };
    info!(size = %format_size(data.len(), DECIMAL), "read input");
    Ok(classify_bytes(data))
}

/// Load, decompress and decode the input selected by `args`.
///
/// Text that is not hex or Base64 and bytes that are not protobuf end up as
/// a failed outcome. I/O errors and an explicitly requested decompression
/// that fails are returned as errors.
pub fn inspect(args: &Arguments, config: &ProtolensConfig) -> Result<Report> {
    let bytes = match read_input(args) {
        Ok(bytes) => bytes,
        Err(e @ Error::UnrecognizedInputFormat) => {
            return Ok(Report {
                bytes: Vec::new(),
                outcome: Outcome::Failed(e.to_string()),
            });
        }
        Err(e) => return Err(e),
    };
    let bytes = config.decompress.unwrap_container(bytes, config.max_decompress_bytes)?;

    let decoder = WireDecoder::new().with_max_depth(config.max_depth);
    let outcome = match decoder.decode(bytes.clone()) {
        Ok(fields) => Outcome::Decoded(fields),
        Err(e) => {
            warn!(error = %e, "decode failed");
            Outcome::Failed(e.to_string())
        }
    };
    Ok(Report { bytes, outcome })
}

#[cfg(test)]
mod tests {
    use super::*;
    use flate2::Compression as GzipCompression;
    use flate2::write::GzEncoder;
    use std::io::Write;

    fn parse_args(args: &[&str]) -> Arguments {
        Arguments::try_parse_from(std::iter::once("protolens").chain(args.iter().copied()))
            .expect("test: valid arguments")
    }

    fn file_with(content: &[u8]) -> tempfile::NamedTempFile {
        let mut file = tempfile::NamedTempFile::new().expect("test: temp file");
        file.write_all(content).expect("test: write input");
        file
    }

    fn inspect_file(content: &[u8]) -> Report {
        let file = file_with(content);
        let args = Arguments {
            file: Some(file.path().to_path_buf()),
            ..Default::default()
        };
        inspect(&args, &ProtolensConfig::default()).expect("test: inspect file")
    }

    fn decoded(report: &Report) -> &[FieldNode] {
        match &report.outcome {
            Outcome::Decoded(fields) => fields,
            Outcome::Failed(message) => panic!("test: decode failed: {message}"),
        }
    }

    #[test]
    fn test_flags_override_config() {
        let config = ProtolensConfig {
            max_depth: 10,
            output: OutputFormat::Tree,
            decompress: DecompressMode::Gzip,
            max_decompress_bytes: 1024,
        };

        let merged = parse_args(&["--max-depth", "3", "-o", "json", "--decompress", "none"]).merge_into(config.clone());
        assert_eq!(merged.max_depth, 3);
        assert_eq!(merged.output, OutputFormat::Json);
        assert_eq!(merged.decompress, DecompressMode::None);
        assert_eq!(merged.max_decompress_bytes, 1024);

        // without flags the config wins
        assert_eq!(parse_args(&["08 96 01"]).merge_into(config.clone()), config);
    }

    #[test]
    fn test_invalid_flag_value() {
        assert!(Arguments::try_parse_from(["protolens", "-o", "yaml"]).is_err());
        assert!(Arguments::try_parse_from(["protolens", "--decompress", "brotli"]).is_err());
    }

    #[test]
    fn test_binary_file_decoded_as_is() {
        let report = inspect_file(&[0x08, 0x96, 0x01, 0x10, 0x00]);
        assert_eq!(report.bytes, [0x08, 0x96, 0x01, 0x10, 0x00]);
        assert_eq!(decoded(&report).len(), 2);
    }

    #[test]
    fn test_hex_file_with_trailing_newline() {
        let report = inspect_file(b"08 96 01\n12 07 74 65 73 74 69 6e 67\n");
        assert_eq!(report.bytes[..3], [0x08, 0x96, 0x01]);
        let fields = decoded(&report);
        assert_eq!(fields.len(), 2);
        assert_eq!(fields[1].raw_value().as_ref(), b"testing");
    }

    #[test]
    fn test_plain_text_file_kept_raw() {
        let report = inspect_file(b"hello world!");
        assert_eq!(report.bytes, b"hello world!");
        // 'l' (0x6C) carries wire type 4
        assert!(!report.is_success());
    }

    #[test]
    fn test_gzip_file_decompressed() {
        let mut encoder = GzEncoder::new(Vec::new(), GzipCompression::default());
        encoder.write_all(&[0x08, 0x96, 0x01]).expect("test: gzip write");
        let compressed = encoder.finish().expect("test: gzip finish");

        let report = inspect_file(&compressed);
        assert_eq!(report.bytes, [0x08, 0x96, 0x01]);
        assert_eq!(decoded(&report)[0].field_number(), 1);
    }

    #[test]
    fn test_false_zstd_magic_still_decodes() {
        let args = parse_args(&["28 B5 2F FD 01 01 02 03 04"]);
        let report = inspect(&args, &ProtolensConfig::default()).expect("test: auto decompress falls back");
        let fields = decoded(&report);
        assert_eq!(fields.len(), 2);
        assert_eq!(fields[0].field_number(), 5);
        assert_eq!(fields[1].field_number(), 31);

        let text = report.render(OutputFormat::Tree).expect("test: render");
        assert!(text.starts_with("5        Varint · 6069 (0x17B5)"), "test: {text}");

        let config = args.merge_into(ProtolensConfig::default());
        let explicit = ProtolensConfig {
            decompress: DecompressMode::Zstd,
            ..config
        };
        assert!(inspect(&args, &explicit).is_err());
    }

    #[test]
    fn test_unparsable_argument_renders_error_node() {
        let args = parse_args(&["not protobuf!"]);
        let report = inspect(&args, &ProtolensConfig::default()).expect("test: parse failure is not fatal");
        assert!(!report.is_success());
        assert!(report.bytes.is_empty());

        let json = report.render(OutputFormat::Json).expect("test: json");
        let value: serde_json::Value = serde_json::from_str(&json).expect("test: valid JSON");
        assert_eq!(value[0]["kind"], "error");
        assert!(
            value[0]["message"]
                .as_str()
                .is_some_and(|message| message.starts_with("Unrecognized input format"))
        );

        let tree = report.render(OutputFormat::Tree).expect("test: tree");
        assert!(tree.starts_with("error: Unrecognized input format"));
    }

    #[test]
    fn test_decode_failure_renders_error_node() {
        let report = inspect(&parse_args(&["08"]), &ProtolensConfig::default()).expect("test: inspect");
        assert!(!report.is_success());
        let json = report.render(OutputFormat::Json).expect("test: json");
        let value: serde_json::Value = serde_json::from_str(&json).expect("test: valid JSON");
        assert_eq!(value[0]["kind"], "error");
        assert_eq!(value[0]["message"], "Truncated varint at offset 1");
    }

    #[test]
    fn test_render_debug() {
        let report = inspect(&parse_args(&["1A 02 08 07"]), &ProtolensConfig::default()).expect("test: inspect");
        assert_eq!(
            report.render(OutputFormat::Debug).expect("test: debug"),
            "Field 3 (Wire=LengthDelimited) {\n  Field 1 (Wire=Varint) => 07\n}\n"
        );
    }

    #[test]
    fn test_missing_file_is_an_error() {
        let dir = tempfile::tempdir().expect("test: tempdir");
        let args = Arguments {
            file: Some(dir.path().join("missing.bin")),
            ..Default::default()
        };
        assert!(matches!(
            inspect(&args, &ProtolensConfig::default()),
            Err(Error::Io { .. })
        ));
    }
}
