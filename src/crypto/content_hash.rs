// Copyright (c) 2025 Fabstir
// SPDX-License-Identifier: BUSL-1.1
//! Record Content Hashing
//!
//! SHA-256 pointers for records handed to content-addressed storage and the
//! ledger. Text is hashed as its UTF-8 bytes. JSON objects are rendered
//! canonically first:
//!
//! - keys sorted at every level
//! - separators `", "` and `": "`
//! - everything outside printable ASCII escaped as `\uXXXX`, with surrogate
//!   pairs above U+FFFF
//!
//! so `{"name": "John", "age": 19}` hashes as the string
//! `{"age": 19, "name": "John"}`. Numbers are written the way `serde_json`
//! writes them.

use crate::crypto::error::{CryptoError, Result};
use serde::Serialize;
use serde_json::{ser::Formatter, Map, Value};
use sha2::{Digest, Sha256};
use std::io;

/// Content accepted for hashing
#[derive(Debug, Clone, PartialEq)]
pub enum RecordContent {
    Text(String),
    Json(Map<String, Value>),
}

impl RecordContent {
    /// Accept a JSON string or object; any other JSON type is rejected
    pub fn from_value(value: Value) -> Result<Self> {
        match value {
            Value::String(text) => Ok(RecordContent::Text(text)),
            Value::Object(map) => Ok(RecordContent::Json(map)),
            other => Err(CryptoError::InvalidPayload {
                field: "record".to_string(),
                reason: format!(
                    "data must be either a string or a JSON object, got {}",
                    json_type_name(&other)
                ),
            }),
        }
    }

    /// String whose UTF-8 bytes are hashed
    pub fn canonical_string(&self) -> String {
        match self {
            RecordContent::Text(text) => text.clone(),
            RecordContent::Json(map) => {
                let sorted = sort_json_keys(&Value::Object(map.clone()));
                let mut out = Vec::new();
                let mut serializer =
                    serde_json::Serializer::with_formatter(&mut out, SpacedAsciiFormatter);
                // Writing a Value into a Vec cannot fail
                if sorted.serialize(&mut serializer).is_err() {
                    return String::new();
                }
                // Formatter only ever emits ASCII
                String::from_utf8(out).unwrap_or_default()
            }
        }
    }
}

impl From<&str> for RecordContent {
    fn from(text: &str) -> Self {
        RecordContent::Text(text.to_string())
    }
}

impl From<String> for RecordContent {
    fn from(text: String) -> Self {
        RecordContent::Text(text)
    }
}

fn json_type_name(value: &Value) -> &'static str {
    match value {
        Value::Null => "null",
        Value::Bool(_) => "boolean",
        Value::Number(_) => "number",
        Value::String(_) => "string",
        Value::Array(_) => "array",
        Value::Object(_) => "object",
    }
}

/// Recursively sort object keys
pub fn sort_json_keys(value: &Value) -> Value {
    match value {
        Value::Object(map) => {
            let mut sorted: Map<String, Value> = Map::new();
            let mut keys: Vec<_> = map.keys().collect();
            keys.sort();
            for key in keys {
                sorted.insert(key.clone(), sort_json_keys(&map[key]));
            }
            Value::Object(sorted)
        }
        Value::Array(arr) => Value::Array(arr.iter().map(sort_json_keys).collect()),
        _ => value.clone(),
    }
}

/// `", "` / `": "` separators, non-printable-ASCII escaped
struct SpacedAsciiFormatter;

impl Formatter for SpacedAsciiFormatter {
    fn begin_array_value<W: ?Sized + io::Write>(
        &mut self,
        writer: &mut W,
        first: bool,
    ) -> io::Result<()> {
        if first {
            Ok(())
        } else {
            writer.write_all(b", ")
        }
    }

    fn begin_object_key<W: ?Sized + io::Write>(
        &mut self,
        writer: &mut W,
        first: bool,
    ) -> io::Result<()> {
        if first {
            Ok(())
        } else {
            writer.write_all(b", ")
        }
    }

    fn begin_object_value<W: ?Sized + io::Write>(&mut self, writer: &mut W) -> io::Result<()> {
        writer.write_all(b": ")
    }

    fn write_string_fragment<W: ?Sized + io::Write>(
        &mut self,
        writer: &mut W,
        fragment: &str,
    ) -> io::Result<()> {
        for ch in fragment.chars() {
            if (' '..='~').contains(&ch) {
                let mut buf = [0u8; 1];
                writer.write_all(ch.encode_utf8(&mut buf).as_bytes())?;
            } else {
                let mut units = [0u16; 2];
                for unit in ch.encode_utf16(&mut units) {
                    write!(writer, "\\u{:04x}", unit)?;
                }
            }
        }
        Ok(())
    }
}

/// SHA-256 of the record's canonical string
pub fn hash_data(content: &RecordContent) -> [u8; 32] {
    Sha256::digest(content.canonical_string().as_bytes()).into()
}

/// Hex-encoded [`hash_data`]
pub fn hash_hex(content: &RecordContent) -> String {
    hex::encode(hash_data(content))
}
