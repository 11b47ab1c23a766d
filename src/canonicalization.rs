//! JSON canonicalization for deterministic hashing.
//!
//! Implements strict canonical JSON serialization:
//! - UTF-8 encoding
//! - Object keys sorted lexicographically
//! - No insignificant whitespace
//! - Numbers rendered consistently
//! - Control characters escaped, all other text written verbatim
//!
//! Two JSON trees yield the same canonical string exactly when they hold
//! the same values; formatting and key order never leak into the output.

use crate::error::{PolicyError, Result};
use serde_json::Value;
use std::io::Write;

/// Renders a JSON value as its canonical string representation.
pub fn canonical_json(value: &Value) -> Result<String> {
    let mut output = Vec::new();
    write_canonical(&mut output, value)?;
    String::from_utf8(output).map_err(|e| PolicyError::CanonicalizationError(e.to_string()))
}

/// Computes the canonical hash of a JSON value.
pub fn canonical_hash(value: &Value) -> Result<String> {
    let canonical = canonical_json(value)?;
    Ok(crate::hash::sha256_str(&canonical))
}

/// Writes a canonical JSON representation to a writer.
fn write_canonical<W: Write>(writer: &mut W, value: &Value) -> Result<()> {
    match value {
        Value::Null => {
            writer.write_all(b"null")?;
        }
        Value::Bool(b) => {
            if *b {
                writer.write_all(b"true")?;
            } else {
                writer.write_all(b"false")?;
            }
        }
        Value::Number(n) => {
            // Use JSON's standard number serialization
            write!(writer, "{}", n)?;
        }
        Value::String(s) => {
            write_escaped_string(writer, s)?;
        }
        Value::Array(arr) => {
            writer.write_all(b"[")?;
            let mut first = true;
            for item in arr {
                if !first {
                    writer.write_all(b",")?;
                }
                first = false;
                write_canonical(writer, item)?;
            }
            writer.write_all(b"]")?;
        }
        Value::Object(obj) => {
            writer.write_all(b"{")?;
            // Sort keys lexicographically
            let mut keys: Vec<&String> = obj.keys().collect();
            keys.sort();

            let mut first = true;
            for key in keys {
                if let Some(value) = obj.get(key) {
                    if !first {
                        writer.write_all(b",")?;
                    }
                    first = false;
                    write_escaped_string(writer, key)?;
                    writer.write_all(b":")?;
                    write_canonical(writer, value)?;
                }
            }
            writer.write_all(b"}")?;
        }
    }
    Ok(())
}

/// Writes a JSON-escaped string.
fn write_escaped_string<W: Write>(writer: &mut W, s: &str) -> Result<()> {
    writer.write_all(b"\"")?;

    for c in s.chars() {
        match c {
            '"' => writer.write_all(b"\\\"")?,
            '\\' => writer.write_all(b"\\\\")?,
            '\n' => writer.write_all(b"\\n")?,
            '\r' => writer.write_all(b"\\r")?,
            '\t' => writer.write_all(b"\\t")?,
            c if c.is_control() => {
                // Escape control characters as \uXXXX
                write!(writer, "\\u{:04x}", c as u32)?;
            }
            c => {
                // Write UTF-8 bytes directly
                let mut buf = [0u8; 4];
                let bytes = c.encode_utf8(&mut buf);
                writer.write_all(bytes.as_bytes())?;
            }
        }
    }

    writer.write_all(b"\"")?;
    Ok(())
}

impl From<std::io::Error> for PolicyError {
    fn from(err: std::io::Error) -> Self {
        PolicyError::CanonicalizationError(err.to_string())
    }
}
