//! Line-oriented parser for CAVP response files.
//!
//! ```text
//! # CAVS 11.0
//! [P-256,SHA-256]
//!
//! Msg = 5905...
//! d = 519b...
//! ...
//! S = 8bf7...
//! ```

#![forbid(unsafe_code)]

use std::collections::BTreeMap;
use std::fs;
use std::path::Path;
use std::str::FromStr;

use nistec_crypto::{CurveId, HashAlgorithm};

use crate::error::CavpError;

/// Which CAVP file a text comes from; decides the field that closes a record.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum VectorKind {
    SigGen,
    SigVer,
    KeyPair,
}

impl VectorKind {
    fn terminal_field(self) -> &'static str {
        match self {
            Self::SigGen => "S",
            Self::SigVer => "Result",
            Self::KeyPair => "Qy",
        }
    }
}

/// One bracketed section, e.g. `[P-384,SHA-512]`.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Section {
    /// Line of the header (1-based).
    pub line: usize,
    /// Curve name as written, e.g. `P-384` or `B-233`.
    pub curve: String,
    /// Hash name as written, absent for `KeyPair.rsp` sections.
    pub hash: Option<String>,
    pub records: Vec<Record>,
}

impl Section {
    pub fn header(&self) -> String {
        match &self.hash {
            Some(hash) => format!("[{},{}]", self.curve, hash),
            None => format!("[{}]", self.curve),
        }
    }

    /// Curve if it is one of the supported NIST prime curves.
    pub fn curve_id(&self) -> Option<CurveId> {
        CurveId::from_str(&self.curve).ok()
    }

    /// Hash if it is a supported SHA-2 variant.
    pub fn hash_algorithm(&self) -> Option<HashAlgorithm> {
        self.hash.as_deref().and_then(|h| HashAlgorithm::from_str(h).ok())
    }
}

/// One test case: hex fields decoded to bytes, plus the raw `Result` text.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct Record {
    /// Line of the terminal field (1-based).
    pub line: usize,
    pub fields: BTreeMap<String, Vec<u8>>,
    /// `Result` as written, e.g. `P (0 )` or `F (3 - S changed)`.
    pub result: Option<String>,
}

impl Record {
    pub fn get(&self, field: &str) -> Option<&[u8]> {
        self.fields.get(field).map(Vec::as_slice)
    }

    /// Expected verification outcome of a SigVer record.
    pub fn expects_pass(&self) -> Option<bool> {
        match self.result.as_deref()?.trim_start().chars().next()? {
            'P' => Some(true),
            'F' => Some(false),
            _ => None,
        }
    }
}

/// Parse the text of a CAVP file.
///
/// Records that are still open when a section ends are dropped.
pub fn parse(text: &str, kind: VectorKind) -> Result<Vec<Section>, CavpError> {
    let terminal = kind.terminal_field();
    let mut sections: Vec<Section> = Vec::new();
    let mut current = Record::default();

    for (index, raw) in text.lines().enumerate() {
        let line_no = index + 1;
        let line = raw.trim();

        if line.is_empty() || line.starts_with('#') {
            continue;
        }

        if let Some(inner) = line.strip_prefix('[').and_then(|l| l.strip_suffix(']')) {
            current = Record::default();
            let (curve, hash) = match inner.split_once(',') {
                Some((curve, hash)) => (curve.trim(), Some(hash.trim().to_string())),
                None => (inner.trim(), None),
            };
            sections.push(Section {
                line: line_no,
                curve: curve.to_string(),
                hash,
                records: Vec::new(),
            });
            continue;
        }

        let Some((key, value)) = line.split_once('=') else {
            return Err(CavpError::Parse {
                line: line_no,
                message: format!("expected `key = value`, found `{line}`"),
            });
        };
        let key = key.trim();
        let value = value.trim();

        let Some(section) = sections.last_mut() else {
            return Err(CavpError::Parse {
                line: line_no,
                message: format!("field `{key}` before any section header"),
            });
        };

        if key == "Result" {
            current.result = Some(value.to_string());
        } else {
            current.fields.insert(key.to_string(), decode_hex(value, key, line_no)?);
        }

        if key == terminal {
            current.line = line_no;
            section.records.push(std::mem::take(&mut current));
        }
    }

    Ok(sections)
}

/// Read and parse a CAVP file from disk.
pub fn parse_file(path: impl AsRef<Path>, kind: VectorKind) -> Result<Vec<Section>, CavpError> {
    let text = fs::read_to_string(path)?;
    parse(&text, kind)
}

/// Decode hex, left-padding odd-length values with a zero nibble.
fn decode_hex(value: &str, field: &str, line: usize) -> Result<Vec<u8>, CavpError> {
    let padded;
    let value = if value.len() % 2 == 1 {
        padded = format!("0{value}");
        padded.as_str()
    } else {
        value
    };
    hex::decode(value).map_err(|_| CavpError::InvalidHex {
        line,
        field: field.to_string(),
    })
}
