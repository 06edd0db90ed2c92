//! Line codec for ledger records.
//!
//! One record per line, CRLF-terminated:
//!
//! ```text
//! <file_name>, <offset>, <status>\r\n
//! ```
//!
//! Ledgers written before the status column existed carry only
//! `<file_name>, <offset>`; those lines decode with [`Status::Success`].

use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};
use xeship_core::LedgerError;

/// Whether a recorded position can be trusted on resume.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Status {
    /// Resume from the recorded file and offset.
    #[serde(rename = "good")]
    Success,
    /// Ignore the recorded position and start from the earliest data.
    Reset,
}

impl Status {
    pub fn as_str(&self) -> &'static str {
        match self {
            Status::Success => "good",
            Status::Reset => "reset",
        }
    }
}

impl fmt::Display for Status {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for Status {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "good" => Ok(Status::Success),
            "reset" => Ok(Status::Reset),
            other => Err(format!("unknown status {other:?}")),
        }
    }
}

/// "Everything in `file_name` up to `offset` has been forwarded."
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ProgressRecord {
    pub file_name: String,
    pub offset: i64,
    pub status: Status,
}

impl ProgressRecord {
    pub fn new(file_name: impl Into<String>, offset: i64, status: Status) -> Self {
        Self {
            file_name: file_name.into(),
            offset,
            status,
        }
    }

    /// Resume point of a source that has never been read.
    pub fn start() -> Self {
        Self::new("", 0, Status::Success)
    }

    /// Resume point handed out when the ledger cannot be trusted.
    pub fn reset() -> Self {
        Self::new("", 0, Status::Reset)
    }

    pub fn is_reset(&self) -> bool {
        self.status == Status::Reset
    }

    /// Check that the record decodes back to itself once encoded. The file
    /// name is free text but must not carry the field or line separators, nor
    /// surrounding whitespace that decoding would trim.
    pub fn validate(&self) -> Result<(), LedgerError> {
        let name = &self.file_name;
        if name.contains([',', '\r', '\n']) {
            return Err(LedgerError::InvalidRecord(format!(
                "file name {name:?} contains a separator"
            )));
        }
        if name.trim() != name {
            return Err(LedgerError::InvalidRecord(format!(
                "file name {name:?} has surrounding whitespace"
            )));
        }
        Ok(())
    }

    /// Encode as one ledger line, including the trailing CRLF.
    pub fn encode(&self) -> String {
        format!("{}, {}, {}\r\n", self.file_name, self.offset, self.status)
    }

    /// Decode one ledger line. `line_no` is 1-based and only used in errors.
    ///
    /// Blank lines decode to `None`.
    pub fn decode(line: &str, line_no: usize) -> Result<Option<Self>, LedgerError> {
        let line = line.trim_end_matches(['\r', '\n']);
        if line.trim().is_empty() {
            return Ok(None);
        }

        let fields: Vec<&str> = line.split(',').collect();
        if fields.len() < 2 || fields.len() > 3 {
            return Err(LedgerError::corrupt(
                line_no,
                format!("expected 2 or 3 fields; got {} ({line:?})", fields.len()),
            ));
        }

        let file_name = fields[0].trim().to_string();
        let offset = fields[1].trim().parse::<i64>().map_err(|_| {
            LedgerError::corrupt(line_no, format!("bad offset {:?}", fields[1].trim()))
        })?;
        let status = match fields.get(2) {
            Some(raw) => raw
                .trim()
                .parse::<Status>()
                .map_err(|reason| LedgerError::corrupt(line_no, reason))?,
            None => Status::Success,
        };

        Ok(Some(Self {
            file_name,
            offset,
            status,
        }))
    }
}
