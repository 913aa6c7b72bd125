// 🗄️ Registration Log - append-only text file of delimited records
//
// Layout of one block:
//
//   (blank line)
//   ==================================================
//   Registration Date: 2024-03-09 12:00:05
//   --------------------------------------------------
//   Name: Ada Lovelace
//   ...
//   Notes: None
//   ==================================================
//
// Values spanning several lines continue on lines indented by two spaces,
// so no value line can ever read as a banner or a field key.

use crate::record::{RegistrationRecord, FIELD_KEYS, TIMESTAMP_FORMAT};
use chrono::NaiveDateTime;
use log::{debug, info, warn};
use std::fs::OpenOptions;
use std::io::{self, Write};
use std::path::{Path, PathBuf};

pub const RULE_WIDTH: usize = 50;
pub const DATE_KEY: &str = "Registration Date";
pub const CONTINUATION_INDENT: &str = "  ";

fn banner() -> String {
    "=".repeat(RULE_WIDTH)
}

fn separator() -> String {
    "-".repeat(RULE_WIDTH)
}

// ============================================================================
// ERRORS
// ============================================================================

/// Writing a record to the log failed. Nothing is retried or rolled back.
#[derive(Debug, thiserror::Error)]
pub enum PersistError {
    #[error("could not open {path}: {source}")]
    Open {
        path: PathBuf,
        #[source]
        source: io::Error,
    },

    #[error("could not write to {path}: {source}")]
    Write {
        path: PathBuf,
        #[source]
        source: io::Error,
    },
}

#[derive(Debug, thiserror::Error)]
pub enum ParseLogError {
    #[error("line {line}: expected {expected}, found {found:?}")]
    UnexpectedLine {
        line: usize,
        expected: String,
        found: String,
    },

    #[error("line {line}: invalid registration date {value:?}")]
    BadTimestamp { line: usize, value: String },

    #[error("could not read {path}: {source}")]
    Read {
        path: PathBuf,
        #[source]
        source: io::Error,
    },
}

// ============================================================================
// SINK
// ============================================================================

/// Destination for finished records
pub trait RegistrationSink {
    fn append(&mut self, record: &RegistrationRecord) -> Result<(), PersistError>;

    /// Human readable name of the target, used in confirmations
    fn describe(&self) -> String;
}

/// Append-only text file sink
#[derive(Debug, Clone)]
pub struct LogFileSink {
    path: PathBuf,
}

impl LogFileSink {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        LogFileSink { path: path.into() }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }
}

impl RegistrationSink for LogFileSink {
    fn append(&mut self, record: &RegistrationRecord) -> Result<(), PersistError> {
        append_record(record, &self.path)
    }

    fn describe(&self) -> String {
        self.path.display().to_string()
    }
}

/// Render one record as a log block
pub fn format_block(record: &RegistrationRecord) -> String {
    let mut block = String::new();
    block.push('\n');
    block.push_str(&banner());
    block.push('\n');
    block.push_str(&format!("{}: {}\n", DATE_KEY, record.formatted_date()));
    block.push_str(&separator());
    block.push('\n');
    for (key, value) in record.fields() {
        let mut lines = value.split('\n');
        block.push_str(&format!("{}: {}\n", key, lines.next().unwrap_or_default()));
        for line in lines {
            block.push_str(CONTINUATION_INDENT);
            block.push_str(line);
            block.push('\n');
        }
    }
    block.push_str(&banner());
    block.push('\n');
    block
}

/// Append one record to the log at `path`, creating the file if needed.
///
/// The handle is dropped on every return path.
pub fn append_record(record: &RegistrationRecord, path: &Path) -> Result<(), PersistError> {
    let mut file = OpenOptions::new()
        .create(true)
        .append(true)
        .open(path)
        .map_err(|source| PersistError::Open {
            path: path.to_path_buf(),
            source,
        })?;

    let block = format_block(record);
    file.write_all(block.as_bytes())
        .and_then(|_| file.flush())
        .map_err(|source| PersistError::Write {
            path: path.to_path_buf(),
            source,
        })?;

    info!("appended registration for {:?} to {}", record.name, path.display());
    Ok(())
}

// ============================================================================
// READER
// ============================================================================

/// Read every record from the log. A missing file holds no records.
pub fn read_log(path: &Path) -> Result<Vec<RegistrationRecord>, ParseLogError> {
    let text = match std::fs::read_to_string(path) {
        Ok(text) => text,
        Err(err) if err.kind() == io::ErrorKind::NotFound => {
            debug!("{} does not exist yet", path.display());
            return Ok(Vec::new());
        }
        Err(source) => {
            return Err(ParseLogError::Read {
                path: path.to_path_buf(),
                source,
            })
        }
    };
    parse_log(&text)
}

enum State {
    /// Between records; blank lines allowed
    Idle,
    /// Opening banner seen
    Opened,
    /// Date line seen, waiting for the separator
    Dated(NaiveDateTime),
    /// Reading `Key: Value` lines; `fields` holds the values read so far.
    /// `kept_banner` is the first full-width banner taken as note text.
    Body {
        date: NaiveDateTime,
        fields: Vec<String>,
        kept_banner: Option<usize>,
    },
}

/// Parse log text back into records.
///
/// Lines inside a field that do not start the next expected key are
/// continuation lines of the current value. Once every field is read, a
/// banner only closes the block when the next non-blank line is another
/// banner or the end of the text; older logs wrote notes unindented. An
/// unfinished trailing block (interrupted write) is dropped with a warning.
pub fn parse_log(text: &str) -> Result<Vec<RegistrationRecord>, ParseLogError> {
    let banner = banner();
    let separator = separator();
    let date_prefix = format!("{}: ", DATE_KEY);

    let lines: Vec<&str> = text.lines().map(|raw| raw.trim_end_matches('\r')).collect();
    let mut records = Vec::new();
    let mut state = State::Idle;
    let mut block_start = 0;

    for (index, &line) in lines.iter().enumerate() {
        let line_no = index + 1;

        state = match state {
            State::Idle => {
                if line.trim().is_empty() {
                    State::Idle
                } else if line == banner {
                    block_start = line_no;
                    State::Opened
                } else {
                    return Err(unexpected(line_no, "record banner", line));
                }
            }

            State::Opened => {
                let value = line
                    .strip_prefix(&date_prefix)
                    .ok_or_else(|| unexpected(line_no, "registration date", line))?;
                let date = NaiveDateTime::parse_from_str(value.trim(), TIMESTAMP_FORMAT)
                    .map_err(|_| ParseLogError::BadTimestamp {
                        line: line_no,
                        value: value.to_string(),
                    })?;
                State::Dated(date)
            }

            State::Dated(date) => {
                if line != separator {
                    return Err(unexpected(line_no, "separator line", line));
                }
                State::Body {
                    date,
                    fields: Vec::with_capacity(FIELD_KEYS.len()),
                    kept_banner: None,
                }
            }

            State::Body {
                date,
                mut fields,
                mut kept_banner,
            } => {
                let complete = fields.len() == FIELD_KEYS.len();
                if line == banner && complete && closes_block(&lines[index + 1..], &banner) {
                    records.push(build_record(date, fields));
                    State::Idle
                } else if line == banner && !complete {
                    // Interrupted block followed by a fresh one
                    warn!(
                        "dropping unfinished registration block starting at line {}",
                        block_start
                    );
                    block_start = line_no;
                    State::Opened
                } else if let Some(value) = FIELD_KEYS
                    .get(fields.len())
                    .and_then(|key| field_value(line, key))
                {
                    fields.push(value.to_string());
                    State::Body { date, fields, kept_banner }
                } else if let Some(current) = fields.last_mut() {
                    if line == banner && kept_banner.is_none() {
                        kept_banner = Some(index);
                    }
                    current.push('\n');
                    current.push_str(line.strip_prefix(CONTINUATION_INDENT).unwrap_or(line));
                    State::Body { date, fields, kept_banner }
                } else {
                    return Err(unexpected(line_no, FIELD_KEYS[0], line));
                }
            }
        };
    }

    if let State::Body {
        kept_banner: Some(index),
        ..
    } = state
    {
        // The block never closed after a banner was taken as note text, so
        // that banner was the real end and what follows it is damage
        if let Some((offset, found)) = next_non_blank(&lines[index + 1..]) {
            return Err(unexpected(index + offset + 2, "record banner", found));
        }
    }

    if !matches!(state, State::Idle) {
        warn!(
            "ignoring unfinished registration block starting at line {}",
            block_start
        );
    }

    debug!("parsed {} registration records", records.len());
    Ok(records)
}

fn next_non_blank<'a>(lines: &[&'a str]) -> Option<(usize, &'a str)> {
    lines
        .iter()
        .enumerate()
        .find(|(_, line)| !line.trim().is_empty())
        .map(|(offset, line)| (offset, *line))
}

fn closes_block(rest: &[&str], banner: &str) -> bool {
    match next_non_blank(rest) {
        None => true,
        Some((_, line)) => line == banner,
    }
}

fn field_value<'a>(line: &'a str, key: &str) -> Option<&'a str> {
    let rest = line.strip_prefix(key)?.strip_prefix(':')?;
    Some(rest.strip_prefix(' ').unwrap_or(rest))
}

fn build_record(date: NaiveDateTime, fields: Vec<String>) -> RegistrationRecord {
    let mut values = fields.into_iter();
    let mut next = || values.next().unwrap_or_default();
    RegistrationRecord {
        name: next(),
        email: next(),
        phone: next(),
        age: next(),
        rating: next(),
        experience_level: next(),
        category: next(),
        emergency_contact: next(),
        notes: next(),
        registration_date: date,
    }
}

fn unexpected(line: usize, expected: &str, found: &str) -> ParseLogError {
    ParseLogError::UnexpectedLine {
        line,
        expected: expected.to_string(),
        found: found.to_string(),
    }
}

// ============================================================================
// TESTS
// ============================================================================
