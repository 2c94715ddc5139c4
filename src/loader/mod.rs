/*!
 * Workload Loader
 *
 * Line-oriented input format:
 *
 * ```text
 * 1000            # first line: pool capacity
 * 1 120           # id size
 * 2 300 4 25      # id size arrival duration
 * ```
 *
 * Blank lines and lines whose first character is `#` are skipped. Lines
 * with fewer than two leading integers, a non-positive size, a negative
 * id, or an id already taken are skipped with a warning. At most
 * `MAX_PROCESSES` descriptors are accepted.
 */

use crate::core::limits::{DEFAULT_PROCESS_DURATION, LARGE_PROCESS_ID, MAX_PROCESSES};
use crate::core::types::{Pid, Size};
use crate::process::ProcessDescriptor;
use miette::Diagnostic;
use serde::Serialize;
use std::collections::HashSet;
use std::fmt;
use std::path::Path;
use thiserror::Error;
use tracing::{info, warn};

/// Loader errors
#[derive(Error, Debug, Diagnostic)]
pub enum LoaderError {
    #[error("Could not read input file '{path}': {source}")]
    #[diagnostic(
        code(loader::io),
        help("Check that the file exists and is readable.")
    )]
    Io {
        path: String,
        #[source]
        source: std::io::Error,
    },

    #[error("Input is empty: expected the pool capacity on the first line")]
    #[diagnostic(code(loader::missing_capacity))]
    MissingCapacity,

    #[error("Invalid pool capacity '{0}'")]
    #[diagnostic(
        code(loader::invalid_capacity),
        help("The first line must be a positive integer.")
    )]
    InvalidCapacity(String),

    #[error("No valid processes found in input")]
    #[diagnostic(
        code(loader::no_processes),
        help("Each process line needs at least an id and a positive size.")
    )]
    NoProcesses,
}

/// Why a line was skipped
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum WarningKind {
    /// Fewer than two parseable fields
    MalformedLine,
    /// Size was zero or negative
    NonPositiveSize(i64),
    /// Id does not fit a process id
    InvalidId(i64),
    /// Id already used by an earlier line
    DuplicateId(Pid),
    /// Id reserved for the large allocation
    ReservedId(Pid),
}

/// A skipped input line
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct LoadWarning {
    /// 1-based line number
    pub line: usize,
    pub kind: WarningKind,
}

impl fmt::Display for LoadWarning {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        match self.kind {
            WarningKind::MalformedLine => {
                write!(f, "Line {} has invalid format, skipping", self.line)
            }
            WarningKind::NonPositiveSize(size) => write!(
                f,
                "Line {} has invalid process size ({}), skipping",
                self.line, size
            ),
            WarningKind::InvalidId(id) => {
                write!(f, "Line {} has invalid process id ({}), skipping", self.line, id)
            }
            WarningKind::DuplicateId(id) => {
                write!(f, "Line {} repeats process id {}, skipping", self.line, id)
            }
            WarningKind::ReservedId(id) => write!(
                f,
                "Line {} uses reserved process id {}, skipping",
                self.line, id
            ),
        }
    }
}

/// Parsed input
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Workload {
    pub capacity: Size,
    pub processes: Vec<ProcessDescriptor>,
    pub warnings: Vec<LoadWarning>,
    /// Lines remained after the descriptor limit was reached
    pub truncated: bool,
}

/// Read and parse a workload file
pub fn load_from_path(path: impl AsRef<Path>) -> Result<Workload, LoaderError> {
    let path = path.as_ref();
    let text = std::fs::read_to_string(path).map_err(|source| LoaderError::Io {
        path: path.display().to_string(),
        source,
    })?;
    let workload = load_from_str(&text)?;
    info!(
        path = %path.display(),
        capacity = workload.capacity,
        processes = workload.processes.len(),
        "Loaded workload"
    );
    Ok(workload)
}

/// Parse a workload, accepting at most `MAX_PROCESSES` descriptors
pub fn load_from_str(text: &str) -> Result<Workload, LoaderError> {
    load_with_limit(text, MAX_PROCESSES)
}

/// Parse a workload, accepting at most `limit` descriptors
pub fn load_with_limit(text: &str, limit: usize) -> Result<Workload, LoaderError> {
    let mut lines = text.lines().enumerate();

    let capacity = match lines.next() {
        Some((_, line)) => parse_capacity(line)?,
        None => return Err(LoaderError::MissingCapacity),
    };

    let mut processes = Vec::new();
    let mut warnings = Vec::new();
    let mut truncated = false;
    let mut seen = HashSet::new();

    for (idx, line) in lines {
        let trimmed = line.trim();
        if trimmed.is_empty() || line.starts_with('#') {
            continue;
        }
        if processes.len() >= limit {
            truncated = true;
            break;
        }

        let parsed = parse_descriptor(trimmed).and_then(|desc| {
            if desc.id == LARGE_PROCESS_ID {
                Err(WarningKind::ReservedId(desc.id))
            } else if !seen.insert(desc.id) {
                Err(WarningKind::DuplicateId(desc.id))
            } else {
                Ok(desc)
            }
        });

        match parsed {
            Ok(desc) => processes.push(desc),
            Err(kind) => {
                let warning = LoadWarning {
                    line: idx + 1,
                    kind,
                };
                warn!("{}", warning);
                warnings.push(warning);
            }
        }
    }

    if truncated {
        warn!(limit, "Process limit reached, remaining input ignored");
    }
    if processes.is_empty() {
        return Err(LoaderError::NoProcesses);
    }

    Ok(Workload {
        capacity,
        processes,
        warnings,
        truncated,
    })
}

fn parse_capacity(line: &str) -> Result<Size, LoaderError> {
    let token = line.split_whitespace().next().unwrap_or("");
    match token.parse::<i64>() {
        Ok(value) if value > 0 => {
            Size::try_from(value).map_err(|_| LoaderError::InvalidCapacity(token.to_string()))
        }
        _ => Err(LoaderError::InvalidCapacity(token.to_string())),
    }
}

/// Parse `id size [arrival] [duration]`, reading integers until the first
/// token that is not one
fn parse_descriptor(line: &str) -> Result<ProcessDescriptor, WarningKind> {
    let fields: Vec<i64> = line
        .split_whitespace()
        .take(4)
        .map_while(|tok| tok.parse::<i64>().ok())
        .collect();

    if fields.len() < 2 {
        return Err(WarningKind::MalformedLine);
    }

    let (raw_id, raw_size) = (fields[0], fields[1]);
    if raw_size <= 0 {
        return Err(WarningKind::NonPositiveSize(raw_size));
    }
    let id = Pid::try_from(raw_id).map_err(|_| WarningKind::InvalidId(raw_id))?;
    let size = Size::try_from(raw_size).map_err(|_| WarningKind::NonPositiveSize(raw_size))?;

    Ok(ProcessDescriptor {
        id,
        size,
        arrival: field_or(&fields, 2, 0),
        duration: field_or(&fields, 3, DEFAULT_PROCESS_DURATION),
    })
}

fn field_or(fields: &[i64], idx: usize, default: u32) -> u32 {
    fields
        .get(idx)
        .and_then(|v| u32::try_from(*v).ok())
        .unwrap_or(default)
}
