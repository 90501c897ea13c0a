//! Subprocess-orchestrated wrapper around the external asset parser
//! (spec §4.4). Owns no state beyond the resolved binary path and a
//! resolved-profile path.

use std::io::Write;
use std::path::{Path, PathBuf};
use std::process::{Child, Command, Stdio};
use std::time::{Duration, Instant};

use serde_json::Value;

use crate::commands::{BatchCommand, SingleCommand};
use crate::error::{Error, Result};
use crate::protocol::{decode_json, decode_ndjson, parse_references_xml, BatchLine, ParsedReferences};

const POLL_INTERVAL: Duration = Duration::from_millis(25);

/// Single-asset or batch call outcome, decoded but not yet interpreted by
/// the indexer.
#[derive(Debug, Clone)]
pub enum SingleOutput {
    Json(Value),
    Xml(ParsedReferences),
}

#[derive(Debug, Clone, Default)]
pub struct BatchOutcome {
    pub records: Vec<Value>,
    pub errors: usize,
    pub timed_out: bool,
}

/// Behavior the indexer depends on; a fake implementation backs tests
/// (spec §4.4 "the adapter owns no state beyond the resolved binary path
/// and a resolved-profile path").
pub trait ParserAdapter: Send + Sync {
    fn run_single(&self, command: SingleCommand, path: &Path, timeout: Duration) -> Result<SingleOutput>;
    fn run_batch(&self, command: BatchCommand, paths: &[PathBuf], timeout: Duration) -> Result<BatchOutcome>;
}

pub struct SubprocessParserAdapter {
    binary_path: PathBuf,
    resolved_profile_path: Option<PathBuf>,
}

impl SubprocessParserAdapter {
    #[must_use]
    pub fn new(binary_path: PathBuf, resolved_profile_path: Option<PathBuf>) -> Self {
        Self {
            binary_path,
            resolved_profile_path,
        }
    }

    fn spawn(&self, command: &str, arg: &str) -> Result<Child> {
        let mut cmd = Command::new(&self.binary_path);
        cmd.arg(command).arg(arg);
        if let Some(profile) = &self.resolved_profile_path {
            cmd.arg("--type-config").arg(profile);
        }
        cmd.stdin(Stdio::null()).stdout(Stdio::piped()).stderr(Stdio::piped());
        Ok(cmd.spawn()?)
    }

    fn wait_with_timeout(mut child: Child, timeout: Duration) -> Result<(String, bool)> {
        let deadline = Instant::now() + timeout;
        loop {
            if let Some(status) = child.try_wait()? {
                let mut stdout = String::new();
                if let Some(mut out) = child.stdout.take() {
                    use std::io::Read;
                    out.read_to_string(&mut stdout)?;
                }
                if !status.success() {
                    tracing::warn!(code = status.code(), "parser subprocess exited non-zero");
                }
                return Ok((stdout, false));
            }
            if Instant::now() >= deadline {
                let _ = child.kill();
                let _ = child.wait();
                return Ok((String::new(), true));
            }
            std::thread::sleep(POLL_INTERVAL);
        }
    }

    fn write_batch_file(paths: &[PathBuf]) -> Result<tempfile::NamedTempFile> {
        let mut file = tempfile::NamedTempFile::new()?;
        for path in paths {
            writeln!(file, "{}", path.display())?;
        }
        file.flush()?;
        Ok(file)
    }
}

impl ParserAdapter for SubprocessParserAdapter {
    fn run_single(&self, command: SingleCommand, path: &Path, timeout: Duration) -> Result<SingleOutput> {
        let child = self.spawn(command.as_str(), &path.to_string_lossy())?;
        let (stdout, timed_out) = Self::wait_with_timeout(child, timeout)?;
        if timed_out {
            return Err(Error::Timeout(timeout.as_secs()));
        }
        if command.emits_xml() {
            Ok(SingleOutput::Xml(parse_references_xml(&stdout)))
        } else {
            Ok(SingleOutput::Json(decode_json(&stdout)?))
        }
    }

    fn run_batch(&self, command: BatchCommand, paths: &[PathBuf], timeout: Duration) -> Result<BatchOutcome> {
        let batch_file = Self::write_batch_file(paths)?;
        let child = self.spawn(command.as_str(), &batch_file.path().to_string_lossy())?;
        let (stdout, timed_out) = Self::wait_with_timeout(child, timeout)?;
        if timed_out {
            return Ok(BatchOutcome {
                records: Vec::new(),
                errors: paths.len(),
                timed_out: true,
            });
        }

        let mut outcome = BatchOutcome::default();
        for line in decode_ndjson(&stdout) {
            match line {
                BatchLine::Record(v) => outcome.records.push(v),
                BatchLine::Error(_) | BatchLine::Malformed(_) => outcome.errors += 1,
            }
        }
        Ok(outcome)
    }
}
