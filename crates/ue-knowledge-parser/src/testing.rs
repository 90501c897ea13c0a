//! An in-process test double for [`ParserAdapter`], standing in for the
//! external binary in indexer-level tests (spec §4.4, §8 scenarios).

use std::path::{Path, PathBuf};
use std::sync::Mutex;
use std::time::Duration;

use crate::adapter::{BatchOutcome, ParserAdapter, SingleOutput};
use crate::commands::{BatchCommand, SingleCommand};
use crate::error::Result;

#[derive(Default)]
pub struct FakeParserAdapter {
    pub batch_responses: Mutex<Vec<BatchOutcome>>,
    pub single_responses: Mutex<Vec<SingleOutput>>,
}

impl ParserAdapter for FakeParserAdapter {
    fn run_single(&self, _command: SingleCommand, _path: &Path, _timeout: Duration) -> Result<SingleOutput> {
        Ok(self.single_responses.lock().unwrap().remove(0))
    }

    fn run_batch(&self, _command: BatchCommand, _paths: &[PathBuf], _timeout: Duration) -> Result<BatchOutcome> {
        Ok(self.batch_responses.lock().unwrap().remove(0))
    }
}
