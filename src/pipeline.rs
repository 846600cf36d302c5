//! Pipeline
//!
//! A minimal host for file stages. Each stage sees files one at a time in
//! arrival order, may emit zero or more files per input, and gets one flush
//! call once its upstream is exhausted. Anything a stage emits is forwarded
//! to the next stage immediately.

use crate::error::RevError;
use crate::file::FileRecord;
use futures::{Stream, StreamExt};
use tracing::{debug, error};

/// Collects files emitted by a stage.
#[derive(Debug, Default)]
pub struct Emitter {
    files: Vec<FileRecord>,
}

impl Emitter {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn push(&mut self, file: FileRecord) {
        self.files.push(file);
    }

    pub fn len(&self) -> usize {
        self.files.len()
    }

    pub fn is_empty(&self) -> bool {
        self.files.is_empty()
    }

    pub fn into_files(self) -> Vec<FileRecord> {
        self.files
    }
}

/// A pipeline stage.
///
/// `transform` is synchronous; `flush` may suspend (for example to read an
/// existing file from disk). A stage instance holds the state of exactly one
/// run.
#[async_trait::async_trait]
pub trait Stage: Send {
    /// Name used in log output
    fn name(&self) -> &str;

    /// Process one file, emitting whatever should go downstream.
    fn transform(&mut self, file: FileRecord, out: &mut Emitter) -> Result<(), RevError>;

    /// Called once after the last input file.
    async fn flush(&mut self, out: &mut Emitter) -> Result<(), RevError>;
}

/// Ordered chain of stages
#[derive(Default)]
pub struct Pipeline {
    stages: Vec<Box<dyn Stage>>,
}

impl Pipeline {
    pub fn new() -> Self {
        Self::default()
    }

    /// Append a stage to the end of the chain.
    pub fn pipe<S: Stage + 'static>(mut self, stage: S) -> Self {
        self.stages.push(Box::new(stage));
        self
    }

    pub fn len(&self) -> usize {
        self.stages.len()
    }

    pub fn is_empty(&self) -> bool {
        self.stages.is_empty()
    }

    /// Drive `input` through every stage and collect what leaves the last one.
    ///
    /// The first error from any stage aborts the run.
    pub async fn run<S>(&mut self, input: S) -> Result<Vec<FileRecord>, RevError>
    where
        S: Stream<Item = FileRecord>,
    {
        futures::pin_mut!(input);
        let mut output = Vec::new();

        while let Some(file) = input.next().await {
            self.feed(0, vec![file], &mut output)?;
        }

        for idx in 0..self.stages.len() {
            let mut emitter = Emitter::new();
            let stage = &mut self.stages[idx];
            if let Err(e) = stage.flush(&mut emitter).await {
                error!(stage = stage.name(), error = %e, "Stage flush failed");
                return Err(e);
            }
            debug!(stage = stage.name(), emitted = emitter.len(), "Stage flushed");
            self.feed(idx + 1, emitter.into_files(), &mut output)?;
        }

        Ok(output)
    }

    /// Convenience wrapper over [`Pipeline::run`] for in-memory inputs.
    pub async fn run_all<I>(&mut self, files: I) -> Result<Vec<FileRecord>, RevError>
    where
        I: IntoIterator<Item = FileRecord>,
    {
        self.run(futures::stream::iter(files)).await
    }

    fn feed(
        &mut self,
        start: usize,
        files: Vec<FileRecord>,
        output: &mut Vec<FileRecord>,
    ) -> Result<(), RevError> {
        let mut batch = files;
        for stage in self.stages.iter_mut().skip(start) {
            if batch.is_empty() {
                return Ok(());
            }
            let mut emitter = Emitter::new();
            for file in batch {
                if let Err(e) = stage.transform(file, &mut emitter) {
                    error!(stage = stage.name(), error = %e, "Stage transform failed");
                    return Err(e);
                }
            }
            batch = emitter.into_files();
        }
        output.extend(batch);
        Ok(())
    }
}
