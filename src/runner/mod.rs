
use crate::record::ContentRecord;
use crate::registry::{ParseStreamFn, ParserHandler};
use futures::future;
use futures::stream::{self, BoxStream, Stream, StreamExt};
use std::fmt;
use std::sync::Arc;
use thiserror::Error;

/// Execution mode requested for a parser stack
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Mode {
    Sync,
    Async,
    Stream,
}

impl fmt::Display for Mode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            Mode::Sync => "sync",
            Mode::Async => "async",
            Mode::Stream => "stream",
        };
        f.write_str(name)
    }
}

/// Failures raised while running a parser stack
#[derive(Error, Debug)]
pub enum RunError {
    /// Configuration error: the stack was run in a mode one of its
    /// parsers does not expose
    #[error("Parser {index} does not support {mode} execution")]
    UnsupportedMode { index: usize, mode: Mode },

    /// A parser failed; carries the stack index and the original cause
    #[error("Parser {index} failed: {source}")]
    Handler {
        index: usize,
        #[source]
        source: Box<dyn std::error::Error + Send + Sync>,
    },
}

impl RunError {
    fn handler(index: usize, source: anyhow::Error) -> Self {
        RunError::Handler {
            index,
            source: source.into(),
        }
    }
}

/// Stream of records flowing out of a pipeline
pub type RecordStream = BoxStream<'static, Result<ContentRecord, RunError>>;

/// Thread a record through a stack using each parser's sync capability
///
/// Parsers run in registration order, each receiving the record produced
/// by the previous one. The first failure aborts the remainder.
pub fn run_sync(
    stack: &[Arc<ParserHandler>],
    mut record: ContentRecord,
) -> Result<ContentRecord, RunError> {
    for (index, handler) in stack.iter().enumerate() {
        let parse = handler
            .parse_sync_capability()
            .ok_or(RunError::UnsupportedMode {
                index,
                mode: Mode::Sync,
            })?;
        record = handler.apply_options(record);
        record = parse(record).map_err(|err| RunError::handler(index, err))?;
    }
    Ok(record)
}

/// Thread a record through a stack using each parser's async capability
///
/// Strictly sequential: the next parser is not invoked until the current
/// one's future resolves, and the first failure short-circuits the rest.
pub async fn run(
    stack: &[Arc<ParserHandler>],
    mut record: ContentRecord,
) -> Result<ContentRecord, RunError> {
    for (index, handler) in stack.iter().enumerate() {
        let parse = handler.parse_capability().ok_or(RunError::UnsupportedMode {
            index,
            mode: Mode::Async,
        })?;
        record = handler.apply_options(record);
        record = parse(record).await.map_err(|err| RunError::handler(index, err))?;
    }
    Ok(record)
}

/// Compose a stack's stream stages into a reusable pipeline
///
/// Every parser in the stack must expose `parse_stream`; a missing stage
/// is reported before any record flows.
pub fn pipeline(stack: &[Arc<ParserHandler>]) -> Result<RecordPipeline, RunError> {
    let mut stages = Vec::with_capacity(stack.len());
    for (index, handler) in stack.iter().enumerate() {
        let stage = handler
            .parse_stream_capability()
            .cloned()
            .ok_or(RunError::UnsupportedMode {
                index,
                mode: Mode::Stream,
            })?;
        stages.push((handler.clone(), stage));
    }
    Ok(RecordPipeline { stages })
}

/// Composed pipeline of stream-transform stages
///
/// Stages apply in stack order and record order is preserved through the
/// whole pipeline. A record that fails in one stage bypasses the stages
/// after it and surfaces as an `Err` item; other records keep flowing.
/// Back-pressure is whatever the underlying stream provides.
#[derive(Clone)]
pub struct RecordPipeline {
    stages: Vec<(Arc<ParserHandler>, ParseStreamFn)>,
}

impl fmt::Debug for RecordPipeline {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("RecordPipeline")
            .field("stages", &self.stages.len())
            .finish()
    }
}

impl RecordPipeline {
    /// Number of stages in the pipeline
    pub fn len(&self) -> usize {
        self.stages.len()
    }

    pub fn is_empty(&self) -> bool {
        self.stages.is_empty()
    }

    /// Feed a stream of records through every stage in order
    pub fn apply<S>(&self, input: S) -> RecordStream
    where
        S: Stream<Item = ContentRecord> + Send + 'static,
    {
        let mut out: RecordStream = input.map(Ok).boxed();
        for (index, (handler, stage)) in self.stages.iter().enumerate() {
            let handler = handler.clone();
            let stage = stage.clone();
            out = out
                .flat_map(move |item| match item {
                    Ok(record) => {
                        let record = handler.apply_options(record);
                        stage(record)
                            .map(move |res| res.map_err(|err| RunError::handler(index, err)))
                            .boxed()
                    }
                    // Failed upstream; skip this stage
                    Err(err) => stream::once(future::ready(Err(err))).boxed(),
                })
                .boxed();
        }
        out
    }
}
