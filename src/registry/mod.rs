mod error;
mod handler;
mod key;

pub use error::RegistryError;
pub use handler::{ParseFn, ParseStreamFn, ParseSyncFn, ParserHandler, ParserHandlerBuilder};
pub use key::{ExtKey, WILDCARD};

use crate::parsers;
use crate::record::{ContentRecord, RecordInput};
use crate::runner::{self, RecordPipeline, RunError};
use serde_json::{Map, Value};
use std::collections::HashMap;
use std::sync::Arc;

/// Extension-keyed table of parser stacks
///
/// Each key maps to an ordered stack of descriptors; parsers registered
/// later run after parsers registered earlier under the same key. A fresh
/// registry seeds the wildcard bucket with the pass-through parser so
/// running content with no explicit registrations still succeeds.
#[derive(Debug)]
pub struct ParserRegistry {
    parsers: HashMap<ExtKey, Vec<Arc<ParserHandler>>>,
    options: Map<String, Value>,
}

impl ParserRegistry {
    /// Create a registry pre-seeded with the wildcard noop parser
    pub fn new() -> Self {
        let mut registry = Self::empty();
        registry.init();
        registry
    }

    /// Create a registry with no registrations at all
    pub fn empty() -> Self {
        Self {
            parsers: HashMap::new(),
            options: Map::new(),
        }
    }

    /// Reset the table and re-seed the default wildcard parser
    pub fn init(&mut self) {
        self.parsers.clear();
        // The noop descriptor always carries a parse capability
        let _ = self.register(WILDCARD, parsers::noop());
    }

    // ------------------------------------------------------------------
    // Registration and lookup
    // ------------------------------------------------------------------

    /// Append a parser descriptor to the stack registered under `ext`
    ///
    /// The key is canonicalized first, so `md` and `.md` address the same
    /// stack. A descriptor without a `parse` capability is rejected and
    /// the table is left untouched.
    pub fn register(
        &mut self,
        ext: &str,
        handler: ParserHandler,
    ) -> Result<&mut Self, RegistryError> {
        let key = ExtKey::new(ext)?;
        if !handler.has_parse() {
            return Err(RegistryError::MissingParse {
                ext: key.as_str().to_string(),
            });
        }
        self.parsers.entry(key).or_default().push(Arc::new(handler));
        Ok(self)
    }

    /// Wrap a bare callable and register it under `ext`
    pub fn register_fn<F>(&mut self, ext: &str, f: F) -> Result<&mut Self, RegistryError>
    where
        F: Fn(ContentRecord) -> anyhow::Result<ContentRecord> + Send + Sync + 'static,
    {
        self.register(ext, ParserHandler::from_fn(f))
    }

    /// Register a descriptor in the wildcard bucket
    pub fn register_default(&mut self, handler: ParserHandler) -> Result<&mut Self, RegistryError> {
        self.register(WILDCARD, handler)
    }

    /// Look up the stack registered under `ext`
    ///
    /// Returns `None` for unregistered (or structurally invalid) keys;
    /// lookups never fail and never fall back to the wildcard here.
    pub fn get(&self, ext: &str) -> Option<&[Arc<ParserHandler>]> {
        let key = ExtKey::new(ext).ok()?;
        self.parsers.get(&key).map(Vec::as_slice)
    }

    /// Read-only view of the whole table
    pub fn parsers(&self) -> &HashMap<ExtKey, Vec<Arc<ParserHandler>>> {
        &self.parsers
    }

    /// Remove the entry registered under `ext` entirely
    pub fn clear(&mut self, ext: &str) {
        if let Ok(key) = ExtKey::new(ext) {
            self.parsers.remove(&key);
        }
    }

    /// Reset the whole table
    ///
    /// Unlike [`init`](Self::init), nothing is re-seeded; only explicit
    /// registrations repopulate the table afterwards.
    pub fn clear_all(&mut self) {
        self.parsers.clear();
    }

    // ------------------------------------------------------------------
    // Instance options
    // ------------------------------------------------------------------

    /// Read a single instance option
    pub fn option(&self, key: &str) -> Option<&Value> {
        self.options.get(key)
    }

    /// Set a single instance option
    pub fn set_option(&mut self, key: impl Into<String>, value: Value) -> &mut Self {
        self.options.insert(key.into(), value);
        self
    }

    /// Bulk-merge a mapping into the instance options, later keys winning
    pub fn extend(&mut self, options: Map<String, Value>) -> &mut Self {
        for (key, value) in options {
            self.options.insert(key, value);
        }
        self
    }

    // ------------------------------------------------------------------
    // Execution dispatch
    // ------------------------------------------------------------------

    /// Resolve the stack that applies to a record
    ///
    /// Priority: the record's own `ext` option, then the registry's `ext`
    /// option, then the wildcard bucket. An empty stack results only when
    /// even the wildcard bucket has been cleared.
    pub fn resolve(&self, record: &ContentRecord) -> Vec<Arc<ParserHandler>> {
        let ext = record
            .options
            .get("ext")
            .and_then(Value::as_str)
            .or_else(|| self.options.get("ext").and_then(Value::as_str));

        if let Some(stack) = ext.and_then(|ext| self.get(ext)) {
            return stack.to_vec();
        }
        self.get(WILDCARD).map(|s| s.to_vec()).unwrap_or_default()
    }

    /// Normalize `input` and run the resolved stack asynchronously
    pub async fn parse(&self, input: impl Into<RecordInput>) -> Result<ContentRecord, RunError> {
        let record = ContentRecord::normalize(input, None);
        let stack = self.resolve(&record);
        runner::run(&stack, record).await
    }

    /// Normalize `input` and run an explicit stack asynchronously
    pub async fn parse_with(
        &self,
        input: impl Into<RecordInput>,
        stack: &[Arc<ParserHandler>],
    ) -> Result<ContentRecord, RunError> {
        let record = ContentRecord::normalize(input, None);
        runner::run(stack, record).await
    }

    /// Normalize `input` and run the resolved stack synchronously
    pub fn parse_sync(&self, input: impl Into<RecordInput>) -> Result<ContentRecord, RunError> {
        let record = ContentRecord::normalize(input, None);
        let stack = self.resolve(&record);
        runner::run_sync(&stack, record)
    }

    /// Normalize `input` and run an explicit stack synchronously
    pub fn parse_sync_with(
        &self,
        input: impl Into<RecordInput>,
        stack: &[Arc<ParserHandler>],
    ) -> Result<ContentRecord, RunError> {
        let record = ContentRecord::normalize(input, None);
        runner::run_sync(stack, record)
    }

    /// Compose the stream stages registered under `ext` into a pipeline
    ///
    /// Falls back to the wildcard bucket when `ext` is unregistered. Every
    /// parser in the resolved stack must expose `parse_stream`.
    pub fn parse_stream(&self, ext: &str) -> Result<RecordPipeline, RunError> {
        let stack = self
            .get(ext)
            .or_else(|| self.get(WILDCARD))
            .unwrap_or_default();
        runner::pipeline(stack)
    }

    /// Compose an explicit stack into a pipeline
    pub fn parse_stream_with(
        &self,
        stack: &[Arc<ParserHandler>],
    ) -> Result<RecordPipeline, RunError> {
        runner::pipeline(stack)
    }
}

impl Default for ParserRegistry {
    fn default() -> Self {
        Self::new()
    }
}
