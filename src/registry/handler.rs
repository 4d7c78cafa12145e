use crate::record::ContentRecord;
use futures::future::{self, BoxFuture, FutureExt};
use futures::stream::{self, BoxStream, StreamExt};
use serde_json::{Map, Value};
use std::fmt;
use std::future::Future;
use std::sync::Arc;

/// Asynchronous parse capability: record in, eventual record out
pub type ParseFn =
    Arc<dyn Fn(ContentRecord) -> BoxFuture<'static, anyhow::Result<ContentRecord>> + Send + Sync>;

/// Synchronous parse capability
pub type ParseSyncFn = Arc<dyn Fn(ContentRecord) -> anyhow::Result<ContentRecord> + Send + Sync>;

/// Stream-stage capability: one record in, zero or more records out
pub type ParseStreamFn =
    Arc<dyn Fn(ContentRecord) -> BoxStream<'static, anyhow::Result<ContentRecord>> + Send + Sync>;

/// Registered parser descriptor
///
/// Capabilities are tagged once at construction; the registry and runner
/// never inspect anything beyond their presence. A descriptor must carry
/// `parse` to be accepted by registration; `parse_sync` and `parse_stream`
/// are optional. Descriptors are immutable after registration and shared
/// behind an `Arc` by every stack that references them.
#[derive(Clone)]
pub struct ParserHandler {
    parse: Option<ParseFn>,
    parse_sync: Option<ParseSyncFn>,
    parse_stream: Option<ParseStreamFn>,
    options: Map<String, Value>,
}

impl ParserHandler {
    pub fn builder() -> ParserHandlerBuilder {
        ParserHandlerBuilder::default()
    }

    /// Wrap a bare callable as a descriptor
    ///
    /// The callable becomes both the `parse` and `parse_sync` capability.
    pub fn from_fn<F>(f: F) -> Self
    where
        F: Fn(ContentRecord) -> anyhow::Result<ContentRecord> + Send + Sync + 'static,
    {
        Self::builder().parse_fn(f).build()
    }

    pub fn has_parse(&self) -> bool {
        self.parse.is_some()
    }

    pub fn has_parse_sync(&self) -> bool {
        self.parse_sync.is_some()
    }

    pub fn has_parse_stream(&self) -> bool {
        self.parse_stream.is_some()
    }

    pub fn parse_capability(&self) -> Option<&ParseFn> {
        self.parse.as_ref()
    }

    pub fn parse_sync_capability(&self) -> Option<&ParseSyncFn> {
        self.parse_sync.as_ref()
    }

    pub fn parse_stream_capability(&self) -> Option<&ParseStreamFn> {
        self.parse_stream.as_ref()
    }

    /// Options attached at registration time
    pub fn options(&self) -> &Map<String, Value> {
        &self.options
    }

    /// Attach options to an already-built descriptor, new keys winning
    pub fn with_options(mut self, options: Map<String, Value>) -> Self {
        for (key, value) in options {
            self.options.insert(key, value);
        }
        self
    }

    /// Seed the record's options with this descriptor's options
    ///
    /// Descriptor options act as defaults; keys already on the record win.
    pub fn apply_options(&self, mut record: ContentRecord) -> ContentRecord {
        for (key, value) in &self.options {
            record
                .options
                .entry(key.clone())
                .or_insert_with(|| value.clone());
        }
        record
    }
}

impl fmt::Debug for ParserHandler {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("ParserHandler")
            .field("parse", &self.parse.is_some())
            .field("parse_sync", &self.parse_sync.is_some())
            .field("parse_stream", &self.parse_stream.is_some())
            .field("options", &self.options)
            .finish()
    }
}

/// Builder assembling a descriptor capability by capability
#[derive(Default)]
pub struct ParserHandlerBuilder {
    parse: Option<ParseFn>,
    parse_sync: Option<ParseSyncFn>,
    parse_stream: Option<ParseStreamFn>,
    options: Map<String, Value>,
}

impl ParserHandlerBuilder {
    /// Set the asynchronous `parse` capability from a future-returning closure
    pub fn parse<F, Fut>(mut self, f: F) -> Self
    where
        F: Fn(ContentRecord) -> Fut + Send + Sync + 'static,
        Fut: Future<Output = anyhow::Result<ContentRecord>> + Send + 'static,
    {
        self.parse = Some(Arc::new(move |record| f(record).boxed()));
        self
    }

    /// Set both `parse` and `parse_sync` from one synchronous callable
    pub fn parse_fn<F>(mut self, f: F) -> Self
    where
        F: Fn(ContentRecord) -> anyhow::Result<ContentRecord> + Send + Sync + 'static,
    {
        let f = Arc::new(f);
        let sync = f.clone();
        self.parse = Some(Arc::new(move |record| future::ready(f(record)).boxed()));
        self.parse_sync = Some(Arc::new(move |record| sync(record)));
        self
    }

    /// Set only the synchronous capability
    pub fn parse_sync<F>(mut self, f: F) -> Self
    where
        F: Fn(ContentRecord) -> anyhow::Result<ContentRecord> + Send + Sync + 'static,
    {
        self.parse_sync = Some(Arc::new(f));
        self
    }

    /// Set the stream-stage capability
    pub fn parse_stream<F>(mut self, f: F) -> Self
    where
        F: Fn(ContentRecord) -> BoxStream<'static, anyhow::Result<ContentRecord>>
            + Send
            + Sync
            + 'static,
    {
        self.parse_stream = Some(Arc::new(f));
        self
    }

    /// Set the stream-stage capability from a one-in, one-out callable
    pub fn parse_stream_map<F>(self, f: F) -> Self
    where
        F: Fn(ContentRecord) -> anyhow::Result<ContentRecord> + Send + Sync + 'static,
    {
        self.parse_stream(move |record| stream::once(future::ready(f(record))).boxed())
    }

    /// Attach a single registration option
    pub fn option(mut self, key: impl Into<String>, value: Value) -> Self {
        self.options.insert(key.into(), value);
        self
    }

    /// Replace the registration options wholesale
    pub fn options(mut self, options: Map<String, Value>) -> Self {
        self.options = options;
        self
    }

    /// Finish the descriptor
    ///
    /// No validation happens here; a descriptor without `parse` is rejected
    /// by [`crate::ParserRegistry::register`], keeping configuration
    /// failures at the registration call site.
    pub fn build(self) -> ParserHandler {
        ParserHandler {
            parse: self.parse,
            parse_sync: self.parse_sync,
            parse_stream: self.parse_stream,
            options: self.options,
        }
    }
}
