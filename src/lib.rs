// Public API exports
pub mod parsers;
pub mod record;
pub mod registry;
pub mod runner;

// Re-export main types for convenience
pub use record::{merge_data, ContentRecord, RecordInput, DATA_FIELDS};

pub use registry::{
    ExtKey, ParseFn, ParseStreamFn, ParseSyncFn, ParserHandler, ParserHandlerBuilder,
    ParserRegistry, RegistryError, WILDCARD,
};

pub use runner::{pipeline, run, run_sync, Mode, RecordPipeline, RecordStream, RunError};
