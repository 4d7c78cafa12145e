use crate::registry::ParserHandler;

/// Pass-through parser seeded in the wildcard bucket
///
/// Exposes every capability, so a default stack works in any execution
/// mode. The record flows through unchanged.
pub fn noop() -> ParserHandler {
    ParserHandler::builder()
        .parse_fn(Ok)
        .parse_stream_map(Ok)
        .build()
}
