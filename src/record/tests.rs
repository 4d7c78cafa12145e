#[cfg(test)]
mod tests {
    use crate::record::{merge_data, ContentRecord, DATA_FIELDS};
    use serde_json::{json, Map, Value};

    fn object(value: Value) -> Map<String, Value> {
        value.as_object().cloned().unwrap()
    }

    // ========================================================================
    // Normalization Tests
    // ========================================================================

    #[test]
    fn test_normalize_bare_string() {
        let record = ContentRecord::normalize("str", None);

        assert_eq!(record.content, "str");
        assert_eq!(record.original.as_deref(), Some("str"));
        assert!(record.data.is_empty());
        assert!(record.options.is_empty());
    }

    #[test]
    fn test_normalize_seeds_original_once() {
        let mut record = ContentRecord::normalize("Hooray!", None);

        // A parser rewrites the content between passes
        record.content = "rewritten".to_string();
        let record = ContentRecord::normalize(record, None);

        assert_eq!(record.original.as_deref(), Some("Hooray!"));
        assert_eq!(record.content, "rewritten");
    }

    #[test]
    fn test_normalize_is_idempotent_for_original() {
        let first = ContentRecord::normalize(json!({"content": "xyz"}), None);
        let second = ContentRecord::normalize(first.clone(), None);

        assert_eq!(first.original, second.original);
        assert_eq!(second.original.as_deref(), Some("xyz"));
    }

    #[test]
    fn test_normalize_object_input() {
        let record = ContentRecord::normalize(
            json!({
                "content": "Hooray!",
                "data": {"title": "FLFLFLF"}
            }),
            None,
        );

        assert_eq!(record.content, "Hooray!");
        assert_eq!(record.original.as_deref(), Some("Hooray!"));
        assert_eq!(record.data.get("title"), Some(&json!("FLFLFLF")));
    }

    #[test]
    fn test_normalize_relocates_unknown_fields_into_options() {
        let record = ContentRecord::normalize(
            json!({
                "content": "Hooray!",
                "path": "a/b/c.md",
                "blah": "bbb"
            }),
            None,
        );

        assert_eq!(record.options.get("path"), Some(&json!("a/b/c.md")));
        assert_eq!(record.options.get("blah"), Some(&json!("bbb")));
        assert!(record.data.get("path").is_none());
    }

    #[test]
    fn test_normalize_merges_opts_without_overwriting() {
        let record = ContentRecord::normalize(
            json!({"content": "x", "ext": ".md"}),
            Some(&object(json!({"ext": ".txt", "cache": true}))),
        );

        // The record's own key wins; missing keys are filled in
        assert_eq!(record.options.get("ext"), Some(&json!(".md")));
        assert_eq!(record.options.get("cache"), Some(&json!(true)));
    }

    #[test]
    fn test_normalize_locals_feed_data() {
        let record = ContentRecord::normalize(
            json!({
                "content": "x",
                "locals": {"a": 1, "title": "from-locals"},
                "data": {"title": "from-data"}
            }),
            None,
        );

        // DATA_FIELDS lists locals before data, so data wins on conflict
        assert_eq!(record.data.get("a"), Some(&json!(1)));
        assert_eq!(record.data.get("title"), Some(&json!("from-data")));
        // locals stay available in the options side-channel
        assert!(record.options.contains_key("locals"));
    }

    #[test]
    fn test_normalize_scalar_input() {
        let record = ContentRecord::normalize(json!(42), None);
        assert_eq!(record.content, "42");

        let record = ContentRecord::normalize(Value::Null, None);
        assert_eq!(record.content, "");
    }

    // ========================================================================
    // merge_data Tests
    // ========================================================================

    #[test]
    fn test_merge_data_default_fields() {
        let record = ContentRecord::normalize(
            json!({
                "content": "x",
                "locals": {"a": 1, "b": 2},
                "data": {"b": 3, "c": 4}
            }),
            None,
        );

        let merged = merge_data(&record, DATA_FIELDS, None);
        assert_eq!(merged.get("a"), Some(&json!(1)));
        assert_eq!(merged.get("b"), Some(&json!(3)));
        assert_eq!(merged.get("c"), Some(&json!(4)));
    }

    #[test]
    fn test_merge_data_caller_order_wins() {
        let record = ContentRecord::normalize(
            json!({
                "content": "x",
                "locals": {"title": "from-locals"},
                "data": {"title": "from-data"}
            }),
            None,
        );

        // Listing locals last makes it win
        let merged = merge_data(&record, &["data", "locals"], None);
        assert_eq!(merged.get("title"), Some(&json!("from-locals")));
    }

    #[test]
    fn test_merge_data_overrides_outrank_fields() {
        let record = ContentRecord::normalize(json!({"content": "x", "data": {"title": "a"}}), None);

        let overrides = object(json!({"title": "ABC"}));
        let merged = merge_data(&record, DATA_FIELDS, Some(&overrides));
        assert_eq!(merged.get("title"), Some(&json!("ABC")));
    }
}
