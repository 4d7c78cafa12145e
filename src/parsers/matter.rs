use crate::record::ContentRecord;
use crate::registry::ParserHandler;
use anyhow::Context;
use serde_json::Value;

/// Front-matter parser
///
/// A content body opening with a `---` line is split at the next `---`
/// line; the block between the delimiters is parsed as YAML and merged
/// into the record's `data` (front-matter keys win), and `content` becomes
/// whatever follows the closing delimiter. Content without an opening
/// delimiter, or with an unterminated block, passes through unchanged.
pub fn matter() -> ParserHandler {
    ParserHandler::from_fn(parse_matter)
}

fn parse_matter(mut record: ContentRecord) -> anyhow::Result<ContentRecord> {
    let Some((front, rest)) = split_front_matter(&record.content) else {
        return Ok(record);
    };

    if !front.trim().is_empty() {
        let fields: Value = serde_yaml::from_str(front).context("Malformed front matter")?;
        if let Value::Object(fields) = fields {
            for (key, value) in fields {
                record.data.insert(key, value);
            }
        }
    }

    record.content = rest.to_string();
    Ok(record)
}

/// Split content into its front-matter block and the remainder
///
/// The remainder keeps everything after the closing `---`, including the
/// newline that follows it.
fn split_front_matter(content: &str) -> Option<(&str, &str)> {
    let body = content.strip_prefix("---\n")?;
    // Empty block: the closing delimiter immediately follows the opener
    if let Some(rest) = body.strip_prefix("---") {
        return Some(("", rest));
    }
    let close = body.find("\n---")?;
    Some((&body[..close], &body[close + "\n---".len()..]))
}
