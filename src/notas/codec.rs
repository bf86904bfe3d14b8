//! # Block Format
//!
//! A document is a sequence of blocks, each framed by HTML comments so the
//! file stays readable (and renderable) as plain markdown:
//!
//! ```text
//! <!-- "type": "markdown", "created": "2024-01-01 10:00:00", "modified": "2024-01-01 10:00:00" -->
//! Some *markdown* content.
//! <!-- end -->
//! ```
//!
//! The header is the body of a JSON object: string keys mapped to string,
//! number or boolean values. Surrounding braces are accepted on input and
//! omitted on output. Headers are only ever parsed as data.
//!
//! Text outside of block frames is not part of any block and does not survive
//! a parse/serialize cycle.

use crate::error::{NotasError, Result};
use crate::model::{Block, Metadata, Scalar, CREATED_KEY, MODIFIED_KEY, TYPE_KEY};
use once_cell::sync::Lazy;
use regex::Regex;

static BLOCK_RE: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r"(?s)<!--\s*(.*?)\s*-->(.*?)<!--\s*end\s*-->").expect("block pattern compiles")
});

static END_RE: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"<!--\s*end\s*-->").expect("end pattern compiles"));

/// Header keys written first, in this order. Remaining keys follow sorted.
const LEADING_KEYS: [&str; 3] = [TYPE_KEY, CREATED_KEY, MODIFIED_KEY];

/// Parses document text into its blocks, in document order.
///
/// A malformed header fails the whole document.
pub fn parse(text: &str) -> Result<Vec<Block>> {
    BLOCK_RE
        .captures_iter(text)
        .enumerate()
        .map(|(index, caps)| {
            let header = caps.get(1).map_or("", |m| m.as_str());
            let content = caps.get(2).map_or("", |m| m.as_str());
            let metadata = parse_header(header).map_err(|message| NotasError::MalformedHeader {
                block: index,
                message,
            })?;
            Ok(Block::new(content, metadata))
        })
        .collect()
}

/// Renders blocks back into document text.
pub fn serialize(blocks: &[Block]) -> String {
    blocks
        .iter()
        .map(|block| {
            let content = block.content.trim();
            if content.is_empty() {
                format!("<!-- {} -->\n<!-- end -->\n", render_header(&block.metadata))
            } else {
                format!(
                    "<!-- {} -->\n{}\n<!-- end -->\n",
                    render_header(&block.metadata),
                    content
                )
            }
        })
        .collect::<Vec<_>>()
        .join("\n")
}

/// Rejects blocks that would not survive a round trip: content holding an
/// end marker, or header strings that would close the comment early.
pub fn validate(blocks: &[Block]) -> Result<()> {
    for (index, block) in blocks.iter().enumerate() {
        if END_RE.is_match(&block.content) {
            return Err(NotasError::InvalidInput(format!(
                "block {} content contains an end marker",
                index
            )));
        }
        for (key, value) in &block.metadata {
            if key.contains("-->") || value.as_str().is_some_and(|s| s.contains("-->")) {
                return Err(NotasError::InvalidInput(format!(
                    "block {} header entry {:?} contains a comment terminator",
                    index, key
                )));
            }
        }
    }
    Ok(())
}

fn parse_header(header: &str) -> std::result::Result<Metadata, String> {
    let trimmed = header.trim();
    let literal = if trimmed.starts_with('{') {
        trimmed.to_string()
    } else {
        format!("{{{}}}", trimmed)
    };

    let map: serde_json::Map<String, serde_json::Value> =
        serde_json::from_str(&literal).map_err(|e| e.to_string())?;

    map.into_iter()
        .map(|(key, value)| {
            Scalar::try_from(value)
                .map(|scalar| (key.clone(), scalar))
                .map_err(|e| format!("{}: {}", key, e))
        })
        .collect()
}

fn render_header(metadata: &Metadata) -> String {
    let leading = LEADING_KEYS
        .iter()
        .filter_map(|key| metadata.get_key_value(*key));
    let rest = metadata
        .iter()
        .filter(|(key, _)| !LEADING_KEYS.contains(&key.as_str()));

    leading
        .chain(rest)
        .map(|(key, value)| {
            format!(
                "{}: {}",
                serde_json::Value::from(key.as_str()),
                scalar_literal(value)
            )
        })
        .collect::<Vec<_>>()
        .join(", ")
}

fn scalar_literal(value: &Scalar) -> serde_json::Value {
    match value {
        Scalar::Bool(b) => serde_json::Value::Bool(*b),
        Scalar::Number(n) => serde_json::Value::Number(n.clone()),
        Scalar::String(s) => serde_json::Value::String(s.clone()),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn hello_world() -> Vec<Block> {
        vec![
            Block::markdown("Hello", "2024-01-01 00:00:00")
                .with_meta(MODIFIED_KEY, "2024-01-02 00:00:00"),
            Block::markdown("World\n\nwith a second paragraph", "2024-01-01 00:00:00")
                .with_meta(MODIFIED_KEY, "2024-01-03 00:00:00"),
        ]
    }

    #[test]
    fn parses_blocks_in_document_order() {
        let text = r#"<!-- "type": "markdown", "created": "2024-01-01 00:00:00", "modified": "2024-01-02 00:00:00" -->
Hello
<!-- end -->
<!-- "type": "markdown", "created": "2024-01-01 00:00:00", "modified": "2024-01-03 00:00:00" -->
World
<!-- end -->
"#;
        let blocks = parse(text).unwrap();
        assert_eq!(blocks.len(), 2);
        assert_eq!(blocks[0].content, "Hello");
        assert_eq!(blocks[1].content, "World");
        assert_eq!(blocks[1].modified(), Some("2024-01-03 00:00:00"));
    }

    #[test]
    fn text_without_blocks_is_empty() {
        assert!(parse("").unwrap().is_empty());
        assert!(parse("just some notes\n# heading").unwrap().is_empty());
    }

    #[test]
    fn accepts_braced_and_multiline_headers() {
        let text = "<!-- {\"created\": \"21/11/2025, 23:17:43\",\n  \"modified\": \"21/11/2025, 23:17:50\", \"type\": \"markdown\"} -->\nTest\n<!--end-->";
        let blocks = parse(text).unwrap();
        assert_eq!(blocks.len(), 1);
        assert_eq!(blocks[0].content, "Test");
        assert_eq!(blocks[0].created(), Some("21/11/2025, 23:17:43"));
    }

    #[test]
    fn preserves_extra_scalar_keys() {
        let text = "<!-- \"type\": \"todo\", \"done\": false, \"priority\": 2, \"weight\": 0.5 -->\nship it\n<!-- end -->";
        let blocks = parse(text).unwrap();
        let meta = &blocks[0].metadata;
        assert_eq!(meta.get("done"), Some(&Scalar::Bool(false)));
        assert_eq!(meta.get("priority"), Some(&Scalar::from(2i64)));
        assert_eq!(meta.get("weight").map(|v| v.to_string()), Some("0.5".into()));
    }

    #[test]
    fn malformed_header_aborts_document() {
        let text = "<!-- \"type\": \"markdown\" -->\nok\n<!-- end -->\n<!-- __import__('os').system('ls') -->\nbad\n<!-- end -->";
        match parse(text) {
            Err(NotasError::MalformedHeader { block, .. }) => assert_eq!(block, 1),
            other => panic!("expected malformed header, got {:?}", other),
        }
    }

    #[test]
    fn rejects_nested_header_values() {
        let text = "<!-- \"type\": \"markdown\", \"tags\": [\"a\"] -->\nx\n<!-- end -->";
        assert!(matches!(
            parse(text),
            Err(NotasError::MalformedHeader { block: 0, .. })
        ));
    }

    #[test]
    fn round_trips_blocks() {
        let blocks = hello_world();
        let extra = vec![Block::markdown("", "2024-05-05 05:05:05")
            .with_meta("pinned", true)
            .with_meta("order", 3i64)];

        assert_eq!(parse(&serialize(&blocks)).unwrap(), blocks);
        assert_eq!(parse(&serialize(&extra)).unwrap(), extra);
        assert!(parse(&serialize(&[])).unwrap().is_empty());
    }

    #[test]
    fn serialization_is_stable_after_first_pass() {
        let messy = "<!--   {\"modified\": \"2024-01-02 00:00:00\", \"type\": \"markdown\"}-->\n\n   Hello   \n\n<!--  end  -->";
        let first = serialize(&parse(messy).unwrap());
        let second = serialize(&parse(&first).unwrap());
        assert_eq!(first, second);
    }

    #[test]
    fn header_puts_conventional_keys_first() {
        let block = Block::markdown("x", "2024-01-01 00:00:00").with_meta("author", "me");
        let text = serialize(&[block]);
        assert!(text.starts_with(
            "<!-- \"type\": \"markdown\", \"created\": \"2024-01-01 00:00:00\", \"modified\": \"2024-01-01 00:00:00\", \"author\": \"me\" -->\n"
        ));
        assert!(text.ends_with("x\n<!-- end -->\n"));
    }

    #[test]
    fn validate_rejects_embedded_end_marker() {
        let bad = vec![Block::markdown("a\n<!-- end -->\nb", "2024-01-01 00:00:00")];
        assert!(matches!(validate(&bad), Err(NotasError::InvalidInput(_))));

        let bad_header = vec![Block::markdown("a", "2024-01-01 00:00:00").with_meta("x", "-->")];
        assert!(matches!(
            validate(&bad_header),
            Err(NotasError::InvalidInput(_))
        ));

        assert!(validate(&hello_world()).is_ok());
    }
}
