//! Markdown issue files: a YAML header between `---` lines, then the raw body.
//!
//! Decoding is line oriented instead of going through a markdown parser, so the
//! body comes back byte-for-byte. The first `---` line after the opening one
//! always closes the header; there is no escaping. Only trailing whitespace is
//! ignored on a delimiter line, so indented `---` inside a YAML block scalar
//! stays part of the header.

use crate::error::{GhiError, Result};
use serde::{Deserialize, Deserializer, Serialize};
use std::collections::BTreeMap;

pub const DELIMITER: &str = "---";

// ---------------------------------------------------------------------------
// Frontmatter
// ---------------------------------------------------------------------------

/// Header of an issue file. `title` is the only key ghi acts on; anything else
/// is carried through untouched in `extra`.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Frontmatter {
    #[serde(
        default,
        skip_serializing_if = "String::is_empty",
        deserialize_with = "null_as_empty"
    )]
    pub title: String,
    #[serde(flatten)]
    pub extra: BTreeMap<String, serde_yaml::Value>,
}

impl Frontmatter {
    pub fn with_title(title: impl Into<String>) -> Self {
        Self {
            title: title.into(),
            extra: BTreeMap::new(),
        }
    }
}

fn null_as_empty<'de, D>(deserializer: D) -> std::result::Result<String, D::Error>
where
    D: Deserializer<'de>,
{
    Ok(Option::<String>::deserialize(deserializer)?.unwrap_or_default())
}

// ---------------------------------------------------------------------------
// Encode / decode
// ---------------------------------------------------------------------------

/// Render `meta` and `body` as an issue file. The body is appended verbatim.
pub fn encode(meta: &Frontmatter, body: &[u8]) -> Result<Vec<u8>> {
    let header = serde_yaml::to_string(meta)?;

    let mut out = Vec::with_capacity(header.len() + body.len() + 2 * (DELIMITER.len() + 1));
    out.extend_from_slice(DELIMITER.as_bytes());
    out.push(b'\n');
    out.extend_from_slice(header.as_bytes());
    if !header.ends_with('\n') {
        out.push(b'\n');
    }
    out.extend_from_slice(DELIMITER.as_bytes());
    out.push(b'\n');
    out.extend_from_slice(body);
    Ok(out)
}

/// Split an issue file into its header and body.
///
/// Fails with [`GhiError::MalformedFrontmatter`] when the first line is not
/// `---` or no closing `---` follows, and with [`GhiError::FrontmatterYaml`]
/// when the header is not valid YAML for [`Frontmatter`].
pub fn decode(raw: &[u8]) -> Result<(Frontmatter, Vec<u8>)> {
    let mut lines = raw.split(|&b| b == b'\n');

    let opening = lines.next().unwrap_or_default();
    if !is_delimiter(opening) {
        return Err(GhiError::MalformedFrontmatter(format!(
            "file must start with '{DELIMITER}'"
        )));
    }

    let header_start = (opening.len() + 1).min(raw.len());
    let mut pos = header_start;
    for line in lines {
        let line_end = pos + line.len();
        if is_delimiter(line) {
            // Header lines exclude the newline that precedes the closing line.
            let header_end = if pos > header_start { pos - 1 } else { header_start };
            let meta = parse_header(&raw[header_start..header_end])?;
            let body = if line_end < raw.len() {
                raw[line_end + 1..].to_vec()
            } else {
                Vec::new()
            };
            return Ok((meta, body));
        }
        pos = line_end + 1;
    }

    Err(GhiError::MalformedFrontmatter(format!(
        "missing closing '{DELIMITER}'"
    )))
}

fn is_delimiter(line: &[u8]) -> bool {
    line.trim_ascii_end() == DELIMITER.as_bytes()
}

fn parse_header(header: &[u8]) -> Result<Frontmatter> {
    let text = std::str::from_utf8(header)
        .map_err(|_| GhiError::MalformedFrontmatter("header is not valid UTF-8".to_string()))?;
    if text.trim().is_empty() {
        return Ok(Frontmatter::default());
    }
    serde_yaml::from_str(text).map_err(GhiError::FrontmatterYaml)
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------

#[cfg(test)]
mod tests {
    use super::*;

    fn roundtrip(meta: &Frontmatter, body: &[u8]) {
        let doc = encode(meta, body).unwrap();
        let (decoded, decoded_body) = decode(&doc).unwrap();
        assert_eq!(&decoded, meta);
        assert_eq!(decoded_body, body, "body changed for {:?}", String::from_utf8_lossy(body));
    }

    #[test]
    fn encodes_example_exactly() {
        let meta = Frontmatter::with_title("Bug: crash on start");
        let doc = encode(&meta, b"Steps:\n1. run\n2. crash").unwrap();
        assert_eq!(
            String::from_utf8(doc.clone()).unwrap(),
            "---\ntitle: 'Bug: crash on start'\n---\nSteps:\n1. run\n2. crash"
        );
        let (decoded, body) = decode(&doc).unwrap();
        assert_eq!(decoded.title, "Bug: crash on start");
        assert_eq!(body, b"Steps:\n1. run\n2. crash");
    }

    #[test]
    fn roundtrips_assorted_bodies() {
        let meta = Frontmatter::with_title("Plain title");
        let bodies: &[&[u8]] = &[
            b"",
            b"single line",
            b"trailing newline\n",
            b"\n\nleading blank lines",
            b"intro\n---\nafter a delimiter-like line",
            b"---\nbody that opens with a delimiter",
            b"windows\r\nline endings\r\n",
            b"  indented\n\ttabbed   \n",
            b"\xff\xfe not utf-8 \x80",
        ];
        for body in bodies {
            roundtrip(&meta, body);
        }
    }

    #[test]
    fn roundtrips_titles_that_need_quoting() {
        for title in [
            "yes",
            "123",
            "null",
            "# not a comment",
            "a: b",
            "it's",
            "multi\nline",
            "first\n---\nsecond",
            "---",
        ] {
            roundtrip(&Frontmatter::with_title(title), b"body");
        }
    }

    #[test]
    fn empty_title_is_omitted() {
        let doc = encode(&Frontmatter::default(), b"body").unwrap();
        let text = String::from_utf8(doc.clone()).unwrap();
        assert!(!text.contains("title"), "unexpected title key in {text:?}");
        let (meta, body) = decode(&doc).unwrap();
        assert_eq!(meta.title, "");
        assert_eq!(body, b"body");
    }

    #[test]
    fn missing_opening_delimiter_is_malformed() {
        for doc in [
            &b""[..],
            b"title: x\n---\nbody",
            b"-- \ntitle: x\n---\n",
            b"----\ntitle: x\n---\n",
            b"\n---\ntitle: x\n---\n",
            b"  ---\ntitle: x\n---\n",
        ] {
            let err = decode(doc).unwrap_err();
            assert!(
                matches!(err, GhiError::MalformedFrontmatter(_)),
                "expected malformed for {:?}, got {err:?}",
                String::from_utf8_lossy(doc)
            );
        }
    }

    #[test]
    fn missing_closing_delimiter_is_malformed() {
        for doc in [&b"---"[..], b"---\n", b"---\ntitle: x\nbody without close"] {
            let err = decode(doc).unwrap_err();
            assert!(matches!(err, GhiError::MalformedFrontmatter(ref m) if m.contains("closing")));
        }
    }

    #[test]
    fn closing_delimiter_on_last_line_gives_empty_body() {
        let (meta, body) = decode(b"---\ntitle: Hello\n---").unwrap();
        assert_eq!(meta.title, "Hello");
        assert!(body.is_empty());

        let (_, body) = decode(b"---\ntitle: Hello\n---\n").unwrap();
        assert!(body.is_empty());
    }

    #[test]
    fn delimiters_tolerate_surrounding_whitespace() {
        let (meta, body) = decode(b"---\r\ntitle: Hi\r\n---  \r\nbody\r\n").unwrap();
        assert_eq!(meta.title, "Hi");
        assert_eq!(body, b"body\r\n");
    }

    #[test]
    fn indented_delimiter_stays_in_header() {
        let doc = b"---\ntitle: |-\n  first\n  ---\n  second\n---\nbody";
        let (meta, body) = decode(doc).unwrap();
        assert_eq!(meta.title, "first\n---\nsecond");
        assert_eq!(body, b"body");
    }

    #[test]
    fn empty_header_decodes_to_default() {
        let (meta, body) = decode(b"---\n---\nbody").unwrap();
        assert_eq!(meta, Frontmatter::default());
        assert_eq!(body, b"body");
    }

    #[test]
    fn null_title_is_empty() {
        let (meta, _) = decode(b"---\ntitle: ~\n---\n").unwrap();
        assert_eq!(meta.title, "");
    }

    #[test]
    fn invalid_yaml_is_surfaced() {
        let err = decode(b"---\ntitle: [unclosed\n---\nbody").unwrap_err();
        assert!(matches!(err, GhiError::FrontmatterYaml(_)), "got {err:?}");
    }

    #[test]
    fn unknown_keys_pass_through() {
        let doc = b"---\ntitle: T\nlabels:\n- bug\n---\nbody";
        let (meta, body) = decode(doc).unwrap();
        assert_eq!(meta.title, "T");
        assert!(meta.extra.contains_key("labels"));

        let reencoded = encode(&meta, &body).unwrap();
        let (again, _) = decode(&reencoded).unwrap();
        assert_eq!(again, meta);
    }
}
