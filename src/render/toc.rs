//! Table-of-contents extraction
//!
//! Collects level-2 and level-3 headings from an article body in document
//! order. A heading with no id gets `heading-{index}` injected so the ToC
//! can link to it; existing ids are kept, which makes the rewrite
//! deterministic across repeated runs.

use lazy_static::lazy_static;
use regex::{Captures, Regex};
use serde::Serialize;

use crate::helpers::html::strip_html;

/// One in-page navigation entry derived from a heading
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct TocItem {
    pub id: String,
    pub text: String,
    pub level: u8,
}

lazy_static! {
    static ref HEADING_RE: Regex =
        Regex::new(r"(?is)<h([23])([^>]*)>(.*?)</h[23]\s*>").unwrap();
    static ref ID_ATTR_RE: Regex =
        Regex::new(r#"(?i)\bid\s*=\s*["']([^"']*)["']"#).unwrap();
}

/// Rewrite headings with ids where missing and return the ToC alongside
/// the updated HTML.
pub fn extract_toc(html: &str) -> (String, Vec<TocItem>) {
    let mut toc = Vec::new();
    let mut index = 0usize;

    let out = HEADING_RE.replace_all(html, |caps: &Captures| {
        let level: u8 = if &caps[1] == "3" { 3 } else { 2 };
        let attrs = caps[2].to_string();
        let inner = caps[3].to_string();
        let text = strip_html(&inner).trim().to_string();

        let existing = ID_ATTR_RE
            .captures(&attrs)
            .map(|c| c[1].to_string())
            .filter(|id| !id.is_empty());

        let (id, attrs) = match existing {
            Some(id) => (id, attrs),
            None => {
                let id = format!("heading-{}", index);
                // Replace an empty id attribute, otherwise append one
                let attrs = if ID_ATTR_RE.is_match(&attrs) {
                    ID_ATTR_RE
                        .replace(&attrs, format!(r#"id="{}""#, id).as_str())
                        .into_owned()
                } else {
                    format!(r#"{} id="{}""#, attrs, id)
                };
                (id, attrs)
            }
        };

        index += 1;
        toc.push(TocItem {
            id: id.clone(),
            text,
            level,
        });

        format!("<h{level}{attrs}>{inner}</h{level}>", level = level)
    });

    (out.into_owned(), toc)
}
