use lazy_static::lazy_static;
use regex::Regex;

use super::{Document, NodeId, VOID_ELEMENTS};
use crate::utils::error::{Error, Result};

lazy_static! {
    // One token per match: comment, doctype, closing tag or opening tag.
    // Everything between matches is text.
    static ref TOKEN_REGEX: Regex = Regex::new(
        r#"(?s)<!--.*?-->|<!(?i:doctype)[^>]*>|</\s*([a-zA-Z][a-zA-Z0-9-]*)\s*>|<([a-zA-Z][a-zA-Z0-9-]*)((?:[^>"']|"[^"]*"|'[^']*')*?)(/?)>"#
    ).unwrap();

    static ref ATTR_REGEX: Regex = Regex::new(
        r#"([a-zA-Z_][a-zA-Z0-9_:.-]*)(?:\s*=\s*(?:"([^"]*)"|'([^']*)'|([^\s"'=<>`]+)))?"#
    ).unwrap();
}

/// Parse a full HTML document or fragment into a fresh `Document`
pub fn parse_document(input: &str) -> Result<Document> {
    let mut doc = Document::new();
    let root = doc.root();
    parse_fragment(&mut doc, root, input)?;
    Ok(doc)
}

/// Parse markup into the arena as children of `parent`.
///
/// The grammar is deliberately small: tags with quoted or bare attributes,
/// void and self-closing elements, comments and a doctype (both skipped),
/// entity-decoded text. Stray or missing closing tags are reported as
/// `Error::Markup`.
pub fn parse_fragment(doc: &mut Document, parent: NodeId, input: &str) -> Result<()> {
    let mut stack = vec![parent];
    let mut last = 0;

    for cap in TOKEN_REGEX.captures_iter(input) {
        let token = cap.get(0).unwrap();
        append_text(doc, *stack.last().unwrap(), &input[last..token.start()]);
        last = token.end();

        if let Some(name) = cap.get(1) {
            // Closing tag
            let name = name.as_str().to_ascii_lowercase();
            if stack.len() == 1 {
                return Err(Error::Markup(format!("unexpected closing tag </{}>", name)));
            }
            let top = *stack.last().unwrap();
            let open_tag = doc.tag(top).unwrap_or_default().to_string();
            if open_tag != name {
                return Err(Error::Markup(format!(
                    "mismatched closing tag </{}>, expected </{}>",
                    name, open_tag
                )));
            }
            stack.pop();
        } else if let Some(name) = cap.get(2) {
            // Opening tag
            let name = name.as_str().to_ascii_lowercase();
            let element = doc.create_element(&name);
            for attr in ATTR_REGEX.captures_iter(&cap[3]) {
                let key = attr[1].to_ascii_lowercase();
                let value = attr
                    .get(2)
                    .or_else(|| attr.get(3))
                    .or_else(|| attr.get(4))
                    .map(|v| html_escape::decode_html_entities(v.as_str()).into_owned())
                    .unwrap_or_default();
                doc.set_attr(element, &key, &value);
            }
            doc.append_child(*stack.last().unwrap(), element);
            let self_closing = !cap[4].is_empty() || VOID_ELEMENTS.contains(&name.as_str());
            if !self_closing {
                stack.push(element);
            }
        }
        // Comments and doctypes match without capture groups and are dropped
    }

    append_text(doc, *stack.last().unwrap(), &input[last..]);

    if stack.len() > 1 {
        let top = *stack.last().unwrap();
        let tag = doc.tag(top).unwrap_or_default().to_string();
        return Err(Error::Markup(format!("unclosed element <{}>", tag)));
    }
    Ok(())
}

fn append_text(doc: &mut Document, parent: NodeId, raw: &str) {
    if raw.is_empty() {
        return;
    }
    // Whitespace between elements still separates words in text extraction;
    // collapse the run to a single space instead of dropping it
    if raw.chars().all(char::is_whitespace) {
        let text = doc.create_text(" ");
        doc.append_child(parent, text);
        return;
    }
    let decoded = html_escape::decode_html_entities(raw);
    let text = doc.create_text(&decoded);
    doc.append_child(parent, text);
}
