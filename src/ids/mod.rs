use crate::anchors::ANCHOR_CLASS;
use crate::dom::{Document, NodeId};

/// Visible text of a heading, with injected anchor glyphs excluded
pub fn heading_label(doc: &Document, heading: NodeId) -> String {
    doc.text_excluding_class(heading, ANCHOR_CLASS)
}

/// Ensure a heading carries a unique, URL-fragment-safe `id` attribute.
///
/// An existing id is kept untouched. Otherwise the id is derived from the
/// heading's visible text by slugification, and made unique document-wide
/// by probing `slug-1`, `slug-2`, ... until no other node holds it. Text
/// that slugifies to nothing leaves the heading without an id; that is a
/// silent no-op, not an error.
pub fn assign_heading_id(doc: &mut Document, heading: NodeId) -> Option<String> {
    if let Some(existing) = doc.attr(heading, "id") {
        return Some(existing.to_string());
    }

    let label = heading_label(doc, heading);
    let base = slug::slugify(label.trim());
    if base.is_empty() {
        log::debug!("skipping id assignment for heading with no usable text");
        return None;
    }

    let mut candidate = base.clone();
    let mut counter = 1;
    while id_in_use(doc, &candidate) {
        candidate = format!("{}-{}", base, counter);
        counter += 1;
    }

    doc.set_attr(heading, "id", &candidate);
    Some(candidate)
}

fn id_in_use(doc: &Document, id: &str) -> bool {
    let root = doc.root();
    doc.descendants(root)
        .into_iter()
        .any(|node| doc.attr(node, "id") == Some(id))
}
