use serde::{Deserialize, Serialize};

use super::TocConfig;
use crate::dom::{Document, NodeId};
use crate::ids;

/// A rendered table-of-contents entry.
///
/// `id` is absent only when the heading's text slugified to nothing and id
/// assignment was skipped; such entries render without a link.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ListNode {
    pub id: Option<String>,
    pub text: String,
    pub children: Vec<ListNode>,
}

impl ListNode {
    fn from_heading(doc: &mut Document, heading: NodeId) -> Self {
        let id = ids::assign_heading_id(doc, heading);
        let text = ids::heading_label(doc, heading).trim().to_string();
        ListNode {
            id,
            text,
            children: Vec::new(),
        }
    }

    /// Number of entries in this subtree, itself included
    pub fn len(&self) -> usize {
        1 + self.children.iter().map(ListNode::len).sum::<usize>()
    }

    /// Depth of this subtree; a leaf has depth 1
    pub fn depth(&self) -> usize {
        1 + self.children.iter().map(ListNode::depth).max().unwrap_or(0)
    }

    fn write_html(&self, list_tag: &str, out: &mut String) {
        out.push_str("<li>");
        match &self.id {
            Some(id) => {
                out.push_str("<a href=\"#");
                out.push_str(&html_escape::encode_double_quoted_attribute(id));
                out.push_str("\">");
                out.push_str(&html_escape::encode_text(&self.text));
                out.push_str("</a>");
            }
            None => out.push_str(&html_escape::encode_text(&self.text)),
        }
        if !self.children.is_empty() {
            out.push('<');
            out.push_str(list_tag);
            out.push('>');
            for child in &self.children {
                child.write_html(list_tag, out);
            }
            out.push_str("</");
            out.push_str(list_tag);
            out.push('>');
        }
        out.push_str("</li>");
    }
}

/// Build the entry tree for a flat, document-ordered heading run.
///
/// Assigns ids to the headings as a side effect. With `nested` disabled the
/// result is a single flat level regardless of rank variation.
pub fn collect_entries(doc: &mut Document, headings: &[NodeId], nested: bool) -> Vec<ListNode> {
    let mut cursor = 0;
    build_level(doc, headings, &mut cursor, nested, true)
}

/// Recursive descent over the heading run with a shared cursor.
///
/// A heading whose successor has a strictly greater rank opens a child
/// level; the child level hands control back to its parent when the next
/// heading's rank is strictly shallower than its own. A heading with no
/// successor is treated as having its own rank, closing every open level.
fn build_level(
    doc: &mut Document,
    headings: &[NodeId],
    cursor: &mut usize,
    nested: bool,
    top: bool,
) -> Vec<ListNode> {
    let mut entries = Vec::new();

    while *cursor < headings.len() {
        let current = headings[*cursor];
        let rank = doc.heading_rank(current).unwrap_or(6);
        let next_rank = headings
            .get(*cursor + 1)
            .map_or(rank, |&next| doc.heading_rank(next).unwrap_or(6));
        *cursor += 1;

        let mut entry = ListNode::from_heading(doc, current);
        if nested && next_rank > rank {
            entry.children = build_level(doc, headings, cursor, nested, false);
        }
        entries.push(entry);

        if !top {
            if let Some(&upcoming) = headings.get(*cursor) {
                if doc.heading_rank(upcoming).unwrap_or(6) < rank {
                    break;
                }
            }
        }
    }

    entries
}

/// Render an entry tree as list markup per the configuration: caption
/// handling, list container tag and optional class
pub fn render_list(entries: &[ListNode], config: &TocConfig) -> String {
    let mut out = String::new();
    let caption = config.caption.as_deref().filter(|c| !c.is_empty());

    // A non-list-item caption renders as a standalone element before the list
    if let Some(caption) = caption {
        if config.caption_tag != "li" {
            out.push('<');
            out.push_str(&config.caption_tag);
            out.push('>');
            out.push_str(&html_escape::encode_text(caption));
            out.push_str("</");
            out.push_str(&config.caption_tag);
            out.push('>');
        }
    }

    out.push('<');
    out.push_str(&config.list_tag);
    if let Some(class) = &config.list_class {
        out.push_str(" class=\"");
        out.push_str(&html_escape::encode_double_quoted_attribute(class));
        out.push('"');
    }
    out.push('>');

    if let Some(caption) = caption {
        if config.caption_tag == "li" {
            out.push_str("<li class=\"toc-caption\">");
            out.push_str(&html_escape::encode_text(caption));
            out.push_str("</li>");
        }
    }

    for entry in entries {
        entry.write_html(&config.list_tag, &mut out);
    }

    out.push_str("</");
    out.push_str(&config.list_tag);
    out.push('>');
    out
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::dom::parse_document;

    fn headings_doc(ranks: &[u8]) -> (Document, Vec<NodeId>) {
        let markup: String = ranks
            .iter()
            .enumerate()
            .map(|(i, rank)| format!("<h{rank}>Heading {i}</h{rank}>"))
            .collect();
        let doc = parse_document(&markup).unwrap();
        let root = doc.root();
        let headings = doc.headings(root);
        (doc, headings)
    }

    fn total_entries(entries: &[ListNode]) -> usize {
        entries.iter().map(ListNode::len).sum()
    }

    fn max_depth(entries: &[ListNode]) -> usize {
        entries.iter().map(ListNode::depth).max().unwrap_or(0)
    }

    #[test]
    fn test_sibling_run_after_nested_children() {
        // Ranks [2,3,3,2]: one top item with two nested children, then a sibling
        let (mut doc, headings) = headings_doc(&[2, 3, 3, 2]);
        let entries = collect_entries(&mut doc, &headings, true);

        assert_eq!(entries.len(), 2);
        assert_eq!(entries[0].children.len(), 2);
        assert!(entries[0].children.iter().all(|c| c.children.is_empty()));
        assert!(entries[1].children.is_empty());
        assert_eq!(total_entries(&entries), 4);
    }

    #[test]
    fn test_deep_nesting_closes_back_level_by_level() {
        // Ranks [2,3,4,3,2]: depth 3 under the first item, then the trailing 3
        // closes back to a depth-2 sibling under the same top item, then a new
        // top-level item
        let (mut doc, headings) = headings_doc(&[2, 3, 4, 3, 2]);
        let entries = collect_entries(&mut doc, &headings, true);

        assert_eq!(entries.len(), 2);
        let first = &entries[0];
        assert_eq!(first.children.len(), 2);
        assert_eq!(first.children[0].children.len(), 1);
        assert!(first.children[1].children.is_empty());
        assert_eq!(max_depth(&entries), 3);
        assert_eq!(total_entries(&entries), 5);
    }

    #[test]
    fn test_rank_jump_returns_to_top_level() {
        // The documented closing rule: after [2,4], the 3 hands control all
        // the way back and continues as a top-level sibling, not under the 2
        let (mut doc, headings) = headings_doc(&[2, 4, 3]);
        let entries = collect_entries(&mut doc, &headings, true);

        assert_eq!(entries.len(), 2);
        assert_eq!(entries[0].children.len(), 1);
        assert_eq!(entries[0].children[0].text, "Heading 1");
        assert_eq!(entries[1].text, "Heading 2");
    }

    #[test]
    fn test_flat_mode_ignores_rank_variation() {
        let (mut doc, headings) = headings_doc(&[2, 3, 4, 3, 2, 6]);
        let entries = collect_entries(&mut doc, &headings, false);

        assert_eq!(entries.len(), 6);
        assert_eq!(max_depth(&entries), 1);
    }

    #[test]
    fn test_every_heading_appears_exactly_once() {
        for ranks in [
            &[2u8, 3, 3, 2][..],
            &[2, 3, 4, 3, 2],
            &[6, 5, 4, 3, 2],
            &[2, 6, 2, 6],
            &[4],
        ] {
            let (mut doc, headings) = headings_doc(ranks);
            let entries = collect_entries(&mut doc, &headings, true);
            assert_eq!(total_entries(&entries), ranks.len(), "ranks {:?}", ranks);
        }
    }

    #[test]
    fn test_trailing_heading_closes_all_levels() {
        // The last heading has no successor, so nothing can nest under it
        let (mut doc, headings) = headings_doc(&[2, 3, 4]);
        let entries = collect_entries(&mut doc, &headings, true);

        assert_eq!(entries.len(), 1);
        assert_eq!(max_depth(&entries), 3);
        let deepest = &entries[0].children[0].children[0];
        assert!(deepest.children.is_empty());
    }

    #[test]
    fn test_entries_link_to_assigned_ids() {
        let (mut doc, headings) = headings_doc(&[2, 3]);
        let entries = collect_entries(&mut doc, &headings, true);

        assert_eq!(entries[0].id.as_deref(), Some("heading-0"));
        assert_eq!(entries[0].children[0].id.as_deref(), Some("heading-1"));
        assert_eq!(doc.attr(headings[0], "id"), Some("heading-0"));
    }

    #[test]
    fn test_render_nested_markup() {
        let (mut doc, headings) = headings_doc(&[2, 3]);
        let entries = collect_entries(&mut doc, &headings, true);
        let html = render_list(&entries, &TocConfig::nested());

        assert_eq!(
            html,
            "<ul><li><a href=\"#heading-0\">Heading 0</a>\
             <ul><li><a href=\"#heading-1\">Heading 1</a></li></ul></li></ul>"
        );
    }

    #[test]
    fn test_render_flat_with_utility_class() {
        let (mut doc, headings) = headings_doc(&[2, 2]);
        let entries = collect_entries(&mut doc, &headings, false);
        let html = render_list(&entries, &TocConfig::flat());

        assert!(html.starts_with("<ul class=\"list-reset\">"));
        assert!(html.ends_with("</ul>"));
    }

    #[test]
    fn test_caption_as_list_item_shares_the_list() {
        let (mut doc, headings) = headings_doc(&[2]);
        let entries = collect_entries(&mut doc, &headings, false);
        let mut config = TocConfig::flat();
        config.caption = Some("On this page".to_string());
        let html = render_list(&entries, &config);

        assert_eq!(
            html,
            "<ul class=\"list-reset\"><li class=\"toc-caption\">On this page</li>\
             <li><a href=\"#heading-0\">Heading 0</a></li></ul>"
        );
    }

    #[test]
    fn test_caption_as_heading_precedes_the_list() {
        let (mut doc, headings) = headings_doc(&[2]);
        let entries = collect_entries(&mut doc, &headings, true);
        let mut config = TocConfig::nested();
        config.caption = Some("Contents".to_string());
        let html = render_list(&entries, &config);

        assert!(html.starts_with("<h2>Contents</h2><ul>"));
    }

    #[test]
    fn test_custom_list_tag_used_for_sublists() {
        let (mut doc, headings) = headings_doc(&[2, 3]);
        let entries = collect_entries(&mut doc, &headings, true);
        let mut config = TocConfig::nested();
        config.list_tag = "ol".to_string();
        let html = render_list(&entries, &config);

        assert!(html.starts_with("<ol>"));
        assert!(html.contains("<ol><li><a href=\"#heading-1\">"));
        assert!(html.ends_with("</ol>"));
    }

    #[test]
    fn test_entry_without_id_renders_plain_text() {
        let entries = vec![ListNode {
            id: None,
            text: "No anchor".to_string(),
            children: Vec::new(),
        }];
        let html = render_list(&entries, &TocConfig::nested());
        assert_eq!(html, "<ul><li>No anchor</li></ul>");
    }
}
