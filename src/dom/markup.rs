use super::{Document, NodeData, NodeId, VOID_ELEMENTS};

/// Serialize a node and its subtree to markup
pub fn serialize_node(doc: &Document, id: NodeId) -> String {
    let mut out = String::new();
    write_node(doc, id, &mut out);
    out
}

/// Serialize only the children of a node
pub fn serialize_children(doc: &Document, id: NodeId) -> String {
    let mut out = String::new();
    for &child in doc.children(id) {
        write_node(doc, child, &mut out);
    }
    out
}

fn write_node(doc: &Document, id: NodeId, out: &mut String) {
    match &doc.node(id).data {
        NodeData::Text(text) => out.push_str(&html_escape::encode_text(text)),
        NodeData::Element { tag, attrs } => {
            out.push('<');
            out.push_str(tag);
            for (name, value) in attrs {
                out.push(' ');
                out.push_str(name);
                out.push_str("=\"");
                out.push_str(&html_escape::encode_double_quoted_attribute(value));
                out.push('"');
            }
            out.push('>');
            if VOID_ELEMENTS.contains(&tag.as_str()) {
                return;
            }
            for &child in doc.children(id) {
                write_node(doc, child, out);
            }
            out.push_str("</");
            out.push_str(tag);
            out.push('>');
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::dom::parse_document;

    #[test]
    fn test_serialize_escapes_text_and_attributes() {
        let mut doc = Document::new();
        let root = doc.root();
        let heading = doc.create_element("h2");
        doc.set_attr(heading, "title", "a \"quoted\" value");
        let text = doc.create_text("Fish & chips <fast>");
        doc.append_child(heading, text);
        doc.append_child(root, heading);

        let html = doc.to_html();
        assert!(html.contains("title=\"a &quot;quoted&quot; value\""));
        assert!(html.contains("Fish &amp; chips &lt;fast&gt;"));
    }

    #[test]
    fn test_serialize_void_elements() {
        let doc = parse_document("<p>a<br>b</p>").unwrap();
        assert_eq!(doc.to_html(), "<p>a<br>b</p>");
    }

    #[test]
    fn test_parse_then_serialize_keeps_structure() {
        let doc = parse_document("<nav class=\"subnav\"><details open=\"\"><summary>More</summary></details></nav>")
            .unwrap();
        assert_eq!(
            doc.to_html(),
            "<nav class=\"subnav\"><details open=\"\"><summary>More</summary></details></nav>"
        );
    }

    #[test]
    fn test_inner_html() {
        let doc = parse_document("<div><h2>One</h2></div>").unwrap();
        let div = doc.children(doc.root())[0];
        assert_eq!(doc.inner_html(div), "<h2>One</h2>");
        assert_eq!(doc.node_html(div), "<div><h2>One</h2></div>");
    }
}
