use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};

use crate::component::{Activation, Component, Notifier};
use crate::dom::{Document, NodeId, RankSet};
use crate::ids;
use crate::utils::error::Result;

/// Class carried by injected anchor links; also used to keep injected
/// glyphs out of heading text extraction
pub const ANCHOR_CLASS: &str = "heading-anchor";

const COMPONENT_NAME: &str = "anchors";

/// Heading-anchor settings
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AnchorConfig {
    /// Glyph shown inside the anchor link
    pub icon: String,
    /// Place the anchor before the heading content instead of after
    pub before: bool,
    /// Which heading ranks receive anchors
    pub ranks: RankSet,
}

impl AnchorConfig {
    /// Read settings from a declarative attribute map: `icon`, `placement`
    /// (`before`/`after`) and `ranks`
    pub fn from_attrs(attrs: &BTreeMap<String, String>) -> Self {
        let mut config = Self::default();
        if let Some(value) = attrs.get("icon") {
            config.icon = value.clone();
        }
        if let Some(value) = attrs.get("placement") {
            config.before = value == "before";
        }
        if let Some(value) = attrs.get("ranks") {
            config.ranks = RankSet::parse(value);
        }
        config
    }
}

impl Default for AnchorConfig {
    fn default() -> Self {
        AnchorConfig {
            icon: "#".to_string(),
            before: false,
            ranks: RankSet::range(2, 6),
        }
    }
}

/// Inject a self-link anchor into every eligible heading under `scope`.
///
/// Headings that already carry an anchor are skipped, as are headings
/// whose id assignment was skipped for lack of text; re-running is safe.
/// Returns the number of anchors injected.
pub fn inject_anchors(doc: &mut Document, scope: NodeId, config: &AnchorConfig) -> usize {
    let headings: Vec<NodeId> = doc
        .headings(scope)
        .into_iter()
        .filter(|&h| {
            doc.heading_rank(h)
                .map_or(false, |rank| config.ranks.contains(rank))
        })
        .collect();

    let mut injected = 0;
    for heading in headings {
        if has_anchor(doc, heading) {
            continue;
        }
        let id = match ids::assign_heading_id(doc, heading) {
            Some(id) => id,
            None => continue,
        };
        let anchor = doc.create_element("a");
        doc.set_attr(anchor, "class", ANCHOR_CLASS);
        doc.set_attr(anchor, "href", &format!("#{}", id));
        let glyph = doc.create_text(&config.icon);
        doc.append_child(anchor, glyph);
        if config.before {
            doc.prepend_child(heading, anchor);
        } else {
            doc.append_child(heading, anchor);
        }
        injected += 1;
    }
    injected
}

fn has_anchor(doc: &Document, heading: NodeId) -> bool {
    doc.children(heading)
        .iter()
        .any(|&child| doc.has_class(child, ANCHOR_CLASS))
}

/// Component that injects heading anchors within its element's subtree
/// when the document becomes ready
pub struct HeadingAnchors {
    element: NodeId,
}

impl HeadingAnchors {
    pub fn new(element: NodeId) -> Self {
        HeadingAnchors { element }
    }
}

impl Component for HeadingAnchors {
    fn name(&self) -> &'static str {
        COMPONENT_NAME
    }

    fn connected(
        &mut self,
        doc: &mut Document,
        notifier: &mut dyn Notifier,
    ) -> Result<Activation> {
        let config = match doc.attrs(self.element) {
            Some(attrs) => AnchorConfig::from_attrs(attrs),
            None => AnchorConfig::default(),
        };
        let eligible = doc.headings(self.element).into_iter().any(|h| {
            doc.heading_rank(h)
                .map_or(false, |rank| config.ranks.contains(rank))
        });
        if !eligible {
            notifier.debug(COMPONENT_NAME, "no matching headings");
            return Ok(Activation::Skipped);
        }

        let injected = inject_anchors(doc, self.element, &config);
        log::debug!("injected {} heading anchors", injected);
        notifier.ready(COMPONENT_NAME);
        Ok(Activation::Ready { listen: Vec::new() })
    }
}
