mod builder;

pub use builder::{collect_entries, render_list, ListNode};

use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};

use crate::component::{Activation, Component, Notifier};
use crate::dom::{Document, NodeId, RankSet};
use crate::utils::error::Result;

/// Utility class applied to flat lists by default
pub const FLAT_LIST_CLASS: &str = "list-reset";

const COMPONENT_NAME: &str = "toc";

/// Per-build table-of-contents settings.
///
/// Tag names are used as-is; unknown tags pass through uninterpreted into
/// the generated markup.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct TocConfig {
    /// Mirror heading hierarchy; a flat single-level list otherwise
    pub nested: bool,
    /// Which heading ranks participate
    pub ranks: RankSet,
    pub caption: Option<String>,
    /// `li` places the caption inside the list; any other tag renders it as
    /// a standalone element preceding the list
    pub caption_tag: String,
    pub list_tag: String,
    pub list_class: Option<String>,
}

impl TocConfig {
    /// Flat defaults: rank 2 only, list-item caption, utility list class
    pub fn flat() -> Self {
        TocConfig {
            nested: false,
            ranks: RankSet::single(2),
            caption: None,
            caption_tag: "li".to_string(),
            list_tag: "ul".to_string(),
            list_class: Some(FLAT_LIST_CLASS.to_string()),
        }
    }

    /// Nested defaults: ranks 2-6, heading caption, no list class
    pub fn nested() -> Self {
        TocConfig {
            nested: true,
            ranks: RankSet::range(2, 6),
            caption: None,
            caption_tag: "h2".to_string(),
            list_tag: "ul".to_string(),
            list_class: None,
        }
    }

    /// Read settings from a declarative attribute map. The nesting flag
    /// picks the default set; explicit attributes override individually.
    pub fn from_attrs(attrs: &BTreeMap<String, String>) -> Self {
        let nested = attrs.get("nested").map(|v| v != "false").unwrap_or(false);
        let mut config = if nested { Self::nested() } else { Self::flat() };
        if let Some(value) = attrs.get("ranks") {
            config.ranks = RankSet::parse(value);
        }
        if let Some(value) = attrs.get("caption") {
            if !value.is_empty() {
                config.caption = Some(value.clone());
            }
        }
        if let Some(value) = attrs.get("caption-tag") {
            config.caption_tag = value.clone();
        }
        if let Some(value) = attrs.get("list-tag") {
            config.list_tag = value.clone();
        }
        if let Some(value) = attrs.get("list-class") {
            config.list_class = if value.is_empty() {
                None
            } else {
                Some(value.clone())
            };
        }
        config
    }
}

impl Default for TocConfig {
    fn default() -> Self {
        Self::flat()
    }
}

/// Build table-of-contents markup for the eligible headings under `scope`.
///
/// Headings inside `exclude` (the mount element, so a previous build's
/// output is never indexed) do not participate. Ids are assigned in place.
/// An empty eligible set emits exactly one debug signal and returns `None`
/// with the document untouched.
pub fn build_toc(
    doc: &mut Document,
    scope: NodeId,
    exclude: Option<NodeId>,
    config: &TocConfig,
    notifier: &mut dyn Notifier,
) -> Option<String> {
    let headings: Vec<NodeId> = doc
        .headings(scope)
        .into_iter()
        .filter(|&h| exclude.map_or(true, |mount| !doc.contains(mount, h)))
        .filter(|&h| {
            doc.heading_rank(h)
                .map_or(false, |rank| config.ranks.contains(rank))
        })
        .collect();

    if headings.is_empty() {
        notifier.debug(COMPONENT_NAME, "no matching headings");
        return None;
    }

    let entries = collect_entries(doc, &headings, config.nested);
    Some(render_list(&entries, config))
}

/// Component that renders a table of contents into its mount element when
/// the document becomes ready
pub struct TocComponent {
    element: NodeId,
}

impl TocComponent {
    pub fn new(element: NodeId) -> Self {
        TocComponent { element }
    }
}

impl Component for TocComponent {
    fn name(&self) -> &'static str {
        COMPONENT_NAME
    }

    fn connected(
        &mut self,
        doc: &mut Document,
        notifier: &mut dyn Notifier,
    ) -> Result<Activation> {
        let config = match doc.attrs(self.element) {
            Some(attrs) => TocConfig::from_attrs(attrs),
            None => TocConfig::default(),
        };
        let root = doc.root();
        match build_toc(doc, root, Some(self.element), &config, notifier) {
            Some(markup) => {
                doc.set_inner_markup(self.element, &markup)?;
                notifier.ready(COMPONENT_NAME);
                Ok(Activation::Ready { listen: Vec::new() })
            }
            None => Ok(Activation::Skipped),
        }
    }
}
