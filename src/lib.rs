//! In-page navigation components for HTML documents: table of contents
//! generation, heading anchors and a collapsible sub-navigation closer.
//!
//! Components operate on an owned [`dom::Document`] and are driven by a
//! [`component::Host`] from document-ready and input-event callbacks, or
//! used directly through the free functions ([`toc::build_toc`],
//! [`anchors::inject_anchors`]).

pub mod anchors;
pub mod component;
pub mod dom;
pub mod ids;
pub mod subnav;
pub mod toc;
pub mod utils;

pub use utils::error::{Error, Result};
