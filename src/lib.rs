//! # dexsheet
//!
//! Turns species reference pages into clean, print-ready layout blocks.
//!
//! A page goes through three stages:
//!
//! 1. **Parse** - HTML into an arena [`Document`] via html5ever
//! 2. **Clean** - prune navigation and prose, rewrite icons, links and
//!    headings, tag move lists for two-column layout ([`clean`])
//! 3. **Linearize** - walk the cleaned tree into a [`LayoutBlock`] sequence
//!    a renderer can draw ([`linearize`], [`render`])
//!
//! The removal and rewrite rules are a [`Policy`] value; the
//! [`Policy::species_page`] policy targets one site's page schema.
//!
//! ## Quick Start
//!
//! ```
//! use dexsheet::{LayoutBlock, Pipeline};
//! use url::Url;
//!
//! let pipeline = Pipeline::species_page()?;
//! let base = Url::parse("https://pokemondb.net/pokedex/venusaur")?;
//! let blocks = pipeline.process_html(
//!     "<main><h1>Venusaur</h1><p>Venusaur is a Grass type.</p></main>",
//!     &base,
//! );
//!
//! assert_eq!(blocks, vec![LayoutBlock::Title { text: "Venusaur".into() }]);
//! # Ok::<(), Box<dyn std::error::Error>>(())
//! ```

pub mod block;
pub mod clean;
pub mod dom;
pub mod error;
pub mod linearize;
pub mod pipeline;
pub mod policy;
pub mod render;
pub mod select;
pub mod source;
pub(crate) mod util;

pub use block::{Cell, HeadingLevel, Image, LayoutBlock, Table};
pub use clean::CleanReport;
pub use dom::{Document, NodeId, parse_html, parse_html_bytes};
pub use error::{Error, Result};
pub use linearize::Linearizer;
pub use pipeline::{PageOutcome, PageRequest, Pipeline};
pub use policy::Policy;
pub use select::Selector;
pub use source::{DirImageSource, FsPageSource, ImageSource, PageSource};
