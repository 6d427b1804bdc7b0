//! Output renderers for layout blocks.
//!
//! Rendering is pure formatting: a [`Renderer`] writes a block sequence to
//! any [`Write`] destination and never touches the tree.
//!
//! # Example
//!
//! ```
//! use dexsheet::block::{HeadingLevel, LayoutBlock};
//! use dexsheet::render::{MarkdownRenderer, Renderer};
//!
//! let blocks = vec![LayoutBlock::Heading {
//!     level: HeadingLevel::H3,
//!     text: "Base stats".to_string(),
//! }];
//! let mut out = Vec::new();
//! MarkdownRenderer::new().render(&blocks, &mut out)?;
//! assert_eq!(out, b"### Base stats\n");
//! # Ok::<(), std::io::Error>(())
//! ```

use std::io::{self, Write};

use crate::block::LayoutBlock;

mod escape;
#[cfg(feature = "serde")]
mod json;
mod markdown;

pub use escape::{escape_cell, escape_markdown};
#[cfg(feature = "serde")]
pub use json::JsonRenderer;
pub use markdown::{MarkdownConfig, MarkdownRenderer, TWO_COLUMN_END, TWO_COLUMN_START};

/// Trait for writing block sequences in a specific output format.
pub trait Renderer {
    /// File extension for rendered pages, without the dot.
    fn extension(&self) -> &'static str;

    /// Render the blocks to the provided writer.
    fn render<W: Write>(&self, blocks: &[LayoutBlock], writer: &mut W) -> io::Result<()>;
}
