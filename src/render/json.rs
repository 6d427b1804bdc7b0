//! JSON rendering of layout blocks.

use std::io::{self, Write};

use crate::block::LayoutBlock;

use super::Renderer;

/// Writes the block sequence as a JSON array.
///
/// Image bytes are never serialized; images carry their resolved source.
#[derive(Debug, Clone, Copy, Default)]
pub struct JsonRenderer {
    pretty: bool,
}

impl JsonRenderer {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn pretty() -> Self {
        Self { pretty: true }
    }
}

impl Renderer for JsonRenderer {
    fn extension(&self) -> &'static str {
        "json"
    }

    fn render<W: Write>(&self, blocks: &[LayoutBlock], writer: &mut W) -> io::Result<()> {
        if self.pretty {
            serde_json::to_writer_pretty(&mut *writer, blocks)?;
        } else {
            serde_json::to_writer(&mut *writer, blocks)?;
        }
        writeln!(writer)
    }
}
