//! Markdown rendering of layout blocks.

use std::io::{self, Write};

use crate::block::{Image, LayoutBlock, Table};

use super::Renderer;
use super::escape::{escape_cell, escape_markdown};

/// Marker opening a two-column group; a layout engine applies the compact
/// two-column style up to [`TWO_COLUMN_END`].
pub const TWO_COLUMN_START: &str = "<!-- two-column -->";
pub const TWO_COLUMN_END: &str = "<!-- /two-column -->";

/// Configuration for Markdown output.
#[derive(Debug, Clone)]
pub struct MarkdownConfig {
    /// Heading level used for two-column group headings.
    pub group_heading_level: u8,
}

impl Default for MarkdownConfig {
    fn default() -> Self {
        Self {
            group_heading_level: 4,
        }
    }
}

/// Writes blocks as GitHub-flavored Markdown.
#[derive(Debug, Clone, Default)]
pub struct MarkdownRenderer {
    config: MarkdownConfig,
}

impl MarkdownRenderer {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_config(config: MarkdownConfig) -> Self {
        Self { config }
    }
}

impl Renderer for MarkdownRenderer {
    fn extension(&self) -> &'static str {
        "md"
    }

    fn render<W: Write>(&self, blocks: &[LayoutBlock], writer: &mut W) -> io::Result<()> {
        let mut first = true;
        for block in blocks {
            if !first {
                writeln!(writer)?;
            }
            first = false;

            match block {
                LayoutBlock::Title { text } => writeln!(writer, "# {}", escape_markdown(text))?,
                LayoutBlock::Heading { level, text } => write_heading(writer, level.get(), text)?,
                LayoutBlock::Table(table) => write_table(writer, table)?,
                LayoutBlock::Image(image) => write_image(writer, image)?,
                LayoutBlock::TwoColumnGroup { heading, tables } => {
                    writeln!(writer, "{TWO_COLUMN_START}")?;
                    if let Some(heading) = heading {
                        writeln!(writer)?;
                        write_heading(writer, self.config.group_heading_level, heading)?;
                    }
                    for table in tables {
                        writeln!(writer)?;
                        write_table(writer, table)?;
                    }
                    writeln!(writer)?;
                    writeln!(writer, "{TWO_COLUMN_END}")?;
                }
            }
        }
        Ok(())
    }
}

fn write_heading<W: Write>(writer: &mut W, level: u8, text: &str) -> io::Result<()> {
    let marker = "#".repeat(usize::from(level.clamp(1, 6)));
    writeln!(writer, "{marker} {}", escape_markdown(text))
}

fn write_image<W: Write>(writer: &mut W, image: &Image) -> io::Result<()> {
    writeln!(writer, "![]({})", image.source.replace(' ', "%20"))
}

/// Pipe table. The first row becomes the header when it is all header
/// cells; otherwise an empty header row keeps the table valid.
fn write_table<W: Write>(writer: &mut W, table: &Table) -> io::Result<()> {
    let width = table.column_count();
    if width == 0 {
        return Ok(());
    }

    let mut rows = table.rows.iter().map(|row| {
        let mut cells: Vec<String> = row.iter().map(|c| escape_cell(&c.text)).collect();
        cells.resize(width, String::new());
        cells
    });

    let header = if table.has_header_row() {
        rows.next().unwrap_or_default()
    } else {
        vec![String::new(); width]
    };
    write_row(writer, &header)?;
    write_row(writer, &vec!["---".to_string(); width])?;
    for row in rows {
        write_row(writer, &row)?;
    }
    Ok(())
}

fn write_row<W: Write>(writer: &mut W, cells: &[String]) -> io::Result<()> {
    write!(writer, "|")?;
    for cell in cells {
        write!(writer, " {cell} |")?;
    }
    writeln!(writer)
}
