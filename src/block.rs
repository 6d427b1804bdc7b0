//! Layout blocks: the linearized output handed to a renderer.

#[cfg(feature = "serde")]
use serde::Serialize;

/// Heading levels that survive linearization.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub enum HeadingLevel {
    H2,
    H3,
    H4,
}

impl HeadingLevel {
    /// Map a numeric level; only 2, 3 and 4 are accepted.
    pub fn from_level(level: u8) -> Option<Self> {
        match level {
            2 => Some(Self::H2),
            3 => Some(Self::H3),
            4 => Some(Self::H4),
            _ => None,
        }
    }

    pub fn get(self) -> u8 {
        match self {
            Self::H2 => 2,
            Self::H3 => 3,
            Self::H4 => 4,
        }
    }
}

#[cfg(feature = "serde")]
impl Serialize for HeadingLevel {
    fn serialize<S: serde::Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.serialize_u8(self.get())
    }
}

/// One table cell.
#[derive(Debug, Clone, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(Serialize))]
pub struct Cell {
    pub text: String,
    pub is_header: bool,
}

impl Cell {
    pub fn header(text: impl Into<String>) -> Self {
        Self {
            text: text.into(),
            is_header: true,
        }
    }

    pub fn data(text: impl Into<String>) -> Self {
        Self {
            text: text.into(),
            is_header: false,
        }
    }
}

/// A table grid. Rows may differ in length.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(Serialize))]
pub struct Table {
    pub rows: Vec<Vec<Cell>>,
}

impl Table {
    /// Whether the first row consists only of header cells.
    pub fn has_header_row(&self) -> bool {
        self.rows
            .first()
            .is_some_and(|row| !row.is_empty() && row.iter().all(|c| c.is_header))
    }

    /// Widest row length.
    pub fn column_count(&self) -> usize {
        self.rows.iter().map(Vec::len).max().unwrap_or(0)
    }
}

/// An image reference, with its bytes when an image source fetched them.
#[derive(Debug, Clone, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(Serialize))]
pub struct Image {
    /// Absolute reference resolved against the page location.
    pub source: String,
    #[cfg_attr(feature = "serde", serde(skip))]
    pub data: Option<Vec<u8>>,
}

/// One unit of the linearized document.
#[derive(Debug, Clone, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(Serialize))]
#[cfg_attr(feature = "serde", serde(tag = "type", rename_all = "snake_case"))]
pub enum LayoutBlock {
    Title {
        text: String,
    },
    Heading {
        level: HeadingLevel,
        text: String,
    },
    Table(Table),
    Image(Image),
    /// Tables laid out side by side in two columns, at a compact type scale.
    ///
    /// A group carries one heading: the first `h3`/`h4` in its container.
    /// Tables under any later heading in the same container are still
    /// listed here, but that heading's text is not kept.
    TwoColumnGroup {
        heading: Option<String>,
        tables: Vec<Table>,
    },
}

impl LayoutBlock {
    /// Short name of the block kind, for logs and summaries.
    pub fn kind(&self) -> &'static str {
        match self {
            Self::Title { .. } => "title",
            Self::Heading { .. } => "heading",
            Self::Table(_) => "table",
            Self::Image(_) => "image",
            Self::TwoColumnGroup { .. } => "two_column_group",
        }
    }
}
