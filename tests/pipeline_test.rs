//! End-to-end tests on a saved species page.
//!
//! The fixture mirrors the structure of a real page: site chrome, a vitals
//! table with rows to drop, sections to prune, and a tabbed move list with
//! one active and one inactive panel.

use std::fs;
use std::path::PathBuf;

use dexsheet::render::{MarkdownRenderer, Renderer};
use dexsheet::{
    Cell, DirImageSource, Error, FsPageSource, HeadingLevel, LayoutBlock, PageRequest, Pipeline,
    Table, parse_html_bytes,
};
use tempfile::TempDir;
use url::Url;

fn fixtures() -> PathBuf {
    PathBuf::from(env!("CARGO_MANIFEST_DIR")).join("tests/fixtures")
}

fn fixture_bytes() -> Vec<u8> {
    fs::read(fixtures().join("venusaur.html")).unwrap()
}

fn base() -> Url {
    Url::parse("https://pokemondb.net/pokedex/venusaur").unwrap()
}

fn heading(level: HeadingLevel, text: &str) -> LayoutBlock {
    LayoutBlock::Heading {
        level,
        text: text.to_string(),
    }
}

fn row(header: &str, data: &str) -> Vec<Cell> {
    vec![Cell::header(header), Cell::data(data)]
}

// ============================================================================
// Full Page
// ============================================================================

#[test]
fn test_species_page_blocks() {
    let pipeline = Pipeline::species_page().unwrap();

    let blocks = pipeline.process_bytes(&fixture_bytes(), &base());

    let expected = vec![
        LayoutBlock::Title {
            text: "Venusaur".to_string(),
        },
        LayoutBlock::Image(dexsheet::Image {
            source: "https://img.pokemondb.net/artwork/venusaur.jpg".to_string(),
            data: None,
        }),
        heading(HeadingLevel::H3, "Pokédex data"),
        LayoutBlock::Table(Table {
            rows: vec![
                row("Type", "Grass Poison"),
                row("Weight", "100.0 kg"),
                row("Abilities", "Overgrow"),
            ],
        }),
        heading(HeadingLevel::H3, "Base stats"),
        LayoutBlock::Table(Table {
            rows: vec![row("HP", "80"), row("Attack", "82")],
        }),
        heading(HeadingLevel::H3, "Moves learned by Venusaur"),
        LayoutBlock::TwoColumnGroup {
            heading: Some("Moves learnt by level up".to_string()),
            tables: vec![Table {
                rows: vec![
                    vec![
                        Cell::header("Lv."),
                        Cell::header("Move"),
                        Cell::header("Type"),
                        Cell::header("Cat."),
                    ],
                    vec![
                        Cell::data("1"),
                        Cell::data("Tackle"),
                        Cell::data("Normal"),
                        Cell::data("Physical"),
                    ],
                    vec![
                        Cell::data("1"),
                        Cell::data("Growl"),
                        Cell::data("Normal"),
                        Cell::data("Status"),
                    ],
                ],
            }],
        },
        LayoutBlock::TwoColumnGroup {
            heading: Some("Moves learnt by TM".to_string()),
            tables: vec![Table {
                rows: vec![
                    vec![Cell::header("TM"), Cell::header("Move")],
                    vec![Cell::data("01"), Cell::data("Take Down")],
                ],
            }],
        },
    ];

    assert_eq!(blocks, expected);
}

#[test]
fn test_clean_removes_site_chrome_and_inactive_tabs() {
    let pipeline = Pipeline::species_page().unwrap();
    let mut doc = parse_html_bytes(&fixture_bytes());

    let report = pipeline.clean(&mut doc);

    assert_eq!(report.prune.labeled_rows, 4);
    assert_eq!(report.rewrite.icons, 2);
    assert_eq!(report.two_column, 2);
    for gone in ["header", "footer", "nav", "ul", "h2"] {
        assert!(doc.find_by_tag(gone).is_none(), "{gone} survived cleaning");
    }
    assert!(doc.find_by_id("tab-moves-20").is_none());
    assert!(doc.find_by_id("tab-moves-21").is_some());
    assert!(doc.find_by_id("dex-flavor").is_some());
}

// ============================================================================
// Collaborators
// ============================================================================

#[test]
fn test_images_from_local_mirror() {
    let mirror = TempDir::new().unwrap();
    fs::write(mirror.path().join("venusaur.jpg"), [0xFF, 0xD8, 0xFF]).unwrap();
    let pipeline = Pipeline::species_page()
        .unwrap()
        .with_images(DirImageSource::new(mirror.path()));

    let blocks = pipeline.process_bytes(&fixture_bytes(), &base());

    let images: Vec<_> = blocks
        .iter()
        .filter_map(|b| match b {
            LayoutBlock::Image(img) => Some(img),
            _ => None,
        })
        .collect();
    assert_eq!(images.len(), 1);
    assert_eq!(images[0].data.as_deref(), Some(&[0xFF, 0xD8, 0xFF][..]));
}

#[test]
fn test_missing_image_is_omitted() {
    let empty_mirror = TempDir::new().unwrap();
    let pipeline = Pipeline::species_page()
        .unwrap()
        .with_images(DirImageSource::new(empty_mirror.path()));

    let blocks = pipeline.process_bytes(&fixture_bytes(), &base());

    assert!(blocks.iter().all(|b| !matches!(b, LayoutBlock::Image(_))));
    assert_eq!(blocks.len(), 8);
}

#[test]
fn test_batch_writes_markdown_pages() {
    let out = TempDir::new().unwrap();
    let site = Url::parse("https://pokemondb.net/pokedex/").unwrap();
    let requests = vec![
        PageRequest::under("venusaur.html", &site).unwrap(),
        PageRequest::under("missingno.html", &site).unwrap(),
    ];
    let pipeline = Pipeline::species_page().unwrap();
    let renderer = MarkdownRenderer::new();

    let outcomes = pipeline
        .process_batch(&FsPageSource::with_root(fixtures()), &requests, 2)
        .unwrap();

    assert!(matches!(outcomes[1].result, Err(Error::Fetch { .. })));
    let blocks = outcomes[0].result.as_ref().unwrap();
    let path = out
        .path()
        .join(format!("{}.{}", outcomes[0].name, renderer.extension()));
    let mut file = fs::File::create(&path).unwrap();
    renderer.render(blocks, &mut file).unwrap();

    let markdown = fs::read_to_string(out.path().join("venusaur.md")).unwrap();
    assert!(markdown.starts_with("# Venusaur\n"));
    assert!(markdown.contains("| Type | Grass Poison |"));
    assert_eq!(markdown.matches("<!-- two-column -->").count(), 2);
    assert!(markdown.contains("#### Moves learnt by level up"));
}
