//! Text helpers shared by the parser and the cleaning passes.

use std::borrow::Cow;

/// Decode bytes to a string, handling various encodings.
///
/// This function:
/// 1. First tries UTF-8 (handles BOM automatically via encoding_rs)
/// 2. If malformed, tries the hint encoding (from `<meta charset="...">`)
/// 3. Falls back to Windows-1252 (superset of ISO-8859-1)
///
/// Uses `Cow<str>` to avoid allocation when the input is valid UTF-8.
pub fn decode_text<'a>(bytes: &'a [u8], hint_encoding: Option<&str>) -> Cow<'a, str> {
    let (result, _encoding, malformed) = encoding_rs::UTF_8.decode(bytes);

    if !malformed {
        return result;
    }

    if let Some(name) = hint_encoding
        && let Some(encoding) = encoding_rs::Encoding::for_label(name.as_bytes())
    {
        let (result, _, _) = encoding.decode(bytes);
        return result;
    }

    let (result, _, _) = encoding_rs::WINDOWS_1252.decode(bytes);
    result
}

/// Extract the encoding label declared by a `charset=` in the page head.
///
/// Covers both `<meta charset="...">` and the `http-equiv` content form.
/// Only the first kilobyte is inspected, which is where browsers look too.
pub fn extract_meta_charset(bytes: &[u8]) -> Option<String> {
    let check_len = bytes.len().min(1024);
    let prefix = &bytes[..check_len];

    let pos = prefix
        .windows(8)
        .position(|w| w.eq_ignore_ascii_case(b"charset="))?;
    let after = &prefix[pos + 8..];
    let after = after
        .strip_prefix(b"\"")
        .or_else(|| after.strip_prefix(b"'"))
        .unwrap_or(after);

    let end = after
        .iter()
        .position(|&b| matches!(b, b'"' | b'\'' | b';' | b'>' | b'/') || b.is_ascii_whitespace())
        .unwrap_or(after.len());

    let label = std::str::from_utf8(&after[..end]).ok()?;
    (!label.is_empty()).then(|| label.to_string())
}

/// Collapse runs of whitespace into single spaces and trim both ends.
pub fn collapse_whitespace(text: &str) -> String {
    text.split_whitespace().collect::<Vec<_>>().join(" ")
}

/// Last non-empty path segment of a location, without its extension.
///
/// `https://pokemondb.net/pokedex/venusaur` and `pages/venusaur.html`
/// both name the page `venusaur`.
pub fn page_name(location: &str) -> String {
    let trimmed = location.trim_end_matches(['/', '\\']);
    let segment = trimmed
        .rsplit(['/', '\\'])
        .next()
        .unwrap_or(trimmed);
    let stem = match segment.rfind('.') {
        Some(dot) if dot > 0 => &segment[..dot],
        _ => segment,
    };
    if stem.is_empty() {
        "index".to_string()
    } else {
        stem.to_string()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_decode_utf8() {
        assert_eq!(decode_text("Pokédex".as_bytes(), None), "Pokédex");
    }

    #[test]
    fn test_decode_falls_back_to_hint() {
        // "é" in Latin-1
        let bytes = b"Pok\xe9dex";
        assert_eq!(decode_text(bytes, Some("iso-8859-1")), "Pokédex");
        assert_eq!(decode_text(bytes, None), "Pokédex");
    }

    #[test]
    fn test_extract_meta_charset() {
        let html = br#"<html><head><meta charset="windows-1252"></head>"#;
        assert_eq!(extract_meta_charset(html).as_deref(), Some("windows-1252"));

        let html = br#"<meta http-equiv="Content-Type" content="text/html; charset=ISO-8859-1">"#;
        assert_eq!(extract_meta_charset(html).as_deref(), Some("ISO-8859-1"));

        assert_eq!(extract_meta_charset(b"<html><body></body></html>"), None);
    }

    #[test]
    fn test_collapse_whitespace() {
        assert_eq!(collapse_whitespace("  Moves \n learnt\tby "), "Moves learnt by");
        assert_eq!(collapse_whitespace(" \n "), "");
    }

    #[test]
    fn test_page_name() {
        assert_eq!(page_name("https://pokemondb.net/pokedex/venusaur"), "venusaur");
        assert_eq!(page_name("pages/venusaur.html"), "venusaur");
        assert_eq!(page_name("https://pokemondb.net/pokedex/"), "pokedex");
        assert_eq!(page_name(""), "index");
    }
}
