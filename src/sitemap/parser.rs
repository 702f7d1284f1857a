//! Sitemap XML parsing
//!
//! Parsing happens in up to two passes:
//! 1. Hardened: valid UTF-8, no entity declarations, only XML's predefined
//!    entities, balanced tags.
//! 2. Lenient: the body decoded lossily, HTML entities replaced, text taken
//!    verbatim. This recovers sitemaps that carry HTML entities such as
//!    `&nbsp;` or `&eacute;` which plain XML rejects.
//!
//! Neither pass ever expands entities declared in a DTD.

use quick_xml::events::Event;
use quick_xml::name::{LocalName, Namespace, ResolveResult};
use quick_xml::NsReader;

/// Namespace that `<loc>` elements must be bound to
pub const SITEMAP_NAMESPACE: &str = "http://www.sitemaps.org/schemas/sitemap/0.9";

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum ParseMode {
    Hardened,
    Lenient,
}

/// Extracts every sitemap `<loc>` from `body`, in document order
///
/// # Returns
///
/// * `Ok(Vec<String>)` - Trimmed, non-empty page URLs
/// * `Err(String)` - Both passes failed; holds the lenient pass's error
pub fn parse_sitemap(body: &[u8]) -> Result<Vec<String>, String> {
    let strict = std::str::from_utf8(body)
        .map_err(|e| format!("invalid UTF-8: {}", e))
        .and_then(|xml| extract_locs(xml, ParseMode::Hardened));

    match strict {
        Ok(urls) => Ok(urls),
        Err(e) => {
            tracing::debug!("Hardened sitemap parse failed ({}), retrying with HTML entities decoded", e);
            let text = String::from_utf8_lossy(body);
            let unescaped = html_escape::decode_html_entities(&text);
            extract_locs(&unescaped, ParseMode::Lenient)
        }
    }
}

fn extract_locs(xml: &str, mode: ParseMode) -> Result<Vec<String>, String> {
    let mut reader = NsReader::from_str(xml);
    if mode == ParseMode::Lenient {
        reader.config_mut().check_end_names = false;
    }

    let mut urls = Vec::new();
    let mut buf = Vec::new();
    // Some while inside a sitemap <loc>
    let mut current: Option<String> = None;
    let mut saw_element = false;

    loop {
        let (ns, event) = match reader.read_resolved_event_into(&mut buf) {
            Ok(resolved) => resolved,
            Err(e) => return Err(e.to_string()),
        };

        match event {
            Event::DocType(doctype) => {
                if mode == ParseMode::Hardened
                    && String::from_utf8_lossy(&doctype).contains("<!ENTITY")
                {
                    return Err("entity declarations are not allowed".to_string());
                }
            }
            Event::Start(e) => {
                saw_element = true;
                if current.is_none() && is_sitemap_loc(&ns, e.local_name()) {
                    current = Some(String::new());
                }
            }
            Event::Empty(_) => saw_element = true,
            Event::Text(e) => {
                if let Some(loc) = current.as_mut() {
                    match mode {
                        ParseMode::Hardened => {
                            let text = e.unescape().map_err(|err| err.to_string())?;
                            loc.push_str(&text);
                        }
                        ParseMode::Lenient => loc.push_str(&String::from_utf8_lossy(&e)),
                    }
                }
            }
            Event::CData(e) => {
                if let Some(loc) = current.as_mut() {
                    loc.push_str(&String::from_utf8_lossy(&e));
                }
            }
            Event::End(e) => {
                if e.local_name().as_ref() == b"loc" {
                    if let Some(loc) = current.take() {
                        let loc = loc.trim();
                        if !loc.is_empty() {
                            urls.push(loc.to_string());
                        }
                    }
                }
            }
            Event::Eof => break,
            _ => {}
        }
        buf.clear();
    }

    if !saw_element {
        return Err("document has no root element".to_string());
    }

    Ok(urls)
}

fn is_sitemap_loc(ns: &ResolveResult<'_>, local: LocalName<'_>) -> bool {
    local.as_ref() == b"loc"
        && matches!(ns, ResolveResult::Bound(Namespace(uri)) if *uri == SITEMAP_NAMESPACE.as_bytes())
}
