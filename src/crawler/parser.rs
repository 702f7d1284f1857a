//! HTML parser for extracting images
//!
//! Collects every `<img>` on a page together with its `src` and `alt`
//! attributes. Sources are kept as written; resolving them against the page
//! URL happens at match time.

use scraper::{Html, Selector};

/// One `<img>` element found on a page
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ImageRef {
    /// The `src` attribute, `None` when missing or blank
    pub source: Option<String>,

    /// The `alt` attribute, empty when missing
    pub alt: String,

    /// Page the element was found on
    pub page_url: String,
}

/// Which part of a page is searched for images
#[derive(Debug, Clone)]
pub enum ImageScope {
    /// Every image in the document
    WholePage,

    /// Only images inside the first element matching the selector
    Within(Selector),
}

impl ImageScope {
    /// Builds a scope limited to the first element matching `css`
    pub fn within(css: &str) -> Result<Self, String> {
        Selector::parse(css)
            .map(Self::Within)
            .map_err(|e| format!("invalid content selector '{}': {}", css, e))
    }
}

/// Extracts the images of a page in document order
///
/// # Returns
///
/// * `Some(Vec<ImageRef>)` - Images in scope (possibly none)
/// * `None` - The scope's container element is not on the page
///
/// # Example
///
/// ```
/// use pixel_sift::crawler::{extract_images, ImageScope};
///
/// let html = r#"<div class="entry-content"><img src="a.png" alt="A"></div><img src="b.png">"#;
/// let scope = ImageScope::within("div.entry-content").unwrap();
/// let images = extract_images(html, "https://x.test/p", &scope).unwrap();
/// assert_eq!(images.len(), 1);
/// assert_eq!(images[0].source.as_deref(), Some("a.png"));
/// ```
pub fn extract_images(html: &str, page_url: &str, scope: &ImageScope) -> Option<Vec<ImageRef>> {
    let document = Html::parse_document(html);
    let img = Selector::parse("img").ok()?;

    let found: Vec<(Option<String>, String)> = match scope {
        ImageScope::WholePage => document.select(&img).map(to_image_ref).collect(),
        ImageScope::Within(container) => {
            let root = document.select(container).next()?;
            root.select(&img).map(to_image_ref).collect()
        }
    };

    Some(
        found
            .into_iter()
            .map(|(source, alt)| ImageRef {
                source,
                alt,
                page_url: page_url.to_string(),
            })
            .collect(),
    )
}

fn to_image_ref(element: scraper::ElementRef<'_>) -> (Option<String>, String) {
    let value = element.value();
    let source = value
        .attr("src")
        .map(str::trim)
        .filter(|src| !src.is_empty())
        .map(str::to_string);
    let alt = value.attr("alt").unwrap_or("").to_string();

    (source, alt)
}
