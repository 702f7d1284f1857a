//! Image matching against search terms
//!
//! An image matches when one of the search terms occurs, case-insensitively,
//! in its recognized text, its resolved URL, or its alt text. The sources are
//! checked in that order and the first hit decides the reported term.

use crate::crawler::ImageRef;
use crate::images::ImageFetcher;
use crate::ocr::TextExtractor;
use std::fmt;
use url::Url;

/// Where a search term was found
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum MatchSource {
    /// Text recognized in the image pixels
    Text,
    /// The resolved image URL
    Url,
    /// The `alt` attribute
    Alt,
}

impl fmt::Display for MatchSource {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let s = match self {
            Self::Text => "text",
            Self::Url => "url",
            Self::Alt => "alt",
        };
        write!(f, "{}", s)
    }
}

/// One matching image
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct MatchResult {
    /// Page the image was found on
    pub page_url: String,

    /// Absolute image URL (or the data URI)
    pub image_url: String,

    /// The search term as the user spelled it
    pub matched_term: String,

    /// Which check produced the hit
    pub source: MatchSource,
}

/// Search terms for one run, compared case-insensitively
#[derive(Debug, Clone, Default)]
pub struct SearchTerms {
    /// (as given, lowercased)
    terms: Vec<(String, String)>,
}

impl SearchTerms {
    /// Builds the term set; blank terms are dropped since they would match every image
    pub fn new<I, S>(terms: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        let terms = terms
            .into_iter()
            .map(Into::into)
            .filter(|term: &String| !term.trim().is_empty())
            .map(|term| {
                let lowered = term.to_lowercase();
                (term, lowered)
            })
            .collect();

        Self { terms }
    }

    pub fn len(&self) -> usize {
        self.terms.len()
    }

    pub fn is_empty(&self) -> bool {
        self.terms.is_empty()
    }

    /// Terms in the order they were given
    pub fn iter(&self) -> impl Iterator<Item = &str> {
        self.terms.iter().map(|(term, _)| term.as_str())
    }

    /// Returns the first term found, checking all of `text`, then `url`, then `alt`
    ///
    /// `text` is expected to be lowercased already; `url` and `alt` are
    /// lowercased here.
    pub fn find(&self, text: &str, url: &str, alt: &str) -> Option<(&str, MatchSource)> {
        let url = url.to_lowercase();
        let alt = alt.to_lowercase();

        let found = [
            (text, MatchSource::Text),
            (url.as_str(), MatchSource::Url),
            (alt.as_str(), MatchSource::Alt),
        ]
        .into_iter()
        .find_map(|(haystack, source)| {
            self.terms
                .iter()
                .find(|(_, lowered)| haystack.contains(lowered.as_str()))
                .map(|(term, _)| (term.as_str(), source))
        });
        found
    }
}

/// Decides whether single images match the search terms
#[derive(Clone)]
pub struct ImageMatcher {
    fetcher: ImageFetcher,
    extractor: TextExtractor,
}

impl ImageMatcher {
    pub fn new(fetcher: ImageFetcher, extractor: TextExtractor) -> Self {
        Self { fetcher, extractor }
    }

    /// Evaluates one image from a page
    ///
    /// # Returns
    ///
    /// * `Some(MatchResult)` - A term was found
    /// * `None` - No source attribute, SVG, unfetchable image, or no term found
    pub async fn match_image(&self, image: &ImageRef, terms: &SearchTerms) -> Option<MatchResult> {
        let source = image.source.as_deref()?;
        let image_url = resolve_image_url(&image.page_url, source)?;

        if is_svg(&image_url) {
            tracing::trace!("Skipping SVG image {}", image_url);
            return None;
        }

        let pixels = self.fetcher.fetch(&image_url).await?;
        let text = self.extractor.extract(&pixels).await;

        let (term, found_in) = terms.find(&text, &image_url, &image.alt)?;
        tracing::debug!(
            "Match on {}: '{}' found in {} of {}",
            image.page_url,
            term,
            found_in,
            image_url
        );

        Some(MatchResult {
            page_url: image.page_url.clone(),
            image_url,
            matched_term: term.to_string(),
            source: found_in,
        })
    }
}

/// Resolves an image `src` against the page it appeared on
///
/// Sources that already carry a scheme (`https:`, `data:` and so on) are
/// returned unchanged; anything else is joined onto `page_url`.
pub fn resolve_image_url(page_url: &str, source: &str) -> Option<String> {
    let source = source.trim();
    if source.is_empty() {
        return None;
    }

    if Url::parse(source).is_ok() {
        return Some(source.to_string());
    }

    let base = Url::parse(page_url).ok()?;
    base.join(source).ok().map(|url| url.to_string())
}

/// Returns true for vector images, which recognition cannot handle
pub fn is_svg(image_url: &str) -> bool {
    image_url.starts_with("data:image/svg") || image_url.to_lowercase().contains("svg")
}
