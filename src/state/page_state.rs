/// Page outcome definitions for tracking crawl progress
///
/// Every visited page ends in exactly one of these outcomes.
use std::fmt;

/// How the visit of a single page ended
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum PageOutcome {
    /// At least one image on the page matched
    Matched,

    /// Images were checked but none matched (or there were none in scope)
    NoMatches,

    /// The content container was absent, so no images were in scope
    NoContainer,

    /// The page could not be fetched
    Failed,
}

impl PageOutcome {
    /// Returns true if the page contributed at least one match
    pub fn is_match(&self) -> bool {
        matches!(self, Self::Matched)
    }

    /// Returns true if the page could not be processed at all
    pub fn is_error(&self) -> bool {
        matches!(self, Self::Failed)
    }

    /// Returns true if the page was fetched but had nothing to check
    pub fn is_skipped(&self) -> bool {
        matches!(self, Self::NoContainer)
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Matched => "matched",
            Self::NoMatches => "no_matches",
            Self::NoContainer => "no_container",
            Self::Failed => "failed",
        }
    }
}

impl fmt::Display for PageOutcome {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.as_str())
    }
}
