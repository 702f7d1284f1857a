use std::collections::HashSet;

/// Tracks which pages a sampling run has tried and which of them matched
///
/// The two sets are kept separately: a page is tried before its images are
/// checked and only joins the matched set once its whole batch is done.
#[derive(Debug, Clone)]
pub struct SampleProgress {
    tried: HashSet<String>,
    matched: HashSet<String>,
    max_pages: usize,
    target_matched_pages: usize,
}

impl SampleProgress {
    pub fn new(max_pages: usize, target_matched_pages: usize) -> Self {
        Self {
            tried: HashSet::new(),
            matched: HashSet::new(),
            max_pages,
            target_matched_pages,
        }
    }

    /// Records that `page` is about to be visited
    ///
    /// Returns false if it had already been tried.
    pub fn mark_tried(&mut self, page: &str) -> bool {
        self.tried.insert(page.to_string())
    }

    /// Records that `page` produced at least one match
    pub fn mark_matched(&mut self, page: &str) {
        self.matched.insert(page.to_string());
    }

    pub fn was_tried(&self, page: &str) -> bool {
        self.tried.contains(page)
    }

    pub fn tried_count(&self) -> usize {
        self.tried.len()
    }

    pub fn matched_count(&self) -> usize {
        self.matched.len()
    }

    /// True once enough pages matched or the page limit is used up
    pub fn is_done(&self) -> bool {
        self.matched.len() >= self.target_matched_pages || self.tried.len() >= self.max_pages
    }
}
