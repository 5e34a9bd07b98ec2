use crate::model::SectionThread;
use crate::urls;
use serde::Serialize;

/// A forum section (sub-board)
///
/// Listings are addressed by the SEO slug, new threads by the numeric id.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize)]
pub struct Section {
    pub id: u64,
    pub url_name: String,
}

impl Section {
    pub fn new(id: u64, url_name: impl Into<String>) -> Self {
        Self {
            id,
            url_name: url_name.into(),
        }
    }

    /// Site-relative path of a listing page
    pub fn listing_path(&self, page: u32) -> String {
        urls::section_path(&self.url_name, page)
    }
}

/// One page of a section's thread listing
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct SectionPage {
    pub section: Section,
    pub page: u32,
    pub page_count: u32,
    pub threads: Vec<SectionThread>,
}

impl SectionPage {
    pub fn has_next(&self) -> bool {
        self.page < self.page_count
    }
}
