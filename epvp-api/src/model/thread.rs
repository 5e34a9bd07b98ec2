use crate::model::{Post, Section, User};
use crate::urls;
use serde::Serialize;

/// Average of the votes a thread received
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct ThreadRating {
    pub votes: u32,
    pub average: f32,
}

/// A thread as listed in its section
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct SectionThread {
    pub id: u64,
    pub title: String,
    pub section: Option<Section>,
    pub creator: Option<User>,
    pub closed: bool,
    pub sticky: bool,
    pub replies: u64,
    pub views: u64,
    pub rating: Option<ThreadRating>,
}

impl SectionThread {
    pub fn new(id: u64, title: impl Into<String>) -> Self {
        Self {
            id,
            title: title.into(),
            section: None,
            creator: None,
            closed: false,
            sticky: false,
            replies: 0,
            views: 0,
            rating: None,
        }
    }

    /// SEO path of the first page, when the section is known
    pub fn path(&self) -> Option<String> {
        let section = self.section.as_ref()?;
        Some(urls::thread_path(&section.url_name, self.id, &self.title))
    }

    /// Number of pages at the given posts-per-page setting
    pub fn page_count(&self, posts_per_page: u64) -> u64 {
        (self.replies + 1).div_ceil(posts_per_page.max(1))
    }
}

/// One page of a thread
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ThreadPage {
    pub thread_id: u64,
    pub title: String,
    /// Slug of the section, from the breadcrumb
    pub section: Option<String>,
    pub closed: bool,
    pub page: u32,
    pub page_count: u32,
    pub posts: Vec<Post>,
}

impl ThreadPage {
    pub fn has_next(&self) -> bool {
        self.page < self.page_count
    }

    /// The opening post, present on the first page only
    pub fn initial_post(&self) -> Option<&Post> {
        if self.page <= 1 { self.posts.first() } else { None }
    }
}
