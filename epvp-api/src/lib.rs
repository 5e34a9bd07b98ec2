//! elitepvpers forum client library
//!
//! This library scrapes the elitepvpers.com vBulletin forum and submits its
//! forms, exposing members, threads, posts, private messages, chatbox shouts,
//! treasures and elite*gold transactions as typed values.
//!
//! # Features
//!
//! - Session handling with a shared cookie jar and the vBulletin security token
//! - Page parsers for profiles, section listings, threads, messages and the chatbox
//! - A post body model that reads rendered HTML and reads/writes BBCode
//! - Secure TLS using rustls (no OpenSSL dependencies)
//! - Blocking synchronous API; clients are cheap to clone and `Send + Sync`
//! - Well-typed errors using thiserror
//!
//! # Example
//!
//! ```no_run
//! use epvp_api::{Content, EpvpClient};
//!
//! # fn main() -> Result<(), Box<dyn std::error::Error>> {
//! let client = EpvpClient::new()?;
//! let me = client.login("username", "password")?;
//! println!("Logged in as {} (#{})", me.name, me.id);
//!
//! let profile = client.profile(me.id)?;
//! println!("{} posts", profile.statistics.posts.unwrap_or_default());
//!
//! let page = client.thread_page(3311, 1)?;
//! for post in &page.posts {
//!     println!("{}", post.content.plain_text());
//! }
//!
//! client.reply(3311, &Content::from_bbcode("[B]Nice[/B] thread!"))?;
//! client.logout()?;
//! # Ok(())
//! # }
//! ```

/// Static CSS selector, compiled on first use
macro_rules! selector {
    ($css:literal) => {{
        static SELECTOR: std::sync::LazyLock<scraper::Selector> =
            std::sync::LazyLock::new(|| scraper::Selector::parse($css).unwrap());
        &*SELECTOR
    }};
}

/// Static regex, compiled on first use
macro_rules! regex {
    ($re:literal) => {{
        static REGEX: std::sync::LazyLock<regex::Regex> =
            std::sync::LazyLock::new(|| regex::Regex::new($re).unwrap());
        &*REGEX
    }};
}

mod client;
mod content;
mod error;
mod model;
mod parser;
pub mod urls;

pub use client::{EpvpClient, EpvpClientBuilder};
pub use content::{Content, Element};
pub use error::{EpvpError, Result};
pub use model::{
    AboutMe, Channel, MessageFolder, MessageFolderPage, Post, PrivateMessage, Profile,
    ProfileStatistics, Rank, Section, SectionPage, SectionThread, Shout, TbmRating, ThreadPage,
    ThreadRating, Transaction, TransactionFilter, Treasure, TreasureListing, TreasurePage, User,
};
