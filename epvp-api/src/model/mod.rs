//! Domain objects scraped from the forum

mod message;
mod post;
mod section;
mod shout;
mod thread;
mod transaction;
mod treasure;
mod user;

pub use message::{MessageFolder, MessageFolderPage, PrivateMessage};
pub use post::Post;
pub use section::{Section, SectionPage};
pub use shout::{Channel, Shout};
pub use thread::{SectionThread, ThreadPage, ThreadRating};
pub use transaction::{Transaction, TransactionFilter};
pub use treasure::{Treasure, TreasureListing, TreasurePage};
pub use user::{AboutMe, Profile, ProfileStatistics, Rank, TbmRating, User};
