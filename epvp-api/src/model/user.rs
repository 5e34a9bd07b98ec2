use crate::urls;
use chrono::{NaiveDate, NaiveDateTime};
use serde::Serialize;
use std::fmt;

/// A forum member as referenced from posts, listings and messages
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize)]
pub struct User {
    pub id: u64,
    pub name: String,
}

impl User {
    pub fn new(id: u64, name: impl Into<String>) -> Self {
        Self {
            id,
            name: name.into(),
        }
    }

    /// SEO slug of the user name as used in profile links
    pub fn url_name(&self) -> String {
        urls::url_name(&self.name)
    }

    /// Site-relative path of the profile page
    pub fn profile_path(&self) -> String {
        urls::profile_path(self.id, &self.name)
    }
}

impl fmt::Display for User {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.name)
    }
}

/// Badge shown on a profile
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum Rank {
    Premium,
    Level2,
    Level3,
    GoldMember,
    Moderator,
    GlobalModerator,
    Administrator,
    Guardian,
    Translator,
    Editor,
    EventPlanner,
    Broadcaster,
    Coder,
    Other(String),
}

impl Rank {
    /// Map a badge `title` attribute to a rank; matching ignores case
    pub fn from_title(title: &str) -> Self {
        match title.trim().to_ascii_lowercase().as_str() {
            "premium" | "premium user" => Rank::Premium,
            "level 2" | "level2" => Rank::Level2,
            "level 3" | "level3" => Rank::Level3,
            "gold member" => Rank::GoldMember,
            "moderator" => Rank::Moderator,
            "global moderator" => Rank::GlobalModerator,
            "administrator" => Rank::Administrator,
            "guardian" => Rank::Guardian,
            "translator" => Rank::Translator,
            "editor" => Rank::Editor,
            "event planner" => Rank::EventPlanner,
            "broadcaster" => Rank::Broadcaster,
            "coder" => Rank::Coder,
            _ => Rank::Other(title.trim().to_string()),
        }
    }

    pub fn title(&self) -> &str {
        match self {
            Rank::Premium => "Premium",
            Rank::Level2 => "Level 2",
            Rank::Level3 => "Level 3",
            Rank::GoldMember => "Gold Member",
            Rank::Moderator => "Moderator",
            Rank::GlobalModerator => "Global Moderator",
            Rank::Administrator => "Administrator",
            Rank::Guardian => "Guardian",
            Rank::Translator => "Translator",
            Rank::Editor => "Editor",
            Rank::EventPlanner => "Event Planner",
            Rank::Broadcaster => "Broadcaster",
            Rank::Coder => "Coder",
            Rank::Other(title) => title,
        }
    }

    /// Ranks that can moderate content
    pub fn is_staff(&self) -> bool {
        matches!(
            self,
            Rank::Moderator | Rank::GlobalModerator | Rank::Administrator | Rank::Guardian
        )
    }
}

/// Figures from the statistics tab of a profile
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct ProfileStatistics {
    pub posts: Option<u64>,
    pub posts_per_day: Option<f64>,
    pub thanks_given: Option<u64>,
    pub thanks_received: Option<u64>,
    pub recommendations: Option<u64>,
    /// elite*gold balance; shown only to the owner and staff
    pub elite_gold: Option<i64>,
    pub join_date: Option<NaiveDate>,
    pub last_activity: Option<NaiveDateTime>,
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct AboutMe {
    pub biography: Option<String>,
    pub location: Option<String>,
    pub interests: Option<String>,
    pub occupation: Option<String>,
}

/// The Black Market trade ratings
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize)]
pub struct TbmRating {
    pub positive: u32,
    pub neutral: u32,
    pub negative: u32,
}

impl TbmRating {
    pub fn total(&self) -> u64 {
        u64::from(self.positive) + u64::from(self.neutral) + u64::from(self.negative)
    }

    /// Positive ratings minus negative ones
    pub fn score(&self) -> i64 {
        i64::from(self.positive) - i64::from(self.negative)
    }
}

/// Everything a profile page shows about a member
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Profile {
    pub user: User,
    pub title: Option<String>,
    pub namecolor: Option<String>,
    pub avatar_url: Option<String>,
    pub online: bool,
    pub ranks: Vec<Rank>,
    pub statistics: ProfileStatistics,
    pub about: AboutMe,
    pub tbm: TbmRating,
    pub friends: Vec<User>,
}

impl Profile {
    pub fn is_staff(&self) -> bool {
        self.ranks.iter().any(Rank::is_staff)
    }
}
