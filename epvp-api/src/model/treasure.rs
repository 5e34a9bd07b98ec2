use crate::model::User;
use chrono::NaiveDateTime;
use serde::Serialize;

/// Which of the account's treasures to list
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum TreasureListing {
    /// Up for sale
    #[default]
    Listed,
    Bought,
    Sold,
}

impl TreasureListing {
    pub(crate) fn path_segment(self) -> &'static str {
        match self {
            TreasureListing::Listed => "listed",
            TreasureListing::Bought => "bought",
            TreasureListing::Sold => "sold",
        }
    }
}

/// A piece of hidden content sold for elite*gold on The Black Market
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Treasure {
    pub id: u64,
    pub title: String,
    /// The hidden content; only visible to the seller and the buyer
    pub content: Option<String>,
    /// Price in elite*gold
    pub cost: u64,
    pub seller: Option<User>,
    pub buyer: Option<User>,
    pub listed_at: Option<NaiveDateTime>,
}

impl Treasure {
    pub fn is_sold(&self) -> bool {
        self.buyer.is_some()
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct TreasurePage {
    pub listing: TreasureListing,
    pub page: u32,
    pub page_count: u32,
    pub treasures: Vec<Treasure>,
}
