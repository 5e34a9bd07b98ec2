//! CLI argument parsing using clap

use clap::{ArgAction, Parser, Subcommand, ValueEnum};
use epvp_api::{Channel, MessageFolder, TransactionFilter, TreasureListing};

/// elitepvpers forum client
#[derive(Parser, Debug)]
#[command(name = "epvp", about = "Read and post on the elitepvpers forum", version)]
pub struct Args {
    #[command(subcommand)]
    pub command: Command,

    /// Account name to log in with (falls back to EPVP_USERNAME)
    #[arg(short, long, global = true)]
    pub username: Option<String>,

    /// Forum base URL
    #[arg(long, global = true)]
    pub base_url: Option<String>,

    /// Request timeout in seconds
    #[arg(long, global = true, default_value_t = 30)]
    pub timeout: u64,

    /// Number of threads for parallel page fetches
    #[arg(long, global = true)]
    pub threads: Option<usize>,

    /// Print results as JSON
    #[arg(long, global = true)]
    pub json: bool,

    /// Quiet mode - only print results
    #[arg(short, long, global = true)]
    pub quiet: bool,

    /// Verbose logging (repeat for more)
    #[arg(short, long, global = true, action = ArgAction::Count)]
    pub verbose: u8,
}

#[derive(Subcommand, Debug)]
pub enum Command {
    /// Check the credentials and show the logged-in member
    Login,

    /// Show member profiles
    Profile {
        /// Member ids
        #[arg(required = true)]
        ids: Vec<u64>,
    },

    /// Show the posts of a thread
    Thread {
        id: u64,

        /// First page to show
        #[arg(long, default_value_t = 1)]
        page: u32,

        /// Number of pages to show, starting at --page
        #[arg(long, default_value_t = 1, value_parser = clap::value_parser!(u32).range(1..))]
        pages: u32,
    },

    /// List the threads of a section
    Section {
        /// Section slug as in the URL, e.g. `main`
        url_name: String,

        #[arg(long, default_value_t = 1)]
        page: u32,
    },

    /// List private messages
    Messages {
        /// received, sent or a custom folder id
        #[arg(long, default_value = "received", value_parser = parse_folder)]
        folder: MessageFolder,

        #[arg(long, default_value_t = 1)]
        page: u32,
    },

    /// Read a private message
    Message { id: u64 },

    /// Send a private message
    SendMessage {
        /// Recipient names (comma-separated)
        #[arg(long, required = true, value_delimiter = ',')]
        to: Vec<String>,

        #[arg(long)]
        title: String,

        /// Message body in BBCode
        body: String,
    },

    /// Reply to a thread
    Reply {
        thread: u64,

        /// Reply body in BBCode
        body: String,
    },

    /// Show the chatbox
    Shouts {
        #[arg(long, value_enum, default_value = "general")]
        channel: ChannelArg,

        /// Show this archive page instead of the live chat
        #[arg(long)]
        history: Option<u32>,
    },

    /// Post to the chatbox
    Shout {
        #[arg(long, value_enum, default_value = "general")]
        channel: ChannelArg,

        /// Message in BBCode
        body: String,
    },

    /// List your Black Market treasures
    Treasures {
        #[arg(long, value_enum, default_value = "listed")]
        listing: ListingArg,

        #[arg(long, default_value_t = 1)]
        page: u32,
    },

    /// List your elite*gold transactions
    Transactions {
        #[arg(long, value_enum, default_value = "all")]
        filter: FilterArg,
    },
}

impl Command {
    /// Whether the command needs a logged-in session
    pub fn needs_login(&self) -> bool {
        !matches!(
            self,
            Command::Profile { .. } | Command::Thread { .. } | Command::Section { .. }
        )
    }
}

#[derive(Debug, Clone, Copy, ValueEnum, PartialEq, Eq)]
pub enum ChannelArg {
    General,
    English,
}

impl From<ChannelArg> for Channel {
    fn from(arg: ChannelArg) -> Self {
        match arg {
            ChannelArg::General => Channel::General,
            ChannelArg::English => Channel::EnglishOnly,
        }
    }
}

#[derive(Debug, Clone, Copy, ValueEnum, PartialEq, Eq)]
pub enum ListingArg {
    Listed,
    Bought,
    Sold,
}

impl From<ListingArg> for TreasureListing {
    fn from(arg: ListingArg) -> Self {
        match arg {
            ListingArg::Listed => TreasureListing::Listed,
            ListingArg::Bought => TreasureListing::Bought,
            ListingArg::Sold => TreasureListing::Sold,
        }
    }
}

#[derive(Debug, Clone, Copy, ValueEnum, PartialEq, Eq)]
pub enum FilterArg {
    All,
    Received,
    Sent,
}

impl From<FilterArg> for TransactionFilter {
    fn from(arg: FilterArg) -> Self {
        match arg {
            FilterArg::All => TransactionFilter::All,
            FilterArg::Received => TransactionFilter::Received,
            FilterArg::Sent => TransactionFilter::Sent,
        }
    }
}

fn parse_folder(value: &str) -> Result<MessageFolder, String> {
    match value.to_ascii_lowercase().as_str() {
        "received" | "inbox" => Ok(MessageFolder::Received),
        "sent" => Ok(MessageFolder::Sent),
        other => other
            .parse()
            .map(MessageFolder::from_id)
            .map_err(|_| format!("expected received, sent or a folder id, got {:?}", value)),
    }
}
