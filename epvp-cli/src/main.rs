//! epvp - command-line client for the elitepvpers forum

mod cli;
mod config;
mod error;
mod fetch;
mod output;

use clap::Parser;
use cli::{Args, Command};
use config::Config;
use epvp_api::{Content, EpvpClient, Section, ThreadPage, User};
use error::CliError;
use fetch::{Fetcher, successes};
use output::OutputFormatter;
use serde_json::json;

fn main() {
    let args = Args::parse();
    init_logging(args.verbose);

    if let Err(e) = run(args) {
        eprintln!("Error: {}", e);
        std::process::exit(1);
    }
}

fn init_logging(verbose: u8) {
    let default_filter = match verbose {
        0 => "warn",
        1 => "debug",
        _ => "trace",
    };
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or(default_filter))
        .init();
}

fn run(args: Args) -> Result<(), CliError> {
    let config = Config::from_args(&args)?;
    let client = config.client()?;
    let formatter = OutputFormatter::new(config.json, config.quiet);

    let me = if args.command.needs_login() {
        Some(config.login(&client)?)
    } else {
        None
    };

    let result = match me {
        Some(ref me) => run_member_command(args.command, &client, &config, &formatter, me),
        None => run_guest_command(args.command, &client, &config, &formatter),
    };

    if me.is_some() {
        if let Err(e) = client.logout() {
            log::warn!("logout failed: {}", e);
        }
    }
    result
}

/// Commands that work without a session
fn run_guest_command(
    command: Command,
    client: &EpvpClient,
    config: &Config,
    formatter: &OutputFormatter,
) -> Result<(), CliError> {
    match command {
        Command::Profile { ids } => {
            let fetcher = Fetcher::new(config.thread_count)?;
            let results = fetcher.fetch_all(ids, |id| client.profile(*id));
            let (profiles, failed) = successes(results, |id| format!("profile {}", id))?;

            formatter.print(profiles.as_slice(), |profiles| {
                profiles
                    .iter()
                    .map(output::format_profile)
                    .collect::<Vec<_>>()
                    .join("\n\n")
            })?;
            fail_if_partial(failed, profiles.len() + failed)
        }
        Command::Thread { id, page, pages } => {
            let (pages, failed, total) = thread_pages(client, config, id, page, pages)?;
            formatter.print(pages.as_slice(), |pages| output::format_thread_pages(pages))?;
            fail_if_partial(failed, total)
        }
        Command::Section { url_name, page } => {
            let listing = client.section_threads(&Section::new(0, url_name), page)?;
            formatter.print(&listing, output::format_section_page)
        }
        other => Err(CliError::Config(format!(
            "{:?} needs a logged-in session",
            other
        ))),
    }
}

/// Commands that run on a logged-in session
fn run_member_command(
    command: Command,
    client: &EpvpClient,
    config: &Config,
    formatter: &OutputFormatter,
    me: &User,
) -> Result<(), CliError> {
    match command {
        Command::Login => formatter.print(me, |me| format!("Logged in as {} (#{})", me.name, me.id)),
        Command::Messages { folder, page } => {
            let listing = client.messages(folder, page)?;
            formatter.print(&listing, output::format_message_folder)
        }
        Command::Message { id } => {
            let message = client.message(id)?;
            formatter.print(&message, output::format_message)
        }
        Command::SendMessage { to, title, body } => {
            client.send_message(&to, &title, &Content::from_bbcode(&body))?;
            formatter.print(&json!({ "recipients": to, "title": title }), |_| {
                format!("Message sent to {}", to.join(", "))
            })
        }
        Command::Reply { thread, body } => {
            let post_id = client.reply(thread, &Content::from_bbcode(&body))?;
            formatter.print(&json!({ "thread_id": thread, "post_id": post_id }), |_| {
                match post_id {
                    Some(post_id) => format!("Replied to thread {} (post #{})", thread, post_id),
                    None => format!("Replied to thread {}", thread),
                }
            })
        }
        Command::Shouts { channel, history } => {
            let shouts = match history {
                Some(page) => client.shout_history(channel.into(), page)?,
                None => client.shouts(channel.into())?,
            };
            formatter.print(shouts.as_slice(), |shouts| output::format_shouts(shouts))
        }
        Command::Shout { channel, body } => {
            client.shout(channel.into(), &Content::from_bbcode(&body))?;
            formatter.status("Shout posted");
            Ok(())
        }
        Command::Treasures { listing, page } => {
            let listing = client.treasures(listing.into(), page)?;
            formatter.print(&listing, output::format_treasures)
        }
        Command::Transactions { filter } => {
            let secret_word = config.secret_word()?;
            let transactions = client.transactions(filter.into(), &secret_word)?;
            formatter.print(transactions.as_slice(), |transactions| {
                output::format_transactions(transactions, me)
            })
        }
        guest => run_guest_command(guest, client, config, formatter),
    }
}

/// Fetch `count` pages of a thread starting at `first`
///
/// The first page is fetched alone to learn the page count; the rest are
/// fetched in parallel and never past the last page. Returns the pages with
/// the number of failed and attempted fetches.
fn thread_pages(
    client: &EpvpClient,
    config: &Config,
    thread_id: u64,
    first: u32,
    count: u32,
) -> Result<(Vec<ThreadPage>, usize, usize), CliError> {
    let head = client.thread_page(thread_id, first)?;
    let last = head
        .page
        .saturating_add(count.saturating_sub(1))
        .min(head.page_count.max(head.page));
    let rest: Vec<u32> = (head.page + 1..=last).collect();
    if rest.is_empty() {
        return Ok((vec![head], 0, 1));
    }

    let fetcher = Fetcher::new(config.thread_count)?;
    let results = fetcher.fetch_all(rest, |page| client.thread_page(thread_id, *page));
    let total = results.len() + 1;
    let mut pages = vec![head];
    let failed = match successes(results, |page| format!("thread {} page {}", thread_id, page)) {
        Ok((tail, failed)) => {
            pages.extend(tail);
            failed
        }
        Err(CliError::Partial { failed, .. }) => failed,
        Err(e) => return Err(e),
    };
    Ok((pages, failed, total))
}

/// Any failed fetch fails the run, after everything that worked was shown
fn fail_if_partial(failed: usize, total: usize) -> Result<(), CliError> {
    if failed > 0 {
        return Err(CliError::Partial { failed, total });
    }
    Ok(())
}
