//! `tenderwatch followers list` and `tenderwatch followers edit`.

use std::collections::BTreeSet;

use anyhow::{bail, Context, Result};
use clap::{Args, Subcommand};
use colored::Colorize;
use tabled::{settings::Style, Table, Tabled};

use tenderwatch_core::{TenderId, UserId, UserRecord};
use tenderwatch_sync::{FollowerSession, HttpBackend};

use super::{block_on, resolve_config};
use crate::ConnectionArgs;

#[derive(Subcommand, Debug)]
pub enum FollowersCommand {
    /// Show every user and whether they follow the tender.
    List(ListArgs),

    /// Add and remove followers in one batched save.
    Edit(EditArgs),
}

#[derive(Args, Debug)]
pub struct ListArgs {
    pub tender: TenderId,

    /// Emit machine-readable JSON.
    #[arg(long)]
    pub json: bool,
}

#[derive(Args, Debug)]
pub struct EditArgs {
    pub tender: TenderId,

    /// User ids to add as followers (repeat or comma-separate).
    #[arg(long, value_delimiter = ',')]
    pub add: Vec<UserId>,

    /// User ids to remove from the followers (repeat or comma-separate).
    #[arg(long, value_delimiter = ',')]
    pub remove: Vec<UserId>,

    /// Print the payload that would be sent without saving.
    #[arg(long)]
    pub dry_run: bool,
}

#[derive(Tabled)]
struct UserTableRow {
    #[tabled(rename = "id")]
    id: UserId,
    #[tabled(rename = "user")]
    username: String,
    #[tabled(rename = "email")]
    email: String,
    #[tabled(rename = "following")]
    following: &'static str,
}

pub fn run(command: FollowersCommand, connection: &ConnectionArgs) -> Result<()> {
    match command {
        FollowersCommand::List(args) => list(args, connection),
        FollowersCommand::Edit(args) => edit(args, connection),
    }
}

fn list(args: ListArgs, connection: &ConnectionArgs) -> Result<()> {
    let config = resolve_config(connection)?;
    let user_id = config.user_id;
    let mut session = FollowerSession::new(HttpBackend::new(config), user_id);

    let users = block_on(session.open(args.tender))?
        .with_context(|| format!("failed to load followers of tender {}", args.tender))?;

    if args.json {
        println!(
            "{}",
            serde_json::to_string_pretty(&users).context("failed to serialize users")?
        );
        return Ok(());
    }

    print_table(args.tender, &users);
    Ok(())
}

fn edit(args: EditArgs, connection: &ConnectionArgs) -> Result<()> {
    let adds: BTreeSet<UserId> = args.add.iter().copied().collect();
    let removes: BTreeSet<UserId> = args.remove.iter().copied().collect();
    if let Some(both) = adds.intersection(&removes).next() {
        bail!("user {both} is in both --add and --remove");
    }
    if adds.is_empty() && removes.is_empty() {
        bail!("nothing to do; pass --add and/or --remove");
    }

    let config = resolve_config(connection)?;
    let user_id = config.user_id;
    let tender = args.tender;
    let mut session = FollowerSession::new(HttpBackend::new(config), user_id);

    block_on(async {
        let users = session
            .open(tender)
            .await
            .with_context(|| format!("failed to load followers of tender {tender}"))?;
        let listed: BTreeSet<UserId> = users.iter().map(|u| u.id).collect();
        for user in adds.iter().chain(removes.iter()) {
            if !listed.contains(user) {
                eprintln!("{} user {user} is not in the server's user list", "warning:".yellow());
            }
        }

        for user in &adds {
            session.toggle(tender, *user, true);
        }
        for user in &removes {
            session.toggle(tender, *user, false);
        }

        if !session.has_pending_changes(tender) {
            println!("✓ tender {tender} — followers already up to date");
            return Ok(());
        }

        let payload = session
            .store()
            .serialize(tender)
            .context("failed to encode follower payload")?;
        if args.dry_run {
            println!("[dry-run] would send: {payload}");
            return Ok(());
        }

        let outcome = session
            .save(tender)
            .await
            .with_context(|| format!("failed to save followers of tender {tender}"))?;
        let me = if outcome.followed_by_me {
            ", including you"
        } else {
            ""
        };
        println!(
            "✓ tender {tender} — {} follower(s){me}",
            outcome.total_followers
        );
        Ok::<_, anyhow::Error>(())
    })?
}

fn print_table(tender: TenderId, users: &[UserRecord]) {
    let followers = users.iter().filter(|u| u.is_follower).count();
    println!(
        "{} | {} users | {} followers",
        format!("Tender {tender}").bold(),
        users.len(),
        followers
    );
    if users.is_empty() {
        println!("No users returned by the server.");
        return;
    }

    let rows: Vec<UserTableRow> = users
        .iter()
        .map(|user| UserTableRow {
            id: user.id,
            username: user.username.clone(),
            email: user.display_email().to_string(),
            following: if user.is_follower { "✓" } else { "" },
        })
        .collect();
    let mut table = Table::new(rows);
    table.with(Style::rounded());
    println!("{table}");
}
