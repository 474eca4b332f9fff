//! `tenderwatch favourite`, `seen`, `tag` and `delete`.

use anyhow::{bail, Context, Result};
use clap::Args;

use tenderwatch_core::TenderId;
use tenderwatch_sync::{FollowerSession, HttpBackend};

use super::{block_on, resolve_config};
use crate::{ConnectionArgs, SwitchArg};

/// Arguments for the favourite and seen toggles.
#[derive(Args, Debug)]
pub struct FlagArgs {
    pub tender: TenderId,

    /// on | off
    pub state: SwitchArg,
}

/// Arguments for `tenderwatch tag`.
#[derive(Args, Debug)]
pub struct TagArgs {
    pub tender: TenderId,

    /// Tag name; surrounding whitespace is dropped.
    pub name: String,
}

/// Arguments for `tenderwatch delete`.
#[derive(Args, Debug)]
pub struct DeleteArgs {
    pub tender: TenderId,

    /// Confirm the deletion.
    #[arg(long)]
    pub yes: bool,
}

impl FlagArgs {
    pub fn run_favourite(self, connection: &ConnectionArgs) -> Result<()> {
        let session = session(connection)?;
        block_on(session.set_favourite(self.tender, self.state.0))?
            .with_context(|| format!("failed to update favourite for tender {}", self.tender))?;
        println!("✓ tender {} — favourite {}", self.tender, self.state);
        Ok(())
    }

    pub fn run_seen(self, connection: &ConnectionArgs) -> Result<()> {
        let session = session(connection)?;
        block_on(session.set_seen(self.tender, self.state.0))?
            .with_context(|| format!("failed to update seen flag for tender {}", self.tender))?;
        println!("✓ tender {} — seen {}", self.tender, self.state);
        Ok(())
    }
}

impl TagArgs {
    pub fn run(self, connection: &ConnectionArgs) -> Result<()> {
        let session = session(connection)?;
        let tag = block_on(session.add_tag(self.tender, &self.name))?
            .with_context(|| format!("failed to tag tender {}", self.tender))?;
        println!("✓ tender {} — tagged '{tag}'", self.tender);
        Ok(())
    }
}

impl DeleteArgs {
    pub fn run(self, connection: &ConnectionArgs) -> Result<()> {
        if !self.yes {
            bail!(
                "refusing to delete tender {} without --yes",
                self.tender
            );
        }
        let mut session = session(connection)?;
        let redirect = block_on(session.delete_tender(self.tender))?
            .with_context(|| format!("failed to delete tender {}", self.tender))?;
        println!("✓ tender {} deleted (server redirect: {redirect})", self.tender);
        Ok(())
    }
}

fn session(connection: &ConnectionArgs) -> Result<FollowerSession<HttpBackend>> {
    let config = resolve_config(connection)?;
    let user_id = config.user_id;
    Ok(FollowerSession::new(HttpBackend::new(config), user_id))
}
