use anyhow::{Context, Result};
use std::fs;

use super::Session;
use crate::config::{CONFIG_FILE_NAME, CONFIG_TEMPLATE};

/// Writes a commented `.wtt.toml` into the active repository. An existing
/// file is only replaced with `force`.
///
/// # Errors
/// Returns an error if there is no active repository or the file cannot be
/// written.
pub fn scaffold_config(session: &Session, force: bool) -> Result<()> {
    let repo_root = session.resolve_repo_root()?;
    let dest = repo_root.join(CONFIG_FILE_NAME);

    if dest.exists() && !force {
        session.console.say(format_args!(
            "`{CONFIG_FILE_NAME}` already exists. Use `wtt init -f` to overwrite."
        ));
        return Ok(());
    }

    fs::write(&dest, CONFIG_TEMPLATE)
        .with_context(|| format!("writing {}", dest.display()))?;
    session
        .console
        .say(format_args!("Created {}", dest.display()));
    Ok(())
}
