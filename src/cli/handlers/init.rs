use std::path::Path;

use crate::cli::commands::InitArgs;
use crate::io::config_io::{write_default_config, CONFIG_FILE};
use crate::io::store::{write_state, PersistedState};
use crate::model::config::AppConfig;

use super::AppError;

/// Create workplan.toml and a fresh state file.
pub fn cmd_init(root: &Path, args: InitArgs) -> Result<(), AppError> {
    let written = write_default_config(root, args.force)?;
    if !written {
        println!("{} already exists (use --force to overwrite)", CONFIG_FILE);
        return Ok(());
    }

    let config = AppConfig::default();
    write_state(root, &PersistedState::fresh(&config))?;
    println!("initialized workplan project in {}", root.display());
    Ok(())
}
