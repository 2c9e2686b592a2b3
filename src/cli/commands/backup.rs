use crate::cli::parser::Commands;
use crate::config::Config;
use crate::core::backup::BackupLogic;
use crate::errors::AppResult;
use crate::ui::messages::success;
use crate::utils::path::expand_tilde;

pub fn handle(cmd: &Commands, cfg: &Config) -> AppResult<()> {
    if let Commands::Backup {
        file,
        compress,
        force,
    } = cmd
    {
        let dest = expand_tilde(file);
        let written =
            BackupLogic::backup(&cfg.database, &dest.to_string_lossy(), *compress, *force)?;
        success(format!("Backup written to {}", written.display()));
    }

    Ok(())
}
