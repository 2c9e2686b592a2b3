use crate::cli::parser::Commands;
use crate::config::Config;
use crate::core::log::LogLogic;
use crate::db::pool::DbPool;
use crate::errors::AppResult;

pub fn handle(cmd: &Commands, cfg: &Config) -> AppResult<()> {
    if let Commands::Log {
        print: true,
        operation,
    } = cmd
    {
        let pool = DbPool::open_initialized(&cfg.database)?;
        LogLogic::print_log(&pool.conn, operation.as_deref())?;
    }

    Ok(())
}
