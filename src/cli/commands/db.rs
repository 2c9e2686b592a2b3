use crate::cli::parser::Commands;
use crate::config::Config;
use crate::db::migrate::run_pending_migrations;
use crate::db::pool::DbPool;
use crate::db::stats;
use crate::errors::AppResult;
use crate::utils::colors::{CYAN, GREEN, RED, RESET};

fn step(title: &str) {
    println!("{}▶ {}…{}", CYAN, title, RESET);
}

fn done(msg: &str) {
    println!("{}✔ {}{}\n", GREEN, msg, RESET);
}

/// Database maintenance. Flags run in a fixed order: migrate, check,
/// vacuum, info.
pub fn handle(cmd: &Commands, cfg: &Config) -> AppResult<()> {
    let Commands::Db {
        migrate,
        check,
        vacuum,
        info,
    } = cmd
    else {
        return Ok(());
    };

    let pool = DbPool::new(&cfg.database)?;

    if *migrate {
        step("Running migrations");
        let applied = run_pending_migrations(&pool.conn)?;
        done(&format!("{} migration(s) applied.", applied));
    }

    if *check {
        step("Running integrity check");
        match stats::integrity_problems(&pool)? {
            None => done("Integrity check passed."),
            Some(problems) => {
                println!("{}✘ Integrity check failed:{} {}\n", RED, RESET, problems);
                tracing::warn!(%problems, "integrity check failed");
            }
        }
    }

    if *vacuum {
        step("Running VACUUM");
        pool.conn.execute_batch("VACUUM;")?;
        done("Vacuum completed.");
    }

    if *info {
        stats::print_db_info(&pool, &cfg.database)?;
    }

    Ok(())
}
