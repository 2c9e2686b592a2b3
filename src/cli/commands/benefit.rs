use crate::cli::parser::{BenefitAction, Commands};
use crate::config::Config;
use crate::core::catalog::CatalogLogic;
use crate::db::pool::DbPool;
use crate::db::queries::benefit_types;
use crate::errors::AppResult;
use crate::ui::messages::{info, success};
use crate::utils::table::{Column, Table};

pub fn handle(cmd: &Commands, cfg: &Config) -> AppResult<()> {
    if let Commands::Benefit { action } = cmd {
        let pool = DbPool::open_initialized(&cfg.database)?;

        match action {
            BenefitAction::Add { code, name, icon } => {
                let bt = CatalogLogic::add_benefit_type(&pool.conn, code, name, icon)?;
                success(format!("Benefit '{}' added as '{}' (#{})", bt.name, bt.code, bt.id));
            }
            BenefitAction::List => {
                let all = benefit_types::list_benefit_types(&pool.conn)?;
                if all.is_empty() {
                    info("No benefit types defined yet.");
                    return Ok(());
                }

                let mut table = Table::new(vec![
                    Column::new("ID", 4),
                    Column::new("Code", 14),
                    Column::new("Name", 20),
                    Column::new("Icon", 4),
                    Column::new("Active", 6),
                ]);
                for bt in all {
                    table.add_row(vec![
                        bt.id.to_string(),
                        bt.code,
                        bt.name,
                        bt.icon,
                        if bt.is_active { "yes" } else { "no" }.to_string(),
                    ]);
                }
                print!("{}", table.render());
            }
        }
    }

    Ok(())
}
