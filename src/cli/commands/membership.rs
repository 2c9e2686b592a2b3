use crate::cli::parser::{Commands, MembershipAction};
use crate::config::Config;
use crate::core::membership::MembershipLogic;
use crate::db::pool::DbPool;
use crate::db::queries::{benefit_types, memberships};
use crate::errors::AppResult;
use crate::models::membership::{AllotmentPeriod, MembershipStatus};
use crate::ui::messages::{header, info, success};
use crate::utils::colors::{GREY, RESET};
use crate::utils::date::{parse_required_date, today};
use crate::utils::table::{Column, Table};

pub fn handle(cmd: &Commands, cfg: &Config) -> AppResult<()> {
    let Commands::Membership { action } = cmd else {
        return Ok(());
    };
    let pool = DbPool::open_initialized(&cfg.database)?;

    match action {
        MembershipAction::Add {
            member,
            plan,
            start,
            end,
            status,
        } => {
            let start = match start {
                Some(s) => parse_required_date(s)?,
                None => today(),
            };
            let end = end.as_deref().map(parse_required_date).transpose()?;
            let status = MembershipStatus::parse(status)?;

            let m = MembershipLogic::add(&pool.conn, member, plan, start, end, status)?;
            success(format!(
                "Membership #{} created for {} ({}, {})",
                m.id, m.member_id, m.plan, m.status
            ));
        }

        MembershipAction::Status { id, status } => {
            let m = MembershipLogic::set_status(&pool.conn, *id, MembershipStatus::parse(status)?)?;
            success(format!("Membership #{} of {} is now {}", m.id, m.member_id, m.status));
        }

        MembershipAction::Allot {
            membership,
            benefit,
            allowance,
            period,
        } => {
            let period = AllotmentPeriod::parse(period.as_deref().unwrap_or(&cfg.default_period))?;
            MembershipLogic::allot(&pool.conn, *membership, benefit, *allowance, period)?;
            success(format!(
                "Membership #{}: {} x {} per {}",
                membership, allowance, benefit, period
            ));
        }

        MembershipAction::List { member } => {
            let all = memberships::list_for_member(&pool.conn, member)?;
            if all.is_empty() {
                info(format!("No memberships for {}", member));
                return Ok(());
            }

            header(format!("Memberships of {}", member));
            let mut table = Table::new(vec![
                Column::new("ID", 5),
                Column::new("Plan", 16),
                Column::new("Status", 9),
                Column::new("Start", 10),
                Column::new("End", 10),
                Column::new("Allotments", 30),
            ]);
            for m in all {
                let mut grants = Vec::new();
                for a in memberships::list_allotments(&pool.conn, m.id)? {
                    let code = benefit_types::find_by_id(&pool.conn, a.benefit_type_id)?
                        .map(|bt| bt.code)
                        .unwrap_or_else(|| format!("#{}", a.benefit_type_id));
                    grants.push(format!("{} {}/{}", code, a.allowance, a.period));
                }

                table.add_row(vec![
                    m.id.to_string(),
                    m.plan.clone(),
                    m.status.to_string(),
                    m.start_date.to_string(),
                    m.end_date
                        .map(|d| d.to_string())
                        .unwrap_or_else(|| "-".to_string()),
                    if grants.is_empty() {
                        format!("{GREY}none{RESET}")
                    } else {
                        grants.join(", ")
                    },
                ]);
            }
            print!("{}", table.render());
        }
    }

    Ok(())
}
