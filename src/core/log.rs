use crate::db::log::{LogRow, load_log};
use crate::errors::AppResult;
use ansi_term::Colour;
use regex::Regex;
use rusqlite::Connection;
use std::sync::LazyLock;

static ANSI: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"\x1B\[[0-9;]*[mK]").expect("valid ANSI regex"));

fn visible_width(s: &str) -> usize {
    ANSI.replace_all(s, "").chars().count()
}

/// Colour of an audit operation in `log --print`.
fn color_for_operation(op: &str) -> Colour {
    match op {
        "book" => Colour::Green,
        "force_add" => Colour::Purple,
        "cancel" | "no_show" => Colour::Red,
        "attend" | "usage" => Colour::Cyan,
        "generate" | "settings" => Colour::Yellow,
        "backup" | "export" => Colour::Blue,
        "init" => Colour::RGB(255, 153, 51),
        "migration_applied" => Colour::Purple,
        _ => Colour::White,
    }
}

pub struct LogLogic;

impl LogLogic {
    pub fn render(rows: &[LogRow]) -> String {
        let cells: Vec<(String, String, String, String)> = rows
            .iter()
            .map(|r| {
                let date = chrono::DateTime::parse_from_rfc3339(&r.date)
                    .map(|dt| dt.format("%F %T").to_string())
                    .unwrap_or_else(|_| r.date.clone());
                let op = if r.target.is_empty() {
                    r.operation.clone()
                } else {
                    format!("{} ({})", r.operation, r.target)
                };
                let op = color_for_operation(&r.operation).paint(op).to_string();
                (r.id.to_string(), date, op, r.message.clone())
            })
            .collect();

        let w_id = cells.iter().map(|c| c.0.len()).max().unwrap_or(0).max(2);
        let w_date = cells.iter().map(|c| c.1.len()).max().unwrap_or(0).max(4);
        let w_op = cells
            .iter()
            .map(|c| visible_width(&c.2))
            .max()
            .unwrap_or(0)
            .max(9);

        let mut out = format!(
            "{:>w_id$}  {:<w_date$}  {:<w_op$}  Message\n",
            "ID", "Date", "Operation"
        );
        for (id, date, op, msg) in &cells {
            let pad = w_op.saturating_sub(visible_width(op));
            out.push_str(&format!(
                "{:>w_id$}  {:<w_date$}  {}{}  {}\n",
                id,
                date,
                op,
                " ".repeat(pad),
                msg
            ));
        }
        out
    }

    pub fn print_log(conn: &Connection, operation: Option<&str>) -> AppResult<()> {
        let rows = load_log(conn, operation)?;
        if rows.is_empty() {
            println!("No log entries.");
            return Ok(());
        }
        print!("{}", Self::render(&rows));
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn padding_ignores_colour_codes() {
        let rows = vec![
            LogRow {
                id: 1,
                date: "2025-09-01T10:00:00+02:00".into(),
                operation: "book".into(),
                target: "booking #1".into(),
                message: "m-1 booked".into(),
            },
            LogRow {
                id: 2,
                date: "not-a-date".into(),
                operation: "force_add".into(),
                target: String::new(),
                message: "walk-in".into(),
            },
        ];

        let out = LogLogic::render(&rows);
        let plain: Vec<String> = out.lines().map(|l| ANSI.replace_all(l, "").to_string()).collect();
        assert!(plain[1].contains("2025-09-01 10:00:00"));
        assert!(plain[2].contains("not-a-date"));

        let msg_col = |l: &str| l.find("m-1").or_else(|| l.find("walk-in"));
        assert_eq!(msg_col(&plain[1]), msg_col(&plain[2]));
    }
}
