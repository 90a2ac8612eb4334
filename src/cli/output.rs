// Output formatting utilities

use crate::models::{Board, Department, Stage, User};
use chrono::Local;
use std::io::IsTerminal;

const ANSI_BOLD: &str = "\x1b[1m";
const ANSI_DIM: &str = "\x1b[2m";
const ANSI_RESET: &str = "\x1b[0m";

/// Check if stdout is a terminal (TTY)
pub fn is_tty() -> bool {
    std::io::stdout().is_terminal()
}

/// Apply bold formatting if in TTY mode
fn bold_if_tty(text: &str, is_tty: bool) -> String {
    if is_tty {
        format!("{}{}{}", ANSI_BOLD, text, ANSI_RESET)
    } else {
        text.to_string()
    }
}

fn dim_if_tty(text: &str, is_tty: bool) -> String {
    if is_tty {
        format!("{}{}{}", ANSI_DIM, text, ANSI_RESET)
    } else {
        text.to_string()
    }
}

/// Format timestamp for display
pub fn format_timestamp(ts: i64) -> String {
    use chrono::TimeZone;
    match Local.timestamp_opt(ts, 0).single() {
        Some(dt) => dt.format("%Y-%m-%d %H:%M:%S").to_string(),
        None => ts.to_string(),
    }
}

fn status_label(active: bool) -> &'static str {
    if active { "[active]" } else { "[inactive]" }
}

pub fn format_board_table(boards: &[Board], is_tty: bool) -> String {
    if boards.is_empty() {
        return "No boards found.\n".to_string();
    }
    let mut out = String::new();
    let header = format!("{:<6} {:<40} {:<10} {:<19}", "ID", "Name", "Status", "Created");
    out.push_str(&bold_if_tty(&header, is_tty));
    out.push('\n');
    out.push_str(&"-".repeat(78));
    out.push('\n');
    for board in boards {
        out.push_str(&format!(
            "{:<6} {:<40} {:<10} {:<19}\n",
            board.id,
            board.name,
            status_label(board.is_active),
            format_timestamp(board.created_ts)
        ));
    }
    out
}

/// Stage table in position order; inactive rows are dimmed on a TTY
pub fn format_stage_table(stages: &[Stage], is_tty: bool) -> String {
    if stages.is_empty() {
        return "No stages found.\n".to_string();
    }
    let mut out = String::new();
    let header = format!("{:<5} {:<6} {:<40} {:<10}", "Pos", "ID", "Name", "Status");
    out.push_str(&bold_if_tty(&header, is_tty));
    out.push('\n');
    out.push_str(&"-".repeat(64));
    out.push('\n');
    for stage in stages {
        let line = format!(
            "{:<5} {:<6} {:<40} {:<10}",
            stage.position,
            stage.id,
            stage.name,
            status_label(stage.is_active)
        );
        if stage.is_active {
            out.push_str(&line);
        } else {
            out.push_str(&dim_if_tty(&line, is_tty));
        }
        out.push('\n');
    }
    out
}

pub fn format_department_table(departments: &[Department], is_tty: bool) -> String {
    if departments.is_empty() {
        return "No departments found.\n".to_string();
    }
    let mut out = String::new();
    let header = format!("{:<6} {:<40} {:<20} {:<10}", "ID", "Name", "Icon", "Status");
    out.push_str(&bold_if_tty(&header, is_tty));
    out.push('\n');
    out.push_str(&"-".repeat(79));
    out.push('\n');
    for dept in departments {
        out.push_str(&format!(
            "{:<6} {:<40} {:<20} {:<10}\n",
            dept.id,
            dept.name,
            dept.icon.as_deref().unwrap_or("-"),
            status_label(dept.is_active)
        ));
    }
    out
}

pub fn format_user_table(users: &[User], is_tty: bool) -> String {
    if users.is_empty() {
        return "No users found.\n".to_string();
    }
    let mut out = String::new();
    let header = format!(
        "{:<6} {:<30} {:<32} {:<16} {:<6}",
        "ID", "Name", "Email", "Mobile", "Level"
    );
    out.push_str(&bold_if_tty(&header, is_tty));
    out.push('\n');
    out.push_str(&"-".repeat(94));
    out.push('\n');
    for user in users {
        out.push_str(&format!(
            "{:<6} {:<30} {:<32} {:<16} {:<6}\n",
            user.id,
            user.name,
            user.email,
            user.mobile,
            user.level.as_str()
        ));
    }
    out
}

/// Pretty JSON for any serialisable value
pub fn to_json<T: serde::Serialize + ?Sized>(value: &T) -> anyhow::Result<String> {
    Ok(serde_json::to_string_pretty(value)?)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn stage(id: i64, name: &str, position: i64, active: bool) -> Stage {
        Stage {
            id,
            name: name.to_string(),
            position,
            board_id: 1,
            is_active: active,
            created_ts: 0,
            modified_ts: 0,
        }
    }

    #[test]
    fn test_stage_table_plain() {
        let table = format_stage_table(&[stage(1, "Lead", 1, true), stage(2, "Lost", 2, false)], false);
        let lines: Vec<&str> = table.lines().collect();
        assert!(lines[0].starts_with("Pos"));
        assert!(lines[2].contains("Lead") && lines[2].contains("[active]"));
        assert!(lines[3].contains("Lost") && lines[3].contains("[inactive]"));
        assert!(!table.contains('\x1b'));
    }

    #[test]
    fn test_stage_table_tty_dims_inactive() {
        let table = format_stage_table(&[stage(2, "Lost", 2, false)], true);
        assert!(table.contains(ANSI_DIM));
        assert!(table.contains(ANSI_BOLD));
    }

    #[test]
    fn test_empty_tables() {
        assert_eq!(format_board_table(&[], false), "No boards found.\n");
        assert_eq!(format_stage_table(&[], false), "No stages found.\n");
        assert_eq!(format_user_table(&[], false), "No users found.\n");
    }

    #[test]
    fn test_to_json_stage() {
        let json = to_json(&stage(3, "Won", 1, true)).unwrap();
        let value: serde_json::Value = serde_json::from_str(&json).unwrap();
        assert_eq!(value["name"], "Won");
        assert_eq!(value["position"], 1);
        assert_eq!(value["is_active"], true);
    }
}
