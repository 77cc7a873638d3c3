// src/utils/log.rs

//! Console output helpers for the CLI.
//!
//! Diagnostics go through the `log` facade; these helpers print the
//! user-facing result of a command to stdout in a fixed layout.

use crate::controllers::FormStatus;

const WIDTH: usize = 60;

/// Framed title line.
pub fn format_header(title: &str) -> String {
    let border = "═".repeat(WIDTH);
    format!("{border}\n  {title}\n{border}")
}

pub fn header(title: &str) {
    println!("{}", format_header(title));
}

pub fn separator() {
    println!("{}", "─".repeat(WIDTH));
}

/// Log a sub-item (indented)
pub fn sub_item(message: &str) {
    println!("    {}", message);
}

pub fn success(message: &str) {
    println!("✓ {}", message);
}

pub fn failure(message: &str) {
    eprintln!("✗ {}", message);
}

/// Key/value block under a `[SUMMARY]` title.
pub fn format_summary(title: &str, items: &[(&str, String)]) -> String {
    let mut out = format!("[SUMMARY] {}", title);
    for (key, value) in items {
        out.push_str(&format!("\n    {}: {}", key, value));
    }
    out
}

pub fn summary(title: &str, items: &[(&str, String)]) {
    println!();
    println!("{}", format_summary(title, items));
}

/// Print the message lines of a finished form.
pub fn form_status(status: &FormStatus) {
    match status {
        FormStatus::Success(message) => success(message),
        FormStatus::Error(message) => {
            for line in message.lines() {
                failure(line);
            }
        }
        _ => {}
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_format_summary() {
        let out = format_summary("Students", &[("Total", "12".into()), ("Pages", "2".into())]);
        assert_eq!(out, "[SUMMARY] Students\n    Total: 12\n    Pages: 2");
    }

    #[test]
    fn test_format_header() {
        let out = format_header("Student List");
        let lines: Vec<&str> = out.lines().collect();
        assert_eq!(lines.len(), 3);
        assert_eq!(lines[1], "  Student List");
        assert_eq!(lines[0].chars().count(), WIDTH);
    }
}
