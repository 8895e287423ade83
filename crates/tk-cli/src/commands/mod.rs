pub mod archive;
pub mod campaign;
pub mod character;
pub mod encounter;
pub mod image;
pub mod notes;
pub mod reference;
pub mod roll;

use std::io::{self, BufRead, Write};
use std::path::Path;

use comfy_table::{ContentArrangement, Table};
use tk_store::Store;

use crate::config::AppConfig;

/// Open the configured database, creating it on first use.
pub async fn open_store(config: &AppConfig, db: Option<&Path>) -> Result<Store, String> {
    let path = config.database_path(db);
    Store::open(&path)
        .await
        .map_err(|e| format!("cannot open database {}: {e}", path.display()))
}

/// A table with a header row that wraps to the terminal width.
fn table(header: &[&str]) -> Table {
    let mut table = Table::new();
    table.set_content_arrangement(ContentArrangement::Dynamic);
    table.set_header(header.to_vec());
    table
}

/// Shorten text for a table cell; empty text becomes "-".
fn cell(text: &str, max: usize) -> String {
    let text = text.trim();
    if text.is_empty() {
        return "-".to_string();
    }
    let first_line = text.lines().next().unwrap_or_default();
    if first_line.chars().count() > max {
        let cut: String = first_line.chars().take(max.saturating_sub(3)).collect();
        format!("{cut}...")
    } else {
        first_line.to_string()
    }
}

/// Print `count` with a singular or plural noun.
fn footer(count: usize, noun: &str) {
    println!();
    println!("  {count} {noun}{}", if count == 1 { "" } else { "s" });
}

/// Ask a yes/no question on stdin. Anything but y/yes is no.
fn confirm(question: &str) -> Result<bool, String> {
    print!("{question} [y/N] ");
    io::stdout().flush().map_err(|e| e.to_string())?;
    let mut answer = String::new();
    io::stdin()
        .lock()
        .read_line(&mut answer)
        .map_err(|e| e.to_string())?;
    Ok(matches!(answer.trim().to_lowercase().as_str(), "y" | "yes"))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn cell_truncates_and_fills() {
        assert_eq!(cell("", 10), "-");
        assert_eq!(cell("short", 10), "short");
        assert_eq!(cell("a much longer description", 10), "a much ...");
        assert_eq!(cell("first line\nsecond", 20), "first line");
    }
}
