use std::path::{Path, PathBuf};

use colored::Colorize;
use tk_store::Store;

pub async fn export(store: &Store, output: Option<&Path>) -> Result<(), String> {
    let archive = store.export_archive().await.map_err(|e| e.to_string())?;
    let path = output
        .map(Path::to_path_buf)
        .unwrap_or_else(|| PathBuf::from(archive.file_name()));
    std::fs::write(&path, &archive.bytes)
        .map_err(|e| format!("cannot write {}: {e}", path.display()))?;
    println!(
        "  {} {} tables to {}",
        "Exported".green().bold(),
        archive.manifest.tables.len(),
        path.display()
    );
    Ok(())
}

pub async fn restore(store: &Store, file: &Path) -> Result<(), String> {
    let bytes =
        std::fs::read(file).map_err(|e| format!("cannot read {}: {e}", file.display()))?;
    let report = store
        .restore_archive(&bytes)
        .await
        .map_err(|e| e.to_string())?;

    let mut table = super::table(&["Table", "Restored", "Skipped"]);
    for t in &report.tables {
        table.add_row(vec![
            t.table.to_string(),
            t.upserted.to_string(),
            t.skipped.to_string(),
        ]);
    }
    println!("{table}");
    println!();
    println!(
        "  {} {} rows, skipped {}",
        "Restored".green().bold(),
        report.total_upserted(),
        report.total_skipped()
    );
    Ok(())
}
