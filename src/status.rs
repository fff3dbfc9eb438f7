// Status display: where data comes from and whether the model is ready.

use std::path::Path;

use colored::Colorize;

use crate::config::Config;
use crate::sources::client::is_remote;
use crate::suggest::download;

/// Display configuration and model status to the terminal.
pub fn show(config: &Config) {
    println!("{}", "=== keystone status ===".bold());

    println!("\nDefaults:");
    println!("  Country:   {}", config.country);
    println!("  Industry:  {}", config.industry);
    println!("  Beta:      {}", config.beta_kind);
    println!("  Top-K:     {}", config.top_k);

    println!("\nSources:");
    source_line(
        "Risk-free",
        &format!("{} ({})", config.risk_free_url, config.risk_free_series),
        &config.risk_free_url,
    );
    source_line(
        "Betas",
        &format!("{} [{}]", config.betas_url, config.betas_sheet),
        &config.betas_url,
    );
    source_line(
        "ERP",
        &format!("{} [{}]", config.erp_url, config.erp_sheet),
        &config.erp_url,
    );

    let embed_dir = config.embedding_model_dir();
    println!("\nEmbedding model: {}", embed_dir.display());
    if download::embedding_files_present(&config.model_dir) {
        let size = dir_size(&embed_dir);
        println!("  {} ({})", "present".green(), format_bytes(size));
    } else {
        println!("  {}", "not downloaded".yellow());
        println!("  Run `keystone download-model` to enable industry suggestions");
    }
}

fn source_line(label: &str, detail: &str, location: &str) {
    let marker = if is_remote(location) {
        "remote".dimmed()
    } else if Path::new(location).exists() {
        "local".green()
    } else {
        "local, missing".red()
    };
    println!("  {label:<10} {detail} ({marker})");
}

fn dir_size(dir: &Path) -> u64 {
    std::fs::read_dir(dir)
        .map(|entries| {
            entries
                .filter_map(|e| e.ok())
                .filter_map(|e| e.metadata().ok())
                .filter(|m| m.is_file())
                .map(|m| m.len())
                .sum()
        })
        .unwrap_or(0)
}

fn format_bytes(bytes: u64) -> String {
    if bytes < 1024 {
        format!("{} B", bytes)
    } else if bytes < 1024 * 1024 {
        format!("{:.1} KB", bytes as f64 / 1024.0)
    } else {
        format!("{:.1} MB", bytes as f64 / (1024.0 * 1024.0))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_format_bytes() {
        assert_eq!(format_bytes(512), "512 B");
        assert_eq!(format_bytes(2048), "2.0 KB");
        assert_eq!(format_bytes(90 * 1024 * 1024), "90.0 MB");
    }
}
