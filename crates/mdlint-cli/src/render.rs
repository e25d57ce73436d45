//! Console and Markdown rendering of a validation report

use colored::Colorize;
use mdlint_core::{ValidationReport, ValidationResult};
use std::path::Path;

/// Path shown to the user: relative to the working directory when possible
pub fn display_path(path: &Path) -> String {
    std::env::current_dir()
        .ok()
        .and_then(|cwd| path.strip_prefix(cwd).ok().map(Path::to_path_buf))
        .unwrap_or_else(|| path.to_path_buf())
        .display()
        .to_string()
}

fn result_heading(result: &ValidationResult) -> String {
    format!(
        "{} (schema: {})",
        display_path(&result.file_path),
        result.schema_name.as_deref().unwrap_or("-")
    )
}

/// Print the summary, per-schema table and error/warning listings
pub fn print_report_summary(report: &ValidationReport, quiet: bool) {
    let summary = &report.summary;

    println!();
    println!("{}", "Validation Summary:".bold());
    println!("- Total files: {}", summary.total);
    println!("- Valid files: {}", summary.valid.to_string().green());
    if summary.invalid > 0 {
        println!("- Invalid files: {}", summary.invalid.to_string().red());
    } else {
        println!("- Invalid files: {}", summary.invalid);
    }

    if quiet {
        return;
    }

    println!();
    println!("{}", "Results by Schema:".bold());
    println!();

    let width = report
        .schemas
        .iter()
        .map(|s| s.label().len())
        .chain(std::iter::once("Schema".len()))
        .max()
        .unwrap_or(0);

    let header = format!(
        "{:<width$}  {:>5}  {:>5}  {:>7}",
        "Schema",
        "Total",
        "Valid",
        "Invalid",
        width = width
    );
    println!("  {}", header.bold());
    println!("  {}", "-".repeat(width + 23));
    for stats in &report.schemas {
        let invalid = if stats.invalid > 0 {
            format!("{:>7}", stats.invalid).red()
        } else {
            format!("{:>7}", stats.invalid).normal()
        };
        println!(
            "  {:<width$}  {:>5}  {}  {}",
            stats.label(),
            stats.total,
            format!("{:>5}", stats.valid).green(),
            invalid,
            width = width
        );
    }

    if report.has_errors() {
        println!();
        println!("{}", "Errors:".red().bold());
        for result in report.invalid_results() {
            println!("{}:", result_heading(result).bold());
            for error in &result.errors {
                println!("  - {}", error);
            }
        }
    }

    if report.summary.with_warnings > 0 {
        println!();
        println!("{}", "Warnings:".yellow().bold());
        for result in report.results_with_warnings() {
            println!("{}:", result_heading(result).bold());
            for warning in &result.warnings {
                println!("  - {}", warning);
            }
        }
    }
}

/// Render the report as Markdown
pub fn generate_markdown_report(report: &ValidationReport) -> String {
    let mut md = String::new();

    md.push_str("# Frontmatter Validation Report\n\n");
    md.push_str(&format!("**Version:** {}\n\n", report.version));
    if let Some(timestamp) = &report.generated_at {
        md.push_str(&format!("**Timestamp:** {}\n\n", timestamp));
    }

    md.push_str("## Summary\n\n");
    md.push_str(&format!("- Total files: {}\n", report.summary.total));
    md.push_str(&format!("- Valid files: {}\n", report.summary.valid));
    md.push_str(&format!("- Invalid files: {}\n", report.summary.invalid));
    md.push('\n');

    md.push_str("## Results by Schema\n\n");
    md.push_str("| Schema | Total | Valid | Invalid |\n");
    md.push_str("|---|---:|---:|---:|\n");
    for stats in &report.schemas {
        md.push_str(&format!(
            "| {} | {} | {} | {} |\n",
            stats.label(),
            stats.total,
            stats.valid,
            stats.invalid
        ));
    }
    md.push('\n');

    if report.has_errors() {
        md.push_str("## Errors\n\n");
        for result in report.invalid_results() {
            md.push_str(&format!("### `{}`\n\n", result_heading(result)));
            for error in &result.errors {
                md.push_str(&format!("- {}\n", error));
            }
            md.push('\n');
        }
    }

    if report.summary.with_warnings > 0 {
        md.push_str("## Warnings\n\n");
        for result in report.results_with_warnings() {
            md.push_str(&format!("### `{}`\n\n", result_heading(result)));
            for warning in &result.warnings {
                md.push_str(&format!("- {}\n", warning));
            }
            md.push('\n');
        }
    }

    if !report.has_errors() && report.summary.with_warnings == 0 {
        md.push_str("✅ **All files are valid!**\n");
    }

    md
}
