//! Output formatting utilities

use advisor_lib::Classification;
use clap::ValueEnum;
use colored::Colorize;
use serde::{Deserialize, Serialize};
use tabled::{settings::Style, Table, Tabled};

/// Output format for CLI commands
#[derive(Debug, Clone, Copy, Default, ValueEnum, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum OutputFormat {
    /// Table format (default)
    #[default]
    Table,
    /// JSON format
    Json,
}

/// Print a table of rows
pub fn print_table<T: Tabled>(items: &[T]) {
    if items.is_empty() {
        println!("{}", "No items found".yellow());
        return;
    }
    let table = Table::new(items).with(Style::rounded()).to_string();
    println!("{}", table);
}

/// Print any serializable value as pretty JSON
pub fn print_json<T: Serialize + ?Sized>(value: &T) -> anyhow::Result<()> {
    println!("{}", serde_json::to_string_pretty(value)?);
    Ok(())
}

/// Print a success message
pub fn print_success(message: &str) {
    println!("{} {}", "✓".green().bold(), message);
}

/// Print a warning message
pub fn print_warning(message: &str) {
    println!("{} {}", "⚠".yellow().bold(), message);
}

/// Print an info message
pub fn print_info(message: &str) {
    println!("{} {}", "ℹ".blue().bold(), message);
}

/// Format a 0-1 score as a percentage
pub fn format_confidence(confidence: f64) -> String {
    format!("{:.0}%", confidence * 100.0)
}

/// Format an optional percentage, `-` when absent
pub fn format_percent(value: Option<f64>) -> String {
    match value {
        Some(v) => format!("{:.0}%", v),
        None => "-".to_string(),
    }
}

/// Color a classification by how much change it implies
pub fn color_classification(classification: Classification) -> String {
    let label = classification.as_str();
    match classification {
        Classification::FunctionCandidate => label.green().to_string(),
        Classification::ContainerCandidate => label.cyan().to_string(),
        Classification::SpotCandidate => label.yellow().to_string(),
        Classification::KeepAsIs => label.normal().to_string(),
    }
}

/// Color confidence based on value
pub fn color_confidence(confidence: f64) -> String {
    let formatted = format_confidence(confidence);
    if confidence >= 0.8 {
        formatted.green().to_string()
    } else if confidence >= 0.6 {
        formatted.yellow().to_string()
    } else {
        formatted.red().to_string()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_format_confidence() {
        assert_eq!(format_confidence(0.85), "85%");
        assert_eq!(format_confidence(1.0), "100%");
    }

    #[test]
    fn test_format_percent() {
        assert_eq!(format_percent(Some(76.0)), "76%");
        assert_eq!(format_percent(None), "-");
    }

    #[test]
    fn test_color_helpers_keep_text() {
        colored::control::set_override(false);
        assert_eq!(color_confidence(0.5), "50%");
        assert_eq!(
            color_classification(Classification::SpotCandidate),
            "spot_candidate"
        );
    }
}
