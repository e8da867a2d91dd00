use std::path::Path;

use anyhow::Result;
use colored::*;
use comfy_table::presets::UTF8_FULL;
use comfy_table::{Attribute, Cell, CellAlignment, Color, ContentArrangement, Table};

use crate::models::Dependency;

/// Longest hint shown in the table; the JSON report carries the full hint.
const HINT_DISPLAY_LEN: usize = 60;

#[derive(Debug, Default, PartialEq)]
pub struct Summary {
    /// No license file found.
    pub not_licensed: usize,
    /// License file found but not matched (or failed to classify).
    pub unknown: usize,
    pub total: usize,
}

pub fn summarize(deps: &[Dependency]) -> Summary {
    let mut summary = Summary {
        total: deps.len(),
        ..Summary::default()
    };
    for dep in deps {
        let c = &dep.classification;
        if c.error.is_none() && !c.found {
            summary.not_licensed += 1;
        } else if !c.matched {
            summary.unknown += 1;
        }
    }
    summary
}

/// Render the summary table followed by the per-dependency table.
pub fn render(deps: &[Dependency], path: &Path, quiet: bool) -> Result<()> {
    let summary = summarize(deps);

    if quiet {
        println!(
            "Total: {}  Not licensed: {}  Unknown: {}",
            summary.total,
            summary.not_licensed.to_string().red(),
            summary.unknown.to_string().yellow(),
        );
        return Ok(());
    }

    println!(
        "\n {} v{}",
        "license-matchr".bold(),
        env!("CARGO_PKG_VERSION")
    );
    println!(" Scanning: {}\n", path.display());

    let mut table = Table::new();
    table
        .load_preset(UTF8_FULL)
        .set_header(vec![
            Cell::new("NOT LICENSED").add_attribute(Attribute::Bold),
            Cell::new("UNKNOWN").add_attribute(Attribute::Bold),
            Cell::new("TOTAL").add_attribute(Attribute::Bold),
        ])
        .add_row(vec![
            Cell::new(summary.not_licensed).set_alignment(CellAlignment::Right),
            Cell::new(summary.unknown).set_alignment(CellAlignment::Right),
            Cell::new(summary.total).set_alignment(CellAlignment::Right),
        ]);
    println!("{}\n", table);

    if !deps.is_empty() {
        render_dependencies(deps);
        println!();
    }

    Ok(())
}

fn render_dependencies(deps: &[Dependency]) {
    let mut table = Table::new();
    table
        .load_preset(UTF8_FULL)
        .set_content_arrangement(ContentArrangement::Dynamic)
        .set_header(vec![
            Cell::new("PACKAGE").add_attribute(Attribute::Bold),
            Cell::new("VERSION").add_attribute(Attribute::Bold),
            Cell::new("LICENSE").add_attribute(Attribute::Bold),
        ]);

    for dep in deps {
        let (license, color) = license_cell(dep);
        table.add_row(vec![
            Cell::new(&dep.path),
            Cell::new(&dep.version),
            Cell::new(license).fg(color),
        ]);
    }

    println!("{}", table);
}

fn license_cell(dep: &Dependency) -> (String, Color) {
    let c = &dep.classification;
    if let Some(err) = &c.error {
        return (format!("error: {}", err), Color::Red);
    }
    if !c.found {
        return ("n/a".to_string(), Color::DarkGrey);
    }
    if c.matched {
        return (c.id.clone(), Color::Green);
    }
    (format!("? {}", collapse_hint(&c.hint)), Color::Yellow)
}

/// Single-line preview of a fallback hint.
fn collapse_hint(hint: &str) -> String {
    let flat = hint.split_whitespace().collect::<Vec<_>>().join(" ");
    if flat.chars().count() <= HINT_DISPLAY_LEN {
        return flat;
    }
    let cut: String = flat.chars().take(HINT_DISPLAY_LEN).collect();
    format!("{}…", cut)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::{Classification, Ecosystem};

    fn dep(classification: Classification) -> Dependency {
        let mut d = Dependency::new("example.com/x", "v1.0.0", Ecosystem::Go, "/x");
        d.classification = classification;
        d
    }

    #[test]
    fn test_summary_counts() {
        let deps = vec![
            dep(Classification::matched("MIT")),
            dep(Classification::default()),
            dep(Classification::default()),
            dep(Classification::unmatched("custom terms")),
            dep(Classification::failed(true, "boom")),
        ];
        assert_eq!(
            summarize(&deps),
            Summary {
                not_licensed: 2,
                unknown: 2,
                total: 5
            }
        );
    }

    #[test]
    fn test_license_cell_labels() {
        assert_eq!(license_cell(&dep(Classification::matched("ISC"))).0, "ISC");
        assert_eq!(license_cell(&dep(Classification::default())).0, "n/a");
        assert_eq!(
            license_cell(&dep(Classification::unmatched("Some\n  custom\tterms"))).0,
            "? Some custom terms"
        );
        assert!(license_cell(&dep(Classification::failed(false, "denied")))
            .0
            .starts_with("error:"));
    }

    #[test]
    fn test_long_hint_is_shortened() {
        let preview = collapse_hint(&"word ".repeat(40));
        assert_eq!(preview.chars().count(), HINT_DISPLAY_LEN + 1);
        assert!(preview.ends_with('…'));
    }
}
