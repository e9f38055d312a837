//! Tests for the migration plan printout.

use storage::migrations;
use upperair_admin::commands::migrate;
use upperair_admin::Output;

#[test]
fn test_plan_lists_migration_and_choices() {
    let mut out = Output::buffer();

    migrate::print_plan(&migrations::all(), &mut out).unwrap();

    let text = out.text();
    assert!(text.contains("0009_add_upperairmap_level (depends on 0008_add_pdf_support)"));
    assert!(text.contains("Alter field map_type on exportedmap: max_length=50"));
    assert!(text.contains("JPEG (JPEG)"));
    assert!(text.contains("Alter field level on exportedmap: max_length=20"));
    assert!(text.contains("UPPERAIRMAP (Upper Air Map)"));
}

#[test]
fn test_plan_prints_sql_statements() {
    let mut out = Output::buffer();

    migrate::print_plan(&migrations::all(), &mut out).unwrap();

    let text = out.text();
    assert!(text.contains(
        "    ALTER TABLE analysis_exportedmap ALTER COLUMN map_type TYPE VARCHAR(50);"
    ));
    assert!(text.contains(
        "    ALTER TABLE analysis_exportedmap ALTER COLUMN level TYPE VARCHAR(20);"
    ));
    let statements = text.lines().filter(|l| l.starts_with("    ALTER TABLE")).count();
    assert_eq!(statements, 2);
    assert!(!text.contains("CHECK"));
}

#[test]
fn test_empty_plan_prints_nothing() {
    let mut out = Output::buffer();

    migrate::print_plan(&[], &mut out).unwrap();

    assert!(out.text().is_empty());
}
