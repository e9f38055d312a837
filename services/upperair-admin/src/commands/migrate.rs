//! `migrate_upperair` - apply the exported-map schema migrations.

use std::io::Write;
use tracing::info;

use storage::migrations::{Migration, Operation, PlanStep};
use storage::{Catalog, MigrationRunner};
use upperair_common::AdminResult;

use crate::output::Output;

/// Print every migration with its choices and SQL, touching nothing.
pub fn print_plan<W: Write>(migrations: &[Migration], out: &mut Output<W>) -> AdminResult<()> {
    for migration in migrations {
        out.success(format!(
            "{} (depends on {})",
            migration.name,
            migration.dependencies.join(", ")
        ))?;

        for operation in &migration.operations {
            let Operation::AlterField {
                model,
                field,
                max_length,
                choices,
            } = operation;
            let listed = choices
                .iter()
                .map(|c| format!("{} ({})", c.code, c.label))
                .collect::<Vec<_>>()
                .join(", ");
            out.line(format!(
                "  - Alter field {} on {}: max_length={}, choices: {}",
                field, model, max_length, listed
            ))?;
        }

        for statement in migration.to_sql() {
            out.line(format!("    {};", statement))?;
        }
    }

    Ok(())
}

/// Apply pending migrations and report each one.
///
/// Fails before touching anything when the application tables are missing.
pub async fn run<W: Write>(
    catalog: &Catalog,
    migrations: &[Migration],
    fake_initial: bool,
    out: &mut Output<W>,
) -> AdminResult<usize> {
    let runner = MigrationRunner::new(catalog.pool());
    let steps = runner.run(migrations, fake_initial).await?;

    let mut applied = 0;
    for step in &steps {
        match step {
            PlanStep::Apply(migration) => {
                applied += 1;
                out.success(format!("  Applying {}... OK", migration.name))?;
            }
            PlanStep::Skip(migration) => {
                out.line(format!("  {} already applied", migration.name))?;
            }
        }
    }

    if applied == 0 {
        out.line("No migrations to apply.")?;
    }

    info!(applied, "Migrations complete");
    Ok(applied)
}
