//! Declarative schema migrations for the web application's tables.
//!
//! Each migration lists the migrations it depends on and a set of field
//! operations. Applied migrations are recorded in `admin_migrations`.
//! Migrations older than the ledger are treated as a baseline that can be
//! recorded without running (`fake_initial`).

use chrono::Utc;
use sqlx::PgPool;
use std::collections::HashSet;
use tracing::{info, instrument, warn};

use upperair_common::{AdminError, AdminResult, MapLevel, MapType};

/// App label prefixed to every table name.
pub const APP_LABEL: &str = "analysis";

/// Last migration applied by the web application before the ledger existed.
pub const BASELINE: &str = "0008_add_pdf_support";

/// A (code, label) pair of a choice field.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Choice {
    pub code: &'static str,
    pub label: &'static str,
}

/// A single schema change.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Operation {
    /// Change a character field's length and its allowed choices.
    AlterField {
        model: &'static str,
        field: &'static str,
        max_length: u32,
        choices: Vec<Choice>,
    },
}

impl Operation {
    /// SQL statements that perform this operation.
    ///
    /// Choices are validated by the web application, not the database, so
    /// only the column width reaches the schema.
    pub fn to_sql(&self) -> Vec<String> {
        match self {
            Operation::AlterField {
                model,
                field,
                max_length,
                ..
            } => vec![format!(
                "ALTER TABLE {} ALTER COLUMN {} TYPE VARCHAR({})",
                table_name(model),
                field,
                max_length
            )],
        }
    }

    /// Table this operation changes.
    pub fn table(&self) -> String {
        match self {
            Operation::AlterField { model, .. } => table_name(model),
        }
    }
}

/// Database table backing a model of the web application.
pub fn table_name(model: &str) -> String {
    format!("{}_{}", APP_LABEL, model)
}

/// A named, ordered schema change.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Migration {
    pub name: &'static str,
    pub dependencies: Vec<&'static str>,
    pub operations: Vec<Operation>,
}

impl Migration {
    pub fn to_sql(&self) -> Vec<String> {
        self.operations.iter().flat_map(|op| op.to_sql()).collect()
    }

    /// Tables the operations touch, in first-use order.
    pub fn tables(&self) -> Vec<String> {
        let mut tables: Vec<String> = Vec::new();
        for table in self.operations.iter().map(Operation::table) {
            if !tables.contains(&table) {
                tables.push(table);
            }
        }
        tables
    }
}

/// Adds JPEG exports and the composite upper-air map level.
pub fn add_upperairmap_level() -> Migration {
    Migration {
        name: "0009_add_upperairmap_level",
        dependencies: vec![BASELINE],
        operations: vec![
            Operation::AlterField {
                model: "exportedmap",
                field: "map_type",
                max_length: 50,
                choices: MapType::ALL
                    .iter()
                    .map(|t| Choice {
                        code: t.code(),
                        label: t.code(),
                    })
                    .collect(),
            },
            Operation::AlterField {
                model: "exportedmap",
                field: "level",
                max_length: 20,
                choices: MapLevel::ALL
                    .iter()
                    .map(|l| Choice {
                        code: l.code(),
                        label: l.label(),
                    })
                    .collect(),
            },
        ],
    }
}

/// All known migrations, in application order.
pub fn all() -> Vec<Migration> {
    vec![add_upperairmap_level()]
}

/// What the runner will do with one migration.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PlanStep<'m> {
    Skip(&'m Migration),
    Apply(&'m Migration),
}

/// Decide which migrations to apply given the names already in the ledger.
///
/// Fails if a pending migration depends on something neither applied nor
/// earlier in the plan.
pub fn plan<'m>(
    migrations: &'m [Migration],
    applied: &HashSet<String>,
    fake_initial: bool,
) -> AdminResult<Vec<PlanStep<'m>>> {
    let mut satisfied: HashSet<&str> = applied.iter().map(String::as_str).collect();
    if fake_initial {
        satisfied.insert(BASELINE);
    }

    let mut steps = Vec::with_capacity(migrations.len());
    for migration in migrations {
        if applied.contains(migration.name) {
            steps.push(PlanStep::Skip(migration));
            satisfied.insert(migration.name);
            continue;
        }

        if let Some(missing) = migration
            .dependencies
            .iter()
            .find(|dep| !satisfied.contains(**dep))
        {
            let hint = if *missing == BASELINE {
                " (rerun with --fake-initial if the schema predates the migration ledger)"
            } else {
                ""
            };
            return Err(AdminError::MigrationError(format!(
                "{} depends on {} which has not been applied{}",
                migration.name, missing, hint
            )));
        }

        steps.push(PlanStep::Apply(migration));
        satisfied.insert(migration.name);
    }

    Ok(steps)
}

/// Applies migrations against a database and keeps the ledger.
pub struct MigrationRunner<'a> {
    pool: &'a PgPool,
}

impl<'a> MigrationRunner<'a> {
    pub fn new(pool: &'a PgPool) -> Self {
        Self { pool }
    }

    /// Create the ledger table if needed.
    pub async fn ensure_ledger(&self) -> AdminResult<()> {
        sqlx::query(
            "CREATE TABLE IF NOT EXISTS admin_migrations (\
                name VARCHAR(200) PRIMARY KEY, \
                applied_at TIMESTAMPTZ NOT NULL DEFAULT NOW())",
        )
        .execute(self.pool)
        .await
        .map_err(|e| AdminError::DatabaseError(format!("Ledger setup failed: {}", e)))?;

        Ok(())
    }

    /// Fail unless every table the migrations alter already exists.
    ///
    /// The schema belongs to the web application; nothing is created here.
    pub async fn require_tables(&self, migrations: &[Migration]) -> AdminResult<()> {
        let mut missing = Vec::new();
        for table in migrations.iter().flat_map(Migration::tables) {
            let exists = sqlx::query_scalar::<_, bool>(
                "SELECT EXISTS (SELECT 1 FROM information_schema.tables \
                 WHERE table_schema = current_schema() AND table_name = $1)",
            )
            .bind(&table)
            .fetch_one(self.pool)
            .await
            .map_err(|e| AdminError::DatabaseError(format!("Query failed: {}", e)))?;

            if !exists && !missing.contains(&table) {
                missing.push(table);
            }
        }

        if missing.is_empty() {
            return Ok(());
        }

        Err(AdminError::MigrationError(format!(
            "Table(s) {} not found; is DATABASE_URL pointing at the web application's database?",
            missing.join(", ")
        )))
    }

    /// Names recorded in the ledger.
    pub async fn applied(&self) -> AdminResult<HashSet<String>> {
        let names = sqlx::query_scalar::<_, String>("SELECT name FROM admin_migrations")
            .fetch_all(self.pool)
            .await
            .map_err(|e| AdminError::DatabaseError(format!("Query failed: {}", e)))?;

        Ok(names.into_iter().collect())
    }

    /// Apply every pending migration, each in its own transaction.
    ///
    /// Returns the plan that was executed.
    #[instrument(skip(self, migrations))]
    pub async fn run<'m>(
        &self,
        migrations: &'m [Migration],
        fake_initial: bool,
    ) -> AdminResult<Vec<PlanStep<'m>>> {
        self.require_tables(migrations).await?;
        self.ensure_ledger().await?;
        let applied = self.applied().await?;
        let steps = plan(migrations, &applied, fake_initial)?;

        if fake_initial && !applied.contains(BASELINE) {
            warn!(baseline = BASELINE, "Recording baseline migration without running it");
            self.record(BASELINE).await?;
        }

        for step in &steps {
            if let PlanStep::Apply(migration) = step {
                self.apply(migration).await?;
            }
        }

        Ok(steps)
    }

    async fn apply(&self, migration: &Migration) -> AdminResult<()> {
        let mut tx = self
            .pool
            .begin()
            .await
            .map_err(|e| AdminError::DatabaseError(format!("Transaction failed: {}", e)))?;

        for statement in migration.to_sql() {
            sqlx::query(&statement)
                .execute(&mut *tx)
                .await
                .map_err(|e| {
                    AdminError::MigrationError(format!("{} failed: {}", migration.name, e))
                })?;
        }

        sqlx::query("INSERT INTO admin_migrations (name, applied_at) VALUES ($1, $2)")
            .bind(migration.name)
            .bind(Utc::now())
            .execute(&mut *tx)
            .await
            .map_err(|e| AdminError::DatabaseError(format!("Ledger insert failed: {}", e)))?;

        tx.commit()
            .await
            .map_err(|e| AdminError::DatabaseError(format!("Commit failed: {}", e)))?;

        info!(migration = migration.name, "Applied migration");
        Ok(())
    }

    async fn record(&self, name: &str) -> AdminResult<()> {
        sqlx::query(
            "INSERT INTO admin_migrations (name, applied_at) VALUES ($1, $2) \
             ON CONFLICT (name) DO NOTHING",
        )
        .bind(name)
        .bind(Utc::now())
        .execute(self.pool)
        .await
        .map_err(|e| AdminError::DatabaseError(format!("Ledger insert failed: {}", e)))?;

        Ok(())
    }
}
