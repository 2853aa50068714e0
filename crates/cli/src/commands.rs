//! Subcommand implementations
//!
//! Each command resolves its settings, loads the records and runs the
//! generator. Output goes to the given writer so commands can be tested
//! without a terminal.

use anyhow::{Context, Result, anyhow, bail};
use autotable_codegen::{GenerationOutput, Generator, GeneratorConfig, SqlBundle};
use chrono::{DateTime, Utc};
use colored::Colorize;
use std::io::Write;
use std::path::Path;

use crate::args::{Cli, Command, CommonArgs};
use crate::config::{CliConfig, Overrides, Settings};
use crate::input::load_records;

/// Run a parsed command line from the current directory
pub fn run(cli: Cli) -> Result<()> {
    let cwd = std::env::current_dir().context("cannot determine the working directory")?;
    let stdout = std::io::stdout();
    let mut out = stdout.lock();
    run_in(cli, &cwd, &mut out)
}

/// Run a parsed command line relative to `cwd`
pub fn run_in(cli: Cli, cwd: &Path, out: &mut impl Write) -> Result<()> {
    let config = CliConfig::discover(cli.common.config.as_deref(), cwd)
        .context("failed to load configuration")?;

    match cli.command {
        Command::Generate {
            output,
            force,
            start_time,
        } => {
            let settings = resolve_settings(&config, &cli.common, output, force, cwd);
            let mut generator_config = settings.generator_config();
            if let Some(seconds) = start_time {
                generator_config = generator_config.with_start_time(start_from(seconds)?);
            }
            generate(&settings, generator_config, out)
        }
        Command::Plan { json } => {
            let settings = resolve_settings(&config, &cli.common, None, false, cwd);
            plan(&settings, json, out)
        }
        Command::Show { table } => {
            let settings = resolve_settings(&config, &cli.common, None, false, cwd);
            show(&settings, &table, out)
        }
    }
}

fn resolve_settings(
    config: &CliConfig,
    common: &CommonArgs,
    output: Option<std::path::PathBuf>,
    force: bool,
    cwd: &Path,
) -> Settings {
    let overrides = Overrides {
        source: common.source.clone(),
        output,
        tag_key: common.tag_key.clone(),
        no_auto_id: common.no_auto_id,
        force,
    };
    Settings::resolve(config, &overrides, cwd)
}

fn start_from(seconds: i64) -> Result<DateTime<Utc>> {
    DateTime::from_timestamp(seconds, 0)
        .ok_or_else(|| anyhow!("start time {} is out of range", seconds))
}

fn build(settings: &Settings, config: GeneratorConfig) -> Result<GenerationOutput> {
    let records = load_records(&settings.source)
        .with_context(|| format!("failed to load records from {}", settings.source.display()))?;
    if records.is_empty() {
        tracing::warn!(source = %settings.source.display(), "No records found");
    }
    Generator::new(config)
        .generate(records)
        .context("failed to generate the schema")
}

// ============================================================================
// generate
// ============================================================================

fn generate(settings: &Settings, config: GeneratorConfig, out: &mut impl Write) -> Result<()> {
    let overwrite = config.overwrite;
    let output = build(settings, config)?;

    let written = output
        .migrations
        .write_to_disk(&settings.output, overwrite)
        .with_context(|| format!("failed to write migrations to {}", settings.output.display()))?;
    tracing::info!(files = written, output_dir = %settings.output.display(), "Migrations written");

    write_warnings(&output, out)?;
    for file in output.migrations.files() {
        writeln!(out, "  {} {}", "created".green(), settings.output.join(&file.path).display())?;
    }
    write!(out, "{}", output.summary())?;
    Ok(())
}

// ============================================================================
// plan
// ============================================================================

fn plan(settings: &Settings, json: bool, out: &mut impl Write) -> Result<()> {
    let output = build(settings, settings.generator_config())?;
    if json {
        writeln!(out, "{}", format_plan_json(&output)?)?;
    } else {
        write_warnings(&output, out)?;
        write!(out, "{}", format_plan(&output))?;
    }
    Ok(())
}

/// Emission order with the filenames of each entity
pub fn format_plan(output: &GenerationOutput) -> String {
    if output.migrations.is_empty() {
        return "No entities to migrate.\n".to_string();
    }

    let width = output
        .migrations
        .iter()
        .map(|m| m.entity.len())
        .max()
        .unwrap_or(0);

    let mut text = String::new();
    for (i, migration) in output.migrations.iter().enumerate() {
        text.push_str(&format!(
            "{:>3}. {:<width$}  {}\n     {:<width$}  {}\n",
            i + 1,
            migration.entity,
            migration.up.path.display(),
            "",
            migration.down.path.display(),
            width = width,
        ));
    }
    text
}

/// Plan as a JSON document
pub fn format_plan_json(output: &GenerationOutput) -> Result<String> {
    let migrations: Vec<serde_json::Value> = output
        .migrations
        .iter()
        .map(|m| {
            serde_json::json!({
                "entity": m.entity,
                "timestamp": m.timestamp,
                "up": m.up.path,
                "down": m.down.path,
            })
        })
        .collect();
    let warnings: Vec<String> = output.warnings.iter().map(|w| w.to_string()).collect();

    let doc = serde_json::json!({
        "migrations": migrations,
        "warnings": warnings,
    });
    Ok(serde_json::to_string_pretty(&doc)?)
}

// ============================================================================
// show
// ============================================================================

fn show(settings: &Settings, table: &str, out: &mut impl Write) -> Result<()> {
    let output = build(settings, settings.generator_config())?;
    let Some(bundle) = output.bundles.get(table) else {
        let known: Vec<&str> = output.bundles.keys().map(String::as_str).collect();
        bail!("unknown table '{}' (known: {})", table, known.join(", "));
    };
    write!(out, "{}", format_bundle(bundle))?;
    Ok(())
}

/// Every statement of a bundle under a `-- section` header
pub fn format_bundle(bundle: &SqlBundle) -> String {
    let sections: [(&str, &[String]); 8] = [
        ("create table", &bundle.table.create),
        ("indexes", &bundle.indexes),
        ("drop table", &bundle.table.drop),
        ("find all", &bundle.record.find_all),
        ("find", &bundle.record.find),
        ("insert", &bundle.record.insert),
        ("update", &bundle.record.update),
        ("delete", &bundle.record.delete),
    ];

    let mut text = String::new();
    for (title, statements) in sections {
        if statements.is_empty() {
            continue;
        }
        text.push_str(&format!("-- {}\n", title));
        for statement in statements {
            text.push_str(statement);
            text.push('\n');
        }
        text.push('\n');
    }
    text
}

fn write_warnings(output: &GenerationOutput, out: &mut impl Write) -> Result<()> {
    for warning in &output.warnings {
        writeln!(out, "{} {}", "warning:".yellow().bold(), warning)?;
    }
    Ok(())
}
