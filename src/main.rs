//! Flowlint CLI - Workflow Analyzer
//!
//! Inspects exported project snapshots against the built-in policy rules.

use anyhow::{bail, Context};
use clap::{Parser, Subcommand, ValueEnum};
use colored::Colorize;
use flowlint::config::{ColorMode, Config, OutputFormat};
use flowlint::output::formatter_for;
use flowlint::{Engine, Rule, RuleCategory, Severity};
use glob::glob;
use std::io::IsTerminal;
use std::path::{Path, PathBuf};

#[derive(Parser)]
#[command(
    name = "flowlint",
    version,
    about = "Workflow Analyzer",
    long_about = "Static policy rules for automation projects. Reads project snapshots (YAML or JSON) and reports naming, typing, documentation and security violations."
)]
struct Cli {
    /// Snapshot files or glob patterns to inspect
    files: Vec<String>,

    /// Configuration file path
    #[arg(short, long)]
    config: Option<PathBuf>,

    /// Output format
    #[arg(short, long, value_enum)]
    format: Option<Format>,

    /// Enable verbose output
    #[arg(short, long)]
    verbose: bool,

    /// Disable colored output
    #[arg(long)]
    no_color: bool,

    /// Number of parallel jobs (0 = auto)
    #[arg(short, long)]
    jobs: Option<usize>,

    /// Inspect workflows one at a time
    #[arg(long)]
    sequential: bool,

    /// Disable specific rules (comma-separated)
    #[arg(long, value_delimiter = ',')]
    disable: Option<Vec<String>>,

    /// Only enable specific rules (comma-separated)
    #[arg(long, value_delimiter = ',')]
    select: Option<Vec<String>>,

    /// Select rules by prefix (e.g., 'workflow-' selects all workflow-* rules)
    #[arg(long, value_delimiter = ',')]
    extend: Option<Vec<String>>,

    /// Ignore rules by prefix
    #[arg(long, value_delimiter = ',')]
    ignore: Option<Vec<String>>,

    /// Only enable rules from specific categories (comma-separated)
    #[arg(long, value_delimiter = ',')]
    categories: Option<Vec<String>>,

    /// Override a rule parameter (rule-id.key=value, repeatable)
    #[arg(long = "param", value_name = "RULE.KEY=VALUE")]
    params: Vec<String>,

    /// Minimum severity to report
    #[arg(long, value_enum)]
    min_severity: Option<MinSeverity>,

    /// Show statistics
    #[arg(long)]
    stats: bool,

    /// Show per-rule timing statistics
    #[arg(long)]
    timing: bool,

    /// List available rules and exit
    #[arg(long)]
    list_rules: bool,

    /// Exit with 0 even if errors are found
    #[arg(long)]
    exit_zero: bool,

    /// Subcommands
    #[command(subcommand)]
    command: Option<Commands>,
}

#[derive(Subcommand)]
enum Commands {
    /// Show detailed information about a rule
    Explain {
        /// Rule ID to explain
        rule_id: String,
    },
    /// Initialize a configuration file
    Init {
        /// Preset to use (recommended, strict, minimal)
        #[arg(long, default_value = "recommended")]
        preset: String,

        /// Output format (yaml, json)
        #[arg(long, default_value = "yaml")]
        output_format: String,
    },
}

#[derive(Clone, Copy, ValueEnum)]
enum Format {
    Text,
    Json,
    Compact,
}

#[derive(Clone, Copy, ValueEnum)]
enum MinSeverity {
    Info,
    Warning,
    Error,
}

fn severity_label(severity: Severity) -> colored::ColoredString {
    match severity {
        Severity::Error => "error".red(),
        Severity::Warning => "warning".yellow(),
        Severity::Info => "info".blue(),
    }
}

/// Print a rule in the --list-rules layout
fn print_rule(rule: &Rule) {
    println!(
        "    {} [{}] ({}, {} scope)",
        rule.id.cyan(),
        severity_label(rule.severity),
        rule.category,
        rule.scope
    );
    println!("      {}", rule.name);
    if !rule.tags.is_empty() {
        println!("      Tags: {}", rule.tags.join(", "));
    }
}

/// Print detailed rule explanation
fn explain_rule(rule: &Rule) {
    println!("{}", "Rule Details".bold());
    println!();
    println!("  {}: {}", "ID".bold(), rule.id.cyan());
    println!("  {}: {}", "Name".bold(), rule.name);
    println!("  {}: {}", "Scope".bold(), rule.scope);
    println!("  {}: {}", "Severity".bold(), severity_label(rule.severity));
    println!("  {}: {}", "Category".bold(), rule.category);

    if !rule.recommendation.is_empty() {
        println!();
        println!("  {}", "Recommendation".bold());
        println!("  {}", rule.recommendation);
    }

    if !rule.parameters.is_empty() {
        println!();
        println!("  {}", "Parameters".bold());
        for param in rule.parameters.iter() {
            println!(
                "    {} = {:?}  ({})",
                param.key.cyan(),
                param.resolved(),
                param.label
            );
        }
    }

    if !rule.tags.is_empty() {
        println!();
        println!("  {}: {}", "Tags".bold(), rule.tags.join(", "));
    }
}

/// Write a preset configuration file
fn handle_init(preset: &str, output_format: &str) -> anyhow::Result<()> {
    let Some(config) = Config::preset(preset) else {
        bail!(
            "Unknown preset '{}'. Available: recommended, strict, minimal",
            preset
        );
    };

    let (filename, content) = if output_format == "json" {
        (".flowlintrc.json", serde_json::to_string_pretty(&config)?)
    } else {
        let yaml = serde_yaml::to_string(&config)?;
        (
            ".flowlintrc.yaml",
            format!(
                "# Flowlint configuration\n# Generated with: flowlint init --preset {}\n\n{}",
                preset, yaml
            ),
        )
    };

    if Path::new(filename).exists() {
        bail!(
            "{} already exists. Remove it first to reinitialize.",
            filename
        );
    }

    std::fs::write(filename, content).with_context(|| format!("Failed to write {}", filename))?;

    println!("{} Created {}", "success".green().bold(), filename);
    println!();
    println!("Next steps:");
    println!("  1. Review and customize the configuration");
    println!("  2. Run {} to inspect your projects", "flowlint **/*.flow.yaml".cyan());
    Ok(())
}

/// Parse `rule-id.key=value`
fn parse_param(arg: &str) -> anyhow::Result<(String, String, String)> {
    let (target, value) = arg
        .split_once('=')
        .with_context(|| format!("Invalid --param '{}': expected RULE.KEY=VALUE", arg))?;
    let (rule_id, key) = target
        .split_once('.')
        .with_context(|| format!("Invalid --param '{}': expected RULE.KEY=VALUE", arg))?;
    Ok((rule_id.to_string(), key.to_string(), value.to_string()))
}

/// Expand glob patterns into snapshot files, honoring exclude globs
fn collect_files(patterns: &[String], config: &Config) -> anyhow::Result<Vec<PathBuf>> {
    let mut files = Vec::new();
    for pattern in patterns {
        let paths = glob(pattern).with_context(|| format!("Invalid pattern '{}'", pattern))?;
        for entry in paths.flatten() {
            if entry.is_file() && !config.files.is_excluded(&entry) {
                files.push(entry);
            }
        }
    }
    Ok(files)
}

fn run(cli: Cli) -> anyhow::Result<i32> {
    if let Some(cmd) = &cli.command {
        match cmd {
            Commands::Init {
                preset,
                output_format,
            } => {
                handle_init(preset, output_format)?;
                return Ok(0);
            }
            Commands::Explain { .. } => {}
        }
    }

    let mut config = match &cli.config {
        Some(path) => Config::load(path)
            .with_context(|| format!("Failed to load config {}", path.display()))?,
        None => Config::load_default().unwrap_or_else(|e| {
            log::warn!("ignoring unreadable default configuration: {}", e);
            Config::default()
        }),
    };

    let format = cli.format.map(|f| match f {
        Format::Text => OutputFormat::Text,
        Format::Json => OutputFormat::Json,
        Format::Compact => OutputFormat::Compact,
    });
    config.merge_cli(format, cli.verbose.then_some(true), cli.jobs, cli.disable, cli.select);

    if let Some(extend_prefixes) = cli.extend {
        config.add_extend_prefixes(extend_prefixes);
    }
    if let Some(ignore_prefixes) = cli.ignore {
        config.add_ignore_prefixes(ignore_prefixes);
    }
    if let Some(cats) = &cli.categories {
        config.categories = cats
            .iter()
            .map(|c| c.parse::<RuleCategory>())
            .collect::<Result<Vec<_>, _>>()
            .map_err(anyhow::Error::msg)?;
    }
    for arg in &cli.params {
        let (rule_id, key, value) = parse_param(arg)?;
        config
            .rules
            .parameters
            .entry(rule_id)
            .or_default()
            .insert(key, value);
    }
    if cli.sequential {
        config.engine.parallel = false;
    }

    let colored_output = !cli.no_color
        && match config.output.color {
            ColorMode::Always => true,
            ColorMode::Never => false,
            ColorMode::Auto => std::io::stdout().is_terminal(),
        };
    colored::control::set_override(colored_output);

    let engine = Engine::new(config.clone()).context("Invalid rule configuration")?;

    if let Some(Commands::Explain { rule_id }) = &cli.command {
        let Some(rule) = engine.registry().get(rule_id) else {
            bail!(
                "Rule '{}' not found. Use --list-rules to see all available rules",
                rule_id
            );
        };
        explain_rule(rule);
        return Ok(0);
    }

    if cli.list_rules {
        println!("{}", "Available rules:".bold());
        for scope in [
            flowlint::ScopeKind::Project,
            flowlint::ScopeKind::Workflow,
            flowlint::ScopeKind::Activity,
        ] {
            println!();
            println!("  {} rules:", scope.to_string().cyan());
            for rule in engine.registry().rules_for(scope) {
                print_rule(rule);
            }
        }
        return Ok(0);
    }

    let files = collect_files(&cli.files, &config)?;
    if files.is_empty() {
        bail!("No snapshot files found to inspect");
    }

    if config.output.verbose {
        eprintln!("Inspecting {} projects...", files.len());
    }

    let mut result = engine.lint_files(&files);

    if let Some(min_sev) = cli.min_severity {
        result.retain_min_severity(match min_sev {
            MinSeverity::Info => Severity::Info,
            MinSeverity::Warning => Severity::Warning,
            MinSeverity::Error => Severity::Error,
        });
    }

    let formatter = formatter_for(
        config.output.format,
        colored_output,
        config.output.statistics || cli.stats,
    );
    print!("{}", formatter.format(&result));

    if cli.timing {
        eprintln!();
        eprint!("{}", result.format_timings());
    }

    Ok(if cli.exit_zero { 0 } else { result.exit_code() })
}

fn main() {
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("warn")).init();

    let cli = Cli::parse();
    match run(cli) {
        Ok(code) => std::process::exit(code),
        Err(e) => {
            eprintln!("{}: {:#}", "error".red().bold(), e);
            std::process::exit(3);
        }
    }
}
