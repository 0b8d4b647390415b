use anyhow::{Context, anyhow};
use clap::ArgMatches;
use colored::Colorize;
use friendmap_core::config::{CONFIG_FILE_NAME, Config, DEFAULT_CONFIG_DIR, expand_dir};
use friendmap_core::crawl::{CrawlOptions, build_graph, execute_crawl, normalize_profile_url};
use friendmap_core::render::{OutputFormat, render, save_output};
use friendmap_core::{CoreError, print_banner};
use friendmap_scanner::{AbsentContainerPolicy, ScanError};
use std::io::{self, BufRead, Write};
use std::path::PathBuf;
use std::sync::Arc;
use tracing::debug;
use tracing_subscriber::EnvFilter;

/// Install the tracing subscriber; `RUST_LOG` wins over `--verbose`
pub fn init_tracing(verbose: bool) {
    let default_level = if verbose { "debug" } else { "warn" };
    let filter =
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(default_level));
    let _ = tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(io::stderr)
        .try_init();
}

pub fn show_banner(quiet: bool) {
    if !quiet {
        print_banner();
    }
}

fn print_divider() {
    println!("{}", "═".repeat(60).bright_blue().bold());
}

/// Print a prompt and read one trimmed line from `input`
pub fn read_answer(msg: &str, input: &mut impl BufRead) -> anyhow::Result<String> {
    print!("{} ", msg.bright_cyan().bold());
    io::stdout().flush().context("Failed to flush stdout")?;
    let mut response = String::new();
    input
        .read_line(&mut response)
        .context("Failed to read answer")?;
    Ok(response.trim().to_string())
}

fn print_prompt(msg: &str) -> anyhow::Result<String> {
    read_answer(msg, &mut io::stdin().lock())
}

/// `y` / `yes` in any case
pub fn is_yes(response: &str) -> bool {
    matches!(response.trim().to_lowercase().as_str(), "y" | "yes")
}

/// Flag-driven pruning decision; `None` means ask the user
pub fn prune_from_flags(prune: bool, no_prune: bool) -> Option<bool> {
    match (prune, no_prune) {
        (true, _) => Some(true),
        (_, true) => Some(false),
        _ => None,
    }
}

/// CLI values that take precedence over the configuration file
#[derive(Debug, Default, Clone)]
pub struct CrawlOverrides {
    pub concurrency: Option<usize>,
    pub timeout_secs: Option<u64>,
    pub base_url: Option<String>,
    pub absent_container: Option<AbsentContainerPolicy>,
}

impl CrawlOverrides {
    pub fn from_matches(args: &ArgMatches) -> Self {
        Self {
            concurrency: args.get_one::<usize>("concurrency").copied(),
            timeout_secs: args.get_one::<u64>("timeout").copied(),
            base_url: args.get_one::<String>("base-url").cloned(),
            absent_container: args
                .get_one::<String>("absent-container")
                .and_then(|policy| parse_absent_container(policy)),
        }
    }

    pub fn apply(self, mut config: Config) -> Config {
        if let Some(concurrency) = self.concurrency {
            config.concurrency = (concurrency > 0).then_some(concurrency);
        }
        if let Some(timeout_secs) = self.timeout_secs {
            config.timeout_secs = timeout_secs;
        }
        if let Some(base_url) = self.base_url {
            config.base_url = base_url;
        }
        if let Some(policy) = self.absent_container {
            config.absent_container = policy;
        }
        config
    }
}

pub fn parse_absent_container(value: &str) -> Option<AbsentContainerPolicy> {
    match value.to_lowercase().as_str() {
        "private" => Some(AbsentContainerPolicy::Private),
        "empty" => Some(AbsentContainerPolicy::Empty),
        _ => None,
    }
}

/// Profile link from the argument, or from an interactive prompt
pub fn resolve_profile_url(arg: Option<&String>) -> anyhow::Result<String> {
    let raw = match arg {
        Some(url) => url.clone(),
        None => print_prompt("Enter the profile link:")?,
    };
    normalize_profile_url(&raw).ok_or_else(|| anyhow!("'{}' is not a valid profile link", raw))
}

pub fn handle_init(args: &ArgMatches) {
    if let Err(e) = run_init(args) {
        eprintln!("{} {:#}", "✗".red().bold(), e);
        std::process::exit(1);
    }
}

fn run_init(args: &ArgMatches) -> anyhow::Result<()> {
    let dir = args
        .get_one::<String>("PATH")
        .map(String::as_str)
        .unwrap_or(DEFAULT_CONFIG_DIR);
    let force = args.get_flag("force");
    let config_path = expand_dir(dir).join(CONFIG_FILE_NAME);

    print_divider();
    println!("{}", "  FRIENDMAP INITIALIZATION".bright_white().bold());
    print_divider();
    println!();

    if config_path.exists() && !force {
        println!("{}", "⚠ WARNING".yellow().bold());
        println!(
            "Configuration already exists: {}",
            config_path.display().to_string().bright_white()
        );
        let response = print_prompt("Overwrite it? [y/N]:")?;
        if !is_yes(&response) {
            println!("{} Initialization cancelled.", "✗".red().bold());
            return Ok(());
        }
    }

    Config::default()
        .save(&config_path)
        .with_context(|| format!("Failed to write {}", config_path.display()))?;

    println!(
        "{} Config written: {}",
        "✓".green().bold(),
        config_path.display().to_string().bright_white()
    );
    Ok(())
}

pub async fn handle_crawl(args: &ArgMatches, quiet: bool) {
    match run_crawl(args, quiet).await {
        Ok(()) => {}
        Err(e) => {
            if let Some(CoreError::Scan(ScanError::RootPrivate(_))) = e.downcast_ref::<CoreError>() {
                eprintln!(
                    "{} Friend list is not available for this profile.",
                    "✗".red().bold()
                );
            } else {
                eprintln!("{} Crawl failed: {:#}", "✗".red().bold(), e);
            }
            std::process::exit(1);
        }
    }
}

async fn run_crawl(args: &ArgMatches, quiet: bool) -> anyhow::Result<()> {
    let config_path = args.get_one::<PathBuf>("config");
    let config = Config::load(config_path.map(PathBuf::as_path))?;
    let config = CrawlOverrides::from_matches(args).apply(config);
    config.validate()?;
    debug!(?config, "Effective configuration");

    let format = args
        .get_one::<String>("format")
        .and_then(|f| OutputFormat::from_str(f))
        .unwrap_or(OutputFormat::Text);
    let output = args.get_one::<PathBuf>("output");
    let prune_flag = prune_from_flags(args.get_flag("prune"), args.get_flag("no-prune"));

    let root_url = resolve_profile_url(args.get_one::<String>("URL"))?;

    if !quiet {
        println!("\n🕸️  Mapping friends of {}", root_url);
        match config.concurrency {
            Some(limit) => println!("Concurrency: {}", limit),
            None => println!("Concurrency: unbounded"),
        }
        println!("Timeout: {}s\n", config.timeout_secs);
    }

    let options = CrawlOptions {
        root_url,
        config,
        show_progress_bars: !quiet,
    };
    let progress_callback = Arc::new(move |msg: String| {
        if !quiet {
            println!("{}", msg);
        }
    });

    let outcome = execute_crawl(options, Some(progress_callback)).await?;

    let prune = match prune_flag {
        Some(prune) => prune,
        None => is_yes(&print_prompt(
            "Hide friends with no further connections? [y/N]:",
        )?),
    };
    let (graph, pruned) = build_graph(&outcome, prune);
    if prune && !quiet {
        println!("{} Hid {} friends", "→".blue(), pruned.len());
    }

    let rendered = render(&graph, format)?;
    match output {
        Some(path) => {
            save_output(&rendered, path)?;
            println!(
                "{} Saved to {}",
                "✓".green().bold(),
                path.display().to_string().bright_white()
            );
        }
        None => print!("{}", rendered),
    }

    Ok(())
}
