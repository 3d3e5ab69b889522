//! Veil-Browser - Main Entry Point
//!
//! Command-line front end for the identity masking engine. It handles CLI
//! argument parsing, configuration loading, profile resolution and
//! validation, and can emit the compiled override script or classify
//! navigation URLs for diagnostics. The embedding shell attaches the same
//! [`InjectionController`] to its document lifecycle hook.

use anyhow::{Context, Result};
use clap::{Arg, ArgAction, Command};
use std::io::Write;
use std::path::PathBuf;
use tracing::{info, Level};
use tracing_subscriber::{fmt, prelude::*, EnvFilter};

use veil_browser::{
    config::{AppSettings, CliArgs},
    policy::OAuthRuleSet,
    spoof::ProfileRegistry,
    surface::InjectionController,
    NAME, VERSION,
};

/// ANSI color codes for terminal output
mod colors {
    pub const RESET: &str = "\x1b[0m";
    pub const BOLD: &str = "\x1b[1m";
    pub const DIM: &str = "\x1b[2m";
    pub const CYAN: &str = "\x1b[36m";
    pub const GREEN: &str = "\x1b[32m";
    pub const YELLOW: &str = "\x1b[33m";
    pub const BLUE: &str = "\x1b[34m";
}

/// Print the startup banner with version
fn print_banner() {
    println!(
        r#"
{cyan}{bold}             _ _
 __   _____ (_) |
 \ \ / / _ \| | |
  \ V /  __/| | |
   \_/ \___||_|_|
{reset}
{dim}  Embedded Browser Identity Masking{reset}
{dim}  Version: {version}{reset}
"#,
        cyan = colors::CYAN,
        bold = colors::BOLD,
        reset = colors::RESET,
        dim = colors::DIM,
        version = VERSION
    );
}

/// Print configuration summary
fn print_config_summary(settings: &AppSettings, script_bytes: Option<usize>) {
    println!(
        "{bold}{blue}Configuration:{reset}",
        bold = colors::BOLD,
        blue = colors::BLUE,
        reset = colors::RESET
    );
    println!(
        "  {dim}Profile:{reset}        {}",
        settings.active_profile,
        dim = colors::DIM,
        reset = colors::RESET
    );
    println!(
        "  {dim}Spoofing:{reset}       {}",
        if settings.spoof_enabled {
            format!("{green}enabled{reset}", green = colors::GREEN, reset = colors::RESET)
        } else {
            format!("{yellow}disabled{reset}", yellow = colors::YELLOW, reset = colors::RESET)
        },
        dim = colors::DIM,
        reset = colors::RESET
    );
    if let Some(bytes) = script_bytes {
        println!(
            "  {dim}Script:{reset}         {} bytes",
            bytes,
            dim = colors::DIM,
            reset = colors::RESET
        );
    }
    if !settings.extra_oauth_domains.is_empty() {
        println!(
            "  {dim}OAuth Domains:{reset}  +{}",
            settings.extra_oauth_domains.join(", +"),
            dim = colors::DIM,
            reset = colors::RESET
        );
    }
    println!();
}

/// Build the CLI command parser
fn build_cli() -> Command {
    Command::new(NAME)
        .version(VERSION)
        .author("Veil-Browser Team")
        .about("Embedded browser identity masking with OAuth-aware navigation policy")
        .long_about(
            "Veil-Browser compiles a coherent fake browser identity into an\n\
             override script that is injected into every hosted document\n\
             before any page script runs. This tool resolves and validates\n\
             the active profile, emits the compiled script, and classifies\n\
             navigation URLs against the OAuth rule set.",
        )
        .arg(
            Arg::new("config")
                .short('c')
                .long("config")
                .value_name("FILE")
                .help("Path to configuration file (TOML or JSON)")
                .value_parser(clap::value_parser!(PathBuf)),
        )
        .arg(
            Arg::new("profile")
                .short('p')
                .long("profile")
                .value_name("ID")
                .help("Spoofing profile id (default: firefox-desktop)"),
        )
        .arg(
            Arg::new("no-spoof")
                .long("no-spoof")
                .help("Disable identity spoofing")
                .action(ArgAction::SetTrue),
        )
        .arg(
            Arg::new("list-profiles")
                .long("list-profiles")
                .help("List registered profile ids and exit")
                .action(ArgAction::SetTrue),
        )
        .arg(
            Arg::new("emit-script")
                .long("emit-script")
                .value_name("FILE")
                .help("Write the compiled override script to FILE ('-' for stdout)"),
        )
        .arg(
            Arg::new("classify")
                .long("classify")
                .value_name("URL")
                .help("Classify URL against the OAuth rule set (repeatable)")
                .action(ArgAction::Append),
        )
        .arg(
            Arg::new("verbose")
                .short('v')
                .long("verbose")
                .help("Enable verbose logging")
                .action(ArgAction::Count),
        )
        .arg(
            Arg::new("quiet")
                .short('q')
                .long("quiet")
                .help("Suppress output except errors")
                .action(ArgAction::SetTrue)
                .conflicts_with("verbose"),
        )
}

/// Parse CLI arguments into CliArgs struct
fn parse_cli_args(matches: &clap::ArgMatches) -> CliArgs {
    let mut args = CliArgs::default();

    args.config_file = matches.get_one::<PathBuf>("config").cloned();
    args.profile = matches.get_one::<String>("profile").cloned();

    if matches.get_flag("no-spoof") {
        args.spoof_enabled = Some(false);
    }

    args
}

/// Initialize the tracing/logging subsystem
fn init_tracing(verbosity: u8, quiet: bool) {
    let level = if quiet {
        Level::ERROR
    } else {
        match verbosity {
            0 => Level::INFO,
            1 => Level::DEBUG,
            _ => Level::TRACE,
        }
    };

    let filter = EnvFilter::from_default_env().add_directive(level.into());

    tracing_subscriber::registry()
        .with(fmt::layer().with_target(true).with_thread_ids(false))
        .with(filter)
        .init();
}

/// Main application entry point
#[tokio::main]
async fn main() -> Result<()> {
    // Parse CLI arguments
    let matches = build_cli().get_matches();

    // Get verbosity settings before loading config
    let verbosity = matches.get_count("verbose");
    let quiet = matches.get_flag("quiet");

    // Initialize logging
    init_tracing(verbosity, quiet);

    // Convert matches to CliArgs
    let cli_args = parse_cli_args(&matches);

    // Load configuration with full precedence chain
    let settings = cli_args
        .load_settings()
        .context("Failed to load configuration")?;

    // Build the registry: built-ins plus profiles declared in configuration
    let mut registry = ProfileRegistry::with_builtins();
    for profile in &settings.profiles {
        registry
            .register(profile.clone())
            .context("Failed to register configured profile")?;
    }

    if matches.get_flag("list-profiles") {
        for id in registry.ids() {
            println!("{id}");
        }
        return Ok(());
    }

    // Unknown profile id here is a fatal configuration error
    let profile = registry
        .resolve(&settings.active_profile)
        .context("Failed to resolve active spoofing profile")?;

    let rules =
        OAuthRuleSet::default().with_extra_domains(settings.extra_oauth_domains.iter().cloned());

    let controller = if settings.spoof_enabled {
        Some(InjectionController::new(profile)?)
    } else {
        info!("identity spoofing disabled; documents receive no overrides");
        None
    };

    // Print banner unless quiet mode
    if !quiet {
        print_banner();
        print_config_summary(
            &settings,
            controller.as_ref().map(|c| c.script().as_str().len()),
        );
    }

    // Classify URLs if requested
    if let Some(urls) = matches.get_many::<String>("classify") {
        for url in urls {
            let is_auth = rules.classify(Some(url));
            println!("{}\t{}", if is_auth { "auth" } else { "plain" }, url);
        }
    }

    // Emit the compiled script if requested
    if let Some(target) = matches.get_one::<String>("emit-script") {
        let controller = controller
            .as_ref()
            .context("Cannot emit script while spoofing is disabled")?;

        if target == "-" {
            std::io::stdout().write_all(controller.script().as_str().as_bytes())?;
        } else {
            std::fs::write(target, controller.script().as_str())
                .with_context(|| format!("Failed to write script to {target}"))?;
            info!(target = %target, "override script written");
        }
    }

    Ok(())
}
