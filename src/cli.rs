//! Command-line interface implementation for wp-theme-kit.
//! Provides argument parsing and help text formatting using clap.

use clap::{error::ErrorKind, CommandFactory, Parser, Subcommand};
use std::path::PathBuf;
use url::Url;

use crate::constants::{DEFAULT_THEME_SLUG, DEFAULT_WORDPRESS_PATH};

/// Command-line arguments structure for wp-theme-kit.
#[derive(Parser, Debug)]
#[command(author, version, about = "wp-theme-kit: WordPress development theme scaffolding and builds", long_about = None)]
pub struct Args {
    #[command(subcommand)]
    pub command: Command,

    /// Enable verbose logging output
    #[arg(short, long, global = true)]
    pub verbose: bool,
}

#[derive(Subcommand, Debug)]
pub enum Command {
    /// Build the theme into dist and mirror it into the WordPress install
    Build(BuildArgs),
    /// Build, then rebuild whenever the theme sources change
    Watch(WatchArgs),
    /// Print the resolved build plan as JSON
    Plan(BuildArgs),
    /// Write the default theme files into the theme project
    Scaffold(ScaffoldArgs),
}

/// Options shared by every command.
#[derive(clap::Args, Debug, Clone)]
pub struct ThemeArgs {
    /// Theme slug, used in the WordPress themes path and in templates
    #[arg(long, value_name = "SLUG", default_value = DEFAULT_THEME_SLUG)]
    pub theme_slug: String,

    /// WordPress install location, relative to the theme project or absolute
    #[arg(long, value_name = "PATH", default_value = DEFAULT_WORDPRESS_PATH)]
    pub wordpress_path: String,

    /// Theme project directory
    #[arg(long, value_name = "PATH", default_value = ".")]
    pub theme_path: PathBuf,

    /// Site configuration file [default: <THEME_PATH>/../../../site.json]
    #[arg(long, value_name = "FILE")]
    pub site_config: Option<PathBuf>,
}

#[derive(clap::Args, Debug, Clone)]
pub struct BuildArgs {
    #[command(flatten)]
    pub theme: ThemeArgs,

    /// Environment declared in the site configuration [default: localhost]
    #[arg(short, long, value_name = "NAME")]
    pub environment: Option<String>,

    /// Also pack dist into <THEME_PATH>/<THEME_SLUG>.zip
    #[arg(long)]
    pub zip: bool,
}

#[derive(clap::Args, Debug, Clone)]
pub struct WatchArgs {
    #[command(flatten)]
    pub build: BuildArgs,

    /// Development site proxied by Browsersync; writes browsersync.config.js
    #[arg(long, value_name = "URL")]
    pub dev_proxy: Option<Url>,
}

#[derive(clap::Args, Debug, Clone)]
pub struct ScaffoldArgs {
    #[command(flatten)]
    pub theme: ThemeArgs,

    /// Development site proxied by Browsersync
    #[arg(long, value_name = "URL")]
    pub dev_proxy: Option<Url>,

    /// Skip confirmation prompts when overwriting existing files.
    /// This will automatically overwrite any existing files in the theme
    /// project without asking for confirmation.
    #[arg(long)]
    pub skip_overwrite_check: bool,
}

/// Parses command line arguments and returns the Args structure.
///
/// # Exits
/// * With status code 1 if required arguments are missing
/// * With clap's default error handling for other argument errors
pub fn get_args() -> Args {
    match Args::try_parse() {
        Ok(args) => args,
        Err(e) => {
            if e.kind() == ErrorKind::MissingSubcommand
                || e.kind() == ErrorKind::DisplayHelpOnMissingArgumentOrSubcommand
            {
                let _ = Args::command()
                    .help_template(
                        r#"{about-section}
{usage-heading} {usage}

{all-args}
{after-help}
"#,
                    )
                    .print_help();
                std::process::exit(1);
            } else {
                e.exit();
            }
        }
    }
}
