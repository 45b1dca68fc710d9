//! wp-theme-kit's main application entry point.
//! Parses the command line, configures logging and dispatches to the
//! command implementations.

use wp_theme_kit::{
    cli::{get_args, Args, Command},
    commands,
    error::{default_error_handler, Result},
    logger::init_logger,
    prompt::DialoguerPrompter,
};

/// Main application entry point.
fn main() {
    let args = get_args();

    init_logger(args.verbose);

    if let Err(err) = run(args) {
        default_error_handler(err);
    }
}

fn run(args: Args) -> Result<()> {
    match args.command {
        Command::Build(build) => commands::build(&build).map(|_| ()),
        Command::Watch(watch) => commands::watch(&watch),
        Command::Plan(build) => {
            println!("{}", commands::plan(&build)?);
            Ok(())
        }
        Command::Scaffold(scaffold) => {
            let prompt = DialoguerPrompter::new();
            commands::scaffold(&scaffold, &prompt).map(|_| ())
        }
    }
}
