use clap::{
    crate_authors, crate_description, crate_name, crate_version, Arg, ArgAction, ArgMatches,
    Command,
};
use colored::Colorize;
use std::{env, io, path::PathBuf};
use webroot_sync::{hooks, hooks::HookEvent, LinkPolicy, Options, SyncReport};

// The CLI layer should only parse inputs and forward them to library code.
fn main() -> miette::Result<()> {
    let matches = Command::new(crate_name!())
        .about(crate_description!())
        .author(crate_authors!())
        .version(crate_version!())
        .arg(
            Arg::new("verbose")
                .short('v')
                .long("verbose")
                .help("Print a line for every moved path")
                .action(ArgAction::SetTrue)
                .global(true),
        )
        .arg(
            Arg::new("project-dir")
                .short('C')
                .long("project-dir")
                .help("Directory holding the manifest")
                .default_value(".")
                .global(true),
        )
        .arg(
            Arg::new("manifest")
                .long("manifest")
                .help("Manifest file (composer.json or webroot.toml); discovered when omitted")
                .global(true),
        )
        .arg(
            Arg::new("no-dev")
                .long("no-dev")
                .help("Production install: copy instead of symlink (also COMPOSER_NO_DEV=1)")
                .action(ArgAction::SetTrue)
                .global(true),
        )
        .arg(
            Arg::new("always-symlink")
                .long("always-symlink")
                .help("Symlink even when not in dev mode")
                .action(ArgAction::SetTrue)
                .global(true),
        )
        .subcommand_required(true)
        .subcommand(Command::new("sync").about("Synchronizes configured paths into the webroot"))
        .subcommand(
            Command::new("hook")
                .about("Dispatches a lifecycle hook")
                .arg(
                    Arg::new("event")
                        .help("hook event name")
                        .value_parser(HookEvent::ALL.map(|event| event.as_str()))
                        .required(true),
                ),
        )
        .subcommand(Command::new("events").about("Lists subscribed hooks"))
        .get_matches();

    let is_verbose = matches.get_flag("verbose");

    env_logger::Builder::from_env(
        env_logger::Env::default().default_filter_or(if is_verbose { "debug" } else { "warn" }),
    )
    .init();

    match matches.subcommand() {
        Some(("sync", _)) => handle_sync(&matches),
        Some(("hook", args)) => handle_hook(&matches, args),
        Some(("events", _)) => {
            handle_events();
            Ok(())
        }
        _ => unreachable!(),
    }
}

fn options(matches: &ArgMatches) -> Options {
    let project_dir = matches
        .get_one::<String>("project-dir")
        .map(PathBuf::from)
        .unwrap_or_else(|| PathBuf::from("."));

    let no_dev_env =
        env::var("COMPOSER_NO_DEV").is_ok_and(|value| !matches!(value.as_str(), "" | "0"));

    let mut options = Options::new(project_dir);
    options.manifest = matches.get_one::<String>("manifest").map(PathBuf::from);
    options.vendor_dir = env::var("COMPOSER_VENDOR_DIR")
        .ok()
        .filter(|dir| !dir.is_empty());
    options.dev_mode = !(matches.get_flag("no-dev") || no_dev_env);
    options.policy = if matches.get_flag("always-symlink") {
        LinkPolicy::AlwaysSymlink
    } else {
        LinkPolicy::ModeDependent
    };
    options.verbose = matches.get_flag("verbose");

    options
}

fn handle_sync(matches: &ArgMatches) -> miette::Result<()> {
    let report = webroot_sync::initialise_webroot(&options(matches), &mut io::stdout())?;

    print_summary(&report);

    Ok(())
}

fn handle_hook(matches: &ArgMatches, args: &ArgMatches) -> miette::Result<()> {
    let event = args
        .get_one::<String>("event")
        .expect("event required")
        .parse::<HookEvent>()?;

    let reports = webroot_sync::run_hook(event, &options(matches), &mut io::stdout())?;

    for report in &reports {
        print_summary(report);
    }

    Ok(())
}

fn handle_events() {
    for (event, subscriptions) in hooks::subscribed_events() {
        for subscription in subscriptions {
            println!(
                "{} {} (priority {})",
                event.to_string().blue(),
                subscription.listener.to_string().green(),
                subscription.priority
            );
        }
    }
}

fn print_summary(report: &SyncReport) {
    println!(
        "{} {} path(s) into the webroot",
        "synced".green(),
        report.applied.len()
    );
}
