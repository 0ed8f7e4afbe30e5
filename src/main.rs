use blindnotifier::config::{DATABASE_VAR, TABLE_VAR, WEBHOOK_URL_VAR};
use blindnotifier::discord::{DiscordWebhook, LogWebhook};
use blindnotifier::timestream::TimestreamStore;
use blindnotifier::{Config, Notifier, set_up_logger};
use clap::{Arg, ArgAction, Command};
use log::debug;

struct Args {
    verbose: bool,
    dry_run: bool,
    database: Option<String>,
    table: Option<String>,
    webhook_url: Option<String>,
}

fn parse_args() -> Args {
    let matches = Command::new("blindnotifier")
        .version("0.1")
        .author("Jacob Luszcz")
        .arg(
            Arg::new("verbose")
                .short('v')
                .long("verbose")
                .action(ArgAction::SetTrue)
                .help("Verbose mode. Outputs DEBUG and higher log messages."),
        )
        .arg(
            Arg::new("dry-run")
                .short('n')
                .long("dry-run")
                .action(ArgAction::SetTrue)
                .help("Log the notification rather than posting it to Discord."),
        )
        .arg(
            Arg::new("database")
                .long("database")
                .env(DATABASE_VAR)
                .help("Timestream database name."),
        )
        .arg(
            Arg::new("table")
                .long("table")
                .env(TABLE_VAR)
                .help("Timestream table name."),
        )
        .arg(
            Arg::new("webhook-url")
                .long("webhook-url")
                .env(WEBHOOK_URL_VAR)
                .hide_env_values(true)
                .help("Discord webhook URL."),
        )
        .get_matches();

    let verbose = matches.get_flag("verbose");

    let dry_run = matches.get_flag("dry-run");

    let database = matches.get_one::<String>("database").cloned();
    let table = matches.get_one::<String>("table").cloned();
    let webhook_url = matches.get_one::<String>("webhook-url").cloned();

    Args {
        verbose,
        dry_run,
        database,
        table,
        webhook_url,
    }
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let _ = rustls::crypto::aws_lc_rs::default_provider().install_default();

    let args = parse_args();
    set_up_logger(module_path!(), args.verbose)?;

    let config = Config::from_lookup(|key| match key {
        DATABASE_VAR => args.database.clone(),
        TABLE_VAR => args.table.clone(),
        WEBHOOK_URL_VAR => args.webhook_url.clone(),
        _ => None,
    })?;
    debug!("{config:?}");

    let store = TimestreamStore::from_env().await;

    let response = if args.dry_run {
        Notifier::new(config, store, LogWebhook).notify().await
    } else {
        Notifier::new(config, store, DiscordWebhook::new())
            .notify()
            .await
    };

    println!("{}", serde_json::to_string(&response)?);

    Ok(())
}
