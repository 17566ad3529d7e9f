use std::io::Write;
use std::path::PathBuf;

use anyhow::{Context, Result};
use chrono::{Local, NaiveDate};
use clap::{Parser, Subcommand};
use env_logger::Env;
use log::info;

use oncall_census::config::DEFAULT_CONFIG_PATH;
use oncall_census::display::{format_phone_list, print_contacts, write_to_file};
use oncall_census::emoji::EmojiStyle;
use oncall_census::sheets::CsvBackend;
use oncall_census::web::{self, AppState};
use oncall_census::{generate_contacts, generate_message, Config, ContactOptions, MessageOptions, Session};

#[derive(Parser)]
#[command(name = "oncall-census", about = "Census message and on-call contact list from the shared sheets")]
struct Cli {
    /// TOML config file
    #[arg(long, default_value = DEFAULT_CONFIG_PATH)]
    config: PathBuf,

    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand)]
enum Command {
    /// Build the morning census message
    Message {
        /// circles, animal1, animal2, fruits or hearts
        #[arg(long)]
        style: Option<EmojiStyle>,
        /// Include ORANGE rows; `--include-orange false` turns a config default off
        #[arg(long, num_args = 0..=1, default_missing_value = "true")]
        include_orange: Option<bool>,
        /// Seed for emoji choice
        #[arg(long)]
        seed: Option<u64>,
        /// Also write the message to this file
        #[arg(long)]
        output: Option<PathBuf>,
    },
    /// Look up phone numbers for everyone on this week
    Contacts {
        /// Add PGY1 names; `--include-interns false` turns a config default off
        #[arg(long, num_args = 0..=1, default_missing_value = "true")]
        include_interns: Option<bool>,
        #[arg(long)]
        threshold: Option<f64>,
        /// Reference date (YYYY-MM-DD), defaults to today
        #[arg(long)]
        today: Option<NaiveDate>,
        /// Also write the phone list to this file
        #[arg(long)]
        output: Option<PathBuf>,
    },
    /// Serve the JSON API
    Serve {
        #[arg(long)]
        port: Option<u16>,
    },
}

#[tokio::main]
async fn main() -> Result<()> {
    env_logger::Builder::from_env(Env::default().default_filter_or("info"))
        .format(|buf, record| {
            writeln!(
                buf,
                "{} [{}] {}",
                Local::now().format("%Y-%m-%d %H:%M:%S"),
                record.level(),
                record.args()
            )
        })
        .init();

    let cli = Cli::parse();
    let config = Config::load(&cli.config)?;
    let backend = CsvBackend::new();

    match cli.command {
        Command::Message { style, include_orange, seed, output } => {
            let mut options = MessageOptions::from_config(&config);
            if let Some(style) = style {
                options.style = style;
            }
            if let Some(include_orange) = include_orange {
                options.include_orange = include_orange;
            }
            if seed.is_some() {
                options.seed = seed;
            }

            let session = Session::new();
            let report = generate_message(&session, &backend, &config, &options)
                .await
                .context("Failed to generate census message")?;

            for err in &report.row_errors {
                println!("⚠️  Error parsing row: {}", err);
            }
            println!("{}", report.message);

            if let Some(path) = output {
                write_to_file(&report.message, &path)
                    .with_context(|| format!("Failed to write {}", path.display()))?;
                println!("Message saved to {}", path.display());
            }
        }
        Command::Contacts { include_interns, threshold, today, output } => {
            let mut options = ContactOptions::from_config(&config);
            if let Some(include_interns) = include_interns {
                options.include_interns = include_interns;
            }
            if let Some(threshold) = threshold {
                options.threshold = threshold;
            }
            if let Some(today) = today {
                options.today = today;
            }

            let session = Session::new();
            let report = generate_contacts(&session, &backend, &config, &options)
                .await
                .context("Failed to generate contacts")?;

            let separator = &config.contacts.separator;
            print_contacts(&report, separator);

            if let Some(path) = output {
                write_to_file(&format_phone_list(&report.phones, separator), &path)
                    .with_context(|| format!("Failed to write {}", path.display()))?;
                println!("Phone list saved to {}", path.display());
            }
        }
        Command::Serve { port } => {
            let port = port.unwrap_or(config.server.port);
            info!("Starting web server on port {}", port);
            println!("Access the API at http://localhost:{}/api", port);
            web::start_server(port, AppState::new(config, Box::new(backend))).await?;
        }
    }

    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    fn parse(args: &[&str]) -> Command {
        Cli::try_parse_from(std::iter::once("oncall-census").chain(args.iter().copied()))
            .unwrap()
            .command
    }

    #[test]
    fn bare_flag_switches_on() {
        assert!(matches!(parse(&["message", "--include-orange"]), Command::Message { include_orange: Some(true), .. }));
        assert!(matches!(parse(&["contacts", "--include-interns"]), Command::Contacts { include_interns: Some(true), .. }));
    }

    #[test]
    fn explicit_false_switches_off() {
        assert!(matches!(
            parse(&["message", "--include-orange", "false"]),
            Command::Message { include_orange: Some(false), .. }
        ));
        assert!(matches!(
            parse(&["contacts", "--include-interns=false"]),
            Command::Contacts { include_interns: Some(false), .. }
        ));
    }

    #[test]
    fn omitted_flag_keeps_config() {
        assert!(matches!(parse(&["message"]), Command::Message { include_orange: None, .. }));
        assert!(matches!(parse(&["contacts"]), Command::Contacts { include_interns: None, .. }));
    }
}
