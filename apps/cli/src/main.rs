use anyhow::{Context, Result};
use clap::{Args, Parser, Subcommand};
use client_core::{
    FormSession, HttpPredictionClient, PredictionClient, SubmitOutcome, DEFAULT_SERVER_URL,
};
use shared::domain::Feature;
use tokio::io::{AsyncBufReadExt, BufReader};
use tracing_subscriber::EnvFilter;

mod render;

use render::{render_fields, render_view};

#[derive(Parser, Debug)]
#[command(about = "Crop prediction and improvement suggestions")]
struct Cli {
    #[arg(long, default_value = DEFAULT_SERVER_URL)]
    server_url: String,
    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand, Debug)]
enum Command {
    /// Submit one set of readings and print the recommendation.
    Predict(ReadingArgs),
    /// Fill in the form line by line.
    Interactive,
}

/// Raw readings; anything that is not a number is sent as a missing value.
#[derive(Args, Debug)]
struct ReadingArgs {
    #[arg(long, default_value = "", allow_hyphen_values = true)]
    nitrogen: String,
    #[arg(long, default_value = "", allow_hyphen_values = true)]
    phosphorus: String,
    #[arg(long, default_value = "", allow_hyphen_values = true)]
    potassium: String,
    #[arg(long, default_value = "", allow_hyphen_values = true)]
    temperature: String,
    #[arg(long, default_value = "", allow_hyphen_values = true)]
    humidity: String,
    #[arg(long, default_value = "", allow_hyphen_values = true)]
    ph_value: String,
    #[arg(long, default_value = "", allow_hyphen_values = true)]
    rainfall: String,
}

impl ReadingArgs {
    fn into_session(self) -> FormSession {
        let mut session = FormSession::new();
        let values = [
            self.nitrogen,
            self.phosphorus,
            self.potassium,
            self.temperature,
            self.humidity,
            self.ph_value,
            self.rainfall,
        ];
        for (feature, value) in Feature::ALL.into_iter().zip(values) {
            session.update_field(feature, value);
        }
        session
    }
}

#[derive(Debug, PartialEq, Eq)]
enum ReplCommand {
    Set { field: String, value: String },
    Submit,
    Clear,
    Show,
    Help,
    Quit,
}

fn parse_repl_command(line: &str) -> Result<Option<ReplCommand>, String> {
    let mut parts = line.split_whitespace();
    let Some(verb) = parts.next() else {
        return Ok(None);
    };

    let command = match verb.to_ascii_lowercase().as_str() {
        "set" => {
            let field = parts
                .next()
                .ok_or_else(|| "usage: set <field> <value>".to_string())?;
            let value = parts.collect::<Vec<_>>().join(" ");
            ReplCommand::Set {
                field: field.to_string(),
                value,
            }
        }
        "submit" | "predict" => ReplCommand::Submit,
        "clear" => ReplCommand::Clear,
        "show" => ReplCommand::Show,
        "help" | "?" => ReplCommand::Help,
        "quit" | "exit" => ReplCommand::Quit,
        other => return Err(format!("unknown command '{other}'; type 'help'")),
    };
    Ok(Some(command))
}

const REPL_HELP: &str = "\
commands:
  set <field> <value>   fields: nitrogen phosphorus potassium temperature humidity ph_value rainfall
  submit                send the readings for a prediction
  clear                 reset the form and the result
  show                  print the current form and result
  quit";

#[tokio::main]
async fn main() -> Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("warn")),
        )
        .with_writer(std::io::stderr)
        .init();
    let cli = Cli::parse();

    let client = HttpPredictionClient::new(&cli.server_url)?;
    match cli.command {
        Command::Predict(readings) => {
            let mut session = readings.into_session();
            let outcome = session.submit(&client).await;
            print!("{}", render_view(session.view()));
            if let SubmitOutcome::Failed(err) = outcome {
                return Err(err).context("prediction request failed");
            }
        }
        Command::Interactive => run_interactive(&client).await?,
    }

    Ok(())
}

async fn run_interactive(client: &dyn PredictionClient) -> Result<()> {
    let mut session = FormSession::new();
    let mut lines = BufReader::new(tokio::io::stdin()).lines();
    println!("{REPL_HELP}");

    while let Some(line) = lines.next_line().await.context("failed to read stdin")? {
        let command = match parse_repl_command(&line) {
            Ok(Some(command)) => command,
            Ok(None) => continue,
            Err(message) => {
                eprintln!("{message}");
                continue;
            }
        };

        match command {
            ReplCommand::Set { field, value } => {
                if let Err(err) = session.update_field_by_name(&field, value) {
                    eprintln!("{err}");
                }
            }
            ReplCommand::Submit => {
                if let SubmitOutcome::Failed(err) = session.submit(client).await {
                    eprintln!("prediction failed: {err}");
                }
                print!("{}", render_view(session.view()));
            }
            ReplCommand::Clear => {
                session.clear();
                println!("form cleared");
            }
            ReplCommand::Show => {
                print!("{}", render_fields(session.fields()));
                print!("{}", render_view(session.view()));
            }
            ReplCommand::Help => println!("{REPL_HELP}"),
            ReplCommand::Quit => break,
        }
    }

    Ok(())
}
