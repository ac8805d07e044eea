//! Command-line interface for the match dashboard and predictor.
//!
//! Every command reads `config.toml` (or `MATCHBOARD_CONFIG`) and honours
//! `MATCHBOARD_API_URL` / `MATCHBOARD_DB_PATH` overrides.

use clap::{Parser, Subcommand};

#[derive(Parser, Debug)]
#[command(name = "matchboard")]
#[command(author, version, about = "Football statistics dashboard and match predictor")]
pub struct Cli {
    /// Override the API base URL, e.g. http://127.0.0.1:5000/api
    #[arg(long, global = true)]
    pub api_url: Option<String>,

    #[command(subcommand)]
    pub command: Command,
}

#[derive(Subcommand, Debug)]
pub enum Command {
    /// Show stats, league distribution, goal trend and recent matches
    Dashboard {
        /// Load once and exit instead of refreshing until Ctrl-C
        #[arg(long)]
        once: bool,
    },

    /// Predict a fixture and record it in the local history. Without
    /// --home/--away, reads form commands from stdin (`help` lists them).
    Predict {
        #[arg(long, default_value = "")]
        league: String,

        #[arg(long, requires = "away")]
        home: Option<String>,

        #[arg(long, requires = "home")]
        away: Option<String>,

        /// Try sharing the result afterwards
        #[arg(long)]
        share: bool,
    },

    /// List the teams known to the API
    Teams,

    /// Print the stored prediction history
    History,
}

/// One line of input to the interactive prediction form
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum FormCommand {
    /// `HOME vs AWAY`
    Predict { home: String, away: String },
    /// `league NAME`, or bare `league` to clear it
    League(String),
    Share,
    Clear,
    New,
    Teams,
    History,
    Status,
    Help,
    Quit,
}

pub const FORM_HELP: &str = "HOME vs AWAY | league [NAME] | share | clear | new | teams | history | status | quit";

pub fn parse_form_command(line: &str) -> Option<FormCommand> {
    let line = line.trim();
    if line.is_empty() {
        return None;
    }

    // Padding lets a missing side still read as a fixture
    let padded = format!(" {} ", line);
    if let Some((home, away)) = padded.split_once(" vs ") {
        return Some(FormCommand::Predict {
            home: home.trim().to_string(),
            away: away.trim().to_string(),
        });
    }

    let (word, rest) = line.split_once(char::is_whitespace).unwrap_or((line, ""));
    let command = match word.to_ascii_lowercase().as_str() {
        "league" => FormCommand::League(rest.trim().to_string()),
        "share" => FormCommand::Share,
        "clear" => FormCommand::Clear,
        "new" => FormCommand::New,
        "teams" => FormCommand::Teams,
        "history" => FormCommand::History,
        "status" => FormCommand::Status,
        "help" | "?" => FormCommand::Help,
        "quit" | "exit" => FormCommand::Quit,
        _ => return None,
    };
    Some(command)
}
