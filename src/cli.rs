use std::path::PathBuf;

use clap::{Parser, Subcommand};

use rating_chart::error::{AppError, Result};
use rating_chart::records::Mode;

const USERNAME_MIN_LEN: usize = 2;
const USERNAME_MAX_LEN: usize = 30;

#[derive(Parser)]
#[command(name = "rating-chart")]
#[command(about = "Daily open/high/low/close rating history for a chess.com player")]
#[command(version)]
pub struct Cli {
    #[command(subcommand)]
    pub command: Commands,

    /// JSON settings file; built-in defaults are used when omitted
    #[arg(short, long)]
    pub config: Option<PathBuf>,
}

#[derive(Subcommand)]
pub enum Commands {
    /// Build the daily rating chart for one player
    Chart {
        /// chess.com username
        username: String,

        /// bullet, blitz, rapid or daily
        #[arg(short, long, default_value = "blitz")]
        mode: String,

        /// Print the chart as JSON instead of a table
        #[arg(long)]
        json: bool,

        /// Also write the bars to this CSV file
        #[arg(long)]
        csv: Option<PathBuf>,
    },

    /// Read `<username> <mode>` lines from stdin until `exit`
    Interactive,
}

/// Input checks performed before anything reaches the network.
pub fn parse_request(username: &str, mode: &str) -> Result<(String, Mode)> {
    let username = username.trim();
    if !is_valid_username(username) {
        return Err(AppError::validation("Invalid username format."));
    }
    let mode = mode.parse::<Mode>()?;
    Ok((username.to_string(), mode))
}

fn is_valid_username(username: &str) -> bool {
    (USERNAME_MIN_LEN..=USERNAME_MAX_LEN).contains(&username.len())
        && username
            .chars()
            .all(|c| c.is_ascii_alphanumeric() || c == '_' || c == '-')
}

pub fn show_banner() {
    println!("# ------------------------------------------------------------------------ #");
    println!("# Rating Chart");
    println!("# Executing date: {}", chrono::Local::now().format("%Y-%m-%d %H:%M"));
    println!("#");
    println!("#   <username> <mode>:    Build the daily chart (mode: bullet|blitz|rapid|daily)");
    println!("#   exit:                 Exit the program");
    println!("# ------------------------------------------------------------------------ #");
    println!();
}
