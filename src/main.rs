mod cli;

use std::io::{self, BufRead, Write};
use std::process::ExitCode;

use anyhow::{Context, Result};
use clap::Parser;

use cli::{Cli, Commands};
use rating_chart::app::{build_orchestrator, export, ChartOutcome, Orchestrator, RatingChart};
use rating_chart::config::{load_config, Config};
use rating_chart::fetch::HttpTransport;

#[tokio::main]
async fn main() -> Result<ExitCode> {
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("info")).init();

    let cli = Cli::parse();
    let config = match &cli.config {
        Some(path) => load_config(path)?,
        None => Config::builtin(),
    };
    let orchestrator = build_orchestrator(&config)?;

    match cli.command {
        Commands::Chart {
            ref username,
            ref mode,
            json,
            ref csv,
        } => {
            let (username, mode) = match cli::parse_request(username, mode) {
                Ok(request) => request,
                Err(err) => {
                    eprintln!("{err}");
                    return Ok(ExitCode::FAILURE);
                }
            };

            match orchestrator.chart_for(&username, mode).await {
                ChartOutcome::Ready(chart) => {
                    if json {
                        println!("{}", serde_json::to_string_pretty(chart.as_ref())?);
                    } else {
                        print_chart(&chart);
                    }
                    if let Some(path) = csv {
                        export::save_bars_csv(&chart, path)?;
                        println!("Saved {} bars to {}", chart.bars.len(), path.display());
                    }
                    Ok(ExitCode::SUCCESS)
                }
                ChartOutcome::Failed(message) => {
                    eprintln!("{message}");
                    Ok(ExitCode::FAILURE)
                }
            }
        }
        Commands::Interactive => {
            run_interactive_mode(&orchestrator).await?;
            Ok(ExitCode::SUCCESS)
        }
    }
}

async fn run_interactive_mode(orchestrator: &Orchestrator<HttpTransport>) -> Result<()> {
    cli::show_banner();
    let stdin = io::stdin();

    loop {
        print!("Waiting for command: ");
        io::stdout().flush().context("Failed to flush prompt")?;

        let mut input = String::new();
        let read = stdin
            .lock()
            .read_line(&mut input)
            .context("Failed to read user input")?;
        if read == 0 {
            break;
        }

        let parts: Vec<&str> = input.split_whitespace().collect();
        match parts.as_slice() {
            [] => continue,
            ["exit"] => {
                println!("Exiting...");
                break;
            }
            [username, mode] => match cli::parse_request(username, mode) {
                Ok((username, mode)) => match orchestrator.chart_for(&username, mode).await {
                    ChartOutcome::Ready(chart) => print_chart(&chart),
                    ChartOutcome::Failed(message) => println!("{message}"),
                },
                Err(err) => println!("{err}"),
            },
            _ => println!("Usage: <username> <bullet|blitz|rapid|daily>"),
        }
    }

    Ok(())
}

fn print_chart(chart: &RatingChart) {
    println!("{} ({})", chart.title, chart.username);
    println!(
        "{:<12} {:>7} {:>7} {:>7} {:>7}",
        "Date", "Open", "High", "Low", "Close"
    );
    for bar in &chart.bars {
        println!(
            "{:<12} {:>7} {:>7} {:>7} {:>7}",
            bar.date.format("%Y-%m-%d"),
            bar.open,
            bar.high,
            bar.low,
            bar.close
        );
    }
    if let Some(last) = chart.latest() {
        println!(
            "Latest close on {}: {}",
            last.date.format("%Y-%m-%d"),
            last.close
        );
    }
}
