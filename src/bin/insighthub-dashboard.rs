//! Terminal dashboard.
//!
//! Type a report number and Enter to view its data, `d <dataset>` to pick a
//! dataset directly, `r` to refresh, `q` to quit.

use std::io::Write;

use insighthub::client::{render, Command, DashboardClient};
use insighthub::DashboardConfig;
use tokio::io::{AsyncBufReadExt, BufReader};
use tokio::sync::mpsc;
use tracing_subscriber::EnvFilter;

fn parse_command(line: &str) -> Option<Command> {
    let line = line.trim();
    match line {
        "" => None,
        "q" | "quit" => Some(Command::Quit),
        "r" | "refresh" => Some(Command::Refresh),
        _ => {
            if let Some(dataset) = line.strip_prefix("d ") {
                return Some(Command::SelectDataset(dataset.trim().to_string()));
            }
            match line.parse::<usize>() {
                Ok(n) if n > 0 => Some(Command::SelectReport(n - 1)),
                _ => None,
            }
        }
    }
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    tracing_subscriber::fmt()
        .with_writer(std::io::stderr)
        .with_env_filter(EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("warn")))
        .init();

    let config = DashboardConfig::load();
    let client = DashboardClient::new(&config);

    let (tx, rx) = mpsc::unbounded_channel();
    tokio::spawn(async move {
        let mut lines = BufReader::new(tokio::io::stdin()).lines();
        while let Ok(Some(line)) = lines.next_line().await {
            match parse_command(&line) {
                Some(command) => {
                    let quit = command == Command::Quit;
                    if tx.send(command).is_err() || quit {
                        break;
                    }
                }
                None => eprintln!("commands: <report number> | d <dataset> | r | q"),
            }
        }
    });

    client
        .run(rx, |view| {
            let mut stdout = std::io::stdout().lock();
            let _ = write!(stdout, "\x1b[2J\x1b[H{}", render(view));
            let _ = stdout.flush();
        })
        .await?;
    Ok(())
}
