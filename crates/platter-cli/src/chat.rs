//! Interactive chat loop

use colored::Colorize;
use platter_gateway::{Gateway, SessionId};
use std::io::Write;
use tokio::io::{AsyncBufReadExt, BufReader};

/// Read turns from stdin until EOF or an exit word, printing a recommendation after each
pub async fn run(gateway: &Gateway) -> anyhow::Result<()> {
    let session = SessionId::new();
    let mut lines = BufReader::new(tokio::io::stdin()).lines();

    println!(
        "{} ({} items loaded; type {} to clear, {} to leave)",
        "Platter chat".bold(),
        gateway.catalog().len(),
        gateway
            .config()
            .reset_keywords
            .first()
            .map(String::as_str)
            .unwrap_or("reset"),
        "exit"
    );
    println!();

    loop {
        print!("> ");
        std::io::stdout().flush()?;

        let Some(line) = lines.next_line().await? else {
            break;
        };
        let line = line.trim();
        if line.is_empty() {
            continue;
        }
        if matches!(line.to_lowercase().as_str(), "exit" | "quit" | "q") {
            println!("Goodbye!");
            break;
        }

        let rec = gateway.handle_turn(&session, line)?;
        crate::print_recommendation(&rec);
        println!();
    }

    tracing::debug!(session = %session, "chat ended");
    Ok(())
}
