//! Dashboard binary
//!
//! Single-threaded event loop: the startup sequence runs the three
//! fetchers serially, then the loop selects over quote timer ticks and
//! user commands read from stdin. Commands: `24h` / `7d` / `30d` to change
//! the short-term window, `r` to retry the quote, `q` to quit.

use std::time::Duration;

use tokio::io::{AsyncBufReadExt, BufReader};
use tokio::sync::mpsc;
use tracing_subscriber::EnvFilter;

use coinwatch::{
    interval_for, refresh_plan, render, App, CoinGeckoClient, Config, Job, RefreshTimer, Result,
    Timeframe,
};

#[tokio::main(flavor = "current_thread")]
async fn main() -> Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")),
        )
        .with_writer(std::io::stderr)
        .init();

    let config = Config::from_env();
    config.validate()?;

    let client = CoinGeckoClient::new(&config.api_base_url, &config.asset_id);
    let mut app = App::new(client, &config);

    app.startup().await;
    println!("{}", render(app.state(), &config.asset_id));
    println!("commands: 24h | 7d | 30d | r (retry) | q (quit)");

    let plan = refresh_plan(&config);
    let period = interval_for(&plan, Job::Quote)
        .unwrap_or_else(|| Duration::from_secs(config.quote_poll_seconds));

    let (tick_tx, mut ticks) = mpsc::channel(1);
    let timer = RefreshTimer::spawn(period, tick_tx);

    let mut lines = BufReader::new(tokio::io::stdin()).lines();

    loop {
        tokio::select! {
            Some(()) = ticks.recv() => {
                app.refresh_quote().await;
            }
            line = lines.next_line() => {
                match line {
                    Ok(Some(command)) => {
                        if !handle_command(&mut app, command.trim()).await {
                            break;
                        }
                    }
                    Ok(None) => break,
                    Err(err) => {
                        tracing::error!(error = %err, "stdin read failed");
                        break;
                    }
                }
            }
        }
        println!("{}", render(app.state(), &config.asset_id));
    }

    timer.cancel();
    Ok(())
}

/// Apply one user command; returns false when the loop should exit
async fn handle_command<S: coinwatch::MarketData>(app: &mut App<S>, command: &str) -> bool {
    match command {
        "q" | "quit" => false,
        "r" | "retry" => {
            app.retry_quote().await;
            true
        }
        "" => true,
        other => {
            match other.parse::<Timeframe>() {
                Ok(timeframe) => app.select_timeframe(timeframe).await,
                Err(err) => println!("{err} (or: r, q)"),
            }
            true
        }
    }
}
