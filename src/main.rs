use anyhow::{anyhow, Context, Result};
use clap::Parser;
use colored::Colorize;
use std::sync::Arc;
use std::time::Duration;
use tokio::io::{AsyncBufReadExt, BufReader};

use copytrader::{
    arguments::{split_logger_flags, Cli, Command, SettingsCommand, WalletCommand},
    config,
    logger::{self, LogTag},
    paths,
    poller::{spawn_poller, PollPhase, PollerHandle, PollerState},
    positions::{aggregate, all_positions_sorted, fetch_all_positions, PositionsClient},
    rpc::testing::test_rpc_endpoint,
    storage,
    tracker::Tracker,
    transactions::{Activity, TransferDirection},
};

/// Entry point for the copytrader operator binary
///
/// Startup order:
/// - split logger flags from clap arguments
/// - resolve directories (optionally from --data-dir)
/// - load config.toml, then start logging
/// - open the key-value store and the tracker services
#[tokio::main]
async fn main() {
    let (cli_args, logger_args) = split_logger_flags(std::env::args().collect());
    let cli = Cli::parse_from(cli_args);

    let code = match run(cli, &logger_args).await {
        Ok(()) => 0,
        Err(e) => {
            logger::error(LogTag::System, &format!("{:#}", e));
            1
        }
    };

    logger::flush();
    std::process::exit(code);
}

async fn run(cli: Cli, logger_args: &[String]) -> Result<()> {
    if let Some(dir) = cli.data_dir.clone() {
        paths::set_base_directory(dir).map_err(|e| anyhow!(e))?;
    }
    paths::ensure_all_directories().map_err(|e| anyhow!(e))?;

    config::load_config().map_err(|e| anyhow!(e))?;
    let cfg = config::get_config_clone();

    let log_dir = cfg.logging.file_enabled.then(paths::get_logs_directory);
    logger::init(logger_args, log_dir);
    let mut logger_config = logger::get_logger_config();
    logger_config.console = cfg.logging.console;
    logger::set_logger_config(logger_config);

    let store = storage::open_store(&cfg.storage, &paths::get_data_directory())
        .await
        .context("Failed to open store")?;
    let tracker = Arc::new(Tracker::open(&cfg, store).await?);

    match cli.command {
        Command::Run { enable } => run_headless(tracker, enable).await,
        Command::Wallet { action } => wallet_command(&tracker, action).await,
        Command::Activities { limit } => {
            let limit = limit.unwrap_or(cfg.fetcher.display_fetch_limit);
            let activities = tracker.ingestor().recent(limit).await;
            if activities.is_empty() {
                println!("No activity recorded yet");
            }
            for activity in &activities {
                print_activity(activity);
            }
            Ok(())
        }
        Command::PollOnce => {
            let report = tracker.poll_once().await?;
            println!(
                "{} wallets polled ({} failed), {} new activities, {} in history",
                report.wallets_processed,
                report.wallets_failed,
                report.new_activities.to_string().bold(),
                report.history_len
            );
            let history = tracker.ingestor().recent(report.history_len).await;
            for activity in history.iter().filter(|a| report.new_ids.contains(&a.id)) {
                print_activity(activity);
            }
            Ok(())
        }
        Command::Positions => positions_command(&tracker, &cfg.positions).await,
        Command::Settings { action } => settings_command(&tracker, action, &cfg).await,
        Command::Clear { yes } => {
            if !yes && !confirm("This deletes all wallets, settings and activity history.").await? {
                println!("Cancelled");
                return Ok(());
            }
            tracker.clear_all().await?;
            println!("All data cleared");
            Ok(())
        }
    }
}

// =============================================================================
// HEADLESS LOOP
// =============================================================================

async fn run_headless(tracker: Arc<Tracker>, enable: bool) -> Result<()> {
    let interval = tracker.settings().get().await.poll_interval;
    let (poller, task) = spawn_poller(tracker.clone(), PollerState::new(interval));

    poller.set_wallet_count(tracker.wallets().count().await);
    poller.set_enabled(enable);
    let _follower = poller.follow_wallet_count(tracker.wallets().watch_count());

    logger::info(
        LogTag::System,
        &format!(
            "Tracking {} wallets every {}s (polling {}). Commands: start, stop, refresh, status, interval <secs>, quit",
            tracker.wallets().count().await,
            interval,
            if enable { "on" } else { "off" }
        ),
    );

    let mut lines = BufReader::new(tokio::io::stdin()).lines();
    loop {
        tokio::select! {
            _ = tokio::signal::ctrl_c() => {
                logger::info(LogTag::System, "Shutdown requested");
                break;
            }
            line = lines.next_line() => match line {
                Ok(Some(line)) => {
                    if !handle_console_command(&tracker, &poller, line.trim()).await {
                        break;
                    }
                }
                // stdin closed: keep polling until ctrl-c
                Ok(None) => {
                    tokio::signal::ctrl_c().await.context("Failed to listen for ctrl-c")?;
                    break;
                }
                Err(e) => return Err(e).context("Failed to read stdin"),
            },
        }
    }

    poller.shutdown();
    let _ = tokio::time::timeout(Duration::from_secs(5), task).await;
    Ok(())
}

/// Returns false when the loop should exit
async fn handle_console_command(tracker: &Tracker, poller: &PollerHandle, line: &str) -> bool {
    let mut parts = line.split_whitespace();
    match parts.next() {
        Some("start") => poller.set_enabled(true),
        Some("stop") => poller.set_enabled(false),
        Some("refresh") => poller.trigger_now(),
        Some("status") => print_status(poller),
        Some("interval") => match parts.next().and_then(|s| s.parse::<u64>().ok()) {
            Some(seconds) => match tracker.settings().update_poll_interval(seconds).await {
                Ok(applied) => {
                    poller.set_interval(applied);
                    println!("Interval set to {}s (applies after the next poll)", applied);
                }
                Err(e) => logger::error(LogTag::Config, &format!("{}", e)),
            },
            None => println!("usage: interval <seconds>"),
        },
        Some("quit") | Some("exit") => return false,
        Some(other) => println!("Unknown command: {}", other),
        None => {}
    }
    true
}

fn print_status(poller: &PollerHandle) {
    let status = poller.status();
    let phase = match status.phase {
        PollPhase::Idle => "idle".dimmed(),
        PollPhase::Armed => "armed".green(),
        PollPhase::Fetching => "fetching".yellow(),
    };
    println!("phase: {}  polling: {}", phase, if status.enabled { "on" } else { "off" });
    if let Some(countdown) = status.countdown {
        println!("next poll in {}s (interval {}s)", countdown, status.interval_secs);
    }
    if let Some(last) = status.last_poll_time.and_then(chrono::DateTime::from_timestamp_millis) {
        println!("last poll: {}", last.format("%Y-%m-%d %H:%M:%S UTC"));
    }
    if let Some(report) = &status.last_report {
        println!(
            "last cycle: {} new activities, {} wallets failed",
            report.new_activities, report.wallets_failed
        );
    }
    if let Some(error) = &status.last_error {
        println!("last error: {}", error.red());
    }
}

// =============================================================================
// SUBCOMMANDS
// =============================================================================

async fn wallet_command(tracker: &Tracker, action: WalletCommand) -> Result<()> {
    let wallets = tracker.wallets();
    match action {
        WalletCommand::Add { address, label } => {
            let wallet = wallets.add(&address, label.as_deref()).await?;
            println!("Added {} ({})", wallet.label.bold(), wallet.address);
        }
        WalletCommand::Remove { address } => {
            let wallet = wallets.remove(&address).await?;
            println!("Removed {}", wallet.label);
        }
        WalletCommand::Label { address, label } => {
            wallets.update_label(&address, &label).await?;
            println!("Renamed {} to {}", address, label);
        }
        WalletCommand::List => {
            let list = wallets.list().await;
            if list.is_empty() {
                println!("No wallets tracked");
            }
            for wallet in list {
                let added = chrono::DateTime::from_timestamp_millis(wallet.added_at)
                    .map(|t| t.format("%Y-%m-%d").to_string())
                    .unwrap_or_default();
                println!("{:<20} {} {}", wallet.label.bold(), wallet.address, added.dimmed());
            }
        }
        WalletCommand::Import { path } => {
            let text = tokio::fs::read_to_string(&path)
                .await
                .with_context(|| format!("Failed to read {}", path.display()))?;
            let added = wallets.import_json(&text).await?;
            println!("Imported {} wallets", added);
        }
        WalletCommand::Export { output } => {
            let json = wallets.export_json().await?;
            match output {
                Some(path) => {
                    tokio::fs::write(&path, json)
                        .await
                        .with_context(|| format!("Failed to write {}", path.display()))?;
                    println!("Exported to {}", path.display());
                }
                None => println!("{}", json),
            }
        }
    }
    Ok(())
}

async fn settings_command(
    tracker: &Tracker,
    action: SettingsCommand,
    cfg: &config::Config,
) -> Result<()> {
    let settings = tracker.settings();
    match action {
        SettingsCommand::Show => {
            let current = settings.get().await;
            println!("poll interval: {}s", current.poll_interval);
            println!("rpc endpoint:  {}", current.rpc_endpoint);
            println!("alternatives:  {}", cfg.rpc.backup_endpoints.join(", "));
        }
        SettingsCommand::Interval { seconds } => {
            let applied = settings.update_poll_interval(seconds).await?;
            println!("Poll interval set to {}s", applied);
        }
        SettingsCommand::Rpc { endpoint, test } => {
            if test {
                let timeout = Duration::from_secs(cfg.rpc.request_timeout_secs);
                let result = test_rpc_endpoint(&endpoint, timeout).await;
                if !result.success {
                    return Err(anyhow!(
                        "Endpoint test failed: {}",
                        result.error.unwrap_or_default()
                    ));
                }
                println!(
                    "Endpoint OK ({}ms{})",
                    result.latency_ms,
                    if result.is_mainnet == Some(false) { ", not mainnet" } else { "" }
                );
            }
            settings.update_rpc_endpoint(&endpoint).await?;
            println!("RPC endpoint set to {}", endpoint);
        }
    }
    Ok(())
}

async fn positions_command(tracker: &Tracker, cfg: &config::PositionsConfig) -> Result<()> {
    let wallets = tracker.wallets().list().await;
    if wallets.is_empty() {
        println!("No wallets tracked");
        return Ok(());
    }

    let client = PositionsClient::new(cfg)?;
    let addresses: Vec<String> = wallets.iter().map(|w| w.address.clone()).collect();
    let fetched = fetch_all_positions(
        &client,
        &addresses,
        Duration::from_millis(cfg.request_delay_ms),
    )
    .await;

    for entry in fetched.iter().filter(|e| e.error.is_some()) {
        println!(
            "{} {}: {}",
            "!".red(),
            entry.wallet_address,
            entry.error.as_deref().unwrap_or_default()
        );
    }

    let stats = aggregate(&fetched);
    println!(
        "{} positions ({} long / {} short), size ${:.0}, collateral ${:.0}",
        stats.total_positions,
        stats.long_count,
        stats.short_count,
        stats.total_size(),
        stats.total_collateral
    );
    println!(
        "PnL {} ({:.2}% of collateral), long share {:.1}%",
        format_usd(stats.total_pnl()),
        stats.pnl_on_collateral(),
        stats.long_ratio()
    );

    for labeled in all_positions_sorted(&fetched, &wallets) {
        let p = &labeled.position;
        let side = match p.side {
            copytrader::positions::PositionSide::Long => "LONG ".green(),
            copytrader::positions::PositionSide::Short => "SHORT".red(),
        };
        println!(
            "{:<16} {} {:<5} ${:>12.2} {:>5.1}x entry {:.2} mark {:.2} liq {:.2} pnl {} ({:.2}%)",
            labeled.wallet_label,
            side,
            p.token,
            p.size_usd,
            p.leverage,
            p.entry_price,
            p.mark_price,
            p.liquidation_price,
            format_usd(p.pnl_usd),
            p.pnl_percent
        );
    }
    Ok(())
}

// =============================================================================
// OUTPUT HELPERS
// =============================================================================

fn print_activity(activity: &Activity) {
    let time = chrono::DateTime::from_timestamp_millis(activity.timestamp)
        .map(|t| t.format("%m-%d %H:%M:%S").to_string())
        .unwrap_or_else(|| "unknown".to_string());
    let kind = if activity.is_jupiter_perp {
        activity.activity_type.as_str().magenta().bold()
    } else {
        activity.activity_type.as_str().cyan()
    };
    let status = if activity.success { "".normal() } else { " FAILED".red() };

    println!(
        "{} {:<16} {}{} {}",
        time.dimmed(),
        activity.wallet_label,
        kind,
        status,
        activity.signature.dimmed()
    );
    for transfer in &activity.transfers {
        let (arrow, sign) = match transfer.direction {
            TransferDirection::In => ("+".green(), "in"),
            TransferDirection::Out => ("-".red(), "out"),
        };
        let symbol = transfer
            .symbol
            .clone()
            .unwrap_or_else(|| format!("{}...", transfer.mint.chars().take(6).collect::<String>()));
        println!("    {}{} {} ({})", arrow, transfer.amount, symbol, sign);
    }
}

fn format_usd(value: f64) -> colored::ColoredString {
    let text = format!("${:.2}", value);
    if value >= 0.0 {
        text.green()
    } else {
        text.red()
    }
}

async fn confirm(warning: &str) -> Result<bool> {
    println!("{} {}", "WARNING:".yellow().bold(), warning);
    println!("Type 'yes' to confirm:");
    let mut line = String::new();
    BufReader::new(tokio::io::stdin())
        .read_line(&mut line)
        .await
        .context("Failed to read confirmation")?;
    Ok(line.trim().eq_ignore_ascii_case("yes"))
}
