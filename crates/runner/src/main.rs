use std::sync::Arc;

use depthwatch_clock::SystemClock;
use depthwatch_gateway::{FanoutSink, LogSink, RestClient, TelegramSink};
use depthwatch_runner::{ControlCommand, PollingScheduler, RunnerConfig, SchedulerHandle, control};
use tokio::io::{AsyncBufReadExt, BufReader};
use tokio::sync::watch;

fn print_help() {
    eprintln!(
        r#"Depthwatch - order book wall and spoofing monitor

USAGE:
    depthwatch [OPTIONS]

OPTIONS:
    --config <PATH>     Load configuration from JSON file
    --symbol <SYMBOL>   Override the startup symbol
    --help              Print this help message

ENVIRONMENT VARIABLES:
    TELEGRAM_TOKEN      Telegram bot token (overrides config)
    TELEGRAM_CHAT_ID    Telegram chat to notify (overrides config)
    RUST_LOG            Log level filter

Without Telegram credentials notifications are only logged.
Type 'help' once running for the interactive commands.
"#
    );
}

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("depthwatch=info"))
        .init();

    // Parse command line arguments
    let args: Vec<String> = std::env::args().collect();
    let mut config_path: Option<String> = None;
    let mut symbol: Option<String> = None;

    let mut i = 1;
    while i < args.len() {
        match args[i].as_str() {
            "--help" | "-h" => {
                print_help();
                return Ok(());
            }
            "--config" | "-c" => {
                i += 1;
                if i >= args.len() {
                    eprintln!("Error: --config requires a path argument");
                    std::process::exit(1);
                }
                config_path = Some(args[i].clone());
            }
            "--symbol" | "-s" => {
                i += 1;
                if i >= args.len() {
                    eprintln!("Error: --symbol requires a symbol argument");
                    std::process::exit(1);
                }
                symbol = Some(args[i].clone());
            }
            arg => {
                eprintln!("Unknown argument: {}", arg);
                print_help();
                std::process::exit(1);
            }
        }
        i += 1;
    }

    let mut config = match &config_path {
        Some(path) => {
            log::info!("Loading configuration from: {}", path);
            RunnerConfig::from_file(path)?
        }
        None => {
            log::info!("Using default configuration");
            RunnerConfig::default()
        }
    };
    if let Some(symbol) = symbol {
        config.symbol = symbol;
    }
    let config = config.with_env_overrides();
    config.validate()?;

    let source = Arc::new(RestClient::new(&config.base_url, config.request_timeout())?);
    let mut sink = FanoutSink::default();
    sink.push(Arc::new(LogSink::new()));
    match &config.telegram {
        Some(telegram) => {
            log::info!("Telegram notifications enabled for chat {}", telegram.chat_id);
            sink.push(Arc::new(TelegramSink::new(
                telegram.token.clone(),
                telegram.chat_id.clone(),
                config.request_timeout(),
            )?));
        }
        None => log::warn!("No Telegram credentials, notifications are logged only"),
    }

    let scheduler = PollingScheduler::new(
        source,
        Arc::new(sink),
        Arc::new(SystemClock::new()),
        config.initial_settings()?,
    )
    .with_jitter(Arc::new(config.jitter()))
    .with_depth_limit(config.depth_limit)
    .with_presets(config.presets());
    let handle = scheduler.handle();

    log::info!(
        "Polling {} every {}-{}ms from {}",
        handle.settings().active_symbol,
        config.poll_delay_min_ms,
        config.poll_delay_max_ms,
        config.base_url
    );

    let (shutdown_tx, shutdown_rx) = watch::channel(false);
    let driver = tokio::spawn(scheduler.run(shutdown_rx));

    let mut lines = BufReader::new(tokio::io::stdin()).lines();
    loop {
        tokio::select! {
            line = lines.next_line() => {
                match line? {
                    Some(line) if line.trim().is_empty() => continue,
                    Some(line) => {
                        if !handle_line(&handle, &line) {
                            break;
                        }
                    }
                    // stdin closed, keep polling until interrupted
                    None => {
                        tokio::signal::ctrl_c().await?;
                        break;
                    }
                }
            }
            result = tokio::signal::ctrl_c() => {
                result?;
                break;
            }
        }
    }

    log::info!("Shutting down");
    let _ = shutdown_tx.send(true);
    driver.await?;
    Ok(())
}

/// Execute one control line, returns false on quit
fn handle_line(handle: &SchedulerHandle, line: &str) -> bool {
    let command = match line.parse::<ControlCommand>() {
        Ok(command) => command,
        Err(e) => {
            println!("{}", e);
            return true;
        }
    };

    match command {
        ControlCommand::Toggle => {
            println!("Order book updates {}", handle.toggle());
        }
        ControlCommand::Pause => {
            if !handle.pause() {
                println!("Already paused");
            }
        }
        ControlCommand::Resume => {
            if !handle.resume() {
                println!("Already running");
            }
        }
        ControlCommand::Status => {
            let settings = handle.settings();
            println!(
                "{} ({}): width {}, wall {}, cancel {}, cooldown {}s",
                settings.active_symbol,
                handle.run_state(),
                settings.bucket_width,
                settings.large_wall_threshold,
                settings.cancellation_threshold,
                settings.notification_cooldown.as_secs()
            );
            println!("Presets: {}", handle.presets().symbols().join(", "));
        }
        ControlCommand::Symbol(symbol) => match handle.switch_symbol(&symbol) {
            Ok(settings) => println!("Active symbol: {}", settings.active_symbol),
            Err(e) => println!("{}", e),
        },
        ControlCommand::Set(update) => match handle.update_settings(update) {
            Ok(_) => println!("Settings saved"),
            Err(e) => println!("{}", e),
        },
        ControlCommand::Help => println!("{}", control::HELP),
        ControlCommand::Quit => return false,
    }
    true
}
