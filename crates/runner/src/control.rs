//! Text commands for the interactive control surface

use std::str::FromStr;
use std::time::Duration;

use depthwatch_core::Symbol;
use depthwatch_detector::SettingsUpdate;
use rust_decimal::Decimal;

pub const HELP: &str = "\
Commands:
    toggle                 pause or resume order book updates
    pause | resume         explicit run state
    status                 show run state and settings
    symbol <SYMBOL>        switch pair, loading its preset
    set bucket <WIDTH>     price grouping interval
    set wall <AMOUNT>      large wall threshold
    set cancel <AMOUNT>    spoofing (cancellation) threshold
    set cooldown <SECS>    wall notification cooldown
    help                   this message
    quit                   stop and exit";

/// One parsed control line
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ControlCommand {
    Toggle,
    Pause,
    Resume,
    Status,
    Symbol(Symbol),
    Set(SettingsUpdate),
    Help,
    Quit,
}

impl FromStr for ControlCommand {
    type Err = String;

    fn from_str(line: &str) -> Result<Self, Self::Err> {
        let mut words = line.split_whitespace();
        let Some(command) = words.next() else {
            return Err("empty command".to_string());
        };
        let args: Vec<&str> = words.collect();

        let command = match (command.to_ascii_lowercase().as_str(), args.as_slice()) {
            ("toggle" | "t", []) => ControlCommand::Toggle,
            ("pause" | "stop", []) => ControlCommand::Pause,
            ("resume" | "start", []) => ControlCommand::Resume,
            ("status" | "s", []) => ControlCommand::Status,
            ("help" | "h" | "?", []) => ControlCommand::Help,
            ("quit" | "exit" | "q", []) => ControlCommand::Quit,
            ("symbol", [symbol]) => ControlCommand::Symbol(symbol.to_ascii_uppercase()),
            ("set", [field, value]) => ControlCommand::Set(parse_set(field, value)?),
            ("symbol", _) => return Err("usage: symbol <SYMBOL>".to_string()),
            ("set", _) => return Err("usage: set <bucket|wall|cancel|cooldown> <value>".to_string()),
            (other, _) => return Err(format!("unknown command '{}', try 'help'", other)),
        };
        Ok(command)
    }
}

fn parse_set(field: &str, value: &str) -> Result<SettingsUpdate, String> {
    let update = SettingsUpdate::new();
    match field.to_ascii_lowercase().as_str() {
        "bucket" | "group" => Ok(update.bucket_width(parse_decimal(value)?)),
        "wall" => Ok(update.large_wall_threshold(parse_decimal(value)?)),
        "cancel" | "spoof" => Ok(update.cancellation_threshold(parse_decimal(value)?)),
        "cooldown" => value
            .parse::<u64>()
            .map(|secs| update.notification_cooldown(Duration::from_secs(secs)))
            .map_err(|_| format!("invalid cooldown '{}', expected whole seconds", value)),
        other => Err(format!(
            "unknown setting '{}', expected bucket, wall, cancel or cooldown",
            other
        )),
    }
}

fn parse_decimal(value: &str) -> Result<Decimal, String> {
    Decimal::from_str(value).map_err(|_| format!("invalid number '{}'", value))
}
