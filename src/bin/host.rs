//! Interactive console host for the reminder sill.
//!
//! Drives the whole plugin lifecycle from a terminal: reminders are managed
//! with line commands, full-screen notifications render as a console banner
//! that retires itself, and toasts print with a hint for simulating a tap.

use std::io::{self, BufRead};
use std::sync::Arc;

use anyhow::Result;
use async_trait::async_trait;
use chrono::Duration;
use dotenvy::dotenv;
use log::{info, warn};
use tokio::sync::broadcast::error::RecvError;
use tokio::sync::{mpsc, watch};
use uuid::Uuid;

use reminder_sill::{
    DisplayBounds, DisplayHost, NotificationSurface, ReminderSill, SettingsStore, SillEvent,
    SillHandle, SillViewItem, SurfaceOutcome, SurfaceRequest, SyncDirection, SyncProviderType,
    ToastHost, ToastRequest, DEFAULT_SNOOZE_MINUTES, DISPLAY_NAME,
};

/// Duration used when `add` is given no explicit one.
const DEFAULT_REMINDER_MINUTES: i64 = 30;
/// How long a console overlay waits for an answer before closing itself.
const OVERLAY_LINGER_SECS: u64 = 30;

/// Console stand-in for a full-screen overlay. The console cannot take
/// per-surface input, so the overlay retires itself after a while; the
/// reminder stays in the list either way.
struct ConsoleSurface {
    outcome_tx: watch::Sender<Option<SurfaceOutcome>>,
}

impl ConsoleSurface {
    fn new() -> Arc<Self> {
        let (outcome_tx, _) = watch::channel(None);
        let surface = Arc::new(ConsoleSurface { outcome_tx });
        let timer = surface.clone();
        tokio::spawn(async move {
            tokio::time::sleep(std::time::Duration::from_secs(OVERLAY_LINGER_SECS)).await;
            timer.settle(SurfaceOutcome::Closed);
        });
        surface
    }

    fn settle(&self, outcome: SurfaceOutcome) {
        self.outcome_tx.send_if_modified(|current| {
            if current.is_none() {
                *current = Some(outcome);
                true
            } else {
                false
            }
        });
    }
}

#[async_trait]
impl NotificationSurface for ConsoleSurface {
    async fn outcome(&self) -> SurfaceOutcome {
        let mut rx = self.outcome_tx.subscribe();
        loop {
            let current = *rx.borrow();
            if let Some(outcome) = current {
                return outcome;
            }
            if rx.changed().await.is_err() {
                return SurfaceOutcome::Closed;
            }
        }
    }

    fn close(&self) {
        self.settle(SurfaceOutcome::Closed);
    }
}

/// Pretends the terminal is a single 1920x1080 display.
struct ConsoleDisplayHost;

#[async_trait]
impl DisplayHost for ConsoleDisplayHost {
    fn displays(&self) -> Vec<DisplayBounds> {
        vec![DisplayBounds {
            x: 0,
            y: 0,
            width: 1920,
            height: 1080,
        }]
    }

    async fn show(&self, request: SurfaceRequest) -> Result<Arc<dyn NotificationSurface>> {
        let bell = if request.play_audio { "\x07" } else { "" };
        println!("{}==============================================", bell);
        println!("  REMINDER DUE: {}", request.title);
        println!("  (`delete`/`snooze` it from `list`)");
        println!("==============================================");
        Ok(ConsoleSurface::new())
    }
}

struct ConsoleToastHost;

#[async_trait]
impl ToastHost for ConsoleToastHost {
    async fn show(&self, request: ToastRequest) -> Result<()> {
        println!("(toast) Reminder due: {}", request.title);
        println!("        type `toast {}` to simulate tapping it", request.argument);
        Ok(())
    }
}

/// Forward stdin lines onto a channel the select loop can await.
fn spawn_stdin_reader() -> mpsc::UnboundedReceiver<String> {
    let (tx, rx) = mpsc::unbounded_channel();
    std::thread::spawn(move || {
        let stdin = io::stdin();
        for line in stdin.lock().lines() {
            let line = match line {
                Ok(line) => line,
                Err(_) => break,
            };
            if tx.send(line).is_err() {
                break;
            }
        }
    });
    rx
}

/// Parse durations like "45s", "10m", "2h", "1h30m". Bare numbers count as
/// minutes. Returns `None` for zero, empty, or unknown units.
fn parse_duration(input: &str) -> Option<Duration> {
    let input = input.trim().to_lowercase();
    let mut total_seconds: i64 = 0;
    let mut current_number = String::new();

    for c in input.chars() {
        if c.is_ascii_digit() {
            current_number.push(c);
        } else if !current_number.is_empty() {
            let value: i64 = current_number.parse().ok()?;
            current_number.clear();

            let seconds = match c {
                's' => value,
                'm' => value * 60,
                'h' => value * 60 * 60,
                _ => return None,
            };
            total_seconds += seconds;
        }
    }

    // Trailing bare digits count as minutes.
    if !current_number.is_empty() {
        let value: i64 = current_number.parse().ok()?;
        total_seconds += value * 60;
    }

    if total_seconds > 0 {
        Some(Duration::seconds(total_seconds))
    } else {
        None
    }
}

/// Format a duration in seconds into a human-readable string.
fn format_duration(seconds: i64) -> String {
    if seconds < 60 {
        format!("{} second{}", seconds, if seconds == 1 { "" } else { "s" })
    } else if seconds < 3600 {
        let mins = seconds / 60;
        format!("{} minute{}", mins, if mins == 1 { "" } else { "s" })
    } else {
        let hours = seconds / 3600;
        let mins = (seconds % 3600) / 60;
        if mins > 0 {
            format!(
                "{} hour{} {} minute{}",
                hours,
                if hours == 1 { "" } else { "s" },
                mins,
                if mins == 1 { "" } else { "s" }
            )
        } else {
            format!("{} hour{}", hours, if hours == 1 { "" } else { "s" })
        }
    }
}

/// Resolve a 1-based list number from the most recent `list` output.
fn lookup(listed: &[Uuid], token: &str) -> Option<Uuid> {
    let index: usize = token.parse().ok()?;
    if index == 0 {
        return None;
    }
    listed.get(index - 1).copied()
}

fn print_help() {
    println!("commands:");
    println!("  add [duration] <title>    add a reminder (default {} minutes)", DEFAULT_REMINDER_MINUTES);
    println!("  list                      show reminders with their numbers");
    println!("  delete <n>                delete reminder n from the last list");
    println!("  snooze <n> [duration]     push reminder n out (default {} minutes)", DEFAULT_SNOOZE_MINUTES);
    println!("  toast <id>                simulate tapping a posted toast");
    println!("  mode [fullscreen|toast]   show or set the notification mode");
    println!("  provider [microsoft|google|none]");
    println!("  auth / signout            sign in to or out of the provider");
    println!("  sync [on|off]             run a sync pass, or toggle syncing");
    println!("  direction [twoway|push|pull]");
    println!("  quit");
}

async fn handle_line(
    sill: &ReminderSill,
    handle: &SillHandle,
    settings: &SettingsStore,
    listed: &mut Vec<Uuid>,
    line: &str,
) -> Result<bool> {
    let mut parts = line.split_whitespace();
    let command = match parts.next() {
        Some(command) => command,
        None => return Ok(false),
    };
    let rest: Vec<&str> = parts.collect();

    match command {
        "help" => print_help(),
        "add" => {
            if rest.is_empty() {
                println!("usage: add [duration] <title>   e.g. `add 10m water the plants`");
                return Ok(false);
            }
            let (duration, title) = match parse_duration(rest[0]) {
                Some(duration) => (duration, rest[1..].join(" ")),
                None => (Duration::minutes(DEFAULT_REMINDER_MINUTES), rest.join(" ")),
            };
            if title.is_empty() {
                println!("usage: add [duration] <title>");
                return Ok(false);
            }
            let reminder = handle.add_reminder(title, duration).await?;
            println!(
                "added '{}' due in {}",
                reminder.title,
                format_duration(duration.num_seconds())
            );
        }
        "list" => {
            listed.clear();
            for item in handle.view_items().await? {
                match item {
                    SillViewItem::NewReminder => println!("[+] New reminder (use `add`)"),
                    SillViewItem::Reminder(view) => {
                        listed.push(view.id);
                        let state = if view.expired {
                            "expired".to_string()
                        } else {
                            format!("{} left", format_duration(view.remaining_secs))
                        };
                        println!("[{}] {} ({})", listed.len(), view.title, state);
                    }
                }
            }
        }
        "delete" => match rest.first().and_then(|token| lookup(listed, token)) {
            Some(id) => {
                handle.delete_reminder(id).await?;
                println!("deleted");
            }
            None => println!("usage: delete <number from `list`>"),
        },
        "snooze" => match rest.first().and_then(|token| lookup(listed, token)) {
            Some(id) => {
                let duration = rest
                    .get(1)
                    .and_then(|token| parse_duration(token))
                    .unwrap_or_else(|| Duration::minutes(DEFAULT_SNOOZE_MINUTES));
                handle.snooze_reminder(id, duration).await?;
                println!("snoozed for {}", format_duration(duration.num_seconds()));
            }
            None => println!("usage: snooze <number from `list`> [duration]"),
        },
        "toast" => match rest.first() {
            Some(argument) => handle.toast_activated(argument).await?,
            None => println!("usage: toast <id printed with the toast>"),
        },
        "mode" => match rest.first().copied() {
            Some("fullscreen") => {
                settings.set_use_full_screen_notification(true)?;
                println!("notifications set to full-screen overlays");
            }
            Some("toast") => {
                settings.set_use_full_screen_notification(false)?;
                println!("notifications set to toasts");
            }
            _ => println!(
                "mode is {} (usage: mode fullscreen|toast)",
                if settings.use_full_screen_notification() {
                    "fullscreen"
                } else {
                    "toast"
                }
            ),
        },
        "provider" => {
            let sync = sill.sync();
            match rest.first().copied() {
                Some("microsoft") => {
                    sync.set_provider(SyncProviderType::MicrosoftToDo);
                    println!("provider set to Microsoft To-Do");
                }
                Some("google") => {
                    sync.set_provider(SyncProviderType::GoogleTasks);
                    println!("provider set to Google Tasks");
                }
                Some("none") => {
                    sync.set_provider(SyncProviderType::None);
                    println!("provider cleared for this session");
                }
                _ => match sync.current_provider() {
                    Some(provider) => println!("provider is {}", provider.provider_name()),
                    None => {
                        println!("no provider selected (usage: provider microsoft|google|none)")
                    }
                },
            }
        }
        "auth" => {
            if sill.sync().authenticate().await {
                println!("authenticated");
            } else {
                println!("authentication did not complete (provider flows are placeholders)");
            }
        }
        "signout" => {
            sill.sync().sign_out().await;
            println!("signed out");
        }
        "sync" => match rest.first().copied() {
            Some("on") => {
                let mut config = settings.sync_config();
                config.enabled = true;
                settings.set_sync_config(&config)?;
                println!("sync enabled");
            }
            Some("off") => {
                let mut config = settings.sync_config();
                config.enabled = false;
                settings.set_sync_config(&config)?;
                println!("sync disabled");
            }
            None => {
                if handle.sync_now().await? {
                    println!("sync pass completed");
                } else {
                    println!("sync pass did not run (check provider, auth, and `sync on`)");
                }
            }
            Some(other) => println!("unknown sync option `{}`", other),
        },
        "direction" => {
            let chosen = match rest.first().copied() {
                Some("twoway") => Some(SyncDirection::TwoWay),
                Some("push") => Some(SyncDirection::PushOnly),
                Some("pull") => Some(SyncDirection::PullOnly),
                _ => None,
            };
            match chosen {
                Some(direction) => {
                    let mut config = settings.sync_config();
                    config.direction = direction;
                    settings.set_sync_config(&config)?;
                    println!("direction set to {:?}", direction);
                }
                None => println!(
                    "direction is {:?} (usage: direction twoway|push|pull)",
                    settings.sync_config().direction
                ),
            }
        }
        "quit" | "exit" => return Ok(true),
        other => println!("unknown command `{}`; try `help`", other),
    }
    Ok(false)
}

#[tokio::main]
async fn main() -> Result<()> {
    // Load environment variables from .env file
    dotenv().ok();

    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("info")).init();

    let settings_path =
        std::env::var("SILL_SETTINGS_PATH").unwrap_or_else(|_| "sill-settings.json".to_string());
    let settings = SettingsStore::json_file(&settings_path)?;
    info!("Using settings file {}", settings_path);

    let mut sill = ReminderSill::new(
        settings.clone(),
        Arc::new(ConsoleDisplayHost),
        Arc::new(ConsoleToastHost),
    );
    let handle = sill.on_activated();
    let mut events = handle.subscribe();

    println!("{} console host. Type `help` for commands.", DISPLAY_NAME);

    let mut lines = spawn_stdin_reader();
    let mut listed: Vec<Uuid> = Vec::new();

    loop {
        tokio::select! {
            line = lines.recv() => {
                let line = match line {
                    Some(line) => line,
                    None => break,
                };
                match handle_line(&sill, &handle, &settings, &mut listed, line.trim()).await {
                    Ok(true) => break,
                    Ok(false) => {}
                    Err(e) => println!("error: {e:#}"),
                }
            }
            event = events.recv() => {
                match event {
                    Ok(SillEvent::Expired { id }) => info!("Reminder {} expired", id),
                    Ok(_) => {}
                    Err(RecvError::Lagged(skipped)) => warn!("Dropped {} events while busy", skipped),
                    Err(RecvError::Closed) => break,
                }
            }
        }
    }

    sill.on_deactivated().await;
    Ok(())
}
