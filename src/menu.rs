//! Interactive terminal menu.
//!
//! A numbered-option loop over stdin: run one cycle, start or stop the
//! schedule, show status, help, exit. Start and stop consult the running
//! flag first, so the two actions stay mutually exclusive from the
//! user's point of view.

use chrono::Local;
use std::io::{self, Write};
use tokio::io::{AsyncBufReadExt, BufReader};

use crate::config::Config;
use crate::scheduler::Scheduler;

/// Run the menu loop until the user exits or stdin closes.
pub async fn run(config: &Config, scheduler: &mut Scheduler) -> io::Result<()> {
    let stdin = BufReader::new(tokio::io::stdin());
    let mut lines = stdin.lines();

    loop {
        print_header();
        print_status(config, scheduler.is_running());
        print_options();
        print!("\nOption: ");
        io::stdout().flush()?;

        let Some(line) = lines.next_line().await? else {
            // stdin closed (piped input ran out); shut down cleanly.
            break;
        };

        match line.trim() {
            "1" => {
                println!("\nRunning a single cycle; this can take a few minutes...");
                scheduler.run_once().await;
                println!("Cycle finished.");
            }
            "2" => {
                if scheduler.is_running() {
                    println!("\nScheduler is already running.");
                } else {
                    scheduler.start();
                    println!("\nScheduler started. Dispatching every hour in the background.");
                }
            }
            "3" => {
                if scheduler.is_running() {
                    scheduler.stop().await;
                    println!("\nScheduler stopped.");
                } else {
                    println!("\nScheduler is not running.");
                }
            }
            "4" => {
                // Status is re-printed at the top of the next iteration.
            }
            "5" => print_help(),
            "0" => {
                if scheduler.is_running() {
                    scheduler.stop().await;
                }
                println!("\nBye.");
                break;
            }
            other => println!("\nUnknown option: {other:?}"),
        }
    }

    Ok(())
}

fn print_header() {
    println!("\n==============================================");
    println!("  promo_radar - marketplace offer watcher");
    println!("==============================================");
}

fn print_status(config: &Config, running: bool) {
    println!("\nConfiguration:");
    print_presence("  marketplace account", config.marketplace.email.is_some());
    print_presence(
        "  marketplace password",
        config.marketplace.password.is_some(),
    );
    print_presence("  mail account", config.mail.username.is_some());
    print_presence("  mail app password", config.mail.password.is_some());
    print_presence("  messenger destination", config.messenger.phone.is_some());
    println!("  affiliate id: {}", config.affiliate_id);
    println!(
        "  email channel: {} ({} recipients)",
        on_off(config.mail.enabled),
        config.mail.recipients.len()
    );
    println!(
        "  message channel: {}",
        on_off(config.messenger.enabled)
    );
    println!(
        "  caps: {} per search, {} per dispatch",
        config.search.max_products_per_search, config.search.max_total
    );
    println!(
        "  interval: every {} minutes",
        config.schedule.send_interval.as_secs() / 60
    );
    println!(
        "\nScheduler: {}",
        if running { "ACTIVE" } else { "stopped" }
    );
    println!("Local time: {}", Local::now().format("%d/%m/%Y %H:%M:%S"));
}

fn print_presence(label: &str, present: bool) {
    println!("{label}: {}", if present { "set" } else { "not set" });
}

fn on_off(enabled: bool) -> &'static str {
    if enabled { "enabled" } else { "disabled" }
}

fn print_options() {
    println!("\nOptions:");
    println!("  1. Run a single cycle now");
    println!("  2. Start the hourly schedule");
    println!("  3. Stop the schedule");
    println!("  4. Refresh status");
    println!("  5. Help");
    println!("  0. Exit");
}

fn print_help() {
    println!(
        r#"
Setup:
  Copy .env.example to .env and fill in your credentials. Required keys
  per feature:
    marketplace login  MERCADOLIVRE_EMAIL, MERCADOLIVRE_PASSWORD
    email channel      GMAIL_EMAIL, GMAIL_PASSWORD (app password),
                       EMAIL_RECIPIENTS (comma-separated)
    message channel    WHATSAPP_PHONE (+5511999999999 style),
                       MESSENGER_API_URL
    affiliate links    AFFILIATE_ID

How it works:
  Each cycle searches promotion-filtered keywords per category plus a few
  popular terms, dedupes by title, ranks by discount, and sends the top
  results: all of them by email, the best few as individual messages.

Scheduling:
  The schedule dispatches once per hour in the background. Searches keep
  running even when the marketplace login fails; you just get public
  pricing. Stop the schedule before exiting to let an in-flight cycle
  finish.
"#
    );
}
