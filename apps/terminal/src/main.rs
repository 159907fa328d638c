use std::sync::Arc;

use anyhow::{bail, Result};
use clap::Parser;
use client_core::{transport::DEFAULT_BASE_URL, HttpTransport, SessionController, SessionEvent};
use shared::domain::{Action, GameSnapshot, CREDIT_HOUR_CHOICES, HOMEWORK_TARGET, LAB_POINT_TARGET};
use tokio::io::{AsyncBufReadExt, BufReader};

#[derive(Parser, Debug)]
struct Args {
    /// Base URL of the simulation engine API.
    #[arg(long, default_value = DEFAULT_BASE_URL)]
    base_url: String,
    /// Player name for the session.
    #[arg(long)]
    name: String,
    /// Credit hours to enroll.
    #[arg(long, default_value_t = 12, value_parser = parse_credit_hours)]
    credit_hours: u32,
}

fn parse_credit_hours(raw: &str) -> Result<u32, String> {
    let value: u32 = raw.parse().map_err(|_| "expected a number".to_string())?;
    if CREDIT_HOUR_CHOICES.contains(&value) {
        Ok(value)
    } else {
        Err(format!("expected one of {CREDIT_HOUR_CHOICES:?}"))
    }
}

#[tokio::main]
async fn main() -> Result<()> {
    tracing_subscriber::fmt().init();
    let args = Args::parse();

    let transport = Arc::new(HttpTransport::new(args.base_url));
    let controller = SessionController::new(transport);
    let mut events = controller.subscribe_events();

    controller
        .request_start(&args.name, args.credit_hours)
        .await?;
    match events.recv().await? {
        SessionEvent::RequestFailed(message) => bail!("could not start session: {message}"),
        SessionEvent::Activated(snapshot) | SessionEvent::SnapshotReplaced(snapshot) => {
            render(&snapshot)
        }
    }

    let menu = Action::ALL.map(|action| action.wire_name()).join(" | ");
    println!("actions: {menu} (or 'status', 'quit')");

    let mut lines = BufReader::new(tokio::io::stdin()).lines();
    while let Some(line) = lines.next_line().await? {
        let token = line.trim();
        if token.is_empty() {
            continue;
        }
        if token.eq_ignore_ascii_case("quit") || token.eq_ignore_ascii_case("exit") {
            break;
        }

        let dispatched = if token.eq_ignore_ascii_case("status") {
            controller.request_status().await
        } else {
            match token.parse::<Action>() {
                Ok(action) => controller.request_action(action).await,
                Err(err) => {
                    println!("{err}; actions: {menu}");
                    continue;
                }
            }
        };
        if let Err(err) = dispatched {
            println!("!! {err}");
            continue;
        }

        match events.recv().await? {
            SessionEvent::Activated(snapshot) | SessionEvent::SnapshotReplaced(snapshot) => {
                render(&snapshot)
            }
            SessionEvent::RequestFailed(message) => println!("!! {message}"),
        }
    }

    Ok(())
}

fn render(snapshot: &GameSnapshot) {
    println!();
    println!(
        "week {} | {} | grade {}",
        snapshot.current_week, snapshot.name, snapshot.current_grade
    );
    println!(
        "  stress {:>3}% | understanding {:>3}% | risk {:>3}%",
        snapshot.stress_level, snapshot.understanding, snapshot.risk_level
    );
    println!(
        "  homework {}/{} | lab {}/{} | credits {}",
        snapshot.homework_done(),
        HOMEWORK_TARGET,
        snapshot.lab_points,
        LAB_POINT_TARGET,
        snapshot.credit_hours
    );
    if snapshot.high_stress() {
        println!("  warning: stress critically high");
    }
}
