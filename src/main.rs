use std::io::Write;

use color_eyre::Result;
use tokio::io::{AsyncBufReadExt, BufReader};
use tracing_subscriber::{fmt, layer::SubscriberExt, util::SubscriberInitExt, EnvFilter};

use domchat::config::ClientConfig;
use domchat::labels::{message_time_label, relative_date_label_now};
use domchat::models::{LengthHint, MessageBody, MessageRole};
use domchat::session::{ConversationSessionController, SendOutcome};
use domchat::traits::HttpClient;

const VERSION: &str = env!("CARGO_PKG_VERSION");

const HELP: &str = "\
Commands:
  /new                 start a new conversation
  /list                list conversations in this domain
  /open N              open conversation N from /list
  /delete N            delete conversation N from /list
  /length short|medium|long
                       set the reply length
  /history             print the current conversation
  /quit                exit
Anything else is sent to the current conversation.";

/// Logs go to stderr so they never interleave with the reply on stdout.
fn init_logging() {
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("domchat=info"));

    tracing_subscriber::registry()
        .with(filter)
        .with(
            fmt::layer()
                .with_writer(std::io::stderr)
                .with_target(false),
        )
        .init();
}

type Lines = tokio::io::Lines<BufReader<tokio::io::Stdin>>;

async fn prompt(lines: &mut Lines, label: &str) -> Result<Option<String>> {
    print!("{}", label);
    std::io::stdout().flush()?;
    Ok(lines.next_line().await?)
}

fn print_notifications<C: HttpClient + 'static>(session: &mut ConversationSessionController<C>) {
    for notification in session.take_notifications() {
        if notification.is_error() {
            eprintln!("✗ {}: {}", notification.title, notification.description);
            if let Some(hint) = &notification.hint {
                let again = if notification.retryable { " (retrying may help)" } else { "" };
                eprintln!("  {}{}", hint, again);
            }
        } else {
            println!("✓ {}: {}", notification.title, notification.description);
        }
    }
}

fn print_conversations<C: HttpClient + 'static>(session: &ConversationSessionController<C>) {
    let state = session.state();
    if state.conversations.is_empty() {
        println!("No conversations yet. Type /new to start one.");
        return;
    }
    for (i, conversation) in state.conversations.iter().enumerate() {
        let marker = if state.is_current(&conversation.id) { '*' } else { ' ' };
        println!(
            "{}{:>3}. {}  [{}]",
            marker,
            i + 1,
            session.title_for(conversation),
            relative_date_label_now(conversation.last_activity()),
        );
        println!("       {}", session.preview_for(conversation));
    }
}

fn print_history<C: HttpClient + 'static>(session: &ConversationSessionController<C>) {
    let state = session.state();
    let Some(conversation) = state.current_conversation() else {
        println!("No conversation open.");
        return;
    };
    println!("── {} ──", session.title_for(conversation));
    for message in &state.messages {
        let who = match message.role {
            MessageRole::User => "you",
            MessageRole::Assistant => "assistant",
        };
        let time = message_time_label(message.timestamp);
        match &message.body {
            MessageBody::Text(text) => println!("[{}] {}: {}", time, who, text),
            MessageBody::Image { url, caption } => match caption {
                Some(caption) => println!("[{}] {}: [image] {} ({})", time, who, caption, url),
                None => println!("[{}] {}: [image] {}", time, who, url),
            },
        }
    }
}

/// Resolve a 1-based index from `/list` to a conversation id.
fn nth_conversation<C: HttpClient + 'static>(
    session: &ConversationSessionController<C>,
    arg: &str,
) -> Option<String> {
    let n: usize = arg.trim().parse().ok()?;
    session
        .state()
        .conversations
        .get(n.checked_sub(1)?)
        .map(|c| c.id.clone())
}

#[tokio::main]
async fn main() -> Result<()> {
    if std::env::args().any(|arg| arg == "--version") {
        println!("domchat {}", VERSION);
        return Ok(());
    }

    color_eyre::install()?;
    init_logging();

    let config = ClientConfig::from_env();
    tracing::info!(base_url = %config.base_url, "Starting domchat");

    let mut session = ConversationSessionController::from_config(&config)?;
    let mut lines = BufReader::new(tokio::io::stdin()).lines();

    if session.load_domains().await.is_err() {
        print_notifications(&mut session);
        std::process::exit(1);
    }

    let domains = session.state().domains.clone();
    if domains.is_empty() {
        eprintln!("The backend offers no domains.");
        std::process::exit(1);
    }

    println!("Domains:");
    for (i, domain) in domains.iter().enumerate() {
        let kind = if domain.is_specialized() { "" } else { " (general)" };
        match &domain.description {
            Some(description) => {
                println!("{:>3}. {} {}{} - {}", i + 1, domain.icon.glyph(), domain.name, kind, description)
            }
            None => println!("{:>3}. {} {}{}", i + 1, domain.icon.glyph(), domain.name, kind),
        }
    }

    let domain = loop {
        let Some(line) = prompt(&mut lines, "Pick a domain: ").await? else {
            return Ok(());
        };
        match line.trim().parse::<usize>() {
            Ok(n) if (1..=domains.len()).contains(&n) => break domains[n - 1].clone(),
            _ => println!("Enter a number between 1 and {}.", domains.len()),
        }
    };

    if let Some(hint) = domain.generation_hint() {
        println!("{}", hint);
    }
    let _ = session.enter_domain(domain).await;
    print_notifications(&mut session);
    print_conversations(&session);
    println!("{}", HELP);

    let mut hint = LengthHint::default();

    while let Some(line) = prompt(&mut lines, "> ").await? {
        let line = line.trim();
        if line.is_empty() {
            continue;
        }

        let (command, arg) = line.split_once(' ').unwrap_or((line, ""));
        match command {
            "/quit" | "/exit" => break,
            "/help" => println!("{}", HELP),
            "/list" => {
                let _ = session.refresh_conversations().await;
                print_conversations(&session);
            }
            "/new" => {
                if session.create_conversation().await.is_ok() {
                    println!("Started a new conversation.");
                }
            }
            "/open" => match nth_conversation(&session, arg) {
                Some(id) => {
                    if session.select_conversation(&id).await.is_ok() {
                        print_history(&session);
                    }
                }
                None => println!("Usage: /open N (see /list)"),
            },
            "/delete" => match nth_conversation(&session, arg) {
                Some(id) => {
                    let _ = session.delete_conversation(&id).await;
                }
                None => println!("Usage: /delete N (see /list)"),
            },
            "/length" => match arg.parse::<LengthHint>() {
                Ok(parsed) => {
                    hint = parsed;
                    println!("Reply length: {}", hint);
                }
                Err(e) => println!("{}", e),
            },
            "/history" => print_history(&session),
            _ if command.starts_with('/') => println!("Unknown command. Type /help."),
            _ => {
                if session.state().current_conversation().is_none() {
                    println!("No conversation open. Type /new or /open N.");
                    continue;
                }
                let outcome = session
                    .send_message_with(line, hint, |chunk| {
                        print!("{}", chunk);
                        let _ = std::io::stdout().flush();
                    })
                    .await;
                println!();
                if outcome == SendOutcome::Rejected {
                    println!("Still waiting for the previous reply.");
                }
            }
        }

        print_notifications(&mut session);
    }

    Ok(())
}
