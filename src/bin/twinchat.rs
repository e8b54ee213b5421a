//! Interactive terminal chat with a Digital Twin backend.
//!
//! This binary provides a REPL interface for conversing with the Digital
//! Twin service: each submitted line becomes exactly one `POST /chat`
//! exchange, rendered as chat bubbles with a typing indicator while the
//! reply is pending.
//!
//! # Usage
//!
//! ```bash
//! # Talk to a backend on localhost:8000
//! twinchat
//!
//! # Point at a deployed backend
//! twinchat --url https://twin.example.com
//!
//! # Disable colors (useful for piping output)
//! twinchat --no-color
//! ```
//!
//! The backend URL can also come from the TWINCHAT_URL environment
//! variable; the flag wins when both are set.
//!
//! # Commands
//!
//! While chatting, you can use slash commands:
//! - `/help` - Show available commands
//! - `/new` - Start a fresh conversation
//! - `/history` - Show the conversation recorded by the backend
//! - `/stats` - Show widget statistics
//! - `/health` - Check backend health
//! - `/quit` - Exit the application

use std::sync::Arc;
use std::sync::atomic::{AtomicBool, Ordering};

use arrrg::CommandLine;
use rustyline::DefaultEditor;
use rustyline::error::ReadlineError;
use time::UtcOffset;

use twinchat::chat::{
    ChatArgs, ChatCommand, ChatConfig, ChatWidget, Renderer, TerminalRenderer, TurnOutcome,
    help_text, parse_command,
};
use twinchat::{ChatRequest, ChatResponse, ClientLogger, Error, TwinClient};

/// Page chrome around the chat widget.
const PAGE_TITLE: &str = "AI in Production";
const PAGE_SUBTITLE: &str = "Deploy your Digital Twin to the cloud";
const WIDGET_HEADER: &str = "AI Digital Twin";
const WIDGET_TAGLINE: &str = "Your AI course companion";
const PAGE_FOOTER: &str = "Week 2: Building Your Digital Twin";

/// Logger used by --verbose to mirror chat traffic onto stderr.
struct StderrLogger;

impl ClientLogger for StderrLogger {
    fn log_request(&self, request: &ChatRequest) {
        let body = serde_json::to_string(request)
            .unwrap_or_else(|_| "(unserializable request)".to_string());
        eprintln!("twinchat: request: {body}");
    }

    fn log_reply(&self, reply: &ChatResponse) {
        let body =
            serde_json::to_string(reply).unwrap_or_else(|_| "(unserializable reply)".to_string());
        eprintln!("twinchat: reply: {body}");
    }

    fn log_failure(&self, error: &Error) {
        eprintln!("twinchat: failure: {error}");
    }
}

/// Main entry point for the twinchat application.
fn main() -> Result<(), Box<dyn std::error::Error>> {
    // The local offset has to be read before the runtime spawns worker
    // threads; the time crate refuses the lookup in a multi-threaded
    // process.
    let local_offset = UtcOffset::current_local_offset().unwrap_or(UtcOffset::UTC);

    let runtime = tokio::runtime::Builder::new_multi_thread()
        .enable_all()
        .build()?;
    runtime.block_on(run(local_offset))
}

async fn run(local_offset: UtcOffset) -> Result<(), Box<dyn std::error::Error>> {
    let (args, _) = ChatArgs::from_command_line_relaxed("twinchat [OPTIONS]");
    let config = ChatConfig::from(args);

    let mut client = TwinClient::with_options(Some(config.base_url.clone()), Some(config.timeout))?;
    if config.verbose {
        client.set_logger(Arc::new(StderrLogger));
    }
    let mut widget = ChatWidget::new();
    let mut renderer = TerminalRenderer::with_color(config.width, local_offset, config.use_color);
    let mut rl = DefaultEditor::new()?;

    // Flag for interrupts that arrive while a turn is in flight
    let interrupted = Arc::new(AtomicBool::new(false));

    // Set up Ctrl+C handler
    let interrupted_clone = interrupted.clone();
    ctrlc::set_handler(move || {
        interrupted_clone.store(true, Ordering::Relaxed);
    })?;

    print_page_frame(&config);
    if config.probe_on_start {
        probe_backend(&client, &mut renderer).await;
    }
    renderer.render_greeting();

    loop {
        // Reset interrupt flag before each input
        interrupted.store(false, Ordering::Relaxed);

        let readline = rl.readline("You: ");

        match readline {
            Ok(line) => {
                let trimmed = line.trim();
                if trimmed.is_empty() {
                    continue;
                }

                let _ = rl.add_history_entry(trimmed);

                // Check for slash commands
                if let Some(cmd) = parse_command(trimmed) {
                    match cmd {
                        ChatCommand::Quit => {
                            println!("Goodbye!");
                            break;
                        }
                        ChatCommand::New => {
                            widget = ChatWidget::new();
                            renderer.print_info("Started a fresh conversation.");
                            renderer.render_greeting();
                        }
                        ChatCommand::History => {
                            show_history(&client, &widget, &mut renderer).await;
                        }
                        ChatCommand::Stats => {
                            print_stats(&widget, &config);
                        }
                        ChatCommand::Health => {
                            show_health(&client, &mut renderer).await;
                        }
                        ChatCommand::Help => {
                            for line in help_text().lines() {
                                println!("    {}", line);
                            }
                        }
                        ChatCommand::Invalid(message) => {
                            renderer.print_error(&message);
                        }
                    }
                    continue;
                }

                // Regular message - exactly one turn against the backend.
                // The raw line is submitted; trimming only gated emptiness.
                widget.set_input(line.as_str());
                renderer.erase_prompt_echo();
                match widget.submit_turn(&client, &mut renderer).await {
                    TurnOutcome::Failed(error) if config.verbose => {
                        eprintln!("twinchat: turn failed: {error}");
                    }
                    _ => {}
                }

                if interrupted.load(Ordering::Relaxed) {
                    renderer.print_info("(use /quit to exit)");
                }
            }
            Err(ReadlineError::Interrupted) => {
                // Ctrl+C at prompt - soft interrupt
                println!();
                continue;
            }
            Err(ReadlineError::Eof) => {
                // Ctrl+D - exit
                println!("\nGoodbye!");
                break;
            }
            Err(err) => {
                renderer.print_error(&format!("Input error: {}", err));
                break;
            }
        }
    }

    Ok(())
}

fn print_page_frame(config: &ChatConfig) {
    let width = config.width;
    println!("{}", "=".repeat(width));
    println!("{:^width$}", PAGE_TITLE);
    println!("{:^width$}", PAGE_SUBTITLE);
    println!("{}", "-".repeat(width));
    println!("{:^width$}", format!("{WIDGET_HEADER} - {WIDGET_TAGLINE}"));
    println!("{:^width$}", PAGE_FOOTER);
    println!("{}", "=".repeat(width));
    println!("Type /help for commands, /quit to exit");
}

async fn probe_backend(client: &TwinClient, renderer: &mut TerminalRenderer) {
    match client.service_info().await {
        Ok(info) => {
            let model = info.ai_model.as_deref().unwrap_or("unknown model");
            let storage = info.storage.as_deref().unwrap_or("unknown");
            renderer.print_info(&format!(
                "Connected to {} ({model}, {storage} storage)",
                client.base_url()
            ));
        }
        Err(error) => {
            renderer.print_info(&format!(
                "Backend at {} is not answering yet ({error}); turns will fail until it is up.",
                client.base_url()
            ));
        }
    }
}

async fn show_health(client: &TwinClient, renderer: &mut TerminalRenderer) {
    match client.health().await {
        Ok(health) => {
            let verdict = if health.is_healthy() {
                "healthy"
            } else {
                "unhealthy"
            };
            let model = health.bedrock_model.as_deref().unwrap_or("unknown model");
            renderer.print_info(&format!(
                "Backend reports {verdict} (status: {}, model: {model})",
                health.status
            ));
        }
        Err(error) => {
            renderer.print_error(&format!("Health check failed: {error}"));
        }
    }
}

async fn show_history(client: &TwinClient, widget: &ChatWidget, renderer: &mut TerminalRenderer) {
    let Some(session_id) = widget.session_id() else {
        renderer.print_info("No session established yet; say something first.");
        return;
    };

    match client.conversation(session_id).await {
        Ok(history) if history.messages.is_empty() => {
            renderer.print_info("The backend has no messages recorded for this session.");
        }
        Ok(history) => {
            renderer.print_info(&format!(
                "Conversation recorded by the backend for session {}:",
                history.session_id
            ));
            renderer.render_transcript(&history.messages);
        }
        Err(error) => {
            renderer.print_error(&format!("Failed to fetch history: {error}"));
        }
    }
}

fn print_stats(widget: &ChatWidget, config: &ChatConfig) {
    let stats = widget.stats();
    println!("    Session Statistics:");
    println!("      Backend: {}", config.base_url);
    println!(
        "      Session id: {}",
        stats.session_id.as_deref().unwrap_or("(not established)")
    );
    println!("      Messages: {}", stats.message_count);
    println!(
        "      Turns: {} completed / {} failed",
        stats.turns_completed, stats.turns_failed
    );
    match stats.last_turn_duration {
        Some(duration) => println!("      Last turn: {:.2}s", duration.as_secs_f64()),
        None => println!("      Last turn: (none)"),
    }
}
