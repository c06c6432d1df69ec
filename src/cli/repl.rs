use std::io::{self, BufRead, Write};

use anyhow::Result;
use crossterm::style::Stylize;
use serde_json::json;

use crate::agent::{AgentConfig, AgentEvent, run_direct_turn, run_tool_turn};
use crate::cli::args::AgentMode;
use crate::cli::commands::{Command, HELP_TEXT, is_command_line, parse_command};
use crate::llm::anthropic::AnthropicProvider;
use crate::properties::{Preferences, PropertyCapabilities, PropertyDesk};
use crate::session::ChatSession;
use crate::trace::SessionTrace;

/// Opening request sent on the user's behalf, mirroring the first thing a
/// client asks after setting preferences.
const OPENING_PROMPT: &str = "Please show me the available listings for my preferences.";

pub struct AppState {
    pub mode: AgentMode,
    pub session_id: String,
    pub desk: PropertyDesk,
    pub provider: Option<AnthropicProvider>,
    pub prefs: Preferences,
    pub chat: ChatSession,
    pub agent_config: AgentConfig,
    pub trace: SessionTrace,
    pub show_steps: bool,
}

pub async fn run_repl(state: &mut AppState) -> Result<()> {
    println!("{}", "imobchat — São Paulo real-estate assistant".bold());
    println!("Type /help for commands; exit or quit leaves the session.\n");
    print_prefs(&state.prefs);
    println!();

    respond(state, OPENING_PROMPT).await;

    let stdin = io::stdin();
    loop {
        print!("{} ", "you>".cyan().bold());
        io::stdout().flush()?;

        let mut line = String::new();
        match stdin.lock().read_line(&mut line) {
            Ok(0) => break,
            Ok(_) => {}
            Err(err) => return Err(err.into()),
        }

        let line = line.trim();
        if line.is_empty() {
            continue;
        }
        if line.eq_ignore_ascii_case("exit") || line.eq_ignore_ascii_case("quit") {
            break;
        }

        if is_command_line(line) {
            handle_command(state, line);
        } else {
            respond(state, line).await;
        }
    }

    Ok(())
}

async fn respond(state: &mut AppState, question: &str) {
    state.trace.log_chat_input(question);

    let Some(provider) = &state.provider else {
        println!(
            "{}",
            "Assistant unavailable: missing ANTHROPIC_API_KEY. Configure it in your shell, \
.env file or config.toml."
                .yellow()
        );
        return;
    };

    let trace = state.trace.clone();
    let show_steps = state.show_steps;
    let result = match state.mode {
        AgentMode::Tools => {
            run_tool_turn(
                provider,
                &state.desk,
                &state.prefs,
                state.chat.turns(),
                question,
                &state.agent_config,
                &mut |event| report_agent_event(&trace, show_steps, &event),
            )
            .await
        }
        AgentMode::Direct => {
            let matching = state.desk.search(&state.prefs);
            run_direct_turn(
                provider,
                &state.prefs,
                &matching,
                state.chat.turns(),
                question,
                &state.agent_config,
            )
            .await
        }
    };

    match result {
        Ok(answer) => {
            state.trace.log_chat_output(&answer.text);
            println!("{} {}", "ai>".green().bold(), answer.text);
            state.chat.record_human(question);
            state.chat.record_assistant(answer.text.as_str());
        }
        Err(err) => {
            let message = format!("Assistant request failed: {err}");
            state.trace.log_chat_output(&message);
            println!("{} {}", "ai>".red(), message);
        }
    }
}

fn report_agent_event(trace: &SessionTrace, show_steps: bool, event: &AgentEvent) {
    match event {
        AgentEvent::StepStarted { .. } => {}
        AgentEvent::ToolRequested { name, input, .. } => {
            trace.log_tool_call(name, input);
            if show_steps {
                println!("{}", format!("  · {name} {input}").dim());
            }
        }
        AgentEvent::ToolCompleted { name, result, .. } => {
            trace.log_tool_result(name, result);
        }
    }
}

fn handle_command(state: &mut AppState, line: &str) {
    let command = match parse_command(line) {
        Ok(command) => command,
        Err(err) => {
            println!("{}", err.message().to_string().yellow());
            return;
        }
    };

    match command {
        Command::Help => println!("{HELP_TEXT}"),
        Command::Prefs => print_prefs(&state.prefs),
        Command::Clear => {
            state.chat.clear();
            println!("Conversation history cleared.");
        }
        Command::Trace => println!("{}", state.trace.file_path().display()),
        Command::Schedule(visit) => {
            state.trace.log_tool_call(
                "schedule_visit",
                &json!({
                    "address": visit.address,
                    "date": visit.date,
                    "time": visit.time,
                    "name": visit.name,
                }),
            );
            match state.desk.schedule(&visit) {
                Ok(()) => println!(
                    "Visit booked: {} on {} at {} for {}.",
                    visit.address, visit.date, visit.time, visit.name
                ),
                Err(err) => println!("{}", format!("Could not book the visit: {err}").red()),
            }
        }
    }
}

fn print_prefs(prefs: &Preferences) {
    let neighborhood = if prefs.neighborhood.trim().is_empty() {
        "(any)"
    } else {
        prefs.neighborhood.trim()
    };
    println!(
        "Preferences: bedrooms >= {}, parking >= {}, price <= R$ {}, neighborhood ~ {}",
        prefs.min_bedrooms, prefs.min_parking, prefs.max_price, neighborhood
    );
}
