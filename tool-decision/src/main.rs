// ABOUTME: Interactive assistant that decides per message whether to answer
// ABOUTME: directly or call a fact, calculator or joke tool.

mod tools;

use std::sync::Arc;

use anyhow::Result;
use rustyline::DefaultEditor;
use serde_json::json;
use tracing_subscriber::{EnvFilter, fmt};

use frizz::prelude::*;
use tools::DemoContext;

const SYSTEM_MESSAGE: &str = "You are a helpful assistant that can answer questions, \
solve problems, and tell jokes. For factual questions use lookup_fact, for arithmetic \
use calculate, and for jokes use tell_joke. For anything else answer directly without \
using tools.";

fn build_agent(model: impl ModelClient + 'static) -> Result<Agent<DemoContext>> {
    let agent = Agent::builder(model, DemoContext)
        .system_message(SYSTEM_MESSAGE)
        .tool(tools::lookup_fact()?)
        .tool(tools::calculate()?)
        .tool(tools::tell_joke()?)
        .build()?;
    Ok(agent)
}

fn print_outcome(outcome: &StepOutcome) {
    let text = outcome.text();
    if !text.is_empty() {
        println!("Assistant: {text}");
    }
    if let Some(invocation) = &outcome.tool_invocation {
        println!("[{} {}]", invocation.tool_name, invocation.arguments);
    }
    match &outcome.tool_result {
        Some(ToolOutcome::Value(value)) => println!("  -> {value}"),
        Some(ToolOutcome::Error(error)) => println!("  -> error: {error}"),
        None => {}
    }
}

/// Replays a fixed conversation against a scripted model.
async fn run_offline() -> Result<()> {
    let script = [
        (
            "Can you tell me about Mars?",
            Decision::use_tool("lookup_fact", json!({"query": "Mars"}))
                .with_text("Let me look that up."),
        ),
        (
            "What's 235 + 489?",
            Decision::use_tool("calculate", json!({"operation": "add", "a": 235, "b": 489})),
        ),
        (
            "Tell me a programming joke",
            Decision::use_tool("tell_joke", json!({"topic": "programming"})),
        ),
        (
            "And 10 divided by 0?",
            Decision::use_tool(
                "calculate",
                json!({"operation": "divide", "a": 10, "b": 0}),
            ),
        ),
        (
            "How are you today?",
            Decision::respond("I'm doing well, thanks for asking!"),
        ),
    ];

    let model = Arc::new(ScriptedModel::with_decisions(
        script.iter().map(|(_, decision)| decision.clone()),
    ));
    let mut agent = build_agent(model)?;
    tracing::info!(steps = script.len(), "running offline script");

    for (message, _) in &script {
        println!("\nUser: {message}");
        let outcome = agent.step(*message).await?;
        print_outcome(&outcome);
    }

    println!("\n{} turns recorded.", agent.conversation().len());
    Ok(())
}

async fn run_interactive() -> Result<()> {
    let client = OpenAiClient::from_env()?;
    tracing::info!(
        model = %client.config().model,
        base_url = %client.config().base_url,
        "using chat-completions endpoint"
    );

    let mut agent = build_agent(client)?;
    let mut rl = DefaultEditor::new()?;

    let tools = agent.registry().list();
    println!("Tools: {}", tools.join(", "));
    println!("Type 'quit' to exit, 'retry' to re-run a failed step.\n");

    loop {
        let line = match rl.readline("> ") {
            Ok(line) => line,
            Err(_) => break,
        };

        let line = line.trim();
        if line.is_empty() {
            continue;
        }
        if line == "quit" || line == "exit" {
            break;
        }

        let _ = rl.add_history_entry(line);

        let result = if line == "retry" {
            agent.retry().await
        } else {
            agent.step(line).await
        };

        match result {
            Ok(outcome) => print_outcome(&outcome),
            Err(e) if e.is_retryable() => println!("{e} (type 'retry' to try again)"),
            Err(e) => println!("{e}"),
        }
        println!();
    }

    Ok(())
}

#[tokio::main]
async fn main() -> Result<()> {
    // .env may set RUST_LOG as well as the API settings.
    dotenvy::dotenv().ok();

    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info"));
    fmt().with_env_filter(filter).init();

    if std::env::args().any(|arg| arg == "--offline") {
        run_offline().await
    } else {
        run_interactive().await
    }
}
