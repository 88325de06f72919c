// ABOUTME: Demo tools - fact lookup, calculator and joke teller - sharing a
// ABOUTME: small in-memory knowledge base passed as the agent context.

use std::sync::Arc;

use serde::{Deserialize, Serialize};
use serde_json::json;

use frizz::prelude::*;

struct FactEntry {
    key: &'static str,
    fact: &'static str,
    source: &'static str,
    confidence: f64,
}

const FACTS: &[FactEntry] = &[
    FactEntry {
        key: "earth",
        fact: "Earth is the third planet from the Sun and the only astronomical object known to harbor life.",
        source: "NASA",
        confidence: 1.0,
    },
    FactEntry {
        key: "mars",
        fact: "Mars is the fourth planet from the Sun and the second-smallest planet in the Solar System.",
        source: "NASA",
        confidence: 1.0,
    },
    FactEntry {
        key: "jupiter",
        fact: "Jupiter is the fifth planet from the Sun and the largest in the Solar System.",
        source: "NASA",
        confidence: 1.0,
    },
    FactEntry {
        key: "water",
        fact: "Water covers about 71% of the Earth's surface.",
        source: "USGS",
        confidence: 0.99,
    },
    FactEntry {
        key: "eiffel tower",
        fact: "The Eiffel Tower was completed in 1889 and stands 324 meters tall.",
        source: "Official Eiffel Tower website",
        confidence: 1.0,
    },
];

const JOKES: &[(&str, &str)] = &[
    (
        "programming",
        "Why do programmers prefer dark mode? Because light attracts bugs!",
    ),
    ("math", "Why was six afraid of seven? Because seven eight nine!"),
    ("food", "What do you call a fake noodle? An impasta!"),
    ("animals", "What do you call a bear with no teeth? A gummy bear!"),
];

const DEFAULT_JOKE: &str =
    "Why did the scarecrow win an award? Because he was outstanding in his field!";

/// Shared state handed to every tool.
#[derive(Default)]
pub struct DemoContext;

impl DemoContext {
    fn lookup_fact(&self, query: &str) -> FactResult {
        let query = query.to_lowercase();
        FACTS
            .iter()
            .find(|entry| query.contains(entry.key))
            .map(|entry| FactResult {
                fact: entry.fact.to_string(),
                source: Some(entry.source.to_string()),
                confidence: entry.confidence,
            })
            .unwrap_or_else(|| FactResult {
                fact: "I don't have specific information about that.".to_string(),
                source: None,
                confidence: 0.1,
            })
    }

    fn joke_about(&self, topic: &str) -> &'static str {
        let topic = topic.to_lowercase();
        JOKES
            .iter()
            .find(|(key, _)| topic.contains(key))
            .map(|(_, joke)| *joke)
            .unwrap_or(DEFAULT_JOKE)
    }
}

#[derive(Debug, Deserialize)]
struct FactLookupParams {
    query: String,
}

impl ToolParameters for FactLookupParams {
    fn schema() -> serde_json::Value {
        json!({
            "type": "object",
            "properties": {
                "query": {"type": "string", "description": "The fact to look up"}
            },
            "required": ["query"]
        })
    }
}

#[derive(Debug, Serialize)]
struct FactResult {
    fact: String,
    source: Option<String>,
    confidence: f64,
}

#[derive(Debug, Clone, Copy, Deserialize, Serialize)]
#[serde(rename_all = "lowercase")]
enum Operation {
    Add,
    Subtract,
    Multiply,
    Divide,
}

#[derive(Debug, Deserialize)]
struct CalculatorParams {
    operation: Operation,
    a: f64,
    b: f64,
}

impl ToolParameters for CalculatorParams {
    fn schema() -> serde_json::Value {
        json!({
            "type": "object",
            "properties": {
                "operation": {
                    "type": "string",
                    "enum": ["add", "subtract", "multiply", "divide"],
                    "description": "The arithmetic operation to perform"
                },
                "a": {"type": "number", "description": "First operand"},
                "b": {"type": "number", "description": "Second operand"}
            },
            "required": ["operation", "a", "b"]
        })
    }
}

#[derive(Debug, Serialize)]
struct CalculatorResult {
    result: f64,
    operation: Operation,
}

#[derive(Debug, Deserialize)]
struct JokeParams {
    topic: String,
    #[serde(default = "family_friendly")]
    safe_mode: bool,
}

fn family_friendly() -> bool {
    true
}

impl ToolParameters for JokeParams {
    fn schema() -> serde_json::Value {
        json!({
            "type": "object",
            "properties": {
                "topic": {"type": "string", "description": "Topic for the joke"},
                "safe_mode": {
                    "type": "boolean",
                    "description": "Whether to ensure the joke is family-friendly"
                }
            },
            "required": ["topic"]
        })
    }
}

#[derive(Debug, Serialize)]
struct JokeResult {
    joke: String,
    #[serde(rename = "type")]
    kind: &'static str,
    safe_mode: bool,
}

pub fn lookup_fact() -> anyhow::Result<ToolDescriptor<DemoContext>> {
    Ok(ToolDescriptor::builder("lookup_fact")
        .description(
            "Look up a fact about the given query. Use this for factual questions about \
             astronomy, geography, biology, history, or other general knowledge.",
        )
        .parameters_of::<FactLookupParams>()
        .handler(|ctx: Arc<DemoContext>, params: FactLookupParams| async move {
            Ok::<_, anyhow::Error>(ctx.lookup_fact(&params.query))
        })
        .build()?)
}

pub fn calculate() -> anyhow::Result<ToolDescriptor<DemoContext>> {
    Ok(ToolDescriptor::builder("calculate")
        .description(
            "Perform an arithmetic operation on two numbers. Use this when the user \
             wants a calculation done.",
        )
        .parameters_of::<CalculatorParams>()
        .handler(|_ctx: Arc<DemoContext>, p: CalculatorParams| async move {
            let result = match p.operation {
                Operation::Add => p.a + p.b,
                Operation::Subtract => p.a - p.b,
                Operation::Multiply => p.a * p.b,
                Operation::Divide if p.b == 0.0 => anyhow::bail!("Division by zero"),
                Operation::Divide => p.a / p.b,
            };
            Ok(CalculatorResult {
                result,
                operation: p.operation,
            })
        })
        .build()?)
}

pub fn tell_joke() -> anyhow::Result<ToolDescriptor<DemoContext>> {
    Ok(ToolDescriptor::builder("tell_joke")
        .description(
            "Tell a joke about the given topic. Use this only when the user explicitly \
             asks for a joke or humor.",
        )
        .parameters_of::<JokeParams>()
        .handler(|ctx: Arc<DemoContext>, p: JokeParams| async move {
            Ok::<_, anyhow::Error>(JokeResult {
                joke: ctx.joke_about(&p.topic).to_string(),
                kind: "one-liner",
                safe_mode: p.safe_mode,
            })
        })
        .build()?)
}
