use serde::Deserialize;
use serde_json::{Value, json};

use crate::llm::provider::{MessagePart, ToolDeclaration};
use crate::properties::{LedgerError, Preferences, PropertyCapabilities, VisitRequest};

/// One tool invocation requested by the model.
#[derive(Debug, Clone)]
pub struct ToolCallSpec {
    pub id: String,
    pub name: String,
    pub input: Value,
}

pub fn tool_declarations() -> Vec<ToolDeclaration> {
    vec![
        ToolDeclaration {
            name: "search_listings".to_string(),
            description: "Search the listings database with the client's criteria. \
All four criteria apply together."
                .to_string(),
            input_schema: json!({
                "type": "object",
                "properties": {
                    "max_price": {
                        "type": "number",
                        "description": "Maximum total price in BRL"
                    },
                    "min_bedrooms": {
                        "type": "integer",
                        "description": "Minimum number of bedrooms"
                    },
                    "min_parking": {
                        "type": "integer",
                        "description": "Minimum number of parking spots"
                    },
                    "neighborhood": {
                        "type": "string",
                        "description": "Neighborhood name or fragment; empty matches every neighborhood"
                    }
                },
                "required": ["max_price", "min_bedrooms", "min_parking", "neighborhood"]
            }),
        },
        ToolDeclaration {
            name: "schedule_visit".to_string(),
            description: "Book a property visit for the client.".to_string(),
            input_schema: json!({
                "type": "object",
                "properties": {
                    "address": {
                        "type": "string",
                        "description": "Full address of the property"
                    },
                    "date": {
                        "type": "string",
                        "description": "Visit date, YYYY-MM-DD"
                    },
                    "time": {
                        "type": "string",
                        "description": "Visit time, 24-hour HH:MM"
                    },
                    "name": {
                        "type": "string",
                        "description": "Client name for the booking"
                    }
                },
                "required": ["address", "date", "time", "name"]
            }),
        },
    ]
}

/// Dispatches every requested call and pairs each with its tool-result part.
/// Invalid arguments and backend failures become error envelopes; dispatch
/// itself never fails.
pub fn dispatch_calls<C: PropertyCapabilities>(
    capabilities: &C,
    calls: &[ToolCallSpec],
) -> Vec<MessagePart> {
    calls
        .iter()
        .map(|call| {
            let content = dispatch_one(capabilities, call);
            let is_error = content["ok"] == json!(false);
            MessagePart::ToolResult {
                id: call.id.clone(),
                content,
                is_error,
            }
        })
        .collect()
}

fn dispatch_one<C: PropertyCapabilities>(capabilities: &C, call: &ToolCallSpec) -> Value {
    match call.name.as_str() {
        "search_listings" => dispatch_search(capabilities, call),
        "schedule_visit" => dispatch_schedule(capabilities, call),
        _ => error_envelope(
            "unknown_tool",
            &format!("unknown tool: {}", call.name),
        ),
    }
}

#[derive(Debug, Deserialize)]
struct SearchArgs {
    max_price: f64,
    min_bedrooms: u32,
    min_parking: u32,
    neighborhood: String,
}

fn dispatch_search<C: PropertyCapabilities>(capabilities: &C, call: &ToolCallSpec) -> Value {
    let args: SearchArgs = match serde_json::from_value(call.input.clone()) {
        Ok(args) => args,
        Err(err) => return invalid_args("search_listings", &err.to_string()),
    };

    let listings = capabilities.search(&Preferences {
        max_price: args.max_price,
        min_bedrooms: args.min_bedrooms,
        min_parking: args.min_parking,
        neighborhood: args.neighborhood,
    });

    json!({
        "ok": true,
        "result": {
            "count": listings.len(),
            "listings": listings,
        }
    })
}

#[derive(Debug, Deserialize)]
struct ScheduleArgs {
    address: String,
    date: String,
    time: String,
    name: String,
}

fn dispatch_schedule<C: PropertyCapabilities>(capabilities: &C, call: &ToolCallSpec) -> Value {
    let args: ScheduleArgs = match serde_json::from_value(call.input.clone()) {
        Ok(args) => args,
        Err(err) => return invalid_args("schedule_visit", &err.to_string()),
    };

    let visit = VisitRequest {
        address: args.address,
        date: args.date,
        time: args.time,
        name: args.name,
    };

    match capabilities.schedule(&visit) {
        Ok(()) => json!({
            "ok": true,
            "result": {
                "scheduled": true,
                "address": visit.address,
                "date": visit.date,
                "time": visit.time,
            }
        }),
        Err(err) => error_envelope(ledger_error_code(&err), &err.to_string()),
    }
}

fn ledger_error_code(err: &LedgerError) -> &'static str {
    match err {
        LedgerError::InvalidDate { .. } => "invalid_date",
        LedgerError::InvalidTime { .. } => "invalid_time",
        LedgerError::Write { .. } => "ledger_write",
    }
}

fn invalid_args(tool: &str, reason: &str) -> Value {
    error_envelope("invalid_args", &format!("{tool}: {reason}"))
}

fn error_envelope(code: &str, message: &str) -> Value {
    json!({
        "ok": false,
        "error": {
            "code": code,
            "message": message,
        }
    })
}
