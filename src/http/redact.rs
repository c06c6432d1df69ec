use reqwest::header::HeaderValue;
use serde_json::Value;

const MASK: &str = "***REDACTED***";
const SECRET_KEYS: [&str; 8] = [
    "key",
    "api_key",
    "apikey",
    "token",
    "access_token",
    "authorization",
    "secret",
    "x-api-key",
];

/// Controls the opt-in stderr logging of provider HTTP traffic.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct HttpDebugConfig {
    pub enabled: bool,
    pub redact_secrets: bool,
    pub max_body_chars: usize,
}

impl HttpDebugConfig {
    pub fn from_verbose(verbose: bool) -> Self {
        Self {
            enabled: verbose,
            redact_secrets: true,
            max_body_chars: 4_000,
        }
    }

    #[cfg(test)]
    pub fn disabled() -> Self {
        Self::from_verbose(false)
    }
}

pub fn redact_header_value(name: &str, value: &HeaderValue, enable_redaction: bool) -> String {
    if enable_redaction && is_secret_key(name) {
        return MASK.to_string();
    }

    value
        .to_str()
        .map(std::string::ToString::to_string)
        .unwrap_or_else(|_| "<non-utf8>".to_string())
}

/// Masks secret-keyed values in a JSON body. Non-JSON bodies pass through.
pub fn redact_body(raw: &str, enable_redaction: bool) -> String {
    if !enable_redaction {
        return raw.to_string();
    }

    match serde_json::from_str::<Value>(raw) {
        Ok(mut json) => {
            mask_secret_values(&mut json);
            serde_json::to_string(&json).unwrap_or_else(|_| raw.to_string())
        }
        Err(_) => raw.to_string(),
    }
}

pub fn truncate_for_log(input: &str, max_chars: usize) -> String {
    let count = input.chars().count();
    if count <= max_chars {
        return input.to_string();
    }

    let truncated = input.chars().take(max_chars).collect::<String>();
    format!("{truncated}... <truncated {} chars>", count - max_chars)
}

fn mask_secret_values(value: &mut Value) {
    match value {
        Value::Object(map) => {
            for (key, item) in map {
                if is_secret_key(key) {
                    *item = Value::String(MASK.to_string());
                } else {
                    mask_secret_values(item);
                }
            }
        }
        Value::Array(items) => {
            for item in items {
                mask_secret_values(item);
            }
        }
        _ => {}
    }
}

fn is_secret_key(key: &str) -> bool {
    let key = key.to_ascii_lowercase();
    SECRET_KEYS.iter().any(|candidate| *candidate == key)
}
