use crate::properties::Preferences;

/// Delimiter some model replies place between a reasoning scaffold and the
/// user-facing answer. Stripped defensively from final text.
pub const FINAL_ANSWER_MARKER: &str = "Final Answer:";

const PRESENTATION_RULES: &str = "\
1. Present each listing with: full address; bedrooms and parking spots; area \
in m2; total price; condo fee only when the listing has one; nearest metro \
station with line and distance only when the listing has one.
2. Present the listings that satisfy every client criterion first.
3. Order listings by total price, lowest first.
4. Never invent information that is not in the listing data.
5. When a field is missing from a listing, leave it out instead of guessing.";

/// Direct mode: the whole context (preferences, listing table, history) is
/// interpolated into one instruction text used as the system prompt.
pub fn build_direct_prompt(prefs: &Preferences, listings_text: &str, transcript: &str) -> String {
    format!(
        "You are a real-estate broker assistant working in São Paulo, SP. \
Help the client find a property matching their preferences.

Client preferences:
{preferences}

Available listings:
{listings_text}

Previous conversation:
{transcript}

Presentation rules:
{PRESENTATION_RULES}",
        preferences = preferences_block(prefs),
    )
}

/// Tool mode: the system prompt declares the working rules; listing data
/// only ever enters the conversation through tool results.
pub fn build_tool_system_prompt(prefs: &Preferences) -> String {
    format!(
        "You are a real-estate broker assistant working in São Paulo, SP, \
operating over a listings database through the declared tools.

Client preferences:
{preferences}

Rules:
1. Use search_listings to look up properties; never guess listing data.
2. Use schedule_visit only after the client confirms address, date and time.
3. When enough information is available, reply with plain text only.
4. If a tool reports an error, tell the client instead of retrying blindly.

Presentation rules:
{PRESENTATION_RULES}",
        preferences = preferences_block(prefs),
    )
}

fn preferences_block(prefs: &Preferences) -> String {
    let neighborhood = if prefs.neighborhood.trim().is_empty() {
        "(any)"
    } else {
        prefs.neighborhood.trim()
    };
    format!(
        "- Bedrooms: at least {}\n\
         - Parking spots: at least {}\n\
         - Maximum total price: R$ {}\n\
         - Neighborhood: {}",
        prefs.min_bedrooms, prefs.min_parking, prefs.max_price, neighborhood
    )
}

/// Returns the user-facing part of a model reply.
///
/// If the marker occurs, the result is the trimmed segment after its first
/// occurrence, up to the next occurrence if any. That segment can never
/// contain the marker, so applying the function twice is a no-op. Without a
/// marker the input comes back unchanged.
pub fn extract_final_answer(text: &str) -> &str {
    let mut segments = text.split(FINAL_ANSWER_MARKER);
    let _ = segments.next();
    match segments.next() {
        Some(answer) => answer.trim(),
        None => text,
    }
}
