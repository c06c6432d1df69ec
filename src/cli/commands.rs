use crate::properties::VisitRequest;

#[derive(Debug, Clone, PartialEq, Eq)]
pub(crate) enum Command {
    Help,
    Prefs,
    Clear,
    Trace,
    Schedule(VisitRequest),
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub(crate) struct ParseError {
    message: String,
}

impl ParseError {
    pub(crate) fn new(message: impl Into<String>) -> Self {
        Self {
            message: message.into(),
        }
    }

    pub(crate) fn message(&self) -> &str {
        &self.message
    }
}

const SCHEDULE_USAGE: &str =
    "usage: /schedule <address>; <date YYYY-MM-DD>; <time HH:MM>; <name>";

pub(crate) const HELP_TEXT: &str = "Available commands:\n  /help                Show this command list\n  /prefs               Show the active search preferences\n  /clear               Clear the conversation history\n  /trace               Show path to the current trace file\n  /schedule <address>; <date>; <time>; <name>\n                       Book a property visit directly";

pub(crate) fn parse_command(line: &str) -> Result<Command, ParseError> {
    if !line.starts_with('/') {
        return Err(ParseError::new("not a command"));
    }

    let trimmed = line.trim();
    if trimmed == "/" {
        return Err(ParseError::new("empty command. Try /help"));
    }

    let command_text = &trimmed[1..];
    let mut parts = command_text.splitn(2, char::is_whitespace);
    let name = parts.next().unwrap_or("").to_ascii_lowercase();
    if name.is_empty() {
        return Err(ParseError::new("empty command. Try /help"));
    }
    let rest = parts.next().map(str::trim).unwrap_or("");

    match name.as_str() {
        "help" => expect_no_args(rest, Command::Help, "usage: /help"),
        "prefs" => expect_no_args(rest, Command::Prefs, "usage: /prefs"),
        "clear" => expect_no_args(rest, Command::Clear, "usage: /clear"),
        "trace" => expect_no_args(rest, Command::Trace, "usage: /trace"),
        "schedule" => parse_schedule(rest),
        _ => Err(ParseError::new(format!(
            "unknown command '/{name}'. Try /help"
        ))),
    }
}

pub(crate) fn is_command_line(line: &str) -> bool {
    line.starts_with('/')
}

fn expect_no_args(rest: &str, command: Command, usage: &str) -> Result<Command, ParseError> {
    if rest.is_empty() {
        Ok(command)
    } else {
        Err(ParseError::new(usage))
    }
}

fn parse_schedule(rest: &str) -> Result<Command, ParseError> {
    if rest.is_empty() {
        return Err(ParseError::new(SCHEDULE_USAGE));
    }

    let fields: Vec<&str> = rest.split(';').map(str::trim).collect();
    let [address, date, time, name] = fields.as_slice() else {
        return Err(ParseError::new(SCHEDULE_USAGE));
    };

    if address.is_empty() || date.is_empty() || time.is_empty() || name.is_empty() {
        return Err(ParseError::new(SCHEDULE_USAGE));
    }

    Ok(Command::Schedule(VisitRequest {
        address: (*address).to_string(),
        date: (*date).to_string(),
        time: (*time).to_string(),
        name: (*name).to_string(),
    }))
}

#[cfg(test)]
mod tests {
    use super::{Command, HELP_TEXT, is_command_line, parse_command};
    use crate::properties::VisitRequest;

    #[test]
    fn help_text_lists_all_supported_commands() {
        for needle in ["/help", "/prefs", "/clear", "/trace", "/schedule"] {
            assert!(HELP_TEXT.contains(needle), "missing help entry: {needle}");
        }
    }

    #[test]
    fn parse_simple_commands() {
        assert_eq!(parse_command("/help").expect("help"), Command::Help);
        assert_eq!(parse_command("/prefs").expect("prefs"), Command::Prefs);
        assert_eq!(parse_command("/clear").expect("clear"), Command::Clear);
        assert_eq!(parse_command("/trace").expect("trace"), Command::Trace);
    }

    #[test]
    fn parse_schedule_splits_on_semicolons_and_trims() {
        let command = parse_command("/schedule Rua X, 10; 2024-06-01; 14:00; Ana")
            .expect("schedule command");
        assert_eq!(
            command,
            Command::Schedule(VisitRequest {
                address: "Rua X, 10".to_string(),
                date: "2024-06-01".to_string(),
                time: "14:00".to_string(),
                name: "Ana".to_string(),
            })
        );
    }

    #[test]
    fn parse_schedule_rejects_missing_fields() {
        assert_eq!(
            parse_command("/schedule Rua X; 2024-06-01; 14:00")
                .expect_err("three fields")
                .message(),
            "usage: /schedule <address>; <date YYYY-MM-DD>; <time HH:MM>; <name>"
        );
        assert!(parse_command("/schedule").is_err());
        assert!(parse_command("/schedule ; 2024-06-01; 14:00; Ana").is_err());
    }

    #[test]
    fn parse_reports_usage_for_unexpected_arguments() {
        assert_eq!(
            parse_command("/clear now").expect_err("args on /clear").message(),
            "usage: /clear"
        );
    }

    #[test]
    fn parse_reports_unknown_commands() {
        assert_eq!(
            parse_command("/bogus").expect_err("unknown command").message(),
            "unknown command '/bogus'. Try /help"
        );
    }

    #[test]
    fn parse_reports_empty_command_when_name_is_missing() {
        assert_eq!(
            parse_command("/ help").expect_err("missing name").message(),
            "empty command. Try /help"
        );
    }

    #[test]
    fn command_line_detection_is_prefix_based() {
        assert!(is_command_line("/help"));
        assert!(is_command_line("/schedule Rua X; d; t; n"));
        assert!(!is_command_line(" /help"));
        assert!(!is_command_line("tell me about /help"));
    }
}
