pub mod agent;
pub mod cli;
pub mod config;
pub mod http;
pub mod llm;
pub mod properties;
pub mod session;
pub mod trace;

use std::path::{Path, PathBuf};
use std::time::{SystemTime, UNIX_EPOCH};

use anyhow::{Context, Result, anyhow};

use agent::AgentConfig;
use cli::{AppState, CliArgs, run_repl};
use config::AppConfig;
use http::{HttpClient, HttpDebugConfig};
use llm::anthropic::AnthropicProvider;
use properties::{ListingStore, Preferences, PropertyDesk, VisitLedger};
use session::ChatSession;
use trace::SessionTrace;

const DEFAULT_VISITS_FILE: &str = "visitas.csv";

pub async fn run(args: CliArgs) -> Result<()> {
    let config = if let Some(path) = args.config.as_deref() {
        AppConfig::load_with_path(Some(path))?
    } else {
        AppConfig::load()?
    };

    let listings_path = resolve_listings_path(
        args.listings.as_deref(),
        config.listings_file.as_deref(),
    )
    .ok_or_else(|| {
        anyhow!(
            "No listings dataset configured: pass --listings or set listings_file in {}",
            config.config_path.display()
        )
    })?;
    let store = ListingStore::load(&listings_path)
        .with_context(|| format!("Failed to open listings dataset {}", listings_path.display()))?;

    let visits_path = resolve_visits_path(args.visits.as_deref(), config.visits_file.as_deref());
    let desk = PropertyDesk::new(store, VisitLedger::new(visits_path));

    let session_id = generate_session_id();
    let trace = SessionTrace::create(&session_id)?;
    let http = HttpClient::new(reqwest::Client::new(), HttpDebugConfig::from_verbose(args.verbose))
        .with_trace(trace.clone());
    let provider = AnthropicProvider::new(
        http,
        config.anthropic_api_key.clone(),
        config.anthropic_model.clone(),
        config.anthropic_base_url.clone(),
    )
    .ok();

    let prefs = Preferences {
        max_price: args.max_price,
        min_bedrooms: args.bedrooms,
        min_parking: args.parking,
        neighborhood: args.neighborhood.clone(),
    };

    let mut state = AppState {
        mode: args.mode,
        session_id,
        desk,
        provider,
        prefs,
        chat: ChatSession::new(),
        agent_config: AgentConfig::default(),
        trace,
        show_steps: args.verbose,
    };

    run_repl(&mut state).await
}

fn resolve_listings_path(cli: Option<&Path>, configured: Option<&Path>) -> Option<PathBuf> {
    cli.or(configured).map(Path::to_path_buf)
}

fn resolve_visits_path(cli: Option<&Path>, configured: Option<&Path>) -> PathBuf {
    cli.or(configured)
        .map(Path::to_path_buf)
        .unwrap_or_else(|| PathBuf::from(DEFAULT_VISITS_FILE))
}

fn generate_session_id() -> String {
    let millis = SystemTime::now()
        .duration_since(UNIX_EPOCH)
        .map_or(0, |duration| duration.as_millis());
    format!("{millis:x}-{:x}", std::process::id())
}

#[cfg(test)]
mod tests {
    use super::{generate_session_id, resolve_listings_path, resolve_visits_path};
    use std::path::{Path, PathBuf};

    #[test]
    fn generated_session_id_has_expected_shape() {
        let session_id = generate_session_id();
        let mut parts = session_id.split('-');
        let ts = parts.next().expect("timestamp segment");
        let pid = parts.next().expect("pid segment");
        assert!(
            parts.next().is_none(),
            "session id should contain one delimiter"
        );
        assert!(!ts.is_empty(), "timestamp segment should not be empty");
        assert!(!pid.is_empty(), "pid segment should not be empty");
        assert!(
            ts.chars().all(|ch| ch.is_ascii_hexdigit()),
            "timestamp segment should be hex"
        );
        assert!(
            pid.chars().all(|ch| ch.is_ascii_hexdigit()),
            "pid segment should be hex"
        );
    }

    #[test]
    fn cli_listings_path_beats_the_configured_one() {
        let resolved = resolve_listings_path(
            Some(Path::new("/tmp/cli.csv")),
            Some(Path::new("/etc/cfg.csv")),
        );
        assert_eq!(resolved, Some(PathBuf::from("/tmp/cli.csv")));

        let fallback = resolve_listings_path(None, Some(Path::new("/etc/cfg.csv")));
        assert_eq!(fallback, Some(PathBuf::from("/etc/cfg.csv")));

        assert_eq!(resolve_listings_path(None, None), None);
    }

    #[test]
    fn visits_path_defaults_next_to_the_working_directory() {
        assert_eq!(
            resolve_visits_path(None, None),
            PathBuf::from("visitas.csv")
        );
        assert_eq!(
            resolve_visits_path(Some(Path::new("/tmp/v.csv")), None),
            PathBuf::from("/tmp/v.csv")
        );
    }
}
