use clap::{Parser, ValueEnum};
use std::path::PathBuf;

#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
pub enum AgentMode {
    /// Embed the filtered listing table in the prompt; one model call per turn.
    Direct,
    /// Give the model the search/schedule tools and run the reasoning loop.
    Tools,
}

#[derive(Debug, Parser, Clone, PartialEq)]
#[command(name = "imobchat")]
#[command(
    about = "Chat assistant for São Paulo real-estate listings",
    long_about = "Chat assistant for São Paulo real-estate listings\n\nConfig file loading:\n  - --config <path> (explicit file, overrides default path discovery)\n  - Default probe path when --config is not provided:\n    1. $XDG_CONFIG_HOME/imobchat/config.toml\n    2. ~/.config/imobchat/config.toml"
)]
pub struct CliArgs {
    /// Load config from this file path instead of the default discovery path.
    #[arg(long, value_name = "PATH")]
    pub config: Option<PathBuf>,

    /// Listings dataset CSV (overrides listings_file from the config).
    #[arg(long, value_name = "PATH")]
    pub listings: Option<PathBuf>,

    /// Visit ledger CSV (overrides visits_file from the config).
    #[arg(long, value_name = "PATH")]
    pub visits: Option<PathBuf>,

    /// How the assistant consumes listing data.
    #[arg(long, value_enum, default_value = "tools")]
    pub mode: AgentMode,

    /// Minimum number of bedrooms.
    #[arg(long, default_value_t = 2)]
    pub bedrooms: u32,

    /// Minimum number of parking spots.
    #[arg(long, default_value_t = 1)]
    pub parking: u32,

    /// Maximum total price in BRL.
    #[arg(long, default_value_t = 200_000.0)]
    pub max_price: f64,

    /// Preferred neighborhood (substring match, case-insensitive).
    #[arg(long)]
    pub neighborhood: String,

    /// Log provider HTTP traffic (redacted) and agent steps.
    #[arg(long)]
    pub verbose: bool,
}

#[cfg(test)]
mod tests {
    use super::{AgentMode, CliArgs};
    use clap::Parser;

    #[test]
    fn parse_defaults_with_required_neighborhood() {
        let args = CliArgs::try_parse_from(["imobchat", "--neighborhood", "Pinheiros"])
            .expect("should parse");
        assert_eq!(args.neighborhood, "Pinheiros");
        assert_eq!(args.bedrooms, 2);
        assert_eq!(args.parking, 1);
        assert_eq!(args.max_price, 200_000.0);
        assert_eq!(args.mode, AgentMode::Tools);
        assert!(!args.verbose);
        assert_eq!(args.config, None);
    }

    #[test]
    fn neighborhood_is_required() {
        assert!(CliArgs::try_parse_from(["imobchat"]).is_err());
    }

    #[test]
    fn parse_mode_and_paths() {
        let args = CliArgs::try_parse_from([
            "imobchat",
            "--neighborhood",
            "Moema",
            "--mode",
            "direct",
            "--listings",
            "/tmp/dados.csv",
            "--max-price",
            "450000",
        ])
        .expect("should parse");

        assert_eq!(args.mode, AgentMode::Direct);
        assert_eq!(
            args.listings.as_deref(),
            Some(std::path::Path::new("/tmp/dados.csv"))
        );
        assert_eq!(args.max_price, 450_000.0);
    }
}
