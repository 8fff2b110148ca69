use clap::Parser;

#[derive(Debug, Clone, Parser)]
#[command(name = "expense-splitter")]
#[command(about = "Track shared expenses and work out who owes whom")]
pub struct Config {
    #[arg(long, env = "BIND_HOST", default_value = "0.0.0.0")]
    pub host: String,

    #[arg(long, env = "PORT", default_value = "8080")]
    pub port: u16,

    /// Directory the participant and expense lists are mirrored into.
    #[arg(long, env = "DATA_DIR", default_value = "./data")]
    pub data_dir: String,

    /// Base of the links handed out for sharing.
    #[arg(long, env = "PUBLIC_URL", default_value = "http://localhost:8080/")]
    pub public_url: String,

    /// Program the share link is piped into, e.g. `wl-copy` or `pbcopy`.
    #[arg(long, env = "CLIPBOARD_COMMAND")]
    pub clipboard_command: Option<String>,

    /// Share token to start from instead of the stored state.
    #[arg(long, env = "SHARE_TOKEN")]
    pub token: Option<String>,

    #[arg(long, help = "Enable verbose output")]
    pub verbose: bool,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn defaults() {
        let config = Config::try_parse_from(["expense-splitter"]).unwrap();

        assert!(!config.verbose);
        assert_eq!(config.public_url, "http://localhost:8080/");
        assert!(config.clipboard_command.is_none());
    }

    #[test]
    fn flags_override_defaults() {
        let config = Config::try_parse_from([
            "expense-splitter",
            "--port",
            "9000",
            "--clipboard-command",
            "xclip -selection clipboard",
            "--verbose",
        ])
        .unwrap();

        assert_eq!(config.port, 9000);
        assert_eq!(
            config.clipboard_command.as_deref(),
            Some("xclip -selection clipboard")
        );
        assert!(config.verbose);
    }
}
