// src/cli/mod.rs — CLI definition (clap derive)

pub mod ask;
pub mod auth;
pub mod sessions;

use clap::{Parser, Subcommand};

#[derive(Parser, Debug)]
#[command(
    name = "tutorchat",
    about = "Terminal client for the AI tutor chat API",
    version
)]
pub struct Cli {
    /// Config file path
    #[arg(long)]
    pub config: Option<String>,

    /// Backend base URL (overrides server.base_url)
    #[arg(long, value_name = "URL")]
    pub api_base: Option<String>,

    /// Log level when RUST_LOG is unset
    #[arg(long, default_value = "warn")]
    pub log_level: String,

    #[command(subcommand)]
    pub command: Option<Commands>,
}

#[derive(Subcommand, Debug)]
pub enum Commands {
    /// List sessions (the active one is marked)
    Sessions,
    /// Create a new session and make it active
    New,
    /// Print the message history of a session
    History {
        /// Session id
        id: String,
    },
    /// Send a message and stream the reply to stdout
    Ask {
        /// Message text
        #[arg(required = true, trailing_var_arg = true)]
        text: Vec<String>,
        /// Session to use instead of the active one
        #[arg(short, long)]
        session: Option<String>,
    },
    /// Rename a session
    Rename {
        /// Session id
        id: String,
        /// New name
        #[arg(required = true, trailing_var_arg = true)]
        name: Vec<String>,
    },
    /// Delete a session
    Delete {
        /// Session id
        id: String,
    },
    /// Make a session the active one
    Switch {
        /// Session id
        id: String,
    },
    /// Log in and store the access token
    Login {
        /// Email (prompted when omitted)
        #[arg(long)]
        email: Option<String>,
    },
    /// Create an account and store the access token
    Signup,
    /// Forget the stored access token
    Logout,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_no_subcommand_means_ui() {
        let cli = Cli::try_parse_from(["tutorchat"]).unwrap();
        assert!(cli.command.is_none());
        assert_eq!(cli.log_level, "warn");
    }

    #[test]
    fn test_ask_joins_words() {
        let cli =
            Cli::try_parse_from(["tutorchat", "ask", "-s", "session-1", "what", "is", "2+2?"])
                .unwrap();
        match cli.command {
            Some(Commands::Ask { text, session }) => {
                assert_eq!(text.join(" "), "what is 2+2?");
                assert_eq!(session.as_deref(), Some("session-1"));
            }
            other => panic!("unexpected {:?}", other),
        }
    }

    #[test]
    fn test_global_flags() {
        let cli = Cli::try_parse_from([
            "tutorchat",
            "--api-base",
            "http://tutor.local:9000",
            "sessions",
        ])
        .unwrap();
        assert_eq!(cli.api_base.as_deref(), Some("http://tutor.local:9000"));
        assert!(matches!(cli.command, Some(Commands::Sessions)));
    }

    #[test]
    fn test_rename_requires_name() {
        assert!(Cli::try_parse_from(["tutorchat", "rename", "s1"]).is_err());
        let cli = Cli::try_parse_from(["tutorchat", "rename", "s1", "Linear", "algebra"]).unwrap();
        assert!(matches!(cli.command, Some(Commands::Rename { ref name, .. }) if name.join(" ") == "Linear algebra"));
    }
}
