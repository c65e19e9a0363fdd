use clap::{Parser, Subcommand, ValueEnum};
use std::path::PathBuf;

#[derive(Parser)]
#[command(name = "recfix")]
#[command(about = "RecFix - turn a few YouTube videos into a curated playlist")]
#[command(version)]
#[command(after_help = "\x1b[1;36mQuick Start:\x1b[0m
  recfix config set-key <API_KEY>              Store and check your YouTube Data API key
  recfix related https://youtu.be/dQw4w9WgXcQ  Related videos for one video
  recfix recommend <URL> <URL> ...             Ranked recommendations from several seeds
  recfix recommend --from-page home.html       Use the videos on a saved YouTube page

\x1b[1;36mPlaylists:\x1b[0m
  recfix auth url --client-id <ID>             Start the OAuth sign-in in a browser
  recfix auth set-token <TOKEN>                Store the access token
  recfix recommend <URL> ... --save            Export the ranking as a private playlist")]
pub struct Cli {
    #[command(subcommand)]
    pub command: Commands,

    /// Output format
    #[arg(long, global = true, value_enum, default_value_t = OutputFormat::Pretty)]
    pub output: OutputFormat,

    /// Disable colored output
    #[arg(long, global = true)]
    pub no_color: bool,

    /// Verbose output
    #[arg(short, long, global = true, action = clap::ArgAction::Count)]
    pub verbose: u8,
}

#[derive(Subcommand)]
pub enum Commands {
    /// Extract video ids from URLs
    #[command(after_help = "\x1b[1;33mExamples:\x1b[0m
  recfix resolve https://www.youtube.com/watch?v=dQw4w9WgXcQ https://youtu.be/abc123
  recfix resolve --allow-ids dQw4w9WgXcQ")]
    Resolve {
        /// URLs (or bare ids with --allow-ids)
        #[arg(required = true)]
        inputs: Vec<String>,
        /// Accept bare 11-character video ids
        #[arg(long)]
        allow_ids: bool,
    },

    /// Fetch related videos for a single seed video
    Related {
        /// Video URL or id
        seed: String,
    },

    /// Aggregate related videos for many seeds and rank them
    #[command(after_help = "\x1b[1;33mExamples:\x1b[0m
  recfix recommend dQw4w9WgXcQ https://youtu.be/9bZkp7q19f0
  recfix recommend --from-page subscriptions.html --limit 20
  recfix recommend dQw4w9WgXcQ --save")]
    Recommend {
        /// Seed video URLs or ids
        seeds: Vec<String>,
        /// Maximum number of recommendations
        #[arg(short, long)]
        limit: Option<usize>,
        /// Also use every video found on a saved YouTube HTML page as a seed
        #[arg(long, value_name = "FILE")]
        from_page: Option<PathBuf>,
        /// Export the ranking as a private playlist
        #[arg(long)]
        save: bool,
        /// OAuth access token (defaults to the stored one)
        #[arg(long)]
        token: Option<String>,
    },

    /// Create a private playlist from video URLs or ids
    Save {
        /// Video URLs or ids, in playlist order
        #[arg(required = true)]
        videos: Vec<String>,
        /// OAuth access token (defaults to the stored one)
        #[arg(long)]
        token: Option<String>,
    },

    /// List the videos linked from a saved YouTube HTML page
    Scrape {
        /// Path to the saved page
        file: PathBuf,
    },

    /// Serve typed JSON requests over stdin/stdout, one per line
    #[command(after_help = "\x1b[1;33mExample:\x1b[0m
  echo '{\"action\":\"fixFeed\",\"selectedVideos\":[\"dQw4w9WgXcQ\"]}' | recfix serve")]
    Serve,

    /// Manage the OAuth access token used for playlist export
    Auth {
        #[command(subcommand)]
        action: AuthAction,
    },

    /// Manage configuration
    Config {
        #[command(subcommand)]
        action: ConfigAction,
    },
}

#[derive(Subcommand, Clone)]
pub enum AuthAction {
    /// Print the authorization URL to open in a browser
    Url {
        /// OAuth client id (defaults to oauth_client_id in the config)
        #[arg(long)]
        client_id: Option<String>,
        /// Redirect URI registered for the client
        #[arg(long, default_value = "http://localhost")]
        redirect_uri: String,
    },
    /// Store an access token, or the redirect URL that carries one
    SetToken { token: String },
    /// Show whether a token is stored
    Status,
    /// Remove the stored token
    Logout,
}

#[derive(Subcommand, Clone)]
pub enum ConfigAction {
    /// Show the current configuration
    Show,
    /// Validate and store the YouTube Data API key
    SetKey {
        key: String,
        /// Only check the key format, skip the live API check
        #[arg(long)]
        skip_check: bool,
    },
    /// Print the config file location
    Path,
}

#[derive(ValueEnum, Clone, Copy, Debug, PartialEq, Eq)]
pub enum OutputFormat {
    /// Pretty formatted output (default)
    Pretty,
    /// JSON output
    Json,
    /// YAML output
    Yaml,
    /// Plain text output
    Text,
}

impl Cli {
    /// `--no-color` downgrades pretty output to plain text.
    pub fn format(&self) -> OutputFormat {
        match self.output {
            OutputFormat::Pretty if self.no_color => OutputFormat::Text,
            other => other,
        }
    }
}
