use clap::Parser;
use colored::Colorize;

/// Returns the version string, including git hash and commit date for non-release builds.
/// Format: "0.3.0" for releases, "0.3.0@abc1234 2024-01-15 14:30" for dev builds
fn get_version() -> &'static str {
    const VERSION: &str = env!("CARGO_PKG_VERSION");
    const GIT_HASH: &str = env!("WRK_GIT_HASH");
    const GIT_COMMIT_DATE: &str = env!("WRK_GIT_COMMIT_DATE");
    const IS_RELEASE: &str = env!("WRK_IS_RELEASE");

    use std::sync::OnceLock;
    static VERSION_STRING: OnceLock<String> = OnceLock::new();

    VERSION_STRING.get_or_init(|| {
        if IS_RELEASE == "true" || GIT_HASH.is_empty() {
            VERSION.to_string()
        } else {
            format!("{}@{} {}", VERSION, GIT_HASH, GIT_COMMIT_DATE)
        }
    })
}

#[derive(Parser, Debug)]
#[command(
    name = "wrk",
    bin_name = "wrk",
    version = get_version(),
    disable_help_subcommand = true
)]
#[command(about = "Browse Trello from the command line using short wrk ids", long_about = None)]
pub struct Cli {
    /// Print the command reference
    #[arg(long)]
    pub usage: bool,

    /// Debug logging on stderr (WRK_LOG takes precedence)
    #[arg(short, long)]
    pub verbose: bool,

    /// Disable colored output
    #[arg(long)]
    pub no_color: bool,

    /// The command and its arguments, e.g. `cards in wrk2`
    #[arg(value_name = "COMMAND", trailing_var_arg = true, allow_hyphen_values = true)]
    pub command: Vec<String>,
}

impl Cli {
    /// Nothing to run: show the command reference instead.
    pub fn wants_usage(&self) -> bool {
        self.usage || self.command.is_empty()
    }
}

const COMMANDS: &[(&str, &str)] = &[
    ("orgs", "lists the user's organizations"),
    ("boards", "lists the user's open boards"),
    (
        "boards in <org-id>",
        "lists the open boards of org-id, either the Trello or wrk id of an organization.",
    ),
    ("cards", "lists the open cards assigned to the user"),
    (
        "cards in <board-id>",
        "lists the open cards of board-id, either the Trello or wrk id of a board.",
    ),
    (
        "comments in <card-id>",
        "lists the comments on card-id, either the Trello or wrk id of a card.",
    ),
    (
        "desc <id>",
        "describes any organization, board, list, card or member. A Trello id needs a type \
         prefix (o:, b:, l:, c:, m:) unless wrk has already seen it.",
    ),
];

/// The command reference printed for `--usage` or a bare `wrk`.
pub fn usage() -> String {
    let mut out = format!("wrk [--usage|--version|{}]\n", "command".bold());
    out.push_str(&format!("  where {} is either:\n", "command".bold()));
    for (syntax, help) in COMMANDS {
        out.push_str(&format!("    {}\n        {}\n", syntax.bold(), help));
    }
    out
}
