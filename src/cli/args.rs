use clap::{ArgAction, Parser, Subcommand};

#[derive(Parser, Debug, Clone)]
#[command(
    name = "bluedir",
    version,
    about = "categorized company directory with location-link conversion tracking",
    long_about = "bluedir browses a categorized directory of companies, searches it, and tracks which companies have had their location link converted.\n\nExamples:\n  bluedir -d https://host/companies-data.json\n  bluedir -d ./companies-data.json show \"Goo.gl Links\" -s tech\n  bluedir mark 12 14\n  bluedir --output-format json stats\n\nTip: Use --config to persist the data source and keep CLI invocations short."
)]
pub struct CliArgs {
    #[arg(
        short = 'v',
        long = "vb",
        visible_alias = "verbose",
        action = ArgAction::Count,
        global = true,
        help_heading = "Output",
        help = "Increase log verbosity (-v, -vv)."
    )]
    pub verbose: u8,

    #[arg(
        long = "nc",
        visible_alias = "no-color",
        global = true,
        help_heading = "Output",
        help = "Disable colored output."
    )]
    pub no_color: bool,

    #[arg(
        short = 'o',
        long = "of",
        visible_alias = "output-format",
        value_name = "FORMAT",
        global = true,
        help_heading = "Output",
        help = "Output format: text or json."
    )]
    pub output_format: Option<String>,

    #[arg(
        short = 'C',
        long = "cfg",
        visible_alias = "config",
        value_name = "FILE",
        global = true,
        help_heading = "Input",
        help = "Path to config file (defaults to ~/.bluedir/config.yml)."
    )]
    pub config: Option<String>,

    #[arg(
        short = 'd',
        long = "ds",
        visible_alias = "data",
        value_name = "URL|FILE",
        global = true,
        help_heading = "Input",
        help = "Company data source: an http(s) URL or a local JSON file."
    )]
    pub data: Option<String>,

    #[arg(
        long = "sf",
        visible_alias = "state",
        value_name = "FILE",
        global = true,
        help_heading = "Input",
        help = "File holding converted company ids (defaults to ~/.bluedir/convertedCompanies.json)."
    )]
    pub state: Option<String>,

    #[arg(
        short = 'T',
        long = "to",
        visible_alias = "timeout",
        value_name = "SECONDS",
        global = true,
        help_heading = "HTTP",
        help = "Timeout for fetching the data source, in seconds."
    )]
    pub timeout: Option<u64>,

    #[arg(
        long = "sb",
        visible_alias = "site-base",
        value_name = "URL",
        global = true,
        help_heading = "Links",
        help = "Base URL of public company pages."
    )]
    pub site_base: Option<String>,

    #[arg(
        long = "db",
        visible_alias = "dashboard-base",
        value_name = "URL",
        global = true,
        help_heading = "Links",
        help = "Base URL of the admin dashboard."
    )]
    pub dashboard_base: Option<String>,

    #[command(subcommand)]
    pub command: Option<Command>,
}

#[derive(Subcommand, Debug, Clone, PartialEq, Eq)]
pub enum Command {
    /// List categories with their company counts.
    Categories,

    /// Show the companies of one category ('converted' shows marked companies).
    Show {
        #[arg(value_name = "CATEGORY", required = true, num_args = 1..)]
        category: Vec<String>,

        #[arg(short = 's', long = "search", value_name = "TERM")]
        search: Option<String>,
    },

    /// Show marked companies from every category.
    Converted {
        #[arg(short = 's', long = "search", value_name = "TERM")]
        search: Option<String>,
    },

    /// Mark companies as converted.
    Mark {
        #[arg(value_name = "ID", required = true, num_args = 1..)]
        ids: Vec<u64>,
    },

    /// Remove the converted mark from companies.
    Unmark {
        #[arg(value_name = "ID", required = true, num_args = 1..)]
        ids: Vec<u64>,
    },

    /// Print totals.
    Stats,

    /// Interactive session (the default).
    Shell,
}

impl CliArgs {
    pub fn command_or_default(&self) -> Command {
        self.command.clone().unwrap_or(Command::Shell)
    }
}
