use clap::{Args, CommandFactory, Parser, Subcommand};
use clap_complete::Shell;
use std::io;

use crate::commands::{
    BrowseOptions, ListArgs, cmd_browse, cmd_config_get, cmd_config_set, cmd_config_show,
    cmd_list,
};
use crate::remote::filters::parse_filter_pair;
use crate::types::CollectionKind;

#[derive(Parser)]
#[command(name = "folio")]
#[command(about = "Browse journals, review assignments and role requests")]
#[command(version)]
pub struct Cli {
    #[command(subcommand)]
    pub command: Commands,
}

/// Shared output flag
#[derive(Args, Debug, Clone, Copy, Default)]
pub struct OutputOptions {
    /// Output as JSON
    #[arg(long)]
    pub json: bool,
}

/// Flags shared by every list command
#[derive(Args, Debug, Clone)]
pub struct ListFlags {
    /// Free-text search, applied by the server
    #[arg(short, long)]
    pub search: Option<String>,

    /// Only show records with this status (applied to the fetched page)
    #[arg(long)]
    pub status: Option<String>,

    /// Server-side filter as key=value (repeatable)
    #[arg(short, long = "filter", value_parser = parse_filter)]
    pub filters: Vec<(String, String)>,

    /// Page to show, starting at 1
    #[arg(short, long, default_value_t = 1)]
    pub page: u32,

    /// Rows per page (default: page_size from config)
    #[arg(short, long, value_parser = clap::value_parser!(u32).range(1..))]
    pub limit: Option<u32>,

    /// Serve built-in sample data instead of calling the API
    #[arg(long)]
    pub offline: bool,

    #[command(flatten)]
    pub output: OutputOptions,
}

#[derive(Subcommand)]
pub enum Commands {
    /// List journals
    #[command(visible_alias = "j")]
    Journals {
        #[command(flatten)]
        flags: ListFlags,
    },

    /// List review assignments
    #[command(visible_alias = "a")]
    Assignments {
        #[command(flatten)]
        flags: ListFlags,
    },

    /// List role-elevation requests
    #[command(visible_alias = "r")]
    RoleRequests {
        #[command(flatten)]
        flags: ListFlags,
    },

    /// Browse a collection interactively, reading commands from stdin
    ///
    /// Plain text searches the current page. Commands: :n, :p, :page N,
    /// :status S|all, :filter k=v, :unfilter k, :r, :help, :q
    Browse {
        /// Collection to browse
        #[arg(value_enum)]
        collection: CollectionKind,

        /// Server-side filter as key=value (repeatable)
        #[arg(short, long = "filter", value_parser = parse_filter)]
        filters: Vec<(String, String)>,

        /// Rows per page (default: page_size from config)
        #[arg(short, long, value_parser = clap::value_parser!(u32).range(1..))]
        limit: Option<u32>,

        /// Serve built-in sample data instead of calling the API
        #[arg(long)]
        offline: bool,

        /// Fuzzy-match search input instead of substring matching
        #[arg(long)]
        fuzzy: bool,
    },

    /// Manage configuration
    Config {
        #[command(subcommand)]
        action: ConfigAction,
    },

    /// Generate shell completions
    Completions {
        /// Shell to generate completions for [possible values: bash, zsh, fish, powershell, elvish]
        shell: Shell,
    },
}

#[derive(Subcommand)]
pub enum ConfigAction {
    /// Show current configuration
    Show {
        #[command(flatten)]
        output: OutputOptions,
    },
    /// Get a configuration value
    Get {
        /// Configuration key (e.g. api.base_url, page_size)
        key: String,
        #[command(flatten)]
        output: OutputOptions,
    },
    /// Set a configuration value
    Set {
        /// Configuration key (e.g. api.base_url, page_size)
        key: String,
        /// Value to set
        value: String,
        #[command(flatten)]
        output: OutputOptions,
    },
}

impl ListFlags {
    fn into_args(self) -> ListArgs {
        ListArgs {
            search: self.search,
            status: self.status,
            filters: self.filters,
            page: self.page,
            limit: self.limit,
            offline: self.offline,
            output: self.output,
        }
    }
}

impl Commands {
    pub async fn run(self) -> crate::error::Result<()> {
        match self {
            Commands::Journals { flags } => {
                cmd_list(CollectionKind::Journals, flags.into_args()).await
            }
            Commands::Assignments { flags } => {
                cmd_list(CollectionKind::Assignments, flags.into_args()).await
            }
            Commands::RoleRequests { flags } => {
                cmd_list(CollectionKind::RoleRequests, flags.into_args()).await
            }

            Commands::Browse {
                collection,
                filters,
                limit,
                offline,
                fuzzy,
            } => {
                cmd_browse(
                    collection,
                    BrowseOptions {
                        filters,
                        limit,
                        offline,
                        fuzzy,
                    },
                )
                .await
            }

            Commands::Config { action } => match action {
                ConfigAction::Show { output } => cmd_config_show(output),
                ConfigAction::Get { key, output } => cmd_config_get(&key, output),
                ConfigAction::Set { key, value, output } => cmd_config_set(&key, &value, output),
            },

            Commands::Completions { shell } => {
                generate_completions(shell);
                Ok(())
            }
        }
    }
}

fn parse_filter(s: &str) -> Result<(String, String), String> {
    parse_filter_pair(s).map_err(|e| e.to_string())
}

pub fn generate_completions(shell: Shell) {
    let mut cmd = Cli::command();
    clap_complete::generate(shell, &mut cmd, "folio", &mut io::stdout());
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_cli_definition_is_valid() {
        Cli::command().debug_assert();
    }

    #[test]
    fn test_parse_list_flags() {
        let cli = Cli::try_parse_from([
            "folio",
            "assignments",
            "--status",
            "pending",
            "-f",
            "journal=3",
            "--filter",
            "reviewer=ada",
            "--page",
            "2",
            "--json",
        ])
        .unwrap();

        let Commands::Assignments { flags } = cli.command else {
            panic!("expected assignments command");
        };
        assert_eq!(flags.status.as_deref(), Some("pending"));
        assert_eq!(
            flags.filters,
            vec![
                ("journal".to_string(), "3".to_string()),
                ("reviewer".to_string(), "ada".to_string())
            ]
        );
        assert_eq!(flags.page, 2);
        assert!(flags.output.json);
    }

    #[test]
    fn test_rejects_malformed_filter() {
        assert!(Cli::try_parse_from(["folio", "journals", "--filter", "noequals"]).is_err());
        assert!(Cli::try_parse_from(["folio", "journals", "--filter", "bad key=x"]).is_err());
    }

    #[test]
    fn test_rejects_zero_limit() {
        assert!(Cli::try_parse_from(["folio", "journals", "--limit", "0"]).is_err());
    }

    #[test]
    fn test_browse_collection_names() {
        let cli = Cli::try_parse_from(["folio", "browse", "role-requests", "--offline"]).unwrap();
        let Commands::Browse {
            collection,
            offline,
            ..
        } = cli.command
        else {
            panic!("expected browse command");
        };
        assert_eq!(collection, CollectionKind::RoleRequests);
        assert!(offline);
    }
}
