mod browse;
mod list;

use std::fmt;

use anyhow::Result;
use bpaf::{Bpaf, Parser};
use indoc::indoc;

use crate::config::Config;

const BREWDOG_DESCRIPTION: &str = indoc! {"
    Browse the Brewdog beer catalog.

    Without a command, the interactive browser opens on the first page."
};

pub const BREWDOG_VERSION: &str = env!("CARGO_PKG_VERSION");

fn vec_len<T>(x: Vec<T>) -> usize {
    Vec::len(&x)
}

#[derive(Bpaf, Clone, Copy, Debug, PartialEq, Eq)]
pub enum Verbosity {
    Verbose(
        /// Increase logging verbosity
        ///
        /// Invoke multiple times for increasing detail.
        #[bpaf(short('v'), long("verbose"), req_flag(()), many, map(vec_len))]
        usize,
    ),

    /// Silence logs except for errors
    #[bpaf(short, long)]
    Quiet,
}

impl Default for Verbosity {
    fn default() -> Self {
        Verbosity::Verbose(0)
    }
}

#[derive(Bpaf)]
#[bpaf(options, descr(BREWDOG_DESCRIPTION))]
pub struct BrewdogCli(#[bpaf(external(brewdog_args))] pub BrewdogArgs);

/// Main brewdog args parser
///
/// To parse the brewdog CLI, use [`BrewdogCli`] instead using [`brewdog_cli()`].
#[derive(Debug, Bpaf)]
#[bpaf(ignore_rustdoc)] // we don't want this struct to be interpreted as a group
pub struct BrewdogArgs {
    #[bpaf(external, fallback(Default::default()))]
    pub verbosity: Verbosity,

    /// Print the version of the program
    #[allow(dead_code)] // fake arg, `--version` is checked for separately (see [Version])
    #[bpaf(long, short('V'))]
    version: bool,

    #[bpaf(external(commands), optional)]
    command: Option<Commands>,
}

impl BrewdogArgs {
    pub async fn handle(self, config: Config) -> Result<()> {
        match self.command {
            // Given no command, open the browser
            None => browse::Browse::default().handle(config).await,
            Some(Commands::Browse(args)) => args.handle(config).await,
            Some(Commands::List(args)) => args.handle(config).await,
        }
    }
}

#[derive(Bpaf, Clone)]
enum Commands {
    /// Browse the catalog page by page
    #[bpaf(command)]
    Browse(#[bpaf(external(browse::browse))] browse::Browse),

    /// Print a single page of the catalog
    #[bpaf(command)]
    List(#[bpaf(external(list::list))] list::List),
}

impl fmt::Debug for Commands {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "Command")
    }
}

/// Fake argument used to parse `--version` separately
///
/// bpaf allows `--version` to be used with other commands, so we parse it
/// on its own first.
#[derive(Bpaf, Default)]
pub struct Version(#[bpaf(short('V'), long("version"))] bool);

impl Version {
    /// Parses to [Self] and extract the `--version` flag
    pub fn check() -> bool {
        bpaf::construct!(version(), brewdog_args())
            .to_options()
            .run_inner(bpaf::Args::current_args())
            .map(|(v, _)| v)
            .unwrap_or_default()
            .0
    }
}

#[cfg(test)]
mod tests {
    use brewdog_catalog::{Page, SortColumn, SortDirection};
    use pretty_assertions::assert_eq;

    use super::*;

    fn parse(args: &[&str]) -> BrewdogArgs {
        let BrewdogCli(args) = brewdog_cli().run_inner(args).unwrap();
        args
    }

    #[test]
    fn no_command_opens_browser() {
        let args = parse(&[]);
        assert!(args.command.is_none());
        assert_eq!(args.verbosity, Verbosity::Verbose(0));
    }

    #[test]
    fn verbosity_flags() {
        assert_eq!(parse(&["-vv"]).verbosity, Verbosity::Verbose(2));
        assert_eq!(parse(&["-v", "-v", "-v"]).verbosity, Verbosity::Verbose(3));
        assert_eq!(parse(&["-q"]).verbosity, Verbosity::Quiet);
    }

    #[test]
    fn browse_page() {
        let Some(Commands::Browse(browse)) = parse(&["browse", "--page", "3"]).command else {
            panic!("expected browse command");
        };
        assert_eq!(browse.page, Page::new(3).unwrap());
    }

    #[test]
    fn page_zero_is_rejected() {
        assert!(brewdog_cli().run_inner(&["browse", "--page", "0"][..]).is_err());
        assert!(brewdog_cli().run_inner(&["list", "--page", "x"][..]).is_err());
    }

    #[test]
    fn list_options() {
        let Some(Commands::List(list)) = parse(&[
            "list",
            "--sort",
            "abv",
            "--direction",
            "desc",
            "--search",
            "pale ale",
            "--beer-name",
            "punk",
            "--json",
        ])
        .command
        else {
            panic!("expected list command");
        };
        assert_eq!(list.page, Page::FIRST);
        assert_eq!(list.sort, Some(SortColumn::Abv));
        assert_eq!(list.direction, Some(SortDirection::Desc));
        assert_eq!(list.search.as_deref(), Some("pale ale"));
        assert_eq!(list.beer_name.as_deref(), Some("punk"));
        assert!(list.json);
    }

    #[test]
    fn unknown_sort_column_is_rejected() {
        assert!(brewdog_cli().run_inner(&["list", "--sort", "ibu"][..]).is_err());
    }

    #[test]
    fn unknown_direction_is_rejected() {
        assert!(
            brewdog_cli()
                .run_inner(&["list", "--direction", "up"][..])
                .is_err()
        );
        assert!(brewdog_cli().run_inner(&["list", "--desc"][..]).is_err());
    }
}
