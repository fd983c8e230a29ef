use crate::aggregate;
use crate::cli::parser::{self, Command};
use crate::config::Settings;
use crate::github::GitHubClient;
use crate::output::Output;
use crate::storage::{FileRepoStore, RepoStorage};
use crate::table;
use anyhow::Context;
use thiserror::Error;

const NO_REPOS: &str = "no repos configured. add one with: pr-view add owner/repo[#number]";

const HELP: &str = "\
usage: pr-view <command> [<args>]

commands:
  add <ref>      track owner/repo, owner/repo#number or a GitHub URL
  remove <ref>   stop tracking a reference
  list           show open pull requests for every tracked reference

environment:
  GITHUB_TOKEN        token sent with every API request
  GITHUB_API_URL      API base URL (default https://api.github.com)
  PR_VIEW_CONFIG_DIR  directory holding repos.json (default ~/.config/pr-view)";

/// The command line was not understood. Exits with status 2.
#[derive(Debug, Error)]
#[error("{0}")]
pub struct UsageError(pub String);

/// Parses `args` and runs the command.
///
/// `load_settings` is only called by commands that touch the repository list
/// or the API, so usage errors and `help` work without a config directory.
pub async fn run<F>(
    args: Vec<String>,
    load_settings: F,
    stdout_additional: Option<&mut dyn std::io::Write>,
) -> anyhow::Result<()>
where
    F: FnOnce() -> anyhow::Result<Settings>,
{
    let mut out = Output::new(stdout_additional);

    match parser::parse_args(&args) {
        Command::Add { repo } => {
            let store = FileRepoStore::new(&load_settings()?.config_dir);
            let added = store.add(&repo).context("error adding repo")?;
            out.println(&format!("added {added}"))?;
        }
        Command::Remove { repo } => {
            let store = FileRepoStore::new(&load_settings()?.config_dir);
            let removed = store.remove(&repo).context("error removing repo")?;
            out.println(&format!("removed {removed}"))?;
        }
        Command::List => list(&load_settings()?, &mut out).await?,
        Command::Help => out.println(HELP)?,
        Command::Usage(usage) => return Err(UsageError(usage).into()),
        Command::Unknown(cmd) => {
            return Err(UsageError(format!("unknown command: {cmd}\n{}", parser::USAGE)).into());
        }
    }
    Ok(())
}

async fn list(settings: &Settings, out: &mut Output<'_>) -> anyhow::Result<()> {
    let store = FileRepoStore::new(&settings.config_dir);
    let repos = store.load().context("error loading repos")?;
    if repos.is_empty() {
        out.println(NO_REPOS)?;
        return Ok(());
    }

    let client = GitHubClient::new(&settings.api_base_url, settings.token.clone())?;
    let outcomes = aggregate::list_all(&client, &repos).await;
    out.println(&table::render_table(&outcomes))?;
    Ok(())
}

/// Process exit status for a failed run: 2 for usage errors, 1 otherwise.
pub fn exit_code(err: &anyhow::Error) -> u8 {
    if err.downcast_ref::<UsageError>().is_some() {
        2
    } else {
        1
    }
}
