use anyhow::Result;
use clap::builder::FalseyValueParser;
use clap::{CommandFactory, Parser, Subcommand, ValueHint};
use env_logger::Env;
use std::path::{Path, PathBuf};
use wtt::commands::create::CreateOptions;
use wtt::commands::shell_init::{self, Shell};
use wtt::commands::{Session, context, create, init, jump, list, remove, repo};

#[derive(Parser)]
#[command(name = "wtt-bin")]
#[command(about = "Create, list and remove git worktrees, with a remembered repository context")]
#[command(version)]
pub struct Cli {
    /// Print the path of the worktree that has this branch checked out
    #[arg(value_hint = ValueHint::Other)]
    branch: Option<String>,

    /// Print the shell wrapper and prompt integration for a shell
    #[arg(long = "init", value_enum, value_name = "SHELL")]
    init_shell: Option<Shell>,

    /// Directory holding the known-repos list and the current repo
    #[arg(
        long,
        global = true,
        env = "WTT_CONFIG_DIR",
        hide = true,
        value_hint = ValueHint::DirPath
    )]
    config_dir: Option<PathBuf>,

    /// Use the numbered prompt even when fzf is installed
    #[arg(
        long,
        global = true,
        env = "WTT_NO_FZF",
        value_parser = FalseyValueParser::new()
    )]
    no_fzf: bool,

    #[command(subcommand)]
    command: Option<Commands>,
}

#[derive(Subcommand)]
enum Commands {
    /// Create a new worktree (a random branch name is used if none is given)
    Create {
        /// Branch to create, or an existing branch to check out
        #[arg(value_hint = ValueHint::Other)]
        branch: Option<String>,
        /// Base commit, branch or ref for a new branch (default: HEAD)
        #[arg(short, long)]
        base: Option<String>,
        /// Start Claude Code in the new worktree
        #[arg(short, long)]
        claude: bool,
    },
    /// Pick a worktree and print its path
    List,
    /// Remove a worktree
    Remove {
        /// Branch whose worktree to remove. If not provided, opens interactive selection
        #[arg(value_hint = ValueHint::Other)]
        branch: Option<String>,
        /// Skip the confirmation prompt and remove even with local changes
        #[arg(short, long)]
        force: bool,
    },
    /// Print the active repository name (for prompt integrations)
    #[command(hide = true)]
    Context,
    /// Select the active repository context
    Repo {
        #[command(subcommand)]
        action: Option<RepoAction>,
    },
    /// Create a .wtt.toml configuration file in the repository root
    Init {
        /// Overwrite an existing .wtt.toml
        #[arg(short, long)]
        force: bool,
    },
    /// Print version
    Version,
    /// Generate shell completions
    Completions {
        /// Shell to generate completions for
        #[arg(value_enum)]
        shell: Shell,
    },
}

#[derive(Subcommand)]
enum RepoAction {
    /// Pick the active repository, or clear it
    List,
    /// Remove a repository from the known repos list
    Remove {
        /// Skip the confirmation prompt
        #[arg(short, long)]
        force: bool,
    },
}

fn print_path(path: &Path) {
    println!("{}", path.display());
}

fn main() -> Result<()> {
    env_logger::Builder::from_env(Env::default().filter_or("WTT_LOG", "warn"))
        .format_timestamp(None)
        .init();

    let cli = Cli::parse();
    let open_session = || Session::new(cli.config_dir.clone(), cli.no_fzf);

    match &cli.command {
        None => {
            if let Some(shell) = cli.init_shell {
                print!("{}", shell_init::shell_integration(shell));
            } else if let Some(branch) = &cli.branch {
                print_path(&jump::jump_to_branch(&open_session()?, branch)?);
            } else {
                Cli::command().print_help()?;
            }
        }
        Some(Commands::Create {
            branch,
            base,
            claude,
        }) => {
            let options = CreateOptions {
                branch: branch.clone(),
                base: base.clone(),
                launch_companion: *claude,
            };
            print_path(&create::create_worktree(&open_session()?, &options)?);
        }
        Some(Commands::List) => {
            if let Some(path) = list::list_worktrees(&open_session()?)? {
                print_path(&path);
            }
        }
        Some(Commands::Remove { branch, force }) => {
            remove::remove_worktree(&open_session()?, branch.as_deref(), *force)?;
        }
        Some(Commands::Context) => {
            // Prompts call this on every render: stay quiet and succeed.
            if let Ok(session) = open_session()
                && let Some(name) = context::current_context(&session)
            {
                println!("{name}");
            }
        }
        Some(Commands::Repo { action }) => {
            let session = open_session()?;
            match action {
                None => repo::switch_repo(&session, false)?,
                Some(RepoAction::List) => repo::switch_repo(&session, true)?,
                Some(RepoAction::Remove { force }) => repo::remove_repo(&session, *force)?,
            }
        }
        Some(Commands::Init { force }) => {
            init::scaffold_config(&open_session()?, *force)?;
        }
        Some(Commands::Version) => {
            println!("{}", env!("CARGO_PKG_VERSION"));
        }
        Some(Commands::Completions { shell }) => {
            let mut cmd = Cli::command();
            shell_init::generate_completions(*shell, &mut cmd);
        }
    }

    Ok(())
}
