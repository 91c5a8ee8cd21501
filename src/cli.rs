use std::path::PathBuf;

use clap::{ArgAction, Args, Parser, Subcommand};

use crate::config::SettingsOptions;

/// CLI arguments parser using `clap`
#[derive(Parser, Debug)]
#[command(name = "git-profile", version, about = "Manage your git profiles")]
pub struct Cli {
    /// Profile file, or directory containing `.gitprofile` (default: ~/.gitprofile)
    #[arg(long, global = true, env = "GIT_PROFILE", value_name = "PATH")]
    pub profile: Option<PathBuf>,
    /// Use `.gitprofile` in the working directory as the profile file
    #[arg(long, global = true)]
    pub local: bool,
    /// Working directory (default: current directory)
    #[arg(long, global = true, value_name = "DIR")]
    pub pwd: Option<PathBuf>,
    /// Log to stderr; repeat for more detail (-d info, -dd debug)
    #[arg(short = 'd', long = "debug", action = ArgAction::Count, global = true)]
    pub debug: u8,
    /// Subcommand chosen to execute; the interactive menu runs without one
    #[command(subcommand)]
    pub command: Option<Commands>,
}

impl Cli {
    pub fn settings_options(&self) -> SettingsOptions {
        SettingsOptions {
            profile: self.profile.clone(),
            local: self.local,
            pwd: self.pwd.clone(),
        }
    }
}

/// Workspace given either positionally or with `-w`
#[derive(Args, Debug, Clone, Default)]
pub struct WorkspaceArg {
    /// Workspace of the profile
    #[arg(value_name = "WORKSPACE")]
    positional: Option<String>,
    /// Workspace of the profile
    #[arg(short = 'w', long = "workspace", value_name = "WORKSPACE", conflicts_with = "positional")]
    flag: Option<String>,
}

impl WorkspaceArg {
    pub fn value(&self) -> Option<&str> {
        self.flag.as_deref().or(self.positional.as_deref())
    }
}

// Subcommands
#[derive(Subcommand, Debug)]
pub enum Commands {
    /// Creates or updates a profile, prompting for missing values
    #[command(visible_alias = "add")]
    Set {
        #[command(flatten)]
        workspace: WorkspaceArg,
        /// Email of the profile
        #[arg(short, long)]
        email: Option<String>,
        /// Name of the profile
        #[arg(short, long)]
        name: Option<String>,
        /// Update an existing profile without asking
        #[arg(short, long)]
        yes: bool,
    },
    /// Shows a profile
    Get {
        #[command(flatten)]
        workspace: WorkspaceArg,
    },
    /// Lists all profiles, marking the one in use with `*`
    List {
        /// Show full profile details
        #[arg(short, long)]
        verbose: bool,
        /// Print profiles as JSON
        #[arg(long, conflicts_with = "verbose")]
        json: bool,
    },
    /// Deletes a profile
    Delete {
        #[command(flatten)]
        workspace: WorkspaceArg,
    },
    /// Writes a profile's identity into the git config
    #[command(visible_alias = "switch")]
    Use {
        #[command(flatten)]
        workspace: WorkspaceArg,
        /// Apply to the global git config instead of the repository
        #[arg(short, long)]
        global: bool,
    },
    /// Removes the profile identity from the git config
    #[command(visible_alias = "unuse")]
    Unset {
        /// Remove from the global git config instead of the repository
        #[arg(short, long)]
        global: bool,
    },
    /// Displays the profile in use
    Current {
        /// Read the global git config instead of the repository
        #[arg(short, long)]
        global: bool,
    },
    /// Rewrites the author of the last commit with a profile's identity
    Amend {
        #[command(flatten)]
        workspace: WorkspaceArg,
    },
    /// Displays version information
    Version,
}

#[cfg(test)]
mod tests {
    use super::*;
    use clap::CommandFactory;

    #[test]
    fn test_cli_definition_is_valid() {
        Cli::command().debug_assert();
    }

    #[test]
    fn test_workspace_positional_or_flag() {
        let cli = Cli::try_parse_from(["git-profile", "use", "work", "--global"]).unwrap();
        match cli.command {
            Some(Commands::Use { workspace, global }) => {
                assert_eq!(workspace.value(), Some("work"));
                assert!(global);
            }
            other => panic!("unexpected command: {other:?}"),
        }

        let cli = Cli::try_parse_from(["git-profile", "get", "-w", "home"]).unwrap();
        match cli.command {
            Some(Commands::Get { workspace }) => assert_eq!(workspace.value(), Some("home")),
            other => panic!("unexpected command: {other:?}"),
        }

        assert!(Cli::try_parse_from(["git-profile", "get", "a", "-w", "b"]).is_err());
    }

    #[test]
    fn test_global_options() {
        let cli = Cli::try_parse_from([
            "git-profile",
            "list",
            "-v",
            "--local",
            "--pwd",
            "/tmp/project",
            "-dd",
        ])
        .unwrap();

        assert_eq!(cli.debug, 2);
        let options = cli.settings_options();
        assert!(options.local);
        assert_eq!(options.pwd, Some(PathBuf::from("/tmp/project")));
        assert!(matches!(cli.command, Some(Commands::List { verbose: true, json: false })));
    }

    #[test]
    fn test_set_flags_and_alias() {
        let cli = Cli::try_parse_from([
            "git-profile", "add", "-w", "work", "-e", "a@b.com", "-n", "A B", "-y",
        ])
        .unwrap();
        match cli.command {
            Some(Commands::Set { workspace, email, name, yes }) => {
                assert_eq!(workspace.value(), Some("work"));
                assert_eq!(email.as_deref(), Some("a@b.com"));
                assert_eq!(name.as_deref(), Some("A B"));
                assert!(yes);
            }
            other => panic!("unexpected command: {other:?}"),
        }
    }
}
