use clap::{ArgAction, Parser, Subcommand, ValueEnum};
use std::path::PathBuf;

#[derive(Parser)]
#[command(name = "lectern")]
#[command(author, version, about)]
#[command(long_about = "A slide presentation engine with animated transitions.\n\n\
    Runs the built-in demo deck in a viewer window.\n\n\
    Examples:\n  \
    lectern                          Present the demo deck (fullscreen)\n  \
    lectern --windowed --slide 3     Open slide 3 in a window\n  \
    lectern --transition slide-left  Use the Slide Left effect\n  \
    lectern export -o out            Save every slide as PNG")]
#[command(propagate_version = true)]
#[command(args_conflicts_with_subcommands = true)]
pub struct Cli {
    #[command(subcommand)]
    pub command: Option<Commands>,

    /// Launch in a window instead of fullscreen
    #[arg(long, global = false)]
    pub windowed: bool,

    /// Start on a specific slide (1-indexed)
    #[arg(long, global = false)]
    pub slide: Option<usize>,

    /// Color theme (light or dark)
    #[arg(long, global = false)]
    pub theme: Option<String>,

    /// Transition effect (Fade, Slide Left, Slide Right)
    #[arg(long, global = false)]
    pub transition: Option<String>,

    /// Increase output verbosity (-v for debug, -vv for trace)
    #[arg(short, long, action = ArgAction::Count, global = true)]
    pub verbose: u8,

    /// Suppress non-essential output
    #[arg(short, long, global = true)]
    pub quiet: bool,

    /// Disable colored output
    #[arg(long, global = true)]
    pub no_color: bool,
}

#[derive(Subcommand)]
pub enum Commands {
    /// View and modify configuration
    Config {
        #[command(subcommand)]
        command: ConfigCommands,
    },

    /// Generate shell completions
    Completion {
        /// Target shell
        #[arg(value_enum)]
        shell: Shell,
    },

    /// Export slides as PNG images
    Export {
        /// Output directory for PNG files
        #[arg(short, long, default_value = "export")]
        output_dir: PathBuf,

        /// Export width in pixels
        #[arg(long, default_value = "1200")]
        width: u32,

        /// Export height in pixels
        #[arg(long, default_value = "800")]
        height: u32,

        /// Color theme (light or dark)
        #[arg(long)]
        theme: Option<String>,
    },

    /// Show version information
    Version,
}

#[derive(Subcommand)]
pub enum ConfigCommands {
    /// Display current configuration
    Show,

    /// Set a configuration value
    Set {
        /// Configuration key (e.g. defaults.theme, defaults.transition, defaults.transition_ms)
        key: String,

        /// Value to set
        value: String,
    },
}

#[derive(Clone, ValueEnum)]
pub enum Shell {
    Bash,
    Zsh,
    Fish,
    Powershell,
}

impl Cli {
    pub fn run(self) -> anyhow::Result<()> {
        match self.command {
            Some(Commands::Config { command }) => crate::commands::config::run(command),
            Some(Commands::Completion { shell }) => {
                crate::commands::completion::run(shell);
                Ok(())
            }
            Some(Commands::Export {
                output_dir,
                width,
                height,
                theme,
            }) => crate::commands::export::run(output_dir, width, height, theme),
            Some(Commands::Version) => {
                crate::commands::version::run();
                Ok(())
            }
            None => crate::app::run(crate::app::LaunchOptions {
                windowed: self.windowed,
                slide: self.slide,
                theme: self.theme,
                transition: self.transition,
            }),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use clap::CommandFactory;

    #[test]
    fn cli_definition_is_valid() {
        Cli::command().debug_assert();
    }

    #[test]
    fn viewer_flags_parse() {
        let cli = Cli::try_parse_from([
            "lectern",
            "--windowed",
            "--slide",
            "3",
            "--transition",
            "slide-left",
        ])
        .unwrap();
        assert!(cli.command.is_none());
        assert!(cli.windowed);
        assert_eq!(cli.slide, Some(3));
        assert_eq!(cli.transition.as_deref(), Some("slide-left"));
    }

    #[test]
    fn export_defaults_to_reference_size() {
        let cli = Cli::try_parse_from(["lectern", "export"]).unwrap();
        match cli.command {
            Some(Commands::Export {
                output_dir,
                width,
                height,
                theme,
            }) => {
                assert_eq!(output_dir, PathBuf::from("export"));
                assert_eq!((width, height), (1200, 800));
                assert!(theme.is_none());
            }
            _ => panic!("expected export"),
        }
    }

    #[test]
    fn verbosity_counts() {
        let cli = Cli::try_parse_from(["lectern", "-vv", "version"]).unwrap();
        assert_eq!(cli.verbose, 2);
    }
}
