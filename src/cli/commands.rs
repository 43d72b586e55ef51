//! Command dispatch

use std::io;

use clap::CommandFactory;
use clap_complete::generate;
use tracing::{debug, instrument};

use crate::application::OutlineEditor;
use crate::cli::args::{Cli, Commands, ConfigCommands};
use crate::cli::error::{CliError, CliResult};
use crate::cli::output;
use crate::config::{global_config_path, Settings};
use crate::infrastructure::{Session, TerminalScreen};

/// Label of the root line when printing an outline.
const OUTLINE_LABEL: &str = "outline";

pub fn execute_command(cli: &Cli, settings: &Settings) -> CliResult<()> {
    match &cli.command {
        None => cmd_run(settings, false),
        Some(Commands::Run { print_on_exit }) => cmd_run(settings, *print_on_exit),
        Some(Commands::Config { command }) => cmd_config(command, settings),
        Some(Commands::Completion { shell }) => {
            let mut cmd = Cli::command();
            let name = cmd.get_name().to_string();
            generate(*shell, &mut cmd, name, &mut io::stdout());
            Ok(())
        }
    }
}

#[instrument(level = "debug", skip(settings))]
fn cmd_run(settings: &Settings, print_on_exit: bool) -> CliResult<()> {
    let mut session = Session::new(settings, OutlineEditor::new());
    {
        let mut screen = TerminalScreen::enter()?;
        session.run(&mut screen)?;
        // screen dropped here: terminal restored before printing
    }
    if print_on_exit || settings.print_on_exit {
        let editor = session.into_editor();
        output::info(&editor.view().to_tree(OUTLINE_LABEL));
    }
    Ok(())
}

fn cmd_config(command: &ConfigCommands, settings: &Settings) -> CliResult<()> {
    match command {
        ConfigCommands::Show => {
            debug!(?settings, "effective settings");
            output::info(&settings.to_toml()?);
        }
        ConfigCommands::Path => {
            let path = global_config_path().ok_or_else(|| {
                CliError::Usage("cannot determine config directory (no home directory)".into())
            })?;
            output::info(&path.display());
        }
        ConfigCommands::Template => output::info(&Settings::template()),
    }
    Ok(())
}
