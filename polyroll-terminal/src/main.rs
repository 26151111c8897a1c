/// Polyroll - roll polyhedral dice and see the result face-on in the terminal
///
/// Usage: polyroll [NOTATION] [--style PATH]
/// Controls:
///   - 1-6: Select d4, d6, d8, d10, d12, d20
///   - Space / Enter: Roll
///   - [ / ]: Fewer / more dice
///   - - / +: Lower / raise the modifier
///   - WASD / Arrow Keys: Turn the die
///   - 0: Face the rolled number again
///   - C: Clear history
///   - Q/ESC: Quit

use anyhow::{anyhow, Context};
use polyroll_terminal::config::{load_style, CliArgs};
use polyroll_terminal::{Action, DiceViewer, TerminalApp};

fn main() -> anyhow::Result<()> {
    env_logger::init();

    let cli = CliArgs::parse(std::env::args()).map_err(|e| anyhow!(e))?;
    let style = load_style(cli.style_path.as_deref());

    let mut viewer = DiceViewer::new(style, cli.request, rand::thread_rng());
    if cli.roll_now {
        viewer.apply(Action::Roll);
    }

    let mut app = TerminalApp::new(viewer).context("terminal is not available")?;
    app.run().context("terminal session failed")?;

    if let Some(outcome) = app.viewer().last() {
        println!("{} -> {:?} = {}", app.viewer().request(), outcome.results, outcome.total);
    }
    Ok(())
}
