use anyhow::Result;
use clap::{Parser, ValueEnum};
use snake_pilot::session::{GameSession, Pilot};

#[derive(Parser)]
#[command(name = "snake_pilot")]
#[command(version, about = "Terminal snake with swappable manual and autopilot controls")]
struct Cli {
    /// Grid width
    #[arg(long, default_value = "32")]
    width: u32,

    /// Grid height
    #[arg(long, default_value = "32")]
    height: u32,

    /// Initial pilot (Tab swaps at runtime)
    #[arg(long, default_value = "manual")]
    pilot: PilotArg,
}

#[derive(Clone, Copy, ValueEnum)]
enum PilotArg {
    /// Steer with the keyboard
    Manual,
    /// Let the greedy autopilot chase the target
    Auto,
}

impl From<PilotArg> for Pilot {
    fn from(arg: PilotArg) -> Self {
        match arg {
            PilotArg::Manual => Pilot::Manual,
            PilotArg::Auto => Pilot::Auto,
        }
    }
}

#[tokio::main]
async fn main() -> Result<()> {
    let cli = Cli::parse();

    let mut session = GameSession::new(cli.width, cli.height, cli.pilot.into())?;
    session.run().await?;

    Ok(())
}
