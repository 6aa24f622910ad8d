use crate::cli::Command;

pub mod browse;
pub mod list;
pub mod toggle;

pub async fn dispatch(cli: crate::cli::Cli) -> Result<(), String> {
    match cli.command {
        Command::List(args) => list::run(args).await,
        Command::Browse(args) => browse::run(args).await,
        Command::Toggle(args) => toggle::run(args).await,
    }
}
