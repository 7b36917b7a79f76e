mod demo;
mod schema;
mod student;

use clap::{Parser, Subcommand};
use demo::Demo;
use schema::PrintSchema;
use tracing::{error, level_filters::LevelFilter};
use tracing_subscriber::{
    fmt::{format, layer},
    layer::SubscriberExt,
    util::SubscriberInitExt,
};

#[derive(Subcommand, Debug)]
enum Subcommands {
    Demo(Demo),
    Schema(PrintSchema),
}

#[derive(Parser, Debug)]
struct Args {
    #[command(subcommand)]
    command: Subcommands,
}

#[tokio::main]
async fn main() {
    let args = Args::parse();

    tracing_subscriber::registry()
        .with(LevelFilter::INFO)
        .with(layer().event_format(format().without_time().with_target(false).compact()))
        .init();

    let r = match args.command {
        Subcommands::Demo(cmd) => cmd.run().await,
        Subcommands::Schema(cmd) => cmd.run(),
    };

    if let Err(e) = r {
        error!("Command execution failed: {e:#}");
        std::process::exit(1);
    }
}
