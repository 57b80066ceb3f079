use clap::Parser;

mod cli;

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let args = cli::Args::parse();
    cli::init_tracing(args.verbose);
    args.command.run(&args.config).await
}
