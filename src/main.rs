use clap::Parser;
use livego::cli::{
    audit, endpoints, forensics, handle_completions, handle_config_init, monitor, scan, Cli,
    Commands, ConfigCommands,
};

type CliResult<T> = Result<T, Box<dyn std::error::Error>>;

fn print_output(result: CliResult<String>) -> CliResult<()> {
    let output = result?;
    println!("{}", output);
    Ok(())
}

#[tokio::main]
async fn main() {
    let cli = Cli::parse();

    let result = match cli.command {
        Commands::Serve(args) => livego::cli::serve::run_serve(args).await,
        Commands::Scan(args) => print_output(scan::handle_scan(&args).await),
        Commands::Audit(args) => print_output(audit::handle_audit(&args).await),
        Commands::Forensics(args) => print_output(forensics::handle_forensics(&args).await),
        Commands::Monitor(args) => monitor::handle_monitor(&args).await,
        Commands::Endpoints(args) => print_output(endpoints::handle_endpoints(&args)),
        Commands::Config(config_cmd) => match config_cmd {
            ConfigCommands::Init(args) => handle_config_init(&args),
        },
        Commands::Completions(args) => {
            handle_completions(&args);
            Ok(())
        }
    };

    if let Err(e) = result {
        eprintln!("Error: {}", e);
        std::process::exit(1);
    }
}
