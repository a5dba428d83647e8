//! ftclient - Entry Point
//!
//! Command-line client for the two-channel file-transfer server.
//!
//! ```text
//! ftclient <host> <control port> -l <data port>
//! ftclient <host> <control port> -g <file.txt> <data port>
//! ```

use clap::{ArgGroup, Parser};
use log::info;
use std::path::PathBuf;
use std::process::ExitCode;

use ftclient::error::handlers::{
    EXIT_FAILURE, EXIT_INTERRUPTED, EXIT_SUCCESS, EXIT_USAGE, error_to_exit_code, handle_error,
};
use ftclient::transfer::OverwritePolicy;
use ftclient::utils::logging::setup_logging;
use ftclient::{Client, ClientConfig, ClientError, TransferOutcome, TransferRequest};

#[derive(Parser, Debug)]
#[command(author, version, about, long_about = None)]
#[command(group(ArgGroup::new("command").required(true).args(["list", "get"])))]
struct Args {
    /// Server host
    host: String,

    /// Server control port (1024-65535)
    #[arg(value_parser = clap::value_parser!(u16).range(1024..))]
    control_port: u16,

    /// Port the server opens for the data connection (1024-65535)
    #[arg(value_parser = clap::value_parser!(u16).range(1024..))]
    data_port: u16,

    /// List the server's directory
    #[arg(short = 'l', long = "list")]
    list: bool,

    /// Retrieve a .txt file
    #[arg(short = 'g', long = "get", value_name = "FILE")]
    get: Option<String>,

    /// Configuration file (defaults to ./ftclient.toml if present)
    #[arg(long)]
    config: Option<PathBuf>,

    /// Existing local file handling: ask, always or never
    #[arg(long)]
    overwrite: Option<OverwritePolicy>,

    /// Directory retrieved files are saved to
    #[arg(long, value_name = "DIR")]
    output_dir: Option<String>,
}

impl Args {
    fn request(&self) -> Result<TransferRequest, ClientError> {
        match &self.get {
            Some(filename) => TransferRequest::get(
                self.host.as_str(),
                self.control_port,
                filename.as_str(),
                self.data_port,
            ),
            None => TransferRequest::list(self.host.as_str(), self.control_port, self.data_port),
        }
    }
}

#[tokio::main]
async fn main() -> ExitCode {
    setup_logging();
    let args = Args::parse();

    let request = match args.request() {
        Ok(request) => request,
        Err(e) => {
            eprintln!("{}", e);
            return ExitCode::from(error_to_exit_code(&e));
        }
    };

    let mut config = match ClientConfig::load(args.config.as_deref()) {
        Ok(config) => config,
        Err(e) => {
            eprintln!("Configuration error: {}", e);
            return ExitCode::from(EXIT_USAGE);
        }
    };
    if let Some(policy) = args.overwrite {
        config.overwrite = policy;
    }
    if let Some(dir) = args.output_dir {
        config.download_dir = dir;
    }

    let mut prompt = config.overwrite.prompt();
    let client = Client::new(config);

    tokio::select! {
        result = client.run(&request, &mut prompt) => report(&request, result),
        _ = tokio::signal::ctrl_c() => {
            info!("Interrupted, closing connections");
            eprintln!("Interrupted");
            ExitCode::from(EXIT_INTERRUPTED)
        }
    }
}

/// Prints the outcome the way a user expects to read it.
fn report(request: &TransferRequest, result: Result<TransferOutcome, ClientError>) -> ExitCode {
    match result {
        Ok(TransferOutcome::Listed(entries)) => {
            println!("Receiving directory structure from {}", request.data_addr());
            for entry in entries {
                println!("{}", entry);
            }
            ExitCode::from(EXIT_SUCCESS)
        }
        Ok(TransferOutcome::Downloaded { path, bytes }) => {
            println!("File transfer complete: {} ({} bytes)", path.display(), bytes);
            ExitCode::from(EXIT_SUCCESS)
        }
        Ok(TransferOutcome::Declined { path }) => {
            println!("Kept existing {}", path.display());
            ExitCode::from(EXIT_SUCCESS)
        }
        Err(ClientError::FileNotFoundOnServer(ref name)) => {
            eprintln!("{} says File not found: {}", request.control_addr(), name);
            ExitCode::from(EXIT_FAILURE)
        }
        Err(e) => {
            handle_error(&e);
            eprintln!("{}", e);
            ExitCode::from(error_to_exit_code(&e))
        }
    }
}
