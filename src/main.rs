use clap::Parser;
use std::process::ExitCode;

use zedws::ZedwsError;
use zedws::cli::{Cli, Command};
use zedws::config::{load_config, resolve_store_path};
use zedws::session::Session;
use zedws::{launch, query, rpc, store};

fn init_logging(verbose: bool) {
    let default = if verbose { "debug" } else { "warn" };
    env_logger::Builder::from_env(env_logger::Env::new().filter_or("ZEDWS_LOG", default))
        .format_timestamp(None)
        .target(env_logger::Target::Stderr)
        .init();
}

fn run() -> Result<(), ZedwsError> {
    let cli = Cli::parse();
    init_logging(cli.verbose);

    let config = load_config()?;
    let store_path = resolve_store_path(&config, cli.db);
    log::debug!("store: {}", store_path.display());

    match cli.command {
        Command::List(args) => query::handle_list(&mut Session::new(store_path, &config), &args),
        Command::Open(args) => launch::handle_open(&Session::new(store_path, &config), &args),
        Command::Rpc(args) => rpc::handle_rpc(&mut Session::new(store_path, &config), &args),
        Command::Locate => store::handle_locate(&store_path),
    }
}

fn main() -> ExitCode {
    match run() {
        Ok(()) => ExitCode::SUCCESS,
        Err(e) => {
            eprintln!("zedws: {e}");
            ExitCode::from(1)
        }
    }
}
