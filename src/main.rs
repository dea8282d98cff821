use log::error;
use lsh::config::Config;
use lsh::{BuiltinTable, PROGRAM, ProcessLauncher, Repl, logger};
use std::io;
use std::process::ExitCode;

fn main() -> ExitCode {
    let config: Config = argh::from_env();
    if let Err(err) = logger::init(config.log_level) {
        eprintln!("{}: failed to install logger: {}", PROGRAM, err);
        return ExitCode::FAILURE;
    }

    let table = BuiltinTable::default();
    let mut repl =
        Repl::new(io::stdin().lock(), &table, ProcessLauncher).with_prompt(!config.no_prompt);
    match repl.run(&mut io::stdout().lock(), &mut io::stderr().lock()) {
        Ok(()) => ExitCode::SUCCESS,
        Err(err) => {
            error!("{}", err);
            ExitCode::FAILURE
        }
    }
}
