use argh::FromArgs;
use log::LevelFilter;

#[derive(FromArgs, Debug)]
/// A minimal interactive command interpreter.
pub struct Config {
    #[argh(switch)]
    /// do not print the working-directory prompt before each line
    pub no_prompt: bool,

    #[argh(option, default = "LevelFilter::Warn", from_str_fn(parse_level))]
    /// maximum level of diagnostics written to stderr: off, error, warn, info, debug or trace
    pub log_level: LevelFilter,
}

fn parse_level(value: &str) -> Result<LevelFilter, String> {
    value
        .parse()
        .map_err(|_| format!("unknown log level: {}", value))
}
