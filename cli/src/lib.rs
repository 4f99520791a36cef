//! Command-line plumbing shared by the `hub-model` and `list-derived` binaries.

use std::io::Write;

use clap::{ArgAction, Args};

/// Logging arguments.
#[derive(Clone, Debug, Args)]
pub struct Logging {
    /// Suppress warnings.
    ///
    /// By default, only warnings are printed. By setting this flag, warnings will be disabled.
    #[arg(short = 'q', long, global = true, conflicts_with = "verbose")]
    pub quiet: bool,

    /// Verbosity.
    ///
    /// Flag can be set multiply times to increase verbosity, or left unset for quiet mode.
    #[arg(short = 'v', long, action = ArgAction::Count, global = true)]
    pub verbose: u8,

    /// Print CLI arguments for debugging.
    #[arg(long, hide = true, global = true)]
    pub debug: bool,
}

impl Logging {
    pub fn level(&self) -> log::LevelFilter {
        if self.quiet {
            log::LevelFilter::Off
        } else {
            match self.verbose {
                0 => log::LevelFilter::Warn,
                1 => log::LevelFilter::Info,
                2 => log::LevelFilter::Debug,
                _ => log::LevelFilter::Trace,
            }
        }
    }

    /// Sets up logging to stderr, with records prefixed by `name`.
    pub fn init(&self, name: &'static str) {
        match env_logger::Builder::new()
            .filter_level(self.level())
            .target(env_logger::Target::Stderr)
            .format(move |buf, record| {
                let level = record.level().as_str().to_lowercase();
                let args = record.args();
                writeln!(buf, "[{name} {level:>5}] {args}")
            })
            .try_init()
        {
            Ok(()) => (),
            Err(e) => eprintln!("failed to setup logger: {e}"),
        }
    }
}

/// Exits with status 1 after printing the error, if any.
pub fn exit_on_error(result: Result<(), anyhow::Error>) {
    match result {
        Ok(()) => (),
        Err(e) => {
            eprintln!("{e}");
            std::process::exit(1);
        }
    }
}
