mod script;
mod session;

use std::fs::File;
use std::io::{self, BufRead, BufReader};
use std::path::Path;

use oscmix_core::config::Config;

use session::Session;

fn init_logging(verbose: bool) {
    use simplelog::{ColorChoice, LevelFilter, TermLogger, TerminalMode};

    let log_level = if verbose { LevelFilter::Debug } else { LevelFilter::Warn };

    if let Err(e) = TermLogger::init(
        log_level,
        simplelog::Config::default(),
        TerminalMode::Stderr,
        ColorChoice::Auto,
    ) {
        eprintln!("oscmix: logger unavailable: {}", e);
    }

    log::info!("oscmix starting (log level: {:?})", log_level);
}

fn usage() -> ! {
    eprintln!("usage: oscmix [--verbose] [--config <path>] [script]");
    std::process::exit(2);
}

fn main() -> io::Result<()> {
    let args: Vec<String> = std::env::args().skip(1).collect();
    let verbose = args.iter().any(|a| a == "--verbose" || a == "-v");
    init_logging(verbose);

    let mut config_path = None;
    let mut script_path = None;
    let mut iter = args.iter();
    while let Some(arg) = iter.next() {
        match arg.as_str() {
            "--verbose" | "-v" => {}
            "--config" => match iter.next() {
                Some(path) => config_path = Some(path.clone()),
                None => usage(),
            },
            "--help" | "-h" => usage(),
            other if other.starts_with('-') => usage(),
            other => script_path = Some(other.to_string()),
        }
    }

    let config = match config_path {
        Some(path) => {
            let mut config = Config::embedded();
            config.merge_file(Path::new(&path));
            config
        }
        None => Config::load(),
    };

    let mut session = Session::mount(&config);
    let input: Box<dyn BufRead> = match script_path {
        Some(path) => Box::new(BufReader::new(File::open(path)?)),
        None => Box::new(BufReader::new(io::stdin())),
    };

    let stdout = io::stdout();
    let mut out = stdout.lock();
    for (number, line) in input.lines().enumerate() {
        let line = line?;
        match script::parse_line(&line) {
            Ok(Some(command)) => session.run(command, &mut out)?,
            Ok(None) => {}
            Err(e) => log::warn!("line {}: {}", number + 1, e),
        }
    }
    Ok(())
}
