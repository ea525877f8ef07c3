use log::{error, Level, LevelFilter, Metadata, Record};
use srcrcon::{
    client::{single_command, ClientConfig},
    notify::ConsoleNotifier,
};
use std::{env, error::Error, process::ExitCode};

struct SimpleLogger {
    level: Level,
}

impl log::Log for SimpleLogger {
    fn enabled(&self, metadata: &Metadata) -> bool {
        metadata.level() <= self.level
    }

    fn log(&self, record: &Record) {
        if self.enabled(record.metadata()) {
            println!("{} - {}", record.level(), record.args());
        }
    }

    fn flush(&self) {}
}

static INFO_LOGGER: SimpleLogger = SimpleLogger { level: Level::Info };
static DEBUG_LOGGER: SimpleLogger = SimpleLogger { level: Level::Debug };

const USAGE: &str = "usage: srcrcon <host> <port> <password> <command...>";

fn parse_args() -> Result<(ClientConfig, String), Box<dyn Error>> {
    let mut args = env::args().skip(1);
    let host = args.next().ok_or(USAGE)?;
    let port = args.next().ok_or(USAGE)?.parse::<u16>()?;
    let password = args.next().ok_or(USAGE)?;
    let command = args.collect::<Vec<_>>().join(" ");

    Ok((ClientConfig::new(host, password).with_port(port), command))
}

#[tokio::main]
async fn main() -> ExitCode {
    let (logger, filter) = if env::var_os("SRCRCON_DEBUG").is_some() {
        (&DEBUG_LOGGER, LevelFilter::Debug)
    } else {
        (&INFO_LOGGER, LevelFilter::Info)
    };
    let _ = log::set_logger(logger).map(|()| log::set_max_level(filter));

    let (config, command) = match parse_args() {
        Ok(parsed) => parsed,
        Err(err) => {
            eprintln!("{}", err);
            return ExitCode::FAILURE;
        }
    };

    match single_command(&config, &command, &mut ConsoleNotifier).await {
        Ok(_) => ExitCode::SUCCESS,
        Err(err) => {
            error!("error: {}", err);
            ExitCode::FAILURE
        }
    }
}
