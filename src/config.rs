use std::{env, fmt::Display, fs::File, io, str::FromStr, sync};

use tracing::{info, warn};
use tracing_subscriber::fmt::writer::BoxMakeWriter;

pub struct Config {
    pub port: u16,
    pub graphql_uri: String,
    pub requests_path: Option<String>,
    pub log_path: Option<String>,
}

impl Config {
    pub fn load() -> Self {
        Self {
            port: try_load("AXUM_PORT", 8080),
            graphql_uri: try_load("GRAPHQL_URI", String::from("http://localhost:4000/graphql")),
            requests_path: optional("REQUESTS_PATH"),
            log_path: optional("LOG_PATH"),
        }
    }

    /// Where JSON logs go: the `LOG_PATH` file when it can be created, stdout otherwise.
    /// Called before the subscriber exists, so failures go to stderr.
    pub fn log_writer(&self) -> BoxMakeWriter {
        match &self.log_path {
            Some(path) => match File::create(path) {
                Ok(file) => BoxMakeWriter::new(sync::Mutex::new(file)),
                Err(e) => {
                    eprintln!("cannot open log file {}: {}, logging to stdout", path, e);
                    BoxMakeWriter::new(io::stdout)
                }
            },
            None => BoxMakeWriter::new(io::stdout),
        }
    }
}

fn var(key: &str) -> Option<String> {
    env::var(key).ok().filter(|v| !v.trim().is_empty())
}

fn optional(key: &str) -> Option<String> {
    let value = var(key);
    if value.is_none() {
        info!("{key} not set");
    }
    value
}

fn try_load<T: FromStr + Display>(key: &str, default: T) -> T
where
    T::Err: Display,
{
    match var(key) {
        Some(raw) => raw.parse().unwrap_or_else(|e| {
            warn!("Invalid {key} value {raw}: {e}, using default: {default}");
            default
        }),
        None => {
            info!("{key} not set, using default: {default}");
            default
        }
    }
}
