use std::path::PathBuf;
use std::sync::Arc;

use tokio::io::{AsyncBufReadExt, AsyncWriteExt, BufReader};
use tracing::{info, warn};

use crate::collaborators::Collaborators;
use crate::config::{self, Config, ConfigError};
use crate::event_store::{self, SqliteAnalytics, StoreError};
use crate::logging::{self, LoggingError};
use crate::lookup::{DirectoryLookup, HttpDirectoryLookup, LookupDebouncer, OfflineLookup};
use crate::palette::CommandPalette;
use crate::transport::{self, PaletteRequest};

#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct RuntimeOptions {
    pub config_path: Option<PathBuf>,
    pub no_builtins: bool,
    pub offline: bool,
}

#[derive(Debug, thiserror::Error)]
pub enum RuntimeError {
    #[error("config error: {0}")]
    Config(#[from] ConfigError),
    #[error("event store error: {0}")]
    Store(#[from] StoreError),
    #[error("logging error: {0}")]
    Logging(#[from] LoggingError),
    #[error("io error: {0}")]
    Io(#[from] std::io::Error),
    #[error("{0}")]
    Usage(String),
}

pub fn parse_cli_args(args: &[String]) -> Result<RuntimeOptions, RuntimeError> {
    let mut options = RuntimeOptions::default();
    let mut iter = args.iter();
    while let Some(arg) = iter.next() {
        match arg.as_str() {
            "--no-builtins" => options.no_builtins = true,
            "--offline" => options.offline = true,
            "--config" => {
                let Some(path) = iter.next() else {
                    return Err(RuntimeError::Usage("--config requires a path".into()));
                };
                options.config_path = Some(PathBuf::from(path));
            }
            other => {
                if let Some(path) = other.strip_prefix("--config=") {
                    options.config_path = Some(PathBuf::from(path));
                } else {
                    return Err(RuntimeError::Usage(format!("unknown argument '{other}'")));
                }
            }
        }
    }
    Ok(options)
}

pub fn run_with_options(options: RuntimeOptions) -> Result<(), RuntimeError> {
    let config = config::load(options.config_path.as_deref())?;
    if !config.config_path.exists() {
        config::save(&config)?;
        eprintln!(
            "[palette-core] wrote default config to {}",
            config.config_path.display()
        );
    }

    match logging::init(&config.log_filter) {
        Ok(path) => eprintln!("[palette-core] logging to {}", path.display()),
        Err(error) => eprintln!("[palette-core] logging disabled: {error}"),
    }

    let palette = build_palette(&config, &options)?;
    let lookup: Arc<dyn DirectoryLookup> = if options.offline {
        Arc::new(OfflineLookup)
    } else {
        Arc::new(HttpDirectoryLookup::from_config(&config))
    };

    let runtime = tokio::runtime::Builder::new_current_thread()
        .enable_all()
        .build()?;
    runtime.block_on(serve_stdio(palette, lookup, &config))
}

pub fn build_palette(
    config: &Config,
    options: &RuntimeOptions,
) -> Result<CommandPalette, RuntimeError> {
    let mut collaborators = Collaborators::logging();
    if config.analytics_enabled {
        let db = event_store::open_from_config(config)?;
        collaborators = collaborators.with_analytics(Arc::new(SqliteAnalytics::new(db)));
    }

    let mut palette = CommandPalette::new(collaborators);
    if !options.no_builtins {
        palette.mount_builtins();
    }
    info!(
        commands = palette.registry().len(),
        analytics = config.analytics_enabled,
        offline = options.offline,
        "palette ready"
    );
    Ok(palette)
}

/// Reads JSON requests from stdin, one per line, and answers each with the
/// resulting view on stdout. Completed lookups push an extra view.
async fn serve_stdio(
    mut palette: CommandPalette,
    lookup: Arc<dyn DirectoryLookup>,
    config: &Config,
) -> Result<(), RuntimeError> {
    let (mut debouncer, mut outcomes) = LookupDebouncer::from_config(lookup, config);
    let mut lines = BufReader::new(tokio::io::stdin()).lines();
    let mut stdout = tokio::io::stdout();

    loop {
        let response = tokio::select! {
            line = lines.next_line() => {
                let Some(line) = line? else {
                    info!("stdin closed; shutting down");
                    break;
                };
                if line.trim().is_empty() {
                    continue;
                }
                match serde_json::from_str::<PaletteRequest>(&line) {
                    Ok(request) => {
                        let input_before = palette.input().to_string();
                        let response = transport::handle_request(&mut palette, request);
                        if palette.input() != input_before {
                            debouncer.on_input_changed(palette.input());
                        }
                        response
                    }
                    Err(error) => {
                        warn!(%error, "rejected request line");
                        transport::invalid_json(&error)
                    }
                }
            }
            Some(outcome) = outcomes.recv() => {
                if !debouncer.apply(&mut palette, outcome) {
                    continue;
                }
                transport::handle_request(&mut palette, PaletteRequest::View)
            }
        };

        let mut encoded = transport::encode_response(&response);
        encoded.push('\n');
        stdout.write_all(encoded.as_bytes()).await?;
        stdout.flush().await?;
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::{parse_cli_args, RuntimeOptions};
    use std::path::PathBuf;

    fn args(values: &[&str]) -> Vec<String> {
        values.iter().map(|v| v.to_string()).collect()
    }

    #[test]
    fn no_args_yield_defaults() {
        assert_eq!(
            parse_cli_args(&[]).expect("empty args should parse"),
            RuntimeOptions::default()
        );
    }

    #[test]
    fn parses_flags_and_config_path() {
        let options = parse_cli_args(&args(&["--offline", "--config", "a/b.toml", "--no-builtins"]))
            .expect("args should parse");
        assert!(options.offline);
        assert!(options.no_builtins);
        assert_eq!(options.config_path, Some(PathBuf::from("a/b.toml")));

        let options = parse_cli_args(&args(&["--config=c.json5"])).expect("args should parse");
        assert_eq!(options.config_path, Some(PathBuf::from("c.json5")));
    }

    #[test]
    fn rejects_unknown_and_incomplete_args() {
        assert!(parse_cli_args(&args(&["--bogus"])).is_err());
        assert!(parse_cli_args(&args(&["--config"])).is_err());
    }
}
