//! Batch entry point.
//!
//! # Responsibility
//! - Resolve configuration (optional TOML file from `SPACEMIX_CONFIG`, then
//!   environment overrides) and logging settings.
//! - Open the configured warehouse backend, run the pipeline once and chart
//!   to stdout.

use log::error;
use spacemix_core::{
    init_logging, Backend, ConnectionParams, LogSettings, Pipeline, PipelineConfig,
    PostgresRowSource, RowSource, SourceResult, SqliteRowSource, TextChartRenderer,
};
use std::io::Write;
use std::path::PathBuf;
use std::process::ExitCode;

const ENV_CONFIG: &str = "SPACEMIX_CONFIG";

fn main() -> ExitCode {
    if let Err(err) = init_logging(&LogSettings::from_env()) {
        // Logging is optional for a batch run; keep going with stderr only.
        eprintln!("warning: logging disabled: {err}");
    }

    match run() {
        Ok(()) => ExitCode::SUCCESS,
        Err(message) => {
            error!("event=cli_exit module=cli status=error error={message}");
            eprintln!("error: {message}");
            ExitCode::FAILURE
        }
    }
}

fn run() -> Result<(), String> {
    let config_path = std::env::var_os(ENV_CONFIG).map(PathBuf::from);
    let config = PipelineConfig::resolve(config_path.as_deref()).map_err(|err| err.to_string())?;
    let source = open_source(&config.connection).map_err(|err| err.to_string())?;

    let mut out = std::io::stdout();
    let mut renderer = TextChartRenderer::new(std::io::stdout());
    Pipeline::new(config)
        .run(source.as_ref(), &mut out, &mut renderer)
        .map_err(|err| err.to_string())?;
    out.flush().map_err(|err| err.to_string())
}

fn open_source(params: &ConnectionParams) -> SourceResult<Box<dyn RowSource>> {
    let source: Box<dyn RowSource> = match params.backend {
        Backend::Postgres => Box::new(PostgresRowSource::connect(params)?),
        Backend::Sqlite => Box::new(SqliteRowSource::open(params)?),
    };
    Ok(source)
}
