//! Pipeline driver binary (§4.5). The library crates return typed
//! `thiserror` errors; this binary is the one place that turns those into
//! an `anyhow::Error` for human-readable reporting, the same split used
//! by the rest of this codebase's tools. The actual wiring lives in
//! `pseudoc_driver` (this package's library target) so the §8 end-to-end
//! scenarios can exercise it as integration tests.

use clap::Parser;
use pseudoc_driver::{cli::Cli, pipeline, project};

fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();
    init_logging(&cli.log_level);

    pseudoc_arch::load(&cli.arch)?;
    let registry = pseudoc_passes::Registry::builtin();
    let config = pipeline::Config::from_cli(&cli);

    let dir_mode = cli.input.is_dir();
    let proj = project::project_dir(&cli.input, dir_mode);
    let funcdb_config = project::resolve_funcdb(cli.funcdb.as_deref(), &proj);

    pipeline::run(
        &cli.input,
        &registry,
        &config,
        cli.annotate_calls,
        funcdb_config,
        &proj,
    )?;

    Ok(())
}

/// Initialize `env_logger` from `--log-level`, honoring `RUST_LOG` first
/// when it's set (§6: "`RUST_LOG`, if set, takes precedence, matching
/// `env_logger` convention").
fn init_logging(default_level: &str) {
    let env = env_logger::Env::default().default_filter_or(default_level.to_string());
    env_logger::Builder::from_env(env).init();
}
