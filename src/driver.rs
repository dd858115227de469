//! Driver for the hbmgen command line.
use crate::cmdline::Opts;
use hbmgen_backend::BackendOpt;
use hbmgen_utils::GenResult;
use std::io::Write;

/// Run the generator selected on the command line.
pub fn run_generator() -> GenResult<()> {
    let opts = Opts::get_opts();

    env_logger::Builder::new()
        .format_timestamp(None)
        .filter_level(opts.log_level)
        .target(env_logger::Target::Stderr)
        .init();

    run(&opts)
}

/// Everything after argument parsing and logger setup.
pub fn run(opts: &Opts) -> GenResult<()> {
    // list all the available generators when --list is given
    if opts.list {
        let mut out = opts.output.get_write()?;
        for backend in BackendOpt::all() {
            writeln!(out, "- {backend}")?;
        }
        out.flush()?;
        return Ok(());
    }

    let conf = opts.config()?;

    if opts.dump_config {
        let mut out = opts.output.get_write()?;
        serde_json::to_writer_pretty(&mut out, &conf)?;
        writeln!(out)?;
        out.flush()?;
        return Ok(());
    }

    log::info!("running {} into {}", opts.backend, opts.output);
    opts.run_backend(&conf)
}
