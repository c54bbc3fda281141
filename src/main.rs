use anyhow::Result;
use clap::Parser;
use graywatch::{
    daemon::{args::DaemonArgs, start_daemon},
    utils::{
        dir::create_application_default_path,
        logging::{enable_logging, DAEMON_PREFIX},
        runtime::single_thread_runtime,
    },
};

fn main() -> Result<()> {
    let args = DaemonArgs::parse();

    let app_dir = args
        .dir
        .clone()
        .map_or_else(create_application_default_path, Ok)?;
    enable_logging(DAEMON_PREFIX, &app_dir, args.log, args.log_console)?;

    single_thread_runtime()?.block_on(async move { start_daemon(app_dir, args).await })
}
