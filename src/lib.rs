use std::io;

use clap::Parser;
use tracing::level_filters::LevelFilter;
use tracing::{debug, subscriber};
use tracing_log::LogTracer;
use tracing_subscriber::filter::Targets;
use tracing_subscriber::layer::SubscriberExt;
use tracing_subscriber::{fmt, Registry};

use crate::args::Args;
pub use crate::config::Config;
use crate::problem::Problem;
use crate::report::{Console, Reporter};

mod args;
mod config;
pub mod file;
pub mod problem;
pub mod report;
pub mod sequence;
mod util;

pub async fn run() -> anyhow::Result<()> {
    let args = Args::parse();

    init_log(args.debug)?;

    let mut config = Config::load(args.config.as_deref()).await?;
    if let Some(misnamed) = args.misnamed {
        config.misnamed_stanza = Some(misnamed);
    }
    config.validate()?;

    if args.init_fixtures {
        util::init_fixtures(&config.poem_dir, config.stanza_count).await?;
    }

    let mut console = Console::new(io::stdout());

    run_problems(&args.problems, &config, &mut console).await;

    Ok(())
}

/// Run the named problems in order. Names that are not a problem are skipped.
pub async fn run_problems(names: &[String], config: &Config, reporter: &mut dyn Reporter) {
    for name in names {
        match name.parse::<Problem>() {
            Err(err) => debug!(%err, "skip unknown problem"),
            Ok(problem) => problem.run(config, reporter).await,
        }
    }
}

fn init_log(debug: bool) -> anyhow::Result<()> {
    LogTracer::init()?;

    let layer = fmt::layer()
        .pretty()
        .with_target(true)
        .with_writer(io::stderr);

    let level = if debug {
        LevelFilter::DEBUG
    } else {
        LevelFilter::INFO
    };

    let targets = Targets::new()
        .with_target("tokio", LevelFilter::OFF)
        .with_default(LevelFilter::DEBUG);

    let layered = Registry::default().with(targets).with(layer).with(level);

    subscriber::set_global_default(layered)?;

    Ok(())
}
