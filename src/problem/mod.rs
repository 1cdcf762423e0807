use std::fmt::{self, Display, Formatter};
use std::io;
use std::path::PathBuf;
use std::str::FromStr;

use futures_channel::mpsc;
use futures_util::StreamExt;
use tracing::{info, instrument, warn};

use crate::config::Config;
use crate::file::{promisified_read_file, promisified_write_file, read_file};
use crate::report::Reporter;
use crate::sequence::{ErrorPolicy, Schedule, Strategy};
use crate::util::{misname_stanza, stanza_paths};

/// One runnable demonstration, selected by its letter.
#[derive(Debug, Copy, Clone, Eq, PartialEq, Hash)]
pub enum Problem {
    /// First two stanzas read in parallel, logged in any order.
    A,
    /// Every stanza read in parallel, logged in stanza order.
    B,
    /// Every stanza read one after another.
    C,
    /// Every stanza read one after another, stopping at the first failure.
    D,
    /// Write a file through the promise shaped writer, then read it back.
    E,
}

#[derive(Debug, Clone, Eq, PartialEq)]
pub struct UnknownProblem(pub String);

impl Display for UnknownProblem {
    fn fmt(&self, f: &mut Formatter<'_>) -> fmt::Result {
        write!(f, "unknown problem {:?}", self.0)
    }
}

impl std::error::Error for UnknownProblem {}

impl FromStr for Problem {
    type Err = UnknownProblem;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_ascii_uppercase().as_str() {
            "A" => Ok(Problem::A),
            "B" => Ok(Problem::B),
            "C" => Ok(Problem::C),
            "D" => Ok(Problem::D),
            "E" => Ok(Problem::E),
            _ => Err(UnknownProblem(s.to_string())),
        }
    }
}

impl Display for Problem {
    fn fmt(&self, f: &mut Formatter<'_>) -> fmt::Result {
        let letter = match self {
            Problem::A => "A",
            Problem::B => "B",
            Problem::C => "C",
            Problem::D => "D",
            Problem::E => "E",
        };

        f.write_str(letter)
    }
}

impl Problem {
    pub fn label(self) -> &'static str {
        match self {
            Problem::A => "callback version",
            Problem::B | Problem::C | Problem::D => "promise version",
            Problem::E => "promisified write",
        }
    }

    #[instrument(skip(config, reporter))]
    pub async fn run(self, config: &Config, reporter: &mut dyn Reporter) {
        match self {
            Problem::A => self.read_stanzas_callback(config, reporter).await,

            Problem::B => {
                let strategy = Strategy::new(Schedule::ParallelOrdered, ErrorPolicy::Ignore);
                let paths = stanza_paths(&config.poem_dir, config.stanza_count);

                self.read_stanzas(strategy, paths, reporter).await
            }

            Problem::C => {
                let strategy = Strategy::new(Schedule::Serial, ErrorPolicy::Ignore);
                let paths = stanza_paths(&config.poem_dir, config.stanza_count);

                self.read_stanzas(strategy, paths, reporter).await
            }

            Problem::D => {
                let strategy = Strategy::new(Schedule::Serial, ErrorPolicy::FailFast);
                let paths = misname_stanza(
                    &config.poem_dir,
                    stanza_paths(&config.poem_dir, config.stanza_count),
                    config.misnamed_stanza,
                );

                self.read_stanzas(strategy, paths, reporter).await
            }

            Problem::E => self.write_then_read(config, reporter).await,
        }

        reporter.done(self);

        info!(problem = %self, "problem done");
    }

    /// Every read reports back through its own callback; the run is done once
    /// each callback has fired.
    async fn read_stanzas_callback(self, config: &Config, reporter: &mut dyn Reporter) {
        let paths = stanza_paths(&config.poem_dir, config.stanza_count.min(2));
        let (sender, mut receiver) = mpsc::unbounded();

        for path in paths {
            let sender = sender.clone();

            read_file(
                path.clone(),
                Box::new(move |result| {
                    let _ = sender.unbounded_send((path, result));
                }),
            );
        }

        // the channel closes after the last callback drops its sender
        drop(sender);

        while let Some((path, result)) = receiver.next().await {
            match result {
                Ok(stanza) => reporter.content(self, &stanza),
                Err(err) => warn!(%err, ?path, "ignore failed stanza read"),
            }
        }
    }

    async fn read_stanzas(
        self,
        strategy: Strategy,
        paths: Vec<PathBuf>,
        reporter: &mut dyn Reporter,
    ) {
        let producers = paths
            .into_iter()
            .map(|path| move || promisified_read_file(path))
            .collect::<Vec<_>>();

        let result: io::Result<_> = strategy
            .run(producers, |_, stanza: String| reporter.content(self, &stanza))
            .await;

        if let Err(err) = result {
            reporter.failure(self, &err);
        }
    }

    async fn write_then_read(self, config: &Config, reporter: &mut dyn Reporter) {
        let result = async {
            let path =
                promisified_write_file(&config.write_path, config.write_content.as_str()).await?;

            promisified_read_file(path).await
        }
        .await;

        match result {
            Ok(content) => reporter.content(self, &content),
            Err(err) => reporter.failure(self, &err),
        }
    }
}
