use std::fmt::Display;
use std::future::Future;

use futures_util::stream::{FuturesOrdered, FuturesUnordered};
use futures_util::{pin_mut, FutureExt, Stream, StreamExt};
use tracing::{debug, info, instrument, warn};

/// How producers are started and in which order their values are emitted.
#[derive(Debug, Copy, Clone, Eq, PartialEq)]
pub enum Schedule {
    /// Start everything at once, emit in arrival order.
    ParallelUnordered,
    /// Start everything at once, emit in input order.
    ParallelOrdered,
    /// Start each producer only after the previous one settled.
    Serial,
}

#[derive(Debug, Copy, Clone, Eq, PartialEq)]
pub enum ErrorPolicy {
    /// Skip the failed item and keep going.
    Ignore,
    /// Stop at the first failure and hand it back to the caller.
    FailFast,
}

#[derive(Debug, Copy, Clone, Eq, PartialEq)]
pub struct Strategy {
    pub schedule: Schedule,
    pub on_error: ErrorPolicy,
}

#[derive(Debug, Default, Copy, Clone, Eq, PartialEq)]
pub struct Summary {
    pub emitted: usize,
    pub ignored: usize,
}

impl Strategy {
    pub const fn new(schedule: Schedule, on_error: ErrorPolicy) -> Self {
        Self { schedule, on_error }
    }

    /// Run every producer according to this strategy, passing each successful
    /// value with its input position to `emit`.
    ///
    /// Returns once every started producer has settled. Under
    /// [`ErrorPolicy::FailFast`] the first failure is returned; a serial run
    /// starts nothing after it, while a parallel run still waits for the
    /// operations already in flight without emitting their values.
    #[instrument(skip(producers, emit), fields(count = producers.len()))]
    pub async fn run<P, Fut, T, E, F>(
        self,
        producers: Vec<P>,
        mut emit: F,
    ) -> Result<Summary, E>
    where
        P: FnOnce() -> Fut,
        Fut: Future<Output = Result<T, E>>,
        E: Display,
        F: FnMut(usize, T),
    {
        let mut summary = Summary::default();

        match self.schedule {
            Schedule::Serial => {
                for (index, producer) in producers.into_iter().enumerate() {
                    let result = producer().await;

                    self.settle(&mut summary, index, result, &mut emit)?;
                }
            }

            Schedule::ParallelOrdered => {
                let in_flight = producers
                    .into_iter()
                    .enumerate()
                    .map(|(index, producer)| producer().map(move |result| (index, result)))
                    .collect::<FuturesOrdered<_>>();

                self.drive(in_flight, &mut summary, &mut emit).await?;
            }

            Schedule::ParallelUnordered => {
                let in_flight = producers
                    .into_iter()
                    .enumerate()
                    .map(|(index, producer)| producer().map(move |result| (index, result)))
                    .collect::<FuturesUnordered<_>>();

                self.drive(in_flight, &mut summary, &mut emit).await?;
            }
        }

        info!(emitted = summary.emitted, ignored = summary.ignored, "sequence done");

        Ok(summary)
    }

    async fn drive<S, T, E, F>(
        self,
        in_flight: S,
        summary: &mut Summary,
        emit: &mut F,
    ) -> Result<(), E>
    where
        S: Stream<Item = (usize, Result<T, E>)>,
        E: Display,
        F: FnMut(usize, T),
    {
        pin_mut!(in_flight);

        while let Some((index, result)) = in_flight.next().await {
            if let Err(err) = self.settle(summary, index, result, emit) {
                while let Some((index, result)) = in_flight.next().await {
                    debug!(index, ok = result.is_ok(), "drop result settled after failure");
                }

                return Err(err);
            }
        }

        Ok(())
    }

    fn settle<T, E, F>(
        self,
        summary: &mut Summary,
        index: usize,
        result: Result<T, E>,
        emit: &mut F,
    ) -> Result<(), E>
    where
        E: Display,
        F: FnMut(usize, T),
    {
        match result {
            Ok(value) => {
                summary.emitted += 1;
                emit(index, value);

                Ok(())
            }

            Err(err) => match self.on_error {
                ErrorPolicy::Ignore => {
                    warn!(%err, index, "ignore failed item");

                    summary.ignored += 1;

                    Ok(())
                }

                ErrorPolicy::FailFast => {
                    warn!(%err, index, "abort sequence on failed item");

                    Err(err)
                }
            },
        }
    }
}
