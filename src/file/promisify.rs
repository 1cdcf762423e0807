use std::future::Future;
use std::io::{self, Error, ErrorKind};
use std::pin::Pin;
use std::task::{ready, Context, Poll};

use futures_channel::oneshot::{self, Receiver};
use futures_util::FutureExt;

/// Completion notification for a callback style operation, called exactly once.
pub type Callback<T> = Box<dyn FnOnce(io::Result<T>) + Send + 'static>;

/// Turn a callback style operation into a [`Promise`].
///
/// `op` is invoked immediately with a callback that settles the returned
/// promise, so the operation is already running before the promise is polled.
pub fn promisify<T, Op>(op: Op) -> Promise<T>
where
    T: Send + 'static,
    Op: FnOnce(Callback<T>),
{
    let (sender, receiver) = oneshot::channel();

    op(Box::new(move |result| {
        let _ = sender.send(result);
    }));

    Promise { receiver }
}

/// Single resolution value produced by [`promisify`].
#[derive(Debug)]
#[must_use = "a promise does nothing to its result unless awaited"]
pub struct Promise<T> {
    receiver: Receiver<io::Result<T>>,
}

impl<T> Future for Promise<T> {
    type Output = io::Result<T>;

    fn poll(mut self: Pin<&mut Self>, cx: &mut Context<'_>) -> Poll<Self::Output> {
        match ready!(self.receiver.poll_unpin(cx)) {
            Ok(result) => Poll::Ready(result),
            Err(_) => Poll::Ready(Err(Error::new(
                ErrorKind::BrokenPipe,
                "operation dropped its callback without settling",
            ))),
        }
    }
}
