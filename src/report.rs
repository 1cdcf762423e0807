use std::io::{self, Stdout, Write};

use crate::problem::Problem;

const BLUE: &str = "\x1b[34m";
const MAGENTA: &str = "\x1b[35m";
const RESET: &str = "\x1b[0m";

/// Where problems send what they read, what went wrong and when they finished.
pub trait Reporter {
    fn content(&mut self, problem: Problem, content: &str);

    fn failure(&mut self, problem: Problem, err: &io::Error);

    fn done(&mut self, problem: Problem);
}

/// Prints content in blue and failures in magenta.
///
/// Write errors such as a closed pipe are ignored.
#[derive(Debug)]
pub struct Console<W = Stdout> {
    out: W,
}

impl<W: Write> Console<W> {
    pub fn new(out: W) -> Self {
        Self { out }
    }
}

impl<W: Write> Reporter for Console<W> {
    fn content(&mut self, problem: Problem, content: &str) {
        let _ = writeln!(self.out, "-- {problem}. {} --", problem.label());
        let _ = writeln!(self.out, "{BLUE}{content}{RESET}");
    }

    fn failure(&mut self, problem: Problem, err: &io::Error) {
        let _ = writeln!(self.out, "-- {problem}. {} failed --", problem.label());
        let _ = writeln!(self.out, "{MAGENTA}{err}{RESET}");
    }

    fn done(&mut self, problem: Problem) {
        let _ = writeln!(self.out, "-- {problem}. {} done --", problem.label());
    }
}

#[cfg(test)]
pub use recorder::{Event, Recorder};


#[cfg(test)]
mod tests {
    use std::io::{Error, ErrorKind};

    use super::*;

    /// A writer whose reader went away, like stdout piped into `head`.
    struct ClosedPipe;

    impl Write for ClosedPipe {
        fn write(&mut self, _buf: &[u8]) -> io::Result<usize> {
            Err(Error::new(ErrorKind::BrokenPipe, "broken pipe"))
        }

        fn flush(&mut self) -> io::Result<()> {
            Err(Error::new(ErrorKind::BrokenPipe, "broken pipe"))
        }
    }

    #[test]
    fn test_console_output() {
        let mut console = Console::new(Vec::new());

        console.content(Problem::B, "stanza 1");
        console.failure(Problem::D, &Error::new(ErrorKind::NotFound, "no such file"));
        console.done(Problem::D);

        let output = String::from_utf8(console.out).unwrap();
        assert_eq!(
            output,
            "-- B. promise version --\n\x1b[34mstanza 1\x1b[0m\n\
             -- D. promise version failed --\n\x1b[35mno such file\x1b[0m\n\
             -- D. promise version done --\n"
        );
    }

    #[test]
    fn test_console_ignores_closed_pipe() {
        let mut console = Console::new(ClosedPipe);

        console.content(Problem::B, "stanza 1");
        console.failure(Problem::D, &Error::new(ErrorKind::NotFound, "no such file"));
        console.done(Problem::D);
    }
}
