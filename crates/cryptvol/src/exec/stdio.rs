//! Output capture for child processes.

use std::fmt;
use std::io;

use tokio::io::{AsyncBufReadExt, AsyncRead, BufReader};

/// Which child stream a line came from.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum OutputStream {
    /// Standard output.
    Stdout,
    /// Standard error.
    Stderr,
}

impl OutputStream {
    fn echo(self, line: &str) {
        match self {
            Self::Stdout => println!("{line}"),
            Self::Stderr => eprintln!("{line}"),
        }
    }
}

impl fmt::Display for OutputStream {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Stdout => write!(f, "stdout"),
            Self::Stderr => write!(f, "stderr"),
        }
    }
}

/// Read `pipe` line by line until EOF, returning everything read.
///
/// Bytes that are not valid UTF-8 are replaced rather than treated as an
/// error, so the pipe is always drained and the child never sees a broken
/// pipe. Each line is logged at debug level and, when `echo` is set,
/// forwarded to the matching stream of this process.
pub(crate) async fn capture<R>(pipe: Option<R>, stream: OutputStream, echo: bool) -> io::Result<String>
where
    R: AsyncRead + Unpin,
{
    let Some(pipe) = pipe else {
        return Ok(String::new());
    };

    let mut reader = BufReader::new(pipe);
    let mut buf = Vec::new();
    let mut captured = String::new();

    loop {
        buf.clear();
        if reader.read_until(b'\n', &mut buf).await? == 0 {
            break;
        }
        while matches!(buf.last().copied(), Some(b'\n' | b'\r')) {
            buf.pop();
        }

        let line = String::from_utf8_lossy(&buf);
        tracing::debug!(%stream, "{line}");
        if echo {
            stream.echo(&line);
        }
        captured.push_str(&line);
        captured.push('\n');
    }

    Ok(captured)
}

/// Pick the most useful text for an error report: stderr, else stdout.
pub(crate) fn diagnostic(stdout: &str, stderr: &str) -> String {
    let stderr = stderr.trim();
    let stdout = stdout.trim();
    if !stderr.is_empty() {
        stderr.to_string()
    } else if !stdout.is_empty() {
        stdout.to_string()
    } else {
        "no additional output".to_string()
    }
}
