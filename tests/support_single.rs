use std::ffi::OsStr;
use std::io::{BufRead, BufReader, Write};
use std::net::{SocketAddr, TcpListener, TcpStream};
use std::process::{Command, Output};
use std::sync::Arc;
use std::sync::atomic::{AtomicBool, AtomicU64, Ordering};
use std::thread;
use std::time::Duration;

/// How the stub target answers every request.
#[derive(Debug, Clone, Copy)]
pub struct StubReply {
    pub status: u16,
    pub delay: Duration,
}

impl StubReply {
    #[must_use]
    pub const fn ok() -> Self {
        Self {
            status: 200,
            delay: Duration::ZERO,
        }
    }

    #[must_use]
    pub const fn status(status: u16) -> Self {
        Self {
            status,
            delay: Duration::ZERO,
        }
    }

    #[must_use]
    pub const fn delayed(delay: Duration) -> Self {
        Self { status: 200, delay }
    }
}

/// A blocking HTTP target on an ephemeral port. Dropping it stops the accept
/// loop.
pub struct StubTarget {
    addr: SocketAddr,
    stop: Arc<AtomicBool>,
    served: Arc<AtomicU64>,
    accept: Option<thread::JoinHandle<()>>,
}

impl StubTarget {
    /// Binds `127.0.0.1:0` and answers each request with `reply`.
    ///
    /// # Errors
    ///
    /// Returns an error if the listener cannot be bound.
    pub fn start(reply: StubReply) -> Result<Self, String> {
        let listener =
            TcpListener::bind("127.0.0.1:0").map_err(|err| format!("bind failed: {}", err))?;
        let addr = listener
            .local_addr()
            .map_err(|err| format!("local_addr failed: {}", err))?;
        let stop = Arc::new(AtomicBool::new(false));
        let served = Arc::new(AtomicU64::new(0));

        let accept = thread::spawn({
            let stop = Arc::clone(&stop);
            let served = Arc::clone(&served);
            move || {
                for stream in listener.incoming() {
                    if stop.load(Ordering::SeqCst) {
                        break;
                    }
                    let Ok(stream) = stream else { continue };
                    let served = Arc::clone(&served);
                    thread::spawn(move || serve(stream, reply, &served));
                }
            }
        });

        Ok(Self {
            addr,
            stop,
            served,
            accept: Some(accept),
        })
    }

    #[must_use]
    pub fn url(&self) -> String {
        format!("http://{}/", self.addr)
    }

    /// Requests answered so far.
    #[must_use]
    pub fn served(&self) -> u64 {
        self.served.load(Ordering::SeqCst)
    }
}

impl Drop for StubTarget {
    fn drop(&mut self) {
        self.stop.store(true, Ordering::SeqCst);
        // Wake the blocking accept so it sees the flag.
        drop(TcpStream::connect(self.addr));
        if let Some(accept) = self.accept.take() {
            drop(accept.join());
        }
    }
}

/// Answers every request on a keep-alive connection until the client closes
/// it. Request bodies are not expected.
fn serve(stream: TcpStream, reply: StubReply, served: &AtomicU64) {
    let Ok(write_half) = stream.try_clone() else {
        return;
    };
    let mut reader = BufReader::new(stream);
    let mut writer = write_half;
    let response = format!(
        "HTTP/1.1 {} Stub\r\ncontent-length: 0\r\n\r\n",
        reply.status
    );

    loop {
        let mut line = String::new();
        let mut head_complete = false;
        while reader.read_line(&mut line).is_ok_and(|read| read > 0) {
            if line == "\r\n" {
                head_complete = true;
                break;
            }
            line.clear();
        }
        if !head_complete {
            return;
        }

        if !reply.delay.is_zero() {
            thread::sleep(reply.delay);
        }
        if writer.write_all(response.as_bytes()).is_err() || writer.flush().is_err() {
            return;
        }
        served.fetch_add(1, Ordering::SeqCst);
    }
}

/// Runs the `pacer` binary with `args`, logging only errors.
///
/// # Errors
///
/// Returns an error if the binary is unavailable or cannot be started.
pub fn run_pacer<I, S>(args: I) -> Result<Output, String>
where
    I: IntoIterator<Item = S>,
    S: AsRef<OsStr>,
{
    let bin = option_env!("CARGO_BIN_EXE_pacer")
        .ok_or_else(|| "CARGO_BIN_EXE_pacer missing at compile time.".to_owned())?;
    Command::new(bin)
        .args(args)
        .env("PACER_LOG", "error")
        .output()
        .map_err(|err| format!("run pacer failed: {}", err))
}

/// Stdout of a successful run, or both streams on failure.
///
/// # Errors
///
/// Returns an error when the process exited unsuccessfully.
pub fn stdout_of(output: &Output) -> Result<String, String> {
    let stdout = String::from_utf8_lossy(&output.stdout).into_owned();
    if output.status.success() {
        Ok(stdout)
    } else {
        Err(format!(
            "pacer failed ({})\nstdout: {}\nstderr: {}",
            output.status,
            stdout,
            String::from_utf8_lossy(&output.stderr)
        ))
    }
}
