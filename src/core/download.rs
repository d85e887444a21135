//! Single-file downloads through an external `curl` process.
//!
//! The downloader owns one request at a time. It builds the command line,
//! streams curl's meter into an optional [`ProgressSink`], supervises the
//! process against interruption and turns the outcome into a typed error.

use crate::core::config::Config;
use crate::core::diagnostics::{extract_error_code, extract_error_message};
use crate::core::interrupt::InterruptGuard;
use crate::core::progress::parse_progress_line;
use crate::core::sink::{InfoOptions, ProgressSink};
use crate::core::stream::{spawn_line_reader, LINE_CHANNEL_CAPACITY};
use crate::error::{FetchError, Result};
use std::ffi::OsString;
use std::path::{Path, PathBuf};
use std::process::{ExitStatus, Stdio};
use tokio::process::{Child, Command};
use tokio::sync::mpsc;
use tokio::task::JoinHandle;
use tokio_util::sync::CancellationToken;
use tracing::{debug, warn};

pub type BoxedSink = Box<dyn ProgressSink + Send>;

pub struct DownloadRequest {
    /// Passed to curl untouched; any URL curl understands works.
    pub source: String,
    pub destination: PathBuf,
    pub progress_sink: Option<BoxedSink>,
}

impl DownloadRequest {
    pub fn new(source: impl Into<String>, destination: impl Into<PathBuf>) -> Self {
        Self {
            source: source.into(),
            destination: destination.into(),
            progress_sink: None,
        }
    }
}

/// What one run of the tool produced.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ExecutionResult {
    /// `None` when the process was ended by a signal.
    pub exit_code: Option<i32>,
    pub stdout: String,
    pub stderr: String,
}

pub struct Downloader {
    request: DownloadRequest,
    config: Config,
    cancel: Option<CancellationToken>,
}

impl Downloader {
    pub fn new(source: impl Into<String>, destination: impl Into<PathBuf>) -> Self {
        Self::from_request(DownloadRequest::new(source, destination))
    }

    pub fn from_request(request: DownloadRequest) -> Self {
        Self {
            request,
            config: Config::default(),
            cancel: None,
        }
    }

    pub fn with_config(mut self, config: Config) -> Self {
        self.config = config;
        self
    }

    pub fn with_progress<S>(mut self, sink: S) -> Self
    where
        S: ProgressSink + Send + 'static,
    {
        self.request.progress_sink = Some(Box::new(sink));
        self
    }

    /// Treat cancellation of `token` exactly like Ctrl+C.
    pub fn with_cancellation(mut self, token: CancellationToken) -> Self {
        self.cancel = Some(token);
        self
    }

    pub fn source(&self) -> &str {
        &self.request.source
    }

    pub fn destination(&self) -> &Path {
        &self.request.destination
    }

    /// Arguments handed to curl. The source is always last.
    pub fn build_args(&self) -> Vec<OsString> {
        let mut args: Vec<OsString> = self.config.extra_args.iter().map(OsString::from).collect();

        if self.config.follow_redirects {
            args.push("--location".into());
        }
        if self.request.progress_sink.is_none() {
            // No meter, but failures are still reported on stderr.
            args.push("--silent".into());
            args.push("--show-error".into());
        }

        args.push("--fail".into());
        args.push("--output".into());
        args.push(self.request.destination.clone().into_os_string());
        args.push(OsString::from(&self.request.source));
        args
    }

    /// Run the transfer once.
    ///
    /// The destination is only meaningful on `Ok`; partial output left by a
    /// failed or interrupted transfer is not removed.
    pub async fn download(&mut self) -> Result<()> {
        if self.request.source.trim().is_empty() {
            return Err(FetchError::InvalidRequest {
                message: "source must not be empty".to_string(),
            });
        }

        let guard = InterruptGuard::acquire(self.cancel.as_ref());
        let outcome = self.execute(guard.token()).await;
        let interrupted = guard.is_interrupted();
        drop(guard);

        // Nothing was drawn if curl never started.
        let spawned = !matches!(outcome, Err(FetchError::Spawn { .. }));
        if let (true, Some(sink)) = (spawned, self.request.progress_sink.as_mut()) {
            sink.clear_line();
        }

        let result = match outcome {
            Ok(result) => result,
            Err(e) if !interrupted => return Err(e),
            Err(_) => ExecutionResult::default(),
        };
        if interrupted {
            warn!("Download of {} interrupted", self.request.source);
        }

        classify(interrupted, &result)
    }

    async fn execute(&mut self, interrupt: &CancellationToken) -> Result<ExecutionResult> {
        let program = self.config.curl_path.clone();
        let args = self.build_args();
        debug!(program = %program, args = ?args, "Spawning transfer tool");

        let mut child = Command::new(&program)
            .args(&args)
            .stdin(Stdio::null())
            .stdout(Stdio::piped())
            .stderr(Stdio::piped())
            .kill_on_drop(true)
            .spawn()
            .map_err(|source| FetchError::Spawn {
                program: program.clone(),
                source,
            })?;

        let stdout = child
            .stdout
            .take()
            .ok_or_else(|| std::io::Error::other("missing stdout pipe"))?;
        let stderr = child
            .stderr
            .take()
            .ok_or_else(|| std::io::Error::other("missing stderr pipe"))?;

        let (line_tx, line_rx) = if self.request.progress_sink.is_some() {
            let (tx, rx) = mpsc::channel(LINE_CHANNEL_CAPACITY);
            (Some(tx), Some(rx))
        } else {
            (None, None)
        };

        let stdout_task = spawn_line_reader(stdout, None);
        let stderr_task = spawn_line_reader(stderr, line_tx);

        let status = supervise(
            &mut child,
            line_rx,
            self.request.progress_sink.as_mut(),
            interrupt,
            self.config.kill_on_interrupt,
        )
        .await?;

        if interrupt.is_cancelled() {
            // Output is irrelevant once interrupted, and a killed tool may
            // have left the pipes open through a child of its own.
            stdout_task.abort();
            stderr_task.abort();
            return Ok(ExecutionResult {
                exit_code: status.code(),
                ..ExecutionResult::default()
            });
        }

        Ok(ExecutionResult {
            exit_code: status.code(),
            stdout: join_reader(stdout_task).await?,
            stderr: join_reader(stderr_task).await?,
        })
    }
}

/// Map a finished run to the caller-facing outcome.
///
/// An interrupt wins over whatever the process reported.
pub fn classify(interrupted: bool, result: &ExecutionResult) -> Result<()> {
    if interrupted {
        return Err(FetchError::Interrupted);
    }
    if result.exit_code == Some(0) {
        return Ok(());
    }

    let message = extract_error_message(&result.stderr);
    debug!(
        exit_code = ?result.exit_code,
        curl_code = ?extract_error_code(&result.stderr),
        message = %message,
        "Transfer tool failed"
    );
    Err(FetchError::downloader(message))
}

/// Wait for the child to exit while forwarding progress lines.
///
/// Returns once the process has exited and, unless interrupted, every
/// diagnostic line has been delivered.
async fn supervise(
    child: &mut Child,
    mut lines: Option<mpsc::Receiver<String>>,
    mut sink: Option<&mut BoxedSink>,
    interrupt: &CancellationToken,
    kill_on_interrupt: bool,
) -> Result<ExitStatus> {
    let mut status: Option<ExitStatus> = None;
    let mut interrupted = false;

    loop {
        if let Some(status) = status {
            if lines.is_none() || interrupted {
                return Ok(status);
            }
        }

        tokio::select! {
            () = interrupt.cancelled(), if !interrupted => {
                interrupted = true;
                if kill_on_interrupt && status.is_none() {
                    debug!("Killing transfer tool after interrupt");
                    if let Err(e) = child.start_kill() {
                        debug!("Transfer tool already gone: {e}");
                    }
                }
            }
            line = next_line(&mut lines), if lines.is_some() => match line {
                Some(line) => {
                    let update = parse_progress_line(&line);
                    if let (Some(update), Some(sink)) = (update, sink.as_deref_mut()) {
                        sink.clear_line();
                        sink.info(&update.status_line(), InfoOptions { new_line: false });
                    }
                }
                None => lines = None,
            },
            exit = child.wait(), if status.is_none() => {
                let exit = exit?;
                debug!(status = %exit, "Transfer tool exited");
                status = Some(exit);
            }
        }
    }
}

async fn next_line(lines: &mut Option<mpsc::Receiver<String>>) -> Option<String> {
    match lines {
        Some(rx) => rx.recv().await,
        None => None,
    }
}

async fn join_reader(task: JoinHandle<std::io::Result<String>>) -> Result<String> {
    let text = task.await.map_err(std::io::Error::other)??;
    Ok(text)
}
