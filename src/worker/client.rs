//! Async client for communicating with the store bridge process.

use std::collections::HashMap;
use std::path::{Path, PathBuf};
use std::sync::Arc;
use std::time::Duration;

use serde::{de::DeserializeOwned, Serialize};
use tokio::io::{AsyncBufReadExt, AsyncWriteExt, BufReader, BufWriter};
use tokio::process::{Child, ChildStdin, ChildStdout, Command};
use tokio::sync::{oneshot, Mutex};

use super::error::{WorkerError, WorkerResult};
use super::protocol::{codes, ErrorInfo, RequestEnvelope, ResponseEnvelope};
use crate::config::{expand_env_vars, WorkerSettings};

/// Default timeout for requests (30 seconds).
pub const DEFAULT_TIMEOUT_SECS: u64 = 30;

/// Binary name searched for when no path is configured.
const WORKER_BINARY: &str = "reportpage-store";

type PendingMap = Arc<Mutex<HashMap<String, oneshot::Sender<ResponseEnvelope>>>>;

/// Async client for the store bridge.
///
/// The client spawns the bridge as a child process and communicates via
/// NDJSON (newline-delimited JSON) over stdin/stdout. Each request has a
/// unique ID for correlation with its response.
pub struct WorkerClient {
    /// Writer for sending requests to worker stdin.
    stdin: Arc<Mutex<BufWriter<ChildStdin>>>,

    /// Map of pending request IDs to response channels.
    pending: PendingMap,

    /// Handle to the worker child process.
    _child: Child,

    /// Handle to the background reader task.
    reader_task: tokio::task::JoinHandle<()>,

    /// Request timeout duration.
    timeout: Duration,
}

impl WorkerClient {
    /// Spawn a bridge process with default timeout and no arguments.
    pub async fn spawn<P: AsRef<Path>>(worker_path: P) -> WorkerResult<Self> {
        Self::spawn_with(
            worker_path,
            &[],
            &HashMap::new(),
            Duration::from_secs(DEFAULT_TIMEOUT_SECS),
        )
        .await
    }

    /// Spawn a bridge process as configured.
    ///
    /// Arguments and environment values have `${VAR}` references expanded.
    pub async fn spawn_with_settings(settings: &WorkerSettings) -> WorkerResult<Self> {
        let worker_path = Self::resolve_worker_path(settings)?;
        let args = settings
            .args
            .iter()
            .map(|arg| expand_env_vars(arg))
            .collect::<Result<Vec<_>, _>>()
            .map_err(|e| WorkerError::InvalidRequest(e.to_string()))?;
        let env = settings
            .env
            .iter()
            .map(|(k, v)| expand_env_vars(v).map(|v| (k.clone(), v)))
            .collect::<Result<HashMap<_, _>, _>>()
            .map_err(|e| WorkerError::InvalidRequest(e.to_string()))?;

        Self::spawn_with(
            &worker_path,
            &args,
            &env,
            Duration::from_secs(settings.timeout_secs),
        )
        .await
    }

    /// Resolve the bridge binary path from settings.
    fn resolve_worker_path(settings: &WorkerSettings) -> WorkerResult<PathBuf> {
        if let Some(path) = &settings.path {
            let expanded = expand_env_vars(path)
                .map_err(|e| WorkerError::InvalidRequest(e.to_string()))?;
            return Ok(PathBuf::from(expanded));
        }

        let candidates = [
            format!("./{}", WORKER_BINARY),
            format!("./bin/{}", WORKER_BINARY),
        ];
        for candidate in candidates {
            let path = PathBuf::from(candidate);
            if path.exists() {
                return Ok(path);
            }
        }

        // Fall back to PATH lookup at spawn time
        Ok(PathBuf::from(WORKER_BINARY))
    }

    /// Spawn a bridge process with arguments, environment and timeout.
    pub async fn spawn_with<P: AsRef<Path>>(
        worker_path: P,
        args: &[String],
        env: &HashMap<String, String>,
        timeout: Duration,
    ) -> WorkerResult<Self> {
        let mut child = Command::new(worker_path.as_ref())
            .args(args)
            .envs(env)
            .stdin(std::process::Stdio::piped())
            .stdout(std::process::Stdio::piped())
            .stderr(std::process::Stdio::inherit())
            .kill_on_drop(true)
            .spawn()
            .map_err(WorkerError::SpawnFailed)?;

        let (Some(stdin), Some(stdout)) = (child.stdin.take(), child.stdout.take()) else {
            return Err(WorkerError::SpawnFailed(std::io::Error::new(
                std::io::ErrorKind::BrokenPipe,
                "worker stdio not captured",
            )));
        };

        let stdin = Arc::new(Mutex::new(BufWriter::new(stdin)));
        let pending: PendingMap = Arc::new(Mutex::new(HashMap::new()));

        let reader_task = Self::spawn_reader_task(stdout, pending.clone());

        tracing::debug!(path = %worker_path.as_ref().display(), "store worker spawned");

        Ok(Self {
            stdin,
            pending,
            _child: child,
            reader_task,
            timeout,
        })
    }

    /// Spawn the background task that reads responses from the worker.
    fn spawn_reader_task(stdout: ChildStdout, pending: PendingMap) -> tokio::task::JoinHandle<()> {
        tokio::spawn(async move {
            let mut reader = BufReader::new(stdout);
            let mut line = String::new();

            loop {
                line.clear();
                match reader.read_line(&mut line).await {
                    Ok(0) => break,
                    Ok(_) => match serde_json::from_str::<ResponseEnvelope>(&line) {
                        Ok(resp) => {
                            let mut pending = pending.lock().await;
                            if let Some(tx) = pending.remove(&resp.id) {
                                let _ = tx.send(resp);
                            }
                        }
                        Err(e) => {
                            tracing::warn!(error = %e, "worker: failed to parse response");
                        }
                    },
                    Err(e) => {
                        tracing::error!(error = %e, "worker: read error");
                        break;
                    }
                }
            }

            // Worker exited - fail every request still waiting
            let mut pending = pending.lock().await;
            for (id, tx) in pending.drain() {
                let error_response = ResponseEnvelope {
                    id,
                    success: false,
                    result: None,
                    error: Some(ErrorInfo {
                        code: codes::WORKER_EXITED.to_string(),
                        message: "Worker process exited unexpectedly".to_string(),
                    }),
                };
                let _ = tx.send(error_response);
            }
        })
    }

    /// Send a request to the worker and wait for a response.
    ///
    /// # Errors
    ///
    /// Returns [`WorkerError::WorkerExited`] without writing anything if the
    /// worker has already exited. Otherwise returns an error if serialization
    /// fails, writing to the worker fails,
    /// the request times out, the worker returns an error response, or the
    /// response cannot be deserialized into `R`.
    pub async fn request<P, R>(&self, method: &str, params: P) -> WorkerResult<R>
    where
        P: Serialize,
        R: DeserializeOwned,
    {
        if !self.is_alive() {
            return Err(WorkerError::WorkerExited);
        }

        let id = uuid::Uuid::new_v4().to_string();

        let request = RequestEnvelope {
            id: id.clone(),
            method: method.to_string(),
            params: serde_json::to_value(params).map_err(WorkerError::SerializeFailed)?,
        };

        let (tx, rx) = oneshot::channel();
        {
            let mut pending = self.pending.lock().await;
            pending.insert(id.clone(), tx);
        }

        {
            let mut stdin = self.stdin.lock().await;
            let line =
                serde_json::to_string(&request).map_err(WorkerError::SerializeFailed)? + "\n";
            stdin
                .write_all(line.as_bytes())
                .await
                .map_err(WorkerError::WriteFailed)?;
            stdin.flush().await.map_err(WorkerError::WriteFailed)?;
        }

        let response = match tokio::time::timeout(self.timeout, rx).await {
            Ok(received) => received?,
            Err(_) => {
                // Drop the pending entry so a late response is discarded
                let mut pending = self.pending.lock().await;
                pending.remove(&id);
                return Err(WorkerError::Timeout(self.timeout.as_secs()));
            }
        };

        Self::into_result(response)
    }

    /// Turn a response envelope into the typed result or a classified error.
    fn into_result<R: DeserializeOwned>(response: ResponseEnvelope) -> WorkerResult<R> {
        if response.success {
            let result = response.result.unwrap_or(serde_json::Value::Null);
            serde_json::from_value(result).map_err(WorkerError::DeserializeFailed)
        } else {
            let error = response.error.unwrap_or_else(|| ErrorInfo {
                code: "UNKNOWN".to_string(),
                message: "Unknown error".to_string(),
            });
            Err(Self::classify_error(&error.code, &error.message))
        }
    }

    /// Classify a worker error into a more specific error type.
    fn classify_error(code: &str, message: &str) -> WorkerError {
        match code {
            codes::REPORT_NOT_FOUND => WorkerError::ReportNotFound(message.to_string()),
            codes::PAGE_OUT_OF_RANGE => WorkerError::PageOutOfRange(message.to_string()),
            codes::INVALID_REQUEST => WorkerError::InvalidRequest(message.to_string()),
            codes::METHOD_NOT_FOUND => WorkerError::MethodNotFound(message.to_string()),
            codes::WORKER_EXITED => WorkerError::WorkerExited,
            _ => WorkerError::remote(code, message),
        }
    }

    /// Whether the worker still appears to be running.
    pub fn is_alive(&self) -> bool {
        !self.reader_task.is_finished()
    }
}
