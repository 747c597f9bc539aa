use std::panic::{self, AssertUnwindSafe};
use std::sync::Arc;
use std::sync::mpsc::{self, Receiver, RecvTimeoutError, Sender};
use std::thread::{self, JoinHandle};
use std::time::{Duration, Instant};

use super::{ConvertError, MarkdownConverter};
use crate::session::{PreviewCompletion, PreviewRequest};

/// Runs conversions on a dedicated thread.
///
/// Requests go in through [`submit`](Self::submit); completions come back in
/// the order they finish and are picked up with [`try_recv`](Self::try_recv).
/// When several requests are queued by the time the thread gets to them, only
/// the newest is converted.
pub struct PreviewWorker {
    requests: Option<Sender<PreviewRequest>>,
    completions: Receiver<PreviewCompletion>,
    handle: Option<JoinHandle<()>>,
}

impl PreviewWorker {
    /// Start the conversion thread.
    ///
    /// # Errors
    ///
    /// Returns an error if the OS refuses to spawn the thread.
    pub fn spawn(converter: Arc<dyn MarkdownConverter>) -> std::io::Result<Self> {
        let (request_tx, request_rx) = mpsc::channel::<PreviewRequest>();
        let (completion_tx, completion_rx) = mpsc::channel::<PreviewCompletion>();
        let handle = thread::Builder::new()
            .name("markpad-preview".to_string())
            .spawn(move || run(converter.as_ref(), &request_rx, &completion_tx))?;
        Ok(Self {
            requests: Some(request_tx),
            completions: completion_rx,
            handle: Some(handle),
        })
    }

    /// Queue a request without blocking.
    ///
    /// # Errors
    ///
    /// Returns [`ConvertError::WorkerGone`] if the conversion thread has exited.
    pub fn submit(&self, request: PreviewRequest) -> Result<(), ConvertError> {
        let Some(tx) = &self.requests else {
            return Err(ConvertError::WorkerGone);
        };
        tx.send(request).map_err(|_| ConvertError::WorkerGone)
    }

    /// Next finished conversion, if any.
    pub fn try_recv(&self) -> Option<PreviewCompletion> {
        self.completions.try_recv().ok()
    }

    /// Wait up to `timeout` for the next finished conversion.
    pub fn recv_timeout(&self, timeout: Duration) -> Option<PreviewCompletion> {
        match self.completions.recv_timeout(timeout) {
            Ok(completion) => Some(completion),
            Err(RecvTimeoutError::Timeout | RecvTimeoutError::Disconnected) => None,
        }
    }

    /// Every conversion that has finished so far.
    pub fn drain(&self) -> Vec<PreviewCompletion> {
        self.completions.try_iter().collect()
    }
}

impl Drop for PreviewWorker {
    fn drop(&mut self) {
        // Closing the request channel ends the thread's receive loop. A thread
        // still inside a conversion is detached; it exits once its send fails.
        self.requests = None;
        if let Some(handle) = self.handle.take() {
            if handle.is_finished() {
                let _ = handle.join();
            } else {
                tracing::debug!("preview worker busy on shutdown, detaching");
            }
        }
    }
}

impl std::fmt::Debug for PreviewWorker {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("PreviewWorker")
            .field("running", &self.handle.as_ref().is_some_and(|h| !h.is_finished()))
            .finish_non_exhaustive()
    }
}

fn run(
    converter: &dyn MarkdownConverter,
    requests: &Receiver<PreviewRequest>,
    completions: &Sender<PreviewCompletion>,
) {
    while let Ok(mut request) = requests.recv() {
        let mut superseded = 0_u32;
        while let Ok(newer) = requests.try_recv() {
            request = newer;
            superseded += 1;
        }

        let started = Instant::now();
        let result = panic::catch_unwind(AssertUnwindSafe(|| converter.convert(&request.source)))
            .unwrap_or_else(|payload| Err(ConvertError::Failed(panic_message(payload.as_ref()))));
        crate::perf::log_event(
            "preview.convert",
            format!(
                "seq={} bytes={} superseded={superseded} ok={} convert_ms={:.3}",
                request.seq,
                request.source.len(),
                result.is_ok(),
                started.elapsed().as_secs_f64() * 1000.0
            ),
        );

        if completions
            .send(PreviewCompletion::new(request.seq, result))
            .is_err()
        {
            break;
        }
    }
}

fn panic_message(payload: &(dyn std::any::Any + Send)) -> String {
    if let Some(msg) = payload.downcast_ref::<&str>() {
        (*msg).to_string()
    } else if let Some(msg) = payload.downcast_ref::<String>() {
        msg.clone()
    } else {
        "converter panicked".to_string()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::Mutex;

    const WAIT: Duration = Duration::from_secs(5);

    fn request(seq: u64, source: &str) -> PreviewRequest {
        PreviewRequest {
            seq,
            source: source.to_string(),
        }
    }

    #[test]
    fn test_worker_converts_submitted_request() {
        let worker = PreviewWorker::spawn(Arc::new(super::super::ComrakConverter::new())).unwrap();
        worker.submit(request(1, "**x**")).unwrap();
        let done = worker.recv_timeout(WAIT).expect("completion");
        assert_eq!(done.seq, 1);
        assert!(done.result.unwrap().contains("<strong>x</strong>"));
    }

    #[test]
    fn test_worker_reports_converter_errors() {
        let failing = |_: &str| -> Result<String, ConvertError> {
            Err(ConvertError::Failed("nope".to_string()))
        };
        let worker = PreviewWorker::spawn(Arc::new(failing)).unwrap();
        worker.submit(request(3, "x")).unwrap();
        let done = worker.recv_timeout(WAIT).expect("completion");
        assert_eq!(done.seq, 3);
        assert_eq!(done.result, Err(ConvertError::Failed("nope".to_string())));
    }

    #[test]
    fn test_worker_survives_panicking_converter() {
        let panicky = |source: &str| -> Result<String, ConvertError> {
            assert!(source != "boom", "converter exploded");
            Ok(source.to_string())
        };
        let worker = PreviewWorker::spawn(Arc::new(panicky)).unwrap();
        worker.submit(request(1, "boom")).unwrap();
        let first = worker.recv_timeout(WAIT).expect("completion");
        assert!(matches!(first.result, Err(ConvertError::Failed(ref m)) if m.contains("exploded")));

        worker.submit(request(2, "fine")).unwrap();
        let second = worker.recv_timeout(WAIT).expect("completion");
        assert_eq!(second.result, Ok("fine".to_string()));
    }

    #[test]
    fn test_worker_skips_superseded_queued_requests() {
        // Hold the converter on its first request until the rest are queued.
        let gate = Arc::new(Mutex::new(()));
        let held = gate.lock().unwrap();
        let (started_tx, started_rx) = mpsc::channel::<String>();
        let started_tx = Mutex::new(started_tx);
        let seen = Arc::new(Mutex::new(Vec::new()));
        let converter = {
            let gate = Arc::clone(&gate);
            let seen = Arc::clone(&seen);
            move |source: &str| -> Result<String, ConvertError> {
                let _ = started_tx.lock().unwrap().send(source.to_string());
                let _open = gate.lock().unwrap();
                seen.lock().unwrap().push(source.to_string());
                Ok(source.to_string())
            }
        };
        let worker = PreviewWorker::spawn(Arc::new(converter)).unwrap();
        worker.submit(request(1, "a")).unwrap();
        assert_eq!(started_rx.recv_timeout(WAIT).unwrap(), "a");
        worker.submit(request(2, "ab")).unwrap();
        worker.submit(request(3, "abc")).unwrap();
        drop(held);

        let first = worker.recv_timeout(WAIT).expect("first completion");
        let second = worker.recv_timeout(WAIT).expect("second completion");
        assert_eq!(first.seq, 1);
        assert_eq!(second.seq, 3);
        assert_eq!(*seen.lock().unwrap(), vec!["a".to_string(), "abc".to_string()]);
    }

    #[test]
    fn test_drop_joins_idle_thread() {
        let worker = PreviewWorker::spawn(Arc::new(super::super::ComrakConverter::new())).unwrap();
        worker.submit(request(1, "x")).unwrap();
        let _ = worker.recv_timeout(WAIT).expect("completion");
        drop(worker);
    }

    #[test]
    fn test_drop_does_not_wait_for_running_conversion() {
        let gate = Arc::new(Mutex::new(()));
        let held = gate.lock().unwrap();
        let (started_tx, started_rx) = mpsc::channel::<()>();
        let started_tx = Mutex::new(started_tx);
        let (finished_tx, finished_rx) = mpsc::channel::<()>();
        let finished_tx = Mutex::new(finished_tx);
        let converter = {
            let gate = Arc::clone(&gate);
            move |source: &str| -> Result<String, ConvertError> {
                let _ = started_tx.lock().unwrap().send(());
                let _open = gate.lock().unwrap();
                let _ = finished_tx.lock().unwrap().send(());
                Ok(source.to_string())
            }
        };
        let worker = PreviewWorker::spawn(Arc::new(converter)).unwrap();
        worker.submit(request(1, "slow")).unwrap();
        started_rx.recv_timeout(WAIT).unwrap();

        let started = Instant::now();
        drop(worker);
        assert!(started.elapsed() < Duration::from_millis(500));

        // The detached thread finishes its conversion and exits on its own.
        drop(held);
        finished_rx.recv_timeout(WAIT).unwrap();
    }
}
