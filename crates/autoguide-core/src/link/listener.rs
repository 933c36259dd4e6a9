use std::io::{BufRead, BufReader, ErrorKind, Read};
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::mpsc;
use std::sync::Arc;
use std::thread::JoinHandle;

use tracing::{debug, warn};

use crate::protocol::{parse_telemetry_line, TelemetryRecord};

/// Background reader turning inbound lines into [`TelemetryRecord`]s.
///
/// Records go to a single consumer (the display side); the listener never
/// touches guiding state.
pub struct TelemetryListener {
    handle: Option<JoinHandle<()>>,
    shutdown: Arc<AtomicBool>,
}

impl TelemetryListener {
    /// Signal the thread and wait for it. The reader's timeout bounds the wait.
    pub fn stop(mut self) {
        self.shutdown.store(true, Ordering::Relaxed);
        if let Some(handle) = self.handle.take() {
            if handle.join().is_err() {
                warn!("Telemetry listener panicked");
            }
        }
    }
}

/// Spawn a listener on `reader`. The thread ends on EOF, on a hard read
/// error, when `shutdown` is set, or when the receiver is dropped.
pub fn spawn_listener<R>(
    reader: R,
    shutdown: Arc<AtomicBool>,
) -> (TelemetryListener, mpsc::Receiver<TelemetryRecord>)
where
    R: Read + Send + 'static,
{
    let (tx, rx) = mpsc::channel();
    let flag = Arc::clone(&shutdown);

    let handle = std::thread::spawn(move || {
        let mut reader = BufReader::new(reader);
        let mut line = Vec::new();
        while !flag.load(Ordering::Relaxed) {
            match reader.read_until(b'\n', &mut line) {
                Ok(0) => {
                    debug!("Telemetry stream closed");
                    break;
                }
                Ok(_) => {
                    let text = String::from_utf8_lossy(&line);
                    if let Some(record) = parse_telemetry_line(&text) {
                        if tx.send(record).is_err() {
                            break;
                        }
                    }
                    line.clear();
                }
                Err(e) if matches!(e.kind(), ErrorKind::TimedOut | ErrorKind::WouldBlock) => {}
                Err(e) if e.kind() == ErrorKind::Interrupted => {}
                Err(e) => {
                    warn!(error = %e, "Telemetry read failed");
                    break;
                }
            }
        }
    });

    (
        TelemetryListener {
            handle: Some(handle),
            shutdown,
        },
        rx,
    )
}
