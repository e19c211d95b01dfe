use indicatif::{ProgressBar, ProgressState, ProgressStyle};
use std::collections::BTreeSet;
use std::io::{self, Write};
use std::sync::{Arc, Mutex};
use std::time::Duration;
use tracing::warn;
use trialign::engine::progress::{Progress, ProgressCallback};

const SPINNER_TICK_MS: u64 = 80;

/// Writes `row / total` lines in ascending row order.
///
/// Rows may start on several threads at once; a row that starts early is held
/// back until every row before it has been written.
struct RowPrinter {
    sink: Box<dyn Write + Send>,
    next_row: usize,
    pending: BTreeSet<usize>,
}

impl RowPrinter {
    fn new(sink: Box<dyn Write + Send>) -> Self {
        Self {
            sink,
            next_row: 0,
            pending: BTreeSet::new(),
        }
    }

    fn restart(&mut self) {
        self.next_row = 0;
        self.pending.clear();
    }

    fn start(&mut self, row: usize, target_len: usize) -> io::Result<()> {
        if row < self.next_row {
            return Ok(());
        }
        self.pending.insert(row);
        while self.pending.remove(&self.next_row) {
            writeln!(self.sink, "{} / {}", self.next_row, target_len)?;
            self.next_row += 1;
        }
        self.sink.flush()
    }
}

/// Turns engine progress events into an `indicatif` bar on stderr and the
/// `row / total` lines on stdout.
#[derive(Clone)]
pub struct CliProgressHandler {
    pb: Arc<Mutex<ProgressBar>>,
    rows: Arc<Mutex<RowPrinter>>,
}

impl CliProgressHandler {
    pub fn new() -> Self {
        Self::with_row_sink(Box::new(io::stdout()))
    }

    /// Creates a handler that writes the per-row lines to `sink`.
    pub fn with_row_sink(sink: Box<dyn Write + Send>) -> Self {
        let pb = ProgressBar::new(0)
            .with_style(Self::spinner_style())
            .with_message("Initializing...");
        pb.set_draw_target(indicatif::ProgressDrawTarget::stderr());
        pb.disable_steady_tick();
        pb.finish_and_clear();

        Self {
            pb: Arc::new(Mutex::new(pb)),
            rows: Arc::new(Mutex::new(RowPrinter::new(sink))),
        }
    }

    pub fn get_callback(&self) -> ProgressCallback<'static> {
        let pb_clone = self.pb.clone();
        let rows_clone = self.rows.clone();

        Box::new(move |progress: Progress| {
            let Ok(pb_guard) = pb_clone.lock() else {
                warn!("Progress bar mutex was poisoned. Cannot update progress.");
                return;
            };

            match progress {
                Progress::PhaseStart { name } => {
                    pb_guard.reset();
                    pb_guard.set_length(0);
                    pb_guard.set_style(Self::spinner_style());
                    pb_guard.enable_steady_tick(Duration::from_millis(SPINNER_TICK_MS));
                    pb_guard.set_message(name.to_string());
                }
                Progress::PhaseFinish => {
                    pb_guard.disable_steady_tick();
                    pb_guard.finish_with_message("✓ Done");
                }
                Progress::TaskStart { total_steps } => {
                    if let Ok(mut rows) = rows_clone.lock() {
                        rows.restart();
                    }
                    pb_guard.disable_steady_tick();
                    pb_guard.reset();
                    pb_guard.set_length(total_steps);
                    pb_guard.set_position(0);
                    pb_guard.set_style(Self::bar_style());
                }
                Progress::RowStart { row, target_len } => {
                    pb_guard.suspend(|| {
                        let Ok(mut rows) = rows_clone.lock() else {
                            warn!("Row output mutex was poisoned. Skipping row {}.", row);
                            return;
                        };
                        if let Err(e) = rows.start(row, target_len) {
                            warn!("Failed to report row {}: {}", row, e);
                        }
                    });
                }
                Progress::TaskIncrement => {
                    pb_guard.inc(1);
                }
                Progress::TaskFinish => {
                    if pb_guard.position() < pb_guard.length().unwrap_or(0) {
                        pb_guard.set_position(pb_guard.length().unwrap_or(0));
                    }
                    pb_guard.finish();
                }
                Progress::Message(msg) => {
                    if !pb_guard.is_finished() {
                        pb_guard.println(format!("  {}", msg));
                    } else {
                        pb_guard.set_message(msg);
                    }
                }
            }
        })
    }

    fn spinner_style() -> ProgressStyle {
        ProgressStyle::with_template("{spinner:.green} {msg}")
            .unwrap_or_else(|_| ProgressStyle::default_spinner())
    }

    fn bar_style() -> ProgressStyle {
        ProgressStyle::with_template("{msg:<20} [{bar:40.cyan/blue}] {pos}/{len} rows ({eta})")
            .unwrap_or_else(|_| ProgressStyle::default_bar())
            .with_key(
                "eta",
                |state: &ProgressState, w: &mut dyn std::fmt::Write| {
                    let _ = write!(w, "{:.1}s", state.eta().as_secs_f64());
                },
            )
            .progress_chars("##-")
    }
}

impl Default for CliProgressHandler {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::thread;

    #[derive(Clone, Default)]
    struct SharedBuffer(Arc<Mutex<Vec<u8>>>);

    impl Write for SharedBuffer {
        fn write(&mut self, buf: &[u8]) -> io::Result<usize> {
            self.0.lock().unwrap().extend_from_slice(buf);
            Ok(buf.len())
        }

        fn flush(&mut self) -> io::Result<()> {
            Ok(())
        }
    }

    impl SharedBuffer {
        fn contents(&self) -> String {
            String::from_utf8(self.0.lock().unwrap().clone()).unwrap()
        }
    }

    #[test]
    fn handler_initializes_in_a_clean_state() {
        let handler = CliProgressHandler::new();
        let pb = handler.pb.lock().unwrap();
        assert_eq!(pb.length(), Some(0));
        assert!(pb.is_finished());
    }

    #[test]
    fn callback_updates_progress_bar_state() {
        let handler = CliProgressHandler::with_row_sink(Box::new(SharedBuffer::default()));
        let callback = handler.get_callback();

        callback(Progress::PhaseStart { name: "Triangle Search" });
        {
            let pb = handler.pb.lock().unwrap();
            assert_eq!(pb.message(), "Triangle Search");
            assert!(!pb.is_finished());
        }

        callback(Progress::TaskStart { total_steps: 8 });
        callback(Progress::TaskIncrement);
        {
            let pb = handler.pb.lock().unwrap();
            assert_eq!(pb.length(), Some(8));
            assert_eq!(pb.position(), 1);
        }

        callback(Progress::TaskFinish);
        {
            let pb = handler.pb.lock().unwrap();
            assert!(pb.is_finished());
            assert_eq!(pb.position(), 8);
        }

        callback(Progress::PhaseFinish);
        assert_eq!(handler.pb.lock().unwrap().message(), "✓ Done");
    }

    #[test]
    fn row_events_are_written_as_row_over_total() {
        let buffer = SharedBuffer::default();
        let handler = CliProgressHandler::with_row_sink(Box::new(buffer.clone()));
        let callback = handler.get_callback();

        callback(Progress::TaskStart { total_steps: 2 });
        callback(Progress::RowStart { row: 0, target_len: 4 });
        callback(Progress::RowStart { row: 1, target_len: 4 });

        assert_eq!(buffer.contents(), "0 / 4\n1 / 4\n");
    }

    #[test]
    fn rows_started_out_of_order_are_written_in_order() {
        let buffer = SharedBuffer::default();
        let handler = CliProgressHandler::with_row_sink(Box::new(buffer.clone()));
        let callback = handler.get_callback();

        callback(Progress::TaskStart { total_steps: 4 });
        callback(Progress::RowStart { row: 2, target_len: 6 });
        assert_eq!(buffer.contents(), "");

        callback(Progress::RowStart { row: 0, target_len: 6 });
        assert_eq!(buffer.contents(), "0 / 6\n");

        callback(Progress::RowStart { row: 3, target_len: 6 });
        callback(Progress::RowStart { row: 1, target_len: 6 });
        assert_eq!(buffer.contents(), "0 / 6\n1 / 6\n2 / 6\n3 / 6\n");
    }

    #[test]
    fn a_new_task_restarts_row_numbering() {
        let buffer = SharedBuffer::default();
        let handler = CliProgressHandler::with_row_sink(Box::new(buffer.clone()));
        let callback = handler.get_callback();

        callback(Progress::TaskStart { total_steps: 1 });
        callback(Progress::RowStart { row: 0, target_len: 3 });
        callback(Progress::TaskStart { total_steps: 1 });
        callback(Progress::RowStart { row: 0, target_len: 3 });

        assert_eq!(buffer.contents(), "0 / 3\n0 / 3\n");
    }

    #[test]
    fn callback_is_thread_safe() {
        let buffer = SharedBuffer::default();
        let handler = CliProgressHandler::with_row_sink(Box::new(buffer.clone()));
        let callback = handler.get_callback();

        thread::spawn(move || {
            callback(Progress::PhaseStart {
                name: "Thread Test",
            });
            callback(Progress::RowStart { row: 0, target_len: 9 });
            callback(Progress::PhaseFinish);
        })
        .join()
        .unwrap();

        let pb = handler.pb.lock().unwrap();
        assert!(pb.is_finished());
        assert_eq!(buffer.contents(), "0 / 9\n");
    }
}
