/// Events emitted while an alignment runs.
#[derive(Debug, Clone)]
pub enum Progress {
    PhaseStart { name: &'static str },
    PhaseFinish,

    TaskStart { total_steps: u64 },
    TaskIncrement,
    TaskFinish,

    /// The search started on the target triangle beginning at `row`.
    RowStart { row: usize, target_len: usize },

    Message(String),
}

pub type ProgressCallback<'a> = Box<dyn Fn(Progress) + Send + Sync + 'a>;

/// Forwards [`Progress`] events to an optional callback.
///
/// Rows of the triangle search may run on several threads, so the callback must
/// tolerate concurrent calls and events of different rows may interleave.
#[derive(Default)]
pub struct ProgressReporter<'a> {
    callback: Option<ProgressCallback<'a>>,
}

impl<'a> ProgressReporter<'a> {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_callback(callback: ProgressCallback<'a>) -> Self {
        Self {
            callback: Some(callback),
        }
    }

    #[inline]
    pub fn report(&self, event: Progress) {
        if let Some(cb) = &self.callback {
            cb(event);
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::Mutex;

    #[test]
    fn reporter_without_callback_ignores_events() {
        let reporter = ProgressReporter::new();
        reporter.report(Progress::TaskIncrement);
    }

    #[test]
    fn reporter_forwards_events_in_order() {
        let seen = Mutex::new(Vec::new());
        let reporter = ProgressReporter::with_callback(Box::new(|event: Progress| {
            if let Progress::RowStart { row, target_len } = event {
                seen.lock().unwrap().push((row, target_len));
            }
        }));

        reporter.report(Progress::RowStart { row: 0, target_len: 5 });
        reporter.report(Progress::PhaseFinish);
        reporter.report(Progress::RowStart { row: 1, target_len: 5 });
        drop(reporter);

        assert_eq!(seen.into_inner().unwrap(), vec![(0, 5), (1, 5)]);
    }
}
