use std::future::Future;
use std::pin::Pin;
use std::sync::Arc;
use std::sync::atomic::{AtomicUsize, Ordering};

use affected::changes::{DiffOutcome, DiffSource};

/// A fake diff source that:
/// - returns a fixed `DiffOutcome`
/// - counts how often it was asked.
#[derive(Debug, Clone)]
pub struct ScriptedDiff {
    outcome: DiffOutcome,
    calls: Arc<AtomicUsize>,
}

impl ScriptedDiff {
    pub fn changed<I, S>(paths: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        Self {
            outcome: DiffOutcome::Changed(paths.into_iter().map(Into::into).collect()),
            calls: Arc::new(AtomicUsize::new(0)),
        }
    }

    pub fn unavailable(reason: &str) -> Self {
        Self {
            outcome: DiffOutcome::Unavailable(reason.to_string()),
            calls: Arc::new(AtomicUsize::new(0)),
        }
    }

    pub fn calls(&self) -> usize {
        self.calls.load(Ordering::SeqCst)
    }
}

impl DiffSource for ScriptedDiff {
    fn changed_paths(&self) -> Pin<Box<dyn Future<Output = DiffOutcome> + Send + '_>> {
        self.calls.fetch_add(1, Ordering::SeqCst);
        let outcome = self.outcome.clone();
        Box::pin(async move { outcome })
    }
}
