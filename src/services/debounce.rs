use std::collections::HashMap;
use std::sync::{Arc, Mutex};
use std::time::Duration;

use tokio::sync::oneshot;

/// Upper bound on tracked editors before idle ones are pruned.
const MAX_TRACKED_EDITORS: usize = 256;

struct PendingSlot {
    generation: u64,
    cancel: oneshot::Sender<()>,
}

#[derive(Default)]
struct DebouncerInner {
    next_generation: u64,
    pending: Option<PendingSlot>,
}

/// Single-slot debouncer: at most one job is scheduled at a time and scheduling a
/// new one cancels the previous one instead of queueing behind it.
pub struct Debouncer {
    quiet: Duration,
    inner: Mutex<DebouncerInner>,
}

impl Debouncer {
    pub fn new(quiet: Duration) -> Self {
        Self {
            quiet,
            inner: Mutex::new(DebouncerInner::default()),
        }
    }

    pub fn quiet_interval(&self) -> Duration {
        self.quiet
    }

    /// True while a job is waiting for its quiet interval to pass.
    pub fn is_pending(&self) -> bool {
        self.inner.lock().unwrap().pending.is_some()
    }

    /// Wait for the quiet interval and run `job`, unless another call supersedes
    /// this one first. Returns `None` when superseded.
    pub async fn run<F, T>(&self, job: F) -> Option<T>
    where
        F: FnOnce() -> T,
    {
        let (tx, rx) = oneshot::channel();
        let generation = {
            let mut inner = self.inner.lock().unwrap();
            inner.next_generation += 1;
            let generation = inner.next_generation;
            if let Some(previous) = inner.pending.replace(PendingSlot { generation, cancel: tx }) {
                let _ = previous.cancel.send(());
            }
            generation
        };

        // Frees the slot if this call is dropped while still waiting.
        let _slot = SlotGuard { debouncer: self, generation };

        tokio::select! {
            _ = rx => return None,
            _ = tokio::time::sleep(self.quiet) => {}
        }

        if !self.release(generation) {
            return None;
        }
        Some(job())
    }

    /// Clear the pending slot if it still belongs to `generation`.
    fn release(&self, generation: u64) -> bool {
        let Ok(mut inner) = self.inner.lock() else {
            return false;
        };
        match inner.pending.as_ref() {
            Some(slot) if slot.generation == generation => {
                inner.pending = None;
                true
            }
            _ => false,
        }
    }
}

struct SlotGuard<'a> {
    debouncer: &'a Debouncer,
    generation: u64,
}

impl Drop for SlotGuard<'_> {
    fn drop(&mut self) {
        self.debouncer.release(self.generation);
    }
}

/// Debouncers for the JSON editors currently open in browsers.
#[derive(Clone)]
pub struct EditorRegistry {
    quiet: Duration,
    editors: Arc<Mutex<HashMap<String, Arc<Debouncer>>>>,
}

impl EditorRegistry {
    pub fn new(quiet: Duration) -> Self {
        Self {
            quiet,
            editors: Arc::new(Mutex::new(HashMap::new())),
        }
    }

    /// The debouncer for `editor_id`, created on first use.
    pub fn debouncer(&self, editor_id: &str) -> Arc<Debouncer> {
        let mut editors = self.editors.lock().unwrap();
        if !editors.contains_key(editor_id) && editors.len() >= MAX_TRACKED_EDITORS {
            editors.retain(|_, d| d.is_pending());
            tracing::debug!(remaining = editors.len(), "Pruned idle editor debouncers");
        }
        editors
            .entry(editor_id.to_string())
            .or_insert_with(|| Arc::new(Debouncer::new(self.quiet)))
            .clone()
    }

    pub fn quiet_interval(&self) -> Duration {
        self.quiet
    }

    #[cfg(test)]
    fn len(&self) -> usize {
        self.editors.lock().unwrap().len()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test(start_paused = true)]
    async fn test_single_run_fires_after_quiet_interval() {
        let debouncer = Debouncer::new(Duration::from_millis(500));
        let started = tokio::time::Instant::now();
        let out = debouncer.run(|| 42).await;
        assert_eq!(out, Some(42));
        assert!(started.elapsed() >= Duration::from_millis(500));
        assert!(!debouncer.is_pending());
    }

    #[tokio::test(start_paused = true)]
    async fn test_later_edit_supersedes_earlier() {
        let debouncer = Arc::new(Debouncer::new(Duration::from_millis(500)));

        let first = {
            let d = debouncer.clone();
            tokio::spawn(async move { d.run(|| "first").await })
        };
        tokio::time::sleep(Duration::from_millis(200)).await;
        let second = {
            let d = debouncer.clone();
            tokio::spawn(async move { d.run(|| "second").await })
        };

        assert_eq!(first.await.unwrap(), None);
        assert_eq!(second.await.unwrap(), Some("second"));
        assert!(!debouncer.is_pending());
    }

    #[tokio::test(start_paused = true)]
    async fn test_abandoned_run_frees_slot() {
        let debouncer = Debouncer::new(Duration::from_millis(500));
        let out = tokio::time::timeout(Duration::from_millis(10), debouncer.run(|| 1)).await;
        assert!(out.is_err());
        assert!(!debouncer.is_pending());

        // A later edit still fires normally.
        assert_eq!(debouncer.run(|| 2).await, Some(2));
    }

    #[tokio::test(start_paused = true)]
    async fn test_registry_prunes_abandoned_editors() {
        let registry = EditorRegistry::new(Duration::from_millis(500));
        for i in 0..300 {
            let debouncer = registry.debouncer(&format!("editor-{i}"));
            let _ = tokio::time::timeout(Duration::from_millis(1), debouncer.run(|| ())).await;
        }
        assert!(registry.len() <= MAX_TRACKED_EDITORS);
    }

    #[tokio::test(start_paused = true)]
    async fn test_registry_reuses_debouncer_per_editor() {
        let registry = EditorRegistry::new(Duration::from_millis(10));
        let a1 = registry.debouncer("a");
        let a2 = registry.debouncer("a");
        let _b = registry.debouncer("b");
        assert!(Arc::ptr_eq(&a1, &a2));
        assert_eq!(registry.len(), 2);
        assert_eq!(a1.quiet_interval(), Duration::from_millis(10));
    }

    #[tokio::test(start_paused = true)]
    async fn test_registry_prunes_idle_editors() {
        let registry = EditorRegistry::new(Duration::from_millis(10));
        for i in 0..MAX_TRACKED_EDITORS {
            registry.debouncer(&format!("editor-{i}"));
        }
        assert_eq!(registry.len(), MAX_TRACKED_EDITORS);
        registry.debouncer("one-more");
        assert_eq!(registry.len(), 1);
    }
}
