//! Global busy indicator.
//!
//! Every network operation holds a [`BusyGuard`] while it runs. The count
//! is observable through a watch channel so a front end can show a spinner
//! while it is above zero.

use std::sync::Arc;

use tokio::sync::watch;

#[derive(Debug, Clone)]
pub struct BusyIndicator {
    depth: Arc<watch::Sender<usize>>,
}

impl Default for BusyIndicator {
    fn default() -> Self {
        Self::new()
    }
}

impl BusyIndicator {
    pub fn new() -> Self {
        let (tx, _rx) = watch::channel(0);
        Self { depth: Arc::new(tx) }
    }

    pub fn show(&self) {
        self.depth.send_modify(|depth| *depth += 1);
    }

    /// Undo one [`show`](Self::show). Extra calls are ignored.
    pub fn hide(&self) {
        self.depth.send_modify(|depth| *depth = depth.saturating_sub(1));
    }

    /// Show until the returned guard is dropped.
    pub fn guard(&self) -> BusyGuard {
        self.show();
        BusyGuard {
            indicator: self.clone(),
        }
    }

    pub fn is_busy(&self) -> bool {
        self.depth() > 0
    }

    pub fn depth(&self) -> usize {
        *self.depth.borrow()
    }

    pub fn subscribe(&self) -> watch::Receiver<usize> {
        self.depth.subscribe()
    }
}

/// Keeps the indicator shown while alive.
#[derive(Debug)]
#[must_use = "the indicator hides as soon as the guard is dropped"]
pub struct BusyGuard {
    indicator: BusyIndicator,
}

impl Drop for BusyGuard {
    fn drop(&mut self) {
        self.indicator.hide();
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn nested_operations_are_counted() {
        let busy = BusyIndicator::new();
        assert!(!busy.is_busy());

        let outer = busy.guard();
        let inner = busy.guard();
        assert_eq!(busy.depth(), 2);

        drop(inner);
        assert!(busy.is_busy());
        drop(outer);
        assert!(!busy.is_busy());
    }

    #[test]
    fn hide_never_underflows() {
        let busy = BusyIndicator::new();
        busy.hide();
        assert_eq!(busy.depth(), 0);
        busy.show();
        assert_eq!(busy.depth(), 1);
    }

    #[test]
    fn subscribers_see_changes() {
        let busy = BusyIndicator::new();
        let mut rx = busy.subscribe();
        let _guard = busy.guard();
        assert!(rx.has_changed().unwrap());
        assert_eq!(*rx.borrow_and_update(), 1);
    }
}
