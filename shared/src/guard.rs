use std::sync::Arc;
use std::sync::atomic::{AtomicU64, Ordering};

/// 请求代数守卫
///
/// 每条异步加载链在开始时领取一张 `RequestTicket`，提交结果前检查它是否仍是最新的。
/// 依赖变化或视图卸载时调用 `invalidate`，之前领取的票据全部作废。
#[derive(Debug, Clone, Default)]
pub struct RequestGuard {
    generation: Arc<AtomicU64>,
}

#[derive(Debug, Clone)]
pub struct RequestTicket {
    generation: Arc<AtomicU64>,
    issued: u64,
}

impl RequestGuard {
    pub fn new() -> Self {
        Self::default()
    }

    /// 开始新的加载链，同时作废旧票据
    pub fn issue(&self) -> RequestTicket {
        let issued = self.generation.fetch_add(1, Ordering::SeqCst) + 1;
        RequestTicket {
            generation: self.generation.clone(),
            issued,
        }
    }

    pub fn invalidate(&self) {
        self.generation.fetch_add(1, Ordering::SeqCst);
    }
}

impl RequestTicket {
    pub fn is_current(&self) -> bool {
        self.generation.load(Ordering::SeqCst) == self.issued
    }

    /// 票据仍有效时执行提交，否则丢弃
    pub fn commit<F: FnOnce()>(&self, f: F) -> bool {
        if self.is_current() {
            f();
            true
        } else {
            tracing::debug!(ticket = self.issued, "stale response discarded");
            false
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_newer_ticket_supersedes_older() {
        let guard = RequestGuard::new();
        let first = guard.issue();
        assert!(first.is_current());

        let second = guard.issue();
        assert!(!first.is_current());
        assert!(second.is_current());
    }

    #[test]
    fn test_invalidate_rejects_commit() {
        let guard = RequestGuard::new();
        let ticket = guard.issue();
        guard.invalidate();

        let mut committed = false;
        assert!(!ticket.commit(|| committed = true));
        assert!(!committed);
    }

    #[test]
    fn test_clones_share_generation() {
        let guard = RequestGuard::new();
        let ticket = guard.issue();
        guard.clone().invalidate();
        assert!(!ticket.is_current());
    }
}
