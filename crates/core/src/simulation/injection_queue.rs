//! Pending injection requests
//!
//! Input handlers submit requests at any time; the simulation drains them at the
//! start of the next tick, so drops land between steps and never during one.

/// A drop the caller wants added before the next step
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum InjectionRequest {
    /// Drop at an explicit cell, validated when it is applied
    Drop {
        x: i64,
        y: i64,
        radius: i64,
        strength: f64,
    },
    /// Drop drawn from the configured rain ranges
    Random,
}

impl InjectionRequest {
    #[must_use]
    pub fn drop(x: i64, y: i64, radius: i64, strength: f64) -> Self {
        Self::Drop {
            x,
            y,
            radius,
            strength,
        }
    }
}

/// Requests waiting for the next tick, plus those applied during the current one
#[derive(Debug, Default)]
pub struct InjectionQueue {
    pending: Vec<InjectionRequest>,
    executed_this_frame: Vec<InjectionRequest>,
}

impl InjectionQueue {
    #[must_use]
    pub fn new() -> Self {
        Self {
            pending: Vec::with_capacity(16),
            executed_this_frame: Vec::with_capacity(16),
        }
    }

    /// Queue a request for the next tick
    pub fn submit(&mut self, request: InjectionRequest) {
        self.pending.push(request);
    }

    #[must_use]
    pub fn pending(&self) -> &[InjectionRequest] {
        &self.pending
    }

    /// Requests successfully applied since the last [`begin_frame`](Self::begin_frame)
    #[must_use]
    pub fn executed_this_frame(&self) -> &[InjectionRequest] {
        &self.executed_this_frame
    }

    pub fn begin_frame(&mut self) {
        self.executed_this_frame.clear();
    }

    /// Take all pending requests in submission order
    pub fn take_pending(&mut self) -> Vec<InjectionRequest> {
        std::mem::take(&mut self.pending)
    }

    pub fn mark_executed(&mut self, request: InjectionRequest) {
        self.executed_this_frame.push(request);
    }

    pub fn clear(&mut self) {
        self.pending.clear();
        self.executed_this_frame.clear();
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_submit_and_take_preserves_order() {
        let mut queue = InjectionQueue::new();
        queue.submit(InjectionRequest::drop(1, 2, 3, 0.5));
        queue.submit(InjectionRequest::Random);
        assert_eq!(queue.pending().len(), 2);

        let pending = queue.take_pending();
        assert_eq!(
            pending,
            vec![InjectionRequest::drop(1, 2, 3, 0.5), InjectionRequest::Random]
        );
        assert!(queue.pending().is_empty());
    }

    #[test]
    fn test_frame_lifecycle() {
        let mut queue = InjectionQueue::new();
        queue.mark_executed(InjectionRequest::Random);
        assert_eq!(queue.executed_this_frame().len(), 1);

        queue.begin_frame();
        assert!(queue.executed_this_frame().is_empty());

        queue.submit(InjectionRequest::Random);
        queue.mark_executed(InjectionRequest::Random);
        queue.clear();
        assert!(queue.pending().is_empty());
        assert!(queue.executed_this_frame().is_empty());
    }
}
