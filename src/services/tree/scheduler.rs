//! Host task queues for work that must wait until the view has caught up
//! with a structural change.

use std::cell::RefCell;
use std::collections::VecDeque;
use std::fmt;

pub type Task = Box<dyn FnOnce()>;

pub trait Scheduler {
    /// Queues `task` to run after the current synchronous call returns.
    fn defer(&self, task: Task);

    /// Runs whatever is queued and reports how many tasks ran. Schedulers
    /// driven by a runtime return 0.
    fn run_pending(&self) -> usize {
        0
    }
}

/// FIFO drained by the host, e.g. once per frame.
#[derive(Default)]
pub struct LocalQueue {
    tasks: RefCell<VecDeque<Task>>,
}

impl LocalQueue {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn len(&self) -> usize {
        self.tasks.borrow().len()
    }

    pub fn is_empty(&self) -> bool {
        self.tasks.borrow().is_empty()
    }
}

impl Scheduler for LocalQueue {
    fn defer(&self, task: Task) {
        self.tasks.borrow_mut().push_back(task);
    }

    fn run_pending(&self) -> usize {
        let mut ran = 0;
        // Tasks queued while draining run in the same call.
        loop {
            let next = self.tasks.borrow_mut().pop_front();
            match next {
                Some(task) => {
                    task();
                    ran += 1;
                }
                None => break,
            }
        }
        ran
    }
}

impl fmt::Debug for LocalQueue {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("LocalQueue")
            .field("pending", &self.len())
            .finish()
    }
}

/// Posts tasks to the current `tokio::task::LocalSet`.
///
/// Must only be used from inside a `LocalSet`; tokio panics otherwise.
#[derive(Debug, Default, Clone, Copy)]
pub struct TokioScheduler;

impl Scheduler for TokioScheduler {
    fn defer(&self, task: Task) {
        tokio::task::spawn_local(async move { task() });
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::cell::Cell;
    use std::rc::Rc;

    #[test]
    fn local_queue_runs_in_fifo_order() {
        let queue = Rc::new(LocalQueue::new());
        let log = Rc::new(RefCell::new(Vec::new()));
        for n in 0..3 {
            let log = log.clone();
            queue.defer(Box::new(move || log.borrow_mut().push(n)));
        }
        assert_eq!(queue.len(), 3);
        assert_eq!(queue.run_pending(), 3);
        assert_eq!(*log.borrow(), vec![0, 1, 2]);
        assert!(queue.is_empty());
    }

    #[test]
    fn tasks_queued_while_draining_also_run() {
        let queue = Rc::new(LocalQueue::new());
        let hits = Rc::new(Cell::new(0));
        let inner_queue = queue.clone();
        let inner_hits = hits.clone();
        queue.defer(Box::new(move || {
            let hits = inner_hits.clone();
            inner_queue.defer(Box::new(move || hits.set(hits.get() + 1)));
        }));

        assert_eq!(queue.run_pending(), 2);
        assert_eq!(hits.get(), 1);
    }
}
