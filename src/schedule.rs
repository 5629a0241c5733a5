use std::{cell::RefCell, rc::Rc};

/// A pending deferred callback. Dropping the handle cancels the callback.
pub trait ScheduledTask {
    fn cancel(self);

    /// Lets the callback run even though the handle goes away.
    fn detach(self);
}

pub trait Scheduler: Clone + 'static {
    type Task: ScheduledTask + 'static;

    /// Milliseconds on the scheduler's clock.
    fn now_ms(&self) -> u64;

    fn schedule<F>(&self, delay_ms: u32, task: F) -> Self::Task
    where
        F: FnOnce() + 'static;

    /// Fire-and-forget variant of [`Scheduler::schedule`].
    fn defer<F>(&self, delay_ms: u32, task: F)
    where
        F: FnOnce() + 'static,
    {
        self.schedule(delay_ms, task).detach();
    }
}

/// Trailing-edge debounce: a burst of `trigger` calls collapses into one
/// callback run `wait_ms` after the last call of the burst.
pub struct Debouncer<S: Scheduler> {
    scheduler: S,
    wait_ms: u32,
    callback: Rc<dyn Fn()>,
    pending: RefCell<Option<S::Task>>,
}

impl<S: Scheduler> Debouncer<S> {
    pub fn new(scheduler: S, wait_ms: u32, callback: impl Fn() + 'static) -> Self {
        Self {
            scheduler,
            wait_ms,
            callback: Rc::new(callback),
            pending: RefCell::new(None),
        }
    }

    pub fn trigger(&self) {
        if let Some(previous) = self.pending.borrow_mut().take() {
            previous.cancel();
        }

        let callback = Rc::clone(&self.callback);
        let task = self.scheduler.schedule(self.wait_ms, move || callback());
        *self.pending.borrow_mut() = Some(task);
    }
}

#[cfg(target_arch = "wasm32")]
pub use browser::BrowserScheduler;

#[cfg(target_arch = "wasm32")]
mod browser {
    use gloo_timers::callback::Timeout;

    use super::{ScheduledTask, Scheduler};

    #[derive(Clone, Copy, Default)]
    pub struct BrowserScheduler;

    impl Scheduler for BrowserScheduler {
        type Task = Timeout;

        fn now_ms(&self) -> u64 {
            js_sys::Date::now() as u64
        }

        fn schedule<F>(&self, delay_ms: u32, task: F) -> Timeout
        where
            F: FnOnce() + 'static,
        {
            Timeout::new(delay_ms, task)
        }
    }

    impl ScheduledTask for Timeout {
        fn cancel(self) {
            let _ = Timeout::cancel(self);
        }

        fn detach(self) {
            let _ = self.forget();
        }
    }
}

#[cfg(test)]
pub mod testing {
    use std::{cell::RefCell, rc::Rc};

    use super::{ScheduledTask, Scheduler};

    struct Entry {
        id: u64,
        due: u64,
        task: Box<dyn FnOnce()>,
    }

    #[derive(Default)]
    struct Queue {
        now: u64,
        next_id: u64,
        entries: Vec<Entry>,
    }

    /// Virtual clock for driving timer-based behavior in tests.
    #[derive(Clone, Default)]
    pub struct ManualScheduler {
        queue: Rc<RefCell<Queue>>,
    }

    impl ManualScheduler {
        pub fn new() -> Self {
            Self::default()
        }

        pub fn now(&self) -> u64 {
            self.queue.borrow().now
        }

        pub fn pending(&self) -> usize {
            self.queue.borrow().entries.len()
        }

        /// Moves the clock forward, running every task that becomes due in
        /// due-time order. Tasks scheduled while advancing run too if they
        /// fall inside the window.
        pub fn advance(&self, ms: u64) {
            let target = self.queue.borrow().now + ms;

            loop {
                let next = {
                    let mut queue = self.queue.borrow_mut();
                    let position = queue
                        .entries
                        .iter()
                        .enumerate()
                        .filter(|(_, entry)| entry.due <= target)
                        .min_by_key(|(_, entry)| (entry.due, entry.id))
                        .map(|(position, _)| position);

                    position.map(|position| {
                        let entry = queue.entries.remove(position);
                        queue.now = entry.due;
                        entry
                    })
                };

                match next {
                    Some(entry) => (entry.task)(),
                    None => break,
                }
            }

            self.queue.borrow_mut().now = target;
        }
    }

    pub struct ManualTask {
        id: u64,
        queue: Rc<RefCell<Queue>>,
        armed: bool,
    }

    impl ScheduledTask for ManualTask {
        fn cancel(self) {}

        fn detach(mut self) {
            self.armed = false;
        }
    }

    impl Drop for ManualTask {
        fn drop(&mut self) {
            if !self.armed {
                return;
            }

            // The removed closure may own other handles, so drop it after the
            // borrow is released.
            let removed = {
                let mut queue = self.queue.borrow_mut();
                queue
                    .entries
                    .iter()
                    .position(|entry| entry.id == self.id)
                    .map(|position| queue.entries.remove(position))
            };
            drop(removed);
        }
    }

    impl Scheduler for ManualScheduler {
        type Task = ManualTask;

        fn now_ms(&self) -> u64 {
            self.now()
        }

        fn schedule<F>(&self, delay_ms: u32, task: F) -> ManualTask
        where
            F: FnOnce() + 'static,
        {
            let mut queue = self.queue.borrow_mut();
            let id = queue.next_id;
            queue.next_id += 1;
            let due = queue.now + u64::from(delay_ms);
            queue.entries.push(Entry {
                id,
                due,
                task: Box::new(task),
            });

            ManualTask {
                id,
                queue: Rc::clone(&self.queue),
                armed: true,
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::testing::ManualScheduler;
    use super::*;
    use std::cell::Cell;

    fn counting_debouncer(scheduler: &ManualScheduler, wait_ms: u32) -> (Debouncer<ManualScheduler>, Rc<Cell<u32>>) {
        let calls = Rc::new(Cell::new(0));
        let counter = Rc::clone(&calls);
        let debouncer = Debouncer::new(scheduler.clone(), wait_ms, move || {
            counter.set(counter.get() + 1);
        });
        (debouncer, calls)
    }

    #[test]
    fn burst_collapses_into_single_trailing_call() {
        let scheduler = ManualScheduler::new();
        let (debouncer, calls) = counting_debouncer(&scheduler, 16);

        for _ in 0..10 {
            debouncer.trigger();
            scheduler.advance(5);
        }
        assert_eq!(calls.get(), 0);

        scheduler.advance(11);
        assert_eq!(calls.get(), 1);

        scheduler.advance(100);
        assert_eq!(calls.get(), 1);
        assert_eq!(scheduler.pending(), 0);
    }

    #[test]
    fn separated_triggers_each_fire() {
        let scheduler = ManualScheduler::new();
        let (debouncer, calls) = counting_debouncer(&scheduler, 16);

        debouncer.trigger();
        scheduler.advance(20);
        debouncer.trigger();
        scheduler.advance(20);

        assert_eq!(calls.get(), 2);
    }

    #[test]
    fn dropping_a_task_cancels_it_but_detach_keeps_it() {
        let scheduler = ManualScheduler::new();
        let fired = Rc::new(Cell::new(0));

        let cancelled = {
            let fired = Rc::clone(&fired);
            scheduler.schedule(10, move || fired.set(fired.get() + 1))
        };
        drop(cancelled);

        let fired_for_detached = Rc::clone(&fired);
        scheduler.defer(10, move || fired_for_detached.set(fired_for_detached.get() + 10));

        scheduler.advance(10);
        assert_eq!(fired.get(), 10);
    }

    #[test]
    fn tasks_scheduled_by_tasks_run_within_the_same_advance() {
        let scheduler = ManualScheduler::new();
        let order = Rc::new(RefCell::new(Vec::new()));

        {
            let inner_scheduler = scheduler.clone();
            let order = Rc::clone(&order);
            scheduler.defer(100, move || {
                order.borrow_mut().push("outer");
                let order = Rc::clone(&order);
                inner_scheduler.defer(50, move || order.borrow_mut().push("inner"));
            });
        }

        scheduler.advance(149);
        assert_eq!(*order.borrow(), vec!["outer"]);
        scheduler.advance(1);
        assert_eq!(*order.borrow(), vec!["outer", "inner"]);
        assert_eq!(scheduler.now(), 150);
    }
}
