use std::collections::{BTreeMap, HashMap};
use std::time::Instant;

/// Handle of a scheduled task
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct TaskHandle(u64);

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Task {
    /// The notification's display time is over
    Expire(u32),
    /// One step of a fade-out
    FadeTick(u32),
}

impl Task {
    pub fn notification(self) -> u32 {
        match self {
            Task::Expire(id) | Task::FadeTick(id) => id,
        }
    }
}

/// Deadline-ordered one-shot tasks.
///
/// Nothing runs by itself. The event loop sleeps until [`Scheduler::next_deadline`]
/// and then drains [`Scheduler::pop_due`].
#[derive(Debug, Default)]
pub struct Scheduler {
    next: u64,
    queue: BTreeMap<(Instant, TaskHandle), Task>,
    deadlines: HashMap<TaskHandle, Instant>,
}

impl Scheduler {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn schedule(&mut self, at: Instant, task: Task) -> TaskHandle {
        let handle = TaskHandle(self.next);
        self.next += 1;
        self.queue.insert((at, handle), task);
        self.deadlines.insert(handle, at);
        handle
    }

    /// Cancel a pending task. Returns false if it already ran or was cancelled.
    pub fn cancel(&mut self, handle: TaskHandle) -> bool {
        match self.deadlines.remove(&handle) {
            Some(at) => self.queue.remove(&(at, handle)).is_some(),
            None => false,
        }
    }

    pub fn deadline(&self, handle: TaskHandle) -> Option<Instant> {
        self.deadlines.get(&handle).copied()
    }

    pub fn next_deadline(&self) -> Option<Instant> {
        self.queue.keys().next().map(|(at, _)| *at)
    }

    /// Take the earliest task due at `now`. Tasks with equal deadlines come
    /// out in the order they were scheduled.
    pub fn pop_due(&mut self, now: Instant) -> Option<(TaskHandle, Task)> {
        let (&(at, handle), _) = self.queue.first_key_value()?;
        if at > now {
            return None;
        }

        let task = self.queue.remove(&(at, handle))?;
        self.deadlines.remove(&handle);
        Some((handle, task))
    }

    pub fn len(&self) -> usize {
        self.queue.len()
    }

    pub fn is_empty(&self) -> bool {
        self.queue.is_empty()
    }
}
