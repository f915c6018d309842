//! Bounded task queue drained on the game thread

use crossbeam_channel::{bounded, Receiver, Sender, TrySendError};

/// A task to execute on the game thread
pub type Task = Box<dyn FnOnce() + Send + 'static>;

/// Producer handle for a [`GameThreadQueue`]
///
/// Cheap to clone; safe to use from any thread.
#[derive(Clone)]
pub struct TaskSender {
    sender: Sender<Task>,
}

impl TaskSender {
    /// Queue a task to execute on the next frame
    ///
    /// # Returns
    /// `true` if the task was queued, `false` if the queue is full or
    /// disconnected (the task is dropped)
    pub fn queue<F>(&self, task: F) -> bool
    where
        F: FnOnce() + Send + 'static,
    {
        match self.sender.try_send(Box::new(task)) {
            Ok(()) => true,
            Err(TrySendError::Full(_)) => {
                tracing::warn!("Game thread task queue full, dropping task");
                false
            }
            Err(TrySendError::Disconnected(_)) => {
                tracing::error!("Game thread task queue disconnected");
                false
            }
        }
    }
}

/// Bounded channel of deferred closures, processed each frame on the game
/// thread
pub struct GameThreadQueue {
    sender: Sender<Task>,
    receiver: Receiver<Task>,
    capacity: usize,
}

impl GameThreadQueue {
    /// Create a queue with the given capacity
    pub fn new(capacity: usize) -> Self {
        let (sender, receiver) = bounded(capacity);
        Self {
            sender,
            receiver,
            capacity,
        }
    }

    /// Get a producer handle for this queue
    pub fn sender(&self) -> TaskSender {
        TaskSender {
            sender: self.sender.clone(),
        }
    }

    /// Process queued tasks
    ///
    /// Called once per frame on the game thread. Drains at most one queue
    /// capacity's worth of tasks so a producer cannot starve the frame.
    /// Returns the number of tasks processed.
    pub fn process(&self) -> usize {
        let mut count = 0;

        while let Ok(task) = self.receiver.try_recv() {
            task();
            count += 1;

            if count >= self.capacity {
                break;
            }
        }

        count
    }

    /// Check how many tasks are currently queued
    pub fn len(&self) -> usize {
        self.receiver.len()
    }

    /// Whether no tasks are queued
    pub fn is_empty(&self) -> bool {
        self.receiver.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::atomic::{AtomicUsize, Ordering};
    use std::sync::Arc;

    #[test]
    fn test_tasks_run_in_order_on_process() {
        let queue = GameThreadQueue::new(16);
        let sender = queue.sender();
        let log = Arc::new(parking_lot::Mutex::new(Vec::new()));

        for i in 0..4 {
            let log = Arc::clone(&log);
            assert!(sender.queue(move || log.lock().push(i)));
        }

        assert_eq!(queue.len(), 4);
        assert_eq!(queue.process(), 4);
        assert_eq!(*log.lock(), vec![0, 1, 2, 3]);
        assert!(queue.is_empty());
    }

    #[test]
    fn test_full_queue_drops_task() {
        let queue = GameThreadQueue::new(2);
        let sender = queue.sender();
        let ran = Arc::new(AtomicUsize::new(0));

        for _ in 0..2 {
            let ran = Arc::clone(&ran);
            assert!(sender.queue(move || {
                ran.fetch_add(1, Ordering::Relaxed);
            }));
        }
        // Third task is dropped, not queued
        let ran_clone = Arc::clone(&ran);
        assert!(!sender.queue(move || {
            ran_clone.fetch_add(1, Ordering::Relaxed);
        }));

        assert_eq!(queue.process(), 2);
        assert_eq!(ran.load(Ordering::Relaxed), 2);
    }

    #[test]
    fn test_queue_from_background_thread() {
        let queue = GameThreadQueue::new(16);
        let sender = queue.sender();
        let ran = Arc::new(AtomicUsize::new(0));

        let ran_clone = Arc::clone(&ran);
        let handle = std::thread::spawn(move || {
            sender.queue(move || {
                ran_clone.fetch_add(1, Ordering::Relaxed);
            });
        });
        handle.join().unwrap();

        assert_eq!(queue.process(), 1);
        assert_eq!(ran.load(Ordering::Relaxed), 1);
    }
}
