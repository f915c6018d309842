//! Game thread task queue
//!
//! Allows the engine callback thread to queue work to execute on the main
//! game thread. The host drains the queue once per frame.
//!
//! # Example
//!
//! ```ignore
//! use soundlink_core::tasks::GameThreadQueue;
//!
//! let queue = GameThreadQueue::new(1024);
//! let sender = queue.sender();
//!
//! // From any thread:
//! sender.queue(|| println!("runs on the game thread"));
//!
//! // Each frame, on the game thread:
//! queue.process();
//! ```

mod queue;

pub use queue::{GameThreadQueue, Task, TaskSender};
