//! Deferred world mutations and the queue that carries them.
//!
//! Decisions never touch the grid. They describe what they want as an
//! [`Action`], the scheduler pushes it onto the [`ActionQueue`], and the apply
//! phase pops and executes actions one at a time, in FIFO order, on a single
//! thread. An action checks its preconditions again when applied and does
//! nothing if the world has moved on.
//!
//! # Saturation
//!
//! The queue is bounded. Enqueueing into a full queue is
//! [`WorldError::QueueSaturated`]: the action is never dropped silently, and
//! the caller treats it as a configuration error.
//!
//! # Example
//!
//! ```
//! use burrow::Coord;
//! use gopherlife_core::action::{Action, ActionQueue};
//!
//! let queue = ActionQueue::new(2);
//! queue.enqueue(Action::SelectAt(Coord::new(1, 1))).unwrap();
//! queue.enqueue(Action::Unselect).unwrap();
//! assert!(queue.enqueue(Action::SelectRandom).is_err());
//!
//! let drained: Vec<Action> = queue.drain().collect();
//! assert_eq!(drained, vec![Action::SelectAt(Coord::new(1, 1)), Action::Unselect]);
//! ```

use burrow::Coord;
use crossbeam_channel::{Receiver, Sender, TrySendError};

use crate::entity::GopherId;
use crate::error::WorldError;

/// A deferred mutation.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Action {
    /// Step a gopher from `from` to the empty tile `to`.
    MoveGopher {
        /// Gopher to move
        id: GopherId,
        /// Where the decision saw it
        from: Coord,
        /// Where it wants to be
        to: Coord,
    },
    /// Eat the food at `food_at` and take its tile.
    ConsumeFood {
        /// Hungry gopher
        id: GopherId,
        /// Where the decision saw it
        from: Coord,
        /// Food tile, at most one step away
        food_at: Coord,
    },
    /// Take a dead gopher off the grid.
    RemoveGopher {
        /// Gopher to remove
        id: GopherId,
        /// Tile it died on
        at: Coord,
    },
    /// Admit a newborn, next to `parent` if there is one.
    SpawnGopher {
        /// Mating gopher paying for the birth
        parent: Option<GopherId>,
    },
    /// Select whichever gopher stands on a tile.
    SelectAt(Coord),
    /// Select a random live gopher.
    SelectRandom,
    /// Clear the selection.
    Unselect,
}

/// Bounded FIFO of pending actions.
///
/// Many producers may hold an [`ActionSender`]; only the owner drains.
#[derive(Debug)]
pub struct ActionQueue {
    sender: Sender<Action>,
    receiver: Receiver<Action>,
    capacity: usize,
}

impl ActionQueue {
    /// Create a queue holding at most `capacity` actions.
    ///
    /// A zero capacity is raised to one.
    #[must_use]
    pub fn new(capacity: usize) -> Self {
        let capacity = capacity.max(1);
        let (sender, receiver) = crossbeam_channel::bounded(capacity);
        Self {
            sender,
            receiver,
            capacity,
        }
    }

    /// Push an action.
    ///
    /// # Errors
    ///
    /// [`WorldError::QueueSaturated`] if the queue is full.
    pub fn enqueue(&self, action: Action) -> Result<(), WorldError> {
        push(&self.sender, action, self.capacity)
    }

    /// A handle other threads can enqueue through.
    #[must_use]
    pub fn sender(&self) -> ActionSender {
        ActionSender {
            sender: self.sender.clone(),
            capacity: self.capacity,
        }
    }

    /// Pop the oldest pending action.
    #[must_use]
    pub fn pop(&self) -> Option<Action> {
        self.receiver.try_recv().ok()
    }

    /// Pop actions until the queue is empty.
    pub fn drain(&self) -> impl Iterator<Item = Action> + '_ {
        self.receiver.try_iter()
    }

    /// Pending actions.
    #[must_use]
    pub fn len(&self) -> usize {
        self.receiver.len()
    }

    /// True if nothing is pending.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.receiver.is_empty()
    }

    /// Maximum number of pending actions.
    #[must_use]
    pub fn capacity(&self) -> usize {
        self.capacity
    }
}

/// Cloneable enqueue handle for controller threads.
///
/// Actions sent through it are applied in the next apply phase.
#[derive(Debug, Clone)]
pub struct ActionSender {
    sender: Sender<Action>,
    capacity: usize,
}

impl ActionSender {
    /// Push an action.
    ///
    /// # Errors
    ///
    /// [`WorldError::QueueSaturated`] if the queue is full.
    pub fn send(&self, action: Action) -> Result<(), WorldError> {
        push(&self.sender, action, self.capacity)
    }
}

fn push(sender: &Sender<Action>, action: Action, capacity: usize) -> Result<(), WorldError> {
    match sender.try_send(action) {
        Ok(()) => Ok(()),
        // The queue owns a receiver for as long as any sender can reach it,
        // so a disconnect means the world is gone and the action is moot.
        Err(TrySendError::Disconnected(_)) => Ok(()),
        Err(TrySendError::Full(action)) => {
            tracing::warn!(?action, capacity, "action queue saturated");
            Err(WorldError::QueueSaturated { capacity })
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::thread;

    #[test]
    fn drains_in_fifo_order() {
        let queue = ActionQueue::new(8);
        for x in 0..5 {
            queue.enqueue(Action::SelectAt(Coord::new(x, 0))).unwrap();
        }
        let xs: Vec<i32> = queue
            .drain()
            .map(|action| match action {
                Action::SelectAt(at) => at.x,
                other => panic!("unexpected {other:?}"),
            })
            .collect();
        assert_eq!(xs, vec![0, 1, 2, 3, 4]);
        assert!(queue.is_empty());
    }

    #[test]
    fn saturation_is_reported() {
        let queue = ActionQueue::new(1);
        queue.enqueue(Action::Unselect).unwrap();
        match queue.enqueue(Action::SelectRandom) {
            Err(WorldError::QueueSaturated { capacity }) => assert_eq!(capacity, 1),
            other => panic!("expected saturation, got {other:?}"),
        }
        // The queued action survived.
        assert_eq!(queue.drain().collect::<Vec<_>>(), vec![Action::Unselect]);
    }

    #[test]
    fn zero_capacity_still_buffers() {
        let queue = ActionQueue::new(0);
        assert_eq!(queue.capacity(), 1);
        assert!(queue.enqueue(Action::Unselect).is_ok());
    }

    #[test]
    fn senders_feed_the_same_queue() {
        let queue = ActionQueue::new(64);
        let handles: Vec<_> = (0..4)
            .map(|t| {
                let sender = queue.sender();
                thread::spawn(move || {
                    for i in 0..8 {
                        sender.send(Action::SelectAt(Coord::new(t, i))).unwrap();
                    }
                })
            })
            .collect();
        for handle in handles {
            handle.join().unwrap();
        }
        assert_eq!(queue.len(), 32);
        assert_eq!(queue.drain().count(), 32);
    }
}
