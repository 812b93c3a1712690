//! Pending-completion table keyed by request id.

use super::message::WorkerResponse;
use futures::channel::oneshot;
use parking_lot::Mutex;
use std::collections::HashMap;

#[derive(Default)]
pub(crate) struct PendingTable {
    completions: Mutex<HashMap<u64, oneshot::Sender<WorkerResponse>>>,
}

impl PendingTable {
    pub fn register(&self, id: u64) -> oneshot::Receiver<WorkerResponse> {
        let (sender, receiver) = oneshot::channel();
        self.completions.lock().insert(id, sender);
        receiver
    }

    /// Hand a response to whoever is waiting on its id.
    /// Returns false if nobody is (unknown id, cleared, or handle dropped).
    pub fn complete(&self, response: WorkerResponse) -> bool {
        // Release the lock before waking the receiver
        let sender = self.completions.lock().remove(&response.id);
        match sender {
            Some(sender) => sender.send(response).is_ok(),
            None => false,
        }
    }

    pub fn remove(&self, id: u64) {
        self.completions.lock().remove(&id);
    }

    /// Drop every pending completion; waiting handles see cancellation.
    pub fn clear(&self) -> usize {
        let mut completions = self.completions.lock();
        let count = completions.len();
        completions.clear();
        count
    }

    pub fn len(&self) -> usize {
        self.completions.lock().len()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::mesher::TintColors;
    use futures::executor::block_on;

    fn response(id: u64) -> WorkerResponse {
        WorkerResponse {
            id,
            elements: Vec::new(),
            blockstate_rotation: None,
            tint_colors: TintColors::default(),
        }
    }

    #[test]
    fn test_complete_out_of_order() {
        let table = PendingTable::default();
        let first = table.register(1);
        let second = table.register(2);
        assert_eq!(table.len(), 2);

        assert!(table.complete(response(2)));
        assert!(table.complete(response(1)));

        assert_eq!(block_on(first).unwrap().id, 1);
        assert_eq!(block_on(second).unwrap().id, 2);
        assert_eq!(table.len(), 0);
    }

    #[test]
    fn test_unknown_id_ignored() {
        let table = PendingTable::default();
        assert!(!table.complete(response(9)));
    }

    #[test]
    fn test_clear_cancels_waiters() {
        let table = PendingTable::default();
        let receiver = table.register(1);
        assert_eq!(table.clear(), 1);
        assert!(block_on(receiver).is_err());
    }
}
