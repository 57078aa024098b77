//! A claimed unit of work that must be explicitly consumed by `complete`/`fail`,
//! mirroring the teacher's `WorkHandle`: dropping a handle without consuming it
//! is a bug, logged loudly rather than silently losing the claim.

use std::mem::ManuallyDrop;

pub struct WorkHandle<T: Send + Sync> {
    item: ManuallyDrop<T>,
    pub job_id: i32,
    consumed: bool,
}

impl<T: Send + Sync> WorkHandle<T> {
    pub fn new(item: T, job_id: i32) -> Self {
        Self {
            item: ManuallyDrop::new(item),
            job_id,
            consumed: false,
        }
    }

    pub fn item(&self) -> &T {
        &self.item
    }

    /// Move the item out, marking the handle consumed so `Drop` does not warn.
    pub fn consume(mut self) -> T {
        self.consumed = true;
        // SAFETY: `self` is about to be forgotten, so `item` is read exactly
        // once and never dropped twice.
        let item = unsafe { ManuallyDrop::take(&mut self.item) };
        std::mem::forget(self);
        item
    }
}

impl<T: Send + Sync> Drop for WorkHandle<T> {
    fn drop(&mut self) {
        if !self.consumed {
            tracing::warn!(job_id = self.job_id, "WorkHandle dropped without completing");
            unsafe { ManuallyDrop::drop(&mut self.item) };
        }
    }
}
