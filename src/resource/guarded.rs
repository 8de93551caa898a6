use parking_lot::RwLock;

/// Per-resource state behind its own lock.
///
/// All mutation goes through [`Guarded::update`] and all reads through
/// [`Guarded::read`], so a reader observes either the state before an update
/// or after it, never a mix. Closures run with the lock held and must not
/// block or await.
#[derive(Debug, Default)]
pub struct Guarded<T> {
    inner: RwLock<T>,
}

impl<T> Guarded<T> {
    pub fn new(state: T) -> Self {
        Self {
            inner: RwLock::new(state),
        }
    }

    pub fn read<R>(
        &self,
        f: impl FnOnce(&T) -> R,
    ) -> R {
        f(&self.inner.read())
    }

    pub fn update<R>(
        &self,
        f: impl FnOnce(&mut T) -> R,
    ) -> R {
        f(&mut self.inner.write())
    }
}

impl<T: Clone> Guarded<T> {
    pub fn snapshot(&self) -> T {
        self.inner.read().clone()
    }
}
