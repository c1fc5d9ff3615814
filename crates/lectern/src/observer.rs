//! Observer fan-out.
//!
//! Views register an [`ObserverHandle`] with a [`crate::Presentation`] and are told about every
//! change synchronously, in registration order. Handles are compared by allocation, so
//! registering the same handle twice is a no-op.

use std::cell::RefCell;
use std::fmt;
use std::rc::Rc;

use crate::presentation::Presentation;
use crate::slide::Slide;

pub trait Observer {
    /// Called after every successful mutation of `presentation`.
    ///
    /// An error is logged by the presentation and does not stop other observers from being
    /// notified.
    fn notify(&mut self, presentation: &Presentation, current: Option<&Slide>)
    -> anyhow::Result<()>;
}

pub type ObserverHandle = Rc<RefCell<dyn Observer>>;

fn same_observer(a: &ObserverHandle, b: &ObserverHandle) -> bool {
    std::ptr::addr_eq(Rc::as_ptr(a), Rc::as_ptr(b))
}

/// Ordered set of observer handles.
#[derive(Default, Clone)]
pub struct ObserverSet {
    handles: Vec<ObserverHandle>,
}

impl fmt::Debug for ObserverSet {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("ObserverSet")
            .field("len", &self.handles.len())
            .finish()
    }
}

impl ObserverSet {
    pub fn new() -> Self {
        Self::default()
    }

    /// Returns `false` if `handle` was already registered.
    pub fn add(&mut self, handle: ObserverHandle) -> bool {
        if self.contains(&handle) {
            return false;
        }
        self.handles.push(handle);
        true
    }

    /// Returns `false` if `handle` was not registered.
    pub fn remove(&mut self, handle: &ObserverHandle) -> bool {
        let before = self.handles.len();
        self.handles.retain(|h| !same_observer(h, handle));
        self.handles.len() != before
    }

    pub fn contains(&self, handle: &ObserverHandle) -> bool {
        self.handles.iter().any(|h| same_observer(h, handle))
    }

    pub fn len(&self) -> usize {
        self.handles.len()
    }

    pub fn is_empty(&self) -> bool {
        self.handles.is_empty()
    }

    /// Notify every observer in registration order. Returns how many failed.
    pub fn notify_all(&self, presentation: &Presentation, current: Option<&Slide>) -> usize {
        let mut failures = 0;
        for (position, handle) in self.handles.iter().enumerate() {
            let Ok(mut observer) = handle.try_borrow_mut() else {
                tracing::warn!(observer = position, "observer busy during notification; skipped");
                failures += 1;
                continue;
            };
            if let Err(e) = observer.notify(presentation, current) {
                tracing::warn!(observer = position, error = %e, "observer failed");
                failures += 1;
            }
        }
        failures
    }
}

#[cfg(test)]
pub(crate) mod testing {
    use super::*;
    use crate::slide::SlideId;

    /// Records every notification it receives.
    #[derive(Default)]
    pub struct Recorder {
        pub calls: Vec<(Option<usize>, Option<SlideId>)>,
        pub fail: bool,
    }

    impl Recorder {
        pub fn handle() -> Rc<RefCell<Recorder>> {
            Rc::new(RefCell::new(Recorder::default()))
        }

        pub fn failing() -> Rc<RefCell<Recorder>> {
            Rc::new(RefCell::new(Recorder {
                fail: true,
                ..Recorder::default()
            }))
        }
    }

    impl Observer for Recorder {
        fn notify(
            &mut self,
            presentation: &Presentation,
            current: Option<&Slide>,
        ) -> anyhow::Result<()> {
            self.calls
                .push((presentation.slide_number(), current.map(Slide::id)));
            if self.fail {
                anyhow::bail!("recorder configured to fail");
            }
            Ok(())
        }
    }
}

#[cfg(test)]
mod tests {
    use super::testing::Recorder;
    use super::*;

    #[test]
    fn add_is_idempotent() {
        let mut set = ObserverSet::new();
        let recorder = Recorder::handle();
        assert!(set.add(recorder.clone()));
        assert!(!set.add(recorder.clone()));
        assert_eq!(set.len(), 1);
    }

    #[test]
    fn removing_an_unknown_observer_is_a_no_op() {
        let mut set = ObserverSet::new();
        let registered = Recorder::handle();
        let stranger: ObserverHandle = Recorder::handle();
        set.add(registered);
        assert!(!set.remove(&stranger));
        assert_eq!(set.len(), 1);
    }

    #[test]
    fn distinct_handles_to_equal_values_are_distinct() {
        let mut set = ObserverSet::new();
        assert!(set.add(Recorder::handle()));
        assert!(set.add(Recorder::handle()));
        assert_eq!(set.len(), 2);
    }

    #[test]
    fn failing_observer_does_not_block_the_rest() {
        let presentation = Presentation::new();
        let mut set = ObserverSet::new();
        let first = Recorder::failing();
        let second = Recorder::handle();
        set.add(first.clone());
        set.add(second.clone());

        assert_eq!(set.notify_all(&presentation, None), 1);
        assert_eq!(first.borrow().calls.len(), 1);
        assert_eq!(second.borrow().calls.len(), 1);
    }

    #[test]
    fn busy_observer_is_skipped() {
        let presentation = Presentation::new();
        let mut set = ObserverSet::new();
        let busy = Recorder::handle();
        let free = Recorder::handle();
        set.add(busy.clone());
        set.add(free.clone());

        let _guard = busy.borrow_mut();
        assert_eq!(set.notify_all(&presentation, None), 1);
        assert_eq!(free.borrow().calls.len(), 1);
    }
}
