//! Observable data sequences.
//!
//! A [`DataArray`] is a shared handle over the samples of one dataset. The
//! five tracked mutations (`append`, `remove_last`, `remove_first`,
//! `splice_replace`, `prepend`) notify every registered [`DataListener`]
//! after the change has been applied, which is how dataset controllers keep
//! one element per sample without rebuilding.
//!
//! # Example
//!
//! ```
//! use chartkit::data::DataArray;
//!
//! let data = DataArray::from_values([1.0, 2.0, 3.0]);
//! let alias = data.clone();
//! alias.append([4.0]);
//! assert_eq!(data.len(), 4);
//! assert!(data.ptr_eq(&alias));
//! ```

use std::cell::RefCell;
use std::rc::{Rc, Weak};

use crate::types::DataValue;

/// A tracked mutation, with the arguments it was applied with.
///
/// Indices and counts are already clamped to the bounds of the sequence.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum DataMutation<'a> {
    /// Samples were added at the end.
    Append(&'a [DataValue]),
    /// The last sample was removed.
    RemoveLast,
    /// The first sample was removed.
    RemoveFirst,
    /// `delete_count` samples were removed at `start`, `items` were inserted there.
    Splice {
        start: usize,
        delete_count: usize,
        items: &'a [DataValue],
    },
    /// Samples were added at the front.
    Prepend(&'a [DataValue]),
}

/// Something that reacts to mutations of a [`DataArray`].
pub trait DataListener {
    fn on_data_mutation(&mut self, mutation: &DataMutation<'_>);
}

/// Weak listener handle, so a listener never keeps itself alive through the
/// array it observes.
pub type ListenerHandle = Weak<RefCell<dyn DataListener>>;

#[derive(Default)]
struct DataArrayInner {
    values: Vec<DataValue>,
    listeners: Vec<ListenerHandle>,
}

/// Shared, observable sequence of samples.
///
/// Cloning the handle shares the underlying sequence; use
/// [`DataArray::ptr_eq`] to test identity.
#[derive(Clone, Default)]
pub struct DataArray {
    inner: Rc<RefCell<DataArrayInner>>,
}

impl std::fmt::Debug for DataArray {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let inner = self.inner.borrow();
        f.debug_struct("DataArray")
            .field("values", &inner.values)
            .field("listeners", &inner.listeners.len())
            .finish()
    }
}

impl DataArray {
    /// Create an empty sequence.
    pub fn new() -> Self {
        Self::default()
    }

    /// Create a sequence from anything convertible to samples.
    pub fn from_values<T, I>(values: I) -> Self
    where
        T: Into<DataValue>,
        I: IntoIterator<Item = T>,
    {
        let values = values.into_iter().map(Into::into).collect();
        Self {
            inner: Rc::new(RefCell::new(DataArrayInner {
                values,
                listeners: Vec::new(),
            })),
        }
    }

    /// Whether both handles refer to the same sequence.
    pub fn ptr_eq(&self, other: &DataArray) -> bool {
        Rc::ptr_eq(&self.inner, &other.inner)
    }

    pub fn len(&self) -> usize {
        self.inner.borrow().values.len()
    }

    pub fn is_empty(&self) -> bool {
        self.inner.borrow().values.is_empty()
    }

    /// Clone of the sample at `index`.
    pub fn get(&self, index: usize) -> Option<DataValue> {
        self.inner.borrow().values.get(index).cloned()
    }

    /// Snapshot of all samples.
    pub fn to_vec(&self) -> Vec<DataValue> {
        self.inner.borrow().values.clone()
    }

    /// Run `f` over the samples without cloning them.
    pub fn with_values<R>(&self, f: impl FnOnce(&[DataValue]) -> R) -> R {
        f(&self.inner.borrow().values)
    }

    /// Replace the sample at `index` in place.
    ///
    /// Not tracked: the element count does not change, the next chart update
    /// picks the new value up. Returns `false` if `index` is out of range.
    pub fn set(&self, index: usize, value: impl Into<DataValue>) -> bool {
        match self.inner.borrow_mut().values.get_mut(index) {
            Some(slot) => {
                *slot = value.into();
                true
            }
            None => false,
        }
    }

    /// Append samples at the end.
    pub fn append<T, I>(&self, items: I)
    where
        T: Into<DataValue>,
        I: IntoIterator<Item = T>,
    {
        let items: Vec<DataValue> = items.into_iter().map(Into::into).collect();
        if items.is_empty() {
            return;
        }
        self.inner.borrow_mut().values.extend(items.iter().cloned());
        self.notify(&DataMutation::Append(&items));
    }

    /// Remove and return the last sample.
    pub fn remove_last(&self) -> Option<DataValue> {
        let removed = self.inner.borrow_mut().values.pop();
        if removed.is_some() {
            self.notify(&DataMutation::RemoveLast);
        }
        removed
    }

    /// Remove and return the first sample.
    pub fn remove_first(&self) -> Option<DataValue> {
        let removed = {
            let mut inner = self.inner.borrow_mut();
            if inner.values.is_empty() {
                None
            } else {
                Some(inner.values.remove(0))
            }
        };
        if removed.is_some() {
            self.notify(&DataMutation::RemoveFirst);
        }
        removed
    }

    /// Remove `delete_count` samples at `start` and insert `items` there.
    ///
    /// `start` is clamped to the length and `delete_count` to what remains,
    /// so out-of-range arguments delete nothing and insert at the end.
    /// Returns the removed samples.
    pub fn splice_replace<T, I>(
        &self,
        start: usize,
        delete_count: usize,
        items: I,
    ) -> Vec<DataValue>
    where
        T: Into<DataValue>,
        I: IntoIterator<Item = T>,
    {
        let items: Vec<DataValue> = items.into_iter().map(Into::into).collect();
        let (start, removed) = {
            let mut inner = self.inner.borrow_mut();
            let len = inner.values.len();
            let start = start.min(len);
            let end = start + delete_count.min(len - start);
            let removed: Vec<DataValue> = inner
                .values
                .splice(start..end, items.iter().cloned())
                .collect();
            (start, removed)
        };
        if !removed.is_empty() || !items.is_empty() {
            self.notify(&DataMutation::Splice {
                start,
                delete_count: removed.len(),
                items: &items,
            });
        }
        removed
    }

    /// Insert samples at the front, keeping their order.
    pub fn prepend<T, I>(&self, items: I)
    where
        T: Into<DataValue>,
        I: IntoIterator<Item = T>,
    {
        let items: Vec<DataValue> = items.into_iter().map(Into::into).collect();
        if items.is_empty() {
            return;
        }
        self.inner
            .borrow_mut()
            .values
            .splice(0..0, items.iter().cloned());
        self.notify(&DataMutation::Prepend(&items));
    }

    /// Register a listener. Registering the same listener twice is a no-op.
    pub fn listen(&self, listener: ListenerHandle) {
        let mut inner = self.inner.borrow_mut();
        if !inner.listeners.iter().any(|l| Weak::ptr_eq(l, &listener)) {
            inner.listeners.push(listener);
        }
    }

    /// Remove a listener. Once the last one is gone the sequence is unobserved.
    pub fn unlisten(&self, listener: &ListenerHandle) {
        let mut inner = self.inner.borrow_mut();
        inner
            .listeners
            .retain(|l| !Weak::ptr_eq(l, listener) && l.strong_count() > 0);
    }

    /// Number of live listeners.
    pub fn listener_count(&self) -> usize {
        self.inner
            .borrow()
            .listeners
            .iter()
            .filter(|l| l.strong_count() > 0)
            .count()
    }

    /// Whether any live listener observes this sequence.
    pub fn is_observed(&self) -> bool {
        self.listener_count() > 0
    }

    fn notify(&self, mutation: &DataMutation<'_>) {
        // Collect first: listeners may read the array while reacting.
        let listeners: Vec<_> = {
            let mut inner = self.inner.borrow_mut();
            inner.listeners.retain(|l| l.strong_count() > 0);
            inner.listeners.iter().filter_map(Weak::upgrade).collect()
        };

        tracing::trace!(?mutation, listeners = listeners.len(), "data mutation");

        for listener in listeners {
            match listener.try_borrow_mut() {
                Ok(mut listener) => listener.on_data_mutation(mutation),
                Err(_) => {
                    tracing::warn!(
                        "data listener busy during mutation; it will resync on next update"
                    );
                }
            }
        }
    }
}

impl<T: Into<DataValue>> FromIterator<T> for DataArray {
    fn from_iter<I: IntoIterator<Item = T>>(iter: I) -> Self {
        Self::from_values(iter)
    }
}
