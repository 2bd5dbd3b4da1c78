//! Insertion-ordered set with automatic state transitions.
//!
//! This module provides [`OrderedSet`], a collection of unique elements that
//! iterates in insertion order and transitions automatically between a small
//! (inline) and a large (hash-indexed) representation.
//!
//! # Overview
//!
//! `OrderedSet` provides efficient storage for unique elements by:
//! - Using inline storage (`SmallVec`) for small collections (up to 8 elements)
//! - Automatically promoting to a hash index plus insertion-ordered slot
//!   vector when exceeding 8 elements
//! - Automatically demoting back to inline storage when size drops to 8 or
//!   fewer elements
//!
//! # Ordering Contract
//!
//! Iteration, [`to_vec`](OrderedSet::to_vec), and the `Display` rendering all
//! follow insertion order: the oldest surviving insertion comes first.
//! Removing an element and inserting it again moves it to the end of the
//! order. Equality ([`PartialEq`]) is *set* equality and ignores order.
//!
//! # Time Complexity
//!
//! | Operation      | Small (n <= 8)    | Large (n > 8)       |
//! |----------------|-------------------|---------------------|
//! | `insert`       | O(n)              | O(1) average        |
//! | `remove`       | O(n)              | O(1) amortized      |
//! | `contains`     | O(n)              | O(1) average        |
//! | `len`          | O(1)              | O(1)                |
//! | `is_empty`     | O(1)              | O(1)                |
//! | `iter`         | O(1) + O(n)       | O(1) + O(n)         |
//! | `union`        | O(n + m)          | O(n + m)            |
//! | `intersection` | O(n + m)          | O(n + m)            |
//! | `difference`   | O(n + m)          | O(n + m)            |
//!
//! **Note**: in the Large state, removal leaves a tombstone in the slot
//! vector; slots are compacted once tombstones outnumber live elements, which
//! keeps removal amortized O(1) and iteration O(n).
//!
//! # Examples
//!
//! ```rust
//! use ordset::OrderedSet;
//!
//! let mut set = OrderedSet::new();
//! set.insert(1).insert(2).insert(3);
//! assert_eq!(set.len(), 3);
//! assert!(set.contains(&1));
//!
//! // Duplicate insertion is idempotent
//! set.insert(1);
//! assert_eq!(set.len(), 3);
//!
//! // Remove-then-insert moves the element to the end
//! set.remove(&1).insert(1);
//! assert_eq!(set.to_vec(), vec![2, 3, 1]);
//!
//! // Set algebra never mutates the operands
//! let other: OrderedSet<i32> = [3, 4].into_iter().collect();
//! let union = set.union(&other);
//! assert_eq!(union.to_vec(), vec![2, 3, 1, 4]);
//! assert_eq!(set.len(), 3);
//! ```
//!
//! # State Transitions
//!
//! ```text
//!                    insert (n < 8)
//!     Empty ─────────────────────────────► Small
//!       ▲                                    │
//!       │ remove (n == 0)                    │ insert (n == 8)
//!       │                                    ▼
//!       └─────────────── Small ◄──────── Large
//!                     remove (n == 8)
//! ```

use smallvec::SmallVec;
use std::borrow::Borrow;
use std::collections::HashMap;
use std::fmt;
use std::hash::Hash;
use std::iter::FusedIterator;
use std::mem;
use std::ops::{BitAnd, BitOr, BitXor, Sub};

/// The threshold for transitioning between Small and Large states.
/// Collections with more than this many elements use the hash index.
const SMALL_THRESHOLD: usize = 8;

// =============================================================================
// Hasher Type Alias
// =============================================================================

/// Hash state used by the Large-state membership index.
///
/// With the `ahash` feature this is `ahash::RandomState`; with `fxhash` it is
/// `rustc_hash::FxBuildHasher`; otherwise the std `RandomState`. `ahash` wins
/// when both features are enabled.
#[cfg(feature = "ahash")]
pub(crate) type DefaultBuildHasher = ahash::RandomState;

#[cfg(all(feature = "fxhash", not(feature = "ahash")))]
pub(crate) type DefaultBuildHasher = rustc_hash::FxBuildHasher;

#[cfg(not(any(feature = "ahash", feature = "fxhash")))]
pub(crate) type DefaultBuildHasher = std::collections::hash_map::RandomState;

// =============================================================================
// Large-state storage
// =============================================================================

/// Hash-indexed, insertion-ordered storage for the Large state.
///
/// `index` maps each live element to its position in `slots`; removed
/// positions hold `None` until compaction. Invariant: `slots[position]` is
/// `Some(element)` exactly when `index[element] == position`, and
/// `index.len()` is the number of live elements.
#[derive(Clone)]
struct SlotIndex<T> {
    index: HashMap<T, usize, DefaultBuildHasher>,
    slots: Vec<Option<T>>,
}

impl<T: Clone + Eq + Hash> SlotIndex<T> {
    fn with_capacity(capacity: usize) -> Self {
        Self {
            index: HashMap::with_capacity_and_hasher(capacity, DefaultBuildHasher::default()),
            slots: Vec::with_capacity(capacity),
        }
    }

    #[inline]
    fn len(&self) -> usize {
        self.index.len()
    }

    #[inline]
    fn contains<Q>(&self, element: &Q) -> bool
    where
        T: Borrow<Q>,
        Q: Hash + Eq + ?Sized,
    {
        self.index.contains_key(element)
    }

    #[inline]
    fn get<Q>(&self, element: &Q) -> Option<&T>
    where
        T: Borrow<Q>,
        Q: Hash + Eq + ?Sized,
    {
        self.index.get_key_value(element).map(|(stored, _)| stored)
    }

    /// Appends `element` to the end of the order. Returns `false` if it was
    /// already present.
    fn insert(&mut self, element: T) -> bool {
        if self.index.contains_key(&element) {
            return false;
        }
        self.index.insert(element.clone(), self.slots.len());
        self.slots.push(Some(element));
        true
    }

    /// Tombstones `element`, compacting once tombstones outnumber live
    /// elements. Returns `false` if it was absent.
    fn remove<Q>(&mut self, element: &Q) -> bool
    where
        T: Borrow<Q>,
        Q: Hash + Eq + ?Sized,
    {
        let Some(position) = self.index.remove(element) else {
            return false;
        };
        self.slots[position] = None;
        if self.slots.len() >= self.index.len() * 2 {
            self.compact();
        }
        true
    }

    /// Drops tombstones and reindexes the surviving elements.
    fn compact(&mut self) {
        self.slots.retain(Option::is_some);
        for (position, slot) in self.slots.iter().enumerate() {
            if let Some(element) = slot {
                if let Some(stored) = self.index.get_mut(element) {
                    *stored = position;
                }
            }
        }
        debug_assert_eq!(self.index.len(), self.slots.len());
    }

    /// Consumes the storage, yielding the live elements in insertion order.
    fn into_ordered(self) -> impl Iterator<Item = T> {
        self.slots.into_iter().flatten()
    }
}

// =============================================================================
// OrderedSet Definition
// =============================================================================

/// Internal representation of the collection state.
#[derive(Clone)]
enum OrderedSetInner<T: Clone + Eq + Hash> {
    Empty,
    Small(SmallVec<[T; SMALL_THRESHOLD]>),
    Large(SlotIndex<T>),
}

impl<T: Clone + Eq + Hash> OrderedSetInner<T> {
    /// Rebuilds a state from already-deduplicated elements in order.
    fn rebuild(elements: Vec<T>) -> Self {
        if elements.is_empty() {
            Self::Empty
        } else if elements.len() <= SMALL_THRESHOLD {
            Self::Small(SmallVec::from_vec(elements))
        } else {
            let mut storage = SlotIndex::with_capacity(elements.len());
            for element in elements {
                storage.insert(element);
            }
            Self::Large(storage)
        }
    }
}

/// A set of unique elements that iterates in insertion order.
///
/// This collection automatically transitions between three states based on
/// size:
/// - Empty: no elements
/// - Small: up to 8 elements stored inline in a `SmallVec`, linear scans
/// - Large: more than 8 elements, a hash index plus insertion-ordered slots
///
/// Element identity is the `Eq`/`Hash` contract of `T`: two elements are the
/// same member exactly when they compare equal (and therefore hash equal).
///
/// `insert` and `remove` mutate the set in place and return `&mut Self` for
/// fluent chaining; the combining operations ([`union`](Self::union),
/// [`intersection`](Self::intersection), [`difference`](Self::difference),
/// [`symmetric_difference`](Self::symmetric_difference)) are pure and return
/// new sets.
///
/// The set is not internally synchronized; sharing one across threads
/// requires external mutual exclusion.
///
/// # Type Parameters
///
/// * `T` - The element type. Must implement `Clone`, `Eq`, and `Hash`.
///
/// # Examples
///
/// ```rust
/// use ordset::OrderedSet;
///
/// let mut set = OrderedSet::new();
/// set.insert("b").insert("a").insert("b");
///
/// // First occurrence wins; order is insertion order, not sort order
/// assert_eq!(set.to_vec(), vec!["b", "a"]);
/// ```
#[derive(Clone)]
pub struct OrderedSet<T: Clone + Eq + Hash> {
    inner: OrderedSetInner<T>,
}

static_assertions::assert_impl_all!(OrderedSet<i32>: Send, Sync, Clone);

impl<T: Clone + Eq + Hash> OrderedSet<T> {
    /// Creates a new empty set.
    ///
    /// # Examples
    ///
    /// ```rust
    /// use ordset::OrderedSet;
    ///
    /// let set: OrderedSet<i32> = OrderedSet::new();
    /// assert!(set.is_empty());
    /// ```
    #[inline]
    #[must_use]
    pub const fn new() -> Self {
        Self {
            inner: OrderedSetInner::Empty,
        }
    }

    /// Returns the number of elements in the set.
    ///
    /// # Examples
    ///
    /// ```rust
    /// use ordset::OrderedSet;
    ///
    /// let mut set = OrderedSet::new();
    /// set.insert(1).insert(2).insert(1);
    /// assert_eq!(set.len(), 2);
    /// ```
    #[inline]
    #[must_use]
    pub fn len(&self) -> usize {
        match &self.inner {
            OrderedSetInner::Empty => 0,
            OrderedSetInner::Small(elements) => elements.len(),
            OrderedSetInner::Large(storage) => storage.len(),
        }
    }

    /// Returns `true` if the set contains no elements.
    #[inline]
    #[must_use]
    pub const fn is_empty(&self) -> bool {
        matches!(self.inner, OrderedSetInner::Empty)
    }

    /// Returns `true` if the set contains the specified element.
    ///
    /// This method supports borrowed forms of the element type through the
    /// `Borrow` trait. For example, with `OrderedSet<String>` you can probe
    /// with `&str` directly without allocating a new `String`.
    ///
    /// # Complexity
    ///
    /// O(n) for the Small state (linear scan), O(1) average for Large.
    ///
    /// # Examples
    ///
    /// ```rust
    /// use ordset::OrderedSet;
    ///
    /// let mut set = OrderedSet::new();
    /// set.insert("hello".to_string());
    /// assert!(set.contains("hello")); // No allocation needed
    /// assert!(!set.contains("world"));
    /// ```
    #[inline]
    #[must_use]
    pub fn contains<Q>(&self, element: &Q) -> bool
    where
        T: Borrow<Q>,
        Q: Hash + Eq + ?Sized,
    {
        match &self.inner {
            OrderedSetInner::Empty => false,
            OrderedSetInner::Small(elements) => {
                elements.iter().any(|item| item.borrow() == element)
            }
            OrderedSetInner::Large(storage) => storage.contains(element),
        }
    }

    /// Returns a reference to the stored element equal to the given one, or
    /// `None` if it is absent.
    ///
    /// # Examples
    ///
    /// ```rust
    /// use ordset::OrderedSet;
    ///
    /// let set: OrderedSet<i32> = [1, 2, 3].into_iter().collect();
    /// assert_eq!(set.get(&2), Some(&2));
    /// assert_eq!(set.get(&4), None);
    /// ```
    #[must_use]
    pub fn get<Q>(&self, element: &Q) -> Option<&T>
    where
        T: Borrow<Q>,
        Q: Hash + Eq + ?Sized,
    {
        match &self.inner {
            OrderedSetInner::Empty => None,
            OrderedSetInner::Small(elements) => {
                elements.iter().find(|item| T::borrow(item) == element)
            }
            OrderedSetInner::Large(storage) => storage.get(element),
        }
    }

    /// Inserts an element at the end of the iteration order.
    ///
    /// If the element is already present this is a no-op and its position is
    /// unchanged. Returns `&mut Self` so insertions can be chained. Idempotent.
    ///
    /// # State Transitions
    ///
    /// - `Empty` -> `Small` when inserting the first element
    /// - `Small` -> `Large` when inserting the 9th element
    ///
    /// # Examples
    ///
    /// ```rust
    /// use ordset::OrderedSet;
    ///
    /// let mut set = OrderedSet::new();
    /// set.insert(2).insert(1).insert(2);
    ///
    /// assert_eq!(set.len(), 2);
    /// assert_eq!(set.to_vec(), vec![2, 1]);
    /// ```
    pub fn insert(&mut self, element: T) -> &mut Self {
        let inner = mem::replace(&mut self.inner, OrderedSetInner::Empty);
        self.inner = match inner {
            OrderedSetInner::Empty => {
                let mut elements = SmallVec::new();
                elements.push(element);
                OrderedSetInner::Small(elements)
            }
            OrderedSetInner::Small(mut elements) => {
                if elements.iter().any(|item| item == &element) {
                    OrderedSetInner::Small(elements)
                } else if elements.len() >= SMALL_THRESHOLD {
                    // Transition to Large state: index the existing elements
                    let mut storage = SlotIndex::with_capacity(elements.len() + 1);
                    for item in elements {
                        storage.insert(item);
                    }
                    storage.insert(element);
                    OrderedSetInner::Large(storage)
                } else {
                    elements.push(element);
                    OrderedSetInner::Small(elements)
                }
            }
            OrderedSetInner::Large(mut storage) => {
                storage.insert(element);
                OrderedSetInner::Large(storage)
            }
        };
        self
    }

    /// Removes an element from the set.
    ///
    /// If the element is absent this is a no-op. Returns `&mut Self` so
    /// removals can be chained. Idempotent.
    ///
    /// This method supports borrowed forms of the element type through the
    /// `Borrow` trait.
    ///
    /// # State Transitions
    ///
    /// - `Small` -> `Empty` when removing the last element
    /// - `Large` -> `Small` when size drops to 8 or fewer elements
    ///
    /// # Examples
    ///
    /// ```rust
    /// use ordset::OrderedSet;
    ///
    /// let mut set: OrderedSet<i32> = [1, 2, 3].into_iter().collect();
    /// set.remove(&2).remove(&4);
    ///
    /// assert_eq!(set.to_vec(), vec![1, 3]);
    /// ```
    pub fn remove<Q>(&mut self, element: &Q) -> &mut Self
    where
        T: Borrow<Q>,
        Q: Hash + Eq + ?Sized,
    {
        let inner = mem::replace(&mut self.inner, OrderedSetInner::Empty);
        self.inner = match inner {
            OrderedSetInner::Empty => OrderedSetInner::Empty,
            OrderedSetInner::Small(mut elements) => {
                elements.retain(|item| T::borrow(item) != element);
                if elements.is_empty() {
                    OrderedSetInner::Empty
                } else {
                    OrderedSetInner::Small(elements)
                }
            }
            OrderedSetInner::Large(mut storage) => {
                if storage.remove(element) && storage.len() <= SMALL_THRESHOLD {
                    // Demote, keeping the surviving insertion order
                    let demoted: SmallVec<[T; SMALL_THRESHOLD]> =
                        storage.into_ordered().collect();
                    if demoted.is_empty() {
                        OrderedSetInner::Empty
                    } else {
                        OrderedSetInner::Small(demoted)
                    }
                } else {
                    OrderedSetInner::Large(storage)
                }
            }
        };
        self
    }

    /// Removes all elements from the set.
    ///
    /// # Examples
    ///
    /// ```rust
    /// use ordset::OrderedSet;
    ///
    /// let mut set: OrderedSet<i32> = [1, 2, 3].into_iter().collect();
    /// set.clear();
    /// assert!(set.is_empty());
    /// ```
    pub fn clear(&mut self) {
        self.inner = OrderedSetInner::Empty;
    }

    /// Retains only the elements for which the predicate returns `true`,
    /// preserving their relative order.
    ///
    /// # Examples
    ///
    /// ```rust
    /// use ordset::OrderedSet;
    ///
    /// let mut set: OrderedSet<i32> = (1..=6).collect();
    /// set.retain(|element| element % 2 == 0);
    /// assert_eq!(set.to_vec(), vec![2, 4, 6]);
    /// ```
    pub fn retain<F>(&mut self, mut keep: F)
    where
        F: FnMut(&T) -> bool,
    {
        let inner = mem::replace(&mut self.inner, OrderedSetInner::Empty);
        self.inner = match inner {
            OrderedSetInner::Empty => OrderedSetInner::Empty,
            OrderedSetInner::Small(mut elements) => {
                elements.retain(|item| keep(item));
                if elements.is_empty() {
                    OrderedSetInner::Empty
                } else {
                    OrderedSetInner::Small(elements)
                }
            }
            OrderedSetInner::Large(storage) => {
                let survivors: Vec<T> = storage.into_ordered().filter(|item| keep(item)).collect();
                OrderedSetInner::rebuild(survivors)
            }
        };
    }

    /// Returns a reference to the oldest surviving element, or `None` if the
    /// set is empty.
    #[must_use]
    pub fn first(&self) -> Option<&T> {
        match &self.inner {
            OrderedSetInner::Empty => None,
            OrderedSetInner::Small(elements) => elements.first(),
            OrderedSetInner::Large(storage) => storage.slots.iter().find_map(Option::as_ref),
        }
    }

    /// Returns a reference to the most recently inserted element, or `None`
    /// if the set is empty.
    #[must_use]
    pub fn last(&self) -> Option<&T> {
        match &self.inner {
            OrderedSetInner::Empty => None,
            OrderedSetInner::Small(elements) => elements.last(),
            OrderedSetInner::Large(storage) => storage.slots.iter().rev().find_map(Option::as_ref),
        }
    }

    /// Returns all elements, cloned, in insertion order.
    ///
    /// The returned `Vec` is a snapshot: it shares no storage with the set,
    /// so later `insert`/`remove` calls never change it.
    ///
    /// # Examples
    ///
    /// ```rust
    /// use ordset::OrderedSet;
    ///
    /// let mut set = OrderedSet::new();
    /// set.insert(3).insert(1).insert(2);
    ///
    /// let snapshot = set.to_vec();
    /// set.remove(&1);
    ///
    /// assert_eq!(snapshot, vec![3, 1, 2]);
    /// assert_eq!(set.to_vec(), vec![3, 2]);
    /// ```
    #[must_use]
    pub fn to_vec(&self) -> Vec<T> {
        self.iter().cloned().collect()
    }

    /// Returns an iterator over references to the elements in insertion
    /// order.
    ///
    /// The iterator reflects the elements present when `iter` was called;
    /// the borrow checker rejects mutation while it is alive.
    ///
    /// # Examples
    ///
    /// ```rust
    /// use ordset::OrderedSet;
    ///
    /// let set: OrderedSet<i32> = [3, 1, 2].into_iter().collect();
    /// let elements: Vec<&i32> = set.iter().collect();
    /// assert_eq!(elements, vec![&3, &1, &2]);
    /// ```
    #[inline]
    #[must_use]
    pub fn iter(&self) -> OrderedSetIterator<'_, T> {
        OrderedSetIterator {
            inner: match &self.inner {
                OrderedSetInner::Empty => IteratorInner::Empty,
                OrderedSetInner::Small(elements) => IteratorInner::Small(elements.iter()),
                OrderedSetInner::Large(storage) => IteratorInner::Large {
                    slots: storage.slots.iter(),
                    remaining: storage.len(),
                },
            },
        }
    }

    // =========================================================================
    // Set algebra
    // =========================================================================

    /// Returns a new set containing every element present in either operand.
    ///
    /// Elements of `self` keep their relative order first, followed by the
    /// elements unique to `other` in `other`'s order. Neither operand is
    /// mutated.
    ///
    /// # Examples
    ///
    /// ```rust
    /// use ordset::OrderedSet;
    ///
    /// let a: OrderedSet<i32> = [1, 4, 3].into_iter().collect();
    /// let b: OrderedSet<i32> = [2, 3, 6].into_iter().collect();
    /// assert_eq!(a.union(&b).to_vec(), vec![1, 4, 3, 2, 6]);
    /// ```
    #[must_use]
    pub fn union(&self, other: &Self) -> Self {
        self.iter().chain(other.iter()).cloned().collect()
    }

    /// Returns a new set containing the elements of `self` that are also in
    /// `other`, in `self`'s order. Neither operand is mutated.
    ///
    /// # Examples
    ///
    /// ```rust
    /// use ordset::OrderedSet;
    ///
    /// let a: OrderedSet<i32> = [1, 2, 4, 3].into_iter().collect();
    /// let b: OrderedSet<i32> = [2, 3, 6].into_iter().collect();
    /// assert_eq!(a.intersection(&b).to_vec(), vec![2, 3]);
    /// ```
    #[must_use]
    pub fn intersection(&self, other: &Self) -> Self {
        self.iter()
            .filter(|element| other.contains(*element))
            .cloned()
            .collect()
    }

    /// Returns a new set containing the elements of `self` that are **not**
    /// in `other`, in `self`'s order. Neither operand is mutated.
    ///
    /// This difference is asymmetric: `a.difference(&b)` and
    /// `b.difference(&a)` generally differ.
    ///
    /// # Examples
    ///
    /// ```rust
    /// use ordset::OrderedSet;
    ///
    /// let a: OrderedSet<i32> = [1, 2, 4, 3].into_iter().collect();
    /// let b: OrderedSet<i32> = [2, 3, 6].into_iter().collect();
    /// assert_eq!(a.difference(&b).to_vec(), vec![1, 4]);
    /// assert_eq!(b.difference(&a).to_vec(), vec![6]);
    /// ```
    #[must_use]
    pub fn difference(&self, other: &Self) -> Self {
        self.iter()
            .filter(|element| !other.contains(*element))
            .cloned()
            .collect()
    }

    /// Returns a new set containing the elements present in exactly one of
    /// the operands: `self`'s survivors first, then `other`'s. Neither
    /// operand is mutated.
    ///
    /// # Examples
    ///
    /// ```rust
    /// use ordset::OrderedSet;
    ///
    /// let a: OrderedSet<i32> = [1, 2, 3].into_iter().collect();
    /// let b: OrderedSet<i32> = [3, 4, 5].into_iter().collect();
    /// assert_eq!(a.symmetric_difference(&b).to_vec(), vec![1, 2, 4, 5]);
    /// ```
    #[must_use]
    pub fn symmetric_difference(&self, other: &Self) -> Self {
        self.iter()
            .filter(|element| !other.contains(*element))
            .chain(other.iter().filter(|element| !self.contains(*element)))
            .cloned()
            .collect()
    }

    /// Returns `true` if `self` has no elements in common with `other`.
    #[must_use]
    pub fn is_disjoint(&self, other: &Self) -> bool {
        self.iter().all(|element| !other.contains(element))
    }

    /// Returns `true` if every element of `self` is contained in `other`.
    #[must_use]
    pub fn is_subset(&self, other: &Self) -> bool {
        self.len() <= other.len() && self.iter().all(|element| other.contains(element))
    }

    /// Returns `true` if every element of `other` is contained in `self`.
    #[inline]
    #[must_use]
    pub fn is_superset(&self, other: &Self) -> bool {
        other.is_subset(self)
    }

    // =========================================================================
    // Test-only state probes
    // =========================================================================

    /// Returns `true` if the set is in the Empty state.
    #[cfg(test)]
    const fn is_empty_state(&self) -> bool {
        matches!(self.inner, OrderedSetInner::Empty)
    }

    /// Returns `true` if the set is in the Small state.
    #[cfg(test)]
    const fn is_small_state(&self) -> bool {
        matches!(self.inner, OrderedSetInner::Small(_))
    }

    /// Returns `true` if the set is in the Large state.
    #[cfg(test)]
    const fn is_large_state(&self) -> bool {
        matches!(self.inner, OrderedSetInner::Large(_))
    }

    /// Returns the slot count (live + tombstones) in the Large state.
    #[cfg(test)]
    fn large_slot_count(&self) -> Option<usize> {
        match &self.inner {
            OrderedSetInner::Large(storage) => Some(storage.slots.len()),
            _ => None,
        }
    }
}

impl<T: Clone + Eq + Hash> Default for OrderedSet<T> {
    #[inline]
    fn default() -> Self {
        Self::new()
    }
}

// =============================================================================
// Equality, Debug, Display
// =============================================================================

impl<T: Clone + Eq + Hash> PartialEq for OrderedSet<T> {
    /// Set equality: equal lengths and mutual containment, independent of
    /// insertion order. The length check short-circuits before any scan.
    fn eq(&self, other: &Self) -> bool {
        self.len() == other.len() && self.iter().all(|element| other.contains(element))
    }
}

impl<T: Clone + Eq + Hash> Eq for OrderedSet<T> {}

impl<T: Clone + Eq + Hash + fmt::Debug> fmt::Debug for OrderedSet<T> {
    fn fmt(&self, formatter: &mut fmt::Formatter<'_>) -> fmt::Result {
        formatter.debug_set().entries(self.iter()).finish()
    }
}

impl<T: Clone + Eq + Hash + fmt::Display> fmt::Display for OrderedSet<T> {
    /// Renders `OrderedSet { e1, e2, ..., en }` in iteration order.
    ///
    /// The empty set renders `OrderedSet {  }`: the double space a
    /// zero-element join produces is kept for compatibility with the
    /// historical rendering.
    ///
    /// # Examples
    ///
    /// ```rust
    /// use ordset::OrderedSet;
    ///
    /// let set: OrderedSet<i32> = [1, 2, 3].into_iter().collect();
    /// assert_eq!(set.to_string(), "OrderedSet { 1, 2, 3 }");
    ///
    /// let empty: OrderedSet<i32> = OrderedSet::new();
    /// assert_eq!(empty.to_string(), "OrderedSet {  }");
    /// ```
    fn fmt(&self, formatter: &mut fmt::Formatter<'_>) -> fmt::Result {
        formatter.write_str("OrderedSet { ")?;
        let mut elements = self.iter();
        if let Some(first) = elements.next() {
            write!(formatter, "{first}")?;
            for element in elements {
                write!(formatter, ", {element}")?;
            }
        }
        formatter.write_str(" }")
    }
}

// =============================================================================
// Construction and extension
// =============================================================================

impl<T: Clone + Eq + Hash> FromIterator<T> for OrderedSet<T> {
    /// Seeds a set from a sequence through the same path as `insert`:
    /// duplicates collapse, first occurrence wins.
    fn from_iter<I: IntoIterator<Item = T>>(iter: I) -> Self {
        let mut set = Self::new();
        set.extend(iter);
        set
    }
}

impl<T: Clone + Eq + Hash> Extend<T> for OrderedSet<T> {
    fn extend<I: IntoIterator<Item = T>>(&mut self, iter: I) {
        for element in iter {
            self.insert(element);
        }
    }
}

impl<T: Clone + Eq + Hash, const N: usize> From<[T; N]> for OrderedSet<T> {
    fn from(elements: [T; N]) -> Self {
        elements.into_iter().collect()
    }
}

// =============================================================================
// Operator sugar
// =============================================================================

impl<T: Clone + Eq + Hash> BitOr<&OrderedSet<T>> for &OrderedSet<T> {
    type Output = OrderedSet<T>;

    /// Shorthand for [`OrderedSet::union`]: `&a | &b`.
    fn bitor(self, rhs: &OrderedSet<T>) -> OrderedSet<T> {
        self.union(rhs)
    }
}

impl<T: Clone + Eq + Hash> BitAnd<&OrderedSet<T>> for &OrderedSet<T> {
    type Output = OrderedSet<T>;

    /// Shorthand for [`OrderedSet::intersection`]: `&a & &b`.
    fn bitand(self, rhs: &OrderedSet<T>) -> OrderedSet<T> {
        self.intersection(rhs)
    }
}

impl<T: Clone + Eq + Hash> Sub<&OrderedSet<T>> for &OrderedSet<T> {
    type Output = OrderedSet<T>;

    /// Shorthand for [`OrderedSet::difference`]: `&a - &b`.
    fn sub(self, rhs: &OrderedSet<T>) -> OrderedSet<T> {
        self.difference(rhs)
    }
}

impl<T: Clone + Eq + Hash> BitXor<&OrderedSet<T>> for &OrderedSet<T> {
    type Output = OrderedSet<T>;

    /// Shorthand for [`OrderedSet::symmetric_difference`]: `&a ^ &b`.
    fn bitxor(self, rhs: &OrderedSet<T>) -> OrderedSet<T> {
        self.symmetric_difference(rhs)
    }
}

// =============================================================================
// Iterators
// =============================================================================

/// Iterator over references to elements of an [`OrderedSet`], in insertion
/// order.
pub struct OrderedSetIterator<'a, T> {
    inner: IteratorInner<'a, T>,
}

enum IteratorInner<'a, T> {
    Empty,
    Small(std::slice::Iter<'a, T>),
    Large {
        slots: std::slice::Iter<'a, Option<T>>,
        remaining: usize,
    },
}

impl<'a, T> Iterator for OrderedSetIterator<'a, T> {
    type Item = &'a T;

    fn next(&mut self) -> Option<Self::Item> {
        match &mut self.inner {
            IteratorInner::Empty => None,
            IteratorInner::Small(iter) => iter.next(),
            IteratorInner::Large { slots, remaining } => {
                // Skip tombstones left by removals
                for slot in slots.by_ref() {
                    if let Some(element) = slot {
                        *remaining -= 1;
                        return Some(element);
                    }
                }
                None
            }
        }
    }

    #[inline]
    fn size_hint(&self) -> (usize, Option<usize>) {
        let remaining = match &self.inner {
            IteratorInner::Empty => 0,
            IteratorInner::Small(iter) => iter.len(),
            IteratorInner::Large { remaining, .. } => *remaining,
        };
        (remaining, Some(remaining))
    }
}

impl<T> ExactSizeIterator for OrderedSetIterator<'_, T> {}

impl<T> FusedIterator for OrderedSetIterator<'_, T> {}

/// Owning iterator over the elements of an [`OrderedSet`], in insertion
/// order.
pub struct OrderedSetIntoIterator<T> {
    inner: IntoIteratorInner<T>,
}

enum IntoIteratorInner<T> {
    Empty,
    Small(smallvec::IntoIter<[T; SMALL_THRESHOLD]>),
    Large {
        slots: std::vec::IntoIter<Option<T>>,
        remaining: usize,
    },
}

impl<T> Iterator for OrderedSetIntoIterator<T> {
    type Item = T;

    fn next(&mut self) -> Option<Self::Item> {
        match &mut self.inner {
            IntoIteratorInner::Empty => None,
            IntoIteratorInner::Small(iter) => iter.next(),
            IntoIteratorInner::Large { slots, remaining } => {
                for slot in slots.by_ref() {
                    if let Some(element) = slot {
                        *remaining -= 1;
                        return Some(element);
                    }
                }
                None
            }
        }
    }

    #[inline]
    fn size_hint(&self) -> (usize, Option<usize>) {
        let remaining = match &self.inner {
            IntoIteratorInner::Empty => 0,
            IntoIteratorInner::Small(iter) => iter.len(),
            IntoIteratorInner::Large { remaining, .. } => *remaining,
        };
        (remaining, Some(remaining))
    }
}

impl<T> ExactSizeIterator for OrderedSetIntoIterator<T> {}

impl<T> FusedIterator for OrderedSetIntoIterator<T> {}

impl<'a, T: Clone + Eq + Hash> IntoIterator for &'a OrderedSet<T> {
    type Item = &'a T;
    type IntoIter = OrderedSetIterator<'a, T>;

    #[inline]
    fn into_iter(self) -> Self::IntoIter {
        self.iter()
    }
}

impl<T: Clone + Eq + Hash> IntoIterator for OrderedSet<T> {
    type Item = T;
    type IntoIter = OrderedSetIntoIterator<T>;

    fn into_iter(self) -> Self::IntoIter {
        OrderedSetIntoIterator {
            inner: match self.inner {
                OrderedSetInner::Empty => IntoIteratorInner::Empty,
                OrderedSetInner::Small(elements) => {
                    IntoIteratorInner::Small(elements.into_iter())
                }
                OrderedSetInner::Large(storage) => IntoIteratorInner::Large {
                    remaining: storage.len(),
                    slots: storage.slots.into_iter(),
                },
            },
        }
    }
}

// =============================================================================
// Serde
// =============================================================================

#[cfg(feature = "serde")]
impl<T: serde::Serialize + Clone + Eq + Hash> serde::Serialize for OrderedSet<T> {
    /// Serializes as a sequence in insertion order.
    fn serialize<S>(&self, serializer: S) -> Result<S::Ok, S::Error>
    where
        S: serde::Serializer,
    {
        use serde::ser::SerializeSeq;
        let mut seq = serializer.serialize_seq(Some(self.len()))?;
        for element in self {
            seq.serialize_element(element)?;
        }
        seq.end()
    }
}

#[cfg(feature = "serde")]
struct OrderedSetVisitor<T> {
    marker: std::marker::PhantomData<T>,
}

#[cfg(feature = "serde")]
impl<T> OrderedSetVisitor<T> {
    const fn new() -> Self {
        Self {
            marker: std::marker::PhantomData,
        }
    }
}

#[cfg(feature = "serde")]
impl<'de, T> serde::de::Visitor<'de> for OrderedSetVisitor<T>
where
    T: serde::Deserialize<'de> + Clone + Eq + Hash,
{
    type Value = OrderedSet<T>;

    fn expecting(&self, formatter: &mut fmt::Formatter) -> fmt::Result {
        formatter.write_str("a sequence")
    }

    fn visit_seq<A>(self, mut seq: A) -> Result<Self::Value, A::Error>
    where
        A: serde::de::SeqAccess<'de>,
    {
        // Sequential insert collapses duplicate elements in the input
        let mut set = OrderedSet::new();
        while let Some(element) = seq.next_element()? {
            set.insert(element);
        }
        Ok(set)
    }
}

#[cfg(feature = "serde")]
impl<'de, T> serde::Deserialize<'de> for OrderedSet<T>
where
    T: serde::Deserialize<'de> + Clone + Eq + Hash,
{
    fn deserialize<D>(deserializer: D) -> Result<Self, D::Error>
    where
        D: serde::Deserializer<'de>,
    {
        deserializer.deserialize_seq(OrderedSetVisitor::new())
    }
}

// =============================================================================
// Tests
// =============================================================================

#[cfg(test)]
mod tests {
    use super::*;
    use rstest::rstest;

    #[rstest]
    fn test_new_creates_empty() {
        let set: OrderedSet<i32> = OrderedSet::new();
        assert!(set.is_empty_state());
    }

    #[rstest]
    fn test_small_threshold_constant() {
        assert_eq!(SMALL_THRESHOLD, 8);
    }

    #[rstest]
    fn test_insert_transitions_empty_to_small() {
        let mut set = OrderedSet::new();
        set.insert(1);
        assert!(set.is_small_state());
    }

    #[rstest]
    fn test_insert_transitions_small_to_large() {
        let mut set: OrderedSet<i32> = OrderedSet::new();
        for i in 1..=8 {
            set.insert(i);
        }
        assert!(set.is_small_state());

        set.insert(9);
        assert!(set.is_large_state());
    }

    #[rstest]
    fn test_remove_transitions_large_to_small() {
        let mut set: OrderedSet<i32> = (1..=9).collect();
        assert!(set.is_large_state());

        set.remove(&9);
        assert!(set.is_small_state());
        assert_eq!(set.to_vec(), (1..=8).collect::<Vec<_>>());
    }

    #[rstest]
    fn test_remove_transitions_small_to_empty() {
        let mut set = OrderedSet::new();
        set.insert(1).remove(&1);
        assert!(set.is_empty_state());
    }

    #[rstest]
    fn test_demotion_preserves_insertion_order() {
        // Insert out of sorted order so order preservation is observable
        let mut set: OrderedSet<i32> = [9, 3, 7, 1, 8, 2, 6, 4, 5].into_iter().collect();
        assert!(set.is_large_state());

        set.remove(&7);
        assert!(set.is_small_state());
        assert_eq!(set.to_vec(), vec![9, 3, 1, 8, 2, 6, 4, 5]);
    }

    #[rstest]
    fn test_tombstones_accumulate_then_compact() {
        let mut set: OrderedSet<i32> = (0..20).collect();
        assert_eq!(set.large_slot_count(), Some(20));

        // Nine removals leave tombstones in place
        for i in 0..9 {
            set.remove(&i);
        }
        assert_eq!(set.len(), 11);
        assert_eq!(set.large_slot_count(), Some(20));

        // The tenth removal tips tombstones to half and compacts
        set.remove(&9);
        assert_eq!(set.len(), 10);
        assert_eq!(set.large_slot_count(), Some(10));
        assert_eq!(set.to_vec(), (10..20).collect::<Vec<_>>());
    }

    #[rstest]
    fn test_iteration_skips_tombstones() {
        let mut set: OrderedSet<i32> = (0..12).collect();
        set.remove(&0).remove(&5).remove(&11);
        assert!(set.is_large_state());

        let elements: Vec<i32> = set.iter().copied().collect();
        assert_eq!(elements, vec![1, 2, 3, 4, 6, 7, 8, 9, 10]);
        assert_eq!(set.iter().len(), 9);
    }

    #[rstest]
    fn test_reinsert_after_remove_moves_to_end_small() {
        let mut set: OrderedSet<i32> = [1, 2, 3].into_iter().collect();
        set.remove(&1).insert(1);
        assert_eq!(set.to_vec(), vec![2, 3, 1]);
    }

    #[rstest]
    fn test_reinsert_after_remove_moves_to_end_large() {
        let mut set: OrderedSet<i32> = (0..12).collect();
        set.remove(&3).insert(3);

        let mut expected: Vec<i32> = (0..12).filter(|i| *i != 3).collect();
        expected.push(3);
        assert_eq!(set.to_vec(), expected);
    }

    #[rstest]
    fn test_insert_existing_keeps_position() {
        let mut set: OrderedSet<i32> = [4, 2, 7].into_iter().collect();
        set.insert(2);
        assert_eq!(set.to_vec(), vec![4, 2, 7]);
    }

    #[rstest]
    fn test_retain_rebuilds_states() {
        let mut set: OrderedSet<i32> = (0..20).collect();
        set.retain(|element| element % 2 == 0);
        assert!(set.is_large_state());
        assert_eq!(set.to_vec(), vec![0, 2, 4, 6, 8, 10, 12, 14, 16, 18]);

        set.retain(|element| *element < 10);
        assert!(set.is_small_state());
        assert_eq!(set.to_vec(), vec![0, 2, 4, 6, 8]);

        set.retain(|_| false);
        assert!(set.is_empty_state());
    }

    #[rstest]
    fn test_borrowed_lookup_with_str() {
        let mut set = OrderedSet::new();
        set.insert("apple".to_string()).insert("banana".to_string());

        assert!(set.contains("apple"));
        assert_eq!(set.get("banana"), Some(&"banana".to_string()));

        set.remove("apple");
        assert!(!set.contains("apple"));
    }

    #[rstest]
    fn test_equality_ignores_order() {
        let forwards: OrderedSet<i32> = (1..=12).collect();
        let backwards: OrderedSet<i32> = (1..=12).rev().collect();
        assert_eq!(forwards, backwards);
        assert_ne!(forwards.to_vec(), backwards.to_vec());
    }

    #[rstest]
    fn test_first_and_last_follow_order() {
        let mut set: OrderedSet<i32> = [5, 1, 9].into_iter().collect();
        assert_eq!(set.first(), Some(&5));
        assert_eq!(set.last(), Some(&9));

        set.remove(&5).remove(&9);
        assert_eq!(set.first(), Some(&1));
        assert_eq!(set.last(), Some(&1));
    }

    #[rstest]
    fn test_first_and_last_skip_tombstones_large() {
        let mut set: OrderedSet<i32> = (0..12).collect();
        set.remove(&0).remove(&11);
        assert!(set.is_large_state());
        assert_eq!(set.first(), Some(&1));
        assert_eq!(set.last(), Some(&10));
    }

    #[rstest]
    fn test_into_iterator_yields_insertion_order() {
        let set: OrderedSet<i32> = [3, 1, 2].into_iter().collect();
        let owned: Vec<i32> = set.into_iter().collect();
        assert_eq!(owned, vec![3, 1, 2]);

        let large: OrderedSet<i32> = (0..15).collect();
        let owned: Vec<i32> = large.into_iter().collect();
        assert_eq!(owned, (0..15).collect::<Vec<_>>());
    }
}
