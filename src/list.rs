use alloc::boxed::Box;
use alloc::fmt;
use core::mem;
use core::ptr;

extern crate alloc;

/// A node in the doubly linked bucket chain.
///
/// Contains a value and pointers to the previous and next entries. Sentinel
/// (sigil) nodes carry no value, which is why `val` is `MaybeUninit`.
pub struct Entry<T> {
    /// The value stored in this entry. Uninitialized for sigil nodes.
    val: mem::MaybeUninit<T>,
    /// Pointer to the previous entry in the chain.
    prev: *mut Entry<T>,
    /// Pointer to the next entry in the chain.
    next: *mut Entry<T>,
}

impl<T> Entry<T> {
    /// Creates a new entry with the given value.
    fn new(val: T) -> Self {
        Entry {
            val: mem::MaybeUninit::new(val),
            prev: ptr::null_mut(),
            next: ptr::null_mut(),
        }
    }

    /// Creates a new sigil (sentinel) entry without initializing the value.
    ///
    /// Sigil entries are used as head and tail markers of the chain.
    fn new_sigil() -> Self {
        Entry {
            val: mem::MaybeUninit::uninit(),
            prev: ptr::null_mut(),
            next: ptr::null_mut(),
        }
    }

    /// Returns a reference to the value of this entry.
    ///
    /// # Safety
    ///
    /// Must only be called on non-sigil nodes, whose value is initialized.
    pub unsafe fn value(&self) -> &T {
        self.val.assume_init_ref()
    }

    /// Returns a mutable reference to the value of this entry.
    ///
    /// # Safety
    ///
    /// Must only be called on non-sigil nodes, whose value is initialized.
    pub unsafe fn value_mut(&mut self) -> &mut T {
        self.val.assume_init_mut()
    }

    /// Consumes the entry and returns the stored value.
    ///
    /// # Safety
    ///
    /// Must only be called on non-sigil nodes, whose value is initialized.
    unsafe fn into_value(self) -> T {
        self.val.assume_init()
    }
}

/// An ordered doubly linked chain with O(1) structural edits at any node.
///
/// This is the backbone of the priority-bucket index: each node holds one
/// bucket and the chain is kept sorted ascending by the caller. The list
/// itself is ordering-agnostic; it only provides the primitives the
/// placement scan needs:
///
/// - `front()` / `back()` for the extremes,
/// - `next()` / `prev()` for cursor walks in both directions,
/// - `push_front()` / `insert_after()` for O(1) insertion at a cursor,
/// - `remove()` for O(1) deletion given a node handle.
///
/// Sentinel nodes at both ends mean no edit ever has to special-case an
/// empty neighbor. Node handles (`*mut Entry<T>`) stay valid until the node
/// is removed; callers are responsible for not using them past that point.
pub struct List<T> {
    /// Current number of (non-sigil) entries in the chain.
    len: usize,
    /// Pointer to the head sentinel node.
    head: *mut Entry<T>,
    /// Pointer to the tail sentinel node.
    tail: *mut Entry<T>,
}

impl<T> List<T> {
    /// Creates an empty chain consisting only of the two sentinels.
    pub fn new() -> List<T> {
        let head = Box::into_raw(Box::new(Entry::new_sigil()));
        let tail = Box::into_raw(Box::new(Entry::new_sigil()));

        let list = List { len: 0, head, tail };

        unsafe {
            // SAFETY: head and tail are newly allocated and valid pointers
            (*list.head).next = list.tail;
            (*list.tail).prev = list.head;
        }

        list
    }

    /// Returns the current number of entries in the chain.
    #[allow(dead_code)]
    pub fn len(&self) -> usize {
        self.len
    }

    /// Returns true if the chain contains no entries.
    #[allow(dead_code)]
    pub fn is_empty(&self) -> bool {
        self.len == 0
    }

    /// Returns the first entry of the chain, or `None` if it is empty.
    pub fn front(&self) -> Option<*mut Entry<T>> {
        // SAFETY: head is a valid sentinel initialized in `new`
        let next = unsafe { (*self.head).next };
        if next == self.tail {
            None
        } else {
            Some(next)
        }
    }

    /// Returns the last entry of the chain, or `None` if it is empty.
    pub fn back(&self) -> Option<*mut Entry<T>> {
        // SAFETY: tail is a valid sentinel initialized in `new`
        let prev = unsafe { (*self.tail).prev };
        if prev == self.head {
            None
        } else {
            Some(prev)
        }
    }

    /// Returns the successor of `node`, or `None` if `node` is the last entry.
    ///
    /// # Safety
    ///
    /// `node` must be a valid non-sigil entry of this chain.
    pub unsafe fn next(&self, node: *mut Entry<T>) -> Option<*mut Entry<T>> {
        let next = (*node).next;
        if next == self.tail {
            None
        } else {
            Some(next)
        }
    }

    /// Returns the predecessor of `node`, or `None` if `node` is the first entry.
    ///
    /// # Safety
    ///
    /// `node` must be a valid non-sigil entry of this chain.
    pub unsafe fn prev(&self, node: *mut Entry<T>) -> Option<*mut Entry<T>> {
        let prev = (*node).prev;
        if prev == self.head {
            None
        } else {
            Some(prev)
        }
    }

    /// Inserts a value at the front of the chain and returns its node handle.
    pub fn push_front(&mut self, v: T) -> *mut Entry<T> {
        let node = Box::into_raw(Box::new(Entry::new(v)));
        unsafe {
            // SAFETY: node is freshly allocated; head is a valid sentinel
            self.link_after(self.head, node);
        }
        self.len += 1;
        node
    }

    /// Inserts a value immediately after `cursor` and returns its node handle.
    ///
    /// # Safety
    ///
    /// `cursor` must be a valid non-sigil entry of this chain.
    pub unsafe fn insert_after(&mut self, cursor: *mut Entry<T>, v: T) -> *mut Entry<T> {
        let node = Box::into_raw(Box::new(Entry::new(v)));
        self.link_after(cursor, node);
        self.len += 1;
        node
    }

    /// Links a detached node between `after` and its current successor.
    ///
    /// # Safety
    ///
    /// `after` must be a valid entry (sigil or not) of this chain and `node`
    /// must not currently be linked into any chain.
    unsafe fn link_after(&mut self, after: *mut Entry<T>, node: *mut Entry<T>) {
        (*node).prev = after;
        (*node).next = (*after).next;
        (*(*node).next).prev = node;
        (*after).next = node;
    }

    /// Unlinks `node` from the chain and returns its value.
    ///
    /// The handle is invalid after this call.
    ///
    /// # Safety
    ///
    /// `node` must be a valid non-sigil entry of this chain that has not been
    /// removed before.
    pub unsafe fn remove(&mut self, node: *mut Entry<T>) -> T {
        debug_assert!(!node.is_null() && node != self.head && node != self.tail);

        (*(*node).prev).next = (*node).next;
        (*(*node).next).prev = (*node).prev;
        self.len -= 1;

        // SAFETY: node was allocated by push_front/insert_after via Box
        let entry = *Box::from_raw(node);
        entry.into_value()
    }

    /// Removes every entry from the chain, dropping the stored values.
    pub fn clear(&mut self) {
        while let Some(front) = self.front() {
            // SAFETY: front is a live node of this chain
            unsafe {
                drop(self.remove(front));
            }
        }
    }
}

impl<T> Default for List<T> {
    fn default() -> Self {
        List::new()
    }
}

impl<T> Drop for List<T> {
    fn drop(&mut self) {
        self.clear();

        // Free the sentinel nodes. Their values are uninitialized, so only
        // the allocations are reclaimed.
        // SAFETY: head and tail were allocated in `new` and never freed
        unsafe {
            let _ = Box::from_raw(self.head);
            let _ = Box::from_raw(self.tail);
            self.head = ptr::null_mut();
            self.tail = ptr::null_mut();
        }
    }
}

impl<T: fmt::Debug> fmt::Debug for List<T> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("List").field("length", &self.len).finish()
    }
}
