use std::ops::Index;

/// Append cursor over a fixed capacity operand array.
///
/// Outside of a memory bracket every push fills the slot at `len` and advances. Between
/// [`Operands::begin_mem`] and [`Operands::end_mem`] the slot at `len` stays open, so a single
/// memory operand can be assembled from several sub-operands before it's counted.
#[derive(Debug, Clone)]
pub struct Operands<T, const N: usize> {
    slots: [T; N],
    len: usize,
    open: bool,
}

impl<T: Copy + Default, const N: usize> Operands<T, N> {
    pub fn new() -> Self {
        Self {
            slots: [T::default(); N],
            len: 0,
            open: false,
        }
    }

    pub const fn capacity(&self) -> usize {
        N
    }

    /// Number of completed operands.
    pub fn len(&self) -> usize {
        self.len
    }

    pub fn is_empty(&self) -> bool {
        self.len == 0
    }

    /// Whether a memory operand is currently being assembled.
    pub fn is_open(&self) -> bool {
        self.open
    }

    /// Write `op` at the cursor and advance.
    pub fn push(&mut self, op: T) -> usize {
        assert!(!self.open, "operand pushed while a memory operand is open");
        if self.len >= N {
            log::error!("[decoder::operands] operand array is full ({N} operands)");
        }

        let idx = self.len;
        self.slots[idx] = op;
        self.len += 1;
        idx
    }

    /// Open the slot at the cursor for incremental writes.
    pub fn begin_mem(&mut self, op: T) {
        assert!(!self.open, "memory operand opened twice");
        if self.len >= N {
            log::error!("[decoder::operands] operand array is full ({N} operands)");
        }

        self.slots[self.len] = op;
        self.open = true;
    }

    /// The open memory slot.
    pub fn current_mut(&mut self) -> &mut T {
        assert!(self.open, "no memory operand is open");
        &mut self.slots[self.len]
    }

    /// Count the open memory slot.
    pub fn end_mem(&mut self) {
        assert!(self.open, "no memory operand is open");

        self.open = false;
        self.len += 1;
    }

    fn resolve(&self, offset: isize) -> Option<usize> {
        let idx = self.len as isize + offset;
        let valid = if self.open { self.len + 1 } else { self.len };

        (idx >= 0 && (idx as usize) < valid).then_some(idx as usize)
    }

    /// Slot at `len + offset`, `-1` being the last completed operand.
    ///
    /// `0` refers to the open memory slot, if there is one.
    pub fn get(&self, offset: isize) -> Option<&T> {
        self.resolve(offset).map(|idx| &self.slots[idx])
    }

    /// Mutable slot at `len + offset`. Out of bounds offsets are an internal error.
    pub fn at_mut(&mut self, offset: isize) -> &mut T {
        match self.resolve(offset) {
            Some(idx) => &mut self.slots[idx],
            None => log::error!(
                "[decoder::operands] operand offset {offset} out of bounds (len {}, open {})",
                self.len, self.open
            ),
        }
    }

    /// Index of the most recently completed operand.
    pub fn last_index(&self) -> Option<usize> {
        self.len.checked_sub(1)
    }

    pub fn last_mut(&mut self) -> Option<&mut T> {
        let idx = self.last_index()?;
        Some(&mut self.slots[idx])
    }

    pub fn as_slice(&self) -> &[T] {
        &self.slots[..self.len]
    }

    pub fn iter(&self) -> std::slice::Iter<'_, T> {
        self.as_slice().iter()
    }
}

impl<T: Copy + Default, const N: usize> Default for Operands<T, N> {
    fn default() -> Self {
        Self::new()
    }
}

impl<T: Copy + Default, const N: usize> Index<usize> for Operands<T, N> {
    type Output = T;

    fn index(&self, idx: usize) -> &T {
        &self.as_slice()[idx]
    }
}

impl<'a, T: Copy + Default, const N: usize> IntoIterator for &'a Operands<T, N> {
    type Item = &'a T;
    type IntoIter = std::slice::Iter<'a, T>;

    fn into_iter(self) -> Self::IntoIter {
        self.iter()
    }
}
