use crate::table::Access;

/// Small insertion ordered set with a fixed capacity, used for implicit register lists and
/// instruction groups.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct IdList<T, const N: usize> {
    items: [T; N],
    len: usize,
}

impl<T: Copy + Default + PartialEq, const N: usize> IdList<T, N> {
    pub fn new() -> Self {
        Self {
            items: [T::default(); N],
            len: 0,
        }
    }

    /// Copies `items` up to the first terminator (`T::default()`).
    pub fn from_slice(items: &[T]) -> Self {
        let mut list = Self::new();
        for &item in items.iter().take_while(|item| **item != T::default()) {
            list.add(item);
        }
        list
    }

    /// Append `item` unless it's already present. Returns whether it was added.
    pub fn add(&mut self, item: T) -> bool {
        if self.contains(item) {
            return false;
        }

        if self.len >= N {
            log::error!("[decoder::lists] id list is full ({N} entries)");
        }
        self.items[self.len] = item;
        self.len += 1;
        true
    }

    /// Remove `item`, keeping the order of everything else. Returns whether it was present.
    pub fn remove(&mut self, item: T) -> bool {
        let Some(idx) = self.as_slice().iter().position(|x| *x == item) else {
            return false;
        };

        self.items.copy_within(idx + 1..self.len, idx);
        self.len -= 1;
        self.items[self.len] = T::default();
        true
    }

    pub fn contains(&self, item: T) -> bool {
        self.as_slice().contains(&item)
    }

    pub fn len(&self) -> usize {
        self.len
    }

    pub fn is_empty(&self) -> bool {
        self.len == 0
    }

    pub fn as_slice(&self) -> &[T] {
        &self.items[..self.len]
    }

    pub fn iter(&self) -> std::slice::Iter<'_, T> {
        self.as_slice().iter()
    }
}

impl<T: Copy + Default + PartialEq, const N: usize> Default for IdList<T, N> {
    fn default() -> Self {
        Self::new()
    }
}

/// Does the write list contain any of the flag register `aliases`.
///
/// The scan stops at the first terminator entry (`T::default()`).
pub fn writes_any<T: Copy + Default + PartialEq>(writes: &[T], aliases: &[T]) -> bool {
    for reg in writes {
        if *reg == T::default() {
            break;
        }

        if aliases.contains(reg) {
            return true;
        }
    }

    false
}

/// Registers read and written by an instruction, implicit ones first and without duplicates.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Registers<R> {
    pub read: Vec<R>,
    pub write: Vec<R>,
}

impl<R: Copy + PartialEq> Registers<R> {
    pub fn from_implicit(read: &[R], write: &[R]) -> Self {
        let mut regs = Self {
            read: Vec::with_capacity(read.len() + 4),
            write: Vec::with_capacity(write.len() + 4),
        };

        read.iter().for_each(|reg| regs.read(*reg));
        write.iter().for_each(|reg| regs.write(*reg));
        regs
    }

    pub fn read(&mut self, reg: R) {
        if !self.read.contains(&reg) {
            self.read.push(reg);
        }
    }

    pub fn write(&mut self, reg: R) {
        if !self.write.contains(&reg) {
            self.write.push(reg);
        }
    }

    /// Record `reg` on the side(s) `access` names.
    pub fn access(&mut self, reg: R, access: Access) {
        if access.contains(Access::READ) {
            self.read(reg);
        }
        if access.contains(Access::WRITE) {
            self.write(reg);
        }
    }
}
