#[cfg(test)]
type RawHandle = u16;
#[cfg(not(test))]
type RawHandle = u32;

/// An index into the node arena.
///
/// Index zero is reserved for the sentinel: the shared, always-black terminator
/// standing in for every absent child. Real nodes are numbered from one.
#[derive(Clone, Copy, Debug, Eq, PartialEq)]
#[repr(transparent)]
pub(crate) struct Handle(RawHandle);

impl Handle {
    pub(crate) const MAX: usize = (RawHandle::MAX - 1) as usize;
    pub(crate) const SENTINEL: Self = Self(0);

    #[inline]
    pub(crate) const fn from_index(index: usize) -> Self {
        assert!(index <= Self::MAX, "`Handle::from_index()` - `index` > `Handle::MAX`!");
        #[allow(clippy::cast_possible_truncation)]
        Self((index + 1) as RawHandle)
    }

    #[inline]
    pub(crate) const fn to_index(self) -> usize {
        assert!(!self.is_sentinel(), "`Handle::to_index()` - the sentinel has no slot!");
        (self.0 - 1) as usize
    }

    #[inline]
    pub(crate) const fn is_sentinel(self) -> bool {
        self.0 == 0
    }
}
