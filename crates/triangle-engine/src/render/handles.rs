//! Backend object handles.
//!
//! Plain `u32` names; `0` never names a live object, so a zero handle is the
//! "invalid" value a failed step leaves behind.

macro_rules! handle {
    ($(#[$meta:meta])* $name:ident) => {
        $(#[$meta])*
        #[derive(Debug, Copy, Clone, Default, Eq, PartialEq, Hash, PartialOrd, Ord)]
        pub struct $name(pub u32);

        impl $name {
            pub const INVALID: Self = Self(0);

            #[inline]
            pub fn is_valid(self) -> bool {
                self.0 != 0
            }
        }
    };
}

handle!(
    /// GPU memory holding vertex data.
    BufferHandle
);
handle!(
    /// A buffer paired with the layout describing its bytes.
    VertexArrayHandle
);
handle!(
    /// One compiled shader stage.
    ShaderHandle
);
handle!(
    /// Linked shader stages, ready to draw with.
    ProgramHandle
);

/// Monotonic handle allocator starting at 1.
#[derive(Debug, Default)]
pub(crate) struct HandleAllocator {
    last: u32,
}

impl HandleAllocator {
    pub(crate) fn next(&mut self) -> u32 {
        self.last = self.last.wrapping_add(1).max(1);
        self.last
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn zero_is_invalid() {
        assert!(!ProgramHandle::INVALID.is_valid());
        assert!(!ProgramHandle::default().is_valid());
        assert!(ProgramHandle(1).is_valid());
    }

    #[test]
    fn allocator_never_yields_zero() {
        let mut ids = HandleAllocator::default();
        assert_eq!(ids.next(), 1);
        assert_eq!(ids.next(), 2);

        let mut wrapped = HandleAllocator { last: u32::MAX };
        assert_eq!(wrapped.next(), 1);
    }
}
