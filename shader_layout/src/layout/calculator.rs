use crate::common::integer::{parse_attribute_int, IntegerExt};

use super::InvalidOffsetReason;

/// why [`LayoutCalculator`] could not place a member
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PlacementError {
    /// the `offset=` value was rejected, nothing was placed
    InvalidOffset(InvalidOffsetReason),
    /// the member would end past `u64::MAX`
    Overflow,
}

impl From<InvalidOffsetReason> for PlacementError {
    fn from(reason: InvalidOffsetReason) -> Self { PlacementError::InvalidOffset(reason) }
}

/// `LayoutCalculator` helps calculate the member offsets, the end and the
/// maximum member alignment of a composite.
///
/// members are placed in declaration order, either at the next offset that
/// satisfies their alignment or at an explicit `offset=` value.
#[derive(Debug, Clone)]
pub struct LayoutCalculator {
    cursor: u64,
    max_align: u64,
    max_custom_offset: u64,
}

impl LayoutCalculator {
    pub const fn new(max_custom_offset: u32) -> Self {
        Self {
            cursor: 0,
            max_align: 1,
            max_custom_offset: max_custom_offset as u64,
        }
    }

    /// Extends the layout by a member placed at the next `align`ed offset.
    ///
    /// Returns the member's offset.
    pub fn extend(&mut self, size: u64, align: u64) -> Result<u64, PlacementError> {
        let offset = super::round_up(align, self.cursor).ok_or(PlacementError::Overflow)?;
        self.place(offset, size, align)
    }

    /// Extends the layout by a member at the offset written in `custom_offset`.
    ///
    /// the offset must be a number in `0..max_custom_offset` that is a multiple
    /// of `align` and does not reach back into the previous member. On failure
    /// nothing is placed.
    pub fn extend_at(&mut self, size: u64, align: u64, custom_offset: &str) -> Result<u64, PlacementError> {
        let offset = parse_attribute_int(custom_offset).ok_or(InvalidOffsetReason::NotANumber)?;
        let offset = u64::try_from(offset).map_err(|_| InvalidOffsetReason::Negative)?;
        if offset >= self.max_custom_offset {
            return Err(InvalidOffsetReason::TooLarge {
                max: self.max_custom_offset,
            }
            .into());
        }
        if !align.divides(offset) {
            return Err(InvalidOffsetReason::Misaligned { offset, align }.into());
        }
        if offset < self.cursor {
            return Err(InvalidOffsetReason::OverlapsPreviousMember {
                offset,
                cursor: self.cursor,
            }
            .into());
        }
        self.place(offset, size, align)
    }

    fn place(&mut self, offset: u64, size: u64, align: u64) -> Result<u64, PlacementError> {
        self.cursor = offset.checked_add(size).ok_or(PlacementError::Overflow)?;
        self.max_align = self.max_align.max(align);
        Ok(offset)
    }

    /// the end of the last member
    pub const fn end(&self) -> u64 { self.cursor }

    /// the largest member alignment so far, `1` if there are no members
    pub const fn max_align(&self) -> u64 { self.max_align }
}

#[cfg(test)]
mod test {
    use super::*;

    fn invalid(reason: InvalidOffsetReason) -> Result<u64, PlacementError> { Err(PlacementError::InvalidOffset(reason)) }

    #[test]
    fn explicit_offsets_are_validated() {
        let mut calc = LayoutCalculator::new(65536);
        // a: float, b: float2 with offset=16
        assert_eq!(calc.extend(4, 4), Ok(0));
        assert_eq!(calc.extend_at(8, 4, "16"), Ok(16));
        assert_eq!(calc.end(), 24);
        assert_eq!(
            calc.extend_at(4, 4, "8"),
            invalid(InvalidOffsetReason::OverlapsPreviousMember { offset: 8, cursor: 24 })
        );
        assert_eq!(
            calc.extend_at(4, 4, "26"),
            invalid(InvalidOffsetReason::Misaligned { offset: 26, align: 4 })
        );
        assert_eq!(calc.extend_at(4, 4, "-4"), invalid(InvalidOffsetReason::Negative));
        assert_eq!(calc.extend_at(4, 4, "sixteen"), invalid(InvalidOffsetReason::NotANumber));
        assert_eq!(
            calc.extend_at(4, 4, "65536"),
            invalid(InvalidOffsetReason::TooLarge { max: 65536 })
        );
        // failed placements leave the cursor alone
        assert_eq!(calc.end(), 24);
        assert_eq!(calc.extend_at(4, 4, "0x20"), Ok(32));
    }

    #[test]
    fn implicit_offsets_are_aligned() {
        let mut calc = LayoutCalculator::new(65536);
        assert_eq!(calc.extend(12, 16), Ok(0));
        assert_eq!(calc.extend(4, 4), Ok(12));
        assert_eq!(calc.extend(8, 8), Ok(16));
        assert_eq!(calc.extend(16, 16), Ok(32));
        assert_eq!(calc.max_align(), 16);
        assert_eq!(calc.end(), 48);
    }

    #[test]
    fn overflowing_members_are_not_placed() {
        let mut calc = LayoutCalculator::new(65536);
        assert_eq!(calc.extend(u64::MAX - 8, 4), Ok(0));
        assert_eq!(calc.extend(16, 4), Err(PlacementError::Overflow));
        // aligning the cursor overflows as well
        assert_eq!(calc.extend(1, 16), Err(PlacementError::Overflow));
        assert_eq!(calc.end(), u64::MAX - 8);
    }
}
