use std::fmt::Debug;
use std::ops::{BitAnd, BitOr};

/// De Bruijn bit-position lookups.
pub mod debruijn {
    const MULTIPLIER_32: u32 = 0x077C_B531;
    const MULTIPLIER_64: u64 = 0x07ED_D5E5_9A4E_28C2;

    const POSITIONS_32: [u8; 32] = [
        0, 1, 28, 2, 29, 14, 24, 3, 30, 22, 20, 15, 25, 17, 4, 8, //
        31, 27, 13, 23, 21, 19, 16, 7, 26, 12, 18, 6, 11, 5, 10, 9,
    ];

    const POSITIONS_64: [u8; 64] = [
        63, 0, 58, 1, 59, 47, 53, 2, 60, 39, 48, 27, 54, 33, 42, 3, //
        61, 51, 37, 40, 49, 18, 28, 20, 55, 30, 34, 11, 43, 14, 22, 4, //
        62, 57, 46, 52, 38, 26, 32, 41, 50, 36, 17, 19, 29, 10, 13, 21, //
        56, 45, 25, 31, 35, 16, 9, 12, 44, 24, 15, 8, 23, 7, 6, 5,
    ];

    /// Index of the lowest set bit. `value` must be non-zero.
    #[inline]
    pub fn first_set_bit_32(value: u32) -> usize {
        debug_assert!(value != 0);
        let isolated = value & value.wrapping_neg();
        POSITIONS_32[(isolated.wrapping_mul(MULTIPLIER_32) >> 27) as usize] as usize
    }

    /// Index of the highest set bit, 0 for zero.
    #[inline]
    pub fn last_set_bit_32(value: u32) -> usize {
        if value == 0 {
            return 0;
        }
        let mut smeared = value;
        smeared |= smeared >> 1;
        smeared |= smeared >> 2;
        smeared |= smeared >> 4;
        smeared |= smeared >> 8;
        smeared |= smeared >> 16;
        first_set_bit_32(smeared ^ (smeared >> 1))
    }

    /// Index of the lowest set bit. `value` must be non-zero.
    #[inline]
    pub fn first_set_bit_64(value: u64) -> usize {
        debug_assert!(value != 0);
        let isolated = value & value.wrapping_neg();
        POSITIONS_64[(isolated.wrapping_mul(MULTIPLIER_64) >> 58) as usize] as usize
    }

    /// Index of the highest set bit, 0 for zero.
    #[inline]
    pub fn last_set_bit_64(value: u64) -> usize {
        if value == 0 {
            return 0;
        }
        let mut smeared = value;
        smeared |= smeared >> 1;
        smeared |= smeared >> 2;
        smeared |= smeared >> 4;
        smeared |= smeared >> 8;
        smeared |= smeared >> 16;
        smeared |= smeared >> 32;
        first_set_bit_64(smeared ^ (smeared >> 1))
    }
}

/// A row of a bitmap tier: one bit per itemset position, bit 0 first.
pub trait BitWord:
    Copy + Default + Eq + Debug + Send + Sync + BitAnd<Output = Self> + BitOr<Output = Self> + 'static
{
    /// Positions a row can hold.
    const BITS: usize;
    const ZERO: Self;

    fn bit(position: usize) -> Self;

    /// Every position strictly after `position`.
    fn after(position: usize) -> Self;

    /// Lowest set position. The word must be non-zero.
    fn first_set_bit(self) -> usize;

    /// Highest set position, 0 for a zero word.
    fn last_set_bit(self) -> usize;

    #[inline]
    fn is_zero(self) -> bool {
        self == Self::ZERO
    }
}

// after(p) for every p, built at compile time
macro_rules! successor_masks {
    ($word:ty, $bits:expr) => {{
        let mut masks = [0 as $word; $bits];
        let mut position = 0;
        while position + 1 < $bits {
            masks[position] = <$word>::MAX << (position + 1);
            position += 1;
        }
        masks
    }};
}

macro_rules! narrow_word {
    ($word:ty, $bits:expr, $masks:ident) => {
        const $masks: [$word; $bits] = successor_masks!($word, $bits);

        impl BitWord for $word {
            const BITS: usize = $bits;
            const ZERO: Self = 0;

            #[inline]
            fn bit(position: usize) -> Self {
                1 << position
            }

            #[inline]
            fn after(position: usize) -> Self {
                $masks[position]
            }

            #[inline]
            fn first_set_bit(self) -> usize {
                debruijn::first_set_bit_32(self as u32)
            }

            #[inline]
            fn last_set_bit(self) -> usize {
                debruijn::last_set_bit_32(self as u32)
            }
        }
    };
}

narrow_word!(u8, 8, AFTER_8);
narrow_word!(u16, 16, AFTER_16);
narrow_word!(u32, 32, AFTER_32);

const AFTER_64: [u64; 64] = successor_masks!(u64, 64);
const AFTER_128: [u128; 128] = successor_masks!(u128, 128);

impl BitWord for u64 {
    const BITS: usize = 64;
    const ZERO: Self = 0;

    #[inline]
    fn bit(position: usize) -> Self {
        1 << position
    }

    #[inline]
    fn after(position: usize) -> Self {
        AFTER_64[position]
    }

    #[inline]
    fn first_set_bit(self) -> usize {
        debruijn::first_set_bit_64(self)
    }

    #[inline]
    fn last_set_bit(self) -> usize {
        debruijn::last_set_bit_64(self)
    }
}

// 128-bit rows scan their two 64-bit halves
impl BitWord for u128 {
    const BITS: usize = 128;
    const ZERO: Self = 0;

    #[inline]
    fn bit(position: usize) -> Self {
        1 << position
    }

    #[inline]
    fn after(position: usize) -> Self {
        AFTER_128[position]
    }

    #[inline]
    fn first_set_bit(self) -> usize {
        let low = self as u64;
        if low != 0 {
            debruijn::first_set_bit_64(low)
        } else {
            64 + debruijn::first_set_bit_64((self >> 64) as u64)
        }
    }

    #[inline]
    fn last_set_bit(self) -> usize {
        let high = (self >> 64) as u64;
        if high != 0 {
            64 + debruijn::last_set_bit_64(high)
        } else {
            debruijn::last_set_bit_64(self as u64)
        }
    }
}
