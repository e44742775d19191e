//! Bit field extraction used when decoding opcodes and packed colors.

pub trait Bit: Sized {
    /// Test a single bit.
    #[must_use]
    fn bit(self, n: usize) -> bool;

    /// Extract the bits from 'ls' to 'ms', both inclusive, shifted down to bit 0.
    #[must_use]
    fn bit_range(self, ls: usize, ms: usize) -> Self;
}

macro_rules! impl_bit {
    ($($t:ty),*) => {
        $(
            impl Bit for $t {
                #[inline]
                fn bit(self, n: usize) -> bool {
                    (self >> n) & 1 == 1
                }

                #[inline]
                fn bit_range(self, ls: usize, ms: usize) -> Self {
                    let width = ms - ls + 1;
                    if width >= <$t>::BITS as usize {
                        return self >> ls;
                    }
                    (self >> ls) & ((1 << width) - 1)
                }
            }
        )*
    }
}

impl_bit!(u8, u16, u32, u64);

#[test]
fn single_bit() {
    assert!(0b100_u32.bit(2));
    assert!(!0b100_u32.bit(1));
    assert!(0x8000_u16.bit(15));
}

#[test]
fn bit_ranges() {
    assert_eq!(0xabcd_1234_u32.bit_range(26, 31), 0xabcd_1234 >> 26);
    assert_eq!(0b1101_1000_u8.bit_range(3, 4), 0b11);
    assert_eq!(0x7c00_u16.bit_range(10, 14), 0x1f);
    assert_eq!(u32::MAX.bit_range(0, 31), u32::MAX);
    assert_eq!(0xffff_0000_u32.bit_range(16, 31), 0xffff);
}
