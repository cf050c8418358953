//! Fixed-width bit-field helpers shared by the packed codecs.
//!
//! `bits32` and `bits64` expose the same three operations over `u32` and `u64`.
//! Ranges passed to [`bits32::mask`] / [`bits32::extract`] are layout constants, so a bad
//! range is a programming error and panics. [`bits32::pack`] validates runtime values and
//! reports failures as [`BitsError`].

use thiserror::Error;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Error)]
pub enum BitsError {
    #[error("value {value:#x} does not fit in {size} bits")]
    ValueTooWide { value: u64, size: u32 },
    #[error("field size {size} must be smaller than the {width}-bit word")]
    FieldTooLarge { size: u32, width: u32 },
    #[error("fields need {total} bits but the word only has {width}")]
    WordOverflow { total: u32, width: u32 },
}

macro_rules! bit_fields {
    ($module:ident, $word:ty) => {
        pub mod $module {
            use super::BitsError;

            pub const WIDTH: u32 = <$word>::BITS;

            /// Word with the `size` bits starting at `start` set.
            ///
            /// # Panics
            /// Panics if `start + size` exceeds the word width.
            pub const fn mask(start: u32, size: u32) -> $word {
                assert!(
                    start <= WIDTH && size <= WIDTH && start + size <= WIDTH,
                    "bit range exceeds word width"
                );
                if size == 0 {
                    0
                } else if size == WIDTH {
                    <$word>::MAX
                } else {
                    (((1 as $word) << size) - 1) << start
                }
            }

            /// The `size` bits of `bits` starting at `start`, shifted down to bit 0.
            ///
            /// # Panics
            /// Panics if `start + size` exceeds the word width.
            pub const fn extract(bits: $word, start: u32, size: u32) -> $word {
                let field = mask(start, size);
                if size == 0 { 0 } else { (bits & field) >> start }
            }

            /// Packs `(value, size)` fields low to high, in argument order.
            pub fn pack(fields: &[($word, u32)]) -> Result<$word, BitsError> {
                let total: u32 = fields.iter().map(|&(_, size)| size).sum();
                if total > WIDTH {
                    return Err(BitsError::WordOverflow {
                        total,
                        width: WIDTH,
                    });
                }

                let mut packed: $word = 0;
                let mut offset = 0u32;
                for &(value, size) in fields {
                    if size >= WIDTH {
                        return Err(BitsError::FieldTooLarge { size, width: WIDTH });
                    }
                    if value >> size != 0 {
                        return Err(BitsError::ValueTooWide {
                            value: value as u64,
                            size,
                        });
                    }
                    if size > 0 {
                        packed |= value << offset;
                        offset += size;
                    }
                }
                Ok(packed)
            }
        }
    };
}

bit_fields!(bits32, u32);
bit_fields!(bits64, u64);

#[cfg(test)]
mod tests {
    use super::{BitsError, bits32, bits64};

    #[test]
    fn mask_covers_requested_range() {
        assert_eq!(bits32::mask(4, 2), 0b11_0000);
        assert_eq!(bits32::mask(0, 32), u32::MAX);
        assert_eq!(bits64::mask(60, 4), 0xF000_0000_0000_0000);
        assert_eq!(bits64::mask(13, 0), 0);
    }

    #[test]
    fn extract_shifts_field_down() {
        let word = 0b1011_0110u32;
        assert_eq!(bits32::extract(word, 4, 4), 0b1011);
        assert_eq!(bits32::extract(word, 0, 32), word);
        assert_eq!(bits64::extract(u64::MAX, 32, 32), u32::MAX as u64);
    }

    #[test]
    #[should_panic(expected = "bit range exceeds word width")]
    fn mask_rejects_range_past_word() {
        let _ = bits32::mask(30, 4);
    }

    #[test]
    fn pack_lays_fields_low_to_high() {
        let packed = bits32::pack(&[(0b101, 4), (0b11, 2)]).unwrap();
        assert_eq!(packed, 0b11_0101);
        let wide = bits64::pack(&[(7, 32), (9, 31)]).unwrap();
        assert_eq!(wide, 7 | (9 << 32));
    }

    #[test]
    fn pack_reports_invalid_fields() {
        assert_eq!(
            bits32::pack(&[(0b100, 2)]),
            Err(BitsError::ValueTooWide { value: 4, size: 2 })
        );
        assert_eq!(
            bits32::pack(&[(0, 32)]),
            Err(BitsError::FieldTooLarge {
                size: 32,
                width: 32
            })
        );
        assert_eq!(
            bits32::pack(&[(1, 20), (1, 20)]),
            Err(BitsError::WordOverflow {
                total: 40,
                width: 32
            })
        );
    }
}
