//! Quality flag bit decoding
//!
//! Bit numbering is LSB = bit 0. Layouts follow the VNP09 user guide.

/// QF5: bits 4..7 flag M3, M4, M5 and M7 as degraded
pub fn qf5_good(flag: u8) -> bool {
    flag & 0xF0 == 0
}

/// QF2: land/water class in bits 0..2; `010` inland water, `011` sea water
pub fn qf2_land(flag: u8) -> bool {
    !matches!(flag & 0b111, 0b010 | 0b011)
}

/// QF6: bit 5 flags I3 as degraded
pub fn qf6_i3_good(flag: u8) -> bool {
    flag & 0x20 == 0
}

/// Every byte value accepted by `predicate`
pub fn good_values(predicate: impl Fn(u8) -> bool) -> Vec<u8> {
    (0..=u8::MAX).filter(|v| predicate(*v)).collect()
}
