//! CRC-8 checksum over frame data segments.
//!
//! Polynomial 0x07, initial value 0x00, no reflection, no final XOR.
//! This must stay bit-for-bit identical to the firmware implementation on
//! the transmitting device; any deviation here is a defect, not a tuning
//! knob.

/// Compute the CRC-8 of `data`.
#[must_use]
pub fn crc8(data: &[u8]) -> u8 {
    let mut crc: u8 = 0x00;
    for &byte in data {
        crc ^= byte;
        for _ in 0..8 {
            if crc & 0x80 != 0 {
                crc = (crc << 1) ^ 0x07;
            } else {
                crc <<= 1;
            }
        }
    }
    crc
}
