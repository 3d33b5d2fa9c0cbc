use log::debug;
use sensor_err::Result;

use crate::bus::RegisterBus;
use crate::registers;

//----------------------------------------------------------------------------------------------------------------------------------
/// Factory calibration coefficients, unique to each chip.
///
/// Read once when the sensor is started and never changed afterwards. The compensation formulas that
/// consume them live in `compensation.rs`.
#[derive(Debug, Default, Clone, Copy, PartialEq, Eq)]
pub struct CalibrationData {
    pub dig_t1 : u16,
    pub dig_t2 : i16,
    pub dig_t3 : i16,

    pub dig_p1 : u16,
    pub dig_p2 : i16,
    pub dig_p3 : i16,
    pub dig_p4 : i16,
    pub dig_p5 : i16,
    pub dig_p6 : i16,
    pub dig_p7 : i16,
    pub dig_p8 : i16,
    pub dig_p9 : i16,

    pub dig_h1 : u8,
    pub dig_h2 : i16,
    pub dig_h3 : u8,
    pub dig_h4 : i16,
    pub dig_h5 : i16,
    pub dig_h6 : i8,
}


//----------------------------------------------------------------------------------------------------------------------------------
fn read_u16_le(data : &[u8], offset : usize) -> u16 {
    u16::from_le_bytes([data[offset], data[offset + 1]])
}


//----------------------------------------------------------------------------------------------------------------------------------
fn read_i16_le(data : &[u8], offset : usize) -> i16 {
    i16::from_le_bytes([data[offset], data[offset + 1]])
}


//----------------------------------------------------------------------------------------------------------------------------------
impl CalibrationData {

    //------------------------------------------------------------------------------------------------------------------------------
    /// Read both calibration blocks from the device. Bus failures are passed straight back.
    pub fn load<B : RegisterBus>(bus : &mut B) -> Result<Self> {
        let mut block1 = [0u8; registers::CALIB_00_LEN];
        bus.read_bytes(registers::CALIB_00, &mut block1)?;

        let mut block2 = [0u8; registers::CALIB_26_LEN];
        bus.read_bytes(registers::CALIB_26, &mut block2)?;

        let calib = Self::from_registers(&block1, &block2);
        debug!("Got calibration data: {:?}", calib);
        Ok(calib)
    }

    //------------------------------------------------------------------------------------------------------------------------------
    /// Parse the raw contents of 0x88..=0xA1 and 0xE1..=0xE7.
    pub fn from_registers(block1 : &[u8; registers::CALIB_00_LEN], block2 : &[u8; registers::CALIB_26_LEN]) -> Self {
        // 0xE4..0xE6 hold two 12-bit signed values sharing the middle byte:
        // H4 = E4[7:0] E5[3:0], H5 = E6[7:0] E5[7:4]
        let e4 = block2[3];
        let e5 = block2[4];
        let e6 = block2[5];
        let dig_h4 = ((e4 as i8 as i16) * 16) | ((e5 & 0x0F) as i16);
        let dig_h5 = ((e6 as i8 as i16) * 16) | ((e5 >> 4) as i16);

        Self {
            dig_t1 : read_u16_le(block1, 0),
            dig_t2 : read_i16_le(block1, 2),
            dig_t3 : read_i16_le(block1, 4),

            dig_p1 : read_u16_le(block1, 6),
            dig_p2 : read_i16_le(block1, 8),
            dig_p3 : read_i16_le(block1, 10),
            dig_p4 : read_i16_le(block1, 12),
            dig_p5 : read_i16_le(block1, 14),
            dig_p6 : read_i16_le(block1, 16),
            dig_p7 : read_i16_le(block1, 18),
            dig_p8 : read_i16_le(block1, 20),
            dig_p9 : read_i16_le(block1, 22),

            dig_h1 : block1[25],
            dig_h2 : read_i16_le(block2, 0),
            dig_h3 : block2[2],
            dig_h4,
            dig_h5,
            dig_h6 : block2[6] as i8,
        }
    }
}
