//!
//! BME280 register map
//!

pub const CHIP_ID : u8 = 0x60;
pub const SOFT_RESET_CMD : u8 = 0xB6;

// I2C addresses, SDO high and SDO low
pub const DEFAULT_ADDR : u16 = 0x77;
pub const ALTERNATE_ADDR : u16 = 0x76;

// Calibration block 1: T1..P9 then H1 at 0xA1 (0xA0 is unused)
pub const CALIB_00 : u8 = 0x88;
pub const CALIB_00_LEN : usize = 26;

// Calibration block 2: H2..H6
pub const CALIB_26 : u8 = 0xE1;
pub const CALIB_26_LEN : usize = 7;

pub const ID : u8 = 0xD0;
pub const RESET : u8 = 0xE0;
pub const CTRL_HUM : u8 = 0xF2;
pub const STATUS : u8 = 0xF3;
pub const CTRL_MEAS : u8 = 0xF4;
pub const CONFIG : u8 = 0xF5;

pub const PRESS_MSB : u8 = 0xF7;
pub const TEMP_MSB : u8 = 0xFA;
pub const HUM_MSB : u8 = 0xFD;
pub const DATA_LEN : usize = 8;

// Status bits
pub const STATUS_MEASURING : u8 = 0b0000_1000;
pub const STATUS_IM_UPDATE : u8 = 0b0000_0001;
