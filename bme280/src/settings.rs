use sensor_err::{Result, SensorError};

//----------------------------------------------------------------------------------------------------------------------------------
/// Oversampling for one of temperature, pressure or humidity. `Skipped` turns the measurement off.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[repr(u8)]
pub enum Oversampling {
    Skipped = 0b000,
    X1 = 0b001,
    X2 = 0b010,
    X4 = 0b011,
    X8 = 0b100,
    X16 = 0b101,
}

impl Oversampling {

    //------------------------------------------------------------------------------------------------------------------------------
    /// Convert a sample count (0 for skipped) to the register setting
    pub fn from_factor(reqd : u8) -> Result<Self> {
        match reqd {
            0 => Ok(Self::Skipped),
            1 => Ok(Self::X1),
            2 => Ok(Self::X2),
            4 => Ok(Self::X4),
            8 => Ok(Self::X8),
            16 => Ok(Self::X16),
            _ => Err(SensorError::Config(format!("Unsupported oversampling {}", reqd)))
        }
    }

    pub fn factor(self) -> u32 {
        match self {
            Self::Skipped => 0,
            _ => 1 << (self as u32 - 1),
        }
    }

    pub fn bits(self) -> u8 {
        self as u8
    }
}


//----------------------------------------------------------------------------------------------------------------------------------
/// IIR filter coefficient
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[repr(u8)]
pub enum Filter {
    Off = 0b000,
    X2 = 0b001,
    X4 = 0b010,
    X8 = 0b011,
    X16 = 0b100,
}

impl Filter {

    //------------------------------------------------------------------------------------------------------------------------------
    pub fn from_coefficient(reqd : u8) -> Result<Self> {
        match reqd {
            0 | 1 => Ok(Self::Off),
            2 => Ok(Self::X2),
            4 => Ok(Self::X4),
            8 => Ok(Self::X8),
            16 => Ok(Self::X16),
            _ => Err(SensorError::Config(format!("Unsupported filter coefficient {}", reqd)))
        }
    }

    pub fn bits(self) -> u8 {
        self as u8
    }
}


//----------------------------------------------------------------------------------------------------------------------------------
/// Inactive time between conversions in normal mode. The last two codes are out of order on the chip.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[repr(u8)]
pub enum Standby {
    Ms0_5 = 0b000,
    Ms62_5 = 0b001,
    Ms125 = 0b010,
    Ms250 = 0b011,
    Ms500 = 0b100,
    Ms1000 = 0b101,
    Ms10 = 0b110,
    Ms20 = 0b111,
}

impl Standby {

    //------------------------------------------------------------------------------------------------------------------------------
    pub fn from_millis(ms : f64) -> Result<Self> {
        match (ms * 10.0).round() as i64 {
            5 => Ok(Self::Ms0_5),
            625 => Ok(Self::Ms62_5),
            1250 => Ok(Self::Ms125),
            2500 => Ok(Self::Ms250),
            5000 => Ok(Self::Ms500),
            10000 => Ok(Self::Ms1000),
            100 => Ok(Self::Ms10),
            200 => Ok(Self::Ms20),
            _ => Err(SensorError::Config(format!("Unsupported standby time {}ms", ms)))
        }
    }

    pub fn bits(self) -> u8 {
        self as u8
    }
}


//----------------------------------------------------------------------------------------------------------------------------------
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[repr(u8)]
pub enum PowerMode {
    Sleep = 0b00,
    /// One conversion, then back to sleep
    Forced = 0b01,
    /// Continuous conversions separated by the standby time
    Normal = 0b11,
}

impl PowerMode {
    pub fn bits(self) -> u8 {
        self as u8
    }
}


//----------------------------------------------------------------------------------------------------------------------------------
/// Oversampling, filter and standby settings held by the driver and sent on every mode write
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct MeasurementConfig {
    pub temp_oversampling : Oversampling,
    pub pres_oversampling : Oversampling,
    pub humd_oversampling : Oversampling,
    pub standby : Standby,
    pub filter : Filter,
}


//----------------------------------------------------------------------------------------------------------------------------------
impl Default for MeasurementConfig {
    fn default() -> Self {
        Self {
            temp_oversampling : Oversampling::X2,
            pres_oversampling : Oversampling::X16,
            humd_oversampling : Oversampling::X1,
            standby : Standby::Ms0_5,
            filter : Filter::X16,
        }
    }
}


//----------------------------------------------------------------------------------------------------------------------------------
impl MeasurementConfig {

    //------------------------------------------------------------------------------------------------------------------------------
    /// ctrl_hum [2:0] = osrs_h
    pub fn ctrl_hum(&self) -> u8 {
        self.humd_oversampling.bits()
    }

    //------------------------------------------------------------------------------------------------------------------------------
    /// ctrl_meas [7:5] = osrs_t, [4:2] = osrs_p, [1:0] = mode
    pub fn ctrl_meas(&self, mode : PowerMode) -> u8 {
        (self.temp_oversampling.bits() << 5) | (self.pres_oversampling.bits() << 2) | mode.bits()
    }

    //------------------------------------------------------------------------------------------------------------------------------
    /// config [7:5] = t_sb, [4:2] = filter, [0] = spi3w_en which stays clear on I2C
    pub fn config(&self) -> u8 {
        (self.standby.bits() << 5) | (self.filter.bits() << 2)
    }

    //------------------------------------------------------------------------------------------------------------------------------
    /// Worst case duration of one conversion in microseconds (datasheet appendix B)
    pub fn measurement_time_max_us(&self) -> u32 {
        let mut time = 1250 + 2300 * self.temp_oversampling.factor();
        if self.pres_oversampling != Oversampling::Skipped {
            time += 2300 * self.pres_oversampling.factor() + 575;
        }
        if self.humd_oversampling != Oversampling::Skipped {
            time += 2300 * self.humd_oversampling.factor() + 575;
        }
        time
    }
}


//----------------------------------------------------------------------------------------------------------------------------------
#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn ctrl_meas_packing() {
        let cfg = MeasurementConfig::default();
        assert_eq!(cfg.ctrl_meas(PowerMode::Sleep), 0b010_101_00);
        assert_eq!(cfg.ctrl_meas(PowerMode::Forced), 0b010_101_01);
        assert_eq!(cfg.ctrl_meas(PowerMode::Normal), 0b010_101_11);
        assert_eq!(cfg.ctrl_hum(), 0b001);
    }

    #[test]
    fn config_packing() {
        let mut cfg = MeasurementConfig::default();
        assert_eq!(cfg.config(), 0b000_100_00);

        cfg.standby = Standby::Ms1000;
        cfg.filter = Filter::X4;
        assert_eq!(cfg.config(), 0b101_010_00);
    }

    #[test]
    fn oversampling_from_factor() {
        assert_eq!(Oversampling::from_factor(0).unwrap(), Oversampling::Skipped);
        assert_eq!(Oversampling::from_factor(4).unwrap(), Oversampling::X4);
        assert_eq!(Oversampling::from_factor(16).unwrap(), Oversampling::X16);
        assert!(Oversampling::from_factor(3).is_err());

        assert_eq!(Oversampling::X8.factor(), 8);
        assert_eq!(Oversampling::Skipped.factor(), 0);
    }

    #[test]
    fn standby_and_filter_lookup() {
        assert_eq!(Standby::from_millis(0.5).unwrap(), Standby::Ms0_5);
        assert_eq!(Standby::from_millis(62.5).unwrap(), Standby::Ms62_5);
        assert_eq!(Standby::from_millis(20.0).unwrap().bits(), 0b111);
        assert!(Standby::from_millis(30.0).is_err());

        assert_eq!(Filter::from_coefficient(16).unwrap(), Filter::X16);
        assert!(Filter::from_coefficient(32).is_err());
    }

    #[test]
    fn measurement_time() {
        let cfg = MeasurementConfig {
            temp_oversampling : Oversampling::X1,
            pres_oversampling : Oversampling::X1,
            humd_oversampling : Oversampling::X1,
            standby : Standby::Ms0_5,
            filter : Filter::Off,
        };
        assert_eq!(cfg.measurement_time_max_us(), 1250 + 2300 + 2875 + 2875);

        let cfg = MeasurementConfig {
            pres_oversampling : Oversampling::Skipped,
            humd_oversampling : Oversampling::Skipped,
            ..cfg
        };
        assert_eq!(cfg.measurement_time_max_us(), 3550);
    }
}
