use std::fmt;

use crate::calibration::CalibrationData;
use crate::compensation::FineTemperature;

//----------------------------------------------------------------------------------------------------------------------------------
/// Uncompensated ADC counts of one conversion. All zero until the first acquisition.
#[derive(Debug, Default, Clone, Copy, PartialEq, Eq)]
pub struct RawSample {
    /// 20 bits
    pub pressure : i32,
    /// 20 bits
    pub temperature : i32,
    /// 16 bits
    pub humidity : i32,
}


//----------------------------------------------------------------------------------------------------------------------------------
impl RawSample {

    //------------------------------------------------------------------------------------------------------------------------------
    /// Decode the 0xF7..=0xFE data block, pressure first, then temperature, then humidity
    pub fn from_burst(data : &[u8; 8]) -> Self {
        Self {
            pressure : adc_20bit(&data[0..3]),
            temperature : adc_20bit(&data[3..6]),
            humidity : adc_16bit(&data[6..8]),
        }
    }
}


//----------------------------------------------------------------------------------------------------------------------------------
/// msb, lsb, xlsb, big-endian. The low nibble of xlsb is below the resolution in use.
pub(crate) fn adc_20bit(data : &[u8]) -> i32 {
    (((data[0] as i32) << 16) | ((data[1] as i32) << 8) | (data[2] as i32)) >> 4
}


//----------------------------------------------------------------------------------------------------------------------------------
pub(crate) fn adc_16bit(data : &[u8]) -> i32 {
    ((data[0] as i32) << 8) | (data[1] as i32)
}


//----------------------------------------------------------------------------------------------------------------------------------
/// One acquired sample, bound to the fine temperature computed from its own temperature reading.
///
/// Pressure and humidity are only compensated on request.
#[derive(Debug, Clone, Copy)]
pub struct Measurement {
    raw : RawSample,
    fine : FineTemperature,
    calib : CalibrationData,
}


//----------------------------------------------------------------------------------------------------------------------------------
impl Measurement {

    //------------------------------------------------------------------------------------------------------------------------------
    pub fn new(raw : RawSample, calib : CalibrationData) -> Self {
        let (_, fine) = calib.compensate_temperature(raw.temperature);
        Self { raw, fine, calib }
    }

    pub fn raw(&self) -> RawSample {
        self.raw
    }

    pub fn fine_temperature(&self) -> FineTemperature {
        self.fine
    }

    /// In 0.01 DegC
    pub fn temperature(&self) -> i32 {
        self.calib.compensate_temperature(self.raw.temperature).0
    }

    /// In DegC
    pub fn temperature_f64(&self) -> f64 {
        self.calib.compensate_temperature_f64(self.raw.temperature).0
    }

    /// In Pa, 32-bit arithmetic
    pub fn pressure(&self) -> u32 {
        self.calib.compensate_pressure(self.raw.pressure, self.fine)
    }

    /// In Pa, 64-bit arithmetic
    pub fn pressure_i64(&self) -> u32 {
        self.calib.compensate_pressure_i64(self.raw.pressure, self.fine)
    }

    /// In Pa
    pub fn pressure_f64(&self) -> f64 {
        self.calib.compensate_pressure_f64(self.raw.pressure, self.fine)
    }

    /// In %RH as Q22.10
    pub fn humidity(&self) -> u32 {
        self.calib.compensate_humidity(self.raw.humidity, self.fine)
    }

    /// In %RH
    pub fn humidity_f64(&self) -> f64 {
        self.calib.compensate_humidity_f64(self.raw.humidity, self.fine)
    }

    //------------------------------------------------------------------------------------------------------------------------------
    /// Altitude in metres for the given sea level pressure in hPa
    pub fn altitude(&self, sea_level_hpa : f64) -> f64 {
        altitude(self.pressure_f64() / 100.0, sea_level_hpa)
    }
}


//----------------------------------------------------------------------------------------------------------------------------------
/// International barometric formula, both pressures in hPa, result in metres
pub fn altitude(pressure_hpa : f64, sea_level_hpa : f64) -> f64 {
    44330.0 * (1.0 - (pressure_hpa / sea_level_hpa).powf(0.1903))
}


//----------------------------------------------------------------------------------------------------------------------------------
impl fmt::Display for Measurement {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        write!(f, "{:.2}C {:.2}hPa {:.1}%",
            self.temperature_f64(), self.pressure_f64() / 100.0, self.humidity_f64())
    }
}


//----------------------------------------------------------------------------------------------------------------------------------
#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_relative_eq;
    use crate::calibration::tests::datasheet_calibration;

    fn datasheet_sample() -> RawSample {
        RawSample { pressure : 415148, temperature : 519888, humidity : 30000 }
    }

    #[test]
    fn decode_burst_in_register_order() {
        // 415148 << 4 = 0x655AC0, 519888 << 4 = 0x7EED00, 30000 = 0x7530
        let data = [0x65, 0x5A, 0xC0, 0x7E, 0xED, 0x00, 0x75, 0x30];
        assert_eq!(RawSample::from_burst(&data), datasheet_sample());
    }

    #[test]
    fn low_nibble_is_dropped() {
        assert_eq!(adc_20bit(&[0xFF, 0xFF, 0xFF]), 0xFFFFF);
        assert_eq!(adc_20bit(&[0x80, 0x00, 0x0F]), 0x80000);
        assert_eq!(adc_16bit(&[0x12, 0x34]), 0x1234);
    }

    #[test]
    fn raw_sample_defaults_to_zero() {
        let raw = RawSample::default();
        assert_eq!((raw.pressure, raw.temperature, raw.humidity), (0, 0, 0));
    }

    #[test]
    fn measurement_uses_its_own_fine_temperature() {
        let calib = datasheet_calibration();
        let measurement = Measurement::new(datasheet_sample(), calib);

        assert_eq!(measurement.fine_temperature(), FineTemperature(128422));
        assert_eq!(measurement.temperature(), 2508);
        assert_relative_eq!(measurement.temperature_f64(), 25.0825, max_relative = 1e-5);
        assert_eq!(measurement.pressure(), 100656);
        assert_eq!(measurement.pressure_i64(), 100653);
        assert_relative_eq!(measurement.pressure_f64(), 100653.2581, max_relative = 1e-8);
        assert_eq!(measurement.humidity(), 56317);
        assert_relative_eq!(measurement.humidity_f64(), 55.0007, max_relative = 1e-5);

        // A second, colder sample does not disturb the first
        let colder = Measurement::new(RawSample { temperature : 400000, ..datasheet_sample() }, calib);
        assert_ne!(colder.pressure(), measurement.pressure());
        assert_eq!(measurement.pressure(), 100656);
    }

    #[test]
    fn altitude_from_pressure() {
        assert_relative_eq!(altitude(1013.25, 1013.25), 0.0);
        assert_relative_eq!(altitude(900.0, 1013.25), 988.6, epsilon = 0.5);

        let measurement = Measurement::new(datasheet_sample(), datasheet_calibration());
        assert_relative_eq!(measurement.altitude(1013.25), 56.0778, epsilon = 1e-3);
    }

    #[test]
    fn display_reading() {
        let measurement = Measurement::new(datasheet_sample(), datasheet_calibration());
        assert_eq!(format!("{}", measurement), "25.08C 1006.53hPa 55.0%");
    }
}
