//!
//! Conversion of raw ADC counts to physical units with the chip's calibration
//!
//! Three variants of each formula are provided, as given in the BME280 datasheet (sections 4.2.3 and
//! 8): 32-bit fixed point, 64-bit fixed point (pressure only) and double precision. The fixed point
//! versions reproduce the datasheet's C code including its 32-bit wrap-around, hence the `wrapping_*`
//! arithmetic. None of them can fail; degenerate inputs give the datasheet's default of zero.
//!

use crate::calibration::CalibrationData;

//----------------------------------------------------------------------------------------------------------------------------------
/// Temperature at a finer resolution than the reported value (t_fine in the datasheet).
///
/// Only produced by temperature compensation. Pressure and humidity of a sample must be compensated
/// with the value obtained from the same sample's temperature.
#[derive(Debug, Default, Clone, Copy, PartialEq, Eq)]
pub struct FineTemperature(pub i32);


//----------------------------------------------------------------------------------------------------------------------------------
impl CalibrationData {

    //------------------------------------------------------------------------------------------------------------------------------
    /// Temperature in 0.01 DegC, "5123" equals 51.23 DegC
    pub fn compensate_temperature(&self, adc_t : i32) -> (i32, FineTemperature) {
        let t1 = self.dig_t1 as i32;
        let t2 = self.dig_t2 as i32;
        let t3 = self.dig_t3 as i32;

        let var1 = ((adc_t >> 3).wrapping_sub(t1 << 1)).wrapping_mul(t2) >> 11;
        let delta = (adc_t >> 4).wrapping_sub(t1);
        let var2 = ((delta.wrapping_mul(delta) >> 12).wrapping_mul(t3)) >> 14;

        let t_fine = var1.wrapping_add(var2);
        let temp = (t_fine.wrapping_mul(5).wrapping_add(128)) >> 8;
        (temp, FineTemperature(t_fine))
    }

    //------------------------------------------------------------------------------------------------------------------------------
    /// Temperature in DegC, "51.23" equals 51.23 DegC
    pub fn compensate_temperature_f64(&self, adc_t : i32) -> (f64, FineTemperature) {
        let adc = adc_t as f64;
        let t1 = self.dig_t1 as f64;

        let var1 = (adc / 16384.0 - t1 / 1024.0) * (self.dig_t2 as f64);
        let delta = adc / 131072.0 - t1 / 8192.0;
        let var2 = (delta * delta) * (self.dig_t3 as f64);

        ((var1 + var2) / 5120.0, FineTemperature((var1 + var2) as i32))
    }

    //------------------------------------------------------------------------------------------------------------------------------
    /// Pressure in Pa with 32-bit arithmetic, "96386" equals 963.86 hPa
    pub fn compensate_pressure(&self, adc_p : i32, fine : FineTemperature) -> u32 {
        let p1 = self.dig_p1 as i32;
        let p2 = self.dig_p2 as i32;
        let p3 = self.dig_p3 as i32;
        let p4 = self.dig_p4 as i32;
        let p5 = self.dig_p5 as i32;
        let p6 = self.dig_p6 as i32;
        let p7 = self.dig_p7 as i32;
        let p8 = self.dig_p8 as i32;
        let p9 = self.dig_p9 as i32;

        let mut var1 = (fine.0 >> 1).wrapping_sub(64000);
        let square = (var1 >> 2).wrapping_mul(var1 >> 2);
        let mut var2 = (square >> 11).wrapping_mul(p6);
        var2 = var2.wrapping_add(var1.wrapping_mul(p5) << 1);
        var2 = (var2 >> 2).wrapping_add(p4 << 16);
        var1 = (((p3.wrapping_mul(square >> 13)) >> 3).wrapping_add(p2.wrapping_mul(var1) >> 1)) >> 18;
        var1 = (32768_i32.wrapping_add(var1)).wrapping_mul(p1) >> 15;
        if var1 == 0 {
            return 0;
        }

        let mut press = (1048576_i32.wrapping_sub(adc_p) as u32)
            .wrapping_sub((var2 >> 12) as u32)
            .wrapping_mul(3125);
        // Keep the intermediate inside 32 bits
        if press < 0x8000_0000 {
            press = (press << 1) / (var1 as u32);
        } else {
            press = (press / (var1 as u32)).wrapping_mul(2);
        }

        let var1 = p9.wrapping_mul((((press >> 3).wrapping_mul(press >> 3)) >> 13) as i32) >> 12;
        let var2 = ((press >> 2) as i32).wrapping_mul(p8) >> 13;
        (press as i32).wrapping_add(var1.wrapping_add(var2).wrapping_add(p7) >> 4) as u32
    }

    //------------------------------------------------------------------------------------------------------------------------------
    /// Pressure in Pa with 64-bit intermediates
    pub fn compensate_pressure_i64(&self, adc_p : i32, fine : FineTemperature) -> u32 {
        let p1 = self.dig_p1 as i64;
        let p2 = self.dig_p2 as i64;
        let p3 = self.dig_p3 as i64;
        let p4 = self.dig_p4 as i64;
        let p5 = self.dig_p5 as i64;
        let p6 = self.dig_p6 as i64;
        let p7 = self.dig_p7 as i64;
        let p8 = self.dig_p8 as i64;
        let p9 = self.dig_p9 as i64;

        let mut var1 = (fine.0 as i64) - 128000;
        let mut var2 = var1.wrapping_mul(var1).wrapping_mul(p6);
        var2 = var2.wrapping_add(var1.wrapping_mul(p5) << 17);
        var2 = var2.wrapping_add(p4 << 35);
        var1 = (var1.wrapping_mul(var1).wrapping_mul(p3) >> 8).wrapping_add(var1.wrapping_mul(p2) << 12);
        var1 = ((1_i64 << 47).wrapping_add(var1)).wrapping_mul(p1) >> 33;
        if var1 == 0 {
            return 0;
        }

        let mut press = 1048576 - (adc_p as i64);
        press = ((press << 31).wrapping_sub(var2)).wrapping_mul(3125).wrapping_div(var1);
        let var1 = p9.wrapping_mul(press >> 13).wrapping_mul(press >> 13) >> 25;
        let var2 = p8.wrapping_mul(press) >> 19;
        press = (press.wrapping_add(var1).wrapping_add(var2) >> 8).wrapping_add(p7 << 4);

        // press is Q24.8 Pa
        (press as u32) / 256
    }

    //------------------------------------------------------------------------------------------------------------------------------
    /// Pressure in Pa, "96386.2" equals 963.862 hPa
    pub fn compensate_pressure_f64(&self, adc_p : i32, fine : FineTemperature) -> f64 {
        let p1 = self.dig_p1 as f64;
        let p2 = self.dig_p2 as f64;
        let p3 = self.dig_p3 as f64;
        let p4 = self.dig_p4 as f64;
        let p5 = self.dig_p5 as f64;
        let p6 = self.dig_p6 as f64;
        let p7 = self.dig_p7 as f64;
        let p8 = self.dig_p8 as f64;
        let p9 = self.dig_p9 as f64;

        let mut var1 = (fine.0 as f64) / 2.0 - 64000.0;
        let mut var2 = var1 * var1 * p6 / 32768.0;
        var2 += var1 * p5 * 2.0;
        var2 = var2 / 4.0 + p4 * 65536.0;
        var1 = (p3 * var1 * var1 / 524288.0 + p2 * var1) / 524288.0;
        var1 = (1.0 + var1 / 32768.0) * p1;
        if var1 == 0.0 {
            return 0.0;
        }

        let mut press = 1048576.0 - (adc_p as f64);
        press = (press - var2 / 4096.0) * 6250.0 / var1;
        let var1 = p9 * press * press / 2147483648.0;
        let var2 = press * p8 / 32768.0;
        press + (var1 + var2 + p7) / 16.0
    }

    //------------------------------------------------------------------------------------------------------------------------------
    /// Humidity in %RH as Q22.10, "47445" equals 47445/1024 = 46.333 %RH
    pub fn compensate_humidity(&self, adc_h : i32, fine : FineTemperature) -> u32 {
        let h1 = self.dig_h1 as i32;
        let h2 = self.dig_h2 as i32;
        let h3 = self.dig_h3 as i32;
        let h4 = self.dig_h4 as i32;
        let h5 = self.dig_h5 as i32;
        let h6 = self.dig_h6 as i32;

        let mut v_x1 = fine.0.wrapping_sub(76800);

        let adc_term = ((adc_h << 14)
            .wrapping_sub(h4 << 20)
            .wrapping_sub(h5.wrapping_mul(v_x1))
            .wrapping_add(16384)) >> 15;
        let temp_term = (((v_x1.wrapping_mul(h6) >> 10)
            .wrapping_mul((v_x1.wrapping_mul(h3) >> 11).wrapping_add(32768)) >> 10)
            .wrapping_add(2097152)
            .wrapping_mul(h2)
            .wrapping_add(8192)) >> 14;
        v_x1 = adc_term.wrapping_mul(temp_term);

        let square = ((v_x1 >> 15).wrapping_mul(v_x1 >> 15)) >> 7;
        v_x1 = v_x1.wrapping_sub(square.wrapping_mul(h1) >> 4);

        (v_x1.clamp(0, 419430400) >> 12) as u32
    }

    //------------------------------------------------------------------------------------------------------------------------------
    /// Humidity in %RH, between 0.0 and 100.0
    pub fn compensate_humidity_f64(&self, adc_h : i32, fine : FineTemperature) -> f64 {
        let h1 = self.dig_h1 as f64;
        let h2 = self.dig_h2 as f64;
        let h3 = self.dig_h3 as f64;
        let h4 = self.dig_h4 as f64;
        let h5 = self.dig_h5 as f64;
        let h6 = self.dig_h6 as f64;

        let var = (fine.0 as f64) - 76800.0;
        let humd = ((adc_h as f64) - (h4 * 64.0 + h5 / 16384.0 * var))
            * (h2 / 65536.0 * (1.0 + h6 / 67108864.0 * var * (1.0 + h3 / 67108864.0 * var)));
        let humd = humd * (1.0 - h1 * humd / 524288.0);

        humd.clamp(0.0, 100.0)
    }
}
