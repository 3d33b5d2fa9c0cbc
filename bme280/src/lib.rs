//!
//! Driver for the Bosch BME280 temperature, pressure and humidity sensor on I2C
//!
//! Usage: create the driver over a `RegisterBus`, `begin()` it, trigger a conversion with `forced()`,
//! wait for it to finish (`wait_until_idle()` or the caller's own timing) and then `acquire_burst()`.
//! The returned `Measurement` compensates pressure and humidity with the fine temperature of the same
//! sample.
//!

use std::thread;
use std::time::Duration;

use i2cdev::linux::LinuxI2CDevice;
use log::{debug, info, warn};
use sensor_err::{Result, SensorError};

pub mod bus;
pub mod calibration;
pub mod compensation;
pub mod measurement;
pub mod registers;
pub mod settings;

#[cfg(test)]
mod fake;

pub use bus::RegisterBus;
pub use calibration::CalibrationData;
pub use compensation::FineTemperature;
pub use measurement::{altitude, Measurement, RawSample};
pub use settings::{Filter, MeasurementConfig, Oversampling, PowerMode, Standby};


//----------------------------------------------------------------------------------------------------------------------------------
/// What the chip is doing, from the status register
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RunState {
    /// `begin()` has not succeeded, the status register was not read
    NotInitialized,
    Idle,
    /// NVM data are being copied to the image registers
    NvmCopying,
    /// A conversion is running
    Measuring,
    MeasuringNvmCopying,
}


//----------------------------------------------------------------------------------------------------------------------------------
impl RunState {

    //------------------------------------------------------------------------------------------------------------------------------
    pub fn from_status(status : u8) -> Self {
        let measuring = (status & registers::STATUS_MEASURING) >> 3;
        let im_update = status & registers::STATUS_IM_UPDATE;
        match (measuring << 1) + im_update {
            0 => Self::Idle,
            1 => Self::NvmCopying,
            2 => Self::Measuring,
            _ => Self::MeasuringNvmCopying,
        }
    }

    //------------------------------------------------------------------------------------------------------------------------------
    /// -1 not initialized, otherwise (measuring << 1) + im_update
    pub fn code(self) -> i8 {
        match self {
            Self::NotInitialized => -1,
            Self::Idle => 0,
            Self::NvmCopying => 1,
            Self::Measuring => 2,
            Self::MeasuringNvmCopying => 3,
        }
    }

    pub fn is_busy(self) -> bool {
        !matches!(self, Self::NotInitialized | Self::Idle)
    }
}


//----------------------------------------------------------------------------------------------------------------------------------
pub struct Bme280<B> {
    bus : B,
    address : u16,
    inited : bool,
    config : MeasurementConfig,
    calib : CalibrationData,
    raw : RawSample,
}


//----------------------------------------------------------------------------------------------------------------------------------
impl Bme280<LinuxI2CDevice> {

    //------------------------------------------------------------------------------------------------------------------------------
    /// Open a Linux I2C device node, e.g. "/dev/i2c-1"
    pub fn new_linux(dev_name : &str, address : u16) -> Result<Self> {
        let dev = LinuxI2CDevice::new(dev_name, address)?;
        let mut this = Self::new(dev);
        this.address = address;
        Ok(this)
    }
}


//----------------------------------------------------------------------------------------------------------------------------------
impl<B : RegisterBus> Bme280<B> {

    //------------------------------------------------------------------------------------------------------------------------------
    /// No bus traffic until `begin()`
    pub fn new(bus : B) -> Self {
        Self {
            bus,
            address : registers::DEFAULT_ADDR,
            inited : false,
            config : MeasurementConfig::default(),
            calib : CalibrationData::default(),
            raw : RawSample::default(),
        }
    }

    //------------------------------------------------------------------------------------------------------------------------------
    /// Find the chip at `address`, then at the default and alternate addresses. Once found read the
    /// calibration, write the filter settings and start a forced conversion with the stored
    /// oversampling.
    ///
    /// If no chip answers nothing is written and the driver stays uninitialized.
    pub fn begin(&mut self, address : u16) -> Result<()> {
        let mut candidates = vec![address];
        for alt in [registers::DEFAULT_ADDR, registers::ALTERNATE_ADDR] {
            if !candidates.contains(&alt) {
                candidates.push(alt);
            }
        }

        let mut found = None;
        for addr in &candidates {
            if self.probe(*addr)? {
                found = Some(*addr);
                break;
            }
        }
        let Some(addr) = found else {
            warn!("No BME280 found at {:x?}", candidates);
            return Err(SensorError::NotFound { addresses : candidates });
        };
        info!("BME280 found at {:#04x}", addr);
        self.address = addr;

        self.calib = CalibrationData::load(&mut self.bus)?;
        self.write_filter()?;
        self.forced()?;
        self.inited = true;
        Ok(())
    }

    //------------------------------------------------------------------------------------------------------------------------------
    // A missing device NAKs on Linux, so a failed read only means "not here"
    fn probe(&mut self, address : u16) -> Result<bool> {
        self.bus.set_address(address)?;
        match self.bus.read_byte(registers::ID) {
            Ok(chip_id) => {
                debug!("Got chip id {:#04x} at {:#04x}", chip_id, address);
                Ok(chip_id == registers::CHIP_ID)
            },
            Err(error) => {
                debug!("No answer at {:#04x}: {}", address, error);
                Ok(false)
            }
        }
    }

    //------------------------------------------------------------------------------------------------------------------------------
    pub fn chip_id(&mut self) -> Result<u8> {
        self.bus.read_byte(registers::ID)
    }

    //------------------------------------------------------------------------------------------------------------------------------
    /// Same as a power-on reset. Calibration is unchanged but the control registers clear, so the
    /// driver needs `begin()` again.
    pub fn soft_reset(&mut self) -> Result<()> {
        debug!("Initiating soft reset");
        self.bus.write_byte(registers::RESET, registers::SOFT_RESET_CMD)?;
        self.inited = false;
        Ok(())
    }

    pub fn is_initialized(&self) -> bool {
        self.inited
    }

    pub fn address(&self) -> u16 {
        self.address
    }

    pub fn calibration(&self) -> &CalibrationData {
        &self.calib
    }

    pub fn config(&self) -> &MeasurementConfig {
        &self.config
    }

    /// Zero until the first acquisition
    pub fn last_sample(&self) -> RawSample {
        self.raw
    }

    pub fn release(self) -> B {
        self.bus
    }

    //------------------------------------------------------------------------------------------------------------------------------
    pub fn run_state(&mut self) -> Result<RunState> {
        if !self.inited {
            return Ok(RunState::NotInitialized);
        }
        let status = self.bus.read_byte(registers::STATUS)?;
        Ok(RunState::from_status(status))
    }

    //------------------------------------------------------------------------------------------------------------------------------
    /// Poll the status register once a millisecond until neither a conversion nor an NVM copy is
    /// running.
    pub fn wait_until_idle(&mut self, attempts : u32) -> Result<()> {
        for _ in 0..attempts {
            if !self.run_state()?.is_busy() {
                return Ok(());
            }
            thread::sleep(Duration::from_millis(1));
        }
        Err(SensorError::Timeout)
    }

    //------------------------------------------------------------------------------------------------------------------------------
    /// Stored only, sent on the next mode write
    pub fn set_oversampling(&mut self, temp : Oversampling, pres : Oversampling, humd : Oversampling) {
        self.config.temp_oversampling = temp;
        self.config.pres_oversampling = pres;
        self.config.humd_oversampling = humd;
    }

    //------------------------------------------------------------------------------------------------------------------------------
    /// Stored only, sent by `write_filter()`
    pub fn set_filter(&mut self, standby : Standby, filter : Filter) {
        self.config.standby = standby;
        self.config.filter = filter;
    }

    //------------------------------------------------------------------------------------------------------------------------------
    pub fn write_filter(&mut self) -> Result<()> {
        let config = self.config.config();
        debug!("Setting config {:#x} to {:#010b}", registers::CONFIG, config);
        self.bus.write_byte(registers::CONFIG, config)
    }

    //------------------------------------------------------------------------------------------------------------------------------
    /// Write the oversampling settings together with `mode`.
    ///
    /// ctrl_hum only takes effect on the following ctrl_meas write, so it goes first.
    pub fn commit(&mut self, mode : PowerMode) -> Result<()> {
        let ctrl_hum = self.config.ctrl_hum();
        let ctrl_meas = self.config.ctrl_meas(mode);
        debug!("Setting ctrl_hum {:#x} to {:#010b}", registers::CTRL_HUM, ctrl_hum);
        self.bus.write_byte(registers::CTRL_HUM, ctrl_hum)?;
        debug!("Setting ctrl_meas {:#x} to {:#010b}", registers::CTRL_MEAS, ctrl_meas);
        self.bus.write_byte(registers::CTRL_MEAS, ctrl_meas)
    }

    pub fn sleep(&mut self) -> Result<()> {
        self.commit(PowerMode::Sleep)
    }

    /// One conversion, after which the chip goes back to sleep by itself
    pub fn forced(&mut self) -> Result<()> {
        self.commit(PowerMode::Forced)
    }

    /// Convert continuously, `standby` apart, until `sleep()`
    pub fn normal(&mut self) -> Result<()> {
        self.commit(PowerMode::Normal)
    }

    //------------------------------------------------------------------------------------------------------------------------------
    /// Read pressure, temperature and humidity in one 8 byte transaction.
    ///
    /// The status register is not checked: in forced mode the caller has to wait for the conversion
    /// to finish first, otherwise the previous sample is returned.
    pub fn acquire_burst(&mut self) -> Result<Measurement> {
        let mut data = [0u8; registers::DATA_LEN];
        self.bus.read_bytes(registers::PRESS_MSB, &mut data)?;
        Ok(self.store(RawSample::from_burst(&data)))
    }

    //------------------------------------------------------------------------------------------------------------------------------
    /// As `acquire_burst()` but one transaction per quantity
    pub fn acquire_single(&mut self) -> Result<Measurement> {
        let mut press = [0u8; 3];
        self.bus.read_bytes(registers::PRESS_MSB, &mut press)?;
        let mut temp = [0u8; 3];
        self.bus.read_bytes(registers::TEMP_MSB, &mut temp)?;
        let mut humd = [0u8; 2];
        self.bus.read_bytes(registers::HUM_MSB, &mut humd)?;

        Ok(self.store(RawSample {
            pressure : measurement::adc_20bit(&press),
            temperature : measurement::adc_20bit(&temp),
            humidity : measurement::adc_16bit(&humd),
        }))
    }

    fn store(&mut self, raw : RawSample) -> Measurement {
        debug!("Raw sample {:?}", raw);
        self.raw = raw;
        Measurement::new(raw, self.calib)
    }
}
