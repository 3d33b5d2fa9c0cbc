use tokio::runtime::Runtime;
use tokio::time::sleep;
use std::time::Duration;
use i2cdev::linux::LinuxI2CDevice;

use bme280::{Bme280, Filter, MeasurementConfig, Oversampling, Standby};
use config::Config;
use sensor_err::Result;

const NAME : &str = "indoor";
const DEFAULT_SEA_LEVEL_HPA : f64 = 1013.25;
const IDLE_ATTEMPTS : u32 = 100;

//----------------------------------------------------------------------------------------------------------------------------------
fn oversampling(config : &Config, key : &str, default : Oversampling) -> Result<Oversampling> {
    match config.get_oversampling(NAME, key) {
        Some(factor) => Oversampling::from_factor(factor),
        None => Ok(default)
    }
}


//----------------------------------------------------------------------------------------------------------------------------------
fn measurement_config(config : &Config) -> Result<MeasurementConfig> {
    let default = MeasurementConfig::default();

    let filter = match config.get_filter(NAME) {
        Some(coefficient) => Filter::from_coefficient(coefficient)?,
        None => default.filter
    };
    let standby = match config.get_standby_ms(NAME) {
        Some(ms) => Standby::from_millis(ms)?,
        None => default.standby
    };

    Ok(MeasurementConfig {
        temp_oversampling : oversampling(config, "temp_oversampling", default.temp_oversampling)?,
        pres_oversampling : oversampling(config, "pres_oversampling", default.pres_oversampling)?,
        humd_oversampling : oversampling(config, "humd_oversampling", default.humd_oversampling)?,
        standby,
        filter,
    })
}


//----------------------------------------------------------------------------------------------------------------------------------
fn create_sensor(config : &Config) -> Result<Bme280<LinuxI2CDevice>> {

    let dev_name = config.get_dev_name(NAME).unwrap_or("/dev/i2c-1");
    let address = config.get_address(NAME).unwrap_or(bme280::registers::DEFAULT_ADDR);
    println!("Reading from {} for {} sensor", dev_name, NAME);

    let settings = measurement_config(config)?;

    let mut sensor = Bme280::new_linux(dev_name, address)?;
    sensor.set_oversampling(settings.temp_oversampling, settings.pres_oversampling, settings.humd_oversampling);
    sensor.set_filter(settings.standby, settings.filter);
    sensor.begin(address)?;

    println!("Found BME280 at {:#04x}", sensor.address());
    Ok(sensor)
}


//----------------------------------------------------------------------------------------------------------------------------------
fn take_reading(sensor : &mut Bme280<LinuxI2CDevice>, rt : &Runtime, sea_level_hpa : f64) -> Result<()> {
    sensor.forced()?;

    let conversion_us = sensor.config().measurement_time_max_us();
    rt.block_on(sleep(Duration::from_micros(conversion_us.into())));
    sensor.wait_until_idle(IDLE_ATTEMPTS)?;

    let measurement = sensor.acquire_burst()?;
    println!("{} {:.1}m", measurement, measurement.altitude(sea_level_hpa));
    Ok(())
}


//----------------------------------------------------------------------------------------------------------------------------------
fn main() {

    let config = match Config::new() {
        Ok(config) => config,
        Err(error) => panic!("Failed to read config file {}", error)
    };

    let mut sensor = match create_sensor(&config) {
        Ok(sensor) => sensor,
        Err(error) => panic!("Failed to start sensor {}", error)
    };

    let period_in_mins = config.get_sample_period().unwrap_or(1);
    let sea_level_hpa = config.get_sea_level_hpa(NAME).unwrap_or(DEFAULT_SEA_LEVEL_HPA);

    let rt = match Runtime::new() {
        Ok(rt) => rt,
        Err(error) => panic!("Failed to start runtime {}", error)
    };

    loop {
        if let Err(error) = take_reading(&mut sensor, &rt, sea_level_hpa) {
            println!("Reading failed {}", error);
        }
        rt.block_on(sleep(Duration::from_secs(u64::from(period_in_mins) * 60)));
    }
}
