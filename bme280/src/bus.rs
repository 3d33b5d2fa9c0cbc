use i2cdev::core::I2CDevice;
use i2cdev::linux::LinuxI2CDevice;
use sensor_err::Result;

//----------------------------------------------------------------------------------------------------------------------------------
/// Byte addressed register access to one device on a two-wire bus.
///
/// Every call is a complete, blocking bus transaction. Failures are handed back unchanged, the driver
/// never retries.
pub trait RegisterBus {

    /// Select the 7-bit device address used by the following transactions
    fn set_address(&mut self, address : u16) -> Result<()>;

    fn read_byte(&mut self, register : u8) -> Result<u8>;

    /// Read `data.len()` consecutive registers starting at `register`, in wire order
    fn read_bytes(&mut self, register : u8, data : &mut [u8]) -> Result<()>;

    fn write_byte(&mut self, register : u8, value : u8) -> Result<()>;
}


//----------------------------------------------------------------------------------------------------------------------------------
impl RegisterBus for LinuxI2CDevice {

    //------------------------------------------------------------------------------------------------------------------------------
    fn set_address(&mut self, address : u16) -> Result<()> {
        self.set_slave_address(address)?;
        Ok(())
    }

    //------------------------------------------------------------------------------------------------------------------------------
    fn read_byte(&mut self, register : u8) -> Result<u8> {
        Ok(self.smbus_read_byte_data(register)?)
    }

    //------------------------------------------------------------------------------------------------------------------------------
    fn read_bytes(&mut self, register : u8, data : &mut [u8]) -> Result<()> {
        // Register pointer write then a repeated read, the chip auto increments
        self.write(&[register])?;
        self.read(data)?;
        Ok(())
    }

    //------------------------------------------------------------------------------------------------------------------------------
    fn write_byte(&mut self, register : u8, value : u8) -> Result<()> {
        self.smbus_write_byte_data(register, value)?;
        Ok(())
    }
}


//----------------------------------------------------------------------------------------------------------------------------------
impl<B : RegisterBus + ?Sized> RegisterBus for &mut B {

    fn set_address(&mut self, address : u16) -> Result<()> {
        (**self).set_address(address)
    }

    fn read_byte(&mut self, register : u8) -> Result<u8> {
        (**self).read_byte(register)
    }

    fn read_bytes(&mut self, register : u8, data : &mut [u8]) -> Result<()> {
        (**self).read_bytes(register, data)
    }

    fn write_byte(&mut self, register : u8, value : u8) -> Result<()> {
        (**self).write_byte(register, value)
    }
}
