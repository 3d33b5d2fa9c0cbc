//!
//! In-memory register bus for the unit tests
//!

use sensor_err::{Result, SensorError};

use crate::bus::RegisterBus;
use crate::registers;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Op {
    SetAddress(u16),
    Read(u8, usize),
    Write(u8, u8),
}

//----------------------------------------------------------------------------------------------------------------------------------
pub struct FakeBus {
    regs : [u8; 256],
    chip_address : u16,
    address : u16,
    fail_at : Option<u8>,
    ops : Vec<Op>,
}


//----------------------------------------------------------------------------------------------------------------------------------
impl FakeBus {

    /// A bus with a BME280 answering at the default address
    pub fn new() -> Self {
        let mut regs = [0u8; 256];
        regs[registers::ID as usize] = registers::CHIP_ID;
        Self {
            regs,
            chip_address : registers::DEFAULT_ADDR,
            address : registers::DEFAULT_ADDR,
            fail_at : None,
            ops : Vec::new(),
        }
    }

    pub fn at_address(mut self, address : u16) -> Self {
        self.chip_address = address;
        self
    }

    pub fn load(&mut self, register : u8, data : &[u8]) {
        let start = register as usize;
        self.regs[start..start + data.len()].copy_from_slice(data);
    }

    pub fn reg(&self, register : u8) -> u8 {
        self.regs[register as usize]
    }

    /// Any read starting at `register` fails from now on
    pub fn fail_at(&mut self, register : u8) {
        self.fail_at = Some(register);
    }

    pub fn ops(&self) -> &[Op] {
        &self.ops
    }

    pub fn clear_ops(&mut self) {
        self.ops.clear();
    }

    pub fn reads(&self) -> Vec<(u8, usize)> {
        self.ops.iter().filter_map(|op| match op {
            Op::Read(reg, len) => Some((*reg, *len)),
            _ => None
        }).collect()
    }

    pub fn writes(&self) -> Vec<(u8, u8)> {
        self.ops.iter().filter_map(|op| match op {
            Op::Write(reg, value) => Some((*reg, *value)),
            _ => None
        }).collect()
    }

    fn check(&self, register : u8) -> Result<()> {
        if self.address != self.chip_address {
            return Err(SensorError::from("No ACK"));
        }
        if self.fail_at == Some(register) {
            return Err(SensorError::from("Injected failure"));
        }
        Ok(())
    }
}


//----------------------------------------------------------------------------------------------------------------------------------
impl RegisterBus for FakeBus {

    fn set_address(&mut self, address : u16) -> Result<()> {
        self.ops.push(Op::SetAddress(address));
        self.address = address;
        Ok(())
    }

    fn read_byte(&mut self, register : u8) -> Result<u8> {
        self.ops.push(Op::Read(register, 1));
        self.check(register)?;
        Ok(self.regs[register as usize])
    }

    fn read_bytes(&mut self, register : u8, data : &mut [u8]) -> Result<()> {
        self.ops.push(Op::Read(register, data.len()));
        self.check(register)?;
        let start = register as usize;
        data.copy_from_slice(&self.regs[start..start + data.len()]);
        Ok(())
    }

    fn write_byte(&mut self, register : u8, value : u8) -> Result<()> {
        self.ops.push(Op::Write(register, value));
        self.check(register)?;
        self.regs[register as usize] = value;
        Ok(())
    }
}
