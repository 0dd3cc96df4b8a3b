use core::cell::Cell;

use crate::register::Register;

/// Access to the engine's register block.
///
/// Accessors take `&self` because the block is shared with the interrupt handler; each access is
/// a single 32-bit load or store.
pub trait RegisterInterface {
    fn read(&self, reg: Register) -> u32;
    fn write(&self, reg: Register, value: u32);

    /// Read-modify-write of a register.
    fn modify<F>(&self, reg: Register, f: F)
    where
        F: FnOnce(u32) -> u32,
    {
        let value = self.read(reg);
        self.write(reg, f(value));
    }
}

pub mod mmio {
    //! Memory-mapped register access for the on-chip peripheral.

    use core::ptr;

    use super::RegisterInterface;
    use crate::register::Register;

    /// The DMA2D base address on STM32F4/F7 parts.
    pub const DMA2D_BASE: usize = 0x4002_B000;

    pub struct Mmio {
        base: usize,
    }

    impl Mmio {
        /// Create an interface to a register block at `base`.
        ///
        /// # Safety
        ///
        /// `base` must be the address of a DMA2D register block, mapped and clocked for the
        /// lifetime of the returned value, and no other driver may access that block.
        pub const unsafe fn new(base: usize) -> Self {
            Mmio { base }
        }

        fn addr(&self, reg: Register) -> *mut u32 {
            (self.base + reg.offset()) as *mut u32
        }
    }

    impl RegisterInterface for Mmio {
        fn read(&self, reg: Register) -> u32 {
            // Safety: the constructor's contract makes every register offset valid.
            unsafe { ptr::read_volatile(self.addr(reg)) }
        }

        fn write(&self, reg: Register, value: u32) {
            unsafe { ptr::write_volatile(self.addr(reg), value) }
        }
    }
}

/// Register interface backed by a plain register file, without any device behind it. Useful to
/// compute a complete register image for a transfer on the host.
pub struct RegisterFile {
    regs: [Cell<u32>; crate::register::NUM_REGISTERS],
}

impl RegisterFile {
    pub fn new() -> Self {
        RegisterFile {
            regs: Default::default(),
        }
    }
}

impl Default for RegisterFile {
    fn default() -> Self {
        RegisterFile::new()
    }
}

impl RegisterInterface for RegisterFile {
    fn read(&self, reg: Register) -> u32 {
        self.regs[reg.index()].get()
    }

    fn write(&self, reg: Register, value: u32) {
        self.regs[reg.index()].set(value)
    }
}
