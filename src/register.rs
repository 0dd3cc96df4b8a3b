//! The register set of the DMA2D (Chrom-ART) blit engine.
//!
//! Note 1: All registers are 32 bits wide and laid out at fixed offsets from the peripheral base
//! address. Line offsets are 16 bits and, once `CR.LOM` is set, are expressed in bytes rather than
//! pixels, which lets a single offset value serve every pixel format.

/// A register of the engine, identified by its offset from the peripheral base.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Register {
    /// Control: transfer mode, start, interrupt enables, line offset mode.
    Cr,
    /// Interrupt status.
    Isr,
    /// Interrupt flag clear.
    Ifcr,
    /// Foreground memory address.
    Fgmar,
    /// Foreground line offset.
    Fgor,
    /// Background memory address.
    Bgmar,
    /// Background line offset.
    Bgor,
    /// Foreground pixel format converter control.
    Fgpfccr,
    /// Foreground color, used in fixed-color modes.
    Fgcolr,
    /// Background pixel format converter control.
    Bgpfccr,
    /// Background color, used in fixed-color modes.
    Bgcolr,
    /// Output pixel format converter control.
    Opfccr,
    /// Output color, the fill value of register-to-memory transfers.
    Ocolr,
    /// Output memory address.
    Omar,
    /// Output line offset.
    Oor,
    /// Number of lines and pixels per line.
    Nlr,
    /// Line watermark.
    Lwr,
    /// AHB master timer configuration.
    Amtcr,
}

/// Number of registers, i.e. the size of a register file indexed by `Register::index`.
pub const NUM_REGISTERS: usize = 18;

impl Register {
    /// Byte offset of the register from the peripheral base address.
    pub fn offset(self) -> usize {
        match self {
            Register::Cr => 0x00,
            Register::Isr => 0x04,
            Register::Ifcr => 0x08,
            Register::Fgmar => 0x0C,
            Register::Fgor => 0x10,
            Register::Bgmar => 0x14,
            Register::Bgor => 0x18,
            Register::Fgpfccr => 0x1C,
            Register::Fgcolr => 0x20,
            Register::Bgpfccr => 0x24,
            Register::Bgcolr => 0x28,
            Register::Opfccr => 0x34,
            Register::Ocolr => 0x38,
            Register::Omar => 0x3C,
            Register::Oor => 0x40,
            Register::Nlr => 0x44,
            Register::Lwr => 0x48,
            Register::Amtcr => 0x4C,
        }
    }

    /// Dense index of the register, for register files kept in arrays.
    pub fn index(self) -> usize {
        self as usize
    }
}

/// Bit fields of the registers that the driver programs.
pub mod bits {
    pub const CR_START: u32 = 1 << 0;
    pub const CR_LOM: u32 = 1 << 6;
    pub const CR_TCIE: u32 = 1 << 9;
    pub const CR_MODE_SHIFT: u32 = 16;
    pub const CR_MODE_MASK: u32 = 0b111 << CR_MODE_SHIFT;

    pub const ISR_TCIF: u32 = 1 << 1;
    pub const IFCR_CTCIF: u32 = 1 << 1;

    /// Color mode field of all three pixel format converters.
    pub const PFCCR_CM_MASK: u32 = 0b1111;
    /// Red/blue swap of all three pixel format converters.
    pub const PFCCR_RBS: u32 = 1 << 21;

    pub const NLR_PL_SHIFT: u32 = 16;
    pub const NLR_PL_MASK: u32 = 0x3FFF << NLR_PL_SHIFT;
    pub const NLR_NL_MASK: u32 = 0xFFFF;

    pub const OR_LO_MASK: u32 = 0xFFFF;

    pub const AMTCR_EN: u32 = 1 << 0;
    pub const AMTCR_DT_SHIFT: u32 = 8;
}

/// Transfer modes, as encoded in `CR.MODE`.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Mode {
    /// Foreground fetch only, no conversion.
    MemoryToMemory,
    /// Foreground fetch with pixel format conversion.
    MemoryToMemoryPfc,
    /// Foreground and background fetch, with pixel format conversion and blending.
    MemoryToMemoryBlend,
    /// Fill from the output color register.
    RegisterToMemory,
}

impl Mode {
    pub fn bits(self) -> u32 {
        let mode = match self {
            Mode::MemoryToMemory => 0b000,
            Mode::MemoryToMemoryPfc => 0b001,
            Mode::MemoryToMemoryBlend => 0b010,
            Mode::RegisterToMemory => 0b011,
        };
        mode << bits::CR_MODE_SHIFT
    }
}

/// Unit in which line offsets are programmed, `CR.LOM`.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum LineOffsetMode {
    Pixels,
    Bytes,
}
