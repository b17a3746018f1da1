//! Hardware abstraction: shift-register lamp transport, presence sensor
//! input, and the status display sink
//!
//! The concrete types here are generic over `embedded-hal` 1.0 traits so the
//! same code drives real peripherals on target and mock peripherals in host
//! tests.

use embedded_hal::digital::{InputPin, OutputPin};
use embedded_hal::spi::SpiBus;

use crate::lights::LampBus;
use crate::types::Notice;

/// Hardware fault surfaced to the coordinator
#[derive(Copy, Clone, PartialEq, Eq, Debug)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum HalError {
    /// SPI transfer to the shift-register chain failed
    SpiError,
    /// Latch or sensor GPIO operation failed
    GpioError,
    /// Rejected configuration value
    InvalidConfig,
}

#[cfg(feature = "std")]
impl core::fmt::Display for HalError {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        match self {
            HalError::SpiError => write!(f, "SPI transfer failed"),
            HalError::GpioError => write!(f, "GPIO operation failed"),
            HalError::InvalidConfig => write!(f, "invalid configuration"),
        }
    }
}

#[cfg(feature = "std")]
impl std::error::Error for HalError {}

/// Best-effort sink for human-readable status events
///
/// Display output must never stall or fail the control loop, so the sink is
/// infallible; implementations drop events they cannot take.
pub trait StatusDisplay {
    fn notice(&mut self, notice: Notice);
}

/// Lamp transport over a chain of three daisy-chained 8-bit shift registers
///
/// Keeps a shadow of the 24-bit lamp mask and pushes all three bytes on
/// every change, least significant byte first so it lands in the register
/// furthest down the chain.
pub struct ShiftRegisterBus<SPI, LATCH> {
    spi: SPI,
    latch: LATCH,
    shadow: u32,
}

impl<SPI, LATCH> ShiftRegisterBus<SPI, LATCH>
where
    SPI: SpiBus,
    LATCH: OutputPin,
{
    pub fn new(spi: SPI, latch: LATCH) -> Self {
        Self {
            spi,
            latch,
            shadow: 0,
        }
    }

    /// Current shadow of the lamp mask
    pub fn mask(&self) -> u32 {
        self.shadow
    }

    /// Give the peripherals back
    pub fn release(self) -> (SPI, LATCH) {
        (self.spi, self.latch)
    }

    /// Push the shadow out and pulse the storage latch
    pub fn flush(&mut self) -> Result<(), HalError> {
        let bytes = [
            (self.shadow & 0xFF) as u8,
            ((self.shadow >> 8) & 0xFF) as u8,
            ((self.shadow >> 16) & 0xFF) as u8,
        ];
        self.latch.set_low().map_err(|_| HalError::GpioError)?;
        self.spi.write(&bytes).map_err(|_| HalError::SpiError)?;
        self.spi.flush().map_err(|_| HalError::SpiError)?;
        self.latch.set_high().map_err(|_| HalError::GpioError)?;
        Ok(())
    }
}

impl<SPI, LATCH> LampBus for ShiftRegisterBus<SPI, LATCH>
where
    SPI: SpiBus,
    LATCH: OutputPin,
{
    type Error = HalError;

    fn set_bits(&mut self, mask: u32) -> Result<(), HalError> {
        self.shadow |= mask;
        self.flush()
    }

    fn clear_bits(&mut self, mask: u32) -> Result<(), HalError> {
        self.shadow &= !mask;
        self.flush()
    }
}

/// Active-low vehicle presence sensor on a GPIO line
pub struct PresenceSensor<P> {
    pin: P,
}

impl<P: InputPin> PresenceSensor<P> {
    pub fn new(pin: P) -> Self {
        Self { pin }
    }

    /// True while a vehicle sits on the sensor
    pub fn is_present(&mut self) -> Result<bool, HalError> {
        self.pin.is_low().map_err(|_| HalError::GpioError)
    }

    /// Give the pin back
    pub fn release(self) -> P {
        self.pin
    }
}

/// Mock peripherals for host-side testing
#[cfg(any(test, feature = "test-utils"))]
pub mod mock {
    use super::*;

    /// In-memory lamp panel recording the full 24-bit mask
    #[derive(Debug, Default)]
    pub struct MockLampBus {
        mask: u32,
    }

    impl MockLampBus {
        pub fn new() -> Self {
            Self::default()
        }

        pub fn mask(&self) -> u32 {
            self.mask
        }

        /// True if every lamp in `mask` is currently on
        pub fn is_lit(&self, mask: u32) -> bool {
            self.mask & mask == mask
        }
    }

    impl LampBus for MockLampBus {
        type Error = HalError;

        fn set_bits(&mut self, mask: u32) -> Result<(), HalError> {
            self.mask |= mask;
            Ok(())
        }

        fn clear_bits(&mut self, mask: u32) -> Result<(), HalError> {
            self.mask &= !mask;
            Ok(())
        }
    }

    /// Status sink recording every notice it is handed
    #[derive(Debug, Default)]
    pub struct MockDisplay {
        pub notices: heapless::Vec<Notice, 32>,
    }

    impl MockDisplay {
        pub fn new() -> Self {
            Self::default()
        }
    }

    impl StatusDisplay for MockDisplay {
        fn notice(&mut self, notice: Notice) {
            // Overflow just drops the event, same as a saturated real sink.
            self.notices.push(notice).ok();
        }
    }
}
