#![deny(unsafe_code)]
#![deny(warnings)]
//! Diagnostic console on USART3
//!
//! Transmit only. Wrapped so it implements the `embedded-io` version the
//! rest of the firmware uses.

use embassy_stm32::mode::Blocking;
use embassy_stm32::peripherals::{PB10, USART3};
use embassy_stm32::usart::{self, ConfigError, UartTx};
use embassy_stm32::Peri;
use embedded_io::{ErrorKind, ErrorType, Write};

/// Blocking UART transmitter
pub struct Console {
    tx: UartTx<'static, Blocking>,
}

impl Console {
    pub fn new(
        usart: Peri<'static, USART3>,
        tx_pin: Peri<'static, PB10>,
        baud_rate: u32,
    ) -> Result<Self, ConfigError> {
        let mut config = usart::Config::default();
        config.baudrate = baud_rate;
        Ok(Self {
            tx: UartTx::new_blocking(usart, tx_pin, config)?,
        })
    }
}

impl ErrorType for Console {
    type Error = ErrorKind;
}

impl Write for Console {
    fn write(&mut self, buf: &[u8]) -> Result<usize, Self::Error> {
        self.tx.blocking_write(buf).map_err(|_| ErrorKind::Other)?;
        Ok(buf.len())
    }

    fn flush(&mut self) -> Result<(), Self::Error> {
        self.tx.blocking_flush().map_err(|_| ErrorKind::Other)
    }
}
