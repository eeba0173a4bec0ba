//! Serial status console on USART3, the ST-LINK virtual COM port of the Nucleo board.
//!
//! The console is write only and blocking, which keeps status output in tick order.

use core::fmt;

use embassy_stm32::mode::Blocking;
use embassy_stm32::usart::UartTx;

/// Opens USART3 (TX on PD8) at [crate::config::UART_BAUDRATE] as a [SerialConsole].
///
/// Evaluates to `Result<SerialConsole, InitError>`.
#[macro_export]
macro_rules! setup_usart_status_console {
    ($p:ident) => {{
        let mut config = embassy_stm32::usart::Config::default();
        config.baudrate = $crate::config::UART_BAUDRATE;
        embassy_stm32::usart::UartTx::new_blocking($p.USART3, $p.PD8, config)
            .map($crate::uart::SerialConsole::new)
            .map_err(|_| $crate::error::InitError::Uart)
    }};
}

pub struct SerialConsole<'d> {
    tx: UartTx<'d, Blocking>,
}

impl<'d> SerialConsole<'d> {
    pub fn new(tx: UartTx<'d, Blocking>) -> Self {
        Self { tx }
    }
}

impl fmt::Write for SerialConsole<'_> {
    fn write_str(&mut self, s: &str) -> fmt::Result {
        self.tx.blocking_write(s.as_bytes()).map_err(|err| {
            warn!("USART write failed: {}", err);
            fmt::Error
        })
    }
}
