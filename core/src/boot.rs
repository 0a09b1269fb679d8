//! Startup sequence before the control loop
//!
//! The link is brought up exactly once. There is no reconnection logic
//! anywhere: if the link drops later, writes simply fail and get logged.

use embedded_hal_async::delay::DelayNs;
use hal_abstractions::{CharacterDisplay, NetworkLink, WifiCredentials};

use crate::config::BootConfig;
use crate::console::SerialLog;
use crate::display::{CONNECTED_TEXT, CONNECTING_TEXT};
use crate::wait::{wait_until, ReadyCheck, WaitError, WaitPolicy};

/// Give the panel time to come up, then blank it
pub async fn prepare_display<L, D>(
    display: &mut L,
    delay: &mut D,
    config: &BootConfig,
) -> Result<(), L::Error>
where
    L: CharacterDisplay,
    D: DelayNs,
{
    delay.delay_ms(config.display_settle_ms).await;
    display.clear()
}

/// Link status as a [`ReadyCheck`], logging every unsuccessful interval
struct LinkUp<'a, N, W> {
    link: &'a mut N,
    log: &'a mut SerialLog<W>,
}

impl<N, W> ReadyCheck for LinkUp<'_, N, W>
where
    N: NetworkLink,
    W: embedded_io::Write,
{
    async fn is_ready(&mut self) -> bool {
        self.link.is_connected().await
    }

    fn on_pending(&mut self, _attempt: u32) {
        self.log.println(format_args!("Connecting to Wi-Fi..."));
    }
}

/// Join the network and block until the link is up
///
/// Shows `Connecting...` while waiting and `WiFi Connected` once done. A
/// failed first attempt is logged and the status poll continues, leaving
/// retries to the link. With `connect_timeout_ms == None` this only returns
/// once connected; otherwise it gives up with [`WaitError::Timeout`].
pub async fn connect_network<N, L, W, D>(
    link: &mut N,
    display: &mut L,
    log: &mut SerialLog<W>,
    delay: &mut D,
    credentials: &WifiCredentials,
    config: &BootConfig,
) -> Result<(), WaitError>
where
    N: NetworkLink,
    L: CharacterDisplay,
    W: embedded_io::Write,
    D: DelayNs,
{
    if let Err(e) = link.begin(credentials).await {
        log.println(format_args!("Wi-Fi connect failed: {:?}", e));
    }
    let _ = display
        .set_cursor(0, 0)
        .and_then(|()| display.write_str(CONNECTING_TEXT));

    let policy = WaitPolicy {
        interval_ms: config.connect_poll_ms,
        timeout_ms: config.connect_timeout_ms,
    };
    let mut check = LinkUp {
        link: &mut *link,
        log: &mut *log,
    };
    wait_until(&mut check, delay, policy).await?;

    let _ = display
        .set_cursor(0, 1)
        .and_then(|()| display.write_str(CONNECTED_TEXT));
    log.println(format_args!("Wi-Fi connected"));
    delay.delay_ms(config.connected_hold_ms).await;
    Ok(())
}
