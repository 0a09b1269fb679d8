#![deny(unsafe_code)]
#![deny(warnings)]
//! Wi-Fi through an ESP32 running esp-hosted
//!
//! The ESP32 sits on SPI2 and shows up as an Ethernet-like device for
//! embassy-net. `Control` joins the network; DHCP then configures the stack.

use defmt::{info, warn, Debug2Format};
use embassy_embedded_hal::shared_bus::asynch::spi::SpiDevice as SpiDeviceBus;
use embassy_net::Stack;
use embassy_net_esp_hosted::{Control, NetDriver, Runner, State};
use embassy_stm32::exti::ExtiInput;
use embassy_stm32::gpio::Output;
use embassy_stm32::mode::Async;
use embassy_stm32::spi::Spi;
use embassy_sync::blocking_mutex::raw::CriticalSectionRawMutex;
use hal_abstractions::{NetworkLink, WifiCredentials};
use static_cell::StaticCell;

type SpiDevice =
    SpiDeviceBus<'static, CriticalSectionRawMutex, Spi<'static, Async>, Output<'static>>;

/// Runner type; must be polled continuously for the co-processor to work
pub type WifiRunner = Runner<'static, SpiDevice, ExtiInput<'static>, Output<'static>>;

/// Co-processor peripherals bundle
pub struct WifiPeripherals {
    pub spi: Spi<'static, Async>,
    pub cs: Output<'static>,
    pub reset: Output<'static>,
    pub handshake: ExtiInput<'static>,
    pub ready: ExtiInput<'static>,
}

/// Reset the ESP32 and set up the driver
pub async fn init_esp_hosted(
    periph: WifiPeripherals,
) -> (NetDriver<'static>, Control<'static>, WifiRunner) {
    let WifiPeripherals {
        spi,
        cs,
        reset,
        handshake,
        ready,
    } = periph;

    type SpiBusType = embassy_sync::mutex::Mutex<CriticalSectionRawMutex, Spi<'static, Async>>;
    static SPI_BUS: StaticCell<SpiBusType> = StaticCell::new();
    let spi_bus = SPI_BUS.init(embassy_sync::mutex::Mutex::new(spi));
    let spi_device = SpiDeviceBus::new(spi_bus, cs);

    static STATE: StaticCell<State> = StaticCell::new();
    let state = STATE.init(State::new());

    info!("Resetting ESP32 co-processor...");
    let parts = embassy_net_esp_hosted::new(state, spi_device, handshake, ready, reset).await;
    info!("esp-hosted driver initialized");
    parts
}

/// [`NetworkLink`] over esp-hosted and the embassy-net stack
///
/// A failed join is retried on the next status poll, so the boot sequence
/// keeps waiting until the access point accepts us.
pub struct WifiLink {
    control: Control<'static>,
    stack: Stack<'static>,
    initialized: bool,
    pending: Option<WifiCredentials>,
}

impl WifiLink {
    pub fn new(control: Control<'static>, stack: Stack<'static>) -> Self {
        Self {
            control,
            stack,
            initialized: false,
            pending: None,
        }
    }

    async fn join(
        &mut self,
        credentials: &WifiCredentials,
    ) -> Result<(), embassy_net_esp_hosted::Error> {
        if !self.initialized {
            self.control.init().await?;
            self.initialized = true;
        }
        info!("Joining {}", credentials);
        self.control
            .connect(credentials.ssid, credentials.password)
            .await
    }
}

impl NetworkLink for WifiLink {
    type Error = embassy_net_esp_hosted::Error;

    async fn begin(&mut self, credentials: &WifiCredentials) -> Result<(), Self::Error> {
        let result = self.join(credentials).await;
        self.pending = match result {
            Ok(()) => None,
            Err(_) => Some(*credentials),
        };
        result
    }

    async fn is_connected(&mut self) -> bool {
        if let Some(credentials) = self.pending {
            match self.join(&credentials).await {
                Ok(()) => self.pending = None,
                Err(e) => warn!("Join failed: {:?}", Debug2Format(&e)),
            }
        }
        let up = self.stack.is_link_up() && self.stack.is_config_up();
        if up {
            if let Some(config) = self.stack.config_v4() {
                let octets = config.address.address().octets();
                info!(
                    "IP: {}.{}.{}.{}",
                    octets[0], octets[1], octets[2], octets[3]
                );
            }
        }
        up
    }
}
