#![deny(unsafe_code)]
#![deny(warnings)]
#![no_main]
#![no_std]

use defmt_rtt as _; // global logger
use panic_probe as _;
use rtic::app;
use rtic_monotonics::stm32::prelude::*;

mod config;
mod console;
mod delay;
mod network;
mod tone;

stm32_tim2_monotonic!(Mono, 1_000_000);

#[app(device = embassy_stm32, peripherals = true, dispatchers = [USART1, USART2, UART4])]
mod app {
    use super::*;
    use defmt::{error, info, unwrap, warn};
    use embassy_futures::join::join3;
    use embassy_stm32::exti::ExtiInput;
    use embassy_stm32::gpio::{Level, Output, OutputOpenDrain, Pull, Speed};
    use embassy_stm32::peripherals;
    use embassy_stm32::rcc::{Hse, HseMode};
    use embassy_stm32::rng::Rng;
    use embassy_stm32::spi::{self, Spi};
    use embassy_stm32::time::Hertz;
    use embassy_time::Delay;
    use rand_core::RngCore;
    use thermo_core::display::{Hd44780, Hd44780Pins};
    use thermo_core::sensors::{Ds18b20, OneWire};
    use thermo_core::{
        connect_network, prepare_display, BootConfig, Monitor, MonitorConfig, SerialLog,
    };

    use config::{SerialConfig, StoreConfig, WifiConfig, LCD_COLUMNS, LCD_ROWS};
    use console::Console;
    use delay::MonoDelay;
    use network::{FirebaseStore, WifiLink};
    use tone::PwmTone;

    type Pin<P> = embassy_stm32::Peri<'static, P>;

    /// Character LCD, temperature sensor, buzzer and console
    struct DevicePeripherals {
        lcd_rs: Pin<peripherals::PA5>,
        lcd_en: Pin<peripherals::PA6>,
        lcd_d4: Pin<peripherals::PA7>,
        lcd_d5: Pin<peripherals::PC4>,
        lcd_d6: Pin<peripherals::PC5>,
        lcd_d7: Pin<peripherals::PB9>,
        one_wire: Pin<peripherals::PA4>,
        buzzer_timer: Pin<peripherals::TIM4>,
        buzzer: Pin<peripherals::PB8>,
        console: Pin<peripherals::USART3>,
        console_tx: Pin<peripherals::PB10>,
    }

    /// ESP32 co-processor on SPI2
    struct NetworkPeripherals {
        spi: Pin<peripherals::SPI2>,
        sck: Pin<peripherals::PB13>,
        mosi: Pin<peripherals::PB15>,
        miso: Pin<peripherals::PB14>,
        cs: Pin<peripherals::PC6>,
        reset: Pin<peripherals::PC3>,
        handshake: Pin<peripherals::PC2>,
        handshake_exti: Pin<peripherals::EXTI2>,
        ready: Pin<peripherals::PC7>,
        ready_exti: Pin<peripherals::EXTI7>,
        dma_tx: Pin<peripherals::DMA1_CH4>,
        dma_rx: Pin<peripherals::DMA1_CH3>,
        rng: Pin<peripherals::RNG>,
    }

    // RNG interrupt binding for hardware random number generator
    embassy_stm32::bind_interrupts!(struct RngIrqs {
        RNG => embassy_stm32::rng::InterruptHandler<peripherals::RNG>;
    });

    #[shared]
    struct Shared {}

    #[local]
    struct Local {}

    #[init]
    fn init(_cx: init::Context) -> (Shared, Local) {
        info!("Temperature monitor starting...");

        // Adafruit Feather STM32F405: 12 MHz HSE
        let mut config = embassy_stm32::Config::default();
        config.rcc.hse = Some(Hse {
            freq: Hertz(12_000_000),
            mode: HseMode::Oscillator,
        });

        // HSE (12 MHz) / PREDIV(6) = 2 MHz (PLL input)
        // 2 MHz * MUL(168) = 336 MHz (VCO)
        // VCO / DIVP(4) = 84 MHz (SYSCLK)
        // VCO / DIVQ(7) = 48 MHz (RNG clock)
        config.rcc.pll_src = embassy_stm32::rcc::PllSource::HSE;
        config.rcc.pll = Some(embassy_stm32::rcc::Pll {
            prediv: embassy_stm32::rcc::PllPreDiv::DIV6,
            mul: embassy_stm32::rcc::PllMul::MUL168,
            divp: Some(embassy_stm32::rcc::PllPDiv::DIV4),
            divq: Some(embassy_stm32::rcc::PllQDiv::DIV7),
            divr: None,
        });
        config.rcc.sys = embassy_stm32::rcc::Sysclk::PLL1_P;
        config.rcc.ahb_pre = embassy_stm32::rcc::AHBPrescaler::DIV1; // 84 MHz
        config.rcc.apb1_pre = embassy_stm32::rcc::APBPrescaler::DIV2; // 42 MHz
        config.rcc.apb2_pre = embassy_stm32::rcc::APBPrescaler::DIV1; // 84 MHz

        let p = embassy_stm32::init(config);
        info!("PLL configured: SYSCLK=84MHz, PLLQ=48MHz for RNG");

        // TIM2 on APB1: timer clock = 2*APB1 when prescaler != 1
        Mono::start(84_000_000);
        info!("TIM2 monotonic timer initialized at 1 MHz");

        let devices = DevicePeripherals {
            lcd_rs: p.PA5,
            lcd_en: p.PA6,
            lcd_d4: p.PA7,
            lcd_d5: p.PC4,
            lcd_d6: p.PC5,
            lcd_d7: p.PB9,
            one_wire: p.PA4,
            buzzer_timer: p.TIM4,
            buzzer: p.PB8,
            console: p.USART3,
            console_tx: p.PB10,
        };

        let net_periph = NetworkPeripherals {
            spi: p.SPI2,
            sck: p.PB13,
            mosi: p.PB15,
            miso: p.PB14,
            cs: p.PC6,
            reset: p.PC3,
            handshake: p.PC2,
            handshake_exti: p.EXTI2,
            ready: p.PC7,
            ready_exti: p.EXTI7,
            dma_tx: p.DMA1_CH4,
            dma_rx: p.DMA1_CH3,
            rng: p.RNG,
        };

        monitor_task::spawn(devices, net_periph).ok();

        (Shared {}, Local {})
    }

    /// The whole application: device setup, Wi-Fi bring-up, control loop
    ///
    /// The network stack is !Send and must remain within this task, so the
    /// Wi-Fi and IP runners are driven here next to the application.
    #[task(priority = 1)]
    async fn monitor_task(
        _cx: monitor_task::Context,
        devices: DevicePeripherals,
        net: NetworkPeripherals,
    ) -> ! {
        use embassy_net::{Config, StackResources};
        use static_cell::StaticCell;

        // Buzzer first so it is silent while the rest comes up
        let tone = PwmTone::new(devices.buzzer_timer, devices.buzzer);

        let lcd_pins = Hd44780Pins {
            rs: Output::new(devices.lcd_rs, Level::Low, Speed::Low),
            en: Output::new(devices.lcd_en, Level::Low, Speed::Low),
            d4: Output::new(devices.lcd_d4, Level::Low, Speed::Low),
            d5: Output::new(devices.lcd_d5, Level::Low, Speed::Low),
            d6: Output::new(devices.lcd_d6, Level::Low, Speed::Low),
            d7: Output::new(devices.lcd_d7, Level::Low, Speed::Low),
        };
        let mut display = match Hd44780::new_4bit(lcd_pins, Delay, LCD_COLUMNS, LCD_ROWS) {
            Ok(display) => display,
            Err(e) => defmt::panic!("LCD init failed: {}", defmt::Debug2Format(&e)),
        };
        info!("LCD initialized ({}x{})", LCD_COLUMNS, LCD_ROWS);

        let bus_pin = OutputOpenDrain::new(devices.one_wire, Level::High, Speed::Low);
        let sensor = Ds18b20::new(unwrap!(OneWire::new(bus_pin, Delay)), MonoDelay);

        let serial = SerialConfig::default();
        let mut log = SerialLog::new(unwrap!(Console::new(
            devices.console,
            devices.console_tx,
            serial.baud_rate,
        )));
        info!("Console on USART3 at {} baud", serial.baud_rate);

        let boot = BootConfig::default();
        let mut delay = MonoDelay;
        if let Err(e) = prepare_display(&mut display, &mut delay, &boot).await {
            warn!("LCD boot screen failed: {}", defmt::Debug2Format(&e));
        }

        // Wi-Fi co-processor
        let mut spi_config = spi::Config::default();
        spi_config.frequency = Hertz(10_000_000);
        let spi = Spi::new(
            net.spi,
            net.sck,
            net.mosi,
            net.miso,
            net.dma_tx,
            net.dma_rx,
            spi_config,
        );
        let wifi_periph = network::wifi::WifiPeripherals {
            spi,
            cs: Output::new(net.cs, Level::High, Speed::VeryHigh),
            reset: Output::new(net.reset, Level::High, Speed::Low),
            handshake: ExtiInput::new(net.handshake, net.handshake_exti, Pull::Down),
            ready: ExtiInput::new(net.ready, net.ready_exti, Pull::Down),
        };
        let (device, control, wifi_runner) = network::wifi::init_esp_hosted(wifi_periph).await;

        let mut rng = Rng::new(net.rng, RngIrqs);
        static RESOURCES: StaticCell<StackResources<3>> = StaticCell::new();
        let (stack, mut net_runner) = embassy_net::new(
            device,
            Config::dhcpv4(Default::default()),
            RESOURCES.init(StackResources::new()),
            rng.next_u64(),
        );
        info!("Network stack initialized with DHCP");

        let app_logic = async move {
            let mut link = WifiLink::new(control, stack);
            let credentials = WifiConfig::default().credentials();
            if let Err(e) = connect_network(
                &mut link,
                &mut display,
                &mut log,
                &mut delay,
                &credentials,
                &boot,
            )
            .await
            {
                // only reachable with a connect timeout configured
                error!("Wi-Fi bring-up failed: {}", e);
            }

            log.println(format_args!("Initializing the app..."));
            let store_config = StoreConfig::default();
            if !store_config.verify_server {
                warn!("TLS server certificate verification is disabled");
            }
            let store = match FirebaseStore::new(stack, rng, &store_config) {
                Ok(store) => store,
                Err(e) => defmt::panic!("Invalid database URL: {}", e),
            };

            let mut monitor = Monitor::new(
                sensor,
                display,
                tone,
                store,
                log,
                MonitorConfig::default(),
            );
            info!("Entering control loop");
            monitor.run(&mut delay).await
        };

        let (never, ..) = join3(wifi_runner.run(), net_runner.run(), app_logic).await;
        never
    }

    /// RTIC idle task - WFI sleep mode when no tasks active
    #[idle]
    fn idle(_cx: idle::Context) -> ! {
        info!("Idle task started - entering WFI loop");
        loop {
            cortex_m::asm::wfi();
        }
    }
}
