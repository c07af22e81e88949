#![no_main]
#![no_std]

// sets default panic handler
#[allow(unused_imports)]
use panic_itm;

use core::cell::RefCell;
use core::sync::atomic::{AtomicU32, Ordering};

use cortex_m::{
    asm::wfi,
    interrupt::{self as critical, Mutex},
    peripheral::NVIC,
};
// provides _start symbol
use cortex_m_rt::entry;

use heapless::{i, spsc::Queue};

use stm32f3xx_hal as stm32f303;

use stm32f303::{
    delay::Delay,
    gpio::{gpiod::PDx, Input, PullUp},
    pac::{self, interrupt, TIM2},
    prelude::*,
    timer::{Event as TimerEvent, Timer},
};

#[allow(unused_imports)]
use log::{debug, error, info, trace, warn};
use peripherals::{freeze_clocks, logger::*, ppu, SwitchPins};

use says::{Capture, Debouncer, EventQueue, ResponsePhase, Session};

mod context;
use context::DiscoveryContext;

/// Switch scan and capture frequency
const SCAN_HZ: u32 = 100;

static PHASE: ResponsePhase = ResponsePhase::new();
static TICKS: AtomicU32 = AtomicU32::new(0);
static mut EVENTS: EventQueue = Queue(i::Queue::new());

/// Everything the capture task owns, handed to the TIM2 handler once configured
struct Scanner {
    timer: Timer<TIM2>,
    pins: SwitchPins<PDx<Input<PullUp>>>,
    debouncer: Debouncer,
    capture: Capture<'static>,
}

static SCANNER: Mutex<RefCell<Option<Scanner>>> = Mutex::new(RefCell::new(None));

#[interrupt]
fn TIM2() {
    TICKS.fetch_add(1, Ordering::Relaxed);
    critical::free(|cs| {
        if let Some(scanner) = SCANNER.borrow(cs).borrow_mut().as_mut() {
            // clears the update flag
            let _ = scanner.timer.wait();
            scanner.debouncer.update(scanner.pins.sample());
            scanner.capture.poll(&mut scanner.debouncer);
        }
    });
}

#[entry]
fn main() -> ! {
    let cp = cortex_m::Peripherals::take().expect("Failed requesting peripherals");
    let dp = pac::Peripherals::take().expect("Failed requesting peripherals");

    let logger = create_itm_logger::<InterruptFree>(LevelFilter::Info, cp.ITM);
    unsafe { init(&logger) }
    info!("init process started");

    info!("configuring clocks");
    let mut flash = dp.FLASH.constrain();
    let mut rcc = dp.RCC.constrain();

    let sysclk_freq = 36.mhz();
    let clocks = freeze_clocks(sysclk_freq, rcc.cfgr, &mut flash);
    let mut delay = Delay::new(cp.SYST, clocks);

    let mut gpiob = dp.GPIOB.split(&mut rcc.ahb);
    let mut gpiod = dp.GPIOD.split(&mut rcc.ahb);
    let mut gpioe = dp.GPIOE.split(&mut rcc.ahb);

    info!("configuring ssd1306 display via spi2");
    let rst = gpiob
        .pb0
        .into_push_pull_output(&mut gpiob.moder, &mut gpiob.otyper);
    let dc = gpiob
        .pb1
        .into_push_pull_output(&mut gpiob.moder, &mut gpiob.otyper);
    let cs = gpiob
        .pb11
        .into_push_pull_output(&mut gpiob.moder, &mut gpiob.otyper);

    let sck = gpiob.pb13.into_af5(&mut gpiob.moder, &mut gpiob.afrh);
    let miso = gpiob.pb14.into_af5(&mut gpiob.moder, &mut gpiob.afrh);
    let mosi = gpiob.pb15.into_af5(&mut gpiob.moder, &mut gpiob.afrh);

    let display = ppu::init_ssd1306_on_spi2(
        8.mhz(),
        dp.SPI2,
        (sck, miso, mosi),
        (cs, dc, rst),
        &mut rcc.apb1,
        &mut delay,
        clocks,
    );

    info!("configuring status led on pe9");
    let led = gpioe
        .pe9
        .into_push_pull_output(&mut gpioe.moder, &mut gpioe.otyper);

    info!("configuring switches on pd8..pd13");
    let pins = SwitchPins::new([
        gpiod
            .pd8
            .into_pull_up_input(&mut gpiod.moder, &mut gpiod.pupdr)
            .downgrade(),
        gpiod
            .pd9
            .into_pull_up_input(&mut gpiod.moder, &mut gpiod.pupdr)
            .downgrade(),
        gpiod
            .pd10
            .into_pull_up_input(&mut gpiod.moder, &mut gpiod.pupdr)
            .downgrade(),
        gpiod
            .pd11
            .into_pull_up_input(&mut gpiod.moder, &mut gpiod.pupdr)
            .downgrade(),
        gpiod
            .pd12
            .into_pull_up_input(&mut gpiod.moder, &mut gpiod.pupdr)
            .downgrade(),
        gpiod
            .pd13
            .into_pull_up_input(&mut gpiod.moder, &mut gpiod.pupdr)
            .downgrade(),
    ]);

    // EVENTS is split exactly once, before the scan interrupt is unmasked
    let (producer, consumer) = unsafe { EVENTS.split() };

    info!("configuring tim2 scan at {}hz", SCAN_HZ);
    let mut timer = Timer::tim2(dp.TIM2, SCAN_HZ.hz(), clocks, &mut rcc.apb1);
    timer.listen(TimerEvent::Update);
    critical::free(|cs| {
        SCANNER.borrow(cs).replace(Some(Scanner {
            timer,
            pins,
            debouncer: Debouncer::new(),
            capture: Capture::new(producer, &PHASE),
        }));
    });
    unsafe { NVIC::unmask(pac::Interrupt::TIM2) }

    let ctx = DiscoveryContext::new(display, led, delay, &TICKS);
    let mut session = Session::new(ctx, &PHASE, consumer);
    session.greet();
    info!("init process finished");

    loop {
        match session.tick() {
            Ok(state) => debug!("session entered {:?}", state),
            Err(nb::Error::WouldBlock) => wfi(),
            Err(nb::Error::Other(err)) => panic!("Session crashed: {}", err),
        }
    }
}
