#![no_std]
#![no_main]

use arcade2usb::config::{self, BUTTON_MAP, POLL_MS};
use arcade2usb::{
    ArcadeJoystick, FeedbackHandler, FeedbackReader, FeedbackSignal, PanelSnapshot, SwitchPanel,
    UsbDriver, UsbHidRegistry, UsbHidTransport, REPORT_DESCRIPTOR, REPORT_ID,
};
use arcade_core::{fields, INPUT_REPORT_BITS, OUTPUT_REPORT_BITS};
use defmt::{debug, error, info, warn};
use defmt_rtt as _;
use embassy_executor::Spawner;
use embassy_futures::join::join;
use embassy_rp::bind_interrupts;
use embassy_rp::gpio::{Input, Level, Output, Pull};
use embassy_rp::peripherals::USB;
use embassy_rp::usb::Driver;
use embassy_sync::signal::Signal;
use embassy_time::{Duration, Ticker};
use embassy_usb::class::hid::State;
use embassy_usb::{Builder, Config as UsbConfig, UsbDevice};
use static_cell::StaticCell;

#[cfg(feature = "dev-panic")]
use panic_probe as _;
#[cfg(feature = "prod-panic")]
use panic_reset as _;

bind_interrupts!(struct Irqs {
    USBCTRL_IRQ => embassy_rp::usb::InterruptHandler<USB>;
});

/// Latest vendor output written by the host.
static FEEDBACK_SIGNAL: StaticCell<FeedbackSignal> = StaticCell::new();

/// USB device configuration buffer.
static CONFIG_DESCRIPTOR: StaticCell<[u8; 256]> = StaticCell::new();
static BOS_DESCRIPTOR: StaticCell<[u8; 256]> = StaticCell::new();
static MSOS_DESCRIPTOR: StaticCell<[u8; 256]> = StaticCell::new();
static CONTROL_BUF: StaticCell<[u8; 64]> = StaticCell::new();

/// HID state.
static HID_STATE: StaticCell<State> = StaticCell::new();
/// SET_REPORT handler for the control pipe.
static CONTROL_HANDLER: StaticCell<FeedbackHandler> = StaticCell::new();

#[embassy_executor::main]
async fn main(spawner: Spawner) {
    info!("Arcade-to-USB starting...");

    let p = embassy_rp::init(embassy_rp::config::Config::default());

    let feedback: &'static FeedbackSignal = FEEDBACK_SIGNAL.init(Signal::new());

    log_descriptor_layout();

    // --- Panel Setup ---
    let panel = SwitchPanel {
        up: Input::new(p.PIN_2, Pull::Up),
        down: Input::new(p.PIN_3, Pull::Up),
        left: Input::new(p.PIN_4, Pull::Up),
        right: Input::new(p.PIN_5, Pull::Up),
        buttons: [
            Input::new(p.PIN_6, Pull::Up),
            Input::new(p.PIN_7, Pull::Up),
            Input::new(p.PIN_8, Pull::Up),
            Input::new(p.PIN_9, Pull::Up),
            Input::new(p.PIN_10, Pull::Up),
            Input::new(p.PIN_11, Pull::Up),
            Input::new(p.PIN_12, Pull::Up),
            Input::new(p.PIN_13, Pull::Up),
        ],
        start: Input::new(p.PIN_14, Pull::Up),
        mode: Input::new(p.PIN_15, Pull::Up),
    };

    // --- USB Setup ---
    let usb_driver = Driver::new(p.USB, Irqs);

    let (vid, pid) = config::USB_VID_PID;
    let mut usb_config = UsbConfig::new(vid, pid);
    usb_config.manufacturer = Some(config::USB_MANUFACTURER);
    usb_config.product = Some(config::USB_PRODUCT);
    usb_config.serial_number = Some(config::USB_SERIAL);
    usb_config.max_power = config::USB_MAX_POWER_MA;
    usb_config.max_packet_size_0 = 64;

    let config_descriptor = CONFIG_DESCRIPTOR.init([0; 256]);
    let bos_descriptor = BOS_DESCRIPTOR.init([0; 256]);
    let msos_descriptor = MSOS_DESCRIPTOR.init([0; 256]);
    let control_buf = CONTROL_BUF.init([0; 64]);

    let mut builder = Builder::new(
        usb_driver,
        usb_config,
        config_descriptor,
        bos_descriptor,
        msos_descriptor,
        control_buf,
    );

    // Register the report descriptor before the device is built
    let hid_state = HID_STATE.init(State::new());
    let control_handler = CONTROL_HANDLER.init(FeedbackHandler::new(feedback));
    let registry = UsbHidRegistry::new(&mut builder, hid_state, control_handler);
    let mut joystick = ArcadeJoystick::initialize(registry);
    let reader = defmt::unwrap!(joystick.transport_mut().take_reader());

    // Build the USB device
    let usb_device = builder.build();

    // On-board LED mirrors host feedback bit 0
    let led = Output::new(p.PIN_25, Level::Low);

    // Spawn tasks (unwrap the SpawnToken, then spawn)
    spawner.spawn(usb_task(usb_device, reader, feedback).unwrap());
    spawner.spawn(control_task(joystick, panel, feedback, led).unwrap());

    info!("Arcade-to-USB initialized, waiting for host...");
}

/// Log the report layout the host will see.
fn log_descriptor_layout() {
    info!(
        "Report descriptor: {} bytes, id {}, {} input bits, {} output bits",
        REPORT_DESCRIPTOR.len(),
        REPORT_ID,
        INPUT_REPORT_BITS,
        OUTPUT_REPORT_BITS
    );
    match fields(REPORT_DESCRIPTOR) {
        Ok(fields) => {
            for field in fields.iter() {
                debug!("{:?}", field);
            }
        }
        Err(e) => error!("Report descriptor walk failed: {:?}", e),
    }
}

/// USB device task - runs the USB stack and services host output reports.
#[embassy_executor::task]
async fn usb_task(
    mut device: UsbDevice<'static, UsbDriver<'static>>,
    reader: FeedbackReader<'static>,
    feedback: &'static FeedbackSignal,
) {
    let mut handler = FeedbackHandler::new(feedback);
    join(device.run(), reader.run(true, &mut handler)).await;
}

/// Control task - samples the panel and sends a report whenever it changes.
#[embassy_executor::task]
async fn control_task(
    mut joystick: ArcadeJoystick<UsbHidTransport<'static>>,
    mut panel: SwitchPanel<Input<'static>>,
    feedback: &'static FeedbackSignal,
    mut led: Output<'static>,
) {
    // Wait for USB to be ready
    joystick.transport_mut().wait_ready().await;
    info!("USB HID ready, sending reports...");

    let mut ticker = Ticker::every(Duration::from_millis(u64::from(POLL_MS)));
    let mut last_sent: Option<PanelSnapshot> = None;

    loop {
        ticker.next().await;

        if let Some(output) = feedback.try_take() {
            led.set_level(if output.bit(0) { Level::High } else { Level::Low });
        }

        let snapshot = match panel.read() {
            Ok(snapshot) => snapshot,
            Err(e) => match e {},
        };
        if last_sent == Some(snapshot) {
            continue;
        }

        match joystick.update(&snapshot, &BUTTON_MAP).await {
            Ok(()) => last_sent = Some(snapshot),
            Err(e) if e.is_recoverable() => {
                warn!("Report not sent ({:?}), waiting for host", e);
                last_sent = None;
                joystick.transport_mut().wait_ready().await;
                info!("USB HID ready again");
            }
            Err(e) => {
                // Resending the same snapshot fails the same way; wait for the next change
                error!("Report dropped: {:?}", e);
                last_sent = Some(snapshot);
            }
        }
    }
}
