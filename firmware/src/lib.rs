#![no_std]

//! Embassy task layer wiring the coordination core to hardware
//!
//! Sensor interrupts report into the shared [`SensorLatch`] and push notices
//! onto a channel; the coordinator task polls the core on a fixed cadence
//! and the display task renders whatever the channel delivers. Mock
//! peripherals stand in for the shift-register chain and the status OLED so
//! the whole task graph also runs host-side.

pub use embassy_executor::Spawner;
pub use embassy_time::Duration;
pub use static_cell::StaticCell;

pub use crosslight_core::*;

pub use crate::mock_hardware::*;
pub use crate::tasks::*;

// Mock hardware module
pub mod mock_hardware {
    use core::fmt::Write;

    use crosslight_core::{HalError, LampBus, Notice, StatusDisplay};

    /// In-memory lamp panel standing in for the shift-register chain
    #[derive(Debug, Default)]
    pub struct MockLampPanel {
        mask: u32,
    }

    impl MockLampPanel {
        pub fn new() -> Self {
            #[cfg(feature = "defmt")]
            defmt::info!("🧪 Using mock lamp panel");
            Self { mask: 0 }
        }

        /// Full 24-bit lamp mask as last written
        pub fn mask(&self) -> u32 {
            self.mask
        }

        /// True if every lamp in `mask` is currently on
        pub fn is_lit(&self, mask: u32) -> bool {
            self.mask & mask == mask
        }
    }

    impl LampBus for MockLampPanel {
        type Error = HalError;

        fn set_bits(&mut self, mask: u32) -> Result<(), HalError> {
            let next = self.mask | mask;
            #[cfg(feature = "defmt")]
            if next != self.mask {
                defmt::debug!("💡 lamps {=u32:b}", next);
            }
            self.mask = next;
            Ok(())
        }

        fn clear_bits(&mut self, mask: u32) -> Result<(), HalError> {
            let next = self.mask & !mask;
            #[cfg(feature = "defmt")]
            if next != self.mask {
                defmt::debug!("💡 lamps {=u32:b}", next);
            }
            self.mask = next;
            Ok(())
        }
    }

    /// Mock status display rendering each notice as one text line
    #[derive(Debug, Default)]
    pub struct MockStatusOled {
        line: heapless::String<48>,
    }

    impl MockStatusOled {
        pub fn new() -> Self {
            #[cfg(feature = "defmt")]
            defmt::info!("🧪 Using mock status display");
            Self::default()
        }

        /// The most recently rendered line
        pub fn last_line(&self) -> &str {
            &self.line
        }
    }

    impl StatusDisplay for MockStatusOled {
        fn notice(&mut self, notice: Notice) {
            self.line.clear();
            let _ = match notice {
                Notice::CarActive(lane) => {
                    write!(self.line, "car waiting: lane {}", lane.number())
                }
                Notice::CarInactive(lane) => write!(self.line, "lane {} clear", lane.number()),
                Notice::PedestrianWaiting(crosswalk) => {
                    write!(self.line, "pedestrian waiting: crosswalk {}", crosswalk.number())
                }
                Notice::WalkOn(crosswalk) => {
                    write!(self.line, "walk: crosswalk {}", crosswalk.number())
                }
                Notice::WalkOff(crosswalk) => {
                    write!(self.line, "don't walk: crosswalk {}", crosswalk.number())
                }
            };
            #[cfg(feature = "defmt")]
            defmt::info!("🖥️ {}", self.line.as_str());
        }
    }
}

// Embassy tasks module
pub mod tasks {
    use super::*;
    use embassy_sync::blocking_mutex::raw::CriticalSectionRawMutex;
    use embassy_sync::channel::Channel;
    use embassy_time::Ticker;

    /// Notices queued between interrupt context, the coordinator and the
    /// display task
    pub static NOTICES: Channel<CriticalSectionRawMutex, Notice, 8> = Channel::new();

    /// Coordinator poll cadence
    pub const POLL_INTERVAL: Duration = Duration::from_millis(5);

    /// Display sink that forwards onto the shared notice channel
    ///
    /// Dropping on a full channel is deliberate; status text must never
    /// stall the control loop.
    pub struct NoticeQueue;

    impl StatusDisplay for NoticeQueue {
        fn notice(&mut self, notice: Notice) {
            NOTICES.try_send(notice).ok();
        }
    }

    /// Report a vehicle presence edge from interrupt context
    pub fn report_car_edge(latch: &SensorLatch, lane: Lane, present: bool) {
        if let Some(notice) = latch.car_edge(lane, present) {
            NOTICES.try_send(notice).ok();
        }
    }

    /// Report a crossing button press from interrupt context
    pub fn report_button_press(latch: &SensorLatch, crosswalk: CrosswalkId) {
        if let Some(notice) = latch.request_crossing(crosswalk) {
            NOTICES.try_send(notice).ok();
        }
    }

    /// Poll the coordinator on the fixed cadence
    ///
    /// A lamp bus fault is fatal: the loop stops rather than keep driving a
    /// panel it can no longer trust.
    #[embassy_executor::task]
    pub async fn coordinator_task(
        latch: &'static SensorLatch,
        mut coordinator: Coordinator<MockLampPanel, NoticeQueue>,
    ) {
        #[cfg(feature = "defmt")]
        defmt::info!("🚦 Coordinator task started");
        let clock = EmbassyClock;
        let mut ticker = Ticker::every(POLL_INTERVAL);
        loop {
            if coordinator.poll(latch, clock.now_ticks()).is_err() {
                #[cfg(feature = "defmt")]
                defmt::error!("💥 Lamp bus fault, control loop stopped");
                return;
            }
            ticker.next().await;
        }
    }

    /// Render queued notices on the status display
    #[embassy_executor::task]
    pub async fn display_task(display: &'static mut MockStatusOled) {
        #[cfg(feature = "defmt")]
        defmt::info!("🖥️ Display task started");
        loop {
            let notice = NOTICES.receive().await;
            display.notice(notice);
        }
    }
}
