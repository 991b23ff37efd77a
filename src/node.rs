//! Node wiring: startup and the fixed task set
//!
//! Pulls the collaborators together, restores persisted settings, brings the
//! sensor up and then runs the four periodic activities concurrently. There
//! is no dynamic task creation: the task set is fixed at startup.
//!
//! [`Node::run`] joins the loops cooperatively on the caller's executor.
//! An embedder that wants hard priority separation (acquire above publish
//! above control-plane) spawns the individual `run_*_task` loops on
//! priority-pinned executors instead; every loop is a plain async fn, so
//! both arrangements use the same code.

use crate::communication::commands::CommandContext;
use crate::communication::control::ControlChannel;
use crate::communication::task::{run_ingest_task, IngestConfig};
use crate::communication::transport::TelemetryTransport;
use crate::devices::traits::{ImuError, ImuSensor};
use crate::parameters::node::{NodeConfig, SharedNodeConfig};
use crate::parameters::store::SettingsStore;
use crate::platform::traits::{Indicator, SystemControl};
use crate::subsystems::ahrs::bias::DEFAULT_WINDOW;
use crate::subsystems::ahrs::fusion::FusionFilter;
use crate::subsystems::ahrs::reader::ImuReader;
use crate::subsystems::ahrs::state::SharedTrackerState;
use crate::subsystems::ahrs::task::{run_acquire_task, AcquireConfig};
use crate::subsystems::indicator::task::run_indicator_task;
use crate::subsystems::telemetry::task::{run_publish_task, PublishConfig};
use embassy_futures::join::join4;
use embassy_sync::blocking_mutex::raw::CriticalSectionRawMutex;
use embassy_sync::mutex::Mutex;
use embassy_sync::signal::Signal;

/// Fatal startup error
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum StartupError {
    /// Sensor bring-up failed; surfaced to the operator, not retried
    Sensor(ImuError),
}

/// All external collaborators of the node
pub struct NodePeripherals<S, F, T, C, P, R, I> {
    pub sensor: S,
    pub fusion: F,
    pub transport: T,
    pub control: C,
    pub store: P,
    pub system: R,
    pub indicator: I,
}

/// Timing of the periodic tasks
#[derive(Debug, Clone, Copy, Default)]
pub struct NodeTiming {
    pub acquire: AcquireConfig,
    pub publish: PublishConfig,
    pub ingest: IngestConfig,
}

/// Calibration window length and acquire rate
#[derive(Debug, Clone, Copy)]
pub struct NodeTuning {
    /// Samples averaged per gyro calibration
    pub calibration_window: usize,

    /// Acquire rate handed to the fusion filter (Hz)
    pub sample_rate_hz: u32,
}

impl Default for NodeTuning {
    fn default() -> Self {
        Self {
            calibration_window: DEFAULT_WINDOW,
            sample_rate_hz: 200,
        }
    }
}

/// An initialized node, ready to run
pub struct Node<S, F, T, C, P, R, I> {
    reader: ImuReader<S, F>,
    transport: T,
    control: C,
    store: P,
    system: R,
    indicator: I,
    initial_config: NodeConfig,
    timing: NodeTiming,
    tuning: NodeTuning,
}

impl<S, F, T, C, P, R, I> Node<S, F, T, C, P, R, I>
where
    S: ImuSensor,
    F: FusionFilter,
    T: TelemetryTransport,
    C: ControlChannel,
    P: SettingsStore,
    R: SystemControl,
    I: Indicator,
{
    /// Restore persisted settings and bring the sensor up
    ///
    /// Sensor failure here is fatal: it propagates out and the node never
    /// starts.
    pub async fn init(
        mut peripherals: NodePeripherals<S, F, T, C, P, R, I>,
        timing: NodeTiming,
        tuning: NodeTuning,
    ) -> Result<Self, StartupError> {
        let bias = peripherals.store.read_gyro_bias();
        let identity = peripherals.store.read_identity();
        let destination = peripherals.store.read_destination();

        let mut reader = ImuReader::new(
            peripherals.sensor,
            peripherals.fusion,
            tuning.sample_rate_hz,
        );
        reader.set_bias(bias);
        reader.initialize().await.map_err(StartupError::Sensor)?;

        crate::log_info!(
            "node up: identity={} destination={}",
            identity.as_str(),
            destination.as_str()
        );

        Ok(Self {
            reader,
            transport: peripherals.transport,
            control: peripherals.control,
            store: peripherals.store,
            system: peripherals.system,
            indicator: peripherals.indicator,
            initial_config: NodeConfig {
                identity,
                destination,
            },
            timing,
            tuning,
        })
    }

    /// Run the four task loops until the process ends
    pub async fn run(mut self) {
        let state = SharedTrackerState::new(self.tuning.calibration_window);
        let config = SharedNodeConfig::new(self.initial_config);
        let store: Mutex<CriticalSectionRawMutex, P> = Mutex::new(self.store);
        let notify: Signal<CriticalSectionRawMutex, ()> = Signal::new();

        let ingest_ctx = CommandContext {
            state: &state,
            config: &config,
            store: &store,
            notify: &notify,
            system: &mut self.system,
            lock_timeout: self.timing.acquire.lock_timeout,
        };

        join4(
            run_acquire_task(&state, &store, &mut self.reader, self.timing.acquire),
            run_publish_task(&state, &config, self.transport, self.timing.publish),
            run_ingest_task(self.control, ingest_ctx, self.timing.ingest),
            run_indicator_task(&notify, self.indicator),
        )
        .await;
    }
}
