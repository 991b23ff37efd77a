//! Ingest task: drain and dispatch remote commands
//!
//! Low-rate control-plane activity. Each tick drains everything the control
//! channel has queued (commands-drained-per-tick, not one-per-tick, so a
//! burst cannot build a backlog) and dispatches each recognized command.

use super::commands::{dispatch, Command, CommandContext};
use super::control::ControlChannel;
use crate::parameters::store::SettingsStore;
use crate::platform::traits::SystemControl;
use embassy_time::{Duration, Ticker};

/// Ingest task timing
#[derive(Debug, Clone, Copy)]
pub struct IngestConfig {
    /// Tick period (100 ms = 10 Hz polling)
    pub period: Duration,
}

impl Default for IngestConfig {
    fn default() -> Self {
        Self {
            period: Duration::from_millis(100),
        }
    }
}

/// One ingest tick: drain the channel, dispatch what parses
pub async fn ingest_cycle<C, P, R>(channel: &mut C, ctx: &mut CommandContext<'_, P, R>)
where
    C: ControlChannel,
    P: SettingsStore,
    R: SystemControl,
{
    while let Some(msg) = channel.try_next() {
        match Command::parse(&msg) {
            Some(cmd) => dispatch(cmd, ctx).await,
            None => {
                crate::log_debug!("ignoring unrecognized command: {}", msg.name.as_str());
            }
        }
    }
}

/// Ingest task loop
pub async fn run_ingest_task<C, P, R>(
    mut channel: C,
    mut ctx: CommandContext<'_, P, R>,
    config: IngestConfig,
) where
    C: ControlChannel,
    P: SettingsStore,
    R: SystemControl,
{
    let mut ticker = Ticker::every(config.period);
    loop {
        ticker.next().await;
        ingest_cycle(&mut channel, &mut ctx).await;
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::communication::control::ControlMessage;
    use crate::parameters::node::SharedNodeConfig;
    use crate::platform::mock::{MockControlChannel, MockStore, MockSystem};
    use crate::subsystems::ahrs::state::{SharedTrackerState, TrackerMode};
    use embassy_futures::block_on;
    use embassy_sync::blocking_mutex::raw::CriticalSectionRawMutex;
    use embassy_sync::mutex::Mutex;
    use embassy_sync::signal::Signal;

    struct Fixture {
        state: SharedTrackerState,
        config: SharedNodeConfig,
        store: Mutex<CriticalSectionRawMutex, MockStore>,
        notify: Signal<CriticalSectionRawMutex, ()>,
        system: MockSystem,
    }

    impl Fixture {
        fn new() -> Self {
            Self {
                state: SharedTrackerState::new(5),
                config: SharedNodeConfig::default(),
                store: Mutex::new(MockStore::new()),
                notify: Signal::new(),
                system: MockSystem::new(),
            }
        }

        fn ctx(&mut self) -> CommandContext<'_, MockStore, MockSystem> {
            CommandContext {
                state: &self.state,
                config: &self.config,
                store: &self.store,
                notify: &self.notify,
                system: &mut self.system,
                lock_timeout: Duration::from_millis(100),
            }
        }
    }

    #[test]
    fn drains_all_queued_commands_in_one_tick() {
        let mut fx = Fixture::new();
        let mut channel = MockControlChannel::new();
        channel.queue(ControlMessage::new("set-identity", Some("stick-07")).unwrap());
        channel.queue(ControlMessage::new("start-calibration", None).unwrap());

        block_on(async {
            let mut ctx = fx.ctx();
            ingest_cycle(&mut channel, &mut ctx).await;
        });

        assert!(channel.is_empty());
        assert_eq!(fx.config.snapshot().identity.as_str(), "stick-07");
        let tracker = fx.state.try_lock().unwrap();
        assert_eq!(tracker.mode, TrackerMode::Calibrating);
    }

    #[test]
    fn set_destination_updates_config_and_persists_once() {
        let mut fx = Fixture::new();
        let mut channel = MockControlChannel::new();
        channel.queue(ControlMessage::new("set-destination", Some("host:9000")).unwrap());

        block_on(async {
            let mut ctx = fx.ctx();
            ingest_cycle(&mut channel, &mut ctx).await;
        });

        assert_eq!(fx.config.snapshot().destination.as_str(), "host:9000");
        let store = fx.store.try_lock().unwrap();
        assert_eq!(store.destination_writes, 1);
        assert_eq!(store.stored_destination(), Some("host:9000"));
        assert!(fx.notify.try_take().is_some());
    }

    #[test]
    fn unrecognized_commands_change_nothing_and_raise_no_signal() {
        let mut fx = Fixture::new();
        let mut channel = MockControlChannel::new();
        channel.queue(ControlMessage::new("warp-drive", Some("engage")).unwrap());

        block_on(async {
            let mut ctx = fx.ctx();
            ingest_cycle(&mut channel, &mut ctx).await;
        });

        assert_eq!(fx.config.snapshot(), SharedNodeConfig::default().snapshot());
        assert!(fx.notify.try_take().is_none());
        let tracker = fx.state.try_lock().unwrap();
        assert_eq!(tracker.mode, TrackerMode::Tracking);
    }

    #[test]
    fn reset_sensor_flags_the_acquire_task() {
        let mut fx = Fixture::new();
        let mut channel = MockControlChannel::new();
        channel.queue(ControlMessage::new("reset-sensor", None).unwrap());

        block_on(async {
            let mut ctx = fx.ctx();
            ingest_cycle(&mut channel, &mut ctx).await;
        });

        let tracker = fx.state.try_lock().unwrap();
        assert!(tracker.reinit_requested);
    }

    #[test]
    fn restart_reaches_the_system_collaborator() {
        let mut fx = Fixture::new();
        let mut channel = MockControlChannel::new();
        channel.queue(ControlMessage::new("restart", None).unwrap());

        block_on(async {
            let mut ctx = fx.ctx();
            ingest_cycle(&mut channel, &mut ctx).await;
        });

        assert_eq!(fx.system.restarts, 1);
        assert!(fx.notify.try_take().is_some());
    }

    #[test]
    fn repeated_start_calibration_resets_the_window() {
        let mut fx = Fixture::new();
        {
            let mut tracker = fx.state.try_lock().unwrap();
            tracker.mode = TrackerMode::Calibrating;
            tracker.window.push(nalgebra::Vector3::new(1.0, 1.0, 1.0));
            assert_eq!(tracker.window.count(), 1);
        }

        let mut channel = MockControlChannel::new();
        channel.queue(ControlMessage::new("start-calibration", None).unwrap());
        block_on(async {
            let mut ctx = fx.ctx();
            ingest_cycle(&mut channel, &mut ctx).await;
        });

        let tracker = fx.state.try_lock().unwrap();
        assert_eq!(tracker.mode, TrackerMode::Calibrating);
        assert_eq!(tracker.window.count(), 0);
    }
}
