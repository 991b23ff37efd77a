//! Remote command parsing and dispatch
//!
//! Maps named control messages onto node effects:
//!
//! | command             | payload | effect                                    |
//! |---------------------|---------|-------------------------------------------|
//! | `set-destination`   | address | replace destination, persist it           |
//! | `start-calibration` | none    | enter Calibrating mode                    |
//! | `set-identity`      | string  | replace identity, persist it              |
//! | `reset-sensor`      | none    | reinitialize the sensor, keep bias        |
//! | `restart`           | none    | full node restart                         |
//!
//! Unrecognized or malformed messages are ignored with no state change.

use super::control::{ControlMessage, ARG_MAX};
use crate::parameters::node::SharedNodeConfig;
use crate::parameters::store::SettingsStore;
use crate::platform::traits::SystemControl;
use crate::subsystems::ahrs::state::{SharedTrackerState, TrackerMode};
use embassy_sync::blocking_mutex::raw::CriticalSectionRawMutex;
use embassy_sync::mutex::Mutex;
use embassy_sync::signal::Signal;
use embassy_time::Duration;
use heapless::String;

/// A recognized, well-formed remote command
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Command {
    /// Replace the telemetry destination and persist it
    SetDestination(String<ARG_MAX>),
    /// Enter gyro bias calibration mode
    StartCalibration,
    /// Replace the node identity and persist it
    SetIdentity(String<ARG_MAX>),
    /// Reinitialize the sensor, reapplying the last known bias
    ResetSensor,
    /// Full node restart
    Restart,
}

impl Command {
    /// Parse a control message; `None` for unknown names or bad payloads
    pub fn parse(msg: &ControlMessage) -> Option<Command> {
        match (msg.name.as_str(), msg.arg.as_ref()) {
            ("set-destination", Some(arg)) => Some(Command::SetDestination(arg.clone())),
            ("start-calibration", None) => Some(Command::StartCalibration),
            ("set-identity", Some(arg)) => Some(Command::SetIdentity(arg.clone())),
            ("reset-sensor", None) => Some(Command::ResetSensor),
            ("restart", None) => Some(Command::Restart),
            _ => None,
        }
    }
}

/// Everything a dispatched command may touch
pub struct CommandContext<'a, P: SettingsStore, R: SystemControl> {
    /// Tracker state (mode flips, reinit requests)
    pub state: &'a SharedTrackerState,

    /// Identity/destination pair
    pub config: &'a SharedNodeConfig,

    /// Persistence collaborator
    pub store: &'a Mutex<CriticalSectionRawMutex, P>,

    /// Raised once per dispatched command; the indicator task waits on it
    pub notify: &'a Signal<CriticalSectionRawMutex, ()>,

    /// Restart collaborator
    pub system: &'a mut R,

    /// Bounded wait used for the tracker lock
    pub lock_timeout: Duration,
}

/// Apply one command's effects
///
/// Raises the notify signal afterwards. A tracker lock timeout drops the
/// command (the operator can resend; control traffic is low-rate and
/// best-effort like everything else here).
pub async fn dispatch<P, R>(cmd: Command, ctx: &mut CommandContext<'_, P, R>)
where
    P: SettingsStore,
    R: SystemControl,
{
    match cmd {
        Command::SetDestination(destination) => {
            if ctx.config.set_destination(&destination) {
                let mut store = ctx.store.lock().await;
                if store.write_destination(&destination).is_err() {
                    crate::log_warn!("failed to persist destination");
                }
                crate::log_info!("destination set to {}", destination.as_str());
            }
        }
        Command::SetIdentity(identity) => {
            if ctx.config.set_identity(&identity) {
                let mut store = ctx.store.lock().await;
                if store.write_identity(&identity).is_err() {
                    crate::log_warn!("failed to persist identity");
                }
                crate::log_info!("identity set to {}", identity.as_str());
            }
        }
        Command::StartCalibration => {
            if let Ok(mut tracker) = ctx.state.lock(ctx.lock_timeout).await {
                tracker.window.reset();
                tracker.mode = TrackerMode::Calibrating;
                crate::log_info!("gyro calibration started");
            }
        }
        Command::ResetSensor => {
            if let Ok(mut tracker) = ctx.state.lock(ctx.lock_timeout).await {
                tracker.reinit_requested = true;
            }
        }
        Command::Restart => {
            crate::log_info!("restart requested");
            ctx.system.restart();
        }
    }

    ctx.notify.signal(());
}
