use std::sync::Arc;

use nalgebra::Point3;
use tracing::{debug, info};

use super::body::{BodyID, BodyKind};
use super::config::{ConfigError, System, SystemConfig};
use super::positions::Positions;

/// The kinematics engine. Owns the simulation clock and the position table,
/// and recomputes every position from scratch on each update.
///
/// Positions are closed-form: each body sits on a circular orbit around the
/// origin, or around its parent, so nothing accumulates from step to step
/// except the clock.
#[derive(Debug, Clone)]
pub struct Orrery {
    system: Arc<System>,
    time: f64,
    time_scale: f64,
    // Independent bodies first, then the ones that read a parent's position.
    schedule: Vec<BodyID>,
    positions: Positions,
}

/// A read-only view of the engine after an update. It borrows the engine, so it
/// can't outlive the next call to `update`.
#[derive(Debug, Clone, Copy)]
pub struct OrreryState<'orr> {
    pub time: f64,
    pub positions: &'orr Positions,
}

/// An owned copy of the engine state, safe to keep around.
#[derive(Debug, Clone, PartialEq)]
pub struct Snapshot {
    pub time: f64,
    pub positions: Positions,
}

impl Orrery {
    pub fn new(config: &SystemConfig) -> Result<Self, ConfigError> {
        let system = config.validate()?;
        Ok(Self::from_system(Arc::new(system)))
    }

    pub fn from_system(system: Arc<System>) -> Self {
        // Two passes: anything without a parent, then dependents. Parents are
        // always parentless (validation guarantees it), so this is enough.
        let independent = system.bodies().iter().filter(|b| b.parent_id().is_none());
        let dependent = system.bodies().iter().filter(|b| b.parent_id().is_some());
        let schedule: Vec<BodyID> = independent.chain(dependent).map(|b| b.id).collect();

        info!(
            bodies = system.len(),
            time_scale = system.time_scale(),
            "built orrery"
        );
        let order: Vec<&str> = schedule.iter().map(|id| system.get_body(*id).name()).collect();
        debug!(schedule = ?order, "update schedule");

        let mut orrery = Orrery {
            time: 0.0,
            time_scale: system.time_scale(),
            positions: Positions::new(system.names().clone()),
            schedule,
            system,
        };
        orrery.recompute();
        orrery
    }

    pub fn system(&self) -> &System {
        &self.system
    }

    pub fn shared_system(&self) -> Arc<System> {
        self.system.clone()
    }

    pub fn time(&self) -> f64 {
        self.time
    }

    pub fn time_scale(&self) -> f64 {
        self.time_scale
    }

    pub fn set_time_scale(&mut self, time_scale: f64) {
        self.time_scale = time_scale;
    }

    /// Advances the clock by `dt`, scaled by the time scale, and recomputes all
    /// positions.
    pub fn update(&mut self, dt: f64) {
        self.time += dt * self.time_scale;
        self.recompute();
    }

    /// Jumps the clock to an absolute time, ignoring the time scale.
    pub fn set_time(&mut self, time: f64) {
        self.time = time;
        self.recompute();
    }

    pub fn state(&self) -> OrreryState<'_> {
        OrreryState {
            time: self.time,
            positions: &self.positions,
        }
    }

    pub fn snapshot(&self) -> Snapshot {
        self.state().to_snapshot()
    }

    pub fn position_of(&self, name: &str) -> Option<Point3<f64>> {
        self.positions.get(name)
    }

    fn recompute(&mut self) {
        let time = self.time;
        for &id in self.schedule.iter() {
            let point = match &self.system.get_body(id).kind {
                BodyKind::Sun => Point3::origin(),
                BodyKind::Primary { orbit } | BodyKind::Barycenter { orbit } => {
                    Point3::from(orbit.position_at(time))
                }
                BodyKind::Moon { orbit, parent } | BodyKind::BinaryChild { orbit, parent } => {
                    // The schedule resolved the parent earlier in this pass.
                    let center = self.positions.get_by_id(*parent).unwrap_or_else(Point3::origin);
                    orbit.position_around(&center, time)
                }
            };
            self.positions.set(id, point);
        }
    }
}

impl OrreryState<'_> {
    pub fn to_snapshot(&self) -> Snapshot {
        Snapshot {
            time: self.time,
            positions: self.positions.clone(),
        }
    }
}
