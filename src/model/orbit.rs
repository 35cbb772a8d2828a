use nalgebra::{Point3, UnitQuaternion, Vector3};

use std::f64::consts::TAU;

/// A circular orbit, tilted by an inclination and swung around by an ascending
/// node. Positions are relative to whatever the orbit is centered on.
///
/// The untilted orbit lies in the xz-plane, with y as the vertical axis. At
/// zero phase and time, the body sits on the +x axis.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct CircularOrbit {
    pub radius: f64,
    /// Time for one revolution. Zero or negative means the body never moves.
    pub period: f64,
    pub phase: f64,
    pub inclination: f64,
    pub node: f64,
}

impl CircularOrbit {
    pub fn new(radius: f64, period: f64) -> Self {
        CircularOrbit {
            radius,
            period,
            phase: 0.0,
            inclination: 0.0,
            node: 0.0,
        }
    }

    pub fn with_phase(mut self, phase: f64) -> Self {
        self.phase = phase;
        self
    }

    pub fn with_inclination(mut self, inclination: f64) -> Self {
        self.inclination = inclination;
        self
    }

    pub fn with_node(mut self, node: f64) -> Self {
        self.node = node;
        self
    }

    pub fn is_static(&self) -> bool {
        self.period <= 0.0
    }

    /// Angle along the orbit at the given time, before tilting. Not wrapped.
    pub fn angle_at(&self, time: f64) -> f64 {
        if self.is_static() {
            self.phase
        } else {
            self.phase + TAU * (time / self.period)
        }
    }

    /// Rotation taking the flat xz-plane orbit to its tilted orientation: first
    /// the inclination around the x-axis, then the node around the y-axis.
    pub fn orientation(&self) -> UnitQuaternion<f64> {
        // Positive inclination lifts the +z half of the orbit toward +y.
        let tilt = UnitQuaternion::from_axis_angle(&-Vector3::x_axis(), self.inclination);
        let swing = UnitQuaternion::from_axis_angle(&Vector3::y_axis(), self.node);
        swing * tilt
    }

    pub fn position_at_angle(&self, theta: f64) -> Vector3<f64> {
        let flat = Vector3::new(self.radius * theta.cos(), 0.0, self.radius * theta.sin());
        self.orientation() * flat
    }

    pub fn position_at(&self, time: f64) -> Vector3<f64> {
        self.position_at_angle(self.angle_at(time))
    }

    /// Same as `position_at`, offset by the center of the orbit.
    pub fn position_around(&self, center: &Point3<f64>, time: f64) -> Point3<f64> {
        center + self.position_at(time)
    }
}
