use nalgebra::{Point3, UnitQuaternion, Vector3};
use tracing::trace;

use super::node::VisualNode;
use crate::math::geometry::rotation_between_axes;
use crate::model::ConnectorSpec;

/// Below this length the endpoints count as coincident.
pub const DEGENERATE_LENGTH: f64 = 1e-6;

/// How thick a connector is drawn, as a function of its length.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ConnectorParams {
    pub k: f64,
    pub min_radius: f64,
    pub max_radius: f64,
}

/// Placement of a primitive stretched between two points.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ConnectorPose {
    pub midpoint: Point3<f64>,
    /// Takes the primitive's long axis (+y) to the direction between the points.
    pub orientation: UnitQuaternion<f64>,
    pub length: f64,
    pub radius: f64,
}

impl ConnectorParams {
    pub fn radius_for(&self, length: f64) -> f64 {
        (length * self.k).clamp(self.min_radius, self.max_radius)
    }
}

impl From<&ConnectorSpec> for ConnectorParams {
    fn from(spec: &ConnectorSpec) -> Self {
        ConnectorParams {
            k: spec.k,
            min_radius: spec.min_radius,
            max_radius: spec.max_radius,
        }
    }
}

/// Works out how to place a y-aligned primitive so it runs from `p1` to `p2`.
/// Returns `None` when the points are too close to define a direction.
pub fn connector_pose(
    p1: &Point3<f64>,
    p2: &Point3<f64>,
    params: &ConnectorParams,
) -> Option<ConnectorPose> {
    let dir = p2 - p1;
    let length = dir.norm();
    if length <= DEGENERATE_LENGTH {
        return None;
    }

    Some(ConnectorPose {
        midpoint: nalgebra::center(p1, p2),
        orientation: rotation_between_axes(&Vector3::y_axis(), &dir, DEGENERATE_LENGTH),
        length,
        radius: params.radius_for(length),
    })
}

/// A scene primitive kept stretched between two named bodies.
#[derive(Debug, Clone)]
pub struct Connector<N> {
    node: N,
    between: (String, String),
    params: ConnectorParams,
    pose: Option<ConnectorPose>,
}

impl<N: VisualNode> Connector<N> {
    /// Adds the primitive under `parent`. It starts hidden, since it has no
    /// endpoints yet.
    pub fn new(
        parent: &mut N,
        between: (String, String),
        params: ConnectorParams,
        color: Point3<f32>,
    ) -> Self {
        let mut node = parent.add_connector(color);
        node.set_shown(false);
        Connector {
            node,
            between,
            params,
            pose: None,
        }
    }

    pub fn between(&self) -> (&str, &str) {
        (&self.between.0, &self.between.1)
    }

    pub fn params(&self) -> &ConnectorParams {
        &self.params
    }

    pub fn node(&self) -> &N {
        &self.node
    }

    /// The pose as of the last update, or `None` if it's hidden.
    pub fn pose(&self) -> Option<&ConnectorPose> {
        self.pose.as_ref()
    }

    pub fn is_visible(&self) -> bool {
        self.pose.is_some()
    }

    /// Re-fits the primitive to a new pair of endpoints. Passing `None` for
    /// either hides it.
    pub fn update(&mut self, p1: Option<Point3<f64>>, p2: Option<Point3<f64>>) {
        let pose = match (p1, p2) {
            (Some(p1), Some(p2)) => connector_pose(&p1, &p2, &self.params),
            _ => None,
        };

        if pose.is_some() != self.pose.is_some() {
            trace!(
                between = ?self.between,
                visible = pose.is_some(),
                "connector visibility changed"
            );
        }

        match &pose {
            Some(pose) => {
                let radius = pose.radius as f32;
                self.node.set_position(nalgebra::convert(pose.midpoint));
                self.node.set_orientation(nalgebra::convert(pose.orientation));
                self.node
                    .set_scale(Vector3::new(radius, pose.length as f32, radius));
                self.node.set_shown(true);
            }
            None => self.node.set_shown(false),
        }
        self.pose = pose;
    }
}
