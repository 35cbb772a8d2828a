use nalgebra::{Point3, UnitQuaternion};

use crate::model::{BodyID, BodyKind, System};

/// Where an orbit ring hangs in the scene. Rings never move on their own; they
/// ride along with whatever they're attached to.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RingAnchor {
    /// Orbits around the origin hang off the view's group.
    Scene,
    /// Orbits around a body hang off an invisible, unscaled frame that follows
    /// it. Never the body's own node: that one is scaled to the body's size,
    /// and children inherit scale.
    Frame(BodyID),
}

#[derive(Debug, Clone, PartialEq)]
pub struct RingPlacement {
    pub body: BodyID,
    pub anchor: RingAnchor,
    pub radius: f64,
    pub orientation: UnitQuaternion<f64>,
    pub color: Point3<f32>,
}

pub fn ring_placements(system: &System) -> Vec<RingPlacement> {
    system
        .bodies()
        .iter()
        .filter_map(|body| {
            let (orbit, anchor) = match &body.kind {
                BodyKind::Sun => return None,
                BodyKind::Primary { orbit } | BodyKind::Barycenter { orbit } => {
                    (orbit, RingAnchor::Scene)
                }
                BodyKind::Moon { orbit, parent } | BodyKind::BinaryChild { orbit, parent } => {
                    (orbit, RingAnchor::Frame(*parent))
                }
            };
            Some(RingPlacement {
                body: body.id,
                anchor,
                radius: orbit.radius,
                orientation: orbit.orientation(),
                // dimmed, so rings don't compete with the bodies
                color: Point3::from(body.info.color.coords * 0.5),
            })
        })
        .collect()
}

pub fn path_iter_parametric<F, S>(
    f: F,
    t_start: S,
    t_end: S,
    num_segments: usize,
) -> impl Iterator<Item = Point3<f32>>
where
    F: Fn(S) -> Point3<f32>,
    S: nalgebra::RealField + simba::scalar::SupersetOf<usize> + Copy,
{
    assert!(
        num_segments >= 1,
        "Must have at least one segment, num_segments was {}",
        num_segments
    );
    let convert = nalgebra::convert::<usize, S>;
    (0..=num_segments)
        .map(move |i| convert(i) / convert(num_segments))
        // u ranges from 0 to 1 (inclusive)
        .map(move |u| t_start + u * (t_end - t_start))
        .map(f)
}

/// Triangulates a flat band of the given width centered on a circle in the
/// xz-plane. Vertices alternate inner, outer; the seam is closed by wrapping
/// indices rather than duplicating the first pair.
pub fn annulus_mesh(
    radius: f32,
    width: f32,
    num_segments: usize,
) -> (Vec<Point3<f32>>, Vec<Point3<u16>>) {
    assert!(
        (3..=u16::MAX as usize / 2).contains(&num_segments),
        "num_segments out of range: {}",
        num_segments
    );

    let inner = (radius - width / 2.0).max(0.0);
    let outer = radius + width / 2.0;
    let circle = |r: f32| {
        path_iter_parametric(
            move |theta: f32| Point3::new(r * theta.cos(), 0.0, r * theta.sin()),
            0.0,
            std::f32::consts::TAU,
            num_segments,
        )
        // the last point repeats the first
        .take(num_segments)
    };

    let coords: Vec<Point3<f32>> = circle(inner)
        .zip(circle(outer))
        .flat_map(|(a, b)| [a, b])
        .collect();

    let n = num_segments as u16;
    let mut faces = Vec::with_capacity(2 * num_segments);
    for i in 0..n {
        let j = (i + 1) % n;
        let (a, b, c, d) = (2 * i, 2 * i + 1, 2 * j, 2 * j + 1);
        faces.push(Point3::new(a, b, d));
        faces.push(Point3::new(a, d, c));
    }

    (coords, faces)
}
