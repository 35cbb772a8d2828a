use std::collections::HashMap;

use nalgebra::Point3;
use tracing::{debug, warn};

use super::connector::{Connector, ConnectorParams};
use super::node::VisualNode;
use super::ring::{ring_placements, RingAnchor};
use crate::model::{Positions, System};

const DEFAULT_BODY_RADIUS: f32 = 1.0;

/// Keeps scene nodes in step with the orrery.
///
/// Built once per scene with `attach`; after that, `apply_positions` is the only
/// thing that touches the nodes. Barycenters never get a node.
pub struct SystemView<N> {
    group: N,
    nodes: HashMap<String, N>,
    // Invisible frames that follow ring centers (moon parents and barycenters).
    frames: HashMap<String, N>,
    rings: Vec<N>,
    connector: Option<Connector<N>>,
}

impl<N: VisualNode> SystemView<N> {
    /// Creates the view's nodes under `scene`.
    ///
    /// Bodies listed in `overrides` adopt the given node instead of getting a
    /// fresh sphere. The override is used as is: it isn't reparented, recolored
    /// or resized.
    pub fn attach(scene: &mut N, system: &System, mut overrides: HashMap<String, N>) -> Self {
        let mut group = scene.add_frame();

        let mut nodes = HashMap::new();
        for body in system.bodies() {
            if body.is_virtual() {
                if overrides.remove(body.name()).is_some() {
                    warn!(body = body.name(), "ignoring override for a barycenter");
                }
                continue;
            }

            let node = match overrides.remove(body.name()) {
                Some(node) => node,
                None => group.add_body_sphere(
                    body.info.visual_radius.unwrap_or(DEFAULT_BODY_RADIUS),
                    body.info.color,
                ),
            };
            nodes.insert(body.name().to_owned(), node);
        }
        for name in overrides.keys() {
            warn!(body = name.as_str(), "ignoring override for an unknown body");
        }

        let mut frames = HashMap::new();
        let mut rings = vec![];
        if system.view().rings {
            for placement in ring_placements(system) {
                let parent = match placement.anchor {
                    RingAnchor::Scene => &mut group,
                    RingAnchor::Frame(id) => {
                        let name = system.get_body(id).name();
                        frames
                            .entry(name.to_owned())
                            .or_insert_with(|| group.add_frame())
                    }
                };

                let mut ring = parent.add_orbit_ring(placement.radius as f32, placement.color);
                ring.set_orientation(nalgebra::convert(placement.orientation));
                rings.push(ring);
            }
        }

        let connector = system.view().connector.as_ref().map(|spec| {
            let (a, b) = spec.between;
            Connector::new(
                &mut group,
                (
                    system.get_body(a).name().to_owned(),
                    system.get_body(b).name().to_owned(),
                ),
                ConnectorParams::from(spec),
                Point3::new(0.8, 0.8, 0.9),
            )
        });

        debug!(
            nodes = nodes.len(),
            rings = rings.len(),
            frames = frames.len(),
            connector = connector.is_some(),
            "attached system view"
        );

        SystemView {
            group,
            nodes,
            frames,
            rings,
            connector,
        }
    }

    /// Moves every node to match `positions`. Names without a node are skipped,
    /// as are nodes without a position.
    pub fn apply_positions(&mut self, positions: &Positions) {
        for (name, point) in positions.iter() {
            let point: Point3<f32> = nalgebra::convert(point);
            if let Some(node) = self.nodes.get_mut(name) {
                node.set_position(point);
            }
            if let Some(frame) = self.frames.get_mut(name) {
                frame.set_position(point);
            }
        }

        if let Some(connector) = self.connector.as_mut() {
            let (a, b) = connector.between();
            let (p1, p2) = (positions.get(a), positions.get(b));
            connector.update(p1, p2);
        }
    }

    /// The node everything created by this view hangs from.
    pub fn group(&self) -> &N {
        &self.group
    }

    pub fn nodes(&self) -> &HashMap<String, N> {
        &self.nodes
    }

    pub fn node(&self, name: &str) -> Option<&N> {
        self.nodes.get(name)
    }

    /// The frame that rings centered on `name` hang from, if any.
    pub fn frame(&self, name: &str) -> Option<&N> {
        self.frames.get(name)
    }

    pub fn rings(&self) -> &[N] {
        &self.rings
    }

    pub fn connector(&self) -> Option<&Connector<N>> {
        self.connector.as_ref()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    use approx::assert_relative_eq;
    use nalgebra::Vector3;

    use crate::gui::node::recording::{Primitive, RecordingNode};
    use crate::model::{Orrery, SystemConfig};

    const SYSTEM: &str = r#"
        order = ["Sun", "Earth", "Moon", "Pair", "A", "B"]

        [bodies.Sun]
        kind = "Sun"
        visual_radius = 3.0

        [bodies.Earth]
        kind = "Primary"
        orbit = { radius = 10.0, period = 20.0, inclination = 0.25 }

        [bodies.Moon]
        kind = "Moon"
        parent = "Earth"
        orbit = { radius = 1.5, period = 4.0 }

        [bodies.Pair]
        kind = "Barycenter"
        orbit = { radius = 30.0, period = 90.0 }

        [bodies.A]
        kind = "BinaryChild"
        parent = "Pair"
        orbit = { radius = 10.0, period = 6.0 }

        [bodies.B]
        kind = "BinaryChild"
        parent = "Pair"
        orbit = { radius = 10.0, period = 6.0, phase = 3.141592653589793 }
    "#;

    fn orrery() -> Orrery {
        Orrery::new(&SystemConfig::from_toml_str(SYSTEM).unwrap()).unwrap()
    }

    #[test]
    fn test_attach() {
        let orrery = orrery();
        let mut scene = RecordingNode::root();
        let view = SystemView::attach(&mut scene, orrery.system(), HashMap::new());

        // one group under the scene, holding everything else
        assert_eq!(scene.children().len(), 1);
        assert!(scene.children()[0].same_node(view.group()));

        let mut names: Vec<_> = view.nodes().keys().cloned().collect();
        names.sort();
        assert_eq!(names, ["A", "B", "Earth", "Moon", "Sun"]);
        assert!(view.node("Pair").is_none());

        assert_eq!(
            view.node("Sun").unwrap().primitive(),
            Primitive::Sphere { radius: 3.0 }
        );
        assert_eq!(
            view.node("Moon").unwrap().primitive(),
            Primitive::Sphere {
                radius: DEFAULT_BODY_RADIUS
            }
        );

        // Earth, Moon, Pair, A, B all orbit something
        assert_eq!(view.rings().len(), 5);
        assert!(view.connector().is_some());
    }

    #[test]
    fn test_ring_parents() {
        let orrery = orrery();
        let mut scene = RecordingNode::root();
        let view = SystemView::attach(&mut scene, orrery.system(), HashMap::new());

        // the moon's ring rides on a frame following the earth, not the
        // earth's own (scaled) node
        assert!(view.node("Earth").unwrap().children().is_empty());
        let earth_frame = view.frame("Earth").unwrap();
        assert_eq!(
            earth_frame.children()[0].primitive(),
            Primitive::Ring { radius: 1.5 }
        );

        // the earth's ring sits in the group, tilted by its inclination
        let earth_ring = view
            .group()
            .children()
            .into_iter()
            .find(|n| n.primitive() == Primitive::Ring { radius: 10.0 })
            .unwrap();
        assert_relative_eq!(earth_ring.orientation().angle(), 0.25, epsilon = 1e-6);

        // the binary rings hang off a frame, which is not a body node
        let frame = view.frame("Pair").unwrap();
        assert_eq!(frame.children().len(), 2);
        assert!(view.nodes().values().all(|n| !n.same_node(frame)));
    }

    #[test]
    fn test_rings_drawn_at_orbit_size() {
        let mut orrery = orrery();
        let mut scene = RecordingNode::root();
        let mut view = SystemView::attach(&mut scene, orrery.system(), HashMap::new());

        // the sun is scaled up by its visual radius; none of that reaches rings
        assert_eq!(
            view.node("Sun").unwrap().world_scale(),
            Vector3::from_element(6.0)
        );
        for ring in view.rings() {
            assert_eq!(ring.world_scale(), Vector3::from_element(1.0));
        }

        // the frame the moon ring hangs from follows the earth
        orrery.update(2.5);
        view.apply_positions(orrery.state().positions);
        assert_eq!(
            view.frame("Earth").unwrap().position(),
            view.node("Earth").unwrap().position()
        );
        let moon_ring = &view.frame("Earth").unwrap().children()[0];
        assert_eq!(moon_ring.color(), Some(Point3::new(0.5, 0.5, 0.5)));
    }

    #[test]
    fn test_no_rings() {
        let mut config = SystemConfig::from_toml_str(SYSTEM).unwrap();
        config.view.rings = false;
        let orrery = Orrery::new(&config).unwrap();
        let mut scene = RecordingNode::root();
        let view = SystemView::attach(&mut scene, orrery.system(), HashMap::new());
        assert!(view.rings().is_empty());
        assert!(view.frame("Earth").is_none());
    }

    #[test]
    fn test_override_adopted() {
        let orrery = orrery();
        let mut scene = RecordingNode::root();
        let sun = RecordingNode::root();

        let mut overrides = HashMap::new();
        overrides.insert("Sun".to_owned(), sun.clone());
        overrides.insert("Pair".to_owned(), RecordingNode::root());
        overrides.insert("Nobody".to_owned(), RecordingNode::root());

        let view = SystemView::attach(&mut scene, orrery.system(), overrides);
        assert!(view.node("Sun").unwrap().same_node(&sun));
        assert!(view.node("Pair").is_none());
        assert!(view.node("Nobody").is_none());

        // no sphere was made for the sun
        let spheres = view
            .group()
            .children()
            .into_iter()
            .filter(|n| matches!(n.primitive(), Primitive::Sphere { .. }))
            .count();
        assert_eq!(spheres, 4);
    }

    #[test]
    fn test_apply_positions() {
        let mut orrery = orrery();
        let mut scene = RecordingNode::root();
        let mut view = SystemView::attach(&mut scene, orrery.system(), HashMap::new());

        for _ in 0..10 {
            orrery.update(1.3);
            view.apply_positions(orrery.state().positions);

            for (name, node) in view.nodes() {
                let expected: Point3<f32> =
                    nalgebra::convert(orrery.position_of(name).unwrap());
                assert_relative_eq!(node.position(), expected);
            }

            let connector = view.connector().unwrap();
            assert!(connector.is_visible());
            let pose = connector.pose().unwrap();
            assert_relative_eq!(pose.length, 20.0, epsilon = 1e-9);
            assert_relative_eq!(
                pose.midpoint,
                orrery.position_of("Pair").unwrap(),
                epsilon = 1e-9
            );
        }
    }

    #[test]
    fn test_apply_positions_is_tolerant() {
        let orrery = orrery();
        let mut scene = RecordingNode::root();
        let mut view = SystemView::attach(&mut scene, orrery.system(), HashMap::new());

        let positions: Positions = vec![
            ("Earth".to_owned(), Point3::new(1.0, 2.0, 3.0)),
            ("Ghost".to_owned(), Point3::new(9.0, 9.0, 9.0)),
            ("A".to_owned(), Point3::new(-10.0, 0.0, 0.0)),
            ("B".to_owned(), Point3::new(10.0, 0.0, 0.0)),
        ]
        .into_iter()
        .collect();
        view.apply_positions(&positions);

        assert_eq!(
            view.node("Earth").unwrap().position(),
            Point3::new(1.0, 2.0, 3.0)
        );
        // untouched
        assert_eq!(view.node("Sun").unwrap().position(), Point3::origin());

        let connector = view.connector().unwrap();
        let node = connector.node();
        assert!(node.is_shown());
        assert_relative_eq!(node.position(), Point3::origin());
        assert_relative_eq!(node.scale(), Vector3::new(0.4, 20.0, 0.4), epsilon = 1e-6);

        // coincident endpoints hide the connector
        let positions: Positions = vec![
            ("A".to_owned(), Point3::new(5.0, 5.0, 5.0)),
            ("B".to_owned(), Point3::new(5.0, 5.0, 5.0)),
        ]
        .into_iter()
        .collect();
        view.apply_positions(&positions);
        assert!(!view.connector().unwrap().node().is_shown());
    }
}
