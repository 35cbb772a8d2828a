use std::cell::RefCell;
use std::rc::{Rc, Weak};

use kiss3d::resource::Mesh;
use kiss3d::scene::SceneNode;
use nalgebra::{Point3, Translation3, UnitQuaternion, Vector3};

use super::ring::annulus_mesh;

const RING_SEGMENTS: usize = 128;

/// Everything the view needs from a scene graph. Nodes are handles: cloning one
/// gives another handle to the same node.
///
/// Primitives are created as children of the node they're added to, so they
/// inherit its transform.
pub trait VisualNode: Clone {
    /// An empty node, used for grouping and as a moving reference frame.
    fn add_frame(&mut self) -> Self;

    fn add_body_sphere(&mut self, radius: f32, color: Point3<f32>) -> Self;

    /// A cylinder of radius one, running from y = -1/2 to y = 1/2.
    fn add_connector(&mut self, color: Point3<f32>) -> Self;

    /// A thin flat ring around the origin, lying in the xz-plane.
    fn add_orbit_ring(&mut self, radius: f32, color: Point3<f32>) -> Self;

    fn set_position(&mut self, position: Point3<f32>);

    fn set_orientation(&mut self, orientation: UnitQuaternion<f32>);

    fn set_scale(&mut self, scale: Vector3<f32>);

    fn set_shown(&mut self, shown: bool);
}

impl VisualNode for SceneNode {
    fn add_frame(&mut self) -> Self {
        self.add_group()
    }

    fn add_body_sphere(&mut self, radius: f32, color: Point3<f32>) -> Self {
        let mut sphere = self.add_sphere(radius);
        sphere.set_color(color.x, color.y, color.z);
        sphere
    }

    fn add_connector(&mut self, color: Point3<f32>) -> Self {
        // kiss3d's stock cylinder has diameter 1, so we wrap it in a group that
        // owns the unit-radius contract. Scaling and hiding happen on the group.
        let mut group = self.add_group();
        let mut cylinder = group.add_cylinder(1.0, 1.0);
        cylinder.set_color(color.x, color.y, color.z);
        group
    }

    fn add_orbit_ring(&mut self, radius: f32, color: Point3<f32>) -> Self {
        let width = (radius * 0.004).max(0.02);
        let (coords, faces) = annulus_mesh(radius, width, RING_SEGMENTS);
        let mesh = Mesh::new(coords, faces, None, None, false);

        let mut ring = self.add_mesh(Rc::new(RefCell::new(mesh)), Vector3::from_element(1.0));
        ring.set_color(color.x, color.y, color.z);
        // visible from above and below
        ring.enable_backface_culling(false);
        ring
    }

    fn set_position(&mut self, position: Point3<f32>) {
        self.set_local_translation(Translation3::from(position.coords));
    }

    fn set_orientation(&mut self, orientation: UnitQuaternion<f32>) {
        self.set_local_rotation(orientation);
    }

    fn set_scale(&mut self, scale: Vector3<f32>) {
        self.set_local_scale(scale.x, scale.y, scale.z);
    }

    fn set_shown(&mut self, shown: bool) {
        self.set_visible(shown);
    }
}

/// A scene graph that only remembers what was done to it. Useful for running
/// the view headless.
///
/// Spheres are scaled the way kiss3d scales them (a unit-diameter mesh
/// stretched to `2 * radius`), and scale is inherited by children, so
/// `world_scale` answers the same question the renderer would.
pub mod recording {
    use super::*;

    #[derive(Debug, Clone, PartialEq)]
    pub enum Primitive {
        Frame,
        Sphere { radius: f32 },
        Connector,
        Ring { radius: f32 },
    }

    #[derive(Debug)]
    struct Record {
        primitive: Primitive,
        color: Option<Point3<f32>>,
        position: Point3<f32>,
        orientation: UnitQuaternion<f32>,
        scale: Vector3<f32>,
        shown: bool,
        parent: Option<Weak<RefCell<Record>>>,
        children: Vec<RecordingNode>,
    }

    #[derive(Debug, Clone)]
    pub struct RecordingNode(Rc<RefCell<Record>>);

    impl RecordingNode {
        pub fn root() -> Self {
            Self::with_primitive(Primitive::Frame, None)
        }

        fn with_primitive(primitive: Primitive, color: Option<Point3<f32>>) -> Self {
            let scale = match primitive {
                Primitive::Sphere { radius } => Vector3::from_element(2.0 * radius),
                _ => Vector3::from_element(1.0),
            };
            RecordingNode(Rc::new(RefCell::new(Record {
                primitive,
                color,
                position: Point3::origin(),
                orientation: UnitQuaternion::identity(),
                scale,
                shown: true,
                parent: None,
                children: vec![],
            })))
        }

        fn add_child(&mut self, primitive: Primitive, color: Option<Point3<f32>>) -> Self {
            let child = Self::with_primitive(primitive, color);
            child.0.borrow_mut().parent = Some(Rc::downgrade(&self.0));
            self.0.borrow_mut().children.push(child.clone());
            child
        }

        pub fn primitive(&self) -> Primitive {
            self.0.borrow().primitive.clone()
        }

        pub fn position(&self) -> Point3<f32> {
            self.0.borrow().position
        }

        pub fn orientation(&self) -> UnitQuaternion<f32> {
            self.0.borrow().orientation
        }

        pub fn color(&self) -> Option<Point3<f32>> {
            self.0.borrow().color
        }

        pub fn scale(&self) -> Vector3<f32> {
            self.0.borrow().scale
        }

        /// Local scale multiplied by every ancestor's.
        pub fn world_scale(&self) -> Vector3<f32> {
            let record = self.0.borrow();
            match record.parent.as_ref().and_then(Weak::upgrade) {
                Some(parent) => RecordingNode(parent)
                    .world_scale()
                    .component_mul(&record.scale),
                None => record.scale,
            }
        }

        pub fn is_shown(&self) -> bool {
            self.0.borrow().shown
        }

        pub fn children(&self) -> Vec<RecordingNode> {
            self.0.borrow().children.clone()
        }

        pub fn same_node(&self, other: &RecordingNode) -> bool {
            Rc::ptr_eq(&self.0, &other.0)
        }
    }

    impl VisualNode for RecordingNode {
        fn add_frame(&mut self) -> Self {
            self.add_child(Primitive::Frame, None)
        }

        fn add_body_sphere(&mut self, radius: f32, color: Point3<f32>) -> Self {
            self.add_child(Primitive::Sphere { radius }, Some(color))
        }

        fn add_connector(&mut self, color: Point3<f32>) -> Self {
            self.add_child(Primitive::Connector, Some(color))
        }

        fn add_orbit_ring(&mut self, radius: f32, color: Point3<f32>) -> Self {
            self.add_child(Primitive::Ring { radius }, Some(color))
        }

        fn set_position(&mut self, position: Point3<f32>) {
            self.0.borrow_mut().position = position;
        }

        fn set_orientation(&mut self, orientation: UnitQuaternion<f32>) {
            self.0.borrow_mut().orientation = orientation;
        }

        fn set_scale(&mut self, scale: Vector3<f32>) {
            self.0.borrow_mut().scale = scale;
        }

        fn set_shown(&mut self, shown: bool) {
            self.0.borrow_mut().shown = shown;
        }
    }
}
