use std::collections::HashMap;
use std::time::Instant;

use kiss3d::camera::{ArcBall, Camera};
use kiss3d::event::EventManager;
use kiss3d::planar_camera::PlanarCamera;
use kiss3d::post_processing::PostProcessingEffect;
use kiss3d::renderer::Renderer;
use kiss3d::scene::SceneNode;
use kiss3d::window::{State, Window};
use nalgebra::{Point2, Point3};

use self::controller::Controller;
use crate::model::{BodyKind, Orrery, System};

pub mod connector;
pub mod controller;
pub mod node;
pub mod ring;
pub mod view;

pub use self::node::VisualNode;
pub use self::view::SystemView;

// Longest step we'll take in one frame, so a stall doesn't teleport everything.
const MAX_FRAME_SECONDS: f64 = 0.25;

/// Drives the orrery from kiss3d's frame loop: one `update`, then one
/// `apply_positions`, every frame.
pub struct Simulation {
    orrery: Orrery,
    view: SystemView<SceneNode>,
    controller: Controller,
    camera: ArcBall,
    last_frame: Instant,
}

impl Simulation {
    pub fn new(orrery: Orrery, window: &mut Window, overrides: HashMap<String, SceneNode>) -> Self {
        let mut view = SystemView::attach(window.scene_mut(), orrery.system(), overrides);
        view.apply_positions(orrery.state().positions);

        let extent = system_extent(orrery.system()).max(1.0) as f32;
        let camera = ArcBall::new(
            Point3::new(0.0, 0.8 * extent, 1.6 * extent),
            Point3::origin(),
        );

        Self {
            orrery,
            view,
            controller: Controller::new(),
            camera,
            last_frame: Instant::now(),
        }
    }

    fn process_user_input(&mut self, mut events: EventManager) {
        for event in events.iter() {
            self.controller.process_event(event, &mut self.orrery);
        }
    }

    fn status_text(&self) -> String {
        format!(
            "Time: {:.1}\nTime scale: {}{}\nFPS: {:.0}",
            self.orrery.time(),
            self.orrery.time_scale(),
            if self.controller.is_paused() {
                " (paused)"
            } else {
                ""
            },
            self.controller.fps(),
        )
    }
}

impl State for Simulation {
    fn cameras_and_effect_and_renderer(
        &mut self,
    ) -> (
        Option<&mut dyn Camera>,
        Option<&mut dyn PlanarCamera>,
        Option<&mut dyn Renderer>,
        Option<&mut dyn PostProcessingEffect>,
    ) {
        (Some(&mut self.camera), None, None, None)
    }

    fn step(&mut self, window: &mut Window) {
        self.process_user_input(window.events());

        let dt = self.last_frame.elapsed().as_secs_f64().min(MAX_FRAME_SECONDS);
        self.last_frame = Instant::now();
        if !self.controller.is_paused() {
            self.orrery.update(dt);
        }
        self.view.apply_positions(self.orrery.state().positions);

        window.draw_text(
            &self.status_text(),
            &Point2::origin(),
            60.0,
            &kiss3d::text::Font::default(),
            &Point3::new(1.0, 1.0, 1.0),
        );
        self.controller.increment_frame_counter();
    }
}

/// Builds the nodes the window owns itself rather than leaving to the view.
/// Right now that's just the sun.
pub fn sun_overrides(window: &mut Window, system: &System) -> HashMap<String, SceneNode> {
    system
        .bodies()
        .iter()
        .filter(|b| matches!(b.kind, BodyKind::Sun))
        .map(|body| {
            let radius = body.info.visual_radius.unwrap_or(1.0);
            let mut sun = window.add_sphere(radius);
            let color = body.info.color;
            sun.set_color(color.x, color.y, color.z);
            (body.name().to_owned(), sun)
        })
        .collect()
}

/// Farthest any body can get from the origin.
pub fn system_extent(system: &System) -> f64 {
    let reach = |kind: &BodyKind| kind.orbit().map_or(0.0, |o| o.radius);
    system
        .bodies()
        .iter()
        .map(|body| {
            let parent_reach = body
                .parent_id()
                .map_or(0.0, |id| reach(&system.get_body(id).kind));
            reach(&body.kind) + parent_reach
        })
        .fold(0.0, f64::max)
}
