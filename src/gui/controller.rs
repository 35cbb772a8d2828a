use std::time::Instant;

use kiss3d::event::{Action, Event, Key, WindowEvent};
use tracing::info;

use crate::model::Orrery;

// Key config, all in one place
const KEY_SPEED_UP: Key = Key::Period;
const KEY_SLOW_DOWN: Key = Key::Comma;
const KEY_REVERSE: Key = Key::R;
const KEY_RESET_SPEED: Key = Key::Key1;
const KEY_TOGGLE_PAUSE: Key = Key::Space;

// Halving stops here, so the clock can't be slowed into underflow.
const MIN_TIME_SCALE: f64 = 1.0 / 1024.0;
const FPS_WINDOW_MILLIS: u128 = 1000;

pub struct Controller {
    paused: bool,
    // frames drawn since `fps_window_start`
    frame_count: usize,
    fps_window_start: Instant,
    fps: f64,
}

impl Controller {
    pub fn new() -> Self {
        Controller {
            paused: false,
            frame_count: 0,
            fps_window_start: Instant::now(),
            fps: 0.0,
        }
    }

    pub fn process_event(&mut self, event: Event, orrery: &mut Orrery) {
        if let WindowEvent::Key(key, Action::Press, _) = event.value {
            self.handle_key(key, orrery);
        }
    }

    pub fn handle_key(&mut self, key: Key, orrery: &mut Orrery) {
        let scale = orrery.time_scale();
        match key {
            KEY_SPEED_UP => {
                // a frozen clock has nothing to double
                let faster = if scale == 0.0 {
                    MIN_TIME_SCALE
                } else {
                    scale * 2.0
                };
                orrery.set_time_scale(faster);
                info!(time_scale = faster, "sped up");
            }
            KEY_SLOW_DOWN => {
                if (scale / 2.0).abs() >= MIN_TIME_SCALE {
                    orrery.set_time_scale(scale / 2.0);
                }
                info!(time_scale = orrery.time_scale(), "slowed down");
            }
            KEY_REVERSE => {
                orrery.set_time_scale(-scale);
                self.paused = false;
            }
            KEY_RESET_SPEED => {
                orrery.set_time_scale(1.0);
                self.paused = false;
                info!("time scale reset");
            }
            KEY_TOGGLE_PAUSE => {
                self.paused = !self.paused;
            }
            _ => {}
        }
    }

    pub fn is_paused(&self) -> bool {
        self.paused
    }

    /// Frames per second, averaged over the last full second.
    pub fn fps(&self) -> f64 {
        self.fps
    }

    pub fn increment_frame_counter(&mut self) {
        self.frame_count += 1;

        let elapsed = self.fps_window_start.elapsed().as_millis();
        if elapsed > FPS_WINDOW_MILLIS {
            self.fps = (1000 * self.frame_count) as f64 / elapsed as f64;
            self.frame_count = 0;
            self.fps_window_start = Instant::now();
        }
    }
}

impl Default for Controller {
    fn default() -> Self {
        Self::new()
    }
}
