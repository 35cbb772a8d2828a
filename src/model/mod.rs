pub mod body;
pub mod config;
pub mod orbit;
pub mod orrery;
pub mod positions;

pub use body::{Body, BodyID, BodyInfo, BodyKind, Kind};
pub use config::{ConfigError, ConnectorSpec, System, SystemConfig, ViewSettings};
pub use orbit::CircularOrbit;
pub use orrery::{Orrery, OrreryState, Snapshot};
pub use positions::Positions;
