use std::collections::{BTreeMap, HashMap, HashSet};
use std::fs;
use std::path::{Path, PathBuf};
use std::sync::Arc;

use nalgebra::Point3;
use serde::Deserialize;

use super::body::{Body, BodyID, BodyInfo, BodyKind, Kind};
use super::orbit::CircularOrbit;

pub const DEFAULT_CONNECTOR_K: f64 = 0.02;
pub const DEFAULT_CONNECTOR_MIN_RADIUS: f64 = 0.05;
pub const DEFAULT_CONNECTOR_MAX_RADIUS: f64 = 0.5;

#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    #[error("could not read {}", .path.display())]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
    #[error("malformed config: {0}")]
    Parse(#[from] toml::de::Error),
    #[error("time scale must be finite, got {0}")]
    InvalidTimeScale(f64),
    #[error("{body}: unknown kind {kind:?}")]
    UnknownKind { body: String, kind: String },
    #[error("{body}: a {kind} needs an orbit")]
    MissingOrbit { body: String, kind: Kind },
    #[error("{body}: a {kind} cannot have an orbit")]
    UnexpectedOrbit { body: String, kind: Kind },
    #[error("{body}: orbit radius must be positive, got {radius}")]
    InvalidRadius { body: String, radius: f64 },
    #[error("{body}: orbit {field} must be finite")]
    NonFiniteOrbit { body: String, field: &'static str },
    #[error("{body}: a {kind} needs a parent")]
    MissingParent { body: String, kind: Kind },
    #[error("{body}: a {kind} cannot have a parent")]
    UnexpectedParent { body: String, kind: Kind },
    #[error("{body}: parent {parent:?} is not a declared body")]
    DanglingParent { body: String, parent: String },
    #[error("{body}: parent {parent:?} must be a {expected}, but is a {found}")]
    WrongParentKind {
        body: String,
        parent: String,
        expected: Kind,
        found: Kind,
    },
    #[error("order names {0:?}, which is not a declared body")]
    UnknownOrderEntry(String),
    #[error("order names {0:?} more than once")]
    DuplicateOrderEntry(String),
    #[error("{0} is declared but missing from the order")]
    NotInOrder(String),
    #[error("{body}: visual radius must be positive, got {radius}")]
    InvalidVisualRadius { body: String, radius: f32 },
    #[error("{body}: bad color {color:?}, expected six hex digits")]
    InvalidColor { body: String, color: String },
    #[error("connector endpoint {0:?} is not a declared body")]
    UnknownConnectorBody(String),
    #[error("connector endpoint {0:?} is a barycenter, which is never drawn")]
    VirtualConnectorBody(String),
    #[error("connector needs two distinct bodies, got {0:?} twice")]
    DegenerateConnector(String),
    #[error("connector radii must satisfy 0 <= min <= max, got min {min} and max {max}")]
    InvalidConnectorRadii { min: f64, max: f64 },
    #[error("connector k must be finite and non-negative, got {0}")]
    InvalidConnectorK(f64),
}

/// The raw, on-disk description of a system. Nothing here is checked until
/// `validate` turns it into a `System`.
#[derive(Debug, Clone, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct SystemConfig {
    #[serde(default = "default_time_scale")]
    pub time_scale: f64,
    pub order: Vec<String>,
    pub bodies: BTreeMap<String, BodyConfig>,
    #[serde(default)]
    pub view: ViewConfig,
}

#[derive(Debug, Clone, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct BodyConfig {
    pub kind: String,
    pub orbit: Option<OrbitConfig>,
    pub parent: Option<String>,
    pub visual_radius: Option<f32>,
    pub color: Option<String>,
}

#[derive(Debug, Clone, Copy, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct OrbitConfig {
    pub radius: f64,
    pub period: f64,
    #[serde(default)]
    pub phase: f64,
    #[serde(default)]
    pub inclination: f64,
    #[serde(default)]
    pub node: f64,
}

#[derive(Debug, Clone, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct ViewConfig {
    #[serde(default = "default_true")]
    pub rings: bool,
    pub connector: Option<ConnectorConfig>,
}

#[derive(Debug, Clone, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct ConnectorConfig {
    pub between: Option<[String; 2]>,
    #[serde(default = "default_connector_k")]
    pub k: f64,
    #[serde(default = "default_connector_min_radius")]
    pub min_radius: f64,
    #[serde(default = "default_connector_max_radius")]
    pub max_radius: f64,
}

fn default_time_scale() -> f64 {
    1.0
}

fn default_true() -> bool {
    true
}

fn default_connector_k() -> f64 {
    DEFAULT_CONNECTOR_K
}

fn default_connector_min_radius() -> f64 {
    DEFAULT_CONNECTOR_MIN_RADIUS
}

fn default_connector_max_radius() -> f64 {
    DEFAULT_CONNECTOR_MAX_RADIUS
}

impl Default for ViewConfig {
    fn default() -> Self {
        ViewConfig {
            rings: true,
            connector: None,
        }
    }
}

impl Default for ConnectorConfig {
    fn default() -> Self {
        ConnectorConfig {
            between: None,
            k: DEFAULT_CONNECTOR_K,
            min_radius: DEFAULT_CONNECTOR_MIN_RADIUS,
            max_radius: DEFAULT_CONNECTOR_MAX_RADIUS,
        }
    }
}

/// A validated system: every body is typed, every parent resolves to a body of
/// the right kind, and the declared order covers each body exactly once.
#[derive(Debug, Clone)]
pub struct System {
    time_scale: f64,
    bodies: Vec<Body>,
    names: Arc<[String]>,
    name_to_id: HashMap<String, BodyID>,
    view: ViewSettings,
}

#[derive(Debug, Clone, PartialEq)]
pub struct ViewSettings {
    pub rings: bool,
    pub connector: Option<ConnectorSpec>,
}

/// Which two bodies get joined by a connector, and how thick it is drawn.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ConnectorSpec {
    pub between: (BodyID, BodyID),
    pub k: f64,
    pub min_radius: f64,
    pub max_radius: f64,
}

impl SystemConfig {
    pub fn from_toml_str(s: &str) -> Result<Self, ConfigError> {
        Ok(toml::from_str(s)?)
    }

    pub fn from_file(path: impl AsRef<Path>) -> Result<Self, ConfigError> {
        let path = path.as_ref();
        let contents = fs::read_to_string(path).map_err(|source| ConfigError::Io {
            path: path.to_owned(),
            source,
        })?;
        Self::from_toml_str(&contents)
    }

    pub fn validate(&self) -> Result<System, ConfigError> {
        if !self.time_scale.is_finite() {
            return Err(ConfigError::InvalidTimeScale(self.time_scale));
        }

        // Assign ids by declared order, catching anything the order and the
        // body table disagree on.
        let mut name_to_id = HashMap::new();
        for (idx, name) in self.order.iter().enumerate() {
            if !self.bodies.contains_key(name) {
                return Err(ConfigError::UnknownOrderEntry(name.clone()));
            }
            if name_to_id.insert(name.clone(), BodyID(idx)).is_some() {
                return Err(ConfigError::DuplicateOrderEntry(name.clone()));
            }
        }
        if let Some(name) = self.bodies.keys().find(|n| !name_to_id.contains_key(*n)) {
            return Err(ConfigError::NotInOrder(name.clone()));
        }

        // Parse all the kinds first, so parent checks can look them up.
        let mut kinds = Vec::with_capacity(self.order.len());
        for name in self.order.iter() {
            let raw = &self.bodies[name].kind;
            let kind = raw.parse::<Kind>().map_err(|_| ConfigError::UnknownKind {
                body: name.clone(),
                kind: raw.clone(),
            })?;
            kinds.push(kind);
        }

        let mut bodies = Vec::with_capacity(self.order.len());
        for (idx, name) in self.order.iter().enumerate() {
            let config = &self.bodies[name];
            let kind = kinds[idx];

            let orbit = match (kind.has_orbit(), &config.orbit) {
                (true, Some(orbit)) => Some(validate_orbit(name, orbit)?),
                (true, None) => {
                    return Err(ConfigError::MissingOrbit {
                        body: name.clone(),
                        kind,
                    })
                }
                (false, Some(_)) => {
                    return Err(ConfigError::UnexpectedOrbit {
                        body: name.clone(),
                        kind,
                    })
                }
                (false, None) => None,
            };

            let parent = match (kind.required_parent(), &config.parent) {
                (Some(expected), Some(parent)) => {
                    let parent_id = *name_to_id.get(parent).ok_or_else(|| {
                        ConfigError::DanglingParent {
                            body: name.clone(),
                            parent: parent.clone(),
                        }
                    })?;
                    let found = kinds[parent_id.0];
                    if found != expected {
                        return Err(ConfigError::WrongParentKind {
                            body: name.clone(),
                            parent: parent.clone(),
                            expected,
                            found,
                        });
                    }
                    Some(parent_id)
                }
                (Some(_), None) => {
                    return Err(ConfigError::MissingParent {
                        body: name.clone(),
                        kind,
                    })
                }
                (None, Some(_)) => {
                    return Err(ConfigError::UnexpectedParent {
                        body: name.clone(),
                        kind,
                    })
                }
                (None, None) => None,
            };

            let body_kind = match (kind, orbit, parent) {
                (Kind::Sun, None, None) => BodyKind::Sun,
                (Kind::Primary, Some(orbit), None) => BodyKind::Primary { orbit },
                (Kind::Barycenter, Some(orbit), None) => BodyKind::Barycenter { orbit },
                (Kind::Moon, Some(orbit), Some(parent)) => BodyKind::Moon { orbit, parent },
                (Kind::BinaryChild, Some(orbit), Some(parent)) => {
                    BodyKind::BinaryChild { orbit, parent }
                }
                _ => unreachable!("orbit and parent presence were checked against the kind"),
            };

            let color = match &config.color {
                Some(hex) => parse_color(hex).ok_or_else(|| ConfigError::InvalidColor {
                    body: name.clone(),
                    color: hex.clone(),
                })?,
                None => Point3::new(1.0, 1.0, 1.0),
            };

            if let Some(radius) = config.visual_radius {
                if !(radius.is_finite() && radius > 0.0) {
                    return Err(ConfigError::InvalidVisualRadius {
                        body: name.clone(),
                        radius,
                    });
                }
            }

            bodies.push(Body {
                id: BodyID(idx),
                info: BodyInfo {
                    name: name.clone(),
                    visual_radius: config.visual_radius,
                    color,
                },
                kind: body_kind,
            });
        }

        let view = ViewSettings {
            rings: self.view.rings,
            connector: resolve_connector(self.view.connector.as_ref(), &bodies, &name_to_id)?,
        };

        Ok(System {
            time_scale: self.time_scale,
            names: self.order.iter().cloned().collect(),
            bodies,
            name_to_id,
            view,
        })
    }
}

fn validate_orbit(name: &str, orbit: &OrbitConfig) -> Result<CircularOrbit, ConfigError> {
    if !(orbit.radius.is_finite() && orbit.radius > 0.0) {
        return Err(ConfigError::InvalidRadius {
            body: name.to_owned(),
            radius: orbit.radius,
        });
    }

    let fields = [
        ("period", orbit.period),
        ("phase", orbit.phase),
        ("inclination", orbit.inclination),
        ("node", orbit.node),
    ];
    if let Some((field, _)) = fields.iter().find(|(_, v)| !v.is_finite()) {
        return Err(ConfigError::NonFiniteOrbit {
            body: name.to_owned(),
            field: *field,
        });
    }

    Ok(CircularOrbit {
        radius: orbit.radius,
        period: orbit.period,
        phase: orbit.phase,
        inclination: orbit.inclination,
        node: orbit.node,
    })
}

fn resolve_connector(
    config: Option<&ConnectorConfig>,
    bodies: &[Body],
    name_to_id: &HashMap<String, BodyID>,
) -> Result<Option<ConnectorSpec>, ConfigError> {
    let default_config = ConnectorConfig::default();
    let config = config.unwrap_or(&default_config);

    if !(0.0 <= config.min_radius && config.min_radius <= config.max_radius) {
        return Err(ConfigError::InvalidConnectorRadii {
            min: config.min_radius,
            max: config.max_radius,
        });
    }
    if !(config.k.is_finite() && config.k >= 0.0) {
        return Err(ConfigError::InvalidConnectorK(config.k));
    }

    let between = match &config.between {
        Some([a, b]) => {
            let lookup = |name: &String| -> Result<BodyID, ConfigError> {
                let id = *name_to_id
                    .get(name)
                    .ok_or_else(|| ConfigError::UnknownConnectorBody(name.clone()))?;
                if bodies[id.0].is_virtual() {
                    return Err(ConfigError::VirtualConnectorBody(name.clone()));
                }
                Ok(id)
            };
            let (a_id, b_id) = (lookup(a)?, lookup(b)?);
            if a_id == b_id {
                return Err(ConfigError::DegenerateConnector(a.clone()));
            }
            (a_id, b_id)
        }
        None => match find_binary_pair(bodies) {
            Some(pair) => pair,
            None => return Ok(None),
        },
    };

    Ok(Some(ConnectorSpec {
        between,
        k: config.k,
        min_radius: config.min_radius,
        max_radius: config.max_radius,
    }))
}

/// The first two binary children, in declared order, that share a barycenter.
fn find_binary_pair(bodies: &[Body]) -> Option<(BodyID, BodyID)> {
    let mut seen: HashMap<BodyID, BodyID> = HashMap::new();
    for body in bodies {
        if let BodyKind::BinaryChild { parent, .. } = body.kind {
            match seen.get(&parent) {
                Some(first) => return Some((*first, body.id)),
                None => {
                    seen.insert(parent, body.id);
                }
            }
        }
    }
    None
}

pub fn parse_color(s: &str) -> Option<Point3<f32>> {
    let s = s.strip_prefix('#').unwrap_or(s);
    if s.len() != 6 || !s.chars().all(|c| c.is_ascii_hexdigit()) {
        return None;
    }
    let r = u8::from_str_radix(&s[0..2], 16).ok()?;
    let g = u8::from_str_radix(&s[2..4], 16).ok()?;
    let b = u8::from_str_radix(&s[4..6], 16).ok()?;

    Some(Point3::new(
        r as f32 / 255.0,
        g as f32 / 255.0,
        b as f32 / 255.0,
    ))
}

impl System {
    pub fn time_scale(&self) -> f64 {
        self.time_scale
    }

    /// Bodies in declared order. A body's id is its index here.
    pub fn bodies(&self) -> &[Body] {
        &self.bodies
    }

    pub fn get_body(&self, id: BodyID) -> &Body {
        &self.bodies[id.0]
    }

    pub fn lookup(&self, name: &str) -> Option<&Body> {
        self.name_to_id.get(name).map(|id| &self.bodies[id.0])
    }

    pub fn id_of(&self, name: &str) -> Option<BodyID> {
        self.name_to_id.get(name).copied()
    }

    pub fn names(&self) -> &Arc<[String]> {
        &self.names
    }

    pub fn view(&self) -> &ViewSettings {
        &self.view
    }

    pub fn len(&self) -> usize {
        self.bodies.len()
    }

    pub fn is_empty(&self) -> bool {
        self.bodies.is_empty()
    }

    /// Names of every body that is a parent of some other body.
    pub fn parent_names(&self) -> HashSet<&str> {
        self.bodies
            .iter()
            .filter_map(|b| b.parent_id())
            .map(|id| self.bodies[id.0].name())
            .collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const SMALL_SYSTEM: &str = r#"
        time_scale = 2.0
        order = ["Sun", "Earth", "Moon", "Pair", "A", "B"]

        [bodies.Sun]
        kind = "Sun"
        visual_radius = 3.0
        color = "ffcc33"

        [bodies.Earth]
        kind = "Primary"
        orbit = { radius = 10.0, period = 20.0 }

        [bodies.Moon]
        kind = "Moon"
        parent = "Earth"
        orbit = { radius = 1.5, period = 4.0, inclination = 0.1 }

        [bodies.Pair]
        kind = "Barycenter"
        orbit = { radius = 30.0, period = 90.0, node = 0.5 }

        [bodies.A]
        kind = "BinaryChild"
        parent = "Pair"
        orbit = { radius = 2.0, period = 6.0 }

        [bodies.B]
        kind = "BinaryChild"
        parent = "Pair"
        orbit = { radius = 2.0, period = 6.0, phase = 3.141592653589793 }
    "#;

    fn parse(s: &str) -> SystemConfig {
        SystemConfig::from_toml_str(s).unwrap()
    }

    fn with_body(extra: &str, order: &[&str]) -> Result<System, ConfigError> {
        let order = order
            .iter()
            .map(|n| format!("{:?}", n))
            .collect::<Vec<_>>()
            .join(", ");
        let s = format!(
            "order = [{}]\n[bodies.Sun]\nkind = \"Sun\"\n{}",
            order, extra
        );
        parse(&s).validate()
    }

    #[test]
    fn test_small_system() {
        let system = parse(SMALL_SYSTEM).validate().unwrap();
        assert_eq!(system.len(), 6);
        assert_eq!(system.time_scale(), 2.0);
        assert_eq!(system.id_of("Moon"), Some(BodyID(2)));

        let moon = system.lookup("Moon").unwrap();
        assert_eq!(moon.parent_id(), system.id_of("Earth"));
        assert_eq!(moon.orbit().unwrap().inclination, 0.1);

        let sun = system.lookup("Sun").unwrap();
        assert_eq!(sun.kind, BodyKind::Sun);
        assert_eq!(sun.info.visual_radius, Some(3.0));
        approx::assert_relative_eq!(sun.info.color, Point3::new(1.0, 0.8, 0.2));

        assert!(system.lookup("Pair").unwrap().is_virtual());
        assert!(system.view().rings);

        // the connector defaults to the binary pair
        let connector = system.view().connector.unwrap();
        assert_eq!(connector.between, (BodyID(4), BodyID(5)));
        assert_eq!(connector.k, DEFAULT_CONNECTOR_K);

        let parents = system.parent_names();
        assert!(parents.contains("Earth") && parents.contains("Pair"));
        assert_eq!(parents.len(), 2);
    }

    #[test]
    fn test_defaults() {
        let system = with_body("", &["Sun"]).unwrap();
        assert_eq!(system.time_scale(), 1.0);
        assert_eq!(system.view().connector, None);

        let sat = with_body(
            "[bodies.X]\nkind = \"Primary\"\norbit = { radius = 1.0, period = 2.0 }",
            &["Sun", "X"],
        )
        .unwrap();
        let orbit = sat.lookup("X").unwrap().orbit().unwrap();
        assert_eq!((orbit.phase, orbit.inclination, orbit.node), (0.0, 0.0, 0.0));
    }

    #[test]
    fn test_dangling_parent() {
        let err = with_body(
            "[bodies.Moon]\nkind = \"Moon\"\nparent = \"Nowhere\"\norbit = { radius = 1.0, period = 2.0 }",
            &["Sun", "Moon"],
        )
        .unwrap_err();
        assert!(matches!(err, ConfigError::DanglingParent { ref parent, .. } if parent == "Nowhere"));
    }

    #[test]
    fn test_missing_parent() {
        let err = with_body(
            "[bodies.Moon]\nkind = \"BinaryChild\"\norbit = { radius = 1.0, period = 2.0 }",
            &["Sun", "Moon"],
        )
        .unwrap_err();
        assert!(matches!(
            err,
            ConfigError::MissingParent {
                kind: Kind::BinaryChild,
                ..
            }
        ));
    }

    #[test]
    fn test_wrong_parent_kind() {
        let err = with_body(
            "[bodies.Moon]\nkind = \"Moon\"\nparent = \"Sun\"\norbit = { radius = 1.0, period = 2.0 }",
            &["Sun", "Moon"],
        )
        .unwrap_err();
        assert!(matches!(
            err,
            ConfigError::WrongParentKind {
                expected: Kind::Primary,
                found: Kind::Sun,
                ..
            }
        ));
    }

    #[test]
    fn test_unknown_kind() {
        let err = with_body(
            "[bodies.X]\nkind = \"Comet\"\norbit = { radius = 1.0, period = 2.0 }",
            &["Sun", "X"],
        )
        .unwrap_err();
        assert!(matches!(err, ConfigError::UnknownKind { ref kind, .. } if kind == "Comet"));
    }

    #[test]
    fn test_bad_radius() {
        for radius in ["0.0", "-1.0", "nan", "inf"] {
            let err = with_body(
                &format!(
                    "[bodies.X]\nkind = \"Primary\"\norbit = {{ radius = {}, period = -1.0 }}",
                    radius
                ),
                &["Sun", "X"],
            )
            .unwrap_err();
            assert!(matches!(err, ConfigError::InvalidRadius { .. }), "{}", radius);
        }
    }

    #[test]
    fn test_non_finite_angle() {
        let err = with_body(
            "[bodies.X]\nkind = \"Primary\"\norbit = { radius = 1.0, period = 2.0, node = nan }",
            &["Sun", "X"],
        )
        .unwrap_err();
        assert!(matches!(err, ConfigError::NonFiniteOrbit { field: "node", .. }));
    }

    #[test]
    fn test_orbit_presence() {
        let err = with_body("[bodies.X]\nkind = \"Primary\"", &["Sun", "X"]).unwrap_err();
        assert!(matches!(err, ConfigError::MissingOrbit { .. }));

        let err = with_body(
            "[bodies.X]\nkind = \"Sun\"\norbit = { radius = 1.0, period = 2.0 }",
            &["Sun", "X"],
        )
        .unwrap_err();
        assert!(matches!(err, ConfigError::UnexpectedOrbit { .. }));

        let err = with_body(
            "[bodies.X]\nkind = \"Primary\"\nparent = \"Sun\"\norbit = { radius = 1.0, period = 2.0 }",
            &["Sun", "X"],
        )
        .unwrap_err();
        assert!(matches!(err, ConfigError::UnexpectedParent { .. }));
    }

    #[test]
    fn test_order_mismatch() {
        let err = with_body("", &["Sun", "Ghost"]).unwrap_err();
        assert!(matches!(err, ConfigError::UnknownOrderEntry(ref n) if n == "Ghost"));

        let err = with_body("", &["Sun", "Sun"]).unwrap_err();
        assert!(matches!(err, ConfigError::DuplicateOrderEntry(_)));

        let err = with_body(
            "[bodies.X]\nkind = \"Primary\"\norbit = { radius = 1.0, period = 2.0 }",
            &["Sun"],
        )
        .unwrap_err();
        assert!(matches!(err, ConfigError::NotInOrder(ref n) if n == "X"));
    }

    #[test]
    fn test_bad_color() {
        let err = with_body(
            "[bodies.X]\nkind = \"Primary\"\ncolor = \"zz0000\"\norbit = { radius = 1.0, period = 2.0 }",
            &["Sun", "X"],
        )
        .unwrap_err();
        assert!(matches!(err, ConfigError::InvalidColor { .. }));
    }

    #[test]
    fn test_connector_checks() {
        let mut config = parse(SMALL_SYSTEM);
        config.view.connector = Some(ConnectorConfig {
            between: Some(["Earth".to_owned(), "Moon".to_owned()]),
            ..ConnectorConfig::default()
        });
        let system = config.validate().unwrap();
        assert_eq!(
            system.view().connector.unwrap().between,
            (BodyID(1), BodyID(2))
        );

        config.view.connector = Some(ConnectorConfig {
            between: Some(["Earth".to_owned(), "Pair".to_owned()]),
            ..ConnectorConfig::default()
        });
        assert!(matches!(
            config.validate(),
            Err(ConfigError::VirtualConnectorBody(_))
        ));

        config.view.connector = Some(ConnectorConfig {
            between: Some(["Earth".to_owned(), "Earth".to_owned()]),
            ..ConnectorConfig::default()
        });
        assert!(matches!(
            config.validate(),
            Err(ConfigError::DegenerateConnector(_))
        ));

        config.view.connector = Some(ConnectorConfig {
            min_radius: 2.0,
            max_radius: 1.0,
            ..ConnectorConfig::default()
        });
        assert!(matches!(
            config.validate(),
            Err(ConfigError::InvalidConnectorRadii { .. })
        ));

        for k in [f64::NAN, f64::INFINITY, -0.5] {
            config.view.connector = Some(ConnectorConfig {
                k,
                ..ConnectorConfig::default()
            });
            assert!(matches!(
                config.validate(),
                Err(ConfigError::InvalidConnectorK(_))
            ));
        }
    }

    #[test]
    fn test_connector_k_from_toml() {
        let err = SystemConfig::from_toml_str(
            "order = [\"Sun\"]\n[bodies.Sun]\nkind = \"Sun\"\n[view.connector]\nk = nan",
        )
        .unwrap()
        .validate()
        .unwrap_err();
        assert!(matches!(err, ConfigError::InvalidConnectorK(k) if k.is_nan()));
    }

    #[test]
    fn test_bad_visual_radius() {
        for radius in ["-1.0", "0.0", "nan"] {
            let err = with_body(
                &format!(
                    "[bodies.X]\nkind = \"Primary\"\nvisual_radius = {}\norbit = {{ radius = 1.0, period = 2.0 }}",
                    radius
                ),
                &["Sun", "X"],
            )
            .unwrap_err();
            assert!(matches!(
                err,
                ConfigError::InvalidVisualRadius { ref body, .. } if body == "X"
            ));
        }
    }

    #[test]
    fn test_malformed_toml() {
        assert!(matches!(
            SystemConfig::from_toml_str("order = ["),
            Err(ConfigError::Parse(_))
        ));
        // typos in field names are caught rather than ignored
        assert!(matches!(
            SystemConfig::from_toml_str("order = []\nbodies = {}\ntimescale = 1.0"),
            Err(ConfigError::Parse(_))
        ));
    }

    #[test]
    fn test_parse_color() {
        assert_eq!(parse_color("ff0000"), Some(Point3::new(1.0, 0.0, 0.0)));
        assert_eq!(parse_color("#00ff00"), Some(Point3::new(0.0, 1.0, 0.0)));
        assert_eq!(parse_color("fff"), None);
        assert_eq!(parse_color("ééé"), None);
        // from_str_radix alone would take the signs
        assert_eq!(parse_color("+f+f+f"), None);
    }
}
