use std::fmt;
use std::str::FromStr;

use nalgebra::Point3;

use super::orbit::CircularOrbit;

/// Index of a body in the declared order.
#[derive(Debug, Clone, Copy, Hash, PartialEq, Eq, PartialOrd, Ord)]
pub struct BodyID(pub usize);

/// The bare kind of a body, as written in a config file.
#[derive(Debug, Clone, Copy, Hash, PartialEq, Eq)]
pub enum Kind {
    Sun,
    Primary,
    Barycenter,
    Moon,
    BinaryChild,
}

/// How a body moves. Each variant carries exactly what it needs: only dependents
/// have a parent, and only the sun lacks an orbit.
#[derive(Debug, Clone, PartialEq)]
pub enum BodyKind {
    Sun,
    Primary {
        orbit: CircularOrbit,
    },
    Barycenter {
        orbit: CircularOrbit,
    },
    Moon {
        orbit: CircularOrbit,
        parent: BodyID,
    },
    BinaryChild {
        orbit: CircularOrbit,
        parent: BodyID,
    },
}

// All the display-only info about a body
#[derive(Debug, Clone, PartialEq)]
pub struct BodyInfo {
    pub name: String,
    pub visual_radius: Option<f32>,
    pub color: Point3<f32>,
}

#[derive(Debug, Clone, PartialEq)]
pub struct Body {
    pub id: BodyID,
    pub info: BodyInfo,
    pub kind: BodyKind,
}

impl Kind {
    pub const ALL: [Kind; 5] = [
        Kind::Sun,
        Kind::Primary,
        Kind::Barycenter,
        Kind::Moon,
        Kind::BinaryChild,
    ];

    pub fn as_str(self) -> &'static str {
        match self {
            Kind::Sun => "Sun",
            Kind::Primary => "Primary",
            Kind::Barycenter => "Barycenter",
            Kind::Moon => "Moon",
            Kind::BinaryChild => "BinaryChild",
        }
    }

    pub fn has_orbit(self) -> bool {
        !matches!(self, Kind::Sun)
    }

    /// The kind a parent must have, for kinds that need a parent at all.
    pub fn required_parent(self) -> Option<Kind> {
        match self {
            Kind::Moon => Some(Kind::Primary),
            Kind::BinaryChild => Some(Kind::Barycenter),
            Kind::Sun | Kind::Primary | Kind::Barycenter => None,
        }
    }
}

impl fmt::Display for Kind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct UnknownKind(pub String);

impl FromStr for Kind {
    type Err = UnknownKind;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Kind::ALL
            .iter()
            .copied()
            .find(|k| k.as_str() == s)
            .ok_or_else(|| UnknownKind(s.to_owned()))
    }
}

impl BodyKind {
    pub fn kind(&self) -> Kind {
        match self {
            BodyKind::Sun => Kind::Sun,
            BodyKind::Primary { .. } => Kind::Primary,
            BodyKind::Barycenter { .. } => Kind::Barycenter,
            BodyKind::Moon { .. } => Kind::Moon,
            BodyKind::BinaryChild { .. } => Kind::BinaryChild,
        }
    }

    pub fn orbit(&self) -> Option<&CircularOrbit> {
        match self {
            BodyKind::Sun => None,
            BodyKind::Primary { orbit }
            | BodyKind::Barycenter { orbit }
            | BodyKind::Moon { orbit, .. }
            | BodyKind::BinaryChild { orbit, .. } => Some(orbit),
        }
    }

    pub fn parent(&self) -> Option<BodyID> {
        match self {
            BodyKind::Moon { parent, .. } | BodyKind::BinaryChild { parent, .. } => Some(*parent),
            BodyKind::Sun | BodyKind::Primary { .. } | BodyKind::Barycenter { .. } => None,
        }
    }
}

impl Body {
    pub fn name(&self) -> &str {
        &self.info.name
    }

    pub fn orbit(&self) -> Option<&CircularOrbit> {
        self.kind.orbit()
    }

    pub fn parent_id(&self) -> Option<BodyID> {
        self.kind.parent()
    }

    /// Barycenters take part in kinematics but are never drawn.
    pub fn is_virtual(&self) -> bool {
        matches!(self.kind, BodyKind::Barycenter { .. })
    }
}
