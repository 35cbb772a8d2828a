use std::sync::Arc;

use nalgebra::Point3;

use super::body::BodyID;

/// Position of every body at one instant, indexed by `BodyID` and kept in
/// declared order.
#[derive(Debug, Clone, PartialEq)]
pub struct Positions {
    names: Arc<[String]>,
    points: Vec<Point3<f64>>,
}

impl Positions {
    /// A table with every body parked at the origin.
    pub fn new(names: Arc<[String]>) -> Self {
        let points = vec![Point3::origin(); names.len()];
        Positions { names, points }
    }

    pub fn len(&self) -> usize {
        self.points.len()
    }

    pub fn is_empty(&self) -> bool {
        self.points.is_empty()
    }

    pub fn get(&self, name: &str) -> Option<Point3<f64>> {
        let idx = self.names.iter().position(|n| n == name)?;
        Some(self.points[idx])
    }

    pub fn get_by_id(&self, id: BodyID) -> Option<Point3<f64>> {
        self.points.get(id.0).copied()
    }

    pub fn iter(&self) -> impl Iterator<Item = (&str, Point3<f64>)> + '_ {
        self.names
            .iter()
            .map(String::as_str)
            .zip(self.points.iter().copied())
    }

    pub(crate) fn set(&mut self, id: BodyID, point: Point3<f64>) {
        self.points[id.0] = point;
    }
}

impl FromIterator<(String, Point3<f64>)> for Positions {
    fn from_iter<I: IntoIterator<Item = (String, Point3<f64>)>>(iter: I) -> Self {
        let (names, points): (Vec<String>, Vec<Point3<f64>>) = iter.into_iter().unzip();
        Positions {
            names: names.into(),
            points,
        }
    }
}
