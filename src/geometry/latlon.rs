use crate::error::{InputError, Result};

/// Geographic position in degrees.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct LatLon {
    pub latitude: f64,
    pub longitude: f64,
}

impl LatLon {
    /// Creates a position from latitude and longitude in degrees.
    #[must_use]
    pub fn new(latitude: f64, longitude: f64) -> Self {
        Self {
            latitude,
            longitude,
        }
    }

    fn is_in_range(&self) -> bool {
        self.latitude.is_finite()
            && self.longitude.is_finite()
            && (-90.0..=90.0).contains(&self.latitude)
            && (-180.0..=180.0).contains(&self.longitude)
    }
}

/// Open sequence of geographic positions.
pub type GeoPath = Vec<LatLon>;

/// Swaths of one ring in geographic coordinates.
pub type GeoMultiPath = Vec<GeoPath>;

/// Field boundary in geographic coordinates: one outer ring plus holes.
///
/// Rings are stored closed. Winding is not significant here; it is
/// normalized after projection.
#[derive(Debug, Clone, PartialEq)]
pub struct GeoPolygon {
    outer: Vec<LatLon>,
    holes: Vec<Vec<LatLon>>,
}

impl GeoPolygon {
    /// Builds a polygon, closing any ring whose last point differs from its
    /// first.
    ///
    /// # Errors
    ///
    /// Returns `InputError::MalformedPolygon` if a ring has fewer than three
    /// distinct positions or a position is non-finite or out of range.
    pub fn new(outer: Vec<LatLon>, holes: Vec<Vec<LatLon>>) -> Result<Self> {
        let outer = close_ring(outer, "outer ring")?;
        let holes = holes
            .into_iter()
            .enumerate()
            .map(|(i, hole)| close_ring(hole, &format!("hole {i}")))
            .collect::<Result<Vec<_>>>()?;
        Ok(Self { outer, holes })
    }

    /// The closed outer ring.
    #[must_use]
    pub fn outer(&self) -> &[LatLon] {
        &self.outer
    }

    /// The closed hole rings.
    #[must_use]
    pub fn holes(&self) -> &[Vec<LatLon>] {
        &self.holes
    }

    /// South-west and north-east corners of the outer ring's bounding box.
    #[must_use]
    pub fn envelope(&self) -> (LatLon, LatLon) {
        let mut min = LatLon::new(f64::INFINITY, f64::INFINITY);
        let mut max = LatLon::new(f64::NEG_INFINITY, f64::NEG_INFINITY);
        for p in &self.outer {
            min.latitude = min.latitude.min(p.latitude);
            min.longitude = min.longitude.min(p.longitude);
            max.latitude = max.latitude.max(p.latitude);
            max.longitude = max.longitude.max(p.longitude);
        }
        (min, max)
    }
}

fn close_ring(mut ring: Vec<LatLon>, name: &str) -> Result<Vec<LatLon>> {
    if let Some(bad) = ring.iter().find(|p| !p.is_in_range()) {
        return Err(InputError::MalformedPolygon(format!(
            "{name}: position ({}, {}) out of range",
            bad.latitude, bad.longitude
        ))
        .into());
    }
    if let (Some(first), Some(last)) = (ring.first().copied(), ring.last().copied()) {
        if first != last {
            ring.push(first);
        }
    }
    let mut distinct = ring.clone();
    distinct.dedup();
    if distinct.len() < 4 {
        return Err(InputError::MalformedPolygon(format!(
            "{name}: needs at least 3 distinct positions"
        ))
        .into());
    }
    Ok(ring)
}
