use geo::MultiLineString;

use crate::error::{InternalError, Result};
use crate::geometry::{MultiPath, Path, Ring};

/// Slices a canonical ring into swaths at its corners.
///
/// Swath `i` runs from `corners[i]` through `corners[i + 1]` inclusive, so
/// neighbors share their corner point. The last swath runs from the last
/// corner through the closing point, back to the start.
#[derive(Debug)]
pub struct ExtractSwaths<'a> {
    ring: &'a Ring,
    corners: &'a [usize],
}

impl<'a> ExtractSwaths<'a> {
    /// Creates a new extraction from a canonical `ring` and its `corners`.
    #[must_use]
    pub fn new(ring: &'a Ring, corners: &'a [usize]) -> Self {
        Self { ring, corners }
    }

    /// Executes the extraction. Returns one path per corner.
    ///
    /// # Errors
    ///
    /// `InternalError::Precondition` unless the ring is closed and the
    /// corners are at least two, start at 0, ascend strictly and stay below
    /// the closing point.
    pub fn execute(&self) -> Result<MultiPath> {
        self.check()?;
        let points = &self.ring.0;
        let closing = points.len() - 1;

        let bounds = self
            .corners
            .windows(2)
            .map(|w| (w[0], w[1]))
            .chain(self.corners.last().map(|&c| (c, closing)));
        let paths: Vec<Path> = bounds
            .map(|(start, end)| Path::new(points[start..=end].to_vec()))
            .collect();
        Ok(MultiLineString::new(paths))
    }

    fn check(&self) -> Result<()> {
        let points = &self.ring.0;
        let violation = if points.len() < 4 || points.first() != points.last() {
            Some("ring is not closed".to_string())
        } else if self.corners.len() < 2 {
            Some(format!("need at least 2 corners, got {}", self.corners.len()))
        } else if self.corners[0] != 0 {
            Some(format!("first corner is {}, not 0", self.corners[0]))
        } else if self.corners.windows(2).any(|w| w[0] >= w[1]) {
            Some("corners not strictly ascending".to_string())
        } else if self.corners.iter().any(|&c| c >= points.len() - 1) {
            Some("corner index at or past the closing point".to_string())
        } else {
            None
        };
        match violation {
            Some(msg) => Err(InternalError::Precondition(msg).into()),
            None => Ok(()),
        }
    }
}
