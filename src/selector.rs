use crate::block_position::{BlockColumn, BlockPosition};
use crate::error::EditError;
use crate::region::{ConvexPolyhedronRegion, CuboidRegion, Polygonal2DRegion};

/// Interactive two-point cuboid selection. `region()` fails until both
/// corners are chosen.
#[derive(Debug, Clone, Default)]
pub struct CuboidSelector {
    primary: Option<BlockPosition>,
    secondary: Option<BlockPosition>,
}

impl CuboidSelector {
    pub fn new() -> Self {
        CuboidSelector::default()
    }

    pub fn select_primary(&mut self, position: BlockPosition) {
        self.primary = Some(position);
    }

    pub fn select_secondary(&mut self, position: BlockPosition) {
        self.secondary = Some(position);
    }

    pub fn is_defined(&self) -> bool {
        self.primary.is_some() && self.secondary.is_some()
    }

    pub fn region(&self) -> Result<CuboidRegion, EditError> {
        match (self.primary, self.secondary) {
            (Some(a), Some(b)) => Ok(CuboidRegion::new(a, b)),
            _ => Err(EditError::IncompleteSelection(
                "cuboid selection needs two corner points".to_string(),
            )),
        }
    }

    pub fn clear(&mut self) {
        self.primary = None;
        self.secondary = None;
    }
}

/// Interactive polygon selection: an ordered footprint outline plus the
/// vertical range swept from the selected points' Y values.
#[derive(Debug, Clone, Default)]
pub struct Polygonal2DSelector {
    points: Vec<BlockColumn>,
    min_y: Option<i32>,
    max_y: Option<i32>,
}

impl Polygonal2DSelector {
    pub fn new() -> Self {
        Polygonal2DSelector::default()
    }

    pub fn select(&mut self, position: BlockPosition) {
        self.points.push(position.column());
        self.min_y = Some(self.min_y.map_or(position.y, |y| y.min(position.y)));
        self.max_y = Some(self.max_y.map_or(position.y, |y| y.max(position.y)));
    }

    pub fn is_defined(&self) -> bool {
        self.points.len() >= 3
    }

    pub fn region(&self) -> Result<Polygonal2DRegion, EditError> {
        if !self.is_defined() {
            return Err(EditError::IncompleteSelection(format!(
                "polygon selection needs at least 3 points, has {}",
                self.points.len()
            )));
        }
        // is_defined implies the Y range is set.
        let min_y = self.min_y.unwrap_or(0);
        let max_y = self.max_y.unwrap_or(0);
        Ok(Polygonal2DRegion::new(self.points.clone(), min_y, max_y))
    }

    pub fn clear(&mut self) {
        self.points.clear();
        self.min_y = None;
        self.max_y = None;
    }
}

/// Interactive convex hull selection; every selected point becomes a
/// candidate vertex.
#[derive(Debug, Clone, Default)]
pub struct ConvexSelector {
    region: ConvexPolyhedronRegion,
}

impl ConvexSelector {
    pub fn new() -> Self {
        ConvexSelector::default()
    }

    pub fn select(&mut self, position: BlockPosition) -> bool {
        self.region.add_vertex(position)
    }

    pub fn region(&self) -> Result<ConvexPolyhedronRegion, EditError> {
        if !self.region.is_defined() {
            return Err(EditError::IncompleteSelection(format!(
                "convex selection needs at least 3 vertices, has {}",
                self.region.vertices().len()
            )));
        }
        Ok(self.region.clone())
    }

    pub fn clear(&mut self) {
        self.region = ConvexPolyhedronRegion::new();
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::region::{FlatRegion, Region};

    #[test]
    fn test_incomplete_cuboid_selection() {
        let mut selector = CuboidSelector::new();
        assert!(matches!(
            selector.region(),
            Err(EditError::IncompleteSelection(_))
        ));
        selector.select_primary(BlockPosition::new(0, 0, 0));
        assert!(selector.region().is_err());
        selector.select_secondary(BlockPosition::new(2, 2, 2));
        assert_eq!(selector.region().unwrap().volume(), 27);
    }

    #[test]
    fn test_polygon_selection_tracks_y_sweep() {
        let mut selector = Polygonal2DSelector::new();
        selector.select(BlockPosition::new(0, 3, 0));
        selector.select(BlockPosition::new(4, 0, 0));
        assert!(selector.region().is_err());
        selector.select(BlockPosition::new(4, 7, 4));
        let region = selector.region().unwrap();
        assert_eq!(region.y_range(), (0, 7));
    }
}
