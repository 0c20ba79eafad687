//! Drawing targets for entities.
//!
//! Entities know how to draw themselves onto a [`Surface`]; the crate ships a
//! character-grid canvas for terminals and tests.

use std::fmt;

use glam::Vec2;

use crate::entity::EntityKind;

pub trait Surface {
    fn draw_circle(&mut self, kind: EntityKind, center: Vec2, radius: f32);
    fn draw_polygon(&mut self, kind: EntityKind, vertices: &[Vec2]);
}

/// Character grid covering the whole world. Each cell shows the last entity
/// drawn into it.
pub struct AsciiSurface {
    columns: usize,
    rows: usize,
    cell: Vec2,
    cells: Vec<char>,
}

impl AsciiSurface {
    pub fn new(bounds: Vec2, columns: usize, rows: usize) -> Self {
        let columns = columns.max(1);
        let rows = rows.max(1);
        Self {
            columns,
            rows,
            cell: Vec2::new(bounds.x / columns as f32, bounds.y / rows as f32),
            cells: vec!['.'; columns * rows],
        }
    }

    pub fn clear(&mut self) {
        self.cells.fill('.');
    }

    pub fn glyph_at(&self, column: usize, row: usize) -> Option<char> {
        if column < self.columns && row < self.rows {
            Some(self.cells[row * self.columns + column])
        } else {
            None
        }
    }

    pub fn count(&self, glyph: char) -> usize {
        self.cells.iter().filter(|c| **c == glyph).count()
    }

    fn plot(&mut self, point: Vec2, glyph: char) {
        if !point.is_finite() || point.x < 0.0 || point.y < 0.0 {
            return;
        }
        let column = (point.x / self.cell.x) as usize;
        let row = (point.y / self.cell.y) as usize;
        if column < self.columns && row < self.rows {
            // row 0 is the top line, world y grows upwards
            let flipped = self.rows - 1 - row;
            self.cells[flipped * self.columns + column] = glyph;
        }
    }
}

fn glyph(kind: EntityKind) -> char {
    match kind {
        EntityKind::Food => '*',
        EntityKind::Shark => 'S',
    }
}

impl Surface for AsciiSurface {
    fn draw_circle(&mut self, kind: EntityKind, center: Vec2, _radius: f32) {
        self.plot(center, glyph(kind));
    }

    fn draw_polygon(&mut self, kind: EntityKind, vertices: &[Vec2]) {
        if vertices.is_empty() {
            return;
        }
        let centroid = vertices.iter().copied().sum::<Vec2>() / vertices.len() as f32;
        self.plot(centroid, glyph(kind));
    }
}

impl fmt::Display for AsciiSurface {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        for row in self.cells.chunks(self.columns) {
            let line: String = row.iter().collect();
            writeln!(f, "{line}")?;
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn plots_kinds_with_distinct_glyphs() {
        let mut surface = AsciiSurface::new(Vec2::new(10.0, 10.0), 10, 10);
        surface.draw_circle(EntityKind::Food, Vec2::new(0.5, 0.5), 0.5);
        surface.draw_polygon(
            EntityKind::Shark,
            &[Vec2::new(8.0, 9.0), Vec2::new(9.0, 9.0), Vec2::new(8.5, 9.9)],
        );

        assert_eq!(surface.glyph_at(0, 9), Some('*'));
        assert_eq!(surface.glyph_at(8, 0), Some('S'));
        assert_eq!(surface.count('*'), 1);
        assert_eq!(surface.count('S'), 1);
    }

    #[test]
    fn ignores_points_outside_the_grid() {
        let mut surface = AsciiSurface::new(Vec2::new(4.0, 4.0), 4, 4);
        surface.draw_circle(EntityKind::Food, Vec2::new(-1.0, 2.0), 0.5);
        surface.draw_circle(EntityKind::Food, Vec2::new(2.0, 40.0), 0.5);
        assert_eq!(surface.count('*'), 0);
        assert_eq!(surface.to_string().lines().count(), 4);
    }
}
