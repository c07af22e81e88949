//! Arrow glyphs drawn while a level is rendered.
//!
//! Each arrow occupies a 9×9 grid of square cells: a shaft through the middle
//! and a head made of two four-cell diagonals meeting at the tip.

#[cfg(feature = "embedded-graphics")]
use embedded_graphics::{
    pixelcolor::BinaryColor, prelude::*, primitives::Rectangle, style::PrimitiveStyle,
};

use crate::direction::Direction;

/// Width and height of a glyph, in cells
pub const GRID: u8 = 9;

const MID: u8 = GRID / 2;
const HEAD: u8 = 4;

/// Cells of an arrow pointing up, as `(column, row)`
fn up_cells() -> impl Iterator<Item = (u8, u8)> {
    let shaft = (0..GRID).map(|row| (MID, row));
    let left = (1..=HEAD).map(|i| (MID - i, i));
    let right = (1..=HEAD).map(|i| (MID + i, i));
    shaft.chain(left).chain(right)
}

/// Cells making up the arrow for `direction`, as `(column, row)`
pub fn cells(direction: Direction) -> impl Iterator<Item = (u8, u8)> {
    let last = GRID - 1;
    up_cells().map(move |(col, row)| match direction {
        Direction::Up => (col, row),
        Direction::Down => (col, last - row),
        Direction::Left => (row, col),
        Direction::Right => (last - row, col),
    })
}

/// Draw the arrow for `direction` centered at `center`, with square cells of
/// `cell` pixels
#[cfg(feature = "embedded-graphics")]
pub fn draw<D>(
    direction: Direction,
    target: &mut D,
    center: Point,
    cell: i32,
) -> Result<(), D::Error>
where
    D: DrawTarget<BinaryColor>,
{
    let half = i32::from(MID) * cell + cell / 2;
    let origin = center - Point::new(half, half);
    let style = PrimitiveStyle::with_fill(BinaryColor::On);
    for (col, row) in cells(direction) {
        let top_left = origin + Point::new(i32::from(col) * cell, i32::from(row) * cell);
        let bottom_right = top_left + Point::new(cell - 1, cell - 1);
        Rectangle::new(top_left, bottom_right)
            .into_styled(style)
            .draw(target)?;
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    extern crate std;
    use std::vec::Vec;

    fn collect(direction: Direction) -> Vec<(u8, u8)> {
        let mut cells: Vec<_> = cells(direction).collect();
        cells.sort();
        cells
    }

    #[test]
    fn seventeen_distinct_cells() {
        for &direction in Direction::PRIORITY.iter() {
            let mut cells = collect(direction);
            cells.dedup();
            assert_eq!(cells.len(), 17);
            assert!(cells.iter().all(|&(col, row)| col < GRID && row < GRID));
        }
    }

    #[test]
    fn tips_point_the_right_way() {
        // the tip is the only cell on its edge of the grid
        let up = collect(Direction::Up);
        assert_eq!(up.iter().filter(|&&(_, row)| row == 0).count(), 1);
        assert!(up.contains(&(4, 0)));

        let down = collect(Direction::Down);
        assert_eq!(down.iter().filter(|&&(_, row)| row == 8).count(), 1);
        assert!(down.contains(&(4, 8)));

        let left = collect(Direction::Left);
        assert_eq!(left.iter().filter(|&&(col, _)| col == 0).count(), 1);
        assert!(left.contains(&(0, 4)));

        let right = collect(Direction::Right);
        assert_eq!(right.iter().filter(|&&(col, _)| col == 8).count(), 1);
        assert!(right.contains(&(8, 4)));
    }

    /// Records every lit pixel
    #[cfg(feature = "embedded-graphics")]
    #[derive(Default)]
    struct Pixels(Vec<Point>);

    #[cfg(feature = "embedded-graphics")]
    impl DrawTarget<BinaryColor> for Pixels {
        type Error = core::convert::Infallible;

        fn draw_pixel(
            &mut self,
            Pixel(point, color): Pixel<BinaryColor>,
        ) -> Result<(), Self::Error> {
            if color == BinaryColor::On {
                self.0.push(point);
            }
            Ok(())
        }

        fn size(&self) -> Size {
            Size::new(64, 64)
        }
    }

    #[test]
    #[cfg(feature = "embedded-graphics")]
    fn draw_centers_the_grid() {
        let mut target = Pixels::default();
        draw(Direction::Up, &mut target, Point::new(27, 27), 6).unwrap();

        let pixels = &target.0;
        assert_eq!(pixels.len(), 17 * 36);
        assert_eq!(pixels.iter().map(|p| p.x).min(), Some(0));
        assert_eq!(pixels.iter().map(|p| p.y).min(), Some(0));
        assert_eq!(pixels.iter().map(|p| p.x).max(), Some(53));
        assert_eq!(pixels.iter().map(|p| p.y).max(), Some(53));
        // tip cell of an up arrow
        assert!(pixels.contains(&Point::new(24, 0)));
        assert!(pixels.contains(&Point::new(29, 5)));
    }

    #[test]
    fn head_spans_the_grid() {
        let up = collect(Direction::Up);
        assert!(up.contains(&(0, 4)));
        assert!(up.contains(&(8, 4)));
        assert!(up.contains(&(4, 8)));
    }
}
