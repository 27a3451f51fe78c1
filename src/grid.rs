use crate::parse::Slot;
use crate::store::{Constraint, CrossSlotConstraint};
use crate::{Error, BLOCK_CHAR, MISSING_CHAR, VOID_CHAR};
use std::fmt;

/// One of the four scan axes. Slots only ever run `Across` or `Down`; the
/// diagonal axes exist for the accidental-word scanner.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum Direction {
    Across,
    Down,
    DiagonalDown,
    DiagonalUp,
}

impl Direction {
    pub(crate) fn step(self) -> (isize, isize) {
        match self {
            Direction::Across => (1, 0),
            Direction::Down => (0, 1),
            Direction::DiagonalDown => (1, 1),
            Direction::DiagonalUp => (1, -1),
        }
    }

    pub fn perpendicular(self) -> Direction {
        match self {
            Direction::Across => Direction::Down,
            Direction::Down => Direction::Across,
            Direction::DiagonalDown => Direction::DiagonalUp,
            Direction::DiagonalUp => Direction::DiagonalDown,
        }
    }
}

/// A rectangular cell buffer. `MISSING_CHAR` marks an open cell with no
/// letter yet, `BLOCK_CHAR` a block, `VOID_CHAR` a cell outside the puzzle.
/// The engine never owns the grid; this type is the collaborator it queries.
#[derive(PartialEq, Eq, Debug, Hash, Clone)]
pub struct Grid {
    pub(crate) contents: String,
    pub(crate) width: usize,
    pub(crate) height: usize,
}

impl Grid {
    pub fn square(contents: String) -> Result<Grid, Error> {
        let without_newlines: String = contents.chars().filter(|c| *c != '\n').collect();

        let width = (without_newlines.len() as f64).sqrt() as usize;
        if width * width != without_newlines.len() {
            return Err(Error::MalformedGrid(String::from(
                "contents are not a square",
            )));
        }
        Grid::rectangle(without_newlines, width, width)
    }

    pub fn rectangle(contents: String, width: usize, height: usize) -> Result<Grid, Error> {
        let without_newlines: String = contents.chars().filter(|c| *c != '\n').collect();

        if without_newlines.len() != width * height {
            return Err(Error::MalformedGrid(format!(
                "expected {} cells, got {}",
                width * height,
                without_newlines.len()
            )));
        }
        if !without_newlines.is_ascii() {
            return Err(Error::MalformedGrid(String::from(
                "contents are not ascii",
            )));
        }
        Ok(Grid {
            contents: without_newlines,
            width,
            height,
        })
    }

    pub fn width(&self) -> usize {
        self.width
    }

    pub fn height(&self) -> usize {
        self.height
    }

    pub fn cell(&self, x: usize, y: usize) -> char {
        self.contents.as_bytes()[y * self.width + x] as char
    }

    pub fn set_cell(&mut self, x: usize, y: usize, c: char) {
        let index = y * self.width + x;
        // cells are ascii by construction
        unsafe { self.contents.as_bytes_mut()[index] = c as u8 }
    }

    /// An open cell: inside the puzzle and neither a block nor a void.
    pub fn is_available(&self, x: usize, y: usize) -> bool {
        if x >= self.width || y >= self.height {
            return false;
        }
        let c = self.cell(x, y);
        c != BLOCK_CHAR && c != VOID_CHAR
    }

    pub fn cells(&self) -> impl Iterator<Item = (usize, usize)> + '_ {
        let width = self.width;
        (0..self.height).flat_map(move |y| (0..width).map(move |x| (x, y)))
    }

    fn neighbor(&self, x: usize, y: usize, dx: isize, dy: isize) -> Option<(usize, usize)> {
        let nx = x as isize + dx;
        let ny = y as isize + dy;
        if nx < 0 || ny < 0 || nx >= self.width as isize || ny >= self.height as isize {
            return None;
        }
        Some((nx as usize, ny as usize))
    }

    /// Cells from `(x, y)` inclusive, walking `direction` (or its opposite)
    /// until a block, void or the edge of the grid.
    pub fn in_direction(
        &self,
        x: usize,
        y: usize,
        direction: Direction,
        reverse: bool,
    ) -> Vec<(usize, usize)> {
        let (mut dx, mut dy) = direction.step();
        if reverse {
            dx = -dx;
            dy = -dy;
        }
        let mut result = vec![];
        let mut current = (x, y);
        while self.is_available(current.0, current.1) {
            result.push(current);
            match self.neighbor(current.0, current.1, dx, dy) {
                Some(next) => current = next,
                None => break,
            }
        }
        result
    }

    /// The first cell of the slot that contains `(x, y)` in `direction`.
    pub fn get_start_word(&self, x: usize, y: usize, direction: Direction) -> (usize, usize) {
        let (dx, dy) = direction.step();
        let mut current = (x, y);
        loop {
            match self.neighbor(current.0, current.1, -dx, -dy) {
                Some((px, py)) if self.is_available(px, py) => current = (px, py),
                _ => return current,
            }
        }
    }

    /// Length of the slot containing `(x, y)` in `direction`.
    pub fn word_length(&self, x: usize, y: usize, direction: Direction) -> usize {
        let (sx, sy) = self.get_start_word(x, y, direction);
        self.in_direction(sx, sy, direction, false).len()
    }

    /// Known letters of the slot containing `(x, y)`, as `(position, letter)`
    /// pairs. Cells holding `MISSING_CHAR` contribute nothing.
    pub fn gather_constraints(&self, x: usize, y: usize, direction: Direction) -> Vec<Constraint> {
        let (sx, sy) = self.get_start_word(x, y, direction);
        self.in_direction(sx, sy, direction, false)
            .iter()
            .enumerate()
            .filter_map(|(position, &(cx, cy))| {
                let c = self.cell(cx, cy);
                if c == MISSING_CHAR {
                    return None;
                }
                Some(Constraint {
                    position,
                    letter: c.to_ascii_lowercase(),
                })
            })
            .collect()
    }

    /// One `CrossSlotConstraint` per position of the slot containing
    /// `(x, y)`, describing the crossing slot met at that cell.
    pub fn gather_all_constraints(
        &self,
        x: usize,
        y: usize,
        direction: Direction,
    ) -> Vec<CrossSlotConstraint> {
        let (sx, sy) = self.get_start_word(x, y, direction);
        let crossing = direction.perpendicular();
        self.in_direction(sx, sy, direction, false)
            .iter()
            .map(|&(cx, cy)| {
                let (ox, oy) = self.get_start_word(cx, cy, crossing);
                let other_length = self.word_length(cx, cy, crossing);
                let intersection_index = match crossing {
                    Direction::Across => cx - ox,
                    _ => cy - oy,
                };
                CrossSlotConstraint {
                    intersection_index,
                    other_length,
                    other_constraints: self.gather_constraints(cx, cy, crossing),
                }
            })
            .collect()
    }
}

/// Iterates the characters of one slot. Adapted to slots recomputed on
/// demand; the grid stays borrowed for the iterator's lifetime.
#[derive(Clone, Debug)]
pub struct SlotIterator<'s> {
    grid: &'s Grid,
    slot: &'s Slot,
    index: usize,
}

impl<'s> SlotIterator<'s> {
    pub fn new(grid: &'s Grid, slot: &'s Slot) -> SlotIterator<'s> {
        SlotIterator {
            grid,
            slot,
            index: 0,
        }
    }
}

impl<'s> Iterator for SlotIterator<'s> {
    type Item = char;

    fn next(&mut self) -> Option<Self::Item> {
        if self.index >= self.slot.length {
            return None;
        }
        let (dx, dy) = self.slot.direction.step();
        let x = (self.slot.x as isize + dx * self.index as isize) as usize;
        let y = (self.slot.y as isize + dy * self.index as isize) as usize;
        self.index += 1;
        Some(self.grid.cell(x, y))
    }
}

impl fmt::Display for Grid {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        for y in 0..self.height {
            for x in 0..self.width {
                write!(f, "{}", self.cell(x, y))?;
                if x != self.width - 1 {
                    write!(f, " ")?;
                }
            }
            writeln!(f)?;
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::{Direction, Grid, SlotIterator};
    use crate::parse::Slot;
    use crate::store::Constraint;

    #[test]
    fn square_works() {
        let result = Grid::square(String::from(
            "
abc
def
ghi
",
        ));

        assert!(result.is_ok());

        let g = result.unwrap();
        assert_eq!(String::from("abcdefghi"), g.contents);
        assert_eq!(3, g.width);
        assert_eq!(3, g.height);
        println!("{}", g);
    }

    #[test]
    fn square_rejects_non_square() {
        assert!(Grid::square(String::from("abcdefgh")).is_err());
    }

    #[test]
    fn slot_iterator_works() {
        let g = Grid::square(String::from("abcdefghi")).unwrap();
        let across = Slot {
            x: 0,
            y: 0,
            direction: Direction::Across,
            length: 3,
        };
        let s: String = SlotIterator::new(&g, &across).collect();
        assert_eq!(String::from("abc"), s);

        let down = Slot {
            x: 0,
            y: 0,
            direction: Direction::Down,
            length: 3,
        };
        let s: String = SlotIterator::new(&g, &down).collect();
        assert_eq!(String::from("adg"), s);
    }

    #[test]
    fn start_and_length_work() {
        let g = Grid::square(String::from("ab*de *h ")).unwrap();

        assert_eq!((0, 0), g.get_start_word(1, 0, Direction::Across));
        assert_eq!(2, g.word_length(1, 0, Direction::Across));
        assert_eq!((2, 1), g.get_start_word(2, 2, Direction::Down));
        assert_eq!(2, g.word_length(2, 2, Direction::Down));
        assert_eq!((1, 0), g.get_start_word(1, 2, Direction::Down));
        assert_eq!(3, g.word_length(1, 2, Direction::Down));
    }

    #[test]
    fn gather_constraints_skips_missing() {
        let g = Grid::square(String::from(
            "
a c
***
***
",
        ))
        .unwrap();

        assert_eq!(
            vec![
                Constraint {
                    position: 0,
                    letter: 'a'
                },
                Constraint {
                    position: 2,
                    letter: 'c'
                },
            ],
            g.gather_constraints(0, 0, Direction::Across)
        );
    }

    #[test]
    fn gather_all_constraints_works() {
        let g = Grid::square(String::from("x  a b* *")).unwrap();

        let all = g.gather_all_constraints(0, 1, Direction::Across);
        assert_eq!(3, all.len());

        // column 0 crosses with "xa", intersecting at its second cell
        assert_eq!(1, all[0].intersection_index);
        assert_eq!(2, all[0].other_length);
        assert_eq!(
            vec![
                Constraint {
                    position: 0,
                    letter: 'x'
                },
                Constraint {
                    position: 1,
                    letter: 'a'
                },
            ],
            all[0].other_constraints
        );

        // column 1 runs the full height
        assert_eq!(1, all[1].intersection_index);
        assert_eq!(3, all[1].other_length);
    }

    #[test]
    fn in_direction_respects_blocks_and_reverse() {
        let g = Grid::square(String::from(
            "
ab*
def
ghi
",
        ))
        .unwrap();

        assert_eq!(
            vec![(0, 0), (1, 0)],
            g.in_direction(0, 0, Direction::Across, false)
        );
        assert_eq!(
            vec![(1, 1), (0, 1)],
            g.in_direction(1, 1, Direction::Across, true)
        );
        assert_eq!(
            vec![(0, 0), (1, 1), (2, 2)],
            g.in_direction(0, 0, Direction::DiagonalDown, false)
        );
        assert_eq!(
            vec![(0, 2), (1, 1)],
            g.in_direction(0, 2, Direction::DiagonalUp, false)
        );
    }
}
