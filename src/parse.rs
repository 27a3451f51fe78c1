use crate::grid::{Direction, Grid};

/// One word position in the grid: a maximal run of open cells bounded by
/// blocks, voids or the edge.
#[derive(Debug, PartialEq, Eq, Clone)]
pub struct Slot {
    pub x: usize,
    pub y: usize,
    pub direction: Direction,
    pub length: usize,
}

impl Slot {
    pub fn cells(&self) -> Vec<(usize, usize)> {
        let (dx, dy) = self.direction.step();
        (0..self.length)
            .map(|i| {
                (
                    (self.x as isize + dx * i as isize) as usize,
                    (self.y as isize + dy * i as isize) as usize,
                )
            })
            .collect()
    }
}

/// All across slots in row-major order, then all down slots in column-major
/// order. Length-1 runs are included; callers that only care about word
/// positions filter them out.
pub fn parse_slots(grid: &Grid) -> Vec<Slot> {
    let mut result = vec![];

    for y in 0..grid.height() {
        let mut start = None;
        let mut length = 0;
        for x in 0..grid.width() {
            if grid.is_available(x, y) {
                if start.is_none() {
                    start = Some((x, y));
                }
                length += 1;
            } else if let Some((sx, sy)) = start.take() {
                result.push(Slot {
                    x: sx,
                    y: sy,
                    direction: Direction::Across,
                    length,
                });
                length = 0;
            }
        }
        if let Some((sx, sy)) = start {
            result.push(Slot {
                x: sx,
                y: sy,
                direction: Direction::Across,
                length,
            });
        }
    }

    for x in 0..grid.width() {
        let mut start = None;
        let mut length = 0;
        for y in 0..grid.height() {
            if grid.is_available(x, y) {
                if start.is_none() {
                    start = Some((x, y));
                }
                length += 1;
            } else if let Some((sx, sy)) = start.take() {
                result.push(Slot {
                    x: sx,
                    y: sy,
                    direction: Direction::Down,
                    length,
                });
                length = 0;
            }
        }
        if let Some((sx, sy)) = start {
            result.push(Slot {
                x: sx,
                y: sy,
                direction: Direction::Down,
                length,
            });
        }
    }

    result
}
