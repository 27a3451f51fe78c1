use rustc_hash::FxHashSet;

use crate::grid::{Direction, Grid};
use crate::store::WordStore;
use crate::{MAX_WORD_LENGTH, MISSING_CHAR};

/// One of the eight scan directions: each axis together with its reverse.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub struct ScanDirection {
    pub axis: Direction,
    pub reverse: bool,
}

impl ScanDirection {
    pub const ALL: [ScanDirection; 8] = [
        ScanDirection { axis: Direction::Across, reverse: false },
        ScanDirection { axis: Direction::Across, reverse: true },
        ScanDirection { axis: Direction::Down, reverse: false },
        ScanDirection { axis: Direction::Down, reverse: true },
        ScanDirection { axis: Direction::DiagonalDown, reverse: false },
        ScanDirection { axis: Direction::DiagonalDown, reverse: true },
        ScanDirection { axis: Direction::DiagonalUp, reverse: false },
        ScanDirection { axis: Direction::DiagonalUp, reverse: true },
    ];

    pub fn label(&self) -> &'static str {
        match (self.axis, self.reverse) {
            (Direction::Across, false) => "across",
            (Direction::Across, true) => "across reversed",
            (Direction::Down, false) => "down",
            (Direction::Down, true) => "down reversed",
            (Direction::DiagonalDown, false) => "diagonal down",
            (Direction::DiagonalDown, true) => "diagonal down reversed",
            (Direction::DiagonalUp, false) => "diagonal up",
            (Direction::DiagonalUp, true) => "diagonal up reversed",
        }
    }
}

/// One dictionary hit somewhere in the grid.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct GridMatch {
    pub direction: ScanDirection,
    pub cells: Vec<(usize, usize)>,
}

/// Grouped report row: one text with its occurrence count and, when
/// requested, the indices of the backing matches in the pre-collapse list.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct AccidentalEntry {
    pub text: String,
    pub count: usize,
    pub source_indices: Vec<usize>,
}

/// Every substring of `text` that is a stored word, for every word length
/// present in any store. Overlapping matches are all reported; offsets are
/// rebased on `offset_base`.
pub fn scan_substring(
    stores: &[&WordStore],
    offset_base: usize,
    text: &str,
) -> Vec<(usize, usize)> {
    let mut result = vec![];
    for length in 1..MAX_WORD_LENGTH {
        if length > text.len() {
            break;
        }
        if !stores.iter().any(|store| store.has_length(length)) {
            continue;
        }
        for i in 0..=text.len() - length {
            let candidate = &text[i..i + length];
            if stores.iter().any(|store| store.contains_word(candidate)) {
                result.push((offset_base + i, length));
            }
        }
    }
    result
}

/// Scans the concatenated characters of a cell sequence; results are
/// `(offset, length)` pairs into the sequence.
pub fn scan_run(
    stores: &[&WordStore],
    grid: &Grid,
    cells: &[(usize, usize)],
) -> Vec<(usize, usize)> {
    let text: String = cells
        .iter()
        .map(|&(x, y)| grid.cell(x, y).to_ascii_lowercase())
        .collect();
    scan_substring(stores, 0, &text)
}

/// Maximal runs of known cells along one axis: open-cell runs split wherever
/// a cell still holds `MISSING_CHAR`.
fn known_runs(grid: &Grid, axis: Direction) -> Vec<Vec<(usize, usize)>> {
    let (dx, dy) = axis.step();
    let mut runs = vec![];
    for (x, y) in grid.cells() {
        if !grid.is_available(x, y) {
            continue;
        }
        // only start a walk at the head of an open run
        let prev = (x as isize - dx, y as isize - dy);
        if prev.0 >= 0
            && prev.1 >= 0
            && grid.is_available(prev.0 as usize, prev.1 as usize)
        {
            continue;
        }
        let mut current = vec![];
        for (cx, cy) in grid.in_direction(x, y, axis, false) {
            if grid.cell(cx, cy) == MISSING_CHAR {
                if !current.is_empty() {
                    runs.push(std::mem::take(&mut current));
                }
            } else {
                current.push((cx, cy));
            }
        }
        if !current.is_empty() {
            runs.push(current);
        }
    }
    runs
}

/// Scans every maximal known run in all eight directions. An entirely
/// unfilled grid yields no matches. Matches of length 1 are included;
/// callers typically discard them.
pub fn scan_grid(stores: &[&WordStore], grid: &Grid) -> Vec<GridMatch> {
    let mut result = vec![];
    for direction in ScanDirection::ALL {
        for run in known_runs(grid, direction.axis) {
            let run: Vec<(usize, usize)> = if direction.reverse {
                run.into_iter().rev().collect()
            } else {
                run
            };
            for (offset, length) in scan_run(stores, grid, &run) {
                result.push(GridMatch {
                    direction,
                    cells: run[offset..offset + length].to_vec(),
                });
            }
        }
    }
    result
}

/// Groups matches by case-folded text in first-seen order. With `collapse`,
/// a palindrome matched under both a direction and its reverse (the same
/// text over the same cell set) is reported once; two distinct words
/// reading each way over the same cells are both kept. With
/// `preserve_indices`, each entry carries the positions of its occurrences
/// in the original match list.
pub fn group_entries(
    grid: &Grid,
    matches: &[GridMatch],
    collapse: bool,
    preserve_indices: bool,
) -> Vec<AccidentalEntry> {
    let mut entries: Vec<AccidentalEntry> = vec![];
    let mut seen: FxHashSet<(Vec<(usize, usize)>, String)> = FxHashSet::default();

    for (index, m) in matches.iter().enumerate() {
        let text: String = m
            .cells
            .iter()
            .map(|&(x, y)| grid.cell(x, y).to_ascii_lowercase())
            .collect();
        if collapse {
            let mut cells = m.cells.clone();
            cells.sort_unstable();
            if !seen.insert((cells, text.clone())) {
                continue;
            }
        }
        match entries.iter_mut().find(|e| e.text == text) {
            Some(entry) => {
                entry.count += 1;
                if preserve_indices {
                    entry.source_indices.push(index);
                }
            }
            None => entries.push(AccidentalEntry {
                text,
                count: 1,
                source_indices: if preserve_indices { vec![index] } else { vec![] },
            }),
        }
    }
    entries
}
