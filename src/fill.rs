use tracing::debug;

use crate::grid::{Grid, SlotIterator};
use crate::parse::{parse_slots, Slot};
use crate::search;
use crate::store::{Constraint, WordEntry, WordStore};
use crate::{MAX_WORD_LENGTH, MISSING_CHAR};

/// How the next slot to fill is chosen.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum SlotPolicy {
    /// Fixed grid-scan order.
    FirstSlot,
    /// Minimum remaining values: the open slot with the fewest matching
    /// candidates, ties broken by scan order.
    Auto,
}

#[derive(Clone, Copy, Debug)]
pub struct FillOptions {
    pub policy: SlotPolicy,
    /// Bound on decision nodes. Interlocked grids are exponential in the
    /// worst case; exhausting the budget behaves exactly like
    /// unsatisfiability.
    pub node_budget: usize,
}

impl Default for FillOptions {
    fn default() -> FillOptions {
        FillOptions {
            policy: SlotPolicy::Auto,
            node_budget: 200_000,
        }
    }
}

/// Backtracking auto-fill over a candidate word pool. Each literal pool
/// string is consumed at most once; placements are undone cell by cell on
/// dead ends. When no assignment fills every slot, the solver places
/// whatever the pool still supports and returns the partially filled grid;
/// a fill that places nothing returns the original grid unchanged.
pub struct FillSolver {
    options: FillOptions,
}

impl FillSolver {
    pub fn new(options: FillOptions) -> FillSolver {
        FillSolver { options }
    }

    pub fn fill(&self, grid: &Grid, pool: &[String]) -> Grid {
        let mut store = WordStore::new(0);
        for word in pool {
            store.add_word(word, 0);
        }

        let slots: Vec<Slot> = parse_slots(grid)
            .into_iter()
            .filter(|slot| slot.length >= 2)
            .collect();

        let mut work = grid.clone();
        let mut nodes = 0;
        if self.fill_slots(&mut work, &mut store, &slots, &mut nodes) {
            debug!(nodes, "fill succeeded");
            return work;
        }
        // no assignment fills every slot at once; place what the pool
        // still supports and hand back the partial grid
        if self.place_available(&mut work, &mut store, &slots) {
            debug!(nodes, "partial fill");
            work
        } else {
            debug!(nodes, "fill failed");
            grid.clone()
        }
    }

    fn next_open_slot<'s>(
        &self,
        grid: &Grid,
        store: &WordStore,
        slots: &'s [Slot],
    ) -> Option<&'s Slot> {
        let mut open = slots
            .iter()
            .filter(|slot| SlotIterator::new(grid, slot).any(|c| c == MISSING_CHAR));
        match self.options.policy {
            SlotPolicy::FirstSlot => open.next(),
            SlotPolicy::Auto => open.min_by_key(|slot| {
                let constraints = grid.gather_constraints(slot.x, slot.y, slot.direction);
                store.count_matches(slot.length, &constraints)
            }),
        }
    }

    fn fill_slots(
        &self,
        grid: &mut Grid,
        store: &mut WordStore,
        slots: &[Slot],
        nodes: &mut usize,
    ) -> bool {
        let slot = match self.next_open_slot(grid, store, slots) {
            Some(slot) => slot.clone(),
            None => return true,
        };

        *nodes += 1;
        if *nodes > self.options.node_budget {
            return false;
        }
        if *nodes % 10_000 == 0 {
            debug!(nodes = *nodes, "still filling");
        }

        let constraints = grid.gather_constraints(slot.x, slot.y, slot.direction);
        let cross = grid.gather_all_constraints(slot.x, slot.y, slot.direction);
        let candidates = search::search(&[&*store], slot.length, &constraints, Some(&cross), None);

        let cells = slot.cells();
        for candidate in candidates.iter().filter(|c| c.intersects) {
            let mut undo = Vec::with_capacity(cells.len());
            for (&(x, y), letter) in cells.iter().zip(candidate.text.chars()) {
                undo.push((x, y, grid.cell(x, y)));
                grid.set_cell(x, y, letter);
            }
            store.remove_words(&[WordEntry {
                text: candidate.text.clone(),
                score: candidate.score,
            }]);

            if self.fill_slots(grid, store, slots, nodes) {
                return true;
            }

            store.add_word(&candidate.text, candidate.score);
            for &(x, y, previous) in &undo {
                grid.set_cell(x, y, previous);
            }
        }
        false
    }

    /// Best-effort pass: scan order, no backtracking. Places any candidate
    /// whose crossing slots stay fillable by the rest of the pool, repeating
    /// until nothing more can be placed. Returns whether anything was.
    fn place_available(&self, grid: &mut Grid, store: &mut WordStore, slots: &[Slot]) -> bool {
        let mut placed = false;
        let mut advanced = true;
        while advanced {
            advanced = false;
            for slot in slots {
                if !SlotIterator::new(grid, slot).any(|c| c == MISSING_CHAR) {
                    continue;
                }
                let constraints = grid.gather_constraints(slot.x, slot.y, slot.direction);
                let candidates = search::search(&[&*store], slot.length, &constraints, None, None);
                for candidate in candidates {
                    store.remove_words(&[WordEntry {
                        text: candidate.text.clone(),
                        score: candidate.score,
                    }]);
                    if !crossings_stay_fillable(grid, slot, &candidate.text, store) {
                        store.add_word(&candidate.text, candidate.score);
                        continue;
                    }
                    for (&(x, y), letter) in slot.cells().iter().zip(candidate.text.chars()) {
                        grid.set_cell(x, y, letter);
                    }
                    placed = true;
                    advanced = true;
                    break;
                }
            }
        }
        placed
    }
}

/// Whether every crossing slot of `slot` stays fillable by the remaining
/// pool once `candidate` is placed. A crossing slot the pool cannot fill
/// even before the placement stays blank either way and never vetoes the
/// candidate.
fn crossings_stay_fillable(grid: &Grid, slot: &Slot, candidate: &str, store: &WordStore) -> bool {
    let cross = grid.gather_all_constraints(slot.x, slot.y, slot.direction);
    let bytes = candidate.as_bytes();
    for (position, cross) in cross.iter().enumerate() {
        if position >= bytes.len() {
            break;
        }
        if cross.other_length <= 1 || cross.other_length >= MAX_WORD_LENGTH {
            continue;
        }
        if !store.has_matches(cross.other_length, &cross.other_constraints) {
            continue;
        }
        let mut augmented = cross.other_constraints.clone();
        augmented.push(Constraint {
            position: cross.intersection_index,
            letter: bytes[position] as char,
        });
        if !store.has_matches(cross.other_length, &augmented) {
            return false;
        }
    }
    true
}

impl Default for FillSolver {
    fn default() -> FillSolver {
        FillSolver::new(FillOptions::default())
    }
}

#[cfg(test)]
mod tests {
    use super::{FillOptions, FillSolver, SlotPolicy};
    use crate::grid::Grid;

    fn diff(a: &Grid, b: &Grid) -> usize {
        a.cells()
            .filter(|&(x, y)| a.cell(x, y) != b.cell(x, y))
            .count()
    }

    fn pool(words: &[&str]) -> Vec<String> {
        words.iter().map(|w| String::from(*w)).collect()
    }

    // 5x5, row 0 open, everything else blocked
    fn one_strip() -> Grid {
        let mut contents = String::from("     ");
        contents.push_str(&"*".repeat(20));
        Grid::square(contents).unwrap()
    }

    // 5x5, rows 0 and 2 open
    fn two_strips() -> Grid {
        let mut contents = String::from("     ");
        contents.push_str("*****");
        contents.push_str("     ");
        contents.push_str(&"*".repeat(10));
        Grid::square(contents).unwrap()
    }

    #[test]
    fn fills_a_single_strip() {
        let g = one_strip();
        let filled = FillSolver::default().fill(&g, &pool(&["koala"]));
        assert_eq!(5, diff(&g, &filled));
        let row: String = (0..5).map(|x| filled.cell(x, 0)).collect();
        assert_eq!(String::from("koala"), row);
    }

    #[test]
    fn fills_two_disjoint_strips() {
        let g = two_strips();
        let filled = FillSolver::default().fill(&g, &pool(&["koala", "steam"]));
        assert_eq!(10, diff(&g, &filled));
    }

    #[test]
    fn empty_grid_gets_a_partial_fill() {
        let g = Grid::square(" ".repeat(25)).unwrap();
        let filled = FillSolver::default().fill(&g, &pool(&["koala"]));
        assert_eq!(5, diff(&g, &filled));
        let row: String = (0..5).map(|x| filled.cell(x, 0)).collect();
        assert_eq!(String::from("koala"), row);
        let blank = filled
            .cells()
            .filter(|&(x, y)| filled.cell(x, y) == ' ')
            .count();
        assert_eq!(20, blank);
    }

    #[test]
    fn pool_exhaustion_leaves_the_rest_blank() {
        let g = two_strips();
        // one candidate for two slots: the second strip stays open
        let filled = FillSolver::default().fill(&g, &pool(&["koala"]));
        assert_eq!(5, diff(&g, &filled));
    }

    #[test]
    fn unplaceable_pool_returns_the_original_grid() {
        let g = two_strips();
        let filled = FillSolver::default().fill(&g, &pool(&["zz"]));
        assert_eq!(g, filled);
    }

    #[test]
    fn interlocked_slots_agree_at_the_crossing() {
        // a plus shape: one across and one down slot sharing the center
        let g = Grid::square(String::from("* *   * *")).unwrap();

        let filled = FillSolver::default().fill(&g, &pool(&["cat", "can", "ant"]));
        let across: String = (0..3).map(|x| filled.cell(x, 1)).collect();
        let down: String = (0..3).map(|y| filled.cell(1, y)).collect();
        assert!(!across.contains(' '));
        assert!(!down.contains(' '));
        assert_eq!(across.as_bytes()[1], down.as_bytes()[1]);
    }

    #[test]
    fn pool_words_are_consumed_once() {
        let g = two_strips();
        // the same literal twice in the pool is two placements
        let filled = FillSolver::default().fill(&g, &pool(&["koala", "koala"]));
        assert_eq!(10, diff(&g, &filled));
    }

    #[test]
    fn open_three_by_three_terminates_within_budget() {
        let g = Grid::square(String::from("         ")).unwrap();
        let solver = FillSolver::new(FillOptions {
            policy: SlotPolicy::Auto,
            node_budget: 5_000,
        });
        // six mutually crossing slots with an unhelpful pool: must
        // terminate and hand the original grid back
        let filled = solver.fill(&g, &pool(&["abc", "def", "ghi", "jkl", "mno", "pqr"]));
        assert_eq!(g, filled);
    }

    #[test]
    fn first_slot_policy_fills_too() {
        let g = one_strip();
        let solver = FillSolver::new(FillOptions {
            policy: SlotPolicy::FirstSlot,
            ..FillOptions::default()
        });
        let filled = solver.fill(&g, &pool(&["steam"]));
        assert_eq!(5, diff(&g, &filled));
    }

    #[test]
    fn partially_filled_slot_is_completed() {
        let mut g = one_strip();
        g.set_cell(0, 0, 'k');

        let filled = FillSolver::default().fill(&g, &pool(&["koala", "steam"]));
        assert_eq!(4, diff(&g, &filled));
        let row: String = (0..5).map(|x| filled.cell(x, 0)).collect();
        assert_eq!(String::from("koala"), row);
    }
}
