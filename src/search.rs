use crate::store::{Constraint, CrossSlotConstraint, SearchResult, WordStore};
use crate::MAX_WORD_LENGTH;

/// Optional filters applied to a combined search.
#[derive(Clone, Copy, Debug, Default)]
pub struct SearchOptions {
    /// Inclusive lower bound: entries scoring below this are dropped from
    /// direct results and ignored when checking crossing slots.
    pub min_score: Option<i32>,
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum PatternSort {
    Alphabetical,
    ByLength,
    ByScore,
}

/// True iff any single active store has a qualifying match. Stores are
/// checked independently: a crossing word may come from a different list
/// than the slot being searched.
pub fn has_matches(
    stores: &[&WordStore],
    length: usize,
    constraints: &[Constraint],
    min_score: Option<i32>,
) -> bool {
    stores
        .iter()
        .any(|store| store.has_matches_filtered(length, constraints, min_score))
}

/// Whether every crossing slot stays fillable once `candidate` is placed.
/// Element `i` of `cross_constraints` describes the crossing slot met at
/// position `i` of the candidate.
fn cross_check(
    stores: &[&WordStore],
    candidate: &str,
    cross_constraints: &[CrossSlotConstraint],
    min_score: Option<i32>,
) -> bool {
    let bytes = candidate.as_bytes();
    for (position, cross) in cross_constraints.iter().enumerate() {
        if position >= bytes.len() {
            break;
        }
        // Isolated cells and slots too long for any stored word are never
        // constrained by the dictionary.
        if cross.other_length <= 1 || cross.other_length >= MAX_WORD_LENGTH {
            continue;
        }
        // A crossing slot already fully committed in the grid is not
        // second-guessed against the word lists.
        if covers_all_positions(&cross.other_constraints, cross.other_length) {
            continue;
        }
        let mut augmented = cross.other_constraints.clone();
        augmented.push(Constraint {
            position: cross.intersection_index,
            letter: bytes[position] as char,
        });
        if !has_matches(stores, cross.other_length, &augmented, min_score) {
            return false;
        }
    }
    true
}

fn covers_all_positions(constraints: &[Constraint], length: usize) -> bool {
    (0..length).all(|position| constraints.iter().any(|c| c.position == position))
}

/// Combined search across a bounded set of stores: each store's own results
/// in insertion order, concatenated in store order. Stores hold disjoint
/// lists, so no de-duplication happens here.
pub fn search(
    stores: &[&WordStore],
    length: usize,
    constraints: &[Constraint],
    cross_constraints: Option<&[CrossSlotConstraint]>,
    options: Option<&SearchOptions>,
) -> Vec<SearchResult> {
    let min_score = options.and_then(|o| o.min_score);
    let mut results = vec![];
    for store in stores {
        for entry in store.matches(length, constraints) {
            if let Some(threshold) = min_score {
                if entry.score < threshold {
                    continue;
                }
            }
            let intersects = match cross_constraints {
                Some(cross) => cross_check(stores, &entry.text, cross, min_score),
                None => true,
            };
            results.push(SearchResult {
                text: entry.text.clone(),
                score: entry.score,
                intersects,
            });
        }
    }
    results
}

/// Pattern search across stores; rows are `(label, text, score)` where the
/// label is the store's name or file path.
pub fn search_by_pattern(
    stores: &[&WordStore],
    pattern: &str,
    sort: PatternSort,
) -> Vec<(String, String, i32)> {
    let mut rows: Vec<(String, String, i32)> = vec![];
    for store in stores {
        let label = store.label();
        for (text, score) in store.find_by_pattern(pattern) {
            rows.push((label.clone(), text, score));
        }
    }
    match sort {
        PatternSort::Alphabetical => rows.sort_by(|a, b| a.1.cmp(&b.1)),
        PatternSort::ByLength => rows.sort_by(|a, b| (a.1.len(), &a.1).cmp(&(b.1.len(), &b.1))),
        PatternSort::ByScore => rows.sort_by(|a, b| b.2.cmp(&a.2).then_with(|| a.1.cmp(&b.1))),
    }
    rows
}

#[cfg(test)]
mod tests {
    use super::{has_matches, search, search_by_pattern, PatternSort, SearchOptions};
    use crate::store::{Constraint, CrossSlotConstraint, SearchResult, WordStore};

    fn store(index: usize, words: &[(&str, i32)]) -> WordStore {
        let mut store = WordStore::new(index);
        for (text, score) in words {
            store.add_word(text, *score);
        }
        store
    }

    #[test]
    fn unconstrained_crossing_slot_of_each_length() {
        // A crossing slot too long for any stored word never constrains the
        // candidate; a checkable one does.
        let s = store(0, &[("koala", 0)]);

        let cross = [CrossSlotConstraint {
            intersection_index: 0,
            other_length: 8,
            other_constraints: vec![],
        }];
        assert_eq!(
            vec![SearchResult {
                text: String::from("koala"),
                score: 0,
                intersects: true,
            }],
            search(&[&s], 5, &[], Some(&cross), None)
        );

        let cross = [CrossSlotConstraint {
            intersection_index: 0,
            other_length: 7,
            other_constraints: vec![],
        }];
        assert_eq!(
            vec![SearchResult {
                text: String::from("koala"),
                score: 0,
                intersects: false,
            }],
            search(&[&s], 5, &[], Some(&cross), None)
        );
    }

    #[test]
    fn crossing_word_may_come_from_another_list() {
        let w1 = store(0, &[("abc", 0)]);
        let w2 = store(1, &[("aaa", 0), ("bbb", 0), ("ccc", 0)]);

        let cross = [CrossSlotConstraint {
            intersection_index: 0,
            other_length: 3,
            other_constraints: vec![],
        }];
        let results = search(
            &[&w1, &w2],
            3,
            &[Constraint {
                position: 0,
                letter: 'a',
            }],
            Some(&cross),
            None,
        );

        let abc = results.iter().find(|r| r.text == "abc").unwrap();
        assert!(abc.intersects);
    }

    #[test]
    fn fully_filled_crossing_slot_is_never_second_guessed() {
        let s = store(0, &[("koala", 0)]);

        // the crossing slot is already committed to a word the store has
        // never heard of
        let cross = [CrossSlotConstraint {
            intersection_index: 0,
            other_length: 3,
            other_constraints: vec![
                Constraint {
                    position: 0,
                    letter: 'k',
                },
                Constraint {
                    position: 1,
                    letter: 'q',
                },
                Constraint {
                    position: 2,
                    letter: 'z',
                },
            ],
        }];
        let results = search(&[&s], 5, &[], Some(&cross), None);
        assert!(results[0].intersects);
    }

    #[test]
    fn min_score_is_an_inclusive_lower_bound() {
        let s = store(0, &[("abc", 0), ("abd", 5), ("abe", 10)]);
        let options = SearchOptions {
            min_score: Some(5),
        };
        let results = search(&[&s], 3, &[], None, Some(&options));
        let texts: Vec<&str> = results.iter().map(|r| r.text.as_str()).collect();
        assert_eq!(vec!["abd", "abe"], texts);
    }

    #[test]
    fn min_score_filters_intersection_checks_too() {
        // "ab" is only supported at its crossing by the score-0 "ba"
        let s = store(0, &[("ab", 5), ("ba", 0)]);
        let cross = [CrossSlotConstraint {
            intersection_index: 1,
            other_length: 2,
            other_constraints: vec![],
        }];
        let constraints = [Constraint {
            position: 1,
            letter: 'b',
        }];

        let results = search(&[&s], 2, &constraints, Some(&cross), None);
        assert_eq!(1, results.len());
        assert!(results[0].intersects);

        let options = SearchOptions {
            min_score: Some(1),
        };
        let results = search(&[&s], 2, &constraints, Some(&cross), Some(&options));
        assert_eq!(1, results.len());
        assert_eq!("ab", results[0].text);
        assert!(!results[0].intersects);
    }

    #[test]
    fn has_matches_ors_across_stores() {
        let w1 = store(0, &[("abc", 0)]);
        let w2 = store(1, &[("xyz", 0)]);
        let constraint = [Constraint {
            position: 0,
            letter: 'x',
        }];
        assert!(has_matches(&[&w1, &w2], 3, &constraint, None));
        assert!(!has_matches(&[&w1], 3, &constraint, None));
    }

    #[test]
    fn search_by_pattern_sorts() {
        let mut w1 = store(0, &[("bass", 4), ("be", 1)]);
        w1.set_name("main");
        let mut w2 = store(1, &[("bats", 9)]);
        w2.set_path("/tmp/extra.txt");

        let rows = search_by_pattern(&[&w1, &w2], "b*", PatternSort::Alphabetical);
        let texts: Vec<&str> = rows.iter().map(|r| r.1.as_str()).collect();
        assert_eq!(vec!["bass", "bats", "be"], texts);
        assert_eq!("main", rows[0].0);
        assert_eq!("/tmp/extra.txt", rows[1].0);

        let rows = search_by_pattern(&[&w1, &w2], "b*", PatternSort::ByLength);
        let texts: Vec<&str> = rows.iter().map(|r| r.1.as_str()).collect();
        assert_eq!(vec!["be", "bass", "bats"], texts);

        let rows = search_by_pattern(&[&w1, &w2], "b*", PatternSort::ByScore);
        let texts: Vec<&str> = rows.iter().map(|r| r.1.as_str()).collect();
        assert_eq!(vec!["bats", "bass", "be"], texts);
    }
}
