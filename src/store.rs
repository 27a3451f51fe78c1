use std::collections::BTreeMap;
use std::fs::File;
use std::io::{BufRead, BufReader, BufWriter, ErrorKind, Write};
use std::path::{Path, PathBuf};

use fancy_regex::Regex;
use rustc_hash::FxHashMap;

use crate::{Error, MAX_WORD_LENGTH};

/// One stored word. The same text may appear any number of times with
/// identical or different scores; every occurrence counts separately.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct WordEntry {
    pub text: String,
    pub score: i32,
}

/// One known letter within a slot.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct Constraint {
    pub position: usize,
    pub letter: char,
}

/// Describes, for one position of the slot under search, the crossing slot
/// met at that cell: where the intersection falls inside the crossing slot,
/// how long the crossing slot is, and which of its letters are already known.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct CrossSlotConstraint {
    pub intersection_index: usize,
    pub other_length: usize,
    pub other_constraints: Vec<Constraint>,
}

#[derive(Clone, Debug, PartialEq, Eq)]
pub struct SearchResult {
    pub text: String,
    pub score: i32,
    pub intersects: bool,
}

/// Entries of one length, plus the per-(position, letter) inverted index.
/// `postings[position][letter]` holds the indices of the entries carrying
/// `letter` at `position`, in insertion order.
#[derive(Clone, Debug, Default)]
struct Bucket {
    entries: Vec<WordEntry>,
    postings: Vec<FxHashMap<char, Vec<usize>>>,
}

impl Bucket {
    fn new(length: usize) -> Bucket {
        Bucket {
            entries: vec![],
            postings: vec![FxHashMap::default(); length],
        }
    }

    fn insert(&mut self, entry: WordEntry) {
        let index = self.entries.len();
        for (position, letter) in entry.text.chars().enumerate() {
            self.postings[position]
                .entry(letter)
                .or_insert_with(Vec::new)
                .push(index);
        }
        self.entries.push(entry);
    }

    fn rebuild(&mut self) {
        for map in &mut self.postings {
            map.clear();
        }
        for (index, entry) in self.entries.iter().enumerate() {
            for (position, letter) in entry.text.chars().enumerate() {
                self.postings[position]
                    .entry(letter)
                    .or_insert_with(Vec::new)
                    .push(index);
            }
        }
    }

    fn satisfies(&self, index: usize, constraints: &[Constraint]) -> bool {
        let bytes = self.entries[index].text.as_bytes();
        constraints.iter().all(|c| {
            c.position < bytes.len()
                && bytes[c.position] as char == c.letter.to_ascii_lowercase()
        })
    }

    /// Indices of entries satisfying every constraint, ascending. Walks the
    /// shortest postings list and verifies the rest against the entry text.
    fn matching_indices(&self, constraints: &[Constraint]) -> Vec<usize> {
        if constraints.is_empty() {
            return (0..self.entries.len()).collect();
        }

        let mut shortest: Option<&Vec<usize>> = None;
        for c in constraints {
            if c.position >= self.postings.len() {
                return vec![];
            }
            match self.postings[c.position].get(&c.letter.to_ascii_lowercase()) {
                Some(list) => {
                    if shortest.map_or(true, |s| list.len() < s.len()) {
                        shortest = Some(list);
                    }
                }
                None => return vec![],
            }
        }

        shortest
            .map(|list| {
                list.iter()
                    .copied()
                    .filter(|&index| self.satisfies(index, constraints))
                    .collect()
            })
            .unwrap_or_default()
    }
}

/// One word list: length buckets plus the per-(position, letter) inverted
/// index, a small unique index among active stores, and an optional display
/// name and source path.
#[derive(Clone, Debug)]
pub struct WordStore {
    index: usize,
    name: Option<String>,
    path: Option<PathBuf>,
    buckets: Vec<Bucket>,
}

impl WordStore {
    pub fn new(index: usize) -> WordStore {
        WordStore {
            index,
            name: None,
            path: None,
            buckets: (0..MAX_WORD_LENGTH).map(Bucket::new).collect(),
        }
    }

    pub fn index(&self) -> usize {
        self.index
    }

    pub fn name(&self) -> Option<&str> {
        self.name.as_deref()
    }

    pub fn set_name(&mut self, name: &str) {
        self.name = Some(String::from(name));
    }

    pub fn path(&self) -> Option<&Path> {
        self.path.as_deref()
    }

    pub fn set_path<P: AsRef<Path>>(&mut self, path: P) {
        self.path = Some(path.as_ref().to_path_buf());
    }

    /// Display label: the configured name, or the file path if unnamed.
    pub fn label(&self) -> String {
        if let Some(name) = &self.name {
            return name.clone();
        }
        if let Some(path) = &self.path {
            return path.display().to_string();
        }
        format!("list {}", self.index)
    }

    /// Lowercased, space-stripped form of acceptable input; `None` when the
    /// text contains other characters or the stripped form is too short or
    /// too long to store.
    fn normalize(text: &str) -> Option<String> {
        if !text.chars().all(|c| c.is_ascii_alphabetic() || c == ' ') {
            return None;
        }
        let stripped: String = text
            .chars()
            .filter(|c| *c != ' ')
            .map(|c| c.to_ascii_lowercase())
            .collect();
        if stripped.is_empty() || stripped.len() >= MAX_WORD_LENGTH {
            return None;
        }
        Some(stripped)
    }

    /// Invalid input is ignored without feedback; callers that care must
    /// re-query the store.
    pub fn add_word(&mut self, text: &str, score: i32) {
        if let Some(stripped) = WordStore::normalize(text) {
            let length = stripped.len();
            self.buckets[length].insert(WordEntry {
                text: stripped,
                score,
            });
        }
    }

    /// Removes one occurrence per given entry, matching on exact
    /// `(text, score)`. Removing an absent entry is a no-op.
    pub fn remove_words(&mut self, entries: &[WordEntry]) {
        let mut touched = [false; MAX_WORD_LENGTH];
        for entry in entries {
            let stripped = match WordStore::normalize(&entry.text) {
                Some(s) => s,
                None => continue,
            };
            let bucket = &mut self.buckets[stripped.len()];
            if let Some(at) = bucket
                .entries
                .iter()
                .position(|e| e.text == stripped && e.score == entry.score)
            {
                bucket.entries.remove(at);
                touched[stripped.len()] = true;
            }
        }
        for (length, touched) in touched.iter().enumerate() {
            if *touched {
                self.buckets[length].rebuild();
            }
        }
    }

    /// Strictly additive: a fresh `(text, score)` entry is stored and any
    /// prior entries for the same text remain.
    pub fn update_score(&mut self, text: &str, score: i32) {
        self.add_word(text, score);
    }

    /// True iff at least one entry of `length` satisfies every constraint.
    /// Empty constraints ask whether any word of `length` exists at all.
    pub fn has_matches(&self, length: usize, constraints: &[Constraint]) -> bool {
        self.has_matches_filtered(length, constraints, None)
    }

    pub(crate) fn has_matches_filtered(
        &self,
        length: usize,
        constraints: &[Constraint],
        min_score: Option<i32>,
    ) -> bool {
        let bucket = match self.buckets.get(length) {
            Some(b) if !b.entries.is_empty() => b,
            _ => return false,
        };
        let qualifies =
            |index: &usize| min_score.map_or(true, |t| bucket.entries[*index].score >= t);
        if constraints.is_empty() {
            return (0..bucket.entries.len()).any(|i| qualifies(&i));
        }
        bucket
            .matching_indices(constraints)
            .iter()
            .any(qualifies)
    }

    pub(crate) fn matches(
        &self,
        length: usize,
        constraints: &[Constraint],
    ) -> Vec<&WordEntry> {
        match self.buckets.get(length) {
            Some(bucket) => bucket
                .matching_indices(constraints)
                .into_iter()
                .map(|index| &bucket.entries[index])
                .collect(),
            None => vec![],
        }
    }

    /// Number of entries of `length` satisfying the constraints, for the
    /// solver's minimum-remaining-values ordering.
    pub fn count_matches(&self, length: usize, constraints: &[Constraint]) -> usize {
        match self.buckets.get(length) {
            Some(bucket) if constraints.is_empty() => bucket.entries.len(),
            Some(bucket) => bucket.matching_indices(constraints).len(),
            None => 0,
        }
    }

    /// Every entry of `length` satisfying `constraints`, in insertion order,
    /// with `intersects` computed against this store alone.
    pub fn search(
        &self,
        length: usize,
        constraints: &[Constraint],
        cross_constraints: Option<&[CrossSlotConstraint]>,
    ) -> Vec<SearchResult> {
        crate::search::search(&[self], length, constraints, cross_constraints, None)
    }

    /// Exact membership, case-insensitive. A membership test, not a
    /// constraint search: used by the accidental-word scanner.
    pub fn contains_word(&self, text: &str) -> bool {
        let lowered = text.to_ascii_lowercase();
        let length = lowered.len();
        if length == 0 || length >= MAX_WORD_LENGTH {
            return false;
        }
        let bucket = &self.buckets[length];
        let first = match lowered.chars().next() {
            Some(c) => c,
            None => return false,
        };
        match bucket.postings[0].get(&first) {
            Some(list) => list.iter().any(|&i| bucket.entries[i].text == lowered),
            None => false,
        }
    }

    pub(crate) fn has_length(&self, length: usize) -> bool {
        self.buckets
            .get(length)
            .map_or(false, |b| !b.entries.is_empty())
    }

    /// Glob match over words of any length: `?` matches exactly one unknown
    /// character, `*` matches zero or more. Case-insensitive.
    pub fn find_by_pattern(&self, pattern: &str) -> Vec<(String, i32)> {
        let mut translated = String::from("^");
        for c in pattern.chars() {
            match c {
                '?' => translated.push('.'),
                '*' => translated.push_str(".*"),
                c if c.is_ascii_alphanumeric() => translated.push(c.to_ascii_lowercase()),
                c => {
                    translated.push('\\');
                    translated.push(c);
                }
            }
        }
        translated.push('$');

        let regex = match Regex::new(&translated) {
            Ok(regex) => regex,
            Err(_) => return vec![],
        };

        self.entries()
            .filter(|e| regex.is_match(&e.text).unwrap_or(false))
            .map(|e| (e.text.clone(), e.score))
            .collect()
    }

    /// All entries, shortest bucket first, insertion order within a bucket.
    pub fn entries(&self) -> impl Iterator<Item = &WordEntry> {
        self.buckets.iter().flat_map(|b| b.entries.iter())
    }

    pub fn len(&self) -> usize {
        self.buckets.iter().map(|b| b.entries.len()).sum()
    }

    pub fn is_empty(&self) -> bool {
        self.buckets.iter().all(|b| b.entries.is_empty())
    }

    pub fn get_word_counts(&self) -> BTreeMap<usize, usize> {
        let mut counts = BTreeMap::new();
        for (length, bucket) in self.buckets.iter().enumerate() {
            if !bucket.entries.is_empty() {
                counts.insert(length, bucket.entries.len());
            }
        }
        counts
    }

    pub fn get_score_counts(&self) -> BTreeMap<i32, usize> {
        let mut counts = BTreeMap::new();
        for entry in self.entries() {
            *counts.entry(entry.score).or_insert(0) += 1;
        }
        counts
    }

    pub fn average_word_length(&self) -> f64 {
        if self.is_empty() {
            return 0.0;
        }
        let total: usize = self.entries().map(|e| e.text.len()).sum();
        total as f64 / self.len() as f64
    }

    pub fn average_word_score(&self) -> f64 {
        if self.is_empty() {
            return 0.0;
        }
        let total: i64 = self.entries().map(|e| i64::from(e.score)).sum();
        total as f64 / self.len() as f64
    }

    /// One entry per line, `word` or `word,score`. Blank lines are ignored,
    /// malformed lines are skipped individually, a missing file yields an
    /// empty store.
    pub fn read_from_file<P: AsRef<Path>>(&mut self, path: P) -> Result<(), Error> {
        self.path = Some(path.as_ref().to_path_buf());
        let file = match File::open(&path) {
            Ok(file) => file,
            Err(e) if e.kind() == ErrorKind::NotFound => return Ok(()),
            Err(e) => return Err(Error::Io(e)),
        };
        for line in BufReader::new(file).lines() {
            let line = line?;
            if line.trim().is_empty() {
                continue;
            }
            if let Some((text, score)) = parse_line(&line) {
                self.add_word(text, score);
            }
        }
        Ok(())
    }

    pub fn write_to_file<P: AsRef<Path>>(&self, path: P) -> Result<(), Error> {
        let mut writer = BufWriter::new(File::create(path)?);
        for entry in self.entries() {
            if entry.score == 0 {
                writeln!(writer, "{}", entry.text)?;
            } else {
                writeln!(writer, "{},{}", entry.text, entry.score)?;
            }
        }
        writer.flush()?;
        Ok(())
    }
}

/// A line with one comma-free field is a word with score 0; a line with two
/// fields is accepted iff the second parses as an integer; anything longer
/// is rejected outright.
pub(crate) fn parse_line(line: &str) -> Option<(&str, i32)> {
    let fields: Vec<&str> = line.split(',').collect();
    match fields.as_slice() {
        [word] => Some((word.trim(), 0)),
        [word, score] => score.trim().parse().ok().map(|score| (word.trim(), score)),
        _ => None,
    }
}
