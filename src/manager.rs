use std::path::Path;

use crate::store::WordStore;
use crate::{Error, MAX_WORD_LISTS};

/// Owns the active word stores. Each store gets the lowest free index in
/// `[0, MAX_WORD_LISTS)`; removing a store frees its index for reuse. This
/// replaces the source's process-wide registry: construct one and pass it
/// by reference wherever searches happen.
pub struct WordListManager {
    slots: Vec<Option<WordStore>>,
}

impl WordListManager {
    pub fn new() -> WordListManager {
        WordListManager {
            slots: (0..MAX_WORD_LISTS).map(|_| None).collect(),
        }
    }

    fn free_index(&self) -> Option<usize> {
        self.slots.iter().position(|slot| slot.is_none())
    }

    /// Loads a word-list file into a fresh store. A missing file still
    /// claims an index and yields an empty store.
    pub fn load<P: AsRef<Path>>(&mut self, path: P) -> Result<usize, Error> {
        let index = self.free_index().ok_or(Error::TooManyWordLists)?;
        let mut store = WordStore::new(index);
        store.read_from_file(&path)?;
        self.slots[index] = Some(store);
        Ok(index)
    }

    /// Builds a store from a literal word list.
    pub fn insert(&mut self, name: &str, words: &[(&str, i32)]) -> Result<usize, Error> {
        let index = self.free_index().ok_or(Error::TooManyWordLists)?;
        let mut store = WordStore::new(index);
        store.set_name(name);
        for (text, score) in words {
            store.add_word(text, *score);
        }
        self.slots[index] = Some(store);
        Ok(index)
    }

    pub fn get<P: AsRef<Path>>(&self, path: P) -> Option<&WordStore> {
        self.stores()
            .into_iter()
            .find(|store| store.path() == Some(path.as_ref()))
    }

    pub fn get_by_index(&self, index: usize) -> Option<&WordStore> {
        self.slots.get(index).and_then(|slot| slot.as_ref())
    }

    pub fn get_mut_by_index(&mut self, index: usize) -> Option<&mut WordStore> {
        self.slots.get_mut(index).and_then(|slot| slot.as_mut())
    }

    /// Removes the store loaded from `path`, freeing its index.
    pub fn remove<P: AsRef<Path>>(&mut self, path: P) -> Option<WordStore> {
        let index = self
            .slots
            .iter()
            .position(|slot| match slot {
                Some(store) => store.path() == Some(path.as_ref()),
                None => false,
            })?;
        self.slots[index].take()
    }

    /// Active stores in index order, ready to hand to the search functions.
    pub fn stores(&self) -> Vec<&WordStore> {
        self.slots.iter().filter_map(|slot| slot.as_ref()).collect()
    }

    pub fn len(&self) -> usize {
        self.slots.iter().filter(|slot| slot.is_some()).count()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}

impl Default for WordListManager {
    fn default() -> WordListManager {
        WordListManager::new()
    }
}
