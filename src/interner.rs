//! String Interner for categorical columns
//!
//! Listings repeat a small vocabulary of categorical values (state names,
//! cities, listing status) across millions of rows. The interner stores each
//! distinct string once and hands out integer IDs, so string columns hold
//! `StringId`s and equality tests on categories become integer compares.
//!
//! # Design
//!
//! - Strings are stored once in a `Vec<String>` (index = ID)
//! - A `HashMap<String, StringId>` provides O(1) lookup from string to ID
//! - IDs are 32-bit unsigned integers
//! - Occurrence counts record how often each string was interned
//!
//! Loaded tables never release strings, so IDs are stable for the lifetime
//! of the interner and may be shared by tables derived from the same load.
//!
//! # Examples
//!
//! ```
//! use listingview::StringInterner;
//!
//! let mut interner = StringInterner::new();
//!
//! let ca = interner.intern("California");
//! let tx = interner.intern("Texas");
//! assert_eq!(interner.intern("California"), ca);
//! assert_ne!(ca, tx);
//!
//! assert_eq!(interner.resolve(ca), Some("California"));
//! assert_eq!(interner.lookup("Texas"), Some(tx));
//! ```

use std::collections::HashMap;

/// Interned string ID type
pub type StringId = u32;

/// A string interner that stores unique strings and returns integer IDs
#[derive(Debug, Clone, Default)]
pub struct StringInterner {
    string_to_id: HashMap<String, StringId>,
    id_to_string: Vec<String>,
    occurrences: Vec<u64>,
}

impl StringInterner {
    pub fn new() -> Self {
        Self::default()
    }

    /// Create a string interner with pre-allocated capacity
    pub fn with_capacity(capacity: usize) -> Self {
        StringInterner {
            string_to_id: HashMap::with_capacity(capacity),
            id_to_string: Vec::with_capacity(capacity),
            occurrences: Vec::with_capacity(capacity),
        }
    }

    /// Intern a string, returning its ID.
    /// Known strings get their existing ID and an incremented occurrence count.
    pub fn intern(&mut self, s: &str) -> StringId {
        if let Some(&id) = self.string_to_id.get(s) {
            self.occurrences[id as usize] += 1;
            return id;
        }

        let id = self.id_to_string.len() as StringId;
        self.id_to_string.push(s.to_string());
        self.occurrences.push(1);
        self.string_to_id.insert(s.to_string(), id);
        id
    }

    /// Find the ID of an already interned string without interning it
    pub fn lookup(&self, s: &str) -> Option<StringId> {
        self.string_to_id.get(s).copied()
    }

    /// Resolve an ID back to its string
    pub fn resolve(&self, id: StringId) -> Option<&str> {
        self.id_to_string.get(id as usize).map(|s| s.as_str())
    }

    /// Number of times a string was interned (0 for unknown IDs)
    pub fn occurrences(&self, id: StringId) -> u64 {
        self.occurrences.get(id as usize).copied().unwrap_or(0)
    }

    /// Returns the number of unique strings interned
    pub fn len(&self) -> usize {
        self.id_to_string.len()
    }

    pub fn is_empty(&self) -> bool {
        self.id_to_string.is_empty()
    }

    /// Returns total memory used by all interned strings (approximate)
    pub fn memory_usage(&self) -> usize {
        let string_bytes: usize = self
            .id_to_string
            .iter()
            .map(|s| s.len() + std::mem::size_of::<String>())
            .sum();

        let map_overhead = self.string_to_id.capacity()
            * (std::mem::size_of::<String>() + std::mem::size_of::<StringId>());

        let vec_overhead = self.id_to_string.capacity() * std::mem::size_of::<String>()
            + self.occurrences.capacity() * std::mem::size_of::<u64>();

        string_bytes + map_overhead + vec_overhead
    }

    /// Returns statistics about the interner
    pub fn stats(&self) -> InternerStats {
        InternerStats {
            unique_strings: self.len(),
            total_occurrences: self.occurrences.iter().sum(),
            memory_bytes: self.memory_usage(),
        }
    }
}

/// Statistics about the string interner
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct InternerStats {
    /// Number of unique strings stored
    pub unique_strings: usize,
    /// Total number of interned cells
    pub total_occurrences: u64,
    /// Approximate memory usage in bytes
    pub memory_bytes: usize,
}
