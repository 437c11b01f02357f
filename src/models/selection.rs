use camino::{Utf8Path, Utf8PathBuf};
use indexmap::IndexMap;

/// Prefix shown in the list widget for folder structure entries
pub const STRUCTURE_LIST_PREFIX: &str = "FOLDER_STRUCTURE: ";

/// Prefix used for the header line of folder structure blocks in combined output
pub const STRUCTURE_HEADER_PREFIX: &str = "FOLDER STRUCTURE: ";

/// Stable identifier of a selection entry.
///
/// Ids are handed out in insertion order and never reused within a session,
/// so removing by id cannot hit the wrong entry when two labels overlap.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct EntryId(u64);

/// What a selection entry points at
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum EntryKind {
    /// A source file picked by the user
    File,

    /// A generated sidecar file holding the rendered tree of `source_folder`
    Structure { source_folder: Utf8PathBuf },
}

/// One row of the selection list
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SelectionEntry {
    pub id: EntryId,
    pub kind: EntryKind,
    pub path: Utf8PathBuf,
}

impl SelectionEntry {
    pub fn is_structure(&self) -> bool {
        matches!(self.kind, EntryKind::Structure { .. })
    }

    /// Label shown in the list widget
    pub fn list_label(&self) -> String {
        match &self.kind {
            EntryKind::File => self.path.to_string(),
            EntryKind::Structure { source_folder } => {
                format!("{}{}", STRUCTURE_LIST_PREFIX, folder_name(source_folder))
            }
        }
    }

    /// Header line written above the entry's content in preview and export
    pub fn header_label(&self) -> String {
        match &self.kind {
            EntryKind::File => self.path.to_string(),
            EntryKind::Structure { source_folder } => {
                format!("{}{}", STRUCTURE_HEADER_PREFIX, folder_name(source_folder))
            }
        }
    }
}

fn folder_name(folder: &Utf8Path) -> &str {
    folder.file_name().unwrap_or(folder.as_str())
}

/// Ordered, duplicate-free list of entries staged for combination.
///
/// Duplicates are rejected by exact path match. Insertion order is the order
/// entries appear in the list widget, the preview and the export.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Selection {
    entries: IndexMap<EntryId, SelectionEntry>,
    next_id: u64,
}

impl Selection {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    pub fn contains_path(&self, path: &Utf8Path) -> bool {
        self.entries.values().any(|e| e.path == path)
    }

    pub fn iter(&self) -> impl Iterator<Item = &SelectionEntry> {
        self.entries.values()
    }

    pub fn paths(&self) -> Vec<Utf8PathBuf> {
        self.entries.values().map(|e| e.path.clone()).collect()
    }

    /// Id of the entry shown at `index` in the list widget
    pub fn id_at(&self, index: usize) -> Option<EntryId> {
        self.entries.get_index(index).map(|(id, _)| *id)
    }

    /// Append an entry unless its path is already selected.
    ///
    /// Returns the new id, or `None` for a duplicate.
    pub fn push(&mut self, path: Utf8PathBuf, kind: EntryKind) -> Option<EntryId> {
        if self.contains_path(&path) {
            return None;
        }

        let id = EntryId(self.next_id);
        self.next_id += 1;
        self.entries.insert(id, SelectionEntry { id, kind, path });
        Some(id)
    }

    /// Turn the entry at `path` into a structure entry for `source_folder`.
    ///
    /// Returns false if `path` is not selected or already has that kind.
    pub fn mark_structure(&mut self, path: &Utf8Path, source_folder: Utf8PathBuf) -> bool {
        let kind = EntryKind::Structure { source_folder };
        match self.entries.values_mut().find(|e| e.path == path) {
            Some(entry) if entry.kind != kind => {
                entry.kind = kind;
                true
            }
            _ => false,
        }
    }

    /// Remove every entry whose id is listed, returning how many were removed
    pub fn remove_ids(&mut self, ids: &[EntryId]) -> usize {
        ids.iter()
            .filter(|id| self.entries.shift_remove(*id).is_some())
            .count()
    }

    pub fn clear(&mut self) {
        self.entries.clear();
    }
}
