//! Ordered, append-only collection of file views.

use indexmap::IndexMap;

use crate::view::{FileView, ViewId};

/// Views in insertion order, addressable by id or by position.
///
/// Entries are never removed; only their `expanded` flag changes.
#[derive(Debug, Default)]
pub struct ViewCollection {
    views: IndexMap<ViewId, FileView>,
}

impl ViewCollection {
    pub fn new() -> Self {
        Self::default()
    }

    /// Append a view at the end.
    pub fn push(&mut self, view: FileView) {
        self.views.insert(view.id, view);
    }

    /// Append views in the order given.
    pub fn extend(&mut self, views: impl IntoIterator<Item = FileView>) {
        for view in views {
            self.push(view);
        }
    }

    /// Flip the expanded flag of the view with `id`.
    ///
    /// Returns the new value, or `None` if no such view exists.
    pub fn toggle(&mut self, id: ViewId) -> Option<bool> {
        self.views.get_mut(&id).map(FileView::toggle)
    }

    /// Flip the expanded flag of the view at `index`.
    pub fn toggle_at(&mut self, index: usize) -> Option<bool> {
        self.views.get_index_mut(index).map(|(_, view)| view.toggle())
    }

    pub fn get(&self, id: ViewId) -> Option<&FileView> {
        self.views.get(&id)
    }

    pub fn get_index(&self, index: usize) -> Option<&FileView> {
        self.views.get_index(index).map(|(_, view)| view)
    }

    /// Current position of the view with `id`.
    pub fn position(&self, id: ViewId) -> Option<usize> {
        self.views.get_index_of(&id)
    }

    pub fn iter(&self) -> impl Iterator<Item = &FileView> {
        self.views.values()
    }

    pub fn len(&self) -> usize {
        self.views.len()
    }

    pub fn is_empty(&self) -> bool {
        self.views.is_empty()
    }

    /// Sum of all view sizes in bytes.
    pub fn total_size(&self) -> u64 {
        self.views.values().map(|view| view.size).sum()
    }
}

impl<'a> IntoIterator for &'a ViewCollection {
    type Item = &'a FileView;
    type IntoIter = indexmap::map::Values<'a, ViewId, FileView>;

    fn into_iter(self) -> Self::IntoIter {
        self.views.values()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::blob::BlobStore;
    use crate::view::FileHandle;

    fn view(store: &BlobStore, name: &str) -> FileView {
        let handle = FileHandle::in_memory(name, "text/plain", name.as_bytes());
        let download = store.create(name.as_bytes(), "text/plain");
        FileView::new(&handle, name.to_string(), 50, download, format!("arquivo_{name}.txt"))
    }

    #[test]
    fn test_push_preserves_order() {
        let store = BlobStore::new();
        let mut views = ViewCollection::new();
        views.extend([view(&store, "b.txt"), view(&store, "a.txt")]);
        views.push(view(&store, "c.txt"));

        let names: Vec<&str> = views.iter().map(|v| v.name.as_str()).collect();
        assert_eq!(names, ["b.txt", "a.txt", "c.txt"]);
        assert_eq!(views.len(), 3);
    }

    #[test]
    fn test_toggle_by_id_touches_only_target() {
        let store = BlobStore::new();
        let mut views = ViewCollection::new();
        views.extend([view(&store, "a"), view(&store, "b"), view(&store, "c")]);
        let target = views.get_index(1).unwrap().id;

        assert_eq!(views.toggle(target), Some(true));
        let flags: Vec<bool> = views.iter().map(|v| v.expanded).collect();
        assert_eq!(flags, [false, true, false]);

        assert_eq!(views.toggle(target), Some(false));
        assert!(views.iter().all(|v| !v.expanded));
    }

    #[test]
    fn test_toggle_at_index() {
        let store = BlobStore::new();
        let mut views = ViewCollection::new();
        views.extend([view(&store, "a"), view(&store, "b")]);

        assert_eq!(views.toggle_at(0), Some(true));
        assert!(views.get_index(0).unwrap().expanded);
        assert!(!views.get_index(1).unwrap().expanded);
        assert_eq!(views.toggle_at(5), None);
    }

    #[test]
    fn test_unknown_id() {
        let mut views = ViewCollection::new();
        assert_eq!(views.toggle(ViewId::new(u64::MAX)), None);
        assert!(views.position(ViewId::new(u64::MAX)).is_none());
    }

    #[test]
    fn test_dropping_collection_releases_blobs() {
        let store = BlobStore::new();
        let mut views = ViewCollection::new();
        views.extend([view(&store, "a"), view(&store, "b")]);
        assert_eq!(store.live_count(), 2);

        drop(views);
        assert_eq!(store.live_count(), 0);
    }
}
