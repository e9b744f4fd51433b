//! Persistent favorites list.
//!
//! A single JSON file holds the serialized array of favorite cities, the
//! file-system analog of a browser's single localStorage key. Every
//! mutation rewrites the whole file; unreadable or malformed content resets
//! to an empty list instead of surfacing an error.

use std::fs;
use std::path::{Path, PathBuf};
use tracing::{debug, warn};

use crate::model::Location;

#[derive(Debug)]
pub struct FavoritesStore {
    path: PathBuf,
    capacity: usize,
    entries: Vec<Location>,
}

impl FavoritesStore {
    /// Open the store, loading whatever is currently persisted at `path`.
    pub fn open(path: PathBuf, capacity: usize) -> Self {
        let entries = read_entries(&path);
        Self { path, capacity, entries }
    }

    /// Most-recent-first list of favorites.
    pub fn list(&self) -> &[Location] {
        &self.entries
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    pub fn is_favorite(&self, location: &Location) -> bool {
        self.entries.iter().any(|fav| fav.same_place(location))
    }

    /// Prepend `city` unless a coordinate-matching entry already exists.
    /// Returns whether the list changed.
    pub fn add(&mut self, city: Location) -> bool {
        if self.is_favorite(&city) {
            return false;
        }
        self.entries.insert(0, city);
        self.entries.truncate(self.capacity);
        self.persist();
        true
    }

    /// Remove every entry matching `city`'s coordinates. Returns whether
    /// the list changed.
    pub fn remove(&mut self, city: &Location) -> bool {
        let before = self.entries.len();
        self.entries.retain(|fav| !fav.same_place(city));
        if self.entries.len() == before {
            return false;
        }
        self.persist();
        true
    }

    /// Re-read the backing file and adopt its contents if they differ.
    /// Covers the case of another process (or a second dashboard) writing
    /// the same file.
    pub fn refresh(&mut self) {
        let external = read_entries(&self.path);
        if external != self.entries {
            debug!(count = external.len(), "favorites changed externally, reloading");
            self.entries = external;
        }
    }

    /// Adopt a raw externally-written value. Malformed input is ignored.
    pub fn apply_external(&mut self, raw: &str) {
        match serde_json::from_str::<Vec<Location>>(raw) {
            Ok(entries) => self.entries = entries,
            Err(e) => warn!("ignoring malformed external favorites value: {e}"),
        }
    }

    /// Write the full list back to disk. Failures are logged, never
    /// surfaced: losing a favorites write must not break the dashboard.
    fn persist(&self) {
        if let Some(parent) = self.path.parent()
            && let Err(e) = fs::create_dir_all(parent)
        {
            warn!("failed to create favorites directory {}: {e}", parent.display());
            return;
        }

        let json = match serde_json::to_string(&self.entries) {
            Ok(json) => json,
            Err(e) => {
                warn!("failed to serialize favorites: {e}");
                return;
            }
        };

        if let Err(e) = fs::write(&self.path, json) {
            warn!("failed to write favorites to {}: {e}", self.path.display());
        }
    }
}

fn read_entries(path: &Path) -> Vec<Location> {
    let raw = match fs::read_to_string(path) {
        Ok(raw) => raw,
        Err(_) => return Vec::new(),
    };
    match serde_json::from_str::<Vec<Location>>(&raw) {
        Ok(entries) => entries,
        Err(e) => {
            warn!("resetting unreadable favorites file {}: {e}", path.display());
            Vec::new()
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    fn store_in(dir: &TempDir) -> FavoritesStore {
        FavoritesStore::open(dir.path().join("favorites.json"), 50)
    }

    fn helsinki() -> Location {
        Location::new(60.17, 24.94, "Helsinki, Finland")
    }

    #[test]
    fn add_is_idempotent_by_coordinates() {
        let dir = TempDir::new().unwrap();
        let mut store = store_in(&dir);

        assert!(store.add(helsinki()));
        assert!(!store.add(helsinki()));
        // Same place within tolerance, different name: still a duplicate.
        assert!(!store.add(Location::new(60.1703, 24.9402, "Helsinki")));
        assert_eq!(store.len(), 1);
    }

    #[test]
    fn remove_then_is_favorite_is_false() {
        let dir = TempDir::new().unwrap();
        let mut store = store_in(&dir);

        store.add(helsinki());
        assert!(store.is_favorite(&helsinki()));
        assert!(store.remove(&helsinki()));
        assert!(!store.is_favorite(&helsinki()));
        assert!(!store.remove(&helsinki()));
    }

    #[test]
    fn newest_entry_is_first_and_capacity_is_enforced() {
        let dir = TempDir::new().unwrap();
        let mut store = FavoritesStore::open(dir.path().join("favorites.json"), 3);

        for i in 0..5 {
            store.add(Location::new(f64::from(i), 0.0, format!("City {i}")));
        }
        assert_eq!(store.len(), 3);
        assert_eq!(store.list()[0].name, "City 4");
        assert_eq!(store.list()[2].name, "City 2");
    }

    #[test]
    fn list_survives_reopen() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("favorites.json");

        let mut store = FavoritesStore::open(path.clone(), 50);
        store.add(helsinki());
        store.add(Location::new(51.51, -0.13, "London, UK"));

        let reopened = FavoritesStore::open(path, 50);
        assert_eq!(reopened.list(), store.list());
    }

    #[test]
    fn missing_file_loads_empty() {
        let dir = TempDir::new().unwrap();
        let store = store_in(&dir);
        assert!(store.is_empty());
    }

    #[test]
    fn corrupt_file_resets_to_empty() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("favorites.json");
        fs::write(&path, "{not json").unwrap();

        let store = FavoritesStore::open(path, 50);
        assert!(store.is_empty());
    }

    #[test]
    fn non_array_content_resets_to_empty() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("favorites.json");
        fs::write(&path, r#"{"lat": 1.0, "lon": 2.0, "name": "not a list"}"#).unwrap();

        let store = FavoritesStore::open(path, 50);
        assert!(store.is_empty());
    }

    #[test]
    fn refresh_adopts_external_writes() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("favorites.json");

        let mut ours = FavoritesStore::open(path.clone(), 50);
        ours.add(helsinki());

        // Second store simulating another process on the same file.
        let mut theirs = FavoritesStore::open(path, 50);
        theirs.add(Location::new(51.51, -0.13, "London, UK"));

        ours.refresh();
        assert_eq!(ours.len(), 2);
        assert!(ours.is_favorite(&Location::new(51.51, -0.13, "London, UK")));
    }

    #[test]
    fn apply_external_ignores_malformed_value() {
        let dir = TempDir::new().unwrap();
        let mut store = store_in(&dir);
        store.add(helsinki());

        store.apply_external("][");
        assert_eq!(store.len(), 1);

        store.apply_external("[]");
        assert!(store.is_empty());
    }

    #[test]
    fn favorites_roundtrip_preserves_order_and_content() {
        let list = vec![helsinki(), Location::new(51.51, -0.13, "London, UK")];
        let json = serde_json::to_string(&list).unwrap();
        let back: Vec<Location> = serde_json::from_str(&json).unwrap();
        assert_eq!(back, list);
    }
}
