// Catalog view-model: the boundary a widget front-end consumes.
// Folder/genre/sort/search are pure functions over the record list plus an
// explicit ViewState; nothing here touches the cache or the network.
use std::cmp::Ordering;
use std::collections::BTreeSet;
use std::path::Path;

use itertools::Itertools;
use rand::Rng;

use super::player::PlayerLauncher;
use super::types::{MovieRecord, SortKey};

/// Wildcard accepted by the folder and genre filters.
pub const ALL: &str = "All";

impl SortKey {
    /// Comparison table. Years and ratings compare as text on purpose; the
    /// record model never parses them.
    pub fn compare(self, a: &MovieRecord, b: &MovieRecord) -> Ordering {
        match self {
            Self::YearAsc => a.year.cmp(&b.year),
            Self::YearDesc => b.year.cmp(&a.year),
            Self::Title => a.title.cmp(&b.title),
            Self::RatingAsc => a.imdb_rating.cmp(&b.imdb_rating),
            Self::RatingDesc => b.imdb_rating.cmp(&a.imdb_rating),
            Self::RuntimeAsc => a.runtime_minutes.cmp(&b.runtime_minutes),
            Self::RuntimeDesc => b.runtime_minutes.cmp(&a.runtime_minutes),
        }
    }
}

/// Mutable view state, owned by the catalog and nowhere else. `None` filters
/// mean "All"; `selected` doubles as the play-random pool.
#[derive(Clone, Debug)]
pub struct ViewState {
    pub sort: SortKey,
    pub folder: Option<String>,
    pub genre: Option<String>,
    pub selected: BTreeSet<usize>,
}

impl Default for ViewState {
    fn default() -> Self {
        Self {
            sort: SortKey::YearAsc,
            folder: None,
            genre: None,
            selected: BTreeSet::new(),
        }
    }
}

fn enclosing_folder(path: &Path) -> String {
    path.parent()
        .and_then(|p| p.file_name())
        .map(|s| s.to_string_lossy().into_owned())
        .unwrap_or_default()
}

/// Pure folder + genre filter; indices keep scan order.
fn visible_indices(records: &[MovieRecord], folder_of: &[String], state: &ViewState) -> Vec<usize> {
    let mut out = Vec::new();
    for (i, record) in records.iter().enumerate() {
        if let Some(folder) = &state.folder {
            if &folder_of[i] != folder {
                continue;
            }
        }
        if let Some(genre) = &state.genre {
            if !record.genres.contains(genre) {
                continue;
            }
        }
        out.push(i);
    }
    out
}

#[derive(Debug)]
pub struct Catalog {
    records: Vec<MovieRecord>,
    /// Unique enclosing-folder names in scan order.
    folders: Vec<String>,
    /// Parallel to `records`.
    folder_of: Vec<String>,
    state: ViewState,
}

impl Catalog {
    pub fn new(records: Vec<MovieRecord>) -> Self {
        let folder_of: Vec<String> = records
            .iter()
            .map(|r| enclosing_folder(&r.video_path))
            .collect();
        let mut folders = Vec::new();
        for folder in &folder_of {
            if !folders.contains(folder) {
                folders.push(folder.clone());
            }
        }
        Self {
            records,
            folders,
            folder_of,
            state: ViewState::default(),
        }
    }

    pub fn records(&self) -> &[MovieRecord] {
        &self.records
    }

    pub fn state(&self) -> &ViewState {
        &self.state
    }

    pub fn folders(&self) -> &[String] {
        &self.folders
    }

    pub fn all_genres(&self) -> Vec<String> {
        self.records
            .iter()
            .flat_map(|r| r.genres.iter().cloned())
            .sorted()
            .dedup()
            .collect()
    }

    pub fn set_folder(&mut self, folder: &str) {
        self.state.folder = (folder != ALL).then(|| folder.to_string());
    }

    pub fn set_genre(&mut self, genre: &str) {
        self.state.genre = (genre != ALL).then(|| genre.to_string());
    }

    pub fn sort_by(&mut self, key: SortKey) {
        self.state.sort = key;
    }

    /// Records in the current folder and genre, ordered by the current sort
    /// criterion.
    pub fn list(&self) -> Vec<&MovieRecord> {
        let mut indices = visible_indices(&self.records, &self.folder_of, &self.state);
        indices.sort_by(|&a, &b| self.state.sort.compare(&self.records[a], &self.records[b]));
        indices.into_iter().map(|i| &self.records[i]).collect()
    }

    /// Records of the current view whose tags contain every query term.
    pub fn search(&self, terms: &BTreeSet<String>) -> Vec<&MovieRecord> {
        if terms.is_empty() {
            return self.list();
        }
        self.list()
            .into_iter()
            .filter(|r| terms.iter().all(|t| r.search_tags.contains(t)))
            .collect()
    }

    /// Flip a record in or out of the selection pool; true when selected.
    pub fn toggle_select(&mut self, idx: usize) -> bool {
        if idx >= self.records.len() {
            return false;
        }
        if self.state.selected.remove(&idx) {
            false
        } else {
            self.state.selected.insert(idx);
            true
        }
    }

    pub fn clear_selection(&mut self) {
        self.state.selected.clear();
    }

    /// Random pick from the selection pool, else from the current view; the
    /// pick is handed to the player as-is.
    pub fn play_selected_or_random(&self, launcher: &PlayerLauncher) -> Option<&MovieRecord> {
        let pick = self.random_pick()?;
        launcher.play(&pick.video_path, pick.subtitle_path.as_deref());
        Some(pick)
    }

    fn random_pick(&self) -> Option<&MovieRecord> {
        let mut rng = rand::thread_rng();
        if self.state.selected.is_empty() {
            let shown = self.list();
            if shown.is_empty() {
                return None;
            }
            Some(shown[rng.gen_range(0..shown.len())])
        } else {
            let pool: Vec<usize> = self.state.selected.iter().copied().collect();
            self.records.get(pool[rng.gen_range(0..pool.len())])
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::path::PathBuf;

    fn record(folder: &str, title: &str, year: &str, rating: &str, runtime: u32) -> MovieRecord {
        let mut tags: BTreeSet<String> = title.split_whitespace().map(str::to_lowercase).collect();
        tags.insert(year.to_string());
        MovieRecord {
            title: title.to_string(),
            year: year.to_string(),
            genres: BTreeSet::new(),
            plot: String::new(),
            poster_url: String::new(),
            imdb_rating: rating.to_string(),
            director: String::new(),
            runtime_minutes: runtime,
            video_path: PathBuf::from(format!("/lib/{folder}/{year} - {title}.mkv")),
            subtitle_path: None,
            search_tags: tags,
        }
    }

    fn with_genres(mut r: MovieRecord, genres: &[&str]) -> MovieRecord {
        r.genres = genres.iter().map(|g| g.to_string()).collect();
        r
    }

    fn sample() -> Catalog {
        Catalog::new(vec![
            with_genres(
                record("Action", "The Matrix", "1999", "8.7", 136),
                &["Action", "Sci-Fi"],
            ),
            with_genres(
                record("Action", "Heat", "1995", "8.3", 170),
                &["Action", "Crime"],
            ),
            with_genres(
                record("Drama", "Magnolia", "1999", "8.0", 188),
                &["Drama"],
            ),
        ])
    }

    #[test]
    fn folders_keep_scan_order() {
        let catalog = sample();
        assert_eq!(catalog.folders(), &["Action", "Drama"]);
    }

    #[test]
    fn folder_filter_narrows_the_view() {
        let mut catalog = sample();
        catalog.set_folder("Drama");
        let titles: Vec<_> = catalog.list().iter().map(|r| r.title.as_str()).collect();
        assert_eq!(titles, vec!["Magnolia"]);

        catalog.set_folder(ALL);
        assert_eq!(catalog.list().len(), 3);
    }

    #[test]
    fn genre_filter_uses_exact_membership() {
        let mut catalog = sample();
        catalog.set_genre("Crime");
        let titles: Vec<_> = catalog.list().iter().map(|r| r.title.as_str()).collect();
        assert_eq!(titles, vec!["Heat"]);
    }

    #[test]
    fn sort_table_orders_each_criterion() {
        let mut catalog = sample();

        catalog.sort_by(SortKey::YearAsc);
        let years: Vec<_> = catalog.list().iter().map(|r| r.year.as_str()).collect();
        assert_eq!(years, vec!["1995", "1999", "1999"]);

        catalog.sort_by(SortKey::Title);
        let titles: Vec<_> = catalog.list().iter().map(|r| r.title.as_str()).collect();
        assert_eq!(titles, vec!["Heat", "Magnolia", "The Matrix"]);

        catalog.sort_by(SortKey::RatingDesc);
        let ratings: Vec<_> = catalog
            .list()
            .iter()
            .map(|r| r.imdb_rating.as_str())
            .collect();
        assert_eq!(ratings, vec!["8.7", "8.3", "8.0"]);

        catalog.sort_by(SortKey::RuntimeAsc);
        let runtimes: Vec<_> = catalog
            .list()
            .iter()
            .map(|r| r.runtime_minutes)
            .collect();
        assert_eq!(runtimes, vec![136, 170, 188]);
    }

    #[test]
    fn search_matches_supersets_only() {
        let catalog = sample();
        let hit: BTreeSet<String> = ["matrix", "1999"].iter().map(|s| s.to_string()).collect();
        let titles: Vec<_> = catalog
            .search(&hit)
            .iter()
            .map(|r| r.title.as_str())
            .collect();
        assert_eq!(titles, vec!["The Matrix"]);

        let miss: BTreeSet<String> = ["matrix", "2000"].iter().map(|s| s.to_string()).collect();
        assert!(catalog.search(&miss).is_empty());
    }

    #[test]
    fn search_respects_active_filters() {
        let mut catalog = sample();
        catalog.set_genre("Drama");
        let terms: BTreeSet<String> = ["1999"].iter().map(|s| s.to_string()).collect();
        let titles: Vec<_> = catalog
            .search(&terms)
            .iter()
            .map(|r| r.title.as_str())
            .collect();
        assert_eq!(titles, vec!["Magnolia"]);
    }

    #[test]
    fn selection_pool_toggles_and_pins_random_choice() {
        let mut catalog = sample();
        assert!(catalog.toggle_select(1));
        assert_eq!(catalog.random_pick().unwrap().title, "Heat");
        assert!(!catalog.toggle_select(1));
        assert!(catalog.state().selected.is_empty());

        // Out-of-range indices never enter the pool.
        assert!(!catalog.toggle_select(99));
        assert!(catalog.state().selected.is_empty());
    }

    #[test]
    fn random_pick_falls_back_to_current_view() {
        let mut catalog = sample();
        catalog.set_folder("Drama");
        assert_eq!(catalog.random_pick().unwrap().title, "Magnolia");

        catalog.set_genre("Crime");
        assert!(catalog.random_pick().is_none());
    }
}
