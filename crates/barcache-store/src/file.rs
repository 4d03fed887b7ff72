//! JSON-file bar store.

use async_trait::async_trait;
use barcache_core::BarStore;
use barcache_types::{Bar, BarSet, InstrumentKey, StoreError, TimeRange, Timeframe};
use directories::ProjectDirs;
use std::collections::HashMap;
use std::io::ErrorKind;
use std::path::{Path, PathBuf};
use std::sync::{Arc, Mutex as StdMutex};
use tokio::fs;
use tokio::sync::Mutex;
use tracing::{debug, warn};

use crate::BarSetData;

type Result<T> = std::result::Result<T, StoreError>;

/// A [`BarStore`] that keeps one JSON document per bar set.
///
/// Layout under the root directory:
///
/// ```text
/// barsets/<EXCHANGE>/<SYMBOL>/<timeframe>.json
/// ```
///
/// Each write replaces the document through a temporary file and a rename,
/// so readers see either the old or the new contents. Writes to the same bar
/// set are serialized within one store instance; two processes writing the
/// same root at once are not coordinated.
#[derive(Debug)]
pub struct FileBarStore {
    /// Base directory for storage.
    root: PathBuf,
    /// Directory holding the bar set documents.
    barsets_path: PathBuf,
    /// One write lock per bar set.
    write_locks: StdMutex<HashMap<BarSet, Arc<Mutex<()>>>>,
}

impl FileBarStore {
    /// Creates a store rooted at `root`.
    ///
    /// Creates the necessary directories if they don't exist.
    ///
    /// # Errors
    ///
    /// Returns an error if the directories cannot be created.
    pub fn new(root: PathBuf) -> Result<Self> {
        let barsets_path = root.join("barsets");

        for path in [&root, &barsets_path] {
            if !path.exists() {
                std::fs::create_dir_all(path).map_err(|e| StoreError::CreateDir {
                    path: path.clone(),
                    source: e,
                })?;
            }
        }

        Ok(Self {
            root,
            barsets_path,
            write_locks: StdMutex::new(HashMap::new()),
        })
    }

    /// Returns the default root for barcache storage.
    ///
    /// Uses the `directories` crate to find the appropriate location:
    /// - Linux: `~/.local/share/barcache/`
    /// - macOS: `~/Library/Application Support/barcache/`
    /// - Windows: `C:\Users\<User>\AppData\Roaming\barcache\`
    ///
    /// Falls back to `~/.barcache/` if the platform-specific location
    /// cannot be determined.
    #[must_use]
    pub fn default_path() -> PathBuf {
        ProjectDirs::from("", "", "barcache").map_or_else(dirs_fallback, |proj_dirs| {
            proj_dirs.data_dir().to_path_buf()
        })
    }

    /// Creates a store at the default path.
    ///
    /// # Errors
    ///
    /// Returns an error if the directories cannot be created.
    pub fn with_default_path() -> Result<Self> {
        Self::new(Self::default_path())
    }

    /// Returns the root directory.
    #[must_use]
    pub fn root(&self) -> &Path {
        &self.root
    }

    /// Returns the path of a bar set's document.
    #[must_use]
    pub fn bar_set_path(&self, bar_set: &BarSet) -> PathBuf {
        self.barsets_path
            .join(bar_set.instrument.exchange())
            .join(bar_set.instrument.symbol())
            .join(format!("{}.json", bar_set.timeframe))
    }

    /// Loads a bar set's document. A missing document is an empty bar set.
    ///
    /// # Errors
    ///
    /// Returns an error if the file cannot be read or parsed.
    pub async fn load(&self, bar_set: &BarSet) -> Result<BarSetData> {
        let path = self.bar_set_path(bar_set);

        let content = match fs::read_to_string(&path).await {
            Ok(content) => content,
            Err(e) if e.kind() == ErrorKind::NotFound => return Ok(BarSetData::default()),
            Err(e) => return Err(StoreError::ReadFile { path, source: e }),
        };

        serde_json::from_str(&content).map_err(|e| StoreError::Corrupt { path, source: e })
    }

    async fn save(&self, bar_set: &BarSet, data: &BarSetData) -> Result<()> {
        let path = self.bar_set_path(bar_set);
        if let Some(parent) = path.parent() {
            fs::create_dir_all(parent)
                .await
                .map_err(|e| StoreError::CreateDir {
                    path: parent.to_path_buf(),
                    source: e,
                })?;
        }

        let json = serde_json::to_string_pretty(data)?;
        let tmp_path = path.with_extension("json.tmp");
        fs::write(&tmp_path, json)
            .await
            .map_err(|e| StoreError::WriteFile {
                path: tmp_path.clone(),
                source: e,
            })?;
        fs::rename(&tmp_path, &path)
            .await
            .map_err(|e| StoreError::WriteFile { path, source: e })
    }

    fn write_lock(&self, bar_set: &BarSet) -> Result<Arc<Mutex<()>>> {
        let mut locks = self
            .write_locks
            .lock()
            .map_err(|_| StoreError::Backend("write lock table poisoned".to_string()))?;
        Ok(Arc::clone(locks.entry(bar_set.clone()).or_default()))
    }
}

/// Fallback for determining home directory.
fn dirs_fallback() -> PathBuf {
    std::env::var("HOME")
        .map(PathBuf::from)
        .unwrap_or_else(|_| PathBuf::from("."))
        .join(".barcache")
}

/// Lists the entries of `dir` that satisfy `keep`, or nothing if `dir` is gone.
async fn read_dir_paths(dir: &Path, keep: impl Fn(&Path) -> bool) -> Result<Vec<PathBuf>> {
    let read_dir_error = |e: std::io::Error| StoreError::ReadDir {
        path: dir.to_path_buf(),
        source: e,
    };

    let mut entries = match fs::read_dir(dir).await {
        Ok(entries) => entries,
        Err(e) if e.kind() == ErrorKind::NotFound => return Ok(Vec::new()),
        Err(e) => return Err(read_dir_error(e)),
    };

    let mut paths = Vec::new();
    while let Some(entry) = entries.next_entry().await.map_err(read_dir_error)? {
        let path = entry.path();
        if keep(&path) {
            paths.push(path);
        }
    }
    Ok(paths)
}

fn file_name(path: &Path) -> Option<&str> {
    path.file_name().and_then(|name| name.to_str())
}

#[async_trait]
impl BarStore for FileBarStore {
    async fn coverage_ranges(&self, bar_set: &BarSet) -> Result<Vec<TimeRange>> {
        Ok(self.load(bar_set).await?.coverage().to_vec())
    }

    async fn bars(&self, bar_set: &BarSet, range: TimeRange) -> Result<Vec<Bar>> {
        range.validate()?;
        Ok(self.load(bar_set).await?.bars_in(range))
    }

    async fn latest_timestamp(&self, bar_set: &BarSet) -> Result<Option<i64>> {
        Ok(self.load(bar_set).await?.latest_timestamp())
    }

    async fn add_bars(&self, bar_set: &BarSet, bars: Vec<Bar>, covered: TimeRange) -> Result<()> {
        covered.validate()?;
        let lock = self.write_lock(bar_set)?;
        let _guard = lock.lock().await;

        let mut data = self.load(bar_set).await?;
        let count = bars.len();
        data.insert(bars, covered)?;
        self.save(bar_set, &data).await?;

        debug!(%bar_set, count, %covered, total = data.len(), "persisted bars");
        Ok(())
    }

    async fn bar_sets(&self) -> Result<Vec<BarSet>> {
        let mut sets = Vec::new();

        for exchange_dir in read_dir_paths(&self.barsets_path, Path::is_dir).await? {
            for symbol_dir in read_dir_paths(&exchange_dir, Path::is_dir).await? {
                let documents = read_dir_paths(&symbol_dir, |path| {
                    path.extension().is_some_and(|ext| ext == "json")
                })
                .await?;

                for document in documents {
                    let parsed = match (
                        file_name(&exchange_dir),
                        file_name(&symbol_dir),
                        document.file_stem().and_then(|stem| stem.to_str()),
                    ) {
                        (Some(exchange), Some(symbol), Some(stem)) => {
                            InstrumentKey::new(exchange, symbol)
                                .ok()
                                .zip(stem.parse::<Timeframe>().ok())
                        }
                        _ => None,
                    };

                    match parsed {
                        Some((instrument, timeframe)) => {
                            sets.push(BarSet::new(instrument, timeframe));
                        }
                        None => {
                            // Don't fail the listing on stray files
                            warn!(path = %document.display(), "skipping unrecognized bar set file");
                        }
                    }
                }
            }
        }

        sets.sort();
        Ok(sets)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use barcache_core::{BarCache, OriginGateway, StaticSessionOracle};
    use barcache_types::{Decimal, OriginError};
    use std::sync::atomic::{AtomicUsize, Ordering};
    use tempfile::TempDir;

    fn bar_set() -> BarSet {
        BarSet::new("GLOBEX:ES".parse().unwrap(), Timeframe::Minute5)
    }

    fn bar(t: i64) -> Bar {
        let c = Decimal::new(t, 2);
        Bar::new(t, c, c, c, c, 5)
    }

    fn range(from_t: i64, to_t: i64) -> TimeRange {
        TimeRange::new(from_t, to_t).unwrap()
    }

    /// Origin that serves a bar every 300 seconds and counts calls.
    #[derive(Default)]
    struct CountingOrigin {
        calls: AtomicUsize,
    }

    #[async_trait]
    impl OriginGateway for CountingOrigin {
        async fn fetch_bars(
            &self,
            _bar_set: &BarSet,
            range: TimeRange,
        ) -> std::result::Result<Vec<Bar>, OriginError> {
            self.calls.fetch_add(1, Ordering::SeqCst);
            let first = range.from_t.div_euclid(300) * 300;
            Ok((first..range.to_t)
                .step_by(300)
                .filter(|t| *t >= range.from_t)
                .map(bar)
                .collect())
        }
    }

    fn cache(store: FileBarStore, origin: &Arc<CountingOrigin>) -> BarCache {
        BarCache::new(
            Arc::new(store),
            Arc::clone(origin) as Arc<dyn OriginGateway>,
            Arc::new(StaticSessionOracle::new()),
        )
    }

    #[test]
    fn test_store_creation() {
        let temp_dir = TempDir::new().unwrap();
        let store = FileBarStore::new(temp_dir.path().to_path_buf()).unwrap();

        assert!(store.root().exists());
        assert!(temp_dir.path().join("barsets").exists());
        assert_eq!(
            store.bar_set_path(&bar_set()),
            temp_dir.path().join("barsets/GLOBEX/ES/m5.json")
        );
    }

    #[tokio::test]
    async fn test_missing_file_is_empty() {
        let temp_dir = TempDir::new().unwrap();
        let store = FileBarStore::new(temp_dir.path().to_path_buf()).unwrap();

        assert!(store.coverage_ranges(&bar_set()).await.unwrap().is_empty());
        assert_eq!(store.latest_timestamp(&bar_set()).await.unwrap(), None);
    }

    #[tokio::test]
    async fn test_add_persists_across_instances() {
        let temp_dir = TempDir::new().unwrap();
        let set = bar_set();
        {
            let store = FileBarStore::new(temp_dir.path().to_path_buf()).unwrap();
            store
                .add_bars(&set, vec![bar(300), bar(0)], range(0, 600))
                .await
                .unwrap();
        }

        let store = FileBarStore::new(temp_dir.path().to_path_buf()).unwrap();
        let bars = store.bars(&set, range(0, 600)).await.unwrap();
        assert_eq!(bars.iter().map(|b| b.t).collect::<Vec<_>>(), vec![0, 300]);
        assert_eq!(store.coverage_ranges(&set).await.unwrap(), vec![range(0, 600)]);
        assert!(!store.bar_set_path(&set).with_extension("json.tmp").exists());
    }

    #[tokio::test]
    async fn test_corrupt_file_is_reported() {
        let temp_dir = TempDir::new().unwrap();
        let store = FileBarStore::new(temp_dir.path().to_path_buf()).unwrap();
        let path = store.bar_set_path(&bar_set());
        std::fs::create_dir_all(path.parent().unwrap()).unwrap();
        std::fs::write(&path, "{ not json").unwrap();

        let err = store.coverage_ranges(&bar_set()).await.unwrap_err();
        assert!(matches!(err, StoreError::Corrupt { .. }));
    }

    #[tokio::test]
    async fn test_concurrent_adds_keep_all_coverage() {
        let temp_dir = TempDir::new().unwrap();
        let store = Arc::new(FileBarStore::new(temp_dir.path().to_path_buf()).unwrap());
        let set = bar_set();

        let handles: Vec<_> = (0..12)
            .map(|i| {
                let store = Arc::clone(&store);
                let set = set.clone();
                tokio::spawn(async move {
                    let from_t = i * 300;
                    store
                        .add_bars(&set, vec![bar(from_t)], range(from_t, from_t + 300))
                        .await
                })
            })
            .collect();
        for handle in handles {
            handle.await.unwrap().unwrap();
        }

        assert_eq!(
            store.coverage_ranges(&set).await.unwrap(),
            vec![range(0, 12 * 300)]
        );
        assert_eq!(store.load(&set).await.unwrap().len(), 12);
    }

    #[tokio::test]
    async fn test_bar_sets_lists_documents() {
        let temp_dir = TempDir::new().unwrap();
        let store = FileBarStore::new(temp_dir.path().to_path_buf()).unwrap();
        let es = bar_set();
        let aapl = BarSet::new("NASDAQ:AAPL".parse().unwrap(), Timeframe::Day1);

        store.add_bars(&es, vec![bar(0)], range(0, 300)).await.unwrap();
        store.add_bars(&aapl, vec![bar(0)], range(0, 300)).await.unwrap();
        std::fs::write(temp_dir.path().join("barsets/GLOBEX/ES/notes.json"), "{}").unwrap();

        let sets = store.bar_sets().await.unwrap();
        assert_eq!(sets, vec![es, aapl]);
    }

    #[tokio::test]
    async fn test_cache_survives_restart() {
        let temp_dir = TempDir::new().unwrap();
        let origin = Arc::new(CountingOrigin::default());
        let set = bar_set();
        let requested = range(3_000, 6_000);

        let first = cache(FileBarStore::new(temp_dir.path().to_path_buf()).unwrap(), &origin)
            .get_bars(&set, requested)
            .await
            .unwrap();
        assert_eq!(origin.calls.load(Ordering::SeqCst), 1);

        let second = cache(FileBarStore::new(temp_dir.path().to_path_buf()).unwrap(), &origin)
            .get_bars(&set, requested)
            .await
            .unwrap();

        assert_eq!(origin.calls.load(Ordering::SeqCst), 1);
        assert_eq!(second.report.fetch_count(), 0);
        assert_eq!(first.bars, second.bars);
        assert_eq!(second.bars.len(), 10);
    }

    #[tokio::test]
    async fn test_cache_fetches_only_extension() {
        let temp_dir = TempDir::new().unwrap();
        let origin = Arc::new(CountingOrigin::default());
        let set = bar_set();
        let cache = cache(FileBarStore::new(temp_dir.path().to_path_buf()).unwrap(), &origin);

        cache.get_bars(&set, range(3_000, 6_000)).await.unwrap();
        let response = cache.get_bars(&set, range(3_000, 9_000)).await.unwrap();

        assert_eq!(origin.calls.load(Ordering::SeqCst), 2);
        assert_eq!(response.report.gaps()[0].gap, range(6_000, 9_000));
        assert_eq!(response.bars.len(), 20);
        assert!(response.bars.windows(2).all(|w| w[0].t < w[1].t));
    }
}
