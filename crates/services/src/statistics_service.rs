use std::sync::Arc;

use quiz_core::model::{BestGameUpdate, GameResult, StatisticsRecord, StatisticsSummary};
use storage::repository::StatisticsRepository;
use tokio::sync::Mutex;
use tracing::{debug, info, instrument, warn};

use crate::Clock;
use crate::error::StatisticsError;

/// Aggregates finished games into the persisted statistics record.
///
/// The record is loaded on first use and kept in memory; every mutation is
/// written through to the repository straight away. A failed write is logged
/// and the in-memory values stay authoritative. A failed read is never cached:
/// games finished meanwhile are held back and replayed onto the stored record
/// once a later read succeeds, so defaults never overwrite persisted history.
pub struct StatisticsService {
    clock: Clock,
    questions_per_game: u32,
    repo: Arc<dyn StatisticsRepository>,
    cache: Mutex<Cache>,
}

#[derive(Default)]
struct Cache {
    /// Set only after a successful read.
    record: Option<StatisticsRecord>,
    /// Games finished while the stored record could not be read.
    pending: Vec<GameResult>,
}

impl Cache {
    /// Current aggregates, with unsynced games applied over defaults.
    fn view(&self) -> StatisticsRecord {
        if let Some(record) = &self.record {
            return record.clone();
        }
        let mut record = StatisticsRecord::default();
        for game in &self.pending {
            record.record_game(game.correct(), game.total(), game.completed_at());
        }
        record
    }
}

impl StatisticsService {
    #[must_use]
    pub fn new(clock: Clock, questions_per_game: u32, repo: Arc<dyn StatisticsRepository>) -> Self {
        Self {
            clock,
            questions_per_game,
            repo,
            cache: Mutex::new(Cache::default()),
        }
    }

    #[must_use]
    pub fn questions_per_game(&self) -> u32 {
        self.questions_per_game
    }

    /// Load the stored record if it is not cached yet, replaying held-back games.
    async fn sync(&self, cache: &mut Cache) {
        if cache.record.is_some() {
            return;
        }
        let mut record = match self.repo.read().await {
            Ok(record) => record,
            Err(err) => {
                warn!(
                    error = %err,
                    pending = cache.pending.len(),
                    "failed to read statistics, holding games in memory"
                );
                return;
            }
        };
        debug!(games_played = record.games_played(), "statistics loaded");

        if !cache.pending.is_empty() {
            for game in cache.pending.drain(..) {
                record.record_game(game.correct(), game.total(), game.completed_at());
            }
            info!(games_played = record.games_played(), "replayed held-back games");
            self.persist(&record).await;
        }
        cache.record = Some(record);
    }

    async fn persist(&self, record: &StatisticsRecord) {
        if let Err(err) = self.repo.write(record).await {
            warn!(error = %err, "failed to persist statistics, keeping in-memory values");
        }
    }

    /// Record a finished game given its raw counts.
    ///
    /// # Errors
    ///
    /// Returns `StatisticsError::GameResult` if `correct > total`.
    pub async fn store(
        &self,
        correct: u32,
        total: u32,
    ) -> Result<StatisticsSummary, StatisticsError> {
        let result = GameResult::new(correct, total, self.clock.now())?;
        Ok(self.record(&result).await)
    }

    /// Record a finished game and return the recomputed aggregates.
    #[instrument(skip(self, result), fields(correct = result.correct(), total = result.total()))]
    pub async fn record(&self, result: &GameResult) -> StatisticsSummary {
        let mut guard = self.cache.lock().await;
        let cache = &mut *guard;
        self.sync(cache).await;
        let now = self.clock.now();

        let Some(record) = cache.record.as_mut() else {
            cache
                .pending
                .push(GameResult::unchecked(result.correct(), result.total(), now));
            return cache.view().summary(self.questions_per_game);
        };

        let update = record.record_game(result.correct(), result.total(), now);
        if let BestGameUpdate::Replaced { previous } = update {
            info!(
                previous = previous.correct(),
                best = record.best_game().correct(),
                "new best game"
            );
        }
        self.persist(record).await;
        record.summary(self.questions_per_game)
    }

    /// Total number of finished games.
    pub async fn games_played(&self) -> u32 {
        self.summary().await.games_played
    }

    pub async fn best_game(&self) -> GameResult {
        self.summary().await.best_game
    }

    /// See `StatisticsRecord::total_accuracy`.
    pub async fn total_accuracy(&self) -> f64 {
        self.summary().await.total_accuracy
    }

    pub async fn summary(&self) -> StatisticsSummary {
        let mut guard = self.cache.lock().await;
        self.sync(&mut guard).await;
        guard.view().summary(self.questions_per_game)
    }
}

impl std::fmt::Debug for StatisticsService {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("StatisticsService")
            .field("clock", &self.clock)
            .field("questions_per_game", &self.questions_per_game)
            .finish_non_exhaustive()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use async_trait::async_trait;
    use chrono::Duration;
    use quiz_core::time::{epoch, fixed_now};
    use std::sync::atomic::{AtomicU32, Ordering};
    use storage::repository::{InMemoryRepository, StorageError};

    struct BrokenRepository;

    #[async_trait]
    impl StatisticsRepository for BrokenRepository {
        async fn read(&self) -> Result<StatisticsRecord, StorageError> {
            Err(StorageError::Connection("offline".into()))
        }

        async fn write(&self, _record: &StatisticsRecord) -> Result<(), StorageError> {
            Err(StorageError::Connection("offline".into()))
        }
    }

    /// Fails the first `failing_reads` reads, then serves the wrapped repository.
    struct FlakyRepository {
        inner: InMemoryRepository,
        failing_reads: AtomicU32,
    }

    #[async_trait]
    impl StatisticsRepository for FlakyRepository {
        async fn read(&self) -> Result<StatisticsRecord, StorageError> {
            let remaining = self.failing_reads.load(Ordering::SeqCst);
            if remaining > 0 {
                self.failing_reads.store(remaining - 1, Ordering::SeqCst);
                return Err(StorageError::Connection("database is locked".into()));
            }
            self.inner.read().await
        }

        async fn write(&self, record: &StatisticsRecord) -> Result<(), StorageError> {
            self.inner.write(record).await
        }
    }

    fn service(repo: Arc<dyn StatisticsRepository>) -> StatisticsService {
        StatisticsService::new(Clock::fixed(fixed_now()), 10, repo)
    }

    #[tokio::test]
    async fn store_follows_best_game_rules() {
        let repo = InMemoryRepository::new();
        let stats = service(Arc::new(repo.clone()));

        let first = stats.store(7, 10).await.unwrap();
        assert_eq!(first.games_played, 1);
        assert_eq!(first.best_game.correct(), 7);
        assert_eq!(first.best_game.total(), 7);

        let second = stats.store(5, 10).await.unwrap();
        assert_eq!(second.games_played, 2);
        assert_eq!(second.best_game.correct(), 7);
        assert_eq!(second.best_game.total(), 7);

        let third = stats.store(9, 10).await.unwrap();
        assert_eq!(third.games_played, 3);
        assert_eq!(third.best_game.correct(), 9);
        assert_eq!(third.best_game.total(), 16);
        assert_eq!(third.best_game.completed_at(), fixed_now());

        let persisted = repo.read().await.unwrap();
        assert_eq!(persisted.games_played(), 3);
        assert_eq!(persisted.best_game().total(), 16);
    }

    #[tokio::test]
    async fn accuracy_is_zero_before_any_game() {
        let stats = service(Arc::new(InMemoryRepository::new()));
        assert_eq!(stats.total_accuracy().await, 0.0);
        assert_eq!(stats.games_played().await, 0);
        assert_eq!(stats.best_game().await.completed_at(), epoch());
    }

    #[tokio::test]
    async fn existing_record_is_loaded_lazily() {
        let best = GameResult::new(6, 6, fixed_now() - Duration::days(1)).unwrap();
        let repo = InMemoryRepository::with_record(StatisticsRecord::from_persisted(2, best, 20));
        let stats = service(Arc::new(repo));

        assert_eq!(stats.games_played().await, 2);
        let summary = stats.store(6, 10).await.unwrap();
        assert_eq!(summary.games_played, 3);
        assert_eq!(summary.best_game, best);
        // 6 / (3 * 10) * 100
        assert!((summary.total_accuracy - 20.0).abs() < 1e-9);
    }

    #[tokio::test]
    async fn storage_failures_keep_in_memory_values() {
        let stats = service(Arc::new(BrokenRepository));
        stats.store(4, 10).await.unwrap();
        let summary = stats.store(8, 10).await.unwrap();
        assert_eq!(summary.games_played, 2);
        assert_eq!(summary.best_game.correct(), 8);
        assert_eq!(summary.best_game.total(), 12);
    }

    #[tokio::test]
    async fn invalid_counts_are_rejected_without_counting() {
        let stats = service(Arc::new(InMemoryRepository::new()));
        let err = stats.store(11, 10).await.unwrap_err();
        assert!(matches!(err, StatisticsError::GameResult(_)));
        assert_eq!(stats.games_played().await, 0);
    }

    #[tokio::test]
    async fn failed_read_never_overwrites_stored_history() {
        let best = GameResult::unchecked(9, 40, fixed_now() - Duration::days(3));
        let inner =
            InMemoryRepository::with_record(StatisticsRecord::from_persisted(50, best, 500));
        let stats = service(Arc::new(FlakyRepository {
            inner: inner.clone(),
            failing_reads: AtomicU32::new(1),
        }));

        let summary = stats.store(3, 10).await.unwrap();
        assert_eq!(summary.games_played, 1);
        let untouched = inner.read().await.unwrap();
        assert_eq!(untouched.games_played(), 50);
        assert_eq!(untouched.best_game(), best);

        // The next access reads successfully and folds the held-back game in.
        assert_eq!(stats.games_played().await, 51);
        let persisted = inner.read().await.unwrap();
        assert_eq!(persisted.games_played(), 51);
        assert_eq!(persisted.best_game(), best);
        assert_eq!(persisted.total_answered(), 510);
    }

    #[tokio::test]
    async fn held_back_best_game_is_replayed() {
        let best = GameResult::new(2, 10, fixed_now() - Duration::days(1)).unwrap();
        let inner = InMemoryRepository::with_record(StatisticsRecord::from_persisted(4, best, 40));
        let stats = service(Arc::new(FlakyRepository {
            inner: inner.clone(),
            failing_reads: AtomicU32::new(1),
        }));

        stats.store(7, 10).await.unwrap();
        let summary = stats.store(1, 10).await.unwrap();
        assert_eq!(summary.games_played, 6);
        assert_eq!(summary.best_game.correct(), 7);
        // 2 + 7, accumulated onto the stored best
        assert_eq!(summary.best_game.total(), 9);
        assert_eq!(inner.read().await.unwrap().games_played(), 6);
    }
}
