use chrono::Duration;
use quiz_core::model::{GameResult, StatisticsRecord};
use quiz_core::time::{epoch, fixed_now};
use storage::repository::{StatisticsRepository, Storage};
use storage::sqlite::SqliteRepository;

#[tokio::test]
async fn fresh_database_reads_default_record() {
    let repo = SqliteRepository::connect("sqlite:file:memdb_fresh?mode=memory&cache=shared")
        .await
        .expect("connect");
    repo.migrate().await.expect("migrate");

    let record = repo.read().await.expect("read");
    assert_eq!(record.games_played(), 0);
    assert_eq!(record.best_game().correct(), 0);
    assert_eq!(record.best_game().total(), 0);
    assert_eq!(record.best_game().completed_at(), epoch());
    assert_eq!(record.total_answered(), 0);
}

#[tokio::test]
async fn sqlite_roundtrip_persists_every_entry() {
    let repo = SqliteRepository::connect("sqlite:file:memdb_roundtrip?mode=memory&cache=shared")
        .await
        .expect("connect");
    repo.migrate().await.expect("migrate");

    let best = GameResult::new(9, 16, fixed_now()).unwrap();
    let record = StatisticsRecord::from_persisted(3, best, 30);
    repo.write(&record).await.expect("write");

    let fetched = repo.read().await.expect("read");
    assert_eq!(fetched, record);

    // overwrite keeps a single row per key
    let later = GameResult::new(10, 26, fixed_now() + Duration::hours(1)).unwrap();
    let updated = StatisticsRecord::from_persisted(4, later, 40);
    repo.write(&updated).await.expect("write");
    assert_eq!(repo.read().await.expect("read"), updated);

    let count: i64 = sqlx::query_scalar("SELECT COUNT(*) FROM statistics")
        .fetch_one(repo.pool())
        .await
        .unwrap();
    assert_eq!(count, 5);
}

#[tokio::test]
async fn partial_entries_fall_back_to_defaults() {
    let repo = SqliteRepository::connect("sqlite:file:memdb_partial?mode=memory&cache=shared")
        .await
        .expect("connect");
    repo.migrate().await.expect("migrate");

    sqlx::query("INSERT INTO statistics (key, value) VALUES ('games_played', '5')")
        .execute(repo.pool())
        .await
        .unwrap();

    let record = repo.read().await.expect("read");
    assert_eq!(record.games_played(), 5);
    assert_eq!(record.best_game(), GameResult::empty());
}

#[tokio::test]
async fn best_correct_without_total_is_still_readable() {
    let repo = SqliteRepository::connect("sqlite:file:memdb_half_best?mode=memory&cache=shared")
        .await
        .expect("connect");
    repo.migrate().await.expect("migrate");

    sqlx::query(
        "INSERT INTO statistics (key, value) \
         VALUES ('games_played', '12'), ('best_game_correct', '5')",
    )
    .execute(repo.pool())
    .await
    .unwrap();

    let record = repo.read().await.expect("read");
    assert_eq!(record.games_played(), 12);
    assert_eq!(record.best_game().correct(), 5);
    assert_eq!(record.best_game().total(), 0);
    assert_eq!(record.best_game().completed_at(), epoch());
}

#[tokio::test]
async fn migrations_are_idempotent() {
    let repo = SqliteRepository::connect("sqlite:file:memdb_migrate?mode=memory&cache=shared")
        .await
        .expect("connect");
    repo.migrate().await.expect("first migrate");
    repo.migrate().await.expect("second migrate");

    let versions: i64 = sqlx::query_scalar("SELECT COUNT(*) FROM schema_migrations")
        .fetch_one(repo.pool())
        .await
        .unwrap();
    assert_eq!(versions, 1);
}

#[tokio::test]
async fn storage_facade_uses_sqlite_backend() {
    let storage = Storage::sqlite("sqlite:file:memdb_facade?mode=memory&cache=shared")
        .await
        .expect("storage");
    let best = GameResult::new(7, 7, fixed_now()).unwrap();
    storage
        .statistics
        .write(&StatisticsRecord::from_persisted(1, best, 10))
        .await
        .unwrap();
    assert_eq!(storage.statistics.read().await.unwrap().games_played(), 1);
}
