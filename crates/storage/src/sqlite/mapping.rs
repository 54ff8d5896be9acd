use std::collections::HashMap;

use chrono::{DateTime, Utc};
use quiz_core::model::{GameResult, StatisticsRecord};
use quiz_core::time::epoch;

use crate::repository::StorageError;

pub(crate) const GAMES_PLAYED: &str = "games_played";
pub(crate) const BEST_GAME_CORRECT: &str = "best_game_correct";
pub(crate) const BEST_GAME_TOTAL: &str = "best_game_total";
pub(crate) const BEST_GAME_DATE: &str = "best_game_date";
pub(crate) const TOTAL_ANSWERED: &str = "total_answered";

fn parse_u32(entries: &HashMap<String, String>, key: &'static str) -> Result<u32, StorageError> {
    entries.get(key).map_or(Ok(0), |raw| {
        raw.trim()
            .parse::<u32>()
            .map_err(|_| StorageError::Serialization(format!("invalid {key}: {raw}")))
    })
}

fn parse_u64(entries: &HashMap<String, String>, key: &'static str) -> Result<u64, StorageError> {
    entries.get(key).map_or(Ok(0), |raw| {
        raw.trim()
            .parse::<u64>()
            .map_err(|_| StorageError::Serialization(format!("invalid {key}: {raw}")))
    })
}

fn parse_date(
    entries: &HashMap<String, String>,
    key: &'static str,
) -> Result<DateTime<Utc>, StorageError> {
    entries.get(key).map_or(Ok(epoch()), |raw| {
        DateTime::parse_from_rfc3339(raw.trim())
            .map(|dt| dt.with_timezone(&Utc))
            .map_err(|_| StorageError::Serialization(format!("invalid {key}: {raw}")))
    })
}

/// Rebuild a record from raw key/value rows. Absent keys default to zero/epoch.
pub(crate) fn record_from_entries(
    entries: &HashMap<String, String>,
) -> Result<StatisticsRecord, StorageError> {
    let games_played = parse_u32(entries, GAMES_PLAYED)?;
    let best_correct = parse_u32(entries, BEST_GAME_CORRECT)?;
    let best_total = parse_u32(entries, BEST_GAME_TOTAL)?;
    let best_date = parse_date(entries, BEST_GAME_DATE)?;
    let total_answered = parse_u64(entries, TOTAL_ANSWERED)?;

    // A partially written row set can leave `correct` without its total.
    let best_game = GameResult::unchecked(best_correct, best_total, best_date);
    Ok(StatisticsRecord::from_persisted(
        games_played,
        best_game,
        total_answered,
    ))
}

/// Flatten a record into the key/value rows it is stored as.
pub(crate) fn entries_from_record(record: &StatisticsRecord) -> [(&'static str, String); 5] {
    let best = record.best_game();
    [
        (GAMES_PLAYED, record.games_played().to_string()),
        (BEST_GAME_CORRECT, best.correct().to_string()),
        (BEST_GAME_TOTAL, best.total().to_string()),
        (BEST_GAME_DATE, best.completed_at().to_rfc3339()),
        (TOTAL_ANSWERED, record.total_answered().to_string()),
    ]
}

#[cfg(test)]
mod tests {
    use super::*;
    use quiz_core::time::fixed_now;

    #[test]
    fn missing_keys_default_to_zero_and_epoch() {
        let record = record_from_entries(&HashMap::new()).unwrap();
        assert_eq!(record, StatisticsRecord::default());
    }

    #[test]
    fn entries_rebuild_the_same_record() {
        let best = GameResult::new(9, 16, fixed_now()).unwrap();
        let record = StatisticsRecord::from_persisted(3, best, 30);
        let entries: HashMap<String, String> = entries_from_record(&record)
            .into_iter()
            .map(|(k, v)| (k.to_owned(), v))
            .collect();
        assert_eq!(record_from_entries(&entries).unwrap(), record);
    }

    #[test]
    fn best_correct_without_total_still_reads() {
        let mut entries = HashMap::new();
        entries.insert(GAMES_PLAYED.to_owned(), "12".to_owned());
        entries.insert(BEST_GAME_CORRECT.to_owned(), "5".to_owned());
        let record = record_from_entries(&entries).unwrap();
        assert_eq!(record.games_played(), 12);
        assert_eq!(record.best_game().correct(), 5);
        assert_eq!(record.best_game().total(), 0);
        assert_eq!(record.best_game().completed_at(), epoch());
    }

    #[test]
    fn malformed_counter_is_a_serialization_error() {
        let mut entries = HashMap::new();
        entries.insert(GAMES_PLAYED.to_owned(), "-1".to_owned());
        let err = record_from_entries(&entries).unwrap_err();
        assert!(matches!(err, StorageError::Serialization(_)));
    }
}
