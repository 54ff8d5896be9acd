use std::sync::Arc;

use quiz_core::model::QuizSettings;
use storage::repository::Storage;

use crate::Clock;
use crate::catalog::{CatalogQuestionSource, MovieLoader};
use crate::error::QuizServicesError;
use crate::quiz::{QuestionSource, QuizRuntime, QuizStateMachine, QuizView};
use crate::statistics_service::StatisticsService;

/// Assembles the quiz collaborators around one storage backend.
#[derive(Clone)]
pub struct QuizServices {
    clock: Clock,
    settings: QuizSettings,
    statistics: Arc<StatisticsService>,
    source: Arc<dyn QuestionSource>,
}

impl QuizServices {
    /// Build services backed by `SQLite` storage and a movie catalog.
    ///
    /// # Errors
    ///
    /// Returns `QuizServicesError` if storage initialization fails.
    pub async fn new_sqlite(
        db_url: &str,
        clock: Clock,
        settings: QuizSettings,
        movies: Arc<dyn MovieLoader>,
    ) -> Result<Self, QuizServicesError> {
        let storage = Storage::sqlite(db_url).await?;
        Ok(Self::with_catalog(&storage, clock, settings, movies))
    }

    /// Build services that keep statistics in memory only.
    #[must_use]
    pub fn in_memory(clock: Clock, settings: QuizSettings, movies: Arc<dyn MovieLoader>) -> Self {
        Self::with_catalog(&Storage::in_memory(), clock, settings, movies)
    }

    fn with_catalog(
        storage: &Storage,
        clock: Clock,
        settings: QuizSettings,
        movies: Arc<dyn MovieLoader>,
    ) -> Self {
        let source: Arc<dyn QuestionSource> = Arc::new(CatalogQuestionSource::new(
            movies,
            settings.rating_threshold(),
        ));
        Self::from_parts(storage, clock, settings, source)
    }

    /// Wire services from an existing storage and any question source.
    #[must_use]
    pub fn from_parts(
        storage: &Storage,
        clock: Clock,
        settings: QuizSettings,
        source: Arc<dyn QuestionSource>,
    ) -> Self {
        let statistics = Arc::new(StatisticsService::new(
            clock,
            settings.questions_amount(),
            Arc::clone(&storage.statistics),
        ));
        Self {
            clock,
            settings,
            statistics,
            source,
        }
    }

    #[must_use]
    pub fn settings(&self) -> &QuizSettings {
        &self.settings
    }

    #[must_use]
    pub fn statistics(&self) -> Arc<StatisticsService> {
        Arc::clone(&self.statistics)
    }

    #[must_use]
    pub fn question_source(&self) -> Arc<dyn QuestionSource> {
        Arc::clone(&self.source)
    }

    /// Spawn a quiz runtime that reports to `view`. Call `start` on its handle to begin.
    #[must_use]
    pub fn spawn_quiz(&self, view: Arc<dyn QuizView>) -> QuizRuntime {
        let machine = QuizStateMachine::new(self.settings.clone(), self.clock);
        QuizRuntime::spawn(
            machine,
            Arc::clone(&self.source),
            Arc::clone(&self.statistics),
            view,
        )
    }
}
