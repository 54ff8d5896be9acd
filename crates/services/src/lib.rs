#![forbid(unsafe_code)]

pub mod app_services;
pub mod catalog;
pub mod error;
pub mod quiz;
pub mod statistics_service;

pub use quiz_core::Clock;

pub use app_services::QuizServices;
pub use catalog::{
    CatalogQuestionSource, JsonFileMovieLoader, Movie, MovieLoader, StaticMovieLoader,
};
pub use error::{QuestionSourceError, QuizServicesError, RuntimeError, StatisticsError};
pub use quiz::{
    Alert, ChannelView, QuestionSource, QuizHandle, QuizPhase, QuizRuntime, QuizStateMachine,
    QuizUpdate, QuizView, ResultsReport,
};
pub use statistics_service::StatisticsService;
