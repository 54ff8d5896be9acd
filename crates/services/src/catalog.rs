use std::path::{Path, PathBuf};
use std::sync::{Arc, Mutex};

use async_trait::async_trait;
use quiz_core::model::Question;
use rand::rngs::StdRng;
use rand::seq::IndexedRandom;
use rand::SeedableRng;
use serde::{Deserialize, Serialize};
use tracing::{debug, info, instrument};

use crate::error::QuestionSourceError;
use crate::quiz::QuestionSource;

//
// ─── MOVIES ────────────────────────────────────────────────────────────────────
//

/// One entry of the movie catalog.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Movie {
    pub title: String,
    pub rating: f32,
    #[serde(default)]
    pub image: String,
}

impl Movie {
    #[must_use]
    pub fn new(title: impl Into<String>, rating: f32, image: impl Into<String>) -> Self {
        Self {
            title: title.into(),
            rating,
            image: image.into(),
        }
    }
}

/// Where the catalog comes from.
#[async_trait]
pub trait MovieLoader: Send + Sync {
    /// # Errors
    ///
    /// Returns `QuestionSourceError` if the movies cannot be loaded.
    async fn load_movies(&self) -> Result<Vec<Movie>, QuestionSourceError>;
}

/// Reads a JSON array of movies from disk.
#[derive(Debug, Clone)]
pub struct JsonFileMovieLoader {
    path: PathBuf,
}

impl JsonFileMovieLoader {
    #[must_use]
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }

    #[must_use]
    pub fn path(&self) -> &Path {
        &self.path
    }
}

#[async_trait]
impl MovieLoader for JsonFileMovieLoader {
    async fn load_movies(&self) -> Result<Vec<Movie>, QuestionSourceError> {
        let bytes = tokio::fs::read(&self.path).await?;
        let movies: Vec<Movie> = serde_json::from_slice(&bytes)?;
        debug!(path = %self.path.display(), count = movies.len(), "movie file read");
        Ok(movies)
    }
}

/// Serves a fixed list of movies.
#[derive(Debug, Clone, Default)]
pub struct StaticMovieLoader {
    movies: Vec<Movie>,
}

impl StaticMovieLoader {
    #[must_use]
    pub fn new(movies: Vec<Movie>) -> Self {
        Self { movies }
    }

    /// A small built-in catalog so the quiz runs without a movie file.
    #[must_use]
    pub fn demo() -> Self {
        Self::new(vec![
            Movie::new("The Godfather", 9.2, "the_godfather.jpg"),
            Movie::new("The Dark Knight", 9.0, "the_dark_knight.jpg"),
            Movie::new("Kill Bill", 8.2, "kill_bill.jpg"),
            Movie::new("The Avengers", 8.0, "the_avengers.jpg"),
            Movie::new("Deadpool", 8.0, "deadpool.jpg"),
            Movie::new("The Green Knight", 6.6, "the_green_knight.jpg"),
            Movie::new("Old", 5.8, "old.jpg"),
            Movie::new("The Ice Age Adventures of Buck Wild", 4.3, "ice_age.jpg"),
            Movie::new("Tesla", 5.1, "tesla.jpg"),
            Movie::new("Vivarium", 5.8, "vivarium.jpg"),
        ])
    }
}

#[async_trait]
impl MovieLoader for StaticMovieLoader {
    async fn load_movies(&self) -> Result<Vec<Movie>, QuestionSourceError> {
        Ok(self.movies.clone())
    }
}

//
// ─── QUESTION SOURCE ───────────────────────────────────────────────────────────
//

/// Turns a movie catalog into "rated higher than N?" questions.
///
/// Each question picks a random movie; the answer is `rating > threshold`.
pub struct CatalogQuestionSource {
    loader: Arc<dyn MovieLoader>,
    threshold: f32,
    movies: Mutex<Vec<Movie>>,
    rng: Mutex<StdRng>,
}

impl CatalogQuestionSource {
    #[must_use]
    pub fn new(loader: Arc<dyn MovieLoader>, threshold: f32) -> Self {
        Self {
            loader,
            threshold,
            movies: Mutex::new(Vec::new()),
            rng: Mutex::new(StdRng::from_os_rng()),
        }
    }

    /// Use a seeded RNG so the question order is reproducible.
    #[must_use]
    pub fn with_seed(mut self, seed: u64) -> Self {
        self.rng = Mutex::new(StdRng::seed_from_u64(seed));
        self
    }

    #[must_use]
    pub fn threshold(&self) -> f32 {
        self.threshold
    }

    fn question_for(&self, movie: &Movie) -> Result<Question, QuestionSourceError> {
        let text = format!("Is this movie rated higher than {}?", self.threshold);
        Question::new(movie.image.clone(), text, movie.rating > self.threshold)
            .map_err(|e| QuestionSourceError::Unavailable(e.to_string()))
    }
}

#[async_trait]
impl QuestionSource for CatalogQuestionSource {
    #[instrument(skip(self))]
    async fn load_data(&self) -> Result<(), QuestionSourceError> {
        let movies = self.loader.load_movies().await?;
        if movies.is_empty() {
            return Err(QuestionSourceError::EmptyCatalog);
        }
        info!(count = movies.len(), "movie catalog loaded");

        let mut guard = self
            .movies
            .lock()
            .map_err(|e| QuestionSourceError::Unavailable(e.to_string()))?;
        *guard = movies;
        Ok(())
    }

    async fn request_next_question(&self) -> Result<Option<Question>, QuestionSourceError> {
        let movie = {
            let movies = self
                .movies
                .lock()
                .map_err(|e| QuestionSourceError::Unavailable(e.to_string()))?;
            let mut rng = self
                .rng
                .lock()
                .map_err(|e| QuestionSourceError::Unavailable(e.to_string()))?;
            movies.choose(&mut *rng).cloned()
        };

        movie.map(|movie| self.question_for(&movie)).transpose()
    }
}

impl std::fmt::Debug for CatalogQuestionSource {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("CatalogQuestionSource")
            .field("threshold", &self.threshold)
            .finish_non_exhaustive()
    }
}
