//! TMDB v3 REST client.
//!
//! One movie costs three requests (details, credits, videos), issued
//! concurrently. Only the details request is essential: credits and videos
//! failures just leave cast, director and trailer at their defaults.

use std::time::Duration;

use async_trait::async_trait;
use data_loader::MovieId;
use reqwest::Client;
use serde::de::DeserializeOwned;
use tracing::{debug, instrument, warn};

use crate::error::{MetadataError, Result};
use crate::source::{MetadataSource, DEFAULT_SITE_BASE};
use crate::types::*;

pub const DEFAULT_API_BASE: &str = "https://api.themoviedb.org/3";
pub const DEFAULT_IMAGE_BASE: &str = "https://image.tmdb.org/t/p/w500";
pub const DEFAULT_LANGUAGE: &str = "en-US";
pub const DEFAULT_TIMEOUT: Duration = Duration::from_secs(6);
const YOUTUBE_WATCH: &str = "https://www.youtube.com/watch?v=";
const MAX_CAST: usize = 3;

/// Connection settings for the TMDB API
#[derive(Debug, Clone)]
pub struct TmdbConfig {
    pub api_key: String,
    pub api_base: String,
    pub image_base: String,
    pub site_base: String,
    pub language: String,
    pub timeout: Duration,
}

impl TmdbConfig {
    /// Production endpoints with the given API key
    pub fn new(api_key: impl Into<String>) -> Self {
        Self {
            api_key: api_key.into(),
            api_base: DEFAULT_API_BASE.to_string(),
            image_base: DEFAULT_IMAGE_BASE.to_string(),
            site_base: DEFAULT_SITE_BASE.to_string(),
            language: DEFAULT_LANGUAGE.to_string(),
            timeout: DEFAULT_TIMEOUT,
        }
    }

    pub fn with_api_key(mut self, api_key: impl Into<String>) -> Self {
        self.api_key = api_key.into();
        self
    }

    pub fn with_api_base(mut self, base: impl Into<String>) -> Self {
        self.api_base = base.into();
        self
    }

    pub fn with_image_base(mut self, base: impl Into<String>) -> Self {
        self.image_base = base.into();
        self
    }

    pub fn with_site_base(mut self, base: impl Into<String>) -> Self {
        self.site_base = base.into();
        self
    }

    pub fn with_timeout(mut self, timeout: Duration) -> Self {
        self.timeout = timeout;
        self
    }
}

impl Default for TmdbConfig {
    fn default() -> Self {
        Self::new(String::new())
    }
}

/// Client for the TMDB movie endpoints.
#[derive(Debug, Clone)]
pub struct TmdbClient {
    http: Client,
    config: TmdbConfig,
}

impl TmdbClient {
    pub fn new(config: TmdbConfig) -> Result<Self> {
        let http = Client::builder()
            .timeout(config.timeout)
            .build()
            .map_err(|e| MetadataError::ClientBuild(e.to_string()))?;

        debug!("TMDB client targeting {}", config.api_base);
        Ok(Self { http, config })
    }

    /// Fetch and assemble the display record for one movie.
    ///
    /// Fails only when the details request itself fails.
    #[instrument(skip(self))]
    pub async fn fetch_details(&self, id: MovieId) -> Result<MovieDetails> {
        let details_path = format!("/movie/{id}");
        let credits_path = format!("/movie/{id}/credits");
        let videos_path = format!("/movie/{id}/videos");

        let (movie, credits, videos) = tokio::join!(
            self.get_json::<TmdbMovie>(&details_path),
            self.get_json::<TmdbCredits>(&credits_path),
            self.get_json::<TmdbVideos>(&videos_path),
        );

        let movie = movie?;
        let credits = credits.unwrap_or_else(|e| {
            warn!("Credits unavailable for movie {}: {}", id, e);
            TmdbCredits::default()
        });
        let videos = videos.unwrap_or_else(|e| {
            warn!("Videos unavailable for movie {}: {}", id, e);
            TmdbVideos::default()
        });

        Ok(self.assemble(id, movie, credits, videos))
    }

    /// GET `{api_base}{path}` and decode the JSON body.
    ///
    /// The API key travels as a query parameter and is kept out of every
    /// error message.
    async fn get_json<T: DeserializeOwned>(&self, path: &str) -> Result<T> {
        let url = format!("{}{}", self.config.api_base, path);

        let response = self
            .http
            .get(&url)
            .query(&[
                ("api_key", self.config.api_key.as_str()),
                ("language", self.config.language.as_str()),
            ])
            .send()
            .await
            .map_err(|e| MetadataError::RequestFailed {
                url: url.clone(),
                reason: e.without_url().to_string(),
            })?;

        let status = response.status();
        if !status.is_success() {
            return Err(MetadataError::Status {
                url,
                status: status.as_u16(),
            });
        }

        response
            .json::<T>()
            .await
            .map_err(|e| MetadataError::InvalidResponse {
                url,
                reason: e.without_url().to_string(),
            })
    }

    fn tmdb_page(&self, id: MovieId) -> String {
        format!("{}/{}", self.config.site_base, id)
    }

    /// Combine the three responses into a display record
    pub(crate) fn assemble(
        &self,
        id: MovieId,
        movie: TmdbMovie,
        credits: TmdbCredits,
        videos: TmdbVideos,
    ) -> MovieDetails {
        let poster = movie
            .poster_path
            .filter(|p| !p.is_empty())
            .map(|p| format!("{}{}", self.config.image_base, p))
            .unwrap_or_else(|| PLACEHOLDER_POSTER.to_string());

        let trailer = videos
            .results
            .into_iter()
            .find(|v| v.site.as_deref() == Some("YouTube") && v.kind.as_deref() == Some("Trailer"))
            .and_then(|v| v.key)
            .map(|key| format!("{YOUTUBE_WATCH}{key}"));

        let director = credits
            .crew
            .iter()
            .find(|c| c.job.as_deref() == Some("Director"))
            .map(|c| c.name.clone())
            .unwrap_or_else(|| UNKNOWN_DIRECTOR.to_string());

        let tmdb = trailer.clone().unwrap_or_else(|| self.tmdb_page(id));

        MovieDetails {
            id,
            title: movie.title.unwrap_or_else(|| UNKNOWN_TITLE.to_string()),
            poster,
            overview: movie
                .overview
                .filter(|o| !o.trim().is_empty())
                .unwrap_or_else(|| NO_OVERVIEW.to_string()),
            rating: movie.vote_average,
            year: movie.release_date.as_deref().and_then(year_from_release_date),
            genres: movie.genres.into_iter().map(|g| g.name).collect(),
            language: movie
                .original_language
                .filter(|l| !l.is_empty())
                .map(|l| l.to_uppercase())
                .unwrap_or_else(|| NOT_AVAILABLE.to_string()),
            cast: credits
                .cast
                .into_iter()
                .take(MAX_CAST)
                .map(|c| c.name)
                .collect(),
            director,
            trailer,
            tmdb,
        }
    }
}

#[async_trait]
impl MetadataSource for TmdbClient {
    async fn try_movie_details(&self, id: MovieId) -> Result<MovieDetails> {
        self.fetch_details(id).await
    }

    fn placeholder(&self, id: MovieId) -> MovieDetails {
        MovieDetails::placeholder(id, self.tmdb_page(id))
    }
}
