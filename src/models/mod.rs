use serde::{Deserialize, Serialize};
use std::collections::HashMap;
use std::fmt::Display;
use std::str::FromStr;

/// Media kind for a catalog item
///
/// TMDB splits its catalog into movies and TV series, with slightly different
/// endpoint paths and field names for each. Everything downstream of the
/// ingestion adapters works with this normalized kind.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum MediaKind {
    Movie,
    Series,
}

impl MediaKind {
    /// TMDB path segment for this kind ("tv", not "series", on the wire)
    pub fn tmdb_path(&self) -> &'static str {
        match self {
            MediaKind::Movie => "movie",
            MediaKind::Series => "tv",
        }
    }
}

impl Display for MediaKind {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            MediaKind::Movie => write!(f, "movie"),
            MediaKind::Series => write!(f, "series"),
        }
    }
}

impl FromStr for MediaKind {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "movie" => Ok(MediaKind::Movie),
            "series" | "tv" => Ok(MediaKind::Series),
            other => Err(format!("unknown media kind '{}'", other)),
        }
    }
}

/// A movie or TV show as this service sees it
///
/// Normalized from the TMDB wire types immediately after fetch; identifiers
/// are always numeric `u64` so self-exclusion during ranking never has to
/// compare ids of mixed string/number origin. Immutable once ingested.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct CatalogItem {
    pub id: u64,
    pub kind: MediaKind,
    pub title: String,
    #[serde(default)]
    pub overview: String,
    /// Resolved genre names; may be empty when the source listing only
    /// carried numeric genre ids and no genre map was available
    #[serde(default)]
    pub genres: Vec<String>,
    /// Raw TMDB genre ids, kept for discovery queries
    #[serde(default)]
    pub genre_ids: Vec<u64>,
    #[serde(default)]
    pub keywords: Vec<String>,
    #[serde(default)]
    pub popularity: f64,
    #[serde(default)]
    pub vote_average: f64,
    pub release_date: Option<String>,
    pub poster_path: Option<String>,
}

/// A candidate item paired with its cosine similarity to the target
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct ScoredItem {
    pub item: CatalogItem,
    pub score: f64,
}

/// Result list served to clients and round-tripped through the cache
///
/// Scored entries come out of the full pipeline; plain items come out of the
/// passthrough and fallback paths. Untagged so cached JSON deserializes back
/// into exactly the shape that was stored.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(untagged)]
pub enum SimilarList {
    Scored(Vec<ScoredItem>),
    Plain(Vec<CatalogItem>),
}

impl SimilarList {
    pub fn len(&self) -> usize {
        match self {
            SimilarList::Scored(v) => v.len(),
            SimilarList::Plain(v) => v.len(),
        }
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}

/// Durable position into the paginated popular listing for the batch job
///
/// Persisted under its own cache key with no expiry and passed explicitly
/// into the batch step; the caller persists the advanced cursor.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct Cursor {
    pub page: u32,
    pub index: usize,
}

impl Default for Cursor {
    fn default() -> Self {
        Self { page: 1, index: 0 }
    }
}

// ============================================================================
// TMDB API Types
// ============================================================================

/// Paginated listing wrapper (`/discover`, `/similar`, `/trending`, ...)
#[derive(Debug, Deserialize)]
pub struct TmdbPage {
    #[serde(default)]
    pub results: Vec<TmdbListItem>,
}

/// One entry of a TMDB listing response
///
/// Movies carry `title`/`release_date`, series carry `name`/`first_air_date`;
/// both shapes deserialize here and are normalized in [`TmdbListItem::into_item`].
#[derive(Debug, Clone, Deserialize)]
pub struct TmdbListItem {
    pub id: u64,
    #[serde(default)]
    pub title: Option<String>,
    #[serde(default)]
    pub name: Option<String>,
    #[serde(default)]
    pub overview: Option<String>,
    #[serde(default)]
    pub genre_ids: Vec<u64>,
    #[serde(default)]
    pub media_type: Option<String>,
    #[serde(default)]
    pub release_date: Option<String>,
    #[serde(default)]
    pub first_air_date: Option<String>,
    #[serde(default)]
    pub poster_path: Option<String>,
    #[serde(default)]
    pub popularity: f64,
    #[serde(default)]
    pub vote_average: f64,
}

impl TmdbListItem {
    /// Normalizes a listing entry into a [`CatalogItem`]
    ///
    /// The kind comes from the entry's own `media_type` when present (trending
    /// responses mix kinds), falling back to the presence of `first_air_date`,
    /// then to the kind of the listing that was queried. Genre names are
    /// resolved through `genre_map` when the caller has one.
    pub fn into_item(
        self,
        listing_kind: MediaKind,
        genre_map: Option<&HashMap<u64, String>>,
    ) -> CatalogItem {
        let kind = match self.media_type.as_deref() {
            Some("movie") => MediaKind::Movie,
            Some("tv") => MediaKind::Series,
            _ if self.first_air_date.is_some() => MediaKind::Series,
            _ => listing_kind,
        };

        let genres = genre_map
            .map(|map| {
                self.genre_ids
                    .iter()
                    .filter_map(|id| map.get(id).cloned())
                    .collect()
            })
            .unwrap_or_default();

        CatalogItem {
            id: self.id,
            kind,
            title: self.title.or(self.name).unwrap_or_default(),
            overview: self.overview.unwrap_or_default(),
            genres,
            genre_ids: self.genre_ids,
            keywords: Vec::new(),
            popularity: self.popularity,
            vote_average: self.vote_average,
            release_date: self.release_date.or(self.first_air_date),
            poster_path: self.poster_path,
        }
    }
}

/// Detail response (`/movie/{id}`, `/tv/{id}`) with full genre objects
#[derive(Debug, Deserialize)]
pub struct TmdbDetails {
    pub id: u64,
    #[serde(default)]
    pub title: Option<String>,
    #[serde(default)]
    pub name: Option<String>,
    #[serde(default)]
    pub overview: Option<String>,
    #[serde(default)]
    pub genres: Vec<TmdbGenre>,
    #[serde(default)]
    pub release_date: Option<String>,
    #[serde(default)]
    pub first_air_date: Option<String>,
    #[serde(default)]
    pub poster_path: Option<String>,
    #[serde(default)]
    pub popularity: f64,
    #[serde(default)]
    pub vote_average: f64,
}

impl TmdbDetails {
    /// Normalizes a detail response, attaching the separately fetched keywords
    pub fn into_item(self, kind: MediaKind, keywords: Vec<String>) -> CatalogItem {
        let genre_ids = self.genres.iter().map(|g| g.id).collect();
        let genres = self.genres.into_iter().map(|g| g.name).collect();

        CatalogItem {
            id: self.id,
            kind,
            title: self.title.or(self.name).unwrap_or_default(),
            overview: self.overview.unwrap_or_default(),
            genres,
            genre_ids,
            keywords,
            popularity: self.popularity,
            vote_average: self.vote_average,
            release_date: self.release_date.or(self.first_air_date),
            poster_path: self.poster_path,
        }
    }
}

#[derive(Debug, Clone, Deserialize)]
pub struct TmdbGenre {
    pub id: u64,
    pub name: String,
}

/// Genre id → name listing (`/genre/{kind}/list`)
#[derive(Debug, Deserialize)]
pub struct TmdbGenreList {
    #[serde(default)]
    pub genres: Vec<TmdbGenre>,
}

#[derive(Debug, Clone, Deserialize)]
pub struct TmdbKeyword {
    pub name: String,
}

/// Keywords response, whose shape differs by kind
///
/// The movie endpoint returns `{"keywords": [...]}` while the TV endpoint
/// returns `{"results": [...]}`. This is the only place that branches on it.
#[derive(Debug, Deserialize)]
pub struct TmdbKeywordsResponse {
    #[serde(default)]
    pub keywords: Option<Vec<TmdbKeyword>>,
    #[serde(default)]
    pub results: Option<Vec<TmdbKeyword>>,
}

impl TmdbKeywordsResponse {
    pub fn into_names(self) -> Vec<String> {
        self.keywords
            .or(self.results)
            .unwrap_or_default()
            .into_iter()
            .map(|k| k.name)
            .collect()
    }
}
