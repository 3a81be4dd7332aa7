// src/app/types.rs
use serde::{Deserialize, Serialize};

/// Subtitle languages the catalog knows about. The subtitle field is always
/// replaced wholesale with a subset of this list.
pub const SUB_LANGUAGES: [&str; 5] = ["English", "Vietnamese", "Chinese", "Japanese", "Korean"];

/// Quality grades a quality entry can carry.
pub const QUALITY_GRADES: [&str; 5] = ["CAM", "HD", "FULL HD", "2K", "4K"];

// ---- wire records ----
//
// Movie payloads use the backend's Go-style field names; episode and quality
// payloads come out of aggregation pipelines with bson-style keys. The serde
// renames below mirror exactly what the server emits.

#[derive(Clone, Debug, Default, Deserialize)]
pub struct Movie {
    #[serde(rename = "ID", default)]
    pub id: String,
    #[serde(rename = "Title", default)]
    pub title: String,
    #[serde(rename = "NameEng", default)]
    pub name_eng: String,
    #[serde(rename = "Description", default)]
    pub description: String,
    #[serde(rename = "Slug", default)]
    pub slug: String,
    #[serde(rename = "Duration", default)]
    pub duration: String,
    #[serde(rename = "Trailer", default)]
    pub trailer: String,
    #[serde(rename = "Image", default)]
    pub image: String,
    #[serde(rename = "Moreimage", default)]
    pub more_images: Vec<String>,
    #[serde(rename = "Status", default)]
    pub status: i64,
    #[serde(rename = "Hotmovie", default)]
    pub hotmovie: i64,
    #[serde(rename = "MaxQuality", default)]
    pub max_quality: i64,
    #[serde(rename = "Year", default)]
    pub year: i64,
    #[serde(rename = "Numofep", default)]
    pub numofep: i64,
    #[serde(rename = "Season", default)]
    pub season: i64,
    #[serde(rename = "Sub", default)]
    pub sub: Vec<String>,
    #[serde(rename = "Views", default)]
    pub views: i64,
    #[serde(rename = "Position", default)]
    pub position: i64,
    #[serde(rename = "CategoryDetails", default)]
    pub category_details: Vec<NamedRef>,
    #[serde(rename = "GenreDetails", default)]
    pub genre_details: Vec<NamedRef>,
}

/// Joined lookup detail (category, genre); only the title is displayed.
#[derive(Clone, Debug, Default, Deserialize)]
pub struct NamedRef {
    #[serde(rename = "Title", default)]
    pub title: String,
}

#[derive(Clone, Debug, Default, Deserialize)]
pub struct Episode {
    #[serde(rename = "_id", default)]
    pub id: String,
    #[serde(rename = "movieid", default)]
    pub movie_id: String,
    #[serde(default)]
    pub number: i64,
    #[serde(default)]
    pub image: String,
    #[serde(default)]
    pub status: i64,
    #[serde(default)]
    pub server: Vec<String>,
    #[serde(default)]
    pub server_details: Vec<ServerRef>,
}

#[derive(Clone, Debug, Default, Deserialize)]
pub struct ServerRef {
    #[serde(rename = "_id", default)]
    pub id: String,
    #[serde(default)]
    pub title: String,
}

#[derive(Clone, Debug, Default, Deserialize)]
pub struct Quality {
    #[serde(rename = "_id", default)]
    pub id: String,
    #[serde(default)]
    pub movie_id: String,
    #[serde(default)]
    pub episode_id: String,
    #[serde(default)]
    pub server_id: String,
    #[serde(default)]
    pub title: String,
    #[serde(default)]
    pub description: String,
    #[serde(default)]
    pub status: i64,
    #[serde(default)]
    pub videourl: String,
}

/// One entry of the reorder payload. N rows always submit exactly N of
/// these, positions dense 1..=N in display order.
#[derive(Clone, Debug, Serialize, PartialEq, Eq)]
pub struct PositionEntry {
    #[serde(rename = "ID")]
    pub id: String,
    #[serde(rename = "Position")]
    pub position: i64,
}

// ---- editable fields ----

/// Every inline-editable field, across both record kinds that expose a
/// field-update endpoint. Movie and quality variants can share a wire name
/// (`title`, `status`) while differing in control and coercion.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum Field {
    Title,
    Description,
    Duration,
    Slug,
    Status,
    MaxQuality,
    Hotmovie,
    Year,
    Numofep,
    Season,
    Sub,
    QualityTitle,
    QualityDescription,
    QualityStatus,
    QualityVideoUrl,
}

impl Field {
    /// Field name as transmitted in the request body.
    pub const fn wire_name(self) -> &'static str {
        match self {
            Self::Title | Self::QualityTitle => "title",
            Self::Description | Self::QualityDescription => "description",
            Self::Duration => "duration",
            Self::Slug => "slug",
            Self::Status | Self::QualityStatus => "status",
            Self::MaxQuality => "maxquality",
            Self::Hotmovie => "hotmovie",
            Self::Year => "year",
            Self::Numofep => "numofep",
            Self::Season => "season",
            Self::Sub => "sub",
            Self::QualityVideoUrl => "videourl",
        }
    }

    /// Movie select fields are transmitted as JSON integers; the quality
    /// endpoint takes its select values as strings (matching the server's
    /// handler, which only special-cases the subtitle array).
    pub const fn coerces_numeric(self) -> bool {
        matches!(
            self,
            Self::Status | Self::MaxQuality | Self::Hotmovie | Self::Year | Self::Numofep | Self::Season
        )
    }
}

/// Full addressing key for a field update. Partial keys are unrepresentable:
/// a movie field carries the movie id, a quality field carries the whole
/// (quality, movie, episode, server) tuple. The interface exposes no
/// episode-field endpoint, so no episode variant exists here.
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum FieldOwner {
    Movie {
        movie_id: String,
    },
    Quality {
        quality_id: String,
        movie_id: String,
        episode_id: String,
        server_id: String,
    },
}

/// A committed value on its way to the dispatcher.
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum CommitValue {
    Text(String),
    Set(Vec<String>),
}

impl CommitValue {
    /// Plain-text rendering used to reconcile the cell after a successful
    /// commit: scalar values verbatim, sets comma-joined.
    pub fn rendered(&self) -> String {
        use itertools::Itertools;
        match self {
            Self::Text(s) => s.clone(),
            Self::Set(items) => items.iter().join(", "),
        }
    }
}

// ---- cross-thread messages ----

/// Work items handled by the API dispatch worker, strictly in order.
#[derive(Clone, Debug)]
pub enum ApiJob {
    Commit {
        field: Field,
        owner: FieldOwner,
        value: CommitValue,
    },
    FetchMovies {
        query: String,
    },
    FetchEpisodes {
        movie_id: String,
    },
    FetchQualities {
        movie_id: String,
        episode_id: String,
        server_id: String,
    },
    UpdatePositions(Vec<PositionEntry>),
    DeleteMovie {
        movie_id: String,
    },
    DeleteEpisode {
        episode_id: String,
    },
    DeleteQuality {
        quality_id: String,
    },
    DeleteMovieImage {
        movie_id: String,
        filename: String,
    },
}

/// Completions reported back to the UI thread.
#[derive(Debug)]
pub enum ApiEvent {
    CommitOk {
        field: Field,
        owner: FieldOwner,
        value: CommitValue,
    },
    CommitFailed {
        field: Field,
        owner: FieldOwner,
        error: String,
    },
    Movies(Vec<Movie>),
    Episodes {
        movie_id: String,
        episodes: Vec<Episode>,
    },
    Qualities {
        movie_id: String,
        episode_id: String,
        server_id: String,
        qualities: Vec<Quality>,
    },
    PositionsUpdated,
    Deleted {
        what: &'static str,
    },
    Failed {
        action: &'static str,
        error: String,
    },
}
