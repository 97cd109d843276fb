/*!
 * JSON shape of the data segment embedded in generated artifacts.
 *
 * Field names follow the format produced by earlier versions of the
 * runtime (`meta`, `content`, `desc`, `logoBase64`...), so artifacts made
 * by either side can be administered by the other.
 */

use serde::{Deserialize, Serialize};

use super::{AgeRating, ChannelPackage, ExportConfig, Playlist, VideoItem};

/// Channel header as embedded in a hub artifact
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ChannelMeta {
    pub id: String,
    pub name: String,
    #[serde(default)]
    pub description: String,
    #[serde(rename = "logoBase64", default)]
    pub logo: Option<String>,
    #[serde(rename = "backgroundMusicBase64", default, skip_serializing_if = "Option::is_none")]
    pub background_music: Option<String>,
}

/// A video as embedded in an artifact, media already inlined
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct StoredVideo {
    pub id: String,
    pub title: String,
    #[serde(default)]
    pub desc: String,
    #[serde(default)]
    pub genre: String,
    #[serde(default)]
    pub rating: AgeRating,
    /// Media as a data URI
    pub src: String,
    #[serde(default)]
    pub thumbnail: Option<String>,
    /// Cue text, empty when the video has no subtitles
    #[serde(default)]
    pub vtt: String,
    #[serde(default)]
    pub config: ExportConfig,
}

impl StoredVideo {
    /// Build from an authoring item and its resolved data URI.
    /// The per-video secret is dropped.
    pub fn from_item(item: &VideoItem, src: String) -> Self {
        Self {
            id: item.id.clone(),
            title: item.metadata.title.clone(),
            desc: item.metadata.description.clone(),
            genre: item.metadata.genre.clone(),
            rating: item.metadata.age_rating,
            src,
            thumbnail: item.thumbnail.clone(),
            vtt: item.cues.clone(),
            config: item.export_config.without_secret(),
        }
    }
}

/// A channel as embedded in a hub artifact
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct StoredChannel {
    pub meta: ChannelMeta,
    #[serde(default)]
    pub content: Vec<StoredVideo>,
    #[serde(default)]
    pub playlists: Vec<Playlist>,
}

impl StoredChannel {
    /// Channel header and playlists from an authoring package, with the given videos
    pub fn from_package(package: &ChannelPackage, content: Vec<StoredVideo>) -> Self {
        Self {
            meta: ChannelMeta {
                id: package.id.clone(),
                name: package.name.clone(),
                description: package.description.clone(),
                logo: package.logo.clone(),
                background_music: package.background_music.clone(),
            },
            content,
            playlists: package.playlists.clone(),
        }
    }
}
