/*!
 * Versioned live document of an admin session.
 *
 * The store owns the decoded data segment and bumps its version on every
 * successful mutation. Failed mutations leave both content and version
 * untouched.
 */

use serde::{Deserialize, Serialize};

use crate::errors::AdminError;
use crate::model::new_item_id;
use crate::model::wire::{ChannelMeta, StoredChannel, StoredVideo};

/// Decoded data segment
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum DocumentContent {
    /// Hub and channel artifacts: an array of channels
    Hub(Vec<StoredChannel>),
    /// Single-media artifacts: one video object
    Single(StoredVideo),
}

/// Live document with a mutation counter
#[derive(Debug, Clone, PartialEq)]
pub struct DocumentStore {
    version: u64,
    content: DocumentContent,
}

impl DocumentStore {
    pub fn new(content: DocumentContent) -> Self {
        Self { version: 0, content }
    }

    /// Number of mutations applied since the store was created
    pub fn version(&self) -> u64 {
        self.version
    }

    pub fn content(&self) -> &DocumentContent {
        &self.content
    }

    pub fn is_hub(&self) -> bool {
        matches!(self.content, DocumentContent::Hub(_))
    }

    /// Channels of a hub document
    pub fn channels(&self) -> Result<&[StoredChannel], AdminError> {
        match &self.content {
            DocumentContent::Hub(channels) => Ok(channels),
            DocumentContent::Single(_) => Err(AdminError::UnsupportedOperation("list channels")),
        }
    }

    fn channels_mut(&mut self, operation: &'static str) -> Result<&mut Vec<StoredChannel>, AdminError> {
        match &mut self.content {
            DocumentContent::Hub(channels) => Ok(channels),
            DocumentContent::Single(_) => Err(AdminError::UnsupportedOperation(operation)),
        }
    }

    /// Append an empty channel, returning its index
    pub fn add_channel(&mut self, name: &str) -> Result<usize, AdminError> {
        let channels = self.channels_mut("add channel")?;
        channels.push(StoredChannel {
            meta: ChannelMeta {
                id: new_item_id(),
                name: name.to_string(),
                description: String::new(),
                logo: None,
                background_music: None,
            },
            content: Vec::new(),
            playlists: Vec::new(),
        });
        let index = channels.len() - 1;
        self.version += 1;
        Ok(index)
    }

    pub fn delete_channel(&mut self, index: usize) -> Result<StoredChannel, AdminError> {
        let channels = self.channels_mut("delete channel")?;
        if index >= channels.len() {
            return Err(AdminError::ChannelNotFound(index));
        }
        let removed = channels.remove(index);
        self.version += 1;
        Ok(removed)
    }

    /// Append a video to a channel
    pub fn add_video(&mut self, channel: usize, video: StoredVideo) -> Result<(), AdminError> {
        let channels = self.channels_mut("add video")?;
        let target = channels.get_mut(channel).ok_or(AdminError::ChannelNotFound(channel))?;
        target.content.push(video);
        self.version += 1;
        Ok(())
    }

    /// Remove a video by position. Playlist references to it are left as they are.
    pub fn delete_video(&mut self, channel: usize, video: usize) -> Result<StoredVideo, AdminError> {
        let channels = self.channels_mut("delete video")?;
        let target = channels.get_mut(channel).ok_or(AdminError::ChannelNotFound(channel))?;
        if video >= target.content.len() {
            return Err(AdminError::VideoNotFound { channel, video });
        }
        let removed = target.content.remove(video);
        self.version += 1;
        Ok(removed)
    }

    /// Rename the video of a single-media document
    pub fn rename_title(&mut self, title: &str) -> Result<(), AdminError> {
        match &mut self.content {
            DocumentContent::Single(video) => {
                video.title = title.to_string();
                self.version += 1;
                Ok(())
            }
            DocumentContent::Hub(_) => Err(AdminError::UnsupportedOperation("rename title")),
        }
    }
}
