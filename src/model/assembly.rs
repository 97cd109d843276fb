/*!
 * Assembly of authoring entities into the embedded document shape.
 *
 * Each video's media is read and encoded exactly once. Reads for a whole
 * hub run concurrently on the current task and land in slots keyed by
 * their channel and video index, so completion order does not matter.
 */

use futures::future::try_join_all;
use indicatif::ProgressBar;
use log::{debug, info, warn};

use crate::errors::GenerationError;
use super::wire::{StoredChannel, StoredVideo};
use super::{ChannelPackage, DesignVariant, HubDocument, VideoItem};

/// Size guard applied to large hubs
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct AssemblyLimits {
    /// Truncation applies when a hub has more channels than this
    pub channel_limit_threshold: usize,
    /// Videos kept per channel when truncation applies
    pub videos_per_channel_cap: usize,
}

impl Default for AssemblyLimits {
    fn default() -> Self {
        Self {
            channel_limit_threshold: 5,
            videos_per_channel_cap: 10,
        }
    }
}

/// A hub (or legacy single channel) ready for rendering
#[derive(Debug, Clone, PartialEq)]
pub struct AssembledHub {
    pub name: String,
    pub design: DesignVariant,
    /// Empty when unprotected
    pub secret: String,
    pub channels: Vec<StoredChannel>,
}

impl AssembledHub {
    /// Same hub with the secret removed, used for public companions
    pub fn public_copy(&self) -> Self {
        Self {
            secret: String::new(),
            ..self.clone()
        }
    }
}

/// A single media item ready for rendering
#[derive(Debug, Clone, PartialEq)]
pub struct AssembledSingle {
    pub video: StoredVideo,
    /// Empty when unprotected
    pub secret: String,
}

impl AssembledSingle {
    pub fn public_copy(&self) -> Self {
        Self {
            secret: String::new(),
            ..self.clone()
        }
    }
}

/// Resolves media and builds the embedded shape
#[derive(Debug, Clone, Default)]
pub struct Assembler {
    limits: AssemblyLimits,
    progress: Option<ProgressBar>,
}

impl Assembler {
    pub fn new(limits: AssemblyLimits) -> Self {
        Self {
            limits,
            progress: None,
        }
    }

    /// Report each encoded media item on `progress`
    pub fn with_progress(mut self, progress: ProgressBar) -> Self {
        self.progress = Some(progress);
        self
    }

    /// Assemble a multi-channel hub
    pub async fn assemble_hub(&self, hub: &HubDocument) -> Result<AssembledHub, GenerationError> {
        if hub.channels.is_empty() || hub.total_videos() == 0 {
            return Err(GenerationError::EmptyHub);
        }

        let apply_limit = hub.channels.len() > self.limits.channel_limit_threshold;
        if apply_limit {
            warn!(
                "Hub has {} channels (> {}), keeping at most {} videos per channel",
                hub.channels.len(),
                self.limits.channel_limit_threshold,
                self.limits.videos_per_channel_cap
            );
        }

        let selections: Vec<&[VideoItem]> = hub
            .channels
            .iter()
            .map(|channel| {
                if apply_limit && channel.videos.len() > self.limits.videos_per_channel_cap {
                    &channel.videos[..self.limits.videos_per_channel_cap]
                } else {
                    &channel.videos[..]
                }
            })
            .collect();

        let channels = self.resolve_channels(&hub.channels, &selections).await?;

        info!(
            "Assembled hub '{}' with {} channel(s) and {} video(s)",
            hub.name,
            channels.len(),
            channels.iter().map(|c| c.content.len()).sum::<usize>()
        );

        Ok(AssembledHub {
            name: hub.name.clone(),
            design: hub.design,
            secret: hub.secret_or_empty().to_string(),
            channels,
        })
    }

    /// Assemble one channel as a netflix-style hub without a secret
    pub async fn assemble_channel(&self, package: &ChannelPackage) -> Result<AssembledHub, GenerationError> {
        if package.videos.is_empty() {
            return Err(GenerationError::EmptyChannel {
                name: package.name.clone(),
            });
        }

        let channels = self
            .resolve_channels(std::slice::from_ref(package), &[&package.videos[..]])
            .await?;

        Ok(AssembledHub {
            name: package.name.clone(),
            design: DesignVariant::Netflix,
            secret: String::new(),
            channels,
        })
    }

    /// Assemble a single media export
    pub async fn assemble_single(&self, video: Option<&VideoItem>) -> Result<AssembledSingle, GenerationError> {
        let video = video.ok_or(GenerationError::NoMedia)?;
        let src = self.resolve(video).await?;

        Ok(AssembledSingle {
            secret: video.export_config.secret_or_empty().to_string(),
            video: StoredVideo::from_item(video, src),
        })
    }

    async fn resolve_channels(
        &self,
        packages: &[ChannelPackage],
        selections: &[&[VideoItem]],
    ) -> Result<Vec<StoredChannel>, GenerationError> {
        let jobs = selections.iter().enumerate().flat_map(|(channel_index, videos)| {
            videos.iter().enumerate().map(move |(video_index, video)| async move {
                let src = self.resolve(video).await?;
                Ok::<_, GenerationError>((channel_index, video_index, StoredVideo::from_item(video, src)))
            })
        });

        let resolved = try_join_all(jobs).await?;

        let mut slots: Vec<Vec<Option<StoredVideo>>> = selections
            .iter()
            .map(|videos| vec![None; videos.len()])
            .collect();
        for (channel_index, video_index, stored) in resolved {
            slots[channel_index][video_index] = Some(stored);
        }

        Ok(packages
            .iter()
            .zip(slots)
            .map(|(package, videos)| StoredChannel::from_package(package, videos.into_iter().flatten().collect()))
            .collect())
    }

    async fn resolve(&self, video: &VideoItem) -> Result<String, GenerationError> {
        let asset = video.media.load().await.map_err(|e| GenerationError::MediaRead {
            path: video.media.label(),
            message: format!("{:#}", e),
        })?;
        debug!("Encoded {} ({} bytes, {})", video.media.label(), asset.bytes.len(), asset.mime);

        if let Some(progress) = &self.progress {
            progress.inc(1);
        }
        Ok(asset.to_data_uri())
    }
}
