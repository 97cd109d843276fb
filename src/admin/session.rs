/*!
 * Admin session over a delivered artifact.
 *
 * A session reconstructs the live document from an artifact's own text,
 * applies edits once the console is unlocked, and re-serializes into a new
 * artifact that honors the same data contract. State moves
 * `Locked -> Unlocked -> Editing`, back to `Locked` on close (discarding
 * edits) or to `Ended` after a successful save.
 */

use std::fmt;
use std::path::Path;

use log::{debug, info, warn};

use crate::errors::AdminError;
use crate::generator::contract::{strip_activation, ArtifactLayout, SecretLiteral};
use crate::generator::filename::{artifact_filename, ArtifactKind};
use crate::generator::GeneratedArtifact;
use crate::model::wire::StoredVideo;
use crate::model::{new_item_id, AgeRating, ExportConfig, MediaAsset};
use super::gate::SecretGate;
use super::store::{DocumentContent, DocumentStore};

/// Description given to videos added from the console
pub const ADDED_VIDEO_DESCRIPTION: &str = "Added from admin console";

/// Genre given to videos added from the console
pub const ADDED_VIDEO_GENRE: &str = "General";

/// Console state
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SessionState {
    Locked,
    Unlocked,
    Editing,
    /// A new artifact was produced; the session accepts nothing further
    Ended,
}

impl fmt::Display for SessionState {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let label = match self {
            Self::Locked => "locked",
            Self::Unlocked => "unlocked",
            Self::Editing => "editing",
            Self::Ended => "ended",
        };
        f.write_str(label)
    }
}

/// How a save treats the secret statement
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SaveMode {
    /// Keep the current secret (hub update or single-media backup)
    KeepSecret,
    /// Replace the secret; an empty value behaves like `Public`
    ChangeSecret(String),
    /// Empty the secret and strip the activation controls
    Public,
}

/// An open admin session
#[derive(Debug, Clone)]
pub struct AdminSession {
    layout: ArtifactLayout,
    secret: Option<SecretLiteral>,
    pristine: DocumentStore,
    store: DocumentStore,
    state: SessionState,
}

impl AdminSession {
    /// Open a session over the full text of an artifact
    pub fn open(text: &str) -> Result<Self, AdminError> {
        let layout = ArtifactLayout::parse(text)?;
        let secret = SecretLiteral::find(text)?;
        let content: DocumentContent = layout.decode()?;
        let store = DocumentStore::new(content);

        debug!(
            "Opened {} artifact ({} bytes of data, admin: {})",
            if store.is_hub() { "hub" } else { "single-media" },
            layout.data_json().len(),
            secret.as_ref().is_some_and(|s| !s.value.is_empty())
        );

        Ok(Self {
            layout,
            secret,
            pristine: store.clone(),
            store,
            state: SessionState::Locked,
        })
    }

    pub fn state(&self) -> SessionState {
        self.state
    }

    /// The secret stored in the artifact, empty when there is none
    pub fn configured_secret(&self) -> &str {
        self.secret.as_ref().map_or("", |s| s.value.as_str())
    }

    /// Whether the artifact exposes an admin console at all
    pub fn is_admin_enabled(&self) -> bool {
        !self.configured_secret().is_empty()
    }

    pub fn is_hub(&self) -> bool {
        self.store.is_hub()
    }

    /// Unlock the console with `candidate`
    pub fn unlock(&mut self, candidate: &str) -> Result<(), AdminError> {
        match self.state {
            SessionState::Ended => return Err(AdminError::SessionEnded),
            SessionState::Unlocked | SessionState::Editing => return Ok(()),
            SessionState::Locked => {}
        }
        if !self.is_admin_enabled() {
            return Err(AdminError::ConsoleUnavailable);
        }
        if !SecretGate::accepts(self.configured_secret(), candidate) {
            warn!("Rejected admin secret");
            return Err(AdminError::AccessDenied);
        }
        self.state = SessionState::Unlocked;
        info!("Admin console unlocked");
        Ok(())
    }

    /// Discard unsaved edits and lock the console again
    pub fn close(&mut self) -> Result<(), AdminError> {
        if self.state == SessionState::Ended {
            return Err(AdminError::SessionEnded);
        }
        if self.store.version() != self.pristine.version() {
            info!("Discarding {} unsaved change(s)", self.store.version() - self.pristine.version());
        }
        self.store = self.pristine.clone();
        self.state = SessionState::Locked;
        Ok(())
    }

    /// Live document, available once unlocked
    pub fn store(&self) -> Result<&DocumentStore, AdminError> {
        self.ensure_open()?;
        Ok(&self.store)
    }

    pub fn add_channel(&mut self, name: &str) -> Result<usize, AdminError> {
        self.begin_edit()?;
        let index = self.store.add_channel(name)?;
        info!("Added channel '{}' at index {}", name, index);
        Ok(index)
    }

    pub fn delete_channel(&mut self, index: usize) -> Result<(), AdminError> {
        self.begin_edit()?;
        let removed = self.store.delete_channel(index)?;
        info!("Deleted channel '{}' ({} video(s))", removed.meta.name, removed.content.len());
        Ok(())
    }

    /// Read a media file synchronously and append it to `channel`.
    ///
    /// The title defaults to the file stem; other metadata gets placeholders.
    pub fn add_video(&mut self, channel: usize, path: &Path, title: Option<&str>) -> Result<String, AdminError> {
        self.begin_edit()?;
        let asset = MediaAsset::read_blocking(path).map_err(|e| AdminError::MediaRead {
            path: path.display().to_string(),
            message: format!("{:#}", e),
        })?;
        let title = title
            .map(str::to_string)
            .or_else(|| path.file_stem().map(|s| s.to_string_lossy().to_string()))
            .unwrap_or_default();
        self.add_video_asset(channel, &title, &asset)
    }

    /// Append an in-memory media asset to `channel`
    pub fn add_video_asset(&mut self, channel: usize, title: &str, asset: &MediaAsset) -> Result<String, AdminError> {
        self.begin_edit()?;
        let video = StoredVideo {
            id: new_item_id(),
            title: title.to_string(),
            desc: ADDED_VIDEO_DESCRIPTION.to_string(),
            genre: ADDED_VIDEO_GENRE.to_string(),
            rating: AgeRating::General,
            src: asset.to_data_uri(),
            thumbnail: None,
            vtt: String::new(),
            config: ExportConfig::default(),
        };
        let id = video.id.clone();
        self.store.add_video(channel, video)?;
        info!("Added '{}' to channel {} ({} bytes)", title, channel, asset.bytes.len());
        Ok(id)
    }

    pub fn delete_video(&mut self, channel: usize, video: usize) -> Result<(), AdminError> {
        self.begin_edit()?;
        let removed = self.store.delete_video(channel, video)?;
        info!("Removed '{}' from channel {}", removed.title, channel);
        Ok(())
    }

    /// Rename a single-media artifact
    pub fn rename_title(&mut self, title: &str) -> Result<(), AdminError> {
        self.begin_edit()?;
        self.store.rename_title(title)
    }

    /// Re-serialize the live document into a new artifact and end the session.
    ///
    /// On failure nothing is produced and the session keeps its state and edits.
    pub fn save(&mut self, mode: SaveMode) -> Result<GeneratedArtifact, AdminError> {
        self.ensure_open()?;

        let secret = match (&mode, self.store.is_hub()) {
            (SaveMode::KeepSecret, _) => self.configured_secret().to_string(),
            (SaveMode::ChangeSecret(next), true) => next.clone(),
            (SaveMode::ChangeSecret(_), false) => return Err(AdminError::UnsupportedOperation("change secret")),
            (SaveMode::Public, _) => String::new(),
        };
        let public = secret.is_empty();

        let mut layout = self.layout.clone();
        layout.replace_data(self.store.content())?;
        if let DocumentContent::Single(video) = self.store.content() {
            layout.set_title(&video.title);
        }
        if public {
            layout.map_frame(strip_activation);
        }
        let html = SecretLiteral::replace_in(&layout.render(), &secret)?;
        ArtifactLayout::parse(&html)?;

        let kind = match (public, self.store.is_hub()) {
            (true, _) => ArtifactKind::Public,
            (false, true) => ArtifactKind::UpdatedAdmin,
            (false, false) => ArtifactKind::Backup,
        };
        let name = match self.store.content() {
            DocumentContent::Single(video) => video.title.clone(),
            DocumentContent::Hub(_) => layout.title().unwrap_or_default(),
        };
        let artifact = GeneratedArtifact::new(html, artifact_filename(&name, kind), !public);

        self.state = SessionState::Ended;
        info!(
            "Saved {} after {} change(s) (sha256 {})",
            artifact.filename,
            self.store.version(),
            &artifact.fingerprint[..12]
        );
        Ok(artifact)
    }

    fn ensure_open(&self) -> Result<(), AdminError> {
        match self.state {
            SessionState::Locked => Err(AdminError::Locked),
            SessionState::Ended => Err(AdminError::SessionEnded),
            SessionState::Unlocked | SessionState::Editing => Ok(()),
        }
    }

    fn begin_edit(&mut self) -> Result<(), AdminError> {
        self.ensure_open()?;
        self.state = SessionState::Editing;
        Ok(())
    }
}
