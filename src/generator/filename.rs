// @module: Artifact file naming

// @const: Used when a name sanitizes to nothing
const FALLBACK_STEM: &str = "clip";

// @enum: Role of an emitted artifact, selecting its filename suffix
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ArtifactKind {
    /// Main artifact without a secret
    Plain,
    /// Main artifact carrying a secret
    Admin,
    /// Stripped copy of a single-media artifact, or an admin public save
    Public,
    /// Stripped copy of a hub artifact
    HubPublic,
    /// Admin re-export keeping a secret
    UpdatedAdmin,
    /// Single-media admin backup
    Backup,
}

impl ArtifactKind {
    pub fn suffix(&self) -> &'static str {
        match self {
            Self::Plain => "",
            Self::Admin => "_ADM",
            Self::Public => "_PUBLIC",
            Self::HubPublic => "_PUBLICO",
            Self::UpdatedAdmin => "_UPDATED_ADM",
            Self::Backup => "_BACKUP",
        }
    }
}

/// Replace every character outside `[A-Za-z0-9]` with `_`.
///
/// One underscore per UTF-16 unit, so characters outside the basic
/// multilingual plane become two, as the in-artifact runtime does.
pub fn sanitize(name: &str) -> String {
    let mut out = String::with_capacity(name.len());
    for c in name.chars() {
        if c.is_ascii_alphanumeric() {
            out.push(c);
        } else {
            for _ in 0..c.len_utf16() {
                out.push('_');
            }
        }
    }
    out
}

/// Filename for an artifact named `name`
pub fn artifact_filename(name: &str, kind: ArtifactKind) -> String {
    let mut stem = sanitize(name);
    if stem.is_empty() {
        stem = FALLBACK_STEM.to_string();
    }
    format!("{}{}.html", stem, kind.suffix())
}
