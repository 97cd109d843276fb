/*!
 * Artifact generation.
 *
 * Turns an assembled hub, channel or single video into one self-contained
 * HTML document. Every artifact is checked against the data contract
 * before it is returned, so callers never see a half-valid document.
 *
 * - `contract`: markers, secret statement and the layout split
 * - `runtime`: page templates and the embedded JavaScript
 * - `variants`: presentation strategies for hubs
 * - `filename`: artifact naming
 */

use log::{debug, info};
use sha2::{Digest, Sha256};

use crate::errors::GenerationError;
use crate::model::assembly::{AssembledHub, AssembledSingle};
use contract::{embed_json, ArtifactLayout, ACTIVATION_ATTRIBUTE};
use filename::{artifact_filename, ArtifactKind};
use runtime::{escape_html, Template};
use variants::strategy_for;

pub mod contract;
pub mod filename;
pub mod runtime;
pub mod variants;

/// Default watermark label
pub const DEFAULT_WATERMARK: &str = "CLIP STUDIO";

/// Default document language
pub const DEFAULT_LANG: &str = "pt-BR";

/// A finished artifact ready for delivery
#[derive(Debug, Clone, PartialEq)]
pub struct GeneratedArtifact {
    /// Complete document text
    pub html: String,
    /// Suggested filename
    pub filename: String,
    /// Whether the artifact carries an admin console
    pub admin_enabled: bool,
    /// Hex SHA-256 of `html`
    pub fingerprint: String,
}

impl GeneratedArtifact {
    pub fn new(html: String, filename: String, admin_enabled: bool) -> Self {
        let fingerprint = fingerprint(&html);
        Self {
            html,
            filename,
            admin_enabled,
            fingerprint,
        }
    }

    /// Size of the document in bytes
    pub fn size(&self) -> usize {
        self.html.len()
    }
}

/// Hex SHA-256 of `text`
pub fn fingerprint(text: &str) -> String {
    let mut hasher = Sha256::new();
    hasher.update(text.as_bytes());
    format!("{:x}", hasher.finalize())
}

/// Renders assembled documents into artifacts
#[derive(Debug, Clone)]
pub struct ArtifactGenerator {
    watermark_text: String,
    lang: String,
}

impl Default for ArtifactGenerator {
    fn default() -> Self {
        Self::new(DEFAULT_WATERMARK, DEFAULT_LANG)
    }
}

impl ArtifactGenerator {
    pub fn new(watermark_text: impl Into<String>, lang: impl Into<String>) -> Self {
        Self {
            watermark_text: watermark_text.into(),
            lang: lang.into(),
        }
    }

    /// Main artifact of a hub or channel; admin enabled when the hub has a secret
    pub fn render_hub(&self, hub: &AssembledHub) -> Result<GeneratedArtifact, GenerationError> {
        let kind = if hub.secret.is_empty() {
            ArtifactKind::Plain
        } else {
            ArtifactKind::Admin
        };
        self.hub_artifact(hub, kind)
    }

    /// Stripped public companion of a hub
    pub fn render_hub_companion(&self, hub: &AssembledHub) -> Result<GeneratedArtifact, GenerationError> {
        self.hub_artifact(&hub.public_copy(), ArtifactKind::HubPublic)
    }

    /// Main artifact of a single video
    pub fn render_single(&self, single: &AssembledSingle) -> Result<GeneratedArtifact, GenerationError> {
        let kind = if single.secret.is_empty() {
            ArtifactKind::Plain
        } else {
            ArtifactKind::Admin
        };
        self.single_artifact(single, kind)
    }

    /// Stripped public companion of a single video
    pub fn render_single_companion(&self, single: &AssembledSingle) -> Result<GeneratedArtifact, GenerationError> {
        self.single_artifact(&single.public_copy(), ArtifactKind::Public)
    }

    fn hub_artifact(&self, hub: &AssembledHub, kind: ArtifactKind) -> Result<GeneratedArtifact, GenerationError> {
        let admin = !hub.secret.is_empty();
        let strategy = strategy_for(hub.design);
        debug!("Rendering hub '{}' with the {} layout", hub.name, strategy.variant());

        let stylesheet = [
            runtime::BASE_STYLES,
            strategy.stylesheet(),
            if admin { runtime::ADMIN_STYLES } else { "" },
        ]
        .concat();
        let admin_script = if admin {
            runtime::hub_admin_script(&hub.secret)
        } else {
            String::new()
        };
        let script = runtime::HUB_SCRIPT.render(&[
            ("shared_script", &runtime::shared_script()),
            ("render_function", strategy.render_function()),
            ("variant_script", strategy.script()),
        ]);
        let layout = strategy.layout_markup(&hub.name, &activation(admin));

        let lang = escape_html(&self.lang);
        let title = escape_html(&hub.name);
        let watermark_text = escape_html(&self.watermark_text);
        let vars = [
            ("lang", lang.as_str()),
            ("title", title.as_str()),
            ("stylesheet", stylesheet.as_str()),
            ("design", hub.design.tag()),
            ("admin_script", admin_script.as_str()),
            ("layout", layout.as_str()),
            ("watermark_text", watermark_text.as_str()),
            ("runtime", script.as_str()),
        ];

        let data = embed_json(&hub.channels)?;
        self.finish(runtime::HUB_PAGE, &vars, data, &hub.name, kind, admin)
    }

    fn single_artifact(&self, single: &AssembledSingle, kind: ArtifactKind) -> Result<GeneratedArtifact, GenerationError> {
        let admin = !single.secret.is_empty();
        let video = &single.video;

        let stylesheet = [
            runtime::SINGLE_STYLES,
            if admin { runtime::ADMIN_STYLES } else { "" },
        ]
        .concat();
        let admin_script = if admin {
            runtime::single_admin_script(&single.secret)
        } else {
            String::new()
        };
        let script = runtime::SINGLE_SCRIPT.render(&[("shared_script", &runtime::shared_script())]);

        let watermark = if video.config.show_watermark {
            format!(
                r#"<div class="watermark"{}><h2>{}</h2></div>"#,
                activation(admin),
                escape_html(&self.watermark_text)
            )
        } else if admin {
            format!(r#"<div class="admin-hotspot"{}></div>"#, activation(admin))
        } else {
            String::new()
        };

        let lang = escape_html(&self.lang);
        let title = escape_html(&video.title);
        let vars = [
            ("lang", lang.as_str()),
            ("title", title.as_str()),
            ("stylesheet", stylesheet.as_str()),
            ("admin_script", admin_script.as_str()),
            ("watermark", watermark.as_str()),
            ("runtime", script.as_str()),
        ];

        let data = embed_json(video)?;
        self.finish(runtime::SINGLE_PAGE, &vars, data, &video.title, kind, admin)
    }

    fn finish(
        &self,
        page: Template,
        vars: &[(&str, &str)],
        data: String,
        name: &str,
        kind: ArtifactKind,
        admin: bool,
    ) -> Result<GeneratedArtifact, GenerationError> {
        let (head, tail) = page.render_around_data(vars).ok_or_else(|| {
            GenerationError::ContractViolation("page template has no data placeholder".to_string())
        })?;
        let html = ArtifactLayout::new(head, data, tail).render();
        contract::verify(&html, admin)?;

        let artifact = GeneratedArtifact::new(html, artifact_filename(name, kind), admin);
        info!(
            "Generated {} ({} bytes, admin: {}, sha256 {})",
            artifact.filename,
            artifact.size(),
            artifact.admin_enabled,
            &artifact.fingerprint[..12]
        );
        Ok(artifact)
    }
}

fn activation(admin: bool) -> String {
    if admin {
        format!(" {}", ACTIVATION_ATTRIBUTE)
    } else {
        String::new()
    }
}
