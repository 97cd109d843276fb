/*!
 * Textual contract shared by the generator and the admin patch protocol.
 *
 * Every artifact carries exactly one data segment framed as
 * `/* DATA_START */const data = <JSON>;/* DATA_END */` and, when admin
 * enabled, exactly one secret statement `let|const savedPass = "<value>";`.
 * `ArtifactLayout` splits an artifact into the named regions around the
 * data segment so callers never splice raw strings themselves.
 */

use log::debug;
use once_cell::sync::Lazy;
use regex::Regex;
use serde::de::DeserializeOwned;
use serde::Serialize;

use crate::errors::{GenerationError, PatchError};

/// Literal opening the data segment
pub const DATA_START_MARKER: &str = "/* DATA_START */";

/// Literal closing the data segment
pub const DATA_END_MARKER: &str = "/* DATA_END */";

/// Statement prefix between the start marker and the JSON
pub const DATA_BINDING: &str = "const data = ";

/// Variable name of the secret statement
pub const SECRET_NAME: &str = "savedPass";

/// Markup attribute wiring the admin activation gesture
pub const ACTIVATION_ATTRIBUTE: &str = r#"ondblclick="triggerAdmin()""#;

/// Secret statement; the value is a JSON string literal
static SECRET_LITERAL_REGEX: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r#"(let|const) savedPass = "((?:[^"\\]|\\.)*)";"#).expect("Invalid secret literal regex")
});

static TITLE_REGEX: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r"<title>([^<]*)</title>").expect("Invalid title regex")
});

/// Serialize `value` as JSON safe to embed in a script element.
///
/// `<`, `/*` and `*/` are written as JSON escapes, so the result decodes to
/// the same value while never containing a marker, a closing script tag or
/// an unescaped quote.
pub fn embed_json<T: Serialize + ?Sized>(value: &T) -> Result<String, serde_json::Error> {
    Ok(escape_for_script(&serde_json::to_string(value)?))
}

fn escape_for_script(json: &str) -> String {
    json.replace('<', "\\u003c")
        .replace("/*", "\\/*")
        .replace("*/", "*\\/")
}

/// Artifact split around its data segment
#[derive(Debug, Clone, PartialEq)]
pub struct ArtifactLayout {
    head: String,
    data: String,
    tail: String,
}

impl ArtifactLayout {
    /// Assemble a layout from its regions; `data` must already be script-safe JSON
    pub fn new(head: impl Into<String>, data: impl Into<String>, tail: impl Into<String>) -> Self {
        Self {
            head: head.into(),
            data: data.into(),
            tail: tail.into(),
        }
    }

    /// Split an artifact into head, data and tail.
    ///
    /// Fails unless each marker occurs exactly once, the start marker comes
    /// first, and the text between them is exactly `const data = <JSON>;`.
    pub fn parse(text: &str) -> Result<Self, PatchError> {
        let starts = text.matches(DATA_START_MARKER).count();
        if starts != 1 {
            return Err(PatchError::MarkerCount {
                marker: DATA_START_MARKER,
                found: starts,
            });
        }
        let ends = text.matches(DATA_END_MARKER).count();
        if ends != 1 {
            return Err(PatchError::MarkerCount {
                marker: DATA_END_MARKER,
                found: ends,
            });
        }

        let start = text.find(DATA_START_MARKER).ok_or(PatchError::MalformedDataSegment)?;
        let end = text.find(DATA_END_MARKER).ok_or(PatchError::MalformedDataSegment)?;
        let inner_start = start + DATA_START_MARKER.len();
        if end < inner_start {
            return Err(PatchError::MarkersOutOfOrder);
        }

        let data = text[inner_start..end]
            .strip_prefix(DATA_BINDING)
            .and_then(|rest| rest.strip_suffix(';'))
            .filter(|json| !json.trim().is_empty())
            .ok_or(PatchError::MalformedDataSegment)?;

        Ok(Self {
            head: text[..start].to_string(),
            data: data.to_string(),
            tail: text[end + DATA_END_MARKER.len()..].to_string(),
        })
    }

    /// Everything before the start marker
    pub fn head(&self) -> &str {
        &self.head
    }

    /// The JSON between `const data = ` and `;`
    pub fn data_json(&self) -> &str {
        &self.data
    }

    /// Everything after the end marker
    pub fn tail(&self) -> &str {
        &self.tail
    }

    /// Decode the data segment
    pub fn decode<T: DeserializeOwned>(&self) -> Result<T, PatchError> {
        Ok(serde_json::from_str(&self.data)?)
    }

    /// Replace the data segment with the script-safe JSON form of `value`
    pub fn replace_data<T: Serialize + ?Sized>(&mut self, value: &T) -> Result<(), serde_json::Error> {
        self.data = embed_json(value)?;
        Ok(())
    }

    /// Apply `edit` to the regions outside the data segment
    pub fn map_frame(&mut self, edit: impl Fn(&str) -> String) {
        self.head = edit(&self.head);
        self.tail = edit(&self.tail);
    }

    /// Full artifact text
    pub fn render(&self) -> String {
        let mut out = String::with_capacity(
            self.head.len() + self.data.len() + self.tail.len() + 64,
        );
        out.push_str(&self.head);
        out.push_str(DATA_START_MARKER);
        out.push_str(DATA_BINDING);
        out.push_str(&self.data);
        out.push(';');
        out.push_str(DATA_END_MARKER);
        out.push_str(&self.tail);
        out
    }

    /// Text of the `<title>` element, HTML entities decoded
    pub fn title(&self) -> Option<String> {
        TITLE_REGEX
            .captures(&self.head)
            .and_then(|caps| caps.get(1))
            .map(|m| unescape_html(m.as_str()))
    }

    /// Replace the text of the `<title>` element
    pub fn set_title(&mut self, title: &str) {
        let replacement = format!("<title>{}</title>", crate::generator::runtime::escape_html(title));
        self.head = TITLE_REGEX
            .replace(&self.head, regex::NoExpand(replacement.as_str()))
            .into_owned();
    }
}

/// Declaration keyword of the secret statement
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SecretKeyword {
    /// Hub artifacts
    Let,
    /// Single-media artifacts
    Const,
}

impl SecretKeyword {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Let => "let",
            Self::Const => "const",
        }
    }
}

/// The secret statement of an artifact
#[derive(Debug, Clone, PartialEq)]
pub struct SecretLiteral {
    pub keyword: SecretKeyword,
    pub value: String,
}

impl SecretLiteral {
    pub fn new(keyword: SecretKeyword, value: impl Into<String>) -> Self {
        Self {
            keyword,
            value: value.into(),
        }
    }

    /// The statement as written into an artifact
    pub fn render(&self) -> String {
        let quoted = serde_json::Value::String(self.value.clone()).to_string();
        format!("{} {} = {};", self.keyword.as_str(), SECRET_NAME, escape_for_script(&quoted))
    }

    /// Find the single secret statement of `text`.
    ///
    /// Returns `None` when the artifact has no admin script at all.
    pub fn find(text: &str) -> Result<Option<Self>, PatchError> {
        let mut matches = SECRET_LITERAL_REGEX.captures_iter(text);
        let Some(caps) = matches.next() else {
            return Ok(None);
        };
        let extra = matches.count();
        if extra > 0 {
            return Err(PatchError::MarkerCount {
                marker: SECRET_NAME,
                found: extra + 1,
            });
        }

        let keyword = if &caps[1] == "const" {
            SecretKeyword::Const
        } else {
            SecretKeyword::Let
        };
        let raw = &caps[2];
        // Hand-written artifacts may hold an unescaped value
        let value = serde_json::from_str::<String>(&format!("\"{}\"", raw))
            .unwrap_or_else(|_| raw.to_string());

        Ok(Some(Self { keyword, value }))
    }

    /// Substitute the value of the secret statement in `text`, keeping its keyword
    pub fn replace_in(text: &str, value: &str) -> Result<String, PatchError> {
        let current = Self::find(text)?.ok_or(PatchError::SecretLiteralNotFound)?;
        let statement = Self::new(current.keyword, value).render();
        debug!("Rewriting {} statement", SECRET_NAME);
        Ok(SECRET_LITERAL_REGEX
            .replace(text, regex::NoExpand(statement.as_str()))
            .into_owned())
    }
}

/// Remove every activation attribute from markup
pub fn strip_activation(markup: &str) -> String {
    markup.replace(&format!(" {}", ACTIVATION_ATTRIBUTE), "")
        .replace(ACTIVATION_ATTRIBUTE, "")
}

/// Check a freshly rendered artifact against the contract
pub fn verify(text: &str, admin_enabled: bool) -> Result<(), GenerationError> {
    ArtifactLayout::parse(text).map_err(|e| GenerationError::ContractViolation(e.to_string()))?;

    let literals = SECRET_LITERAL_REGEX.find_iter(text).count();
    let expected = usize::from(admin_enabled);
    if literals != expected {
        return Err(GenerationError::ContractViolation(format!(
            "expected {} secret statement(s), found {}",
            expected, literals
        )));
    }

    let activations = text.matches(ACTIVATION_ATTRIBUTE).count();
    if !admin_enabled && activations > 0 {
        return Err(GenerationError::ContractViolation(
            "activation control rendered without a secret".to_string(),
        ));
    }

    Ok(())
}

fn unescape_html(text: &str) -> String {
    text.replace("&lt;", "<")
        .replace("&gt;", ">")
        .replace("&quot;", "\"")
        .replace("&#39;", "'")
        .replace("&#47;", "/")
        .replace("&amp;", "&")
}
