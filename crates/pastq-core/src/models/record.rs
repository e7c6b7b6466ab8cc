use serde::{Deserialize, Deserializer, Serialize};

use crate::slug::to_kebab;

/// Sentinel for an unclassified level/semester.
pub const UNSORTED: &str = "UNSORTED";
/// Sentinel for an unknown course code/session/type.
pub const UNKNOWN: &str = "UNKNOWN";

/// Derived file format tag.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Format {
    Pdf,
    Image,
}

impl Format {
    /// Infer the format from a declared MIME type and/or a file name. The
    /// MIME type wins when present; the extension is the fallback.
    pub fn infer(mime: Option<&str>, name: &str) -> Option<Format> {
        if let Some(m) = mime {
            if m.eq_ignore_ascii_case("application/pdf") {
                return Some(Format::Pdf);
            }
            if m.to_ascii_lowercase().starts_with("image/") {
                return Some(Format::Image);
            }
        }
        let lower = name.to_ascii_lowercase();
        if lower.ends_with(".pdf") {
            return Some(Format::Pdf);
        }
        for ext in [".png", ".jpg", ".jpeg", ".webp"] {
            if lower.ends_with(ext) {
                return Some(Format::Image);
            }
        }
        None
    }

    pub fn badge(&self) -> &'static str {
        match self {
            Format::Pdf => "PDF",
            Format::Image => "IMAGE",
        }
    }
}

/// Signed-in admin identity returned by the session probe.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Admin {
    pub email: String,
}

/// One uploaded past-question file, or a local draft of one.
///
/// `id` and `file_url` are empty for drafts; both are server-assigned once
/// the record is uploaded, after which the server is the source of truth.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct PastQuestion {
    #[serde(default, deserialize_with = "lenient_id", skip_serializing_if = "Option::is_none")]
    pub id: Option<i64>,
    #[serde(default)]
    pub title: String,
    #[serde(default)]
    pub course_code: String,
    #[serde(default)]
    pub course_title: String,
    #[serde(default)]
    pub level: String,
    #[serde(default)]
    pub semester: String,
    #[serde(default, rename = "type")]
    pub doc_type: String,
    #[serde(default)]
    pub session: String,
    #[serde(default)]
    pub year: String,
    #[serde(default)]
    pub notes: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub format: Option<Format>,
    #[serde(default, alias = "url", alias = "fileUrl")]
    pub file_url: String,
    /// Server timestamp, opaque to the client.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub created_at: Option<String>,
}

/// The PHP backend serializes ids as numbers or numeric strings.
fn lenient_id<'de, D>(deserializer: D) -> Result<Option<i64>, D::Error>
where
    D: Deserializer<'de>,
{
    let value = Option::<serde_json::Value>::deserialize(deserializer)?;
    Ok(match value {
        Some(serde_json::Value::Number(n)) => n.as_i64(),
        Some(serde_json::Value::String(s)) => s.trim().parse().ok(),
        _ => None,
    })
}

fn classified(value: &str) -> bool {
    let v = value.trim();
    !v.is_empty() && v != UNSORTED && v != UNKNOWN
}

impl PastQuestion {
    /// Trim every free-text field and fill in a derivable format tag.
    pub fn normalize(&mut self) {
        for field in [
            &mut self.title,
            &mut self.course_code,
            &mut self.course_title,
            &mut self.level,
            &mut self.semester,
            &mut self.doc_type,
            &mut self.session,
            &mut self.year,
            &mut self.notes,
            &mut self.file_url,
        ] {
            *field = field.trim().to_string();
        }
        if self.format.is_none() && !self.file_url.is_empty() {
            self.format = Format::infer(None, &self.file_url);
        }
    }

    pub fn normalized(mut self) -> Self {
        self.normalize();
        self
    }

    /// Level AND semester carry a real classification (not empty, not a
    /// sentinel).
    pub fn is_classified(&self) -> bool {
        classified(&self.level) && classified(&self.semester)
    }

    /// Complete records carry a title or course code and are classified.
    pub fn is_complete(&self) -> bool {
        (!self.title.trim().is_empty() || classified(&self.course_code)) && self.is_classified()
    }

    /// A draft has not been uploaded yet.
    pub fn is_draft(&self) -> bool {
        self.id.is_none()
    }

    /// Publishable records carry something to show and a stored file.
    pub fn is_publishable(&self) -> bool {
        (!self.title.trim().is_empty() || classified(&self.course_code))
            && !self.file_url.trim().is_empty()
    }

    /// Card/table heading: course code + course title when the code is
    /// known, else the record title, else a generic label.
    pub fn display_title(&self) -> String {
        if classified(&self.course_code) {
            let course = if self.course_title.trim().is_empty() {
                "Past Question"
            } else {
                self.course_title.trim()
            };
            format!("{} — {}", self.course_code.trim(), course)
        } else if !self.title.trim().is_empty() {
            self.title.trim().to_string()
        } else {
            "Past Question".to_string()
        }
    }

    /// " • "-joined session / type / format line under the heading.
    pub fn meta_line(&self) -> String {
        let session = if classified(&self.session) {
            self.session.trim()
        } else {
            UNKNOWN
        };
        let mut parts = vec![session.to_string()];
        if !self.doc_type.trim().is_empty() {
            parts.push(self.doc_type.trim().to_string());
        } else {
            parts.push(UNKNOWN.to_string());
        }
        if let Some(format) = self.format {
            parts.push(format.badge().to_string());
        }
        parts.join(" • ")
    }

    /// Slug of the stored file's base name, used to prefill a rename.
    pub fn file_basename(&self) -> String {
        let last = self.file_url.rsplit('/').next().unwrap_or("");
        let base = match last.rfind('.') {
            Some(dot) if dot > 0 => &last[..dot],
            _ => last,
        };
        let slug = to_kebab(base);
        if slug.is_empty() {
            "past-question".to_string()
        } else {
            slug
        }
    }

    /// Concatenation of the searchable fields, used for free-text matching.
    pub fn search_blob(&self) -> String {
        [
            self.title.as_str(),
            self.course_code.as_str(),
            self.course_title.as_str(),
            self.session.as_str(),
            self.year.as_str(),
            self.doc_type.as_str(),
            self.level.as_str(),
            self.semester.as_str(),
            self.notes.as_str(),
        ]
        .join(" ")
    }
}
