use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

/// Scalar fields of the draft, addressed by their wire name.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub enum DraftField {
    Heading,
    ProjectTitle,
    Year,
    Location,
    /// The raw, uncommitted services text.
    Services,
}

impl DraftField {
    /// Fields that must be non-empty before a submission is attempted.
    pub const REQUIRED: [DraftField; 4] = [
        DraftField::Heading,
        DraftField::ProjectTitle,
        DraftField::Year,
        DraftField::Location,
    ];

    pub fn wire_name(self) -> &'static str {
        match self {
            DraftField::Heading => "heading",
            DraftField::ProjectTitle => "projectTitle",
            DraftField::Year => "year",
            DraftField::Location => "location",
            DraftField::Services => "services",
        }
    }
}

impl fmt::Display for DraftField {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.wire_name())
    }
}

impl FromStr for DraftField {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "heading" => Ok(DraftField::Heading),
            "projectTitle" | "project_title" | "title" => Ok(DraftField::ProjectTitle),
            "year" => Ok(DraftField::Year),
            "location" => Ok(DraftField::Location),
            "services" => Ok(DraftField::Services),
            other => Err(format!("Unknown field: {other}")),
        }
    }
}

/// A named binary file staged for upload.
#[derive(Clone, PartialEq, Eq)]
pub struct Attachment {
    /// Display name, also the dedup key within a draft
    pub name: String,
    /// MIME type of the content
    pub mime_type: String,
    pub bytes: Vec<u8>,
}

impl Attachment {
    pub fn new(name: impl Into<String>, mime_type: impl Into<String>, bytes: Vec<u8>) -> Self {
        Self {
            name: name.into(),
            mime_type: mime_type.into(),
            bytes,
        }
    }

    pub fn size(&self) -> usize {
        self.bytes.len()
    }
}

impl fmt::Debug for Attachment {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Attachment")
            .field("name", &self.name)
            .field("mime_type", &self.mime_type)
            .field("size", &self.bytes.len())
            .finish()
    }
}

/// The in-memory project record currently being composed.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Draft {
    pub heading: String,
    pub project_title: String,
    pub year: String,
    pub location: String,
    /// Raw services text as typed, until committed
    pub services_text: String,
    /// Committed services, trimmed and non-empty
    pub services: Vec<String>,
    /// `service_details[i]` elaborates `services[i]`
    pub service_details: Vec<String>,
    pub images: Vec<Attachment>,
}

impl Draft {
    pub fn field(&self, field: DraftField) -> &str {
        match field {
            DraftField::Heading => &self.heading,
            DraftField::ProjectTitle => &self.project_title,
            DraftField::Year => &self.year,
            DraftField::Location => &self.location,
            DraftField::Services => &self.services_text,
        }
    }

    pub(crate) fn field_mut(&mut self, field: DraftField) -> &mut String {
        match field {
            DraftField::Heading => &mut self.heading,
            DraftField::ProjectTitle => &mut self.project_title,
            DraftField::Year => &mut self.year,
            DraftField::Location => &mut self.location,
            DraftField::Services => &mut self.services_text,
        }
    }

    pub fn has_image(&self, name: &str) -> bool {
        self.images.iter().any(|image| image.name == name)
    }

    pub fn is_empty(&self) -> bool {
        *self == Draft::default()
    }

    /// Required scalar fields that are blank, plus `images` when no image is
    /// staged. The label does not depend on the configured multipart field.
    pub fn missing_fields(&self) -> Vec<&'static str> {
        let mut missing: Vec<&'static str> = DraftField::REQUIRED
            .iter()
            .filter(|field| self.field(**field).trim().is_empty())
            .map(|field| field.wire_name())
            .collect();
        if self.images.is_empty() {
            missing.push("images");
        }
        missing
    }
}

/// Immutable snapshot of a draft handed to the transport.
///
/// The receiver pairs `services[i]` with `service_details[i]` by position.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ProjectSubmission {
    pub heading: String,
    pub project_title: String,
    pub year: String,
    pub location: String,
    pub services: Vec<String>,
    pub service_details: Vec<String>,
    pub images: Vec<Attachment>,
}

impl From<&Draft> for ProjectSubmission {
    fn from(draft: &Draft) -> Self {
        Self {
            heading: draft.heading.clone(),
            project_title: draft.project_title.clone(),
            year: draft.year.clone(),
            location: draft.location.clone(),
            services: draft.services.clone(),
            service_details: draft.service_details.clone(),
            images: draft.images.clone(),
        }
    }
}
