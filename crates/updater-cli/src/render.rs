//! Plain-text rendering of the draft for the `show` command.

use std::fmt::Write;
use updater_core::project::{Draft, DraftField, ImageAdmission};

pub fn render_draft(draft: &Draft, details_visible: bool) -> String {
    let mut out = String::new();

    for field in DraftField::REQUIRED {
        let _ = writeln!(out, "{:<14}{}", field.wire_name(), or_dash(draft.field(field)));
    }

    let _ = writeln!(out, "{:<14}{}", "services", or_dash(&draft.services_text));

    if details_visible && !draft.services.is_empty() {
        let _ = writeln!(out, "Service details:");
        for (i, (service, detail)) in draft
            .services
            .iter()
            .zip(draft.service_details.iter())
            .enumerate()
        {
            let _ = writeln!(out, "  {}. {}: {}", i + 1, service, or_dash(detail));
        }
    }

    if draft.images.is_empty() {
        let _ = writeln!(out, "Images: none");
    } else {
        let _ = writeln!(out, "Images: {} file(s) selected", draft.images.len());
        for (i, image) in draft.images.iter().enumerate() {
            let _ = writeln!(
                out,
                "  {}. {} ({}, {} bytes)",
                i + 1,
                image.name,
                image.mime_type,
                image.size()
            );
        }
    }

    out
}

pub fn render_admission(admission: &ImageAdmission, allowed_types: &[String]) -> Vec<String> {
    let mut lines = Vec::new();
    if !admission.added.is_empty() {
        lines.push(format!("Added: {}", admission.added.join(", ")));
    }
    if !admission.duplicates.is_empty() {
        lines.push(format!(
            "Already selected, skipped: {}",
            admission.duplicates.join(", ")
        ));
    }
    if !admission.rejected.is_empty() {
        lines.push(format!(
            "Not an allowed image type ({}), skipped: {}",
            type_labels(allowed_types),
            admission.rejected.join(", ")
        ));
    }
    lines
}

/// `image/png` becomes `PNG`; anything without a subtype is shown as is.
fn type_labels(allowed_types: &[String]) -> String {
    allowed_types
        .iter()
        .map(|mime| match mime.split_once('/') {
            Some((_, subtype)) if !subtype.is_empty() => subtype.to_ascii_uppercase(),
            _ => mime.clone(),
        })
        .collect::<Vec<_>>()
        .join(", ")
}

fn or_dash(value: &str) -> &str {
    if value.is_empty() { "-" } else { value }
}
