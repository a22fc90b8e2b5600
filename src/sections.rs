//! Keyword-anchored splitting of a free-text completion into named fields.
//!
//! The completion has no structured contract: each field is located by the
//! first occurrence of its literal header and runs until the next known
//! header. Callers only depend on [`extract`], so a schema-constrained
//! generator can replace this without touching them.

use serde::Serialize;

/// The five fields returned to clients for a diseased plant.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct DiseaseInfo {
    pub description: String,
    pub symptoms: String,
    pub treatment: String,
    pub prevention: String,
    pub videos: String,
}

impl DiseaseInfo {
    pub fn placeholders(text: &Placeholders) -> Self {
        Self {
            description: text.unavailable.to_string(),
            symptoms: text.unavailable.to_string(),
            treatment: text.unavailable.to_string(),
            prevention: text.unavailable.to_string(),
            videos: text.no_resources.to_string(),
        }
    }
}

/// Literal header keywords in the order the prompt asks for them.
#[derive(Debug, Clone, Copy)]
pub struct SectionHeaders {
    pub description: &'static str,
    /// Only delimits the description; never returned.
    pub causes: &'static str,
    pub symptoms: &'static str,
    pub treatment: &'static str,
    pub prevention: &'static str,
    pub resources: &'static str,
}

#[derive(Debug, Clone, Copy)]
pub struct Placeholders {
    pub unavailable: &'static str,
    pub no_resources: &'static str,
}

#[derive(Clone, Copy)]
enum Field {
    Description,
    Symptoms,
    Treatment,
    Prevention,
    Videos,
}

/// Removes `<think>...</think>` reasoning blocks some models emit ahead of
/// their answer. A dangling `</think>` drops everything before it.
pub fn strip_reasoning(text: &str) -> String {
    let mut out = text.to_string();
    while let Some(start) = out.find("<think>") {
        let Some(end) = out[start..].find("</think>") else {
            break;
        };
        out.replace_range(start..start + end + "</think>".len(), "");
    }
    if let Some(end) = out.find("</think>") {
        out.replace_range(..end + "</think>".len(), "");
    }
    out.trim().to_string()
}

pub fn extract(text: &str, headers: &SectionHeaders, placeholders: &Placeholders) -> DiseaseInfo {
    let order = [
        (Some(Field::Description), headers.description),
        (None, headers.causes),
        (Some(Field::Symptoms), headers.symptoms),
        (Some(Field::Treatment), headers.treatment),
        (Some(Field::Prevention), headers.prevention),
        (Some(Field::Videos), headers.resources),
    ];

    let mut info = DiseaseInfo::placeholders(placeholders);

    for (i, (field, header)) in order.iter().enumerate() {
        let Some(field) = field else { continue };
        let Some(start) = text.find(header) else { continue };
        let body_start = start + header.len();

        // The body ends at whichever later header shows up first.
        let end = order[i + 1..]
            .iter()
            .filter_map(|(_, next)| text[body_start..].find(next))
            .min()
            .map_or(text.len(), |offset| body_start + offset);

        let body = text[body_start..end]
            .trim_start_matches(|c: char| c == ':' || c == '：' || c.is_whitespace())
            .trim_end();
        if body.is_empty() {
            continue;
        }

        let slot = match field {
            Field::Description => &mut info.description,
            Field::Symptoms => &mut info.symptoms,
            Field::Treatment => &mut info.treatment,
            Field::Prevention => &mut info.prevention,
            Field::Videos => &mut info.videos,
        };
        *slot = body.to_string();
    }

    info
}
