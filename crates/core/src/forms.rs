//! Form state for the registry editors.
//!
//! These mirror what the admin pages keep between user actions: the
//! project draft with its pinned point and repeatable milestone rows, the
//! photo source choice on article and contractor editors, and the
//! comma-separated expertise field.

use serde::{Deserialize, Serialize};

use crate::address::{GeoPoint, ResolvedAddress, MAP_CENTER, MAP_DEFAULT_ZOOM};
use crate::project::MilestoneType;

/// One repeatable milestone row of the project form.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct MilestoneRow {
    #[serde(rename = "type", default)]
    pub milestone_type: MilestoneType,
}

/// The project registration form between user actions.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ProjectDraft {
    /// Point pinned on the map, if any. Submission requires one.
    pub location: Option<GeoPoint>,
    pub address: ResolvedAddress,
    pub milestones: Vec<MilestoneRow>,
    pub map_center: GeoPoint,
    pub map_zoom: u8,
}

impl Default for ProjectDraft {
    fn default() -> Self {
        Self {
            location: None,
            address: ResolvedAddress::default(),
            milestones: vec![MilestoneRow::default()],
            map_center: MAP_CENTER,
            map_zoom: MAP_DEFAULT_ZOOM,
        }
    }
}

impl ProjectDraft {
    /// Back to a blank form: no pin, empty address, one milestone row.
    pub fn reset(&mut self) {
        *self = Self::default();
    }

    /// Append an empty milestone row, returning its index.
    pub fn add_milestone_row(&mut self) -> usize {
        self.milestones.push(MilestoneRow::default());
        self.milestones.len() - 1
    }

    /// Remove the row at `index`. Out-of-range indexes are ignored.
    pub fn remove_milestone_row(&mut self, index: usize) -> Option<MilestoneRow> {
        (index < self.milestones.len()).then(|| self.milestones.remove(index))
    }

    /// Record a map click. A resolved address overwrites street, barangay
    /// and zip code; `None` (geocoding failed) leaves them as they were.
    /// The city is never taken from the geocoder.
    pub fn apply_pin(&mut self, point: GeoPoint, resolved: Option<ResolvedAddress>) {
        self.location = Some(point);
        if let Some(addr) = resolved {
            self.address.street = addr.street;
            self.address.barangay = addr.barangay;
            self.address.zip_code = addr.zip_code;
        }
    }
}

/// Where the photo of a saved record comes from.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum PhotoChoice<F> {
    /// A newly selected file that must be uploaded.
    Upload(F),
    /// A URL typed into the form.
    Url(String),
    /// Whatever the record already had (possibly empty).
    Keep(String),
}

impl<F> PhotoChoice<F> {
    /// New file beats a typed URL, which beats the existing value.
    pub fn choose(file: Option<F>, url_input: &str, existing: &str) -> Self {
        match file {
            Some(f) => PhotoChoice::Upload(f),
            None if !url_input.trim().is_empty() => PhotoChoice::Url(url_input.trim().to_string()),
            None => PhotoChoice::Keep(existing.to_string()),
        }
    }

    /// URL the form can show before saving. A pending upload has none until
    /// the host returns one.
    pub fn preview_url(&self) -> Option<&str> {
        match self {
            PhotoChoice::Upload(_) => None,
            PhotoChoice::Url(url) => Some(url),
            PhotoChoice::Keep(existing) if !existing.is_empty() => Some(existing),
            PhotoChoice::Keep(_) => None,
        }
    }
}

/// Split `"Roads, Bridges,, Drainage "` into `["Roads", "Bridges", "Drainage"]`.
pub fn parse_expertise(input: &str) -> Vec<String> {
    input
        .split(',')
        .map(str::trim)
        .filter(|s| !s.is_empty())
        .map(str::to_string)
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::address::DEFAULT_CITY;

    #[test]
    fn fresh_draft_has_one_row_and_default_city() {
        let draft = ProjectDraft::default();
        assert!(draft.location.is_none());
        assert_eq!(draft.milestones.len(), 1);
        assert_eq!(draft.address.city, DEFAULT_CITY);
        assert_eq!(draft.map_center, MAP_CENTER);
    }

    #[test]
    fn rows_add_and_remove() {
        let mut draft = ProjectDraft::default();
        assert_eq!(draft.add_milestone_row(), 1);
        draft.milestones[1].milestone_type = MilestoneType::Finished;
        assert_eq!(draft.remove_milestone_row(0), Some(MilestoneRow::default()));
        assert_eq!(draft.milestones.len(), 1);
        assert_eq!(draft.milestones[0].milestone_type, MilestoneType::Finished);
        assert_eq!(draft.remove_milestone_row(5), None);
    }

    #[test]
    fn reset_clears_pin_and_rows() {
        let mut draft = ProjectDraft::default();
        draft.add_milestone_row();
        draft.apply_pin(GeoPoint { lat: 14.65, lng: 121.05 }, None);
        draft.address.street = "Somewhere".into();
        draft.reset();
        assert_eq!(draft, ProjectDraft::default());
    }

    #[test]
    fn pin_without_address_keeps_fields() {
        let mut draft = ProjectDraft::default();
        draft.address.street = "Old Street".into();
        draft.address.barangay = "Old Barangay".into();
        draft.apply_pin(GeoPoint { lat: 14.6, lng: 121.0 }, None);
        assert_eq!(draft.location, Some(GeoPoint { lat: 14.6, lng: 121.0 }));
        assert_eq!(draft.address.street, "Old Street");
        assert_eq!(draft.address.barangay, "Old Barangay");
    }

    #[test]
    fn pin_with_address_overwrites_but_keeps_city() {
        let mut draft = ProjectDraft::default();
        draft.address.street = "Old Street".into();
        let resolved = ResolvedAddress {
            street: "New Street".into(),
            barangay: "Batasan Hills".into(),
            zip_code: "1126".into(),
            city: "Elsewhere".into(),
        };
        draft.apply_pin(GeoPoint { lat: 14.6, lng: 121.0 }, Some(resolved));
        assert_eq!(draft.address.street, "New Street");
        assert_eq!(draft.address.barangay, "Batasan Hills");
        assert_eq!(draft.address.zip_code, "1126");
        assert_eq!(draft.address.city, DEFAULT_CITY);
    }

    #[test]
    fn photo_choice_precedence() {
        assert_eq!(
            PhotoChoice::choose(Some(1u8), "https://x/y.png", "old"),
            PhotoChoice::Upload(1)
        );
        assert_eq!(
            PhotoChoice::<u8>::choose(None, "  https://x/y.png ", "old"),
            PhotoChoice::Url("https://x/y.png".into())
        );
        assert_eq!(
            PhotoChoice::<u8>::choose(None, "   ", "old"),
            PhotoChoice::Keep("old".into())
        );
    }

    #[test]
    fn preview_follows_choice() {
        assert_eq!(PhotoChoice::Upload(1u8).preview_url(), None);
        assert_eq!(
            PhotoChoice::<u8>::Url("https://x/y.png".into()).preview_url(),
            Some("https://x/y.png")
        );
        assert_eq!(PhotoChoice::<u8>::Keep(String::new()).preview_url(), None);
    }

    #[test]
    fn expertise_split() {
        assert_eq!(
            parse_expertise("Roads, Bridges,, Drainage "),
            vec!["Roads", "Bridges", "Drainage"]
        );
        assert!(parse_expertise(" , ").is_empty());
    }
}
