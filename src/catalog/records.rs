use serde::{Deserialize, Serialize};
use serde_json::Value;

use crate::constants::Meter;
use crate::orrery_errors::OrreryError;

/// One fully resolved near-Earth object.
///
/// This is the unit stored in the cache payload and handed to the registry. A record is only
/// ever built from a detail payload carrying a usable maximum diameter; there is no
/// placeholder constructor.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct BodyRecord {
    pub id: String,
    pub name: String,
    pub max_estimated_diameter_meters: Meter,
}

impl BodyRecord {
    /// Build a record, rejecting sizes that cannot be displayed.
    ///
    /// Arguments
    /// ---------
    /// * `id`: catalog identifier
    /// * `name`: display name
    /// * `max_estimated_diameter_meters`: maximum estimated diameter, must be finite and >= 0
    ///
    /// Return
    /// ------
    /// * The record, or a [`OrreryError::DetailResolutionFailure`] naming the bad value
    pub fn new(
        id: impl Into<String>,
        name: impl Into<String>,
        max_estimated_diameter_meters: Meter,
    ) -> Result<Self, OrreryError> {
        let id = id.into();
        if !max_estimated_diameter_meters.is_finite() || max_estimated_diameter_meters < 0.0 {
            return Err(OrreryError::DetailResolutionFailure {
                id,
                reason: format!("unusable diameter {max_estimated_diameter_meters}"),
            });
        }
        Ok(BodyRecord {
            id,
            name: name.into(),
            max_estimated_diameter_meters,
        })
    }

    /// Decode a NeoWs `neo/{id}` payload.
    ///
    /// The diameter is read from `estimated_diameter.meters.estimated_diameter_max`. The record
    /// is keyed by the candidate id, whatever the payload reports, so ids stay unique within a
    /// snapshot; the payload's `name` wins over the browse summary when present.
    pub(crate) fn from_detail(candidate: &Candidate, body: &str) -> Result<Self, OrreryError> {
        let detail: NeoDetail =
            serde_json::from_str(body).map_err(|err| OrreryError::DetailResolutionFailure {
                id: candidate.id.clone(),
                reason: format!("invalid detail payload: {err}"),
            })?;

        let diameter = detail
            .estimated_diameter
            .and_then(|d| d.meters)
            .and_then(|m| m.estimated_diameter_max)
            .ok_or_else(|| OrreryError::DetailResolutionFailure {
                id: candidate.id.clone(),
                reason: "missing estimated_diameter.meters.estimated_diameter_max".into(),
            })?;

        BodyRecord::new(
            candidate.id.clone(),
            detail.name.unwrap_or_else(|| candidate.name.clone()),
            diameter,
        )
    }
}

/// Summary entry of the browse listing: just enough to request the detail.
#[derive(Debug, Clone, PartialEq)]
pub(crate) struct Candidate {
    pub(crate) id: String,
    pub(crate) name: String,
}

/// Extract the candidate list from a `neo/browse` payload.
///
/// Return
/// ------
/// * `Ok(candidates)` in listing order; entries without an id are skipped and duplicate ids
///   keep their first occurrence
/// * [`OrreryError::MalformedResponse`] if the body is not JSON or has no
///   `near_earth_objects` array
pub(crate) fn parse_browse(body: &str) -> Result<Vec<Candidate>, OrreryError> {
    let page: Value = serde_json::from_str(body).map_err(|err| {
        OrreryError::MalformedResponse(format!("browse payload is not JSON: {err}"))
    })?;

    let objects = page
        .get("near_earth_objects")
        .and_then(Value::as_array)
        .ok_or_else(|| {
            OrreryError::MalformedResponse("no near_earth_objects in browse payload".into())
        })?;

    let mut seen = std::collections::HashSet::new();
    let candidates = objects
        .iter()
        .filter_map(|neo| {
            let id = match neo.get("id")? {
                Value::String(s) => s.clone(),
                Value::Number(n) => n.to_string(),
                _ => return None,
            };
            let name = neo
                .get("name")
                .and_then(Value::as_str)
                .unwrap_or(id.as_str())
                .to_string();
            Some(Candidate { id, name })
        })
        .filter(|candidate| seen.insert(candidate.id.clone()))
        .collect();

    Ok(candidates)
}

#[derive(Debug, Deserialize)]
struct NeoDetail {
    name: Option<String>,
    estimated_diameter: Option<EstimatedDiameter>,
}

#[derive(Debug, Deserialize)]
struct EstimatedDiameter {
    meters: Option<DiameterRange>,
}

#[derive(Debug, Deserialize)]
struct DiameterRange {
    estimated_diameter_max: Option<f64>,
}
