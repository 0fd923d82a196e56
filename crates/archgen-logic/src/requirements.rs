//! Requirement parsing. Expands loose program inputs into room specs.
//!
//! A `Requirements` record (bedroom count, floors, amenities) becomes a
//! `ProgramSpec`: a flat list of `RoomSpec`s with minimum width/area drawn
//! from a `RoomStandards` table. The solver never sees the loose inputs.
//!
//! ```
//! use archgen_logic::requirements::{parse_requirements, Requirements, RoomStandards};
//!
//! let req = Requirements { bedrooms: 3, parking: true, ..Requirements::default() };
//! let program = parse_requirements(&req, &RoomStandards::default()).unwrap();
//! assert_eq!(program.count_of(archgen_logic::constants::RoomType::Bedroom), 2);
//! ```

use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

use crate::constants::RoomType;
use crate::error::RequirementError;
use crate::plot::Envelope;

/// Circulation and wall allowance applied on top of summed room minimums.
const CIRCULATION_ALLOWANCE: f32 = 1.25;

/// Loose program inputs from the design wizard.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct Requirements {
    pub bedrooms: u32,
    pub floors: u32,
    pub kitchen: bool,
    pub parking: bool,
    /// Explicit bathroom count; `None` derives one bath per two bedrooms.
    pub bathrooms: Option<u32>,
}

impl Default for Requirements {
    fn default() -> Self {
        Self {
            bedrooms: 1,
            floors: 1,
            kitchen: true,
            parking: false,
            bathrooms: None,
        }
    }
}

/// Minimum dimensions for one room type.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct RoomStandard {
    pub min_width: f32,
    pub min_area: f32,
}

/// Per-type room minimums used when expanding requirements.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RoomStandards(pub BTreeMap<RoomType, RoomStandard>);

impl Default for RoomStandards {
    fn default() -> Self {
        let table = [
            (RoomType::MasterBedroom, 3.0, 11.0),
            (RoomType::Bedroom, 2.7, 9.0),
            (RoomType::GuestRoom, 2.7, 9.0),
            (RoomType::Study, 2.4, 7.0),
            (RoomType::Kitchen, 2.1, 5.5),
            (RoomType::Living, 3.0, 14.0),
            (RoomType::Bath, 1.2, 2.8),
            (RoomType::Toilet, 1.0, 1.8),
            (RoomType::Stairs, 0.9, 6.0),
            (RoomType::Lift, 1.5, 2.25),
            (RoomType::Parking, 2.5, 12.5),
            (RoomType::Corridor, 1.0, 3.0),
        ];
        Self(
            table
                .into_iter()
                .map(|(rt, min_width, min_area)| {
                    (
                        rt,
                        RoomStandard {
                            min_width,
                            min_area,
                        },
                    )
                })
                .collect(),
        )
    }
}

impl RoomStandards {
    pub fn get(&self, room_type: RoomType) -> Option<RoomStandard> {
        self.0.get(&room_type).copied()
    }
}

/// A single room the solver must place.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RoomSpec {
    pub id: String,
    pub room_type: RoomType,
    pub min_width: f32,
    pub min_area: f32,
    /// Lower is placed first.
    pub priority: u8,
}

impl RoomSpec {
    /// Structural sanity check for a spec built outside the parser.
    pub fn check(&self) -> Result<(), RequirementError> {
        let malformed = |reason: &str| RequirementError::MalformedRoom {
            id: self.id.clone(),
            reason: reason.to_string(),
        };
        if self.id.trim().is_empty() {
            return Err(malformed("empty id"));
        }
        if !self.min_width.is_finite() || self.min_width <= 0.0 {
            return Err(malformed("min_width must be positive"));
        }
        if !self.min_area.is_finite() || self.min_area <= 0.0 {
            return Err(malformed("min_area must be positive"));
        }
        Ok(())
    }
}

/// The expanded room program for one generation request.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ProgramSpec {
    pub floors: u32,
    pub rooms: Vec<RoomSpec>,
}

impl ProgramSpec {
    pub fn count_of(&self, room_type: RoomType) -> usize {
        self.rooms.iter().filter(|r| r.room_type == room_type).count()
    }

    pub fn total_min_area(&self) -> f32 {
        self.rooms.iter().map(|r| r.min_area).sum()
    }

    /// Validate every room spec; used by the solver before placement.
    pub fn check(&self) -> Result<(), RequirementError> {
        if self.floors == 0 || self.floors > 10 {
            return Err(RequirementError::InvalidFloorCount(self.floors));
        }
        self.rooms.iter().try_for_each(RoomSpec::check)
    }
}

/// Expand loose requirements into a room program.
pub fn parse_requirements(
    req: &Requirements,
    standards: &RoomStandards,
) -> Result<ProgramSpec, RequirementError> {
    if req.floors == 0 || req.floors > 10 {
        return Err(RequirementError::InvalidFloorCount(req.floors));
    }
    if req.bedrooms > 12 {
        return Err(RequirementError::TooManyBedrooms(req.bedrooms));
    }
    if let Some(b) = req.bathrooms {
        if b == 0 || b > 12 {
            return Err(RequirementError::InvalidBathroomCount(b));
        }
    }

    let mut rooms = Vec::new();
    rooms.push(room_spec(standards, RoomType::Living, 1)?);

    if req.kitchen {
        rooms.push(room_spec(standards, RoomType::Kitchen, 1)?);
    }

    if req.bedrooms > 0 {
        rooms.push(room_spec(standards, RoomType::MasterBedroom, 1)?);
        for i in 1..req.bedrooms {
            rooms.push(room_spec(standards, RoomType::Bedroom, i + 1)?);
        }
    }

    let bath_count = req
        .bathrooms
        .unwrap_or_else(|| req.bedrooms.div_ceil(2).max(1));
    for i in 0..bath_count {
        rooms.push(room_spec(standards, RoomType::Bath, i + 1)?);
    }

    if req.parking {
        rooms.push(room_spec(standards, RoomType::Parking, 1)?);
    }

    if req.floors > 1 {
        rooms.push(room_spec(standards, RoomType::Stairs, 1)?);
    }

    Ok(ProgramSpec {
        floors: req.floors,
        rooms,
    })
}

fn room_spec(
    standards: &RoomStandards,
    room_type: RoomType,
    index: u32,
) -> Result<RoomSpec, RequirementError> {
    let std = standards
        .get(room_type)
        .ok_or(RequirementError::MissingStandard(room_type))?;
    Ok(RoomSpec {
        id: format!("{}_{}", room_type.as_str(), index),
        room_type,
        min_width: std.min_width,
        min_area: std.min_area,
        priority: if room_type == RoomType::Living { 1 } else { 2 },
    })
}

// ── Feasibility pre-check ───────────────────────────────────────────────

/// Result of checking a program against the envelope before solving.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct FeasibilityReport {
    pub valid: bool,
    pub errors: Vec<String>,
    pub buildable_area: f32,
    pub required_area: f32,
    pub utilization: f32,
}

/// Reject programs that cannot physically fit before running the solver.
///
/// Summed minimum areas get a 25% circulation allowance and are spread
/// evenly over the floors; the widest room must also fit the envelope.
pub fn check_feasibility(envelope: &Envelope, program: &ProgramSpec) -> FeasibilityReport {
    let mut errors = Vec::new();
    let buildable_area = envelope.area();
    let required_area = program.total_min_area() * CIRCULATION_ALLOWANCE;
    let per_floor = required_area / program.floors.max(1) as f32;

    if per_floor > buildable_area {
        errors.push(format!(
            "Area violation: program needs ~{:.1}m²/floor but the envelope allows only {:.1}m². Add floors or remove rooms.",
            per_floor, buildable_area
        ));
    }

    let widest = program
        .rooms
        .iter()
        .map(|r| r.min_width)
        .fold(0.0_f32, f32::max);
    if envelope.width < widest {
        errors.push(format!(
            "Width violation: envelope width {:.1}m is narrower than the widest room ({:.1}m).",
            envelope.width, widest
        ));
    }

    FeasibilityReport {
        valid: errors.is_empty(),
        errors,
        buildable_area,
        required_area,
        utilization: if buildable_area > 0.0 {
            per_floor / buildable_area
        } else {
            f32::INFINITY
        },
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn parse(req: Requirements) -> ProgramSpec {
        parse_requirements(&req, &RoomStandards::default()).unwrap()
    }

    #[test]
    fn test_default_program() {
        let p = parse(Requirements::default());
        assert_eq!(p.floors, 1);
        assert_eq!(p.count_of(RoomType::Living), 1);
        assert_eq!(p.count_of(RoomType::Kitchen), 1);
        assert_eq!(p.count_of(RoomType::MasterBedroom), 1);
        assert_eq!(p.count_of(RoomType::Bedroom), 0);
        assert_eq!(p.count_of(RoomType::Bath), 1);
        assert_eq!(p.count_of(RoomType::Stairs), 0);
    }

    #[test]
    fn test_bedrooms_expand_to_master_plus_standard() {
        let p = parse(Requirements {
            bedrooms: 4,
            ..Requirements::default()
        });
        assert_eq!(p.count_of(RoomType::MasterBedroom), 1);
        assert_eq!(p.count_of(RoomType::Bedroom), 3);
        assert_eq!(p.count_of(RoomType::Bath), 2);
        let ids: Vec<&str> = p
            .rooms
            .iter()
            .filter(|r| r.room_type == RoomType::Bedroom)
            .map(|r| r.id.as_str())
            .collect();
        assert_eq!(ids, vec!["BEDROOM_2", "BEDROOM_3", "BEDROOM_4"]);
    }

    #[test]
    fn test_explicit_bathrooms_and_no_kitchen() {
        let p = parse(Requirements {
            bedrooms: 2,
            kitchen: false,
            bathrooms: Some(3),
            ..Requirements::default()
        });
        assert_eq!(p.count_of(RoomType::Kitchen), 0);
        assert_eq!(p.count_of(RoomType::Bath), 3);
    }

    #[test]
    fn test_multi_floor_adds_stairs_and_parking() {
        let p = parse(Requirements {
            floors: 2,
            parking: true,
            ..Requirements::default()
        });
        assert_eq!(p.count_of(RoomType::Stairs), 1);
        assert_eq!(p.count_of(RoomType::Parking), 1);
    }

    #[test]
    fn test_living_has_top_priority() {
        let p = parse(Requirements::default());
        for r in &p.rooms {
            let expected = if r.room_type == RoomType::Living { 1 } else { 2 };
            assert_eq!(r.priority, expected);
        }
    }

    #[test]
    fn test_invalid_inputs_rejected() {
        let s = RoomStandards::default();
        assert_eq!(
            parse_requirements(
                &Requirements {
                    floors: 0,
                    ..Requirements::default()
                },
                &s
            ),
            Err(RequirementError::InvalidFloorCount(0))
        );
        assert_eq!(
            parse_requirements(
                &Requirements {
                    bedrooms: 13,
                    ..Requirements::default()
                },
                &s
            ),
            Err(RequirementError::TooManyBedrooms(13))
        );
        assert_eq!(
            parse_requirements(
                &Requirements {
                    bathrooms: Some(0),
                    ..Requirements::default()
                },
                &s
            ),
            Err(RequirementError::InvalidBathroomCount(0))
        );
    }

    #[test]
    fn test_missing_standard_reported() {
        let mut s = RoomStandards::default();
        s.0.remove(&RoomType::Kitchen);
        assert_eq!(
            parse_requirements(&Requirements::default(), &s),
            Err(RequirementError::MissingStandard(RoomType::Kitchen))
        );
    }

    #[test]
    fn test_malformed_spec_detected() {
        let mut p = parse(Requirements::default());
        p.rooms[0].min_width = 0.0;
        assert!(matches!(
            p.check(),
            Err(RequirementError::MalformedRoom { .. })
        ));
    }

    #[test]
    fn test_feasibility_small_envelope() {
        let env = Envelope {
            x: 0.0,
            y: 0.0,
            width: 3.0,
            length: 4.0,
        };
        let p = parse(Requirements {
            bedrooms: 3,
            parking: true,
            ..Requirements::default()
        });
        let report = check_feasibility(&env, &p);
        assert!(!report.valid);
        assert!(report.errors.iter().any(|e| e.contains("Area violation")));
        assert!(report.utilization > 1.0);
    }

    #[test]
    fn test_feasibility_roomy_envelope() {
        let env = Envelope {
            x: 1.0,
            y: 1.5,
            width: 10.0,
            length: 15.5,
        };
        let p = parse(Requirements {
            bedrooms: 2,
            parking: true,
            ..Requirements::default()
        });
        let report = check_feasibility(&env, &p);
        assert!(report.valid, "{:?}", report.errors);
        assert!(report.utilization < 1.0);
    }
}
