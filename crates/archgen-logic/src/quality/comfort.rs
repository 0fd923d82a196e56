//! Livability: generous main rooms, usable proportions, and a circulation
//! buffer between public and private rooms.

use super::DimensionScore;
use crate::constants::RoomType;
use crate::layout::Layout;

const GENEROUS_MASTER: f32 = 16.0;
const TIGHT_MASTER: f32 = 12.0;
const SPACIOUS_LIVING: f32 = 20.0;
const MAX_COMFORT_RATIO: f32 = 2.5;

pub fn comfort_score(layout: &Layout) -> DimensionScore {
    let mut score = 100.0;
    let mut factors = Vec::new();
    let mut warnings = Vec::new();

    for room in layout.rooms() {
        let area = room.area();
        match room.room_type {
            RoomType::MasterBedroom if area > GENEROUS_MASTER => {
                factors.push("Generous Master Bedroom size".to_string());
            }
            RoomType::MasterBedroom if area < TIGHT_MASTER => {
                score -= 5.0;
                warnings.push("Master Bedroom is tight".to_string());
            }
            RoomType::Living if area > SPACIOUS_LIVING => {
                factors.push("Spacious Living Area".to_string());
            }
            _ => {}
        }

        if !room.room_type.is_corridor() && room.min_side() > 0.0 && room.aspect_ratio() > MAX_COMFORT_RATIO {
            score -= 5.0;
            warnings.push(format!("{} is too narrow (bowling alley effect)", room.name));
        }
    }

    if layout.rooms().any(|r| r.room_type.is_corridor()) {
        factors.push("Circulation buffer exists (good for privacy)".to_string());
    } else if layout.room_count() > 3 {
        score -= 10.0;
        warnings.push("Lack of dedicated circulation may impact privacy".to_string());
    }

    DimensionScore::new(score, factors, warnings)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::layout::fixtures::*;

    #[test]
    fn test_generous_rooms_noted() {
        let layout = single_floor(vec![
            room("MASTER_BEDROOM_1", RoomType::MasterBedroom, 0.0, 0.0, 4.5, 4.0),
            room("LIVING_1", RoomType::Living, 4.5, 0.0, 5.0, 5.0),
        ]);
        let result = comfort_score(&layout);
        assert_eq!(result.score, 100);
        assert_eq!(result.factors.len(), 2);
    }

    #[test]
    fn test_tight_master_and_bowling_alley() {
        let layout = single_floor(vec![
            room("MASTER_BEDROOM_1", RoomType::MasterBedroom, 0.0, 0.0, 3.0, 3.5),
            room("BEDROOM_2", RoomType::Bedroom, 3.0, 0.0, 2.0, 6.0),
        ]);
        let result = comfort_score(&layout);
        assert_eq!(result.score, 90);
        assert_eq!(result.warnings.len(), 2);
    }

    #[test]
    fn test_corridor_buffer() {
        let mut rooms = house().floors[0].rooms.clone();
        let without = comfort_score(&single_floor(rooms.clone()));
        rooms.push(room("CORRIDOR_1", RoomType::Corridor, 0.0, 9.0, 8.0, 1.0));
        let with = comfort_score(&single_floor(rooms));
        assert_eq!(without.score + 10, with.score);
    }
}
