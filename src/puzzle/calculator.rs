use serde::Serialize;

use crate::puzzle::model::{CrossingInput, GroupColor, GroupCount};

/// People carried by one car per trip.
pub const BOAT_CAPACITY: u32 = 2;
/// Time units between two consecutive departures of the same colour.
pub const TRIP_SPACING: i64 = 3;
/// Travel and unloading time remaining after the last car boards.
pub const FINAL_LEG_TIME: i64 = 30;

pub fn trips_for(count: GroupCount) -> u32 {
    count.get().div_ceil(BOAT_CAPACITY)
}

// Negative for an empty group; only meaningful inside the max below.
fn last_boarding_term(color: GroupColor, count: GroupCount) -> i64 {
    (i64::from(trips_for(count)) - 1) * TRIP_SPACING + color.boarding_offset()
}

/// Departure time of the last car of `color`, or `None` when nobody of that colour travels.
pub fn last_boarding_time(color: GroupColor, count: GroupCount) -> Option<u64> {
    if trips_for(count) == 0 {
        return None;
    }
    u64::try_from(last_boarding_term(color, count)).ok()
}

pub fn compute_minimum_time(red: u32, green: u32, blue: u32) -> u64 {
    let input = CrossingInput::new(red, green, blue);
    if input.is_empty() {
        return 0;
    }
    let completion = GroupColor::ALL
        .iter()
        .map(|color| last_boarding_term(*color, input[*color]))
        .fold(i64::MIN, i64::max);
    // At least one group boards at t >= 0 here, so the sum is positive.
    u64::try_from(completion + FINAL_LEG_TIME).unwrap_or(0)
}

#[derive(Debug, Clone, Eq, PartialEq, Serialize)]
pub struct GroupPlan {
    pub color: GroupColor,
    pub count: u32,
    pub trips: u32,
    pub last_boarding_time: Option<u64>,
}

#[derive(Debug, Clone, Eq, PartialEq, Serialize)]
pub struct CrossingPlan {
    pub total_time: u64,
    pub groups: Vec<GroupPlan>,
}

impl CrossingPlan {
    pub fn compute(input: &CrossingInput) -> Self {
        let groups = GroupColor::ALL
            .iter()
            .map(|color| {
                let count = input[*color];
                GroupPlan {
                    color: *color,
                    count: count.get(),
                    trips: trips_for(count),
                    last_boarding_time: last_boarding_time(*color, count),
                }
            })
            .collect();
        let total_time =
            compute_minimum_time(input.red.get(), input.green.get(), input.blue.get());
        Self { total_time, groups }
    }

    pub fn total_trips(&self) -> u64 {
        self.groups.iter().map(|group| u64::from(group.trips)).sum()
    }

    /// Latest departure across all groups.
    pub fn boarding_completion(&self) -> Option<u64> {
        self.groups
            .iter()
            .filter_map(|group| group.last_boarding_time)
            .max()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn nobody_to_move_takes_no_time() {
        assert_eq!(compute_minimum_time(0, 0, 0), 0);
        let plan = CrossingPlan::compute(&CrossingInput::default());
        assert_eq!(plan.total_time, 0);
        assert_eq!(plan.boarding_completion(), None);
        assert_eq!(plan.total_trips(), 0);
    }

    #[test]
    fn default_puzzle_instance() {
        // red: 2 trips, last at 3; green: 2 trips, last at 4; blue: 1 trip, at 2.
        assert_eq!(compute_minimum_time(3, 3, 1), 34);
    }

    #[test]
    fn single_person_per_color() {
        assert_eq!(compute_minimum_time(1, 0, 0), 30);
        assert_eq!(compute_minimum_time(0, 1, 0), 31);
        assert_eq!(compute_minimum_time(0, 0, 1), 32);
    }

    #[test]
    fn trip_count_ignores_parity_within_a_car() {
        assert_eq!(compute_minimum_time(2, 0, 0), compute_minimum_time(1, 0, 0));
        assert_eq!(compute_minimum_time(0, 4, 0), compute_minimum_time(0, 3, 0));
        assert_eq!(trips_for(GroupCount::new(0)), 0);
        assert_eq!(trips_for(GroupCount::new(1)), 1);
        assert_eq!(trips_for(GroupCount::new(2)), 1);
        assert_eq!(trips_for(GroupCount::new(5)), 3);
    }

    #[test]
    fn later_colors_dominate_on_equal_trips() {
        assert_eq!(compute_minimum_time(4, 4, 4), 3 + 2 + 30);
        assert_eq!(compute_minimum_time(6, 2, 2), 6 + 30);
    }

    #[test]
    fn time_is_monotonic_in_each_group() {
        for red in 0..9 {
            for green in 0..9 {
                for blue in 0..9 {
                    let base = compute_minimum_time(red, green, blue);
                    assert!(compute_minimum_time(red + 1, green, blue) >= base);
                    assert!(compute_minimum_time(red, green + 1, blue) >= base);
                    assert!(compute_minimum_time(red, green, blue + 1) >= base);
                }
            }
        }
    }

    #[test]
    fn swapping_counts_only_shifts_by_color_offset() {
        for count in 1..20 {
            let red_only = compute_minimum_time(count, 0, 0);
            let green_only = compute_minimum_time(0, count, 0);
            let blue_only = compute_minimum_time(0, 0, count);
            assert_eq!(green_only, red_only + 1);
            assert_eq!(blue_only, red_only + 2);
        }
    }

    #[test]
    fn largest_counts_do_not_overflow() {
        let total = compute_minimum_time(u32::MAX, u32::MAX, u32::MAX);
        let trips = u64::from(u32::MAX.div_ceil(2));
        assert_eq!(total, (trips - 1) * 3 + 2 + 30);
    }

    #[test]
    fn plan_breakdown_matches_formula() {
        let plan = CrossingPlan::compute(&CrossingInput::new(3, 0, 5));
        assert_eq!(plan.total_time, 38);
        assert_eq!(plan.total_trips(), 5);
        assert_eq!(plan.boarding_completion(), Some(8));

        let green = &plan.groups[GroupColor::Green.index()];
        assert_eq!(green.color, GroupColor::Green);
        assert_eq!(green.trips, 0);
        assert_eq!(green.last_boarding_time, None);

        let blue = &plan.groups[GroupColor::Blue.index()];
        assert_eq!(blue.count, 5);
        assert_eq!(blue.trips, 3);
        assert_eq!(blue.last_boarding_time, Some(8));
    }

    #[test]
    fn plan_serializes_with_snake_case_colors() {
        let plan = CrossingPlan::compute(&CrossingInput::new(1, 0, 0));
        let value = serde_json::to_value(&plan).expect("serialize plan");
        assert_eq!(value["total_time"], 30);
        assert_eq!(value["groups"][0]["color"], "red");
        assert!(value["groups"][1]["last_boarding_time"].is_null());
    }
}
