//! Property tests for the stat engine: bounds, monotonic counters and the
//! terminal dead state, over random interleavings of waiting and acting.

use chrono::{Duration, TimeZone, Utc};
use proptest::prelude::*;
use rand::{rngs::StdRng, SeedableRng};
use spirithatch::model::{PetState, Rules, Stat, Stats, FINAL_STAGE};
use spirithatch::sim::Action;
use spirithatch::Error;

#[derive(Debug, Clone)]
enum Step {
    Wait(u32),
    Read,
    Act(Action),
}

fn arb_step() -> impl Strategy<Value = Step> {
    prop_oneof![
        (0u32..=90_000u32).prop_map(Step::Wait),
        Just(Step::Read),
        proptest::sample::select(Action::ALL.to_vec()).prop_map(Step::Act),
    ]
}

fn in_bounds(stats: &Stats) -> bool {
    Stat::ALL
        .iter()
        .all(|&s| (0.0..=100.0).contains(&stats.get(s)))
}

proptest! {
    #[test]
    fn random_play_keeps_invariants(
        seed in any::<u64>(),
        start in 0.0f32..=100.0,
        steps in proptest::collection::vec(arb_step(), 1..80),
    ) {
        let rules = Rules { event_chance: 0.5, ..Rules::default() };
        let mut rng = StdRng::seed_from_u64(seed);
        let mut now = Utc.with_ymd_and_hms(2024, 3, 1, 12, 0, 0).unwrap();
        let mut pet = PetState::new("Kiko", now, &rules);
        pet.stats = Stats::uniform(start.max(1.0));

        for step in steps {
            let before = pet.clone();
            match step {
                Step::Wait(ms) => {
                    now += Duration::milliseconds(ms as i64);
                    pet.advance_time(now, &rules);
                }
                Step::Read => {
                    pet.advance_time(now, &rules);
                    pet.roll_random_event(now, &rules, &mut rng);
                }
                Step::Act(action) => {
                    let res = pet.perform(action, now, &rules, &mut rng);
                    if !before.is_alive {
                        prop_assert_eq!(res, Err(Error::PetDeceased("Kiko".into())));
                    }
                }
            }

            prop_assert!(in_bounds(&pet.stats), "stats escaped bounds: {:?}", pet.stats);
            prop_assert!(pet.age_days >= before.age_days);
            prop_assert!(pet.interactions >= before.interactions);
            prop_assert!(pet.evolution_stage >= before.evolution_stage);
            prop_assert!(pet.evolution_stage <= FINAL_STAGE);
            prop_assert!(pet.evolution_stage <= before.evolution_stage + 1);

            if !before.is_alive {
                prop_assert!(!pet.is_alive);
                prop_assert_eq!(pet.stats, before.stats);
                prop_assert_eq!(pet.evolution_stage, before.evolution_stage);
            }
        }
    }

    #[test]
    fn decay_is_linear_and_floored(secs in 0u32..600, start in 0.0f32..=100.0) {
        let rules = Rules::default();
        let t0 = Utc.with_ymd_and_hms(2024, 3, 1, 12, 0, 0).unwrap();
        let mut pet = PetState::new("Kiko", t0, &rules);
        pet.stats = Stats { hunger: start, happiness: start, health: 100.0 };

        pet.advance_time(t0 + Duration::seconds(secs as i64), &rules);

        let expected = (start - rules.decay_per_sec * secs as f32).max(0.0);
        prop_assert!((pet.stats.hunger - expected).abs() < 1e-2);
        prop_assert!((pet.stats.happiness - expected).abs() < 1e-2);
        prop_assert_eq!(pet.age_days as i64, secs as i64 / rules.day_length_secs);
    }
}
