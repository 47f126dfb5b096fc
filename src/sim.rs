use crate::error::{Error, Result};
use crate::model::{PetState, RandomEvent, Rules, Stat, EVENTS};
use chrono::{DateTime, Duration as ChronoDuration, Utc};
use rand::Rng;
use serde::Serialize;
use std::collections::BTreeMap;
use std::fmt;
use std::str::FromStr;
use tracing::{debug, info};

#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum Action {
    Feed,
    Play,
    Rest,
    Train,
    Explore,
    Meditate,
    Groom,
    Evolve,
}

impl Action {
    pub const ALL: [Action; 8] = [
        Action::Feed,
        Action::Play,
        Action::Rest,
        Action::Train,
        Action::Explore,
        Action::Meditate,
        Action::Groom,
        Action::Evolve,
    ];

    pub fn as_str(self) -> &'static str {
        match self {
            Action::Feed => "feed",
            Action::Play => "play",
            Action::Rest => "rest",
            Action::Train => "train",
            Action::Explore => "explore",
            Action::Meditate => "meditate",
            Action::Groom => "groom",
            Action::Evolve => "evolve",
        }
    }
}

impl fmt::Display for Action {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for Action {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self> {
        let wanted = s.trim().to_ascii_lowercase();
        Action::ALL
            .into_iter()
            .find(|a| a.as_str() == wanted)
            .ok_or_else(|| Error::UnknownAction(s.to_string()))
    }
}

/// A uniform integer draw from `lo..=hi` added to one stat.
#[derive(Clone, Copy, Debug)]
struct Bump {
    stat: Stat,
    lo: i32,
    hi: i32,
}

const fn bump(stat: Stat, lo: i32, hi: i32) -> Bump {
    Bump { stat, lo, hi }
}

const FEED: &[Bump] = &[bump(Stat::Hunger, 15, 25), bump(Stat::Health, 5, 10)];
const PLAY: &[Bump] = &[bump(Stat::Happiness, 15, 25), bump(Stat::Hunger, -10, -5)];
const REST: &[Bump] = &[bump(Stat::Health, 20, 30), bump(Stat::Happiness, 5, 10)];
const TRAIN: &[Bump] = &[
    bump(Stat::Health, 12, 18),
    bump(Stat::Happiness, 10, 15),
    bump(Stat::Hunger, -20, -15),
];
const MEDITATE: &[Bump] = &[
    bump(Stat::Health, 10, 15),
    bump(Stat::Happiness, 10, 15),
    bump(Stat::Hunger, 8, 12),
];
const GROOM: &[Bump] = &[bump(Stat::Happiness, 12, 18), bump(Stat::Health, 8, 12)];

const EXPLORE_GREAT: &[Bump] = &[
    bump(Stat::Happiness, 20, 30),
    bump(Stat::Hunger, 10, 20),
    bump(Stat::Health, 5, 15),
];
const EXPLORE_GOOD: &[Bump] = &[bump(Stat::Happiness, 15, 20), bump(Stat::Hunger, 5, 10)];
const EXPLORE_NEUTRAL: &[Bump] = &[bump(Stat::Happiness, 5, 10), bump(Stat::Hunger, -10, -5)];
const EXPLORE_BAD: &[Bump] = &[
    bump(Stat::Happiness, -15, -10),
    bump(Stat::Health, -15, -10),
    bump(Stat::Hunger, -10, -5),
];

pub const FEED_LINES: &[&str] = &[
    "{name} happily munches on spiritual energy! ✨",
    "{name} glows brighter as it feeds! 🌟",
    "{name} feels nourished and content! 💫",
];
pub const PLAY_LINES: &[&str] = &[
    "{name} playfully dances around you! 💃",
    "{name} sparkles with joy! ✨😊",
    "{name} does a happy spin! 🌀",
    "You share a magical moment with {name}! 🎭",
];
pub const REST_LINES: &[&str] = &[
    "{name} curls up and rests peacefully... 😴",
    "{name} takes a rejuvenating nap! 💤",
    "{name} meditates and restores energy! 🧘",
];
pub const TRAIN_LINES: &[&str] = &[
    "{name} practices spiritual techniques! 🥋",
    "{name} trains diligently! 💪",
    "{name} masters a new skill! 🎯",
];
pub const MEDITATE_LINES: &[&str] = &[
    "{name} enters a meditative state... 🧘✨",
    "{name} connects with cosmic energy! 🌌",
    "{name} achieves inner peace! ☯️",
];
pub const GROOM_LINES: &[&str] = &[
    "{name} enjoys being groomed! ✨🪮",
    "You tend to {name}'s form! 🌟",
    "{name} feels pampered! 💕",
];

/// Flavor lines an applied action may answer with. Explore and evolve
/// have outcome-specific messages instead.
pub fn flavor_lines(action: Action) -> &'static [&'static str] {
    match action {
        Action::Feed => FEED_LINES,
        Action::Play => PLAY_LINES,
        Action::Rest => REST_LINES,
        Action::Train => TRAIN_LINES,
        Action::Meditate => MEDITATE_LINES,
        Action::Groom => GROOM_LINES,
        Action::Explore | Action::Evolve => &[],
    }
}

pub fn fill(template: &str, name: &str) -> String {
    template.replace("{name}", name)
}

#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum ExploreOutcome {
    Great,
    Good,
    Neutral,
    Bad,
}

impl ExploreOutcome {
    pub const ALL: [ExploreOutcome; 4] = [
        ExploreOutcome::Great,
        ExploreOutcome::Good,
        ExploreOutcome::Neutral,
        ExploreOutcome::Bad,
    ];

    fn effects(self) -> &'static [Bump] {
        match self {
            ExploreOutcome::Great => EXPLORE_GREAT,
            ExploreOutcome::Good => EXPLORE_GOOD,
            ExploreOutcome::Neutral => EXPLORE_NEUTRAL,
            ExploreOutcome::Bad => EXPLORE_BAD,
        }
    }

    pub fn message(self) -> &'static str {
        match self {
            ExploreOutcome::Great => "{name} discovers a magical paradise! 🌺✨",
            ExploreOutcome::Good => "{name} has a pleasant adventure! 🗺️",
            ExploreOutcome::Neutral => "{name} wanders around safely. 🚶",
            ExploreOutcome::Bad => "{name} gets lost and returns tired... 😰",
        }
    }
}

fn saturation_message(action: Action, pet: &PetState) -> Option<&'static str> {
    let s = &pet.stats;
    match action {
        Action::Feed if s.hunger >= 95.0 => Some("{name} is already full! 🍽️"),
        Action::Play if s.happiness >= 95.0 => Some("{name} is already very happy! 😊"),
        Action::Rest if s.health >= 95.0 => Some("{name} is already well-rested! 😴"),
        Action::Groom if s.happiness >= 90.0 && s.health >= 90.0 => {
            Some("{name} is already pristine! ✨")
        }
        _ => None,
    }
}

#[derive(Clone, Debug, PartialEq, Serialize)]
pub struct ActionOutcome {
    /// False when a guard or gate turned the action into a message only.
    pub applied: bool,
    pub message: String,
}

impl ActionOutcome {
    fn applied(message: String) -> Self {
        Self {
            applied: true,
            message,
        }
    }

    fn declined(message: String) -> Self {
        Self {
            applied: false,
            message,
        }
    }
}

#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct Advance {
    pub days_passed: u32,
    pub died: bool,
}

#[derive(Clone, Debug, PartialEq, Serialize)]
pub struct EventReport {
    pub name: &'static str,
    pub message: String,
    pub effects: BTreeMap<Stat, f32>,
    pub emoji: &'static str,
}

impl EventReport {
    fn new(event: &RandomEvent, pet_name: &str) -> Self {
        Self {
            name: event.name,
            message: event.message_for(pet_name),
            effects: event.effects.iter().copied().collect(),
            emoji: event.emoji,
        }
    }
}

fn secs_between(then: DateTime<Utc>, now: DateTime<Utc>) -> f32 {
    (now - then).num_milliseconds().max(0) as f32 / 1000.0
}

impl PetState {
    /// Applies decay, health cross-effects, the death check and day ticks
    /// for the time since the previous call.
    pub fn advance_time(&mut self, now: DateTime<Utc>, rules: &Rules) -> Advance {
        let mut out = Advance::default();
        if !self.is_alive {
            return out;
        }

        let dt = secs_between(self.last_stats_update_at, now);
        self.last_stats_update_at = self.last_stats_update_at.max(now);
        self.time_alive_secs += dt as f64;

        let decay = rules.decay_per_sec * dt;
        self.stats.bump(Stat::Hunger, -decay);
        self.stats.bump(Stat::Happiness, -decay);

        let s = self.stats;
        if s.hunger < rules.neglect_below || s.happiness < rules.neglect_below {
            self.stats.bump(Stat::Health, -rules.health_drain_per_sec * dt);
        } else if s.hunger > rules.thrive_above && s.happiness > rules.thrive_above {
            self.stats.bump(Stat::Health, rules.health_regen_per_sec * dt);
        }

        if self.stats.any_depleted() {
            self.is_alive = false;
            out.died = true;
            info!(
                pet = %self.name,
                age_days = self.age_days,
                hunger = self.stats.hunger,
                happiness = self.stats.happiness,
                health = self.stats.health,
                "pet has faded"
            );
        }

        let day_ms = rules.day_length_secs.max(1) * 1000;
        let since_ms = (now - self.last_day_tick_at).num_milliseconds();
        if since_ms >= day_ms {
            let days = since_ms / day_ms;
            self.age_days = self
                .age_days
                .saturating_add(u32::try_from(days).unwrap_or(u32::MAX));
            self.last_day_tick_at += ChronoDuration::milliseconds(days * day_ms);
            out.days_passed = u32::try_from(days).unwrap_or(u32::MAX);
            debug!(pet = %self.name, days, age_days = self.age_days, "day tick");
        }

        out
    }

    /// Rolls for a random event once per check interval. The report is only
    /// handed back to the caller; nothing about it is kept besides the counter.
    pub fn roll_random_event<R: Rng + ?Sized>(
        &mut self,
        now: DateTime<Utc>,
        rules: &Rules,
        rng: &mut R,
    ) -> Option<EventReport> {
        if !self.is_alive {
            return None;
        }
        if now - self.last_event_check_at < ChronoDuration::seconds(rules.event_interval_secs) {
            return None;
        }
        self.last_event_check_at = now;

        if !rng.gen_bool(rules.event_chance.clamp(0.0, 1.0)) {
            return None;
        }
        let event = &EVENTS[rng.gen_range(0..EVENTS.len())];
        for &(stat, delta) in event.effects {
            self.stats.bump(stat, delta);
        }
        self.events_experienced += 1;
        info!(pet = %self.name, event = event.name, "random event");
        Some(EventReport::new(event, &self.name))
    }

    pub fn perform<R: Rng + ?Sized>(
        &mut self,
        action: Action,
        now: DateTime<Utc>,
        rules: &Rules,
        rng: &mut R,
    ) -> Result<ActionOutcome> {
        if !self.is_alive {
            return Err(Error::PetDeceased(self.name.clone()));
        }
        self.advance_time(now, rules);
        if !self.is_alive {
            return Err(Error::PetDeceased(self.name.clone()));
        }

        let outcome = match action {
            Action::Evolve => self.evolve(rules),
            Action::Explore => {
                let pick = ExploreOutcome::ALL[rng.gen_range(0..ExploreOutcome::ALL.len())];
                self.apply_bumps(pick.effects(), rng);
                self.interactions += 1;
                ActionOutcome::applied(fill(pick.message(), &self.name))
            }
            _ => match saturation_message(action, self) {
                Some(msg) => ActionOutcome::declined(fill(msg, &self.name)),
                None => {
                    let effects: &[Bump] = match action {
                        Action::Feed => FEED,
                        Action::Play => PLAY,
                        Action::Rest => REST,
                        Action::Train => TRAIN,
                        Action::Meditate => MEDITATE,
                        Action::Groom => GROOM,
                        Action::Explore | Action::Evolve => &[],
                    };
                    self.apply_bumps(effects, rng);
                    self.interactions += 1;
                    let lines = flavor_lines(action);
                    ActionOutcome::applied(fill(lines[rng.gen_range(0..lines.len())], &self.name))
                }
            },
        };

        debug!(
            pet = %self.name,
            %action,
            applied = outcome.applied,
            hunger = self.stats.hunger,
            happiness = self.stats.happiness,
            health = self.stats.health,
            "action resolved"
        );
        Ok(outcome)
    }

    fn apply_bumps<R: Rng + ?Sized>(&mut self, bumps: &[Bump], rng: &mut R) {
        for b in bumps {
            let delta = rng.gen_range(b.lo..=b.hi);
            self.stats.bump(b.stat, delta as f32);
        }
    }

    fn evolve(&mut self, rules: &Rules) -> ActionOutcome {
        let Some(next) = self.next_stage() else {
            return ActionOutcome::declined(format!(
                "🌟 {} is already at maximum evolution!",
                self.name
            ));
        };
        if self.age_days < next.days_required {
            return ActionOutcome::declined(format!(
                "❌ {} needs {} more day(s) of care to evolve!",
                self.name,
                next.days_required - self.age_days
            ));
        }
        if !self.stats.all_at_least(rules.evolve_min_stat) {
            return ActionOutcome::declined(format!(
                "❌ {} needs better care to evolve! (All stats must be at least {:.0})",
                self.name, rules.evolve_min_stat
            ));
        }

        let old = self.stage();
        self.evolution_stage += 1;
        for stat in Stat::ALL {
            self.stats.bump(stat, rules.evolve_bonus);
        }
        info!(pet = %self.name, from = old.name, to = next.name, "evolved");
        ActionOutcome::applied(format!(
            "✨ EVOLUTION! ✨\n{} → {}!\n{} {} has evolved!",
            old.name, next.name, next.emoji, self.name
        ))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::model::{Stats, FINAL_STAGE};
    use chrono::TimeZone;
    use rand::{rngs::StdRng, SeedableRng};

    fn t0() -> DateTime<Utc> {
        Utc.with_ymd_and_hms(2024, 3, 1, 12, 0, 0).unwrap()
    }

    fn pet_with(hunger: f32, happiness: f32, health: f32) -> PetState {
        let mut pet = PetState::new("Kiko", t0(), &Rules::default());
        pet.stats = Stats {
            hunger,
            happiness,
            health,
        };
        pet
    }

    fn close(a: f32, b: f32) -> bool {
        (a - b).abs() < 1e-3
    }

    #[test]
    fn feed_fresh_pet() {
        let rules = Rules::default();
        let mut pet = PetState::new("Kiko", t0(), &rules);
        let mut rng = StdRng::seed_from_u64(7);

        let out = pet.perform(Action::Feed, t0(), &rules, &mut rng).unwrap();

        assert!(out.applied);
        assert!((65.0..=75.0).contains(&pet.stats.hunger));
        assert!((55.0..=60.0).contains(&pet.stats.health));
        assert_eq!(pet.stats.happiness, 50.0);
        assert_eq!(pet.interactions, 1);
        assert!(pet.is_alive);
        let lines: Vec<String> = FEED_LINES.iter().map(|l| fill(l, "Kiko")).collect();
        assert!(lines.contains(&out.message));
    }

    #[test]
    fn neglected_pet_decays_then_dies() {
        let rules = Rules::default();
        let mut pet = pet_with(10.0, 10.0, 5.0);

        let adv = pet.advance_time(t0() + ChronoDuration::seconds(10), &rules);
        assert!(!adv.died);
        assert!(close(pet.stats.hunger, 7.0));
        assert!(close(pet.stats.happiness, 7.0));
        assert!(close(pet.stats.health, 4.0));
        assert!(pet.is_alive);

        let adv = pet.advance_time(t0() + ChronoDuration::seconds(40), &rules);
        assert!(adv.died);
        assert!(!pet.is_alive);
        assert_eq!(pet.stats.hunger, 0.0);

        let frozen = pet.clone();
        let later = t0() + ChronoDuration::seconds(400);
        assert_eq!(pet.advance_time(later, &rules), Advance::default());
        let mut rng = StdRng::seed_from_u64(1);
        let err = pet.perform(Action::Feed, later, &rules, &mut rng).unwrap_err();
        assert_eq!(err, Error::PetDeceased("Kiko".into()));
        assert_eq!(pet, frozen);
    }

    #[test]
    fn action_that_finds_pet_dead_after_decay_fails() {
        let rules = Rules::default();
        let mut pet = pet_with(2.0, 80.0, 80.0);
        let mut rng = StdRng::seed_from_u64(2);
        let err = pet
            .perform(Action::Feed, t0() + ChronoDuration::seconds(20), &rules, &mut rng)
            .unwrap_err();
        assert!(matches!(err, Error::PetDeceased(_)));
        assert_eq!(pet.interactions, 0);
    }

    #[test]
    fn evolve_too_young() {
        let rules = Rules::default();
        let mut pet = pet_with(80.0, 80.0, 80.0);
        let mut rng = StdRng::seed_from_u64(3);
        let out = pet.perform(Action::Evolve, t0(), &rules, &mut rng).unwrap();
        assert!(!out.applied);
        assert!(out.message.contains("1 more day"));
        assert_eq!(pet.evolution_stage, 0);
        assert_eq!(pet.stats, Stats::uniform(80.0));
    }

    #[test]
    fn evolve_succeeds_and_boosts() {
        let rules = Rules::default();
        let mut pet = pet_with(60.0, 60.0, 60.0);
        pet.age_days = 1;
        let mut rng = StdRng::seed_from_u64(4);
        let out = pet.perform(Action::Evolve, t0(), &rules, &mut rng).unwrap();
        assert!(out.applied);
        assert_eq!(pet.evolution_stage, 1);
        assert_eq!(pet.stats, Stats::uniform(80.0));
        assert_eq!(pet.interactions, 0);

        let mut pet = pet_with(90.0, 60.0, 85.0);
        pet.age_days = 1;
        pet.perform(Action::Evolve, t0(), &rules, &mut rng).unwrap();
        assert_eq!(pet.stats.hunger, 100.0);
        assert_eq!(pet.stats.happiness, 80.0);
        assert_eq!(pet.stats.health, 100.0);
    }

    #[test]
    fn evolve_needs_healthy_stats() {
        let rules = Rules::default();
        let mut pet = pet_with(80.0, 49.0, 80.0);
        pet.age_days = 3;
        let mut rng = StdRng::seed_from_u64(5);
        let out = pet.perform(Action::Evolve, t0(), &rules, &mut rng).unwrap();
        assert!(!out.applied);
        assert!(out.message.contains("better care"));
        assert_eq!(pet.evolution_stage, 0);
    }

    #[test]
    fn evolve_at_final_stage_checked_first() {
        let rules = Rules::default();
        let mut pet = pet_with(10.0, 80.0, 80.0);
        pet.evolution_stage = FINAL_STAGE;
        let mut rng = StdRng::seed_from_u64(6);
        let out = pet.perform(Action::Evolve, t0(), &rules, &mut rng).unwrap();
        assert!(!out.applied);
        assert!(out.message.contains("maximum evolution"));
        assert_eq!(pet.evolution_stage, FINAL_STAGE);
    }

    #[test]
    fn unknown_action_is_rejected() {
        let err = "dance".parse::<Action>().unwrap_err();
        assert_eq!(err, Error::UnknownAction("dance".into()));
        assert_eq!(" Feed ".parse::<Action>().unwrap(), Action::Feed);
        for a in Action::ALL {
            assert_eq!(a.as_str().parse::<Action>().unwrap(), a);
        }
    }

    #[test]
    fn saturated_actions_change_nothing() {
        let rules = Rules::default();
        let mut rng = StdRng::seed_from_u64(8);
        let cases = [
            (Action::Feed, pet_with(96.0, 50.0, 50.0)),
            (Action::Play, pet_with(50.0, 95.0, 50.0)),
            (Action::Rest, pet_with(50.0, 50.0, 99.0)),
            (Action::Groom, pet_with(50.0, 90.0, 90.0)),
        ];
        for (action, mut pet) in cases {
            let before = pet.clone();
            let out = pet.perform(action, t0(), &rules, &mut rng).unwrap();
            assert!(!out.applied, "{action} should be declined");
            assert!(out.message.contains("already"));
            assert_eq!(pet, before);
        }
    }

    #[test]
    fn groom_needs_both_stats_high_to_saturate() {
        let rules = Rules::default();
        let mut pet = pet_with(50.0, 95.0, 80.0);
        let mut rng = StdRng::seed_from_u64(9);
        let out = pet.perform(Action::Groom, t0(), &rules, &mut rng).unwrap();
        assert!(out.applied);
        assert_eq!(pet.stats.happiness, 100.0);
        assert!((88.0..=92.0).contains(&pet.stats.health));
        assert_eq!(pet.interactions, 1);
    }

    #[test]
    fn play_train_rest_meditate_ranges() {
        let rules = Rules::default();
        let mut rng = StdRng::seed_from_u64(10);

        let mut pet = pet_with(50.0, 50.0, 50.0);
        pet.perform(Action::Play, t0(), &rules, &mut rng).unwrap();
        assert!((65.0..=75.0).contains(&pet.stats.happiness));
        assert!((40.0..=45.0).contains(&pet.stats.hunger));

        let mut pet = pet_with(10.0, 50.0, 50.0);
        pet.perform(Action::Train, t0(), &rules, &mut rng).unwrap();
        assert_eq!(pet.stats.hunger, 0.0);
        assert!((62.0..=68.0).contains(&pet.stats.health));
        assert!((60.0..=65.0).contains(&pet.stats.happiness));

        let mut pet = pet_with(50.0, 50.0, 50.0);
        pet.perform(Action::Rest, t0(), &rules, &mut rng).unwrap();
        assert!((70.0..=80.0).contains(&pet.stats.health));
        assert!((55.0..=60.0).contains(&pet.stats.happiness));

        let mut pet = pet_with(95.0, 50.0, 50.0);
        pet.perform(Action::Meditate, t0(), &rules, &mut rng).unwrap();
        assert_eq!(pet.stats.hunger, 100.0);
        assert!((60.0..=65.0).contains(&pet.stats.health));
        assert_eq!(pet.interactions, 1);
    }

    #[test]
    fn explore_always_counts_and_stays_in_bounds() {
        let rules = Rules::default();
        let messages: Vec<String> = ExploreOutcome::ALL
            .iter()
            .map(|o| fill(o.message(), "Kiko"))
            .collect();
        for seed in 0..64 {
            let mut rng = StdRng::seed_from_u64(seed);
            let mut pet = pet_with(95.0, 95.0, 12.0);
            let out = pet.perform(Action::Explore, t0(), &rules, &mut rng).unwrap();
            assert!(out.applied);
            assert!(messages.contains(&out.message));
            assert_eq!(pet.interactions, 1);
            for stat in Stat::ALL {
                assert!((0.0..=100.0).contains(&pet.stats.get(stat)));
            }
        }
    }

    #[test]
    fn health_recovers_when_thriving() {
        let rules = Rules::default();
        let mut pet = pet_with(90.0, 90.0, 50.0);
        pet.advance_time(t0() + ChronoDuration::seconds(10), &rules);
        assert!(close(pet.stats.hunger, 87.0));
        assert!(close(pet.stats.health, 50.5));
    }

    #[test]
    fn health_untouched_in_the_middle_band() {
        let rules = Rules::default();
        let mut pet = pet_with(60.0, 60.0, 50.0);
        pet.advance_time(t0() + ChronoDuration::seconds(10), &rules);
        assert_eq!(pet.stats.health, 50.0);
    }

    #[test]
    fn day_ticks_keep_the_remainder() {
        let rules = Rules::default();
        let mut pet = pet_with(100.0, 100.0, 100.0);
        for step in 1..=3 {
            pet.advance_time(t0() + ChronoDuration::seconds(20 * step), &rules);
        }
        assert_eq!(pet.age_days, 2);
        assert_eq!(pet.last_day_tick_at, t0() + ChronoDuration::seconds(60));

        let adv = pet.advance_time(t0() + ChronoDuration::seconds(155), &rules);
        assert_eq!(adv.days_passed, 3);
        assert_eq!(pet.age_days, 5);
        assert_eq!(pet.last_day_tick_at, t0() + ChronoDuration::seconds(150));
    }

    #[test]
    fn clock_going_backwards_is_ignored() {
        let rules = Rules::default();
        let mut pet = pet_with(50.0, 50.0, 50.0);
        pet.advance_time(t0() - ChronoDuration::seconds(30), &rules);
        assert_eq!(pet.stats, Stats::uniform(50.0));
        assert_eq!(pet.last_stats_update_at, t0());
        assert_eq!(pet.age_days, 0);
    }

    #[test]
    fn random_event_respects_interval() {
        let rules = Rules {
            event_chance: 1.0,
            ..Rules::default()
        };
        let mut rng = StdRng::seed_from_u64(11);
        let mut pet = pet_with(50.0, 50.0, 50.0);

        assert!(pet
            .roll_random_event(t0() + ChronoDuration::seconds(59), &rules, &mut rng)
            .is_none());
        assert_eq!(pet.events_experienced, 0);

        let at = t0() + ChronoDuration::seconds(60);
        let report = pet.roll_random_event(at, &rules, &mut rng).unwrap();
        assert_eq!(pet.events_experienced, 1);
        assert_eq!(pet.last_event_check_at, at);
        assert!(report.message.contains("Kiko"));
        assert!(EVENTS.iter().any(|e| e.name == report.name));

        assert!(pet.roll_random_event(at, &rules, &mut rng).is_none());
    }

    #[test]
    fn missed_event_roll_still_resets_timer() {
        let rules = Rules {
            event_chance: 0.0,
            ..Rules::default()
        };
        let mut rng = StdRng::seed_from_u64(12);
        let mut pet = pet_with(50.0, 50.0, 50.0);
        let at = t0() + ChronoDuration::seconds(75);
        assert!(pet.roll_random_event(at, &rules, &mut rng).is_none());
        assert_eq!(pet.last_event_check_at, at);
        assert_eq!(pet.stats, Stats::uniform(50.0));
    }
}
