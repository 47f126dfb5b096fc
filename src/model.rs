use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

pub const STAT_MIN: f32 = 0.0;
pub const STAT_MAX: f32 = 100.0;

#[derive(Clone, Copy, Debug, Serialize, Deserialize, PartialEq, Eq, PartialOrd, Ord, Hash)]
#[serde(rename_all = "snake_case")]
pub enum Stat {
    Hunger,
    Happiness,
    Health,
}

impl Stat {
    pub const ALL: [Stat; 3] = [Stat::Hunger, Stat::Happiness, Stat::Health];
}

#[derive(Clone, Copy, Debug, Serialize, Deserialize, PartialEq)]
pub struct Stats {
    pub hunger: f32,
    pub happiness: f32,
    pub health: f32,
}

impl Stats {
    pub fn uniform(v: f32) -> Self {
        Self {
            hunger: v,
            happiness: v,
            health: v,
        }
    }

    pub fn get(&self, stat: Stat) -> f32 {
        match stat {
            Stat::Hunger => self.hunger,
            Stat::Happiness => self.happiness,
            Stat::Health => self.health,
        }
    }

    fn slot(&mut self, stat: Stat) -> &mut f32 {
        match stat {
            Stat::Hunger => &mut self.hunger,
            Stat::Happiness => &mut self.happiness,
            Stat::Health => &mut self.health,
        }
    }

    /// Adds `delta` to one stat and clamps the result to [0, 100].
    pub fn bump(&mut self, stat: Stat, delta: f32) {
        let v = self.slot(stat);
        *v = (*v + delta).clamp(STAT_MIN, STAT_MAX);
    }

    pub fn any_depleted(&self) -> bool {
        Stat::ALL.iter().any(|&s| self.get(s) <= STAT_MIN)
    }

    pub fn all_at_least(&self, floor: f32) -> bool {
        Stat::ALL.iter().all(|&s| self.get(s) >= floor)
    }

    pub fn all_above(&self, floor: f32) -> bool {
        Stat::ALL.iter().all(|&s| self.get(s) > floor)
    }
}

#[derive(Clone, Copy, Debug, Serialize, PartialEq, Eq)]
pub struct EvolutionStage {
    pub name: &'static str,
    pub days_required: u32,
    pub emoji: &'static str,
}

pub const STAGES: [EvolutionStage; 5] = [
    EvolutionStage {
        name: "Egg",
        days_required: 0,
        emoji: "🥚",
    },
    EvolutionStage {
        name: "Hatchling",
        days_required: 1,
        emoji: "🐣",
    },
    EvolutionStage {
        name: "Young Spirit",
        days_required: 3,
        emoji: "🦊",
    },
    EvolutionStage {
        name: "Mature Spirit",
        days_required: 5,
        emoji: "🦅",
    },
    EvolutionStage {
        name: "Ancient Spirit",
        days_required: 8,
        emoji: "🐉",
    },
];

pub const FINAL_STAGE: usize = STAGES.len() - 1;

#[derive(Clone, Copy, Debug, Serialize, PartialEq)]
pub struct RandomEvent {
    pub name: &'static str,
    /// `{name}` is replaced with the pet's name.
    pub message: &'static str,
    pub effects: &'static [(Stat, f32)],
    pub emoji: &'static str,
}

impl RandomEvent {
    pub fn message_for(&self, pet_name: &str) -> String {
        self.message.replace("{name}", pet_name)
    }
}

pub const EVENTS: [RandomEvent; 9] = [
    RandomEvent {
        name: "Shiny Stone",
        message: "✨ {name} found a shiny stone and is delighted!",
        effects: &[(Stat::Happiness, 15.0), (Stat::Hunger, -5.0)],
        emoji: "💎",
    },
    RandomEvent {
        name: "Gentle Rain",
        message: "🌧️ A gentle rain falls, refreshing {name}!",
        effects: &[(Stat::Health, 10.0), (Stat::Happiness, 10.0)],
        emoji: "🌧️",
    },
    RandomEvent {
        name: "Wild Spirit Visit",
        message: "👻 A wild spirit visits and plays with {name}!",
        effects: &[(Stat::Happiness, 20.0), (Stat::Hunger, -10.0)],
        emoji: "👻",
    },
    RandomEvent {
        name: "Mysterious Berry",
        message: "🫐 {name} discovers a mysterious berry bush!",
        effects: &[(Stat::Hunger, 15.0), (Stat::Health, 5.0)],
        emoji: "🫐",
    },
    RandomEvent {
        name: "Dark Cloud",
        message: "☁️ A dark cloud passes overhead, making {name} uneasy...",
        effects: &[(Stat::Happiness, -10.0), (Stat::Health, -5.0)],
        emoji: "☁️",
    },
    RandomEvent {
        name: "Shooting Star",
        message: "⭐ {name} sees a shooting star and makes a wish!",
        effects: &[(Stat::Happiness, 25.0), (Stat::Health, 10.0)],
        emoji: "⭐",
    },
    RandomEvent {
        name: "Ancient Whisper",
        message: "🌀 Ancient whispers grant {name} wisdom and energy!",
        effects: &[
            (Stat::Health, 15.0),
            (Stat::Happiness, 15.0),
            (Stat::Hunger, 10.0),
        ],
        emoji: "🌀",
    },
    RandomEvent {
        name: "Spirit Feast",
        message: "🍱 {name} stumbles upon a spirit feast!",
        effects: &[(Stat::Hunger, 25.0), (Stat::Happiness, 15.0)],
        emoji: "🍱",
    },
    RandomEvent {
        name: "Moonbeam",
        message: "🌙 A moonbeam illuminates {name}, restoring vitality!",
        effects: &[(Stat::Health, 20.0), (Stat::Happiness, 10.0)],
        emoji: "🌙",
    },
];

/// Tuning constants for decay, ageing and events.
#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct Rules {
    pub initial_stat: f32,
    pub decay_per_sec: f32,
    pub health_drain_per_sec: f32,
    pub health_regen_per_sec: f32,
    pub neglect_below: f32,
    pub thrive_above: f32,
    pub day_length_secs: i64,
    pub event_interval_secs: i64,
    pub event_chance: f64,
    pub evolve_min_stat: f32,
    pub evolve_bonus: f32,
    pub victory_above: f32,
}

impl Default for Rules {
    fn default() -> Self {
        Self {
            initial_stat: 50.0,
            decay_per_sec: 0.3,
            health_drain_per_sec: 0.1,
            health_regen_per_sec: 0.05,
            neglect_below: 30.0,
            thrive_above: 70.0,
            day_length_secs: 30,
            event_interval_secs: 60,
            event_chance: 0.20,
            evolve_min_stat: 50.0,
            evolve_bonus: 20.0,
            victory_above: 50.0,
        }
    }
}

#[derive(Clone, Debug, Serialize, Deserialize, PartialEq)]
pub struct PetState {
    pub name: String,
    #[serde(flatten)]
    pub stats: Stats,
    pub age_days: u32,
    pub evolution_stage: usize,
    pub interactions: u32,
    pub events_experienced: u32,
    pub is_alive: bool,
    pub time_alive_secs: f64,
    pub created_at: DateTime<Utc>,
    pub last_stats_update_at: DateTime<Utc>,
    pub last_day_tick_at: DateTime<Utc>,
    pub last_event_check_at: DateTime<Utc>,
}

impl PetState {
    pub fn new(name: &str, now: DateTime<Utc>, rules: &Rules) -> Self {
        Self {
            name: name.to_string(),
            stats: Stats::uniform(rules.initial_stat),
            age_days: 0,
            evolution_stage: 0,
            interactions: 0,
            events_experienced: 0,
            is_alive: true,
            time_alive_secs: 0.0,
            created_at: now,
            last_stats_update_at: now,
            last_day_tick_at: now,
            last_event_check_at: now,
        }
    }

    pub fn stage(&self) -> &'static EvolutionStage {
        &STAGES[self.evolution_stage.min(FINAL_STAGE)]
    }

    pub fn next_stage(&self) -> Option<&'static EvolutionStage> {
        STAGES.get(self.evolution_stage + 1)
    }

    pub fn is_final_stage(&self) -> bool {
        self.evolution_stage >= FINAL_STAGE
    }

    /// Days still missing before the next stage's age gate opens.
    pub fn days_until_next_stage(&self) -> Option<u32> {
        self.next_stage()
            .map(|s| s.days_required.saturating_sub(self.age_days))
    }

    pub fn has_won(&self, rules: &Rules) -> bool {
        self.is_alive && self.is_final_stage() && self.stats.all_above(rules.victory_above)
    }
}
