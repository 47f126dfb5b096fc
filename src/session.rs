use crate::clock::Clock;
use crate::error::Result;
use crate::model::{EvolutionStage, PetState, Rules};
use crate::sim::{Action, Advance, EventReport};
use rand::rngs::StdRng;
use serde::Serialize;
use std::sync::Arc;
use tracing::info;

#[derive(Clone, Debug, Serialize)]
pub struct Snapshot {
    pub state: PetState,
    pub stage: &'static EvolutionStage,
    pub victory: bool,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub event: Option<EventReport>,
    #[serde(skip)]
    pub advance: Advance,
}

#[derive(Clone, Debug, Serialize)]
pub struct ActionResult {
    pub success: bool,
    pub applied: bool,
    pub message: String,
    pub state: PetState,
    pub stage: &'static EvolutionStage,
    #[serde(skip)]
    pub advance: Advance,
}

/// One live pet plus everything needed to move it forward.
pub struct Session {
    rules: Rules,
    clock: Arc<dyn Clock>,
    rng: StdRng,
    pet: PetState,
}

impl Session {
    pub fn new(name: &str, rules: Rules, clock: Arc<dyn Clock>, rng: StdRng) -> Self {
        let pet = PetState::new(name, clock.now(), &rules);
        Self {
            rules,
            clock,
            rng,
            pet,
        }
    }

    pub fn rules(&self) -> &Rules {
        &self.rules
    }

    /// Read-only view without advancing time.
    pub fn pet(&self) -> &PetState {
        &self.pet
    }

    #[cfg(test)]
    pub(crate) fn pet_mut(&mut self) -> &mut PetState {
        &mut self.pet
    }

    /// Replaces the current pet with a fresh one.
    pub fn create_pet(&mut self, name: &str) -> &PetState {
        self.pet = PetState::new(name, self.clock.now(), &self.rules);
        info!(pet = %self.pet.name, "new pet hatched");
        &self.pet
    }

    pub fn get_state(&mut self) -> Snapshot {
        let now = self.clock.now();
        let advance = self.pet.advance_time(now, &self.rules);
        let event = self.pet.roll_random_event(now, &self.rules, &mut self.rng);
        Snapshot {
            state: self.pet.clone(),
            stage: self.pet.stage(),
            victory: self.pet.has_won(&self.rules),
            event,
            advance,
        }
    }

    pub fn perform_action(&mut self, action: Action) -> Result<ActionResult> {
        let now = self.clock.now();
        let days_before = self.pet.age_days;
        let was_alive = self.pet.is_alive;
        let outcome = self.pet.perform(action, now, &self.rules, &mut self.rng)?;
        Ok(ActionResult {
            success: true,
            applied: outcome.applied,
            message: outcome.message,
            state: self.pet.clone(),
            stage: self.pet.stage(),
            advance: Advance {
                days_passed: self.pet.age_days - days_before,
                died: was_alive && !self.pet.is_alive,
            },
        })
    }

    /// Parses the action name first, so an unknown name never touches state.
    pub fn perform_named(&mut self, name: &str) -> Result<ActionResult> {
        let action: Action = name.parse()?;
        self.perform_action(action)
    }
}
