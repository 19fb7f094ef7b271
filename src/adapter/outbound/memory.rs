//! In-memory planner journal.

use parking_lot::Mutex;

use crate::domain::{claim::Claim, ingredient::Ingredient, recipe::Recipe, store::StoreRecord};
use crate::error::Result;
use crate::port::outbound::journal::{PlannerJournal, PlannerSnapshot};

/// Journal that keeps records in process memory. Nothing survives a restart.
#[derive(Debug, Default)]
pub struct MemoryJournal {
    state: Mutex<PlannerSnapshot>,
}

impl MemoryJournal {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }
}

fn upsert<T>(records: &mut Vec<T>, record: T, same: impl Fn(&T, &T) -> bool) {
    match records.iter_mut().find(|r| same(r, &record)) {
        Some(existing) => *existing = record,
        None => records.push(record),
    }
}

impl PlannerJournal for MemoryJournal {
    fn record_ingredient(&self, ingredient: &Ingredient) -> Result<()> {
        upsert(&mut self.state.lock().ingredients, ingredient.clone(), |a, b| {
            a.id == b.id
        });
        Ok(())
    }

    fn record_store(&self, store: &StoreRecord) -> Result<()> {
        let mut state = self.state.lock();
        upsert(&mut state.stores, store.clone(), |a, b| a.id == b.id);
        state.stores.sort_by_key(|s| s.sequence);
        Ok(())
    }

    fn record_recipe(&self, recipe: &Recipe) -> Result<()> {
        let mut state = self.state.lock();
        upsert(&mut state.recipes, recipe.clone(), |a, b| a.id == b.id);
        state.recipes.sort_by_key(|r| r.sequence);
        Ok(())
    }

    fn record_claims(&self, claims: &[Claim]) -> Result<()> {
        let mut state = self.state.lock();
        for claim in claims {
            upsert(&mut state.claims, claim.clone(), |a, b| a.id() == b.id());
        }
        Ok(())
    }

    fn load(&self) -> Result<PlannerSnapshot> {
        let mut snapshot = self.state.lock().clone();
        snapshot
            .ingredients
            .sort_by(|a, b| a.canonical_name.cmp(&b.canonical_name));
        Ok(snapshot)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::{id::SessionId, quantity::Unit, recipe::RecipeStatus};

    #[test]
    fn upserts_replace_by_id() {
        let journal = MemoryJournal::new();
        let mut recipe = Recipe::select(SessionId::new("s"), "Chili", 1).unwrap();
        journal.record_recipe(&recipe).unwrap();

        recipe.finish(RecipeStatus::Abandoned).unwrap();
        journal.record_recipe(&recipe).unwrap();

        let snapshot = journal.load().unwrap();
        assert_eq!(snapshot.recipes, vec![recipe]);
    }

    #[test]
    fn ingredients_load_sorted_by_name() {
        let journal = MemoryJournal::new();
        journal
            .record_ingredient(&Ingredient::new("salt", Unit::new("tsp")))
            .unwrap();
        journal
            .record_ingredient(&Ingredient::new("beef", Unit::new("lb")))
            .unwrap();

        let names: Vec<_> = journal
            .load()
            .unwrap()
            .ingredients
            .into_iter()
            .map(|i| i.canonical_name)
            .collect();
        assert_eq!(names, vec!["beef", "salt"]);
    }
}
