//! Opens the on-disk document and wires it into a loaded shopping list.

use todu_shop_core::item_store::keys;
use todu_shop_core::{DocumentStore, KeyValueStore, ShoppingList};

use crate::config::Config;
use crate::console::ConsoleNotifier;
use crate::plan::{Plan, PlanError};

pub struct Session {
    storage: DocumentStore,
    plan: Plan,
}

impl Session {
    pub fn open(config: &Config) -> Result<Self, Box<dyn std::error::Error>> {
        let storage = DocumentStore::open(config.data_dir.value.clone())?;
        let plan = Plan::load(&storage)?;
        tracing::debug!(
            path = %storage.path().display(),
            meals = plan.meals.len(),
            pantry = plan.pantry.len(),
            "opened shopping document"
        );
        Ok(Self { storage, plan })
    }

    pub fn plan(&self) -> &Plan {
        &self.plan
    }

    /// Applies `f` to the plan and persists the result.
    pub fn update_plan<T>(&mut self, f: impl FnOnce(&mut Plan) -> T) -> Result<T, PlanError> {
        let out = f(&mut self.plan);
        self.plan.save(&mut self.storage)?;
        Ok(out)
    }

    /// Hands the document to a shopping list and loads it against the plan.
    ///
    /// When no store catalog has ever been saved, the configured stores seed it.
    pub fn into_list(self, config: &Config) -> ShoppingList<DocumentStore> {
        into_list(self.storage, self.plan, config)
    }
}

fn into_list<S: KeyValueStore>(storage: S, plan: Plan, config: &Config) -> ShoppingList<S> {
    // An explicitly emptied catalog is still stored and is kept as is.
    let unseeded = matches!(storage.get(keys::STORES), Ok(None));

    let mut list = ShoppingList::new(storage, Box::new(ConsoleNotifier))
        .with_history_limit(config.history_limit.value);
    list.set_meals(plan.meals);
    list.set_pantry(plan.pantry);
    list.load();

    if unseeded && !config.stores.value.is_empty() {
        list.update_stores(config.stores.value.iter());
    }
    list
}
