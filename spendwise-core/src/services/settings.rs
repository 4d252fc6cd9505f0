//! Settings service - income, budgets, notification preferences,
//! reflections and goals

use std::sync::Arc;

use rust_decimal::Decimal;

use super::state::{StateKey, StateService};
use crate::domain::result::{Error, Result};
use crate::domain::settings::DEFAULT_MONTHLY_INCOME;
use crate::domain::{BudgetLimits, Goal, GoalStatus, NotificationPreferences, Reflection};

pub struct SettingsService {
    state: Arc<StateService>,
}

impl SettingsService {
    pub fn new(state: Arc<StateService>) -> Self {
        Self { state }
    }

    /// Monthly income, defaulting when unset or not positive
    pub fn income(&self) -> Result<Decimal> {
        Ok(self
            .state
            .get::<Decimal>(StateKey::Income)?
            .filter(|income| *income > Decimal::ZERO)
            .unwrap_or(DEFAULT_MONTHLY_INCOME))
    }

    pub fn set_income(&self, income: Decimal) -> Result<()> {
        if income <= Decimal::ZERO {
            return Err(Error::validation("Monthly income must be greater than zero"));
        }
        self.state.set(StateKey::Income, &income)
    }

    pub fn budgets(&self) -> Result<BudgetLimits> {
        self.state.get_or_default(StateKey::Budgets)
    }

    pub fn set_budgets(&self, budgets: &BudgetLimits) -> Result<()> {
        if budgets.monthly < Decimal::ZERO {
            return Err(Error::validation("Monthly budget cannot be negative"));
        }
        if let Some((category, _)) = budgets.categories.iter().find(|(_, v)| **v < Decimal::ZERO) {
            return Err(Error::validation(format!(
                "Budget for {} cannot be negative",
                category
            )));
        }
        self.state.set(StateKey::Budgets, budgets)
    }

    pub fn notifications(&self) -> Result<NotificationPreferences> {
        self.state.get_or_default(StateKey::Notifications)
    }

    pub fn set_notifications(&self, prefs: &NotificationPreferences) -> Result<()> {
        self.state.set(StateKey::Notifications, prefs)
    }

    pub fn reflections(&self) -> Result<Vec<Reflection>> {
        self.state.get_or_default(StateKey::Reflections)
    }

    /// Save a weekly reflection; blank text is rejected
    pub fn add_reflection(&self, content: &str) -> Result<Reflection> {
        let content = content.trim();
        if content.is_empty() {
            return Err(Error::validation("Reflection must not be empty"));
        }
        let reflection = Reflection::new(content);
        let mut all = self.reflections()?;
        all.push(reflection.clone());
        self.state.set(StateKey::Reflections, &all)?;
        Ok(reflection)
    }

    pub fn goals(&self) -> Result<Vec<Goal>> {
        self.state.get_or_default(StateKey::Goals)
    }

    /// Set a weekly goal; blank text is rejected
    pub fn add_goal(&self, content: &str) -> Result<Goal> {
        let content = content.trim();
        if content.is_empty() {
            return Err(Error::validation("Goal must not be empty"));
        }
        let goal = Goal::new(content);
        let mut all = self.goals()?;
        all.push(goal.clone());
        self.state.set(StateKey::Goals, &all)?;
        Ok(goal)
    }

    pub fn complete_goal(&self, id: &str) -> Result<Goal> {
        let mut all = self.goals()?;
        let goal = all
            .iter_mut()
            .find(|g| g.id == id)
            .ok_or_else(|| Error::not_found(format!("Goal {}", id)))?;
        goal.status = GoalStatus::Completed;
        let goal = goal.clone();
        self.state.set(StateKey::Goals, &all)?;
        Ok(goal)
    }

    /// Delete every persisted value (logout / account deletion)
    pub fn wipe(&self) -> Result<()> {
        tracing::info!("Wiping all persisted state");
        self.state.clear_all()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::adapters::MemoryStore;

    fn settings() -> SettingsService {
        SettingsService::new(Arc::new(StateService::new(Arc::new(MemoryStore::new()))))
    }

    #[test]
    fn test_income_default_and_validation() {
        let settings = settings();
        assert_eq!(settings.income().unwrap(), Decimal::new(50000, 0));
        settings.set_income(Decimal::new(72000, 0)).unwrap();
        assert_eq!(settings.income().unwrap(), Decimal::new(72000, 0));
        assert!(settings.set_income(Decimal::ZERO).is_err());
    }

    #[test]
    fn test_budgets() {
        let settings = settings();
        assert_eq!(settings.budgets().unwrap(), BudgetLimits::default());

        let mut budgets = BudgetLimits::default();
        budgets.monthly = Decimal::new(30000, 0);
        settings.set_budgets(&budgets).unwrap();
        assert_eq!(settings.budgets().unwrap().monthly, Decimal::new(30000, 0));

        budgets
            .categories
            .insert("Shopping".to_string(), Decimal::new(-1, 0));
        assert!(settings.set_budgets(&budgets).is_err());
    }

    #[test]
    fn test_notifications() {
        let settings = settings();
        let mut prefs = settings.notifications().unwrap();
        assert!(!prefs.weekly);
        prefs.weekly = true;
        settings.set_notifications(&prefs).unwrap();
        assert!(settings.notifications().unwrap().weekly);
    }

    #[test]
    fn test_reflections_and_goals() {
        let settings = settings();
        assert!(settings.add_reflection("   ").is_err());
        settings.add_reflection("  Spent less on food  ").unwrap();
        assert_eq!(settings.reflections().unwrap()[0].content, "Spent less on food");

        let goal = settings.add_goal("No impulse buys").unwrap();
        assert_eq!(goal.status, GoalStatus::Active);
        settings.complete_goal(&goal.id).unwrap();
        assert_eq!(settings.goals().unwrap()[0].status, GoalStatus::Completed);
        assert!(settings.complete_goal("missing").is_err());
    }

    #[test]
    fn test_wipe() {
        let settings = settings();
        settings.set_income(Decimal::new(1000, 0)).unwrap();
        settings.add_goal("x").unwrap();
        settings.wipe().unwrap();
        assert_eq!(settings.income().unwrap(), DEFAULT_MONTHLY_INCOME);
        assert!(settings.goals().unwrap().is_empty());
    }
}
