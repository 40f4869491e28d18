//! Ordered execution of child actions.

use cf3_component::{Action, Behavior, Component, ComponentContext, ComponentError};
use tracing::{debug, trace};

/// Names of child actions the director skips.
pub const DISABLED_ACTIONS_OPTION: &str = "disabled_actions";

/// Executes its action children in child order.
///
/// Children that are not actions are ignored. A failing child stops the
/// run; later children are not executed.
#[derive(Debug, Default)]
pub struct ActionDirector;

impl ActionDirector {
    /// Factory for the `ActionDirector` builder.
    ///
    /// # Errors
    ///
    /// Never in practice; declaration errors are propagated.
    pub fn create(name: &str) -> Result<Component, ComponentError> {
        let mut component = Component::with_behavior(name, "ActionDirector", Self);
        component
            .options_mut()
            .add(DISABLED_ACTIONS_OPTION, Vec::<String>::new())?
            .set_pretty_name("Disabled Actions")
            .set_description("Names of child actions that are skipped");
        Ok(component)
    }
}

impl Behavior for ActionDirector {
    fn as_action(&self) -> Option<&dyn Action> {
        Some(self)
    }
}

impl Action for ActionDirector {
    fn execute(&self, ctx: &mut ComponentContext<'_>) -> Result<(), ComponentError> {
        let this = ctx.this()?;
        let disabled: Vec<String> = this.option(DISABLED_ACTIONS_OPTION)?;
        let actions: Vec<_> = this
            .children()
            .filter(|c| c.is_action())
            .filter(|c| {
                let skip = disabled.iter().any(|d| d == c.name());
                if skip {
                    trace!(action = %c.uri(), "disabled, skipped");
                }
                !skip
            })
            .map(|c| c.uri().clone())
            .collect();
        debug!(director = %ctx.uri(), actions = actions.len(), "directing");
        for action in &actions {
            ctx.execute(action)?;
        }
        Ok(())
    }
}
