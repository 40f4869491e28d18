//! Simulation clock and the action that advances it.

use cf3_component::{Action, Behavior, Component, ComponentContext, ComponentError};
use tracing::debug;

/// Holds the current time, step size, end time and iteration count.
///
/// | Option | Type | Default |
/// |--------|------|---------|
/// | `current_time` | real | 0 |
/// | `time_step` | real | 0 |
/// | `end_time` | real | 0 |
/// | `iter` | unsigned | 0 |
#[derive(Debug, Default)]
pub struct CTime;

impl Behavior for CTime {}

impl CTime {
    pub const CURRENT_TIME: &'static str = "current_time";
    pub const TIME_STEP: &'static str = "time_step";
    pub const END_TIME: &'static str = "end_time";
    pub const ITER: &'static str = "iter";

    /// Factory for the `CTime` builder.
    ///
    /// # Errors
    ///
    /// Never in practice; declaration errors are propagated.
    pub fn create(name: &str) -> Result<Component, ComponentError> {
        let mut component = Component::with_behavior(name, "CTime", Self);
        let options = component.options_mut();
        options
            .add(Self::CURRENT_TIME, 0.0_f64)?
            .set_pretty_name("Current Time")
            .set_description("Time reached by the simulation")
            .mark_basic();
        options
            .add(Self::TIME_STEP, 0.0_f64)?
            .set_pretty_name("Time Step")
            .set_description("Increment applied by each advance")
            .mark_basic();
        options
            .add(Self::END_TIME, 0.0_f64)?
            .set_pretty_name("End Time")
            .set_description("Time at which the simulation stops");
        options
            .add(Self::ITER, 0_u64)?
            .set_description("Number of completed advances");
        Ok(component)
    }

    /// Adds one time step to `clock` and counts the iteration.
    ///
    /// # Errors
    ///
    /// [`ComponentError::TypeMismatch`] when `clock` is not a `CTime`.
    pub fn advance(clock: &mut Component) -> Result<(), ComponentError> {
        if !clock.is::<Self>() {
            return Err(ComponentError::TypeMismatch {
                component: clock.uri().to_string(),
                expected: "CTime".into(),
                found: clock.type_name().to_string(),
            });
        }
        let current: f64 = clock.option(Self::CURRENT_TIME)?;
        let step: f64 = clock.option(Self::TIME_STEP)?;
        let iteration: u64 = clock.option(Self::ITER)?;
        clock.configure_option(Self::CURRENT_TIME, current + step)?;
        clock.configure_option(Self::ITER, iteration + 1)?;
        debug!(
            clock = %clock.uri(),
            time = current + step,
            iteration = iteration + 1,
            "time advanced"
        );
        Ok(())
    }

    /// Whether `clock` has reached its end time.
    ///
    /// # Errors
    ///
    /// [`ComponentError::OptionNotFound`] on a component that is not a clock.
    pub fn is_finished(clock: &Component) -> Result<bool, ComponentError> {
        let current: f64 = clock.option(Self::CURRENT_TIME)?;
        let end: f64 = clock.option(Self::END_TIME)?;
        Ok(current >= end)
    }
}

/// Advances the clock referenced by its `time` option.
#[derive(Debug, Default)]
pub struct CAdvanceTime;

impl CAdvanceTime {
    pub const TIME: &'static str = "time";

    /// Factory for the `CAdvanceTime` builder.
    ///
    /// # Errors
    ///
    /// Never in practice; declaration errors are propagated.
    pub fn create(name: &str) -> Result<Component, ComponentError> {
        let mut component = Component::with_behavior(name, "CAdvanceTime", Self);
        component
            .options_mut()
            .add_component_ref(Self::TIME)?
            .set_pretty_name("Time")
            .set_description("Clock to advance")
            .mark_basic();
        Ok(component)
    }
}

impl Behavior for CAdvanceTime {
    fn as_action(&self) -> Option<&dyn Action> {
        Some(self)
    }
}

impl Action for CAdvanceTime {
    fn execute(&self, ctx: &mut ComponentContext<'_>) -> Result<(), ComponentError> {
        let clock = ctx.follow_option_mut(Self::TIME)?;
        CTime::advance(clock)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use cf3_component::BuilderRegistry;
    use cf3_types::{ErrorCode, Uri};

    fn tree() -> (Component, BuilderRegistry) {
        let mut root = Component::root();
        root.add_component(CTime::create("time").unwrap()).unwrap();
        root.add_component(CAdvanceTime::create("step").unwrap()).unwrap();
        (root, BuilderRegistry::with_core().unwrap())
    }

    fn uri(s: &str) -> Uri {
        Uri::parse(s).unwrap()
    }

    #[test]
    fn advance_adds_step_and_counts() {
        let mut clock = CTime::create("time").unwrap();
        clock.configure_option(CTime::TIME_STEP, 0.25).unwrap();
        CTime::advance(&mut clock).unwrap();
        CTime::advance(&mut clock).unwrap();
        assert_eq!(clock.option::<f64>(CTime::CURRENT_TIME).unwrap(), 0.5);
        assert_eq!(clock.option::<u64>(CTime::ITER).unwrap(), 2);
    }

    #[test]
    fn advance_rejects_non_clock() {
        let mut group = Component::new("g");
        let err = CTime::advance(&mut group).unwrap_err();
        assert_eq!(err.code(), "COMPONENT_TYPE_MISMATCH");
    }

    #[test]
    fn finished_at_end_time() {
        let mut clock = CTime::create("time").unwrap();
        clock.configure_option(CTime::END_TIME, 1.0).unwrap();
        clock.configure_option(CTime::TIME_STEP, 1.0).unwrap();
        assert!(!CTime::is_finished(&clock).unwrap());
        CTime::advance(&mut clock).unwrap();
        assert!(CTime::is_finished(&clock).unwrap());
    }

    #[test]
    fn unset_reference_is_setup_error() {
        let (mut root, builders) = tree();
        let mut ctx = ComponentContext::new(&mut root, &builders);
        let err = ctx.execute(&uri("/step")).unwrap_err();
        assert!(matches!(err, ComponentError::SetupError { .. }));
        assert!(err.to_string().contains("time"));
    }

    #[test]
    fn relative_reference_resolves_from_action() {
        let (mut root, builders) = tree();
        let mut ctx = ComponentContext::new(&mut root, &builders);
        ctx.configure(&uri("/step"), CAdvanceTime::TIME, uri("../time"))
            .unwrap();
        ctx.execute(&uri("/step")).unwrap();
        let clock = ctx.access(&uri("/time")).unwrap();
        assert_eq!(clock.option::<u64>(CTime::ITER).unwrap(), 1);
    }

    #[test]
    fn removed_clock_expires_reference() {
        let (mut root, builders) = tree();
        let mut ctx = ComponentContext::new(&mut root, &builders);
        ctx.configure(&uri("/step"), CAdvanceTime::TIME, uri("/time"))
            .unwrap();
        ctx.remove_component(&uri("/time")).unwrap();
        let err = ctx.execute(&uri("/step")).unwrap_err();
        assert!(matches!(err, ComponentError::Expired { .. }));
    }
}
