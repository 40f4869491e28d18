//! Boundary conditions.

use cf3_component::{Action, Behavior, Component, ComponentContext, ComponentError, ComponentKind};
use cf3_types::{Uri, ValueType};
use tracing::debug;

/// Regions a boundary condition applies to.
pub const REGIONS_OPTION: &str = "regions";

/// Property counting how often a boundary condition was applied.
pub const APPLICATIONS_PROPERTY: &str = "applications";

/// Actions with a `regions` option holding an array of paths.
///
/// Also the builder namespace `cf3.solver.BC`.
pub struct BoundaryConditionKind;

impl ComponentKind for BoundaryConditionKind {
    const KIND: &'static str = "cf3.solver.BC";

    fn matches(component: &Component) -> bool {
        component.is_action()
            && component
                .options()
                .get(REGIONS_OPTION)
                .is_some_and(|o| o.value_type() == ValueType::UriArray)
    }
}

/// Applies constant `values` on every region in `regions`.
#[derive(Debug, Default)]
pub struct ConstantBC;

impl ConstantBC {
    pub const VALUES: &'static str = "values";

    /// Factory for the `ConstantBC` builder.
    ///
    /// # Errors
    ///
    /// Never in practice; declaration errors are propagated.
    pub fn create(name: &str) -> Result<Component, ComponentError> {
        let mut component = Component::with_behavior(name, "ConstantBC", Self);
        let options = component.options_mut();
        options
            .add(REGIONS_OPTION, Vec::<Uri>::new())?
            .set_pretty_name("Regions")
            .set_description("Mesh regions this condition applies to")
            .mark_basic();
        options
            .add(Self::VALUES, Vec::<f64>::new())?
            .set_pretty_name("Values")
            .set_description("Constant value per solution variable")
            .mark_basic();
        component.properties_mut().set(APPLICATIONS_PROPERTY, 0_u64);
        Ok(component)
    }
}

impl Behavior for ConstantBC {
    fn as_action(&self) -> Option<&dyn Action> {
        Some(self)
    }
}

impl Action for ConstantBC {
    fn execute(&self, ctx: &mut ComponentContext<'_>) -> Result<(), ComponentError> {
        let this = ctx.this_mut()?;
        let regions: Vec<Uri> = this.option(REGIONS_OPTION)?;
        if regions.is_empty() {
            return Err(ComponentError::setup(this.uri(), "no region set"));
        }
        let values: Vec<f64> = this.option(Self::VALUES)?;
        let applied = this
            .properties()
            .get_as::<u64>(APPLICATIONS_PROPERTY)
            .unwrap_or(0)
            + 1;
        this.properties_mut().set(APPLICATIONS_PROPERTY, applied);
        debug!(
            bc = %this.uri(),
            regions = regions.len(),
            values = ?values,
            applied,
            "boundary condition applied"
        );
        Ok(())
    }
}
