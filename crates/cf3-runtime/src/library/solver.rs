//! Flow solver shell: owns and runs boundary conditions.
//!
//! ```text
//! solver [FlowSolver]
//! └── bc [ActionDirector]
//!     ├── inlet [ConstantBC]
//!     └── outlet [ConstantBC]
//! ```
//!
//! Boundary conditions are added through the `create_bc_action`
//! signal, whose signature offers every builder registered as a
//! boundary condition.

use super::bc::{BoundaryConditionKind, REGIONS_OPTION};
use super::director::ActionDirector;
use cf3_component::{Action, Behavior, Component, ComponentContext, ComponentError};
use cf3_signal::{ArgSchema, ArgSpec, SignalArgs};
use cf3_types::{TypedValue, Uri, ValueType};
use tracing::info;

/// Name of the director child holding the boundary conditions.
pub const BC_DIRECTOR: &str = "bc";

const CREATE_BC_ACTION: &str = "create_bc_action";

/// Solver component. Executing it runs its `bc` director.
#[derive(Debug, Default)]
pub struct FlowSolver;

impl FlowSolver {
    pub const MESH: &'static str = "mesh";
    pub const TIME: &'static str = "time";

    /// Factory for the `FlowSolver` builder.
    ///
    /// # Errors
    ///
    /// Never in practice; declaration errors are propagated.
    pub fn create(name: &str) -> Result<Component, ComponentError> {
        let mut component = Component::with_behavior(name, "FlowSolver", Self);
        let options = component.options_mut();
        options
            .add_component_ref(Self::MESH)?
            .set_pretty_name("Mesh")
            .set_description("Mesh the solver works on")
            .mark_basic();
        options
            .add_component_ref(Self::TIME)?
            .set_pretty_name("Time")
            .set_description("Clock of the simulation");

        component
            .signals_mut()
            .register(CREATE_BC_ACTION, create_bc_action)?
            .set_pretty_name("Create Boundary Condition")
            .set_description("Build a boundary condition and add it to the bc director")
            .set_signature(|_, builders| {
                ArgSchema::new()
                    .arg(ArgSpec::required("name", ValueType::String).description("Name of the condition"))
                    .arg(
                        ArgSpec::required("builder", ValueType::String)
                            .description("Boundary condition builder")
                            .restricted_to(builders.type_names_of::<BoundaryConditionKind>()),
                    )
                    .arg(
                        ArgSpec::required(REGIONS_OPTION, ValueType::UriArray)
                            .description("Regions the condition applies to"),
                    )
            });

        let mut director = ActionDirector::create(BC_DIRECTOR)?;
        director.add_tag("boundary_conditions");
        component.add_component(director)?;
        Ok(component)
    }
}

fn arg<T: TypedValue>(ctx: &ComponentContext<'_>, args: &SignalArgs, key: &str) -> Result<T, ComponentError> {
    args.get_as(key).map_err(|source| ComponentError::ArgumentError {
        component: ctx.uri().to_string(),
        signal: CREATE_BC_ACTION.to_string(),
        source,
    })
}

fn create_bc_action(ctx: &mut ComponentContext<'_>, args: &SignalArgs) -> Result<SignalArgs, ComponentError> {
    let name: String = arg(ctx, args, "name")?;
    let builder: String = arg(ctx, args, "builder")?;
    let regions: Vec<Uri> = arg(ctx, args, REGIONS_OPTION)?;

    let mut bc = ctx
        .builders()
        .build_abstract::<BoundaryConditionKind>(&builder, &name)?;
    bc.configure_option(REGIONS_OPTION, regions)?;

    let director = ctx.uri().join(BC_DIRECTOR);
    let uri = ctx.add_component(&director, bc)?;
    info!(bc = %uri, builder = %builder, "boundary condition created");
    Ok(SignalArgs::new().with("uri", uri))
}

impl Behavior for FlowSolver {
    fn as_action(&self) -> Option<&dyn Action> {
        Some(self)
    }
}

impl Action for FlowSolver {
    fn execute(&self, ctx: &mut ComponentContext<'_>) -> Result<(), ComponentError> {
        let director = ctx.uri().join(BC_DIRECTOR);
        ctx.execute(&director)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::library::builtin_registry;
    use cf3_component::testing::ComponentTestHarness;
    use cf3_signal::FrameError;
    use cf3_types::Value;

    fn harness() -> (ComponentTestHarness, Uri) {
        let mut harness = ComponentTestHarness::with_builders(builtin_registry().unwrap());
        let solver = harness
            .mount(&Uri::root(), FlowSolver::create("solver").unwrap())
            .unwrap();
        (harness, solver)
    }

    #[test]
    fn solver_owns_bc_director() {
        let solver = FlowSolver::create("solver").unwrap();
        let bc = solver.get_child(BC_DIRECTOR).unwrap();
        assert!(bc.is::<ActionDirector>());
        assert!(bc.has_tag("boundary_conditions"));
    }

    #[test]
    fn signature_lists_bc_builders() {
        let (mut harness, solver) = harness();
        let signature = harness.context().signature(&solver, CREATE_BC_ACTION).unwrap();
        let builder = signature.schema().unwrap().get("builder").unwrap();
        assert_eq!(builder.restricted, [Value::from("ConstantBC")]);
    }

    #[test]
    fn unknown_builder_rejected_before_building() {
        let (mut harness, solver) = harness();
        let err = harness
            .call(
                &solver,
                CREATE_BC_ACTION,
                SignalArgs::new()
                    .with("name", "inlet")
                    .with("builder", "Group")
                    .with(REGIONS_OPTION, vec![Uri::parse("/mesh/in").unwrap()]),
            )
            .unwrap_err();
        assert!(matches!(
            err,
            ComponentError::ArgumentError {
                source: FrameError::RestrictedArgument { .. },
                ..
            }
        ));
        let bc = harness.get(&solver.join(BC_DIRECTOR)).unwrap();
        assert_eq!(bc.child_count(), 0);
    }

    #[test]
    fn executing_solver_applies_conditions() {
        let (mut harness, solver) = harness();
        let reply = harness
            .call(
                &solver,
                CREATE_BC_ACTION,
                SignalArgs::new()
                    .with("name", "wall")
                    .with("builder", "ConstantBC")
                    .with(REGIONS_OPTION, vec![Uri::parse("/mesh/wall").unwrap()]),
            )
            .unwrap();
        let bc_uri: Uri = reply.get_as("uri").unwrap();
        harness.execute(&solver).unwrap();
        let applied = harness
            .get(&bc_uri)
            .unwrap()
            .properties()
            .get_as::<u64>(crate::library::APPLICATIONS_PROPERTY);
        assert_eq!(applied, Some(1));
    }
}
