//! Builtin component library.
//!
//! | Type name | Namespace | Behaviour |
//! |-----------|-----------|-----------|
//! | `Group` | `cf3.common.Component` | structural |
//! | `Link` | `cf3.common.Component` | non-owning reference |
//! | `CTime` | `cf3.common.Component` | simulation clock |
//! | `CAdvanceTime` | `cf3.common.Action` | advance a clock by one step |
//! | `ActionDirector` | `cf3.common.Action` | run child actions in order |
//! | `FlowSolver` | `cf3.common.Action` | run boundary conditions |
//! | `ConstantBC` | `cf3.solver.BC` | apply constant values on regions |
//!
//! # Example
//!
//! ```
//! use cf3_component::BuilderRegistry;
//! use cf3_runtime::library::{register_builtins, BoundaryConditionKind};
//!
//! let mut builders = BuilderRegistry::with_core().unwrap();
//! register_builtins(&mut builders).unwrap();
//! assert_eq!(builders.type_names_of::<BoundaryConditionKind>(), ["ConstantBC"]);
//! ```

mod bc;
mod director;
mod solver;
mod time;

pub use bc::{BoundaryConditionKind, ConstantBC, APPLICATIONS_PROPERTY, REGIONS_OPTION};
pub use director::{ActionDirector, DISABLED_ACTIONS_OPTION};
pub use solver::{FlowSolver, BC_DIRECTOR};
pub use time::{CAdvanceTime, CTime};

use cf3_component::{ActionKind, AnyComponent, BuilderRegistry, ComponentError};

/// Registers every builtin type that is not already a core builder.
///
/// # Errors
///
/// [`ComponentError::DuplicateBuilder`] when a builtin name is taken.
pub fn register_builtins(builders: &mut BuilderRegistry) -> Result<(), ComponentError> {
    builders
        .register::<AnyComponent, _>("CTime", CTime::create)?
        .description("Simulation clock");
    builders
        .register::<ActionKind, _>("CAdvanceTime", CAdvanceTime::create)?
        .description("Advance the referenced clock by one time step");
    builders
        .register::<ActionKind, _>("ActionDirector", ActionDirector::create)?
        .description("Execute child actions in order");
    builders
        .register::<ActionKind, _>("FlowSolver", FlowSolver::create)?
        .description("Solver owning a boundary condition director");
    builders
        .register::<BoundaryConditionKind, _>("ConstantBC", ConstantBC::create)?
        .description("Constant values on a set of regions");
    Ok(())
}

/// Core builders plus the builtin library.
///
/// # Errors
///
/// The first registration error.
pub fn builtin_registry() -> Result<BuilderRegistry, ComponentError> {
    let mut builders = BuilderRegistry::with_core()?;
    register_builtins(&mut builders)?;
    Ok(builders)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn builtins_register_once() {
        let mut builders = builtin_registry().unwrap();
        assert_eq!(builders.len(), 7);
        assert!(matches!(
            register_builtins(&mut builders),
            Err(ComponentError::DuplicateBuilder { .. })
        ));
    }

    #[test]
    fn every_builtin_builds() {
        let builders = builtin_registry().unwrap();
        for entry in builders.iter() {
            let built = builders.build(entry.type_name(), "sample").unwrap();
            assert_eq!(built.type_name(), entry.type_name());
        }
    }

    #[test]
    fn actions_namespace() {
        let builders = builtin_registry().unwrap();
        assert_eq!(
            builders.type_names_of::<ActionKind>(),
            ["CAdvanceTime", "ActionDirector", "FlowSolver"]
        );
    }
}
