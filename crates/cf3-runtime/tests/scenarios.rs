//! End-to-end scenarios on the builtin library.

use cf3_component::{ComponentError, Link, LinkState};
use cf3_runtime::library::{ConstantBC, FlowSolver, APPLICATIONS_PROPERTY};
use cf3_runtime::script::{ScriptError, ScriptRunner};
use cf3_runtime::RuntimeContext;
use cf3_signal::SignalArgs;
use cf3_types::{ErrorCode, Uri, Value};

fn uri(s: &str) -> Uri {
    Uri::parse(s).expect("valid uri")
}

#[test]
fn boundary_condition_wiring() {
    let mut runtime = RuntimeContext::with_builtins().unwrap();
    let solver = runtime
        .create_component(&Uri::root(), "FlowSolver", "solver")
        .unwrap();

    let regions = vec![uri("/mesh/left"), uri("/mesh/bottom")];
    let reply = runtime
        .call_signal(
            &solver,
            "create_bc_action",
            &SignalArgs::new()
                .with("name", "inlet")
                .with("builder", "ConstantBC")
                .with("regions", regions.clone()),
        )
        .unwrap();
    assert_eq!(reply.get_as::<Uri>("uri").unwrap(), uri("/solver/bc/inlet"));

    let inlet = runtime.access(&uri("/solver/bc/inlet")).unwrap();
    assert!(inlet.is::<ConstantBC>());
    assert_eq!(inlet.type_name(), "ConstantBC");
    assert_eq!(inlet.option::<Vec<Uri>>("regions").unwrap(), regions);

    runtime.execute(&solver).unwrap();
    let inlet = runtime.access(&uri("/solver/bc/inlet")).unwrap();
    assert_eq!(inlet.properties().get_as::<u64>(APPLICATIONS_PROPERTY), Some(1));
    assert!(runtime.access(&solver).unwrap().is::<FlowSolver>());
}

#[test]
fn time_advance() {
    let mut runtime = RuntimeContext::with_builtins().unwrap();
    let time = runtime.create_component(&Uri::root(), "CTime", "time").unwrap();
    runtime.configure(&time, "time_step", 0.5).unwrap();

    let step = runtime
        .create_component(&Uri::root(), "CAdvanceTime", "advance")
        .unwrap();
    runtime.configure(&step, "time", time.clone()).unwrap();
    for _ in 0..3 {
        runtime.execute(&step).unwrap();
    }

    let clock = runtime.access(&time).unwrap();
    assert_eq!(clock.option::<f64>("current_time").unwrap(), 1.5);
    assert_eq!(clock.option::<u64>("iter").unwrap(), 3);
}

#[test]
fn invalid_option_type_leaves_value() {
    let mut runtime = RuntimeContext::with_builtins().unwrap();
    let time = runtime.create_component(&Uri::root(), "CTime", "time").unwrap();
    runtime.configure(&time, "time_step", 0.5).unwrap();

    let err = runtime.configure(&time, "time_step", "fast").unwrap_err();
    assert!(matches!(err, ComponentError::TypeError { .. }));
    assert_eq!(err.code(), "COMPONENT_TYPE_ERROR");
    let message = err.to_string();
    assert!(message.contains("cpath:/time"));
    assert!(message.contains("time_step"));

    let clock = runtime.access(&time).unwrap();
    assert_eq!(clock.option_value("time_step").unwrap(), &Value::Real(0.5));
}

#[test]
fn director_runs_time_loop() {
    let mut runtime = RuntimeContext::with_builtins().unwrap();
    let time = runtime.create_component(&Uri::root(), "CTime", "time").unwrap();
    runtime.configure(&time, "time_step", 0.1).unwrap();
    let loop_ = runtime
        .create_component(&Uri::root(), "ActionDirector", "loop")
        .unwrap();
    for name in ["first", "second"] {
        let step = runtime.create_component(&loop_, "CAdvanceTime", name).unwrap();
        runtime.configure(&step, "time", uri("../../time")).unwrap();
    }
    runtime.execute(&loop_).unwrap();

    let clock = runtime.access(&time).unwrap();
    assert_eq!(clock.option::<u64>("iter").unwrap(), 2);
}

#[test]
fn link_to_solver_expires_with_it() {
    let mut runtime = RuntimeContext::with_builtins().unwrap();
    let solver = runtime
        .create_component(&Uri::root(), "FlowSolver", "solver")
        .unwrap();
    let current = runtime
        .create_component(&Uri::root(), "Link", "current_solver")
        .unwrap();
    runtime.configure(&current, "target", solver.clone()).unwrap();

    let followed = runtime.context().follow(&current).unwrap().uri().clone();
    assert_eq!(followed, solver);

    runtime.remove_component(&solver).unwrap();
    let link = runtime.access(&current).unwrap();
    assert_eq!(Link::state(runtime.root(), link).unwrap(), LinkState::Expired);
}

#[test]
fn script_builds_case() {
    let script = "\
# case setup
create /time CTime
configure /time time_step=0.5 end_time=1.5
create /solver FlowSolver
cd /solver
configure . time=/time
call . create_bc_action name=inlet builder=ConstantBC regions=/mesh/in
call . create_bc_action name=outlet builder=ConstantBC regions=/mesh/out
execute .
create advance CAdvanceTime
configure advance time=../../time
execute advance
execute advance
execute advance
";
    let mut runtime = RuntimeContext::with_builtins().unwrap();
    ScriptRunner::new(&mut runtime).run_script(script).unwrap();

    let clock = runtime.access(&uri("/time")).unwrap();
    assert_eq!(clock.option::<f64>("current_time").unwrap(), 1.5);
    let bc = runtime.access(&uri("/solver/bc")).unwrap();
    assert_eq!(bc.child_count(), 2);
}

#[test]
fn script_stops_at_failing_line() {
    let mut runtime = RuntimeContext::with_builtins().unwrap();
    let err = ScriptRunner::new(&mut runtime)
        .run_script(
            "create /solver FlowSolver\n\
             create /solver/bc/wall ConstantBC\n\
             execute /solver\n\
             create /never Group",
        )
        .unwrap_err();
    assert_eq!(err.line(), Some(3));
    assert!(matches!(
        err,
        ScriptError::Command {
            source: ComponentError::SetupError { .. },
            ..
        }
    ));
    assert!(err.to_string().contains("cpath:/solver/bc/wall"));
    assert!(runtime.access(&uri("/never")).is_err());
}
