//! Signals every component answers.
//!
//! | Signal | Arguments | Reply |
//! |--------|-----------|-------|
//! | `create_component` | `name:string`, `type:string` | `uri` |
//! | `delete_component` | - | - |
//! | `move_component` | `path:uri` | `uri` |
//! | `rename_component` | `name:string` | `uri` |
//! | `configure` | `option=value`... | - |
//! | `list_tree` | - | `tree` |
//! | `list_options` | - | one entry per option |
//! | `list_properties` | - | one entry per property |
//! | `list_signals` | - | `signals` |
//! | `execute` | - | - (actions only) |

use crate::signal::SignalDef;
use crate::{ComponentContext, ComponentError};
use cf3_signal::{ArgSchema, ArgSpec, SignalArgs};
use cf3_types::{TypedValue, Uri, Value, ValueType};
use std::sync::Arc;

type Handler = fn(&mut ComponentContext<'_>, &SignalArgs) -> Result<SignalArgs, ComponentError>;

fn def(name: &str, description: &str, handler: Handler) -> SignalDef {
    let mut def = SignalDef::new(name, Arc::new(handler));
    def.set_description(description);
    def
}

/// Signals installed on every component.
pub(crate) fn definitions() -> Vec<SignalDef> {
    let mut create = def("create_component", "Build a child through the builder registry", create_component);
    create.set_signature(|_, builders| {
        ArgSchema::new()
            .arg(ArgSpec::required("name", ValueType::String).description("Name of the new child"))
            .arg(
                ArgSpec::required("type", ValueType::String)
                    .description("Registered builder name")
                    .restricted_to(builders.iter().map(|e| e.type_name().to_string())),
            )
    });

    let mut mv = def("move_component", "Move this component under another parent", move_component);
    mv.set_signature(|_, _| {
        ArgSchema::new().arg(ArgSpec::required("path", ValueType::Uri).description("New parent"))
    });

    let mut rename = def("rename_component", "Rename this component", rename_component);
    rename.set_signature(|_, _| {
        ArgSchema::new().arg(ArgSpec::required("name", ValueType::String).description("New name"))
    });

    vec![
        create,
        def("delete_component", "Remove this component and its subtree", delete_component),
        mv,
        rename,
        def("configure", "Set options, one argument per option", configure),
        def("list_tree", "Indented listing of the subtree", list_tree),
        def("list_options", "Current option values", list_options),
        def("list_properties", "Current property values", list_properties),
        def("list_signals", "Names of visible signals", list_signals),
    ]
}

/// `execute`, installed on actions.
pub(crate) fn execute_definition() -> SignalDef {
    def("execute", "Run this action", execute)
}

fn required<T: TypedValue>(
    ctx: &ComponentContext<'_>,
    signal: &str,
    args: &SignalArgs,
    key: &str,
) -> Result<T, ComponentError> {
    args.get_as(key).map_err(|source| ComponentError::ArgumentError {
        component: ctx.uri().to_string(),
        signal: signal.to_string(),
        source,
    })
}

fn create_component(ctx: &mut ComponentContext<'_>, args: &SignalArgs) -> Result<SignalArgs, ComponentError> {
    let name: String = required(ctx, "create_component", args, "name")?;
    let type_name: String = required(ctx, "create_component", args, "type")?;
    let component = ctx.build(&type_name, &name)?;
    let this = ctx.uri().clone();
    let uri = ctx.add_component(&this, component)?;
    Ok(SignalArgs::new().with("uri", uri))
}

fn delete_component(ctx: &mut ComponentContext<'_>, _: &SignalArgs) -> Result<SignalArgs, ComponentError> {
    let this = ctx.uri().clone();
    ctx.remove_component(&this)?;
    Ok(SignalArgs::new())
}

fn move_component(ctx: &mut ComponentContext<'_>, args: &SignalArgs) -> Result<SignalArgs, ComponentError> {
    let path: Uri = required(ctx, "move_component", args, "path")?;
    let this = ctx.uri().clone();
    let destination = ctx.resolve(&path)?;
    let name = this
        .name()
        .ok_or_else(|| ComponentError::setup(&this, "the root cannot be moved"))?
        .to_string();
    if destination.starts_with(&this) {
        return Err(ComponentError::setup(
            &this,
            format!("cannot move into its own subtree '{destination}'"),
        ));
    }
    let parent = ctx.access(&destination)?;
    if parent.child(&name).is_some() {
        return Err(ComponentError::NameConflict {
            component: destination.to_string(),
            name,
        });
    }
    let component = ctx.remove_component(&this)?;
    let uri = ctx.add_component(&destination, component)?;
    Ok(SignalArgs::new().with("uri", uri))
}

fn rename_component(ctx: &mut ComponentContext<'_>, args: &SignalArgs) -> Result<SignalArgs, ComponentError> {
    let new_name: String = required(ctx, "rename_component", args, "name")?;
    let this = ctx.uri().clone();
    let uri = match (this.parent(), this.name()) {
        (Some(parent), Some(old)) => {
            ctx.access_mut(&parent)?.rename_child(old, &new_name)?;
            parent.join(&new_name)
        }
        _ => {
            let root = ctx.this_mut()?;
            root.rename(&new_name)?;
            root.uri().clone()
        }
    };
    Ok(SignalArgs::new().with("uri", uri))
}

/// Checks every argument before committing any of them.
fn configure(ctx: &mut ComponentContext<'_>, args: &SignalArgs) -> Result<SignalArgs, ComponentError> {
    let component = ctx.this_mut()?;
    let uri = component.uri().clone();
    let mut checked = Vec::new();
    for (name, value) in args.iter() {
        let option = component.options().option(name)?;
        let declared = option.value_type();
        let value = match value {
            Value::String(text) if declared != ValueType::String => Value::parse(declared, text)
                .map_err(|_| ComponentError::TypeError {
                    component: uri.to_string(),
                    option: name.to_string(),
                    expected: declared,
                    found: ValueType::String,
                })?,
            other => other.clone(),
        };
        checked.push((name, option.check(&uri, value)?));
    }
    for (name, value) in checked {
        component.configure_option(name, value)?;
    }
    Ok(SignalArgs::new())
}

fn list_tree(ctx: &mut ComponentContext<'_>, _: &SignalArgs) -> Result<SignalArgs, ComponentError> {
    let tree = ctx.this()?.tree_string();
    Ok(SignalArgs::new().with("tree", tree))
}

fn list_options(ctx: &mut ComponentContext<'_>, _: &SignalArgs) -> Result<SignalArgs, ComponentError> {
    Ok(ctx
        .this()?
        .options()
        .iter()
        .map(|o| (o.name().to_string(), o.value().clone()))
        .collect())
}

fn list_properties(ctx: &mut ComponentContext<'_>, _: &SignalArgs) -> Result<SignalArgs, ComponentError> {
    Ok(ctx
        .this()?
        .properties()
        .iter()
        .map(|(n, v)| (n.to_string(), v.clone()))
        .collect())
}

fn list_signals(ctx: &mut ComponentContext<'_>, _: &SignalArgs) -> Result<SignalArgs, ComponentError> {
    let names: Vec<String> = ctx
        .this()?
        .signals()
        .visible_names()
        .map(str::to_string)
        .collect();
    Ok(SignalArgs::new().with("signals", names))
}

fn execute(ctx: &mut ComponentContext<'_>, _: &SignalArgs) -> Result<SignalArgs, ComponentError> {
    let this = ctx.uri().clone();
    ctx.execute(&this)?;
    Ok(SignalArgs::new())
}
