//! Function registry, extension batches and permissions.

use pretty_assertions::assert_eq;
use tally_ir::RollExpression;
use tally_value::{DataValue, ErrorCategory, EvalError, EvalErrorKind};

use super::{context_on, registry};
use crate::{
    register_extensions, ExportBatch, ExtensionEngine, ExtensionHandle, ExtensionScript,
    PermissionLevel, SharedScriptRegistry,
};

/// Runs scripts made of `function <name> <permission>`, `dice <name>
/// <template>` and `fail <message>` lines.
struct CommandEngine;

impl ExtensionEngine for CommandEngine {
    fn run_batch(
        &mut self,
        scripts: &[ExtensionScript],
        exports: &mut ExportBatch,
    ) -> Result<(), EvalError> {
        for script in scripts {
            for line in script.body.lines() {
                let words: Vec<&str> = line.split_whitespace().collect();
                match words.as_slice() {
                    ["function", name, permission] => exports.export_function(
                        name,
                        vec!["value:long".parse()?],
                        "long",
                        ExtensionHandle::from_fn(|_, args| {
                            let value = args.get("value").cloned().unwrap_or(DataValue::long(0));
                            value.multiply(&DataValue::long(2))
                        }),
                        permission,
                    )?,
                    ["dice", name, template] => exports.export_dice(
                        name,
                        template,
                        ExtensionHandle::from_fn(|_, args| {
                            Ok(args.get("count").cloned().unwrap_or(DataValue::long(0)))
                        }),
                        true,
                    )?,
                    ["fail", message] => {
                        exports.export_function(
                            &script.name,
                            Vec::new(),
                            "any",
                            ExtensionHandle::from_fn(|_, _| Err(EvalError::new("boom"))),
                            "player",
                        )?;
                        return Err(EvalError::new(*message));
                    }
                    _ => {}
                }
            }
        }
        Ok(())
    }
}

fn register(
    registry: &SharedScriptRegistry,
    scripts: &[(&str, &str)],
) -> Result<crate::RegistrationSummary, EvalError> {
    let scripts: Vec<ExtensionScript> = scripts
        .iter()
        .map(|(name, body)| ExtensionScript::new(*name, *body))
        .collect();
    register_extensions(registry, &mut CommandEngine, &scripts)
}

#[test]
fn test_batch_registers_functions_and_dice() {
    let registry = registry();
    let summary = register(
        &registry,
        &[
            ("combat", "function double player\ndice Pool #{count}p"),
            ("magic", "function triple trusted"),
        ],
    )
    .unwrap();
    assert_eq!(summary.functions, vec!["double", "triple"]);
    assert_eq!(summary.dice, vec!["Pool"]);

    let mut ctx = context_on(&registry);
    let value = ctx
        .call_function("double", vec![DataValue::string("21")])
        .unwrap();
    assert_eq!(value, DataValue::long(42));

    let rolled = ctx.roll(&RollExpression::new("5P")).unwrap();
    assert_eq!(rolled.as_long().unwrap(), 5);

    let err = ctx
        .call_function("triple", vec![DataValue::long(1)])
        .unwrap_err();
    assert!(matches!(err.kind, EvalErrorKind::PermissionDenied { .. }));
}

#[test]
fn test_duplicate_user_function_is_rejected() {
    let registry = registry();
    register(&registry, &[("a", "function heal player")]).unwrap();

    let err = register(&registry, &[("b", "function heal player")]).unwrap_err();
    assert_eq!(err.kind, EvalErrorKind::DuplicateFunction { name: "heal".into() });
    assert_eq!(err.category(), ErrorCategory::DuplicateDefinition);
}

#[test]
fn test_user_function_may_not_shadow_builtin() {
    let registry = registry();
    let err = register(&registry, &[("a", "function abs player")]).unwrap_err();
    assert_eq!(
        err.kind,
        EvalErrorKind::BuiltinFunctionShadowed { name: "abs".into() }
    );
    assert_eq!(err.category(), ErrorCategory::DuplicateDefinition);
    assert!(!registry.read().functions().contains_user("abs"));
}

#[test]
fn test_conflicting_batch_leaves_registry_untouched() {
    let registry = registry();
    register(&registry, &[("a", "function heal player")]).unwrap();

    let err = register(
        &registry,
        &[
            ("b", "function smite gm\ndice Pool #{count}p"),
            ("c", "function heal player"),
        ],
    )
    .unwrap_err();
    assert_eq!(err.category(), ErrorCategory::DuplicateDefinition);

    let guard = registry.read();
    assert!(!guard.functions().contains_user("smite"));
    assert!(guard.dice().user_dice().is_empty());
    assert_eq!(guard.functions().user_functions().count(), 1);
}

#[test]
fn test_duplicates_within_one_batch() {
    let registry = registry();
    let err = register(
        &registry,
        &[("a", "function heal player"), ("b", "function heal player")],
    )
    .unwrap_err();
    assert!(matches!(err.kind, EvalErrorKind::DuplicateFunction { .. }));

    let err = register(&registry, &[("a", "dice X #{count}x\ndice X #{count}y")]).unwrap_err();
    assert!(matches!(err.kind, EvalErrorKind::DuplicateDice { .. }));
    assert_eq!(registry.read().functions().user_functions().count(), 0);
}

#[test]
fn test_engine_failure_registers_nothing() {
    let registry = registry();
    let err = register(&registry, &[("broken", "function heal player\nfail oops")]).unwrap_err();
    assert_eq!(err.message, "oops");
    assert!(!registry.read().functions().contains_user("heal"));
    assert!(!registry.read().functions().contains_user("broken"));
}

#[test]
fn test_unknown_permission_name() {
    let registry = registry();
    let err = register(&registry, &[("a", "function heal admin")]).unwrap_err();
    assert_eq!(
        err.kind,
        EvalErrorKind::UnknownPermission { name: "admin".into() }
    );
}

#[test]
fn test_invalid_dice_template() {
    let registry = registry();
    let err = register(&registry, &[("a", "dice Bad #{count}(")]).unwrap_err();
    assert_eq!(err.category(), ErrorCategory::UnknownPattern);
}

#[test]
fn test_extension_failure_is_wrapped() {
    let registry = registry();
    let mut batch = ExportBatch::new();
    batch
        .export_function(
            "explode",
            Vec::new(),
            "any",
            ExtensionHandle::from_fn(|_, _| Err(EvalError::new("table missing"))),
            "player",
        )
        .unwrap();
    batch.merge_into(&mut registry.write()).unwrap();

    let mut ctx = context_on(&registry);
    let err = ctx.call_function("explode", Vec::new()).unwrap_err();
    assert_eq!(
        err.kind,
        EvalErrorKind::FunctionFailed {
            name: "explode".into(),
            message: "table missing".into(),
        }
    );
}

#[test]
fn test_permission_override_and_undefine() {
    let registry = registry();
    register(&registry, &[("a", "function heal trusted")]).unwrap();

    {
        let mut guard = registry.write();
        let functions = guard.functions_mut();
        assert_eq!(functions.permission("heal"), Some(PermissionLevel::Trusted));
        assert_eq!(functions.permission("abs"), Some(PermissionLevel::Player));

        functions
            .override_permission("abs", PermissionLevel::Trusted)
            .unwrap();
        assert_eq!(functions.permission("abs"), Some(PermissionLevel::Trusted));
        let abs = functions.builtin_function("abs").unwrap().clone();
        assert!(functions.is_builtin(&abs));
        assert!(functions.resolve("abs").unwrap().is_builtin());

        assert!(functions
            .override_permission("missing", PermissionLevel::Player)
            .is_err());

        assert!(functions.undefine_function("heal"));
        assert!(!functions.undefine_function("heal"));
        assert!(!functions.undefine_function("abs"));
        assert!(functions.permission("heal").is_none());
    }

    register(&registry, &[("a", "function heal player\ndice Pool #{count}p")]).unwrap();
    registry.write().clear_user_definitions();
    let guard = registry.read();
    assert_eq!(guard.functions().user_functions().count(), 0);
    assert!(guard.dice().user_dice().is_empty());
    assert_eq!(
        guard.functions().permission("abs"),
        Some(PermissionLevel::Player)
    );
}

#[test]
fn test_function_listings_are_sorted() {
    let registry = registry();
    register(&registry, &[("a", "function zap player\nfunction bolt player")]).unwrap();
    let guard = registry.read();
    let names: Vec<&str> = guard.functions().user_functions().map(|f| f.name()).collect();
    assert_eq!(names, ["bolt", "zap"]);

    let builtins: Vec<&str> = guard
        .functions()
        .builtin_functions()
        .map(|f| f.name())
        .collect();
    let mut sorted = builtins.clone();
    sorted.sort_unstable();
    assert_eq!(builtins, sorted);
}

#[test]
fn test_concurrent_sessions_share_one_registry() {
    let registry = registry();
    register(&registry, &[("a", "function double player")]).unwrap();

    std::thread::scope(|scope| {
        let readers: Vec<_> = (0..4_i64)
            .map(|n| {
                let registry = registry.clone();
                scope.spawn(move || {
                    let mut ctx = context_on(&registry);
                    for _ in 0..50 {
                        let value = ctx
                            .call_function("double", vec![DataValue::long(n)])
                            .unwrap();
                        assert_eq!(value, DataValue::long(n * 2));
                        let roll = ctx.roll(&RollExpression::new("2d6")).unwrap();
                        assert!((2..=12).contains(&roll.as_long().unwrap()));
                    }
                })
            })
            .collect();

        let writer_registry = registry.clone();
        let writer = scope.spawn(move || {
            for i in 0..20 {
                let body = format!("function extra{i} player");
                register(&writer_registry, &[("w", body.as_str())]).unwrap();
            }
        });

        for reader in readers {
            reader.join().unwrap();
        }
        writer.join().unwrap();
    });

    assert_eq!(registry.read().functions().user_functions().count(), 21);
}
