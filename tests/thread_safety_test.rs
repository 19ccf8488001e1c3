//! Integration tests for sharing schemas and message registries across threads.

use std::sync::Arc;
use std::thread;

use litmus::{safe_parse, Action, Config, MessageRegistry, Reference, Schema, SchemaLike};
use serde_json::json;

#[test]
fn test_schema_is_send_sync() {
    fn assert_send_sync<T: Send + Sync>() {}
    assert_send_sync::<litmus::ObjectSchema>();
    assert_send_sync::<litmus::UnionSchema>();
    assert_send_sync::<litmus::VariantSchema>();
    assert_send_sync::<litmus::PipeSchema>();
    assert_send_sync::<MessageRegistry>();
    assert_send_sync::<Config>();
}

#[test]
fn test_concurrent_validation() {
    let schema: Arc<dyn SchemaLike> = Arc::new(
        Schema::object()
            .field("id", Schema::number().pipe(Action::integer()))
            .field("name", Schema::string().pipe(Action::trim())),
    );

    let handles: Vec<_> = (0..10)
        .map(|i| {
            let schema = Arc::clone(&schema);
            thread::spawn(move || {
                let result = safe_parse(
                    &*schema,
                    json!({"id": i, "name": format!(" User{} ", i)}),
                    &Config::default(),
                );
                assert!(result.success);
                assert_eq!(result.output.unwrap()["name"], json!(format!("User{}", i)));
            })
        })
        .collect();

    for handle in handles {
        handle.join().unwrap();
    }
}

#[test]
fn test_concurrent_failures_keep_their_own_issues() {
    let schema = Arc::new(Schema::array(Schema::number()));

    let handles: Vec<_> = (0..8)
        .map(|i| {
            let schema = Arc::clone(&schema);
            thread::spawn(move || {
                let mut items = vec![json!(0); 8];
                items[i] = json!("bad");
                let result = safe_parse(&*schema, json!(items), &Config::default());
                let issues = result.issues.unwrap();
                assert_eq!(issues.len(), 1);
                assert_eq!(issues.first().path.to_string(), format!("[{}]", i));
            })
        })
        .collect();

    for handle in handles {
        handle.join().unwrap();
    }
}

#[test]
fn test_shared_registry_across_threads() {
    let registry = Arc::new(MessageRegistry::new());
    registry.set_specific_message(Reference::new("number"), "not a number", None);
    registry.set_specific_message(Reference::new("number"), "keine Zahl", Some("de"));

    let handles: Vec<_> = ["en", "de", "en", "de"]
        .into_iter()
        .map(|lang| {
            let config = Config::new()
                .with_lang(lang)
                .with_messages(Arc::clone(&registry));
            thread::spawn(move || {
                let result = safe_parse(&Schema::number(), json!("x"), &config);
                let message = result.issues.unwrap().first().message.clone();
                let expected = if lang == "de" { "keine Zahl" } else { "not a number" };
                assert_eq!(message, expected);
            })
        })
        .collect();

    for handle in handles {
        handle.join().unwrap();
    }
}

#[test]
fn test_registry_writes_while_reading() {
    let registry = Arc::new(MessageRegistry::new());

    let writer = {
        let registry = Arc::clone(&registry);
        thread::spawn(move || {
            for i in 0..100 {
                registry.set_global_message(format!("message {}", i), None);
            }
        })
    };

    let readers: Vec<_> = (0..4)
        .map(|_| {
            let config = Config::new().with_messages(Arc::clone(&registry));
            thread::spawn(move || {
                for _ in 0..100 {
                    let result = safe_parse(&Schema::string(), json!(1), &config);
                    assert!(!result.success);
                }
            })
        })
        .collect();

    writer.join().unwrap();
    for reader in readers {
        reader.join().unwrap();
    }
    assert!(registry.global_message(None).is_some());
}
