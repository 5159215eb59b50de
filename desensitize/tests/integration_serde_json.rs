//! JSON interop and declarative configuration.

#![cfg(feature = "json")]

use desensitize::{Cascade, ConfigError, Desensitizer, Email, Value, config::DesensitizeConfig};
use pretty_assertions::assert_eq;
use serde_json::json;

#[derive(Clone, Debug, Cascade)]
struct Account {
    #[sensitive(Email)]
    email: String,
    #[sensitive("BankCard")]
    card: String,
    nickname: String,
}

#[test]
fn json_documents_mask_against_map_shapes() {
    let engine = Desensitizer::builder().build().unwrap();
    let shape = engine
        .descriptor("List<Map<String, @Email String>>")
        .unwrap();
    let document = Value::from(json!([
        { "primary": "123456@qq.com" },
        { "backup": "abc@example.com" }
    ]));

    let masked = engine.mask(&document, &shape).unwrap();
    assert_eq!(
        serde_json::Value::from(masked),
        json!([
            { "primary": "1*****@qq.com" },
            { "backup": "a**@example.com" }
        ])
    );
}

#[test]
fn masked_objects_render_as_json_objects() {
    let config = DesensitizeConfig::from_json_str(
        r#"{ "strategies": { "BankCard": { "kind": "keep", "first": 6, "last": 4 } } }"#,
    )
    .unwrap();
    let engine = Desensitizer::builder()
        .config(config)
        .cascade::<Account>()
        .build()
        .unwrap();
    let shape = engine.describe::<Account>().unwrap();
    let account = Value::object(Account {
        email: "123456@qq.com".into(),
        card: "6222021234567890".into(),
        nickname: "neo".into(),
    });

    let masked = engine.mask(&account, &shape).unwrap();
    assert_eq!(
        serde_json::Value::from(&masked),
        json!({
            "email": "1*****@qq.com",
            "card": "622202******7890",
            "nickname": "neo"
        })
    );
}

#[test]
fn custom_identifier_without_registration_is_skipped() {
    let engine = Desensitizer::builder()
        .cascade::<Account>()
        .build()
        .unwrap();
    let shape = engine.describe::<Account>().unwrap();
    let account = Account {
        email: "a@b.c".into(),
        card: "6222021234567890".into(),
        nickname: "neo".into(),
    };
    let masked = engine.mask_as(account, &shape).unwrap();
    assert_eq!(masked.card, "6222021234567890");
    assert_eq!(masked.email, "a@b.c");
}

#[test]
fn configuration_can_disable_builtins() {
    let config = DesensitizeConfig::from_json_str(r#"{ "builtins": false }"#).unwrap();
    let engine = Desensitizer::builder().config(config).build().unwrap();
    assert!(engine.strategies().is_empty());

    let shape = engine.descriptor("@Email String").unwrap();
    let value = Value::text("123456@qq.com");
    assert_eq!(engine.mask(&value, &shape).unwrap(), value);
}

#[test]
fn malformed_configuration_is_a_config_error() {
    let err = DesensitizeConfig::from_json_str(r#"{ "strategies": [] }"#).unwrap_err();
    assert!(matches!(err, ConfigError::Json(_)));
}
