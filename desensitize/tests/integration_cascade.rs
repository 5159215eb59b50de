//! Cascade traversal: nested types, generic types, explicit signatures and
//! registration errors.

use std::{collections::HashMap, marker::PhantomData, time::Duration};

use desensitize::{
    Cascade, ChineseName, ConfigError, Describe, Desensitizer, Email, FromValue, IdCardNumber,
    IntoValue, MaskError, Password, PhoneNumber, Reconstruct, Response, Value,
};
use pretty_assertions::assert_eq;

#[derive(Clone, Debug, PartialEq, Cascade)]
struct Contact {
    #[sensitive(PhoneNumber)]
    phone_number: String,
    #[sensitive(Email)]
    emails: Vec<String>,
}

#[derive(Clone, Debug, PartialEq, Cascade)]
struct Customer {
    #[sensitive(ChineseName)]
    name: String,
    #[sensitive(IdCardNumber)]
    id_card: Option<String>,
    contact: Contact,
    #[cascade]
    alternates: Vec<Contact>,
    level: u8,
    #[not_sensitive]
    session_timeout: Duration,
}

#[derive(Clone, Debug, PartialEq, Cascade)]
#[cascade(name = "Page")]
struct Page<T> {
    items: Vec<T>,
    total: u64,
}

#[derive(Clone, Debug, PartialEq, Cascade)]
struct Credentials(#[sensitive(Password)] String, String);

#[derive(Clone, Debug, PartialEq, Cascade)]
struct Directory {
    #[shape("Map<@ChineseName String, @Cascade Contact>")]
    entries: std::collections::BTreeMap<String, Contact>,
}

#[derive(Clone, Debug, PartialEq, Cascade)]
struct TypedId<T> {
    #[sensitive(IdCardNumber)]
    id: String,
    _marker: PhantomData<T>,
}

#[derive(Clone, Debug, PartialEq, Cascade)]
struct Labels {
    #[sensitive(Email)]
    emails_by_label: HashMap<String, String>,
}

#[derive(Clone, Debug, PartialEq, Cascade)]
struct Misplaced {
    #[sensitive(Email)]
    contact: Contact,
}

fn contact(phone: &str) -> Contact {
    Contact {
        phone_number: phone.into(),
        emails: vec!["123456@qq.com".into()],
    }
}

fn engine() -> Desensitizer {
    Desensitizer::builder()
        .cascade::<Contact>()
        .cascade::<Customer>()
        .cascade::<Page<Contact>>()
        .cascade::<Credentials>()
        .cascade::<Directory>()
        .cascade::<TypedId<Duration>>()
        .build()
        .unwrap()
}

#[test]
fn nested_and_listed_cascades_are_masked() {
    let engine = engine();
    let shape = engine.describe::<Customer>().unwrap();
    let customer = Customer {
        name: "张三".into(),
        id_card: Some("110101199003071234".into()),
        contact: contact("12345678910"),
        alternates: vec![contact("10987654321")],
        level: 3,
        session_timeout: Duration::from_secs(30),
    };

    let masked = engine.mask_as(customer.clone(), &shape).unwrap();
    assert_eq!(masked.name, "张*");
    assert_eq!(masked.id_card.as_deref(), Some("110101********1234"));
    assert_eq!(masked.contact.phone_number, "123****8910");
    assert_eq!(masked.contact.emails, ["1*****@qq.com"]);
    assert_eq!(masked.alternates[0].phone_number, "109****4321");
    assert_eq!(masked.level, 3);
    assert_eq!(masked.session_timeout, Duration::from_secs(30));
    assert_eq!(customer.contact.phone_number, "12345678910");
}

#[test]
fn absent_optional_field_stays_absent() {
    let engine = engine();
    let shape = engine.describe::<Customer>().unwrap();
    let customer = Customer {
        name: "李四".into(),
        id_card: None,
        contact: contact("12345678910"),
        alternates: Vec::new(),
        level: 0,
        session_timeout: Duration::ZERO,
    };
    let masked = engine.mask_as(customer, &shape).unwrap();
    assert_eq!(masked.id_card, None);
}

#[test]
fn not_sensitive_fields_are_not_reported() {
    let customer = Customer {
        name: "王五".into(),
        id_card: None,
        contact: contact("1"),
        alternates: Vec::new(),
        level: 1,
        session_timeout: Duration::ZERO,
    };
    assert_eq!(
        customer.field_names(),
        ["name", "id_card", "contact", "alternates", "level"]
    );
    assert_eq!(customer.field_values().len(), 5);
}

#[test]
fn generic_fields_take_the_declared_type_argument() {
    let engine = engine();
    let shape = engine
        .descriptor("@Cascade Page<@Cascade Contact>")
        .unwrap();
    let page = Page {
        items: vec![contact("12345678910"), contact("10987654321")],
        total: 2,
    };

    let masked = engine.mask_as(page, &shape).unwrap();
    assert_eq!(masked.total, 2);
    assert_eq!(masked.items[0].phone_number, "123****8910");
    assert_eq!(masked.items[1].phone_number, "109****4321");
}

#[test]
fn generic_type_argument_can_carry_strategies() {
    let engine = engine();
    let shape = engine.descriptor("@Cascade Page<@Email String>").unwrap();
    let page = Page {
        items: vec!["123456@qq.com".to_owned()],
        total: 1,
    };
    let masked = engine.mask_as(page, &shape).unwrap();
    assert_eq!(masked.items, ["1*****@qq.com"]);
}

#[test]
fn describe_of_generic_type_declares_its_argument() {
    let engine = engine();
    let shape = engine.describe::<Page<Contact>>().unwrap();
    assert_eq!(shape.to_string(), "@Cascade Page<@Cascade Contact>");

    let raw = Page {
        items: vec!["plain".to_owned()],
        total: 1,
    }
    .into_value();
    let unmasked = engine
        .mask(&raw, &engine.describe::<Page<String>>().unwrap())
        .unwrap();
    assert!(unmasked.ptr_eq(&raw));
}

#[test]
fn tuple_struct_fields_are_positional() {
    let engine = engine();
    let shape = engine.describe::<Credentials>().unwrap();
    let masked = engine
        .mask_as(Credentials("hunter2".into(), "alice".into()), &shape)
        .unwrap();
    assert_eq!(masked, Credentials("*******".into(), "alice".into()));
}

#[test]
fn explicit_signature_reaches_map_keys_and_values() {
    let engine = engine();
    let shape = engine.describe::<Directory>().unwrap();
    let directory = Directory {
        entries: [("张三".to_owned(), contact("12345678910"))].into(),
    };
    let masked = engine.mask_as(directory, &shape).unwrap();
    let (name, entry) = masked.entries.into_iter().next().unwrap();
    assert_eq!(name, "张*");
    assert_eq!(entry.phone_number, "123****8910");
}

#[test]
fn phantom_data_needs_no_conversions() {
    let engine = engine();
    // `Duration` has no declared metadata, so the type is used raw.
    let shape = engine.descriptor("@Cascade TypedId").unwrap();
    let id = TypedId::<Duration> {
        id: "110101199003071234".into(),
        _marker: PhantomData,
    };
    let masked = engine.mask_as(id, &shape).unwrap();
    assert_eq!(masked.id, "110101********1234");
}

#[test]
fn response_envelope_masks_its_body() {
    let engine = engine();
    let shape = engine
        .build_descriptor(&Response::type_metadata(
            <Vec<Contact> as Describe>::type_metadata(),
        ))
        .unwrap();
    let response = Response::ok(vec![contact("12345678910")]).with_header("x-request-id", "42");

    let masked = engine.mask_as(response, &shape).unwrap();
    assert_eq!(masked.status, 200);
    assert_eq!(masked.headers[0].1, "42");
    let body = Vec::<Contact>::from_value(masked.body).unwrap();
    assert_eq!(body[0].phone_number, "123****8910");
}

#[test]
fn runtime_type_must_match_declared_type() {
    let engine = engine();
    let shape = engine.describe::<Contact>().unwrap();
    let credentials = Value::object(Credentials("x".into(), "y".into()));
    let err = engine.mask(&credentials, &shape).unwrap_err();
    assert!(matches!(
        err,
        MaskError::TypeMismatch { ref declared, ref found }
            if declared == "Contact" && found == "Credentials"
    ));
}

#[test]
fn unregistered_field_type_fails_build() {
    let err = Desensitizer::builder()
        .cascade::<Customer>()
        .build()
        .unwrap_err();
    match err {
        ConfigError::Field {
            type_name,
            field,
            source,
        } => {
            assert_eq!(type_name, "Customer");
            assert_eq!(field, "contact");
            assert!(matches!(*source, ConfigError::UnknownCascadeType(ref name) if name == "Contact"));
        }
        other => panic!("unexpected error: {other}"),
    }
}

#[test]
fn duplicate_cascade_registration_fails_build() {
    let err = Desensitizer::builder()
        .cascade::<Contact>()
        .cascade::<Contact>()
        .build()
        .unwrap_err();
    assert!(matches!(err, ConfigError::DuplicateCascadeType(ref name) if name == "Contact"));
}

#[test]
fn descriptor_arity_is_checked_against_the_binding() {
    let engine = engine();
    let err = engine
        .descriptor("@Cascade Page<String, String>")
        .unwrap_err();
    assert!(matches!(
        err,
        ConfigError::Arity {
            expected: 1,
            found: 2,
            ..
        }
    ));
}

#[test]
fn sensitive_map_field_masks_each_value() {
    let engine = Desensitizer::builder().cascade::<Labels>().build().unwrap();
    let shape = engine.describe::<Labels>().unwrap();
    let labels = Labels {
        emails_by_label: HashMap::from([("home".to_owned(), "123456@qq.com".to_owned())]),
    };

    let masked = engine.mask_as(labels, &shape).unwrap();
    assert_eq!(masked.emails_by_label["home"], "1*****@qq.com");
}

#[test]
fn strategy_on_cascaded_field_fails_build() {
    let err = Desensitizer::builder()
        .cascade::<Contact>()
        .cascade::<Misplaced>()
        .build()
        .unwrap_err();
    match err {
        ConfigError::Field { field, source, .. } => {
            assert_eq!(field, "contact");
            assert!(matches!(*source, ConfigError::Signature { .. }));
        }
        other => panic!("unexpected error: {other}"),
    }
}

#[test]
fn strategy_on_container_descriptor_is_rejected() {
    let engine = engine();
    for signature in ["@Email Map<String, String>", "@Email List<String>"] {
        assert!(matches!(
            engine.descriptor(signature),
            Err(ConfigError::Signature { .. })
        ));
    }
}
