use desensitize::{Cascade, Password};

#[derive(Clone, Debug, Cascade)]
struct Secret(#[sensitive(Password)] String);

#[derive(Clone, Debug, Cascade)]
struct Empty;

fn main() {
    use desensitize::Reconstruct;

    let secret = Secret("hunter2".into());
    assert_eq!(secret.field_names(), ["0"]);
    assert!(Empty.field_values().is_empty());
}
