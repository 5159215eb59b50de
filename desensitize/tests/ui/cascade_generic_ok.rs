use std::collections::HashMap;

use desensitize::{Cascade, Desensitizer};

#[derive(Clone, Debug, Cascade)]
struct Page<T> {
    items: Vec<T>,
    next: Option<String>,
}

#[derive(Clone, Debug, Cascade)]
struct Keyed<K, V>
where
    K: std::hash::Hash + Eq,
{
    entries: HashMap<K, V>,
}

fn main() {
    let engine = Desensitizer::builder()
        .cascade::<Page<String>>()
        .cascade::<Keyed<String, u64>>()
        .build()
        .unwrap();
    let shape = engine.describe::<Page<String>>().unwrap();
    assert_eq!(shape.to_string(), "@Cascade Page<String>");
}
