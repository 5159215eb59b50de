use std::{marker::PhantomData, time::Instant};

use desensitize::{Cascade, Email};

/// A type with no value conversions.
#[derive(Clone, Debug)]
struct Handle;

#[derive(Clone, Debug, Cascade)]
struct Session<T> {
    #[sensitive(Email)]
    user: String,
    #[not_sensitive]
    started: Instant,
    #[not_sensitive]
    handle: Handle,
    _kind: PhantomData<T>,
}

fn main() {
    let _ = Session::<Handle> {
        user: "a@b.c".into(),
        started: Instant::now(),
        handle: Handle,
        _kind: PhantomData,
    };
}
