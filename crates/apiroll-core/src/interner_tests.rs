use crate::{Interner, Name};

#[test]
fn intern_deduplicates() {
    let mut interner = Interner::new();

    let a = interner.intern("Widget");
    let b = interner.intern("Widget");
    let c = interner.intern("Gadget");

    assert_eq!(a, b);
    assert_ne!(a, c);
    assert_eq!(interner.len(), 2);
}

#[test]
fn get_does_not_intern() {
    let mut interner = Interner::new();
    let known = interner.intern("known");

    assert_eq!(interner.get("known"), Some(known));
    assert_eq!(interner.get("unknown"), None);
    assert_eq!(interner.len(), 1);
}

#[test]
fn resolve_roundtrip() {
    let mut interner = Interner::new();
    let name = interner.intern("Date");
    assert_eq!(interner.resolve(name), "Date");
}

#[test]
fn names_order_by_insertion() {
    let mut interner = Interner::new();
    let z: Name = interner.intern("z");
    let a: Name = interner.intern("a");
    assert!(z < a);
    assert_eq!(z.as_u32(), 0);
}
