use super::*;

#[test]
fn test_new_entry_starts_with_one_owner() {
    let entry = ResourceEntry::new("shader", "Cow".to_string());
    assert_eq!(entry.use_count(), 1);
    assert_eq!(entry.key(), "Cow");
    assert_eq!(**entry.resource(), "shader");
}

#[test]
fn test_grab_then_release_sequence() {
    let mut entry = ResourceEntry::new(0u8, 1u32);

    assert_eq!(entry.grab(), 2);
    assert_eq!(entry.release(), ReleaseOutcome::Alive(1));
    assert_eq!(entry.release(), ReleaseOutcome::ZeroCrossing);
    assert_eq!(entry.use_count(), 0);
}

#[test]
fn test_release_after_zero_saturates() {
    let mut entry = ResourceEntry::new(0u8, 1u32);
    assert_eq!(entry.release(), ReleaseOutcome::ZeroCrossing);

    // Only one zero-crossing, ever
    assert_eq!(entry.release(), ReleaseOutcome::Alive(0));
    assert_eq!(entry.use_count(), 0);
}

#[test]
fn test_entry_holds_the_only_strong_reference() {
    let entry = ResourceEntry::new(vec![1, 2, 3], 0u32);
    assert_eq!(Rc::strong_count(entry.resource()), 1);
}
