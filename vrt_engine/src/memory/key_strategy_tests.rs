use super::*;

#[test]
fn test_explicit_uses_caller_key() {
    let strategy = KeyStrategy::Explicit;
    let key: String = strategy.resolve(Some("Cow".to_string())).unwrap();
    assert_eq!(key, "Cow");
}

#[test]
fn test_explicit_without_key_is_mismatch() {
    let strategy = KeyStrategy::Explicit;
    let result: Result<String> = strategy.resolve(None);
    assert!(matches!(result, Err(Error::KeyStrategyMismatch(_))));
}

#[test]
fn test_auto_index_counts_up_on_commit() {
    let mut strategy = KeyStrategy::auto_index();

    assert_eq!(strategy.resolve::<u32>(None).unwrap(), 0);
    // Resolving alone does not consume the index
    assert_eq!(strategy.resolve::<u32>(None).unwrap(), 0);

    strategy.commit().unwrap();
    assert_eq!(strategy.resolve::<u32>(None).unwrap(), 1);
    strategy.commit().unwrap();
    assert_eq!(strategy.resolve::<u64>(None).unwrap(), 2);
}

#[test]
fn test_auto_index_rejects_explicit_key() {
    let strategy = KeyStrategy::auto_index();
    assert!(matches!(strategy.resolve(Some(5u32)), Err(Error::KeyStrategyMismatch(_))));
}

#[test]
fn test_auto_index_exhaustion() {
    let mut strategy = KeyStrategy::AutoIndex { next: u32::MAX };
    assert_eq!(strategy.resolve::<u32>(None).unwrap(), u32::MAX);
    assert!(matches!(strategy.commit(), Err(Error::OutOfMemory)));
}

#[test]
fn test_string_keys_from_auto_index() {
    assert_eq!(String::from_auto_index(12), "12");
    assert_eq!(usize::from_auto_index(3), 3);
}

#[test]
fn test_explicit_commit_is_noop() {
    let mut strategy = KeyStrategy::Explicit;
    strategy.commit().unwrap();
    assert_eq!(strategy, KeyStrategy::Explicit);
}
