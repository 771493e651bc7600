use super::*;
use crate::error::Error;

#[test]
fn test_sbt_offsets_are_running_primitive_counts() {
    assert_eq!(sbt_offsets([2u32, 1, 3]).unwrap(), vec![0, 2, 3]);
    assert!(sbt_offsets(Vec::new()).unwrap().is_empty());
}

#[test]
fn test_sbt_offset_at_field_limit_is_accepted() {
    let max = AccelerationInstance::MAX_SBT_OFFSET;
    assert_eq!(sbt_offsets([max, 7]).unwrap(), vec![0, max]);
}

#[test]
fn test_sbt_offset_past_field_limit_is_rejected() {
    let max = AccelerationInstance::MAX_SBT_OFFSET;
    assert!(matches!(sbt_offsets([max, 1, 1]), Err(Error::InvalidResource(_))));
}

#[test]
fn test_hit_group_count_overflow_is_rejected() {
    assert!(matches!(sbt_offsets([1, u32::MAX]), Err(Error::InvalidResource(_))));
}
