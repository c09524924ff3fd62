pub fn wrap(value: i32, extent: i32) -> i32 {
  value.rem_euclid(extent)
}

/// Shortest signed difference between two coordinates on a ring of the
/// given extent, so a unit step that crossed an edge still reads as a
/// unit step.
pub fn ring_delta(to: i32, from: i32, extent: i32) -> i32 {
  let raw = wrap(to - from, extent);
  if raw > extent / 2 {
    raw - extent
  } else {
    raw
  }
}
