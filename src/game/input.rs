use super::types::Direction;

pub fn parse_direction(key: &str) -> Option<Direction> {
  match key {
    "up" => Some(Direction::Up),
    "right" => Some(Direction::Right),
    "down" => Some(Direction::Down),
    "left" => Some(Direction::Left),
    _ => None,
  }
}

#[cfg(test)]
mod tests {
  use super::*;

  #[test]
  fn accepts_exactly_the_four_movement_keys() {
    assert_eq!(parse_direction("up"), Some(Direction::Up));
    assert_eq!(parse_direction("right"), Some(Direction::Right));
    assert_eq!(parse_direction("down"), Some(Direction::Down));
    assert_eq!(parse_direction("left"), Some(Direction::Left));
    assert_eq!(parse_direction("Up"), None);
    assert_eq!(parse_direction("diagonal"), None);
    assert_eq!(parse_direction(""), None);
  }
}
