use super::math::{ring_delta, wrap};
use super::types::{Player, Screen, TailSegment, Vec2};

/// Position an entity at `(x, y)` occupied before its last step along
/// `direction`: x minus the step, y plus it. The y sign is inverted
/// relative to the direction vector, matching the movement convention
/// where "up" decreases y.
pub fn trailing_position(x: i32, y: i32, direction: Vec2, screen: &Screen) -> (i32, i32) {
  (
    wrap(x - direction.x, screen.width),
    wrap(y + direction.y, screen.height),
  )
}

/// Follow-the-leader propagation, walked strictly in index order 0..n.
/// Each segment moves to the position its leader occupied before this
/// tick and records the step it took so its own follower can do the same
/// on the next tick. A turn at the head therefore ripples down the tail
/// one segment per tick. Out-of-order updates would corrupt the chain.
pub fn propagate_tail(player: &mut Player, screen: &Screen) {
  let mut lead_x = player.x;
  let mut lead_y = player.y;
  let mut lead_direction = player.move_direction;

  for segment in player.tail.iter_mut() {
    let old_x = segment.x;
    let old_y = segment.y;
    let (new_x, new_y) = trailing_position(lead_x, lead_y, lead_direction, screen);
    segment.x = new_x;
    segment.y = new_y;
    segment.move_direction = Vec2 {
      x: ring_delta(new_x, old_x, screen.width),
      y: ring_delta(old_y, new_y, screen.height),
    };
    lead_x = segment.x;
    lead_y = segment.y;
    lead_direction = segment.move_direction;
  }
}

/// Appends one segment behind the current end of the tail, or behind the
/// head when the tail is empty, using the same position-minus-direction
/// rule as propagation. The new segment has no recorded step yet.
pub fn grow_tail(player: &mut Player, screen: &Screen) {
  let (x, y) = match player.tail.last() {
    Some(last) => trailing_position(last.x, last.y, last.move_direction, screen),
    None => trailing_position(player.x, player.y, player.move_direction, screen),
  };
  player.tail.push(TailSegment {
    x,
    y,
    move_direction: Vec2::ZERO,
  });
}

#[cfg(test)]
mod tests {
  use super::*;
  use crate::game::types::Direction;

  fn make_player(x: i32, y: i32, tail: Vec<TailSegment>) -> Player {
    Player {
      id: "p1".to_string(),
      nickname: "Test".to_string(),
      x,
      y,
      move_direction: Vec2::ZERO,
      tail,
      score: 0,
      last_key: None,
    }
  }

  fn segment(x: i32, y: i32, direction: Vec2) -> TailSegment {
    TailSegment {
      x,
      y,
      move_direction: direction,
    }
  }

  fn step_head(player: &mut Player, direction: Direction, screen: &Screen) {
    let step = direction.vector();
    player.move_direction = step;
    player.x = wrap(player.x + step.x, screen.width);
    player.y = wrap(player.y - step.y, screen.height);
    propagate_tail(player, screen);
  }

  fn positions(player: &Player) -> Vec<(i32, i32)> {
    player.tail.iter().map(|s| (s.x, s.y)).collect()
  }

  // Regression pin for the sign convention: each segment must retrace the
  // head's positions with one tick of delay per segment, including across
  // a turn.
  #[test]
  fn segments_trail_head_by_one_tick_each_through_turns() {
    let screen = Screen {
      width: 10,
      height: 10,
    };
    let up = Direction::Up.vector();
    let mut player = make_player(5, 5, vec![segment(5, 6, up), segment(5, 7, up)]);
    player.move_direction = up;

    step_head(&mut player, Direction::Up, &screen);
    assert_eq!((player.x, player.y), (5, 4));
    assert_eq!(positions(&player), vec![(5, 5), (5, 6)]);

    step_head(&mut player, Direction::Up, &screen);
    assert_eq!((player.x, player.y), (5, 3));
    assert_eq!(positions(&player), vec![(5, 4), (5, 5)]);

    step_head(&mut player, Direction::Right, &screen);
    assert_eq!((player.x, player.y), (6, 3));
    assert_eq!(positions(&player), vec![(5, 3), (5, 4)]);

    step_head(&mut player, Direction::Right, &screen);
    assert_eq!((player.x, player.y), (7, 3));
    assert_eq!(positions(&player), vec![(6, 3), (5, 3)]);
    // The turn has now reached segment 0 but not yet segment 1.
    assert_eq!(player.tail[0].move_direction, Vec2 { x: 1, y: 0 });
    assert_eq!(player.tail[1].move_direction, Vec2 { x: 0, y: 1 });
  }

  #[test]
  fn propagation_follows_the_head_across_the_edge() {
    let screen = Screen {
      width: 10,
      height: 10,
    };
    let left = Direction::Left.vector();
    let mut player = make_player(0, 5, vec![segment(1, 5, left)]);
    player.move_direction = left;

    step_head(&mut player, Direction::Left, &screen);
    assert_eq!((player.x, player.y), (9, 5));
    assert_eq!(positions(&player), vec![(0, 5)]);
    // The wrap step still reads as a unit step to the follower.
    assert_eq!(player.tail[0].move_direction, Vec2 { x: -1, y: 0 });

    step_head(&mut player, Direction::Left, &screen);
    assert_eq!((player.x, player.y), (8, 5));
    assert_eq!(positions(&player), vec![(9, 5)]);
  }

  #[test]
  fn empty_tail_propagation_is_a_no_op() {
    let screen = Screen {
      width: 10,
      height: 10,
    };
    let mut player = make_player(3, 3, Vec::new());
    propagate_tail(&mut player, &screen);
    assert!(player.tail.is_empty());
  }

  #[test]
  fn grow_tail_extends_behind_the_head_then_behind_the_last_segment() {
    let screen = Screen {
      width: 10,
      height: 10,
    };
    let mut player = make_player(5, 5, Vec::new());
    player.move_direction = Direction::Right.vector();

    grow_tail(&mut player, &screen);
    assert_eq!(positions(&player), vec![(4, 5)]);
    assert_eq!(player.tail[0].move_direction, Vec2::ZERO);

    // The new last segment has no recorded step, so a further grow lands
    // on the same cell until propagation separates them.
    grow_tail(&mut player, &screen);
    assert_eq!(positions(&player), vec![(4, 5), (4, 5)]);
  }
}
