//! State encoder: game state to the agent's feature vector
//!
//! The policy never sees the grid itself, only an 11-value summary of what
//! is next to the head and where the food sits. Everything is expressed
//! relative to the current heading, so the same weights apply whichever way
//! the snake points.

use crate::game::{Action, GameState};

/// Length of the encoded state vector
pub const STATE_DIM: usize = 11;

/// Encoded state: 0/1 features, ready for the network
pub type StateFeatures = [f32; STATE_DIM];

/// Encode the current game state as a feature vector.
///
/// Layout:
/// - `[0..3]`  danger one cell ahead / to the relative right / to the
///   relative left of the heading
/// - `[3..7]`  one-hot heading (left, right, up, down)
/// - `[7..11]` food left of / right of / above / below the head
///
/// Pure and recomputed on every call: the underlying state changes between
/// the pre-step and post-step encodings of a single transition, so caching
/// here would hand the agent stale observations.
pub fn encode_state(state: &GameState) -> StateFeatures {
    let head = state.snake.head();
    let heading = state.snake.direction;

    // Probe cells are rotations of the heading, not absolute compass points
    let ahead = head.moved_in_direction(heading);
    let right = head.moved_in_direction(heading.turned(Action::TurnRight));
    let left = head.moved_in_direction(heading.turned(Action::TurnLeft));

    use crate::game::Direction::*;
    let food = state.food;

    [
        bit(state.is_collision(ahead)),
        bit(state.is_collision(right)),
        bit(state.is_collision(left)),
        bit(heading == Left),
        bit(heading == Right),
        bit(heading == Up),
        bit(heading == Down),
        bit(food.x < head.x),
        bit(food.x > head.x),
        bit(food.y < head.y),
        bit(food.y > head.y),
    ]
}

fn bit(flag: bool) -> f32 {
    if flag {
        1.0
    } else {
        0.0
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::game::{Direction, GameConfig, GameEngine, GameState, Position, Snake};
    use std::collections::VecDeque;

    fn state_with(head: Position, direction: Direction, food: Position) -> GameState {
        GameState::new(Snake::new(head, direction), food, 10, 10)
    }

    #[test]
    fn test_open_grid_heading_right() {
        // Head mid-grid heading right, food below and to the right
        let state = state_with(Position::new(5, 5), Direction::Right, Position::new(7, 8));
        let features = encode_state(&state);

        assert_eq!(
            features,
            [
                0.0, 0.0, 0.0, // no danger anywhere
                0.0, 1.0, 0.0, 0.0, // heading right
                0.0, 1.0, 0.0, 1.0, // food right of and below the head
            ]
        );
    }

    #[test]
    fn test_wall_ahead_is_relative_to_heading() {
        // Pressed against the right wall: danger ahead when heading right
        let state = state_with(Position::new(9, 5), Direction::Right, Position::new(0, 5));
        let features = encode_state(&state);
        assert_eq!(features[0], 1.0); // ahead
        assert_eq!(features[1], 0.0); // relative right (down) is open
        assert_eq!(features[2], 0.0); // relative left (up) is open

        // Same cell heading up: the wall is now to the relative right
        let state = state_with(Position::new(9, 5), Direction::Up, Position::new(0, 5));
        let features = encode_state(&state);
        assert_eq!(features[0], 0.0);
        assert_eq!(features[1], 1.0);
        assert_eq!(features[2], 0.0);
    }

    #[test]
    fn test_body_reads_as_danger() {
        // Body segment directly above a head that points up
        let snake = Snake {
            body: VecDeque::from([
                Position::new(5, 3),
                Position::new(5, 4),
                Position::new(5, 5),
            ]),
            direction: Direction::Up,
            target_length: 3,
        };
        let state = GameState::new(snake, Position::new(0, 0), 10, 10);
        let features = encode_state(&state);

        assert_eq!(features[0], 1.0); // straight into (5,4)
        assert_eq!(features[1], 0.0);
        assert_eq!(features[2], 0.0);
    }

    #[test]
    fn test_heading_one_hot() {
        let cases = [
            (Direction::Left, [1.0, 0.0, 0.0, 0.0]),
            (Direction::Right, [0.0, 1.0, 0.0, 0.0]),
            (Direction::Up, [0.0, 0.0, 1.0, 0.0]),
            (Direction::Down, [0.0, 0.0, 0.0, 1.0]),
        ];

        for (direction, expected) in cases {
            let state = state_with(Position::new(5, 5), direction, Position::new(0, 0));
            let features = encode_state(&state);
            assert_eq!(&features[3..7], &expected);
        }
    }

    #[test]
    fn test_food_on_head_axis_sets_neither_flag() {
        let state = state_with(Position::new(5, 5), Direction::Right, Position::new(5, 2));
        let features = encode_state(&state);
        // Same column: neither left nor right
        assert_eq!(features[7], 0.0);
        assert_eq!(features[8], 0.0);
        // Above
        assert_eq!(features[9], 1.0);
        assert_eq!(features[10], 0.0);
    }

    #[test]
    fn test_encoding_tracks_state_changes() {
        let mut engine = GameEngine::with_seed(GameConfig::small(), 3);
        let mut state = engine.reset();
        state.food = Position::new(0, 0);

        let before = encode_state(&state);
        engine.step(&mut state, Action::TurnRight);
        let after = encode_state(&state);

        assert_ne!(before, after);
    }
}
