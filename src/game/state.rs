use std::collections::VecDeque;

use super::action::Direction;

/// A position on the game grid
///
/// Coordinates are signed so that out-of-bounds candidate positions (one
/// step past an edge) stay representable for collision queries.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct Position {
    pub x: i32,
    pub y: i32,
}

impl Position {
    pub fn new(x: i32, y: i32) -> Self {
        Self { x, y }
    }

    /// Move position by delta
    pub fn moved_by(&self, dx: i32, dy: i32) -> Self {
        Self {
            x: self.x + dx,
            y: self.y + dy,
        }
    }

    /// Move position in a direction
    pub fn moved_in_direction(&self, direction: Direction) -> Self {
        let (dx, dy) = direction.delta();
        self.moved_by(dx, dy)
    }
}

/// The snake in the game
///
/// Body segments are ordered oldest-first with the head at the back;
/// movement appends the new head and drops the front once the body exceeds
/// the target length, so no per-segment shifting ever happens.
#[derive(Debug, Clone, PartialEq)]
pub struct Snake {
    /// Body segments, head at the back
    pub body: VecDeque<Position>,
    /// Current direction of movement
    pub direction: Direction,
    /// Length the body should settle at; grows by one per food eaten
    pub target_length: usize,
}

impl Snake {
    /// Create a length-1 snake at the given position and heading
    pub fn new(head: Position, direction: Direction) -> Self {
        let mut body = VecDeque::new();
        body.push_back(head);
        Self {
            body,
            direction,
            target_length: 1,
        }
    }

    /// Get the head position
    pub fn head(&self) -> Position {
        *self.body.back().expect("snake body is never empty")
    }

    /// Get the current body length
    pub fn len(&self) -> usize {
        self.body.len()
    }

    pub fn is_empty(&self) -> bool {
        self.body.is_empty()
    }

    /// Check if a position collides with the body, excluding the head
    ///
    /// The head segment is skipped so that querying the head's own cell
    /// never reads as a self-collision.
    pub fn collides_with_body(&self, pos: Position) -> bool {
        self.body.iter().take(self.body.len() - 1).any(|&p| p == pos)
    }

    /// Increase the target length by one
    pub fn grow(&mut self) {
        self.target_length += 1;
    }

    /// Append a new head, trimming the tail back to the target length
    pub fn advance(&mut self, new_head: Position) {
        self.body.push_back(new_head);
        while self.body.len() > self.target_length {
            self.body.pop_front();
        }
    }
}

/// Type of collision that occurred
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CollisionType {
    /// Snake hit a wall
    Wall,
    /// Snake hit itself
    SelfCollision,
    /// Episode exceeded the stall limit
    Stalled,
}

/// Complete game state
///
/// Owned by the engine's caller but only ever mutated through
/// [`GameEngine::step`](super::engine::GameEngine::step).
#[derive(Debug, Clone, PartialEq)]
pub struct GameState {
    pub snake: Snake,
    pub food: Position,
    pub grid_width: usize,
    pub grid_height: usize,
    /// Frames elapsed since the last reset, for stall detection
    pub frame: u32,
    pub is_alive: bool,
}

impl GameState {
    /// Create a new game state
    pub fn new(snake: Snake, food: Position, grid_width: usize, grid_height: usize) -> Self {
        Self {
            snake,
            food,
            grid_width,
            grid_height,
            frame: 0,
            is_alive: true,
        }
    }

    /// Current score: food eaten so far
    pub fn score(&self) -> u32 {
        (self.snake.target_length - 1) as u32
    }

    /// Check if a position is within the grid bounds
    pub fn is_in_bounds(&self, pos: Position) -> bool {
        pos.x >= 0
            && pos.x < self.grid_width as i32
            && pos.y >= 0
            && pos.y < self.grid_height as i32
    }

    /// Check whether a point is deadly: outside the grid, or on a body
    /// segment other than the current head
    pub fn is_collision(&self, pos: Position) -> bool {
        !self.is_in_bounds(pos) || self.snake.collides_with_body(pos)
    }

    /// Check if a position is occupied by the snake
    pub fn is_occupied_by_snake(&self, pos: Position) -> bool {
        self.snake.body.contains(&pos)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_position_movement() {
        let pos = Position::new(5, 5);
        assert_eq!(pos.moved_by(1, 0), Position::new(6, 5));
        assert_eq!(pos.moved_by(-1, 0), Position::new(4, 5));
        assert_eq!(pos.moved_by(0, 1), Position::new(5, 6));
        assert_eq!(pos.moved_by(0, -1), Position::new(5, 4));
    }

    #[test]
    fn test_snake_creation() {
        let snake = Snake::new(Position::new(5, 5), Direction::Right);
        assert_eq!(snake.len(), 1);
        assert_eq!(snake.target_length, 1);
        assert_eq!(snake.head(), Position::new(5, 5));
    }

    #[test]
    fn test_snake_advance_without_growth() {
        let mut snake = Snake::new(Position::new(5, 5), Direction::Right);

        snake.advance(Position::new(6, 5));
        assert_eq!(snake.len(), 1);
        assert_eq!(snake.head(), Position::new(6, 5));
    }

    #[test]
    fn test_snake_advance_with_growth() {
        let mut snake = Snake::new(Position::new(5, 5), Direction::Right);

        snake.grow();
        snake.advance(Position::new(6, 5));
        assert_eq!(snake.len(), 2);
        assert_eq!(snake.head(), Position::new(6, 5));
        assert_eq!(snake.body[0], Position::new(5, 5));
    }

    #[test]
    fn test_collision_excludes_head() {
        let mut snake = Snake::new(Position::new(3, 5), Direction::Right);
        snake.grow();
        snake.grow();
        snake.advance(Position::new(4, 5));
        snake.advance(Position::new(5, 5));
        // Body is now [(3,5), (4,5), (5,5)] with the head at (5,5)

        assert!(!snake.collides_with_body(Position::new(5, 5))); // head
        assert!(snake.collides_with_body(Position::new(4, 5))); // body
        assert!(snake.collides_with_body(Position::new(3, 5))); // tail
        assert!(!snake.collides_with_body(Position::new(10, 10))); // empty
    }

    #[test]
    fn test_bounds_checking() {
        let state = GameState::new(
            Snake::new(Position::new(5, 5), Direction::Right),
            Position::new(8, 8),
            20,
            20,
        );

        assert!(state.is_in_bounds(Position::new(0, 0)));
        assert!(state.is_in_bounds(Position::new(19, 19)));
        assert!(!state.is_in_bounds(Position::new(-1, 0)));
        assert!(!state.is_in_bounds(Position::new(20, 0)));
        assert!(!state.is_in_bounds(Position::new(0, 20)));
    }

    #[test]
    fn test_is_collision_combines_walls_and_body() {
        let mut snake = Snake::new(Position::new(3, 5), Direction::Right);
        snake.grow();
        snake.advance(Position::new(4, 5));
        let state = GameState::new(snake, Position::new(8, 8), 20, 20);

        assert!(state.is_collision(Position::new(-1, 5))); // wall
        assert!(state.is_collision(Position::new(3, 5))); // body segment
        assert!(!state.is_collision(Position::new(4, 5))); // head itself
        assert!(!state.is_collision(Position::new(10, 10))); // open cell
    }

    #[test]
    fn test_score_tracks_target_length() {
        let mut snake = Snake::new(Position::new(5, 5), Direction::Right);
        snake.grow();
        snake.grow();
        let state = GameState::new(snake, Position::new(8, 8), 20, 20);
        assert_eq!(state.score(), 2);
    }
}
