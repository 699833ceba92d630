use super::{
    action::{Action, Direction},
    config::GameConfig,
    state::{CollisionType, GameState, Position, Snake},
};
use rand::{rngs::StdRng, Rng, SeedableRng};

/// Information about a step
#[derive(Debug, Clone, PartialEq)]
pub struct StepInfo {
    /// Whether the snake ate food this step
    pub ate_food: bool,
    /// Type of collision if one occurred
    pub collision_type: Option<CollisionType>,
}

/// Result of a game step
#[derive(Debug, Clone, PartialEq)]
pub struct StepResult {
    /// Reward for this step (for RL training)
    pub reward: f32,
    /// Whether the game has terminated
    pub terminated: bool,
    /// Score after the step (food eaten so far)
    pub score: u32,
    /// Additional information about the step
    pub info: StepInfo,
}

/// The game engine that handles all game logic
///
/// Holds the rules and the food-placement RNG; the mutable world lives in
/// [`GameState`] so callers can inspect it freely between steps.
pub struct GameEngine {
    config: GameConfig,
    rng: StdRng,
}

impl GameEngine {
    /// Create a new game engine with the given configuration
    pub fn new(config: GameConfig) -> Self {
        Self {
            config,
            rng: StdRng::from_entropy(),
        }
    }

    /// Create an engine with a fixed food-placement seed
    ///
    /// Identical seeds and action sequences produce identical trajectories,
    /// which the tests rely on.
    pub fn with_seed(config: GameConfig, seed: u64) -> Self {
        Self {
            config,
            rng: StdRng::seed_from_u64(seed),
        }
    }

    pub fn config(&self) -> &GameConfig {
        &self.config
    }

    /// Reset the game to initial state
    ///
    /// A length-1 snake at the grid center heading right, fresh food, frame
    /// counter at zero.
    pub fn reset(&mut self) -> GameState {
        let center_x = (self.config.grid_width / 2) as i32;
        let center_y = (self.config.grid_height / 2) as i32;

        let snake = Snake::new(Position::new(center_x, center_y), Direction::Right);
        let food = self.place_food(&snake);

        GameState::new(snake, food, self.config.grid_width, self.config.grid_height)
    }

    /// Execute one step of the game
    ///
    /// Applies the relative action to the heading, advances the head one
    /// cell, and settles collisions, food and the stall cutoff. On a
    /// terminal step the body and food are left untouched.
    pub fn step(&mut self, state: &mut GameState, action: Action) -> StepResult {
        if !state.is_alive {
            return StepResult {
                reward: 0.0,
                terminated: true,
                score: state.score(),
                info: StepInfo {
                    ate_food: false,
                    collision_type: None,
                },
            };
        }

        // Rotate the heading and compute where the head lands
        state.snake.direction = state.snake.direction.turned(action);
        let new_head = state.snake.head().moved_in_direction(state.snake.direction);

        // Death: wall or body contact, or too many frames without progress
        let collision_type = if !state.is_in_bounds(new_head) {
            Some(CollisionType::Wall)
        } else if state.snake.collides_with_body(new_head) {
            Some(CollisionType::SelfCollision)
        } else if state.frame > self.config.stall_factor * state.snake.target_length as u32 {
            Some(CollisionType::Stalled)
        } else {
            None
        };

        if let Some(collision_type) = collision_type {
            state.is_alive = false;

            return StepResult {
                reward: self.config.death_penalty,
                terminated: true,
                score: state.score(),
                info: StepInfo {
                    ate_food: false,
                    collision_type: Some(collision_type),
                },
            };
        }

        // Food: grow and respawn before the body advances
        let ate_food = new_head == state.food;
        let reward = if ate_food {
            state.snake.grow();
            state.food = self.place_food(&state.snake);
            self.config.food_reward
        } else {
            0.0
        };

        state.snake.advance(new_head);
        state.frame += 1;

        StepResult {
            reward,
            terminated: false,
            score: state.score(),
            info: StepInfo {
                ate_food,
                collision_type: None,
            },
        }
    }

    /// Sample a food position uniformly over the grid
    ///
    /// Snake occupancy is only checked when `resample_food_on_snake` is
    /// set; otherwise food may land on the body and sit unreachable until
    /// the snake moves off it.
    pub fn place_food(&mut self, snake: &Snake) -> Position {
        loop {
            let x = self.rng.gen_range(0..self.config.grid_width) as i32;
            let y = self.rng.gen_range(0..self.config.grid_height) as i32;
            let pos = Position::new(x, y);

            if !self.config.resample_food_on_snake || !snake.body.contains(&pos) {
                return pos;
            }
        }
    }
}
