
use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};

use super::config::Config;
use super::environment::*;
use super::error::StepError;
use super::side::Side;

use utils::error::Result;
use utils::notate::Notate;

const OBSERVATION_SIZE : usize = 6;
const ACTION_SIZE : usize = 1;

const RENDER_WIDTH : usize = 40;
const RENDER_HEIGHT : usize = 14;

///
/// The ball's position and velocity, in absolute court coordinates.
///
#[derive(Clone, Copy, Debug, PartialEq)]
struct Ball
{
    x: f64,
    y: f64,
    vx: f64,
    vy: f64
}

///
/// A two-player game of Pong on the unit square.
///
/// Each player moves a paddle along its own wall. A player loses a life
/// whenever the ball reaches its wall outside the paddle, after which the
/// ball is served from the centre towards that player. The episode ends
/// when either player is out of lives, or after a fixed number of steps.
///
/// The left player is the primary player: rewards are +1 whenever the
/// right player loses a life and -1 whenever the left player does.
///
#[derive(Clone, Debug)]
pub struct Pong
{
    config: Config,
    rng: StdRng,

    // State.

    paddles: [f64; 2],
    lives: [u32; 2],
    ball: Ball,
    steps: usize,
    done: bool
}

impl Pong
{
    ///
    /// Creates a new court. The court must be reset before it can be stepped.
    ///
    pub fn new (config: Config) -> Pong
    {
        Pong
        {
            config,
            rng: StdRng::seed_from_u64(0),
            paddles: [0.5; 2],
            lives: [config.lives; 2],
            ball: Ball { x: 0.5, y: 0.5, vx: 0.0, vy: 0.0 },
            steps: 0,
            done: true
        }
    }

    ///
    /// Returns the remaining lives of the given side.
    ///
    pub fn lives (& self, side: Side) -> u32
    {
        self.lives[side.as_index()]
    }

    ///
    /// Returns the observation of the given side, in that side's own frame.
    ///
    pub fn observe (& self, side: Side) -> Observation
    {
        let own = self.paddles[side.as_index()];
        let other = self.paddles[side.other().as_index()];
        vec![
            own,
            other,
            side.mirror(self.ball.x),
            self.ball.y,
            self.ball.vx * side.forward(),
            self.ball.vy
        ]
    }

    ///
    /// Validates a submitted action and returns its clipped movement.
    ///
    fn movement (& self, side: Side, action: & Action) -> std::result::Result<f64, StepError>
    {
        if action.len() != ACTION_SIZE
        {
            return Err(StepError::ActionWidth { side, expected: ACTION_SIZE, found: action.len() });
        }
        if ! action[0].is_finite()
        {
            return Err(StepError::NonFinite { side });
        }

        Ok(action[0].clamp(-1.0, 1.0) * self.config.paddle_speed)
    }

    ///
    /// Moves a paddle, keeping it entirely on the court.
    ///
    fn move_paddle (& mut self, side: Side, delta: f64)
    {
        let half = self.config.paddle_half;
        let idx = side.as_index();
        self.paddles[idx] = (self.paddles[idx] + delta).clamp(half, 1.0 - half);
    }

    ///
    /// Puts the ball in the centre of the court, heading towards the receiver.
    ///
    fn serve (& mut self, receiver: Side)
    {
        let speed = self.config.ball_speed;
        self.ball = Ball
        {
            x: 0.5,
            y: self.rng.gen_range(0.25 .. 0.75),
            vx: - speed * receiver.forward(),
            vy: self.rng.gen_range(- 0.75 * speed .. 0.75 * speed)
        };
    }

    ///
    /// Resolves the ball arriving at a side's wall. Returns true if the
    /// side returned the ball and false if it lost a life.
    ///
    fn arrive (& mut self, side: Side) -> bool
    {
        let paddle = self.paddles[side.as_index()];
        let offset = self.ball.y - paddle;

        if offset.abs() <= self.config.paddle_half
        {
            let limit = 2.0 * self.config.ball_speed;

            // Reflect about the wall, and put english on the ball depending on
            // where the paddle was struck.

            self.ball.x = match side
            {
                Side::Left  => - self.ball.x,
                Side::Right => 2.0 - self.ball.x
            };
            self.ball.vx = self.config.ball_speed * side.forward();
            self.ball.vy = (self.ball.vy + self.config.spin * self.config.ball_speed * offset / self.config.paddle_half).clamp(- limit, limit);
            true
        }
        else
        {
            self.lives[side.as_index()] -= 1;
            self.serve(side);
            false
        }
    }
}

impl TwoPlayerEnvironment for Pong
{
    fn observation_size (& self) -> usize
    {
        OBSERVATION_SIZE
    }

    fn action_size (& self) -> usize
    {
        ACTION_SIZE
    }

    fn reset (& mut self) -> Result<Observation>
    {
        self.paddles = [0.5; 2];
        self.lives = [self.config.lives; 2];
        self.steps = 0;
        self.done = false;

        let receiver = match self.rng.gen_bool(0.5)
        {
            true  => Side::Left,
            false => Side::Right
        };
        self.serve(receiver);

        Ok(self.observe(Side::Left))
    }

    fn opponent_observation (& self) -> Observation
    {
        self.observe(Side::Right)
    }

    fn step (& mut self, action: & Action, opponent_action: & Action) -> Result<Step>
    {
        if self.done
        {
            return Err(StepError::EpisodeOver.into());
        }

        let left = self.movement(Side::Left, action)?;
        let right = self.movement(Side::Right, opponent_action)?;

        self.move_paddle(Side::Left, left);
        self.move_paddle(Side::Right, right);

        self.ball.x += self.ball.vx;
        self.ball.y += self.ball.vy;

        if self.ball.y < 0.0
        {
            self.ball.y = - self.ball.y;
            self.ball.vy = - self.ball.vy;
        }
        else if self.ball.y > 1.0
        {
            self.ball.y = 2.0 - self.ball.y;
            self.ball.vy = - self.ball.vy;
        }

        let mut reward = 0.0;
        if self.ball.x <= 0.0
        {
            if ! self.arrive(Side::Left)
            {
                reward -= 1.0;
            }
        }
        else if self.ball.x >= 1.0
        {
            if ! self.arrive(Side::Right)
            {
                reward += 1.0;
            }
        }

        self.steps += 1;
        self.done = self.lives.iter().any(|&l| l == 0) || self.steps >= self.config.max_steps;

        let mut info = Info::new();
        info.insert("lives".to_owned(), self.lives[0] as f64);
        info.insert("opponent_lives".to_owned(), self.lives[1] as f64);
        info.insert("steps".to_owned(), self.steps as f64);

        Ok(Step { observation: self.observe(Side::Left), reward, done: self.done, info })
    }

    fn seed (& mut self, seed: u64)
    {
        self.rng = StdRng::seed_from_u64(seed);
    }

    fn render (& self) -> String
    {
        let mut grid = vec![vec![' '; RENDER_WIDTH]; RENDER_HEIGHT];

        let row = |y: f64| (((1.0 - y) * (RENDER_HEIGHT - 1) as f64).round() as usize).min(RENDER_HEIGHT - 1);
        let col = |x: f64| ((x.clamp(0.0, 1.0) * (RENDER_WIDTH - 1) as f64).round() as usize).min(RENDER_WIDTH - 1);

        for (side, column) in [(Side::Left, 0), (Side::Right, RENDER_WIDTH - 1)]
        {
            let centre = self.paddles[side.as_index()];
            let (top, bottom) = (row(centre + self.config.paddle_half), row(centre - self.config.paddle_half));
            for r in top ..= bottom
            {
                grid[r][column] = '|';
            }
        }
        grid[row(self.ball.y)][col(self.ball.x)] = 'o';

        let mut picture = format!(
            "{}:{} {}:{} t={}\n",
            Side::Left.notate(), self.lives[0], Side::Right.notate(), self.lives[1], self.steps
        );
        picture += & "-".repeat(RENDER_WIDTH + 2);
        picture.push('\n');
        for line in grid
        {
            picture.push('.');
            picture.extend(line);
            picture.push_str(".\n");
        }
        picture += & "-".repeat(RENDER_WIDTH + 2);

        picture
    }
}
