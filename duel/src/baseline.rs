
use super::environment::{Action, Observation, Policy};

///
/// A fixed heuristic opponent: follow the ball while it approaches, and 
/// drift back to the middle of the wall while it moves away.
///
/// Works on the Pong observation layout 
/// [own_y, other_y, ball_x, ball_y, ball_vx, ball_vy].
///
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct Baseline 
{
    gain: f64
}

impl Default for Baseline 
{
    fn default () -> Baseline 
    {
        Baseline { gain: 25.0 }
    }
}

impl Policy for Baseline 
{
    fn predict (& self, observation: & Observation) -> Action 
    {
        let own_y = observation[0];
        let ball_y = observation[3];
        let ball_vx = observation[4];

        let target = match ball_vx < 0.0 
        {
            true  => ball_y,
            false => 0.5
        };

        vec![((target - own_y) * self.gain).clamp(-1.0, 1.0)]
    }
}
