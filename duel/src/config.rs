
use utils::{Serialize, Deserialize};

///
/// Physical constants of a Pong court. Distances are fractions of the 
/// court's side; speeds are distances per step.
///
#[derive(Clone, Copy, Debug, PartialEq, Serialize, Deserialize)]
pub struct Config 
{
    #[serde(default = "lives")]
    pub lives: u32,

    #[serde(default = "max_steps")]
    pub max_steps: usize,

    #[serde(default = "paddle_half")]
    pub paddle_half: f64,

    #[serde(default = "paddle_speed")]
    pub paddle_speed: f64,

    #[serde(default = "ball_speed")]
    pub ball_speed: f64,

    #[serde(default = "spin")]
    pub spin: f64
}

impl Default for Config 
{
    fn default () -> Config 
    {
        Config 
        {
            lives: lives(),
            max_steps: max_steps(),
            paddle_half: paddle_half(),
            paddle_speed: paddle_speed(),
            ball_speed: ball_speed(),
            spin: spin()
        }
    }
}

fn lives () -> u32 
{
    5
}

fn max_steps () -> usize 
{
    3000
}

fn paddle_half () -> f64 
{
    0.08
}

fn paddle_speed () -> f64 
{
    0.015
}

fn ball_speed () -> f64 
{
    0.025
}

fn spin () -> f64 
{
    0.6
}
