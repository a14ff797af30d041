
use utils::{Serialize, Deserialize};

use super::network::Activation;

///
/// A configuration for the shape of the learner's policy network.
///
#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct Config 
{
    #[serde(default = "hidden")]
    pub hidden: Vec<usize>,

    #[serde(default = "activation")]
    pub activation: Activation,

    #[serde(default = "init_scale")]
    pub init_scale: f64
}

impl Default for Config 
{
    fn default () -> Config 
    {
        Config 
        {
            hidden: hidden(),
            activation: activation(),
            init_scale: init_scale()
        }
    }
}

fn hidden () -> Vec<usize>
{
    vec![16]
}

fn activation () -> Activation 
{
    Activation::Tanh
}

fn init_scale () -> f64 
{
    1.0
}
