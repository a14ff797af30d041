
use utils::{Serialize, Deserialize};

///
/// A configuration for the evolution strategy learner.
///
#[derive(Clone, Copy, Debug, PartialEq, Serialize, Deserialize)]
pub struct Config 
{
    #[serde(default = "sigma")]
    pub sigma: f64,

    #[serde(default = "learning_rate")]
    pub learning_rate: f64,

    #[serde(default = "episodes_per_candidate")]
    pub episodes_per_candidate: usize
}

impl Default for Config 
{
    fn default () -> Config 
    {
        Config 
        {
            sigma: sigma(),
            learning_rate: learning_rate(),
            episodes_per_candidate: episodes_per_candidate()
        }
    }
}

fn sigma () -> f64 
{
    0.1
}

fn learning_rate () -> f64 
{
    0.02
}

fn episodes_per_candidate () -> usize 
{
    1
}
