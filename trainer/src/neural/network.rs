
use crate::config::*;

use duel::{Action, Observation, Policy};

use rand::Rng;
use rand_distr::StandardNormal;

use utils::error::*;
use utils::{Serialize, Deserialize};

///
/// The nonlinearity applied after every hidden layer.
///
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Activation
{
    Tanh,
    Relu,
    Linear
}

impl Activation
{
    fn apply (& self, x: f64) -> f64
    {
        match self
        {
            Activation::Tanh   => x.tanh(),
            Activation::Relu   => x.max(0.0),
            Activation::Linear => x
        }
    }
}

///
/// A dense layer; weights are stored one row per output unit.
///
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct Layer
{
    pub weights: Vec<Vec<f64>>,
    pub biases: Vec<f64>
}

impl Layer
{
    fn inputs (& self) -> usize
    {
        self.weights.first().map(|row| row.len()).unwrap_or(0)
    }

    fn outputs (& self) -> usize
    {
        self.biases.len()
    }
}

///
/// A small multilayer perceptron, doubling as the portable policy format.
///
/// Serialized as JSON, a network is self-describing: the activation and
/// every layer's weights and biases. Hidden layers use the configured
/// activation; the output layer is always squashed with tanh so that
/// actions lie in [-1, 1].
///
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct Network
{
    activation: Activation,
    layers: Vec<Layer>
}

impl Policy for Network
{
    fn predict (& self, observation: & Observation) -> Action
    {
        self.forward(observation)
    }
}

impl Network
{
    ///
    /// Creates a randomly-initialized network mapping observations of the
    /// given width to actions of the given width.
    ///
    pub fn new<R: Rng> (config: & NeuralConfig, inputs: usize, outputs: usize, rng: & mut R) -> Network
    {
        let mut sizes = vec![inputs];
        sizes.extend(config.hidden.iter().copied());
        sizes.push(outputs);

        let layers = sizes.windows(2).map(|pair|
        {
            let (fan_in, fan_out) = (pair[0], pair[1]);
            let scale = config.init_scale / (fan_in.max(1) as f64).sqrt();
            let weights = (0 .. fan_out)
                .map(|_| (0 .. fan_in).map(|_| scale * rng.sample::<f64, _>(StandardNormal)).collect())
                .collect();

            Layer { weights, biases: vec![0.0; fan_out] }
        }).collect();

        Network { activation: config.activation, layers }
    }

    ///
    /// Parses a network from its JSON form and checks that it is well-formed.
    ///
    pub fn from_slice (bytes: & [u8]) -> Result<Network>
    {
        let network : Network = serde_json::from_slice(bytes).context("Malformed network JSON.")?;
        network.validate()?;
        Ok(network)
    }

    ///
    /// Checks that the layers chain together and that every weight row has
    /// the width of the layer's input.
    ///
    pub fn validate (& self) -> Result<()>
    {
        if self.layers.is_empty()
        {
            bail!("A network must have at least one layer.");
        }

        for (i, layer) in self.layers.iter().enumerate()
        {
            if layer.weights.len() != layer.outputs() || layer.outputs() == 0
            {
                bail!("Layer {} has {} weight rows but {} biases.", i, layer.weights.len(), layer.biases.len());
            }

            let width = layer.inputs();
            if width == 0 || layer.weights.iter().any(|row| row.len() != width)
            {
                bail!("Layer {} has ragged or empty weight rows.", i);
            }

            if i > 0 && self.layers[i - 1].outputs() != width
            {
                bail!("Layer {} expects {} inputs, but layer {} produces {}.", i, width, i - 1, self.layers[i - 1].outputs());
            }

            if layer.weights.iter().flatten().chain(layer.biases.iter()).any(|w| ! w.is_finite())
            {
                bail!("Layer {} contains non-finite parameters.", i);
            }
        }

        Ok(())
    }

    pub fn input_size (& self) -> usize
    {
        self.layers.first().map(|l| l.inputs()).unwrap_or(0)
    }

    pub fn output_size (& self) -> usize
    {
        self.layers.last().map(|l| l.outputs()).unwrap_or(0)
    }

    ///
    /// Runs the network on a single input vector. The input must have
    /// input_size() entries.
    ///
    pub fn forward (& self, input: & [f64]) -> Vec<f64>
    {
        let last = self.layers.len() - 1;
        let mut values = input.to_vec();

        for (i, layer) in self.layers.iter().enumerate()
        {
            let activation = match i == last
            {
                true  => Activation::Tanh,
                false => self.activation
            };

            values = layer.weights.iter().zip(& layer.biases).map(|(row, bias)|
            {
                let z : f64 = row.iter().zip(& values).map(|(w, x)| w * x).sum::<f64>() + bias;
                activation.apply(z)
            }).collect();
        }

        values
    }

    ///
    /// Returns the total number of weights and biases.
    ///
    pub fn num_parameters (& self) -> usize
    {
        self.layers.iter().map(|l| l.outputs() * (l.inputs() + 1)).sum()
    }

    ///
    /// Flattens every weight and bias into one vector, layer by layer,
    /// each row's weights followed by its bias.
    ///
    pub fn parameters (& self) -> Vec<f64>
    {
        let mut flat = Vec::with_capacity(self.num_parameters());
        for layer in & self.layers
        {
            for (row, bias) in layer.weights.iter().zip(& layer.biases)
            {
                flat.extend_from_slice(row);
                flat.push(* bias);
            }
        }
        flat
    }

    ///
    /// Returns a network of the same shape holding the given flattened
    /// parameters, in the order produced by parameters(). Fails if the
    /// vector does not have num_parameters() entries.
    ///
    pub fn with_parameters (& self, flat: & [f64]) -> Result<Network>
    {
        if flat.len() != self.num_parameters()
        {
            bail!("Expected {} parameters for this network, found {}.", self.num_parameters(), flat.len());
        }

        let mut cursor = flat.iter().copied();
        let mut network = self.clone();

        for layer in network.layers.iter_mut()
        {
            for (row, bias) in layer.weights.iter_mut().zip(layer.biases.iter_mut())
            {
                for w in row.iter_mut()
                {
                    * w = cursor.next().unwrap_or_default();
                }
                * bias = cursor.next().unwrap_or_default();
            }
        }

        Ok(network)
    }
}
