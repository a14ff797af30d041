
use super::side::Side;

use thiserror::Error;

///
/// Failures raised by a two-player environment while stepping.
///
#[derive(Clone, Debug, Error, PartialEq)]
pub enum StepError 
{
    #[error("The episode is over; reset() must be called before step().")]
    EpisodeOver,

    #[error("The {side} action has width {found}, expected {expected}.")]
    ActionWidth { side: Side, expected: usize, found: usize },

    #[error("The {side} action contains a non-finite value.")]
    NonFinite { side: Side }
}
