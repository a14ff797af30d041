
use utils::*;

///
/// A side of the court.
///
/// The learner always plays on the left; whatever plays on the right is 
/// the opponent. Each side observes the court mirrored so that its own 
/// wall is at x = 0.
///
#[derive(Clone, Copy, Debug, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub enum Side 
{
    Left,
    Right
}

impl std::fmt::Display for Side 
{
    fn fmt (& self, f: & mut std::fmt::Formatter<'_>) -> std::fmt::Result
    {
        let token = match self 
        {
            Side::Left  => "left",
            Side::Right => "right"
        };
        write!(f, "{}", token)
    }
}

impl notate::Notate for Side 
{
    fn notate (& self) -> String 
    {
        match self 
        {
            Side::Left  => "L".to_string(),
            Side::Right => "R".to_string()
        }
    }

    fn parse (s: & str) -> Result<Side>
    {
        match s 
        {
            "L" | "l" | "left"  => Ok(Side::Left),
            "R" | "r" | "right" => Ok(Side::Right),
            _                   => Err(error::error!("Invalid notation '{}' for side.", s))
        }
    }
}

impl Side 
{
    ///
    /// Returns the index of this side in per-side arrays.
    ///
    pub fn as_index (& self) -> usize 
    {
        match self 
        {
            Side::Left  => 0,
            Side::Right => 1
        }
    }

    ///
    /// Returns the side opposite this one.
    ///
    pub fn other (& self) -> Side 
    {
        match self 
        {
            Side::Left  => Side::Right,
            Side::Right => Side::Left
        }
    }

    ///
    /// Maps an absolute court x coordinate (or x velocity sign) into this 
    /// side's own frame.
    ///
    pub fn mirror (& self, x: f64) -> f64 
    {
        match self 
        {
            Side::Left  => x,
            Side::Right => 1.0 - x
        }
    }

    ///
    /// The direction that points away from this side's wall.
    ///
    pub fn forward (& self) -> f64 
    {
        match self 
        {
            Side::Left  =>  1.0,
            Side::Right => -1.0
        }
    }
}
