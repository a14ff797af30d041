
use super::error::*;

///
/// A trait representing the concept of canonical notation.
///
/// An implementor provides a canonical notation by way of notate(),
/// and recognizes potentially non-canonical notation by way of parse().
/// Notation is what ends up in file names and log lines, so it must 
/// survive a round trip through parse().
///
pub trait Notate 
    where Self: Sized
{
    ///
    /// Returns the canonical notational string for this object.
    ///
    fn notate (& self) -> String;

    ///
    /// Constructs a new object from the given notational string, provided
    /// that the notation is valid.
    ///
    fn parse (s: & str) -> Result<Self>;

    ///
    /// Parses the notation embedded between a known prefix and suffix, as 
    /// found in a file name such as 'prefix<notation>suffix'.
    ///
    fn parse_framed (s: & str, prefix: & str, suffix: & str) -> Result<Self>
    {
        match s.strip_prefix(prefix).and_then(|rest| rest.strip_suffix(suffix))
        {
            Some(inner) => Self::parse(inner).context(format!("Invalid framed notation '{}'.", s)),
            None        => Err(error!("'{}' is not framed by '{}' and '{}'.", s, prefix, suffix))
        }
    }
}
