/// Integer coordinate used by room positions.
pub type Coord = i64;

#[derive(Clone, Eq, Hash, Copy, PartialEq, Ord, PartialOrd, Debug, Default)]
/// A room position `(x, y)` as declared in the colony description.
///
/// Positions only matter to renderers; the solver never looks at them.
pub struct Location(pub Coord, pub Coord);

impl From<(Coord, Coord)> for Location {
    fn from(value: (Coord, Coord)) -> Self {
        Self(value.0, value.1)
    }
}
