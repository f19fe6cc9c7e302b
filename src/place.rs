use crate::geo::Point;

/// What the place-lookup widget reports when the user picks an entry.
#[derive(Clone, Debug, PartialEq)]
pub enum PlaceSelection {
    /// The entry resolved to a coordinate.
    Resolved { name: String, location: Point },
    /// The user committed free text that matched no place.
    NoGeometry { input: String },
}

impl PlaceSelection {
    pub fn location(&self) -> Option<Point> {
        match self {
            PlaceSelection::Resolved { location, .. } => Some(*location),
            PlaceSelection::NoGeometry { .. } => None,
        }
    }
}
