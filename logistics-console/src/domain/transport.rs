//! Transport modes and their presentation.

use std::fmt;

/// The mode of a transportation leg.
///
/// The backend defines the set of types; anything this console doesn't
/// know about is kept verbatim in [`TransportType::Other`] and shown with
/// neutral styling.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub enum TransportType {
    Flight,
    Bus,
    Uber,
    Subway,
    Other(String),
}

impl TransportType {
    /// Parse the backend's type name (`"FLIGHT"`, `"BUS"`, ...).
    pub fn parse(s: &str) -> Self {
        match s {
            "FLIGHT" => TransportType::Flight,
            "BUS" => TransportType::Bus,
            "UBER" => TransportType::Uber,
            "SUBWAY" => TransportType::Subway,
            other => TransportType::Other(other.to_string()),
        }
    }

    /// The backend's name for this type.
    pub fn as_str(&self) -> &str {
        match self {
            TransportType::Flight => "FLIGHT",
            TransportType::Bus => "BUS",
            TransportType::Uber => "UBER",
            TransportType::Subway => "SUBWAY",
            TransportType::Other(name) => name,
        }
    }

    /// Material Symbols icon name.
    pub fn icon(&self) -> &'static str {
        match self {
            TransportType::Flight => "flight",
            TransportType::Bus => "directions_bus",
            TransportType::Uber => "local_taxi",
            TransportType::Subway => "train",
            TransportType::Other(_) => "directions",
        }
    }

    /// Colour family for badges and icons; see `static/console.css`.
    pub fn palette(&self) -> &'static str {
        match self {
            TransportType::Flight => "blue",
            TransportType::Bus => "green",
            TransportType::Uber => "yellow",
            TransportType::Subway => "purple",
            TransportType::Other(_) => "gray",
        }
    }

    pub fn is_known(&self) -> bool {
        !matches!(self, TransportType::Other(_))
    }
}

impl fmt::Display for TransportType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parse_known_types() {
        assert_eq!(TransportType::parse("FLIGHT"), TransportType::Flight);
        assert_eq!(TransportType::parse("BUS"), TransportType::Bus);
        assert_eq!(TransportType::parse("UBER"), TransportType::Uber);
        assert_eq!(TransportType::parse("SUBWAY"), TransportType::Subway);
    }

    #[test]
    fn unknown_type_falls_back() {
        let ferry = TransportType::parse("FERRY");
        assert_eq!(ferry, TransportType::Other("FERRY".into()));
        assert_eq!(ferry.as_str(), "FERRY");
        assert_eq!(ferry.icon(), "directions");
        assert_eq!(ferry.palette(), "gray");
        assert!(!ferry.is_known());
    }

    #[test]
    fn presentation_table() {
        let table = [
            (TransportType::Flight, "flight", "blue"),
            (TransportType::Bus, "directions_bus", "green"),
            (TransportType::Uber, "local_taxi", "yellow"),
            (TransportType::Subway, "train", "purple"),
        ];
        for (ty, icon, palette) in table {
            assert_eq!(ty.icon(), icon);
            assert_eq!(ty.palette(), palette);
            assert!(ty.is_known());
        }
    }

    #[test]
    fn display_roundtrips_through_parse() {
        for name in ["FLIGHT", "BUS", "UBER", "SUBWAY", "CARGO_SHIP"] {
            assert_eq!(TransportType::parse(name).to_string(), name);
        }
    }
}
