use crate::charge::Charge;
use strum::IntoEnumIterator;
use strum_macros::{Display, EnumIter, EnumString};

#[derive(Debug, Clone, Copy, EnumIter, EnumString, Display, PartialEq, Eq, Hash)]
#[strum(serialize_all = "snake_case")]
pub enum KnownArrangement {
    Single,
    Dipole,
    LikePair,
    Quadrupole,
    Triangle,
    Line,
}

impl KnownArrangement {
    pub fn description(&self) -> &'static str {
        match self {
            Self::Single => "one positive charge at the origin",
            Self::Dipole => "+1 and -1 two units apart on the x axis",
            Self::LikePair => "two +1 charges two units apart on the x axis",
            Self::Quadrupole => "alternating ±1 on the corners of a square",
            Self::Triangle => "+2, -1, -1 on an equilateral triangle",
            Self::Line => "five alternating charges along the x axis",
        }
    }

    pub fn charges(&self) -> Vec<Charge> {
        match self {
            Self::Single => vec![Charge::new(0.0, 0.0, 1.0)],
            Self::Dipole => vec![Charge::new(-1.0, 0.0, 1.0), Charge::new(1.0, 0.0, -1.0)],
            Self::LikePair => vec![Charge::new(-1.0, 0.0, 1.0), Charge::new(1.0, 0.0, 1.0)],
            Self::Quadrupole => vec![
                Charge::new(-1.5, -1.5, 1.0),
                Charge::new(1.5, -1.5, -1.0),
                Charge::new(1.5, 1.5, 1.0),
                Charge::new(-1.5, 1.5, -1.0),
            ],
            Self::Triangle => {
                // side 4, centroid at the origin
                let r = 4.0 / 3.0_f64.sqrt();
                vec![
                    Charge::new(0.0, r, 2.0),
                    Charge::new(-2.0, -r / 2.0, -1.0),
                    Charge::new(2.0, -r / 2.0, -1.0),
                ]
            }
            Self::Line => (0..5)
                .map(|i| {
                    let sign = if i % 2 == 0 { 1.0 } else { -1.0 };
                    Charge::new(-4.0 + 2.0 * i as f64, 0.0, sign)
                })
                .collect(),
        }
    }
}

pub fn get_all_arrangements() -> Vec<(KnownArrangement, Vec<Charge>)> {
    KnownArrangement::iter().map(|a| (a, a.charges())).collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn names_parse_back() {
        for (arrangement, charges) in get_all_arrangements() {
            let parsed: KnownArrangement = arrangement.to_string().parse().unwrap();
            assert_eq!(parsed, arrangement);
            assert!(!charges.is_empty());
        }
    }

    #[test]
    fn dipole_is_neutral() {
        let total: f64 = KnownArrangement::Dipole.charges().iter().map(|c| c.q).sum();
        assert_eq!(total, 0.0);
    }
}
