use std::fmt;

/// Parsed `"λ,φ,scale"` orientation string.
///
/// Parsing never fails: each component that is missing or not a finite number
/// is `None`, and the globe substitutes its own default for it.
#[derive(Debug, Copy, Clone, PartialEq, Default)]
pub struct Orientation {
    pub lambda: Option<f64>,
    pub phi: Option<f64>,
    pub scale: Option<f64>,
}

impl Orientation {
    pub fn parse(text: &str) -> Self {
        let mut parts = text.split(',').map(parse_component);
        Self {
            lambda: parts.next().flatten(),
            phi: parts.next().flatten(),
            scale: parts.next().flatten(),
        }
    }

    /// Both view-centre angles, when present.
    pub fn center(&self) -> Option<[f64; 2]> {
        Some([self.lambda?, self.phi?])
    }

    /// Orientation of a projection with `rotate` and `scale`; the angles are
    /// the negated rotation.
    pub fn of(rotate: [f64; 3], scale: f64) -> Self {
        Self {
            lambda: Some(-rotate[0]),
            phi: Some(-rotate[1]),
            scale: Some(scale),
        }
    }
}

fn parse_component(s: &str) -> Option<f64> {
    s.trim().parse::<f64>().ok().filter(|v| v.is_finite())
}

impl fmt::Display for Orientation {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        // Adding 0.0 turns -0.0 into 0.0 so a zero rotation prints as "0.00".
        let lambda = self.lambda.unwrap_or(0.0) + 0.0;
        let phi = self.phi.unwrap_or(0.0) + 0.0;
        let scale = self.scale.unwrap_or(0.0).round() as i64;
        write!(f, "{lambda:.2},{phi:.2},{scale}")
    }
}

#[cfg(test)]
mod tests {
    use super::Orientation;
    use pretty_assertions::assert_eq;

    #[test]
    fn parses_all_components() {
        let o = Orientation::parse("-74.01, 40.71,3000");
        assert_eq!(
            o,
            Orientation {
                lambda: Some(-74.01),
                phi: Some(40.71),
                scale: Some(3000.0),
            }
        );
        assert_eq!(o.center(), Some([-74.01, 40.71]));
    }

    #[test]
    fn permissive_parsing() {
        let o = Orientation::parse("10,abc");
        assert_eq!(o.lambda, Some(10.0));
        assert_eq!(o.phi, None);
        assert_eq!(o.scale, None);
        assert_eq!(o.center(), None);

        let empty = Orientation::parse("");
        assert_eq!(empty, Orientation::default());

        let nan = Orientation::parse("NaN,1,inf");
        assert_eq!(nan.lambda, None);
        assert_eq!(nan.scale, None);
    }

    #[test]
    fn formats_negated_rotation() {
        let o = Orientation::of([-12.3456, 0.0, 7.0], 512.6);
        assert_eq!(o.to_string(), "12.35,0.00,513");
    }

    #[test]
    fn format_parse_is_stable() {
        let s = Orientation::of([100.129, -33.3, 0.0], 240.2).to_string();
        assert_eq!(Orientation::parse(&s).to_string(), s);
    }
}
