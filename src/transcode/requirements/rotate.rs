use std::fmt;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct Rotate {
    /// Clockwise; any multiple of 90 is accepted by the pipeline, negatives included.
    pub degrees: i32,
    pub flip_horizontally: bool,
    pub flip_vertically: bool,
    /// Forces physical pixel rotation so the output has `Up` orientation.
    pub force_up_orientation: bool,
}

impl Rotate {
    pub fn degrees(degrees: i32) -> Self {
        Self {
            degrees,
            ..Self::default()
        }
    }

    /// Degrees normalized into `0..360`.
    pub fn sanitised_degrees(&self) -> i32 {
        self.degrees.rem_euclid(360)
    }

    pub fn is_multiple_of_90(&self) -> bool {
        self.degrees % 90 == 0
    }

    pub fn flip(&self) -> bool {
        self.flip_horizontally || self.flip_vertically
    }

    pub fn is_noop(&self) -> bool {
        self.sanitised_degrees() == 0 && !self.flip() && !self.force_up_orientation
    }
}

impl fmt::Display for Rotate {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "{{degrees:{},flipHorizontally:{},flipVertically:{},forceUpOrientation:{}}}",
            self.degrees, self.flip_horizontally, self.flip_vertically, self.force_up_orientation
        )
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn noop_and_sanitised_degrees() {
        assert!(Rotate::default().is_noop());
        assert!(Rotate::degrees(720).is_noop());
        assert!(!Rotate::degrees(-90).is_noop());
        assert_eq!(Rotate::degrees(-90).sanitised_degrees(), 270);
        let force = Rotate {
            force_up_orientation: true,
            ..Rotate::default()
        };
        assert!(!force.is_noop());
    }
}
