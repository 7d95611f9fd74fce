/// Live-tunable simulation parameters
#[cfg_attr(
    feature = "serde",
    derive(serde::Serialize, serde::Deserialize),
    serde(default, rename_all = "camelCase")
)]
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct SimulationParameters {
    /// Stiffness of the spring pulling each vertex to its rest position
    pub tension: f32,
    pub mass: f32,
    /// 1 is critical damping
    pub damping_ratio: f32,
    /// Rest-space radius of the grab brush
    pub cursor_size: f32,
    /// Constraint relaxation iterations per frame
    pub iteration_count: u32,
}

impl SimulationParameters {
    pub const DEFAULT: Self = Self {
        tension: 300.0,
        mass: 3.0,
        damping_ratio: 2.5,
        cursor_size: 0.15,
        iteration_count: 40,
    };

    /// Damping coefficient, `2·sqrt(tension·mass)·damping_ratio`
    pub fn damping(&self) -> f32 {
        2.0 * (self.tension * self.mass).sqrt() * self.damping_ratio
    }

    pub fn validate(&self) -> Result<(), ParameterError> {
        let values = [
            ("tension", self.tension),
            ("mass", self.mass),
            ("dampingRatio", self.damping_ratio),
            ("cursorSize", self.cursor_size),
        ];
        for (name, value) in values {
            if !value.is_finite() {
                return Err(ParameterError::NotFinite { name, value });
            }
        }

        for (name, value) in [("tension", self.tension), ("mass", self.mass)] {
            if value <= 0.0 {
                return Err(ParameterError::NotPositive { name, value });
            }
        }
        for (name, value) in [
            ("dampingRatio", self.damping_ratio),
            ("cursorSize", self.cursor_size),
        ] {
            if value < 0.0 {
                return Err(ParameterError::Negative { name, value });
            }
        }
        Ok(())
    }
}

impl Default for SimulationParameters {
    fn default() -> Self {
        Self::DEFAULT
    }
}

#[derive(Debug, Clone, Copy, PartialEq, thiserror::Error)]
pub enum ParameterError {
    /// NaN or infinite value
    #[error("{name} must be finite, got {value}")]
    NotFinite { name: &'static str, value: f32 },
    #[error("{name} must be greater than zero, got {value}")]
    NotPositive { name: &'static str, value: f32 },
    #[error("{name} must not be negative, got {value}")]
    Negative { name: &'static str, value: f32 },
}

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct IntegrateUniforms {
    pub tension: f32,
    pub damping: f32,
    pub mass: f32,
}

/// What the passes read from the parameters, derived once per change
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Uniforms {
    pub integrate: IntegrateUniforms,
    pub cursor_size: f32,
    pub iteration_count: u32,
}

impl From<&SimulationParameters> for Uniforms {
    fn from(parameters: &SimulationParameters) -> Self {
        Self {
            integrate: IntegrateUniforms {
                tension: parameters.tension,
                damping: parameters.damping(),
                mass: parameters.mass,
            },
            cursor_size: parameters.cursor_size,
            iteration_count: parameters.iteration_count,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn defaults_derive_damping() {
        let parameters = SimulationParameters::default();
        approx::assert_relative_eq!(parameters.damping(), 150.0);
        assert_eq!(Uniforms::from(&parameters).integrate.damping, parameters.damping());
        assert_eq!(parameters.validate(), Ok(()));
    }

    #[test]
    fn invalid_values_are_named() {
        let mut parameters = SimulationParameters::DEFAULT;
        parameters.mass = 0.0;
        assert_eq!(
            parameters.validate(),
            Err(ParameterError::NotPositive {
                name: "mass",
                value: 0.0
            })
        );

        parameters.mass = 3.0;
        parameters.cursor_size = f32::NAN;
        assert!(matches!(
            parameters.validate(),
            Err(ParameterError::NotFinite {
                name: "cursorSize",
                ..
            })
        ));
    }
}
