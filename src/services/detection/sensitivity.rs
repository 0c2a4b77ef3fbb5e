// Sensitivity utilities
// The educational level moves vocabulary expectations, not the label bands.

use crate::models::EducationalLevel;

#[derive(Debug, Copy, Clone, PartialEq)]
pub struct LevelProfile {
    /// Windowed vocabulary density (percent) above which the text reads as too advanced.
    pub density_ceiling: f64,
}

pub fn level_profile(level: EducationalLevel) -> LevelProfile {
    match level {
        EducationalLevel::Basica1To4 => LevelProfile {
            density_ceiling: 87.0,
        },
        EducationalLevel::Basica5To8 => LevelProfile {
            density_ceiling: 90.0,
        },
        EducationalLevel::Medio1To2 => LevelProfile {
            density_ceiling: 92.0,
        },
        EducationalLevel::Medio3To4 => LevelProfile {
            density_ceiling: 94.0,
        },
        EducationalLevel::Superior => LevelProfile {
            density_ceiling: 96.0,
        },
    }
}

/// Closing indicator that records which expectations were applied.
pub fn level_indicator(level: EducationalLevel) -> String {
    match level {
        EducationalLevel::Basica1To4 | EducationalLevel::Basica5To8 => {
            format!("Análisis básico para nivel {}", level.code())
        }
        EducationalLevel::Medio1To2 | EducationalLevel::Medio3To4 => {
            "Análisis para educación media".to_string()
        }
        EducationalLevel::Superior => "Análisis automático básico".to_string(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_ceilings_grow_with_level() {
        let ceilings: Vec<f64> = EducationalLevel::ALL
            .iter()
            .map(|l| level_profile(*l).density_ceiling)
            .collect();
        assert!(ceilings.windows(2).all(|w| w[0] < w[1]));
    }

    #[test]
    fn test_level_indicator() {
        assert_eq!(
            level_indicator(EducationalLevel::Basica1To4),
            "Análisis básico para nivel basica-1-4"
        );
        assert_eq!(
            level_indicator(EducationalLevel::Medio3To4),
            "Análisis para educación media"
        );
    }
}
