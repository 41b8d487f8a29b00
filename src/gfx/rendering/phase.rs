//! Runtime-selectable phase function registry
//!
//! The media shaders each declare one WGSL implementation per phase function
//! (`fn phase_mie`, `fn phase_rayleigh`, ...) and dispatch through a `switch`
//! on a uniform index. The registry enumerates the implementations from the
//! retained shader sources in declaration order and hands out the stable
//! index used to drive that dispatch each frame.
//!
//! Every program sharing the dispatch must declare the same implementations
//! in the same order, otherwise an index selected for one program would pick
//! a different function in another. That requirement is checked once at
//! startup, against the full name list rather than just the count, and a
//! mismatch is a hard error.

use thiserror::Error;

#[derive(Debug, Error)]
pub enum PhaseError {
    #[error("phase function selection {index} is out of range (0..{available})")]
    InvalidSelection { index: usize, available: usize },

    #[error(
        "shader '{program}' declares phase functions [{found}] but the first program declared [{expected}]"
    )]
    MismatchedPrograms {
        program: String,
        expected: String,
        found: String,
    },

    #[error("shader '{program}' declares no phase function implementations")]
    NoImplementations { program: String },

    #[error("phase function '{name}' is not declared by the media shaders")]
    UnknownImplementation { name: String },
}

/// Angular scattering distribution of the participating medium
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PhaseFunction {
    Mie,
    Rayleigh,
    Schlick,
    Uniform,
}

impl PhaseFunction {
    pub const ALL: [PhaseFunction; 4] = [
        PhaseFunction::Mie,
        PhaseFunction::Rayleigh,
        PhaseFunction::Schlick,
        PhaseFunction::Uniform,
    ];

    /// WGSL implementation suffix (`fn phase_<name>`)
    pub fn name(self) -> &'static str {
        match self {
            PhaseFunction::Mie => "mie",
            PhaseFunction::Rayleigh => "rayleigh",
            PhaseFunction::Schlick => "schlick",
            PhaseFunction::Uniform => "uniform",
        }
    }

    /// Human-readable label for the UI
    pub fn label(self) -> &'static str {
        match self {
            PhaseFunction::Mie => "Mie",
            PhaseFunction::Rayleigh => "Rayleigh",
            PhaseFunction::Schlick => "Schlick",
            PhaseFunction::Uniform => "Uniform",
        }
    }

    fn from_name(name: &str) -> Option<Self> {
        Self::ALL.into_iter().find(|p| p.name() == name)
    }
}

/// Stable phase-function index table shared by all media programs
#[derive(Debug)]
pub struct PhaseRegistry {
    names: Vec<String>,
}

impl PhaseRegistry {
    /// Scans one WGSL source for phase implementations in declaration order
    pub fn enumerate_source(source: &str) -> Vec<String> {
        let mut names = Vec::new();
        for line in source.lines() {
            let trimmed = line.trim_start();
            let Some(rest) = trimmed.strip_prefix("fn phase_") else {
                continue;
            };
            let Some(end) = rest.find('(') else {
                continue;
            };
            let name = rest[..end].trim().to_string();
            if !name.is_empty() && !names.contains(&name) {
                names.push(name);
            }
        }
        names
    }

    /// Builds the registry from every program sharing the phase dispatch
    ///
    /// The first program fixes the ordinals; any later program whose name
    /// list differs (names or order) fails fast.
    pub fn from_sources<'a>(
        programs: impl IntoIterator<Item = (&'a str, &'a str)>,
    ) -> Result<Self, PhaseError> {
        let mut registry: Option<PhaseRegistry> = None;

        for (program, source) in programs {
            let names = Self::enumerate_source(source);
            if names.is_empty() {
                return Err(PhaseError::NoImplementations {
                    program: program.to_string(),
                });
            }

            match &registry {
                None => registry = Some(PhaseRegistry { names }),
                Some(existing) => {
                    if existing.names != names {
                        return Err(PhaseError::MismatchedPrograms {
                            program: program.to_string(),
                            expected: existing.names.join(", "),
                            found: names.join(", "),
                        });
                    }
                }
            }
        }

        registry.ok_or(PhaseError::NoImplementations {
            program: "<none>".to_string(),
        })
    }

    /// Implementation names in dispatch order
    pub fn names(&self) -> &[String] {
        &self.names
    }

    pub fn len(&self) -> usize {
        self.names.len()
    }

    pub fn is_empty(&self) -> bool {
        self.names.is_empty()
    }

    /// The dispatch index for a phase function, valid for every registered
    /// program
    pub fn index(&self, phase: PhaseFunction) -> Result<u32, PhaseError> {
        self.names
            .iter()
            .position(|n| n == phase.name())
            .map(|i| i as u32)
            .ok_or_else(|| PhaseError::UnknownImplementation {
                name: phase.name().to_string(),
            })
    }

    /// Resolves a raw user-facing index (number keys) to a phase function
    ///
    /// Out-of-range selection is rejected, never clamped.
    pub fn select(&self, index: usize) -> Result<PhaseFunction, PhaseError> {
        let name = self
            .names
            .get(index)
            .ok_or(PhaseError::InvalidSelection {
                index,
                available: self.names.len(),
            })?;
        PhaseFunction::from_name(name).ok_or_else(|| PhaseError::UnknownImplementation {
            name: name.clone(),
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const SHADER_A: &str = r#"
        fn phase_mie(cos_theta: f32, g: f32) -> f32 { return 1.0; }
        fn phase_rayleigh(cos_theta: f32) -> f32 { return 1.0; }
        fn phase_schlick(cos_theta: f32, g: f32) -> f32 { return 1.0; }
        fn phase_uniform() -> f32 { return 1.0; }
        fn eval_phase(index: u32, cos_theta: f32, g: f32) -> f32 { return 0.0; }
    "#;

    const SHADER_REORDERED: &str = r#"
        fn phase_rayleigh(cos_theta: f32) -> f32 { return 1.0; }
        fn phase_mie(cos_theta: f32, g: f32) -> f32 { return 1.0; }
        fn phase_schlick(cos_theta: f32, g: f32) -> f32 { return 1.0; }
        fn phase_uniform() -> f32 { return 1.0; }
    "#;

    #[test]
    fn enumeration_preserves_declaration_order() {
        let names = PhaseRegistry::enumerate_source(SHADER_A);
        assert_eq!(names, ["mie", "rayleigh", "schlick", "uniform"]);
    }

    #[test]
    fn matching_programs_share_indices() {
        let registry =
            PhaseRegistry::from_sources([("illumination", SHADER_A), ("skybox", SHADER_A)])
                .unwrap();

        for (expected, phase) in PhaseFunction::ALL.into_iter().enumerate() {
            assert_eq!(registry.index(phase).unwrap(), expected as u32);
        }
    }

    #[test]
    fn reordered_programs_are_rejected_at_startup() {
        let err = PhaseRegistry::from_sources([
            ("illumination", SHADER_A),
            ("skybox", SHADER_REORDERED),
        ])
        .unwrap_err();

        match err {
            PhaseError::MismatchedPrograms { program, .. } => assert_eq!(program, "skybox"),
            other => panic!("unexpected error: {other}"),
        }
    }

    #[test]
    fn out_of_range_selection_is_rejected_not_clamped() {
        let registry = PhaseRegistry::from_sources([("illumination", SHADER_A)]).unwrap();

        assert_eq!(registry.select(0).unwrap(), PhaseFunction::Mie);
        assert_eq!(registry.select(3).unwrap(), PhaseFunction::Uniform);

        let err = registry.select(4).unwrap_err();
        match err {
            PhaseError::InvalidSelection { index, available } => {
                assert_eq!(index, 4);
                assert_eq!(available, 4);
            }
            other => panic!("unexpected error: {other}"),
        }
    }

    #[test]
    fn program_without_implementations_is_an_error() {
        let err =
            PhaseRegistry::from_sources([("flat", "fn vs_main() {}")]).unwrap_err();
        assert!(matches!(err, PhaseError::NoImplementations { .. }));
    }

    #[test]
    fn shipped_media_shaders_agree() {
        let illumination = include_str!("shaders/illumination.wgsl");
        let skybox = include_str!("shaders/skybox_media.wgsl");
        let registry = PhaseRegistry::from_sources([
            ("illumination", illumination),
            ("skybox_media", skybox),
        ])
        .unwrap();
        assert_eq!(registry.len(), 4);
        assert_eq!(registry.index(PhaseFunction::Mie).unwrap(), 0);
        assert_eq!(registry.index(PhaseFunction::Uniform).unwrap(), 3);
    }
}
