//! Cross-checks the parallel engine against the single-chunk reference

use crate::life::{
    Cell, Engine, EngineConfig, MergeStrategy, SequentialScheduler, SparseGrid,
    ThreadPoolScheduler,
};
use anyhow::{Context, Result};
use log::{debug, warn};
use std::fmt;
use std::time::Instant;

/// One engine setup whose output must match the reference
pub struct Variant {
    pub name: String,
    engine: Engine<ThreadPoolScheduler>,
    /// Forced chunk size; `None` lets the engine choose
    chunk_size: Option<usize>,
}

impl Variant {
    pub fn new(name: impl Into<String>, config: EngineConfig, chunk_size: Option<usize>) -> Result<Self> {
        let name = name.into();
        let engine = Engine::new(config)
            .with_context(|| format!("Failed to create engine for variant '{}'", name))?;
        Ok(Self {
            name,
            engine,
            chunk_size,
        })
    }

    fn advance(&self, grid: &SparseGrid) -> crate::error::Result<SparseGrid> {
        match self.chunk_size {
            Some(chunk_size) => self.engine.advance_partitioned(grid, chunk_size),
            None => self.engine.advance(grid),
        }
    }
}

/// Checks that every engine variant produces the reference generation, step by step
pub struct DeterminismVerifier {
    generations: usize,
    reference: Engine<SequentialScheduler>,
    variants: Vec<Variant>,
}

/// Result of a determinism check
#[derive(Debug, Clone)]
pub struct VerificationResult {
    pub is_deterministic: bool,
    pub generations_checked: usize,
    pub variants_checked: Vec<String>,
    pub first_divergence: Option<Divergence>,
    pub final_population: usize,
    pub verification_time_ms: u64,
}

/// First point where a variant disagreed with the reference
#[derive(Debug, Clone)]
pub struct Divergence {
    /// Generation that came out different
    pub generation: usize,
    pub variant: String,
    /// Reference cells the variant lost
    pub missing: Vec<Cell>,
    /// Cells the variant produced that the reference does not have
    pub extra: Vec<Cell>,
}

impl DeterminismVerifier {
    /// Verifier with the standard set of variants: chunks of one cell with both
    /// merge strategies, the default parallel engine, and a two-worker pool
    pub fn new(generations: usize) -> Result<Self> {
        let variants = vec![
            Variant::new(
                "chunk size 1, sort+unique",
                EngineConfig { workers: 0, min_chunk_size: 1, merge: MergeStrategy::SortUnique },
                Some(1),
            )?,
            Variant::new(
                "chunk size 1, k-way merge",
                EngineConfig { workers: 0, min_chunk_size: 1, merge: MergeStrategy::KWayMerge },
                Some(1),
            )?,
            Variant::new("default parallel", EngineConfig::default(), None)?,
            Variant::new(
                "2 workers, min chunk 1",
                EngineConfig { workers: 2, min_chunk_size: 1, merge: MergeStrategy::KWayMerge },
                None,
            )?,
        ];
        Ok(Self::with_variants(generations, variants))
    }

    pub fn with_variants(generations: usize, variants: Vec<Variant>) -> Self {
        Self {
            generations,
            reference: Engine::sequential(),
            variants,
        }
    }

    /// Step `seed` forward, comparing every variant against the reference at each generation
    pub fn verify(&self, seed: &SparseGrid) -> Result<VerificationResult> {
        let start_time = Instant::now();
        let mut current = seed.clone();
        let mut first_divergence = None;
        let mut generations_checked = 0;

        'generations: for generation in 1..=self.generations {
            // The whole grid as one chunk is the reference.
            let expected = self
                .reference
                .advance_partitioned(&current, current.len())
                .with_context(|| format!("Reference failed at generation {}", generation))?;

            for variant in &self.variants {
                let actual = variant
                    .advance(&current)
                    .with_context(|| format!("Variant '{}' failed at generation {}", variant.name, generation))?;

                if actual != expected {
                    warn!("variant '{}' diverged at generation {}", variant.name, generation);
                    first_divergence = Some(Divergence::between(generation, &variant.name, &expected, &actual));
                    generations_checked = generation;
                    break 'generations;
                }
            }

            debug!("generation {} agrees across {} variants", generation, self.variants.len());
            generations_checked = generation;
            current = expected;
        }

        Ok(VerificationResult {
            is_deterministic: first_divergence.is_none(),
            generations_checked,
            variants_checked: self.variants.iter().map(|v| v.name.clone()).collect(),
            first_divergence,
            final_population: current.len(),
            verification_time_ms: start_time.elapsed().as_millis() as u64,
        })
    }
}

impl Divergence {
    fn between(generation: usize, variant: &str, expected: &SparseGrid, actual: &SparseGrid) -> Self {
        Self {
            generation,
            variant: variant.to_string(),
            missing: expected.iter().copied().filter(|&c| !actual.contains(c)).collect(),
            extra: actual.iter().copied().filter(|&c| !expected.contains(c)).collect(),
        }
    }
}

impl fmt::Display for VerificationResult {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        writeln!(f, "Determinism Check:")?;
        writeln!(f, "  Generations checked: {}", self.generations_checked)?;
        writeln!(f, "  Variants:")?;
        for name in &self.variants_checked {
            writeln!(f, "    - {}", name)?;
        }
        writeln!(f, "  Final population: {}", self.final_population)?;
        writeln!(f, "  Time: {}ms", self.verification_time_ms)?;
        if let Some(divergence) = &self.first_divergence {
            writeln!(
                f,
                "  Divergence at generation {} in '{}': {} missing, {} extra",
                divergence.generation,
                divergence.variant,
                divergence.missing.len(),
                divergence.extra.len()
            )?;
            for cell in divergence.missing.iter().take(3) {
                writeln!(f, "    missing {}", cell)?;
            }
            for cell in divergence.extra.iter().take(3) {
                writeln!(f, "    extra {}", cell)?;
            }
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::life::patterns;

    #[test]
    fn test_standard_variants_agree() {
        let verifier = DeterminismVerifier::new(40).unwrap();
        let result = verifier.verify(&patterns::r_pentomino()).unwrap();

        assert!(result.is_deterministic, "{}", result);
        assert_eq!(result.generations_checked, 40);
        assert_eq!(result.variants_checked.len(), 4);
    }

    #[test]
    fn test_divergence_report() {
        let expected = patterns::block();
        let actual = patterns::block().translated(1, 0);
        let divergence = Divergence::between(3, "shifted", &expected, &actual);

        assert_eq!(divergence.generation, 3);
        assert_eq!(divergence.missing, vec![Cell::new(0, 0), Cell::new(0, 1)]);
        assert_eq!(divergence.extra, vec![Cell::new(2, 0), Cell::new(2, 1)]);
    }

    #[test]
    fn test_empty_seed() {
        let verifier = DeterminismVerifier::with_variants(3, Vec::new());
        let result = verifier.verify(&SparseGrid::new()).unwrap();
        assert!(result.is_deterministic);
        assert_eq!(result.final_population, 0);
    }
}
