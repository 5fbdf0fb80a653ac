//! Run-level orchestration.
//!
//! A [`Pipeline`] holds everything that is fixed for a run (options,
//! composer, memory bank) and turns results sources into samples in source
//! order, then episode order, then step order. Nothing is written here; the
//! caller decides what to do with the finished [`GenerationRun`].

use std::path::{Path, PathBuf};

use tracing::{info, warn};

use crate::config::{GenerationConfig, SftConfig};
use crate::discovery::{self, Sources};
use crate::episode::ResultsDocument;
use crate::error::Result;
use crate::memory::MemoryBankIndex;
use crate::prompt::{PromptComposer, PromptTemplates};
use crate::sample::SampleBuilder;
use crate::stats::{GenerationStats, SourceSummary};
use crate::types::TrainingSample;

/// Output of a complete run.
#[derive(Debug, Clone, Default)]
pub struct GenerationRun {
    /// All samples, in generation order.
    pub samples: Vec<TrainingSample>,
    /// One summary per results source, in processing order.
    pub sources: Vec<SourceSummary>,
    /// Aggregate counts.
    pub stats: GenerationStats,
}

/// Converts results documents into training samples.
#[derive(Debug, Clone)]
pub struct Pipeline {
    config: GenerationConfig,
    composer: PromptComposer,
    bank: MemoryBankIndex,
}

impl Pipeline {
    /// Assemble a pipeline from already-built parts.
    #[must_use]
    pub fn new(config: GenerationConfig, composer: PromptComposer, bank: MemoryBankIndex) -> Self {
        Self {
            config,
            composer,
            bank,
        }
    }

    /// Build a pipeline from configuration, loading template overrides and
    /// (when memory is enabled) the given memory sources.
    ///
    /// # Errors
    ///
    /// Returns an error if the template file or any memory source cannot be
    /// read or parsed.
    pub fn from_config<P: AsRef<Path>>(config: &SftConfig, memory_sources: &[P]) -> Result<Self> {
        let generation = config.generation.clone();

        let mut composer = PromptComposer::from_config(&generation);
        if let Some(path) = &config.prompt.templates {
            composer = composer.with_templates(PromptTemplates::from_file(path)?);
            info!(path = %path.display(), "Prompt templates loaded");
        }
        if let Some(layout) = &config.prompt.layout {
            composer = composer.with_layout(layout.clone());
        }

        let bank = if generation.use_memory {
            MemoryBankIndex::load(memory_sources)?
        } else {
            info!(skipped = memory_sources.len(), "Memory disabled; sources not loaded");
            MemoryBankIndex::new()
        };

        Ok(Self::new(generation, composer, bank))
    }

    /// The prompt composer in effect.
    #[must_use]
    pub fn composer(&self) -> &PromptComposer {
        &self.composer
    }

    /// The loaded memory bank.
    #[must_use]
    pub fn bank(&self) -> &MemoryBankIndex {
        &self.bank
    }

    fn builder(&self) -> SampleBuilder<'_> {
        SampleBuilder::new(&self.composer, &self.bank).with_config(&self.config)
    }

    /// Generate samples for every episode of `doc`.
    ///
    /// `path` is only used to label the returned summary and log lines.
    ///
    /// # Errors
    ///
    /// Fails only under strict alignment, on the first misaligned episode.
    pub fn process_document(
        &self,
        doc: &ResultsDocument,
        path: &Path,
    ) -> Result<(Vec<TrainingSample>, SourceSummary)> {
        let builder = self.builder();
        let mut samples = Vec::new();
        let mut summary = SourceSummary {
            path: path.to_path_buf(),
            episodes: doc.results.len(),
            ..SourceSummary::default()
        };

        for episode in &doc.results {
            if episode.success {
                summary.successful_episodes += 1;
            } else {
                summary.failed_episodes += 1;
            }
            if !builder.accepts(episode) {
                continue;
            }

            let shape = episode.alignment();
            if !shape.is_aligned() {
                summary.misaligned_episodes += 1;
                warn!(
                    source = %path.display(),
                    game_id = %episode.game_id,
                    actions = shape.actions,
                    observations = shape.observations,
                    thoughts = shape.thoughts,
                    "Episode arrays are misaligned"
                );
            }

            samples.extend(builder.build(episode)?);
        }

        summary.samples = samples.len();
        Ok((samples, summary))
    }

    /// Load one results file and generate its samples.
    ///
    /// # Errors
    ///
    /// Returns an error if the file cannot be read or parsed, or under
    /// strict alignment.
    pub fn process_source(&self, path: &Path) -> Result<(Vec<TrainingSample>, SourceSummary)> {
        let doc = ResultsDocument::load(path)?;
        info!(
            source = %path.display(),
            episodes = doc.results.len(),
            "Results loaded"
        );
        let (samples, summary) = self.process_document(&doc, path)?;
        info!(
            source = %path.display(),
            samples = summary.samples,
            misaligned = summary.misaligned_episodes,
            "Samples generated"
        );
        Ok((samples, summary))
    }

    /// Process every results source in order.
    ///
    /// All-or-nothing: the first failing source aborts the run.
    ///
    /// # Errors
    ///
    /// See [`Pipeline::process_source`].
    pub fn run<P: AsRef<Path>>(&self, results_sources: &[P]) -> Result<GenerationRun> {
        let mut samples = Vec::new();
        let mut sources = Vec::with_capacity(results_sources.len());

        for path in results_sources {
            let (mut generated, summary) = self.process_source(path.as_ref())?;
            samples.append(&mut generated);
            sources.push(summary);
        }

        let stats = GenerationStats::collect(&samples, &sources);
        info!(
            sources = sources.len(),
            episodes = stats.episodes,
            samples = stats.total_samples,
            with_memory = stats.with_memory,
            misaligned = stats.misaligned_episodes,
            "Generation complete"
        );
        Ok(GenerationRun {
            samples,
            sources,
            stats,
        })
    }
}

/// Discover inputs in `dir`, build a pipeline and run it.
///
/// Returns the discovered sources alongside the run so callers can report
/// which files were read.
///
/// # Errors
///
/// Any discovery, loading, or generation error.
pub fn generate_from_dir(dir: &Path, config: &SftConfig) -> Result<(Sources, GenerationRun)> {
    config.validate()?;
    let sources = discovery::discover(dir, &config.discovery)?;
    let pipeline = Pipeline::from_config(config, &sources.memory)?;
    let run = pipeline.run(&sources.results)?;
    Ok((sources, run))
}

/// Default output location for `dir`.
#[must_use]
pub fn default_output_path(dir: &Path, config: &SftConfig) -> PathBuf {
    dir.join(&config.discovery.output_file_name)
}
