//! End-to-end build: config → overrides → extraction → conversion → artifacts.

use std::time::{Duration, Instant};

use tracing::{info, instrument, warn};

use specgen_artifacts::{ArtifactMeta, EmitContext, WriterRegistry, emit};
use specgen_shared::{BuildConfig, Dialect, Result, SpecgenError};

use crate::extract::{ExtractRequest, Extractor};
use crate::overrides::load_overrides;

/// Outcome of a successful build.
#[derive(Debug, Clone)]
pub struct BuildReport {
    /// One entry per written artifact, in request order.
    pub artifacts: Vec<ArtifactMeta>,
    /// Requested output types no writer handles.
    pub skipped: Vec<String>,
    /// Whether the document was rewritten into the current dialect.
    pub converted: bool,
    /// Number of override directives handed to the extractor.
    pub override_count: usize,
    pub elapsed: Duration,
}

/// Runs builds against a set of artifact writers.
pub struct Generator {
    writers: WriterRegistry,
}

impl Generator {
    /// A generator with the built-in writers.
    pub fn new() -> Self {
        Self::with_writers(WriterRegistry::new())
    }

    pub fn with_writers(writers: WriterRegistry) -> Self {
        Self { writers }
    }

    /// Run one build.
    ///
    /// 1. Fill defaults and validate the config
    /// 2. Load overrides
    /// 3. Extract the document
    /// 4. Convert it to the current dialect when asked to
    /// 5. Create the output directory
    /// 6. Emit every requested artifact
    ///
    /// Conversion runs before any writer, so a conversion failure leaves
    /// the output directory untouched.
    #[instrument(skip_all, fields(output_dir = %config.output_dir.display()))]
    pub fn build(&self, config: &mut BuildConfig, extractor: &dyn Extractor) -> Result<BuildReport> {
        let start = Instant::now();

        config.apply_defaults();
        config.validate()?;

        let overrides = load_overrides(&config.overrides_file)?;
        let override_count = overrides.as_ref().map_or(0, |o| o.len());

        let mut doc = extractor.extract(&ExtractRequest::new(config, overrides.as_ref()))?;
        let doc_info = doc.info();

        let legacy = doc.dialect() == Some(Dialect::Swagger2);
        let converted =
            legacy && (config.target_dialect == Dialect::OpenApi3 || doc.requests_openapi3());
        if converted {
            specgen_convert::convert(&mut doc)?;
        }

        std::fs::create_dir_all(&config.output_dir)
            .map_err(|e| SpecgenError::io(&config.output_dir, e))?;

        let ctx = EmitContext::new(config, &doc_info);
        let mut artifacts = Vec::with_capacity(config.output_types.len());
        let mut skipped = Vec::new();

        for output_type in &config.output_types {
            match self.writers.for_output_type(output_type) {
                Some(writer) => artifacts.push(emit(writer, &doc, &ctx, &config.output_dir)?),
                None => {
                    warn!(output_type = %output_type, "output type not supported, skipping");
                    skipped.push(output_type.trim().to_ascii_lowercase());
                }
            }
        }

        let elapsed = start.elapsed();
        info!(
            artifacts = artifacts.len(),
            skipped = skipped.len(),
            converted,
            elapsed_ms = elapsed.as_millis() as u64,
            "build complete"
        );

        Ok(BuildReport {
            artifacts,
            skipped,
            converted,
            override_count,
            elapsed,
        })
    }
}

impl Default for Generator {
    fn default() -> Self {
        Self::new()
    }
}
