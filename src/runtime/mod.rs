use anyhow::{Context, Result};
use indicatif::{ProgressBar, ProgressStyle};
use std::path::Path;

use crate::clean::Cleaner;
use crate::config::PipelineConfig;
use crate::error::PipelineError;
use crate::filters;
use crate::io;
use crate::logging::RunLog;

mod manifest;
pub use manifest::{FilterManifest, Manifest};

/// Run the whole pipeline: clean the input, then apply each configured
/// filter as an independent full scan of the bare dataset.
///
/// Passes are sequential and share no state; any error is fatal. The bare
/// dataset is re-read per filter rather than multiplexing one pass.
pub fn run_pipeline(
    config: &PipelineConfig,
    input: &Path,
    cleaner: &dyn Cleaner,
    log: &RunLog,
) -> Result<Manifest> {
    log.info(&format!("Running pipeline: {}", config.name));

    if !input.exists() {
        return Err(PipelineError::InputMissing(input.to_path_buf()).into());
    }

    log.info(&format!("Cleaning input dataset: {}", input.display()));
    let bare = cleaner.clean(input)?;
    log.info(&format!("Bare dataset ready: {}", bare.display()));

    let mut manifest = Manifest::new(config.name.clone(), input, &bare);

    for (filter_idx, filter_cfg) in config.filters.iter().enumerate() {
        log.info(&format!(
            "[Filter {}/{}] {}",
            filter_idx + 1,
            config.filters.len(),
            filter_cfg.name
        ));

        let records = io::read_records(&bare)?;
        let input_rows = records.len();

        let predicate = filters::create_predicate(&filter_cfg.filter);

        let pb = ProgressBar::new(input_rows as u64);
        pb.set_style(
            ProgressStyle::default_bar()
                .template(
                    "{spinner:.green} [{elapsed_precise}] [{bar:40.cyan/blue}] {pos}/{len} rows ({percent}%)",
                )
                .unwrap(),
        );

        let mut matched = Vec::new();
        for record in records {
            if predicate.matches(&record) {
                matched.push(record);
            }
            pb.inc(1);
        }
        pb.finish_and_clear();

        io::write_records(&filter_cfg.output, &matched).with_context(|| {
            format!(
                "Failed to write output for filter '{}'",
                filter_cfg.name
            )
        })?;

        let matched_rows = matched.len();
        log.info(&format!(
            "  {}: {} -> {} rows (filtered: {})",
            filter_cfg.name,
            input_rows,
            matched_rows,
            input_rows - matched_rows
        ));

        manifest.add_filter(FilterManifest {
            name: filter_cfg.name.clone(),
            output_path: filter_cfg.output.to_string_lossy().into_owned(),
            input_rows,
            matched_rows,
            filtered_rows: input_rows - matched_rows,
        });
    }

    let manifest_path = bare.with_file_name("manifest.json");
    manifest.write_to_file(&manifest_path)?;
    log.info(&format!("Manifest written to: {}", manifest_path.display()));
    log.info("Pipeline completed successfully");

    Ok(manifest)
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::fs;
    use std::path::PathBuf;

    use crate::config::{FilterConfig, FilterSpec};

    /// Stand-in collaborator: copies the input to the bare path.
    struct CopyCleaner;

    impl Cleaner for CopyCleaner {
        fn clean(&self, input: &Path) -> std::result::Result<PathBuf, PipelineError> {
            let bare = crate::clean::bare_path(input);
            fs::copy(input, &bare).map_err(|_| PipelineError::BareDataMissing(bare.clone()))?;
            Ok(bare)
        }
    }

    const DATA: &str = "\
2025-04-02,13:00:00,st-01,-1.5
2025-04-09,09:00:00,st-02,3.2
2025-05-11,13:00:00,st-01,0.0
2025-06-20,17:00:00,st-03,-0.4
2025-07-01,13:00:00,st-02,n/a
";

    fn test_config(dir: &Path) -> PipelineConfig {
        PipelineConfig {
            name: "observation-slices".to_string(),
            cleaner: "obsclean".to_string(),
            filters: vec![
                FilterConfig {
                    name: "at-1300".to_string(),
                    output: dir.join("at-1300.csv"),
                    filter: FilterSpec::Contains {
                        pattern: "13:00:00".to_string(),
                    },
                },
                FilterConfig {
                    name: "april".to_string(),
                    output: dir.join("april.csv"),
                    filter: FilterSpec::Contains {
                        pattern: "-04-".to_string(),
                    },
                },
                FilterConfig {
                    name: "below-zero".to_string(),
                    output: dir.join("below-zero.csv"),
                    filter: FilterSpec::FieldBelow {
                        field: 3,
                        threshold: 0.0,
                    },
                },
            ],
        }
    }

    fn run(dir: &Path, data: &str) -> Manifest {
        let input = dir.join("2025.csv");
        fs::write(&input, data).unwrap();
        let log = RunLog::create(dir).unwrap();
        run_pipeline(&test_config(dir), &input, &CopyCleaner, &log).unwrap()
    }

    #[test]
    fn outputs_are_ordered_subsequences() {
        let dir = tempfile::tempdir().unwrap();
        let manifest = run(dir.path(), DATA);

        let at_1300 = fs::read_to_string(dir.path().join("at-1300.csv")).unwrap();
        assert_eq!(
            at_1300,
            "2025-04-02,13:00:00,st-01,-1.5\n\
             2025-05-11,13:00:00,st-01,0.0\n\
             2025-07-01,13:00:00,st-02,n/a\n"
        );

        let april = fs::read_to_string(dir.path().join("april.csv")).unwrap();
        assert_eq!(
            april,
            "2025-04-02,13:00:00,st-01,-1.5\n2025-04-09,09:00:00,st-02,3.2\n"
        );

        // Strictly-below-zero slice: 0.0 and the non-numeric reading stay out
        let below_zero = fs::read_to_string(dir.path().join("below-zero.csv")).unwrap();
        assert_eq!(
            below_zero,
            "2025-04-02,13:00:00,st-01,-1.5\n2025-06-20,17:00:00,st-03,-0.4\n"
        );

        assert_eq!(manifest.filters.len(), 3);
        assert_eq!(manifest.filters[0].input_rows, 5);
        assert_eq!(manifest.filters[0].matched_rows, 3);
        assert_eq!(manifest.filters[2].matched_rows, 2);
        assert_eq!(manifest.filters[2].filtered_rows, 3);
    }

    #[test]
    fn no_matches_is_an_empty_output_not_an_error() {
        let dir = tempfile::tempdir().unwrap();
        run(dir.path(), "2025-05-11,09:00:00,st-01,3.0\n");

        let april = fs::read_to_string(dir.path().join("april.csv")).unwrap();
        assert_eq!(april, "");
    }

    #[test]
    fn reruns_are_idempotent() {
        let dir = tempfile::tempdir().unwrap();
        run(dir.path(), DATA);
        let first = fs::read_to_string(dir.path().join("at-1300.csv")).unwrap();

        run(dir.path(), DATA);
        let second = fs::read_to_string(dir.path().join("at-1300.csv")).unwrap();
        assert_eq!(first, second);
    }

    #[test]
    fn missing_input_aborts_before_cleaning() {
        let dir = tempfile::tempdir().unwrap();
        let log = RunLog::create(dir.path()).unwrap();
        let config = test_config(dir.path());

        let err = run_pipeline(&config, &dir.path().join("absent.csv"), &CopyCleaner, &log)
            .unwrap_err();
        assert!(matches!(
            err.downcast_ref::<PipelineError>(),
            Some(PipelineError::InputMissing(_))
        ));
        assert!(!dir.path().join("at-1300.csv").exists());
    }

    #[test]
    fn manifest_is_written_next_to_bare_dataset() {
        let dir = tempfile::tempdir().unwrap();
        run(dir.path(), DATA);

        let manifest_path = dir.path().join("manifest.json");
        let parsed: Manifest =
            serde_json::from_str(&fs::read_to_string(manifest_path).unwrap()).unwrap();
        assert_eq!(parsed.pipeline_name, "observation-slices");
        assert_eq!(parsed.filters.len(), 3);
    }
}
