use obe_attainment::dataset::Dataset;
use obe_attainment::error::AppError;
use std::fs::File;
use std::path::PathBuf;
use tracing::info;

/// Files the in-memory repository is assembled from.
#[derive(Debug, Default)]
pub(crate) struct DatasetSources {
    pub(crate) dataset: Option<PathBuf>,
    pub(crate) records_csv: Option<PathBuf>,
    pub(crate) surveys_csv: Option<PathBuf>,
    pub(crate) mappings_csv: Option<PathBuf>,
}

pub(crate) fn load_dataset(sources: &DatasetSources) -> Result<Dataset, AppError> {
    let path = sources.dataset.as_ref().ok_or(AppError::MissingDataset)?;
    let mut dataset = Dataset::from_path(path)?;

    if let Some(path) = &sources.mappings_csv {
        let imported = dataset.import_mappings(File::open(path)?)?;
        info!(imported, path = %path.display(), "merged CLO mappings");
    }
    if let Some(path) = &sources.records_csv {
        let imported = dataset.import_records(File::open(path)?)?;
        info!(imported, path = %path.display(), "merged attainment records");
    }
    if let Some(path) = &sources.surveys_csv {
        let imported = dataset.import_surveys(File::open(path)?)?;
        info!(imported, path = %path.display(), "merged survey responses");
    }

    Ok(dataset)
}
