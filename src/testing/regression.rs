use std::path::{Path, PathBuf};
use anyhow::{Result, Context};
use image::RgbImage;
use log::{info, warn, error};
use crate::core::pbrt::Float;
use crate::core::fileutil::{indexed_sibling, file_stem_or};
use crate::core::renderwindow::RenderWindow;
use crate::testing::imagediff::{ImageDifference, DiffResult};

pub const DEFAULT_THRESHOLD: Float = 0.05;

/// Alternate baselines `name_1.png`, `name_2.png`, ... are tried up to this index.
const MAX_ALTERNATES: usize = 32;

#[derive(Debug, Copy, Clone, PartialEq, Eq)]
pub enum RegressionResult {
    Failed          = 0,
    Passed          = 1,
    NotRun          = 2,
    DoInteractor    = 3
}

/// Process exit status for a regression result: only a mismatch fails.
pub fn exit_code(result: RegressionResult) -> i32 {
    match result {
        RegressionResult::Failed => 1,
        _                        => 0
    }
}

#[derive(Debug, Clone)]
pub struct Testing {
    pub valid_image : Option<PathBuf>,
    pub temp_dir    : PathBuf,
    pub interactive : bool,
    pub threshold   : Float,
    pub difference  : ImageDifference
}

impl Default for Testing {
    fn default() -> Self {
        Self {
            valid_image: None,
            temp_dir: std::env::temp_dir(),
            interactive: false,
            threshold: DEFAULT_THRESHOLD,
            difference: ImageDifference::default()
        }
    }
}

impl Testing {
    pub fn new() -> Self {
        Self::default()
    }

    fn name(&self) -> String {
        match self.valid_image {
            Some(ref p) => file_stem_or(p, "regression"),
            None        => "regression".to_owned()
        }
    }

    fn output_path(&self, suffix: &str) -> PathBuf {
        self.temp_dir.join(format!("{}{}", self.name(), suffix))
    }

    fn save(&self, image: &RgbImage, suffix: &str) -> Result<PathBuf> {
        let path = self.output_path(suffix);

        image
            .save(&path)
            .with_context(|| format!("Error writing image \"{}\"", path.display()))?;

        Ok(path)
    }

    /// Compare against the baseline and each existing alternate, keeping the
    /// smallest error. `None` when no baseline could be read.
    fn best_match(&self, test: &RgbImage, valid: &Path) -> Option<(PathBuf, RgbImage, DiffResult)> {
        let mut best: Option<(PathBuf, RgbImage, DiffResult)> = None;

        for i in 0..=MAX_ALTERNATES {
            let path = indexed_sibling(valid, i);

            if i > 0 && !path.exists() { break; }

            let baseline = match image::open(&path) {
                Ok(img) => img.to_rgb8(),
                Err(e) => {
                    warn!("Unable to read baseline \"{}\": {}", path.display(), e);
                    continue;
                }
            };

            match self.difference.compare(test, &baseline) {
                Ok(diff) => {
                    info!("Baseline \"{}\" error {}", path.display(), diff.error);
                    let better = best.as_ref().map(|b| diff.error < b.2.error).unwrap_or(true);

                    if better {
                        best = Some((path, baseline, diff));
                    }
                }
                Err(e) => warn!("Baseline \"{}\": {}", path.display(), e)
            }

            if let Some(ref b) = best {
                if b.2.error <= self.threshold { break; }
            }
        }

        best
    }

    pub fn regression_test_image(&self, window: &RenderWindow) -> RegressionResult {
        let valid = match self.valid_image {
            Some(ref v) => v,
            None if self.interactive => return RegressionResult::DoInteractor,
            None => return RegressionResult::NotRun
        };

        let test = window.capture();

        if !valid.exists() {
            error!("Baseline image \"{}\" does not exist", valid.display());

            match self.save(&test, ".png") {
                Ok(p) => info!("Test image written to \"{}\"", p.display()),
                Err(e) => error!("{:#}", e)
            }

            return RegressionResult::Failed;
        }

        match self.best_match(&test, valid) {
            Some((_, _, ref diff)) if diff.error <= self.threshold => {
                info!("Image comparison passed with error {}", diff.error);

                if self.interactive {
                    RegressionResult::DoInteractor
                } else {
                    RegressionResult::Passed
                }
            }
            Some((path, baseline, diff)) => {
                error!("Failed image test \"{}\": error {} over threshold {} ({} bad pixels)",
                       path.display(), diff.error, self.threshold, diff.bad_pixels);

                let written = self.save(&test, ".png")
                    .and_then(|_| self.save(&diff.diff_image, ".diff.png"))
                    .and_then(|_| self.save(&baseline, ".valid.png"));

                match written {
                    Ok(_) => info!("Regression images written to \"{}\"", self.temp_dir.display()),
                    Err(e) => error!("{:#}", e)
                }

                RegressionResult::Failed
            }
            None => {
                error!("No readable baseline matching \"{}\"", valid.display());

                if let Err(e) = self.save(&test, ".png") {
                    error!("{:#}", e);
                }

                RegressionResult::Failed
            }
        }
    }
}
