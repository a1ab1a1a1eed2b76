use super::{ClassifierError, DigitClassifier, LabeledSample};
use crate::{DigitExtractor, ExtractedDigit, ExtractorParams};
use log::{debug, warn};
use nalgebra::Matrix2x3;
use serde::{Deserialize, Serialize};
use std::fs;
use std::path::Path;
use sudoku_lens_core::{warp_affine_gray, GrayImage};

#[derive(Clone, Debug, Default, Serialize, Deserialize)]
struct StoredSample {
    label: u8,
    features: Vec<f32>,
}

/// On-disk model: the normalized training samples themselves.
#[derive(Clone, Debug, Default, Serialize, Deserialize)]
struct KnnModel {
    sample_width: usize,
    samples: Vec<StoredSample>,
}

/// k-nearest-neighbour vote over normalized ink bitmaps.
///
/// Every image, training or query, goes through the same extractor, is cropped
/// to the bounding box of its ink and resampled to `sample_width` squared
/// values in `[0, 1]`.
pub struct NearestNeighborClassifier {
    extractor: DigitExtractor,
    k: usize,
    sample_width: usize,
    model: KnnModel,
}

impl NearestNeighborClassifier {
    pub fn new(extractor: ExtractorParams, k: usize, sample_width: usize) -> Self {
        let sample_width = sample_width.max(1);
        Self {
            extractor: DigitExtractor::new(extractor),
            k: k.max(1),
            sample_width,
            model: KnnModel {
                sample_width,
                samples: Vec::new(),
            },
        }
    }

    pub fn sample_count(&self) -> usize {
        self.model.samples.len()
    }

    /// Normalized feature vector, `None` when the cell holds no ink.
    pub fn features(&self, cell: &GrayImage) -> Option<Vec<f32>> {
        self.ink_features(&self.extractor.extract(cell))
    }

    /// Feature vector of an already extracted mask.
    pub fn ink_features(&self, digit: &ExtractedDigit) -> Option<Vec<f32>> {
        if !digit.contains_digit {
            return None;
        }
        let (x0, y0, x1, y1) = ink_bounds(&digit.mask)?;
        let ink = digit.mask.view().crop(x0, y0, x1 - x0, y1 - y0)?;
        let sw = self.sample_width;
        let sx = ink.width as f64 / sw as f64;
        let sy = ink.height as f64 / sw as f64;
        let m = Matrix2x3::new(sx, 0.0, 0.5 * sx - 0.5, 0.0, sy, 0.5 * sy - 0.5);
        let small = warp_affine_gray(&ink.view(), &m, sw, sw);
        Some(small.data.iter().map(|&v| v as f32 / 255.0).collect())
    }
}

/// Inclusive-exclusive bounds `(x0, y0, x1, y1)` of the non-zero pixels.
fn ink_bounds(mask: &GrayImage) -> Option<(usize, usize, usize, usize)> {
    let mut bounds: Option<(usize, usize, usize, usize)> = None;
    for y in 0..mask.height {
        for x in 0..mask.width {
            if mask.get(x, y) == 0 {
                continue;
            }
            bounds = Some(match bounds {
                None => (x, y, x + 1, y + 1),
                Some((x0, y0, x1, y1)) => (x0.min(x), y0.min(y), x1.max(x + 1), y1.max(y + 1)),
            });
        }
    }
    bounds
}

fn squared_distance(a: &[f32], b: &[f32]) -> f32 {
    a.iter().zip(b).map(|(p, q)| (p - q) * (p - q)).sum()
}

impl NearestNeighborClassifier {
    fn vote(&self, query: Option<Vec<f32>>) -> u8 {
        let Some(query) = query else {
            return 0;
        };

        let mut nearest: Vec<(f32, u8)> = self
            .model
            .samples
            .iter()
            .map(|s| (squared_distance(&query, &s.features), s.label))
            .collect();
        nearest.sort_by(|a, b| a.0.total_cmp(&b.0).then(a.1.cmp(&b.1)));
        nearest.truncate(self.k);

        let mut votes = [(0usize, 0.0f32); 10];
        for &(d, label) in &nearest {
            let slot = &mut votes[label as usize];
            slot.0 += 1;
            slot.1 += d;
        }

        // Most votes, then smaller total distance, then smaller digit.
        let mut best = 0u8;
        for label in 1..=9u8 {
            let (count, dist) = votes[label as usize];
            if count == 0 {
                continue;
            }
            let (best_count, best_dist) = votes[best as usize];
            if best == 0 || count > best_count || (count == best_count && dist < best_dist) {
                best = label;
            }
        }
        best
    }
}

impl DigitClassifier for NearestNeighborClassifier {
    fn classify(&self, cell: &GrayImage) -> u8 {
        if self.model.samples.is_empty() {
            return 0;
        }
        self.vote(self.features(cell))
    }

    fn classify_extracted(&self, _cell: &GrayImage, ink: &ExtractedDigit) -> u8 {
        if self.model.samples.is_empty() {
            return 0;
        }
        self.vote(self.ink_features(ink))
    }

    fn train(&mut self, samples: &[LabeledSample]) -> Result<(), ClassifierError> {
        if let Some(bad) = samples.iter().find(|s| !(1..=9).contains(&s.label)) {
            return Err(ClassifierError::InvalidLabel { label: bad.label });
        }

        let mut stored = Vec::with_capacity(samples.len());
        for sample in samples {
            match self.features(&sample.image) {
                Some(features) => stored.push(StoredSample {
                    label: sample.label,
                    features,
                }),
                None => debug!("skipping training sample {} without ink", sample.label),
            }
        }
        if stored.is_empty() {
            return Err(ClassifierError::EmptyTrainingSet);
        }
        if stored.len() < samples.len() {
            warn!(
                "{} of {} training samples had no ink",
                samples.len() - stored.len(),
                samples.len()
            );
        }

        self.model = KnnModel {
            sample_width: self.sample_width,
            samples: stored,
        };
        Ok(())
    }

    fn load(&mut self, path: &Path) -> Result<(), ClassifierError> {
        let text = fs::read_to_string(path).map_err(|e| ClassifierError::io(path, e))?;
        let model: KnnModel = serde_json::from_str(&text)?;

        let expected = self.sample_width * self.sample_width;
        if model.sample_width != self.sample_width {
            return Err(ClassifierError::FeatureSizeMismatch {
                expected,
                found: model.sample_width * model.sample_width,
            });
        }
        if let Some(bad) = model.samples.iter().find(|s| s.features.len() != expected) {
            return Err(ClassifierError::FeatureSizeMismatch {
                expected,
                found: bad.features.len(),
            });
        }
        if let Some(bad) = model.samples.iter().find(|s| !(1..=9).contains(&s.label)) {
            return Err(ClassifierError::InvalidLabel { label: bad.label });
        }
        if model.samples.is_empty() {
            return Err(ClassifierError::EmptyTrainingSet);
        }

        self.model = model;
        Ok(())
    }

    fn save(&self, path: &Path) -> Result<(), ClassifierError> {
        if self.model.samples.is_empty() {
            return Err(ClassifierError::NotTrained);
        }
        let text = serde_json::to_string(&self.model)?;
        fs::write(path, text).map_err(|e| ClassifierError::io(path, e))
    }

    fn is_trained(&self) -> bool {
        !self.model.samples.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const CELL: usize = 40;

    fn paper() -> GrayImage {
        GrayImage::from_raw(CELL, CELL, vec![230; CELL * CELL]).expect("sized")
    }

    fn fill(img: &mut GrayImage, x0: usize, x1: usize, y0: usize, y1: usize) {
        for y in y0..y1 {
            for x in x0..x1 {
                img.set(x, y, 20);
            }
        }
    }

    fn bar(half_width: usize) -> GrayImage {
        let mut img = paper();
        fill(&mut img, 20 - half_width, 20 + half_width, 8, 32);
        img
    }

    fn cross(half_width: usize) -> GrayImage {
        let mut img = paper();
        fill(&mut img, 20 - half_width, 20 + half_width, 8, 32);
        fill(&mut img, 8, 32, 20 - half_width, 20 + half_width);
        img
    }

    fn samples() -> Vec<LabeledSample> {
        let mut out = Vec::new();
        for hw in [3, 4, 5] {
            out.push(LabeledSample {
                label: 1,
                image: bar(hw),
            });
            out.push(LabeledSample {
                label: 4,
                image: cross(hw),
            });
        }
        out
    }

    fn trained() -> NearestNeighborClassifier {
        let mut knn = NearestNeighborClassifier::new(ExtractorParams::default(), 4, 16);
        knn.train(&samples()).expect("trainable");
        knn
    }

    #[test]
    fn untrained_reads_zero() {
        let knn = NearestNeighborClassifier::new(ExtractorParams::default(), 4, 16);
        assert!(!knn.is_trained());
        assert_eq!(knn.classify(&bar(4)), 0);
    }

    #[test]
    fn separates_bars_from_crosses() {
        let knn = trained();
        assert_eq!(knn.sample_count(), 6);
        assert_eq!(knn.classify(&bar(6)), 1);
        assert_eq!(knn.classify(&cross(2)), 4);
        assert_eq!(knn.classify(&paper()), 0);
    }

    #[test]
    fn extracted_ink_is_used_as_is() {
        let knn = trained();
        let extractor = DigitExtractor::new(ExtractorParams::default());
        let bar_ink = extractor.extract(&bar(6));
        let cross_ink = extractor.extract(&cross(2));

        assert_eq!(knn.classify_extracted(&bar(6), &bar_ink), 1);
        assert_eq!(knn.classify_extracted(&cross(2), &cross_ink), 4);
        // The mask decides, not the raw cell.
        assert_eq!(knn.classify_extracted(&bar(6), &cross_ink), 4);
        assert_eq!(knn.classify_extracted(&bar(6), &ExtractedDigit::empty(CELL, CELL)), 0);
    }

    #[test]
    fn bad_label_keeps_previous_model() {
        let mut knn = trained();
        let err = knn
            .train(&[LabeledSample {
                label: 0,
                image: bar(4),
            }])
            .expect_err("label 0");
        assert!(matches!(err, ClassifierError::InvalidLabel { label: 0 }));
        assert_eq!(knn.sample_count(), 6);
    }

    #[test]
    fn inkless_training_set_is_rejected() {
        let mut knn = NearestNeighborClassifier::new(ExtractorParams::default(), 4, 16);
        let err = knn
            .train(&[LabeledSample {
                label: 3,
                image: paper(),
            }])
            .expect_err("no ink");
        assert!(matches!(err, ClassifierError::EmptyTrainingSet));
    }

    #[test]
    fn saved_model_classifies_identically() {
        let dir = tempfile::tempdir().expect("tempdir");
        let path = dir.path().join("knn.json");
        let knn = trained();
        knn.save(&path).expect("saved");

        let mut restored = NearestNeighborClassifier::new(ExtractorParams::default(), 4, 16);
        restored.load(&path).expect("loaded");
        assert_eq!(restored.sample_count(), 6);
        for img in [bar(6), cross(2), paper()] {
            assert_eq!(restored.classify(&img), knn.classify(&img));
        }
    }

    #[test]
    fn mismatched_model_is_rejected() {
        let dir = tempfile::tempdir().expect("tempdir");
        let path = dir.path().join("knn.json");
        trained().save(&path).expect("saved");

        let mut other = NearestNeighborClassifier::new(ExtractorParams::default(), 4, 8);
        let err = other.load(&path).expect_err("size differs");
        assert!(matches!(
            err,
            ClassifierError::FeatureSizeMismatch {
                expected: 64,
                found: 256
            }
        ));
        assert!(!other.is_trained());
    }

    #[test]
    fn missing_file_and_untrained_save_fail() {
        let dir = tempfile::tempdir().expect("tempdir");
        let mut knn = NearestNeighborClassifier::new(ExtractorParams::default(), 4, 16);
        assert!(matches!(
            knn.load(&dir.path().join("absent.json")),
            Err(ClassifierError::Io { .. })
        ));
        assert!(matches!(
            knn.save(&dir.path().join("m.json")),
            Err(ClassifierError::NotTrained)
        ));
    }
}
