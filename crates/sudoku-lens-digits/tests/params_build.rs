use sudoku_lens_core::GrayImage;
use sudoku_lens_digits::{ClassifierParams, ExtractorParams, LabeledSample};

fn stroke_cell() -> GrayImage {
    let mut img = GrayImage::from_raw(40, 40, vec![225; 1600]).expect("sized");
    for y in 10..30 {
        for x in 17..23 {
            img.set(x, y, 15);
        }
    }
    img
}

#[test]
fn default_params_select_knn_with_k4() {
    let params = ClassifierParams::default();
    assert_eq!(
        params,
        ClassifierParams::NearestNeighbor {
            k: 4,
            sample_width: 16
        }
    );
    let json = serde_json::to_string(&params).expect("serializable");
    assert!(json.contains("\"kind\":\"nearest_neighbor\""), "{json}");
}

#[test]
fn built_classifier_trains_through_the_trait() {
    let mut clf = ClassifierParams::default().build(ExtractorParams::default());
    assert!(!clf.is_trained());
    clf.train(&[LabeledSample {
        label: 7,
        image: stroke_cell(),
    }])
    .expect("trainable");
    assert!(clf.is_trained());
    assert_eq!(clf.classify(&stroke_cell()), 7);
}
