mod common;

use common::hand_with_angles;
use hand_posture::core::library::PostureStore;
use hand_posture::domain::model::{AngleVector, DetectedHand, Frame, Handedness};
use hand_posture::domain::ports::{PostureRepository, TrackingSettings};
use hand_posture::{
    ConsolePresenter, JsonFileRepository, JsonLinesSource, PostureLibrary, PostureMatcher,
    RecognitionEngine,
};
use std::io::Write;
use tempfile::TempDir;

fn frame_line(hands: &[(Handedness, [f64; 5])]) -> String {
    let frame = Frame {
        hands: hands
            .iter()
            .map(|(handedness, angles)| DetectedHand {
                handedness: *handedness,
                score: Some(0.9),
                landmarks: hand_with_angles(*angles),
            })
            .collect(),
    };
    serde_json::to_string(&frame).unwrap()
}

#[tokio::test]
async fn test_file_backed_session() {
    let dir = TempDir::new().unwrap();
    let store_path = dir.path().join("registered_postures.json");
    let frames_path = dir.path().join("landmarks.jsonl");

    let thumbs_up = [0.2, 2.5, 2.6, 2.6, 2.5];
    let mut store = PostureStore::new();
    store.insert("thumbs_up".to_string(), AngleVector::new(thumbs_up));
    JsonFileRepository::new(&store_path)
        .save(&store)
        .await
        .unwrap();

    let mut file = std::fs::File::create(&frames_path).unwrap();
    writeln!(file, "{}", frame_line(&[(Handedness::Right, thumbs_up)])).unwrap();
    writeln!(file, "{}", frame_line(&[(Handedness::Left, thumbs_up)])).unwrap();
    writeln!(file, "not a frame").unwrap();
    writeln!(file).unwrap();
    writeln!(
        file,
        "{}",
        frame_line(&[(Handedness::Right, [0.21, 2.45, 2.62, 2.58, 2.55])])
    )
    .unwrap();
    writeln!(
        file,
        "{}",
        frame_line(&[(Handedness::Right, [1.5, 0.1, 0.1, 0.1, 0.1])])
    )
    .unwrap();
    drop(file);

    let library = PostureLibrary::open(JsonFileRepository::new(&store_path))
        .await
        .unwrap();
    let source = JsonLinesSource::open(&frames_path).await.unwrap();
    let mut engine = RecognitionEngine::new(
        library,
        PostureMatcher::default(),
        source,
        ConsolePresenter::new(Vec::new()),
        TrackingSettings::default(),
    );

    let (_tx, mut rx) = tokio::sync::mpsc::unbounded_channel();
    let summary = engine.run(&mut rx).await.unwrap();

    assert_eq!(summary.frames, 4);
    assert_eq!(summary.skipped_frames, 1);
    assert_eq!(summary.hands_evaluated, 3);
    assert_eq!(summary.matches, 2);

    let output = String::from_utf8(engine.presenter().get_ref().clone()).unwrap();
    let lines: Vec<&str> = output.lines().collect();
    assert_eq!(lines.len(), 2);
    assert_eq!(lines[0], "[frame 0] thumbs_up (0.000)");
    assert!(lines[1].starts_with("[frame 2] thumbs_up (0.0"));
}
