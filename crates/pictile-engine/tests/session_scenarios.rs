use image::{Rgba, RgbaImage};
use pictile_engine::{
    CheckOutcome, CropExtractor, GridSize, PLACEHOLDER_COLOR, PartitionError, PuzzleSession,
    SessionConfig, SessionState, SlotPicker, SwapOutcome, TileExtractor, TileImage, TileRegion,
    TileRenderError,
};

/// Replays a fixed list of Fisher–Yates picks.
struct ScriptedPicker(Vec<usize>);

impl SlotPicker for ScriptedPicker {
    fn pick(&mut self, upper: usize) -> usize {
        let j = self.0.remove(0);
        assert!(j <= upper);
        j
    }
}

/// Crops like [`CropExtractor`] but fails on one tile.
struct FailingExtractor {
    fail_on: usize,
    calls: usize,
}

impl TileExtractor for FailingExtractor {
    fn extract(
        &mut self,
        image: &RgbaImage,
        region: TileRegion,
    ) -> Result<RgbaImage, TileRenderError> {
        self.calls += 1;
        if region.index == self.fail_on {
            return Err(TileRenderError {
                index: region.index,
                reason: "backend error".to_owned(),
            });
        }
        CropExtractor.extract(image, region)
    }
}

fn session(n: usize) -> PuzzleSession {
    PuzzleSession::new(SessionConfig {
        grid_size: GridSize::new(n).unwrap(),
        ..SessionConfig::default()
    })
}

fn gradient(width: u32, height: u32) -> RgbaImage {
    RgbaImage::from_fn(width, height, |x, y| {
        Rgba([
            u8::try_from(x % 256).unwrap(),
            u8::try_from(y % 256).unwrap(),
            128,
            255,
        ])
    })
}

#[test]
fn trivial_two_by_two_game_is_won_in_two_moves() {
    let mut session = session(2);
    session.set_image(gradient(100, 100));

    // i = 3 picks 2, i = 2 picks 2, i = 1 picks 0
    session
        .start_with(&mut CropExtractor, &mut ScriptedPicker(vec![2, 2, 0]))
        .unwrap();
    assert_eq!(session.board().unwrap().arrangement(), vec![1, 0, 3, 2]);
    assert!(!session.board().unwrap().is_solved());

    assert_eq!(session.swap(0, 1), SwapOutcome::Moved);
    assert_eq!(session.board().unwrap().arrangement(), vec![0, 1, 3, 2]);
    assert_eq!(session.stats().move_count(), 1);
    assert!(!session.board().unwrap().is_solved());

    let SwapOutcome::Solved(score) = session.swap(2, 3) else {
        panic!("second swap should solve the puzzle");
    };
    assert_eq!(session.board().unwrap().arrangement(), vec![0, 1, 2, 3]);
    assert_eq!(session.state(), SessionState::Won);
    assert_eq!(score.move_count, 2);
    assert_eq!(score.grid_size.get(), 2);
    assert_eq!(session.last_score(), Some(&score));
}

#[test]
fn failed_tile_becomes_placeholder_and_game_goes_on() {
    let mut session = session(3);
    session.set_image(gradient(90, 90));
    let mut extractor = FailingExtractor {
        fail_on: 4,
        calls: 0,
    };
    session
        .start_with(&mut extractor, &mut ScriptedPicker(vec![0; 8]))
        .unwrap();
    assert_eq!(extractor.calls, 9);

    let board = session.board().unwrap();
    assert_eq!(board.tile_count(), 9);
    let slot = board.slot_of(4).unwrap();
    let placeholder = board.tile_at(slot);
    assert_eq!(
        placeholder.image(),
        &TileImage::Placeholder {
            label: 5,
            color: PLACEHOLDER_COLOR,
        }
    );
    let rasters = board
        .tiles()
        .iter()
        .filter(|tile| tile.image().is_raster())
        .count();
    assert_eq!(rasters, 8);

    // undo the rotation produced by always picking slot 0
    let mut arrangement = board.arrangement();
    let mut moves = 0;
    for slot in 0..arrangement.len() {
        let from = arrangement.iter().position(|&tile| tile == slot).unwrap();
        if from != slot {
            let outcome = session.swap(slot, from);
            arrangement.swap(slot, from);
            moves += 1;
            assert!(outcome.is_moved() || outcome.is_solved());
        }
    }
    assert!(session.state().is_won());
    assert_eq!(session.last_score().unwrap().move_count, moves);
}

#[test]
fn start_before_image_is_ready_changes_nothing() {
    let mut session = session(4);
    assert_eq!(session.start(), Err(PartitionError::ImageNotReady));
    assert_eq!(session.state(), SessionState::Idle);
    assert!(session.board().is_none());
    assert_eq!(session.stats().move_count(), 0);
    assert!(!session.tick());
    assert_eq!(session.check(), CheckOutcome::NotRunning);
}

#[test]
fn play_again_after_win() {
    let mut session = session(2);
    session.set_image(gradient(10, 10));
    session
        .start_with(&mut CropExtractor, &mut ScriptedPicker(vec![3, 2, 0]))
        .unwrap();
    assert!(session.swap(0, 1).is_solved());
    assert!(session.state().is_won());

    session.reset();
    assert!(session.state().is_idle());
    assert!(session.last_score().is_none());

    session.start().unwrap();
    assert!(session.state().is_running());
    assert!(session.seed().is_some());
    assert_eq!(session.stats().move_count(), 0);
}
