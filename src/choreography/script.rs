//! The celebration choreography

use std::time::Duration;

use crate::effects::{
    palette::{FESTIVE, GOLD, GREEN, PINK, RED, WHITE},
    AudioAction, BurstSpec, Effect, Origin, Shape,
};

use super::Cue;

/// Time from run start until the final content is revealed
pub const REVEAL_AFTER: Duration = Duration::from_millis(8_000);

/// Length of the soundtrack fade at the end of the run
pub const AUDIO_FADE_MS: u64 = 800;

/// Build the fixed list of cues played on every celebration run
pub fn celebration_script() -> Vec<Cue> {
    let reveal_ms = REVEAL_AFTER.as_millis() as u64;
    let crossfire_colors = [RED, GREEN, WHITE, GOLD, PINK];

    vec![
        Cue::once("audio-start", 0, Effect::audio(AudioAction::play_looped())),
        Cue::once(
            "big-bang",
            100,
            Effect::burst(
                BurstSpec::new(300, 360.0)
                    .origin(Origin::at_y(0.5))
                    .colors(&[RED, GREEN, WHITE, GOLD])
                    .scalar(1.2),
            ),
        ),
        Cue::once(
            "side-cannons",
            500,
            Effect::bursts(vec![
                BurstSpec::new(100, 80.0)
                    .angle(60.0)
                    .origin(Origin::at(0.0, 0.5))
                    .colors(&[RED, GREEN]),
                BurstSpec::new(100, 80.0)
                    .angle(120.0)
                    .origin(Origin::at(1.0, 0.5))
                    .colors(&[WHITE, GOLD]),
            ]),
        ),
        // Approximates the page's per-frame side cannons with a fixed 50 ms
        // period until the 4 s mark
        Cue::stream(
            "crossfire",
            1_000,
            50,
            3_000,
            vec![
                BurstSpec::new(5, 55.0)
                    .angle(60.0)
                    .origin(Origin::at_x(0.0))
                    .colors(&crossfire_colors)
                    .scalar(0.8),
                BurstSpec::new(5, 55.0)
                    .angle(120.0)
                    .origin(Origin::at_x(1.0))
                    .colors(&crossfire_colors)
                    .scalar(0.8),
            ],
        ),
        Cue::once(
            "themed-burst",
            2_000,
            Effect::burst(
                BurstSpec::new(200, 100.0)
                    .origin(Origin::at_y(0.6))
                    .colors(&[RED, GREEN, WHITE])
                    .shapes(&[Shape::Circle, Shape::Star])
                    .scalar(1.5),
            ),
        ),
        // Approximates the page's 250 ms snowfall interval. The first flurry
        // fires with the stream at full count rather than one period later.
        Cue::stream(
            "gentle-snowfall",
            3_000,
            250,
            5_000,
            vec![
                snowfall_burst((0.1, 0.3)).colors(&[RED, GREEN]),
                snowfall_burst((0.7, 0.9)).colors(&[WHITE, GOLD]),
            ],
        )
        .decaying(),
        Cue::once(
            "grand-finale",
            4_000,
            Effect::burst(
                BurstSpec::new(500, 200.0)
                    .origin(Origin::at_y(0.3))
                    .colors(FESTIVE)
                    .shapes(&[Shape::Circle, Shape::Star])
                    .scalar(2.0),
            ),
        ),
        Cue::once("audio-fade", reveal_ms, Effect::audio(AudioAction::fade_out(AUDIO_FADE_MS))),
        Cue::once("reveal", reveal_ms, Effect::Reveal),
    ]
}

fn snowfall_burst(x: (f32, f32)) -> BurstSpec {
    BurstSpec::new(30, 360.0)
        .start_velocity(30.0)
        .ticks(60)
        .origin(Origin::between(x, (-0.2, 0.8)))
}
