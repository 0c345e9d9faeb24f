//! Formatter tests: minimum width, justification, stave furniture and
//! layout export.

use pretty_assertions::assert_eq;
use scoreform::{
    layout_to_json, AccidentalMemory, AccidentalResolver, FormatError, FormattedLayout, Formatter,
    FormatterOptions, Fraction, KeySignature, Score, Stave, Tickable, TimeSignature, TimelineBuilder, Voice,
    VoiceId,
};

const EPSILON: f64 = 1e-6;

fn assert_close(actual: f64, expected: f64, what: &str) {
    assert!(
        (actual - expected).abs() < EPSILON,
        "{what}: expected {expected}, got {actual}"
    );
}

/// A 4/4 voice from duration tokens, all on middle C.
fn voice_of(score: &mut Score, durations: &[&str]) -> VoiceId {
    let voice = score.add_voice(Voice::new(TimeSignature::COMMON));
    for &d in durations {
        score
            .add_tickable(voice, Tickable::note(d, &["c/4"]).unwrap())
            .expect("note fits");
    }
    voice
}

// ═══════════════════════════════════════════════════════════════════════
// Minimum width
// ═══════════════════════════════════════════════════════════════════════

#[test]
fn min_total_width_sums_width_and_padding() {
    let mut score = Score::new();
    let voice = voice_of(&mut score, &["4", "4", "4", "4"]);
    let mut formatter = Formatter::default();

    assert_eq!(formatter.min_total_width(), Err(FormatError::UnformattedWidth));

    // notehead 11 + padding 10 per node
    let min = formatter.pre_calculate_min_total_width(&mut score, &[voice]).unwrap();
    assert_close(min, 84.0, "min width");
    assert_close(formatter.min_total_width().unwrap(), 84.0, "stored min width");
}

#[test]
fn simultaneous_notes_share_one_slot() {
    let mut score = Score::new();
    let upper = voice_of(&mut score, &["4", "4", "4", "4"]);
    let lower = voice_of(&mut score, &["4", "4", "4", "4"]);
    let mut formatter = Formatter::default();

    let one = formatter.pre_calculate_min_total_width(&mut score, &[upper]).unwrap();
    let both = formatter.pre_calculate_min_total_width(&mut score, &[upper, lower]).unwrap();
    assert_close(both, one, "two voices in lock step");
}

#[test]
fn dots_and_accidentals_widen_nodes() {
    let mut score = Score::new();
    let plain = voice_of(&mut score, &["2", "2"]);
    let dotted = voice_of(&mut score, &["2d", "4"]);
    let sharp = score.add_voice(Voice::new(TimeSignature::CUT));
    score.add_tickable(sharp, Tickable::note("1", &["f#/4"]).unwrap()).unwrap();

    let mut formatter = Formatter::default();
    let plain_min = formatter.pre_calculate_min_total_width(&mut score, &[plain]).unwrap();
    let dotted_min = formatter.pre_calculate_min_total_width(&mut score, &[dotted]).unwrap();
    assert_close(dotted_min - plain_min, 6.0, "one dot");

    let timeline = TimelineBuilder::build(&mut score, &[sharp]).unwrap();
    let mut memory = AccidentalMemory::new(KeySignature::default());
    AccidentalResolver::default().apply(&mut score, &timeline, &mut memory).unwrap();
    let sharp_min = formatter.pre_calculate_min_total_width(&mut score, &[sharp]).unwrap();
    // sharp 10 + gap 3 ahead of the notehead
    assert_close(sharp_min, 10.0 + 13.0 + 11.0, "sharp column");
}

#[test]
fn min_node_width_option_is_a_floor() {
    let mut score = Score::new();
    let voice = voice_of(&mut score, &["2", "2"]);
    let mut formatter = Formatter::new(FormatterOptions {
        min_node_width: 30.0,
        ..FormatterOptions::default()
    });
    let min = formatter.pre_calculate_min_total_width(&mut score, &[voice]).unwrap();
    assert_close(min, 80.0, "two floored nodes");
}

#[test]
fn incomplete_strict_voice_is_not_formatted() {
    let mut score = Score::new();
    let voice = voice_of(&mut score, &["4"]);
    let mut formatter = Formatter::default();

    let err = formatter.format(&mut score, &[voice], 200.0).unwrap_err();
    assert_eq!(
        err,
        FormatError::TooFewTicks {
            used: "4096/1".to_string(),
            total: "16384/1".to_string(),
        }
    );
    assert!(formatter.timeline().is_none());

    let stave = Stave::new(0.0, 300.0);
    let err = scoreform::format_voices(&mut score, &[voice], &stave, &KeySignature::default()).unwrap_err();
    assert!(matches!(err, FormatError::TooFewTicks { .. }));
}

#[test]
fn incomplete_exact_voice_is_not_formatted() {
    let mut score = Score::new();
    let full = voice_of(&mut score, &["2", "2"]);
    let short = score.add_voice(Voice::with_total_ticks(Fraction::from_integer(16384)));
    score.add_tickable(short, Tickable::note("2", &["e/4"]).unwrap()).unwrap();

    let mut formatter = Formatter::default();
    assert!(matches!(
        formatter.pre_calculate_min_total_width(&mut score, &[full, short]),
        Err(FormatError::TooFewTicks { .. })
    ));
    assert!(formatter.pre_calculate_min_total_width(&mut score, &[full]).is_ok());
}

#[test]
fn width_is_unavailable_before_measurement() {
    let t = Tickable::note("4", &["c/4"]).unwrap();
    assert_eq!(t.width(), Err(FormatError::UnformattedWidth));
}

// ═══════════════════════════════════════════════════════════════════════
// Justification
// ═══════════════════════════════════════════════════════════════════════

#[test]
fn width_is_conserved() {
    for justify in [160.0, 333.3, 1000.0] {
        let mut score = Score::new();
        let upper = voice_of(&mut score, &["2", "8", "8", "16", "16", "8"]);
        let lower = voice_of(&mut score, &["4d", "8", "2"]);
        let mut formatter = Formatter::default();

        let layout = formatter.format(&mut score, &[upper, lower], justify).unwrap();

        assert!(justify >= layout.min_total_width);
        assert_close(layout.used_width(), justify, "Σ width + padding + extra");
    }
}

#[test]
fn equal_durations_get_equal_extra() {
    let mut score = Score::new();
    let voice = voice_of(&mut score, &["4", "4", "4", "4"]);
    let mut formatter = Formatter::default();

    let layout = formatter.format(&mut score, &[voice], 300.0).unwrap();

    assert_close(layout.extra, 216.0, "extra");
    for node in &layout.nodes {
        assert_close(node.extra, 54.0, "share");
    }
    let xs: Vec<f64> = layout.nodes.iter().map(|n| n.x).collect();
    for (x, expected) in xs.iter().zip([10.0, 85.0, 160.0, 235.0]) {
        assert_close(*x, expected, "node x");
    }

    // Tickables report the position of their node
    let tickables = score.voice_tickables(voice).unwrap();
    assert_close(tickables[1].x().unwrap(), 85.0, "tickable x");
}

#[test]
fn exact_fit_leaves_no_extra() {
    let mut score = Score::new();
    let voice = voice_of(&mut score, &["2", "4", "4"]);
    let mut formatter = Formatter::default();
    let min = formatter.pre_calculate_min_total_width(&mut score, &[voice]).unwrap();

    let layout = formatter.format(&mut score, &[voice], min).unwrap();

    assert!(layout.nodes.iter().all(|n| n.extra == 0.0));
    assert_close(layout.used_width(), min, "used width");
}

#[test]
fn too_narrow_is_clamped_not_negative() {
    let mut score = Score::new();
    let voice = voice_of(&mut score, &["8", "8", "8", "8", "2"]);
    let mut formatter = Formatter::default();

    let layout = formatter.format(&mut score, &[voice], 20.0).unwrap();

    assert_eq!(layout.extra, 0.0);
    assert!(layout.nodes.iter().all(|n| n.extra == 0.0));
    assert_close(layout.used_width(), layout.min_total_width, "falls back to minimum");
    let xs: Vec<f64> = layout.nodes.iter().map(|n| n.x).collect();
    assert!(xs.windows(2).all(|w| w[0] < w[1]), "nodes still ordered: {xs:?}");
}

#[test]
fn single_node_takes_all_extra() {
    let mut score = Score::new();
    let voice = voice_of(&mut score, &["1"]);
    let mut formatter = Formatter::default();

    let layout = formatter.format(&mut score, &[voice], 200.0).unwrap();

    assert_eq!(layout.nodes.len(), 1);
    assert_close(layout.nodes[0].extra, 200.0 - 21.0, "whole extra");
}

#[test]
fn zero_tick_nodes_get_no_share() {
    let mut score = Score::new();
    let voice = score.add_voice(Voice::new(TimeSignature::CUT));
    score.add_tickable(voice, Tickable::note("2", &["c/4"]).unwrap()).unwrap();
    score.add_tickable(voice, Tickable::note("2", &["d/4"]).unwrap()).unwrap();
    score.add_tickable(voice, Tickable::bar_line()).unwrap();
    let mut formatter = Formatter::default();

    let layout = formatter.format(&mut score, &[voice], 250.0).unwrap();

    assert_eq!(layout.nodes.len(), 3);
    assert_eq!(layout.nodes[2].extra, 0.0);
    assert_close(layout.nodes[0].extra, layout.nodes[1].extra, "equal halves");
    assert_close(layout.used_width(), 250.0, "conserved");
}

#[test]
fn markers_only_leave_extra_unused() {
    let mut score = Score::new();
    let voice = score.add_voice(Voice::soft());
    score.add_tickable(voice, Tickable::marker("a")).unwrap();
    score.add_tickable(voice, Tickable::bar_line()).unwrap();
    let mut formatter = Formatter::default();

    let layout = formatter.format(&mut score, &[voice], 200.0).unwrap();

    assert!(layout.nodes.iter().all(|n| n.extra == 0.0));
    assert_close(layout.used_width(), layout.min_total_width, "no share handed out");
    assert!(layout.used_width() < 200.0);
}

#[test]
fn higher_softmax_factor_favors_long_notes() {
    let mut ratios = Vec::new();
    for factor in [1.0, 10.0, 50.0] {
        let mut score = Score::new();
        let voice = voice_of(&mut score, &["2", "8", "8", "4"]);
        let mut formatter = Formatter::new(FormatterOptions {
            softmax_factor: factor,
            ..FormatterOptions::default()
        });
        let layout = formatter.format(&mut score, &[voice], 400.0).unwrap();
        let longest = layout.nodes[0].extra;
        let shortest = layout.nodes[1].extra;
        assert!(longest > shortest);
        ratios.push(longest / shortest);
    }
    assert!(ratios.windows(2).all(|w| w[1] > w[0]), "ratios not increasing: {ratios:?}");
}

#[test]
fn large_softmax_factor_stays_finite() {
    let mut score = Score::new();
    let voice = voice_of(&mut score, &["2", "4", "4"]);
    let mut formatter = Formatter::new(FormatterOptions {
        softmax_factor: 5000.0,
        ..FormatterOptions::default()
    });
    let layout = formatter.format(&mut score, &[voice], 500.0).unwrap();
    assert!(layout.nodes.iter().all(|n| n.extra.is_finite()));
    assert_close(layout.used_width(), 500.0, "conserved");
}

#[test]
fn node_uses_its_shortest_member() {
    let mut score = Score::new();
    let halves = voice_of(&mut score, &["2", "2"]);
    let eighths = voice_of(&mut score, &["8", "8", "8", "8", "2"]);
    let mut formatter = Formatter::default();

    let layout = formatter.format(&mut score, &[halves, eighths], 300.0).unwrap();

    assert_eq!(layout.nodes[0].ticks, "2048/1");
    assert_eq!(layout.nodes[4].ticks, "8192/1");
}

// ═══════════════════════════════════════════════════════════════════════
// Staves, options and export
// ═══════════════════════════════════════════════════════════════════════

#[test]
fn format_to_stave_starts_after_furniture() {
    let mut score = Score::new();
    let voice = voice_of(&mut score, &["4", "4", "2"]);
    let stave = Stave::new(20.0, 400.0)
        .with_clef()
        .with_key(KeySignature::parse("A").unwrap())
        .with_time(TimeSignature::COMMON);
    let mut formatter = Formatter::default();

    let layout = formatter.format_to_stave(&mut score, &[voice], &stave).unwrap();

    assert_close(layout.justify_width, stave.justify_width(), "justify width");
    assert_close(layout.nodes[0].x, stave.note_start_x() + 10.0, "first node");
    let last = layout.nodes.last().unwrap();
    assert_close(last.x + last.width + last.extra, stave.note_end_x(), "last node reaches the end");
}

#[test]
fn options_load_from_json() {
    let options = FormatterOptions::from_json(r#"{ "softmax_factor": 50.0 }"#).unwrap();
    assert_eq!(
        options,
        FormatterOptions {
            softmax_factor: 50.0,
            ..FormatterOptions::default()
        }
    );

    let err = FormatterOptions::from_json("{ softmax }").unwrap_err();
    assert!(matches!(err, FormatError::Serialization(_)));
}

#[test]
fn layout_exports_to_json() {
    let mut score = Score::new();
    let voice = voice_of(&mut score, &["4", "4", "2"]);
    let mut formatter = Formatter::default();
    let layout = formatter.format(&mut score, &[voice], 200.0).unwrap();

    let json = layout_to_json(&layout).unwrap();
    assert!(json.contains("\"tick_key\": 8192"));

    let back: FormattedLayout = serde_json::from_str(&json).unwrap();
    assert_eq!(back.nodes.len(), 3);
    assert_eq!(back.nodes[2].start, "8192/1");
    assert_eq!(back.nodes[1].tickables, vec![1]);
    for (a, b) in back.nodes.iter().zip(&layout.nodes) {
        assert_close(a.x, b.x, "x survives export");
    }
}

#[test]
fn simple_format_lays_out_glyph_runs() {
    let mut score = Score::new();
    let voice = score.add_voice(Voice::soft());
    score.add_tickable(voice, Tickable::marker("abc")).unwrap();
    score.add_tickable(voice, Tickable::marker("de")).unwrap();
    let formatter = Formatter::default();

    let end = formatter.simple_format(&mut score, voice, 5.0, 2.0).unwrap();

    let tickables = score.voice_tickables(voice).unwrap();
    assert_close(tickables[0].x().unwrap(), 5.0, "first glyph");
    assert_close(tickables[1].x().unwrap(), 5.0 + 21.0 + 2.0, "second glyph");
    assert_close(end, 5.0 + 21.0 + 2.0 + 14.0 + 2.0, "end");
}
