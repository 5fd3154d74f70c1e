//! End-to-end integration tests — pattern trees → chain → sequencer →
//! timeline.

use assert_approx_eq::assert_approx_eq;

use mtk::{
    Chain, ChainConfig, Choice, Cycle, Element, Event, ForEach, Interval, Palindrome, PatternNode,
    Pitch, PitchClass, Sequence, Sequencer, Time, Timeline, Variable,
};
use mtk::{Duration, Intensity};

const SEED: u64 = 42;

fn note_pitches(timeline: &Timeline) -> Vec<Pitch> {
    timeline
        .iter()
        .flat_map(|(_, events)| events.iter())
        .map(|event| match event {
            Event::Note { pitch, .. } => *pitch,
            other => panic!("expected note, got {other:?}"),
        })
        .collect()
}

fn pitch(name: &str, octave: i8) -> Pitch {
    Pitch::new(PitchClass::from_name(name).expect("known name"), octave)
}

#[test]
fn melody_through_step_sequencer() {
    let melody = Sequence::new([
        pitch("C", 4).into(),
        pitch("E", 4).into(),
        Element::from(mtk::Value::Rest),
        pitch("G", 4).into(),
    ]);
    let rhythm = Cycle::new([
        Duration::QUARTER.into(),
        Duration::EIGHTH.into(),
        Duration::EIGHTH.into(),
    ]);
    let chain = Chain::new()
        .pitch(PatternNode::from(melody))
        .duration(PatternNode::from(rhythm))
        .intensity(Intensity::MP);

    let timeline = Sequencer::step(chain, Time::new(1, 2))
        .to_timeline()
        .expect("run");

    // Four steps on a half-beat grid; the rest keeps its slot empty.
    let times: Vec<f64> = timeline.times().map(Time::to_f64).collect();
    assert_eq!(times, vec![0.0, 0.5, 1.5]);
    assert_eq!(
        note_pitches(&timeline),
        vec![pitch("C", 4), pitch("E", 4), pitch("G", 4)]
    );
}

#[test]
fn interval_walk_with_octave_folding() {
    // Stacked fifths from C4, folded to stay within an octave of C4.
    let chain = Chain::new()
        .with_config(ChainConfig {
            max_interval: Some(Interval::OCTAVE),
            ..ChainConfig::default()
        })
        .pitch(PatternNode::from(Sequence::from_values([7, 7, 7, 7])));
    let timeline = Sequencer::new(chain, 1).to_timeline().expect("run");
    assert_eq!(
        note_pitches(&timeline),
        vec![pitch("G", 4), pitch("D", 4), pitch("A", 4), pitch("E", 4)]
    );
}

#[test]
fn for_each_arpeggiates_over_roots() {
    // For each root in C, F, G: play root then root + 4 then root + 7.
    let inner = Sequence::new([
        Element::from(Variable::depth(0)),
        Element::from(Interval::new(4)),
        Element::from(Interval::new(3)),
    ]);
    let roots = Sequence::new([pitch("C", 4).into(), pitch("F", 4).into(), pitch("G", 4).into()]);
    let arp = ForEach::new([PatternNode::from(roots), inner.into()]);

    let chain = Chain::new().pitch(PatternNode::from(arp));
    let timeline = Sequencer::new(chain, Time::new(1, 4))
        .to_timeline()
        .expect("run");

    assert_eq!(
        note_pitches(&timeline),
        vec![
            pitch("C", 4),
            pitch("E", 4),
            pitch("G", 4),
            pitch("F", 4),
            pitch("A", 4),
            pitch("C", 5),
            pitch("G", 4),
            pitch("B", 4),
            pitch("D", 5),
        ]
    );
}

#[test]
fn palindrome_legato_phrase() {
    let melody = Palindrome::new([
        pitch("C", 4).into(),
        pitch("D", 4).into(),
        pitch("E", 4).into(),
    ]);
    let durations = Cycle::new([Duration::QUARTER.into(), Duration::EIGHTH.into()]);
    let chain = Chain::new()
        .pitch(PatternNode::from(melody))
        .duration(PatternNode::from(durations));

    let timeline = Sequencer::legato(chain)
        .with_max_steps(5)
        .to_timeline()
        .expect("run");

    // Entry times are running sums of the previous durations.
    let times: Vec<f64> = timeline.times().map(Time::to_f64).collect();
    assert_eq!(times, vec![0.0, 1.0, 1.5, 2.5, 3.0]);
    assert_eq!(
        note_pitches(&timeline),
        vec![
            pitch("C", 4),
            pitch("D", 4),
            pitch("E", 4),
            pitch("D", 4),
            pitch("C", 4),
        ]
    );
}

#[test]
fn seeded_runs_are_deterministic() {
    let build = || {
        let pitches = Choice::new([
            pitch("C", 4).into(),
            pitch("E", 4).into(),
            pitch("G", 4).into(),
            pitch("B", 4).into(),
        ]);
        let chain = Chain::new().pitch(PatternNode::from(pitches));
        Sequencer::new(chain, Time::new(1, 2))
            .with_max_steps(32)
            .with_seed(SEED)
    };
    let a = build().to_timeline().expect("run");
    let b = build().to_timeline().expect("run");
    assert_eq!(a, b);
    assert_eq!(a.len(), 32);
}

#[test]
fn quantize_then_merge_two_voices() {
    let lead = Chain::new().pitch(PatternNode::from(Sequence::new([
        pitch("E", 5).into(),
        pitch("D", 5).into(),
        pitch("C", 5).into(),
    ])));
    let bass = Chain::new()
        .pitch(PatternNode::from(Sequence::new([
            pitch("C", 2).into(),
            pitch("G", 2).into(),
        ])))
        .duration(Duration::HALF);

    let mut timeline = Sequencer::new(lead, Time::from_float(0.34))
        .to_timeline()
        .expect("run")
        .quantize(Time::new(1, 4));
    let bass_line = Sequencer::new(bass, 2).to_timeline().expect("run");
    timeline.merge(&bass_line);

    let times: Vec<f64> = timeline.times().map(Time::to_f64).collect();
    assert_eq!(times, vec![0.0, 0.25, 0.75, 2.0]);
    // Lead at 0 quantized onto the bass entry; both survive the merge.
    assert_eq!(timeline.events_at(Time::ZERO).expect("entry").len(), 2);
}

#[test]
fn nested_timelines_flatten_into_a_score() {
    let motif = |root: &str| {
        let chain = Chain::new().pitch(PatternNode::from(Sequence::new([
            pitch(root, 4).into(),
            Element::from(Interval::new(7)),
        ])));
        Sequencer::new(chain, Time::new(1, 2))
            .to_timeline()
            .expect("run")
    };

    let mut score = Timeline::new();
    score.add(0, Event::Timeline(motif("C")));
    score.add(2, Event::Timeline(motif("F")));
    let flat = score.flatten();

    let times: Vec<f64> = flat.times().map(Time::to_f64).collect();
    assert_eq!(times, vec![0.0, 0.5, 2.0, 2.5]);
    assert_eq!(
        note_pitches(&flat),
        vec![pitch("C", 4), pitch("G", 4), pitch("F", 4), pitch("C", 5)]
    );
    assert_approx_eq!(flat.length().beats(), 3.5);
}

#[test]
fn chord_progression_keeps_batches_atomic() {
    let triad = |a: Pitch, b: Pitch, c: Pitch| mtk::Value::Chord(vec![a, b, c]);
    let progression = Sequence::new([
        triad(pitch("C", 4), pitch("E", 4), pitch("G", 4)).into(),
        triad(pitch("F", 4), pitch("A", 4), pitch("C", 5)).into(),
        triad(pitch("G", 4), pitch("B", 4), pitch("D", 5)).into(),
    ]);
    let chain = Chain::new()
        .pitch(PatternNode::from(progression))
        .duration(Duration::WHOLE);

    let timeline = Sequencer::new(chain, 4).to_timeline().expect("run");
    assert_eq!(timeline.len(), 3);
    for (_, events) in timeline.iter() {
        assert_eq!(events.len(), 3);
    }
    assert_approx_eq!(timeline.length().beats(), 12.0);
}
