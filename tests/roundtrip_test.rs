// Round-trip tests: model -> XML -> model and model -> JSON -> model
// must preserve the entry sequence, durations, and recomputed MIDI values.

use partwise::models::layout::{Appearance, LineWidth, NoteSize, Scaling};
use partwise::models::measure::{Backup, Measure, MeasureEntry, Part};
use partwise::models::note::{Note, Pitch, Step};
use partwise::models::score::{Defaults, PartListEntry, ScorePart, ScorePartwise, Work};

fn one_part_score() -> ScorePartwise {
    let mut score = ScorePartwise::new();
    score
        .part_list
        .entries
        .push(PartListEntry::ScorePart(ScorePart::new("P1", "Voice")));

    let mut measure = Measure::new("1");
    let mut rest = Note::rest(4);
    rest.staff = Some("1".to_string());
    measure.add_note(rest).unwrap();

    let mut c4 = Note::pitched(Pitch::natural(Step::C, 4), 4).unwrap();
    c4.staff = Some("1".to_string());
    c4.voice = Some("1".to_string());
    measure.add_note(c4).unwrap();

    let mut part = Part::new("P1");
    part.measures.push(measure);
    score.parts.push(part);
    score
}

#[test]
fn test_xml_round_trip_preserves_notes() {
    let score = one_part_score();
    let xml = score.to_xml();
    let reloaded = ScorePartwise::from_xml(&xml).expect("re-reading our own output");

    assert_eq!(reloaded.parts.len(), 1);
    let measure = &reloaded.parts[0].measures[0];
    let notes: Vec<_> = measure.notes().collect();
    assert_eq!(notes.len(), 2);

    // Order survives: rest first, then the pitched note
    assert!(notes[0].is_rest());
    assert_eq!(notes[0].duration(), 4);
    assert!(!notes[1].is_rest());
    assert_eq!(notes[1].duration(), 4);
    assert_eq!(notes[1].midi(), Some(60));
}

#[test]
fn test_xml_round_trip_is_stable() {
    let score = one_part_score();
    let once = ScorePartwise::from_xml(&score.to_xml()).unwrap();
    let twice = ScorePartwise::from_xml(&once.to_xml()).unwrap();
    assert_eq!(once, twice);
}

#[test]
fn test_json_deep_copy_preserves_structure() {
    let score = one_part_score();
    let json = serde_json::to_string(&score).unwrap();
    let copy: ScorePartwise = serde_json::from_str(&json).unwrap();

    assert_eq!(copy, score);
    // The MIDI cache is rebuilt from the written pitch on load
    let notes: Vec<_> = copy.parts[0].measures[0].notes().collect();
    assert_eq!(notes[1].midi(), Some(60));
}

#[test]
fn test_file_round_trip() {
    let score = one_part_score();
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("score.xml");

    score.to_file(&path).unwrap();
    let reloaded = ScorePartwise::from_file(&path).unwrap();
    assert_eq!(reloaded, ScorePartwise::from_xml(&score.to_xml()).unwrap());
}

#[test]
fn test_header_round_trip() {
    let mut score = one_part_score();
    score.work = Some(Work {
        work_number: Some("Op. 1".to_string()),
        work_title: Some("Suite".to_string()),
        opus: Some("suite.xml".to_string()),
    });
    score.defaults = Some(Defaults {
        scaling: Some(Scaling { millimeters: 7.2, tenths: 40.0 }),
        appearance: Some(Appearance {
            line_widths: vec![LineWidth { line_type: "stem".to_string(), value: 0.9 }],
            note_sizes: vec![NoteSize { size_type: "grace".to_string(), value: 60.0 }],
        }),
        ..Defaults::default()
    });

    let reloaded = ScorePartwise::from_xml(&score.to_xml()).unwrap();
    assert_eq!(reloaded.work, score.work);
    assert_eq!(reloaded.defaults, score.defaults);
}

#[test]
fn test_backup_entries_survive_round_trip() {
    let mut score = one_part_score();
    {
        let measure = &mut score.parts[0].measures[0];
        measure.push(MeasureEntry::Backup(Backup { duration: 8 }));
        let mut e4 = Note::pitched(Pitch::natural(Step::E, 4), 8).unwrap();
        e4.staff = Some("2".to_string());
        e4.voice = Some("2".to_string());
        measure.add_note(e4).unwrap();
    }

    let reloaded = ScorePartwise::from_xml(&score.to_xml()).unwrap();
    let entries = &reloaded.parts[0].measures[0].entries;
    assert_eq!(entries.len(), 4);
    assert!(matches!(entries[2], MeasureEntry::Backup(Backup { duration: 8 })));
    match &entries[3] {
        MeasureEntry::Note(note) => {
            assert_eq!(note.staff.as_deref(), Some("2"));
            assert_eq!(note.midi(), Some(64));
        }
        other => panic!("expected a note after the backup, got {:?}", other),
    }
}
