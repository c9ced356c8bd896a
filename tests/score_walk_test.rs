// Loads a two-part score from XML, re-serializes it, then walks every part
// collecting the MIDI value of each staff-1 note.

use partwise::models::score::ScorePartwise;

const CANTUS: &str = r#"<?xml version="1.0" encoding="UTF-8"?>
<!DOCTYPE score-partwise PUBLIC "-//Recordare//DTD MusicXML 2.0 Partwise//EN" "http://www.musicxml.org/dtds/partwise.dtd">
<score-partwise version="2.0">
  <work>
    <work-title>Cantus Firmus</work-title>
  </work>
  <identification>
    <creator type="composer">Anonymous</creator>
    <encoding>
      <software>partwise</software>
    </encoding>
  </identification>
  <part-list>
    <score-part id="P1">
      <part-name>Cantus</part-name>
    </score-part>
    <score-part id="P2">
      <part-name>Organ</part-name>
    </score-part>
  </part-list>
  <part id="P1">
    <measure number="1">
      <attributes>
        <divisions>1</divisions>
        <key><fifths>0</fifths><mode>major</mode></key>
        <time><beats>4</beats><beat-type>4</beat-type></time>
        <clef><sign>G</sign><line>2</line></clef>
      </attributes>
      <note>
        <pitch><step>D</step><octave>4</octave></pitch>
        <duration>4</duration>
        <voice>1</voice>
        <type>whole</type>
        <staff>1</staff>
      </note>
    </measure>
    <measure number="2">
      <note>
        <pitch><step>F</step><octave>4</octave></pitch>
        <duration>4</duration>
        <voice>1</voice>
        <type>whole</type>
        <staff>1</staff>
      </note>
    </measure>
    <measure number="3">
      <note>
        <pitch><step>E</step><octave>4</octave></pitch>
        <duration>4</duration>
        <voice>1</voice>
        <type>whole</type>
        <staff>1</staff>
      </note>
    </measure>
  </part>
  <part id="P2">
    <measure number="1">
      <attributes>
        <divisions>1</divisions>
        <staves>2</staves>
        <clef number="1"><sign>G</sign><line>2</line></clef>
        <clef number="2"><sign>F</sign><line>4</line></clef>
      </attributes>
      <note>
        <pitch><step>A</step><octave>3</octave></pitch>
        <duration>4</duration>
        <voice>1</voice>
        <staff>1</staff>
      </note>
      <backup>
        <duration>4</duration>
      </backup>
      <note>
        <pitch><step>D</step><octave>3</octave></pitch>
        <duration>4</duration>
        <voice>2</voice>
        <staff>2</staff>
      </note>
    </measure>
  </part>
</score-partwise>"#;

fn staff_one_midi(score: &ScorePartwise) -> Vec<i32> {
    let mut values = Vec::new();
    for part in &score.parts {
        for measure in &part.measures {
            for note in measure.notes() {
                if note.staff.as_deref() == Some("1") {
                    if let Some(midi) = note.midi() {
                        values.push(midi);
                    }
                }
            }
        }
    }
    values
}

#[test]
fn test_staff_one_midi_walk() {
    let score = ScorePartwise::from_xml(CANTUS).expect("cantus should parse");
    // D4 F4 E4 from the cantus, then A3 from the organ's upper staff;
    // the staff-2 D3 is excluded
    assert_eq!(staff_one_midi(&score), vec![62, 65, 64, 57]);
}

#[test]
fn test_reserialized_score_walks_the_same() {
    let score = ScorePartwise::from_xml(CANTUS).unwrap();
    let reloaded = ScorePartwise::from_xml(&score.to_xml()).unwrap();
    assert_eq!(staff_one_midi(&reloaded), staff_one_midi(&score));
    assert_eq!(reloaded.work.as_ref().unwrap().work_title.as_deref(), Some("Cantus Firmus"));
}

#[test]
fn test_header_metadata_round_trips() {
    let score = ScorePartwise::from_xml(CANTUS).unwrap();
    let reloaded = ScorePartwise::from_xml(&score.to_xml()).unwrap();

    let identification = reloaded.identification.as_ref().unwrap();
    assert_eq!(identification.creators[0].creator_type.as_deref(), Some("composer"));
    assert_eq!(identification.creators[0].name, "Anonymous");

    let ids: Vec<&str> = reloaded.part_list.score_parts().map(|p| p.id.as_str()).collect();
    assert_eq!(ids, vec!["P1", "P2"]);
}
